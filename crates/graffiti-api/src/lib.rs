pub mod reports;

pub use reports::{AppState, AppStateInner};
