pub mod lifecycle;
pub mod matcher;
pub mod photo;
pub mod session;

pub use lifecycle::{NewReport, SubmitError, UpdateError};
pub use session::Session;
