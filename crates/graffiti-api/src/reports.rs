use std::sync::{Arc, Mutex, MutexGuard};

use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use tracing::error;

use graffiti_core::matcher::{self, ClickTarget};
use graffiti_core::photo::{self, PhotoData};
use graffiti_core::{NewReport, Session, SubmitError, UpdateError};
use graffiti_types::api::{
    ActiveReport, ClickResponse, ErrorBody, MapClick, Marker, PhotoUpload, ReportView,
    StatusCount, SubmitReportRequest, UpdateStatusRequest,
};
use graffiti_types::models::{Report, ReportStatus};

/// Shared state for all route handlers: one server process holds one
/// session, serialized by the mutex. Store round-trips run under
/// `spawn_blocking` to keep blocking I/O off the async runtime.
pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub session: Mutex<Session>,
}

type ApiError = (StatusCode, Json<ErrorBody>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(ErrorBody { error: message.into() }))
}

fn lock_session(state: &AppState) -> Result<MutexGuard<'_, Session>, ApiError> {
    state.session.lock().map_err(|e| {
        error!("session lock poisoned: {e}");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
    })
}

fn join_error(e: tokio::task::JoinError) -> ApiError {
    error!("spawn_blocking join error: {e}");
    api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

fn submit_error(e: SubmitError) -> ApiError {
    match e {
        SubmitError::MissingReporter | SubmitError::MissingLocation => {
            api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
        }
        SubmitError::Photo(e) => api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        SubmitError::Store(e) => {
            error!("store write failed: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "backing store failure")
        }
    }
}

fn update_error(e: UpdateError) -> ApiError {
    match e {
        UpdateError::InvalidIndex(_) => api_error(StatusCode::NOT_FOUND, e.to_string()),
        UpdateError::Photo(e) => api_error(StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
        UpdateError::Store(e) => {
            error!("store write failed: {e}");
            api_error(StatusCode::INTERNAL_SERVER_ERROR, "backing store failure")
        }
    }
}

/// Uploads carry raw bytes base64-encoded for transport; unwrap that here
/// so the core sees bytes (it re-encodes validated uploads for storage).
fn decode_upload(upload: &PhotoUpload) -> Result<PhotoData, ApiError> {
    let bytes = B64.decode(&upload.data).map_err(|_| {
        api_error(
            StatusCode::UNPROCESSABLE_ENTITY,
            "photo data is not valid base64",
        )
    })?;
    Ok(PhotoData {
        filename: upload.filename.clone(),
        bytes,
    })
}

fn report_view(index: usize, report: &Report) -> ReportView {
    ReportView {
        index,
        reporter: report.reporter.clone(),
        location: report.location.clone(),
        location_desc: report.location_desc.clone(),
        notes: report.notes.clone(),
        status: report.status,
        lat: report.lat,
        lng: report.lng,
        remover: report.remover.clone(),
        has_before_photo: !report.before_image.is_empty(),
        has_after_photo: !report.after_image.is_empty(),
    }
}

/// Label shown in the update workflow's report picker.
fn selection_label(index: usize, report: &Report) -> String {
    format!("#{index} | {} ({})", report.location_desc, report.location)
}

fn marker_for(report: &Report) -> Marker {
    let color = match report.status {
        ReportStatus::Removed => "green",
        ReportStatus::Reported => "red",
    };
    Marker {
        lat: report.lat,
        lng: report.lng,
        tooltip: format!(
            "{} ({}) by {}",
            report.location_desc, report.status, report.reporter
        ),
        color: color.to_string(),
    }
}

// ── Handlers ────────────────────────────────────────────────────────────

/// POST /reports — validated submission; appends and persists atomically.
pub async fn submit_report(
    State(state): State<AppState>,
    Json(req): Json<SubmitReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let before_photo = req.before_photo.as_ref().map(decode_upload).transpose()?;
    let new = NewReport {
        reporter: req.reporter,
        location_desc: req.location_desc,
        notes: req.notes,
        click: req.click,
        before_photo,
    };

    let st = state.clone();
    let (index, report) = tokio::task::spawn_blocking(move || {
        let mut session = lock_session(&st)?;
        let report = session.submit(new).map_err(submit_error)?;
        Ok::<_, ApiError>((session.table().len() - 1, report))
    })
    .await
    .map_err(join_error)??;

    Ok((StatusCode::CREATED, Json(report_view(index, &report))))
}

/// POST /reports/{index}/status — the Reported→Removed workflow.
pub async fn update_report_status(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let after_photo = req.after_photo.as_ref().map(decode_upload).transpose()?;

    let st = state.clone();
    let report = tokio::task::spawn_blocking(move || {
        let mut session = lock_session(&st)?;
        session
            .update_status(index, req.status, &req.remover, after_photo)
            .map_err(update_error)?;
        // update_status validated the index
        session
            .table()
            .get(index)
            .cloned()
            .ok_or_else(|| api_error(StatusCode::INTERNAL_SERVER_ERROR, "internal error"))
    })
    .await
    .map_err(join_error)??;

    Ok(Json(report_view(index, &report)))
}

/// GET /reports — full history in table order.
pub async fn list_reports(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let session = lock_session(&state)?;
    let views: Vec<ReportView> = session
        .table()
        .reports()
        .iter()
        .enumerate()
        .map(|(i, r)| report_view(i, r))
        .collect();
    Ok(Json(views))
}

/// GET /reports/active — Reported rows only, with their picker labels.
pub async fn active_reports(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let session = lock_session(&state)?;
    let active: Vec<ActiveReport> = session
        .table()
        .reports()
        .iter()
        .enumerate()
        .filter(|(_, r)| r.status == ReportStatus::Reported)
        .map(|(index, r)| ActiveReport {
            index,
            label: selection_label(index, r),
        })
        .collect();
    Ok(Json(active))
}

/// GET /reports/markers — marker definitions for the map widget.
pub async fn report_markers(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let session = lock_session(&state)?;
    let markers: Vec<Marker> = session.table().reports().iter().map(marker_for).collect();
    Ok(Json(markers))
}

/// GET /reports/stats — status breakdown for the chart, largest first.
pub async fn report_stats(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let session = lock_session(&state)?;
    let reports = session.table().reports();
    let reported = reports
        .iter()
        .filter(|r| r.status == ReportStatus::Reported)
        .count();
    let removed = reports.len() - reported;

    let mut counts: Vec<StatusCount> = [
        (ReportStatus::Reported, reported),
        (ReportStatus::Removed, removed),
    ]
    .into_iter()
    .filter(|(_, count)| *count > 0)
    .map(|(status, count)| StatusCount { status, count })
    .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    Ok(Json(counts))
}

/// GET /reports/{index}/photo/{kind} — decoded photo bytes, kind = before|after.
pub async fn report_photo(
    State(state): State<AppState>,
    Path((index, kind)): Path<(usize, String)>,
) -> Result<impl IntoResponse, ApiError> {
    let encoded = {
        let session = lock_session(&state)?;
        let report = session
            .table()
            .get(index)
            .ok_or_else(|| api_error(StatusCode::NOT_FOUND, format!("no report at row {index}")))?;
        match kind.as_str() {
            "before" => report.before_image.clone(),
            "after" => report.after_image.clone(),
            _ => {
                return Err(api_error(
                    StatusCode::NOT_FOUND,
                    format!("unknown photo kind '{kind}'"),
                ));
            }
        }
    };

    if encoded.is_empty() {
        return Err(api_error(StatusCode::NOT_FOUND, "no photo stored"));
    }

    let bytes = photo::decode_image(&encoded).map_err(|e| {
        error!("corrupt photo cell on row {index}: {e}");
        api_error(StatusCode::INTERNAL_SERVER_ERROR, "corrupt photo data")
    })?;
    let content_type = photo::sniff_content_type(&bytes);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

/// POST /clicks — classify a map click against the session table.
pub async fn classify_click(
    State(state): State<AppState>,
    Json(click): Json<MapClick>,
) -> Result<impl IntoResponse, ApiError> {
    let session = lock_session(&state)?;
    let response = match matcher::classify_click(session.table(), click.lat, click.lng) {
        ClickTarget::Existing(index) => ClickResponse::Existing { index },
        ClickTarget::NewLocation { lat, lng } => ClickResponse::NewLocation {
            lat,
            lng,
            location: matcher::format_location(lat, lng),
        },
    };
    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(status: ReportStatus) -> Report {
        Report {
            reporter: "Sam".into(),
            location: "38.99070, -77.02610".into(),
            location_desc: "Wall".into(),
            notes: String::new(),
            status,
            lat: 38.9907,
            lng: -77.0261,
            remover: String::new(),
            before_image: String::new(),
            after_image: String::new(),
        }
    }

    #[test]
    fn selection_label_format() {
        assert_eq!(
            selection_label(3, &sample(ReportStatus::Reported)),
            "#3 | Wall (38.99070, -77.02610)"
        );
    }

    #[test]
    fn marker_color_tracks_status() {
        assert_eq!(marker_for(&sample(ReportStatus::Reported)).color, "red");
        assert_eq!(marker_for(&sample(ReportStatus::Removed)).color, "green");
        assert_eq!(
            marker_for(&sample(ReportStatus::Removed)).tooltip,
            "Wall (Removed) by Sam"
        );
    }
}
