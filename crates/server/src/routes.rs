//! Request handlers.
//!
//! Every failure ends in a redirect carrying a message for the person using
//! the form; nothing here returns an error status for bad input.

use crate::store::ResultStore;
use apptmerge_core::{process_uploads, MergeError, Upload, UploadKind, XLSX_MIME};
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Path, Query, State};
use axum::http::header;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Shared handler state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ResultStore,
}

/// Health check response.
#[derive(Serialize, Deserialize)]
pub struct Health {
    /// Server status ("ok" when healthy).
    pub status: String,
    /// Server version from Cargo.toml.
    pub version: String,
}

/// Health check endpoint handler.
pub async fn health() -> Json<Health> {
    Json(Health {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Query string accepted by the form page.
#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    pub message: Option<String>,
}

/// Redirect to `to` with a message in the query string.
pub fn redirect_with_message(to: &str, message: &str) -> Redirect {
    Redirect::to(&format!("{to}?message={}", urlencoding::encode(message)))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Upload form.
pub async fn index(Query(query): Query<FormQuery>) -> Html<String> {
    let notice = query
        .message
        .map(|m| format!("<p class=\"notice\">{}</p>\n", escape_html(&m)))
        .unwrap_or_default();

    Html(format!(
        "<!doctype html>\n<title>apptmerge</title>\n{notice}\
         <form action=\"/upload\" method=\"post\" enctype=\"multipart/form-data\">\n\
         <label>Appointments <input type=\"file\" name=\"{}\" accept=\".xlsx,.xls\"></label>\n\
         <label>Remarks <input type=\"file\" name=\"{}\" accept=\".xlsx,.xls\"></label>\n\
         <button type=\"submit\">Merge</button>\n</form>\n",
        UploadKind::Appointments.field_name(),
        UploadKind::Remarks.field_name(),
    ))
}

async fn read_uploads(mut multipart: Multipart) -> Result<(Upload, Upload), String> {
    let mut appointments = Upload::missing(UploadKind::Appointments);
    let mut remarks = Upload::missing(UploadKind::Remarks);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| format!("Error reading upload: {e}"))?
    {
        let target = match field.name() {
            Some(name) if name == UploadKind::Appointments.field_name() => &mut appointments,
            Some(name) if name == UploadKind::Remarks.field_name() => &mut remarks,
            _ => continue,
        };

        let filename = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| format!("Error reading upload: {e}"))?;

        target.filename = filename;
        target.bytes = bytes.to_vec();
    }

    Ok((appointments, remarks))
}

/// Accept both spreadsheets, merge them and publish the result.
///
/// The result is only stored when both stages succeed. A body that is not
/// multipart form data carries no files, so it reads as a missing upload.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Redirect {
    let multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "upload body is not multipart form data");
            let err = MergeError::MissingUpload {
                kind: UploadKind::Appointments,
            };
            return redirect_with_message("/", &err.user_message());
        }
    };

    let (appointments, remarks) = match read_uploads(multipart).await {
        Ok(uploads) => uploads,
        Err(message) => {
            tracing::warn!(%message, "multipart upload rejected");
            return redirect_with_message("/", &message);
        }
    };

    let outcome =
        tokio::task::spawn_blocking(move || process_uploads(&appointments, &remarks)).await;

    let report = match outcome {
        Ok(Ok(report)) => report,
        Ok(Err(err)) => {
            log_rejection(&err);
            return redirect_with_message("/", &err.user_message());
        }
        Err(join_err) => {
            tracing::error!(error = %join_err, "upload processing task failed");
            return redirect_with_message("/", "Error processing upload. Please try again.");
        }
    };

    let total_rows = report.total_rows();
    let matched = report.matched_appointments;
    let token = state.store.insert(report).await;
    tracing::info!(%token, total_rows, matched, "stored merged result");

    Redirect::to(&format!("/results/{token}"))
}

fn log_rejection(err: &MergeError) {
    match err {
        MergeError::MissingUpload { .. } | MergeError::InvalidFileType { .. } => {
            tracing::info!(error = %err, "upload rejected");
        }
        _ => tracing::warn!(error = %err, "upload processing failed"),
    }
}

/// Merged rows for display.
pub async fn results(State(state): State<AppState>, Path(token): Path<Uuid>) -> Response {
    match state.store.get(&token).await {
        Some(report) => Json(report.view()).into_response(),
        None => redirect_with_message("/", "No data found. Please upload Excel files first.")
            .into_response(),
    }
}

/// Merged rows as an `.xlsx` attachment.
pub async fn download(State(state): State<AppState>, Path(token): Path<Uuid>) -> Response {
    let Some(report) = state.store.get(&token).await else {
        return redirect_with_message("/", "No data to download. Please upload Excel files first.")
            .into_response();
    };

    match report.to_xlsx() {
        Ok(bytes) => {
            let disposition = format!("attachment; filename=\"{}\"", report.download_name());
            (
                [
                    (header::CONTENT_TYPE, XLSX_MIME.to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            tracing::error!(%token, error = %err, "export failed");
            redirect_with_message(&format!("/results/{token}"), &err.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html("<b>'Pat' & \"ID\"</b>"),
            "&lt;b&gt;&#39;Pat&#39; &amp; &quot;ID&quot;&lt;/b&gt;"
        );
    }

    #[tokio::test]
    async fn test_index_shows_notice() {
        let Html(page) = index(Query(FormQuery {
            message: Some("Please upload the <Remarks> Excel file.".into()),
        }))
        .await;

        assert!(page.contains("Please upload the &lt;Remarks&gt; Excel file."));
        assert!(page.contains("name=\"appointments_file\""));
        assert!(page.contains("name=\"remarks_file\""));
    }

    #[tokio::test]
    async fn test_index_without_notice() {
        let Html(page) = index(Query(FormQuery::default())).await;
        assert!(!page.contains("class=\"notice\""));
    }
}
