//! Audit endpoints.
//!
//! `POST /api/audit` takes a multipart upload with a `report` file field.
//! `POST /api/audit/text` takes already-extracted text as JSON.
//! Both answer with the `AuditOutcome`; a report whose text could not be
//! extracted still gets a 200 with `error` set.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Deserialize;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, REPORT_FIELD};
use crate::pipeline::audit::{audit_document, AuditOutcome};

#[derive(Debug, Deserialize)]
pub struct AuditTextRequest {
    pub report_text: String,
}

/// `POST /api/audit`: audit an uploaded PDF or text report.
pub async fn upload(
    State(ctx): State<ApiContext>,
    mut multipart: Multipart,
) -> Result<Json<AuditOutcome>, ApiError> {
    let mut report = None;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(REPORT_FIELD) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("unnamed").to_string();
        let bytes = field.bytes().await?;
        tracing::info!(file_name = %file_name, size = bytes.len(), "Report received");
        report = Some(bytes);
        break;
    }

    let bytes = report.ok_or_else(|| {
        ApiError::BadRequest(format!("Missing '{REPORT_FIELD}' file field"))
    })?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded report is empty".into()));
    }

    let outcome = tokio::task::spawn_blocking(move || {
        audit_document(ctx.extractor.as_ref(), &ctx.auditor, &bytes)
    })
    .await?;

    Ok(Json(outcome))
}

/// `POST /api/audit/text`: audit report text supplied directly.
pub async fn text(
    State(ctx): State<ApiContext>,
    payload: Result<Json<AuditTextRequest>, JsonRejection>,
) -> Result<Json<AuditOutcome>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(chars = request.report_text.len(), "Report text received");

    let outcome =
        tokio::task::spawn_blocking(move || ctx.auditor.invoke(&request.report_text)).await?;

    Ok(Json(outcome))
}
