//! HTTP request handlers for API endpoints

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

use crate::server::types::{ApiResponse, HealthResponse, UploadForm, MISSING_FILE, MISSING_PASSWORD};
use crate::server::AppState;
use crate::utils::error::CasError;

const FILE_FIELD: &str = "pdfFile";
const PASSWORD_FIELD: &str = "password";

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// Parse an uploaded CAS statement
///
/// Expects a multipart form with `pdfFile` and `password`. A body that is not
/// multipart at all is treated like a form without fields.
pub async fn parse_statement(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    info!("Received parse request {}", request_id);

    let form = match multipart {
        Ok(multipart) => match read_form(multipart).await {
            Ok(form) => form,
            Err(response) => return response,
        },
        Err(rejection) => {
            warn!("Request {} is not multipart: {}", request_id, rejection);
            UploadForm::default()
        }
    };

    let Some(document) = form.document else {
        info!("No PDF file received");
        return error_response(&CasError::validation(MISSING_FILE));
    };

    let password = match form.password {
        Some(password) if !password.is_empty() => password,
        _ => {
            info!("No password received");
            return error_response(&CasError::validation(MISSING_PASSWORD));
        }
    };

    info!("Processing PDF file: {} bytes", document.len());

    let span = tracing::info_span!("parse", %request_id);
    match state
        .parser
        .parse(&document, &password)
        .instrument(span)
        .await
    {
        Ok(data) => {
            info!("Successfully parsed request {}", request_id);
            (StatusCode::OK, Json(ApiResponse::ok(data))).into_response()
        }
        Err(e) => {
            error!(
                "Request {} failed: {} (Category: {:?}, Severity: {:?})",
                request_id,
                e,
                e.category(),
                e.severity()
            );
            error_response(&e)
        }
    }
}

async fn read_form(mut multipart: Multipart) -> Result<UploadForm, Response> {
    let mut form = UploadForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                let status = e.status();
                return Err((status, Json(ApiResponse::error(e.body_text()))).into_response());
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        let result = match name.as_str() {
            FILE_FIELD => field.bytes().await.map(|bytes| {
                form.document = Some(bytes.to_vec());
            }),
            PASSWORD_FIELD => field.text().await.map(|text| {
                form.password = Some(text);
            }),
            // 其他欄位一律忽略
            _ => continue,
        };

        if let Err(e) = result {
            warn!("Failed to read field {}: {}", name, e);
            let status = e.status();
            return Err((status, Json(ApiResponse::error(e.body_text()))).into_response());
        }
    }

    Ok(form)
}

/// Map a crate error onto the JSON error envelope
pub fn error_response(err: &CasError) -> Response {
    if err.is_client_error() {
        return (StatusCode::BAD_REQUEST, Json(ApiResponse::error(err.to_string()))).into_response();
    }

    let body = ApiResponse::error(err.to_string()).with_details(format!("{:?}", err));
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}
