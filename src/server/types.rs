//! API request and response types

use crate::domain::model::ParsedData;
use serde::{Deserialize, Serialize};

pub const MISSING_FILE: &str = "PDF file is required";
pub const MISSING_PASSWORD: &str = "Password is required";

/// JSON envelope returned by `POST /parse`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<ParsedData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: ParsedData) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Fields collected from the multipart upload.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub document: Option<Vec<u8>>,
    pub password: Option<String>,
}
