// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::TaskdError;

impl IntoResponse for TaskdError {
    fn into_response(self) -> Response {
        let status = match &self {
            TaskdError::NotFound(_) => StatusCode::NOT_FOUND,
            TaskdError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            TaskdError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self, "request failed");
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
