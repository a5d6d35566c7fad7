//! Error responses.
//!
//! Every failure is rendered as a ZGW "Fout" body. Validation problems become a
//! `ValidatieFout` listing the rejected parameters under their wire names.

use api_shared::AuthError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use utoipa::ToSchema;
use zrc_core::constants::NON_FIELD_ERRORS;
use zrc_core::{FieldError, ZrcError};

/// Coordinate reference system negotiation failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CrsError {
    #[error("Accept-Crs header ontbreekt")]
    MissingAcceptCrs,
    #[error("CRS van Accept-Crs wordt niet ondersteund")]
    UnsupportedAcceptCrs,
    #[error("CRS van Content-Crs wordt niet ondersteund")]
    UnsupportedContentCrs,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Zrc(#[from] ZrcError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Crs(#[from] CrsError),
}

/// The ZGW error body.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Fout {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub instance: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub invalid_params: Vec<FieldError>,
}

impl Fout {
    fn new(status: StatusCode, code: &str, title: &str, detail: impl Into<String>) -> Self {
        Self {
            kind: format!("/ref/fouten/{}/", class_name(status)),
            code: code.to_owned(),
            title: title.to_owned(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: format!("urn:uuid:{}", uuid::Uuid::new_v4()),
            invalid_params: Vec::new(),
        }
    }

    fn validation(invalid_params: Vec<FieldError>) -> Self {
        let detail = invalid_params
            .first()
            .map(|p| p.reason.clone())
            .unwrap_or_default();
        Self {
            invalid_params,
            ..Self::new(StatusCode::BAD_REQUEST, "invalid", "Invalid input.", detail)
        }
    }
}

fn class_name(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "ValidatieFout",
        StatusCode::FORBIDDEN => "PermissionDenied",
        StatusCode::NOT_FOUND => "NotFound",
        StatusCode::NOT_ACCEPTABLE => "NotAcceptable",
        StatusCode::PRECONDITION_FAILED => "PreconditionFailed",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UnsupportedMediaType",
        StatusCode::CONFLICT => "Conflict",
        StatusCode::BAD_GATEWAY => "UpstreamError",
        _ => "APIException",
    }
}

const FORBIDDEN_DETAIL: &str = "U heeft geen toestemming om deze actie uit te voeren.";

impl ApiError {
    fn fout(&self) -> Fout {
        match self {
            ApiError::Zrc(ZrcError::Validation(params)) => Fout::validation(params.clone()),
            ApiError::Zrc(ZrcError::BusinessRule { code, reason }) => {
                Fout::validation(vec![FieldError::new(NON_FIELD_ERRORS, code, reason)])
            }
            ApiError::Zrc(ZrcError::Forbidden(_)) | ApiError::Auth(_) => Fout::new(
                StatusCode::FORBIDDEN,
                "permission_denied",
                "You do not have permission to perform this action.",
                FORBIDDEN_DETAIL,
            ),
            ApiError::Zrc(ZrcError::NotFound) => Fout::new(
                StatusCode::NOT_FOUND,
                "not_found",
                "Not found.",
                "Niet gevonden.",
            ),
            ApiError::Zrc(ZrcError::Upstream(err)) => Fout::new(
                StatusCode::BAD_GATEWAY,
                "upstream-error",
                "Upstream registry unavailable.",
                err.to_string(),
            ),
            ApiError::Zrc(ZrcError::Configuration(_)) => Fout::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "error",
                "A server error occurred.",
                "Er is een interne fout opgetreden.",
            ),
            ApiError::Zrc(ZrcError::Conflict) => Fout::new(
                StatusCode::CONFLICT,
                "conflict",
                "Concurrent modification.",
                "De gegevens zijn tijdens het verwerken gewijzigd, probeer het opnieuw.",
            ),
            ApiError::Crs(err) => {
                let status = match err {
                    CrsError::MissingAcceptCrs => StatusCode::PRECONDITION_FAILED,
                    CrsError::UnsupportedAcceptCrs => StatusCode::NOT_ACCEPTABLE,
                    CrsError::UnsupportedContentCrs => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                };
                Fout::new(status, "crs", "CRS negotiation failed.", err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Zrc(ZrcError::Forbidden(reason)) => {
                tracing::warn!(reason = %reason, "request forbidden")
            }
            ApiError::Auth(err) => tracing::warn!(error = %err, "authentication failed"),
            ApiError::Zrc(ZrcError::Upstream(err)) => {
                tracing::error!(error = %err, "registry lookup failed")
            }
            ApiError::Zrc(ZrcError::Configuration(msg)) => {
                tracing::error!(error = %msg, "configuration error")
            }
            _ => {}
        }

        let fout = self.fout();
        let status =
            StatusCode::from_u16(fout.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(fout)).into_response()
    }
}
