//! Request and response header handling shared by the handlers.

use crate::error::{ApiError, CrsError};
use axum::body::Bytes;
use axum::http::header::{AUTHORIZATION, ETAG, IF_NONE_MATCH, LOCATION};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::Value;
use zrc_core::constants::NON_FIELD_ERRORS;
use zrc_core::etag;
use zrc_core::wire::Versioned;
use zrc_core::ZrcError;
use zrc_uuid::ResourceUuid;

pub const ACCEPT_CRS: HeaderName = HeaderName::from_static("accept-crs");
pub const CONTENT_CRS: HeaderName = HeaderName::from_static("content-crs");

/// The only coordinate reference system geometry is served in.
pub const EPSG_4326: &str = "EPSG:4326";

/// Checks the CRS headers of a request touching a geometry-bearing resource.
///
/// `Accept-Crs` is always required. A `Content-Crs`, when sent with a body, must name the
/// supported system as well.
pub fn negotiate_crs(headers: &HeaderMap) -> Result<(), CrsError> {
    let accept = headers
        .get(ACCEPT_CRS)
        .ok_or(CrsError::MissingAcceptCrs)?
        .to_str()
        .map_err(|_| CrsError::UnsupportedAcceptCrs)?;
    if accept.trim() != EPSG_4326 {
        return Err(CrsError::UnsupportedAcceptCrs);
    }

    if let Some(content) = headers.get(CONTENT_CRS) {
        if content.to_str().ok().map(str::trim) != Some(EPSG_4326) {
            return Err(CrsError::UnsupportedContentCrs);
        }
    }
    Ok(())
}

pub fn authorization(headers: &HeaderMap) -> Option<&str> {
    headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok())
}

/// A path segment that is not a UUID cannot name a resource.
pub fn path_uuid(segment: &str) -> Result<ResourceUuid, ApiError> {
    ResourceUuid::parse(segment).map_err(|_| ApiError::Zrc(ZrcError::NotFound))
}

pub fn json_body(body: &Bytes) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        ApiError::Zrc(ZrcError::field(
            NON_FIELD_ERRORS,
            "parse_error",
            format!("Ongeldige JSON: {e}"),
        ))
    })
}

/// How a single-resource representation should be written out.
pub struct Reply {
    status: StatusCode,
    conditional: bool,
    location: bool,
    crs: bool,
}

impl Reply {
    /// A read, honouring `If-None-Match`.
    pub fn ok() -> Self {
        Self {
            status: StatusCode::OK,
            conditional: true,
            location: false,
            crs: false,
        }
    }

    pub fn updated() -> Self {
        Self {
            conditional: false,
            ..Self::ok()
        }
    }

    pub fn created() -> Self {
        Self {
            status: StatusCode::CREATED,
            conditional: false,
            location: true,
            crs: false,
        }
    }

    /// Adds `Content-Crs` for representations that carry geometry.
    pub fn with_crs(mut self) -> Self {
        self.crs = true;
        self
    }

    /// Writes a representation with its entity tag, answering 304 when the caller's
    /// `If-None-Match` already names the current tag.
    pub fn send<T: Serialize + HasUrl>(
        self,
        request: &HeaderMap,
        versioned: Versioned<T>,
    ) -> Response {
        let not_modified = self.conditional
            && request
                .get(IF_NONE_MATCH)
                .and_then(|v| v.to_str().ok())
                .is_some_and(|v| etag::if_none_match(v, &versioned.etag));

        let mut response = if not_modified {
            StatusCode::NOT_MODIFIED.into_response()
        } else {
            (self.status, Json(&versioned.body)).into_response()
        };

        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&etag::quoted(&versioned.etag)) {
            headers.insert(ETAG, value);
        }
        if self.location {
            if let Ok(value) = HeaderValue::from_str(versioned.body.url()) {
                headers.insert(LOCATION, value);
            }
        }
        if self.crs {
            headers.insert(CONTENT_CRS, HeaderValue::from_static(EPSG_4326));
        }
        response
    }
}

/// Serializable list or page, optionally marked with `Content-Crs`.
pub fn listing<T: Serialize>(body: T, crs: bool) -> Response {
    let mut response = Json(body).into_response();
    if crs {
        response
            .headers_mut()
            .insert(CONTENT_CRS, HeaderValue::from_static(EPSG_4326));
    }
    response
}

/// Drops the body of a GET response so HEAD returns identical headers.
pub fn head(response: Response) -> Response {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, axum::body::Body::empty())
}

/// Representations that know their own URL, used for `Location`.
pub trait HasUrl {
    fn url(&self) -> &str;
}

macro_rules! impl_has_url {
    ($($body:ty),* $(,)?) => {
        $(impl HasUrl for $body {
            fn url(&self) -> &str {
                &self.url
            }
        })*
    };
}

impl_has_url!(
    zrc_core::wire::ZaakBody,
    zrc_core::wire::StatusBody,
    zrc_core::wire::ResultaatBody,
    zrc_core::wire::RolBody,
    zrc_core::wire::ZaakEigenschapBody,
    zrc_core::wire::ZaakBesluitBody,
    zrc_core::wire::ZaakInformatieObjectBody,
    zrc_core::wire::ZaakContactMomentBody,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_negotiate_crs() {
        assert_eq!(
            negotiate_crs(&HeaderMap::new()),
            Err(CrsError::MissingAcceptCrs)
        );
        assert_eq!(
            negotiate_crs(&headers(&[(ACCEPT_CRS, "dummy")])),
            Err(CrsError::UnsupportedAcceptCrs)
        );
        assert_eq!(
            negotiate_crs(&headers(&[(ACCEPT_CRS, EPSG_4326), (CONTENT_CRS, "EPSG:28992")])),
            Err(CrsError::UnsupportedContentCrs)
        );
        assert!(negotiate_crs(&headers(&[(ACCEPT_CRS, EPSG_4326)])).is_ok());
    }

    #[test]
    fn test_path_uuid_rejects_garbage_as_not_found() {
        assert!(matches!(
            path_uuid("not-a-uuid"),
            Err(ApiError::Zrc(ZrcError::NotFound))
        ));
    }
}
