use crate::error::{ApiError, Fout};
use crate::headers::{head, json_body, listing, negotiate_crs, path_uuid, Reply};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use zrc_core::wire::{ZaakBody, ZaakInput, ZaakPage};

#[utoipa::path(
    get,
    path = "/zaken",
    params(
        ("Accept-Crs" = String, Header, description = "Must be EPSG:4326"),
        ("identificatie" = Option<String>, Query,),
        ("bronorganisatie" = Option<String>, Query,),
        ("zaaktype" = Option<String>, Query,),
        ("archiefnominatie" = Option<String>, Query,),
        ("archiefstatus" = Option<String>, Query,),
        ("archiefactiedatum__lt" = Option<String>, Query,),
        ("archiefactiedatum__gt" = Option<String>, Query,),
        ("startdatum" = Option<String>, Query,),
        ("ordering" = Option<String>, Query, description = "startdatum, einddatum, publicatiedatum or archiefactiedatum, optionally prefixed with -"),
        ("page" = Option<u32>, Query,),
    ),
    responses(
        (status = 200, description = "One page of visible cases", body = ZaakPage),
        (status = 400, description = "Invalid query parameter", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Page out of range", body = Fout),
        (status = 406, description = "Unsupported Accept-Crs", body = Fout),
        (status = 412, description = "Accept-Crs missing", body = Fout)
    ),
    tag = "zaken"
)]
/// List the cases visible to the caller
///
/// Cases outside the caller's (zaaktype, confidentiality) authorizations are left out of the
/// page rather than reported.
#[axum::debug_handler]
pub async fn list_zaken(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    negotiate_crs(&headers)?;
    let page = state.registry.list_zaken(&auth, params).await?;
    Ok(listing(page, true))
}

#[utoipa::path(
    post,
    path = "/zaken",
    request_body = ZaakInput,
    params(
        ("Accept-Crs" = String, Header, description = "Must be EPSG:4326"),
        ("Content-Crs" = Option<String>, Header, description = "Must be EPSG:4326 when present"),
    ),
    responses(
        (status = 201, description = "Case created", body = ZaakBody),
        (status = 400, description = "Validation error", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 415, description = "Unsupported Content-Crs", body = Fout),
        (status = 502, description = "Catalogue unavailable", body = Fout)
    ),
    tag = "zaken"
)]
/// Register a new case
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - a required field is missing or invalid,
/// - the zaaktype cannot be fetched from the catalogue,
/// - the hoofdzaak does not allow this zaaktype as deelzaak.
#[axum::debug_handler]
pub async fn create_zaak(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    negotiate_crs(&headers)?;
    let zaak = state.registry.create_zaak(&auth, json_body(&body)?).await?;
    Ok(Reply::created().with_crs().send(&headers, zaak))
}

#[utoipa::path(
    get,
    path = "/zaken/{uuid}",
    params(
        ("uuid" = String, Path, description = "Case UUID"),
        ("Accept-Crs" = String, Header, description = "Must be EPSG:4326"),
        ("If-None-Match" = Option<String>, Header, description = "Entity tag of a cached copy"),
    ),
    responses(
        (status = 200, description = "The case", body = ZaakBody),
        (status = 304, description = "Cached copy is current"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout),
        (status = 406, description = "Unsupported Accept-Crs", body = Fout),
        (status = 412, description = "Accept-Crs missing", body = Fout)
    ),
    tag = "zaken"
)]
/// Retrieve a single case
///
/// The response carries an `ETag`; sending it back in `If-None-Match` yields
/// `304 Not Modified` for as long as the case representation is unchanged.
#[axum::debug_handler]
pub async fn retrieve_zaak(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    negotiate_crs(&headers)?;
    let zaak = state.registry.retrieve_zaak(&auth, path_uuid(&uuid)?).await?;
    Ok(Reply::ok().with_crs().send(&headers, zaak))
}

#[utoipa::path(
    head,
    path = "/zaken/{uuid}",
    params(
        ("uuid" = String, Path, description = "Case UUID"),
        ("Accept-Crs" = String, Header, description = "Must be EPSG:4326"),
        ("If-None-Match" = Option<String>, Header,),
    ),
    responses(
        (status = 200, description = "Headers of the case, no body"),
        (status = 304, description = "Cached copy is current")
    ),
    tag = "zaken"
)]
/// Headers of [`retrieve_zaak`] without the body
pub async fn head_zaak(
    state: State<AppState>,
    uuid: AxumPath<String>,
    headers: HeaderMap,
) -> Response {
    head(retrieve_zaak(state, uuid, headers).await.into_response())
}

#[utoipa::path(
    put,
    path = "/zaken/{uuid}",
    request_body = ZaakInput,
    params(
        ("uuid" = String, Path, description = "Case UUID"),
        ("Accept-Crs" = String, Header, description = "Must be EPSG:4326"),
    ),
    responses(
        (status = 200, description = "Case replaced", body = ZaakBody),
        (status = 400, description = "Validation error", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaken"
)]
#[axum::debug_handler]
pub async fn update_zaak(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    negotiate_crs(&headers)?;
    let zaak = state
        .registry
        .update_zaak(&auth, path_uuid(&uuid)?, json_body(&body)?)
        .await?;
    Ok(Reply::updated().with_crs().send(&headers, zaak))
}

#[utoipa::path(
    patch,
    path = "/zaken/{uuid}",
    request_body = ZaakInput,
    params(
        ("uuid" = String, Path, description = "Case UUID"),
        ("Accept-Crs" = String, Header, description = "Must be EPSG:4326"),
    ),
    responses(
        (status = 200, description = "Case updated", body = ZaakBody),
        (status = 400, description = "Validation error", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaken"
)]
#[axum::debug_handler]
pub async fn partial_update_zaak(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    negotiate_crs(&headers)?;
    let zaak = state
        .registry
        .partial_update_zaak(&auth, path_uuid(&uuid)?, json_body(&body)?)
        .await?;
    Ok(Reply::updated().with_crs().send(&headers, zaak))
}

#[utoipa::path(
    delete,
    path = "/zaken/{uuid}",
    params(("uuid" = String, Path, description = "Case UUID")),
    responses(
        (status = 204, description = "Case and everything under it deleted"),
        (status = 400, description = "A decision is linked to the case or a sub-case", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaken"
)]
/// Delete a case
///
/// Cascades to statuses, result, roles, properties, links and sub-cases.
#[axum::debug_handler]
pub async fn delete_zaak(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let auth = state.authenticate(&headers)?;
    state.registry.delete_zaak(&auth, path_uuid(&uuid)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
