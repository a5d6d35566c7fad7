use crate::error::{ApiError, Fout};
use crate::headers::{head, json_body, listing, path_uuid, Reply};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use zrc_core::wire::{ResultaatBody, ResultaatInput};

#[utoipa::path(
    get,
    path = "/resultaten",
    params(
        ("zaak" = Option<String>, Query, description = "Case URL"),
        ("resultaattype" = Option<String>, Query, description = "Result-type URL"),
    ),
    responses(
        (status = 200, description = "Results of visible cases", body = [ResultaatBody]),
        (status = 400, description = "Invalid query parameter", body = Fout),
        (status = 403, description = "Forbidden", body = Fout)
    ),
    tag = "resultaten"
)]
#[axum::debug_handler]
pub async fn list_resultaten(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let resultaten = state.registry.list_resultaten(&auth, params).await?;
    Ok(listing(resultaten, false))
}

#[utoipa::path(
    post,
    path = "/resultaten",
    request_body = ResultaatInput,
    responses(
        (status = 201, description = "Result registered", body = ResultaatBody),
        (status = 400, description = "Validation error, or the case already has a result", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 502, description = "Catalogue unavailable", body = Fout)
    ),
    tag = "resultaten"
)]
/// Register the result of a case
///
/// The result-type's retention metadata is copied onto the case; a closed case gets its
/// archival date right away.
#[axum::debug_handler]
pub async fn create_resultaat(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let resultaat = state
        .registry
        .create_resultaat(&auth, json_body(&body)?)
        .await?;
    Ok(Reply::created().send(&headers, resultaat))
}

#[utoipa::path(
    get,
    path = "/resultaten/{uuid}",
    params(("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses(
        (status = 200, description = "The result", body = ResultaatBody),
        (status = 304, description = "Cached copy is current"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "resultaten"
)]
#[axum::debug_handler]
pub async fn retrieve_resultaat(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let resultaat = state
        .registry
        .retrieve_resultaat(&auth, path_uuid(&uuid)?)
        .await?;
    Ok(Reply::ok().send(&headers, resultaat))
}

#[utoipa::path(
    head,
    path = "/resultaten/{uuid}",
    params(("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses((status = 200, description = "Headers only"), (status = 304, description = "Cached copy is current")),
    tag = "resultaten"
)]
pub async fn head_resultaat(
    state: State<AppState>,
    uuid: AxumPath<String>,
    headers: HeaderMap,
) -> Response {
    head(retrieve_resultaat(state, uuid, headers).await.into_response())
}

#[utoipa::path(
    put,
    path = "/resultaten/{uuid}",
    request_body = ResultaatInput,
    params(("uuid" = String, Path,)),
    responses(
        (status = 200, description = "Result replaced", body = ResultaatBody),
        (status = 400, description = "Validation error", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "resultaten"
)]
#[axum::debug_handler]
pub async fn update_resultaat(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let resultaat = state
        .registry
        .update_resultaat(&auth, path_uuid(&uuid)?, json_body(&body)?)
        .await?;
    Ok(Reply::updated().send(&headers, resultaat))
}

#[utoipa::path(
    patch,
    path = "/resultaten/{uuid}",
    request_body = ResultaatInput,
    params(("uuid" = String, Path,)),
    responses(
        (status = 200, description = "Result updated", body = ResultaatBody),
        (status = 400, description = "Validation error", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "resultaten"
)]
#[axum::debug_handler]
pub async fn partial_update_resultaat(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let resultaat = state
        .registry
        .partial_update_resultaat(&auth, path_uuid(&uuid)?, json_body(&body)?)
        .await?;
    Ok(Reply::updated().send(&headers, resultaat))
}

#[utoipa::path(
    delete,
    path = "/resultaten/{uuid}",
    params(("uuid" = String, Path,)),
    responses(
        (status = 204, description = "Result deleted"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "resultaten"
)]
#[axum::debug_handler]
pub async fn delete_resultaat(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let auth = state.authenticate(&headers)?;
    state
        .registry
        .delete_resultaat(&auth, path_uuid(&uuid)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
