use crate::error::{ApiError, Fout};
use crate::headers::{head, json_body, listing, path_uuid, Reply};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use zrc_core::wire::{StatusBody, StatusInput};

#[utoipa::path(
    get,
    path = "/statussen",
    params(
        ("zaak" = Option<String>, Query, description = "Case URL"),
        ("statustype" = Option<String>, Query, description = "Status-type URL"),
    ),
    responses(
        (status = 200, description = "Statuses of visible cases", body = [StatusBody]),
        (status = 400, description = "Invalid query parameter", body = Fout),
        (status = 403, description = "Forbidden", body = Fout)
    ),
    tag = "statussen"
)]
#[axum::debug_handler]
pub async fn list_statussen(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let statussen = state.registry.list_statussen(&auth, params).await?;
    Ok(listing(statussen, false))
}

#[utoipa::path(
    post,
    path = "/statussen",
    request_body = StatusInput,
    responses(
        (status = 201, description = "Status set", body = StatusBody),
        (status = 400, description = "Validation error", body = Fout),
        (status = 403, description = "Missing scope, or the case is closed and may not be reopened", body = Fout),
        (status = 502, description = "Catalogue unavailable", body = Fout)
    ),
    tag = "statussen"
)]
/// Set a new status on a case
///
/// A terminal status-type closes the case: `einddatum` becomes the date of
/// `datumStatusGezet` and the archival date is derived. A non-terminal status on a closed
/// case reopens it and needs the `zaken.heropenen` scope.
#[axum::debug_handler]
pub async fn create_status(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let status = state.registry.create_status(&auth, json_body(&body)?).await?;
    Ok(Reply::created().send(&headers, status))
}

#[utoipa::path(
    get,
    path = "/statussen/{uuid}",
    params(
        ("uuid" = String, Path,),
        ("If-None-Match" = Option<String>, Header,),
    ),
    responses(
        (status = 200, description = "The status", body = StatusBody),
        (status = 304, description = "Cached copy is current"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "statussen"
)]
#[axum::debug_handler]
pub async fn retrieve_status(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let status = state.registry.retrieve_status(&auth, path_uuid(&uuid)?).await?;
    Ok(Reply::ok().send(&headers, status))
}

#[utoipa::path(
    head,
    path = "/statussen/{uuid}",
    params(("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses((status = 200, description = "Headers only"), (status = 304, description = "Cached copy is current")),
    tag = "statussen"
)]
pub async fn head_status(
    state: State<AppState>,
    uuid: AxumPath<String>,
    headers: HeaderMap,
) -> Response {
    head(retrieve_status(state, uuid, headers).await.into_response())
}
