use crate::error::{ApiError, Fout};
use crate::headers::{head, json_body, listing, path_uuid, Reply};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use zrc_core::wire::{RolBody, RolInput};

#[utoipa::path(
    get,
    path = "/rollen",
    params(
        ("zaak" = Option<String>, Query,),
        ("betrokkene" = Option<String>, Query,),
        ("betrokkeneType" = Option<String>, Query,),
        ("omschrijvingGeneriek" = Option<String>, Query,),
        ("betrokkeneIdentificatie__natuurlijkPersoon__inpBsn" = Option<String>, Query,),
        ("betrokkeneIdentificatie__medewerker__identificatie" = Option<String>, Query,),
        ("betrokkeneIdentificatie__organisatorischeEenheid__identificatie" = Option<String>, Query,),
        ("betrokkeneIdentificatie__vestiging__vestigingsNummer" = Option<String>, Query,),
        ("betrokkeneIdentificatie__nietNatuurlijkPersoon__innNnpId" = Option<String>, Query,),
    ),
    responses(
        (status = 200, description = "Roles on visible cases", body = [RolBody]),
        (status = 400, description = "Invalid query parameter", body = Fout),
        (status = 403, description = "Forbidden", body = Fout)
    ),
    tag = "rollen"
)]
#[axum::debug_handler]
pub async fn list_rollen(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let rollen = state.registry.list_rollen(&auth, params).await?;
    Ok(listing(rollen, false))
}

#[utoipa::path(
    post,
    path = "/rollen",
    request_body = RolInput,
    responses(
        (status = 201, description = "Role added", body = RolBody),
        (status = 400, description = "Validation error", body = Fout),
        (status = 403, description = "Forbidden", body = Fout)
    ),
    tag = "rollen"
)]
/// Add an involved party to a case
///
/// Either `betrokkene` or `betrokkeneIdentificatie` is required; the shape of the latter is
/// decided by `betrokkeneType`.
#[axum::debug_handler]
pub async fn create_rol(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let rol = state.registry.create_rol(&auth, json_body(&body)?).await?;
    Ok(Reply::created().send(&headers, rol))
}

#[utoipa::path(
    get,
    path = "/rollen/{uuid}",
    params(("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses(
        (status = 200, description = "The role", body = RolBody),
        (status = 304, description = "Cached copy is current"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "rollen"
)]
#[axum::debug_handler]
pub async fn retrieve_rol(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let rol = state.registry.retrieve_rol(&auth, path_uuid(&uuid)?).await?;
    Ok(Reply::ok().send(&headers, rol))
}

#[utoipa::path(
    head,
    path = "/rollen/{uuid}",
    params(("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses((status = 200, description = "Headers only"), (status = 304, description = "Cached copy is current")),
    tag = "rollen"
)]
pub async fn head_rol(
    state: State<AppState>,
    uuid: AxumPath<String>,
    headers: HeaderMap,
) -> Response {
    head(retrieve_rol(state, uuid, headers).await.into_response())
}

#[utoipa::path(
    delete,
    path = "/rollen/{uuid}",
    params(("uuid" = String, Path,)),
    responses(
        (status = 204, description = "Role removed"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "rollen"
)]
#[axum::debug_handler]
pub async fn delete_rol(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let auth = state.authenticate(&headers)?;
    state.registry.delete_rol(&auth, path_uuid(&uuid)?).await?;
    Ok(StatusCode::NO_CONTENT)
}
