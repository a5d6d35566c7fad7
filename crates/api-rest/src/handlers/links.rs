//! Handlers for the resources that link a case to something else: properties, decisions,
//! documents and contact moments.
//!
//! Properties and decisions are nested under `/zaken/{zaak_uuid}`; the other two live at the
//! top level and name their case in the body.

use crate::error::{ApiError, Fout};
use crate::headers::{head, json_body, listing, path_uuid, Reply};
use crate::AppState;
use axum::body::Bytes;
use axum::extract::{Path as AxumPath, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use zrc_core::wire::{
    ZaakBesluitBody, ZaakBesluitInput, ZaakContactMomentBody, ZaakContactMomentInput,
    ZaakEigenschapBody, ZaakEigenschapInput, ZaakInformatieObjectBody, ZaakInformatieObjectInput,
};

#[utoipa::path(
    get,
    path = "/zaken/{zaak_uuid}/zaakeigenschappen",
    params(("zaak_uuid" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Properties of the case", body = [ZaakEigenschapBody]),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Case not found", body = Fout)
    ),
    tag = "zaakeigenschappen"
)]
#[axum::debug_handler]
pub async fn list_zaakeigenschappen(
    State(state): State<AppState>,
    AxumPath(zaak_uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let eigenschappen = state
        .registry
        .list_zaakeigenschappen(&auth, path_uuid(&zaak_uuid)?)
        .await?;
    Ok(listing(eigenschappen, false))
}

#[utoipa::path(
    post,
    path = "/zaken/{zaak_uuid}/zaakeigenschappen",
    request_body = ZaakEigenschapInput,
    params(("zaak_uuid" = String, Path, description = "Case UUID")),
    responses(
        (status = 201, description = "Property recorded", body = ZaakEigenschapBody),
        (status = 400, description = "Validation error", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Case not found", body = Fout)
    ),
    tag = "zaakeigenschappen"
)]
/// Record a property value on a case
///
/// The property's name is copied from the catalogue; the property must belong to the case's
/// zaaktype.
#[axum::debug_handler]
pub async fn create_zaakeigenschap(
    State(state): State<AppState>,
    AxumPath(zaak_uuid): AxumPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let eigenschap = state
        .registry
        .create_zaakeigenschap(&auth, path_uuid(&zaak_uuid)?, json_body(&body)?)
        .await?;
    Ok(Reply::created().send(&headers, eigenschap))
}

#[utoipa::path(
    get,
    path = "/zaken/{zaak_uuid}/zaakeigenschappen/{uuid}",
    params(
        ("zaak_uuid" = String, Path,),
        ("uuid" = String, Path,),
        ("If-None-Match" = Option<String>, Header,),
    ),
    responses(
        (status = 200, description = "The property", body = ZaakEigenschapBody),
        (status = 304, description = "Cached copy is current"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaakeigenschappen"
)]
#[axum::debug_handler]
pub async fn retrieve_zaakeigenschap(
    State(state): State<AppState>,
    AxumPath((zaak_uuid, uuid)): AxumPath<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let eigenschap = state
        .registry
        .retrieve_zaakeigenschap(&auth, path_uuid(&zaak_uuid)?, path_uuid(&uuid)?)
        .await?;
    Ok(Reply::ok().send(&headers, eigenschap))
}

#[utoipa::path(
    head,
    path = "/zaken/{zaak_uuid}/zaakeigenschappen/{uuid}",
    params(("zaak_uuid" = String, Path,), ("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses((status = 200, description = "Headers only"), (status = 304, description = "Cached copy is current")),
    tag = "zaakeigenschappen"
)]
pub async fn head_zaakeigenschap(
    state: State<AppState>,
    path: AxumPath<(String, String)>,
    headers: HeaderMap,
) -> Response {
    head(retrieve_zaakeigenschap(state, path, headers).await.into_response())
}

#[utoipa::path(
    get,
    path = "/zaken/{zaak_uuid}/besluiten",
    params(("zaak_uuid" = String, Path, description = "Case UUID")),
    responses(
        (status = 200, description = "Decisions linked to the case", body = [ZaakBesluitBody]),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Case not found", body = Fout)
    ),
    tag = "besluiten"
)]
#[axum::debug_handler]
pub async fn list_zaakbesluiten(
    State(state): State<AppState>,
    AxumPath(zaak_uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let besluiten = state
        .registry
        .list_zaakbesluiten(&auth, path_uuid(&zaak_uuid)?)
        .await?;
    Ok(listing(besluiten, false))
}

#[utoipa::path(
    post,
    path = "/zaken/{zaak_uuid}/besluiten",
    request_body = ZaakBesluitInput,
    params(("zaak_uuid" = String, Path, description = "Case UUID")),
    responses(
        (status = 201, description = "Decision linked", body = ZaakBesluitBody),
        (status = 400, description = "Validation error or decision already linked", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Case not found", body = Fout)
    ),
    tag = "besluiten"
)]
/// Link a decision to a case
///
/// Linking may change the archival date when the zaaktype derives it from a decision.
#[axum::debug_handler]
pub async fn create_zaakbesluit(
    State(state): State<AppState>,
    AxumPath(zaak_uuid): AxumPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let besluit = state
        .registry
        .create_zaakbesluit(&auth, path_uuid(&zaak_uuid)?, json_body(&body)?)
        .await?;
    Ok(Reply::created().send(&headers, besluit))
}

#[utoipa::path(
    get,
    path = "/zaken/{zaak_uuid}/besluiten/{uuid}",
    params(
        ("zaak_uuid" = String, Path,),
        ("uuid" = String, Path,),
        ("If-None-Match" = Option<String>, Header,),
    ),
    responses(
        (status = 200, description = "The decision link", body = ZaakBesluitBody),
        (status = 304, description = "Cached copy is current"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "besluiten"
)]
#[axum::debug_handler]
pub async fn retrieve_zaakbesluit(
    State(state): State<AppState>,
    AxumPath((zaak_uuid, uuid)): AxumPath<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let besluit = state
        .registry
        .retrieve_zaakbesluit(&auth, path_uuid(&zaak_uuid)?, path_uuid(&uuid)?)
        .await?;
    Ok(Reply::ok().send(&headers, besluit))
}

#[utoipa::path(
    head,
    path = "/zaken/{zaak_uuid}/besluiten/{uuid}",
    params(("zaak_uuid" = String, Path,), ("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses((status = 200, description = "Headers only"), (status = 304, description = "Cached copy is current")),
    tag = "besluiten"
)]
pub async fn head_zaakbesluit(
    state: State<AppState>,
    path: AxumPath<(String, String)>,
    headers: HeaderMap,
) -> Response {
    head(retrieve_zaakbesluit(state, path, headers).await.into_response())
}

#[utoipa::path(
    delete,
    path = "/zaken/{zaak_uuid}/besluiten/{uuid}",
    params(("zaak_uuid" = String, Path,), ("uuid" = String, Path,)),
    responses(
        (status = 204, description = "Decision unlinked"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "besluiten"
)]
#[axum::debug_handler]
pub async fn delete_zaakbesluit(
    State(state): State<AppState>,
    AxumPath((zaak_uuid, uuid)): AxumPath<(String, String)>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let auth = state.authenticate(&headers)?;
    state
        .registry
        .delete_zaakbesluit(&auth, path_uuid(&zaak_uuid)?, path_uuid(&uuid)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/zaakinformatieobjecten",
    params(
        ("zaak" = Option<String>, Query, description = "Case URL"),
        ("informatieobject" = Option<String>, Query, description = "Document URL"),
    ),
    responses(
        (status = 200, description = "Document links of visible cases", body = [ZaakInformatieObjectBody]),
        (status = 400, description = "Invalid query parameter", body = Fout),
        (status = 403, description = "Forbidden", body = Fout)
    ),
    tag = "zaakinformatieobjecten"
)]
#[axum::debug_handler]
pub async fn list_zaakinformatieobjecten(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let links = state
        .registry
        .list_zaakinformatieobjecten(&auth, params)
        .await?;
    Ok(listing(links, false))
}

#[utoipa::path(
    post,
    path = "/zaakinformatieobjecten",
    request_body = ZaakInformatieObjectInput,
    responses(
        (status = 201, description = "Document linked", body = ZaakInformatieObjectBody),
        (status = 400, description = "Validation error or document already linked", body = Fout),
        (status = 403, description = "Forbidden", body = Fout)
    ),
    tag = "zaakinformatieobjecten"
)]
#[axum::debug_handler]
pub async fn create_zaakinformatieobject(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let link = state
        .registry
        .create_zaakinformatieobject(&auth, json_body(&body)?)
        .await?;
    Ok(Reply::created().send(&headers, link))
}

#[utoipa::path(
    get,
    path = "/zaakinformatieobjecten/{uuid}",
    params(("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses(
        (status = 200, description = "The document link", body = ZaakInformatieObjectBody),
        (status = 304, description = "Cached copy is current"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaakinformatieobjecten"
)]
#[axum::debug_handler]
pub async fn retrieve_zaakinformatieobject(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let link = state
        .registry
        .retrieve_zaakinformatieobject(&auth, path_uuid(&uuid)?)
        .await?;
    Ok(Reply::ok().send(&headers, link))
}

#[utoipa::path(
    head,
    path = "/zaakinformatieobjecten/{uuid}",
    params(("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses((status = 200, description = "Headers only"), (status = 304, description = "Cached copy is current")),
    tag = "zaakinformatieobjecten"
)]
pub async fn head_zaakinformatieobject(
    state: State<AppState>,
    uuid: AxumPath<String>,
    headers: HeaderMap,
) -> Response {
    head(
        retrieve_zaakinformatieobject(state, uuid, headers)
            .await
            .into_response(),
    )
}

#[utoipa::path(
    put,
    path = "/zaakinformatieobjecten/{uuid}",
    request_body = ZaakInformatieObjectInput,
    params(("uuid" = String, Path,)),
    responses(
        (status = 200, description = "Document link replaced", body = ZaakInformatieObjectBody),
        (status = 400, description = "Validation error, or zaak/informatieobject changed", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaakinformatieobjecten"
)]
#[axum::debug_handler]
pub async fn update_zaakinformatieobject(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let link = state
        .registry
        .update_zaakinformatieobject(&auth, path_uuid(&uuid)?, json_body(&body)?)
        .await?;
    Ok(Reply::updated().send(&headers, link))
}

#[utoipa::path(
    patch,
    path = "/zaakinformatieobjecten/{uuid}",
    request_body = ZaakInformatieObjectInput,
    params(("uuid" = String, Path,)),
    responses(
        (status = 200, description = "Document link updated", body = ZaakInformatieObjectBody),
        (status = 400, description = "Validation error, or zaak/informatieobject changed", body = Fout),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaakinformatieobjecten"
)]
#[axum::debug_handler]
pub async fn partial_update_zaakinformatieobject(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let link = state
        .registry
        .partial_update_zaakinformatieobject(&auth, path_uuid(&uuid)?, json_body(&body)?)
        .await?;
    Ok(Reply::updated().send(&headers, link))
}

#[utoipa::path(
    delete,
    path = "/zaakinformatieobjecten/{uuid}",
    params(("uuid" = String, Path,)),
    responses(
        (status = 204, description = "Document unlinked"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaakinformatieobjecten"
)]
#[axum::debug_handler]
pub async fn delete_zaakinformatieobject(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let auth = state.authenticate(&headers)?;
    state
        .registry
        .delete_zaakinformatieobject(&auth, path_uuid(&uuid)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/zaakcontactmomenten",
    params(
        ("zaak" = Option<String>, Query, description = "Case URL"),
        ("contactmoment" = Option<String>, Query, description = "Contact moment URL"),
    ),
    responses(
        (status = 200, description = "Contact moments of visible cases", body = [ZaakContactMomentBody]),
        (status = 400, description = "Invalid query parameter", body = Fout),
        (status = 403, description = "Forbidden", body = Fout)
    ),
    tag = "zaakcontactmomenten"
)]
#[axum::debug_handler]
pub async fn list_zaakcontactmomenten(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let links = state
        .registry
        .list_zaakcontactmomenten(&auth, params)
        .await?;
    Ok(listing(links, false))
}

#[utoipa::path(
    post,
    path = "/zaakcontactmomenten",
    request_body = ZaakContactMomentInput,
    responses(
        (status = 201, description = "Contact moment linked", body = ZaakContactMomentBody),
        (status = 400, description = "Validation error or already linked", body = Fout),
        (status = 403, description = "Forbidden", body = Fout)
    ),
    tag = "zaakcontactmomenten"
)]
#[axum::debug_handler]
pub async fn create_zaakcontactmoment(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let link = state
        .registry
        .create_zaakcontactmoment(&auth, json_body(&body)?)
        .await?;
    Ok(Reply::created().send(&headers, link))
}

#[utoipa::path(
    get,
    path = "/zaakcontactmomenten/{uuid}",
    params(("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses(
        (status = 200, description = "The contact moment link", body = ZaakContactMomentBody),
        (status = 304, description = "Cached copy is current"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaakcontactmomenten"
)]
#[axum::debug_handler]
pub async fn retrieve_zaakcontactmoment(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let auth = state.authenticate(&headers)?;
    let link = state
        .registry
        .retrieve_zaakcontactmoment(&auth, path_uuid(&uuid)?)
        .await?;
    Ok(Reply::ok().send(&headers, link))
}

#[utoipa::path(
    head,
    path = "/zaakcontactmomenten/{uuid}",
    params(("uuid" = String, Path,), ("If-None-Match" = Option<String>, Header,)),
    responses((status = 200, description = "Headers only"), (status = 304, description = "Cached copy is current")),
    tag = "zaakcontactmomenten"
)]
pub async fn head_zaakcontactmoment(
    state: State<AppState>,
    uuid: AxumPath<String>,
    headers: HeaderMap,
) -> Response {
    head(
        retrieve_zaakcontactmoment(state, uuid, headers)
            .await
            .into_response(),
    )
}

#[utoipa::path(
    delete,
    path = "/zaakcontactmomenten/{uuid}",
    params(("uuid" = String, Path,)),
    responses(
        (status = 204, description = "Contact moment unlinked"),
        (status = 403, description = "Forbidden", body = Fout),
        (status = 404, description = "Not found", body = Fout)
    ),
    tag = "zaakcontactmomenten"
)]
#[axum::debug_handler]
pub async fn delete_zaakcontactmoment(
    State(state): State<AppState>,
    AxumPath(uuid): AxumPath<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let auth = state.authenticate(&headers)?;
    state
        .registry
        .delete_zaakcontactmoment(&auth, path_uuid(&uuid)?)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
