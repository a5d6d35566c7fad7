//! # API REST
//!
//! REST API implementation for the ZRC.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (CRS headers, entity tags, the "Fout" error body, CORS)
//!
//! Uses `api-shared` for authentication and `zrc-core` for everything else.

#![warn(rust_2018_idioms)]

mod error;
mod handlers;
mod headers;

pub use error::{ApiError, CrsError, Fout};

use api_shared::ApplicatieRegistry;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use zrc_core::{AuthContext, ZaakRegistry};

use handlers::{health, links, resultaten, rollen, statussen, zaken};

/// Application state for the REST API server
///
/// Shared by all request handlers: the case registry service and the client applications
/// tokens are checked against.
#[derive(Clone)]
pub struct AppState {
    pub registry: ZaakRegistry,
    pub applicaties: Arc<ApplicatieRegistry>,
}

impl AppState {
    pub fn new(registry: ZaakRegistry, applicaties: ApplicatieRegistry) -> Self {
        Self {
            registry,
            applicaties: Arc::new(applicaties),
        }
    }

    fn authenticate(&self, headers: &HeaderMap) -> Result<AuthContext, ApiError> {
        Ok(self
            .applicaties
            .authenticate(headers::authorization(headers))?)
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Zaakregistratiecomponent (ZRC) API"),
    paths(
        health::health,
        zaken::list_zaken,
        zaken::create_zaak,
        zaken::retrieve_zaak,
        zaken::head_zaak,
        zaken::update_zaak,
        zaken::partial_update_zaak,
        zaken::delete_zaak,
        statussen::list_statussen,
        statussen::create_status,
        statussen::retrieve_status,
        statussen::head_status,
        resultaten::list_resultaten,
        resultaten::create_resultaat,
        resultaten::retrieve_resultaat,
        resultaten::head_resultaat,
        resultaten::update_resultaat,
        resultaten::partial_update_resultaat,
        resultaten::delete_resultaat,
        rollen::list_rollen,
        rollen::create_rol,
        rollen::retrieve_rol,
        rollen::head_rol,
        rollen::delete_rol,
        links::list_zaakeigenschappen,
        links::create_zaakeigenschap,
        links::retrieve_zaakeigenschap,
        links::head_zaakeigenschap,
        links::list_zaakbesluiten,
        links::create_zaakbesluit,
        links::retrieve_zaakbesluit,
        links::head_zaakbesluit,
        links::delete_zaakbesluit,
        links::list_zaakinformatieobjecten,
        links::create_zaakinformatieobject,
        links::retrieve_zaakinformatieobject,
        links::head_zaakinformatieobject,
        links::update_zaakinformatieobject,
        links::partial_update_zaakinformatieobject,
        links::delete_zaakinformatieobject,
        links::list_zaakcontactmomenten,
        links::create_zaakcontactmoment,
        links::retrieve_zaakcontactmoment,
        links::head_zaakcontactmoment,
        links::delete_zaakcontactmoment,
    ),
    components(schemas(
        api_shared::HealthRes,
        Fout,
        zrc_core::FieldError,
        zrc_core::wire::ZaakPage,
        zrc_core::wire::ZaakBody,
        zrc_core::wire::ZaakInput,
        zrc_core::wire::StatusBody,
        zrc_core::wire::StatusInput,
        zrc_core::wire::ResultaatBody,
        zrc_core::wire::ResultaatInput,
        zrc_core::wire::RolBody,
        zrc_core::wire::RolInput,
        zrc_core::wire::ZaakEigenschapBody,
        zrc_core::wire::ZaakEigenschapInput,
        zrc_core::wire::ZaakBesluitBody,
        zrc_core::wire::ZaakBesluitInput,
        zrc_core::wire::ZaakInformatieObjectBody,
        zrc_core::wire::ZaakInformatieObjectInput,
        zrc_core::wire::ZaakContactMomentBody,
        zrc_core::wire::ZaakContactMomentInput,
        zrc_core::VertrouwelijkheidAanduiding,
        zrc_core::archief::Archiefnominatie,
        zrc_core::model::Archiefstatus,
        zrc_core::model::Betalingsindicatie,
        zrc_core::model::BetrokkeneType,
        zrc_core::model::RolOmschrijving,
        zrc_core::model::IndicatieMachtiging,
        zrc_core::model::NatuurlijkPersoon,
        zrc_core::model::NietNatuurlijkPersoon,
        zrc_core::model::Vestiging,
        zrc_core::model::OrganisatorischeEenheid,
        zrc_core::model::Medewerker,
    ))
)]
pub struct ApiDoc;

/// Builds the full REST router, including the OpenAPI document and Swagger UI.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/zaken", get(zaken::list_zaken).post(zaken::create_zaak))
        .route(
            "/zaken/:uuid",
            get(zaken::retrieve_zaak)
                .head(zaken::head_zaak)
                .put(zaken::update_zaak)
                .patch(zaken::partial_update_zaak)
                .delete(zaken::delete_zaak),
        )
        .route(
            "/zaken/:zaak_uuid/zaakeigenschappen",
            get(links::list_zaakeigenschappen).post(links::create_zaakeigenschap),
        )
        .route(
            "/zaken/:zaak_uuid/zaakeigenschappen/:uuid",
            get(links::retrieve_zaakeigenschap).head(links::head_zaakeigenschap),
        )
        .route(
            "/zaken/:zaak_uuid/besluiten",
            get(links::list_zaakbesluiten).post(links::create_zaakbesluit),
        )
        .route(
            "/zaken/:zaak_uuid/besluiten/:uuid",
            get(links::retrieve_zaakbesluit)
                .head(links::head_zaakbesluit)
                .delete(links::delete_zaakbesluit),
        )
        .route(
            "/statussen",
            get(statussen::list_statussen).post(statussen::create_status),
        )
        .route(
            "/statussen/:uuid",
            get(statussen::retrieve_status).head(statussen::head_status),
        )
        .route(
            "/resultaten",
            get(resultaten::list_resultaten).post(resultaten::create_resultaat),
        )
        .route(
            "/resultaten/:uuid",
            get(resultaten::retrieve_resultaat)
                .head(resultaten::head_resultaat)
                .put(resultaten::update_resultaat)
                .patch(resultaten::partial_update_resultaat)
                .delete(resultaten::delete_resultaat),
        )
        .route("/rollen", get(rollen::list_rollen).post(rollen::create_rol))
        .route(
            "/rollen/:uuid",
            get(rollen::retrieve_rol)
                .head(rollen::head_rol)
                .delete(rollen::delete_rol),
        )
        .route(
            "/zaakinformatieobjecten",
            get(links::list_zaakinformatieobjecten).post(links::create_zaakinformatieobject),
        )
        .route(
            "/zaakinformatieobjecten/:uuid",
            get(links::retrieve_zaakinformatieobject)
                .head(links::head_zaakinformatieobject)
                .put(links::update_zaakinformatieobject)
                .patch(links::partial_update_zaakinformatieobject)
                .delete(links::delete_zaakinformatieobject),
        )
        .route(
            "/zaakcontactmomenten",
            get(links::list_zaakcontactmomenten).post(links::create_zaakcontactmoment),
        )
        .route(
            "/zaakcontactmomenten/:uuid",
            get(links::retrieve_zaakcontactmoment)
                .head(links::head_zaakcontactmoment)
                .delete(links::delete_zaakcontactmoment),
        )
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests;
