//! Wire representations.
//!
//! Request and response bodies use camelCase names over the snake_case model. Response bodies
//! are rendered from the tables because several fields (status, resultaat, deelzaken,
//! eigenschappen) are reverse lookups. Entity tags are computed over exactly these bodies.

mod links;
mod rol;
mod status;
mod zaak;

pub use links::{
    render_zaakbesluit, render_zaakcontactmoment, render_zaakeigenschap,
    render_zaakinformatieobject, ZaakBesluitBody, ZaakBesluitInput, ZaakContactMomentBody,
    ZaakContactMomentInput, ZaakEigenschapBody, ZaakEigenschapInput, ZaakInformatieObjectBody,
    ZaakInformatieObjectInput,
};
pub use rol::{render_rol, RolBody, RolInput};
pub use status::{
    render_resultaat, render_status, ResultaatBody, ResultaatInput, StatusBody, StatusInput,
};
pub use zaak::{render_zaak, ZaakBody, ZaakInput};

use serde::Serialize;

/// One page of a paginated list.
#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
#[aliases(ZaakPage = Page<ZaakBody>)]
pub struct Page<T> {
    pub count: usize,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

/// A representation together with its entity tag.
#[derive(Clone, Debug, PartialEq)]
pub struct Versioned<T> {
    pub etag: String,
    pub body: T,
}
