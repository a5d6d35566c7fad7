//! # ZRC Core
//!
//! Core business logic for the case registry (Zaakregistratiecomponent).
//!
//! This crate contains the case lifecycle and everything derived from it:
//! - Cases, statuses, results, roles and the links hanging off a case
//! - End date and archival date derivation ([`archief`])
//! - Scope and zaaktype/confidentiality filtering ([`autorisatie`])
//! - Entity tags for conditional requests ([`etag`])
//! - Clients for the catalogue, decision and document registries ([`registry`])
//!
//! **No API concerns**: authentication, the HTTP server and header handling belong in
//! `api-shared` and `api-rest`.

pub mod archief;
pub mod autorisatie;
pub mod config;
pub mod constants;
pub mod error;
pub mod etag;
pub mod filters;
pub mod model;
pub mod registry;
pub mod repositories;
pub mod store;
pub mod vertrouwelijkheid;
pub mod wire;

pub use autorisatie::{AuthContext, Autorisatie, Scope};
pub use config::CoreConfig;
pub use error::{FieldError, ZrcError, ZrcResult};
pub use registry::{HttpRegistry, InMemoryRegistry, Registries, RegistryError};
pub use repositories::ZaakRegistry;
pub use vertrouwelijkheid::VertrouwelijkheidAanduiding;
