//! External registries consumed by the case registry.
//!
//! Case-type, status-type and result-type metadata live in the catalogue (ZTC); decisions live in
//! the decision registry (BRC); documents live in the document registry (DRC) and communication
//! channels in the reference lists. All of them are read by absolute URL with one GET per
//! lookup. A failed fetch aborts the enclosing write.

mod http;
mod memory;

pub use http::HttpRegistry;
pub use memory::InMemoryRegistry;

use crate::archief::{Afleidingswijze, Archiefnominatie};
use crate::vertrouwelijkheid::VertrouwelijkheidAanduiding;
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("{url} does not exist")]
    NotFound { url: String },
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    #[error("{url} returned an unexpected document: {source}")]
    Shape {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

pub type RegistryResult<T> = Result<T, RegistryError>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Zaaktype {
    pub url: String,
    #[serde(default)]
    pub vertrouwelijkheidaanduiding: Option<VertrouwelijkheidAanduiding>,
    #[serde(default)]
    pub deelzaaktypen: Vec<String>,
    #[serde(default)]
    pub producten_of_diensten: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statustype {
    pub url: String,
    #[serde(default)]
    pub zaaktype: Option<String>,
    pub volgnummer: u32,
    pub is_eindstatus: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrondatumArchiefprocedure {
    pub afleidingswijze: Afleidingswijze,
    #[serde(default)]
    pub datumkenmerk: Option<String>,
    #[serde(default)]
    pub objecttype: Option<String>,
    #[serde(default)]
    pub procestermijn: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resultaattype {
    pub url: String,
    #[serde(default)]
    pub zaaktype: Option<String>,
    #[serde(default)]
    pub archiefactietermijn: Option<String>,
    #[serde(default)]
    pub archiefnominatie: Option<Archiefnominatie>,
    #[serde(default)]
    pub brondatum_archiefprocedure: Option<BrondatumArchiefprocedure>,
}

/// A case property declared by a case-type.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Eigenschap {
    pub url: String,
    pub naam: String,
    #[serde(default)]
    pub zaaktype: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Besluit {
    pub url: String,
    #[serde(default)]
    pub ingangsdatum: Option<NaiveDate>,
    #[serde(default)]
    pub vervaldatum: Option<NaiveDate>,
}

/// Read access to the case-type catalogue.
#[async_trait]
pub trait Catalogi: Send + Sync {
    async fn zaaktype(&self, url: &str) -> RegistryResult<Zaaktype>;
    async fn statustype(&self, url: &str) -> RegistryResult<Statustype>;
    async fn resultaattype(&self, url: &str) -> RegistryResult<Resultaattype>;
    async fn eigenschap(&self, url: &str) -> RegistryResult<Eigenschap>;
}

/// Read access to the decision registry.
#[async_trait]
pub trait Besluiten: Send + Sync {
    async fn besluit(&self, url: &str) -> RegistryResult<Besluit>;
}

/// A document in the document registry. Only its identity matters to cases.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Informatieobject {
    pub url: String,
    #[serde(default)]
    pub identificatie: Option<String>,
}

/// A communication channel from the reference lists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Communicatiekanaal {
    pub url: String,
    pub naam: String,
    #[serde(default)]
    pub omschrijving: String,
}

/// Read access to the document registry.
#[async_trait]
pub trait Documenten: Send + Sync {
    async fn informatieobject(&self, url: &str) -> RegistryResult<Informatieobject>;
}

/// Read access to the reference lists.
#[async_trait]
pub trait Referentielijsten: Send + Sync {
    async fn communicatiekanaal(&self, url: &str) -> RegistryResult<Communicatiekanaal>;
}

/// The registry clients the case registry reads from.
#[derive(Clone)]
pub struct Registries {
    pub catalogi: Arc<dyn Catalogi>,
    pub besluiten: Arc<dyn Besluiten>,
    pub documenten: Arc<dyn Documenten>,
    pub referentielijsten: Arc<dyn Referentielijsten>,
}

impl Registries {
    /// Serves every lookup from one client.
    pub fn shared<R>(registry: Arc<R>) -> Self
    where
        R: Catalogi + Besluiten + Documenten + Referentielijsten + 'static,
    {
        Self {
            catalogi: registry.clone(),
            besluiten: registry.clone(),
            documenten: registry.clone(),
            referentielijsten: registry,
        }
    }
}

impl std::fmt::Debug for Registries {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registries").finish_non_exhaustive()
    }
}
