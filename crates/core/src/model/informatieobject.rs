use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use zrc_uuid::ResourceUuid;

/// Kind of object a document is linked to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ObjectType {
    Zaak,
    Besluit,
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ObjectType::Zaak => "zaak",
            ObjectType::Besluit => "besluit",
        })
    }
}

/// A link between a document and the object it belongs to.
///
/// `object` is the URL of the target. For [`ObjectType::Zaak`] links `zaak` holds the resolved
/// case so that the link inherits its visibility.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObjectInformatieObject {
    pub uuid: ResourceUuid,
    pub seq: u64,
    pub etag: String,
    pub informatieobject: String,
    pub object_type: ObjectType,
    pub object: String,
    pub zaak: Option<ResourceUuid>,
    pub titel: String,
    pub beschrijving: String,
    pub registratiedatum: DateTime<Utc>,
}

impl ObjectInformatieObject {
    /// Describes the relation from the document's point of view.
    pub fn aard_relatie_weergave(&self) -> &'static str {
        match self.object_type {
            ObjectType::Zaak => "Hoort bij, omgekeerd: kent",
            ObjectType::Besluit => "Legt vast, omgekeerd: kan vastgelegd zijn als",
        }
    }
}
