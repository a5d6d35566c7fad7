use zrc_uuid::ResourceUuid;

/// A link from a case to a decision held by the decision registry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZaakBesluit {
    pub uuid: ResourceUuid,
    pub seq: u64,
    pub etag: String,
    pub zaak: ResourceUuid,
    pub besluit: String,
}
