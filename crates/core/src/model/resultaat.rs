use zrc_uuid::ResourceUuid;

/// The outcome of a case. A case has at most one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resultaat {
    pub uuid: ResourceUuid,
    pub seq: u64,
    pub etag: String,
    pub zaak: ResourceUuid,
    pub resultaattype: String,
    pub toelichting: String,
}
