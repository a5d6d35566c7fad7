use zrc_uuid::ResourceUuid;

/// A value for one of the properties declared by the case-type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZaakEigenschap {
    pub uuid: ResourceUuid,
    pub seq: u64,
    pub etag: String,
    pub zaak: ResourceUuid,
    pub eigenschap: String,
    /// Name copied from the property definition in the catalogue.
    pub naam: String,
    pub waarde: String,
}
