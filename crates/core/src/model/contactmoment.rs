use zrc_uuid::ResourceUuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ZaakContactMoment {
    pub uuid: ResourceUuid,
    pub seq: u64,
    pub etag: String,
    pub zaak: ResourceUuid,
    pub contactmoment: String,
}
