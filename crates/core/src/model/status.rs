use chrono::{DateTime, Utc};
use zrc_uuid::ResourceUuid;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Status {
    pub uuid: ResourceUuid,
    pub seq: u64,
    pub etag: String,
    pub zaak: ResourceUuid,
    pub statustype: String,
    pub datum_status_gezet: DateTime<Utc>,
    pub statustoelichting: String,
    /// Terminal flag of the status-type at the moment the status was set.
    pub is_eindstatus: bool,
}
