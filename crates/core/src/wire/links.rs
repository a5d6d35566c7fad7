use crate::constants::{ZAAKBESLUITEN, ZAAKCONTACTMOMENTEN, ZAAKEIGENSCHAPPEN, ZAAKINFORMATIEOBJECTEN, ZAKEN};
use crate::model::{ObjectInformatieObject, ZaakBesluit, ZaakContactMoment, ZaakEigenschap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zrc_uuid::ResourceUrls;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZaakEigenschapBody {
    pub url: String,
    pub uuid: String,
    pub zaak: String,
    pub eigenschap: String,
    pub naam: String,
    pub waarde: String,
}

pub fn render_zaakeigenschap(urls: &ResourceUrls, record: &ZaakEigenschap) -> ZaakEigenschapBody {
    ZaakEigenschapBody {
        url: urls.nested_url(ZAKEN, &record.zaak, ZAAKEIGENSCHAPPEN, &record.uuid),
        uuid: record.uuid.to_string(),
        zaak: urls.url(ZAKEN, &record.zaak),
        eigenschap: record.eigenschap.clone(),
        naam: record.naam.clone(),
        waarde: record.waarde.clone(),
    }
}

#[derive(Clone, Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ZaakEigenschapInput {
    pub eigenschap: Option<String>,
    pub waarde: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZaakBesluitBody {
    pub url: String,
    pub uuid: String,
    pub besluit: String,
}

pub fn render_zaakbesluit(urls: &ResourceUrls, record: &ZaakBesluit) -> ZaakBesluitBody {
    ZaakBesluitBody {
        url: urls.nested_url(ZAKEN, &record.zaak, ZAAKBESLUITEN, &record.uuid),
        uuid: record.uuid.to_string(),
        besluit: record.besluit.clone(),
    }
}

#[derive(Clone, Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ZaakBesluitInput {
    pub besluit: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZaakInformatieObjectBody {
    pub url: String,
    pub uuid: String,
    pub informatieobject: String,
    pub zaak: String,
    pub aard_relatie_weergave: String,
    pub titel: String,
    pub beschrijving: String,
    pub registratiedatum: DateTime<Utc>,
}

pub fn render_zaakinformatieobject(
    urls: &ResourceUrls,
    record: &ObjectInformatieObject,
) -> ZaakInformatieObjectBody {
    ZaakInformatieObjectBody {
        url: urls.url(ZAAKINFORMATIEOBJECTEN, &record.uuid),
        uuid: record.uuid.to_string(),
        informatieobject: record.informatieobject.clone(),
        zaak: record.object.clone(),
        aard_relatie_weergave: record.aard_relatie_weergave().to_owned(),
        titel: record.titel.clone(),
        beschrijving: record.beschrijving.clone(),
        registratiedatum: record.registratiedatum,
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ZaakInformatieObjectInput {
    pub informatieobject: Option<String>,
    pub zaak: Option<String>,
    pub titel: String,
    pub beschrijving: String,
}

impl ZaakInformatieObjectInput {
    pub fn from_record(record: &ObjectInformatieObject) -> Self {
        Self {
            informatieobject: Some(record.informatieobject.clone()),
            zaak: Some(record.object.clone()),
            titel: record.titel.clone(),
            beschrijving: record.beschrijving.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZaakContactMomentBody {
    pub url: String,
    pub uuid: String,
    pub zaak: String,
    pub contactmoment: String,
}

pub fn render_zaakcontactmoment(
    urls: &ResourceUrls,
    record: &ZaakContactMoment,
) -> ZaakContactMomentBody {
    ZaakContactMomentBody {
        url: urls.url(ZAAKCONTACTMOMENTEN, &record.uuid),
        uuid: record.uuid.to_string(),
        zaak: urls.url(ZAKEN, &record.zaak),
        contactmoment: record.contactmoment.clone(),
    }
}

#[derive(Clone, Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ZaakContactMomentInput {
    pub zaak: Option<String>,
    pub contactmoment: Option<String>,
}
