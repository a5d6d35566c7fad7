use crate::constants::{RESULTATEN, STATUSSEN, ZAKEN};
use crate::model::{Resultaat, Status};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use zrc_uuid::ResourceUrls;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    pub url: String,
    pub uuid: String,
    pub zaak: String,
    pub statustype: String,
    pub datum_status_gezet: DateTime<Utc>,
    pub statustoelichting: String,
}

pub fn render_status(urls: &ResourceUrls, status: &Status) -> StatusBody {
    StatusBody {
        url: urls.url(STATUSSEN, &status.uuid),
        uuid: status.uuid.to_string(),
        zaak: urls.url(ZAKEN, &status.zaak),
        statustype: status.statustype.clone(),
        datum_status_gezet: status.datum_status_gezet,
        statustoelichting: status.statustoelichting.clone(),
    }
}

#[derive(Clone, Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct StatusInput {
    pub zaak: Option<String>,
    pub statustype: Option<String>,
    pub datum_status_gezet: Option<DateTime<Utc>>,
    pub statustoelichting: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResultaatBody {
    pub url: String,
    pub uuid: String,
    pub zaak: String,
    pub resultaattype: String,
    pub toelichting: String,
}

pub fn render_resultaat(urls: &ResourceUrls, resultaat: &Resultaat) -> ResultaatBody {
    ResultaatBody {
        url: urls.url(RESULTATEN, &resultaat.uuid),
        uuid: resultaat.uuid.to_string(),
        zaak: urls.url(ZAKEN, &resultaat.zaak),
        resultaattype: resultaat.resultaattype.clone(),
        toelichting: resultaat.toelichting.clone(),
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ResultaatInput {
    pub zaak: Option<String>,
    pub resultaattype: Option<String>,
    pub toelichting: String,
}

impl ResultaatInput {
    pub fn from_resultaat(urls: &ResourceUrls, resultaat: &Resultaat) -> Self {
        Self {
            zaak: Some(urls.url(ZAKEN, &resultaat.zaak)),
            resultaattype: Some(resultaat.resultaattype.clone()),
            toelichting: resultaat.toelichting.clone(),
        }
    }
}
