use crate::constants::{ROLLEN, ZAKEN};
use crate::model::{
    BetrokkeneIdentificatie, BetrokkeneType, IndicatieMachtiging, Rol, RolOmschrijving,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zrc_uuid::ResourceUrls;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolBody {
    pub url: String,
    pub uuid: String,
    pub zaak: String,
    pub betrokkene: Option<String>,
    pub betrokkene_type: BetrokkeneType,
    pub rolomschrijving: RolOmschrijving,
    pub roltoelichting: String,
    pub registratiedatum: DateTime<Utc>,
    pub indicatie_machtiging: Option<IndicatieMachtiging>,
    #[schema(value_type = Option<Object>)]
    pub betrokkene_identificatie: Option<BetrokkeneIdentificatie>,
}

pub fn render_rol(urls: &ResourceUrls, rol: &Rol) -> RolBody {
    RolBody {
        url: urls.url(ROLLEN, &rol.uuid),
        uuid: rol.uuid.to_string(),
        zaak: urls.url(ZAKEN, &rol.zaak),
        betrokkene: rol.betrokkene.clone(),
        betrokkene_type: rol.betrokkene_type,
        rolomschrijving: rol.rolomschrijving,
        roltoelichting: rol.roltoelichting.clone(),
        registratiedatum: rol.registratiedatum,
        indicatie_machtiging: rol.indicatie_machtiging,
        betrokkene_identificatie: rol.betrokkene_identificatie.clone(),
    }
}

#[derive(Clone, Debug, Default, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct RolInput {
    pub zaak: Option<String>,
    pub betrokkene: Option<String>,
    pub betrokkene_type: Option<BetrokkeneType>,
    pub rolomschrijving: Option<RolOmschrijving>,
    pub roltoelichting: String,
    pub indicatie_machtiging: Option<IndicatieMachtiging>,
    /// Decoded once `betrokkeneType` is known.
    #[schema(value_type = Option<Object>)]
    pub betrokkene_identificatie: Option<Value>,
}
