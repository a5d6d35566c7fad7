use crate::archief::Archiefnominatie;
use crate::constants::{RESULTATEN, STATUSSEN, ZAAKEIGENSCHAPPEN, ZAKEN};
use crate::model::{Archiefstatus, Betalingsindicatie, Zaak};
use crate::store::Tables;
use crate::vertrouwelijkheid::VertrouwelijkheidAanduiding;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zrc_types::Rsin;
use zrc_uuid::ResourceUrls;

#[derive(Clone, Debug, PartialEq, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZaakBody {
    pub url: String,
    pub uuid: String,
    pub identificatie: String,
    #[schema(value_type = String)]
    pub bronorganisatie: Rsin,
    pub omschrijving: String,
    pub toelichting: String,
    pub zaaktype: String,
    pub registratiedatum: NaiveDate,
    #[schema(value_type = String)]
    pub verantwoordelijke_organisatie: Rsin,
    pub startdatum: NaiveDate,
    pub einddatum: Option<NaiveDate>,
    pub einddatum_gepland: Option<NaiveDate>,
    pub uiterlijke_einddatum_afdoening: Option<NaiveDate>,
    pub publicatiedatum: Option<NaiveDate>,
    pub communicatiekanaal: Option<String>,
    pub producten_of_diensten: Vec<String>,
    pub vertrouwelijkheidaanduiding: VertrouwelijkheidAanduiding,
    pub betalingsindicatie: Option<Betalingsindicatie>,
    pub laatste_betaaldatum: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Object>)]
    pub zaakgeometrie: Option<Value>,
    pub hoofdzaak: Option<String>,
    pub deelzaken: Vec<String>,
    pub eigenschappen: Vec<String>,
    pub status: Option<String>,
    pub resultaat: Option<String>,
    pub archiefnominatie: Option<Archiefnominatie>,
    pub archiefstatus: Archiefstatus,
    pub archiefactiedatum: Option<NaiveDate>,
}

pub fn render_zaak(tables: &Tables, urls: &ResourceUrls, zaak: &Zaak) -> ZaakBody {
    ZaakBody {
        url: urls.url(ZAKEN, &zaak.uuid),
        uuid: zaak.uuid.to_string(),
        identificatie: zaak.identificatie.clone(),
        bronorganisatie: zaak.bronorganisatie.clone(),
        omschrijving: zaak.omschrijving.clone(),
        toelichting: zaak.toelichting.clone(),
        zaaktype: zaak.zaaktype.clone(),
        registratiedatum: zaak.registratiedatum,
        verantwoordelijke_organisatie: zaak.verantwoordelijke_organisatie.clone(),
        startdatum: zaak.startdatum,
        einddatum: zaak.einddatum,
        einddatum_gepland: zaak.einddatum_gepland,
        uiterlijke_einddatum_afdoening: zaak.uiterlijke_einddatum_afdoening,
        publicatiedatum: zaak.publicatiedatum,
        communicatiekanaal: zaak.communicatiekanaal.clone(),
        producten_of_diensten: zaak.producten_of_diensten.clone(),
        vertrouwelijkheidaanduiding: zaak.vertrouwelijkheidaanduiding,
        betalingsindicatie: zaak.betalingsindicatie,
        laatste_betaaldatum: zaak.laatste_betaaldatum,
        zaakgeometrie: zaak.zaakgeometrie.as_ref().map(|g| g.as_value().clone()),
        hoofdzaak: zaak.hoofdzaak.map(|h| urls.url(ZAKEN, &h)),
        deelzaken: tables
            .deelzaken_of(zaak.uuid)
            .into_iter()
            .map(|d| urls.url(ZAKEN, &d.uuid))
            .collect(),
        eigenschappen: tables
            .eigenschappen_of(zaak.uuid)
            .into_iter()
            .map(|e| urls.nested_url(ZAKEN, &zaak.uuid, ZAAKEIGENSCHAPPEN, &e.uuid))
            .collect(),
        status: tables
            .latest_status(zaak.uuid)
            .map(|s| urls.url(STATUSSEN, &s.uuid)),
        resultaat: tables
            .resultaat_of(zaak.uuid)
            .map(|r| urls.url(RESULTATEN, &r.uuid)),
        archiefnominatie: zaak.archiefnominatie,
        archiefstatus: zaak.archiefstatus,
        archiefactiedatum: zaak.archiefactiedatum,
    }
}

/// Writable fields of a case.
///
/// Every field is optional at the decoding stage so that missing required fields are reported
/// together, under their wire names. Read-only fields sent by a client are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct ZaakInput {
    pub identificatie: Option<String>,
    #[schema(value_type = Option<String>)]
    pub bronorganisatie: Option<Rsin>,
    pub omschrijving: Option<String>,
    pub toelichting: Option<String>,
    pub zaaktype: Option<String>,
    pub registratiedatum: Option<NaiveDate>,
    #[schema(value_type = Option<String>)]
    pub verantwoordelijke_organisatie: Option<Rsin>,
    pub startdatum: Option<NaiveDate>,
    pub einddatum_gepland: Option<NaiveDate>,
    pub uiterlijke_einddatum_afdoening: Option<NaiveDate>,
    pub publicatiedatum: Option<NaiveDate>,
    pub communicatiekanaal: Option<String>,
    pub producten_of_diensten: Vec<String>,
    pub vertrouwelijkheidaanduiding: Option<VertrouwelijkheidAanduiding>,
    pub betalingsindicatie: Option<Betalingsindicatie>,
    pub laatste_betaaldatum: Option<DateTime<Utc>>,
    #[schema(value_type = Option<Object>)]
    pub zaakgeometrie: Option<Value>,
    pub hoofdzaak: Option<String>,
    pub archiefnominatie: Option<Archiefnominatie>,
    pub archiefstatus: Option<Archiefstatus>,
}

impl ZaakInput {
    /// The input that would recreate `zaak` as it is now; the base for partial updates.
    pub fn from_zaak(urls: &ResourceUrls, zaak: &Zaak) -> Self {
        Self {
            identificatie: Some(zaak.identificatie.clone()),
            bronorganisatie: Some(zaak.bronorganisatie.clone()),
            omschrijving: Some(zaak.omschrijving.clone()),
            toelichting: Some(zaak.toelichting.clone()),
            zaaktype: Some(zaak.zaaktype.clone()),
            registratiedatum: Some(zaak.registratiedatum),
            verantwoordelijke_organisatie: Some(zaak.verantwoordelijke_organisatie.clone()),
            startdatum: Some(zaak.startdatum),
            einddatum_gepland: zaak.einddatum_gepland,
            uiterlijke_einddatum_afdoening: zaak.uiterlijke_einddatum_afdoening,
            publicatiedatum: zaak.publicatiedatum,
            communicatiekanaal: zaak.communicatiekanaal.clone(),
            producten_of_diensten: zaak.producten_of_diensten.clone(),
            vertrouwelijkheidaanduiding: Some(zaak.vertrouwelijkheidaanduiding),
            betalingsindicatie: zaak.betalingsindicatie,
            laatste_betaaldatum: zaak.laatste_betaaldatum,
            zaakgeometrie: zaak.zaakgeometrie.as_ref().map(|g| g.as_value().clone()),
            hoofdzaak: zaak.hoofdzaak.map(|h| urls.url(ZAKEN, &h)),
            archiefnominatie: zaak.archiefnominatie,
            archiefstatus: Some(zaak.archiefstatus),
        }
    }
}
