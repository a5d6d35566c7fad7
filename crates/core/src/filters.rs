//! Query-string filters, ordering and pagination for list operations.
//!
//! Every list accepts a fixed set of parameters. Unknown parameters, malformed URLs, dates and
//! choice values are rejected with a validation error naming the parameter; an empty value is
//! treated as absent.

use crate::archief::Archiefnominatie;
use crate::constants::{CODE_UNKNOWN_PARAMETERS, NON_FIELD_ERRORS, ZAKEN};
use crate::error::{FieldError, FieldErrors};
use crate::model::{
    Archiefstatus, BetrokkeneType, ObjectInformatieObject, Resultaat, Rol, RolOmschrijving,
    Status, Zaak, ZaakContactMoment,
};
use crate::wire::Page;
use crate::{ZrcError, ZrcResult};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;
use zrc_types::{Bsn, Rsin};
use zrc_uuid::ResourceUrls;

/// Query parameters being consumed by a filter.
#[derive(Debug, Default)]
pub struct QueryParams {
    params: BTreeMap<String, String>,
    errors: FieldErrors,
}

impl QueryParams {
    pub fn new(params: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            params: params.into_iter().collect(),
            errors: FieldErrors::default(),
        }
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.params
            .remove(name)
            .map(|v| v.trim().to_owned())
            .filter(|v| !v.is_empty())
    }

    fn invalid(&mut self, name: &str, reason: String) {
        self.errors.push(FieldError::new(name, "invalid", reason));
    }

    pub fn text(&mut self, name: &str) -> Option<String> {
        self.take(name)
    }

    /// An absolute http(s) URL.
    pub fn url(&mut self, name: &str) -> Option<String> {
        let value = self.take(name)?;
        match url::Url::parse(&value) {
            Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => Some(value),
            _ => {
                self.invalid(name, "Voer een geldige URL in.".into());
                None
            }
        }
    }

    pub fn date(&mut self, name: &str) -> Option<NaiveDate> {
        self.parsed(name)
    }

    /// A value of one of the snake_case choice enums.
    pub fn choice<T: DeserializeOwned>(&mut self, name: &str) -> Option<T> {
        let value = self.take(name)?;
        match serde_json::from_value(serde_json::Value::String(value.clone())) {
            Ok(choice) => Some(choice),
            Err(_) => {
                self.invalid(name, format!("'{value}' is geen geldige keuze."));
                None
            }
        }
    }

    pub fn parsed<T>(&mut self, name: &str) -> Option<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        let value = self.take(name)?;
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                self.invalid(name, format!("'{value}': {e}"));
                None
            }
        }
    }

    /// Fails on collected errors or on parameters no filter consumed.
    pub fn finish(mut self) -> ZrcResult<()> {
        if !self.params.is_empty() {
            let unknown = self.params.keys().cloned().collect::<Vec<_>>().join(", ");
            self.errors.push(FieldError::new(
                NON_FIELD_ERRORS,
                CODE_UNKNOWN_PARAMETERS,
                format!("Onbekende query parameters: {unknown}"),
            ));
        }
        self.errors.finish()
    }
}

fn matches_eq<T: PartialEq>(filter: &Option<T>, value: &T) -> bool {
    filter.as_ref().map_or(true, |f| f == value)
}

fn matches_opt<T: PartialEq>(filter: &Option<T>, value: Option<&T>) -> bool {
    filter.as_ref().map_or(true, |f| value == Some(f))
}

// ============================================================================
// ZAKEN
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZaakOrderField {
    Startdatum,
    Einddatum,
    Publicatiedatum,
    Archiefactiedatum,
}

impl FromStr for ZaakOrderField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "startdatum" => Ok(Self::Startdatum),
            "einddatum" => Ok(Self::Einddatum),
            "publicatiedatum" => Ok(Self::Publicatiedatum),
            "archiefactiedatum" => Ok(Self::Archiefactiedatum),
            other => Err(format!("'{other}' is geen geldig sorteerveld")),
        }
    }
}

impl ZaakOrderField {
    fn key(&self, zaak: &Zaak) -> Option<NaiveDate> {
        match self {
            Self::Startdatum => Some(zaak.startdatum),
            Self::Einddatum => zaak.einddatum,
            Self::Publicatiedatum => zaak.publicatiedatum,
            Self::Archiefactiedatum => zaak.archiefactiedatum,
        }
    }
}

/// `ordering=field` or `ordering=-field`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ZaakOrdering {
    pub field: ZaakOrderField,
    pub descending: bool,
}

impl FromStr for ZaakOrdering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (descending, name) = match s.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, s),
        };
        Ok(Self {
            field: name.parse()?,
            descending,
        })
    }
}

impl ZaakOrdering {
    /// Empty values sort after dates when ascending and before them when descending.
    pub fn compare(&self, a: &Zaak, b: &Zaak) -> Ordering {
        let ordering = match (self.field.key(a), self.field.key(b)) {
            (Some(x), Some(y)) => x.cmp(&y),
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
        };
        let ordering = if self.descending {
            ordering.reverse()
        } else {
            ordering
        };
        ordering.then(a.seq.cmp(&b.seq))
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ZaakFilter {
    pub identificatie: Option<String>,
    pub bronorganisatie: Option<Rsin>,
    pub zaaktype: Option<String>,
    pub archiefnominatie: Option<Archiefnominatie>,
    pub archiefstatus: Option<Archiefstatus>,
    pub archiefactiedatum_lt: Option<NaiveDate>,
    pub archiefactiedatum_gt: Option<NaiveDate>,
    pub startdatum: Option<NaiveDate>,
    pub startdatum_gt: Option<NaiveDate>,
    pub startdatum_gte: Option<NaiveDate>,
    pub startdatum_lt: Option<NaiveDate>,
    pub startdatum_lte: Option<NaiveDate>,
    pub ordering: Option<ZaakOrdering>,
    pub page: Option<String>,
}

impl ZaakFilter {
    pub fn parse(mut params: QueryParams) -> ZrcResult<Self> {
        let filter = Self {
            identificatie: params.text("identificatie"),
            bronorganisatie: params.parsed("bronorganisatie"),
            zaaktype: params.url("zaaktype"),
            archiefnominatie: params.choice("archiefnominatie"),
            archiefstatus: params.choice("archiefstatus"),
            archiefactiedatum_lt: params.date("archiefactiedatum__lt"),
            archiefactiedatum_gt: params.date("archiefactiedatum__gt"),
            startdatum: params.date("startdatum"),
            startdatum_gt: params.date("startdatum__gt"),
            startdatum_gte: params.date("startdatum__gte"),
            startdatum_lt: params.date("startdatum__lt"),
            startdatum_lte: params.date("startdatum__lte"),
            ordering: params.parsed("ordering"),
            page: params.text("page"),
        };
        params.finish()?;
        Ok(filter)
    }

    pub fn matches(&self, zaak: &Zaak) -> bool {
        let start = zaak.startdatum;
        matches_eq(&self.identificatie, &zaak.identificatie)
            && matches_eq(&self.bronorganisatie, &zaak.bronorganisatie)
            && matches_eq(&self.zaaktype, &zaak.zaaktype)
            && matches_opt(&self.archiefnominatie, zaak.archiefnominatie.as_ref())
            && matches_eq(&self.archiefstatus, &zaak.archiefstatus)
            && self
                .archiefactiedatum_lt
                .map_or(true, |d| zaak.archiefactiedatum.is_some_and(|a| a < d))
            && self
                .archiefactiedatum_gt
                .map_or(true, |d| zaak.archiefactiedatum.is_some_and(|a| a > d))
            && self.startdatum.map_or(true, |d| start == d)
            && self.startdatum_gt.map_or(true, |d| start > d)
            && self.startdatum_gte.map_or(true, |d| start >= d)
            && self.startdatum_lt.map_or(true, |d| start < d)
            && self.startdatum_lte.map_or(true, |d| start <= d)
    }

    /// Query parameters to carry over into `next`/`previous` links.
    pub fn link_params(&self, params: &[(String, String)]) -> Vec<(String, String)> {
        params
            .iter()
            .filter(|(name, value)| name != "page" && !value.trim().is_empty())
            .cloned()
            .collect()
    }
}

/// Cuts one page out of `items`.
///
/// `page` is 1-based; a missing page is the first one. A page that is not a positive number or
/// lies beyond the last page is [`ZrcError::NotFound`].
pub fn paginate<T>(
    items: Vec<T>,
    page: Option<&str>,
    page_size: usize,
    urls: &ResourceUrls,
    params: &[(String, String)],
) -> ZrcResult<Page<T>> {
    let page: usize = match page {
        None => 1,
        Some(raw) => raw.parse().map_err(|_| ZrcError::NotFound)?,
    };
    let count = items.len();
    let pages = count.div_ceil(page_size).max(1);
    if page == 0 || page > pages {
        return Err(ZrcError::NotFound);
    }

    let link = |target: usize| -> Option<String> {
        let mut url = url::Url::parse(&format!("{}/{ZAKEN}", urls.base())).ok()?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in params {
                query.append_pair(name, value);
            }
            query.append_pair("page", &target.to_string());
        }
        Some(url.to_string())
    };

    let results = items
        .into_iter()
        .skip((page - 1) * page_size)
        .take(page_size)
        .collect();

    Ok(Page {
        count,
        next: (page < pages).then(|| link(page + 1)).flatten(),
        previous: (page > 1).then(|| link(page - 1)).flatten(),
        results,
    })
}

// ============================================================================
// SUB-RESOURCES
// ============================================================================

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatusFilter {
    pub zaak: Option<String>,
    pub statustype: Option<String>,
}

impl StatusFilter {
    pub fn parse(mut params: QueryParams) -> ZrcResult<Self> {
        let filter = Self {
            zaak: params.url("zaak"),
            statustype: params.url("statustype"),
        };
        params.finish()?;
        Ok(filter)
    }

    pub fn matches(&self, urls: &ResourceUrls, status: &Status) -> bool {
        matches_eq(&self.zaak, &urls.url(ZAKEN, &status.zaak))
            && matches_eq(&self.statustype, &status.statustype)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResultaatFilter {
    pub zaak: Option<String>,
    pub resultaattype: Option<String>,
}

impl ResultaatFilter {
    pub fn parse(mut params: QueryParams) -> ZrcResult<Self> {
        let filter = Self {
            zaak: params.url("zaak"),
            resultaattype: params.url("resultaattype"),
        };
        params.finish()?;
        Ok(filter)
    }

    pub fn matches(&self, urls: &ResourceUrls, resultaat: &Resultaat) -> bool {
        matches_eq(&self.zaak, &urls.url(ZAKEN, &resultaat.zaak))
            && matches_eq(&self.resultaattype, &resultaat.resultaattype)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RolFilter {
    pub zaak: Option<String>,
    pub betrokkene: Option<String>,
    pub betrokkene_type: Option<BetrokkeneType>,
    pub rolomschrijving: Option<RolOmschrijving>,
    pub natuurlijk_persoon_inp_bsn: Option<Bsn>,
    pub medewerker_identificatie: Option<String>,
    pub organisatorische_eenheid_identificatie: Option<String>,
    pub vestiging_vestigings_nummer: Option<String>,
    pub niet_natuurlijk_persoon_inn_nnp_id: Option<Rsin>,
}

impl RolFilter {
    pub fn parse(mut params: QueryParams) -> ZrcResult<Self> {
        let rolomschrijving: Option<RolOmschrijving> = params.choice("rolomschrijving");
        let omschrijving_generiek = params.choice("omschrijvingGeneriek");
        let filter = Self {
            zaak: params.url("zaak"),
            betrokkene: params.url("betrokkene"),
            betrokkene_type: params.choice("betrokkeneType"),
            rolomschrijving: rolomschrijving.or(omschrijving_generiek),
            natuurlijk_persoon_inp_bsn: params
                .parsed("betrokkeneIdentificatie__natuurlijkPersoon__inpBsn"),
            medewerker_identificatie: params
                .text("betrokkeneIdentificatie__medewerker__identificatie"),
            organisatorische_eenheid_identificatie: params
                .text("betrokkeneIdentificatie__organisatorischeEenheid__identificatie"),
            vestiging_vestigings_nummer: params
                .text("betrokkeneIdentificatie__vestiging__vestigingsNummer"),
            niet_natuurlijk_persoon_inn_nnp_id: params
                .parsed("betrokkeneIdentificatie__nietNatuurlijkPersoon__innNnpId"),
        };
        params.finish()?;
        Ok(filter)
    }

    pub fn matches(&self, urls: &ResourceUrls, rol: &Rol) -> bool {
        let identificatie = rol.betrokkene_identificatie.as_ref();
        matches_eq(&self.zaak, &urls.url(ZAKEN, &rol.zaak))
            && matches_opt(&self.betrokkene, rol.betrokkene.as_ref())
            && matches_eq(&self.betrokkene_type, &rol.betrokkene_type)
            && matches_eq(&self.rolomschrijving, &rol.rolomschrijving)
            && matches_opt(
                &self.natuurlijk_persoon_inp_bsn,
                identificatie
                    .and_then(|i| i.natuurlijk_persoon())
                    .and_then(|p| p.inp_bsn.as_ref()),
            )
            && matches_opt(
                &self.medewerker_identificatie,
                identificatie
                    .and_then(|i| i.medewerker())
                    .map(|m| &m.identificatie),
            )
            && matches_opt(
                &self.organisatorische_eenheid_identificatie,
                identificatie
                    .and_then(|i| i.organisatorische_eenheid())
                    .map(|o| &o.identificatie),
            )
            && matches_opt(
                &self.vestiging_vestigings_nummer,
                identificatie
                    .and_then(|i| i.vestiging())
                    .map(|v| &v.vestigings_nummer),
            )
            && matches_opt(
                &self.niet_natuurlijk_persoon_inn_nnp_id,
                identificatie
                    .and_then(|i| i.niet_natuurlijk_persoon())
                    .and_then(|p| p.inn_nnp_id.as_ref()),
            )
    }
}

/// Filter for case links to documents or contact moments: `zaak` plus the link target.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ZaakLinkFilter {
    pub zaak: Option<String>,
    pub target: Option<String>,
}

impl ZaakLinkFilter {
    /// `target` names the parameter of the linked object, e.g. `informatieobject`.
    pub fn parse(mut params: QueryParams, target: &str) -> ZrcResult<Self> {
        let filter = Self {
            zaak: params.url("zaak"),
            target: params.url(target),
        };
        params.finish()?;
        Ok(filter)
    }

    pub fn matches_informatieobject(&self, record: &ObjectInformatieObject) -> bool {
        matches_eq(&self.zaak, &record.object)
            && matches_eq(&self.target, &record.informatieobject)
    }

    pub fn matches_contactmoment(&self, urls: &ResourceUrls, record: &ZaakContactMoment) -> bool {
        matches_eq(&self.zaak, &urls.url(ZAKEN, &record.zaak))
            && matches_eq(&self.target, &record.contactmoment)
    }
}
