//! Archival (retention) date derivation.
//!
//! When a case has both an end date and retention metadata copied from its result-type, the
//! archival action date is `brondatum + archiefactietermijn`. How the brondatum is obtained
//! depends on the result-type's `afleidingswijze`; every kind is handled explicitly below and
//! kinds that cannot be derived automatically either leave the date empty (manual kinds) or
//! fail as a configuration error.

use crate::registry::{Besluit, Resultaattype};
use crate::{ZrcError, ZrcResult};
use chrono::{DateTime, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ArchiefError {
    #[error("invalid ISO-8601 duration '{0}'")]
    InvalidDuration(String),
    #[error("afleidingswijze '{0}' cannot be derived automatically")]
    UnsupportedAfleidingswijze(Afleidingswijze),
    #[error("case property '{naam}' holds '{waarde}', which is not a date")]
    InvalidEigenschapDatum { naam: String, waarde: String },
    #[error("date arithmetic overflowed")]
    Overflow,
}

impl From<ArchiefError> for ZrcError {
    fn from(err: ArchiefError) -> Self {
        match err {
            ArchiefError::UnsupportedAfleidingswijze(_) => ZrcError::Configuration(err.to_string()),
            other => ZrcError::rule(
                crate::constants::CODE_ARCHIEFACTIEDATUM_ERROR,
                other.to_string(),
            ),
        }
    }
}

/// A calendar period such as `P10Y`, `P1Y6M` or `P2W`.
///
/// Only date components are accepted, and weeks cannot be combined with the other components. Years and months are added as calendar months (clamping
/// to the end of a shorter month), weeks and days as whole days.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IsoDuration {
    pub years: u32,
    pub months: u32,
    pub weeks: u32,
    pub days: u32,
}

impl IsoDuration {
    pub fn add_to(&self, date: NaiveDate) -> Result<NaiveDate, ArchiefError> {
        let months = self
            .years
            .checked_mul(12)
            .and_then(|m| m.checked_add(self.months))
            .ok_or(ArchiefError::Overflow)?;
        let days = u64::from(self.weeks) * 7 + u64::from(self.days);

        date.checked_add_months(Months::new(months))
            .and_then(|d| d.checked_add_days(Days::new(days)))
            .ok_or(ArchiefError::Overflow)
    }
}

impl FromStr for IsoDuration {
    type Err = ArchiefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ArchiefError::InvalidDuration(s.to_owned());
        let body = s.strip_prefix('P').ok_or_else(invalid)?;
        if body.is_empty() {
            return Err(invalid());
        }

        let mut duration = IsoDuration::default();
        let mut number = String::new();
        // Index into "YMWD"; designators must appear in that order, each at most once.
        let mut next_unit = 0;

        for c in body.chars() {
            if c.is_ascii_digit() {
                number.push(c);
                continue;
            }
            let position = "YMWD".find(c).ok_or_else(invalid)?;
            if number.is_empty() || position < next_unit {
                return Err(invalid());
            }
            let value: u32 = number.parse().map_err(|_| invalid())?;
            match c {
                'Y' => duration.years = value,
                'M' => duration.months = value,
                'W' => duration.weeks = value,
                _ => duration.days = value,
            }
            number.clear();
            next_unit = position + 1;
        }

        if !number.is_empty() {
            return Err(invalid());
        }
        // The week form stands alone.
        if body.contains('W') && body.contains(&['Y', 'M', 'D'][..]) {
            return Err(invalid());
        }
        Ok(duration)
    }
}

impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("P")?;
        let parts = [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ];
        let mut written = false;
        for (value, unit) in parts {
            if value > 0 {
                write!(f, "{value}{unit}")?;
                written = true;
            }
        }
        if !written {
            f.write_str("0D")?;
        }
        Ok(())
    }
}

/// How the brondatum (basis date) of the archival procedure is derived.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Afleidingswijze {
    Afgehandeld,
    AnderDatumkenmerk,
    Eigenschap,
    GerelateerdeZaak,
    Hoofdzaak,
    IngangsdatumBesluit,
    Termijn,
    VervaldatumBesluit,
    Zaakobject,
}

impl Afleidingswijze {
    /// True when the linked decisions must be fetched to derive the brondatum.
    pub fn needs_besluiten(&self) -> bool {
        matches!(
            self,
            Afleidingswijze::IngangsdatumBesluit | Afleidingswijze::VervaldatumBesluit
        )
    }
}

impl fmt::Display for Afleidingswijze {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Afleidingswijze::Afgehandeld => "afgehandeld",
            Afleidingswijze::AnderDatumkenmerk => "ander_datumkenmerk",
            Afleidingswijze::Eigenschap => "eigenschap",
            Afleidingswijze::GerelateerdeZaak => "gerelateerde_zaak",
            Afleidingswijze::Hoofdzaak => "hoofdzaak",
            Afleidingswijze::IngangsdatumBesluit => "ingangsdatum_besluit",
            Afleidingswijze::Termijn => "termijn",
            Afleidingswijze::VervaldatumBesluit => "vervaldatum_besluit",
            Afleidingswijze::Zaakobject => "zaakobject",
        };
        f.write_str(name)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Archiefnominatie {
    BlijvendBewaren,
    Vernietigen,
}

/// Retention metadata copied onto a case when its result is registered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bewaartermijn {
    pub archiefactietermijn: Option<IsoDuration>,
    pub archiefnominatie: Option<Archiefnominatie>,
    pub afleidingswijze: Afleidingswijze,
    pub datumkenmerk: Option<String>,
    pub procestermijn: Option<IsoDuration>,
}

impl Bewaartermijn {
    /// Extracts the retention metadata from a fetched result-type.
    ///
    /// Returns `Ok(None)` when the result-type carries no archival procedure.
    pub fn from_resultaattype(resultaattype: &Resultaattype) -> Result<Option<Self>, ArchiefError> {
        let Some(procedure) = &resultaattype.brondatum_archiefprocedure else {
            return Ok(None);
        };

        let parse = |value: &Option<String>| -> Result<Option<IsoDuration>, ArchiefError> {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .map(str::parse)
                .transpose()
        };

        Ok(Some(Self {
            archiefactietermijn: parse(&resultaattype.archiefactietermijn)?,
            archiefnominatie: resultaattype.archiefnominatie,
            afleidingswijze: procedure.afleidingswijze,
            datumkenmerk: procedure.datumkenmerk.clone().filter(|d| !d.is_empty()),
            procestermijn: parse(&procedure.procestermijn)?,
        }))
    }
}

/// Case data the brondatum may be derived from.
#[derive(Clone, Debug, Default)]
pub struct BrondatumContext<'a> {
    pub einddatum: Option<NaiveDate>,
    pub hoofdzaak_einddatum: Option<NaiveDate>,
    /// (naam, waarde) pairs of the case's properties.
    pub eigenschappen: Vec<(&'a str, &'a str)>,
    /// Linked decisions, oldest link first.
    pub besluiten: &'a [Besluit],
}

fn parse_datumkenmerk(naam: &str, waarde: &str) -> Result<NaiveDate, ArchiefError> {
    NaiveDate::parse_from_str(waarde, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(waarde).map(|dt| dt.date_naive()))
        .map_err(|_| ArchiefError::InvalidEigenschapDatum {
            naam: naam.to_owned(),
            waarde: waarde.to_owned(),
        })
}

/// Derives the brondatum, or `None` when a required input is missing.
pub fn brondatum(
    termijn: &Bewaartermijn,
    ctx: &BrondatumContext<'_>,
) -> Result<Option<NaiveDate>, ArchiefError> {
    match termijn.afleidingswijze {
        Afleidingswijze::Afgehandeld => Ok(ctx.einddatum),
        Afleidingswijze::Termijn => match (ctx.einddatum, termijn.procestermijn) {
            (Some(einddatum), Some(procestermijn)) => procestermijn.add_to(einddatum).map(Some),
            _ => Ok(None),
        },
        Afleidingswijze::Hoofdzaak => Ok(ctx.hoofdzaak_einddatum),
        Afleidingswijze::Eigenschap => {
            let Some(kenmerk) = termijn.datumkenmerk.as_deref() else {
                return Ok(None);
            };
            ctx.eigenschappen
                .iter()
                .find(|(naam, _)| *naam == kenmerk)
                .map(|(naam, waarde)| parse_datumkenmerk(naam, waarde))
                .transpose()
        }
        Afleidingswijze::IngangsdatumBesluit => {
            Ok(ctx.besluiten.last().and_then(|besluit| besluit.ingangsdatum))
        }
        Afleidingswijze::VervaldatumBesluit => {
            Ok(ctx.besluiten.last().and_then(|besluit| besluit.vervaldatum))
        }
        Afleidingswijze::AnderDatumkenmerk | Afleidingswijze::GerelateerdeZaak => Ok(None),
        Afleidingswijze::Zaakobject => Err(ArchiefError::UnsupportedAfleidingswijze(
            termijn.afleidingswijze,
        )),
    }
}

/// Computes `brondatum + archiefactietermijn`.
///
/// An archival date only exists for a closed case; with no end date the result is `None`
/// regardless of the basis kind.
pub fn archiefactiedatum(
    termijn: &Bewaartermijn,
    ctx: &BrondatumContext<'_>,
) -> ZrcResult<Option<NaiveDate>> {
    if ctx.einddatum.is_none() {
        return Ok(None);
    }
    let Some(actietermijn) = termijn.archiefactietermijn else {
        return Ok(None);
    };
    match brondatum(termijn, ctx)? {
        Some(basis) => Ok(Some(actietermijn.add_to(basis)?)),
        None => Ok(None),
    }
}
