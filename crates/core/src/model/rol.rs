//! Involved parties of a case.
//!
//! A party is either referenced by URL (`betrokkene`) or identified inline. The inline
//! identification is a tagged union keyed by the role's `betrokkeneType`; each variant only holds
//! the attributes of that kind of party.

use crate::error::{decode, FieldError};
use crate::{ZrcError, ZrcResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use zrc_types::{Bsn, Rsin};
use zrc_uuid::ResourceUuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum BetrokkeneType {
    NatuurlijkPersoon,
    NietNatuurlijkPersoon,
    Vestiging,
    OrganisatorischeEenheid,
    Medewerker,
}

impl fmt::Display for BetrokkeneType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BetrokkeneType::NatuurlijkPersoon => "natuurlijk_persoon",
            BetrokkeneType::NietNatuurlijkPersoon => "niet_natuurlijk_persoon",
            BetrokkeneType::Vestiging => "vestiging",
            BetrokkeneType::OrganisatorischeEenheid => "organisatorische_eenheid",
            BetrokkeneType::Medewerker => "medewerker",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RolOmschrijving {
    Adviseur,
    Behandelaar,
    Belanghebbende,
    Beslisser,
    Initiator,
    Klantcontacter,
    Zaakcoordinator,
    MedeInitiator,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum IndicatieMachtiging {
    Gemachtigde,
    Machtiginggever,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NatuurlijkPersoon {
    #[schema(value_type = Option<String>)]
    pub inp_bsn: Option<Bsn>,
    pub anp_identificatie: String,
    pub inp_a_nummer: String,
    pub geslachtsnaam: String,
    pub voorvoegsel_geslachtsnaam: String,
    pub voorletters: String,
    pub voornamen: String,
    pub geslachtsaanduiding: String,
    pub geboortedatum: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct NietNatuurlijkPersoon {
    #[schema(value_type = Option<String>)]
    pub inn_nnp_id: Option<Rsin>,
    pub ann_identificatie: String,
    pub statutaire_naam: String,
    pub inn_rechtsvorm: String,
    pub bezoekadres: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Vestiging {
    pub vestigings_nummer: String,
    pub handelsnaam: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct OrganisatorischeEenheid {
    pub identificatie: String,
    pub naam: String,
    pub is_gehuisvest_in: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct Medewerker {
    pub identificatie: String,
    pub achternaam: String,
    pub voorletters: String,
    pub voorvoegsel_achternaam: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BetrokkeneIdentificatie {
    NatuurlijkPersoon(NatuurlijkPersoon),
    NietNatuurlijkPersoon(NietNatuurlijkPersoon),
    Vestiging(Vestiging),
    OrganisatorischeEenheid(OrganisatorischeEenheid),
    Medewerker(Medewerker),
}

impl BetrokkeneIdentificatie {
    pub fn betrokkene_type(&self) -> BetrokkeneType {
        match self {
            BetrokkeneIdentificatie::NatuurlijkPersoon(_) => BetrokkeneType::NatuurlijkPersoon,
            BetrokkeneIdentificatie::NietNatuurlijkPersoon(_) => {
                BetrokkeneType::NietNatuurlijkPersoon
            }
            BetrokkeneIdentificatie::Vestiging(_) => BetrokkeneType::Vestiging,
            BetrokkeneIdentificatie::OrganisatorischeEenheid(_) => {
                BetrokkeneType::OrganisatorischeEenheid
            }
            BetrokkeneIdentificatie::Medewerker(_) => BetrokkeneType::Medewerker,
        }
    }

    /// Decodes the inline identification of a party of the given kind.
    ///
    /// Field errors are reported under `field`, e.g. `betrokkeneIdentificatie.inpBsn`.
    pub fn decode(field: &str, betrokkene_type: BetrokkeneType, value: Value) -> ZrcResult<Self> {
        let decoded = match betrokkene_type {
            BetrokkeneType::NatuurlijkPersoon => decode(value).map(Self::NatuurlijkPersoon),
            BetrokkeneType::NietNatuurlijkPersoon => {
                decode(value).map(Self::NietNatuurlijkPersoon)
            }
            BetrokkeneType::Vestiging => decode(value).map(Self::Vestiging),
            BetrokkeneType::OrganisatorischeEenheid => {
                decode(value).map(Self::OrganisatorischeEenheid)
            }
            BetrokkeneType::Medewerker => decode(value).map(Self::Medewerker),
        };
        decoded.map_err(|err| match err {
            ZrcError::Validation(errors) => ZrcError::Validation(
                errors
                    .into_iter()
                    .map(|e| FieldError {
                        name: nested_name(field, &e.name),
                        ..e
                    })
                    .collect(),
            ),
            other => other,
        })
    }

    pub fn natuurlijk_persoon(&self) -> Option<&NatuurlijkPersoon> {
        match self {
            BetrokkeneIdentificatie::NatuurlijkPersoon(p) => Some(p),
            _ => None,
        }
    }

    pub fn niet_natuurlijk_persoon(&self) -> Option<&NietNatuurlijkPersoon> {
        match self {
            BetrokkeneIdentificatie::NietNatuurlijkPersoon(p) => Some(p),
            _ => None,
        }
    }

    pub fn vestiging(&self) -> Option<&Vestiging> {
        match self {
            BetrokkeneIdentificatie::Vestiging(v) => Some(v),
            _ => None,
        }
    }

    pub fn organisatorische_eenheid(&self) -> Option<&OrganisatorischeEenheid> {
        match self {
            BetrokkeneIdentificatie::OrganisatorischeEenheid(o) => Some(o),
            _ => None,
        }
    }

    pub fn medewerker(&self) -> Option<&Medewerker> {
        match self {
            BetrokkeneIdentificatie::Medewerker(m) => Some(m),
            _ => None,
        }
    }
}

fn nested_name(field: &str, inner: &str) -> String {
    if inner == crate::constants::NON_FIELD_ERRORS {
        field.to_owned()
    } else {
        format!("{field}.{inner}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rol {
    pub uuid: ResourceUuid,
    pub seq: u64,
    pub etag: String,
    pub zaak: ResourceUuid,
    pub betrokkene: Option<String>,
    pub betrokkene_type: BetrokkeneType,
    pub rolomschrijving: RolOmschrijving,
    pub roltoelichting: String,
    pub indicatie_machtiging: Option<IndicatieMachtiging>,
    pub registratiedatum: DateTime<Utc>,
    pub betrokkene_identificatie: Option<BetrokkeneIdentificatie>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_picks_variant_from_betrokkene_type() {
        let identificatie = BetrokkeneIdentificatie::decode(
            "betrokkeneIdentificatie",
            BetrokkeneType::NatuurlijkPersoon,
            json!({"inpBsn": "111222333", "geslachtsnaam": "Jansen"}),
        )
        .unwrap();

        assert_eq!(
            identificatie.betrokkene_type(),
            BetrokkeneType::NatuurlijkPersoon
        );
        let persoon = identificatie.natuurlijk_persoon().unwrap();
        assert_eq!(persoon.inp_bsn.as_ref().unwrap().as_str(), "111222333");
        assert!(identificatie.medewerker().is_none());
    }

    #[test]
    fn test_decode_reports_nested_field_name() {
        let err = BetrokkeneIdentificatie::decode(
            "betrokkeneIdentificatie",
            BetrokkeneType::NatuurlijkPersoon,
            json!({"inpBsn": "123456789"}),
        )
        .unwrap_err();

        match err {
            ZrcError::Validation(errors) => {
                assert_eq!(errors[0].name, "betrokkeneIdentificatie.inpBsn");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_serializes_without_discriminant() {
        let identificatie = BetrokkeneIdentificatie::Medewerker(Medewerker {
            identificatie: "12345".into(),
            ..Medewerker::default()
        });
        let value = serde_json::to_value(&identificatie).unwrap();
        assert_eq!(value["identificatie"], "12345");
        assert!(value.get("medewerker").is_none());
    }
}
