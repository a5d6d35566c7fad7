use crate::archief::{Archiefnominatie, Bewaartermijn};
use crate::constants::CODE_INVALID_GEOMETRY;
use crate::error::FieldError;
use crate::vertrouwelijkheid::VertrouwelijkheidAanduiding;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use zrc_types::Rsin;
use zrc_uuid::ResourceUuid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Betalingsindicatie {
    Nvt,
    NogNiet,
    Gedeeltelijk,
    Geheel,
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Archiefstatus {
    #[default]
    NogTeArchiveren,
    Gearchiveerd,
    GearchiveerdProcestermijnOnbekend,
    Overgedragen,
}

const GEOMETRY_TYPES: [&str; 7] = [
    "Point",
    "MultiPoint",
    "LineString",
    "MultiLineString",
    "Polygon",
    "MultiPolygon",
    "GeometryCollection",
];

/// A GeoJSON geometry in EPSG:4326.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Geometry(Value);

impl Geometry {
    /// Accepts a GeoJSON geometry object, reporting problems against `field`.
    pub fn from_value(field: &str, value: Value) -> Result<Self, FieldError> {
        let invalid = |reason: &str| FieldError::new(field, CODE_INVALID_GEOMETRY, reason);
        let Some(object) = value.as_object() else {
            return Err(invalid("Geometrie moet een GeoJSON object zijn."));
        };
        let kind = object.get("type").and_then(Value::as_str).unwrap_or_default();
        if !GEOMETRY_TYPES.contains(&kind) {
            return Err(invalid("Onbekend geometrie type."));
        }
        let member = if kind == "GeometryCollection" {
            "geometries"
        } else {
            "coordinates"
        };
        if !object.get(member).is_some_and(Value::is_array) {
            return Err(invalid("Geometrie mist coördinaten."));
        }
        Ok(Self(value))
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Zaak {
    pub uuid: ResourceUuid,
    pub seq: u64,
    pub etag: String,
    pub identificatie: String,
    pub bronorganisatie: Rsin,
    pub omschrijving: String,
    pub toelichting: String,
    pub zaaktype: String,
    pub registratiedatum: NaiveDate,
    pub verantwoordelijke_organisatie: Rsin,
    pub startdatum: NaiveDate,
    /// Derived from the latest status.
    pub einddatum: Option<NaiveDate>,
    pub einddatum_gepland: Option<NaiveDate>,
    pub uiterlijke_einddatum_afdoening: Option<NaiveDate>,
    pub publicatiedatum: Option<NaiveDate>,
    pub communicatiekanaal: Option<String>,
    pub producten_of_diensten: Vec<String>,
    pub vertrouwelijkheidaanduiding: VertrouwelijkheidAanduiding,
    pub betalingsindicatie: Option<Betalingsindicatie>,
    pub laatste_betaaldatum: Option<DateTime<Utc>>,
    pub zaakgeometrie: Option<Geometry>,
    pub hoofdzaak: Option<ResourceUuid>,
    pub archiefnominatie: Option<Archiefnominatie>,
    pub archiefstatus: Archiefstatus,
    /// Derived from the end date and the retention metadata.
    pub archiefactiedatum: Option<NaiveDate>,
    /// Copied from the result-type when the result is registered.
    pub bewaartermijn: Option<Bewaartermijn>,
}

impl Zaak {
    pub fn is_closed(&self) -> bool {
        self.einddatum.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_geometry_accepts_point_and_collection() {
        Geometry::from_value(
            "zaakgeometrie",
            json!({"type": "Point", "coordinates": [4.910649523925713, 52.37240093589432]}),
        )
        .unwrap();
        Geometry::from_value(
            "zaakgeometrie",
            json!({"type": "GeometryCollection", "geometries": []}),
        )
        .unwrap();
    }

    #[test]
    fn test_geometry_rejects_unknown_type_and_missing_coordinates() {
        let err = Geometry::from_value("zaakgeometrie", json!({"type": "Circle"})).unwrap_err();
        assert_eq!(err.code, CODE_INVALID_GEOMETRY);

        let err = Geometry::from_value("zaakgeometrie", json!({"type": "Point"})).unwrap_err();
        assert_eq!(err.name, "zaakgeometrie");

        assert!(Geometry::from_value("zaakgeometrie", json!("POINT (1 2)")).is_err());
    }
}
