//! Fixtures shared by the repository tests.

use super::ZaakRegistry;
use crate::autorisatie::{AuthContext, Autorisatie, Scope};
use crate::config::CoreConfig;
use crate::registry::{InMemoryRegistry, Registries};
use crate::vertrouwelijkheid::VertrouwelijkheidAanduiding;
use crate::wire::{StatusBody, Versioned, ZaakBody};
use serde_json::{json, Value};
use std::sync::Arc;

pub const BASE: &str = "http://testserver/api/v1";
pub const ZAAKTYPE: &str = "https://ztc.example/api/v1/zaaktypen/1";
pub const DEELZAAKTYPE: &str = "https://ztc.example/api/v1/zaaktypen/2";
pub const STATUSTYPE: &str = "https://ztc.example/api/v1/statustypen/1";
pub const STATUSTYPE_EIND: &str = "https://ztc.example/api/v1/statustypen/2";
pub const RESULTAATTYPE: &str = "https://ztc.example/api/v1/resultaattypen/1";
pub const RESULTAATTYPE_BESLUIT: &str = "https://ztc.example/api/v1/resultaattypen/2";
pub const EIGENSCHAP: &str = "https://ztc.example/api/v1/eigenschappen/1";
pub const BESLUIT: &str = "https://brc.example/api/v1/besluiten/1";
pub const BESLUIT_LATER: &str = "https://brc.example/api/v1/besluiten/2";
pub const DOCUMENT: &str = "https://drc.example/api/v1/enkelvoudiginformatieobjecten/1";
pub const KANAAL: &str = "https://ref.example/api/v1/communicatiekanalen/1";
pub const RSIN: &str = "517439943";

pub fn fixtures() -> InMemoryRegistry {
    let registry = InMemoryRegistry::new();
    registry.insert(
        ZAAKTYPE,
        json!({
            "url": ZAAKTYPE,
            "vertrouwelijkheidaanduiding": "openbaar",
            "deelzaaktypen": [DEELZAAKTYPE],
            "productenOfDiensten": ["https://example.com/product/123"],
        }),
    );
    registry.insert(
        DEELZAAKTYPE,
        json!({"url": DEELZAAKTYPE, "vertrouwelijkheidaanduiding": "intern"}),
    );
    registry.insert(
        STATUSTYPE,
        json!({"url": STATUSTYPE, "zaaktype": ZAAKTYPE, "volgnummer": 1, "isEindstatus": false}),
    );
    registry.insert(
        STATUSTYPE_EIND,
        json!({"url": STATUSTYPE_EIND, "zaaktype": ZAAKTYPE, "volgnummer": 2, "isEindstatus": true}),
    );
    registry.insert(
        RESULTAATTYPE,
        json!({
            "url": RESULTAATTYPE,
            "zaaktype": ZAAKTYPE,
            "archiefactietermijn": "P10Y",
            "archiefnominatie": "blijvend_bewaren",
            "brondatumArchiefprocedure": {"afleidingswijze": "afgehandeld"},
        }),
    );
    registry.insert(
        RESULTAATTYPE_BESLUIT,
        json!({
            "url": RESULTAATTYPE_BESLUIT,
            "zaaktype": ZAAKTYPE,
            "archiefactietermijn": "P10Y",
            "archiefnominatie": "vernietigen",
            "brondatumArchiefprocedure": {"afleidingswijze": "ingangsdatum_besluit"},
        }),
    );
    registry.insert(
        EIGENSCHAP,
        json!({"url": EIGENSCHAP, "naam": "brondatum", "zaaktype": ZAAKTYPE}),
    );
    registry.insert(
        BESLUIT,
        json!({"url": BESLUIT, "ingangsdatum": "2018-03-01"}),
    );
    registry.insert(
        BESLUIT_LATER,
        json!({"url": BESLUIT_LATER, "ingangsdatum": "2020-05-03"}),
    );
    registry.insert(
        DOCUMENT,
        json!({"url": DOCUMENT, "identificatie": "DOC-2018-1"}),
    );
    registry.insert(
        KANAAL,
        json!({"url": KANAAL, "naam": "E-mail", "omschrijving": "Contact per e-mail"}),
    );
    registry
}

pub fn registry() -> ZaakRegistry {
    registry_with(Registries::shared(Arc::new(fixtures())))
}

/// A registry whose lookups go to `registries` instead of the plain fixtures.
pub fn registry_with(registries: Registries) -> ZaakRegistry {
    let cfg = Arc::new(CoreConfig::new(BASE, 2).unwrap());
    ZaakRegistry::new(cfg, registries)
}

pub fn superuser() -> AuthContext {
    AuthContext::superuser("superuser")
}

pub fn client(scopes: &[Scope], max: VertrouwelijkheidAanduiding) -> AuthContext {
    AuthContext {
        client_id: "client".into(),
        heeft_alle_autorisaties: false,
        scopes: scopes.iter().copied().collect(),
        autorisaties: vec![Autorisatie {
            zaaktype: ZAAKTYPE.into(),
            max_vertrouwelijkheidaanduiding: max,
        }],
    }
}

pub fn zaak_body() -> Value {
    json!({
        "zaaktype": ZAAKTYPE,
        "bronorganisatie": RSIN,
        "verantwoordelijkeOrganisatie": RSIN,
        "startdatum": "2018-06-11",
        "omschrijving": "Melding openbare ruimte",
    })
}

pub async fn create_zaak(registry: &ZaakRegistry) -> Versioned<ZaakBody> {
    registry.create_zaak(&superuser(), zaak_body()).await.unwrap()
}

pub async fn set_status(
    registry: &ZaakRegistry,
    zaak: &ZaakBody,
    statustype: &str,
    datum: &str,
) -> Versioned<StatusBody> {
    registry
        .create_status(
            &superuser(),
            json!({"zaak": zaak.url, "statustype": statustype, "datumStatusGezet": datum}),
        )
        .await
        .unwrap()
}
