//! The case registry service.
//!
//! [`ZaakRegistry`] owns the tables and the registry clients and exposes one async operation per
//! resource action. Every operation takes the caller's [`AuthContext`]; scope checks come first,
//! then existence, then the instance filter of the (parent) case. Writes run inside a single
//! [`Transaction`](crate::store::Transaction): external lookups, the record change and every
//! derived-field recomputation either all land or none do. No lock is held while a registry is
//! consulted; a write that loses the race to commit is run again on fresh data.

mod besluiten;
mod contactmomenten;
mod eigenschappen;
mod informatieobjecten;
mod resultaten;
mod rollen;
mod statussen;
mod zaken;

#[cfg(test)]
pub(crate) mod testing;

use crate::archief::{self, BrondatumContext};
use crate::autorisatie::{AuthContext, Scope};
use crate::config::CoreConfig;
use crate::constants::{CODE_BAD_URL, CODE_DOES_NOT_EXIST, ZAKEN};
use crate::model::{Record, Zaak};
use crate::registry::{Besluiten, Catalogi, Documenten, Referentielijsten, Registries};
use crate::store::{Store, Tables};
use crate::{ZrcError, ZrcResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use zrc_uuid::{ResourceUrls, ResourceUuid};

/// Scopes that allow reading cases and everything nested under them.
pub(crate) const READ: &[Scope] = &[Scope::ZakenLezen];

/// Scopes that allow attaching things to an existing case.
pub(crate) const ATTACH: &[Scope] = &[Scope::ZakenAanmaken, Scope::ZakenBijwerken];

pub(crate) const UPDATE: &[Scope] = &[Scope::ZakenBijwerken];

/// How many times a write runs before a commit conflict is reported to the caller.
const WRITE_ATTEMPTS: usize = 8;

#[derive(Clone)]
pub struct ZaakRegistry {
    cfg: Arc<CoreConfig>,
    catalogi: Arc<dyn Catalogi>,
    besluiten: Arc<dyn Besluiten>,
    documenten: Arc<dyn Documenten>,
    referentielijsten: Arc<dyn Referentielijsten>,
    store: Arc<Store>,
}

impl std::fmt::Debug for ZaakRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZaakRegistry")
            .field("cfg", &self.cfg)
            .finish_non_exhaustive()
    }
}

impl ZaakRegistry {
    pub fn new(cfg: Arc<CoreConfig>, registries: Registries) -> Self {
        let Registries {
            catalogi,
            besluiten,
            documenten,
            referentielijsten,
        } = registries;
        Self {
            cfg,
            catalogi,
            besluiten,
            documenten,
            referentielijsten,
            store: Arc::new(Store::new()),
        }
    }

    pub fn config(&self) -> &CoreConfig {
        &self.cfg
    }

    fn urls(&self) -> &ResourceUrls {
        self.cfg.urls()
    }

    /// Runs a write until it commits against the tables it read.
    ///
    /// Every attempt starts from a fresh snapshot, so validations and registry lookups are
    /// repeated on the data the commit will land on.
    async fn retrying<T, F, Fut>(&self, mut attempt: F) -> ZrcResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ZrcResult<T>>,
    {
        let mut attempts = 1;
        loop {
            match attempt().await {
                Err(ZrcError::Conflict) if attempts < WRITE_ATTEMPTS => {
                    attempts += 1;
                    tracing::debug!(attempts, "tables changed during write, retrying");
                }
                result => return result,
            }
        }
    }

    /// Resolves a case URL from a request body.
    ///
    /// A URL that does not point at a case of this registry is `bad-url`; a well-formed URL of a
    /// case that does not exist is `does_not_exist`.
    fn resolve_zaak(&self, tables: &Tables, field: &str, url: &str) -> ZrcResult<ResourceUuid> {
        let uuid = self.urls().resolve(ZAKEN, url).map_err(|_| {
            ZrcError::field(field, CODE_BAD_URL, format!("'{url}' is geen zaak URL."))
        })?;
        if !tables.zaken.contains_key(&uuid) {
            return Err(ZrcError::field(
                field,
                CODE_DOES_NOT_EXIST,
                format!("Zaak '{url}' bestaat niet."),
            ));
        }
        Ok(uuid)
    }

    /// Recomputes the archival date of a case and of the sub-cases that may depend on it, then
    /// refreshes their entity tags.
    async fn recompute_archief(&self, tables: &mut Tables, zaak: ResourceUuid) -> ZrcResult<()> {
        let mut targets = vec![zaak];
        targets.extend(tables.deelzaken_of(zaak).into_iter().map(|d| d.uuid));

        for uuid in &targets {
            self.recompute_archiefactiedatum(tables, *uuid).await?;
        }
        for uuid in &targets {
            tables.refresh_zaak_etag(self.urls(), *uuid);
        }
        Ok(())
    }

    async fn recompute_archiefactiedatum(
        &self,
        tables: &mut Tables,
        uuid: ResourceUuid,
    ) -> ZrcResult<()> {
        let Some(record) = tables.zaken.get(&uuid) else {
            return Ok(());
        };
        let Some(termijn) = record.bewaartermijn.clone() else {
            if let Some(record) = tables.zaken.get_mut(&uuid) {
                record.archiefactiedatum = None;
            }
            return Ok(());
        };
        let einddatum = record.einddatum;
        let hoofdzaak_einddatum = record
            .hoofdzaak
            .and_then(|h| tables.zaken.get(&h))
            .and_then(|h| h.einddatum);

        // Only the most recently linked decision is consulted.
        let latest_besluit = tables.besluiten_of(uuid).last().map(|b| b.besluit.clone());
        let mut besluiten = Vec::new();
        if termijn.afleidingswijze.needs_besluiten() && einddatum.is_some() {
            if let Some(url) = latest_besluit {
                besluiten.push(self.besluiten.besluit(&url).await?);
            }
        }

        let eigenschappen = tables.eigenschappen_of(uuid);
        let ctx = BrondatumContext {
            einddatum,
            hoofdzaak_einddatum,
            eigenschappen: eigenschappen
                .iter()
                .map(|e| (e.naam.as_str(), e.waarde.as_str()))
                .collect(),
            besluiten: &besluiten,
        };
        let datum = archief::archiefactiedatum(&termijn, &ctx)?;

        if let Some(record) = tables.zaken.get_mut(&uuid) {
            record.archiefactiedatum = datum;
            if datum.is_some() {
                if let Some(nominatie) = termijn.archiefnominatie {
                    record.archiefnominatie = Some(nominatie);
                }
            }
        }
        Ok(())
    }
}

/// Looks up a record, failing with [`ZrcError::NotFound`].
pub(crate) fn get<T: Record>(table: &BTreeMap<ResourceUuid, T>, uuid: ResourceUuid) -> ZrcResult<&T> {
    table.get(&uuid).ok_or(ZrcError::NotFound)
}

/// The case a sub-resource hangs off, after checking the caller may act on it.
pub(crate) fn parent_zaak<'t>(
    tables: &'t Tables,
    auth: &AuthContext,
    scopes: &[Scope],
    zaak: ResourceUuid,
) -> ZrcResult<&'t Zaak> {
    let zaak = get(&tables.zaken, zaak)?;
    auth.require_access(scopes, &zaak.zaaktype, zaak.vertrouwelijkheidaanduiding)?;
    Ok(zaak)
}

/// Is the parent case of a listed sub-resource visible to the caller?
pub(crate) fn zaak_visible(tables: &Tables, auth: &AuthContext, zaak: ResourceUuid) -> bool {
    tables
        .zaken
        .get(&zaak)
        .is_some_and(|z| auth.permits(&z.zaaktype, z.vertrouwelijkheidaanduiding))
}

/// Applies a partial update: top-level members of `patch` replace those of `current`.
pub(crate) fn merge_patch(current: Value, patch: Value) -> ZrcResult<Value> {
    let Value::Object(patch) = patch else {
        return Err(ZrcError::field(
            crate::constants::NON_FIELD_ERRORS,
            "invalid",
            "Verwacht een JSON object.",
        ));
    };
    let mut merged = match current {
        Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    merged.extend(patch);
    Ok(Value::Object(merged))
}
