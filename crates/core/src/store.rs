//! Transactional in-memory storage.
//!
//! All records live in one [`Tables`] value behind an async `RwLock`. A write snapshots the
//! tables under a short read lock and works on that staging copy without holding any lock, so
//! registry lookups made during the write never stall readers or other writers. On
//! [`Transaction::commit`] the write lock is taken only to compare versions and swap the copy
//! in; when another write committed in between, the commit fails with [`ZrcError::Conflict`]
//! and the caller retries against fresh data. Dropping a transaction (for instance on an early
//! `?` return) discards every change it made. Derived fields are recomputed on the staging copy
//! before commit, so readers never observe an end date, archival date or entity tag that
//! disagrees with the rest of the record.

use crate::error::{ZrcError, ZrcResult};
use crate::etag;
use crate::model::{
    ObjectInformatieObject, Record, Resultaat, Rol, Status, Zaak, ZaakBesluit, ZaakContactMoment,
    ZaakEigenschap,
};
use crate::wire;
use std::collections::BTreeMap;
use std::ops::{Deref, DerefMut};
use tokio::sync::{RwLock, RwLockReadGuard};
use zrc_uuid::{ResourceUrls, ResourceUuid};

#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub zaken: BTreeMap<ResourceUuid, Zaak>,
    pub statussen: BTreeMap<ResourceUuid, Status>,
    pub resultaten: BTreeMap<ResourceUuid, Resultaat>,
    pub rollen: BTreeMap<ResourceUuid, Rol>,
    pub eigenschappen: BTreeMap<ResourceUuid, ZaakEigenschap>,
    pub besluiten: BTreeMap<ResourceUuid, ZaakBesluit>,
    pub informatieobjecten: BTreeMap<ResourceUuid, ObjectInformatieObject>,
    pub contactmomenten: BTreeMap<ResourceUuid, ZaakContactMoment>,
    next_seq: u64,
    version: u64,
}

/// Records of `table` matching `keep`, in creation order.
pub fn in_creation_order<'a, T, F>(table: &'a BTreeMap<ResourceUuid, T>, keep: F) -> Vec<&'a T>
where
    T: Record,
    F: Fn(&T) -> bool,
{
    let mut records: Vec<&T> = table.values().filter(|r| keep(r)).collect();
    records.sort_by_key(|r| r.seq());
    records
}

impl Tables {
    pub fn next_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }

    pub fn statussen_of(&self, zaak: ResourceUuid) -> Vec<&Status> {
        in_creation_order(&self.statussen, |s| s.zaak == zaak)
    }

    /// The most recently created status, which alone decides whether the case is closed.
    pub fn latest_status(&self, zaak: ResourceUuid) -> Option<&Status> {
        self.statussen
            .values()
            .filter(|s| s.zaak == zaak)
            .max_by_key(|s| s.seq)
    }

    pub fn resultaat_of(&self, zaak: ResourceUuid) -> Option<&Resultaat> {
        self.resultaten.values().find(|r| r.zaak == zaak)
    }

    pub fn deelzaken_of(&self, zaak: ResourceUuid) -> Vec<&Zaak> {
        in_creation_order(&self.zaken, |z| z.hoofdzaak == Some(zaak))
    }

    pub fn eigenschappen_of(&self, zaak: ResourceUuid) -> Vec<&ZaakEigenschap> {
        in_creation_order(&self.eigenschappen, |e| e.zaak == zaak)
    }

    pub fn besluiten_of(&self, zaak: ResourceUuid) -> Vec<&ZaakBesluit> {
        in_creation_order(&self.besluiten, |b| b.zaak == zaak)
    }

    /// Sets the end date from the latest status. Returns true when it changed.
    pub fn apply_einddatum(&mut self, zaak: ResourceUuid) -> bool {
        let einddatum = self
            .latest_status(zaak)
            .filter(|s| s.is_eindstatus)
            .map(|s| s.datum_status_gezet.date_naive());

        match self.zaken.get_mut(&zaak) {
            Some(record) if record.einddatum != einddatum => {
                record.einddatum = einddatum;
                true
            }
            _ => false,
        }
    }

    /// Recomputes the entity tag of a case and of its parent, whose representation lists it.
    pub fn refresh_zaak_etag(&mut self, urls: &ResourceUrls, zaak: ResourceUuid) {
        let Some(record) = self.zaken.get(&zaak) else {
            return;
        };
        let hoofdzaak = record.hoofdzaak;
        let tag = etag::compute(&wire::render_zaak(self, urls, record));
        if let Some(record) = self.zaken.get_mut(&zaak) {
            record.etag = tag;
        }
        if let Some(parent) = hoofdzaak {
            self.refresh_zaak_etag(urls, parent);
        }
    }

    /// The case itself followed by its sub-cases.
    pub fn subtree(&self, zaak: ResourceUuid) -> Vec<ResourceUuid> {
        let mut uuids = vec![zaak];
        uuids.extend(self.deelzaken_of(zaak).into_iter().map(|z| z.uuid));
        uuids
    }

    /// Removes the given cases and everything that hangs off them.
    pub fn remove_zaken(&mut self, zaken: &[ResourceUuid]) {
        let gone = |zaak: &ResourceUuid| zaken.contains(zaak);
        self.zaken.retain(|uuid, _| !gone(uuid));
        self.statussen.retain(|_, s| !gone(&s.zaak));
        self.resultaten.retain(|_, r| !gone(&r.zaak));
        self.rollen.retain(|_, r| !gone(&r.zaak));
        self.eigenschappen.retain(|_, e| !gone(&e.zaak));
        self.besluiten.retain(|_, b| !gone(&b.zaak));
        self.informatieobjecten
            .retain(|_, o| !o.zaak.as_ref().is_some_and(gone));
        self.contactmomenten.retain(|_, c| !gone(&c.zaak));
    }
}

/// The shared tables.
#[derive(Debug, Default)]
pub struct Store {
    tables: RwLock<Tables>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().await
    }

    /// Starts a write on a snapshot of the current tables.
    pub async fn begin(&self) -> Transaction<'_> {
        let staging = self.tables.read().await.clone();
        Transaction {
            store: self,
            base: staging.version,
            staging,
        }
    }
}

/// A unit of work over a staging copy of the tables.
pub struct Transaction<'a> {
    store: &'a Store,
    base: u64,
    staging: Tables,
}

impl Transaction<'_> {
    /// Publishes the staging copy.
    ///
    /// # Errors
    ///
    /// Returns [`ZrcError::Conflict`] if another transaction committed after this one began.
    pub async fn commit(self) -> ZrcResult<()> {
        let Transaction {
            store,
            base,
            mut staging,
        } = self;
        let mut tables = store.tables.write().await;
        if tables.version != base {
            return Err(ZrcError::Conflict);
        }
        staging.version = base + 1;
        *tables = staging;
        Ok(())
    }
}

impl Deref for Transaction<'_> {
    type Target = Tables;

    fn deref(&self) -> &Tables {
        &self.staging
    }
}

impl DerefMut for Transaction<'_> {
    fn deref_mut(&mut self) -> &mut Tables {
        &mut self.staging
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn status(tables: &mut Tables, zaak: ResourceUuid, eind: bool, day: u32) -> Status {
        Status {
            uuid: ResourceUuid::new(),
            seq: tables.next_seq(),
            etag: String::new(),
            zaak,
            statustype: "https://ztc.example/api/v1/statustypen/1".into(),
            datum_status_gezet: Utc.with_ymd_and_hms(2018, 10, day, 10, 0, 0).unwrap(),
            statustoelichting: String::new(),
            is_eindstatus: eind,
        }
    }

    #[tokio::test]
    async fn test_dropped_transaction_discards_changes() {
        let store = Store::new();
        let zaak = ResourceUuid::new();
        {
            let mut tx = store.begin().await;
            let record = status(&mut tx, zaak, false, 1);
            tx.statussen.insert(record.uuid, record);
        }
        assert!(store.read().await.statussen.is_empty());

        let mut tx = store.begin().await;
        let record = status(&mut tx, zaak, false, 1);
        tx.statussen.insert(record.uuid, record);
        tx.commit().await.unwrap();
        assert_eq!(store.read().await.statussen.len(), 1);
    }

    #[tokio::test]
    async fn test_stale_transaction_is_rejected() {
        let store = Store::new();
        let zaak = ResourceUuid::new();

        let mut stale = store.begin().await;
        let record = status(&mut stale, zaak, false, 1);
        stale.statussen.insert(record.uuid, record);

        let mut tx = store.begin().await;
        let record = status(&mut tx, zaak, true, 2);
        let committed = record.uuid;
        tx.statussen.insert(record.uuid, record);
        tx.commit().await.unwrap();

        assert!(matches!(stale.commit().await, Err(ZrcError::Conflict)));
        let tables = store.read().await;
        assert_eq!(tables.statussen.len(), 1);
        assert!(tables.statussen.contains_key(&committed));
    }

    #[tokio::test]
    async fn test_begin_does_not_block_readers() {
        let store = Store::new();
        let _tx = store.begin().await;
        let _other = store.begin().await;
        assert!(store.read().await.zaken.is_empty());
    }

    #[test]
    fn test_latest_status_is_last_created() {
        let mut tables = Tables::default();
        let zaak = ResourceUuid::new();
        let first = status(&mut tables, zaak, true, 22);
        let second = status(&mut tables, zaak, false, 1);
        let second_uuid = second.uuid;
        tables.statussen.insert(first.uuid, first);
        tables.statussen.insert(second.uuid, second);

        assert_eq!(tables.latest_status(zaak).map(|s| s.uuid), Some(second_uuid));
        assert_eq!(tables.statussen_of(zaak).len(), 2);
    }
}
