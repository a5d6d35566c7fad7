use super::{get, parent_zaak, zaak_visible, ZaakRegistry, READ};
use crate::autorisatie::{AuthContext, Scope};
use crate::constants::CODE_ZAAKTYPE_MISMATCH;
use crate::error::{decode, FieldErrors};
use crate::etag;
use crate::filters::{QueryParams, StatusFilter};
use crate::model::Status;
use crate::store::in_creation_order;
use crate::wire::{render_status, StatusBody, StatusInput, Versioned};
use crate::{ZrcError, ZrcResult};
use serde_json::Value;
use zrc_uuid::ResourceUuid;

/// Any of these allows setting the first status of a case.
const CREATE: &[Scope] = &[
    Scope::ZakenAanmaken,
    Scope::StatussenToevoegen,
    Scope::ZakenHeropenen,
];

/// Needed for every status after the first.
const ADD: &[Scope] = &[Scope::StatussenToevoegen, Scope::ZakenHeropenen];

impl ZaakRegistry {
    pub async fn list_statussen(
        &self,
        auth: &AuthContext,
        params: Vec<(String, String)>,
    ) -> ZrcResult<Vec<StatusBody>> {
        auth.require_any_scope(READ)?;
        let filter = StatusFilter::parse(QueryParams::new(params))?;

        let tables = self.store.read().await;
        Ok(in_creation_order(&tables.statussen, |s| {
            zaak_visible(&tables, auth, s.zaak) && filter.matches(self.urls(), s)
        })
        .into_iter()
        .map(|s| render_status(self.urls(), s))
        .collect())
    }

    pub async fn retrieve_status(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<Versioned<StatusBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        let status = get(&tables.statussen, uuid)?;
        parent_zaak(&tables, auth, READ, status.zaak)?;
        Ok(Versioned {
            etag: status.etag.clone(),
            body: render_status(self.urls(), status),
        })
    }

    /// Sets a new status on a case and recomputes the derived case fields.
    ///
    /// The new status becomes the latest one: a terminal status-type closes the case with the
    /// date part of `datumStatusGezet` as end date, any other status reopens it. The archival
    /// date follows the end date.
    ///
    /// # Errors
    ///
    /// - [`ZrcError::Forbidden`] when the caller may only set the first status and the case
    ///   already has one, or when the case is closed and the caller may not reopen it.
    /// - A `bad-url` validation error when the status-type is unknown to the catalogue.
    /// - [`ZrcError::Upstream`] when the catalogue cannot be reached.
    pub async fn create_status(
        &self,
        auth: &AuthContext,
        body: Value,
    ) -> ZrcResult<Versioned<StatusBody>> {
        self.retrying(move || self.try_create_status(auth, body.clone())).await
    }

    async fn try_create_status(
        &self,
        auth: &AuthContext,
        body: Value,
    ) -> ZrcResult<Versioned<StatusBody>> {
        auth.require_any_scope(CREATE)?;
        let input: StatusInput = decode(body)?;

        let mut errors = FieldErrors::default();
        let required = (
            errors.require("zaak", input.zaak),
            errors.require("statustype", input.statustype),
            errors.require("datumStatusGezet", input.datum_status_gezet),
        );
        let (Some(zaak_url), Some(statustype_url), Some(datum_status_gezet)) = required else {
            return Err(errors.into_error());
        };

        let mut tx = self.store.begin().await;
        let zaak_uuid = self.resolve_zaak(&tx, "zaak", &zaak_url)?;
        let zaak = parent_zaak(&tx, auth, CREATE, zaak_uuid)?;

        if tx.latest_status(zaak_uuid).is_some() && !auth.has_any_scope(ADD) {
            tracing::warn!(client_id = %auth.client_id, zaak = %zaak_uuid, "only the initial status may be set");
            return Err(ZrcError::Forbidden(
                "Met de scope zaken.aanmaken mag alleen de initiële status gezet worden.".into(),
            ));
        }
        if zaak.is_closed() && !auth.has_scope(Scope::ZakenHeropenen) {
            tracing::warn!(client_id = %auth.client_id, zaak = %zaak_uuid, "reopening requires scope");
            return Err(ZrcError::Forbidden(
                "Een afgesloten zaak kan alleen heropend worden met de scope zaken.heropenen."
                    .into(),
            ));
        }
        let zaaktype = zaak.zaaktype.clone();

        let statustype = self
            .catalogi
            .statustype(&statustype_url)
            .await
            .map_err(|e| ZrcError::from_reference("statustype", e))?;
        if statustype.zaaktype.as_deref().is_some_and(|zt| zt != zaaktype) {
            return Err(ZrcError::field(
                "statustype",
                CODE_ZAAKTYPE_MISMATCH,
                "Het statustype hoort niet bij het zaaktype van de zaak.",
            ));
        }

        let mut status = Status {
            uuid: ResourceUuid::new(),
            seq: tx.next_seq(),
            etag: String::new(),
            zaak: zaak_uuid,
            statustype: statustype.url,
            datum_status_gezet,
            statustoelichting: input.statustoelichting,
            is_eindstatus: statustype.is_eindstatus,
        };
        status.etag = etag::compute(&render_status(self.urls(), &status));
        let created = Versioned {
            etag: status.etag.clone(),
            body: render_status(self.urls(), &status),
        };
        tx.statussen.insert(status.uuid, status);

        let einddatum_changed = tx.apply_einddatum(zaak_uuid);
        self.recompute_archief(&mut tx, zaak_uuid).await?;
        tx.commit().await?;

        tracing::info!(
            zaak = %zaak_uuid,
            eindstatus = statustype.is_eindstatus,
            einddatum_changed,
            "status set"
        );
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::archief::Archiefnominatie;
    use crate::autorisatie::Scope;
    use crate::vertrouwelijkheid::VertrouwelijkheidAanduiding::Openbaar;
    use crate::registry::{
        Besluit, Besluiten, Catalogi, Eigenschap, InMemoryRegistry, Registries, RegistryError,
        RegistryResult, Resultaattype, Statustype, Zaaktype,
    };
    use crate::ZrcError;
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use serde_json::json;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    /// Holds the first status-type lookup until released.
    struct GatedCatalogi {
        inner: Arc<InMemoryRegistry>,
        armed: AtomicBool,
        entered: Notify,
        release: Notify,
        statustype_calls: AtomicUsize,
    }

    #[async_trait]
    impl Catalogi for GatedCatalogi {
        async fn zaaktype(&self, url: &str) -> RegistryResult<Zaaktype> {
            self.inner.zaaktype(url).await
        }

        async fn statustype(&self, url: &str) -> RegistryResult<Statustype> {
            self.statustype_calls.fetch_add(1, Ordering::SeqCst);
            if self.armed.swap(false, Ordering::SeqCst) {
                self.entered.notify_one();
                self.release.notified().await;
            }
            self.inner.statustype(url).await
        }

        async fn resultaattype(&self, url: &str) -> RegistryResult<Resultaattype> {
            self.inner.resultaattype(url).await
        }

        async fn eigenschap(&self, url: &str) -> RegistryResult<Eigenschap> {
            self.inner.eigenschap(url).await
        }
    }

    /// A decision registry that can be switched off.
    struct FlakyBesluiten {
        inner: Arc<InMemoryRegistry>,
        available: AtomicBool,
    }

    #[async_trait]
    impl Besluiten for FlakyBesluiten {
        async fn besluit(&self, url: &str) -> RegistryResult<Besluit> {
            if !self.available.load(Ordering::SeqCst) {
                return Err(RegistryError::Status {
                    url: url.to_owned(),
                    status: 503,
                });
            }
            self.inner.besluit(url).await
        }
    }

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[tokio::test]
    async fn test_closing_sets_einddatum_and_archiefactiedatum() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;
        let uuid = zaak.body.uuid.parse().unwrap();

        registry
            .create_resultaat(
                &superuser(),
                json!({"zaak": zaak.body.url, "resultaattype": RESULTAATTYPE}),
            )
            .await
            .unwrap();
        set_status(&registry, &zaak.body, STATUSTYPE, "2018-10-01T10:00:00Z").await;
        let open = registry.retrieve_zaak(&superuser(), uuid).await.unwrap();
        assert!(open.body.einddatum.is_none());
        assert!(open.body.archiefactiedatum.is_none());

        set_status(&registry, &zaak.body, STATUSTYPE_EIND, "2018-10-22T10:00:00Z").await;

        let closed = registry.retrieve_zaak(&superuser(), uuid).await.unwrap();
        assert_eq!(closed.body.einddatum, date(2018, 10, 22));
        assert_eq!(closed.body.archiefactiedatum, date(2028, 10, 22));
        assert_eq!(
            closed.body.archiefnominatie,
            Some(Archiefnominatie::BlijvendBewaren)
        );
        assert_ne!(open.etag, closed.etag);
    }

    #[tokio::test]
    async fn test_initial_status_only_with_create_scope() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;
        let client = client(&[Scope::ZakenAanmaken, Scope::ZakenLezen], Openbaar);
        let body = json!({
            "zaak": zaak.body.url,
            "statustype": STATUSTYPE,
            "datumStatusGezet": "2018-10-18T20:00:00Z",
        });

        registry.create_status(&client, body.clone()).await.unwrap();
        let err = registry.create_status(&client, body).await.unwrap_err();

        assert!(matches!(err, ZrcError::Forbidden(_)));
        let statussen = registry.list_statussen(&client, vec![]).await.unwrap();
        assert_eq!(statussen.len(), 1);
    }

    #[tokio::test]
    async fn test_reopen_requires_scope_and_clears_derived_dates() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;
        let uuid = zaak.body.uuid.parse().unwrap();
        registry
            .create_resultaat(
                &superuser(),
                json!({"zaak": zaak.body.url, "resultaattype": RESULTAATTYPE}),
            )
            .await
            .unwrap();
        set_status(&registry, &zaak.body, STATUSTYPE_EIND, "2018-10-22T10:00:00Z").await;

        let reopen = json!({
            "zaak": zaak.body.url,
            "statustype": STATUSTYPE,
            "datumStatusGezet": "2018-11-01T10:00:00Z",
        });
        let without = client(&[Scope::StatussenToevoegen], Openbaar);
        let err = registry
            .create_status(&without, reopen.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, ZrcError::Forbidden(_)));
        let still_closed = registry.retrieve_zaak(&superuser(), uuid).await.unwrap();
        assert_eq!(still_closed.body.einddatum, date(2018, 10, 22));

        let with = client(&[Scope::ZakenHeropenen], Openbaar);
        registry.create_status(&with, reopen).await.unwrap();

        let reopened = registry.retrieve_zaak(&superuser(), uuid).await.unwrap();
        assert!(reopened.body.einddatum.is_none());
        assert!(reopened.body.archiefactiedatum.is_none());
    }

    #[tokio::test]
    async fn test_latest_status_wins_over_volgnummer() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;
        let uuid = zaak.body.uuid.parse().unwrap();

        set_status(&registry, &zaak.body, STATUSTYPE_EIND, "2018-10-22T10:00:00Z").await;
        let latest = set_status(&registry, &zaak.body, STATUSTYPE, "2018-10-01T10:00:00Z").await;

        let reopened = registry.retrieve_zaak(&superuser(), uuid).await.unwrap();
        assert!(reopened.body.einddatum.is_none());
        assert_eq!(reopened.body.status, Some(latest.body.url));
    }

    #[tokio::test]
    async fn test_unknown_statustype_persists_nothing() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;

        let err = registry
            .create_status(
                &superuser(),
                json!({
                    "zaak": zaak.body.url,
                    "statustype": "https://ztc.example/api/v1/statustypen/404",
                    "datumStatusGezet": "2018-10-22T10:00:00Z",
                }),
            )
            .await
            .unwrap_err();

        assert!(matches!(err, ZrcError::Validation(ref e) if e[0].code == "bad-url"));
        assert!(registry
            .list_statussen(&superuser(), vec![])
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_status_on_unknown_zaak() {
        let err = registry()
            .create_status(
                &superuser(),
                json!({
                    "zaak": format!("{BASE}/zaken/0f3a9c0e-7d6f-4a58-9b24-2f7bcbf1ad41"),
                    "statustype": STATUSTYPE,
                    "datumStatusGezet": "2018-10-22T10:00:00Z",
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ZrcError::Validation(ref e) if e[0].name == "zaak"));
    }

    #[tokio::test]
    async fn test_list_filters_on_zaak() {
        let registry = registry();
        let first = create_zaak(&registry).await;
        let second = create_zaak(&registry).await;
        set_status(&registry, &first.body, STATUSTYPE, "2018-10-01T10:00:00Z").await;
        set_status(&registry, &second.body, STATUSTYPE, "2018-10-01T10:00:00Z").await;

        let statussen = registry
            .list_statussen(&superuser(), vec![("zaak".into(), first.body.url.clone())])
            .await
            .unwrap();
        assert_eq!(statussen.len(), 1);
        assert_eq!(statussen[0].zaak, first.body.url);
    }

    #[tokio::test]
    async fn test_pending_lookup_does_not_block_other_cases() {
        let fixtures = Arc::new(fixtures());
        let catalogi = Arc::new(GatedCatalogi {
            inner: fixtures.clone(),
            armed: AtomicBool::new(true),
            entered: Notify::new(),
            release: Notify::new(),
            statustype_calls: AtomicUsize::new(0),
        });
        let registry = registry_with(Registries {
            catalogi: catalogi.clone(),
            ..Registries::shared(fixtures)
        });
        let zaak = create_zaak(&registry).await;
        let other = create_zaak(&registry).await;
        let other_uuid = other.body.uuid.parse().unwrap();

        let pending = {
            let registry = registry.clone();
            let body = zaak.body.clone();
            tokio::spawn(async move {
                set_status(&registry, &body, STATUSTYPE, "2018-10-01T10:00:00Z").await
            })
        };
        catalogi.entered.notified().await;

        let limit = Duration::from_secs(5);
        let found = tokio::time::timeout(limit, registry.retrieve_zaak(&superuser(), other_uuid))
            .await
            .expect("read waited for the pending write")
            .unwrap();
        assert_eq!(found.body.url, other.body.url);
        tokio::time::timeout(limit, registry.create_zaak(&superuser(), zaak_body()))
            .await
            .expect("write waited for the pending write")
            .unwrap();

        catalogi.release.notify_one();
        let status = pending.await.unwrap();
        assert_eq!(status.body.zaak, zaak.body.url);

        // The held write committed after the new case and ran again on fresh data.
        assert_eq!(catalogi.statustype_calls.load(Ordering::SeqCst), 2);
        assert_eq!(registry.list_statussen(&superuser(), vec![]).await.unwrap().len(), 1);
        assert_eq!(registry.list_zaken(&superuser(), vec![]).await.unwrap().count, 3);
    }

    #[tokio::test]
    async fn test_unreachable_besluiten_leaves_zaak_open() {
        let fixtures = Arc::new(fixtures());
        let besluiten = Arc::new(FlakyBesluiten {
            inner: fixtures.clone(),
            available: AtomicBool::new(true),
        });
        let registry = registry_with(Registries {
            besluiten: besluiten.clone(),
            ..Registries::shared(fixtures)
        });
        let zaak = create_zaak(&registry).await;
        let uuid = zaak.body.uuid.parse().unwrap();
        registry
            .create_resultaat(
                &superuser(),
                json!({"zaak": zaak.body.url, "resultaattype": RESULTAATTYPE_BESLUIT}),
            )
            .await
            .unwrap();
        registry
            .create_zaakbesluit(&superuser(), uuid, json!({"besluit": BESLUIT}))
            .await
            .unwrap();
        let before = registry.retrieve_zaak(&superuser(), uuid).await.unwrap();

        besluiten.available.store(false, Ordering::SeqCst);
        let err = registry
            .create_status(
                &superuser(),
                json!({
                    "zaak": zaak.body.url,
                    "statustype": STATUSTYPE_EIND,
                    "datumStatusGezet": "2018-10-22T10:00:00Z",
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ZrcError::Upstream(RegistryError::Status { status: 503, .. })));

        assert!(registry.list_statussen(&superuser(), vec![]).await.unwrap().is_empty());
        let after = registry.retrieve_zaak(&superuser(), uuid).await.unwrap();
        assert_eq!(after.body.einddatum, None);
        assert_eq!(after.body.archiefactiedatum, None);
        assert_eq!(after.etag, before.etag);
    }
}
