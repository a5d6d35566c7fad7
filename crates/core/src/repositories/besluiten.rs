use super::{get, parent_zaak, ZaakRegistry, ATTACH, READ};
use crate::autorisatie::AuthContext;
use crate::constants::CODE_UNIQUE;
use crate::error::{decode, FieldErrors};
use crate::etag;
use crate::model::ZaakBesluit;
use crate::wire::{render_zaakbesluit, Versioned, ZaakBesluitBody, ZaakBesluitInput};
use crate::{ZrcError, ZrcResult};
use serde_json::Value;
use zrc_uuid::ResourceUuid;

impl ZaakRegistry {
    pub async fn list_zaakbesluiten(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
    ) -> ZrcResult<Vec<ZaakBesluitBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        parent_zaak(&tables, auth, READ, zaak)?;
        Ok(tables
            .besluiten_of(zaak)
            .into_iter()
            .map(|b| render_zaakbesluit(self.urls(), b))
            .collect())
    }

    pub async fn retrieve_zaakbesluit(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
        uuid: ResourceUuid,
    ) -> ZrcResult<Versioned<ZaakBesluitBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        let record = get(&tables.besluiten, uuid)?;
        if record.zaak != zaak {
            return Err(ZrcError::NotFound);
        }
        parent_zaak(&tables, auth, READ, zaak)?;
        Ok(Versioned {
            etag: record.etag.clone(),
            body: render_zaakbesluit(self.urls(), record),
        })
    }

    /// Links a decision to the case.
    ///
    /// The decision is fetched to make sure it exists. A case linked to a decision cannot be
    /// deleted, and decision-based archival bases use the most recent link.
    pub async fn create_zaakbesluit(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakBesluitBody>> {
        self.retrying(move || self.try_create_zaakbesluit(auth, zaak, body.clone())).await
    }

    async fn try_create_zaakbesluit(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakBesluitBody>> {
        auth.require_any_scope(ATTACH)?;
        let input: ZaakBesluitInput = decode(body)?;
        let mut errors = FieldErrors::default();
        let Some(besluit_url) = errors.require("besluit", input.besluit) else {
            return Err(errors.into_error());
        };

        let mut tx = self.store.begin().await;
        parent_zaak(&tx, auth, ATTACH, zaak)?;
        if tx.besluiten_of(zaak).iter().any(|b| b.besluit == besluit_url) {
            return Err(ZrcError::field(
                "besluit",
                CODE_UNIQUE,
                "Dit besluit is al aan de zaak gekoppeld.",
            ));
        }
        let besluit = self
            .besluiten
            .besluit(&besluit_url)
            .await
            .map_err(|e| ZrcError::from_reference("besluit", e))?;

        let mut record = ZaakBesluit {
            uuid: ResourceUuid::new(),
            seq: tx.next_seq(),
            etag: String::new(),
            zaak,
            besluit: besluit.url,
        };
        let body = render_zaakbesluit(self.urls(), &record);
        record.etag = etag::compute(&body);
        let created = Versioned {
            etag: record.etag.clone(),
            body,
        };
        tx.besluiten.insert(record.uuid, record);
        self.recompute_archief(&mut tx, zaak).await?;
        tx.commit().await?;

        tracing::info!(zaak = %zaak, besluit = %created.body.besluit, "decision linked");
        Ok(created)
    }

    pub async fn delete_zaakbesluit(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
        uuid: ResourceUuid,
    ) -> ZrcResult<()> {
        self.retrying(move || self.try_delete_zaakbesluit(auth, zaak, uuid)).await
    }

    async fn try_delete_zaakbesluit(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
        uuid: ResourceUuid,
    ) -> ZrcResult<()> {
        auth.require_any_scope(ATTACH)?;
        let mut tx = self.store.begin().await;
        if get(&tx.besluiten, uuid)?.zaak != zaak {
            return Err(ZrcError::NotFound);
        }
        parent_zaak(&tx, auth, ATTACH, zaak)?;

        tx.besluiten.remove(&uuid);
        self.recompute_archief(&mut tx, zaak).await?;
        tx.commit().await?;
        tracing::info!(zaak = %zaak, "decision unlinked");
        Ok(())
    }
}
