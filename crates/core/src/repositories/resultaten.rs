use super::{get, merge_patch, parent_zaak, zaak_visible, ZaakRegistry, READ, UPDATE};
use crate::archief::Bewaartermijn;
use crate::autorisatie::AuthContext;
use crate::constants::{CODE_UNIQUE, CODE_WIJZIGEN_NIET_TOEGELATEN, CODE_ZAAKTYPE_MISMATCH};
use crate::error::{decode, FieldErrors};
use crate::etag;
use crate::filters::{QueryParams, ResultaatFilter};
use crate::model::Resultaat;
use crate::store::{in_creation_order, Tables};
use crate::wire::{render_resultaat, ResultaatBody, ResultaatInput, Versioned};
use crate::{ZrcError, ZrcResult};
use serde_json::Value;
use zrc_uuid::ResourceUuid;

impl ZaakRegistry {
    pub async fn list_resultaten(
        &self,
        auth: &AuthContext,
        params: Vec<(String, String)>,
    ) -> ZrcResult<Vec<ResultaatBody>> {
        auth.require_any_scope(READ)?;
        let filter = ResultaatFilter::parse(QueryParams::new(params))?;

        let tables = self.store.read().await;
        Ok(in_creation_order(&tables.resultaten, |r| {
            zaak_visible(&tables, auth, r.zaak) && filter.matches(self.urls(), r)
        })
        .into_iter()
        .map(|r| render_resultaat(self.urls(), r))
        .collect())
    }

    pub async fn retrieve_resultaat(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<Versioned<ResultaatBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        let resultaat = get(&tables.resultaten, uuid)?;
        parent_zaak(&tables, auth, READ, resultaat.zaak)?;
        Ok(Versioned {
            etag: resultaat.etag.clone(),
            body: render_resultaat(self.urls(), resultaat),
        })
    }

    /// Registers the result of a case and copies the result-type's retention metadata onto it.
    ///
    /// # Errors
    ///
    /// A case has at most one result; a second one is a `unique` validation error on `zaak`.
    pub async fn create_resultaat(
        &self,
        auth: &AuthContext,
        body: Value,
    ) -> ZrcResult<Versioned<ResultaatBody>> {
        self.retrying(move || self.try_create_resultaat(auth, body.clone())).await
    }

    async fn try_create_resultaat(
        &self,
        auth: &AuthContext,
        body: Value,
    ) -> ZrcResult<Versioned<ResultaatBody>> {
        auth.require_any_scope(UPDATE)?;
        let input: ResultaatInput = decode(body)?;

        let mut tx = self.store.begin().await;
        let resultaat = self.build_resultaat(&mut tx, auth, input, None).await?;
        let stored = self.store_resultaat(&mut tx, resultaat).await?;
        tx.commit().await?;
        tracing::info!(zaak = %stored.body.zaak, "result registered");
        Ok(stored)
    }

    pub async fn update_resultaat(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ResultaatBody>> {
        self.write_resultaat(auth, uuid, body, false).await
    }

    pub async fn partial_update_resultaat(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ResultaatBody>> {
        self.write_resultaat(auth, uuid, body, true).await
    }

    /// Removes the result; the case loses its retention metadata and archival date.
    pub async fn delete_resultaat(&self, auth: &AuthContext, uuid: ResourceUuid) -> ZrcResult<()> {
        self.retrying(move || self.try_delete_resultaat(auth, uuid)).await
    }

    async fn try_delete_resultaat(&self, auth: &AuthContext, uuid: ResourceUuid) -> ZrcResult<()> {
        auth.require_any_scope(UPDATE)?;

        let mut tx = self.store.begin().await;
        let zaak = get(&tx.resultaten, uuid)?.zaak;
        parent_zaak(&tx, auth, UPDATE, zaak)?;

        tx.resultaten.remove(&uuid);
        if let Some(record) = tx.zaken.get_mut(&zaak) {
            record.bewaartermijn = None;
        }
        self.recompute_archief(&mut tx, zaak).await?;
        tx.commit().await?;
        tracing::info!(zaak = %zaak, "result deleted");
        Ok(())
    }

    async fn write_resultaat(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
        partial: bool,
    ) -> ZrcResult<Versioned<ResultaatBody>> {
        self.retrying(move || self.try_write_resultaat(auth, uuid, body.clone(), partial)).await
    }

    async fn try_write_resultaat(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
        partial: bool,
    ) -> ZrcResult<Versioned<ResultaatBody>> {
        auth.require_any_scope(UPDATE)?;

        let mut tx = self.store.begin().await;
        let existing = get(&tx.resultaten, uuid)?.clone();
        parent_zaak(&tx, auth, UPDATE, existing.zaak)?;

        let body = if partial {
            let current = serde_json::to_value(ResultaatInput::from_resultaat(
                self.urls(),
                &existing,
            ))
            .map_err(|e| ZrcError::Configuration(e.to_string()))?;
            merge_patch(current, body)?
        } else {
            body
        };
        let input: ResultaatInput = decode(body)?;

        let resultaat = self
            .build_resultaat(&mut tx, auth, input, Some(&existing))
            .await?;
        let stored = self.store_resultaat(&mut tx, resultaat).await?;
        tx.commit().await?;
        tracing::info!(zaak = %stored.body.zaak, "result updated");
        Ok(stored)
    }

    /// Validates the input, fetches the result-type and puts its retention metadata on the case.
    async fn build_resultaat(
        &self,
        tables: &mut Tables,
        auth: &AuthContext,
        input: ResultaatInput,
        existing: Option<&Resultaat>,
    ) -> ZrcResult<Resultaat> {
        let mut errors = FieldErrors::default();
        let required = (
            errors.require("zaak", input.zaak),
            errors.require("resultaattype", input.resultaattype),
        );
        let (Some(zaak_url), Some(resultaattype_url)) = required else {
            return Err(errors.into_error());
        };

        let zaak_uuid = self.resolve_zaak(tables, "zaak", &zaak_url)?;
        if existing.is_some_and(|e| e.zaak != zaak_uuid) {
            return Err(ZrcError::field(
                "zaak",
                CODE_WIJZIGEN_NIET_TOEGELATEN,
                "De zaak van een resultaat mag niet gewijzigd worden.",
            ));
        }
        let zaaktype = parent_zaak(tables, auth, UPDATE, zaak_uuid)?.zaaktype.clone();

        let duplicate = tables
            .resultaat_of(zaak_uuid)
            .is_some_and(|r| Some(r.uuid) != existing.map(|e| e.uuid));
        if duplicate {
            return Err(ZrcError::field(
                "zaak",
                CODE_UNIQUE,
                format!("De zaak {zaak_url} heeft al een resultaat."),
            ));
        }

        let resultaattype = self
            .catalogi
            .resultaattype(&resultaattype_url)
            .await
            .map_err(|e| ZrcError::from_reference("resultaattype", e))?;
        if resultaattype
            .zaaktype
            .as_deref()
            .is_some_and(|zt| zt != zaaktype)
        {
            return Err(ZrcError::field(
                "resultaattype",
                CODE_ZAAKTYPE_MISMATCH,
                "Het resultaattype hoort niet bij het zaaktype van de zaak.",
            ));
        }
        let bewaartermijn = Bewaartermijn::from_resultaattype(&resultaattype)?;
        if let Some(record) = tables.zaken.get_mut(&zaak_uuid) {
            record.bewaartermijn = bewaartermijn;
        }

        Ok(Resultaat {
            uuid: existing.map_or_else(ResourceUuid::new, |e| e.uuid),
            seq: existing.map_or(0, |e| e.seq),
            etag: String::new(),
            zaak: zaak_uuid,
            resultaattype: resultaattype.url,
            toelichting: input.toelichting,
        })
    }

    async fn store_resultaat(
        &self,
        tables: &mut Tables,
        mut resultaat: Resultaat,
    ) -> ZrcResult<Versioned<ResultaatBody>> {
        if resultaat.seq == 0 {
            resultaat.seq = tables.next_seq();
        }
        let body = render_resultaat(self.urls(), &resultaat);
        resultaat.etag = etag::compute(&body);
        let stored = Versioned {
            etag: resultaat.etag.clone(),
            body,
        };
        let zaak = resultaat.zaak;
        tables.resultaten.insert(resultaat.uuid, resultaat);
        self.recompute_archief(tables, zaak).await?;
        Ok(stored)
    }
}
