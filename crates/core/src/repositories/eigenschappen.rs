use super::{get, parent_zaak, ZaakRegistry, ATTACH, READ};
use crate::autorisatie::AuthContext;
use crate::constants::CODE_ZAAKTYPE_MISMATCH;
use crate::error::{decode, FieldErrors};
use crate::etag;
use crate::model::ZaakEigenschap;
use crate::wire::{render_zaakeigenschap, Versioned, ZaakEigenschapBody, ZaakEigenschapInput};
use crate::{ZrcError, ZrcResult};
use serde_json::Value;
use zrc_uuid::ResourceUuid;

impl ZaakRegistry {
    pub async fn list_zaakeigenschappen(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
    ) -> ZrcResult<Vec<ZaakEigenschapBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        parent_zaak(&tables, auth, READ, zaak)?;
        Ok(tables
            .eigenschappen_of(zaak)
            .into_iter()
            .map(|e| render_zaakeigenschap(self.urls(), e))
            .collect())
    }

    pub async fn retrieve_zaakeigenschap(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
        uuid: ResourceUuid,
    ) -> ZrcResult<Versioned<ZaakEigenschapBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        let record = get(&tables.eigenschappen, uuid)?;
        if record.zaak != zaak {
            return Err(ZrcError::NotFound);
        }
        parent_zaak(&tables, auth, READ, zaak)?;
        Ok(Versioned {
            etag: record.etag.clone(),
            body: render_zaakeigenschap(self.urls(), record),
        })
    }

    /// Records a value for one of the case-type's properties.
    ///
    /// The property's name is taken from the catalogue; it is what an `eigenschap` archival
    /// basis refers to, so the archival date is recomputed.
    pub async fn create_zaakeigenschap(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakEigenschapBody>> {
        self.retrying(move || self.try_create_zaakeigenschap(auth, zaak, body.clone())).await
    }

    async fn try_create_zaakeigenschap(
        &self,
        auth: &AuthContext,
        zaak: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakEigenschapBody>> {
        auth.require_any_scope(ATTACH)?;
        let input: ZaakEigenschapInput = decode(body)?;
        let mut errors = FieldErrors::default();
        let required = (
            errors.require("eigenschap", input.eigenschap),
            errors.require("waarde", input.waarde),
        );
        let (Some(eigenschap_url), Some(waarde)) = required else {
            return Err(errors.into_error());
        };

        let mut tx = self.store.begin().await;
        let zaaktype = parent_zaak(&tx, auth, ATTACH, zaak)?.zaaktype.clone();
        let eigenschap = self
            .catalogi
            .eigenschap(&eigenschap_url)
            .await
            .map_err(|e| ZrcError::from_reference("eigenschap", e))?;
        if eigenschap.zaaktype.as_deref().is_some_and(|zt| zt != zaaktype) {
            return Err(ZrcError::field(
                "eigenschap",
                CODE_ZAAKTYPE_MISMATCH,
                "De eigenschap hoort niet bij het zaaktype van de zaak.",
            ));
        }

        let mut record = ZaakEigenschap {
            uuid: ResourceUuid::new(),
            seq: tx.next_seq(),
            etag: String::new(),
            zaak,
            eigenschap: eigenschap.url,
            naam: eigenschap.naam,
            waarde,
        };
        let body = render_zaakeigenschap(self.urls(), &record);
        record.etag = etag::compute(&body);
        let created = Versioned {
            etag: record.etag.clone(),
            body,
        };
        tx.eigenschappen.insert(record.uuid, record);
        self.recompute_archief(&mut tx, zaak).await?;
        tx.commit().await?;

        tracing::info!(zaak = %zaak, naam = %created.body.naam, "case property set");
        Ok(created)
    }
}
