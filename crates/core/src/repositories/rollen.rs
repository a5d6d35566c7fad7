use super::{get, parent_zaak, zaak_visible, ZaakRegistry, ATTACH, READ};
use crate::autorisatie::AuthContext;
use crate::constants::{CODE_BAD_URL, CODE_INVALID_BETROKKENE, NON_FIELD_ERRORS};
use crate::error::{decode, FieldError, FieldErrors};
use crate::etag;
use crate::filters::{QueryParams, RolFilter};
use crate::model::{BetrokkeneIdentificatie, Rol};
use crate::store::in_creation_order;
use crate::wire::{render_rol, RolBody, RolInput, Versioned};
use crate::ZrcResult;
use chrono::Utc;
use serde_json::Value;
use zrc_uuid::ResourceUuid;

impl ZaakRegistry {
    pub async fn list_rollen(
        &self,
        auth: &AuthContext,
        params: Vec<(String, String)>,
    ) -> ZrcResult<Vec<RolBody>> {
        auth.require_any_scope(READ)?;
        let filter = RolFilter::parse(QueryParams::new(params))?;

        let tables = self.store.read().await;
        Ok(in_creation_order(&tables.rollen, |r| {
            zaak_visible(&tables, auth, r.zaak) && filter.matches(self.urls(), r)
        })
        .into_iter()
        .map(|r| render_rol(self.urls(), r))
        .collect())
    }

    pub async fn retrieve_rol(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<Versioned<RolBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        let rol = get(&tables.rollen, uuid)?;
        parent_zaak(&tables, auth, READ, rol.zaak)?;
        Ok(Versioned {
            etag: rol.etag.clone(),
            body: render_rol(self.urls(), rol),
        })
    }

    /// Adds an involved party to a case.
    ///
    /// The party is referenced by `betrokkene`, identified inline through
    /// `betrokkeneIdentificatie` (decoded according to `betrokkeneType`), or both.
    pub async fn create_rol(&self, auth: &AuthContext, body: Value) -> ZrcResult<Versioned<RolBody>> {
        self.retrying(move || self.try_create_rol(auth, body.clone())).await
    }

    async fn try_create_rol(&self, auth: &AuthContext, body: Value) -> ZrcResult<Versioned<RolBody>> {
        auth.require_any_scope(ATTACH)?;
        let input: RolInput = decode(body)?;

        let mut errors = FieldErrors::default();
        let required = (
            errors.require("zaak", input.zaak),
            errors.require("betrokkeneType", input.betrokkene_type),
            errors.require("rolomschrijving", input.rolomschrijving),
        );
        let betrokkene = input.betrokkene.filter(|b| !b.is_empty());
        if let Some(url) = &betrokkene {
            if url::Url::parse(url).is_err() {
                errors.push(FieldError::new(
                    "betrokkene",
                    CODE_BAD_URL,
                    "Voer een geldige URL in.",
                ));
            }
        }
        let identificatie = input.betrokkene_identificatie.filter(|v| !v.is_null());
        if betrokkene.is_none() && identificatie.is_none() {
            errors.push(FieldError::new(
                NON_FIELD_ERRORS,
                CODE_INVALID_BETROKKENE,
                "betrokkene of betrokkeneIdentificatie moet opgegeven worden.",
            ));
        }
        let (Some(zaak_url), Some(betrokkene_type), Some(rolomschrijving)) = required else {
            return Err(errors.into_error());
        };
        errors.finish()?;

        let betrokkene_identificatie = identificatie
            .map(|value| {
                BetrokkeneIdentificatie::decode("betrokkeneIdentificatie", betrokkene_type, value)
            })
            .transpose()?;

        let mut tx = self.store.begin().await;
        let zaak = self.resolve_zaak(&tx, "zaak", &zaak_url)?;
        parent_zaak(&tx, auth, ATTACH, zaak)?;

        let mut rol = Rol {
            uuid: ResourceUuid::new(),
            seq: tx.next_seq(),
            etag: String::new(),
            zaak,
            betrokkene,
            betrokkene_type,
            rolomschrijving,
            roltoelichting: input.roltoelichting,
            indicatie_machtiging: input.indicatie_machtiging,
            registratiedatum: Utc::now(),
            betrokkene_identificatie,
        };
        let body = render_rol(self.urls(), &rol);
        rol.etag = etag::compute(&body);
        let created = Versioned {
            etag: rol.etag.clone(),
            body,
        };
        tx.rollen.insert(rol.uuid, rol);
        tx.commit().await?;

        tracing::info!(zaak = %zaak, betrokkene_type = %betrokkene_type, "role added");
        Ok(created)
    }

    pub async fn delete_rol(&self, auth: &AuthContext, uuid: ResourceUuid) -> ZrcResult<()> {
        self.retrying(move || self.try_delete_rol(auth, uuid)).await
    }

    async fn try_delete_rol(&self, auth: &AuthContext, uuid: ResourceUuid) -> ZrcResult<()> {
        auth.require_any_scope(ATTACH)?;
        let mut tx = self.store.begin().await;
        let zaak = get(&tx.rollen, uuid)?.zaak;
        parent_zaak(&tx, auth, ATTACH, zaak)?;
        tx.rollen.remove(&uuid);
        tx.commit().await?;
        tracing::info!(zaak = %zaak, "role removed");
        Ok(())
    }
}
