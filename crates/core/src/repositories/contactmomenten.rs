use super::{get, parent_zaak, zaak_visible, ZaakRegistry, ATTACH, READ};
use crate::autorisatie::AuthContext;
use crate::constants::{CODE_BAD_URL, CODE_UNIQUE, NON_FIELD_ERRORS};
use crate::error::{decode, FieldErrors};
use crate::etag;
use crate::filters::{QueryParams, ZaakLinkFilter};
use crate::model::ZaakContactMoment;
use crate::store::in_creation_order;
use crate::wire::{
    render_zaakcontactmoment, Versioned, ZaakContactMomentBody, ZaakContactMomentInput,
};
use crate::{ZrcError, ZrcResult};
use serde_json::Value;
use zrc_uuid::ResourceUuid;

impl ZaakRegistry {
    pub async fn list_zaakcontactmomenten(
        &self,
        auth: &AuthContext,
        params: Vec<(String, String)>,
    ) -> ZrcResult<Vec<ZaakContactMomentBody>> {
        auth.require_any_scope(READ)?;
        let filter = ZaakLinkFilter::parse(QueryParams::new(params), "contactmoment")?;

        let tables = self.store.read().await;
        Ok(in_creation_order(&tables.contactmomenten, |c| {
            zaak_visible(&tables, auth, c.zaak) && filter.matches_contactmoment(self.urls(), c)
        })
        .into_iter()
        .map(|c| render_zaakcontactmoment(self.urls(), c))
        .collect())
    }

    pub async fn retrieve_zaakcontactmoment(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<Versioned<ZaakContactMomentBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        let record = get(&tables.contactmomenten, uuid)?;
        parent_zaak(&tables, auth, READ, record.zaak)?;
        Ok(Versioned {
            etag: record.etag.clone(),
            body: render_zaakcontactmoment(self.urls(), record),
        })
    }

    pub async fn create_zaakcontactmoment(
        &self,
        auth: &AuthContext,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakContactMomentBody>> {
        self.retrying(move || self.try_create_zaakcontactmoment(auth, body.clone())).await
    }

    async fn try_create_zaakcontactmoment(
        &self,
        auth: &AuthContext,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakContactMomentBody>> {
        auth.require_any_scope(ATTACH)?;
        let input: ZaakContactMomentInput = decode(body)?;
        let mut errors = FieldErrors::default();
        let required = (
            errors.require("zaak", input.zaak),
            errors.require("contactmoment", input.contactmoment),
        );
        let (Some(zaak_url), Some(contactmoment)) = required else {
            return Err(errors.into_error());
        };
        if url::Url::parse(&contactmoment).is_err() {
            return Err(ZrcError::field(
                "contactmoment",
                CODE_BAD_URL,
                "Voer een geldige URL in.",
            ));
        }

        let mut tx = self.store.begin().await;
        let zaak = self.resolve_zaak(&tx, "zaak", &zaak_url)?;
        parent_zaak(&tx, auth, ATTACH, zaak)?;
        if tx
            .contactmomenten
            .values()
            .any(|c| c.zaak == zaak && c.contactmoment == contactmoment)
        {
            return Err(ZrcError::field(
                NON_FIELD_ERRORS,
                CODE_UNIQUE,
                "Dit contactmoment is al aan de zaak gekoppeld.",
            ));
        }

        let mut record = ZaakContactMoment {
            uuid: ResourceUuid::new(),
            seq: tx.next_seq(),
            etag: String::new(),
            zaak,
            contactmoment,
        };
        let body = render_zaakcontactmoment(self.urls(), &record);
        record.etag = etag::compute(&body);
        let created = Versioned {
            etag: record.etag.clone(),
            body,
        };
        tx.contactmomenten.insert(record.uuid, record);
        tx.commit().await?;

        tracing::info!(zaak = %zaak, "contact moment linked");
        Ok(created)
    }

    pub async fn delete_zaakcontactmoment(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<()> {
        self.retrying(move || self.try_delete_zaakcontactmoment(auth, uuid)).await
    }

    async fn try_delete_zaakcontactmoment(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<()> {
        auth.require_any_scope(ATTACH)?;
        let mut tx = self.store.begin().await;
        let zaak = get(&tx.contactmomenten, uuid)?.zaak;
        parent_zaak(&tx, auth, ATTACH, zaak)?;
        tx.contactmomenten.remove(&uuid);
        tx.commit().await?;
        tracing::info!(zaak = %zaak, "contact moment unlinked");
        Ok(())
    }
}
