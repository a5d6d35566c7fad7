use super::{get, merge_patch, parent_zaak, zaak_visible, ZaakRegistry, ATTACH, READ};
use crate::autorisatie::AuthContext;
use crate::constants::{CODE_UNIQUE, CODE_WIJZIGEN_NIET_TOEGELATEN, NON_FIELD_ERRORS};
use crate::error::{decode, FieldErrors};
use crate::etag;
use crate::filters::{QueryParams, ZaakLinkFilter};
use crate::model::{ObjectInformatieObject, ObjectType};
use crate::store::in_creation_order;
use crate::wire::{
    render_zaakinformatieobject, Versioned, ZaakInformatieObjectBody, ZaakInformatieObjectInput,
};
use crate::{ZrcError, ZrcResult};
use chrono::Utc;
use serde_json::Value;
use zrc_uuid::ResourceUuid;

impl ZaakRegistry {
    pub async fn list_zaakinformatieobjecten(
        &self,
        auth: &AuthContext,
        params: Vec<(String, String)>,
    ) -> ZrcResult<Vec<ZaakInformatieObjectBody>> {
        auth.require_any_scope(READ)?;
        let filter = ZaakLinkFilter::parse(QueryParams::new(params), "informatieobject")?;

        let tables = self.store.read().await;
        Ok(in_creation_order(&tables.informatieobjecten, |o| {
            o.object_type == ObjectType::Zaak
                && o.zaak.is_some_and(|z| zaak_visible(&tables, auth, z))
                && filter.matches_informatieobject(o)
        })
        .into_iter()
        .map(|o| render_zaakinformatieobject(self.urls(), o))
        .collect())
    }

    pub async fn retrieve_zaakinformatieobject(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<Versioned<ZaakInformatieObjectBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        let record = get(&tables.informatieobjecten, uuid)?;
        let zaak = record.zaak.ok_or(ZrcError::NotFound)?;
        parent_zaak(&tables, auth, READ, zaak)?;
        Ok(Versioned {
            etag: record.etag.clone(),
            body: render_zaakinformatieobject(self.urls(), record),
        })
    }

    /// Links a document to a case. A document can be linked to the same case only once.
    ///
    /// The document is fetched from the document registry to make sure it exists.
    pub async fn create_zaakinformatieobject(
        &self,
        auth: &AuthContext,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakInformatieObjectBody>> {
        self.retrying(move || self.write_zaakinformatieobject(auth, body.clone(), None, false))
            .await
    }

    pub async fn update_zaakinformatieobject(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakInformatieObjectBody>> {
        self.retrying(move || self.write_zaakinformatieobject(auth, body.clone(), Some(uuid), false))
            .await
    }

    pub async fn partial_update_zaakinformatieobject(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakInformatieObjectBody>> {
        self.retrying(move || self.write_zaakinformatieobject(auth, body.clone(), Some(uuid), true))
            .await
    }

    pub async fn delete_zaakinformatieobject(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<()> {
        self.retrying(move || self.try_delete_zaakinformatieobject(auth, uuid)).await
    }

    async fn try_delete_zaakinformatieobject(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<()> {
        auth.require_any_scope(ATTACH)?;
        let mut tx = self.store.begin().await;
        let zaak = get(&tx.informatieobjecten, uuid)?
            .zaak
            .ok_or(ZrcError::NotFound)?;
        parent_zaak(&tx, auth, ATTACH, zaak)?;
        tx.informatieobjecten.remove(&uuid);
        tx.commit().await?;
        tracing::info!(zaak = %zaak, "document unlinked");
        Ok(())
    }

    async fn write_zaakinformatieobject(
        &self,
        auth: &AuthContext,
        body: Value,
        existing: Option<ResourceUuid>,
        partial: bool,
    ) -> ZrcResult<Versioned<ZaakInformatieObjectBody>> {
        auth.require_any_scope(ATTACH)?;

        let mut tx = self.store.begin().await;
        let previous = existing
            .map(|uuid| get(&tx.informatieobjecten, uuid).cloned())
            .transpose()?;
        let body = match (&previous, partial) {
            (Some(previous), true) => {
                let current = serde_json::to_value(ZaakInformatieObjectInput::from_record(previous))
                    .map_err(|e| ZrcError::Configuration(e.to_string()))?;
                merge_patch(current, body)?
            }
            _ => body,
        };
        let input: ZaakInformatieObjectInput = decode(body)?;

        let mut errors = FieldErrors::default();
        let required = (
            errors.require("informatieobject", input.informatieobject),
            errors.require("zaak", input.zaak),
        );
        let (Some(informatieobject), Some(zaak_url)) = required else {
            return Err(errors.into_error());
        };
        if url::Url::parse(&informatieobject).is_err() {
            return Err(ZrcError::field(
                "informatieobject",
                crate::constants::CODE_BAD_URL,
                "Voer een geldige URL in.",
            ));
        }

        let zaak = self.resolve_zaak(&tx, "zaak", &zaak_url)?;
        parent_zaak(&tx, auth, ATTACH, zaak)?;

        if let Some(previous) = &previous {
            if previous.object != zaak_url || previous.informatieobject != informatieobject {
                return Err(ZrcError::field(
                    NON_FIELD_ERRORS,
                    CODE_WIJZIGEN_NIET_TOEGELATEN,
                    "Zaak en informatieobject van een koppeling mogen niet gewijzigd worden.",
                ));
            }
        } else if tx
            .informatieobjecten
            .values()
            .any(|o| o.object == zaak_url && o.informatieobject == informatieobject)
        {
            return Err(ZrcError::field(
                NON_FIELD_ERRORS,
                CODE_UNIQUE,
                "Dit informatieobject is al aan de zaak gekoppeld.",
            ));
        }

        if previous.is_none() {
            self.documenten
                .informatieobject(&informatieobject)
                .await
                .map_err(|e| ZrcError::from_reference("informatieobject", e))?;
        }

        let mut record = match previous {
            Some(previous) => ObjectInformatieObject {
                titel: input.titel,
                beschrijving: input.beschrijving,
                ..previous
            },
            None => ObjectInformatieObject {
                uuid: ResourceUuid::new(),
                seq: tx.next_seq(),
                etag: String::new(),
                informatieobject,
                object_type: ObjectType::Zaak,
                object: zaak_url,
                zaak: Some(zaak),
                titel: input.titel,
                beschrijving: input.beschrijving,
                registratiedatum: Utc::now(),
            },
        };
        let body = render_zaakinformatieobject(self.urls(), &record);
        record.etag = etag::compute(&body);
        let stored = Versioned {
            etag: record.etag.clone(),
            body,
        };
        tx.informatieobjecten.insert(record.uuid, record);
        tx.commit().await?;

        tracing::info!(zaak = %zaak, informatieobject = %stored.body.informatieobject, "document linked");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::autorisatie::Scope;
    use crate::vertrouwelijkheid::VertrouwelijkheidAanduiding::{Geheim, Openbaar};
    use crate::ZrcError;
    use serde_json::json;

    #[tokio::test]
    async fn test_link_is_unique_and_immutable() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;
        let body = json!({"informatieobject": DOCUMENT, "zaak": zaak.body.url, "titel": "brief"});

        let link = registry
            .create_zaakinformatieobject(&superuser(), body.clone())
            .await
            .unwrap();
        assert_eq!(link.body.aard_relatie_weergave, "Hoort bij, omgekeerd: kent");

        let err = registry
            .create_zaakinformatieobject(&superuser(), body)
            .await
            .unwrap_err();
        assert!(matches!(err, ZrcError::Validation(ref e) if e[0].code == "unique"));

        let uuid = link.body.uuid.parse().unwrap();
        let updated = registry
            .partial_update_zaakinformatieobject(&superuser(), uuid, json!({"titel": "besluit"}))
            .await
            .unwrap();
        assert_eq!(updated.body.titel, "besluit");
        assert_eq!(updated.body.registratiedatum, link.body.registratiedatum);

        let other = create_zaak(&registry).await;
        let err = registry
            .partial_update_zaakinformatieobject(&superuser(), uuid, json!({"zaak": other.body.url}))
            .await
            .unwrap_err();
        assert!(
            matches!(err, ZrcError::Validation(ref e) if e[0].code == "wijzigen-niet-toegelaten")
        );
    }

    #[tokio::test]
    async fn test_unknown_document_is_bad_url() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;

        let err = registry
            .create_zaakinformatieobject(
                &superuser(),
                json!({
                    "informatieobject": "https://drc.example/api/v1/enkelvoudiginformatieobjecten/404",
                    "zaak": zaak.body.url,
                }),
            )
            .await
            .unwrap_err();
        assert!(
            matches!(err, ZrcError::Validation(ref e) if e[0].name == "informatieobject" && e[0].code == "bad-url")
        );
        assert!(registry
            .list_zaakinformatieobjecten(&superuser(), vec![])
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_list_hides_links_of_invisible_zaken() {
        let registry = registry();
        let mut body = zaak_body();
        body["vertrouwelijkheidaanduiding"] = json!("geheim");
        let zaak = registry.create_zaak(&superuser(), body).await.unwrap();
        registry
            .create_zaakinformatieobject(
                &superuser(),
                json!({"informatieobject": DOCUMENT, "zaak": zaak.body.url}),
            )
            .await
            .unwrap();

        let open = client(&[Scope::ZakenLezen], Openbaar);
        assert!(registry
            .list_zaakinformatieobjecten(&open, vec![])
            .await
            .unwrap()
            .is_empty());

        let secret = client(&[Scope::ZakenLezen], Geheim);
        let found = registry
            .list_zaakinformatieobjecten(
                &secret,
                vec![("informatieobject".into(), DOCUMENT.into())],
            )
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }
}
