use super::{get, merge_patch, parent_zaak, ZaakRegistry, READ, UPDATE};
use crate::autorisatie::{AuthContext, Scope};
use crate::constants::{
    CODE_BETALING_NVT, CODE_DEELZAAK_ALS_HOOFDZAAK, CODE_IDENTIFICATIE_NIET_UNIEK,
    CODE_INVALID_DEELZAAKTYPE, CODE_INVALID_PRODUCTS_SERVICES, CODE_RELATED_BESLUITEN,
    CODE_SELF_FORBIDDEN, CODE_WIJZIGEN_NIET_TOEGELATEN, IDENTIFICATIE_PREFIX, NON_FIELD_ERRORS,
};
use crate::error::{decode, FieldError, FieldErrors};
use crate::filters::{paginate, QueryParams, ZaakFilter};
use crate::model::{Betalingsindicatie, Geometry, Zaak};
use crate::store::Tables;
use crate::wire::{render_zaak, Page, Versioned, ZaakBody, ZaakInput};
use crate::{ZrcError, ZrcResult};
use chrono::{Datelike, NaiveDate, Utc};
use serde_json::Value;
use zrc_types::{NonEmptyText, Rsin};
use zrc_uuid::ResourceUuid;

const IDENTIFICATIE_MAX_LENGTH: usize = 40;

/// Next free `ZAAK-{year}-{n}` identification for the organisation.
fn generate_identificatie(tables: &Tables, bronorganisatie: &Rsin, startdatum: NaiveDate) -> String {
    let prefix = format!("{IDENTIFICATIE_PREFIX}-{}", startdatum.year());
    let taken = |candidate: &str| {
        tables
            .zaken
            .values()
            .any(|z| z.bronorganisatie == *bronorganisatie && z.identificatie == candidate)
    };

    let mut volgnummer = tables
        .zaken
        .values()
        .filter(|z| z.bronorganisatie == *bronorganisatie && z.identificatie.starts_with(&prefix))
        .count()
        + 1;
    loop {
        let candidate = format!("{prefix}-{volgnummer:010}");
        if !taken(&candidate) {
            return candidate;
        }
        volgnummer += 1;
    }
}

fn versioned_zaak(
    registry: &ZaakRegistry,
    tables: &Tables,
    uuid: ResourceUuid,
) -> ZrcResult<Versioned<ZaakBody>> {
    let zaak = get(&tables.zaken, uuid)?;
    Ok(Versioned {
        etag: zaak.etag.clone(),
        body: render_zaak(tables, registry.urls(), zaak),
    })
}

impl ZaakRegistry {
    /// Lists the cases visible to the caller, filtered, ordered and paginated.
    ///
    /// # Errors
    ///
    /// Returns [`ZrcError::Forbidden`] without the read scope, [`ZrcError::Validation`] for bad
    /// query parameters and [`ZrcError::NotFound`] for a page beyond the last.
    pub async fn list_zaken(
        &self,
        auth: &AuthContext,
        params: Vec<(String, String)>,
    ) -> ZrcResult<Page<ZaakBody>> {
        auth.require_any_scope(READ)?;
        let filter = ZaakFilter::parse(QueryParams::new(params.clone()))?;

        let tables = self.store.read().await;
        let mut zaken: Vec<&Zaak> = tables
            .zaken
            .values()
            .filter(|z| auth.permits(&z.zaaktype, z.vertrouwelijkheidaanduiding))
            .filter(|z| filter.matches(z))
            .collect();
        match filter.ordering {
            Some(ordering) => zaken.sort_by(|a, b| ordering.compare(a, b)),
            None => zaken.sort_by_key(|z| z.seq),
        }

        let bodies = zaken
            .into_iter()
            .map(|z| render_zaak(&tables, self.urls(), z))
            .collect();
        paginate(
            bodies,
            filter.page.as_deref(),
            self.cfg.page_size(),
            self.urls(),
            &filter.link_params(&params),
        )
    }

    /// Registers a new case.
    ///
    /// The case-type is fetched to default the confidentiality level, to check the products
    /// and services and, for sub-cases, to check the parent's allowed sub-case types.
    pub async fn create_zaak(
        &self,
        auth: &AuthContext,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakBody>> {
        self.retrying(move || self.try_create_zaak(auth, body.clone())).await
    }

    async fn try_create_zaak(
        &self,
        auth: &AuthContext,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakBody>> {
        auth.require_any_scope(&[Scope::ZakenAanmaken])?;
        let input: ZaakInput = decode(body)?;

        let mut tx = self.store.begin().await;
        let mut zaak = self.build_zaak(&tx, auth, input, None).await?;
        zaak.seq = tx.next_seq();
        let uuid = zaak.uuid;
        tx.zaken.insert(uuid, zaak);
        tx.refresh_zaak_etag(self.urls(), uuid);

        let created = versioned_zaak(self, &tx, uuid)?;
        tx.commit().await?;
        tracing::info!(zaak = %uuid, identificatie = %created.body.identificatie, "case created");
        Ok(created)
    }

    pub async fn retrieve_zaak(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
    ) -> ZrcResult<Versioned<ZaakBody>> {
        auth.require_any_scope(READ)?;
        let tables = self.store.read().await;
        parent_zaak(&tables, auth, READ, uuid)?;
        versioned_zaak(self, &tables, uuid)
    }

    /// Replaces the writable fields of a case.
    pub async fn update_zaak(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakBody>> {
        self.write_zaak(auth, uuid, body, false).await
    }

    /// Updates only the members present in `body`.
    ///
    /// Setting `betalingsindicatie` to `nvt` without a `laatsteBetaaldatum` clears the last
    /// payment date.
    pub async fn partial_update_zaak(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
    ) -> ZrcResult<Versioned<ZaakBody>> {
        self.write_zaak(auth, uuid, body, true).await
    }

    /// Deletes a case together with everything nested under it and its sub-cases.
    ///
    /// # Errors
    ///
    /// Returns a `related-besluiten` business-rule error while any case in that subtree is
    /// linked to a decision.
    pub async fn delete_zaak(&self, auth: &AuthContext, uuid: ResourceUuid) -> ZrcResult<()> {
        self.retrying(move || self.try_delete_zaak(auth, uuid)).await
    }

    async fn try_delete_zaak(&self, auth: &AuthContext, uuid: ResourceUuid) -> ZrcResult<()> {
        const DELETE: &[Scope] = &[Scope::ZakenVerwijderen];
        auth.require_any_scope(DELETE)?;

        let mut tx = self.store.begin().await;
        let hoofdzaak = parent_zaak(&tx, auth, DELETE, uuid)?.hoofdzaak;
        let subtree = tx.subtree(uuid);
        if subtree.iter().any(|z| !tx.besluiten_of(*z).is_empty()) {
            tracing::warn!(zaak = %uuid, "refusing to delete case with linked decisions");
            return Err(ZrcError::rule(
                CODE_RELATED_BESLUITEN,
                "De zaak heeft nog gerelateerde besluiten.",
            ));
        }

        tx.remove_zaken(&subtree);
        if let Some(parent) = hoofdzaak {
            tx.refresh_zaak_etag(self.urls(), parent);
        }
        tx.commit().await?;
        tracing::info!(zaak = %uuid, removed = subtree.len(), "case deleted");
        Ok(())
    }

    async fn write_zaak(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
        partial: bool,
    ) -> ZrcResult<Versioned<ZaakBody>> {
        self.retrying(move || self.try_write_zaak(auth, uuid, body.clone(), partial)).await
    }

    async fn try_write_zaak(
        &self,
        auth: &AuthContext,
        uuid: ResourceUuid,
        body: Value,
        partial: bool,
    ) -> ZrcResult<Versioned<ZaakBody>> {
        auth.require_any_scope(UPDATE)?;

        let mut tx = self.store.begin().await;
        let existing = parent_zaak(&tx, auth, UPDATE, uuid)?.clone();

        let body = if partial {
            let mut patch = body;
            if let Some(members) = patch.as_object_mut() {
                let nvt = members.get("betalingsindicatie").and_then(Value::as_str) == Some("nvt");
                if nvt && !members.contains_key("laatsteBetaaldatum") {
                    members.insert("laatsteBetaaldatum".into(), Value::Null);
                }
            }
            let current = serde_json::to_value(ZaakInput::from_zaak(self.urls(), &existing))
                .map_err(|e| ZrcError::Configuration(e.to_string()))?;
            merge_patch(current, patch)?
        } else {
            body
        };
        let input: ZaakInput = decode(body)?;

        let zaak = self.build_zaak(&tx, auth, input, Some(&existing)).await?;
        tx.zaken.insert(uuid, zaak);
        self.recompute_archief(&mut tx, uuid).await?;
        if let Some(previous) = existing.hoofdzaak {
            tx.refresh_zaak_etag(self.urls(), previous);
        }

        let updated = versioned_zaak(self, &tx, uuid)?;
        tx.commit().await?;
        tracing::info!(zaak = %uuid, "case updated");
        Ok(updated)
    }

    /// Validates a case input and builds the record to store.
    ///
    /// For updates, `existing` supplies the identity and the derived fields, which clients
    /// cannot write.
    async fn build_zaak(
        &self,
        tables: &Tables,
        auth: &AuthContext,
        input: ZaakInput,
        existing: Option<&Zaak>,
    ) -> ZrcResult<Zaak> {
        let mut errors = FieldErrors::default();
        let required = (
            errors.require("zaaktype", input.zaaktype.clone()),
            errors.require("bronorganisatie", input.bronorganisatie.clone()),
            errors.require(
                "verantwoordelijkeOrganisatie",
                input.verantwoordelijke_organisatie.clone(),
            ),
            errors.require("startdatum", input.startdatum),
        );
        if let (Some(existing), Some(zaaktype)) = (existing, required.0.as_ref()) {
            if *zaaktype != existing.zaaktype {
                errors.push(FieldError::new(
                    "zaaktype",
                    CODE_WIJZIGEN_NIET_TOEGELATEN,
                    "Het zaaktype mag niet gewijzigd worden.",
                ));
            }
        }
        let (Some(zaaktype), Some(bronorganisatie), Some(verantwoordelijke_organisatie), Some(startdatum)) =
            required
        else {
            return Err(errors.into_error());
        };
        errors.finish()?;

        let zaaktype_doc = self
            .catalogi
            .zaaktype(&zaaktype)
            .await
            .map_err(|e| ZrcError::from_reference("zaaktype", e))?;

        let mut errors = FieldErrors::default();
        if let Some(product) = input
            .producten_of_diensten
            .iter()
            .find(|p| !zaaktype_doc.producten_of_diensten.contains(p))
        {
            errors.push(FieldError::new(
                "productenOfDiensten",
                CODE_INVALID_PRODUCTS_SERVICES,
                format!("'{product}' hoort niet bij het zaaktype."),
            ));
        }

        let nvt = input.betalingsindicatie == Some(Betalingsindicatie::Nvt);
        if nvt && input.laatste_betaaldatum.is_some() {
            errors.push(FieldError::new(
                "laatsteBetaaldatum",
                CODE_BETALING_NVT,
                "Laatste betaaldatum kan niet gezet worden als er geen betaling nodig is.",
            ));
        }

        let communicatiekanaal = input.communicatiekanaal.filter(|c| !c.is_empty());
        if let Some(url) = &communicatiekanaal {
            if let Err(err) = self.referentielijsten.communicatiekanaal(url).await {
                match ZrcError::from_resource("communicatiekanaal", err) {
                    ZrcError::Validation(found) => found.into_iter().for_each(|e| errors.push(e)),
                    other => return Err(other),
                }
            }
        }

        let zaakgeometrie = match input.zaakgeometrie {
            Some(value) => match Geometry::from_value("zaakgeometrie", value) {
                Ok(geometry) => Some(geometry),
                Err(e) => {
                    errors.push(e);
                    None
                }
            },
            None => None,
        };

        let identificatie = match input.identificatie.filter(|i| !i.trim().is_empty()) {
            Some(identificatie) => {
                if let Err(e) = NonEmptyText::bounded(&identificatie, IDENTIFICATIE_MAX_LENGTH) {
                    errors.push(FieldError::new("identificatie", "max_length", e.to_string()));
                }
                let duplicate = tables.zaken.values().any(|z| {
                    z.bronorganisatie == bronorganisatie
                        && z.identificatie == identificatie
                        && Some(z.uuid) != existing.map(|e| e.uuid)
                });
                if duplicate {
                    errors.push(FieldError::new(
                        "identificatie",
                        CODE_IDENTIFICATIE_NIET_UNIEK,
                        "Deze identificatie bestaat al voor deze bronorganisatie.",
                    ));
                }
                identificatie
            }
            None => match existing {
                Some(existing) => existing.identificatie.clone(),
                None => generate_identificatie(tables, &bronorganisatie, startdatum),
            },
        };

        let hoofdzaak = match input.hoofdzaak.as_deref().filter(|h| !h.is_empty()) {
            None => None,
            Some(url) => match self.check_hoofdzaak(tables, url, &zaaktype, existing).await {
                Ok(uuid) => Some(uuid),
                Err(ZrcError::Validation(found)) => {
                    found.into_iter().for_each(|e| errors.push(e));
                    None
                }
                Err(other) => return Err(other),
            },
        };
        errors.finish()?;

        let Some(vertrouwelijkheidaanduiding) = input
            .vertrouwelijkheidaanduiding
            .or(zaaktype_doc.vertrouwelijkheidaanduiding)
        else {
            return Err(ZrcError::Validation(vec![FieldError::required(
                "vertrouwelijkheidaanduiding",
            )]));
        };

        if !auth.permits(&zaaktype, vertrouwelijkheidaanduiding) {
            tracing::warn!(client_id = %auth.client_id, zaaktype, "case outside authorizations");
            return Err(ZrcError::Forbidden(
                "U heeft geen toegang tot dit zaaktype of deze vertrouwelijkheid.".into(),
            ));
        }

        Ok(Zaak {
            uuid: existing.map_or_else(ResourceUuid::new, |e| e.uuid),
            seq: existing.map_or(0, |e| e.seq),
            etag: existing.map(|e| e.etag.clone()).unwrap_or_default(),
            identificatie,
            bronorganisatie,
            omschrijving: input.omschrijving.unwrap_or_default(),
            toelichting: input.toelichting.unwrap_or_default(),
            zaaktype,
            registratiedatum: input
                .registratiedatum
                .unwrap_or_else(|| Utc::now().date_naive()),
            verantwoordelijke_organisatie,
            startdatum,
            einddatum: existing.and_then(|e| e.einddatum),
            einddatum_gepland: input.einddatum_gepland,
            uiterlijke_einddatum_afdoening: input.uiterlijke_einddatum_afdoening,
            publicatiedatum: input.publicatiedatum,
            communicatiekanaal,
            producten_of_diensten: input.producten_of_diensten,
            vertrouwelijkheidaanduiding,
            betalingsindicatie: input.betalingsindicatie,
            laatste_betaaldatum: if nvt { None } else { input.laatste_betaaldatum },
            zaakgeometrie,
            hoofdzaak,
            archiefnominatie: input.archiefnominatie,
            archiefstatus: input.archiefstatus.unwrap_or_default(),
            archiefactiedatum: existing.and_then(|e| e.archiefactiedatum),
            bewaartermijn: existing.and_then(|e| e.bewaartermijn.clone()),
        })
    }

    /// Checks that `url` may become the parent of a case of type `zaaktype`.
    ///
    /// Cases form at most two levels: a parent cannot itself be a sub-case, and a case with
    /// sub-cases cannot become one.
    async fn check_hoofdzaak(
        &self,
        tables: &Tables,
        url: &str,
        zaaktype: &str,
        existing: Option<&Zaak>,
    ) -> ZrcResult<ResourceUuid> {
        let uuid = self.resolve_zaak(tables, "hoofdzaak", url)?;
        if existing.is_some_and(|e| e.uuid == uuid) {
            return Err(ZrcError::field(
                "hoofdzaak",
                CODE_SELF_FORBIDDEN,
                "Een zaak kan niet zijn eigen hoofdzaak zijn.",
            ));
        }

        let parent = get(&tables.zaken, uuid)?;
        let has_deelzaken = existing.is_some_and(|e| !tables.deelzaken_of(e.uuid).is_empty());
        if parent.hoofdzaak.is_some() || has_deelzaken {
            return Err(ZrcError::field(
                "hoofdzaak",
                CODE_DEELZAAK_ALS_HOOFDZAAK,
                "Een deelzaak kan geen hoofdzaak zijn.",
            ));
        }

        let parent_type = self.catalogi.zaaktype(&parent.zaaktype).await?;
        if !parent_type.deelzaaktypen.iter().any(|t| t == zaaktype) {
            return Err(ZrcError::field(
                NON_FIELD_ERRORS,
                CODE_INVALID_DEELZAAKTYPE,
                format!("Zaaktype {zaaktype} is geen deelzaaktype van de hoofdzaak."),
            ));
        }
        Ok(uuid)
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::*;
    use crate::autorisatie::Scope;
    use crate::vertrouwelijkheid::VertrouwelijkheidAanduiding::*;
    use crate::ZrcError;
    use serde_json::json;

    fn codes(err: ZrcError) -> Vec<(String, String)> {
        match err {
            ZrcError::Validation(errors) => errors.into_iter().map(|e| (e.name, e.code)).collect(),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_create_defaults_identificatie_and_vertrouwelijkheid() {
        let registry = registry();

        let first = create_zaak(&registry).await;
        let second = create_zaak(&registry).await;

        assert_eq!(first.body.identificatie, "ZAAK-2018-0000000001");
        assert_eq!(second.body.identificatie, "ZAAK-2018-0000000002");
        assert_eq!(first.body.vertrouwelijkheidaanduiding, Openbaar);
        assert!(first.body.einddatum.is_none());
        assert_eq!(first.etag.len(), 64);
    }

    #[tokio::test]
    async fn test_create_reports_missing_fields_in_camel_case() {
        let err = registry()
            .create_zaak(&superuser(), json!({"omschrijving": "leeg"}))
            .await
            .unwrap_err();

        let names: Vec<String> = codes(err).into_iter().map(|(name, _)| name).collect();
        assert_eq!(
            names,
            vec![
                "zaaktype",
                "bronorganisatie",
                "verantwoordelijkeOrganisatie",
                "startdatum"
            ]
        );
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_zaaktype_and_foreign_products() {
        let registry = registry();

        let mut body = zaak_body();
        body["zaaktype"] = json!("https://ztc.example/api/v1/zaaktypen/404");
        let err = registry.create_zaak(&superuser(), body).await.unwrap_err();
        assert_eq!(codes(err), vec![("zaaktype".into(), "bad-url".into())]);

        let mut body = zaak_body();
        body["productenOfDiensten"] = json!(["https://example.com/product/999"]);
        let err = registry.create_zaak(&superuser(), body).await.unwrap_err();
        assert_eq!(
            codes(err),
            vec![(
                "productenOfDiensten".into(),
                "invalid-products-services".into()
            )]
        );
    }

    #[tokio::test]
    async fn test_duplicate_identificatie_is_rejected() {
        let registry = registry();
        let mut body = zaak_body();
        body["identificatie"] = json!("strtmzk-0001");
        registry.create_zaak(&superuser(), body.clone()).await.unwrap();

        let err = registry.create_zaak(&superuser(), body).await.unwrap_err();
        assert_eq!(
            codes(err),
            vec![("identificatie".into(), "identificatie-niet-uniek".into())]
        );
    }

    #[tokio::test]
    async fn test_betalingsindicatie_nvt() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;
        let uuid = zaak.body.uuid.parse().unwrap();

        let paid = registry
            .partial_update_zaak(
                &superuser(),
                uuid,
                json!({"betalingsindicatie": "geheel", "laatsteBetaaldatum": "2019-01-01T14:03:00Z"}),
            )
            .await
            .unwrap();
        assert!(paid.body.laatste_betaaldatum.is_some());

        let cleared = registry
            .partial_update_zaak(&superuser(), uuid, json!({"betalingsindicatie": "nvt"}))
            .await
            .unwrap();
        assert!(cleared.body.laatste_betaaldatum.is_none());
        assert_ne!(paid.etag, cleared.etag);

        let err = registry
            .partial_update_zaak(
                &superuser(),
                uuid,
                json!({"betalingsindicatie": "nvt", "laatsteBetaaldatum": "2019-01-01T14:03:00Z"}),
            )
            .await
            .unwrap_err();
        assert_eq!(
            codes(err),
            vec![("laatsteBetaaldatum".into(), "betaling-nvt".into())]
        );
    }

    #[tokio::test]
    async fn test_zaaktype_cannot_change() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;

        let err = registry
            .partial_update_zaak(
                &superuser(),
                zaak.body.uuid.parse().unwrap(),
                json!({"zaaktype": DEELZAAKTYPE}),
            )
            .await
            .unwrap_err();
        assert_eq!(
            codes(err),
            vec![("zaaktype".into(), "wijzigen-niet-toegelaten".into())]
        );
    }

    #[tokio::test]
    async fn test_deelzaken() {
        let registry = registry();
        let hoofdzaak = create_zaak(&registry).await;

        let mut body = zaak_body();
        body["zaaktype"] = json!(DEELZAAKTYPE);
        body["hoofdzaak"] = json!(hoofdzaak.body.url);
        let deelzaak = registry.create_zaak(&superuser(), body.clone()).await.unwrap();
        assert_eq!(deelzaak.body.vertrouwelijkheidaanduiding, Intern);

        let refreshed = registry
            .retrieve_zaak(&superuser(), hoofdzaak.body.uuid.parse().unwrap())
            .await
            .unwrap();
        assert_eq!(refreshed.body.deelzaken, vec![deelzaak.body.url.clone()]);
        assert_ne!(refreshed.etag, hoofdzaak.etag);

        // a sub-case cannot be a parent
        body["hoofdzaak"] = json!(deelzaak.body.url);
        let err = registry.create_zaak(&superuser(), body).await.unwrap_err();
        assert_eq!(
            codes(err),
            vec![("hoofdzaak".into(), "deelzaak-als-hoofdzaak".into())]
        );

        // the parent's case-type does not allow its own type as sub-case
        let mut body = zaak_body();
        body["hoofdzaak"] = json!(hoofdzaak.body.url);
        let err = registry.create_zaak(&superuser(), body).await.unwrap_err();
        assert_eq!(
            codes(err),
            vec![("nonFieldErrors".into(), "invalid-deelzaaktype".into())]
        );

        let err = registry
            .partial_update_zaak(
                &superuser(),
                hoofdzaak.body.uuid.parse().unwrap(),
                json!({"hoofdzaak": hoofdzaak.body.url}),
            )
            .await
            .unwrap_err();
        assert_eq!(codes(err), vec![("hoofdzaak".into(), "self-forbidden".into())]);
    }

    #[tokio::test]
    async fn test_delete_refused_with_linked_besluit() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;
        let uuid = zaak.body.uuid.parse().unwrap();
        registry
            .create_zaakbesluit(&superuser(), uuid, json!({"besluit": BESLUIT}))
            .await
            .unwrap();

        let err = registry.delete_zaak(&superuser(), uuid).await.unwrap_err();
        assert!(
            matches!(err, ZrcError::BusinessRule { ref code, .. } if code == "related-besluiten")
        );
        assert!(registry.retrieve_zaak(&superuser(), uuid).await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_cascades() {
        let registry = registry();
        let zaak = create_zaak(&registry).await;
        let uuid = zaak.body.uuid.parse().unwrap();
        let status = set_status(&registry, &zaak.body, STATUSTYPE, "2018-10-01T10:00:00Z").await;

        registry.delete_zaak(&superuser(), uuid).await.unwrap();

        assert!(matches!(
            registry.retrieve_zaak(&superuser(), uuid).await,
            Err(ZrcError::NotFound)
        ));
        assert!(matches!(
            registry
                .retrieve_status(&superuser(), status.body.uuid.parse().unwrap())
                .await,
            Err(ZrcError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_communicatiekanaal_must_be_a_channel() {
        let registry = registry();

        let mut body = zaak_body();
        body["communicatiekanaal"] = json!(KANAAL);
        let zaak = registry.create_zaak(&superuser(), body).await.unwrap();
        assert_eq!(zaak.body.communicatiekanaal.as_deref(), Some(KANAAL));

        let mut body = zaak_body();
        body["communicatiekanaal"] = json!("https://ref.example/api/v1/communicatiekanalen/404");
        let err = registry.create_zaak(&superuser(), body).await.unwrap_err();
        assert!(codes(err).contains(&("communicatiekanaal".into(), "bad-url".into())));

        // A document that exists but is not a channel.
        let mut body = zaak_body();
        body["communicatiekanaal"] = json!(BESLUIT);
        let err = registry.create_zaak(&superuser(), body).await.unwrap_err();
        assert!(codes(err).contains(&("communicatiekanaal".into(), "invalid-resource".into())));
    }

    #[tokio::test]
    async fn test_list_respects_authorizations() {
        let registry = registry();
        for level in ["openbaar", "vertrouwelijk"] {
            let mut body = zaak_body();
            body["vertrouwelijkheidaanduiding"] = json!(level);
            registry.create_zaak(&superuser(), body).await.unwrap();
        }
        let mut body = zaak_body();
        body["zaaktype"] = json!(DEELZAAKTYPE);
        registry.create_zaak(&superuser(), body).await.unwrap();

        let reader = client(&[Scope::ZakenLezen], BeperktOpenbaar);
        let page = registry.list_zaken(&reader, vec![]).await.unwrap();
        assert_eq!(page.count, 1);
        assert_eq!(page.results[0].vertrouwelijkheidaanduiding, Openbaar);

        let page = registry.list_zaken(&superuser(), vec![]).await.unwrap();
        assert_eq!(page.count, 3);
        assert!(page.next.is_some());

        let no_scope = client(&[], Geheim);
        assert!(matches!(
            registry.list_zaken(&no_scope, vec![]).await,
            Err(ZrcError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn test_retrieve_outside_authorizations_is_forbidden() {
        let registry = registry();
        let mut body = zaak_body();
        body["vertrouwelijkheidaanduiding"] = json!("zeer_geheim");
        let zaak = registry.create_zaak(&superuser(), body).await.unwrap();

        let client = client(&[Scope::ZakenLezen], Openbaar);
        let err = registry
            .retrieve_zaak(&client, zaak.body.uuid.parse().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, ZrcError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_list_filters_and_orders_on_startdatum() {
        let registry = registry();
        for start in ["2019-03-01", "2017-01-01", "2018-06-11"] {
            let mut body = zaak_body();
            body["startdatum"] = json!(start);
            registry.create_zaak(&superuser(), body).await.unwrap();
        }

        let page = registry
            .list_zaken(
                &superuser(),
                vec![
                    ("startdatum__gte".into(), "2018-01-01".into()),
                    ("ordering".into(), "-startdatum".into()),
                ],
            )
            .await
            .unwrap();

        let starts: Vec<String> = page
            .results
            .iter()
            .map(|z| z.startdatum.to_string())
            .collect();
        assert_eq!(starts, vec!["2019-03-01", "2018-06-11"]);
    }
}
