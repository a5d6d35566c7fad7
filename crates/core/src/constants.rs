//! Constants used throughout the ZRC core crate.
//!
//! Collection paths, error codes and defaults live here so the REST layer and the core agree on
//! them without duplicating string literals.

/// Collection path for cases.
pub const ZAKEN: &str = "zaken";

/// Collection path for statuses.
pub const STATUSSEN: &str = "statussen";

/// Collection path for results.
pub const RESULTATEN: &str = "resultaten";

/// Collection path for roles.
pub const ROLLEN: &str = "rollen";

/// Nested collection path (under a case) for case properties.
pub const ZAAKEIGENSCHAPPEN: &str = "zaakeigenschappen";

/// Nested collection path (under a case) for linked decisions.
pub const ZAAKBESLUITEN: &str = "besluiten";

/// Collection path for case/document links.
pub const ZAAKINFORMATIEOBJECTEN: &str = "zaakinformatieobjecten";

/// Collection path for case/contact-moment links.
pub const ZAAKCONTACTMOMENTEN: &str = "zaakcontactmomenten";

/// Default number of cases per list page.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Default API root used when none is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/v1";

/// Default timeout for outbound registry lookups, in seconds.
pub const DEFAULT_REGISTRY_TIMEOUT_SECS: u64 = 10;

/// Prefix of generated case identifications.
pub const IDENTIFICATIE_PREFIX: &str = "ZAAK";

/// Name used for errors that do not belong to a single field.
pub const NON_FIELD_ERRORS: &str = "nonFieldErrors";

pub const CODE_BAD_URL: &str = "bad-url";
pub const CODE_INVALID_RESOURCE: &str = "invalid-resource";
pub const CODE_UNIQUE: &str = "unique";
pub const CODE_DOES_NOT_EXIST: &str = "does_not_exist";
pub const CODE_INVALID_DEELZAAKTYPE: &str = "invalid-deelzaaktype";
pub const CODE_DEELZAAK_ALS_HOOFDZAAK: &str = "deelzaak-als-hoofdzaak";
pub const CODE_SELF_FORBIDDEN: &str = "self-forbidden";
pub const CODE_RELATED_BESLUITEN: &str = "related-besluiten";
pub const CODE_INVALID_PRODUCTS_SERVICES: &str = "invalid-products-services";
pub const CODE_BETALING_NVT: &str = "betaling-nvt";
pub const CODE_WIJZIGEN_NIET_TOEGELATEN: &str = "wijzigen-niet-toegelaten";
pub const CODE_IDENTIFICATIE_NIET_UNIEK: &str = "identificatie-niet-uniek";
pub const CODE_ZAAKTYPE_MISMATCH: &str = "zaaktype-mismatch";
pub const CODE_INVALID_BETROKKENE: &str = "invalid-betrokkene";
pub const CODE_INVALID_GEOMETRY: &str = "invalid-geometry";
pub const CODE_ARCHIEFACTIEDATUM_ERROR: &str = "archiefactiedatum-error";
pub const CODE_UNKNOWN_PARAMETERS: &str = "unknown-parameters";
