//! Internal implementation of the resource identifier services.

use crate::{UuidError, UuidResult};
use std::{fmt, str::FromStr};

/// Re-exported for convenience.
pub use ::uuid::Uuid;

/// ZRC's canonical UUID representation (36 lowercase characters, hyphenated).
///
/// Once constructed, the contained UUID renders identically in every URL that mentions it.
///
/// # Construction
/// - [`ResourceUuid::new`] generates a fresh identifier for a new resource.
/// - [`ResourceUuid::parse`] validates an externally supplied identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceUuid(Uuid);

impl Default for ResourceUuid {
    fn default() -> Self {
        Self::new()
    }
}

impl ResourceUuid {
    /// Generates a new random (version 4) resource identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Validates and parses a UUID string that must already be in canonical form.
    ///
    /// # Arguments
    ///
    /// * `input` - UUID string to validate, typically the last segment of a request path.
    ///
    /// # Returns
    ///
    /// Returns the validated [`ResourceUuid`] on success.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if `input` is not canonical.
    pub fn parse(input: &str) -> UuidResult<Self> {
        if !Self::is_canonical(input) {
            return Err(UuidError::InvalidInput(format!(
                "UUID must be 36 lowercase hyphenated characters, got: '{input}'"
            )));
        }
        Uuid::parse_str(input)
            .map(Self)
            .map_err(|e| UuidError::InvalidInput(e.to_string()))
    }

    /// Returns the underlying `uuid::Uuid`.
    pub fn uuid(&self) -> Uuid {
        self.0
    }

    /// Checks whether `input` is in canonical hyphenated lowercase form.
    ///
    /// This is a purely syntactic check.
    ///
    /// # Arguments
    ///
    /// * `input` - Candidate UUID string.
    ///
    /// # Returns
    ///
    /// Returns `true` if `input` is canonical, otherwise `false`.
    pub fn is_canonical(input: &str) -> bool {
        input.len() == 36
            && input.bytes().enumerate().all(|(i, b)| match i {
                8 | 13 | 18 | 23 => b == b'-',
                _ => matches!(b, b'0'..=b'9' | b'a'..=b'f'),
            })
    }
}

impl From<Uuid> for ResourceUuid {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ResourceUuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for ResourceUuid {
    type Err = UuidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResourceUuid::parse(s)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for ResourceUuid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for ResourceUuid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ResourceUuid::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Builds absolute resource URLs under a fixed API root and resolves them back.
///
/// A collection path is the part between the API root and the identifier, for example
/// `zaken` or `zaken/{zaak_uuid}/zaakeigenschappen`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceUrls {
    base: String,
}

impl ResourceUrls {
    /// Creates a builder rooted at `base` (trailing slashes are ignored).
    ///
    /// # Arguments
    ///
    /// * `base` - API root, for example `http://localhost:8000/api/v1`.
    ///
    /// # Returns
    ///
    /// Returns a [`ResourceUrls`] that builds and resolves URLs under `base`.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] unless `base` is an absolute http(s) URL.
    pub fn new(base: impl AsRef<str>) -> UuidResult<Self> {
        let base = base.as_ref().trim().trim_end_matches('/');
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(UuidError::InvalidInput(format!(
                "API root must be an absolute http(s) URL, got: '{base}'"
            )));
        }
        Ok(Self {
            base: base.to_owned(),
        })
    }

    /// Returns the API root, without a trailing slash.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Builds the URL of a top-level resource.
    ///
    /// # Arguments
    ///
    /// * `collection` - Collection path, for example `zaken`.
    /// * `uuid` - Identifier of the resource.
    ///
    /// # Returns
    ///
    /// Returns `<base>/<collection>/<uuid>`.
    pub fn url(&self, collection: &str, uuid: &ResourceUuid) -> String {
        format!("{}/{}/{}", self.base, collection, uuid)
    }

    /// Builds the URL of a resource nested under a parent.
    ///
    /// # Arguments
    ///
    /// * `parent` - Collection path of the parent, for example `zaken`.
    /// * `parent_uuid` - Identifier of the parent.
    /// * `child` - Nested collection path, for example `zaakeigenschappen`.
    /// * `uuid` - Identifier of the nested resource.
    ///
    /// # Returns
    ///
    /// Returns `<base>/<parent>/<parent_uuid>/<child>/<uuid>`.
    pub fn nested_url(
        &self,
        parent: &str,
        parent_uuid: &ResourceUuid,
        child: &str,
        uuid: &ResourceUuid,
    ) -> String {
        format!(
            "{}/{}/{}/{}/{}",
            self.base, parent, parent_uuid, child, uuid
        )
    }

    /// Resolves a URL produced by [`ResourceUrls::url`] back to its UUID.
    ///
    /// # Arguments
    ///
    /// * `collection` - Collection path the URL must belong to.
    /// * `url` - Absolute resource URL, with or without a trailing slash.
    ///
    /// # Returns
    ///
    /// Returns the [`ResourceUuid`] at the end of `url`.
    ///
    /// # Errors
    ///
    /// Returns [`UuidError::InvalidInput`] if the URL is not under this root and collection or
    /// does not end in a canonical UUID.
    pub fn resolve(&self, collection: &str, url: &str) -> UuidResult<ResourceUuid> {
        let prefix = format!("{}/{}/", self.base, collection);
        let rest = url.strip_prefix(&prefix).ok_or_else(|| {
            UuidError::InvalidInput(format!("'{url}' is not a {collection} resource URL"))
        })?;
        ResourceUuid::parse(rest.trim_end_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://testserver/api/v1";

    #[test]
    fn test_new_uuid_is_canonical() {
        let id = ResourceUuid::new();
        assert!(ResourceUuid::is_canonical(&id.to_string()));
    }

    #[test]
    fn test_parse_rejects_non_canonical_forms() {
        assert!(ResourceUuid::parse("550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(ResourceUuid::parse("550E8400-E29B-41D4-A716-446655440000").is_err());
        assert!(ResourceUuid::parse("550e8400e29b41d4a716446655440000").is_err());
        assert!(ResourceUuid::parse("").is_err());
    }

    #[test]
    fn test_url_resolves_back_to_uuid() {
        let urls = ResourceUrls::new(format!("{BASE}/")).unwrap();
        let id = ResourceUuid::new();
        let url = urls.url("zaken", &id);
        assert_eq!(url, format!("{BASE}/zaken/{id}"));
        assert_eq!(urls.resolve("zaken", &url).unwrap(), id);
    }

    #[test]
    fn test_resolve_rejects_other_collections_and_hosts() {
        let urls = ResourceUrls::new(BASE).unwrap();
        let id = ResourceUuid::new();
        assert!(urls.resolve("zaken", &urls.url("statussen", &id)).is_err());
        assert!(urls
            .resolve("zaken", &format!("https://elsewhere.nl/api/v1/zaken/{id}"))
            .is_err());
    }

    #[test]
    fn test_base_must_be_absolute() {
        assert!(ResourceUrls::new("/api/v1").is_err());
    }

    #[test]
    fn test_nested_url() {
        let urls = ResourceUrls::new(BASE).unwrap();
        let zaak = ResourceUuid::new();
        let eigenschap = ResourceUuid::new();
        assert_eq!(
            urls.nested_url("zaken", &zaak, "zaakeigenschappen", &eigenschap),
            format!("{BASE}/zaken/{zaak}/zaakeigenschappen/{eigenschap}")
        );
    }
}
