use super::{
    Besluit, Besluiten, Catalogi, Communicatiekanaal, Documenten, Eigenschap, Informatieobject,
    Referentielijsten, RegistryError, RegistryResult, Resultaattype, Statustype, Zaaktype,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

/// Registry backed by an in-process map of URL to document.
///
/// Used by tests and by deployments that run against a fixture file instead of live registries.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    documents: RwLock<HashMap<String, Value>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a YAML mapping of URL to document.
    ///
    /// # Errors
    ///
    /// Returns an error string if the file cannot be read or is not a mapping.
    pub fn from_yaml_file(path: &Path) -> Result<Self, String> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read {}: {e}", path.display()))?;
        Self::from_yaml_str(&text).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn from_yaml_str(text: &str) -> Result<Self, String> {
        let documents: HashMap<String, Value> =
            serde_yaml::from_str(text).map_err(|e| format!("invalid registry fixtures: {e}"))?;
        Ok(Self {
            documents: RwLock::new(documents),
        })
    }

    pub fn insert(&self, url: impl Into<String>, document: Value) {
        if let Ok(mut documents) = self.documents.write() {
            documents.insert(url.into(), document);
        }
    }

    /// Stores a typed document under its own URL.
    pub fn put<T: Serialize>(&self, url: &str, document: &T) {
        if let Ok(value) = serde_json::to_value(document) {
            self.insert(url, value);
        }
    }

    fn get<T: DeserializeOwned>(&self, url: &str) -> RegistryResult<T> {
        let document = self
            .documents
            .read()
            .ok()
            .and_then(|documents| documents.get(url).cloned())
            .ok_or_else(|| RegistryError::NotFound {
                url: url.to_owned(),
            })?;
        serde_json::from_value(document).map_err(|source| RegistryError::Shape {
            url: url.to_owned(),
            source,
        })
    }
}

#[async_trait]
impl Catalogi for InMemoryRegistry {
    async fn zaaktype(&self, url: &str) -> RegistryResult<Zaaktype> {
        self.get(url)
    }

    async fn statustype(&self, url: &str) -> RegistryResult<Statustype> {
        self.get(url)
    }

    async fn resultaattype(&self, url: &str) -> RegistryResult<Resultaattype> {
        self.get(url)
    }

    async fn eigenschap(&self, url: &str) -> RegistryResult<Eigenschap> {
        self.get(url)
    }
}

#[async_trait]
impl Besluiten for InMemoryRegistry {
    async fn besluit(&self, url: &str) -> RegistryResult<Besluit> {
        self.get(url)
    }
}

#[async_trait]
impl Documenten for InMemoryRegistry {
    async fn informatieobject(&self, url: &str) -> RegistryResult<Informatieobject> {
        self.get(url)
    }
}

#[async_trait]
impl Referentielijsten for InMemoryRegistry {
    async fn communicatiekanaal(&self, url: &str) -> RegistryResult<Communicatiekanaal> {
        self.get(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archief::Afleidingswijze;
    use std::io::Write;

    const FIXTURES: &str = r#"
"http://ztc.example/zaaktypen/1":
  url: "http://ztc.example/zaaktypen/1"
  vertrouwelijkheidaanduiding: openbaar
  productenOfDiensten: ["https://example.com/product/123"]
"http://ztc.example/resultaattypen/1":
  url: "http://ztc.example/resultaattypen/1"
  archiefactietermijn: P10Y
  archiefnominatie: vernietigen
  brondatumArchiefprocedure:
    afleidingswijze: afgehandeld
"#;

    #[tokio::test]
    async fn test_loads_fixture_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURES.as_bytes()).unwrap();

        let registry = InMemoryRegistry::from_yaml_file(file.path()).unwrap();

        let zaaktype = registry
            .zaaktype("http://ztc.example/zaaktypen/1")
            .await
            .unwrap();
        assert_eq!(zaaktype.producten_of_diensten.len(), 1);

        let resultaattype = registry
            .resultaattype("http://ztc.example/resultaattypen/1")
            .await
            .unwrap();
        assert_eq!(
            resultaattype
                .brondatum_archiefprocedure
                .unwrap()
                .afleidingswijze,
            Afleidingswijze::Afgehandeld
        );
    }

    #[tokio::test]
    async fn test_unknown_url_is_not_found() {
        let registry = InMemoryRegistry::new();
        let err = registry
            .statustype("http://ztc.example/statustypen/9")
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[test]
    fn test_rejects_non_mapping_fixtures() {
        assert!(InMemoryRegistry::from_yaml_str("- just\n- a list\n").is_err());
    }
}
