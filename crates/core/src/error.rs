use crate::registry::RegistryError;

/// A single rejected input field, reported back to the client under its wire (camelCase) name.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, utoipa::ToSchema)]
pub struct FieldError {
    pub name: String,
    pub code: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(name: impl Into<String>, code: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            reason: reason.into(),
        }
    }

    pub fn required(name: &str) -> Self {
        Self::new(name, "required", "Dit veld is vereist.")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ZrcError {
    #[error("invalid input: {}", describe(.0))]
    Validation(Vec<FieldError>),

    /// A rule spanning several fields or resources was violated.
    #[error("{code}: {reason}")]
    BusinessRule { code: String, reason: String },

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("resource not found")]
    NotFound,

    #[error("registry lookup failed: {0}")]
    Upstream(#[from] RegistryError),

    #[error("configuration error: {0}")]
    Configuration(String),

    /// Another write committed between this write's snapshot and its commit.
    #[error("the store changed while the write was in progress")]
    Conflict,
}

fn describe(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{} ({})", e.name, e.code))
        .collect::<Vec<_>>()
        .join(", ")
}

impl ZrcError {
    pub fn field(name: &str, code: &str, reason: impl Into<String>) -> Self {
        ZrcError::Validation(vec![FieldError::new(name, code, reason)])
    }

    pub fn rule(code: &str, reason: impl Into<String>) -> Self {
        ZrcError::BusinessRule {
            code: code.to_owned(),
            reason: reason.into(),
        }
    }

    /// Maps a failed lookup of a reference field onto the error the client should see.
    ///
    /// A reference the registry does not know is a bad value for that field; anything else
    /// means the registry itself failed.
    pub fn from_reference(field: &str, err: RegistryError) -> Self {
        match err {
            RegistryError::NotFound { url } => ZrcError::field(
                field,
                crate::constants::CODE_BAD_URL,
                format!("De URL {url} kon niet opgehaald worden."),
            ),
            other => ZrcError::Upstream(other),
        }
    }

    /// Like [`ZrcError::from_reference`], but a document that does not look like the expected
    /// resource is also the client's fault.
    pub fn from_resource(field: &str, err: RegistryError) -> Self {
        match err {
            RegistryError::Shape { url, .. } => ZrcError::field(
                field,
                crate::constants::CODE_INVALID_RESOURCE,
                format!("De URL {url} wijst niet naar een geldige resource."),
            ),
            other => Self::from_reference(field, other),
        }
    }
}

pub type ZrcResult<T> = std::result::Result<T, ZrcError>;

/// Collects field errors while validating an input and fails once at the end.
#[derive(Debug, Default)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn push(&mut self, error: FieldError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwraps a required value, recording a `required` error when it is absent.
    pub fn require<T>(&mut self, name: &str, value: Option<T>) -> Option<T> {
        if value.is_none() {
            self.push(FieldError::required(name));
        }
        value
    }

    pub fn into_error(self) -> ZrcError {
        ZrcError::Validation(self.0)
    }

    pub fn finish(self) -> ZrcResult<()> {
        if self.0.is_empty() {
            Ok(())
        } else {
            Err(ZrcError::Validation(self.0))
        }
    }
}

/// Decodes a JSON value into `T`, naming the offending field on failure.
pub fn decode<T: serde::de::DeserializeOwned>(value: serde_json::Value) -> ZrcResult<T> {
    serde_path_to_error::deserialize(value).map_err(|err| {
        let path = err.path().to_string();
        let name = if path.is_empty() || path == "." {
            crate::constants::NON_FIELD_ERRORS.to_owned()
        } else {
            path
        };
        ZrcError::Validation(vec![FieldError::new(
            name,
            "invalid",
            err.into_inner().to_string(),
        )])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, serde::Deserialize)]
    #[serde(rename_all = "camelCase")]
    #[allow(dead_code)]
    struct Sample {
        startdatum: Option<chrono::NaiveDate>,
        verantwoordelijke_organisatie: Option<String>,
    }

    #[test]
    fn test_decode_names_failing_field_in_camel_case() {
        let err = decode::<Sample>(serde_json::json!({
            "startdatum": "2018-06-11",
            "verantwoordelijkeOrganisatie": 12,
        }))
        .unwrap_err();

        match err {
            ZrcError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].name, "verantwoordelijkeOrganisatie");
                assert_eq!(errors[0].code, "invalid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_reference_distinguishes_unknown_urls() {
        let err = ZrcError::from_reference(
            "zaaktype",
            RegistryError::NotFound {
                url: "https://example.com/zaaktypen/1".into(),
            },
        );
        assert!(matches!(err, ZrcError::Validation(ref e) if e[0].code == "bad-url"));

        let err = ZrcError::from_reference(
            "zaaktype",
            RegistryError::Status {
                url: "https://example.com/zaaktypen/1".into(),
                status: 500,
            },
        );
        assert!(matches!(err, ZrcError::Upstream(_)));
    }

    #[test]
    fn test_from_resource_blames_client_for_wrong_shape() {
        let shape = serde_json::from_str::<crate::registry::Communicatiekanaal>("{}").unwrap_err();
        let err = ZrcError::from_resource(
            "communicatiekanaal",
            RegistryError::Shape {
                url: "https://ref.example/api/v1/".into(),
                source: shape,
            },
        );
        assert!(matches!(err, ZrcError::Validation(ref e) if e[0].code == "invalid-resource"));

        let err = ZrcError::from_resource(
            "communicatiekanaal",
            RegistryError::NotFound {
                url: "https://ref.example/api/v1/kanalen/1".into(),
            },
        );
        assert!(matches!(err, ZrcError::Validation(ref e) if e[0].code == "bad-url"));
    }
}
