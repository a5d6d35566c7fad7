//! Bearer-token authentication.
//!
//! Clients send an HS256 JWT signed with their own secret. The `client_id` claim is read first
//! (without verifying) to find the application and its secret, then the token is verified
//! against that secret. Scopes come from the token; the superuser flag and the
//! (zaaktype, confidentiality ceiling) authorizations come from the application registry.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet};
use std::path::Path;
use zrc_core::{AuthContext, Autorisatie, Scope};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("authorization header missing")]
    MissingToken,
    #[error("authorization header is not a bearer token")]
    NotBearer,
    #[error("malformed token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),
    #[error("unknown client '{0}'")]
    UnknownClient(String),
    #[error("invalid signature for client '{0}'")]
    InvalidSignature(String),
    #[error("failed to read applicaties file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse applicaties file: {0}")]
    Parse(#[from] serde_yaml::Error),
}

pub type AuthResult<T> = std::result::Result<T, AuthError>;

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ZdsClaims {
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub client_id: String,
    #[serde(default)]
    pub iat: i64,
    #[serde(default)]
    pub zds: ZdsClaims,
}

/// A registered client application.
#[derive(Clone, Debug, Deserialize)]
pub struct Applicatie {
    pub client_id: String,
    pub secret: String,
    #[serde(default)]
    pub heeft_alle_autorisaties: bool,
    #[serde(default)]
    pub autorisaties: Vec<Autorisatie>,
}

#[derive(Debug, Deserialize)]
struct ApplicatiesFile {
    applicaties: Vec<Applicatie>,
}

/// Client applications by `client_id`.
#[derive(Clone, Debug, Default)]
pub struct ApplicatieRegistry {
    applicaties: HashMap<String, Applicatie>,
}

impl ApplicatieRegistry {
    pub fn new(applicaties: impl IntoIterator<Item = Applicatie>) -> Self {
        Self {
            applicaties: applicaties
                .into_iter()
                .map(|a| (a.client_id.clone(), a))
                .collect(),
        }
    }

    /// Loads the registry from a YAML file with a top-level `applicaties` list.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Read`] or [`AuthError::Parse`] when the file cannot be loaded.
    pub fn from_yaml_file(path: &Path) -> AuthResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(contents: &str) -> AuthResult<Self> {
        let file: ApplicatiesFile = serde_yaml::from_str(contents)?;
        Ok(Self::new(file.applicaties))
    }

    pub fn len(&self) -> usize {
        self.applicaties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applicaties.is_empty()
    }

    /// Turns an `Authorization` header value into the caller's context.
    ///
    /// Unknown scopes on the token are ignored.
    pub fn authenticate(&self, header: Option<&str>) -> AuthResult<AuthContext> {
        let header = header.ok_or(AuthError::MissingToken)?;
        let token = header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .ok_or(AuthError::NotBearer)?;

        let client_id = unverified_client_id(token)?;
        let applicatie = self
            .applicaties
            .get(&client_id)
            .ok_or_else(|| AuthError::UnknownClient(client_id.clone()))?;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(applicatie.secret.as_bytes()),
            &validation(),
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                AuthError::InvalidSignature(client_id.clone())
            }
            _ => AuthError::Malformed(e),
        })?
        .claims;

        let scopes: BTreeSet<Scope> = claims
            .zds
            .scopes
            .iter()
            .filter_map(|s| s.parse().ok())
            .collect();
        tracing::debug!(client_id = %client_id, scopes = scopes.len(), "client authenticated");

        Ok(AuthContext {
            client_id,
            heeft_alle_autorisaties: applicatie.heeft_alle_autorisaties,
            scopes,
            autorisaties: applicatie.autorisaties.clone(),
        })
    }
}

fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims = HashSet::new();
    validation
}

fn unverified_client_id(token: &str) -> AuthResult<String> {
    let mut validation = validation();
    validation.insecure_disable_signature_validation();
    let data = decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(AuthError::Malformed)?;
    Ok(data.claims.client_id)
}

/// Mints a token for `client_id`, as a client application would.
pub fn encode_token(client_id: &str, secret: &str, scopes: &[Scope]) -> AuthResult<String> {
    let claims = Claims {
        client_id: client_id.to_owned(),
        iat: chrono::Utc::now().timestamp(),
        zds: ZdsClaims {
            scopes: scopes.iter().map(|s| s.as_str().to_owned()).collect(),
        },
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(AuthError::Malformed)
}
