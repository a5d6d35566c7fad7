//! Access-scope filtering.
//!
//! A caller is described by an [`AuthContext`]: the scopes carried on its token plus the
//! (zaaktype, confidentiality ceiling) authorizations looked up for its application. Scopes are
//! checked first and independently of any instance; the instance filter then decides whether a
//! particular case is visible. Sub-resources never carry their own filter, callers pass the
//! parent case's zaaktype and confidentiality.

use crate::vertrouwelijkheid::VertrouwelijkheidAanduiding;
use crate::{ZrcError, ZrcResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Named capabilities a token can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Scope {
    ZakenLezen,
    ZakenAanmaken,
    ZakenBijwerken,
    ZakenVerwijderen,
    ZakenHeropenen,
    StatussenToevoegen,
}

impl Scope {
    pub const ALL: [Scope; 6] = [
        Scope::ZakenLezen,
        Scope::ZakenAanmaken,
        Scope::ZakenBijwerken,
        Scope::ZakenVerwijderen,
        Scope::ZakenHeropenen,
        Scope::StatussenToevoegen,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::ZakenLezen => "zds.scopes.zaken.lezen",
            Scope::ZakenAanmaken => "zds.scopes.zaken.aanmaken",
            Scope::ZakenBijwerken => "zds.scopes.zaken.bijwerken",
            Scope::ZakenVerwijderen => "zds.scopes.zaken.verwijderen",
            Scope::ZakenHeropenen => "zds.scopes.zaken.heropenen",
            Scope::StatussenToevoegen => "zds.scopes.statussen.toevoegen",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| format!("unknown scope '{s}'"))
    }
}

/// One (zaaktype, confidentiality ceiling) grant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Autorisatie {
    pub zaaktype: String,
    pub max_vertrouwelijkheidaanduiding: VertrouwelijkheidAanduiding,
}

/// Everything the core needs to know about the caller of an operation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthContext {
    pub client_id: String,
    /// Bypasses both the scope checks and the instance filter.
    pub heeft_alle_autorisaties: bool,
    pub scopes: BTreeSet<Scope>,
    pub autorisaties: Vec<Autorisatie>,
}

impl AuthContext {
    pub fn superuser(client_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            heeft_alle_autorisaties: true,
            ..Self::default()
        }
    }

    pub fn has_scope(&self, scope: Scope) -> bool {
        self.heeft_alle_autorisaties || self.scopes.contains(&scope)
    }

    pub fn has_any_scope(&self, scopes: &[Scope]) -> bool {
        scopes.iter().any(|scope| self.has_scope(*scope))
    }

    /// Fails with [`ZrcError::Forbidden`] unless at least one of `scopes` is held.
    pub fn require_any_scope(&self, scopes: &[Scope]) -> ZrcResult<()> {
        if self.has_any_scope(scopes) {
            return Ok(());
        }
        tracing::warn!(client_id = %self.client_id, "missing required scope");
        Err(ZrcError::Forbidden(format!(
            "Een van de scopes {} is vereist.",
            scopes
                .iter()
                .map(Scope::as_str)
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }

    /// The instance filter: is a case of this type and confidentiality visible at all?
    pub fn permits(&self, zaaktype: &str, level: VertrouwelijkheidAanduiding) -> bool {
        self.heeft_alle_autorisaties
            || self
                .autorisaties
                .iter()
                .any(|a| a.zaaktype == zaaktype && level <= a.max_vertrouwelijkheidaanduiding)
    }

    /// Scope check followed by the instance filter, both failing as Forbidden.
    pub fn require_access(
        &self,
        scopes: &[Scope],
        zaaktype: &str,
        level: VertrouwelijkheidAanduiding,
    ) -> ZrcResult<()> {
        self.require_any_scope(scopes)?;
        if self.permits(zaaktype, level) {
            return Ok(());
        }
        tracing::warn!(client_id = %self.client_id, zaaktype, "case excluded by authorizations");
        Err(ZrcError::Forbidden(
            "U heeft geen toegang tot deze zaak.".into(),
        ))
    }
}
