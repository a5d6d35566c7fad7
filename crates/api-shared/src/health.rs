use serde::Serialize;
use utoipa::ToSchema;

/// Body of the health endpoint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Simple health service
///
/// Provides a standardised way to check that the case registry is up.
#[derive(Clone, Default)]
pub struct HealthService;

impl HealthService {
    /// Creates a new `HealthService` instance.
    ///
    /// # Returns
    ///
    /// Returns a stateless `HealthService`.
    pub fn new() -> Self {
        Self
    }

    /// Check health without creating an instance.
    ///
    /// # Returns
    ///
    /// Returns a [`HealthRes`] whose `ok` flag is `true` while the process can serve requests.
    pub fn check_health() -> HealthRes {
        HealthRes {
            ok: true,
            message: "ZRC is alive".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_is_ok() {
        assert!(HealthService::check_health().ok);
    }
}
