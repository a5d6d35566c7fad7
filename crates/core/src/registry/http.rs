use super::{
    Besluit, Besluiten, Catalogi, Communicatiekanaal, Documenten, Eigenschap, Informatieobject,
    Referentielijsten, RegistryError, RegistryResult, Resultaattype, Statustype, Zaaktype,
};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Registry client that fetches documents over HTTP.
#[derive(Clone, Debug)]
pub struct HttpRegistry {
    client: reqwest::Client,
    token: Option<String>,
}

impl HttpRegistry {
    pub fn new(timeout: Duration) -> RegistryResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|source| RegistryError::Request {
                url: String::new(),
                source,
            })?;
        Ok(Self {
            client,
            token: None,
        })
    }

    /// Sends `Authorization: Bearer <token>` with every lookup.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str) -> RegistryResult<T> {
        let mut request = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|source| {
            tracing::error!(url, "registry request failed: {source}");
            RegistryError::Request {
                url: url.to_owned(),
                source,
            }
        })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(RegistryError::NotFound {
                url: url.to_owned(),
            });
        }
        if !status.is_success() {
            tracing::error!(url, status = status.as_u16(), "registry lookup failed");
            return Err(RegistryError::Status {
                url: url.to_owned(),
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| RegistryError::Request {
                url: url.to_owned(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| RegistryError::Shape {
            url: url.to_owned(),
            source,
        })
    }
}

#[async_trait]
impl Catalogi for HttpRegistry {
    async fn zaaktype(&self, url: &str) -> RegistryResult<Zaaktype> {
        self.fetch(url).await
    }

    async fn statustype(&self, url: &str) -> RegistryResult<Statustype> {
        self.fetch(url).await
    }

    async fn resultaattype(&self, url: &str) -> RegistryResult<Resultaattype> {
        self.fetch(url).await
    }

    async fn eigenschap(&self, url: &str) -> RegistryResult<Eigenschap> {
        self.fetch(url).await
    }
}

#[async_trait]
impl Besluiten for HttpRegistry {
    async fn besluit(&self, url: &str) -> RegistryResult<Besluit> {
        self.fetch(url).await
    }
}

#[async_trait]
impl Documenten for HttpRegistry {
    async fn informatieobject(&self, url: &str) -> RegistryResult<Informatieobject> {
        self.fetch(url).await
    }
}

#[async_trait]
impl Referentielijsten for HttpRegistry {
    async fn communicatiekanaal(&self, url: &str) -> RegistryResult<Communicatiekanaal> {
        self.fetch(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> HttpRegistry {
        HttpRegistry::new(Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_fetches_statustype() {
        let mut server = mockito::Server::new_async().await;
        let url = format!("{}/statustypen/1", server.url());
        let mock = server
            .mock("GET", "/statustypen/1")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"url": "{url}", "volgnummer": 2, "isEindstatus": true}}"#
            ))
            .create_async()
            .await;

        let statustype = registry().statustype(&url).await.unwrap();

        mock.assert_async().await;
        assert_eq!(statustype.volgnummer, 2);
        assert!(statustype.is_eindstatus);
    }

    #[tokio::test]
    async fn test_missing_document_is_not_found() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/zaaktypen/404")
            .with_status(404)
            .create_async()
            .await;

        let err = registry()
            .zaaktype(&format!("{}/zaaktypen/404", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_unexpected_shape_and_server_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/resultaattypen/1")
            .with_status(200)
            .with_body(r#"{"unexpected": true}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/besluiten/1")
            .with_status(503)
            .create_async()
            .await;

        let err = registry()
            .resultaattype(&format!("{}/resultaattypen/1", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Shape { .. }));

        let err = registry()
            .besluit(&format!("{}/besluiten/1", server.url()))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Status { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_sends_bearer_token() {
        let mut server = mockito::Server::new_async().await;
        let url = format!("{}/besluiten/2", server.url());
        let mock = server
            .mock("GET", "/besluiten/2")
            .match_header("authorization", "Bearer secret-token")
            .with_status(200)
            .with_body(format!(r#"{{"url": "{url}", "ingangsdatum": "2020-05-03"}}"#))
            .create_async()
            .await;

        let besluit = registry()
            .with_token("secret-token")
            .besluit(&url)
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(
            besluit.ingangsdatum,
            chrono::NaiveDate::from_ymd_opt(2020, 5, 3)
        );
    }

    #[tokio::test]
    async fn test_fetches_document_and_channel() {
        let mut server = mockito::Server::new_async().await;
        let document = format!("{}/enkelvoudiginformatieobjecten/1", server.url());
        let kanaal = format!("{}/communicatiekanalen/1", server.url());
        server
            .mock("GET", "/enkelvoudiginformatieobjecten/1")
            .with_status(200)
            .with_body(format!(r#"{{"url": "{document}", "identificatie": "DOC-1"}}"#))
            .create_async()
            .await;
        server
            .mock("GET", "/communicatiekanalen/1")
            .with_status(200)
            .with_body(r#"{"omschrijving": "geen naam"}"#)
            .create_async()
            .await;

        let found = registry().informatieobject(&document).await.unwrap();
        assert_eq!(found.identificatie.as_deref(), Some("DOC-1"));

        let err = registry().communicatiekanaal(&kanaal).await.unwrap_err();
        assert!(matches!(err, RegistryError::Shape { .. }));
    }
}
