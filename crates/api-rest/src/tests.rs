use super::*;
use api_shared::auth::encode_token;
use axum::body::{Body, Bytes};
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use zrc_core::registry::{InMemoryRegistry, Registries};
use zrc_core::{CoreConfig, Scope};

const BASE: &str = "http://testserver/api/v1";
const ZAAKTYPE: &str = "https://ztc.example/api/v1/zaaktypen/1";
const STATUSTYPE: &str = "https://ztc.example/api/v1/statustypen/1";
const BESLUIT: &str = "https://brc.example/api/v1/besluiten/1";

const APPLICATIES: &str = r#"
applicaties:
  - client_id: beheer
    secret: geheim
    heeft_alle_autorisaties: true
  - client_id: lezer
    secret: letmein
    autorisaties:
      - zaaktype: https://ztc.example/api/v1/zaaktypen/1
        max_vertrouwelijkheidaanduiding: openbaar
"#;

fn app() -> Router {
    let fixtures = InMemoryRegistry::new();
    fixtures.insert(
        ZAAKTYPE,
        json!({"url": ZAAKTYPE, "vertrouwelijkheidaanduiding": "openbaar"}),
    );
    fixtures.insert(
        STATUSTYPE,
        json!({"url": STATUSTYPE, "zaaktype": ZAAKTYPE, "volgnummer": 1, "isEindstatus": false}),
    );
    fixtures.insert(BESLUIT, json!({"url": BESLUIT, "ingangsdatum": "2018-03-01"}));
    let fixtures = Arc::new(fixtures);

    let cfg = Arc::new(CoreConfig::new(BASE, 10).unwrap());
    let registry = ZaakRegistry::new(cfg, Registries::shared(fixtures));
    let applicaties = ApplicatieRegistry::from_yaml_str(APPLICATIES).unwrap();
    router(AppState::new(registry, applicaties))
}

fn bearer() -> String {
    format!("Bearer {}", encode_token("beheer", "geheim", &[]).unwrap())
}

struct Sent {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl Sent {
    fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    fn header(&self, name: &str) -> &str {
        self.headers.get(name).unwrap().to_str().unwrap()
    }
}

async fn send(app: &Router, request: Request<Body>) -> Sent {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    Sent {
        status,
        headers,
        body,
    }
}

fn request(method: Method, uri: &str) -> axum::http::request::Builder {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, bearer())
        .header("Accept-Crs", "EPSG:4326")
}

fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    request(method, uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn create_zaak(app: &Router) -> Sent {
    let sent = send(
        app,
        json_request(
            Method::POST,
            "/zaken",
            json!({
                "zaaktype": ZAAKTYPE,
                "bronorganisatie": "517439943",
                "verantwoordelijkeOrganisatie": "517439943",
                "startdatum": "2018-06-11",
            }),
        ),
    )
    .await;
    assert_eq!(sent.status, StatusCode::CREATED, "{:?}", sent.body);
    sent
}

fn path_of(url: &str) -> &str {
    url.strip_prefix(BASE).unwrap()
}

#[tokio::test]
async fn test_create_zaak_sets_location_etag_and_crs() {
    let app = app();
    let created = create_zaak(&app).await;

    let body = created.json();
    assert_eq!(created.header("location"), body["url"].as_str().unwrap());
    assert!(created.header("etag").starts_with('"'));
    assert_eq!(created.header("content-crs"), "EPSG:4326");
}

#[tokio::test]
async fn test_crs_negotiation() {
    let app = app();

    let missing = send(
        &app,
        Request::builder()
            .uri("/zaken")
            .header(header::AUTHORIZATION, bearer())
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(missing.status, StatusCode::PRECONDITION_FAILED);

    let wrong = send(
        &app,
        Request::builder()
            .uri("/zaken")
            .header(header::AUTHORIZATION, bearer())
            .header("Accept-Crs", "EPSG:28992")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(wrong.status, StatusCode::NOT_ACCEPTABLE);

    let ok = send(&app, request(Method::GET, "/zaken").body(Body::empty()).unwrap()).await;
    assert_eq!(ok.status, StatusCode::OK);
    assert_eq!(ok.header("content-crs"), "EPSG:4326");
    assert_eq!(ok.json()["count"], 0);
}

#[tokio::test]
async fn test_if_none_match_returns_not_modified() {
    let app = app();
    let created = create_zaak(&app).await;
    let path = path_of(created.json()["url"].as_str().unwrap()).to_owned();

    let first = send(&app, request(Method::GET, &path).body(Body::empty()).unwrap()).await;
    assert_eq!(first.status, StatusCode::OK);
    let etag = first.header("etag").to_owned();
    assert_eq!(etag, created.header("etag"));

    let cached = send(
        &app,
        request(Method::GET, &path)
            .header(header::IF_NONE_MATCH, &etag)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(cached.status, StatusCode::NOT_MODIFIED);
    assert!(cached.body.is_empty());
    assert_eq!(cached.header("etag"), etag);

    let stale = send(
        &app,
        request(Method::GET, &path)
            .header(header::IF_NONE_MATCH, "\"not-the-current-tag\"")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(stale.status, StatusCode::OK);
}

#[tokio::test]
async fn test_status_changes_zaak_etag() {
    let app = app();
    let created = create_zaak(&app).await;
    let url = created.json()["url"].as_str().unwrap().to_owned();
    let before = created.header("etag").to_owned();

    let status = send(
        &app,
        json_request(
            Method::POST,
            "/statussen",
            json!({"zaak": url, "statustype": STATUSTYPE, "datumStatusGezet": "2018-06-12T10:00:00Z"}),
        ),
    )
    .await;
    assert_eq!(status.status, StatusCode::CREATED);
    assert!(status.headers.get("content-crs").is_none());

    let after = send(
        &app,
        request(Method::GET, path_of(&url))
            .header(header::IF_NONE_MATCH, &before)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(after.status, StatusCode::OK);
    assert_ne!(after.header("etag"), before);
    assert_eq!(after.json()["status"], status.json()["url"]);
}

#[tokio::test]
async fn test_head_has_headers_without_body() {
    let app = app();
    let created = create_zaak(&app).await;
    let path = path_of(created.json()["url"].as_str().unwrap()).to_owned();

    let head = send(&app, request(Method::HEAD, &path).body(Body::empty()).unwrap()).await;
    assert_eq!(head.status, StatusCode::OK);
    assert!(head.body.is_empty());
    assert_eq!(head.header("etag"), created.header("etag"));
}

#[tokio::test]
async fn test_missing_token_is_forbidden() {
    let app = app();
    let sent = send(
        &app,
        Request::builder()
            .uri("/statussen")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(sent.status, StatusCode::FORBIDDEN);
    let fout = sent.json();
    assert_eq!(fout["code"], "permission_denied");
    assert_eq!(fout["type"], "/ref/fouten/PermissionDenied/");
    assert!(fout["instance"].as_str().unwrap().starts_with("urn:uuid:"));
}

#[tokio::test]
async fn test_scope_is_checked() {
    let app = app();
    let token = encode_token("lezer", "letmein", &[Scope::ZakenLezen]).unwrap();
    let sent = send(
        &app,
        Request::builder()
            .method(Method::POST)
            .uri("/zaken")
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header("Accept-Crs", "EPSG:4326")
            .body(Body::from("{}"))
            .unwrap(),
    )
    .await;
    assert_eq!(sent.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_validation_error_lists_invalid_params() {
    let app = app();
    let sent = send(&app, json_request(Method::POST, "/zaken", json!({}))).await;
    assert_eq!(sent.status, StatusCode::BAD_REQUEST);
    let fout = sent.json();
    assert_eq!(fout["code"], "invalid");
    let names: Vec<&str> = fout["invalidParams"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert!(names.contains(&"zaaktype"));
}

#[tokio::test]
async fn test_malformed_json_is_parse_error() {
    let app = app();
    let sent = send(
        &app,
        request(Method::POST, "/zaken")
            .body(Body::from("{not json"))
            .unwrap(),
    )
    .await;
    assert_eq!(sent.status, StatusCode::BAD_REQUEST);
    assert_eq!(sent.json()["invalidParams"][0]["code"], "parse_error");
}

#[tokio::test]
async fn test_non_uuid_path_is_not_found() {
    let app = app();
    let sent = send(
        &app,
        request(Method::GET, "/zaken/not-a-uuid")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(sent.status, StatusCode::NOT_FOUND);
    assert_eq!(sent.json()["code"], "not_found");
}

#[tokio::test]
async fn test_delete_blocked_by_linked_besluit() {
    let app = app();
    let created = create_zaak(&app).await;
    let path = path_of(created.json()["url"].as_str().unwrap()).to_owned();

    let link = send(
        &app,
        json_request(
            Method::POST,
            &format!("{path}/besluiten"),
            json!({"besluit": BESLUIT}),
        ),
    )
    .await;
    assert_eq!(link.status, StatusCode::CREATED);

    let refused = send(&app, request(Method::DELETE, &path).body(Body::empty()).unwrap()).await;
    assert_eq!(refused.status, StatusCode::BAD_REQUEST);
    let fout = refused.json();
    assert_eq!(fout["invalidParams"][0]["name"], "nonFieldErrors");
    assert_eq!(fout["invalidParams"][0]["code"], "related-besluiten");

    let unlink = send(
        &app,
        request(Method::DELETE, path_of(link.json()["url"].as_str().unwrap()))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(unlink.status, StatusCode::NO_CONTENT);

    let deleted = send(&app, request(Method::DELETE, &path).body(Body::empty()).unwrap()).await;
    assert_eq!(deleted.status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_openapi_document_is_served() {
    let app = app();
    let sent = send(
        &app,
        Request::builder()
            .uri("/api-docs/openapi.json")
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(sent.status, StatusCode::OK);
    assert!(sent.json()["paths"]["/zaken/{uuid}"].is_object());
}

#[tokio::test]
async fn test_health() {
    let sent = send(&app(), Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(sent.status, StatusCode::OK);
    assert_eq!(sent.json()["ok"], true);
}
