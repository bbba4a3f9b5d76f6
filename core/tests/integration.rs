//! Organization lifecycle against a live local stand-in for the API.
//!
//! # Design
//! Starts a small axum server on a random port that stores organizations in
//! memory and serves canned user views, then drives every step through
//! `ItsYouOnlineClient` over real HTTP using ureq.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use iyo_core::{ApiError, ErrorKind, HttpMethod, HttpResponse, ItsYouOnlineClient, Member, Organization};
use serde_json::{json, Value};

type Store = Arc<RwLock<HashMap<String, Value>>>;

fn stand_in() -> Router {
    let store: Store = Arc::new(RwLock::new(HashMap::new()));
    Router::new()
        .route("/organizations", post(create_organization))
        .route(
            "/organizations/{globalid}",
            get(get_organization).put(update_organization).delete(delete_organization),
        )
        .route("/organizations/{globalid}/members", post(add_member))
        .route("/users/{username}/info", get(user_info))
        .with_state(store)
}

async fn create_organization(State(store): State<Store>, Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let globalid = body["globalid"].as_str().unwrap_or_default().to_string();
    store.write().unwrap().insert(globalid, body.clone());
    (StatusCode::CREATED, Json(body))
}

async fn get_organization(State(store): State<Store>, Path(globalid): Path<String>) -> Result<Json<Value>, StatusCode> {
    let orgs = store.read().unwrap();
    orgs.get(&globalid).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_organization(
    State(store): State<Store>,
    Path(globalid): Path<String>,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    let mut orgs = store.write().unwrap();
    let org = orgs.get_mut(&globalid).ok_or(StatusCode::NOT_FOUND)?;
    *org = body;
    Ok(Json(org.clone()))
}

async fn delete_organization(State(store): State<Store>, Path(globalid): Path<String>) -> StatusCode {
    match store.write().unwrap().remove(&globalid) {
        Some(_) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}

async fn add_member(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(body))
}

async fn user_info(Path(username): Path<String>) -> Json<Value> {
    let mut view = json!({
        "addresses": [],
        "avatar": [],
        "bankaccounts": [],
        "digitalwallet": {"label": "btc", "currencysymbol": "BTC", "address": "1abc"},
        "emailaddresses": [{"label": "main", "emailaddress": format!("{username}@example.com")}],
        "firstname": "Bob",
        "lastname": "Builder",
        "organizations": [],
        "ownerof": {"emailaddresses": []},
        "phonenumbers": [],
        "username": username.clone(),
        "validatedemailaddresses": [],
        "validatedphonenumbers": []
    });
    if username == "broken" {
        view["digitalwallet"] = json!({"label": "btc"});
    }
    Json(view)
}

/// Execute an `HttpRequest` using ureq and return an `HttpResponse`.
///
/// Disables ureq's status-code-as-error behavior so 4xx/5xx responses come
/// back as data and the client does the status interpretation.
fn execute(req: iyo_core::HttpRequest) -> HttpResponse {
    let agent = ureq::Agent::config_builder()
        .http_status_as_error(false)
        .build()
        .new_agent();

    let mut response = match (req.method, req.body) {
        (HttpMethod::Get, _) => agent.get(&req.path).call(),
        (HttpMethod::Delete, _) => agent.delete(&req.path).call(),
        (HttpMethod::Post, Some(body)) => agent.post(&req.path).content_type("application/json").send(body.as_bytes()),
        (HttpMethod::Post, None) => agent.post(&req.path).send_empty(),
        (HttpMethod::Put, Some(body)) => agent.put(&req.path).content_type("application/json").send(body.as_bytes()),
        (HttpMethod::Put, None) => agent.put(&req.path).send_empty(),
    }
    .expect("HTTP transport error");

    let status = response.status().as_u16();
    let body = response.body_mut().read_to_string().unwrap_or_default();

    HttpResponse {
        status,
        headers: Vec::new(),
        body,
    }
}

fn start_server() -> std::net::SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            axum::serve(listener, stand_in()).await
        })
        .unwrap();
    });
    addr
}

#[test]
fn organization_lifecycle() {
    let addr = start_server();
    let client = ItsYouOnlineClient::new(&format!("http://{addr}"));

    // Step 1: get before create should be NotFound.
    let err = client.parse_get_organization(execute(client.build_get_organization("acme"))).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 2: create.
    let mut org = Organization::new("acme");
    org.owners = Some(vec!["bob".to_string()]);
    let req = client.build_create_organization(&org).unwrap();
    let created = client.parse_create_organization(execute(req)).unwrap();
    assert_eq!(created, org);

    // Step 3: fetch it back; unset optionals stay unset.
    let fetched = client.parse_get_organization(execute(client.build_get_organization("acme"))).unwrap();
    assert_eq!(fetched, org);
    assert!(fetched.members.is_none());

    // Step 4: update members.
    org.members = Some(vec!["alice".to_string(), "carol".to_string()]);
    let req = client.build_update_organization("acme", &org).unwrap();
    let updated = client.parse_update_organization(execute(req)).unwrap();
    assert_eq!(updated.members.as_deref(), Some(&["alice".to_string(), "carol".to_string()][..]));

    // Step 5: add a member.
    let member = Member {
        username: "dave".to_string(),
    };
    let req = client.build_add_organization_member("acme", &member).unwrap();
    assert_eq!(client.parse_add_organization_member(execute(req)).unwrap(), member);

    // Step 6: delete, then delete again.
    client.parse_delete_organization(execute(client.build_delete_organization("acme"))).unwrap();
    let err = client.parse_delete_organization(execute(client.build_delete_organization("acme"))).unwrap_err();
    assert!(matches!(err, ApiError::NotFound));
}

#[test]
fn user_information_is_validated() {
    let addr = start_server();
    let client = ItsYouOnlineClient::new(&format!("http://{addr}"));

    let view = client
        .parse_get_user_information(execute(client.build_get_user_information("bob")))
        .unwrap();
    assert_eq!(view.username, "bob");
    assert_eq!(view.emailaddresses[0].emailaddress, "bob@example.com");
    assert!(view.github.is_none());

    let err = client
        .parse_get_user_information(execute(client.build_get_user_information("broken")))
        .unwrap_err();
    match err {
        ApiError::Validation(inner) => {
            assert_eq!(inner.kind(), ErrorKind::MissingRequiredField);
            assert_eq!(inner.field_path(), "digitalwallet.currencysymbol");
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}
