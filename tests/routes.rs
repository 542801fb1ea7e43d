use actix_web::http::{StatusCode, header};
use actix_web::{App, test};
use jsonwebtoken::{EncodingKey, Header, encode};
use serde_json::{Value, json};
use support_desk::AppState;
use support_desk::domain::auth::AuthenticatedUser;
use support_desk::models::config::ServerConfig;
use support_desk::repository::DieselRepository;

mod common;

const SECRET: &str = "route-test-secret";
const ORG: &str = "3f0f1c3e-6f5e-4c36-9a53-0f2f4a0b7a11";

fn server_config() -> ServerConfig {
    ServerConfig {
        address: "127.0.0.1".to_string(),
        port: 0,
        database_url: String::new(),
        secret: SECRET.to_string(),
        default_page_size: 20,
        max_page_size: 100,
        cache_ttl_secs: 60,
        cache_capacity: 1000,
    }
}

fn bearer(org_id: &str, roles: &[&str]) -> String {
    let claims = AuthenticatedUser {
        sub: "agent-1".to_string(),
        email: "agent@example.com".to_string(),
        name: "Agent".to_string(),
        org_id: org_id.to_string(),
        roles: roles.iter().map(|r| r.to_string()).collect(),
        exp: 4_102_444_800,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap();
    format!("Bearer {token}")
}

fn agent() -> (header::HeaderName, String) {
    (header::AUTHORIZATION, bearer(ORG, &["support"]))
}

macro_rules! app {
    ($test_db:expr) => {{
        let state = AppState::new(DieselRepository::new($test_db.pool()), server_config());
        test::init_service(App::new().configure(|cfg| state.configure(cfg))).await
    }};
}

/// Follows `nextCursor` from the first page to the last and returns every
/// item seen, in order.
macro_rules! walk {
    ($app:expr, $uri:expr) => {{
        let mut seen: Vec<Value> = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let uri = match &cursor {
                Some(cursor) => format!("{}&cursor={cursor}", $uri),
                None => $uri.to_string(),
            };
            let req = test::TestRequest::get()
                .uri(&uri)
                .insert_header(agent())
                .to_request();
            let page: Value = test::call_and_read_body_json(&$app, req).await;
            seen.extend(page["items"].as_array().unwrap().iter().cloned());
            match page["nextCursor"].as_str() {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }
        seen
    }};
}

fn ids(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .map(|item| item["id"].as_str().unwrap().to_string())
        .collect()
}

fn assert_distinct(items: &[Value], expected: usize) {
    let mut ids = ids(items);
    assert_eq!(ids.len(), expected);
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), expected, "a row was returned twice");
}

#[actix_web::test]
async fn test_missing_token_is_unauthorized() {
    let test_db = common::TestDb::new("test_routes_unauthorized.db");
    let app = app!(test_db);

    let req = test::TestRequest::get().uri("/api/v1/customers").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[actix_web::test]
async fn test_missing_role_is_forbidden() {
    let test_db = common::TestDb::new("test_routes_forbidden.db");
    let app = app!(test_db);

    let req = test::TestRequest::get()
        .uri("/api/v1/tickets")
        .insert_header((header::AUTHORIZATION, bearer(ORG, &["billing"])))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_customer_lifecycle_and_pagination() {
    let test_db = common::TestDb::new("test_routes_customers.db");
    let app = app!(test_db);

    for name in ["Ada", "Grace", "Linus"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/customers")
            .insert_header(agent())
            .set_json(json!({"name": name, "email": format!("{}@example.com", name.to_lowercase())}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/customers?sort=name&order=asc&limit=2")
        .insert_header(agent())
        .to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["items"].as_array().unwrap().len(), 2);
    assert_eq!(first["items"][0]["name"], "Ada");
    let cursor = first["nextCursor"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/customers?sort=name&order=asc&limit=2&cursor={cursor}"))
        .insert_header(agent())
        .to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(second["items"][0]["name"], "Linus");
    assert!(second["nextCursor"].is_null());

    let id = first["items"][0]["id"].as_str().unwrap().to_string();
    let req = test::TestRequest::patch()
        .uri(&format!("/api/v1/customers/{id}"))
        .insert_header(agent())
        .set_json(json!({"company": "Analytical Engines", "phone": null}))
        .to_request();
    let updated: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(updated["company"], "Analytical Engines");
    assert!(updated["phone"].is_null());

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/customers/{id}"))
        .insert_header(agent())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = test::read_body_json(resp).await;
    assert_eq!(deleted["id"], id.as_str());
    assert_eq!(deleted["company"], "Analytical Engines");

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/customers/{id}"))
        .insert_header(agent())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_list_sees_writes_despite_cache() {
    let test_db = common::TestDb::new("test_routes_cache.db");
    let app = app!(test_db);

    let list = || {
        test::TestRequest::get()
            .uri("/api/v1/templates")
            .insert_header(agent())
            .to_request()
    };
    let empty: Value = test::call_and_read_body_json(&app, list()).await;
    assert_eq!(empty["items"], json!([]));

    let req = test::TestRequest::post()
        .uri("/api/v1/templates")
        .insert_header(agent())
        .set_json(json!({"name": "Greeting", "body": "Hello!"}))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

    let listed: Value = test::call_and_read_body_json(&app, list()).await;
    assert_eq!(listed["items"][0]["name"], "Greeting");
    assert_eq!(listed["items"][0]["usageCount"], 0);
}

#[actix_web::test]
async fn test_bad_input_uses_error_envelope() {
    let test_db = common::TestDb::new("test_routes_envelope.db");
    let app = app!(test_db);

    let req = test::TestRequest::get()
        .uri("/api/v1/customers?cursor=not-a-cursor")
        .insert_header(agent())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "invalid_cursor");

    let req = test::TestRequest::get()
        .uri("/api/v1/customers?sort=password")
        .insert_header(agent())
        .to_request();
    let body: Value = test::read_body_json(test::call_service(&app, req).await).await;
    assert_eq!(body["error"]["code"], "validation_error");

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .insert_header(agent())
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"name\": ")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "validation_error");

    let req = test::TestRequest::patch()
        .uri("/api/v1/customers/00000000-0000-0000-0000-000000000000")
        .insert_header(agent())
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_duplicate_email_and_dependents_conflict() {
    let test_db = common::TestDb::new("test_routes_conflicts.db");
    let app = app!(test_db);

    let create = || {
        test::TestRequest::post()
            .uri("/api/v1/customers")
            .insert_header(agent())
            .set_json(json!({"name": "Ada", "email": "ada@example.com"}))
            .to_request()
    };
    let customer: Value = test::call_and_read_body_json(&app, create()).await;
    let resp = test::call_service(&app, create()).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "duplicate_email");

    let customer_id = customer["id"].as_str().unwrap();
    let req = test::TestRequest::post()
        .uri("/api/v1/tickets")
        .insert_header(agent())
        .set_json(json!({"customerId": customer_id, "subject": "Engine jammed"}))
        .to_request();
    let ticket: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ticket["status"], "open");
    assert_eq!(ticket["priority"], "normal");

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/customers/{customer_id}"))
        .insert_header(agent())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], "has_dependents");
}

#[actix_web::test]
async fn test_ticket_archive_restore_and_foreign_org() {
    let test_db = common::TestDb::new("test_routes_tickets.db");
    let app = app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .insert_header(agent())
        .set_json(json!({"name": "Ada", "email": "ada@example.com"}))
        .to_request();
    let customer: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/tickets")
        .insert_header(agent())
        .set_json(json!({
            "customerId": customer["id"],
            "subject": "Engine jammed",
            "priority": "high",
        }))
        .to_request();
    let ticket: Value = test::call_and_read_body_json(&app, req).await;
    let id = ticket["id"].as_str().unwrap().to_string();

    let other_org = (
        header::AUTHORIZATION,
        bearer("0a1b2c3d-0000-4000-8000-000000000001", &["support"]),
    );
    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tickets/{id}"))
        .insert_header(other_org)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/tickets/{id}"))
        .insert_header(agent())
        .to_request();
    let archived: Value = test::call_and_read_body_json(&app, req).await;
    assert!(archived["archivedAt"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/v1/tickets")
        .insert_header(agent())
        .to_request();
    let active: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(active["items"], json!([]));

    let req = test::TestRequest::post()
        .uri(&format!("/api/v1/tickets/{id}/restore"))
        .insert_header(agent())
        .to_request();
    let restored: Value = test::call_and_read_body_json(&app, req).await;
    assert!(restored["archivedAt"].is_null());

    let req = test::TestRequest::get()
        .uri(&format!("/api/v1/tickets/{id}/ai"))
        .insert_header(agent())
        .to_request();
    let ai: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(ai, json!({"ticketId": id, "summary": null, "category": null, "sentiment": null}));
}

#[actix_web::test]
async fn test_ticket_pages_with_tied_subjects() {
    let test_db = common::TestDb::new("test_routes_ticket_pages.db");
    let app = app!(test_db);

    let req = test::TestRequest::post()
        .uri("/api/v1/customers")
        .insert_header(agent())
        .set_json(json!({"name": "Ada", "email": "ada@example.com"}))
        .to_request();
    let customer: Value = test::call_and_read_body_json(&app, req).await;

    for subject in ["Refund", "Login", "Refund", "Refund", "Login", "Billing"] {
        let req = test::TestRequest::post()
            .uri("/api/v1/tickets")
            .insert_header(agent())
            .set_json(json!({"customerId": customer["id"], "subject": subject}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let ascending = walk!(app, "/api/v1/tickets?sort=subject&order=asc&limit=2");
    assert_distinct(&ascending, 6);
    let keys: Vec<(String, String)> = ascending
        .iter()
        .map(|t| {
            (
                t["subject"].as_str().unwrap().to_string(),
                t["id"].as_str().unwrap().to_string(),
            )
        })
        .collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);

    let descending = walk!(app, "/api/v1/tickets?sort=subject&order=desc&limit=4");
    assert_distinct(&descending, 6);
    let mut reversed = ids(&ascending);
    reversed.reverse();
    assert_eq!(ids(&descending), reversed);
}

#[actix_web::test]
async fn test_template_pages_by_usage_count() {
    let test_db = common::TestDb::new("test_routes_template_pages.db");
    let app = app!(test_db);

    let uses = [
        ("Greeting", 2),
        ("Refund", 0),
        ("Escalation", 1),
        ("Closing", 2),
        ("Apology", 0),
    ];
    for (name, uses) in uses {
        let req = test::TestRequest::post()
            .uri("/api/v1/templates")
            .insert_header(agent())
            .set_json(json!({"name": name, "body": format!("{name} body")}))
            .to_request();
        let template: Value = test::call_and_read_body_json(&app, req).await;
        for _ in 0..uses {
            let req = test::TestRequest::post()
                .uri(&format!("/api/v1/templates/{}/use", template["id"].as_str().unwrap()))
                .insert_header(agent())
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }
    }

    let templates = walk!(app, "/api/v1/templates?sort=usageCount&order=desc&limit=2");
    assert_distinct(&templates, 5);
    let counts: Vec<i64> = templates
        .iter()
        .map(|t| t["usageCount"].as_i64().unwrap())
        .collect();
    assert_eq!(counts, vec![2, 2, 1, 0, 0]);

    let id = templates[0]["id"].as_str().unwrap().to_string();
    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/templates/{id}"))
        .insert_header(agent())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = test::read_body_json(resp).await;
    assert_eq!(deleted, templates[0]);

    let remaining = walk!(app, "/api/v1/templates?sort=usageCount&order=desc&limit=2");
    assert_distinct(&remaining, 4);
}

#[actix_web::test]
async fn test_notification_pages_and_read_state() {
    let test_db = common::TestDb::new("test_routes_notification_pages.db");
    let app = app!(test_db);

    for n in 0..5 {
        let req = test::TestRequest::post()
            .uri("/api/v1/notifications")
            .insert_header(agent())
            .set_json(json!({"kind": "system", "title": format!("Notice {n}")}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let all = walk!(app, "/api/v1/notifications?limit=2");
    assert_distinct(&all, 5);

    let id = all[0]["id"].as_str().unwrap().to_string();
    let mark_read = || {
        test::TestRequest::patch()
            .uri(&format!("/api/v1/notifications/{id}"))
            .insert_header(agent())
            .set_json(json!({"read": true}))
            .to_request()
    };
    let first: Value = test::call_and_read_body_json(&app, mark_read()).await;
    assert!(first["readAt"].is_string());
    let second: Value = test::call_and_read_body_json(&app, mark_read()).await;
    assert_eq!(first, second);

    let unread = walk!(app, "/api/v1/notifications?unreadOnly=true&limit=2");
    assert_distinct(&unread, 4);
    assert!(!ids(&unread).contains(&id));

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/notifications/{id}"))
        .insert_header(agent())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let deleted: Value = test::read_body_json(resp).await;
    assert_eq!(deleted, second);

    let req = test::TestRequest::delete()
        .uri(&format!("/api/v1/notifications/{id}"))
        .insert_header(agent())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}
