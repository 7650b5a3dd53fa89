//! Router tests against an in-memory store. The actor is injected directly
//! into the request extensions, standing in for an authentication layer.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{Request, StatusCode, header},
};
use nexboard_core::{ids::RandomIds, service::Services, user::NewAccount};
use nexboard_store_sqlite::SqliteStore;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{Actor, api_router};

struct Harness {
  app:      Router,
  services: Arc<Services<SqliteStore>>,
}

async fn harness() -> Harness {
  let store = SqliteStore::open_in_memory().await.unwrap();
  let services = Arc::new(Services::new(Arc::new(store), Arc::new(RandomIds)));
  Harness { app: api_router(services.clone()), services }
}

impl Harness {
  async fn user(&self, name: &str) -> Actor {
    let email = format!("{}@example.com", name.to_lowercase());
    let view = self
      .services
      .users
      .register(NewAccount {
        name:            name.into(),
        email:           email.clone(),
        credential_hash: "hash".into(),
      })
      .await
      .unwrap();
    Actor { external_id: view.external_id, email }
  }

  async fn send(
    &self,
    method: &str,
    uri: &str,
    actor: Option<&Actor>,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
      builder = builder.extension(actor.clone());
    }
    let req = match body {
      Some(json) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    };

    let resp = self.app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }
}

fn id_of(value: &Value) -> String {
  value["external_id"].as_str().unwrap().to_owned()
}

#[tokio::test]
async fn requests_without_an_actor_are_unauthenticated() {
  let h = harness().await;
  let (status, body) = h.send("GET", "/workspaces", None, None).await;
  assert_eq!(status, StatusCode::UNAUTHORIZED);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn workspace_lifecycle_over_http() {
  let h = harness().await;
  let ana = h.user("Ana").await;
  let oz = h.user("Oz").await;

  let (status, ws) = h
    .send("POST", "/workspaces", Some(&ana), Some(json!({ "name": "Acme" })))
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(ws["owner_external_id"], json!(ana.external_id));
  assert!(ws.get("id").is_none());
  let uri = format!("/workspaces/{}", id_of(&ws));

  let (status, _) = h.send("GET", &uri, Some(&ana), None).await;
  assert_eq!(status, StatusCode::OK);

  let (status, body) = h.send("GET", &uri, Some(&oz), None).await;
  assert_eq!(status, StatusCode::FORBIDDEN);
  assert!(body["error"].as_str().unwrap().contains("not a member"));

  let missing = format!("/workspaces/{}", uuid::Uuid::new_v4());
  let (status, _) = h.send("GET", &missing, Some(&ana), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);

  let (status, _) = h.send("DELETE", &uri, Some(&ana), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn membership_errors_map_to_status_codes() {
  let h = harness().await;
  let ana = h.user("Ana").await;
  let bo = h.user("Bo").await;

  let (_, ws) = h
    .send("POST", "/workspaces", Some(&ana), Some(json!({ "name": "Acme" })))
    .await;
  let members = format!("/workspaces/{}/members", id_of(&ws));

  let invite = json!({ "user_external_id": bo.external_id, "role": "guest" });
  let (status, _) = h.send("POST", &members, Some(&ana), Some(invite)).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let invite = json!({ "user_external_id": bo.external_id, "role": "member" });
  let (status, member) = h
    .send("POST", &members, Some(&ana), Some(invite.clone()))
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(member["role"], "member");

  let (status, _) = h.send("POST", &members, Some(&ana), Some(invite)).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let owner_row = format!("{members}/{}", ana.external_id);
  let (status, _) = h.send("DELETE", &owner_row, Some(&ana), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, list) = h.send("GET", &members, Some(&bo), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn task_flow_and_status_guard_over_http() {
  let h = harness().await;
  let ana = h.user("Ana").await;

  let (_, ws) = h
    .send("POST", "/workspaces", Some(&ana), Some(json!({ "name": "Acme" })))
    .await;
  let (status, board) = h
    .send(
      "POST",
      &format!("/workspaces/{}/boards", id_of(&ws)),
      Some(&ana),
      Some(json!({ "name": "Roadmap" })),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED);

  let (_, todo) = h
    .send("POST", "/statuses", Some(&ana), Some(json!({ "name": "Todo" })))
    .await;
  let (status, _) = h
    .send("POST", "/statuses", Some(&ana), Some(json!({ "name": "Todo" })))
    .await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (status, task) = h
    .send(
      "POST",
      &format!("/boards/{}/tasks", id_of(&board)),
      Some(&ana),
      Some(json!({ "title": "Ship", "status_external_id": id_of(&todo) })),
    )
    .await;
  assert_eq!(status, StatusCode::CREATED);
  assert_eq!(task["priority"], "low");
  assert_eq!(task["assigned_to"], Value::Null);
  assert_eq!(task["status"]["name"], "Todo");

  let status_uri = format!("/statuses/{}", id_of(&todo));
  let (status, _) = h.send("DELETE", &status_uri, Some(&ana), None).await;
  assert_eq!(status, StatusCode::CONFLICT);

  let (status, assigned) = h
    .send(
      "PATCH",
      &format!("/tasks/{}/assign", id_of(&task)),
      Some(&ana),
      Some(json!({ "assigned_to_external_id": ana.external_id })),
    )
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(assigned["assigned_to"]["name"], "Ana");

  let (status, _) = h
    .send("DELETE", &format!("/tasks/{}", id_of(&task)), Some(&ana), None)
    .await;
  assert_eq!(status, StatusCode::NO_CONTENT);
  let (status, _) = h.send("DELETE", &status_uri, Some(&ana), None).await;
  assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn profile_round_trip() {
  let h = harness().await;
  let ana = h.user("Ana").await;

  let (status, profile) = h.send("GET", "/users/profile", Some(&ana), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(profile["email"], "ana@example.com");
  assert!(profile.get("credential_hash").is_none());

  let (status, profile) = h
    .send(
      "PUT",
      "/users/profile",
      Some(&ana),
      Some(json!({ "name": "Ana Lima", "avatar_url": "https://example.com/a.png" })),
    )
    .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(profile["name"], "Ana Lima");
  assert_eq!(profile["avatar_url"], "https://example.com/a.png");
}

#[tokio::test]
async fn malformed_requests_answer_with_json_errors() {
  let h = harness().await;
  let ana = h.user("Ana").await;

  let (status, body) = h.send("GET", "/tasks/not-a-uuid", Some(&ana), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let uri = format!("/boards/{}/tasks", uuid::Uuid::new_v4());
  let (status, body) = h
    .send("POST", &uri, Some(&ana), Some(json!({ "title": "x" })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(
    body["error"]
      .as_str()
      .unwrap()
      .contains("status_external_id")
  );

  let (status, body) = h
    .send("POST", "/workspaces", Some(&ana), Some(json!({ "name": 42 })))
    .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}
