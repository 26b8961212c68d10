#![allow(dead_code)]

use polling_app::domain::{RoleId, Session, UserId, ROLE_ADMIN, ROLE_USER};
use polling_app::infrastructure::config::ClientConfig;
use polling_app::infrastructure::storage::{MemoryStorage, SessionVault};
use polling_app::AppContext;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::MockServer;

pub struct Harness {
    pub ctx: AppContext,
    pub storage: Arc<MemoryStorage>,
    pub vault: SessionVault,
}

pub fn harness_for(base_url: &str, page_size: u32) -> Harness {
    let mut config = ClientConfig::new(base_url.parse().unwrap());
    config.poll_page_size = page_size;
    config.user_page_size = page_size;

    let storage = Arc::new(MemoryStorage::new());
    let ctx = AppContext::new(config, storage.clone());
    let vault = SessionVault::new(storage.clone());
    Harness {
        ctx,
        storage,
        vault,
    }
}

pub fn harness(server: &MockServer, page_size: u32) -> Harness {
    harness_for(&server.uri(), page_size)
}

pub fn session(user_id: i64, role_id: RoleId, token: &str) -> Session {
    Session {
        user_id: UserId(user_id),
        first_name: "Test".into(),
        last_name: "User".into(),
        email: format!("user{user_id}@example.com"),
        role_id,
        token: token.into(),
    }
}

impl Harness {
    pub fn sign_in_admin(&self) -> Session {
        let session = session(1, ROLE_ADMIN, "admin-token");
        self.vault.save(&session).unwrap();
        session
    }

    pub fn sign_in_user(&self, user_id: i64) -> Session {
        let session = session(user_id, ROLE_USER, "user-token");
        self.vault.save(&session).unwrap();
        session
    }
}

pub fn poll_json(id: i64, options: &[(i64, &str, Vec<i64>)]) -> Value {
    json!({
        "id": id,
        "title": format!("Poll number {id} question"),
        "optionList": options
            .iter()
            .map(|(oid, title, voters)| json!({
                "id": oid,
                "optionTitle": title,
                "voteCount": voters,
            }))
            .collect::<Vec<_>>(),
    })
}

pub fn bare_poll(id: i64) -> Value {
    poll_json(id, &[(id * 10, "yes", vec![]), (id * 10 + 1, "no", vec![])])
}

pub fn page_json(rows: Vec<Value>, count: u64) -> Value {
    json!({ "rows": rows, "count": count })
}

pub fn user_json(id: i64, role_id: i64) -> Value {
    json!({
        "id": id,
        "firstName": format!("First{id}"),
        "lastName": format!("Last{id}"),
        "email": format!("user{id}@example.com"),
        "roleId": role_id,
    })
}
