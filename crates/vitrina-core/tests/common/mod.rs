//! Shared fixtures for the integration tests

#![allow(dead_code)]

pub mod backend;

use std::sync::Arc;

use serde_json::{json, Value};
use url::Url;

use vitrina_core::storage::MemoryStorage;
use vitrina_core::{ApiClient, BearerAuth, SessionStore};

pub use backend::FakeBackend;

/// Fresh in-memory storage and a store over it.
pub fn session() -> (Arc<MemoryStorage>, SessionStore) {
    let storage = Arc::new(MemoryStorage::new());
    let store = SessionStore::new(storage.clone());
    (storage, store)
}

/// Client for `base` that authenticates from `store`, as the app wires it.
pub fn client(base: &str, store: &SessionStore) -> Arc<ApiClient> {
    let api = ApiClient::new(Url::parse(base).unwrap(), None)
        .unwrap()
        .with_decorator(BearerAuth::new(store.clone()));
    Arc::new(api)
}

pub fn login_body(token: &str, is_admin: bool) -> Value {
    json!({
        "token": token,
        "user": {
            "id": 1,
            "telegramId": "777000",
            "username": "alice",
            "isAdmin": is_admin,
            "createdAt": "2024-05-01T10:00:00Z",
        }
    })
}

pub fn entry_json(id: i64, order_number: Option<i32>) -> Value {
    json!({
        "id": id,
        "name": format!("App {id}"),
        "description": "Full description",
        "shortDescription": "Short",
        "icon": "https://cdn.example.com/icon.png",
        "screenshots": [],
        "category": "games",
        "orderNumber": order_number,
        "url": "https://t.me/app_bot/app",
        "createdAt": "2024-05-01T10:00:00Z",
        "updatedAt": "2024-05-01T10:00:00Z",
    })
}
