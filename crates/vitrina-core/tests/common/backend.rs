//! In-process fake of the storefront backend
//!
//! Small axum app with an in-memory catalog. It checks init data signatures
//! with [`BOT_TOKEN`], issues `token-<telegram id>` credentials and keeps
//! the featured entry unique the way the real backend does.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Multipart, Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::routing::{get, patch, post};
use axum::{Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use vitrina_core::host::InitData;
use vitrina_core::model::{BroadcastMessage, CatalogEntry, EntryDraft, EntryPatch, FEATURED_ORDER_NUMBER};

pub const BOT_TOKEN: &str = "424242:fake-bot-token";

/// Telegram id the fake treats as an administrator
pub const ADMIN_TELEGRAM_ID: i64 = 1001;

#[derive(Default)]
struct Catalog {
    next_id: i64,
    entries: Vec<CatalogEntry>,
    broadcasts: Vec<BroadcastMessage>,
    users: HashMap<i64, i64>,
    uploads: Vec<String>,
}

type Shared = Arc<Mutex<Catalog>>;

pub struct FakeBackend {
    pub url: String,
    catalog: Shared,
    server: JoinHandle<()>,
}

impl FakeBackend {
    pub async fn start() -> Self {
        let catalog: Shared = Arc::default();
        let app = Router::new()
            .route("/auth/login", post(login))
            .route("/applications", get(list).post(create))
            .route("/applications/{id}", get(fetch).patch(edit).delete(remove))
            .route("/applications/{id}/make-main", patch(make_main))
            .route("/broadcast/message", post(broadcast))
            .route("/files/upload", post(upload))
            .with_state(Arc::clone(&catalog));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { url, catalog, server }
    }

    /// Signed init data for a Telegram user, as the host would produce it.
    pub fn init_data_for(telegram_id: i64) -> String {
        let user = json!({ "id": telegram_id, "first_name": "Test", "username": format!("user{telegram_id}") }).to_string();
        let auth_date = Utc::now().timestamp().to_string();
        InitData::sign(
            &[("query_id", "AAHdF6IQAAAAAN0XohDhrOrc"), ("user", user.as_str()), ("auth_date", auth_date.as_str())],
            BOT_TOKEN,
        )
        .unwrap()
    }

    /// Inserts an entry directly, bypassing auth.
    pub async fn seed(&self, draft: EntryDraft) -> CatalogEntry {
        insert(&mut *self.catalog.lock().await, draft)
    }

    pub async fn entries(&self) -> Vec<CatalogEntry> {
        self.catalog.lock().await.entries.clone()
    }

    pub async fn broadcasts(&self) -> Vec<BroadcastMessage> {
        self.catalog.lock().await.broadcasts.clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.server.abort();
    }
}

pub fn draft(name: &str) -> EntryDraft {
    EntryDraft {
        name: name.to_string(),
        description: format!("{name} does useful things inside Telegram"),
        short_description: format!("{name} in chat"),
        icon: format!("https://cdn.example.com/{name}.png"),
        screenshots: vec![format!("https://cdn.example.com/{name}-1.png")],
        category: "tools".to_string(),
        order_number: None,
        url: format!("https://t.me/{name}_bot/app"),
    }
}

fn insert(catalog: &mut Catalog, draft: EntryDraft) -> CatalogEntry {
    catalog.next_id += 1;
    let now = Utc::now();
    let entry = CatalogEntry {
        id: catalog.next_id,
        name: draft.name,
        description: draft.description,
        short_description: draft.short_description,
        icon: draft.icon,
        screenshots: draft.screenshots,
        category: draft.category,
        order_number: draft.order_number,
        url: draft.url,
        created_at: now,
        updated_at: now,
    };
    catalog.entries.push(entry.clone());
    entry
}

async fn authorize(catalog: &Shared, headers: &HeaderMap) -> Result<i64, StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(StatusCode::UNAUTHORIZED)?;
    let telegram_id = token
        .strip_prefix("token-")
        .and_then(|id| id.parse::<i64>().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    if catalog.lock().await.users.contains_key(&telegram_id) {
        Ok(telegram_id)
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}

async fn login(State(catalog): State<Shared>, Json(body): Json<Value>) -> Result<Json<Value>, StatusCode> {
    let raw = body.get("initData").and_then(Value::as_str).unwrap_or_default();
    let init_data = InitData::parse(raw).map_err(|_| StatusCode::UNAUTHORIZED)?;
    init_data
        .verify(BOT_TOKEN, Some(chrono::Duration::hours(24)))
        .map_err(|_| StatusCode::UNAUTHORIZED)?;
    let telegram_id = init_data.unverified_user_id().ok_or(StatusCode::UNAUTHORIZED)?;

    let mut catalog = catalog.lock().await;
    let next = catalog.users.len() as i64 + 1;
    let id = *catalog.users.entry(telegram_id).or_insert(next);

    Ok(Json(json!({
        "token": format!("token-{telegram_id}"),
        "user": {
            "id": id,
            "telegramId": telegram_id.to_string(),
            "username": format!("user{telegram_id}"),
            "isAdmin": telegram_id == ADMIN_TELEGRAM_ID,
            "createdAt": Utc::now(),
        }
    })))
}

async fn list(State(catalog): State<Shared>, headers: HeaderMap) -> Result<Json<Vec<CatalogEntry>>, StatusCode> {
    authorize(&catalog, &headers).await?;
    Ok(Json(catalog.lock().await.entries.clone()))
}

async fn fetch(
    State(catalog): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<CatalogEntry>, StatusCode> {
    authorize(&catalog, &headers).await?;
    let catalog = catalog.lock().await;
    catalog
        .entries
        .iter()
        .find(|e| e.id == id)
        .cloned()
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn create(
    State(catalog): State<Shared>,
    headers: HeaderMap,
    Json(draft): Json<EntryDraft>,
) -> Result<(StatusCode, Json<CatalogEntry>), StatusCode> {
    authorize(&catalog, &headers).await?;
    let entry = insert(&mut *catalog.lock().await, draft);
    Ok((StatusCode::CREATED, Json(entry)))
}

async fn edit(
    State(catalog): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(patch): Json<EntryPatch>,
) -> Result<Json<CatalogEntry>, StatusCode> {
    authorize(&catalog, &headers).await?;
    let mut catalog = catalog.lock().await;
    let entry = catalog.entries.iter_mut().find(|e| e.id == id).ok_or(StatusCode::NOT_FOUND)?;

    if let Some(v) = patch.name {
        entry.name = v;
    }
    if let Some(v) = patch.description {
        entry.description = v;
    }
    if let Some(v) = patch.short_description {
        entry.short_description = v;
    }
    if let Some(v) = patch.icon {
        entry.icon = v;
    }
    if let Some(v) = patch.screenshots {
        entry.screenshots = v;
    }
    if let Some(v) = patch.category {
        entry.category = v;
    }
    if let Some(v) = patch.order_number {
        entry.order_number = Some(v);
    }
    if let Some(v) = patch.url {
        entry.url = v;
    }
    entry.updated_at = Utc::now();
    Ok(Json(entry.clone()))
}

async fn remove(
    State(catalog): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<CatalogEntry>, StatusCode> {
    authorize(&catalog, &headers).await?;
    let mut catalog = catalog.lock().await;
    let index = catalog.entries.iter().position(|e| e.id == id).ok_or(StatusCode::NOT_FOUND)?;
    Ok(Json(catalog.entries.remove(index)))
}

async fn make_main(
    State(catalog): State<Shared>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<CatalogEntry>, StatusCode> {
    authorize(&catalog, &headers).await?;
    let mut catalog = catalog.lock().await;
    if !catalog.entries.iter().any(|e| e.id == id) {
        return Err(StatusCode::NOT_FOUND);
    }
    let mut promoted = None;
    for entry in &mut catalog.entries {
        if entry.id == id {
            entry.order_number = Some(FEATURED_ORDER_NUMBER);
            promoted = Some(entry.clone());
        } else if entry.is_featured() {
            entry.order_number = None;
        }
    }
    promoted.map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn broadcast(
    State(catalog): State<Shared>,
    headers: HeaderMap,
    Json(message): Json<BroadcastMessage>,
) -> Result<(StatusCode, Json<Value>), StatusCode> {
    authorize(&catalog, &headers).await?;
    catalog.lock().await.broadcasts.push(message);
    Ok((StatusCode::CREATED, Json(json!({ "status": "queued" }))))
}

async fn upload(
    State(catalog): State<Shared>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Vec<Value>>, StatusCode> {
    authorize(&catalog, &headers).await?;
    let mut urls = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|_| StatusCode::BAD_REQUEST)? {
        if field.name() != Some("files") {
            return Err(StatusCode::BAD_REQUEST);
        }
        let name = field.file_name().unwrap_or("upload.bin").to_string();
        let bytes = field.bytes().await.map_err(|_| StatusCode::BAD_REQUEST)?;
        if bytes.is_empty() {
            return Err(StatusCode::BAD_REQUEST);
        }
        urls.push(format!("/uploads/{name}"));
    }
    catalog.lock().await.uploads.extend(urls.iter().cloned());
    Ok(Json(urls.into_iter().map(|url| json!({ "url": url })).collect()))
}
