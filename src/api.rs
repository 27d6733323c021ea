//! The memory CRUD HTTP surface.
//!
//! Five routes over the document store plus a health check, mirroring the
//! contract the presentation shell consumes: JSON bodies, `{"message"}`
//! error payloads, a body cap generous enough for embedded data-URI images,
//! and permissive CORS.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::RwLock;
use warp::http::StatusCode;
use warp::{Filter, Rejection, Reply};

use crate::memory::{MemoryDraft, MemoryPatch};
use crate::store::MemoryStore;
use crate::Error;

/// The store handle shared across request handlers.
pub type SharedStore = Arc<RwLock<MemoryStore>>;

/// Request body cap: saved drawings arrive as base64 data URIs inside the
/// JSON payload, so this must accommodate whole images.
const BODY_LIMIT: u64 = 50 * 1024 * 1024;

pub fn shared(store: MemoryStore) -> SharedStore {
    Arc::new(RwLock::new(store))
}

/// The full route tree.
pub fn routes(
    store: SharedStore,
) -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
    let with_store = {
        let store = store.clone();
        warp::any().map(move || store.clone())
    };

    let list = warp::path!("api" / "memories")
        .and(warp::get())
        .and(with_store.clone())
        .and_then(list_memories);

    let get = warp::path!("api" / "memories" / String)
        .and(warp::get())
        .and(with_store.clone())
        .and_then(get_memory);

    let create = warp::path!("api" / "memories")
        .and(warp::post())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_store.clone())
        .and_then(create_memory);

    let update = warp::path!("api" / "memories" / String)
        .and(warp::put())
        .and(warp::body::content_length_limit(BODY_LIMIT))
        .and(warp::body::json())
        .and(with_store.clone())
        .and_then(update_memory);

    let delete = warp::path!("api" / "memories" / String)
        .and(warp::delete())
        .and(with_store)
        .and_then(delete_memory);

    let health = warp::path!("api" / "health").and(warp::get()).map(health);

    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allow_headers(vec!["content-type"]);

    list.or(get)
        .or(create)
        .or(update)
        .or(delete)
        .or(health)
        .with(cors)
}

/// Serve forever on `addr`.
pub async fn serve(store: SharedStore, addr: SocketAddr) {
    tracing::info!(%addr, "memory vault listening");
    warp::serve(routes(store)).run(addr).await;
}

/// Bind to an OS-assigned port. Returns the bound address and the server
/// future; integration tests spawn the future and talk to the address.
pub fn bind_ephemeral(
    store: SharedStore,
) -> (SocketAddr, impl std::future::Future<Output = ()>) {
    warp::serve(routes(store)).bind_ephemeral(([127, 0, 0, 1], 0))
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Validation(_) => StatusCode::BAD_REQUEST,
        Error::NotFound => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn error_reply(context: &str, err: &Error) -> warp::reply::WithStatus<warp::reply::Json> {
    let status = status_for(err);
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        tracing::error!(context, %err, "request failed");
    }
    let message = match err {
        Error::NotFound => "Memory not found".to_string(),
        _ => format!("{context}: {err}"),
    };
    warp::reply::with_status(warp::reply::json(&json!({ "message": message })), status)
}

async fn list_memories(store: SharedStore) -> Result<impl Reply, Infallible> {
    let memories = store.read().await.list();
    Ok(warp::reply::with_status(
        warp::reply::json(&memories),
        StatusCode::OK,
    ))
}

async fn get_memory(id: String, store: SharedStore) -> Result<impl Reply, Infallible> {
    let reply = match store.read().await.get(&id) {
        Some(memory) => warp::reply::with_status(warp::reply::json(&memory), StatusCode::OK),
        None => error_reply("Error fetching memory", &Error::NotFound),
    };
    Ok(reply)
}

async fn create_memory(
    draft: MemoryDraft,
    store: SharedStore,
) -> Result<impl Reply, Infallible> {
    let reply = match store.write().await.create(draft) {
        Ok(memory) => warp::reply::with_status(warp::reply::json(&memory), StatusCode::CREATED),
        Err(err) => error_reply("Error creating memory", &err),
    };
    Ok(reply)
}

async fn update_memory(
    id: String,
    patch: MemoryPatch,
    store: SharedStore,
) -> Result<impl Reply, Infallible> {
    let reply = match store.write().await.update(&id, &patch) {
        Ok(memory) => warp::reply::with_status(warp::reply::json(&memory), StatusCode::OK),
        Err(err) => error_reply("Error updating memory", &err),
    };
    Ok(reply)
}

async fn delete_memory(id: String, store: SharedStore) -> Result<impl Reply, Infallible> {
    let reply = match store.write().await.delete(&id) {
        Ok(()) => warp::reply::with_status(
            warp::reply::json(&json!({ "message": "Memory deleted successfully" })),
            StatusCode::OK,
        ),
        Err(err) => error_reply("Error deleting memory", &err),
    };
    Ok(reply)
}

fn health() -> impl Reply {
    warp::reply::json(&json!({ "status": "OK", "message": "Server is running!" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryType, Tilt};

    fn test_routes() -> impl Filter<Extract = impl Reply, Error = Rejection> + Clone {
        routes(shared(MemoryStore::ephemeral()))
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let res = warp::test::request()
            .method("GET")
            .path("/api/health")
            .reply(&test_routes())
            .await;
        assert_eq!(res.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["status"], "OK");
    }

    #[tokio::test]
    async fn create_then_fetch_roundtrip() {
        let api = test_routes();

        let res = warp::test::request()
            .method("POST")
            .path("/api/memories")
            .json(&json!({
                "title": "My Magic Memory",
                "date": "Friday, Aug 1, 2025",
                "imageUrl": "data:image/png;base64,AAAA",
                "story": "Once upon a time",
                "type": "drawing",
                "tilt": "right"
            }))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let created: crate::memory::Memory = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(created.kind, MemoryType::Drawing);
        assert_eq!(created.tilt, Tilt::Right);

        let res = warp::test::request()
            .method("GET")
            .path(&format!("/api/memories/{}", created.id))
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::OK);

        let res = warp::test::request()
            .method("GET")
            .path("/api/memories")
            .reply(&api)
            .await;
        let listed: Vec<crate::memory::Memory> = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn invalid_draft_is_a_400_with_message() {
        let res = warp::test::request()
            .method("POST")
            .path("/api/memories")
            .json(&json!({
                "title": "   ",
                "date": "today",
                "type": "drawing"
            }))
            .reply(&test_routes())
            .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert!(body["message"]
            .as_str()
            .unwrap()
            .starts_with("Error creating memory"));
    }

    #[tokio::test]
    async fn missing_id_is_a_404() {
        let api = test_routes();

        let res = warp::test::request()
            .method("GET")
            .path("/api/memories/nope")
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);

        let res = warp::test::request()
            .method("DELETE")
            .path("/api/memories/nope")
            .reply(&api)
            .await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let body: serde_json::Value = serde_json::from_slice(res.body()).unwrap();
        assert_eq!(body["message"], "Memory not found");
    }
}
