use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::task::JoinHandle;
use url::Url;

/// What the background node answers to every request.
#[derive(Debug, Clone)]
pub enum RpcReply {
    Result(Value),
    Error { code: i64, message: &'static str },
}

#[derive(Clone)]
struct RpcState {
    reply: RpcReply,
    requests: Arc<Mutex<Vec<Value>>>,
}

/// Minimal JSON-RPC node serving one canned reply, stopped when dropped.
pub struct BackgroundRpc {
    pub url: Url,
    requests: Arc<Mutex<Vec<Value>>>,
    handle: JoinHandle<()>,
}

async fn handle_rpc(State(state): State<RpcState>, Json(request): Json<Value>) -> Json<Value> {
    let id = request.get("id").cloned().unwrap_or(json!(1));
    state.requests.lock().push(request);

    Json(match state.reply {
        RpcReply::Result(result) => json!({ "jsonrpc": "2.0", "id": id, "result": result }),
        RpcReply::Error { code, message } => {
            json!({ "jsonrpc": "2.0", "id": id, "error": { "code": code, "message": message } })
        }
    })
}

impl BackgroundRpc {
    pub async fn spawn(reply: RpcReply) -> Result<Self, std::io::Error> {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let router = Router::new()
            .route("/", post(handle_rpc))
            .with_state(RpcState { reply, requests: requests.clone() });

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let address = listener.local_addr()?;
        let handle = tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let url = Url::parse(&format!("http://{address}/"))
            .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

        Ok(Self { url, requests, handle })
    }

    /// Params of the requests received so far, in order.
    pub fn received_params(&self) -> Vec<Value> {
        self.requests
            .lock()
            .iter()
            .map(|request| request.get("params").cloned().unwrap_or(Value::Null))
            .collect()
    }

    /// JSON-RPC methods received so far.
    pub fn received_methods(&self) -> Vec<String> {
        self.requests
            .lock()
            .iter()
            .filter_map(|request| request.get("method").and_then(Value::as_str))
            .map(str::to_string)
            .collect()
    }
}

impl Drop for BackgroundRpc {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
