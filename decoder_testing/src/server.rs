//! Local HTTP fragment service for exercising `HttpSource` end to end.
//!
//! Serves `GET /fragment?id=N`: known identifiers answer `200` with
//! `{"index": .., "text": ..}`, unknown ones answer `404`. Individual
//! identifiers can be made to fail, return malformed bodies, or stall.

use std::{
    collections::{HashMap, HashSet},
    io,
    net::SocketAddr,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use axum::{
    Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::{net::TcpListener, task::JoinHandle};

/// How the stub answers each identifier.
#[derive(Clone, Debug, Default)]
pub struct StubBehaviour {
    fragments: HashMap<u64, (u32, String)>,
    errors: HashMap<u64, u16>,
    malformed: HashSet<u64>,
    stalls: HashMap<u64, Duration>,
}

impl StubBehaviour {
    /// Serve `entries` given as `(candidate id, index, text)`.
    #[must_use]
    pub fn new<'a>(entries: impl IntoIterator<Item = (u64, u32, &'a str)>) -> Self {
        Self {
            fragments: entries
                .into_iter()
                .map(|(id, index, text)| (id, (index, text.to_owned())))
                .collect(),
            ..Self::default()
        }
    }

    /// Answer `id` with `status` and an empty body.
    #[must_use]
    pub fn error(mut self, id: u64, status: u16) -> Self {
        self.errors.insert(id, status);
        self
    }

    /// Answer `id` with a body that is not JSON.
    #[must_use]
    pub fn malformed(mut self, id: u64) -> Self {
        self.malformed.insert(id);
        self
    }

    /// Wait `delay` before answering `id`.
    #[must_use]
    pub fn stall(mut self, id: u64, delay: Duration) -> Self {
        self.stalls.insert(id, delay);
        self
    }
}

struct ServerState {
    behaviour: StubBehaviour,
    hits: AtomicUsize,
}

/// Running stub server; the task is aborted on drop.
pub struct StubServer {
    addr: SocketAddr,
    state: Arc<ServerState>,
    task: JoinHandle<()>,
}

impl StubServer {
    /// Bind an ephemeral local port and start serving `behaviour`.
    ///
    /// # Errors
    ///
    /// Returns any error from binding the listener.
    pub async fn start(behaviour: StubBehaviour) -> io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(ServerState {
            behaviour,
            hits: AtomicUsize::new(0),
        });
        let app = Router::new()
            .route("/fragment", get(fragment))
            .with_state(Arc::clone(&state));
        let task = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                log::error!("stub server stopped: error={err}");
            }
        });
        Ok(Self { addr, state, task })
    }

    /// Base URL suitable for `DecoderConfig::builder().base_url(..)`.
    #[must_use]
    pub fn base_url(&self) -> String { format!("http://{}", self.addr) }

    /// Number of requests served so far.
    #[must_use]
    pub fn hits(&self) -> usize { self.state.hits.load(Ordering::SeqCst) }
}

impl Drop for StubServer {
    fn drop(&mut self) { self.task.abort(); }
}

async fn fragment(
    State(state): State<Arc<ServerState>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    state.hits.fetch_add(1, Ordering::SeqCst);
    let Some(id) = params.get("id").and_then(|raw| raw.parse::<u64>().ok()) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    let behaviour = &state.behaviour;

    if let Some(delay) = behaviour.stalls.get(&id) {
        tokio::time::sleep(*delay).await;
    }
    if let Some(status) = behaviour.errors.get(&id) {
        return StatusCode::from_u16(*status)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response();
    }
    if behaviour.malformed.contains(&id) {
        return (StatusCode::OK, "<html>not a fragment</html>").into_response();
    }
    match behaviour.fragments.get(&id) {
        Some((index, text)) => (
            StatusCode::OK,
            [("content-type", "application/json")],
            serde_json::json!({ "index": index, "text": text }).to_string(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
