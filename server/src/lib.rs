use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use engine::export::{to_csv_bytes, EXCERPT_CHARS};
use engine::persist::{load_store, StorePaths};
use engine::query::sort_hits;
use engine::{compute_statistics, CorpusStats, Document, Engine, Hit, SortKey, DEFAULT_TOP_N};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const MAX_K: usize = 100;

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
    #[serde(default)]
    pub sort: SortKey,
}
fn default_k() -> usize { DEFAULT_TOP_N }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: u32,
    pub score: f64,
    pub title: String,
    pub author: String,
    pub date: String,
    pub url: String,
    pub snippet: String,
}

/// Search handlers read an immutable engine snapshot; reload builds a new one and swaps it in.
#[derive(Clone)]
pub struct AppState {
    pub store_root: PathBuf,
    pub engine: Arc<RwLock<Arc<Engine>>>,
    pub admin_token: Option<String>,
}

impl AppState {
    pub fn load(store_dir: impl Into<PathBuf>, admin_token: Option<String>) -> Result<Self> {
        let store_root = store_dir.into();
        let engine = load_engine(&store_root)?;
        Ok(Self { store_root, engine: Arc::new(RwLock::new(Arc::new(engine))), admin_token })
    }

    pub fn snapshot(&self) -> Arc<Engine> {
        self.engine.read().clone()
    }
}

fn load_engine(store_root: &std::path::Path) -> Result<Engine> {
    let (corpus, meta) = load_store(&StorePaths::new(store_root))?;
    tracing::info!(num_docs = meta.num_docs, created_at = %meta.created_at, "store loaded");
    Ok(Engine::build(corpus))
}

pub fn build_app(store_dir: String) -> Result<Router> {
    let admin_token = std::env::var("ADMIN_TOKEN").ok();
    let state = AppState::load(store_dir, admin_token)?;

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Ok(router(state).layer(cors))
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .route("/stats", get(stats_handler))
        .route("/export.csv", get(export_handler))
        .route("/admin/reload", post(reload_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Top `k` hits in the requested order, plus the number of documents that matched at all.
fn ranked<'a>(engine: &'a Engine, params: &SearchParams) -> Result<(Vec<Hit<'a>>, usize), (StatusCode, String)> {
    let mut hits = engine
        .search(&params.q, usize::MAX)
        .map_err(|e| (StatusCode::SERVICE_UNAVAILABLE, e.to_string()))?;
    let total = hits.len();
    hits.truncate(params.k.min(MAX_K));
    sort_hits(&mut hits, params.sort);
    Ok((hits, total))
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, (StatusCode, String)> {
    let start = std::time::Instant::now();
    let engine = state.snapshot();
    let (hits, total_hits) = ranked(&engine, &params)?;

    let raw_terms: Vec<String> = params.q.split_whitespace().map(|s| s.to_string()).collect();
    let results = hits
        .iter()
        .map(|hit| SearchHit {
            doc_id: hit.doc.id,
            score: hit.score,
            title: hit.doc.title.clone(),
            author: hit.doc.author.clone(),
            date: hit.doc.date.clone(),
            url: hit.doc.url.clone(),
            snippet: highlight_terms(hit.doc.excerpt(EXCERPT_CHARS), &raw_terms),
        })
        .collect();

    Ok(Json(SearchResponse { query: params.q, took_s: start.elapsed().as_secs_f64(), total_hits, results }))
}

pub async fn doc_handler(State(state): State<AppState>, Path(doc_id): Path<u32>) -> Result<Json<Document>, StatusCode> {
    let engine = state.snapshot();
    engine.corpus().by_id(doc_id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn stats_handler(State(state): State<AppState>) -> Json<CorpusStats> {
    Json(compute_statistics(state.snapshot().corpus().docs()))
}

pub async fn export_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let engine = state.snapshot();
    let (hits, _) = ranked(&engine, &params)?;
    let bytes = to_csv_bytes(&hits).map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"search_results.csv\""),
        ],
        bytes,
    ))
}

fn highlight_terms(snippet: &str, terms: &[String]) -> String {
    let mut s = snippet.to_string();
    for t in terms {
        if t.trim().is_empty() { continue; }
        let Ok(pat) = regex::RegexBuilder::new(&regex::escape(t)).case_insensitive(true).build() else { continue };
        s = pat.replace_all(&s, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).to_string();
    }
    s
}

// --- Admin endpoints ---
async fn reload_handler(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    authorize(&state, &headers)?;
    let root = state.store_root.clone();
    let engine = tokio::task::spawn_blocking(move || load_engine(&root))
        .await
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, format!("{e:#}")))?;
    let num_docs = engine.corpus().len();
    *state.engine.write() = Arc::new(engine);
    tracing::info!(num_docs, "engine snapshot swapped");
    Ok(Json(serde_json::json!({ "num_docs": num_docs })))
}

fn authorize(state: &AppState, headers: &HeaderMap) -> Result<(), (StatusCode, String)> {
    let required = match &state.admin_token {
        Some(t) => t,
        None => return Err((StatusCode::UNAUTHORIZED, "ADMIN_TOKEN not set".into())),
    };
    let provided = headers.get("X-ADMIN-TOKEN").and_then(|v| v.to_str().ok()).unwrap_or("");
    if provided == required {
        Ok(())
    } else {
        Err((StatusCode::UNAUTHORIZED, "invalid admin token".into()))
    }
}
