use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::json;
use std::net::SocketAddr;
use std::sync::Arc;

use stagefront_content::{
    AssetResolver, CmsClient, CmsConfig, ContentStore, ImageSize, InMemoryStore, StoreError,
};
use stagefront_core::{apply, QuerySpec, SortOrder};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

mod metrics;
use metrics::{CATALOG_FETCH_SECONDS, CATALOG_REQUESTS_TOTAL, QUERY_RESULTS_SIZE};

#[derive(Clone)]
struct AppState {
    store: Arc<dyn ContentStore>,
    assets: AssetResolver,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cms = CmsConfig::from_env()?;
    let assets = match &cms {
        Some(config) => AssetResolver::new(config.project_id.clone(), config.dataset.clone()),
        None => AssetResolver::new("local", "production"),
    };
    let store: Arc<dyn ContentStore> = match cms {
        Some(config) => {
            info!(project = %config.project_id, dataset = %config.dataset, "using CMS content store");
            Arc::new(CmsClient::new(config))
        }
        None => match std::env::var("FIXTURE_FILE") {
            Ok(path) => Arc::new(InMemoryStore::from_fixture_file(&path)?),
            Err(_) => {
                warn!("no CMS_PROJECT_ID or FIXTURE_FILE set, serving an empty catalog");
                Arc::new(InMemoryStore::new())
            }
        },
    };
    let state = AppState { store, assets };

    let app = Router::new()
        .route("/health", get(health))
        .route("/v1/tracks", get(list_tracks))
        .route("/v1/tracks/:slug", get(get_track))
        .route("/v1/downloads", get(list_downloads))
        .route("/v1/packs", get(list_packs))
        .route("/v1/artist", get(get_artist))
        .route("/metrics", get(metrics_text))
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );

    let addr: SocketAddr = std::env::var("BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()?;
    info!("http listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TrackParams {
    search: Option<String>,
    genre: Option<String>,
    category: Option<String>,
    sort: Option<String>,
    order: Option<String>,
}

fn track_spec(params: &TrackParams) -> Result<QuerySpec, String> {
    let sort_key = match params.sort.as_deref().unwrap_or("date") {
        "date" => "publishedAt",
        "title" => "title",
        "artist" => "artistName",
        other => return Err(format!("unknown sort `{other}`")),
    };
    let order = parse_order(params.order.as_deref())?;
    let mut spec = QuerySpec::sorted_by(sort_key, order);
    if let Some(term) = &params.search {
        spec = spec.search(term.clone());
    }
    if let Some(genre) = &params.genre {
        spec = spec.filter_eq("genre", genre.clone());
    }
    if let Some(category) = &params.category {
        spec = spec.filter_eq("category", category.clone());
    }
    Ok(spec)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PackParams {
    search: Option<String>,
    genre: Option<String>,
    min_price: Option<f64>,
    max_price: Option<f64>,
    sort: Option<String>,
    order: Option<String>,
}

fn pack_spec(params: &PackParams) -> Result<QuerySpec, String> {
    let sort_key = match params.sort.as_deref().unwrap_or("date") {
        "date" => "publishedAt",
        "name" => "name",
        "price" => "price",
        other => return Err(format!("unknown sort `{other}`")),
    };
    let order = parse_order(params.order.as_deref())?;
    let mut spec = QuerySpec::sorted_by(sort_key, order);
    if let Some(term) = &params.search {
        spec = spec.search(term.clone());
    }
    if let Some(genre) = &params.genre {
        spec = spec.filter_eq("genre", genre.clone());
    }
    if params.min_price.is_some() || params.max_price.is_some() {
        spec = spec.range("price", params.min_price, params.max_price);
    }
    Ok(spec)
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DownloadParams {
    order: Option<String>,
}

fn parse_order(order: Option<&str>) -> Result<SortOrder, String> {
    match order {
        // Newest first unless the caller says otherwise; direction is
        // always explicit in the pipeline spec.
        None => Ok(SortOrder::Descending),
        Some(raw) => SortOrder::parse(raw).ok_or_else(|| format!("unknown order `{raw}`")),
    }
}

fn bad_request(endpoint: &str, message: String) -> Response {
    CATALOG_REQUESTS_TOTAL
        .with_label_values(&[endpoint, "bad_request"])
        .inc();
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

fn store_failure(endpoint: &str, err: StoreError) -> Response {
    match err {
        StoreError::NotFound => {
            CATALOG_REQUESTS_TOTAL
                .with_label_values(&[endpoint, "not_found"])
                .inc();
            (StatusCode::NOT_FOUND, Json(json!({"error": "not_found"}))).into_response()
        }
        other => {
            warn!(endpoint, error = %other, "content store fetch failed");
            CATALOG_REQUESTS_TOTAL
                .with_label_values(&[endpoint, "upstream_error"])
                .inc();
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": other.to_string()})),
            )
                .into_response()
        }
    }
}

fn ok_counted(endpoint: &str) {
    CATALOG_REQUESTS_TOTAL
        .with_label_values(&[endpoint, "ok"])
        .inc();
}

async fn list_tracks(
    State(app): State<AppState>,
    Query(params): Query<TrackParams>,
) -> Response {
    let spec = match track_spec(&params) {
        Ok(spec) => spec,
        Err(msg) => return bad_request("tracks", msg),
    };
    let tracks = {
        let _timer = CATALOG_FETCH_SECONDS
            .with_label_values(&["track"])
            .start_timer();
        match app.store.fetch_tracks().await {
            Ok(tracks) => tracks,
            Err(err) => return store_failure("tracks", err),
        }
    };
    let out = match apply(&tracks, &spec) {
        Ok(out) => out,
        Err(err) => return bad_request("tracks", err.to_string()),
    };
    QUERY_RESULTS_SIZE
        .with_label_values(&["track"])
        .observe(out.len() as f64);
    ok_counted("tracks");
    (
        StatusCode::OK,
        Json(json!({
            "total": tracks.len(),
            "count": out.len(),
            "items": out,
        })),
    )
        .into_response()
}

async fn get_track(State(app): State<AppState>, Path(slug): Path<String>) -> Response {
    let track = match app.store.fetch_track_by_slug(&slug).await {
        Ok(track) => track,
        Err(err) => return store_failure("track_detail", err),
    };
    let cover_url = track
        .cover_art
        .as_ref()
        .and_then(|art| app.assets.image_url(art, ImageSize::Card600).ok());
    ok_counted("track_detail");
    (
        StatusCode::OK,
        Json(json!({
            "track": track,
            "coverUrl": cover_url,
        })),
    )
        .into_response()
}

async fn list_downloads(
    State(app): State<AppState>,
    Query(params): Query<DownloadParams>,
) -> Response {
    let order = match parse_order(params.order.as_deref()) {
        Ok(order) => order,
        Err(msg) => return bad_request("downloads", msg),
    };
    let tracks = {
        let _timer = CATALOG_FETCH_SECONDS
            .with_label_values(&["track"])
            .start_timer();
        match app.store.fetch_tracks().await {
            Ok(tracks) => tracks,
            Err(err) => return store_failure("downloads", err),
        }
    };
    let spec = QuerySpec::sorted_by("publishedAt", order).grouped_by("category");
    let out = match apply(&tracks, &spec) {
        Ok(out) => out,
        Err(err) => return bad_request("downloads", err.to_string()),
    };
    QUERY_RESULTS_SIZE
        .with_label_values(&["track"])
        .observe(out.len() as f64);
    ok_counted("downloads");
    (StatusCode::OK, Json(json!({ "buckets": out }))).into_response()
}

async fn list_packs(State(app): State<AppState>, Query(params): Query<PackParams>) -> Response {
    let spec = match pack_spec(&params) {
        Ok(spec) => spec,
        Err(msg) => return bad_request("packs", msg),
    };
    let packs = {
        let _timer = CATALOG_FETCH_SECONDS
            .with_label_values(&["samplePack"])
            .start_timer();
        match app.store.fetch_packs().await {
            Ok(packs) => packs,
            Err(err) => return store_failure("packs", err),
        }
    };
    let out = match apply(&packs, &spec) {
        Ok(out) => out,
        Err(err) => return bad_request("packs", err.to_string()),
    };
    QUERY_RESULTS_SIZE
        .with_label_values(&["samplePack"])
        .observe(out.len() as f64);
    ok_counted("packs");
    (
        StatusCode::OK,
        Json(json!({
            "total": packs.len(),
            "count": out.len(),
            "items": out,
        })),
    )
        .into_response()
}

async fn get_artist(State(app): State<AppState>) -> Response {
    let artist = match app.store.fetch_artist().await {
        Ok(artist) => artist,
        Err(err) => return store_failure("artist", err),
    };
    match artist {
        Some(artist) => {
            ok_counted("artist");
            let profile_url = artist
                .profile_image
                .as_ref()
                .and_then(|img| app.assets.image_url(img, ImageSize::Card600).ok());
            let hero_url = artist
                .hero_image
                .as_ref()
                .and_then(|img| app.assets.image_url(img, ImageSize::Hero1600).ok());
            (
                StatusCode::OK,
                Json(json!({
                    "artist": artist,
                    "profileImageUrl": profile_url,
                    "heroImageUrl": hero_url,
                })),
            )
                .into_response()
        }
        None => store_failure("artist", StoreError::NotFound),
    }
}

async fn metrics_text() -> Response {
    use prometheus::Encoder;
    let encoder = prometheus::TextEncoder::new();
    let families = prometheus::gather();
    let mut buf = Vec::new();
    if let Err(err) = encoder.encode(&families, &mut buf) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": err.to_string()})),
        )
            .into_response();
    }
    (StatusCode::OK, buf).into_response()
}
