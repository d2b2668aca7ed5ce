//! Route unique `/` : liste des dossiers servie depuis le cache

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    Router,
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::any,
};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use wdlcontrol::{ControlError, Snapshot, SnapshotCache};

use crate::render::render_page;

/// État partagé par les handlers
#[derive(Clone)]
pub struct ListingState {
    cache: Arc<SnapshotCache>,
    upstream_url: String,
    refresh_deadline: Duration,
}

impl ListingState {
    /// `upstream_url` n'est utilisé que pour l'affichage
    pub fn new(
        cache: Arc<SnapshotCache>,
        upstream_url: impl Into<String>,
        refresh_deadline: Duration,
    ) -> Self {
        Self {
            cache,
            upstream_url: upstream_url.into(),
            refresh_deadline,
        }
    }
}

/// Construit le routeur : `/` pour la liste (toute méthode), 404 pour tout le reste
pub fn router(state: ListingState) -> Router {
    Router::new()
        .route("/", any(listing))
        .fallback(not_found)
        .with_state(state)
}

async fn listing(State(state): State<ListingState>) -> Response {
    let now = Instant::now();

    // Annulé à l'échéance, ou quand la requête est abandonnée
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    let refresh = state.cache.get_or_refresh(now, &cancel);
    tokio::pin!(refresh);

    let result = tokio::select! {
        result = &mut refresh => result,
        _ = tokio::time::sleep(state.refresh_deadline) => {
            warn!(deadline = ?state.refresh_deadline, "Refresh deadline reached, cancelling walk");
            cancel.cancel();
            refresh.await
        }
    };

    match result {
        Ok(snapshot) => page_response(&state, &snapshot, now),
        Err(err) => {
            if let ControlError::Cancelled { collected } = &err {
                warn!(collected = collected.len(), "Partial walk discarded");
            }
            error!(error = %err, "Listing refresh failed");
            (StatusCode::BAD_GATEWAY, err.to_string()).into_response()
        }
    }
}

fn page_response(state: &ListingState, snapshot: &Snapshot, now: Instant) -> Response {
    let body = render_page(&state.upstream_url, snapshot.folders());
    let max_age = state.cache.interval().as_secs();
    let age = snapshot.age(now).as_secs();
    let last_modified = snapshot
        .filled_at_utc()
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string();

    (
        [
            (header::CONTENT_TYPE, "text/html; charset=utf-8".to_string()),
            (header::CACHE_CONTROL, format!("max-age={max_age}")),
            (header::AGE, age.to_string()),
            (header::LAST_MODIFIED, last_modified),
        ],
        body,
    )
        .into_response()
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (StatusCode::NOT_FOUND, format!("{} Not Found", uri.path()))
}
