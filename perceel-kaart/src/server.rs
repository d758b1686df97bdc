//! API HTTP JSON (axum)
//!
//! - `GET /health`
//! - `GET /api/parcel?address=..&srid=..&radius=..&score=..`

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use kadaster::ResolveError;

use crate::config::ServiceConfig;
use crate::export::parcel_feature;
use crate::service::{resolve_address, Resolution};

/// Paramètres de `GET /api/parcel`
#[derive(Debug, Default, Deserialize)]
pub struct ParcelQuery {
    pub address: Option<String>,
    pub srid: Option<u32>,
    pub radius: Option<f64>,
    #[serde(default)]
    pub score: bool,
}

/// Erreur renvoyée par l'API
#[derive(Debug)]
pub enum ApiError {
    Resolve(ResolveError),
    Internal(String),
}

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self::Resolve(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::Resolve(err) => {
                let status = StatusCode::from_u16(err.http_status())
                    .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                if status.is_server_error() {
                    warn!(kind = err.kind().as_str(), error = %err, "Resolution failed");
                }
                (
                    status,
                    json!({ "error": err.kind().as_str(), "message": err.user_message() }),
                )
            }
            ApiError::Internal(message) => {
                error!(error = %message, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal", "message": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Construit le routeur de l'API
pub fn router(config: Arc<ServiceConfig>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/parcel", get(parcel))
        .layer(TraceLayer::new_for_http())
        .with_state(config)
}

/// Démarre le serveur sur `config.bind`
pub async fn serve(config: ServiceConfig) -> Result<()> {
    let addr: SocketAddr = config
        .bind
        .parse()
        .context(format!("Invalid bind address: {}", config.bind))?;

    let app = router(Arc::new(config));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind {}", addr))?;

    info!(addr = %addr, "API listening");
    axum::serve(listener, app).await?;

    Ok(())
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn parcel(
    State(config): State<Arc<ServiceConfig>>,
    Query(query): Query<ParcelQuery>,
) -> Result<Json<Value>, ApiError> {
    let address = query.address.unwrap_or_default();
    let mut options = config.resolve_options();
    if let Some(srid) = query.srid {
        options.target_epsg = srid;
    }
    if let Some(radius) = query.radius {
        options.search_radius = radius;
    }

    let state = Arc::clone(&config);
    let resolution = tokio::task::spawn_blocking(move || {
        resolve_address(&state, &address, &options, query.score)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("resolver task failed: {}", e)))??;

    Ok(Json(response_body(&resolution, &config)?))
}

/// Corps JSON d'une résolution réussie
pub fn response_body(resolution: &Resolution, config: &ServiceConfig) -> Result<Value, ApiError> {
    let parcel = &resolution.parcel;
    let feature = parcel_feature(parcel).map_err(|e| ApiError::Internal(e.to_string()))?;

    Ok(json!({
        "address": parcel.source_address,
        "display_name": parcel.geocode.display_name,
        "location": [parcel.location.x, parcel.location.y],
        "srid": parcel.target_epsg,
        "parcel": feature,
        "selection": parcel.selection,
        "candidate_count": parcel.candidate_count,
        "biodiversity": resolution.biodiversity,
        "style": config.style,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use kadaster::{Service, TransportFailure};

    #[test]
    fn test_error_status() {
        let response = ApiError::from(ResolveError::InvalidInput("empty".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::from(ResolveError::unavailable(
            Service::Geocoder,
            TransportFailure::Timeout,
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);

        let response = ApiError::Internal("boom".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
