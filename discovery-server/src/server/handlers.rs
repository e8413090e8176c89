use super::error::ApiError;
use crate::cluster::ClusterManager;
use crate::core::{Cluster, ClusterCreateOpts, Node};
use crate::version::VersionInfo;
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, warn};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub manager: Arc<dyn ClusterManager>,
    /// Redirect target for `GET /`
    pub docs_url: Arc<str>,
}

impl AppState {
    pub fn new(manager: Arc<dyn ClusterManager>, docs_url: impl Into<Arc<str>>) -> Self {
        Self {
            manager,
            docs_url: docs_url.into(),
        }
    }
}

/// Run a blocking manager call off the async runtime
async fn with_manager<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&dyn ClusterManager) -> crate::core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let manager = state.manager.clone();
    tokio::task::spawn_blocking(move || f(manager.as_ref()))
        .await
        .map_err(|e| ApiError::internal(format!("manager task failed: {e}")))?
        .map_err(ApiError::from)
}

/// Query parameters for cluster creation; all optional
#[derive(Debug, Default, Deserialize)]
pub struct CreateClusterParams {
    pub size: Option<String>,
    pub name: Option<String>,
    #[serde(rename = "accountID")]
    pub account_id: Option<String>,
    pub ttl: Option<String>,
}

fn parse_param<T: FromStr>(name: &str, value: Option<&str>) -> Result<Option<T>, ApiError>
where
    T::Err: std::fmt::Display,
{
    match value.filter(|v| !v.is_empty()) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|e| ApiError::bad_request(format!("invalid {name} {raw:?}: {e}"))),
    }
}

impl CreateClusterParams {
    pub fn into_opts(self) -> Result<ClusterCreateOpts, ApiError> {
        Ok(ClusterCreateOpts {
            size: parse_param::<u32>("size", self.size.as_deref())?.unwrap_or_default(),
            ttl: parse_param::<u64>("ttl", self.ttl.as_deref())?.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            account_id: self.account_id.unwrap_or_default(),
        })
    }
}

/// POST /clusters - create a new cluster
pub async fn create_cluster(
    State(state): State<AppState>,
    Query(params): Query<CreateClusterParams>,
) -> Result<(StatusCode, Json<Cluster>), ApiError> {
    let opts = params.into_opts()?;
    debug!("REST CREATE size={}, ttl={}", opts.size, opts.ttl);

    let cluster = with_manager(&state, move |m| m.create(opts)).await?;
    Ok((StatusCode::CREATED, Json(cluster)))
}

/// GET /clusters/{id} - cluster status
pub async fn get_cluster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Cluster>, ApiError> {
    debug!("REST GET cluster={}", id);

    let cluster = with_manager(&state, move |m| m.get(&id)).await?;
    Ok(Json(cluster))
}

/// PUT /clusters/{id} - register a node
pub async fn register_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Node>, JsonRejection>,
) -> Result<Json<Cluster>, ApiError> {
    let Json(node) = body.map_err(|e| ApiError::bad_request(e.body_text()))?;
    debug!("REST REGISTER cluster={}, node={}", id, node.name);

    let cluster = with_manager(&state, move |m| m.register_node(&id, node)).await?;
    Ok(Json(cluster))
}

/// DELETE /clusters/{id} - delete a cluster
pub async fn delete_cluster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    debug!("REST DELETE cluster={}", id);

    with_manager(&state, move |m| m.delete(&id)).await?;
    Ok(StatusCode::OK)
}

/// Health check: round-trips a throwaway cluster through the store
pub async fn health_check(State(state): State<AppState>) -> Response {
    let probe = with_manager(&state, |m| {
        let cluster = m.create(ClusterCreateOpts::default())?;
        m.delete(&cluster.id)
    })
    .await;

    match probe {
        Ok(()) => (StatusCode::OK, "OK").into_response(),
        Err(e) => {
            warn!("health probe failed: {}", e.message);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                format!("health probe failed: {}", e.message),
            )
                .into_response()
        }
    }
}

/// Version endpoint
pub async fn version() -> Json<VersionInfo> {
    Json(VersionInfo::current())
}

pub async fn robots() -> &'static str {
    "User-agent: *\nDisallow: /"
}

/// Home redirects to the documentation
pub async fn home(State(state): State<AppState>) -> Response {
    (
        StatusCode::MOVED_PERMANENTLY,
        [(header::LOCATION, state.docs_url.to_string())],
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_params_defaults() {
        let opts = CreateClusterParams::default().into_opts().unwrap();
        assert_eq!(opts, ClusterCreateOpts::default());
    }

    #[test]
    fn test_create_params_parsed() {
        let params = CreateClusterParams {
            size: Some("5".to_string()),
            name: Some("prod".to_string()),
            account_id: Some("acc".to_string()),
            ttl: Some("60".to_string()),
        };
        let opts = params.into_opts().unwrap();
        assert_eq!(opts.size, 5);
        assert_eq!(opts.ttl, 60);
        assert_eq!(opts.name, "prod");
        assert_eq!(opts.account_id, "acc");
    }

    #[test]
    fn test_create_params_invalid_size() {
        let params = CreateClusterParams {
            size: Some("three".to_string()),
            ..Default::default()
        };
        let err = params.into_opts().unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
        assert!(err.message.contains("size"));
    }
}
