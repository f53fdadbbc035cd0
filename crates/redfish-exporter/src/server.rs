/*
 * SPDX-FileCopyrightText: Copyright (c) 2026 NVIDIA CORPORATION & AFFILIATES. All rights reserved.
 * SPDX-License-Identifier: Apache-2.0
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 * http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use axum::Router;
use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use serde::Deserialize;
use tokio::net::TcpListener;
use tokio::sync::RwLock;

use crate::ExporterError;
use crate::config::Config;
use crate::metrics::MetricsManager;
use crate::scrape::ScrapeOrchestrator;
use crate::sink::SampleSink;
use crate::targets::CredentialResolver;

const LANDING_PAGE: &str = r#"<html>
<head><title>Redfish Exporter</title></head>
<body>
<h1>Redfish Exporter</h1>
<form action="/redfish">
<label>Target:</label> <input type="text" name="target" placeholder="X.X.X.X">
<label>Group:</label> <input type="text" name="group" placeholder="group">
<input type="submit" value="Submit">
</form>
<p><a href="/metrics">Local metrics</a></p>
</body>
</html>
"#;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ScrapeOrchestrator>,
    pub resolver: Arc<RwLock<CredentialResolver>>,
    pub metrics: Arc<MetricsManager>,
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
pub struct ScrapeParams {
    target: Option<String>,
    group: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing))
        .route("/redfish", get(scrape))
        .route("/metrics", get(self_metrics))
        .route("/-/reload", post(reload))
        .with_state(state)
}

async fn landing() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

async fn scrape(State(state): State<AppState>, Query(params): Query<ScrapeParams>) -> Response {
    let Some(target) = params.target.filter(|t| !t.is_empty()) else {
        state.metrics.rejected("missing_target");
        return (StatusCode::BAD_REQUEST, "'target' parameter must be specified\n").into_response();
    };

    let credentials = state
        .resolver
        .read()
        .await
        .credentials_for(&target, params.group.as_deref());
    let credentials = match credentials {
        Ok(credentials) => credentials,
        Err(e) => {
            tracing::warn!(error = ?e, host = %target, "Rejecting scrape");
            state.metrics.rejected("no_credentials");
            return (StatusCode::BAD_REQUEST, format!("{e}\n")).into_response();
        }
    };

    let started = Instant::now();
    let (sink, mut rx) = SampleSink::channel();
    let outcome = state.orchestrator.scrape(&target, &credentials, sink).await;

    let body = state.orchestrator.exposition().and_then(|mut exposition| {
        let recorded = exposition.drain(&mut rx);
        tracing::debug!(host = %target, recorded, "Scrape finished");
        exposition.encode()
    });
    state.metrics.observe_scrape(outcome, started.elapsed());

    match body {
        Ok(text) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], text).into_response(),
        Err(e) => {
            tracing::error!(error = ?e, host = %target, "Failed to encode scrape");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn self_metrics(State(state): State<AppState>) -> Response {
    match state.metrics.encode() {
        Ok(text) => ([(header::CONTENT_TYPE, prometheus::TEXT_FORMAT)], text).into_response(),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to encode exporter metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

async fn reload(State(state): State<AppState>) -> Response {
    match reload_credentials(&state).await {
        Ok(()) => (StatusCode::OK, "reloaded\n").into_response(),
        Err(e) => {
            tracing::error!(error = ?e, "Failed to reload credentials");
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{e}\n")).into_response()
        }
    }
}

/// Re-reads the config file and swaps in its credential tables. Everything
/// else in the file only takes effect on restart.
pub async fn reload_credentials(state: &AppState) -> Result<(), ExporterError> {
    let config = Config::load(state.config_path.as_deref())?;
    let resolver = config.credential_resolver()?;
    *state.resolver.write().await = resolver;
    tracing::info!(
        hosts = config.hosts.len(),
        groups = config.groups.len(),
        "Reloaded credentials"
    );
    Ok(())
}

#[cfg(unix)]
pub async fn reload_on_hangup(state: AppState) -> Result<(), ExporterError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = signal(SignalKind::hangup())?;
    while hangup.recv().await.is_some() {
        if let Err(e) = reload_credentials(&state).await {
            tracing::error!(error = ?e, "Failed to reload credentials, keeping previous");
        }
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn reload_on_hangup(_state: AppState) -> Result<(), ExporterError> {
    std::future::pending().await
}

pub async fn run_server(addr: SocketAddr, state: AppState) -> Result<(), ExporterError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(address = %addr, "Listening for scrape requests");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = ?e, "Failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::io::Write;

    use axum::body::Body;
    use axum::http::Request;
    use serde_json::json;
    use tower::ServiceExt;

    use super::*;
    use crate::parsers::Catalog;
    use crate::redfish::mock::{MockConnector, MockSession};
    use crate::targets::Credentials;

    fn state(connector: MockConnector, hosts: BTreeMap<String, Credentials>) -> AppState {
        let config = Config::default();
        let catalog = Arc::new(Catalog::new("redfish").unwrap());
        AppState {
            orchestrator: Arc::new(ScrapeOrchestrator::new(Arc::new(connector), catalog, &config)),
            resolver: Arc::new(RwLock::new(
                CredentialResolver::new(&hosts, &BTreeMap::new()).unwrap(),
            )),
            metrics: Arc::new(MetricsManager::new("redfish").unwrap()),
            config_path: None,
        }
    }

    fn default_hosts() -> BTreeMap<String, Credentials> {
        BTreeMap::from([(
            "default".to_string(),
            Credentials {
                username: "root".to_string(),
                password: "calvin".to_string(),
            },
        )])
    }

    async fn get(state: AppState, uri: &str) -> (StatusCode, String, Option<String>) {
        let response = router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap(), content_type)
    }

    #[tokio::test]
    async fn test_missing_target_is_bad_request() {
        let state = state(MockConnector::unreachable(), default_hosts());
        let metrics = state.metrics.clone();

        let (status, _, _) = get(state.clone(), "/redfish").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        let (status, _, _) = get(state, "/redfish?target=").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let text = metrics.encode().unwrap();
        assert!(text.contains("redfish_exporter_rejected_requests_total{reason=\"missing_target\"} 2"));
    }

    #[tokio::test]
    async fn test_unresolved_credentials_is_bad_request() {
        let state = state(MockConnector::unreachable(), BTreeMap::new());
        let (status, body, _) = get(state, "/redfish?target=10.0.0.1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.contains("10.0.0.1"));
    }

    #[tokio::test]
    async fn test_unknown_group_is_bad_request() {
        let state = state(MockConnector::unreachable(), default_hosts());
        let (status, _, _) = get(state, "/redfish?target=10.0.0.1&group=gpu").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unreachable_target_still_answers() {
        let state = state(MockConnector::unreachable(), default_hosts());
        let metrics = state.metrics.clone();

        let (status, body, content_type) = get(state, "/redfish?target=10.0.0.1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some(prometheus::TEXT_FORMAT));
        assert!(body.contains("redfish_up{host=\"10.0.0.1\"} 0"));
        assert!(body.contains("redfish_exporter_scrape_duration_seconds{host=\"10.0.0.1\"}"));
        assert!(!body.contains("redfish_chassis_"));

        let text = metrics.encode().unwrap();
        assert!(text.contains("redfish_exporter_scrapes_total{outcome=\"down\"} 1"));
    }

    #[tokio::test]
    async fn test_scrape_returns_inventory() {
        let session = MockSession::new()
            .with(
                "/redfish/v1/Managers",
                json!({"Members": [{"@odata.id": "/redfish/v1/Managers/BMC"}]}),
            )
            .with(
                "/redfish/v1/Managers/BMC",
                json!({"Id": "BMC", "Name": "Manager", "Model": "X", "ManagerType": "BMC",
                       "Status": {"State": "Enabled", "Health": "OK"}}),
            );
        let state = state(MockConnector::new(session), default_hosts());

        let (status, body, _) = get(state, "/redfish?target=bmc-7").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("redfish_up{host=\"bmc-7\"} 1"));
        assert!(body.contains(
            "redfish_manager_health{host=\"bmc-7\",manager_id=\"BMC\",model=\"X\",name=\"Manager\",resource=\"manager\",type=\"BMC\"} 1"
        ));
        assert!(body.contains("redfish_collector_scrape_status{collector=\"manager\",host=\"bmc-7\"} 1"));
    }

    #[tokio::test]
    async fn test_landing_and_self_metrics() {
        let state = state(MockConnector::unreachable(), default_hosts());
        let (status, body, _) = get(state.clone(), "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("/metrics"));

        let (status, _, content_type) = get(state, "/metrics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some(prometheus::TEXT_FORMAT));
    }

    #[tokio::test]
    async fn test_reload_swaps_credentials() {
        let dir = std::env::temp_dir().join(format!("redfish-exporter-reload-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[groups.gpu]\nusername = \"gpuadmin\"\npassword = \"pw\"\n\n[hosts.default]\nusername = \"root\"\npassword = \"calvin\""
        )
        .unwrap();

        let mut state = state(MockConnector::unreachable(), BTreeMap::new());
        state.config_path = Some(path.clone());
        assert!(state.resolver.read().await.credentials_for("10.0.0.1", Some("gpu")).is_err());

        let response = router(state.clone())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/-/reload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let resolver = state.resolver.read().await;
        assert_eq!(resolver.credentials_for("10.0.0.1", Some("gpu")).unwrap().username, "gpuadmin");
        assert_eq!(resolver.credentials_for("10.0.0.1", None).unwrap().username, "root");
        drop(resolver);

        std::fs::write(&path, "[hosts.\"bmc-[\"]\nusername = \"u\"\npassword = \"p\"\n").unwrap();
        assert!(reload_credentials(&state).await.is_err());
        assert!(state.resolver.read().await.credentials_for("10.0.0.1", Some("gpu")).is_ok());

        std::fs::remove_dir_all(&dir).ok();
    }
}
