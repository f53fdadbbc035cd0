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

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::RwLock;

pub mod collector;
pub mod config;
pub mod metrics;
pub mod normalize;
pub mod parsers;
pub mod redfish;
pub mod registry;
pub mod scrape;
pub mod server;
pub mod sink;
pub mod targets;

pub use config::Config;
pub use scrape::{ScrapeOrchestrator, ScrapeOutcome};

use crate::metrics::MetricsManager;
use crate::parsers::Catalog;
use crate::redfish::{Connector, HttpConnector};
use crate::server::{AppState, reload_on_hangup, run_server};

#[derive(thiserror::Error, Debug)]
pub enum ExporterError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to decode {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Error while handling json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Authentication to {0} failed: {1}")]
    Authentication(String, String),

    #[error("No {0} link in service root of {1}")]
    MissingLink(String, String),

    #[error("No credentials for {0}")]
    NoCredentials(String),

    #[error("Metric {0} registered twice")]
    DuplicateMetric(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Prometheus Error {0}")]
    Prometheus(#[from] prometheus::Error),

    #[error("IO Error {0}")]
    Io(#[from] std::io::Error),

    #[error("Generic Error: {0}")]
    GenericError(String),
}

impl From<String> for ExporterError {
    fn from(err: String) -> Self {
        ExporterError::GenericError(err)
    }
}

pub async fn run_service(config: Config, config_path: Option<PathBuf>) -> Result<(), ExporterError> {
    let addr = config.metrics_addr()?;
    let catalog = Arc::new(Catalog::new(&config.metrics.prefix)?);
    tracing::info!(
        namespace = catalog.registry.namespace(),
        descriptors = catalog.registry.len(),
        "Built metric catalog"
    );

    let connector: Arc<dyn Connector> = Arc::new(HttpConnector::new(&config.client)?);
    let state = AppState {
        orchestrator: Arc::new(ScrapeOrchestrator::new(connector, catalog, &config)),
        resolver: Arc::new(RwLock::new(config.credential_resolver()?)),
        metrics: Arc::new(MetricsManager::new(&config.metrics.prefix)?),
        config_path,
    };

    let join_listener = tokio::spawn(run_server(addr, state.clone()));
    let join_reload = tokio::spawn(reload_on_hangup(state));

    tokio::select! {
        res = join_listener => {
            match res {
                Ok(Ok(_)) => {
                    tracing::info!("Scrape listener shutdown");
                }
                Ok(Err(e)) => {
                    tracing::error!(error=?e, "Scrape listener failed");
                    return Err(e);
                }
                Err(e) => {
                    tracing::error!(error=?e, "Scrape listener join error");
                }
            }
        }
        res = join_reload => {
            match res {
                Ok(Ok(_)) => {
                    tracing::error!("Reload handler shutdown");
                }
                Ok(Err(e)) => {
                    tracing::error!(error=?e, "Reload handler ended unexpectedly");
                }
                Err(e) => {
                    tracing::error!(error=?e, "Reload handler join error");
                }
            }
        }
    };

    Ok(())
}
