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

//! One scrape: connect, run every enabled subsystem collector against the
//! live session, always log out, and report `up` plus the timings.

use std::sync::Arc;
use std::time::Instant;

use futures::future::join_all;

use crate::ExporterError;
use crate::collector::{ScrapeContext, SubsystemCollector, build_collectors};
use crate::config::Config;
use crate::parsers::Catalog;
use crate::redfish::{Connector, RedfishSession};
use crate::registry::{Descriptor, Subsystem};
use crate::sink::{Exposition, SampleSink};
use crate::targets::Credentials;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapeOutcome {
    /// A session was established; subsystem failures do not change this.
    Up,
    /// The target could not be reached or refused the credentials.
    Down,
}

impl ScrapeOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            ScrapeOutcome::Up => "up",
            ScrapeOutcome::Down => "down",
        }
    }
}

pub struct ScrapeOrchestrator {
    connector: Arc<dyn Connector>,
    catalog: Arc<Catalog>,
    collectors: Vec<Box<dyn SubsystemCollector>>,
    fetch_concurrency: usize,
}

impl ScrapeOrchestrator {
    pub fn new(connector: Arc<dyn Connector>, catalog: Arc<Catalog>, config: &Config) -> Self {
        Self {
            connector,
            catalog,
            collectors: build_collectors(&config.collectors),
            fetch_concurrency: config.client.fetch_concurrency,
        }
    }

    /// Descriptors a scrape may produce: the exporter-level ones and those of
    /// every enabled subsystem.
    pub fn describe(&self) -> Vec<&Descriptor> {
        let registry = &self.catalog.registry;
        let mut descriptors: Vec<&Descriptor> = registry
            .descriptors()
            .iter()
            .filter(|d| matches!(d.subsystem, Subsystem::Root | Subsystem::Exporter))
            .collect();
        for collector in &self.collectors {
            descriptors.extend(collector.describe(registry));
        }
        descriptors
    }

    /// A fresh exposition holding the families this orchestrator can produce.
    pub fn exposition(&self) -> Result<Exposition, ExporterError> {
        Exposition::describe(self.describe())
    }

    pub async fn scrape(
        &self,
        target: &str,
        credentials: &Credentials,
        sink: SampleSink,
    ) -> ScrapeOutcome {
        let started = Instant::now();
        let keys = &self.catalog.exporter;

        let outcome = match self.connector.connect(target, credentials).await {
            Ok(session) => {
                tracing::debug!(host = target, "Connected to target");
                sink.emit(keys.up, 1.0, [target.to_string()]);

                self.collect(session.as_ref(), target, &sink).await;

                match session.logout().await {
                    Ok(()) => tracing::debug!(host = target, "Logged out"),
                    Err(e) => tracing::warn!(error = ?e, host = target, "Failed to log out"),
                }
                ScrapeOutcome::Up
            }
            Err(e) => {
                tracing::warn!(error = ?e, host = target, "Failed to connect to target");
                sink.emit(keys.up, 0.0, [target.to_string()]);
                ScrapeOutcome::Down
            }
        };

        sink.emit(
            keys.scrape_duration,
            started.elapsed().as_secs_f64(),
            [target.to_string()],
        );
        outcome
    }

    async fn collect(&self, session: &dyn RedfishSession, target: &str, sink: &SampleSink) {
        let ctx = ScrapeContext {
            session,
            catalog: &self.catalog,
            sink: sink.clone(),
            host: target.to_string(),
            fetch_concurrency: self.fetch_concurrency,
        };
        let ctx = &ctx;
        let keys = &self.catalog.exporter;

        join_all(self.collectors.iter().map(|collector| async move {
            let started = Instant::now();
            let subsystem = collector.subsystem().as_str();
            match collector.collect(ctx).await {
                Ok(()) => tracing::debug!(host = %ctx.host, subsystem, "Subsystem collected"),
                Err(e) => {
                    tracing::warn!(error = ?e, host = %ctx.host, subsystem, "Subsystem collection failed")
                }
            }
            ctx.sink.emit(
                keys.collector_duration,
                started.elapsed().as_secs_f64(),
                [ctx.host.clone(), subsystem.to_string()],
            );
        }))
        .await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use serde_json::json;

    use super::*;
    use crate::config::Configurable;
    use crate::parsers::Lineage;
    use crate::parsers::testing::{drain, named, names, strings};
    use crate::redfish::mock::{MockConnector, MockSession};
    use crate::redfish::model::{ComputerSystem, Status};
    use crate::sink::Sample;

    fn credentials() -> Credentials {
        Credentials {
            username: "root".to_string(),
            password: "calvin".to_string(),
        }
    }

    async fn scrape(connector: MockConnector, config: &Config) -> (Arc<Catalog>, ScrapeOutcome, Vec<Sample>) {
        let catalog = Arc::new(Catalog::new("redfish").unwrap());
        let orchestrator = ScrapeOrchestrator::new(Arc::new(connector), catalog.clone(), config);
        let (sink, mut rx) = SampleSink::channel();
        let outcome = orchestrator.scrape("bmc-1", &credentials(), sink).await;
        (catalog, outcome, drain(&mut rx))
    }

    fn chassis_with_failing_power() -> MockSession {
        MockSession::new()
            .with(
                "/redfish/v1/Chassis",
                json!({"Members": [{"@odata.id": "/redfish/v1/Chassis/1"}]}),
            )
            .with(
                "/redfish/v1/Chassis/1",
                json!({"Id": "1", "Name": "Chassis", "Status": {"State": "Enabled", "Health": "OK"},
                       "Thermal": {"@odata.id": "/redfish/v1/Chassis/1/Thermal"},
                       "Power": {"@odata.id": "/redfish/v1/Chassis/1/Power"}}),
            )
            .with(
                "/redfish/v1/Chassis/1/Thermal",
                json!({"Temperatures": [{"MemberId": "0", "Name": "Inlet", "ReadingCelsius": 24,
                                         "Status": {"State": "Enabled", "Health": "OK"}}]}),
            )
            .failing("/redfish/v1/Chassis/1/Power")
            .with("/redfish/v1/Systems", json!({"Members": []}))
            .with("/redfish/v1/Managers", json!({"Members": []}))
    }

    #[tokio::test]
    async fn test_connection_failure_emits_only_up_and_duration() {
        let (catalog, outcome, samples) = scrape(MockConnector::unreachable(), &Config::default()).await;

        assert_eq!(outcome, ScrapeOutcome::Down);
        assert_eq!(samples.len(), 2);
        let up = named(&catalog, &samples, "redfish_up");
        assert_eq!(up.len(), 1);
        assert_eq!(up[0].value, 0.0);
        assert_eq!(up[0].labels, strings(&["bmc-1"]));
        assert_eq!(named(&catalog, &samples, "redfish_exporter_scrape_duration_seconds").len(), 1);
    }

    #[tokio::test]
    async fn test_logout_after_failed_subsystems() {
        let session = MockSession::new();
        let logged_out = session.logout_flag();

        let (catalog, outcome, samples) = scrape(MockConnector::new(session), &Config::default()).await;

        assert_eq!(outcome, ScrapeOutcome::Up);
        assert!(logged_out.load(Ordering::SeqCst));
        assert_eq!(named(&catalog, &samples, "redfish_up")[0].value, 1.0);
        assert!(named(&catalog, &samples, "redfish_collector_scrape_status").is_empty());

        let mut collectors: Vec<&str> = named(&catalog, &samples, "redfish_exporter_collector_duration_seconds")
            .iter()
            .map(|s| s.labels[1].as_str())
            .collect();
        collectors.sort();
        assert_eq!(collectors, vec!["chassis", "manager", "system"]);
        assert_eq!(samples.len(), 5);
    }

    #[tokio::test]
    async fn test_subsystem_failure_is_isolated() {
        let session = MockSession::new()
            .failing("/redfish/v1/Chassis")
            .with("/redfish/v1/Systems", json!({"Members": []}))
            .with("/redfish/v1/Managers", json!({"Members": []}));

        let (catalog, outcome, samples) = scrape(MockConnector::new(session), &Config::default()).await;

        assert_eq!(outcome, ScrapeOutcome::Up);
        let mut scraped: Vec<&str> = named(&catalog, &samples, "redfish_collector_scrape_status")
            .iter()
            .map(|s| s.labels[1].as_str())
            .collect();
        scraped.sort();
        assert_eq!(scraped, vec!["manager", "system"]);
    }

    #[tokio::test]
    async fn test_chassis_power_failure_keeps_the_rest() {
        let session = chassis_with_failing_power();
        let logged_out = session.logout_flag();

        let (catalog, outcome, samples) = scrape(MockConnector::new(session), &Config::default()).await;

        assert_eq!(outcome, ScrapeOutcome::Up);
        assert!(logged_out.load(Ordering::SeqCst));
        let emitted = names(&catalog, &samples);
        for name in [
            "redfish_chassis_state",
            "redfish_chassis_health",
            "redfish_chassis_temperature_celsius",
        ] {
            assert!(emitted.contains(&name.to_string()), "{name}");
        }
        assert!(!emitted.iter().any(|n| n.starts_with("redfish_chassis_power_")));
        assert_eq!(named(&catalog, &samples, "redfish_collector_scrape_status").len(), 3);
    }

    #[tokio::test]
    async fn test_disabled_collectors_do_not_run() {
        let mut config = Config::default();
        config.collectors.system = Configurable::Disabled;
        config.collectors.manager = Configurable::Disabled;
        let session = chassis_with_failing_power();

        let (catalog, _, samples) = scrape(MockConnector::new(session), &config).await;

        let durations = named(&catalog, &samples, "redfish_exporter_collector_duration_seconds");
        assert_eq!(durations.len(), 1);
        assert_eq!(durations[0].labels, strings(&["bmc-1", "chassis"]));
    }

    #[tokio::test]
    async fn test_describe_follows_enabled_collectors() {
        let catalog = Arc::new(Catalog::new("redfish").unwrap());
        let mut config = Config::default();
        let all = ScrapeOrchestrator::new(Arc::new(MockConnector::unreachable()), catalog.clone(), &config)
            .describe()
            .len();
        assert_eq!(all, catalog.registry.len());

        config.collectors.chassis = Configurable::Disabled;
        let orchestrator = ScrapeOrchestrator::new(Arc::new(MockConnector::unreachable()), catalog.clone(), &config);
        let descriptors = orchestrator.describe();
        assert!(descriptors.len() < all);
        assert!(descriptors.iter().all(|d| d.subsystem != Subsystem::Chassis));
    }

    #[tokio::test]
    async fn test_exposition_omits_disabled_subsystems() {
        let catalog = Arc::new(Catalog::new("redfish").unwrap());
        let mut config = Config::default();
        config.collectors.system = Configurable::Disabled;
        let orchestrator = ScrapeOrchestrator::new(
            Arc::new(MockConnector::new(chassis_with_failing_power())),
            catalog.clone(),
            &config,
        );
        let (sink, mut rx) = SampleSink::channel();
        let stray = sink.clone();
        orchestrator.scrape("bmc-1", &credentials(), sink).await;
        let system = ComputerSystem {
            id: "System.Embedded.1".to_string(),
            status: Status {
                state: Some("Enabled".to_string()),
                health: None,
            },
            ..Default::default()
        };
        assert_eq!(catalog.system.system.parse(&Lineage::root("bmc-1"), &system, &stray), 1);

        let mut exposition = orchestrator.exposition().unwrap();
        exposition.drain(&mut rx);
        let families: Vec<String> = exposition
            .gather()
            .iter()
            .map(|f| f.get_name().to_string())
            .collect();
        assert!(families.contains(&"redfish_up".to_string()));
        assert!(families.contains(&"redfish_chassis_state".to_string()));
        assert!(families.iter().all(|name| !name.starts_with("redfish_system_")));
    }

    #[tokio::test]
    async fn test_exposition_of_a_scrape() {
        let catalog = Arc::new(Catalog::new("redfish").unwrap());
        let orchestrator = ScrapeOrchestrator::new(
            Arc::new(MockConnector::new(chassis_with_failing_power())),
            catalog.clone(),
            &Config::default(),
        );
        let (sink, mut rx) = SampleSink::channel();
        orchestrator.scrape("bmc-1", &credentials(), sink).await;

        let mut exposition = orchestrator.exposition().unwrap();
        exposition.drain(&mut rx);
        let text = exposition.encode().unwrap();

        assert!(text.contains("redfish_up{host=\"bmc-1\"} 1"));
        assert!(text.contains(
            "redfish_chassis_state{chassis_id=\"1\",host=\"bmc-1\",name=\"Chassis\",resource=\"chassis\"} 1"
        ));
        assert!(text.contains("# HELP redfish_chassis_health health of chassis,1(OK),2(Warning),3(Critical)"));
        assert!(!text.contains("redfish_chassis_power_voltage_volts{"));
    }
}
