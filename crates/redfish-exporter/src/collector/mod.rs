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

//! Subsystem collectors: fetch a top-level resource list and fan out over
//! every instance and sub-resource collection, feeding the parsers.

use futures::future::{BoxFuture, join_all};
use serde::de::DeserializeOwned;

use crate::ExporterError;
use crate::config::{CollectorsConfig, SubsystemConfig};
use crate::parsers::{Catalog, EthernetParsers, Lineage, LogParsers};
use crate::redfish::model::{EthernetInterface, LogEntry, LogService};
use crate::redfish::{self, ODataLink, RedfishSession};
use crate::registry::{Descriptor, DescriptorRegistry, Subsystem};
use crate::sink::SampleSink;

mod chassis;
mod manager;
mod system;

pub use chassis::ChassisCollector;
pub use manager::ManagerCollector;
pub use system::SystemCollector;

pub trait ResultExt<T, E> {
    fn log_and_ok(self, context: &str, host: &str, parent: &str) -> Option<T>
    where
        E: std::fmt::Debug;
}

impl<T, E> ResultExt<T, E> for Result<T, E> {
    fn log_and_ok(self, context: &str, host: &str, parent: &str) -> Option<T>
    where
        E: std::fmt::Debug,
    {
        match self {
            Ok(val) => Some(val),
            Err(e) => {
                tracing::warn!(error = ?e, context, host, parent, "Operation failed");
                None
            }
        }
    }
}

/// Everything one scrape's collectors share: the live session, the parsers
/// and the write side of the output stream.
pub struct ScrapeContext<'a> {
    pub session: &'a dyn RedfishSession,
    pub catalog: &'a Catalog,
    pub sink: SampleSink,
    pub host: String,
    pub fetch_concurrency: usize,
}

impl ScrapeContext<'_> {
    pub fn root(&self) -> Lineage {
        Lineage::root(self.host.clone())
    }

    pub async fn fetch<T: DeserializeOwned>(&self, link: &ODataLink) -> Result<T, ExporterError> {
        redfish::fetch(self.session, link).await
    }

    /// All fetchable members of a collection. Individual member failures are
    /// logged and skipped; only a failed collection fetch is an error.
    pub async fn members<T: DeserializeOwned>(
        &self,
        link: &ODataLink,
        context: &str,
    ) -> Result<Vec<T>, ExporterError> {
        let members = redfish::members(self.session, link, self.fetch_concurrency).await?;
        self.log_failed(context, members.failed);
        Ok(members.resolved)
    }

    pub async fn resolve<T: DeserializeOwned>(&self, links: &[ODataLink], context: &str) -> Vec<T> {
        let members = redfish::resolve(self.session, links, self.fetch_concurrency).await;
        self.log_failed(context, members.failed);
        members.resolved
    }

    fn log_failed(&self, context: &str, failed: Vec<(String, ExporterError)>) {
        for (path, error) in failed {
            tracing::warn!(error = ?error, context, host = %self.host, path = %path, "Failed to fetch member");
        }
    }

    pub fn mark_scraped(&self, subsystem: Subsystem) {
        self.sink.emit(
            self.catalog.exporter.scrape_status,
            1.0,
            [self.host.clone(), subsystem.as_str().to_string()],
        );
    }
}

pub trait SubsystemCollector: Send + Sync {
    fn subsystem(&self) -> Subsystem;

    /// Descriptors this collector may emit values for.
    fn describe<'r>(&self, registry: &'r DescriptorRegistry) -> Vec<&'r Descriptor> {
        registry.for_subsystem(self.subsystem()).collect()
    }

    /// One fetch-and-fan-out pass. An error means the top-level list itself
    /// was unavailable and nothing was emitted for the subsystem.
    fn collect<'a>(&'a self, ctx: &'a ScrapeContext<'a>) -> BoxFuture<'a, Result<(), ExporterError>>;
}

pub fn build_collectors(config: &CollectorsConfig) -> Vec<Box<dyn SubsystemCollector>> {
    let mut collectors: Vec<Box<dyn SubsystemCollector>> = Vec::new();
    if let Some(cfg) = config.chassis.as_option() {
        collectors.push(Box::new(ChassisCollector::new(cfg.clone())));
    }
    if let Some(cfg) = config.system.as_option() {
        collectors.push(Box::new(SystemCollector::new(cfg.clone())));
    }
    if let Some(cfg) = config.manager.as_option() {
        collectors.push(Box::new(ManagerCollector::new(cfg.clone())));
    }
    collectors
}

/// Top-level collection link from the service root.
fn root_link(
    ctx: &ScrapeContext<'_>,
    subsystem: Subsystem,
    link: Option<&ODataLink>,
) -> Result<ODataLink, ExporterError> {
    link.cloned()
        .ok_or_else(|| ExporterError::MissingLink(subsystem.as_str().to_string(), ctx.host.clone()))
}

pub(crate) async fn collect_ethernet_interfaces(
    ctx: &ScrapeContext<'_>,
    parsers: &EthernetParsers,
    link: Option<&ODataLink>,
    lineage: &Lineage,
) {
    let Some(link) = link else {
        return;
    };
    let Some(interfaces) = ctx
        .members::<EthernetInterface>(link, "ethernet interfaces")
        .await
        .log_and_ok("Failed to get ethernet interfaces", &ctx.host, &lineage.parent(0))
    else {
        return;
    };
    for interface in &interfaces {
        parsers.interface.parse(lineage, interface, &ctx.sink);
    }
}

pub(crate) async fn collect_log_services(
    ctx: &ScrapeContext<'_>,
    parsers: &LogParsers,
    config: &SubsystemConfig,
    link: Option<&ODataLink>,
    lineage: &Lineage,
) {
    if !config.log_services {
        return;
    }
    let Some(link) = link else {
        return;
    };
    let Some(services) = ctx
        .members::<LogService>(link, "log services")
        .await
        .log_and_ok("Failed to get log services", &ctx.host, &lineage.parent(0))
    else {
        return;
    };

    join_all(services.iter().map(|service| async move {
        parsers.service.parse(lineage, service, &ctx.sink);
        if !config.log_entries {
            return;
        }
        let Some(entries_link) = &service.entries else {
            return;
        };
        let service_lineage = lineage.child(&service.id);
        if let Some(entries) = ctx
            .members::<LogEntry>(entries_link, "log entries")
            .await
            .log_and_ok("Failed to get log entries", &ctx.host, &service.id)
        {
            for entry in &entries {
                parsers.entry.parse(&service_lineage, entry, &ctx.sink);
            }
        }
    }))
    .await;
}
