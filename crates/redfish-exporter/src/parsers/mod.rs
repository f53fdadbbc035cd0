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

//! Declarative resource tables and the generic parser that walks them.
//!
//! A [`ResourceTable`] lists, for one Redfish resource type, the exported
//! fields with their extraction, the ordered label names and a label builder.
//! Registering a table yields a [`ResourceParser`] holding one typed key per
//! field, so label arity is fixed by the table's const parameter.

use crate::ExporterError;
use crate::normalize::{FieldKind, normalize};
use crate::registry::{DescriptorRegistry, LabeledKey, Subsystem};
use crate::sink::SampleSink;

pub mod chassis;
pub mod common;
pub mod manager;
pub mod system;

pub use chassis::ChassisParsers;
pub use common::{EthernetParsers, LogParsers};
pub use manager::ManagerParsers;
pub use system::SystemParsers;

pub enum Extract<T> {
    /// Categorical string decoded through the normalizer.
    Coded(FieldKind, fn(&T) -> Option<&str>),
    /// Numeric reading, emitted whenever the resource reports it.
    Numeric(fn(&T) -> Option<f64>),
}

pub struct Field<T> {
    pub name: &'static str,
    pub help: &'static str,
    pub extract: Extract<T>,
}

impl<T> Field<T> {
    pub fn coded(
        name: &'static str,
        help: &'static str,
        kind: FieldKind,
        read: fn(&T) -> Option<&str>,
    ) -> Self {
        Self {
            name,
            help,
            extract: Extract::Coded(kind, read),
        }
    }

    pub fn numeric(name: &'static str, help: &'static str, read: fn(&T) -> Option<f64>) -> Self {
        Self {
            name,
            help,
            extract: Extract::Numeric(read),
        }
    }

    /// Help text as published; coded fields carry their full code table.
    pub fn describe(&self) -> String {
        match &self.extract {
            Extract::Coded(kind, _) => format!("{},{}", self.help, kind.codes()),
            Extract::Numeric(_) => self.help.to_string(),
        }
    }

    pub fn value(&self, resource: &T) -> Option<f64> {
        match &self.extract {
            Extract::Coded(kind, read) => read(resource).and_then(|raw| normalize(*kind, raw)),
            Extract::Numeric(read) => read(resource),
        }
    }
}

pub struct ResourceTable<T, const N: usize> {
    pub resource: &'static str,
    pub label_names: [&'static str; N],
    pub labels: fn(&LabelScope<'_>, &T) -> [String; N],
    pub fields: Vec<Field<T>>,
}

pub struct ResourceParser<T, const N: usize> {
    table: ResourceTable<T, N>,
    keys: Vec<LabeledKey<N>>,
}

impl<T, const N: usize> ResourceParser<T, N> {
    pub fn register(
        registry: &mut DescriptorRegistry,
        subsystem: Subsystem,
        table: ResourceTable<T, N>,
    ) -> Result<Self, ExporterError> {
        let keys = table
            .fields
            .iter()
            .map(|field| registry.register(subsystem, field.name, field.describe(), table.label_names))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { table, keys })
    }

    pub fn labels(&self, lineage: &Lineage, resource: &T) -> [String; N] {
        let scope = LabelScope {
            resource: self.table.resource,
            lineage,
        };
        (self.table.labels)(&scope, resource)
    }

    /// Emits one sample per reported field and returns how many were emitted.
    pub fn parse(&self, lineage: &Lineage, resource: &T, sink: &SampleSink) -> usize {
        let labels = self.labels(lineage, resource);
        let mut emitted = 0;
        for (field, key) in self.table.fields.iter().zip(&self.keys) {
            if let Some(value) = field.value(resource) {
                sink.emit(*key, value, labels.clone());
                emitted += 1;
            }
        }
        emitted
    }
}

/// Context handed to a table's label builder: the table's resource kind and
/// the lineage of the resource being parsed.
pub struct LabelScope<'a> {
    resource: &'static str,
    lineage: &'a Lineage,
}

impl LabelScope<'_> {
    pub fn host(&self) -> String {
        self.lineage.host()
    }

    pub fn resource(&self) -> String {
        self.resource.to_string()
    }

    pub fn parent(&self, depth: usize) -> String {
        self.lineage.parent(depth)
    }
}

/// Identity chain handed from a parent resource to its children. Each child
/// receives its own extended copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lineage {
    host: String,
    parents: Vec<String>,
}

impl Lineage {
    pub fn root(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            parents: Vec::new(),
        }
    }

    pub fn child(&self, id: &str) -> Self {
        let mut parents = self.parents.clone();
        parents.push(id.to_string());
        Self {
            host: self.host.clone(),
            parents,
        }
    }

    pub fn host(&self) -> String {
        self.host.clone()
    }

    /// Identifier of the ancestor at `depth`, counted from the top-level resource.
    pub fn parent(&self, depth: usize) -> String {
        self.parents.get(depth).cloned().unwrap_or_default()
    }
}

/// Keys of the metrics emitted by the orchestrator and collectors themselves.
pub struct ExporterKeys {
    pub up: LabeledKey<1>,
    pub scrape_status: LabeledKey<2>,
    pub collector_duration: LabeledKey<2>,
    pub scrape_duration: LabeledKey<1>,
}

impl ExporterKeys {
    fn register(registry: &mut DescriptorRegistry) -> Result<Self, ExporterError> {
        Ok(Self {
            up: registry.register(
                Subsystem::Root,
                "up",
                "redfish up,1(Up),0(Down)",
                ["host"],
            )?,
            scrape_status: registry.register(
                Subsystem::Root,
                "collector_scrape_status",
                "collector_scrape_status,1(Completed)",
                ["host", "collector"],
            )?,
            collector_duration: registry.register(
                Subsystem::Exporter,
                "collector_duration_seconds",
                "Collector time duration.",
                ["host", "collector"],
            )?,
            scrape_duration: registry.register(
                Subsystem::Exporter,
                "scrape_duration_seconds",
                "Duration of the whole scrape.",
                ["host"],
            )?,
        })
    }
}

/// Every descriptor and parser, built once at startup and shared read-only.
pub struct Catalog {
    pub registry: DescriptorRegistry,
    pub exporter: ExporterKeys,
    pub chassis: ChassisParsers,
    pub system: SystemParsers,
    pub manager: ManagerParsers,
}

impl Catalog {
    pub fn new(namespace: &str) -> Result<Self, ExporterError> {
        let mut registry = DescriptorRegistry::new(namespace);
        let exporter = ExporterKeys::register(&mut registry)?;
        let chassis = ChassisParsers::register(&mut registry)?;
        let system = SystemParsers::register(&mut registry)?;
        let manager = ManagerParsers::register(&mut registry)?;
        Ok(Self {
            registry,
            exporter,
            chassis,
            system,
            manager,
        })
    }
}


#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use regex::Regex;

    use super::*;
    use crate::normalize::FieldKind;
    use crate::redfish::model::Status;

    #[derive(Default)]
    struct Widget {
        id: String,
        status: Status,
        reading: Option<f64>,
    }

    fn widget_table() -> ResourceTable<Widget, 4> {
        ResourceTable {
            resource: "widget",
            label_names: ["host", "resource", "parent_id", "widget_id"],
            labels: |l, w| [l.host(), l.resource(), l.parent(0), w.id.clone()],
            fields: vec![
                Field::coded("widget_state", "widget state", FieldKind::State, |w: &Widget| {
                    w.status.state.as_deref()
                }),
                Field::numeric("widget_reading", "widget reading", |w: &Widget| w.reading),
            ],
        }
    }

    #[test]
    fn test_generic_parser_skips_unrecognized_codes() {
        let mut registry = DescriptorRegistry::new("test");
        let parser = ResourceParser::register(&mut registry, Subsystem::Chassis, widget_table()).unwrap();
        let widget = Widget {
            id: "w1".to_string(),
            status: Status {
                state: Some("Sleeping".to_string()),
                health: None,
            },
            reading: Some(0.0),
        };

        let (sink, mut rx) = SampleSink::channel();
        let lineage = Lineage::root("bmc").child("c1");
        assert_eq!(parser.parse(&lineage, &widget, &sink), 1);

        let samples = testing::drain(&mut rx);
        assert_eq!(samples.len(), 1);
        assert_eq!(
            registry.lookup(samples[0].key).unwrap().fq_name,
            "test_chassis_widget_reading"
        );
        assert_eq!(samples[0].value, 0.0);
        assert_eq!(samples[0].labels, testing::strings(&["bmc", "widget", "c1", "w1"]));
    }

    #[test]
    fn test_coded_help_embeds_table() {
        let mut registry = DescriptorRegistry::new("test");
        ResourceParser::register(&mut registry, Subsystem::Chassis, widget_table()).unwrap();
        let state = registry.find("test_chassis_widget_state").unwrap();
        assert_eq!(state.help, format!("widget state,{}", FieldKind::State.codes()));
        let reading = registry.find("test_chassis_widget_reading").unwrap();
        assert_eq!(reading.help, "widget reading");
    }

    #[test]
    fn test_lineage_copy_on_append() {
        let root = Lineage::root("bmc");
        let system = root.child("System.1");
        let storage = system.child("RAID.1");
        assert_eq!(root.parent(0), "");
        assert_eq!(system.parent(0), "System.1");
        assert_eq!(storage.parent(0), "System.1");
        assert_eq!(storage.parent(1), "RAID.1");
        assert_eq!(system.parent(1), "");
    }

    #[test]
    fn test_catalog_descriptors_are_well_formed() {
        let catalog = Catalog::new("redfish").unwrap();
        let metric_name = Regex::new("^[a-zA-Z_:][a-zA-Z0-9_:]*$").unwrap();
        let label_name = Regex::new("^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();

        let mut names = HashSet::new();
        for descriptor in catalog.registry.descriptors() {
            assert!(metric_name.is_match(&descriptor.fq_name), "{}", descriptor.fq_name);
            assert!(names.insert(descriptor.fq_name.clone()));
            assert_eq!(descriptor.label_names.first(), Some(&"host"), "{}", descriptor.fq_name);

            let mut labels = HashSet::new();
            for label in &descriptor.label_names {
                assert!(label_name.is_match(label), "{label}");
                assert!(labels.insert(*label), "{} repeats {label}", descriptor.fq_name);
            }
            if descriptor.subsystem != Subsystem::Root && descriptor.subsystem != Subsystem::Exporter {
                assert_eq!(descriptor.label_names.get(1), Some(&"resource"));
                assert!(descriptor.label_names.contains(&descriptor.subsystem.id_label()));
            }
        }
    }

    #[test]
    fn test_catalog_registers_contract_metrics() {
        let catalog = Catalog::new("redfish").unwrap();
        for name in [
            "redfish_up",
            "redfish_collector_scrape_status",
            "redfish_exporter_collector_duration_seconds",
            "redfish_exporter_scrape_duration_seconds",
            "redfish_chassis_fan_rpm",
            "redfish_chassis_temperature_celsius",
            "redfish_chassis_power_powersupply_last_power_output_watts",
            "redfish_system_total_memory_size",
            "redfish_system_processor_total_threads",
            "redfish_system_storage_drive_capacity_bytes",
            "redfish_system_ethernet_interface_link_status",
            "redfish_manager_power_state",
            "redfish_manager_log_entry_severity_state",
        ] {
            assert!(catalog.registry.find(name).is_some(), "{name} missing");
        }

        let power_state = catalog.registry.find("redfish_system_power_state").unwrap();
        assert!(power_state.help.ends_with(FieldKind::PowerState.codes()));
        let link = catalog
            .registry
            .find("redfish_system_ethernet_interface_link_status")
            .unwrap();
        assert!(link.help.ends_with(FieldKind::LinkStatus.codes()));
    }

    #[test]
    fn test_state_and_health_help_strings() {
        let catalog = Catalog::new("redfish").unwrap();
        for descriptor in catalog.registry.descriptors() {
            if descriptor.field.ends_with("_state") || descriptor.field == "state" {
                assert!(
                    descriptor.help.contains("1(")
                        || descriptor.fq_name.ends_with("scrape_status"),
                    "{} lacks a code table",
                    descriptor.fq_name
                );
            }
            if descriptor.field.ends_with("health") {
                assert!(
                    descriptor.help.ends_with(FieldKind::Health.codes()),
                    "{}",
                    descriptor.fq_name
                );
            }
        }
    }
}
