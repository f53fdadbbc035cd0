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

//! Tables shared by several subsystems: ethernet interfaces and log services.

use super::{Field, LabelScope, ResourceParser, ResourceTable};
use crate::ExporterError;
use crate::normalize::{FieldKind, flag};
use crate::redfish::model::{EthernetInterface, LogEntry, LogService};
use crate::registry::{DescriptorRegistry, Subsystem};

pub struct EthernetParsers {
    pub interface: ResourceParser<EthernetInterface, 5>,
}

impl EthernetParsers {
    pub fn register(
        registry: &mut DescriptorRegistry,
        subsystem: Subsystem,
    ) -> Result<Self, ExporterError> {
        let table = ResourceTable {
            resource: "ethernet_interface",
            label_names: [
                "host",
                "resource",
                subsystem.id_label(),
                "ethernet_interface",
                "ethernet_interface_id",
            ],
            labels: |l: &LabelScope, e: &EthernetInterface| {
                [
                    l.host(),
                    l.resource(),
                    l.parent(0),
                    e.name.clone(),
                    e.id.clone(),
                ]
            },
            fields: vec![
                Field::coded(
                    "ethernet_interface_state",
                    "ethernet interface state",
                    FieldKind::State,
                    |e: &EthernetInterface| e.status.state.as_deref(),
                ),
                Field::coded(
                    "ethernet_interface_health",
                    "ethernet interface health",
                    FieldKind::Health,
                    |e: &EthernetInterface| e.status.health.as_deref(),
                ),
                Field::coded(
                    "ethernet_interface_link_status",
                    "ethernet interface link status",
                    FieldKind::LinkStatus,
                    |e: &EthernetInterface| e.link_status.as_deref(),
                ),
                Field::numeric(
                    "ethernet_interface_link_enabled",
                    "ethernet interface if the link is enabled,1(Enabled),0(Disabled)",
                    |e: &EthernetInterface| flag(e.interface_enabled),
                ),
                Field::numeric(
                    "ethernet_interface_speed_mbps",
                    "ethernet interface link speed in Mbps",
                    |e: &EthernetInterface| e.speed_mbps,
                ),
            ],
        };
        Ok(Self {
            interface: ResourceParser::register(registry, subsystem, table)?,
        })
    }
}

pub struct LogParsers {
    pub service: ResourceParser<LogService, 7>,
    pub entry: ResourceParser<LogEntry, 11>,
}

impl LogParsers {
    pub fn register(
        registry: &mut DescriptorRegistry,
        subsystem: Subsystem,
    ) -> Result<Self, ExporterError> {
        let service = ResourceTable {
            resource: "log_service",
            label_names: [
                "host",
                "resource",
                subsystem.id_label(),
                "log_service",
                "log_service_id",
                "log_service_enabled",
                "log_service_overwrite_policy",
            ],
            labels: |l: &LabelScope, s: &LogService| {
                [
                    l.host(),
                    l.resource(),
                    l.parent(0),
                    s.name.clone(),
                    s.id.clone(),
                    s.service_enabled.map(|e| e.to_string()).unwrap_or_default(),
                    s.overwrite_policy.clone(),
                ]
            },
            fields: vec![
                Field::coded(
                    "log_service_state",
                    "log service state",
                    FieldKind::State,
                    |s: &LogService| s.status.state.as_deref(),
                ),
                Field::coded(
                    "log_service_health",
                    "log service health",
                    FieldKind::Health,
                    |s: &LogService| s.status.health.as_deref(),
                ),
            ],
        };

        let entry = ResourceTable {
            resource: "log_entry",
            label_names: [
                "host",
                "resource",
                subsystem.id_label(),
                "log_service_id",
                "log_entry",
                "log_entry_id",
                "log_entry_code",
                "log_entry_type",
                "log_entry_message_id",
                "log_entry_sensor_number",
                "log_entry_sensor_type",
            ],
            labels: |l: &LabelScope, e: &LogEntry| {
                [
                    l.host(),
                    l.resource(),
                    l.parent(0),
                    l.parent(1),
                    e.name.clone(),
                    e.id.clone(),
                    e.entry_code.clone(),
                    e.entry_type.clone(),
                    e.message_id.clone(),
                    e.sensor_number.map(|n| n.to_string()).unwrap_or_default(),
                    e.sensor_type.clone(),
                ]
            },
            fields: vec![Field::coded(
                "log_entry_severity_state",
                "log entry severity state",
                FieldKind::SeverityState,
                |e: &LogEntry| e.severity.as_deref(),
            )],
        };

        Ok(Self {
            service: ResourceParser::register(registry, subsystem, service)?,
            entry: ResourceParser::register(registry, subsystem, entry)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::super::testing::{drain, named, strings};
    use super::super::{Catalog, Lineage};
    use crate::redfish::model::{EthernetInterface, LogEntry, LogService};
    use crate::sink::SampleSink;

    #[test]
    fn test_log_service_and_entry() {
        let catalog = Catalog::new("redfish").unwrap();
        let service: LogService = serde_json::from_value(json!({
            "Id": "SEL",
            "Name": "System Event Log",
            "ServiceEnabled": true,
            "OverWritePolicy": "WrapsWhenFull",
            "Status": {"State": "Enabled", "Health": "OK"}
        }))
        .unwrap();
        let entry: LogEntry = serde_json::from_value(json!({
            "Id": "12",
            "Name": "Log Entry 12",
            "EntryType": "SEL",
            "MessageId": "PWR2262",
            "SensorNumber": 113,
            "SensorType": "Power Supply",
            "Severity": "Critical"
        }))
        .unwrap();

        let (sink, mut rx) = SampleSink::channel();
        let lineage = Lineage::root("bmc").child("System.Embedded.1");
        catalog.system.log.service.parse(&lineage, &service, &sink);
        catalog.system.log.entry.parse(&lineage.child("SEL"), &entry, &sink);
        let samples = drain(&mut rx);
        assert_eq!(samples.len(), 3);

        let state = named(&catalog, &samples, "redfish_system_log_service_state");
        assert_eq!(state[0].value, 1.0);
        assert_eq!(
            state[0].labels,
            strings(&[
                "bmc",
                "log_service",
                "System.Embedded.1",
                "System Event Log",
                "SEL",
                "true",
                "WrapsWhenFull"
            ])
        );

        let severity = named(&catalog, &samples, "redfish_system_log_entry_severity_state");
        assert_eq!(severity[0].value, 3.0);
        assert_eq!(
            severity[0].labels,
            strings(&[
                "bmc",
                "log_entry",
                "System.Embedded.1",
                "SEL",
                "Log Entry 12",
                "12",
                "",
                "SEL",
                "PWR2262",
                "113",
                "Power Supply"
            ])
        );
    }

    #[test]
    fn test_informational_entries_emit_nothing() {
        let catalog = Catalog::new("redfish").unwrap();
        let entry = LogEntry {
            id: "1".to_string(),
            severity: Some("Informational".to_string()),
            ..Default::default()
        };
        let (sink, mut rx) = SampleSink::channel();
        let emitted = catalog
            .manager
            .log
            .entry
            .parse(&Lineage::root("bmc").child("iDRAC").child("Lclog"), &entry, &sink);
        assert_eq!(emitted, 0);
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn test_manager_ethernet_interface() {
        let catalog = Catalog::new("redfish").unwrap();
        let nic: EthernetInterface = serde_json::from_value(json!({
            "Id": "NIC.1",
            "Name": "Manager NIC",
            "LinkStatus": "LinkDown",
            "InterfaceEnabled": false,
            "SpeedMbps": 1000,
            "Status": {"State": "Disabled", "Health": "Warning"}
        }))
        .unwrap();
        let (sink, mut rx) = SampleSink::channel();
        let emitted = catalog
            .manager
            .ethernet
            .interface
            .parse(&Lineage::root("bmc").child("BMC"), &nic, &sink);
        assert_eq!(emitted, 5);

        let samples = drain(&mut rx);
        let expect = [
            ("redfish_manager_ethernet_interface_state", 2.0),
            ("redfish_manager_ethernet_interface_health", 2.0),
            ("redfish_manager_ethernet_interface_link_status", 3.0),
            ("redfish_manager_ethernet_interface_link_enabled", 0.0),
            ("redfish_manager_ethernet_interface_speed_mbps", 1000.0),
        ];
        for (name, value) in expect {
            let found = named(&catalog, &samples, name);
            assert_eq!(found.len(), 1, "{name}");
            assert_eq!(found[0].value, value, "{name}");
            assert_eq!(
                found[0].labels,
                strings(&["bmc", "ethernet_interface", "BMC", "Manager NIC", "NIC.1"])
            );
        }
    }
}
