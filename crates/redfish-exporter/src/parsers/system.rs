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

use super::{EthernetParsers, Field, LabelScope, LogParsers, ResourceParser, ResourceTable};
use crate::ExporterError;
use crate::normalize::FieldKind;
use crate::redfish::model::{
    ComputerSystem, Drive, Memory, NetworkInterface, PcieDevice, PcieFunction, Processor, Volume,
};
use crate::registry::{DescriptorRegistry, Subsystem};

pub struct SystemParsers {
    pub system: ResourceParser<ComputerSystem, 5>,
    pub memory: ResourceParser<Memory, 5>,
    pub processor: ResourceParser<Processor, 5>,
    pub volume: ResourceParser<Volume, 6>,
    pub drive: ResourceParser<Drive, 6>,
    pub pcie_device: ResourceParser<PcieDevice, 5>,
    pub pcie_function: ResourceParser<PcieFunction, 6>,
    pub network_interface: ResourceParser<NetworkInterface, 5>,
    pub ethernet: EthernetParsers,
    pub log: LogParsers,
}

impl SystemParsers {
    pub fn register(registry: &mut DescriptorRegistry) -> Result<Self, ExporterError> {
        let s = Subsystem::System;
        Ok(Self {
            system: ResourceParser::register(registry, s, system_table())?,
            memory: ResourceParser::register(registry, s, memory_table())?,
            processor: ResourceParser::register(registry, s, processor_table())?,
            volume: ResourceParser::register(registry, s, volume_table())?,
            drive: ResourceParser::register(registry, s, drive_table())?,
            pcie_device: ResourceParser::register(registry, s, pcie_device_table())?,
            pcie_function: ResourceParser::register(registry, s, pcie_function_table())?,
            network_interface: ResourceParser::register(registry, s, network_interface_table())?,
            ethernet: EthernetParsers::register(registry, s)?,
            log: LogParsers::register(registry, s)?,
        })
    }
}

fn system_table() -> ResourceTable<ComputerSystem, 5> {
    ResourceTable {
        resource: "system",
        label_names: ["host", "resource", "name", "system_id", "hostname"],
        labels: |l: &LabelScope, s: &ComputerSystem| {
            [
                l.host(),
                l.resource(),
                s.name.clone(),
                s.id.clone(),
                s.host_name.clone(),
            ]
        },
        fields: vec![
            Field::coded("state", "system state", FieldKind::State, |s: &ComputerSystem| {
                s.status.state.as_deref()
            }),
            Field::coded("health", "system health", FieldKind::Health, |s: &ComputerSystem| {
                s.status.health.as_deref()
            }),
            Field::coded(
                "power_state",
                "system power state",
                FieldKind::PowerState,
                |s: &ComputerSystem| s.power_state.as_deref(),
            ),
            Field::coded(
                "total_memory_state",
                "system overall memory state",
                FieldKind::State,
                |s: &ComputerSystem| {
                    s.memory_summary
                        .as_ref()
                        .and_then(|m| m.status.state.as_deref())
                },
            ),
            Field::coded(
                "total_memory_health",
                "system overall memory health",
                FieldKind::Health,
                |s: &ComputerSystem| {
                    s.memory_summary
                        .as_ref()
                        .and_then(|m| m.status.health.as_deref())
                },
            ),
            Field::numeric(
                "total_memory_size",
                "system total memory size, GiB",
                |s: &ComputerSystem| {
                    s.memory_summary
                        .as_ref()
                        .and_then(|m| m.total_system_memory_gib)
                },
            ),
            Field::coded(
                "total_processor_state",
                "system overall processor state",
                FieldKind::State,
                |s: &ComputerSystem| {
                    s.processor_summary
                        .as_ref()
                        .and_then(|p| p.status.state.as_deref())
                },
            ),
            Field::coded(
                "total_processor_health",
                "system overall processor health",
                FieldKind::Health,
                |s: &ComputerSystem| {
                    s.processor_summary
                        .as_ref()
                        .and_then(|p| p.status.health.as_deref())
                },
            ),
            Field::numeric(
                "total_processor_count",
                "system total processor count",
                |s: &ComputerSystem| s.processor_summary.as_ref().and_then(|p| p.count),
            ),
        ],
    }
}

fn memory_table() -> ResourceTable<Memory, 5> {
    ResourceTable {
        resource: "memory",
        label_names: ["host", "resource", "system_id", "memory", "memory_id"],
        labels: |l: &LabelScope, m: &Memory| {
            [l.host(), l.resource(), l.parent(0), m.name.clone(), m.id.clone()]
        },
        fields: vec![
            Field::coded("memory_state", "system memory state", FieldKind::State, |m: &Memory| {
                m.status.state.as_deref()
            }),
            Field::coded(
                "memory_health",
                "system memory health",
                FieldKind::Health,
                |m: &Memory| m.status.health.as_deref(),
            ),
            Field::numeric(
                "memory_capacity_mib",
                "system memory capacity, MiB",
                |m: &Memory| m.capacity_mib,
            ),
        ],
    }
}

fn processor_table() -> ResourceTable<Processor, 5> {
    ResourceTable {
        resource: "processor",
        label_names: ["host", "resource", "system_id", "processor", "processor_id"],
        labels: |l: &LabelScope, p: &Processor| {
            [l.host(), l.resource(), l.parent(0), p.name.clone(), p.id.clone()]
        },
        fields: vec![
            Field::coded(
                "processor_state",
                "system processor state",
                FieldKind::State,
                |p: &Processor| p.status.state.as_deref(),
            ),
            Field::coded(
                "processor_health",
                "system processor health",
                FieldKind::Health,
                |p: &Processor| p.status.health.as_deref(),
            ),
            Field::numeric(
                "processor_total_threads",
                "system processor total threads",
                |p: &Processor| p.total_threads,
            ),
            Field::numeric(
                "processor_total_cores",
                "system processor total cores",
                |p: &Processor| p.total_cores,
            ),
        ],
    }
}

fn volume_table() -> ResourceTable<Volume, 6> {
    ResourceTable {
        resource: "storage_volume",
        label_names: ["host", "resource", "system_id", "storage_id", "volume", "volume_id"],
        labels: |l: &LabelScope, v: &Volume| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                l.parent(1),
                v.name.clone(),
                v.id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "storage_volume_state",
                "system storage volume state",
                FieldKind::State,
                |v: &Volume| v.status.state.as_deref(),
            ),
            Field::coded(
                "storage_volume_health",
                "system storage volume health",
                FieldKind::Health,
                |v: &Volume| v.status.health.as_deref(),
            ),
            Field::numeric(
                "storage_volume_capacity_bytes",
                "system storage volume capacity, Bytes",
                |v: &Volume| v.capacity_bytes,
            ),
        ],
    }
}

fn drive_table() -> ResourceTable<Drive, 6> {
    ResourceTable {
        resource: "storage_drive",
        label_names: ["host", "resource", "system_id", "storage_id", "drive", "drive_id"],
        labels: |l: &LabelScope, d: &Drive| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                l.parent(1),
                d.name.clone(),
                d.id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "storage_drive_state",
                "system storage drive state",
                FieldKind::State,
                |d: &Drive| d.status.state.as_deref(),
            ),
            Field::coded(
                "storage_drive_health",
                "system storage drive health",
                FieldKind::Health,
                |d: &Drive| d.status.health.as_deref(),
            ),
            Field::numeric(
                "storage_drive_capacity_bytes",
                "system storage drive capacity, Bytes",
                |d: &Drive| d.capacity_bytes,
            ),
        ],
    }
}

fn pcie_device_table() -> ResourceTable<PcieDevice, 5> {
    ResourceTable {
        resource: "pcie_device",
        label_names: ["host", "resource", "system_id", "pcie_device", "pcie_device_id"],
        labels: |l: &LabelScope, d: &PcieDevice| {
            [l.host(), l.resource(), l.parent(0), d.name.clone(), d.id.clone()]
        },
        fields: vec![
            Field::coded(
                "pcie_device_state",
                "system pcie device state",
                FieldKind::State,
                |d: &PcieDevice| d.status.state.as_deref(),
            ),
            Field::coded(
                "pcie_device_health",
                "system pcie device health",
                FieldKind::Health,
                |d: &PcieDevice| d.status.health.as_deref(),
            ),
        ],
    }
}

fn pcie_function_table() -> ResourceTable<PcieFunction, 6> {
    ResourceTable {
        resource: "pcie_function",
        label_names: [
            "host",
            "resource",
            "system_id",
            "pcie_device_id",
            "pcie_function",
            "pcie_function_id",
        ],
        labels: |l: &LabelScope, f: &PcieFunction| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                l.parent(1),
                f.name.clone(),
                f.id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "pcie_function_state",
                "system pcie function state",
                FieldKind::State,
                |f: &PcieFunction| f.status.state.as_deref(),
            ),
            Field::coded(
                "pcie_function_health",
                "system pcie function health",
                FieldKind::Health,
                |f: &PcieFunction| f.status.health.as_deref(),
            ),
        ],
    }
}

fn network_interface_table() -> ResourceTable<NetworkInterface, 5> {
    ResourceTable {
        resource: "network_interface",
        label_names: [
            "host",
            "resource",
            "system_id",
            "network_interface",
            "network_interface_id",
        ],
        labels: |l: &LabelScope, n: &NetworkInterface| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                n.name.clone(),
                n.id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "network_interface_state",
                "system network interface state",
                FieldKind::State,
                |n: &NetworkInterface| n.status.state.as_deref(),
            ),
            Field::coded(
                "network_interface_health",
                "system network interface health",
                FieldKind::Health,
                |n: &NetworkInterface| n.status.health.as_deref(),
            ),
        ],
    }
}
