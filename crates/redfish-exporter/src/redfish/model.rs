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

//! Subset of the Redfish schema read by the collectors.
//!
//! Vendors omit fields or send `null` liberally, so every struct defaults and
//! strings and lists go through [`nullable`].

use serde::{Deserialize, Deserializer};

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ODataLink {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

impl ODataLink {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            odata_id: path.into(),
        }
    }
}

/// Members are either bare links or, in expanded collections, full resources.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Collection {
    #[serde(deserialize_with = "nullable")]
    pub members: Vec<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Status {
    pub state: Option<String>,
    pub health: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServiceRoot {
    pub chassis: Option<ODataLink>,
    pub systems: Option<ODataLink>,
    pub managers: Option<ODataLink>,
    pub links: Option<ServiceRootLinks>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ServiceRootLinks {
    pub sessions: Option<ODataLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Chassis {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
    pub physical_security: Option<PhysicalSecurity>,
    pub thermal: Option<ODataLink>,
    pub power: Option<ODataLink>,
    pub network_adapters: Option<ODataLink>,
    pub log_services: Option<ODataLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PhysicalSecurity {
    pub intrusion_sensor: Option<String>,
    pub intrusion_sensor_re_arm: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Thermal {
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
    #[serde(deserialize_with = "nullable")]
    pub temperatures: Vec<Temperature>,
    #[serde(deserialize_with = "nullable")]
    pub fans: Vec<Fan>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Temperature {
    #[serde(deserialize_with = "nullable")]
    pub member_id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub reading_celsius: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Fan {
    #[serde(deserialize_with = "nullable")]
    pub member_id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    /// Pre-2016 schemas name fans here instead of `Name`.
    pub fan_name: Option<String>,
    pub reading: Option<f64>,
    pub reading_units: Option<String>,
    #[serde(rename = "ReadingRPM")]
    pub reading_rpm: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

impl Fan {
    pub fn display_name(&self) -> &str {
        match self.fan_name.as_deref() {
            Some(name) if self.name.is_empty() => name,
            _ => &self.name,
        }
    }

    pub fn rpm(&self) -> Option<f64> {
        match self.reading_units.as_deref() {
            Some("RPM") => self.reading.or(self.reading_rpm),
            Some("Percent") => self.reading_rpm,
            _ => self.reading_rpm.or(self.reading),
        }
    }

    pub fn percent(&self) -> Option<f64> {
        match self.reading_units.as_deref() {
            Some("Percent") => self.reading,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Power {
    #[serde(deserialize_with = "nullable")]
    pub voltages: Vec<Voltage>,
    #[serde(deserialize_with = "nullable")]
    pub power_supplies: Vec<PowerSupply>,
    #[serde(deserialize_with = "nullable")]
    pub power_control: Vec<PowerControl>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Voltage {
    #[serde(deserialize_with = "nullable")]
    pub member_id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub reading_volts: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PowerSupply {
    #[serde(deserialize_with = "nullable")]
    pub member_id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub last_power_output_watts: Option<f64>,
    pub power_capacity_watts: Option<f64>,
    pub power_input_watts: Option<f64>,
    pub power_output_watts: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PowerControl {
    #[serde(deserialize_with = "nullable")]
    pub member_id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub power_consumed_watts: Option<f64>,
    pub power_metrics: Option<PowerMetrics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PowerMetrics {
    pub average_consumed_watts: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NetworkAdapter {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
    pub network_ports: Option<ODataLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NetworkPort {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
    pub link_status: Option<String>,
    pub current_link_speed_mbps: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ComputerSystem {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub host_name: String,
    pub power_state: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
    pub processor_summary: Option<ProcessorSummary>,
    pub memory_summary: Option<MemorySummary>,
    pub memory: Option<ODataLink>,
    pub processors: Option<ODataLink>,
    pub storage: Option<ODataLink>,
    #[serde(rename = "PCIeDevices", deserialize_with = "nullable")]
    pub pcie_devices: Vec<ODataLink>,
    pub network_interfaces: Option<ODataLink>,
    pub ethernet_interfaces: Option<ODataLink>,
    pub log_services: Option<ODataLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct ProcessorSummary {
    pub count: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct MemorySummary {
    #[serde(rename = "TotalSystemMemoryGiB")]
    pub total_system_memory_gib: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Memory {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(rename = "CapacityMiB")]
    pub capacity_mib: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Processor {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub total_cores: Option<f64>,
    pub total_threads: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Storage {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub drives: Vec<ODataLink>,
    pub volumes: Option<ODataLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Volume {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub capacity_bytes: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Drive {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub capacity_bytes: Option<f64>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PcieDevice {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
    #[serde(rename = "PCIeFunctions")]
    pub pcie_functions: Option<ODataLink>,
    pub links: Option<PcieDeviceLinks>,
}

impl PcieDevice {
    /// Functions are either a collection link (1.4+) or inline links.
    pub fn function_links(&self) -> Vec<ODataLink> {
        self.links
            .as_ref()
            .map(|links| links.pcie_functions.clone())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PcieDeviceLinks {
    #[serde(rename = "PCIeFunctions", deserialize_with = "nullable")]
    pub pcie_functions: Vec<ODataLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct PcieFunction {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct NetworkInterface {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct EthernetInterface {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
    pub link_status: Option<String>,
    pub interface_enabled: Option<bool>,
    pub speed_mbps: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Manager {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub model: String,
    #[serde(deserialize_with = "nullable")]
    pub manager_type: String,
    pub power_state: Option<String>,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
    pub ethernet_interfaces: Option<ODataLink>,
    pub log_services: Option<ODataLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LogService {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    pub service_enabled: Option<bool>,
    #[serde(
        rename = "OverWritePolicy",
        alias = "OverwritePolicy",
        deserialize_with = "nullable"
    )]
    pub overwrite_policy: String,
    #[serde(deserialize_with = "nullable")]
    pub status: Status,
    pub entries: Option<ODataLink>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct LogEntry {
    #[serde(deserialize_with = "nullable")]
    pub id: String,
    #[serde(deserialize_with = "nullable")]
    pub name: String,
    #[serde(deserialize_with = "nullable")]
    pub entry_code: String,
    #[serde(deserialize_with = "nullable")]
    pub entry_type: String,
    #[serde(deserialize_with = "nullable")]
    pub message_id: String,
    pub sensor_number: Option<i64>,
    #[serde(deserialize_with = "nullable")]
    pub sensor_type: String,
    pub severity: Option<String>,
}
