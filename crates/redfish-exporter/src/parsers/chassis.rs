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

use super::{Field, LabelScope, LogParsers, ResourceParser, ResourceTable};
use crate::ExporterError;
use crate::normalize::FieldKind;
use crate::redfish::model::{
    Chassis, Fan, NetworkAdapter, NetworkPort, PowerControl, PowerSupply, Temperature, Thermal,
    Voltage,
};
use crate::registry::{DescriptorRegistry, Subsystem};

pub struct ChassisParsers {
    pub chassis: ResourceParser<Chassis, 4>,
    pub thermal: ResourceParser<Thermal, 3>,
    pub temperature: ResourceParser<Temperature, 5>,
    pub fan: ResourceParser<Fan, 5>,
    pub voltage: ResourceParser<Voltage, 5>,
    pub power_supply: ResourceParser<PowerSupply, 5>,
    pub power_control: ResourceParser<PowerControl, 5>,
    pub network_adapter: ResourceParser<NetworkAdapter, 5>,
    pub network_port: ResourceParser<NetworkPort, 6>,
    pub log: LogParsers,
}

impl ChassisParsers {
    pub fn register(registry: &mut DescriptorRegistry) -> Result<Self, ExporterError> {
        let s = Subsystem::Chassis;
        Ok(Self {
            chassis: ResourceParser::register(registry, s, chassis_table())?,
            thermal: ResourceParser::register(registry, s, thermal_table())?,
            temperature: ResourceParser::register(registry, s, temperature_table())?,
            fan: ResourceParser::register(registry, s, fan_table())?,
            voltage: ResourceParser::register(registry, s, voltage_table())?,
            power_supply: ResourceParser::register(registry, s, power_supply_table())?,
            power_control: ResourceParser::register(registry, s, power_control_table())?,
            network_adapter: ResourceParser::register(registry, s, network_adapter_table())?,
            network_port: ResourceParser::register(registry, s, network_port_table())?,
            log: LogParsers::register(registry, s)?,
        })
    }
}

fn chassis_table() -> ResourceTable<Chassis, 4> {
    ResourceTable {
        resource: "chassis",
        label_names: ["host", "resource", "name", "chassis_id"],
        labels: |l: &LabelScope, c: &Chassis| {
            [l.host(), l.resource(), c.name.clone(), c.id.clone()]
        },
        fields: vec![
            Field::coded("state", "state of chassis", FieldKind::State, |c: &Chassis| {
                c.status.state.as_deref()
            }),
            Field::coded("health", "health of chassis", FieldKind::Health, |c: &Chassis| {
                c.status.health.as_deref()
            }),
            Field::coded(
                "physical_security_intrusion_sensor",
                "physical security intrusion sensor of chassis",
                FieldKind::IntrusionSensor,
                |c: &Chassis| {
                    c.physical_security
                        .as_ref()
                        .and_then(|p| p.intrusion_sensor.as_deref())
                },
            ),
            Field::coded(
                "physical_security_rearm_method",
                "method of rearming the chassis intrusion sensor",
                FieldKind::IntrusionSensorReArm,
                |c: &Chassis| {
                    c.physical_security
                        .as_ref()
                        .and_then(|p| p.intrusion_sensor_re_arm.as_deref())
                },
            ),
        ],
    }
}

fn thermal_table() -> ResourceTable<Thermal, 3> {
    ResourceTable {
        resource: "thermal",
        label_names: ["host", "resource", "chassis_id"],
        labels: |l: &LabelScope, _: &Thermal| [l.host(), l.resource(), l.parent(0)],
        fields: vec![
            Field::coded(
                "thermal_state",
                "status state of thermal on this chassis component",
                FieldKind::State,
                |t: &Thermal| t.status.state.as_deref(),
            ),
            Field::coded(
                "thermal_health",
                "status health of thermal on this chassis component",
                FieldKind::Health,
                |t: &Thermal| t.status.health.as_deref(),
            ),
        ],
    }
}

fn temperature_table() -> ResourceTable<Temperature, 5> {
    ResourceTable {
        resource: "temperature",
        label_names: ["host", "resource", "chassis_id", "sensor", "sensor_id"],
        labels: |l: &LabelScope, t: &Temperature| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                t.name.clone(),
                t.member_id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "temperature_sensor_state",
                "status state of temperature on this chassis component",
                FieldKind::State,
                |t: &Temperature| t.status.state.as_deref(),
            ),
            Field::coded(
                "temperature_sensor_health",
                "status health of temperature on this chassis component",
                FieldKind::Health,
                |t: &Temperature| t.status.health.as_deref(),
            ),
            Field::numeric(
                "temperature_celsius",
                "celsius of temperature on this chassis component",
                |t: &Temperature| t.reading_celsius,
            ),
        ],
    }
}

fn fan_table() -> ResourceTable<Fan, 5> {
    ResourceTable {
        resource: "fan",
        label_names: ["host", "resource", "chassis_id", "fan", "fan_id"],
        labels: |l: &LabelScope, f: &Fan| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                f.display_name().to_string(),
                f.member_id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "fan_state",
                "fan state on this chassis component",
                FieldKind::State,
                |f: &Fan| f.status.state.as_deref(),
            ),
            Field::coded(
                "fan_health",
                "fan health on this chassis component",
                FieldKind::Health,
                |f: &Fan| f.status.health.as_deref(),
            ),
            Field::numeric("fan_rpm", "fan rpm on this chassis component", |f: &Fan| f.rpm()),
            Field::numeric(
                "fan_rpm_percentage",
                "fan speed as a percentage of maximum on this chassis component",
                |f: &Fan| f.percent(),
            ),
        ],
    }
}

fn voltage_table() -> ResourceTable<Voltage, 5> {
    ResourceTable {
        resource: "power_voltage",
        label_names: ["host", "resource", "chassis_id", "power_voltage", "power_voltage_id"],
        labels: |l: &LabelScope, v: &Voltage| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                v.name.clone(),
                v.member_id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "power_voltage_state",
                "power voltage state of chassis component",
                FieldKind::State,
                |v: &Voltage| v.status.state.as_deref(),
            ),
            Field::numeric(
                "power_voltage_volts",
                "power voltage volts number of chassis component",
                |v: &Voltage| v.reading_volts,
            ),
        ],
    }
}

fn power_supply_table() -> ResourceTable<PowerSupply, 5> {
    ResourceTable {
        resource: "power_supply",
        label_names: ["host", "resource", "chassis_id", "power_supply", "power_supply_id"],
        labels: |l: &LabelScope, p: &PowerSupply| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                p.name.clone(),
                p.member_id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "power_powersupply_state",
                "powersupply state of chassis component",
                FieldKind::State,
                |p: &PowerSupply| p.status.state.as_deref(),
            ),
            Field::coded(
                "power_powersupply_health",
                "powersupply health of chassis component",
                FieldKind::Health,
                |p: &PowerSupply| p.status.health.as_deref(),
            ),
            Field::numeric(
                "power_powersupply_last_power_output_watts",
                "last_power_output_watts of powersupply on this chassis",
                |p: &PowerSupply| p.last_power_output_watts,
            ),
            Field::numeric(
                "power_powersupply_power_capacity_watts",
                "power_capacity_watts of powersupply on this chassis",
                |p: &PowerSupply| p.power_capacity_watts,
            ),
            Field::numeric(
                "power_powersupply_power_input_watts",
                "power_input_watts of powersupply on this chassis",
                |p: &PowerSupply| p.power_input_watts,
            ),
            Field::numeric(
                "power_powersupply_power_output_watts",
                "power_output_watts of powersupply on this chassis",
                |p: &PowerSupply| p.power_output_watts,
            ),
        ],
    }
}

fn power_control_table() -> ResourceTable<PowerControl, 5> {
    ResourceTable {
        resource: "power_control",
        label_names: ["host", "resource", "chassis_id", "power_control", "power_control_id"],
        labels: |l: &LabelScope, p: &PowerControl| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                p.name.clone(),
                p.member_id.clone(),
            ]
        },
        fields: vec![
            Field::numeric(
                "power_control_consumed_watts",
                "power consumed watts of chassis component",
                |p: &PowerControl| p.power_consumed_watts,
            ),
            Field::numeric(
                "power_control_average_consumed_watts",
                "average power consumed watts over the reporting interval",
                |p: &PowerControl| p.power_metrics.as_ref().and_then(|m| m.average_consumed_watts),
            ),
        ],
    }
}

fn network_adapter_table() -> ResourceTable<NetworkAdapter, 5> {
    ResourceTable {
        resource: "network_adapter",
        label_names: ["host", "resource", "chassis_id", "network_adapter", "network_adapter_id"],
        labels: |l: &LabelScope, a: &NetworkAdapter| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                a.name.clone(),
                a.id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "network_adapter_state",
                "chassis network adapter state",
                FieldKind::State,
                |a: &NetworkAdapter| a.status.state.as_deref(),
            ),
            Field::coded(
                "network_adapter_health",
                "chassis network adapter health",
                FieldKind::Health,
                |a: &NetworkAdapter| a.status.health.as_deref(),
            ),
        ],
    }
}

fn network_port_table() -> ResourceTable<NetworkPort, 6> {
    ResourceTable {
        resource: "network_port",
        label_names: [
            "host",
            "resource",
            "chassis_id",
            "network_adapter_id",
            "network_port",
            "network_port_id",
        ],
        labels: |l: &LabelScope, p: &NetworkPort| {
            [
                l.host(),
                l.resource(),
                l.parent(0),
                l.parent(1),
                p.name.clone(),
                p.id.clone(),
            ]
        },
        fields: vec![
            Field::coded(
                "network_port_state",
                "chassis network port state",
                FieldKind::State,
                |p: &NetworkPort| p.status.state.as_deref(),
            ),
            Field::coded(
                "network_port_health",
                "chassis network port health",
                FieldKind::Health,
                |p: &NetworkPort| p.status.health.as_deref(),
            ),
            Field::coded(
                "network_port_link_state",
                "chassis network port link state",
                FieldKind::PortLinkState,
                |p: &NetworkPort| p.link_status.as_deref(),
            ),
            Field::numeric(
                "network_port_speed_mbps",
                "chassis network port current link speed in Mbps",
                |p: &NetworkPort| p.current_link_speed_mbps,
            ),
        ],
    }
}
