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
use crate::redfish::model::Manager;
use crate::registry::{DescriptorRegistry, Subsystem};

pub struct ManagerParsers {
    pub manager: ResourceParser<Manager, 6>,
    pub ethernet: EthernetParsers,
    pub log: LogParsers,
}

impl ManagerParsers {
    pub fn register(registry: &mut DescriptorRegistry) -> Result<Self, ExporterError> {
        let s = Subsystem::Manager;
        Ok(Self {
            manager: ResourceParser::register(registry, s, manager_table())?,
            ethernet: EthernetParsers::register(registry, s)?,
            log: LogParsers::register(registry, s)?,
        })
    }
}

fn manager_table() -> ResourceTable<Manager, 6> {
    ResourceTable {
        resource: "manager",
        label_names: ["host", "resource", "name", "manager_id", "model", "type"],
        labels: |l: &LabelScope, m: &Manager| {
            [
                l.host(),
                l.resource(),
                m.name.clone(),
                m.id.clone(),
                m.model.clone(),
                m.manager_type.clone(),
            ]
        },
        fields: vec![
            Field::coded("state", "manager state", FieldKind::State, |m: &Manager| {
                m.status.state.as_deref()
            }),
            Field::coded("health", "manager health", FieldKind::Health, |m: &Manager| {
                m.status.health.as_deref()
            }),
            Field::coded(
                "power_state",
                "manager power state",
                FieldKind::PowerState,
                |m: &Manager| m.power_state.as_deref(),
            ),
        ],
    }
}
