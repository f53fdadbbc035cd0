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

use futures::FutureExt;
use futures::future::{BoxFuture, join_all};

use super::{ResultExt, ScrapeContext, SubsystemCollector, collect_log_services, root_link};
use crate::ExporterError;
use crate::config::SubsystemConfig;
use crate::parsers::Lineage;
use crate::redfish::model::{Chassis, NetworkAdapter, NetworkPort, Power, Thermal};
use crate::registry::Subsystem;

pub struct ChassisCollector {
    config: SubsystemConfig,
}

impl ChassisCollector {
    pub fn new(config: SubsystemConfig) -> Self {
        Self { config }
    }

    async fn collect_chassis(&self, ctx: &ScrapeContext<'_>, chassis: &Chassis) {
        let parsers = &ctx.catalog.chassis;
        parsers.chassis.parse(&ctx.root(), chassis, &ctx.sink);

        let lineage = ctx.root().child(&chassis.id);
        futures::join!(
            self.collect_thermal(ctx, chassis, &lineage),
            self.collect_power(ctx, chassis, &lineage),
            self.collect_network_adapters(ctx, chassis, &lineage),
            collect_log_services(
                ctx,
                &parsers.log,
                &self.config,
                chassis.log_services.as_ref(),
                &lineage,
            ),
        );
    }

    async fn collect_thermal(&self, ctx: &ScrapeContext<'_>, chassis: &Chassis, lineage: &Lineage) {
        let Some(link) = &chassis.thermal else {
            return;
        };
        let Some(thermal) = ctx
            .fetch::<Thermal>(link)
            .await
            .log_and_ok("Failed to get thermal data", &ctx.host, &chassis.id)
        else {
            return;
        };

        let parsers = &ctx.catalog.chassis;
        parsers.thermal.parse(lineage, &thermal, &ctx.sink);
        for temperature in &thermal.temperatures {
            parsers.temperature.parse(lineage, temperature, &ctx.sink);
        }
        for fan in &thermal.fans {
            parsers.fan.parse(lineage, fan, &ctx.sink);
        }
    }

    async fn collect_power(&self, ctx: &ScrapeContext<'_>, chassis: &Chassis, lineage: &Lineage) {
        let Some(link) = &chassis.power else {
            return;
        };
        let Some(power) = ctx
            .fetch::<Power>(link)
            .await
            .log_and_ok("Failed to get power data", &ctx.host, &chassis.id)
        else {
            return;
        };

        let parsers = &ctx.catalog.chassis;
        for voltage in &power.voltages {
            parsers.voltage.parse(lineage, voltage, &ctx.sink);
        }
        for supply in &power.power_supplies {
            parsers.power_supply.parse(lineage, supply, &ctx.sink);
        }
        for control in &power.power_control {
            parsers.power_control.parse(lineage, control, &ctx.sink);
        }
    }

    async fn collect_network_adapters(
        &self,
        ctx: &ScrapeContext<'_>,
        chassis: &Chassis,
        lineage: &Lineage,
    ) {
        let Some(link) = &chassis.network_adapters else {
            return;
        };
        let Some(adapters) = ctx
            .members::<NetworkAdapter>(link, "network adapters")
            .await
            .log_and_ok("Failed to get network adapters", &ctx.host, &chassis.id)
        else {
            return;
        };

        let parsers = &ctx.catalog.chassis;
        join_all(adapters.iter().map(|adapter| async move {
            parsers.network_adapter.parse(lineage, adapter, &ctx.sink);
            let Some(ports_link) = &adapter.network_ports else {
                return;
            };
            let adapter_lineage = lineage.child(&adapter.id);
            if let Some(ports) = ctx
                .members::<NetworkPort>(ports_link, "network ports")
                .await
                .log_and_ok("Failed to get network ports", &ctx.host, &adapter.id)
            {
                for port in &ports {
                    parsers.network_port.parse(&adapter_lineage, port, &ctx.sink);
                }
            }
        }))
        .await;
    }
}

impl SubsystemCollector for ChassisCollector {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Chassis
    }

    fn collect<'a>(&'a self, ctx: &'a ScrapeContext<'a>) -> BoxFuture<'a, Result<(), ExporterError>> {
        async move {
            let link = root_link(ctx, Subsystem::Chassis, ctx.session.service_root().chassis.as_ref())?;
            let chassis = ctx.members::<Chassis>(&link, "chassis").await?;
            tracing::debug!(host = %ctx.host, count = chassis.len(), "Collecting chassis");

            join_all(chassis.iter().map(|c| self.collect_chassis(ctx, c))).await;
            ctx.mark_scraped(Subsystem::Chassis);
            Ok(())
        }
        .boxed()
    }
}
