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

use super::{
    ResultExt, ScrapeContext, SubsystemCollector, collect_ethernet_interfaces,
    collect_log_services, root_link,
};
use crate::ExporterError;
use crate::config::SubsystemConfig;
use crate::parsers::Lineage;
use crate::redfish::model::{
    ComputerSystem, Drive, Memory, NetworkInterface, PcieDevice, PcieFunction, Processor, Storage,
    Volume,
};
use crate::registry::Subsystem;

pub struct SystemCollector {
    config: SubsystemConfig,
}

impl SystemCollector {
    pub fn new(config: SubsystemConfig) -> Self {
        Self { config }
    }

    async fn collect_system(&self, ctx: &ScrapeContext<'_>, system: &ComputerSystem) {
        let parsers = &ctx.catalog.system;
        parsers.system.parse(&ctx.root(), system, &ctx.sink);

        let lineage = ctx.root().child(&system.id);
        futures::join!(
            self.collect_memory(ctx, system, &lineage),
            self.collect_processors(ctx, system, &lineage),
            self.collect_storage(ctx, system, &lineage),
            self.collect_pcie_devices(ctx, system, &lineage),
            self.collect_network_interfaces(ctx, system, &lineage),
            collect_ethernet_interfaces(
                ctx,
                &parsers.ethernet,
                system.ethernet_interfaces.as_ref(),
                &lineage,
            ),
            collect_log_services(
                ctx,
                &parsers.log,
                &self.config,
                system.log_services.as_ref(),
                &lineage,
            ),
        );
    }

    async fn collect_memory(&self, ctx: &ScrapeContext<'_>, system: &ComputerSystem, lineage: &Lineage) {
        let Some(link) = &system.memory else {
            return;
        };
        if let Some(modules) = ctx
            .members::<Memory>(link, "memory")
            .await
            .log_and_ok("Failed to get memory", &ctx.host, &system.id)
        {
            for module in &modules {
                ctx.catalog.system.memory.parse(lineage, module, &ctx.sink);
            }
        }
    }

    async fn collect_processors(
        &self,
        ctx: &ScrapeContext<'_>,
        system: &ComputerSystem,
        lineage: &Lineage,
    ) {
        let Some(link) = &system.processors else {
            return;
        };
        if let Some(processors) = ctx
            .members::<Processor>(link, "processors")
            .await
            .log_and_ok("Failed to get processors", &ctx.host, &system.id)
        {
            for processor in &processors {
                ctx.catalog.system.processor.parse(lineage, processor, &ctx.sink);
            }
        }
    }

    async fn collect_storage(&self, ctx: &ScrapeContext<'_>, system: &ComputerSystem, lineage: &Lineage) {
        let Some(link) = &system.storage else {
            return;
        };
        let Some(storages) = ctx
            .members::<Storage>(link, "storage")
            .await
            .log_and_ok("Failed to get storage", &ctx.host, &system.id)
        else {
            return;
        };

        let parsers = &ctx.catalog.system;
        join_all(storages.iter().map(|storage| async move {
            let storage_lineage = lineage.child(&storage.id);
            let volumes = async {
                let Some(volumes_link) = &storage.volumes else {
                    return;
                };
                if let Some(volumes) = ctx
                    .members::<Volume>(volumes_link, "volumes")
                    .await
                    .log_and_ok("Failed to get volumes", &ctx.host, &storage.id)
                {
                    for volume in &volumes {
                        parsers.volume.parse(&storage_lineage, volume, &ctx.sink);
                    }
                }
            };
            let drives = async {
                let drives = ctx.resolve::<Drive>(&storage.drives, "drives").await;
                for drive in &drives {
                    parsers.drive.parse(&storage_lineage, drive, &ctx.sink);
                }
            };
            futures::join!(volumes, drives);
        }))
        .await;
    }

    async fn collect_pcie_devices(
        &self,
        ctx: &ScrapeContext<'_>,
        system: &ComputerSystem,
        lineage: &Lineage,
    ) {
        let parsers = &ctx.catalog.system;
        let devices = ctx
            .resolve::<PcieDevice>(&system.pcie_devices, "pcie devices")
            .await;

        join_all(devices.iter().map(|device| async move {
            parsers.pcie_device.parse(lineage, device, &ctx.sink);
            let functions = match &device.pcie_functions {
                Some(link) => ctx
                    .members::<PcieFunction>(link, "pcie functions")
                    .await
                    .log_and_ok("Failed to get pcie functions", &ctx.host, &device.id)
                    .unwrap_or_default(),
                None => {
                    ctx.resolve::<PcieFunction>(&device.function_links(), "pcie functions")
                        .await
                }
            };
            let device_lineage = lineage.child(&device.id);
            for function in &functions {
                parsers.pcie_function.parse(&device_lineage, function, &ctx.sink);
            }
        }))
        .await;
    }

    async fn collect_network_interfaces(
        &self,
        ctx: &ScrapeContext<'_>,
        system: &ComputerSystem,
        lineage: &Lineage,
    ) {
        let Some(link) = &system.network_interfaces else {
            return;
        };
        if let Some(interfaces) = ctx
            .members::<NetworkInterface>(link, "network interfaces")
            .await
            .log_and_ok("Failed to get network interfaces", &ctx.host, &system.id)
        {
            for interface in &interfaces {
                ctx.catalog
                    .system
                    .network_interface
                    .parse(lineage, interface, &ctx.sink);
            }
        }
    }
}

impl SubsystemCollector for SystemCollector {
    fn subsystem(&self) -> Subsystem {
        Subsystem::System
    }

    fn collect<'a>(&'a self, ctx: &'a ScrapeContext<'a>) -> BoxFuture<'a, Result<(), ExporterError>> {
        async move {
            let link = root_link(ctx, Subsystem::System, ctx.session.service_root().systems.as_ref())?;
            let systems = ctx.members::<ComputerSystem>(&link, "systems").await?;
            tracing::debug!(host = %ctx.host, count = systems.len(), "Collecting systems");

            join_all(systems.iter().map(|s| self.collect_system(ctx, s))).await;
            ctx.mark_scraped(Subsystem::System);
            Ok(())
        }
        .boxed()
    }
}
