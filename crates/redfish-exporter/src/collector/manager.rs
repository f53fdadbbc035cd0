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
    ScrapeContext, SubsystemCollector, collect_ethernet_interfaces, collect_log_services,
    root_link,
};
use crate::ExporterError;
use crate::config::SubsystemConfig;
use crate::redfish::model::Manager;
use crate::registry::Subsystem;

pub struct ManagerCollector {
    config: SubsystemConfig,
}

impl ManagerCollector {
    pub fn new(config: SubsystemConfig) -> Self {
        Self { config }
    }

    async fn collect_manager(&self, ctx: &ScrapeContext<'_>, manager: &Manager) {
        let parsers = &ctx.catalog.manager;
        parsers.manager.parse(&ctx.root(), manager, &ctx.sink);

        let lineage = ctx.root().child(&manager.id);
        futures::join!(
            collect_ethernet_interfaces(
                ctx,
                &parsers.ethernet,
                manager.ethernet_interfaces.as_ref(),
                &lineage,
            ),
            collect_log_services(
                ctx,
                &parsers.log,
                &self.config,
                manager.log_services.as_ref(),
                &lineage,
            ),
        );
    }
}

impl SubsystemCollector for ManagerCollector {
    fn subsystem(&self) -> Subsystem {
        Subsystem::Manager
    }

    fn collect<'a>(&'a self, ctx: &'a ScrapeContext<'a>) -> BoxFuture<'a, Result<(), ExporterError>> {
        async move {
            let link = root_link(ctx, Subsystem::Manager, ctx.session.service_root().managers.as_ref())?;
            let managers = ctx.members::<Manager>(&link, "managers").await?;
            tracing::debug!(host = %ctx.host, count = managers.len(), "Collecting managers");

            join_all(managers.iter().map(|m| self.collect_manager(ctx, m))).await;
            ctx.mark_scraped(Subsystem::Manager);
            Ok(())
        }
        .boxed()
    }
}
