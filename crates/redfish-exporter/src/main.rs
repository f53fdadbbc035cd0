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

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use redfish_exporter::Config;
use tracing_subscriber::filter::{EnvFilter, LevelFilter};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, registry};

#[derive(Parser, Debug)]
#[clap(name = "redfish-exporter")]
struct Args {
    #[clap(long, env = "REDFISH_EXPORTER_CONFIG")]
    #[clap(help = "Configuration file, TOML or YAML by extension")]
    config: Option<PathBuf>,

    #[clap(long, help = "Listen address, overrides metrics.endpoint")]
    listen: Option<String>,

    #[clap(long, default_value = "info", help = "Default log filter, RUST_LOG takes precedence")]
    log_level: LevelFilter,
}

fn init_log(level: LevelFilter) -> Result<(), Box<dyn Error>> {
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
        .add_directive("rustls=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("hyper_util=warn".parse()?)
        .add_directive("h2=warn".parse()?);

    registry()
        .with(fmt::Layer::default().compact().with_writer(std::io::stdout))
        .with(env_filter)
        .try_init()?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_log(args.log_level)?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(listen) = args.listen {
        config.metrics.endpoint = listen;
        config.validate()?;
    }
    tracing::info!(
        endpoint = %config.metrics.endpoint,
        auth = ?config.client.auth,
        hosts = config.hosts.len(),
        groups = config.groups.len(),
        "Starting redfish exporter"
    );

    redfish_exporter::run_service(config, args.config).await?;
    Ok(())
}
