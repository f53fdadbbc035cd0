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

use std::time::Duration;

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounterVec, Opts, Registry, TextEncoder};

use crate::ExporterError;
use crate::scrape::ScrapeOutcome;

/// The exporter's own metrics, served on `/metrics`. Scrape results for
/// targets never land here; each scrape builds its own registry.
pub struct MetricsManager {
    global_registry: Registry,
    scrapes: IntCounterVec,
    rejected: IntCounterVec,
    request_duration: Histogram,
}

impl MetricsManager {
    pub fn new(prefix: &str) -> Result<Self, ExporterError> {
        let global_registry = Registry::new();

        let scrapes = IntCounterVec::new(
            Opts::new(
                format!("{prefix}_exporter_scrapes_total"),
                "Number of target scrapes by outcome",
            ),
            &["outcome"],
        )?;
        global_registry.register(Box::new(scrapes.clone()))?;

        let rejected = IntCounterVec::new(
            Opts::new(
                format!("{prefix}_exporter_rejected_requests_total"),
                "Number of scrape requests rejected before contacting the target",
            ),
            &["reason"],
        )?;
        global_registry.register(Box::new(rejected.clone()))?;

        let request_duration = Histogram::with_opts(
            HistogramOpts::new(
                format!("{prefix}_exporter_scrape_request_duration_seconds"),
                "Time spent serving one scrape request",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0]),
        )?;
        global_registry.register(Box::new(request_duration.clone()))?;

        Ok(Self {
            global_registry,
            scrapes,
            rejected,
            request_duration,
        })
    }

    pub fn observe_scrape(&self, outcome: ScrapeOutcome, elapsed: Duration) {
        self.scrapes.with_label_values(&[outcome.as_str()]).inc();
        self.request_duration.observe(elapsed.as_secs_f64());
    }

    pub fn rejected(&self, reason: &str) {
        self.rejected.with_label_values(&[reason]).inc();
    }

    pub fn encode(&self) -> Result<String, ExporterError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.global_registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| ExporterError::GenericError(e.to_string()))
    }
}
