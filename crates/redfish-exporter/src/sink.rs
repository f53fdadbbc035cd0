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

use std::collections::{HashMap, HashSet};
use std::hash::{DefaultHasher, Hash, Hasher};

use prometheus::proto::MetricFamily;
use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tokio::sync::mpsc;

use crate::ExporterError;
use crate::registry::{Descriptor, LabeledKey, MetricKey};

#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub key: MetricKey,
    pub value: f64,
    pub labels: Vec<String>,
}

/// Write side of the per-scrape output stream. Cloned into every branch of
/// the walk; the receiving half is drained once the walk has joined.
#[derive(Debug, Clone)]
pub struct SampleSink {
    tx: mpsc::UnboundedSender<Sample>,
}

impl SampleSink {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Sample>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn emit<const N: usize>(&self, key: LabeledKey<N>, value: f64, labels: [String; N]) {
        let sample = Sample {
            key: key.key(),
            value,
            labels: labels.into(),
        };
        if self.tx.send(sample).is_err() {
            tracing::trace!("sample receiver dropped before emission");
        }
    }
}

/// One scrape's worth of gauges, materialised from the descriptor registry.
pub struct Exposition {
    registry: Registry,
    gauges: HashMap<MetricKey, GaugeVec>,
    seen: HashSet<(MetricKey, u64)>,
}

impl Exposition {
    /// Registers a gauge family for every given descriptor before any value
    /// exists. Samples of other descriptors are rejected.
    pub fn describe<'d>(
        descriptors: impl IntoIterator<Item = &'d Descriptor>,
    ) -> Result<Self, ExporterError> {
        let registry = Registry::new();
        let mut gauges = HashMap::new();
        for descriptor in descriptors {
            let gauge = GaugeVec::new(
                Opts::new(descriptor.fq_name.clone(), descriptor.help.clone()),
                &descriptor.label_names,
            )?;
            registry.register(Box::new(gauge.clone()))?;
            gauges.insert(descriptor.key, gauge);
        }
        Ok(Self {
            registry,
            gauges,
            seen: HashSet::new(),
        })
    }

    pub fn record(&mut self, sample: Sample) -> Result<(), ExporterError> {
        let gauge = self.gauges.get(&sample.key).ok_or_else(|| {
            ExporterError::GenericError(format!("unknown metric key {:?}", sample.key))
        })?;
        let values: Vec<&str> = sample.labels.iter().map(String::as_str).collect();
        gauge.get_metric_with_label_values(&values)?.set(sample.value);

        let mut hasher = DefaultHasher::new();
        sample.labels.hash(&mut hasher);
        if !self.seen.insert((sample.key, hasher.finish())) {
            tracing::debug!(key = ?sample.key, "duplicate sample within one scrape, keeping last value");
        }
        Ok(())
    }

    /// Records everything currently buffered in the stream.
    pub fn drain(&mut self, rx: &mut mpsc::UnboundedReceiver<Sample>) -> usize {
        let mut recorded = 0;
        while let Ok(sample) = rx.try_recv() {
            match self.record(sample) {
                Ok(()) => recorded += 1,
                Err(e) => tracing::warn!(error = ?e, "Dropping sample"),
            }
        }
        recorded
    }

    pub fn gather(&self) -> Vec<MetricFamily> {
        self.registry.gather()
    }

    pub fn encode(&self) -> Result<String, ExporterError> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| ExporterError::GenericError(e.to_string()))
    }
}
