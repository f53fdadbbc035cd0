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

use std::collections::HashMap;

use crate::ExporterError;

/// Metric namespace segment owning a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subsystem {
    /// Namespace-only metrics such as `up`.
    Root,
    Exporter,
    Chassis,
    System,
    Manager,
}

impl Subsystem {
    pub const COLLECTED: [Subsystem; 3] = [Subsystem::Chassis, Subsystem::System, Subsystem::Manager];

    pub fn as_str(self) -> &'static str {
        match self {
            Subsystem::Root => "",
            Subsystem::Exporter => "exporter",
            Subsystem::Chassis => "chassis",
            Subsystem::System => "system",
            Subsystem::Manager => "manager",
        }
    }

    /// Label carrying the identifier of this subsystem's top-level resource.
    pub fn id_label(self) -> &'static str {
        match self {
            Subsystem::Chassis => "chassis_id",
            Subsystem::System => "system_id",
            Subsystem::Manager => "manager_id",
            Subsystem::Root | Subsystem::Exporter => "id",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetricKey(usize);

/// A registry key whose label arity is part of its type, so a sample can only
/// be emitted with exactly as many label values as its descriptor declares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabeledKey<const N: usize>(MetricKey);

impl<const N: usize> LabeledKey<N> {
    pub fn key(self) -> MetricKey {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    pub key: MetricKey,
    pub subsystem: Subsystem,
    pub field: &'static str,
    pub fq_name: String,
    pub help: String,
    pub label_names: Vec<&'static str>,
}

/// Immutable once construction finishes; shared behind an `Arc` by every scrape.
#[derive(Debug)]
pub struct DescriptorRegistry {
    namespace: String,
    descriptors: Vec<Descriptor>,
    by_name: HashMap<String, MetricKey>,
}

impl DescriptorRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            descriptors: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn register<const N: usize>(
        &mut self,
        subsystem: Subsystem,
        field: &'static str,
        help: impl Into<String>,
        label_names: [&'static str; N],
    ) -> Result<LabeledKey<N>, ExporterError> {
        let fq_name = build_fq_name(&self.namespace, subsystem.as_str(), field);
        if self.by_name.contains_key(&fq_name) {
            return Err(ExporterError::DuplicateMetric(fq_name));
        }

        let key = MetricKey(self.descriptors.len());
        self.by_name.insert(fq_name.clone(), key);
        self.descriptors.push(Descriptor {
            key,
            subsystem,
            field,
            fq_name,
            help: help.into(),
            label_names: label_names.to_vec(),
        });
        Ok(LabeledKey(key))
    }

    pub fn lookup(&self, key: MetricKey) -> Option<&Descriptor> {
        self.descriptors.get(key.0)
    }

    pub fn find(&self, fq_name: &str) -> Option<&Descriptor> {
        self.by_name.get(fq_name).and_then(|key| self.lookup(*key))
    }

    /// All descriptors in registration order, indexed by `MetricKey`.
    pub fn descriptors(&self) -> &[Descriptor] {
        &self.descriptors
    }

    pub fn for_subsystem(&self, subsystem: Subsystem) -> impl Iterator<Item = &Descriptor> {
        self.descriptors
            .iter()
            .filter(move |d| d.subsystem == subsystem)
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

fn build_fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("_")
}
