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

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::ExporterError;

/// Key of the fallback entry in the `hosts` table.
pub const DEFAULT_HOST: &str = "default";

#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

/// Debug structure omits the password
impl Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish()
    }
}

/// Maps a scrape target (and optional group) to the credentials used to log in.
#[derive(Debug, Default)]
pub struct CredentialResolver {
    exact: HashMap<String, Credentials>,
    patterns: Vec<(Regex, Credentials)>,
    default: Option<Credentials>,
    groups: HashMap<String, Credentials>,
}

impl CredentialResolver {
    pub fn new(
        hosts: &BTreeMap<String, Credentials>,
        groups: &BTreeMap<String, Credentials>,
    ) -> Result<Self, ExporterError> {
        let mut exact = HashMap::new();
        let mut patterns = Vec::new();
        for (key, credentials) in hosts.iter().filter(|(k, _)| k.as_str() != DEFAULT_HOST) {
            if !is_pattern(key) {
                exact.insert(key.clone(), credentials.clone());
                continue;
            }
            let regex = Regex::new(key).map_err(|e| {
                ExporterError::Config(format!("invalid host pattern {key:?}: {e}"))
            })?;
            patterns.push((regex, credentials.clone()));
        }

        Ok(Self {
            exact,
            patterns,
            default: hosts.get(DEFAULT_HOST).cloned(),
            groups: groups.clone().into_iter().collect(),
        })
    }

    pub fn credentials_for(
        &self,
        target: &str,
        group: Option<&str>,
    ) -> Result<Credentials, ExporterError> {
        if let Some(group) = group.filter(|g| !g.is_empty()) {
            return self
                .groups
                .get(group)
                .cloned()
                .ok_or_else(|| ExporterError::NoCredentials(format!("{target} (group {group})")));
        }

        if let Some(credentials) = self.exact.get(target) {
            return Ok(credentials.clone());
        }

        self.patterns
            .iter()
            .find(|(regex, _)| regex.is_match(target))
            .map(|(_, credentials)| credentials.clone())
            .or_else(|| self.default.clone())
            .ok_or_else(|| ExporterError::NoCredentials(target.to_string()))
    }
}

/// Host keys are matched literally unless they contain a regex operator.
/// A `.` alone does not count, so addresses and hostnames stay exact.
fn is_pattern(key: &str) -> bool {
    key.contains(['^', '$', '*', '+', '?', '(', ')', '[', ']', '{', '}', '|', '\\'])
}
