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

//! In-memory BMC used by unit tests.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::BoxFuture;

use super::model::{ODataLink, ServiceRoot};
use super::{Connector, RedfishSession};
use crate::ExporterError;
use crate::targets::Credentials;

#[derive(Default)]
pub struct MockSession {
    root: ServiceRoot,
    resources: HashMap<String, serde_json::Value>,
    failing: HashSet<String>,
    requests: Mutex<Vec<String>>,
    logged_out: Arc<AtomicBool>,
}

impl MockSession {
    pub fn new() -> Self {
        Self {
            root: ServiceRoot {
                chassis: Some(ODataLink::new("/redfish/v1/Chassis")),
                systems: Some(ODataLink::new("/redfish/v1/Systems")),
                managers: Some(ODataLink::new("/redfish/v1/Managers")),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn with(mut self, path: &str, value: serde_json::Value) -> Self {
        self.resources.insert(path.to_string(), value);
        self
    }

    /// Serves an error for `path` even if a document is registered for it.
    pub fn failing(mut self, path: &str) -> Self {
        self.failing.insert(path.to_string());
        self
    }

    pub fn logout_flag(&self) -> Arc<AtomicBool> {
        self.logged_out.clone()
    }

    pub fn request_count(&self, path: &str) -> usize {
        self.requests
            .lock()
            .map(|requests| requests.iter().filter(|p| *p == path).count())
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

impl RedfishSession for MockSession {
    fn service_root(&self) -> &ServiceRoot {
        &self.root
    }

    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<serde_json::Value, ExporterError>> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(path.to_string());
        }
        let result = if self.failing.contains(path) {
            Err(ExporterError::GenericError(format!("injected failure for {path}")))
        } else {
            self.resources
                .get(path)
                .cloned()
                .ok_or_else(|| ExporterError::NotFound(path.to_string()))
        };
        async move { result }.boxed()
    }

    fn logout(&self) -> BoxFuture<'_, Result<(), ExporterError>> {
        self.logged_out.store(true, Ordering::SeqCst);
        async { Ok(()) }.boxed()
    }
}

/// Hands out a prepared session once, or refuses to connect.
pub struct MockConnector {
    session: Mutex<Option<MockSession>>,
}

impl MockConnector {
    pub fn new(session: MockSession) -> Self {
        Self {
            session: Mutex::new(Some(session)),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            session: Mutex::new(None),
        }
    }
}

impl Connector for MockConnector {
    fn connect<'a>(
        &'a self,
        target: &'a str,
        _credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Box<dyn RedfishSession>, ExporterError>> {
        let session = self.session.lock().ok().and_then(|mut s| s.take());
        async move {
            match session {
                Some(session) => Ok(Box::new(session) as Box<dyn RedfishSession>),
                None => Err(ExporterError::Authentication(
                    target.to_string(),
                    "connection refused".to_string(),
                )),
            }
        }
        .boxed()
    }
}
