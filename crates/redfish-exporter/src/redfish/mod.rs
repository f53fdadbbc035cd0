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

//! Inventory client seam: connections, sessions and typed fetches.

use futures::future::BoxFuture;
use futures::{StreamExt, stream};
use serde::de::DeserializeOwned;

use crate::ExporterError;
use crate::targets::Credentials;

pub mod http;
#[cfg(test)]
pub(crate) mod mock;
pub mod model;

pub use http::HttpConnector;
pub use model::{Collection, ODataLink, ServiceRoot};

/// One authenticated conversation with a BMC. Lives for a single scrape.
pub trait RedfishSession: Send + Sync {
    fn service_root(&self) -> &ServiceRoot;

    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<serde_json::Value, ExporterError>>;

    fn logout(&self) -> BoxFuture<'_, Result<(), ExporterError>>;
}

pub trait Connector: Send + Sync {
    fn connect<'a>(
        &'a self,
        target: &'a str,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Box<dyn RedfishSession>, ExporterError>>;
}

pub async fn fetch<T: DeserializeOwned>(
    session: &dyn RedfishSession,
    link: &ODataLink,
) -> Result<T, ExporterError> {
    let value = session.get(&link.odata_id).await?;
    serde_json::from_value(value).map_err(|source| ExporterError::Decode {
        path: link.odata_id.clone(),
        source,
    })
}

/// Result of resolving every member of a collection. Members that failed to
/// fetch are reported separately so the caller can log them and move on.
#[derive(Debug)]
pub struct Members<T> {
    pub resolved: Vec<T>,
    pub failed: Vec<(String, ExporterError)>,
}

/// Fetches a collection and then each of its members, at most `concurrency`
/// at a time. Members already expanded inline are decoded without a request.
/// Fails only if the collection document itself cannot be read.
pub async fn members<T: DeserializeOwned>(
    session: &dyn RedfishSession,
    collection: &ODataLink,
    concurrency: usize,
) -> Result<Members<T>, ExporterError> {
    let document: Collection = fetch(session, collection).await?;

    let mut inline = Members {
        resolved: Vec::new(),
        failed: Vec::new(),
    };
    let mut links = Vec::with_capacity(document.members.len());
    for member in document.members {
        let path = member
            .get("@odata.id")
            .and_then(|id| id.as_str())
            .unwrap_or(collection.odata_id.as_str())
            .to_string();
        if is_expanded(&member) {
            match serde_json::from_value::<T>(member) {
                Ok(resource) => inline.resolved.push(resource),
                Err(source) => inline
                    .failed
                    .push((path.clone(), ExporterError::Decode { path, source })),
            }
        } else {
            links.push(ODataLink::new(path));
        }
    }

    let mut fetched = resolve(session, &links, concurrency).await;
    inline.resolved.append(&mut fetched.resolved);
    inline.failed.append(&mut fetched.failed);
    Ok(inline)
}

/// A member is expanded when it carries properties beyond OData annotations
/// such as `@odata.id`, `@odata.type` or `@odata.etag`.
fn is_expanded(member: &serde_json::Value) -> bool {
    member
        .as_object()
        .is_some_and(|fields| fields.keys().any(|key| !key.starts_with('@')))
}

/// Fetches a list of links; every link is awaited exactly once.
pub async fn resolve<T: DeserializeOwned>(
    session: &dyn RedfishSession,
    links: &[ODataLink],
    concurrency: usize,
) -> Members<T> {
    let requests: Vec<_> = links
        .iter()
        .map(|link| async move { (link.odata_id.clone(), fetch::<T>(session, link).await) })
        .collect();
    let results: Vec<(String, Result<T, ExporterError>)> = stream::iter(requests)
        .buffered(concurrency.max(1))
        .collect()
        .await;

    let mut members = Members {
        resolved: Vec::with_capacity(results.len()),
        failed: Vec::new(),
    };
    for (path, result) in results {
        match result {
            Ok(member) => members.resolved.push(member),
            Err(e) => members.failed.push((path, e)),
        }
    }
    members
}
