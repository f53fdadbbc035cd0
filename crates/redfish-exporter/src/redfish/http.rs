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

use std::fmt::Debug;

use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::header::LOCATION;
use reqwest::{Client, RequestBuilder};
use serde_json::json;
use url::Url;

use super::model::ServiceRoot;
use super::{Connector, RedfishSession};
use crate::ExporterError;
use crate::config::{AuthMode, ClientConfig};
use crate::targets::Credentials;

const SERVICE_ROOT: &str = "/redfish/v1/";
const DEFAULT_SESSIONS: &str = "/redfish/v1/SessionService/Sessions";
const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

/// Connects to BMCs over HTTPS. One instance is shared by all scrapes.
#[derive(Debug, Clone)]
pub struct HttpConnector {
    client: Client,
    auth: AuthMode,
}

impl HttpConnector {
    pub fn new(config: &ClientConfig) -> Result<Self, ExporterError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .danger_accept_invalid_certs(config.insecure)
            .build()?;
        Ok(Self {
            client,
            auth: config.auth,
        })
    }

    async fn open(
        &self,
        target: &str,
        credentials: &Credentials,
    ) -> Result<HttpSession, ExporterError> {
        let base = base_url(target)?;
        let root: ServiceRoot = self
            .client
            .get(base.join(SERVICE_ROOT)?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let auth = match self.auth {
            AuthMode::Basic => {
                let auth = SessionAuth::Basic(credentials.clone());
                if let Some(systems) = &root.systems {
                    auth.apply(self.client.get(base.join(&systems.odata_id)?))
                        .send()
                        .await?
                        .error_for_status()
                        .map_err(|e| ExporterError::Authentication(target.to_string(), e.to_string()))?;
                }
                auth
            }
            AuthMode::Session => {
                let sessions = root
                    .links
                    .as_ref()
                    .and_then(|links| links.sessions.as_ref())
                    .map(|link| link.odata_id.as_str())
                    .unwrap_or(DEFAULT_SESSIONS);
                let response = self
                    .client
                    .post(base.join(sessions)?)
                    .json(&json!({
                        "UserName": credentials.username,
                        "Password": credentials.password,
                    }))
                    .send()
                    .await?
                    .error_for_status()
                    .map_err(|e| ExporterError::Authentication(target.to_string(), e.to_string()))?;

                let token = response
                    .headers()
                    .get(AUTH_TOKEN_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| {
                        ExporterError::Authentication(
                            target.to_string(),
                            "session response carried no X-Auth-Token".to_string(),
                        )
                    })?
                    .to_string();
                let location = match response.headers().get(LOCATION).and_then(|v| v.to_str().ok()) {
                    Some(location) => Some(base.join(location)?),
                    None => None,
                };
                SessionAuth::Token { token, location }
            }
        };

        Ok(HttpSession {
            client: self.client.clone(),
            base,
            root,
            auth,
        })
    }
}

impl Connector for HttpConnector {
    fn connect<'a>(
        &'a self,
        target: &'a str,
        credentials: &'a Credentials,
    ) -> BoxFuture<'a, Result<Box<dyn RedfishSession>, ExporterError>> {
        async move {
            let session = self.open(target, credentials).await?;
            Ok(Box::new(session) as Box<dyn RedfishSession>)
        }
        .boxed()
    }
}

enum SessionAuth {
    Basic(Credentials),
    Token {
        token: String,
        location: Option<Url>,
    },
}

impl SessionAuth {
    fn apply(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            SessionAuth::Basic(credentials) => {
                request.basic_auth(&credentials.username, Some(&credentials.password))
            }
            SessionAuth::Token { token, .. } => request.header(AUTH_TOKEN_HEADER, token),
        }
    }
}

pub struct HttpSession {
    client: Client,
    base: Url,
    root: ServiceRoot,
    auth: SessionAuth,
}

/// Debug structure omits the session token
impl Debug for HttpSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSession")
            .field("base", &self.base.as_str())
            .finish()
    }
}

impl HttpSession {
    async fn get_json(&self, path: &str) -> Result<serde_json::Value, ExporterError> {
        let url = self.base.join(path)?;
        let value = self
            .auth
            .apply(self.client.get(url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    async fn delete_session(&self) -> Result<(), ExporterError> {
        if let SessionAuth::Token {
            location: Some(location),
            ..
        } = &self.auth
        {
            self.auth
                .apply(self.client.delete(location.clone()))
                .send()
                .await?
                .error_for_status()?;
        }
        Ok(())
    }
}

impl RedfishSession for HttpSession {
    fn service_root(&self) -> &ServiceRoot {
        &self.root
    }

    fn get<'a>(&'a self, path: &'a str) -> BoxFuture<'a, Result<serde_json::Value, ExporterError>> {
        self.get_json(path).boxed()
    }

    fn logout(&self) -> BoxFuture<'_, Result<(), ExporterError>> {
        self.delete_session().boxed()
    }
}

/// Targets without a scheme are reached over HTTPS.
pub fn base_url(target: &str) -> Result<Url, ExporterError> {
    if target.contains("://") {
        Ok(Url::parse(target)?)
    } else {
        Ok(Url::parse(&format!("https://{target}"))?)
    }
}
