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

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml, Yaml};
use serde::{Deserialize, Deserializer, Serialize};

use crate::targets::{CredentialResolver, Credentials};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub metrics: MetricsConfig,

    pub client: ClientConfig,

    pub collectors: CollectorsConfig,

    /// Credentials keyed by exact host, host regex, or `default`
    pub hosts: BTreeMap<String, Credentials>,

    /// Credentials selected by the `group` scrape parameter
    pub groups: BTreeMap<String, Credentials>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            metrics: MetricsConfig::default(),
            client: ClientConfig::default(),
            collectors: CollectorsConfig::default(),
            hosts: BTreeMap::new(),
            groups: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Listener for scrape and self-metrics endpoints.
    pub endpoint: String,
    /// Namespace of every exported metric, defaults to redfish
    pub prefix: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            endpoint: "0.0.0.0:9610".to_string(),
            prefix: "redfish".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    /// Log in through the SessionService and send X-Auth-Token.
    Session,
    /// Send basic credentials with every request.
    Basic,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Timeout applied to each Redfish request.
    #[serde(with = "humantime_serde")]
    pub timeout: Duration,

    /// Accept self-signed BMC certificates.
    pub insecure: bool,

    pub auth: AuthMode,

    /// Number of concurrent member fetches within one collection.
    pub fetch_concurrency: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            insecure: true,
            auth: AuthMode::Session,
            fetch_concurrency: 16,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CollectorsConfig {
    /// Chassis collector configuration (if present, chassis collector is enabled)
    pub chassis: Configurable<SubsystemConfig>,

    /// System collector configuration (if present, system collector is enabled)
    pub system: Configurable<SubsystemConfig>,

    /// Manager collector configuration (if present, manager collector is enabled)
    pub manager: Configurable<SubsystemConfig>,
}

impl Default for CollectorsConfig {
    fn default() -> Self {
        Self {
            chassis: Configurable::Enabled(SubsystemConfig::default()),
            system: Configurable::Enabled(SubsystemConfig::default()),
            manager: Configurable::Enabled(SubsystemConfig::default()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SubsystemConfig {
    /// Walk log services of every top-level resource.
    pub log_services: bool,

    /// Also walk the entries of each log service.
    pub log_entries: bool,
}

impl Default for SubsystemConfig {
    fn default() -> Self {
        Self {
            log_services: true,
            log_entries: true,
        }
    }
}

impl Config {
    /// Load configuration from optional path
    pub fn load(config_path: Option<&Path>) -> Result<Self, String> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = config_path {
            figment = match path.extension().and_then(|ext| ext.to_str()) {
                Some("yml") | Some("yaml") => figment.merge(Yaml::file(path)),
                _ => figment.merge(Toml::file(path)),
            };
        }

        figment = figment.merge(Env::prefixed("REDFISH_EXPORTER__").split("__"));

        let config: Config = figment
            .extract()
            .map_err(|e| format!("Failed to load configuration: {}", e))?;

        config.validate()?;
        Ok(config)
    }

    /// Get the metrics listener address
    pub fn metrics_addr(&self) -> Result<SocketAddr, String> {
        self.metrics
            .endpoint
            .parse()
            .map_err(|_| format!("Invalid metrics endpoint: {}", self.metrics.endpoint))
    }

    pub fn credential_resolver(&self) -> Result<CredentialResolver, String> {
        CredentialResolver::new(&self.hosts, &self.groups).map_err(|e| e.to_string())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.metrics.prefix.is_empty() {
            return Err("metrics prefix must not be empty".to_string());
        }

        if self.client.fetch_concurrency == 0 {
            return Err("fetch_concurrency must be greater than 0".to_string());
        }

        self.metrics_addr()?;
        self.credential_resolver()?;

        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Configurable<T> {
    Enabled(T),
    Disabled,
}

impl<T> Configurable<T> {
    pub fn as_option(&self) -> Option<&T> {
        match self {
            Self::Enabled(v) => Some(v),
            Self::Disabled => None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        matches!(self, Self::Enabled(_))
    }
}

impl<'de, T> Deserialize<'de> for Configurable<T>
where
    T: Deserialize<'de> + Default,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Helper<T> {
            #[serde(default = "default_true")]
            enabled: bool,
            #[serde(flatten)]
            config: Option<T>,
        }

        fn default_true() -> bool {
            true
        }

        match Option::<Helper<T>>::deserialize(deserializer)? {
            None => Ok(Configurable::Disabled),
            Some(helper) if !helper.enabled => Ok(Configurable::Disabled),
            Some(helper) => Ok(Configurable::Enabled(helper.config.unwrap_or_default())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_example_config() {
        let toml_content = include_str!("../example/config.example.toml");
        let config: Config = Figment::new()
            .merge(Toml::string(toml_content))
            .extract()
            .expect("could not parse config toml file");

        assert_eq!(config.metrics.endpoint, "0.0.0.0:9610");
        assert_eq!(config.metrics.prefix, "redfish");
        assert_eq!(config.client.timeout, Duration::from_secs(20));
        assert!(config.client.insecure);
        assert_eq!(config.client.auth, AuthMode::Session);
        assert_eq!(config.client.fetch_concurrency, 8);

        assert!(config.collectors.chassis.is_enabled());
        assert!(config.collectors.system.is_enabled());
        if let Configurable::Enabled(ref manager) = config.collectors.manager {
            assert!(manager.log_services);
            assert!(!manager.log_entries);
        } else {
            panic!("manager collector disabled")
        }

        assert_eq!(config.hosts["default"].username, "root");
        assert_eq!(config.hosts[r"^10\.20\.\d+\.\d+$"].username, "admin");
        assert_eq!(config.groups["gpu"].username, "gpuadmin");

        config.validate().expect("example config should be valid");
    }

    #[test]
    fn test_disabled_collectors_and_basic_auth() {
        let toml_content = r#"
[metrics]
endpoint = "127.0.0.1:9611"
prefix = "bmc"

[client]
timeout = "5s"
insecure = false
auth = "basic"

[collectors.chassis]
enabled = false

[collectors.system]
log_entries = false

[hosts.default]
username = "operator"
password = "hunter2"
"#;

        let config: Config = Figment::new()
            .merge(Toml::string(toml_content))
            .extract()
            .expect("failed to parse");

        assert_eq!(config.metrics.prefix, "bmc");
        assert_eq!(config.client.timeout, Duration::from_secs(5));
        assert!(!config.client.insecure);
        assert_eq!(config.client.auth, AuthMode::Basic);
        assert_eq!(config.client.fetch_concurrency, 16);

        assert!(!config.collectors.chassis.is_enabled());
        let system = config.collectors.system.as_option().expect("system enabled");
        assert!(system.log_services);
        assert!(!system.log_entries);
        assert!(config.collectors.manager.is_enabled());

        config.validate().expect("config should be valid");
    }

    #[test]
    fn test_parse_yaml() {
        let yaml_content = r#"
hosts:
  default:
    username: root
    password: calvin
groups:
  storage:
    username: storadmin
    password: pw
"#;
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::string(yaml_content))
            .extract()
            .expect("failed to parse yaml");

        assert_eq!(config.hosts["default"].password, "calvin");
        assert_eq!(config.groups["storage"].username, "storadmin");
        assert!(config.collectors.chassis.is_enabled());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        config.validate().expect("config should be valid");

        config.client.fetch_concurrency = 0;
        assert!(config.validate().is_err());
        config.client.fetch_concurrency = 4;

        config.metrics.endpoint = "not-an-address".to_string();
        assert!(config.validate().is_err());
        config.metrics = MetricsConfig::default();

        config.hosts.insert(
            "bmc-[".to_string(),
            Credentials {
                username: "u".to_string(),
                password: "p".to_string(),
            },
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_defaults() {
        let config = Config::load(None).expect("should load defaults");
        assert_eq!(config.metrics.endpoint, "0.0.0.0:9610");
        assert_eq!(config.metrics.prefix, "redfish");
        assert_eq!(config.client.timeout, Duration::from_secs(30));
        assert!(config.hosts.is_empty());
        assert!(config.collectors.manager.is_enabled());
    }
}
