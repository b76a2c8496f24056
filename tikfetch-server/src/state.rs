/* This file is part of the TikFetch project
*
*  Copyright (C) 2026 TikFetch contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use std::{fs::File, io::{self, Read, Write}, path::{Path, PathBuf}};

use chrono::{DateTime, Utc};
use cloneable_errors::{bail, ErrorContext, ResContext};
use log::info;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::constants::BROWSER_USER_AGENT;

#[derive(Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub static_content_path: PathBuf,
    pub listen: ListenConfig,
    #[serde(skip)]
    pub startup_timestamp: DateTime<Utc>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            static_content_path: PathBuf::from("./public"),
            listen: ListenConfig::default(),
            startup_timestamp: Utc::now(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ListenConfig {
    pub tcp: Option<(String, u16)>,
    pub unix: Option<String>,
    pub unix_mode: Option<u32>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            tcp: Some(("0.0.0.0".to_owned(), 3000)),
            unix: None,
            unix_mode: None,
        }
    }
}

impl AppConfig {
    /// Read the config file, or create it with the defaults if it doesn't exist yet
    pub fn load(path: &Path) -> Result<AppConfig, ErrorContext> {
        let path_str = path.display();
        let cfg = match File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents).with_context(|| format!("Failed to read {path_str}"))?;
                toml::from_str(&contents).with_context(|| format!("Failed to deserialize contents of {path_str}"))?
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let cfg = AppConfig::default();
                let serialized = toml::to_string(&cfg).context("Failed to serialize default AppConfig as TOML")?;
                let mut file = File::options().write(true).create_new(true).open(path).with_context(|| format!("Failed to create {path_str}"))?;
                write!(file, "{serialized}").with_context(|| format!("Failed to write serialized default AppConfig to {path_str}"))?;
                info!("Wrote the default configuration to {path_str}");
                cfg
            },
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to open {path_str}"));
            },
        };
        cfg.validate()
    }

    fn validate(self) -> Result<AppConfig, ErrorContext> {
        if self.listen.tcp.is_none() && self.listen.unix.is_none() {
            bail!("Invalid configuration - no tcp port or unix socket path specified");
        }
        Ok(self)
    }

    /// Apply the `PORT` environment variable on top of the tcp listen address
    pub fn with_port_override(mut self, port: Option<&str>) -> Result<AppConfig, ErrorContext> {
        // an empty PORT counts as unset
        let Some(port) = port.map(str::trim).filter(|port| !port.is_empty()) else {
            return Ok(self);
        };
        let port: u16 = port.parse().with_context(|| format!("Invalid PORT value: {port:?}"))?;
        let ip = match self.listen.tcp.take() {
            Some((ip, _)) => ip,
            None => ListenConfig::default().tcp.map(|(ip, _)| ip).unwrap_or_default(),
        };
        self.listen.tcp = Some((ip, port));
        Ok(self)
    }
}

/// The one HTTP client shared by every outbound request
pub fn build_client() -> Result<Client, ErrorContext> {
    Client::builder()
        .user_agent(BROWSER_USER_AGENT)
        .build()
        .context("Failed to build the HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_listen_on_3000() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.listen.tcp, Some(("0.0.0.0".to_owned(), 3000)));
        assert_eq!(cfg.static_content_path, PathBuf::from("./public"));
    }

    #[test]
    fn default_config_round_trips() {
        let serialized = toml::to_string(&AppConfig::default()).unwrap();
        let cfg: AppConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(cfg.listen.tcp, Some(("0.0.0.0".to_owned(), 3000)));
    }

    #[test]
    fn port_override() {
        let cfg = AppConfig::default().with_port_override(Some("8080")).unwrap();
        assert_eq!(cfg.listen.tcp, Some(("0.0.0.0".to_owned(), 8080)));

        let cfg = AppConfig::default().with_port_override(None).unwrap();
        assert_eq!(cfg.listen.tcp, Some(("0.0.0.0".to_owned(), 3000)));

        let cfg = AppConfig::default().with_port_override(Some("")).unwrap();
        assert_eq!(cfg.listen.tcp, Some(("0.0.0.0".to_owned(), 3000)));

        assert!(AppConfig::default().with_port_override(Some("http")).is_err());
        assert!(AppConfig::default().with_port_override(Some("70000")).is_err());
    }

    #[test]
    fn port_override_enables_tcp() {
        let mut cfg = AppConfig::default();
        cfg.listen.tcp = None;
        cfg.listen.unix = Some("/run/tikfetch.sock".to_owned());
        let cfg = cfg.with_port_override(Some("9000")).unwrap();
        assert_eq!(cfg.listen.tcp, Some(("0.0.0.0".to_owned(), 9000)));
    }

    #[test]
    fn rejects_config_without_listeners() {
        let cfg: AppConfig = toml::from_str("[listen]\n").unwrap();
        assert!(cfg.validate().is_err());
    }
}
