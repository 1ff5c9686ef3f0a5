// Copyright 2025 The NoteQ Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::error::Fallible;

pub const DEFAULT_BACKEND_ORIGIN: &str = "http://127.0.0.1:8000";
pub const DEFAULT_PORT: u16 = 3000;

/// Environment variable overriding the backend origin.
pub const BACKEND_ORIGIN_VAR: &str = "NOTEQ_BACKEND_ORIGIN";

/// Shape of the optional `noteq.toml` file.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    backend_origin: Option<String>,
    port: Option<u16>,
}

/// Resolved server configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// Origin of the Django backend, without a trailing slash.
    pub backend_origin: String,
    /// Port the local server listens on.
    pub port: u16,
}

impl Config {
    /// Resolve the configuration. Precedence: CLI flag, then environment
    /// variable, then config file, then default.
    pub fn resolve(
        port: Option<u16>,
        backend: Option<String>,
        config_path: Option<PathBuf>,
    ) -> Fallible<Self> {
        let file = match config_path {
            Some(path) => read_config_file(&path)?,
            None => {
                let default_path = PathBuf::from("noteq.toml");
                if default_path.exists() {
                    read_config_file(&default_path)?
                } else {
                    ConfigFile::default()
                }
            }
        };
        let env_origin = std::env::var(BACKEND_ORIGIN_VAR).ok();
        let backend_origin = backend
            .or(env_origin)
            .or(file.backend_origin)
            .unwrap_or_else(|| DEFAULT_BACKEND_ORIGIN.to_string());
        let backend_origin = backend_origin.trim_end_matches('/').to_string();
        let port = port.or(file.port).unwrap_or(DEFAULT_PORT);
        Ok(Config {
            backend_origin,
            port,
        })
    }
}

fn read_config_file(path: &Path) -> Fallible<ConfigFile> {
    let contents = std::fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&contents)?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() -> Fallible<()> {
        // An explicit empty config file keeps the test away from any real
        // `noteq.toml` in the working directory.
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("noteq.toml");
        std::fs::write(&path, "")?;
        let config = Config::resolve(None, None, Some(path))?;
        assert_eq!(config.port, DEFAULT_PORT);
        Ok(())
    }

    #[test]
    fn test_cli_flags_win() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("noteq.toml");
        std::fs::write(&path, "backend_origin = \"http://example.com/\"\nport = 4000\n")?;
        let config = Config::resolve(Some(5000), Some("http://cli:9".to_string()), Some(path))?;
        assert_eq!(config.port, 5000);
        assert_eq!(config.backend_origin, "http://cli:9");
        Ok(())
    }

    #[test]
    fn test_config_file() -> Fallible<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("noteq.toml");
        std::fs::write(&path, "backend_origin = \"http://example.com/\"\nport = 4000\n")?;
        let config = Config::resolve(None, None, Some(path))?;
        assert_eq!(config.port, 4000);
        // The trailing slash is stripped.
        assert_eq!(config.backend_origin, "http://example.com");
        Ok(())
    }

    #[test]
    fn test_missing_config_file() {
        let result = Config::resolve(None, None, Some(PathBuf::from("./derpherp.toml")));
        assert!(result.is_err());
    }
}
