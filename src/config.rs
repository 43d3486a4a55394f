use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};
use std::path::{Path, PathBuf};

/// Written above the generated TOML by `bookshelf init`
const CONFIG_HEADER: &str = "\
# Bookshelf configuration
#
# [database] backend is \"sqlite\" (books kept in `path`) or \"memory\"
# (books lost on shutdown; `path` and `pool_size` are ignored).

";

/// Which [`BookStore`](crate::storage::BookStore) backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: Backend,
    pub path: PathBuf,
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Sqlite,
            path: PathBuf::from("bookshelf.db"),
            pool_size: 8,
        }
    }
}

impl DatabaseConfig {
    /// Create the parent directory of the database file.
    ///
    /// Nothing touches the filesystem for the memory backend.
    pub fn prepare_storage(&self) -> std::io::Result<()> {
        if self.backend == Backend::Memory {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                tracing::debug!("Creating database directory {:?}", parent);
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BookshelfConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

impl BookshelfConfig {
    /// Reject settings the server could not start with
    pub fn validate(&self) -> anyhow::Result<()> {
        self.server
            .host
            .parse::<IpAddr>()
            .with_context(|| format!("server.host {:?} is not an IP address", self.server.host))?;

        if self.database.backend == Backend::Sqlite {
            if self.database.path.as_os_str().is_empty() {
                anyhow::bail!("database.path must be set for the sqlite backend");
            }
            if self.database.pool_size == 0 {
                anyhow::bail!("database.pool_size must be at least 1");
            }
        }
        Ok(())
    }

    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        let host: IpAddr = self.server.host.parse()?;
        Ok(SocketAddr::new(host, self.server.port))
    }
}

pub fn default_config_path() -> PathBuf {
    PathBuf::from("bookshelf.toml")
}

/// Read and validate a config file; `Ok(None)` when it does not exist
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Option<BookshelfConfig>> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(default_config_path);
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Ok(None);
    }

    let contents = std::fs::read_to_string(&path)?;
    let config: BookshelfConfig = toml::from_str(&contents)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid config in {}", path.display()))?;
    Ok(Some(config))
}

pub fn write_config(path: &Path, config: &BookshelfConfig, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!("config already exists at {} (use --force to overwrite)", path.display());
    }
    config.validate()?;

    let contents = format!("{}{}", CONFIG_HEADER, toml::to_string_pretty(config)?);
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("absent.toml"))).unwrap().is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookshelf.toml");
        std::fs::write(&path, "[database]\nbackend = \"memory\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap().unwrap();
        assert_eq!(config.database.backend, Backend::Memory);
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.server, ServerConfig::default());
    }

    #[test]
    fn test_invalid_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookshelf.toml");

        std::fs::write(&path, "[database]\npool_size = 0\n").unwrap();
        assert!(load_config(Some(&path)).is_err());

        std::fs::write(&path, "[server]\nhost = \"localhost\"\n").unwrap();
        assert!(load_config(Some(&path)).is_err());

        // pool size does not matter without a database file
        std::fs::write(&path, "[database]\nbackend = \"memory\"\npool_size = 0\n").unwrap();
        assert!(load_config(Some(&path)).unwrap().is_some());
    }

    #[test]
    fn test_write_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bookshelf.toml");

        let mut config = BookshelfConfig::default();
        write_config(&path, &config, false).unwrap();
        assert!(write_config(&path, &config, false).is_err());

        config.server.port = 9090;
        write_config(&path, &config, true).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("# Bookshelf configuration"));
        assert_eq!(load_config(Some(&path)).unwrap().unwrap(), config);
    }

    #[test]
    fn test_socket_addr() {
        let mut config = BookshelfConfig::default();
        config.server.host = "0.0.0.0".to_string();
        config.server.port = 3000;
        assert_eq!(config.socket_addr().unwrap(), "0.0.0.0:3000".parse().unwrap());
    }

    #[test]
    fn test_prepare_storage_creates_parent_for_sqlite_only() {
        let dir = tempfile::tempdir().unwrap();
        let mut database = DatabaseConfig {
            path: dir.path().join("data").join("nested").join("books.db"),
            ..DatabaseConfig::default()
        };

        database.backend = Backend::Memory;
        database.prepare_storage().unwrap();
        assert!(!dir.path().join("data").exists());

        database.backend = Backend::Sqlite;
        database.prepare_storage().unwrap();
        assert!(database.path.parent().unwrap().is_dir());
    }
}
