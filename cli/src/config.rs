use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use daybook_core::db::SqliteStore;
use daybook_core::engine::EngineConfig;
use daybook_core::store::{JsonFileStore, StateAdapter};

const DATA_ENV: &str = "DAYBOOK_DATA";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    Json,
}

impl Backend {
    fn file_name(self) -> &'static str {
        match self {
            Backend::Sqlite => "daybook.db",
            Backend::Json => "daybook.json",
        }
    }
}

/// `config.toml` as written by the user. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    backend: Backend,
    data_path: Option<PathBuf>,
    engine: EngineConfig,
}

pub struct Config {
    pub backend: Backend,
    pub data_path: PathBuf,
    pub engine: EngineConfig,
}

impl Config {
    pub fn load() -> Result<Self> {
        let proj_dirs =
            ProjectDirs::from("", "", "daybook").context("Could not determine home directory")?;

        let config_path = proj_dirs.config_dir().join("config.toml");
        let file = read_file_config(&config_path)?;
        Ok(Self::resolve(
            file,
            proj_dirs.data_dir(),
            std::env::var_os(DATA_ENV),
        ))
    }

    fn resolve(file: FileConfig, data_dir: &Path, data_override: Option<OsString>) -> Self {
        let data_path = data_override
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .or(file.data_path)
            .unwrap_or_else(|| data_dir.join(file.backend.file_name()));

        Config {
            backend: file.backend,
            data_path,
            engine: file.engine,
        }
    }

    pub fn open_store(&self) -> Result<Box<dyn StateAdapter>> {
        let store: Box<dyn StateAdapter> = match self.backend {
            Backend::Sqlite => Box::new(SqliteStore::open(&self.data_path)?),
            Backend::Json => Box::new(JsonFileStore::new(&self.data_path)),
        };
        Ok(store)
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig> {
    match std::fs::read_to_string(path) {
        Ok(raw) => parse_file_config(&raw)
            .with_context(|| format!("Invalid config file: {}", path.display())),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(FileConfig::default()),
        Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
    }
}

fn parse_file_config(raw: &str) -> Result<FileConfig> {
    Ok(toml::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use daybook_core::date::WeekStart;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::resolve(FileConfig::default(), Path::new("/data"), None);
        assert_eq!(cfg.backend, Backend::Sqlite);
        assert_eq!(cfg.data_path, PathBuf::from("/data/daybook.db"));
        assert_eq!(cfg.engine, EngineConfig::default());
    }

    #[test]
    fn test_parse_full_file() {
        let file = parse_file_config(
            r#"
            backend = "json"
            data_path = "/tmp/mine.json"

            [engine]
            week_starts_on = "monday"
            weigh_in_closes_day = true

            [engine.momentum]
            food = 0.5
            workout = 0.4
            closed = 0.1
            "#,
        )
        .unwrap();
        let cfg = Config::resolve(file, Path::new("/data"), None);
        assert_eq!(cfg.backend, Backend::Json);
        assert_eq!(cfg.data_path, PathBuf::from("/tmp/mine.json"));
        assert_eq!(cfg.engine.week_starts_on, WeekStart::Monday);
        assert!(cfg.engine.weigh_in_closes_day);
        assert!((cfg.engine.momentum.food - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_json_backend_default_file_name() {
        let file = parse_file_config("backend = \"json\"").unwrap();
        let cfg = Config::resolve(file, Path::new("/data"), None);
        assert_eq!(cfg.data_path, PathBuf::from("/data/daybook.json"));
    }

    #[test]
    fn test_env_override_wins() {
        let file = parse_file_config("data_path = \"/tmp/a.db\"").unwrap();
        let cfg = Config::resolve(file, Path::new("/data"), Some(OsString::from("/tmp/b.db")));
        assert_eq!(cfg.data_path, PathBuf::from("/tmp/b.db"));

        let file = parse_file_config("data_path = \"/tmp/a.db\"").unwrap();
        let cfg = Config::resolve(file, Path::new("/data"), Some(OsString::new()));
        assert_eq!(cfg.data_path, PathBuf::from("/tmp/a.db"));
    }

    #[test]
    fn test_invalid_file_rejected() {
        assert!(parse_file_config("backend = \"postgres\"").is_err());
        assert!(parse_file_config("colour = \"blue\"").is_err());
        assert!(parse_file_config("[engine]\nweek_starts_on = \"friday\"").is_err());
    }

    #[test]
    fn test_open_store_json() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config {
            backend: Backend::Json,
            data_path: dir.path().join("state.json"),
            engine: EngineConfig::default(),
        };
        let mut store = cfg.open_store().unwrap();
        assert!(store.load_state().unwrap().is_none());
    }
}
