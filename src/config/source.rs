use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use super::{ConfigEntry, ConfigError};

const HOME_ENV: &str = "RECURRENCE_CORE_HOME";
const CONFIG_FILE_NAME: &str = "system_config.json";
const TMP_SUFFIX: &str = "tmp";

/// Anything that can hand back the raw configuration rows.
pub trait ConfigSource: Send + Sync {
    fn fetch(&self) -> Result<Vec<ConfigEntry>, ConfigError>;
}

impl<S: ConfigSource + ?Sized> ConfigSource for Box<S> {
    fn fetch(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        (**self).fetch()
    }
}

/// Reads configuration rows from a JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `$RECURRENCE_CORE_HOME/system_config.json`, falling back to the platform
    /// config directory.
    pub fn default_path() -> PathBuf {
        let base = std::env::var_os(HOME_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::config_dir().map(|dir| dir.join("recurrence_core")))
            .or_else(|| dirs::home_dir().map(|dir| dir.join(".recurrence_core")))
            .unwrap_or_else(|| PathBuf::from("."));
        base.join(CONFIG_FILE_NAME)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the rows atomically by staging to a temporary file.
    pub fn save(&self, entries: &[ConfigEntry]) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(entries)?;
        let tmp = tmp_path(&self.path);
        write_all(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl Default for JsonFileSource {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

impl ConfigSource for JsonFileSource {
    fn fetch(&self) -> Result<Vec<ConfigEntry>, ConfigError> {
        if !self.path.exists() {
            tracing::debug!(path = %self.path.display(), "no configuration file; using defaults");
            return Ok(Vec::new());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_all(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
