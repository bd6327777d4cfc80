//! Run configuration.
//!
//! Settings come from three places, in precedence order: command-line flags,
//! the process environment (a `.env` file is loaded into it at startup), and
//! `config.toml` in the platform config directory. Backup runs need Google
//! credentials and a playlist id; compare runs only need the backup
//! directory and the tombstone title.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::cli::{BackupArgs, CompareArgs};
use crate::error::ConfigError;
use crate::store::diff::DEFAULT_TOMBSTONE_TITLE;

const DEFAULT_BACKUP_DIR: &str = "backups";

/// Everything a backup run needs.
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub playlist_id: String,
    pub backup_dir: PathBuf,
}

/// Everything a compare run needs. Credentials are never demanded here.
pub struct CompareConfig {
    pub backup_dir: PathBuf,
    pub tombstone_title: String,
}

#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    #[serde(default)]
    google: GoogleSection,
    playlist_id: Option<String>,
    backup_dir: Option<String>,
    tombstone_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct GoogleSection {
    client_id: Option<String>,
    client_secret: Option<String>,
}

impl Config {
    pub fn load(args: &BackupArgs) -> Result<Config, ConfigError> {
        let file = load_file_config()?;

        let client_id = env_var("GOOGLE_CLIENT_ID").or(file.google.client_id);
        let client_secret = env_var("GOOGLE_CLIENT_SECRET").or(file.google.client_secret);
        let playlist_id = args
            .playlist
            .clone()
            .or_else(|| env_var("YOUTUBE_PLAYLIST_ID"))
            .or(file.playlist_id);
        let backup_dir = resolve_backup_dir(args.dir.clone(), file.backup_dir);

        let mut missing = Vec::new();
        if client_id.is_none() {
            missing.push("GOOGLE_CLIENT_ID");
        }
        if client_secret.is_none() {
            missing.push("GOOGLE_CLIENT_SECRET");
        }
        if playlist_id.is_none() {
            missing.push("YOUTUBE_PLAYLIST_ID");
        }

        let (Some(client_id), Some(client_secret), Some(playlist_id)) =
            (client_id, client_secret, playlist_id)
        else {
            return Err(ConfigError::MissingSettings(missing));
        };

        Ok(Config {
            client_id,
            client_secret,
            playlist_id,
            backup_dir,
        })
    }
}

impl CompareConfig {
    pub fn load(args: &CompareArgs) -> Result<CompareConfig, ConfigError> {
        let file = load_file_config()?;

        Ok(CompareConfig {
            backup_dir: resolve_backup_dir(args.dir.clone(), file.backup_dir),
            tombstone_title: args
                .tombstone
                .clone()
                .or(file.tombstone_title)
                .unwrap_or_else(|| DEFAULT_TOMBSTONE_TITLE.to_string()),
        })
    }
}

fn resolve_backup_dir(flag: Option<PathBuf>, file: Option<String>) -> PathBuf {
    resolve_backup_dir_from(flag, env_var("BACKUP_DIR"), file)
}

fn resolve_backup_dir_from(
    flag: Option<PathBuf>,
    env: Option<String>,
    file: Option<String>,
) -> PathBuf {
    flag.or(env.map(PathBuf::from))
        .or(file.map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_BACKUP_DIR))
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn config_file_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "keeplist")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn load_file_config() -> Result<FileConfig, ConfigError> {
    match config_file_path() {
        Some(path) if path.exists() => read_file_config(&path),
        _ => Ok(FileConfig::default()),
    }
}

fn read_file_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let data = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&data).map_err(|source| ConfigError::ParseFile {
        path: path.to_path_buf(),
        source,
    })
}
