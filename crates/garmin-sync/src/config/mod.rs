use std::path::PathBuf;

use crate::error::{Result, SyncError};

/// Default configuration directory name
const DATA_DIR_NAME: &str = "garmin-sync";

/// Environment variable naming the token store directory
const TOKEN_STORE_ENV: &str = "GARMINTOKENS";

/// Default token store directory under $HOME
const DEFAULT_TOKEN_STORE: &str = ".garminconnect";

/// Get the data directory path for the local database
/// Returns ~/.local/share/garmin-sync on Unix, ~/Library/Application Support/garmin-sync on macOS
pub fn data_dir() -> Result<PathBuf> {
    dirs::data_dir()
        .map(|p| p.join(DATA_DIR_NAME))
        .ok_or_else(|| SyncError::config("Could not determine data directory"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &PathBuf) -> Result<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Default database file path inside the data directory
pub fn default_db_path() -> Result<String> {
    let dir = data_dir()?;
    ensure_dir(&dir)?;
    Ok(dir.join("health.db").to_string_lossy().into_owned())
}

/// Directory holding the Garmin OAuth token files.
/// Honors GARMINTOKENS, falling back to ~/.garminconnect.
pub fn token_store_dir() -> Result<PathBuf> {
    if let Ok(path) = std::env::var(TOKEN_STORE_ENV) {
        return Ok(PathBuf::from(path));
    }

    dirs::home_dir()
        .map(|p| p.join(DEFAULT_TOKEN_STORE))
        .ok_or_else(|| SyncError::config("Could not determine home directory"))
}
