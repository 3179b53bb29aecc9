use std::ffi::OsString;
use std::path::PathBuf;

/// Database path constants
pub const DB_DATA_DIR: &str = "data";
pub const DB_FILE_NAME: &str = "game_reviews.db";
pub const APP_DIR_NAME: &str = "game-reviews";

/// Overrides the base data directory when set and non-empty.
pub const DATA_DIR_ENV: &str = "GAME_REVIEWS_DATA_DIR";

/// Base data directory, honouring `GAME_REVIEWS_DATA_DIR`.
pub fn get_base_data_dir() -> Result<PathBuf, String> {
    get_base_data_dir_from(std::env::var_os(DATA_DIR_ENV))
}

/// Base data directory for an explicit override value.
///
/// An empty override falls back to the system data directory.
pub fn get_base_data_dir_from(override_dir: Option<OsString>) -> Result<PathBuf, String> {
    match override_dir {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => get_system_data_dir(),
    }
}

/// Platform data directory (cross-platform)
fn get_system_data_dir() -> Result<PathBuf, String> {
    use directories::BaseDirs;

    let base_dirs = BaseDirs::new().ok_or_else(|| "unable to resolve system directories".to_string())?;
    Ok(base_dirs.data_dir().join(APP_DIR_NAME))
}

/// Database file path
pub fn get_db_path() -> Result<PathBuf, String> {
    Ok(db_path_in(get_base_data_dir()?))
}

/// Database file path under an explicit base directory
pub fn db_path_in(base: impl Into<PathBuf>) -> PathBuf {
    base.into().join(DB_DATA_DIR).join(DB_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_over_system_dir() {
        let dir = get_base_data_dir_from(Some(OsString::from("/tmp/reviews"))).unwrap();
        assert_eq!(dir, PathBuf::from("/tmp/reviews"));
    }

    #[test]
    fn empty_override_is_ignored() {
        let from_empty = get_base_data_dir_from(Some(OsString::new()));
        let from_none = get_base_data_dir_from(None);
        assert_eq!(from_empty, from_none);
    }

    #[test]
    fn db_path_layout() {
        assert_eq!(
            db_path_in("/srv/app"),
            PathBuf::from("/srv/app/data/game_reviews.db")
        );
    }
}
