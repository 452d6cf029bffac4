use crate::error::{HostprepError, Result};
use directories::{ProjectDirs, UserDirs};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "hostprep.kdl";

pub fn expand_home(path: &Path) -> Result<PathBuf> {
    let path_str = path.to_string_lossy();

    if !path_str.starts_with('~') {
        return Ok(path.to_path_buf());
    }

    let user_dirs = UserDirs::new().ok_or_else(|| {
        HostprepError::Other("Could not determine user home directory".to_string())
    })?;

    let home = user_dirs.home_dir();

    if path_str == "~" {
        return Ok(home.to_path_buf());
    }

    let stripped = path_str
        .strip_prefix("~/")
        .ok_or_else(|| HostprepError::Other(format!("Invalid path format: {}", path_str)))?;

    Ok(home.join(stripped))
}

pub fn config_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from("org", "hostprep", "hostprep").ok_or_else(|| {
        HostprepError::Other("Could not determine config directory".to_string())
    })?;
    Ok(proj.config_dir().to_path_buf())
}

pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Home directory of `username` under `home_base`
pub fn home_dir_for(home_base: &Path, username: &str) -> PathBuf {
    home_base.join(username)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_file_uses_expected_filename() {
        if let Ok(path) = config_file() {
            assert_eq!(
                path.file_name().and_then(|f| f.to_str()),
                Some(CONFIG_FILE_NAME)
            );
        }
    }

    #[test]
    fn plain_paths_are_untouched() {
        let path = Path::new("/srv/DEB");
        assert_eq!(expand_home(path).expect("expand"), PathBuf::from("/srv/DEB"));
    }

    #[test]
    fn tilde_without_slash_is_rejected() {
        if UserDirs::new().is_some() {
            assert!(expand_home(Path::new("~other/x")).is_err());
        }
    }

    #[test]
    fn home_dir_joins_base() {
        assert_eq!(
            home_dir_for(Path::new("/home"), "alice"),
            PathBuf::from("/home/alice")
        );
    }
}
