// src/utils/env.rs
use log::{info, warn};
use std::path::Path;

/// Candidate env files, checked in order.
pub const ENV_PATHS: [&str; 3] = [".env", ".env.local", "../.env"];

/// Loads the first readable env file from the working directory.
pub fn load_env() {
    if load_env_from(&ENV_PATHS).is_none() {
        info!("No .env file found, using environment variables from system");
    }
}

/// Stops at the first of `paths` that loads and returns it. Variables already
/// present in the process environment are left untouched.
pub fn load_env_from<P: AsRef<Path>>(paths: &[P]) -> Option<&P> {
    for path in paths {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            continue;
        }
        match dotenv::from_path(path_ref) {
            Ok(()) => {
                info!("Loaded environment variables from {}", path_ref.display());
                return Some(path);
            }
            Err(e) => warn!("Failed to load environment from {}: {}", path_ref.display(), e),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_first_existing_file_wins_without_override() {
        let dir = TempDir::new().unwrap();
        let first = dir.path().join(".env");
        let second = dir.path().join(".env.local");
        fs::write(
            &first,
            "DJ_MAPPER_ENV_TEST_NEW=from_env\nDJ_MAPPER_ENV_TEST_SET=from_file\n",
        )
        .unwrap();
        fs::write(&second, "DJ_MAPPER_ENV_TEST_LOCAL=from_local\n").unwrap();
        env::set_var("DJ_MAPPER_ENV_TEST_SET", "from_shell");

        let missing = dir.path().join("absent.env");
        let paths = [missing, first.clone(), second];
        let loaded = load_env_from(&paths);

        assert_eq!(loaded, Some(&first));
        assert_eq!(env::var("DJ_MAPPER_ENV_TEST_NEW").unwrap(), "from_env");
        assert_eq!(env::var("DJ_MAPPER_ENV_TEST_SET").unwrap(), "from_shell");
        assert!(env::var("DJ_MAPPER_ENV_TEST_LOCAL").is_err());
    }

    #[test]
    fn test_no_env_file_found() {
        let dir = TempDir::new().unwrap();
        let paths = [dir.path().join(".env"), dir.path().join(".env.local")];
        assert!(load_env_from(&paths).is_none());
    }
}
