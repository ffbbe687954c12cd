//! Centralized path resolution for nyxboot
//!
//! # Environment Variables
//!
//! - `NYXBOOT_CONFIG` - Explicit config file (same as `--config`)
//! - `NYXBOOT_CONFIG_DIR` - Override config directory
//!
//! # Path Resolution Priority
//!
//! For config_dir():
//! 1. `NYXBOOT_CONFIG_DIR` environment variable
//! 2. `XDG_CONFIG_HOME/nyxboot` (if set)
//! 3. `~/.config/nyxboot`

use anyhow::{Context, Result};
use std::path::PathBuf;

/// Environment variable for an explicit config file
pub const ENV_CONFIG_FILE: &str = "NYXBOOT_CONFIG";

/// Environment variable for config directory override
pub const ENV_CONFIG_DIR: &str = "NYXBOOT_CONFIG_DIR";

/// Config file name inside the config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Get the nyxboot config directory path
pub fn config_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = expand(&dir);
        log::debug!(
            "Using config dir from {}: {}",
            ENV_CONFIG_DIR,
            path.display()
        );
        return Ok(path);
    }

    if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
        let path = PathBuf::from(xdg_config).join("nyxboot");
        log::debug!("Using XDG_CONFIG_HOME: {}", path.display());
        return Ok(path);
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    let path = home.join(".config").join("nyxboot");
    log::debug!("Using default config dir: {}", path.display());
    Ok(path)
}

/// Get the default config file path
pub fn config_file() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

/// Expand `~` and environment variables in a path
///
/// Unknown variables are left as-is.
pub fn expand(path: &str) -> PathBuf {
    let expanded = shellexpand::full(path).unwrap_or(std::borrow::Cow::Borrowed(path));
    PathBuf::from(expanded.as_ref())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::env;
    use std::sync::{Mutex, MutexGuard};

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    /// Serialize tests that touch the process environment
    pub(crate) fn env_lock() -> MutexGuard<'static, ()> {
        ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Run `f` with `key` set to `value`, restoring the old value afterwards
    pub(crate) fn with_env_var<F, R>(key: &str, value: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: callers hold env_lock, so no other test reads the environment concurrently
        unsafe { env::set_var(key, value) };
        let result = f();
        match original {
            // SAFETY: as above
            Some(v) => unsafe { env::set_var(key, v) },
            None => unsafe { env::remove_var(key) },
        }
        result
    }

    /// Run `f` with `key` removed, restoring the old value afterwards
    pub(crate) fn without_env_var<F, R>(key: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let original = env::var(key).ok();
        // SAFETY: callers hold env_lock
        unsafe { env::remove_var(key) };
        let result = f();
        if let Some(v) = original {
            // SAFETY: as above
            unsafe { env::set_var(key, v) };
        }
        result
    }

    #[test]
    fn test_config_dir_env_override() {
        let _guard = env_lock();
        with_env_var(ENV_CONFIG_DIR, "/custom/nyxboot", || {
            assert_eq!(config_dir().unwrap(), PathBuf::from("/custom/nyxboot"));
            assert_eq!(
                config_file().unwrap(),
                PathBuf::from("/custom/nyxboot/config.toml")
            );
        });
    }

    #[test]
    fn test_config_dir_env_override_with_tilde() {
        let _guard = env_lock();
        let home = dirs::home_dir().unwrap();
        with_env_var(ENV_CONFIG_DIR, "~/dotfiles/nyxboot", || {
            assert_eq!(config_dir().unwrap(), home.join("dotfiles").join("nyxboot"));
        });
    }

    #[test]
    fn test_xdg_config_home() {
        let _guard = env_lock();
        without_env_var(ENV_CONFIG_DIR, || {
            with_env_var("XDG_CONFIG_HOME", "/tmp/xdg-config-test", || {
                assert_eq!(
                    config_dir().unwrap(),
                    PathBuf::from("/tmp/xdg-config-test/nyxboot")
                );
            });
        });
    }

    #[cfg(unix)]
    #[test]
    fn test_default_config_dir_unix() {
        let _guard = env_lock();
        without_env_var(ENV_CONFIG_DIR, || {
            without_env_var("XDG_CONFIG_HOME", || {
                let home = dirs::home_dir().unwrap();
                assert_eq!(config_dir().unwrap(), home.join(".config").join("nyxboot"));
            });
        });
    }

    #[test]
    fn test_expand_absolute() {
        assert_eq!(expand("/opt/QQ"), PathBuf::from("/opt/QQ"));
    }

    #[test]
    fn test_expand_unknown_env_var_unchanged() {
        let result = expand("/path/$NONEXISTENT_NYXBOOT_VAR/file");
        assert_eq!(result, PathBuf::from("/path/$NONEXISTENT_NYXBOOT_VAR/file"));
    }
}
