//! Bootstrap configuration
//!
//! Every field has a built-in default, so a config file only needs the
//! values it changes:
//!
//! ```toml
//! [system]
//! download_dir = "/var/tmp"
//! sudo = "never"
//!
//! [bridge.urls]
//! arm = "https://mirror.example.com/QQ_arm64.deb"
//! ```

use anyhow::{Context, Result};
use fetchkit::Architecture;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    pub system: SystemConfig,
    pub runtime: RuntimeConfig,
    pub bridge: BridgeConfig,
    pub napcat: NapCatConfig,
    pub launch: LaunchConfig,
}

/// When package installs are prefixed with `sudo`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SudoMode {
    /// Only when not running as root
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Any of these existing means apt is installed
    pub apt_paths: Vec<PathBuf>,
    /// Where downloads are written before installation
    pub download_dir: PathBuf,
    pub sudo: SudoMode,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            apt_paths: vec![PathBuf::from("/usr/bin/apt"), PathBuf::from("/bin/apt")],
            download_dir: PathBuf::from("/tmp"),
            sudo: SudoMode::Auto,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub probe_paths: Vec<PathBuf>,
    pub packages: Vec<String>,
    /// Executable used to launch the bot
    pub command: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            probe_paths: vec![PathBuf::from("/usr/bin/java"), PathBuf::from("/bin/java")],
            packages: vec!["openjdk-21-jdk".to_string()],
            command: "java".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub probe_paths: Vec<PathBuf>,
    pub urls: BridgeUrls,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            probe_paths: vec![PathBuf::from("/bin/qq"), PathBuf::from("/usr/bin/qq")],
            urls: BridgeUrls::default(),
        }
    }
}

/// Linux QQ package per architecture class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeUrls {
    pub x64: String,
    pub arm: String,
    pub mips: String,
}

impl Default for BridgeUrls {
    fn default() -> Self {
        const BASE: &str = "https://dldir1v6.qq.com/qqfile/qq/QQNT/Linux";
        Self {
            x64: format!("{BASE}/QQ_3.2.21_251114_amd64_01.deb"),
            arm: format!("{BASE}/QQ_3.2.21_251114_arm64_01.deb"),
            mips: format!("{BASE}/QQ_3.2.21_251114_mips64el_01.deb"),
        }
    }
}

impl BridgeUrls {
    /// Package URL for `arch`, or `None` for an unknown architecture
    pub fn for_arch(&self, arch: Architecture) -> Option<&str> {
        match arch {
            Architecture::X64 => Some(&self.x64),
            Architecture::Arm => Some(&self.arm),
            Architecture::Mips => Some(&self.mips),
            Architecture::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NapCatConfig {
    pub archive_url: String,
    /// QQ's application resource directory
    pub app_dir: PathBuf,
    /// Packages for a headless display
    pub packages: Vec<String>,
}

impl Default for NapCatConfig {
    fn default() -> Self {
        Self {
            archive_url: "https://github.com/NapNeko/NapCatQQ/releases/download/v4.9.74/NapCat.Shell.zip"
                .to_string(),
            app_dir: PathBuf::from("/opt/QQ/resources/app"),
            packages: vec!["xvfb".to_string(), "xauth".to_string()],
        }
    }
}

impl NapCatConfig {
    pub fn loader_path(&self) -> PathBuf {
        self.app_dir.join("loadNapCat.cjs")
    }

    pub fn plugin_dir(&self) -> PathBuf {
        self.app_dir.join("napcat")
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.app_dir.join("package.json")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchConfig {
    pub default_port: String,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            default_port: "8080".to_string(),
        }
    }
}

impl BootstrapConfig {
    /// Config file that [`BootstrapConfig::load`] reads, if any
    ///
    /// An explicit path is returned as-is. Otherwise the default config file
    /// is returned when it exists.
    pub fn locate(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit {
            return Ok(Some(path.to_path_buf()));
        }
        let path = paths::config_file()?;
        if path.exists() {
            Ok(Some(path))
        } else {
            log::debug!("No config at {}, using defaults", path.display());
            Ok(None)
        }
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Otherwise the default config file is
    /// used if present, and built-in defaults if not.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        match Self::locate(explicit)? {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("Invalid config format in {}", path.display()))?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::paths::tests::{env_lock, with_env_var};

    #[test]
    fn test_defaults() {
        let config = BootstrapConfig::default();
        assert_eq!(config.runtime.packages, vec!["openjdk-21-jdk"]);
        assert_eq!(config.system.download_dir, PathBuf::from("/tmp"));
        assert_eq!(
            config.napcat.manifest_path(),
            PathBuf::from("/opt/QQ/resources/app/package.json")
        );
        assert_eq!(
            config.napcat.loader_path(),
            PathBuf::from("/opt/QQ/resources/app/loadNapCat.cjs")
        );
        assert_eq!(config.launch.default_port, "8080");
    }

    #[test]
    fn test_bridge_url_table() {
        let urls = BridgeUrls::default();
        assert!(urls.for_arch(Architecture::X64).unwrap().ends_with("_amd64_01.deb"));
        assert!(urls.for_arch(Architecture::Arm).unwrap().ends_with("_arm64_01.deb"));
        assert!(urls.for_arch(Architecture::Mips).unwrap().ends_with("_mips64el_01.deb"));
        assert_eq!(urls.for_arch(Architecture::Unknown), None);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
[system]
sudo = "never"

[bridge.urls]
arm = "https://mirror.example.com/qq-arm64.deb"
"#,
        )
        .unwrap();

        let config = BootstrapConfig::load(Some(&path)).unwrap();
        assert_eq!(config.system.sudo, SudoMode::Never);
        assert_eq!(config.system.download_dir, PathBuf::from("/tmp"));
        assert_eq!(config.bridge.urls.arm, "https://mirror.example.com/qq-arm64.deb");
        assert_eq!(config.bridge.urls.x64, BridgeUrls::default().x64);
        assert_eq!(config.runtime, RuntimeConfig::default());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[system\nsudo = ").unwrap();
        assert!(BootstrapConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BootstrapConfig::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_missing_default_file_gives_defaults() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        with_env_var(paths::ENV_CONFIG_DIR, dir.path().to_str().unwrap(), || {
            assert_eq!(BootstrapConfig::locate(None).unwrap(), None);
            assert_eq!(BootstrapConfig::load(None).unwrap(), BootstrapConfig::default());
        });
    }

    #[test]
    fn test_default_file_is_picked_up() {
        let _guard = env_lock();
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("config.toml"),
            "[launch]\ndefault_port = \"9090\"\n",
        )
        .unwrap();
        with_env_var(paths::ENV_CONFIG_DIR, dir.path().to_str().unwrap(), || {
            let config = BootstrapConfig::load(None).unwrap();
            assert_eq!(config.launch.default_port, "9090");
        });
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = BootstrapConfig::default();
        let rendered = toml::to_string(&config).unwrap();
        let parsed: BootstrapConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
