//! NapCat bridge plugin
//!
//! Installs the headless display packages, drops the loader script next to
//! QQ's application files, unpacks the NapCat shell and points QQ's
//! `package.json` at the loader.

use std::fmt;
use std::fs;
use std::io;

use fetchkit::{ArchiveReport, DownloadTask, archive, manifest};
use serde_json::Value;
use stepkit::{InstallStep, ProbeState, Requirement, StepError};

use super::StepContext;
use crate::apt;
use crate::config::NapCatConfig;

/// Loader script QQ runs instead of its own entry point
pub const LOADER_SCRIPT: &[u8] = include_bytes!("../../assets/loadNapCat.cjs");

/// Value of `main` in QQ's package.json once patched
pub const LOADER_ENTRY: &str = "./loadNapCat.cjs";

/// What the operator does after installation
pub const NEXT_STEPS: [&str; 3] = [
    "Start QQ headless and log in: xvfb-run -a qq --no-sandbox -q <QQ number>",
    "In the NapCat WebUI, add a WebSocket server and set the message format to Array",
    "Connect NyxBot to it in client mode, e.g. ws://127.0.0.1:6666",
];

pub struct NapCatStep<'a> {
    ctx: &'a StepContext<'a>,
}

impl<'a> NapCatStep<'a> {
    pub fn new(ctx: &'a StepContext<'a>) -> Self {
        Self { ctx }
    }

    fn config(&self) -> &NapCatConfig {
        &self.ctx.config.napcat
    }

    fn install_plugin_files(&self) -> Result<(), StepError> {
        let plugin_dir = self.config().plugin_dir();
        if archive::is_populated(&plugin_dir) {
            self.ctx
                .reporter
                .info(&format!("{} already present", plugin_dir.display()));
            return Ok(());
        }

        let mut task = DownloadTask::unique_in(
            &self.ctx.config.system.download_dir,
            "napcat",
            "zip",
            &self.config().archive_url,
        );
        self.ctx.reporter.info("Downloading NapCat...");
        self.ctx.fetcher.fetch(&mut task)?;

        match archive::install_archive(&task.dest, &plugin_dir)? {
            ArchiveReport::Extracted { entries } => {
                log::debug!("extracted {entries} entries into {}", plugin_dir.display());
            }
            ArchiveReport::AlreadyPresent => {}
        }
        task.discard()?;
        Ok(())
    }
}

impl fmt::Debug for NapCatStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NapCatStep")
            .field("config", self.config())
            .finish()
    }
}

impl InstallStep for NapCatStep<'_> {
    fn id(&self) -> &'static str {
        "napcat"
    }

    fn label(&self) -> String {
        "NapCat plugin".to_string()
    }

    fn requirement(&self) -> Requirement {
        Requirement::Optional
    }

    // Chosen explicitly by the operator, so it always runs. Each part below
    // is safe to repeat. Only apt goes through sudo, so QQ's directory must
    // be writable by this process before anything is installed.
    fn precondition(&self) -> Result<ProbeState, StepError> {
        let app_dir = &self.config().app_dir;
        if !app_dir.is_dir() {
            return Err(StepError::io(
                app_dir,
                io::Error::new(
                    io::ErrorKind::NotFound,
                    "QQ application directory not found; install Linux QQ first",
                ),
            ));
        }
        if !apt::is_writable(app_dir) {
            return Err(StepError::io(
                app_dir,
                io::Error::new(
                    io::ErrorKind::PermissionDenied,
                    "not writable by this user; run nyxboot as root",
                ),
            ));
        }
        Ok(ProbeState::Unsatisfied)
    }

    fn remediate(&self) -> Result<(), StepError> {
        let config = self.config();
        let packages: Vec<&str> = config.packages.iter().map(String::as_str).collect();
        self.ctx
            .reporter
            .info(&format!("Installing {}...", packages.join(" ")));
        self.ctx.packages.install(&packages)?;

        let loader = config.loader_path();
        fs::write(&loader, LOADER_SCRIPT).map_err(|e| StepError::io(&loader, e))?;
        log::debug!("wrote {}", loader.display());

        self.install_plugin_files()?;

        manifest::patch_json_field(
            &config.manifest_path(),
            "main",
            Value::String(LOADER_ENTRY.to_string()),
        )?;

        self.ctx.reporter.success("NapCat installed");
        for line in NEXT_STEPS {
            self.ctx.reporter.info(line);
        }
        Ok(())
    }
}

/// Installation state, for reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NapCatStatus {
    pub loader_present: bool,
    pub plugin_present: bool,
    /// `main` in QQ's package.json; `None` if missing or unreadable
    pub manifest_main: Option<String>,
}

impl NapCatStatus {
    pub fn probe(config: &NapCatConfig) -> Self {
        let manifest_main = match manifest::read_json_field(&config.manifest_path(), "main") {
            Ok(Some(Value::String(main))) => Some(main),
            Ok(_) => None,
            Err(e) => {
                log::debug!("could not read QQ manifest: {e}");
                None
            }
        };
        Self {
            loader_present: config.loader_path().exists(),
            plugin_present: archive::is_populated(&config.plugin_dir()),
            manifest_main,
        }
    }

    pub fn is_installed(&self) -> bool {
        self.loader_present
            && self.plugin_present
            && self.manifest_main.as_deref() == Some(LOADER_ENTRY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::fixture::Fixture;
    use fetchkit::MockFetcher;
    use std::io::Write;
    use stepkit::{Level, PackageCall, StepOutcome, run_step};

    fn napcat_zip() -> Vec<u8> {
        let mut buf = std::io::Cursor::new(Vec::new());
        {
            let mut zip = zip::ZipWriter::new(&mut buf);
            let options = zip::write::SimpleFileOptions::default();
            zip.start_file("napcat.mjs", options).unwrap();
            zip.write_all(b"export {}").unwrap();
            zip.add_directory("config", options).unwrap();
            zip.start_file("config/webui.json", options).unwrap();
            zip.write_all(b"{}").unwrap();
            zip.finish().unwrap();
        }
        buf.into_inner()
    }

    fn qq_installed(fx: &Fixture) {
        let app_dir = &fx.config.napcat.app_dir;
        fs::create_dir_all(app_dir).unwrap();
        fs::write(
            fx.config.napcat.manifest_path(),
            r#"{"name": "qq", "main": "./application/app_launcher/index.js", "version": "3.2.21"}"#,
        )
        .unwrap();
    }

    #[test]
    fn test_fresh_install() {
        let fx = Fixture::new("x86_64").with_fetcher(MockFetcher::new(napcat_zip()));
        qq_installed(&fx);
        let ctx = fx.ctx();

        let outcome = run_step(&NapCatStep::new(&ctx));
        assert!(matches!(outcome, StepOutcome::Remediated), "{outcome:?}");

        let napcat = &fx.config.napcat;
        assert_eq!(
            fx.apt.calls(),
            vec![PackageCall::Packages(vec!["xvfb".into(), "xauth".into()])]
        );
        assert_eq!(fs::read(napcat.loader_path()).unwrap(), LOADER_SCRIPT);
        assert!(napcat.plugin_dir().join("config/webui.json").exists());
        assert_eq!(fx.fetcher.calls()[0].0, napcat.archive_url);
        assert!(fx.downloads().is_empty());

        let status = NapCatStatus::probe(napcat);
        assert!(status.is_installed());
        assert!(fx.reporter.contains(Level::Info, "xvfb-run -a qq --no-sandbox"));

        let patched: Value =
            serde_json::from_str(&fs::read_to_string(napcat.manifest_path()).unwrap()).unwrap();
        assert_eq!(patched["version"], "3.2.21");
    }

    #[test]
    fn test_rerun_skips_download_when_plugin_present() {
        let fx = Fixture::new("x86_64").with_fetcher(MockFetcher::new(napcat_zip()));
        qq_installed(&fx);
        let ctx = fx.ctx();

        assert!(run_step(&NapCatStep::new(&ctx)).is_success());
        assert!(run_step(&NapCatStep::new(&ctx)).is_success());

        assert_eq!(fx.fetcher.calls().len(), 1);
        assert_eq!(fx.apt.calls().len(), 2);
        assert!(NapCatStatus::probe(&fx.config.napcat).is_installed());
    }

    #[test]
    fn test_corrupt_archive_keeps_download_and_manifest() {
        let fx = Fixture::new("x86_64").with_fetcher(MockFetcher::new(b"not a zip".to_vec()));
        qq_installed(&fx);
        let ctx = fx.ctx();

        let outcome = run_step(&NapCatStep::new(&ctx));
        assert!(matches!(
            outcome.failure(),
            Some(StepError::Artifact(fetchkit::Error::Archive { .. }))
        ));
        assert_eq!(fx.downloads().len(), 1);
        assert!(!archive::is_populated(&fx.config.napcat.plugin_dir()));
        assert_eq!(
            NapCatStatus::probe(&fx.config.napcat).manifest_main.as_deref(),
            Some("./application/app_launcher/index.js")
        );
    }

    #[test]
    fn test_missing_qq_fails_before_installing() {
        let fx = Fixture::new("x86_64").with_fetcher(MockFetcher::new(napcat_zip()));
        let ctx = fx.ctx();

        let outcome = run_step(&NapCatStep::new(&ctx));
        let err = outcome.failure().unwrap();
        assert!(matches!(err, StepError::Io { .. }));
        assert!(err.to_string().contains("install Linux QQ first"));
        assert!(fx.apt.calls().is_empty());
        assert!(fx.fetcher.calls().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_read_only_app_dir_fails_before_installing() {
        use std::os::unix::fs::PermissionsExt;

        if apt::is_root() {
            // root can write anywhere, nothing to check
            return;
        }
        let fx = Fixture::new("x86_64").with_fetcher(MockFetcher::new(napcat_zip()));
        qq_installed(&fx);
        let app_dir = &fx.config.napcat.app_dir;
        fs::set_permissions(app_dir, fs::Permissions::from_mode(0o555)).unwrap();
        let ctx = fx.ctx();

        let outcome = run_step(&NapCatStep::new(&ctx));
        fs::set_permissions(app_dir, fs::Permissions::from_mode(0o755)).unwrap();

        let err = outcome.failure().unwrap();
        assert!(err.to_string().contains("run nyxboot as root"));
        assert!(fx.apt.calls().is_empty());
        assert!(fx.fetcher.calls().is_empty());
        assert!(!fx.config.napcat.loader_path().exists());
    }

    #[test]
    fn test_loader_script_is_the_upstream_asset() {
        let script = std::str::from_utf8(LOADER_SCRIPT).unwrap();
        assert!(script.starts_with("const fs = require(\"fs\");\n"));
        assert!(script.contains(
            "await import(\"file://\" + path.join(CurrentPath, \"./napcat/napcat.mjs\"));"
        ));
        assert!(script.contains("./application.asar/app_launcher/index.js"));
        assert!(!script.contains("/path/to/napcat"));
        assert!(script.ends_with('}'));
    }

    #[test]
    fn test_status_of_untouched_machine() {
        let fx = Fixture::new("x86_64");
        let status = NapCatStatus::probe(&fx.config.napcat);
        assert!(!status.is_installed());
        assert_eq!(status.manifest_main, None);
    }
}
