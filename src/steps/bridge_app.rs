use std::fmt;

use fetchkit::DownloadTask;
use stepkit::{InstallStep, ProbeState, StepError, probe_paths};

use super::StepContext;

/// Linux QQ presence
///
/// Remediation picks the package for the machine's architecture class,
/// downloads it, installs it with apt and removes the download. An unknown
/// architecture fails before anything is fetched.
pub struct BridgeAppStep<'a> {
    ctx: &'a StepContext<'a>,
}

impl<'a> BridgeAppStep<'a> {
    pub fn new(ctx: &'a StepContext<'a>) -> Self {
        Self { ctx }
    }

    /// Package URL for this machine
    pub fn package_url(&self) -> Result<&'a str, StepError> {
        let platform = self.ctx.platform;
        self.ctx
            .config
            .bridge
            .urls
            .for_arch(platform.arch)
            .ok_or_else(|| {
                StepError::UnsupportedPlatform(format!(
                    "no Linux QQ package for machine '{}'",
                    platform.machine
                ))
            })
    }
}

impl fmt::Debug for BridgeAppStep<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeAppStep")
            .field("config", &self.ctx.config.bridge)
            .field("arch", &self.ctx.platform.arch)
            .finish()
    }
}

impl InstallStep for BridgeAppStep<'_> {
    fn id(&self) -> &'static str {
        "bridge-app"
    }

    fn label(&self) -> String {
        "Linux QQ".to_string()
    }

    fn precondition(&self) -> Result<ProbeState, StepError> {
        Ok(probe_paths(&self.ctx.config.bridge.probe_paths))
    }

    fn remediate(&self) -> Result<(), StepError> {
        let url = self.package_url()?;
        let mut task = DownloadTask::unique_in(
            &self.ctx.config.system.download_dir,
            "linuxqq",
            "deb",
            url,
        );

        self.ctx.reporter.info(&format!(
            "Downloading Linux QQ for {}...",
            self.ctx.platform.arch
        ));
        self.ctx.fetcher.fetch(&mut task)?;

        self.ctx.reporter.info("Installing Linux QQ...");
        self.ctx.packages.install_file(&task.dest)?;

        task.discard()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::steps::fixture::Fixture;
    use fetchkit::MockFetcher;
    use stepkit::{MockPackageManager, PackageCall, StepOutcome, run_step};

    #[test]
    fn test_installed_qq_is_left_alone() {
        let fx = Fixture::new("x86_64");
        Fixture::touch(&fx.config.bridge.probe_paths[1]);
        let ctx = fx.ctx();

        assert!(matches!(
            run_step(&BridgeAppStep::new(&ctx)),
            StepOutcome::AlreadySatisfied
        ));
        assert!(fx.fetcher.calls().is_empty());
    }

    #[test]
    fn test_arm_machine_fetches_arm_package_and_cleans_up() {
        let fx = Fixture::new("aarch64");
        let ctx = fx.ctx();

        let outcome = run_step(&BridgeAppStep::new(&ctx));
        assert!(matches!(outcome, StepOutcome::Remediated));

        let calls = fx.fetcher.calls();
        assert_eq!(calls.len(), 1);
        let (url, dest) = &calls[0];
        assert_eq!(url, &fx.config.bridge.urls.arm);
        assert!(dest.starts_with(&fx.config.system.download_dir));
        let name = dest.file_name().unwrap().to_string_lossy();
        assert!(name.starts_with("linuxqq-") && name.ends_with(".deb"));

        assert_eq!(fx.apt.calls(), vec![PackageCall::File(dest.clone())]);
        assert!(!dest.exists());
    }

    #[test]
    fn test_unknown_machine_fails_before_fetch() {
        let fx = Fixture::new("riscv64");
        let ctx = fx.ctx();

        let outcome = run_step(&BridgeAppStep::new(&ctx));
        let err = outcome.failure().unwrap();
        assert!(err.is_unsupported_platform());
        assert!(err.to_string().contains("riscv64"));
        assert!(fx.fetcher.calls().is_empty());
        assert!(fx.apt.calls().is_empty());
    }

    #[test]
    fn test_fetch_failure_names_url_and_destination() {
        let fx = Fixture::new("x86_64").with_fetcher(MockFetcher::failing());
        let ctx = fx.ctx();

        let outcome = run_step(&BridgeAppStep::new(&ctx));
        let message = outcome.failure().unwrap().to_string();
        assert!(message.contains(&fx.config.bridge.urls.x64));
        assert!(message.contains("linuxqq-"));
        assert!(fx.apt.calls().is_empty());
    }

    #[test]
    fn test_install_failure_keeps_download() {
        let fx = Fixture::new("mips64").with_apt(MockPackageManager::failing());
        let ctx = fx.ctx();

        let outcome = run_step(&BridgeAppStep::new(&ctx));
        assert!(matches!(outcome.failure(), Some(StepError::Process { .. })));
        assert_eq!(fx.fetcher.calls()[0].0, fx.config.bridge.urls.mips);
        assert_eq!(fx.downloads().len(), 1);
    }
}
