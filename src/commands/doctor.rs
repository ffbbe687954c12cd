use anyhow::Result;
use colored::Colorize;
use std::path::Path;

use stepkit::{InstallStep, ProbeState, count_attention, probe_all};

use crate::steps::napcat::{LOADER_ENTRY, NapCatStatus};
use crate::steps::{BridgeAppStep, PlatformGate, RuntimeStep, StepContext};
use crate::ui;

pub struct Issue {
    pub category: &'static str,
    pub summary: String,
    pub detail: Option<String>,
    pub fix: Option<String>,
    pub fix_cmd: Option<String>,
}

/// Read-only environment report
///
/// `config_file` is the file the configuration was loaded from, if any.
pub fn run(ctx: &StepContext<'_>, config_file: Option<&Path>) -> Result<()> {
    ui::banner();
    ui::header("Environment Check");

    let issues = diagnose(ctx, config_file);

    println!();
    if issues.is_empty() {
        ui::success("Ready to bootstrap NyxBot!");
    } else {
        print_issue_summary(&issues);
    }

    Ok(())
}

/// Probe everything the bootstrap would touch, without changing anything
pub fn diagnose(ctx: &StepContext<'_>, config_file: Option<&Path>) -> Vec<Issue> {
    let mut issues: Vec<Issue> = Vec::new();

    check_config(config_file);
    check_platform(ctx, &mut issues);
    check_steps(ctx, &mut issues);
    check_napcat(ctx, &mut issues);

    issues
}

fn print_issue_summary(issues: &[Issue]) {
    ui::header(&format!("{} to fix", issues.len()));

    for (i, issue) in issues.iter().enumerate() {
        println!(
            "  {} {} {}",
            format!("{}.", i + 1).bold(),
            issue.summary,
            format!("[{}]", issue.category).dimmed()
        );
        if let Some(detail) = &issue.detail {
            println!("     {}", detail.dimmed());
        }
        if let Some(fix) = &issue.fix {
            println!("     {fix}");
        }
    }

    // Several missing pieces are all fixed by one `nyxboot run`.
    let commands = fix_commands(issues);
    if !commands.is_empty() {
        println!();
        for cmd in commands {
            println!("  {} {}", "$".dimmed(), cmd.bold());
        }
    }
}

/// Distinct fix commands, in the order the issues were found
fn fix_commands(issues: &[Issue]) -> Vec<&str> {
    let mut commands: Vec<&str> = Vec::new();
    for cmd in issues.iter().filter_map(|i| i.fix_cmd.as_deref()) {
        if !commands.contains(&cmd) {
            commands.push(cmd);
        }
    }
    commands
}

fn check_config(config_file: Option<&Path>) {
    ui::section("Configuration");

    match config_file {
        Some(path) => ui::kv("file", &path.display().to_string()),
        None => println!(
            "  {} {}",
            "○".dimmed(),
            "No config file, using built-in defaults".dimmed()
        ),
    }
}

fn check_platform(ctx: &StepContext<'_>, issues: &mut Vec<Issue>) {
    ui::section("Platform");

    let platform = ctx.platform;
    ui::kv("family", &platform.os_family);
    ui::kv("machine", &platform.machine);
    ui::kv("architecture", platform.arch.as_str());

    if !platform.arch.is_known() {
        issues.push(Issue {
            category: "Platform",
            summary: format!("No Linux QQ package for machine '{}'", platform.machine),
            detail: Some("Packages exist for x64, arm and mips machines".into()),
            fix: Some("Install Linux QQ by hand before running the bootstrap".into()),
            fix_cmd: None,
        });
    }
}

fn check_steps(ctx: &StepContext<'_>, issues: &mut Vec<Issue>) {
    ui::section("Requirements");

    let gate = PlatformGate::new(ctx);
    let runtime = RuntimeStep::new(ctx);
    let bridge_app = BridgeAppStep::new(ctx);
    let steps: [&dyn InstallStep; 3] = [&gate, &runtime, &bridge_app];

    let reports = probe_all(&steps);
    log::debug!(
        "{} of {} requirements need attention",
        count_attention(&reports),
        reports.len()
    );

    for report in reports {
        match &report.state {
            Ok(ProbeState::Satisfied { details }) => {
                let extra = details
                    .as_deref()
                    .map(|d| format!(" ({d})").dimmed().to_string())
                    .unwrap_or_default();
                println!("  {} {}{extra}", "✓".green(), report.label);
            }
            Ok(ProbeState::Unsatisfied) => {
                println!(
                    "  {} {} {}",
                    "✗".yellow(),
                    report.label,
                    "(missing)".yellow()
                );
                issues.push(missing_issue(ctx, report.id, &report.label));
            }
            Err(e) => {
                println!("  {} {} - {}", "✗".red(), report.label, e.to_string().red());
                issues.push(Issue {
                    category: "Requirements",
                    summary: format!("{} check failed", report.label),
                    detail: Some(e.to_string()),
                    fix: Some(e.category().advice().to_string()),
                    fix_cmd: None,
                });
            }
        }
    }
}

fn missing_issue(ctx: &StepContext<'_>, id: &str, label: &str) -> Issue {
    let (fix, fix_cmd) = match id {
        "runtime" => (
            "Install a Java runtime".to_string(),
            Some(format!(
                "sudo apt install -y {}",
                ctx.config.runtime.packages.join(" ")
            )),
        ),
        _ => (
            "Let the bootstrap download and install it".to_string(),
            Some("nyxboot run".to_string()),
        ),
    };
    Issue {
        category: "Requirements",
        summary: format!("{label} is not installed"),
        detail: None,
        fix: Some(fix),
        fix_cmd,
    }
}

fn check_napcat(ctx: &StepContext<'_>, issues: &mut Vec<Issue>) {
    ui::section("NapCat");

    let config = &ctx.config.napcat;
    let status = NapCatStatus::probe(config);

    let mark = |ok: bool| if ok { "✓".green() } else { "○".dimmed() };
    println!(
        "  {} loader {}",
        mark(status.loader_present),
        config.loader_path().display().to_string().dimmed()
    );
    println!(
        "  {} plugin {}",
        mark(status.plugin_present),
        config.plugin_dir().display().to_string().dimmed()
    );
    let main = status.manifest_main.as_deref().unwrap_or("unreadable");
    println!(
        "  {} package.json main = {}",
        mark(main == LOADER_ENTRY),
        main.dimmed()
    );

    // Not installing NapCat is a valid choice; a half-finished install is not.
    let parts = [
        status.loader_present,
        status.plugin_present,
        main == LOADER_ENTRY,
    ];
    if parts.contains(&true) && !status.is_installed() {
        issues.push(Issue {
            category: "NapCat",
            summary: "NapCat installation is incomplete".into(),
            detail: Some(format!("QQ resources at {}", config.app_dir.display())),
            fix: Some("Run the bootstrap again and choose NapCat".into()),
            fix_cmd: Some("nyxboot run".into()),
        });
    }
}
