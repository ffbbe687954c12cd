use colored::Colorize;
use stepkit::Reporter;

/// Print an info message
pub fn info(msg: &str) {
    println!("{} {}", "ℹ".blue(), msg);
}

/// Print a success message
pub fn success(msg: &str) {
    println!("{} {}", "✓".green(), msg);
}

/// Print a warning message
pub fn warn(msg: &str) {
    println!("{} {}", "⚠".yellow(), msg);
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

/// Print a header/title
pub fn header(title: &str) {
    println!();
    println!("{}", title.bold());
    println!("{}", "─".repeat(title.chars().count()).dimmed());
}

/// Print a section header
pub fn section(title: &str) {
    println!();
    println!("{}", title.cyan().bold());
}

/// Print a key-value pair
pub fn kv(key: &str, value: &str) {
    println!("  {}: {}", key.dimmed(), value);
}

/// Print the nyxboot banner
pub fn banner() {
    println!(
        "{}",
        r"
  ███╗   ██╗██╗   ██╗██╗  ██╗██████╗  ██████╗  ██████╗ ████████╗
  ████╗  ██║╚██╗ ██╔╝╚██╗██╔╝██╔══██╗██╔═══██╗██╔═══██╗╚══██╔══╝
  ██╔██╗ ██║ ╚████╔╝  ╚███╔╝ ██████╔╝██║   ██║██║   ██║   ██║
  ██║╚██╗██║  ╚██╔╝   ██╔██╗ ██╔══██╗██║   ██║██║   ██║   ██║
  ██║ ╚████║   ██║   ██╔╝ ██╗██████╔╝╚██████╔╝╚██████╔╝   ██║
  ╚═╝  ╚═══╝   ╚═╝   ╚═╝  ╚═╝╚═════╝  ╚═════╝  ╚═════╝    ╚═╝
"
        .cyan()
    );
}

/// [`Reporter`] that prints to the terminal
///
/// In quiet mode only warnings and errors are shown.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter {
    quiet: bool,
}

impl ConsoleReporter {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, msg: &str) {
        if !self.quiet {
            info(msg);
        }
    }

    fn success(&self, msg: &str) {
        if !self.quiet {
            success(msg);
        }
    }

    fn warn(&self, msg: &str) {
        warn(msg);
    }

    fn error(&self, msg: &str) {
        error(msg);
    }

    fn section(&self, title: &str) {
        if !self.quiet {
            section(title);
        }
    }
}
