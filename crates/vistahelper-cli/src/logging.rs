// Logging and verbosity control

use std::sync::atomic::{AtomicU8, Ordering};

use tracing_subscriber::EnvFilter;

/// Global verbosity level
static VERBOSITY: AtomicU8 = AtomicU8::new(1);

/// Verbosity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerbosityLevel {
    /// Quiet mode - errors only
    Quiet = 0,
    /// Normal mode - standard output
    Normal = 1,
    /// Verbose mode - detailed output
    Verbose = 2,
}

impl VerbosityLevel {
    /// Level selected by the CLI flags; quiet wins over verbose
    pub fn from_flags(verbose: bool, quiet: bool) -> Self {
        if quiet {
            VerbosityLevel::Quiet
        } else if verbose {
            VerbosityLevel::Verbose
        } else {
            VerbosityLevel::Normal
        }
    }

    /// Get the current verbosity level
    pub fn current() -> Self {
        match VERBOSITY.load(Ordering::Relaxed) {
            0 => VerbosityLevel::Quiet,
            1 => VerbosityLevel::Normal,
            _ => VerbosityLevel::Verbose,
        }
    }

    /// Set the verbosity level
    pub fn set(level: Self) {
        VERBOSITY.store(level as u8, Ordering::Relaxed);
    }

    /// Check if we should output at this level
    pub fn should_output(&self) -> bool {
        self <= &Self::current()
    }

    /// Default tracing filter for this level
    pub fn filter_directive(self) -> &'static str {
        match self {
            VerbosityLevel::Quiet => "error",
            VerbosityLevel::Normal => "warn",
            VerbosityLevel::Verbose => "debug",
        }
    }
}

/// Initialize logging based on CLI flags
///
/// `RUST_LOG` takes precedence over the flags. Logs go to stderr so command
/// output on stdout stays clean.
pub fn init_logging(verbose: bool, quiet: bool) {
    let level = VerbosityLevel::from_flags(verbose, quiet);
    VerbosityLevel::set(level);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.filter_directive()));

    // A subscriber may already be installed, e.g. when commands run in tests
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
