// src/logging.rs
// =============================================================================
// Sets up logging to stderr.
//
// Without --verb only warnings and errors are shown (for example the
// "missing http://" warning). With --verb everything down to trace level is
// printed. RUST_LOG is read first, the flag then sets the level on top of it.
//
// stdout is reserved for the result lines, so logs never mix with them.
// =============================================================================

use log::{debug, LevelFilter};

// Returns the log level for the given verbosity
pub fn level_for(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Trace
    } else {
        LevelFilter::Warn
    }
}

// Initializes the global logger
//
// Calling it a second time (as tests do) leaves the first logger in place.
pub fn init_logger(verbose: bool) {
    let level = level_for(verbose);

    let _ = env_logger::Builder::from_default_env()
        .filter_level(level)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(false)
        .try_init();

    debug!("Logger initialized with level: {level:?}");
}
