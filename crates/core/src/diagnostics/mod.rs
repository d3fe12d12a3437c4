use std::any::Any;
use std::io::{self, Write};
use std::panic;
use std::path::PathBuf;
use std::sync::{Once, OnceLock};

use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::Registry;
use tracing_subscriber::{
    filter::{EnvFilter, LevelFilter},
    fmt,
    prelude::*,
    util::SubscriberInitExt,
};

#[cfg(debug_assertions)]
use better_panic::{Settings, Verbosity};

#[cfg(not(debug_assertions))]
use human_panic::setup_panic;

/// Environment variable holding an `EnvFilter` directive string
pub const LOG_FILTER_ENV: &str = "MEASURE_LOG";
/// Environment variable overriding the log file directory
pub const LOG_DIR_ENV: &str = "MEASURE_LOG_DIR";
/// Environment variable overriding the default level
pub const LOG_LEVEL_ENV: &str = "MEASURE_LOG_LEVEL";

static INIT: Once = Once::new();
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Logging and panic reporting settings
#[derive(Debug, Clone, PartialEq)]
pub struct DiagnosticsConfig {
    /// Directory for the daily-rolling JSON log file; `None` disables file logging
    pub log_dir: Option<PathBuf>,
    /// File name prefix of the rolling log file
    pub file_prefix: String,
    /// Level used when `MEASURE_LOG` is not set
    pub default_level: LevelFilter,
    /// Mirror logs to stderr. Leave off while a full-screen UI owns the terminal.
    pub console: bool,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            log_dir: Some(PathBuf::from("logs")),
            file_prefix: "measure.log".to_string(),
            default_level: LevelFilter::INFO,
            console: true,
        }
    }
}

impl DiagnosticsConfig {
    /// Defaults overridden by `MEASURE_LOG_DIR` and `MEASURE_LOG_LEVEL`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`.
    ///
    /// An empty log directory disables file logging; an unparsable level is
    /// ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup(LOG_DIR_ENV) {
            config.log_dir = (!dir.trim().is_empty()).then(|| PathBuf::from(dir.trim()));
        }
        if let Some(level) = lookup(LOG_LEVEL_ENV)
            && let Ok(level) = level.trim().parse::<LevelFilter>()
        {
            config.default_level = level;
        }

        config
    }

    /// Same configuration without the stderr layer
    pub fn without_console(mut self) -> Self {
        self.console = false;
        self
    }
}

/// Install the tracing subscriber and the panic hooks.
///
/// - **Debug builds** use `better_panic` for verbose backtraces.
/// - **Release builds** use `human_panic` for a user-facing crash report.
///
/// Every panic is also logged through `tracing` before the installed handler
/// runs. Only the first call has an effect.
pub fn init_diagnostics(config: &DiagnosticsConfig) {
    INIT.call_once(|| {
        let env_filter = EnvFilter::try_from_env(LOG_FILTER_ENV)
            .unwrap_or_else(|_| EnvFilter::default().add_directive(config.default_level.into()));

        let console_layer = config
            .console
            .then(|| fmt::Layer::new().with_writer(io::stderr));

        let file_layer = config.log_dir.as_ref().map(|dir| {
            let file_appender = tracing_appender::rolling::daily(dir, &config.file_prefix);
            let (non_blocking_appender, guard) = tracing_appender::non_blocking(file_appender);
            let _ = LOG_GUARD.set(guard);
            fmt::Layer::new().with_writer(non_blocking_appender).json()
        });

        let installed = Registry::default()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer)
            .try_init()
            .is_ok();

        #[cfg(debug_assertions)]
        {
            Settings::auto()
                .most_recent_first(false)
                .lineno_suffix(true)
                .verbosity(Verbosity::Full)
                .install();
            info!(installed, "Panic handler configured for DEBUG (better_panic).");
        }

        #[cfg(not(debug_assertions))]
        {
            setup_panic!();
            info!(installed, "Panic handler configured for RELEASE (human_panic).");
        }

        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            error!(
                target: "panic_handler",
                location = %panic_info.location().map_or("Unknown".to_string(), |l| format!("{}:{}:{}", l.file(), l.line(), l.column())),
                payload = %panic_reason(panic_info.payload()),
                "Application panicked"
            );
            original_hook(panic_info);
            let _ = io::stderr().flush();
        }));
    });
}

/// Executes a closure and catches any panics that occur, returning a Result.
///
/// ```
/// use measure_core::diagnostics::catch_panic;
///
/// assert_eq!(catch_panic(|| 42).ok(), Some(42));
/// assert!(catch_panic(|| panic!("fail!")).is_err());
/// ```
pub fn catch_panic<T, F>(f: F) -> Result<T, Box<dyn Any + Send + 'static>>
where
    F: FnOnce() -> T + std::panic::UnwindSafe,
{
    std::panic::catch_unwind(f)
}

/// Best-effort text of a panic payload
pub fn panic_reason(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<unknown panic>".to_string()
    }
}
