//=========================================================================
// Logger
//
// Category-based logging facility on top of the `log` facade.
//
// Categories map directly onto `log` targets, so every line written by
// the engine carries the subsystem it came from (`Engine`, `Graphics`,
// or any user-defined category). The sink is `env_logger`, configured
// once at startup through `LoggerBuilder`.
//
// Message format:
// ```text
// [12:34:56] Graphics: Create window "Ember Engine" (1280 x 720)
// ```
//
// Responsibilities:
// - Map engine verbosity levels onto `log::Level`
// - Install and configure the process-wide sink
// - Provide logging and assertion macros for engine code
//
//=========================================================================

//=== Imports =============================================================

use std::fmt;
use std::io::Write;

use chrono::Local;
use log::{Level, LevelFilter};

//=== Categories ==========================================================

/// Category used when none is given.
pub const GLOBAL_CATEGORY: &str = "Global";

/// Category for application lifecycle and event routing.
pub const ENGINE_CATEGORY: &str = "Engine";

/// Category for windowing and render context messages.
pub const GRAPHICS_CATEGORY: &str = "Graphics";

//=== Verbosity ===========================================================

/// Severity of a log message.
///
/// `Off` messages are never emitted. `Fatal` has no direct `log`
/// counterpart and is written at error level with a `FATAL` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Verbosity {
    Off,
    Trace,
    Info,
    Warning,
    Error,
    Fatal,
}

impl Verbosity {
    /// Level used when writing a message of this verbosity.
    ///
    /// Returns `None` for `Off`.
    pub fn level(self) -> Option<Level> {
        match self {
            Self::Off => None,
            Self::Trace => Some(Level::Trace),
            Self::Info => Some(Level::Info),
            Self::Warning => Some(Level::Warn),
            Self::Error | Self::Fatal => Some(Level::Error),
        }
    }

    /// Filter that lets through this verbosity and everything above it.
    pub fn level_filter(self) -> LevelFilter {
        match self.level() {
            Some(level) => level.to_level_filter(),
            None => LevelFilter::Off,
        }
    }
}

//=== Logger ==============================================================

/// Entry point of the logging facility.
pub struct Logger;

impl Logger {
    /// Starts configuring the process-wide sink.
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Installs the sink with default settings.
    ///
    /// Safe to call more than once; only the first call installs anything.
    pub fn init() {
        LoggerBuilder::new().init();
    }

    /// Writes a message in `category` at the given verbosity.
    ///
    /// Prefer the [`ember_log!`](crate::ember_log) macro, which builds the
    /// `fmt::Arguments` for you.
    pub fn log(category: &str, verbosity: Verbosity, args: fmt::Arguments<'_>) {
        let Some(level) = verbosity.level() else {
            return;
        };

        if verbosity == Verbosity::Fatal {
            log::log!(target: category, level, "FATAL: {}", args);
        } else {
            log::log!(target: category, level, "{}", args);
        }
    }
}

//=== LoggerBuilder =======================================================

/// Builder for the process-wide log sink.
///
/// # Default Values
///
/// - **Default verbosity**: `Trace` (everything is shown)
/// - **Categories**: no per-category overrides
///
/// `RUST_LOG`, when set, is applied on top of these settings.
///
/// # Examples
///
/// ```no_run
/// use ember_engine::logger::{Logger, Verbosity};
///
/// Logger::builder()
///     .with_default_verbosity(Verbosity::Info)
///     .with_category("Graphics", Verbosity::Warning)
///     .init();
/// ```
pub struct LoggerBuilder {
    default_verbosity: Verbosity,
    categories: Vec<(String, Verbosity)>,
}

impl LoggerBuilder {
    /// Creates a builder with default settings.
    pub fn new() -> Self {
        Self {
            default_verbosity: Verbosity::Trace,
            categories: Vec::new(),
        }
    }

    /// Sets the verbosity applied to categories without an override.
    pub fn with_default_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.default_verbosity = verbosity;
        self
    }

    /// Registers a category with its own minimum verbosity.
    ///
    /// Registering the same category twice keeps the last value.
    pub fn with_category(mut self, name: impl Into<String>, verbosity: Verbosity) -> Self {
        let name = name.into();
        self.categories.retain(|(existing, _)| *existing != name);
        self.categories.push((name, verbosity));
        self
    }

    /// Installs the sink.
    ///
    /// If a logger is already installed (for example by a test harness or
    /// an earlier call) this is a no-op.
    pub fn init(self) {
        let mut builder = env_logger::Builder::new();
        builder.filter_level(self.default_verbosity.level_filter());

        for (name, verbosity) in &self.categories {
            builder.filter_module(name, verbosity.level_filter());
        }

        builder
            .is_test(cfg!(test))
            .parse_env(env_logger::Env::default())
            .format(|buf, record| {
                let style = buf.default_level_style(record.level());
                writeln!(
                    buf,
                    "{style}[{}] {}: {}{style:#}",
                    Local::now().format(CLOCK_FORMAT),
                    record.target(),
                    record.args()
                )
            });

        if builder.try_init().is_err() {
            log::debug!(target: GLOBAL_CATEGORY, "Logger already initialized");
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Local wall-clock time at the start of each line.
const CLOCK_FORMAT: &str = "%H:%M:%S";

//=== Macros ==============================================================

/// Logs a formatted message.
///
/// ```no_run
/// use ember_engine::ember_log;
/// use ember_engine::logger::Verbosity;
///
/// ember_log!("Graphics", Verbosity::Info, "Swap interval set to {}", 1);
/// ember_log!(Verbosity::Warning, "Written to the global category");
/// ```
#[macro_export]
macro_rules! ember_log {
    ($verbosity:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::logger::Logger::log(
            $crate::logger::GLOBAL_CATEGORY,
            $verbosity,
            format_args!($fmt $(, $arg)*),
        )
    };
    ($category:expr, $verbosity:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        $crate::logger::Logger::log($category, $verbosity, format_args!($fmt $(, $arg)*))
    };
}

/// Asserts an invariant; logs the failure and panics if it does not hold.
#[macro_export]
macro_rules! ember_assert {
    ($cond:expr, $category:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        if !($cond) {
            $crate::logger::Logger::log(
                $category,
                $crate::logger::Verbosity::Error,
                format_args!(concat!("Assertion Failed: ", $fmt) $(, $arg)*),
            );
            panic!(concat!("Assertion Failed: ", $fmt) $(, $arg)*);
        }
    };
}

/// Asserts an invariant; logs the failure but keeps running.
#[macro_export]
macro_rules! ember_assert_nobreak {
    ($cond:expr, $category:expr, $fmt:literal $(, $arg:expr)* $(,)?) => {
        if !($cond) {
            $crate::logger::Logger::log(
                $category,
                $crate::logger::Verbosity::Error,
                format_args!(concat!("Assertion Failed: ", $fmt) $(, $arg)*),
            );
        }
    };
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_maps_to_log_levels() {
        assert_eq!(Verbosity::Off.level(), None, "Off must never be emitted");
        assert_eq!(Verbosity::Trace.level(), Some(Level::Trace));
        assert_eq!(Verbosity::Info.level(), Some(Level::Info));
        assert_eq!(Verbosity::Warning.level(), Some(Level::Warn));
        assert_eq!(Verbosity::Error.level(), Some(Level::Error));
        assert_eq!(Verbosity::Fatal.level(), Some(Level::Error), "Fatal is written at error level");
    }

    #[test]
    fn off_filter_blocks_everything() {
        assert_eq!(Verbosity::Off.level_filter(), LevelFilter::Off);
        assert_eq!(Verbosity::Warning.level_filter(), LevelFilter::Warn);
    }

    #[test]
    fn verbosity_is_ordered_by_severity() {
        assert!(Verbosity::Trace < Verbosity::Info);
        assert!(Verbosity::Error < Verbosity::Fatal);
    }

    #[test]
    fn builder_keeps_last_category_override() {
        let builder = LoggerBuilder::new()
            .with_category("Graphics", Verbosity::Info)
            .with_category("Graphics", Verbosity::Error);

        assert_eq!(builder.categories.len(), 1, "Duplicate category should be replaced");
        assert_eq!(builder.categories[0].1, Verbosity::Error);
    }

    #[test]
    fn init_twice_does_not_panic() {
        Logger::init();
        Logger::init();
    }

    #[test]
    fn clock_format_renders_hours_minutes_seconds() {
        let time = chrono::NaiveTime::from_hms_opt(8, 15, 42).unwrap();
        assert_eq!(time.format(CLOCK_FORMAT).to_string(), "08:15:42");
    }

    #[test]
    fn log_macro_accepts_global_and_named_categories() {
        ember_log!(Verbosity::Info, "global {}", 1);
        ember_log!(ENGINE_CATEGORY, Verbosity::Trace, "engine {}", 2);
        ember_log!(Verbosity::Off, "never shown");
    }

    #[test]
    #[should_panic(expected = "Assertion Failed: value was 3")]
    fn assert_macro_panics_on_failure() {
        let value = 3;
        ember_assert!(value == 4, ENGINE_CATEGORY, "value was {}", value);
    }

    #[test]
    fn assert_nobreak_macro_keeps_running() {
        ember_assert_nobreak!(false, ENGINE_CATEGORY, "logged only");
        ember_assert!(true, ENGINE_CATEGORY, "holds");
    }
}
