use std::env;
use std::sync::OnceLock;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::{LevelFilter, Targets};

/// Target that activity-log events are filtered under.
pub const EVENT_TARGET: &str = "portfolio_client::events";

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Trace = 0,
    Debug = 1,
    Info = 2,
    Warn = 3,
    Error = 4,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

/// `RUST_LOG` directives applied to activity-log events.
///
/// Directives are matched per target, so `reqwest=debug,portfolio_client=warn`
/// hides info events from this client while leaving reqwest verbose.
#[derive(Debug, Clone)]
pub struct EventFilter {
    targets: Targets,
}

impl EventFilter {
    /// Parses a directive string. Blank or unparseable input falls back to `info`.
    pub fn parse(directives: &str) -> Self {
        let targets = if directives.trim().is_empty() {
            None
        } else {
            directives.parse::<Targets>().ok()
        };
        Self {
            targets: targets.unwrap_or_else(|| Targets::new().with_default(LevelFilter::INFO)),
        }
    }

    pub fn from_env() -> Self {
        Self::parse(&env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default())
    }

    pub fn allows(&self, level: LogLevel) -> bool {
        self.targets.would_enable(EVENT_TARGET, &level.into())
    }
}

pub fn should_log_with_env(event_level: LogLevel) -> bool {
    static FILTER: OnceLock<EventFilter> = OnceLock::new();
    FILTER.get_or_init(EventFilter::from_env).allows(event_level)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a stderr subscriber for headless runs. `log` records from this
/// crate and its dependencies are forwarded into it. Safe to call twice.
pub fn init_headless_logger() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_level_applies_to_events() {
        let filter = EventFilter::parse("warn");
        assert!(filter.allows(LogLevel::Error));
        assert!(filter.allows(LogLevel::Warn));
        assert!(!filter.allows(LogLevel::Info));
    }

    #[test]
    fn crate_directive_wins_over_other_targets() {
        let filter = EventFilter::parse("reqwest=debug,portfolio_client=warn");
        assert!(!filter.allows(LogLevel::Debug));
        assert!(!filter.allows(LogLevel::Info));
        assert!(filter.allows(LogLevel::Warn));

        let filter = EventFilter::parse("warn,portfolio_client=trace");
        assert!(filter.allows(LogLevel::Trace));
    }

    #[test]
    fn events_target_can_be_tuned_on_its_own() {
        let filter = EventFilter::parse("portfolio_client=error,portfolio_client::events=debug");
        assert!(filter.allows(LogLevel::Debug));
        assert!(!filter.allows(LogLevel::Trace));
    }

    #[test]
    fn blank_or_invalid_directives_default_to_info() {
        for directives in ["", "   ", "portfolio_client=loud"] {
            let filter = EventFilter::parse(directives);
            assert!(filter.allows(LogLevel::Info), "{directives:?}");
            assert!(!filter.allows(LogLevel::Debug), "{directives:?}");
        }
    }
}
