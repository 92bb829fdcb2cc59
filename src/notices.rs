//! Status lines printed around sessions and the configuration commands.

use std::fmt;
use std::path::PathBuf;

const RESET: &str = "\x1b[0m";

/// One status line. Warnings and errors go to stderr, the rest to stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SessionStarting {
        mode: &'static str,
        base_url: String,
    },
    SessionFinished,
    ConfigSaved(PathBuf),
    ClearingConfig(PathBuf),
    ConfigUnreadable(String),
    InvalidBaseUrl(String),
}

impl Notice {
    /// ANSI color and label.
    fn tag(&self) -> (&'static str, &'static str) {
        match self {
            Self::SessionStarting { .. } | Self::ClearingConfig(_) => ("\x1b[1;36m", "INFO"),
            Self::SessionFinished | Self::ConfigSaved(_) => ("\x1b[1;32m", "SUCCESS"),
            Self::ConfigUnreadable(_) => ("\x1b[1;33m", "WARN"),
            Self::InvalidBaseUrl(_) => ("\x1b[1;31m", "ERROR"),
        }
    }

    pub fn is_problem(&self) -> bool {
        matches!(self, Self::ConfigUnreadable(_) | Self::InvalidBaseUrl(_))
    }

    pub fn print(&self) {
        let (color, label) = self.tag();
        if self.is_problem() {
            eprintln!("{}[{}]{} {}", color, label, RESET, self);
        } else {
            println!("{}[{}]{} {}", color, label, RESET, self);
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SessionStarting { mode, base_url } => {
                write!(f, "Starting {} mode against {}", mode, base_url)
            }
            Self::SessionFinished => write!(f, "Portfolio client exited successfully"),
            Self::ConfigSaved(path) => write!(f, "Configuration saved to {}", path.display()),
            Self::ClearingConfig(path) => {
                write!(f, "Clearing configuration at {}", path.display())
            }
            Self::ConfigUnreadable(reason) => write!(f, "Could not read config: {}", reason),
            Self::InvalidBaseUrl(url) => write!(
                f,
                "Invalid base URL {}: it should start with http:// or https://",
                url
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notices_name_what_happened() {
        let starting = Notice::SessionStarting {
            mode: "headless",
            base_url: "http://localhost:8080".to_string(),
        };
        assert_eq!(
            starting.to_string(),
            "Starting headless mode against http://localhost:8080"
        );
        assert_eq!(
            Notice::ConfigSaved(PathBuf::from("/tmp/.portfolio/config.json")).to_string(),
            "Configuration saved to /tmp/.portfolio/config.json"
        );
    }

    #[test]
    fn only_problems_go_to_stderr() {
        assert!(Notice::InvalidBaseUrl("folio.example.com".to_string()).is_problem());
        assert!(Notice::ConfigUnreadable("expected value".to_string()).is_problem());
        assert!(!Notice::SessionFinished.is_problem());
        assert!(!Notice::ClearingConfig(PathBuf::from("config.json")).is_problem());
    }
}
