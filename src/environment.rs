use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the backends the client can talk to.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development server.
    #[default]
    Local,
    /// Any deployed instance, addressed by its base URL.
    Custom { base_url: String },
}

impl Environment {
    /// Returns the backend base URL associated with the environment.
    pub fn base_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8080".to_string(),
            Environment::Custom { base_url } => base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Environment::Local);
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Environment::Custom {
                base_url: trimmed.to_string(),
            });
        }
        Err(())
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.base_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_local_and_urls() {
        assert_eq!("LOCAL".parse::<Environment>(), Ok(Environment::Local));
        assert_eq!(
            "https://folio.example.com/".parse::<Environment>(),
            Ok(Environment::Custom {
                base_url: "https://folio.example.com/".to_string()
            })
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn custom_base_url_drops_trailing_slash() {
        let env = Environment::Custom {
            base_url: "https://folio.example.com/".to_string(),
        };
        assert_eq!(env.base_url(), "https://folio.example.com");
    }
}
