use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the different platform deployments the console can target.
#[derive(Clone, Default, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Local development platform.
    #[default]
    Local,
    /// Staging platform for pre-production testing.
    Staging,
    /// Production platform.
    Production,
}

impl Environment {
    /// Returns the platform API base URL associated with the environment.
    pub fn platform_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:8000".to_string(),
            Environment::Staging => "https://staging.faas-platform.dev".to_string(),
            Environment::Production => "https://api.faas-platform.dev".to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Staging => write!(f, "Staging"),
            Environment::Production => write!(f, "Production"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.platform_url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_environments() {
        assert_eq!("local".parse::<Environment>(), Ok(Environment::Local));
        assert_eq!("STAGING".parse::<Environment>(), Ok(Environment::Staging));
        assert_eq!(
            "production".parse::<Environment>(),
            Ok(Environment::Production)
        );
        assert!("beta".parse::<Environment>().is_err());
    }

    #[test]
    fn local_points_at_localhost() {
        assert_eq!(Environment::Local.platform_url(), "http://localhost:8000");
    }
}
