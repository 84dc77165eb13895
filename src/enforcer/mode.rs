//! Environment tag selecting the target database

use std::fmt;
use std::str::FromStr;

use super::errors::EnforceError;

/// Target environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AppMode {
    Test,
    Prod,
}

impl AppMode {
    pub const ALL: [AppMode; 2] = [AppMode::Test, AppMode::Prod];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppMode::Test => "TEST",
            AppMode::Prod => "PROD",
        }
    }

    /// Database the mode writes to
    pub fn database_name(&self) -> &'static str {
        match self {
            AppMode::Test => "Test",
            AppMode::Prod => "Modoo_data",
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppMode {
    type Err = EnforceError;

    /// Exact, case-sensitive match against `TEST` and `PROD`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| EnforceError::InvalidMode(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recognized_modes() {
        assert_eq!("TEST".parse::<AppMode>().unwrap(), AppMode::Test);
        assert_eq!("PROD".parse::<AppMode>().unwrap(), AppMode::Prod);
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("test".parse::<AppMode>().is_err());
        assert!("Prod".parse::<AppMode>().is_err());
    }

    #[test]
    fn test_unrecognized_mode_named_in_error() {
        let err = "STAGING".parse::<AppMode>().unwrap_err();
        assert!(matches!(err, EnforceError::InvalidMode(ref m) if m == "STAGING"));
        assert!(err.to_string().contains("STAGING"));
    }

    #[test]
    fn test_database_mapping() {
        assert_eq!(AppMode::Test.database_name(), "Test");
        assert_eq!(AppMode::Prod.database_name(), "Modoo_data");
    }
}
