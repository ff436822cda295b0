//! Database URL parsing.
//!
//! Accepted forms:
//! - `sqlite:///contacts.db` (relative path)
//! - `sqlite:////var/lib/contacts.db` (absolute path)
//! - `sqlite://`, `sqlite::memory:`, `:memory:` (in-memory)
//! - a bare filesystem path

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DatabaseUrlError {
    #[error("database url is empty")]
    Empty,

    #[error("unsupported database scheme `{0}` (only sqlite is supported)")]
    UnsupportedScheme(String),
}

impl FromStr for DatabaseLocation {
    type Err = DatabaseUrlError;

    fn from_str(url: &str) -> Result<Self, Self::Err> {
        let url = url.trim();
        if url.is_empty() {
            return Err(DatabaseUrlError::Empty);
        }
        if url == ":memory:" || url == "sqlite::memory:" || url == "sqlite://" {
            return Ok(Self::Memory);
        }
        if let Some(rest) = url.strip_prefix("sqlite:///") {
            if rest.is_empty() || rest == ":memory:" {
                return Ok(Self::Memory);
            }
            return Ok(Self::File(PathBuf::from(rest)));
        }
        if let Some((scheme, _)) = url.split_once("://") {
            return Err(DatabaseUrlError::UnsupportedScheme(scheme.to_string()));
        }
        Ok(Self::File(PathBuf::from(url)))
    }
}

impl fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Memory => write!(f, ":memory:"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_sqlite_url() {
        assert_eq!(
            "sqlite:///contacts.db".parse::<DatabaseLocation>(),
            Ok(DatabaseLocation::File(PathBuf::from("contacts.db")))
        );
    }

    #[test]
    fn absolute_sqlite_url() {
        assert_eq!(
            "sqlite:////var/lib/contacts.db".parse::<DatabaseLocation>(),
            Ok(DatabaseLocation::File(PathBuf::from("/var/lib/contacts.db")))
        );
    }

    #[test]
    fn memory_forms() {
        for url in ["sqlite://", "sqlite::memory:", ":memory:", "sqlite:///:memory:"] {
            assert_eq!(url.parse::<DatabaseLocation>(), Ok(DatabaseLocation::Memory), "{url}");
        }
    }

    #[test]
    fn bare_path() {
        assert_eq!(
            "data/contacts.db".parse::<DatabaseLocation>(),
            Ok(DatabaseLocation::File(PathBuf::from("data/contacts.db")))
        );
    }

    #[test]
    fn rejects_other_schemes() {
        assert_eq!(
            "postgresql://localhost/contacts".parse::<DatabaseLocation>(),
            Err(DatabaseUrlError::UnsupportedScheme("postgresql".into()))
        );
        assert_eq!("  ".parse::<DatabaseLocation>(), Err(DatabaseUrlError::Empty));
    }
}
