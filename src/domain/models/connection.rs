//! Connection domain models.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Environment key holding a complete connection URL.
pub const CONNECTION_URL_KEY: &str = "DB_CONNECTION_URL";

/// Supported database dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Mysql,
    Mariadb,
    Postgres,
    Mssql,
}

impl Dialect {
    pub const ALL: [Self; 4] = [Self::Mysql, Self::Mariadb, Self::Postgres, Self::Mssql];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mysql => "mysql",
            Self::Mariadb => "mariadb",
            Self::Postgres => "postgres",
            Self::Mssql => "mssql",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown dialect: {s}"))
    }
}

/// One of the six individually sourced connection settings.
///
/// The declaration order is the order in which missing values are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionProperty {
    Dialect,
    Host,
    Port,
    Name,
    Username,
    Password,
}

impl ConnectionProperty {
    /// Fixed check order used when looking for missing settings.
    pub const CHECK_ORDER: [Self; 6] = [
        Self::Dialect,
        Self::Host,
        Self::Port,
        Self::Name,
        Self::Username,
        Self::Password,
    ];

    /// Environment variable the property is read from.
    pub fn env_key(&self) -> &'static str {
        match self {
            Self::Dialect => "DB_DIALECT",
            Self::Host => "DB_HOST",
            Self::Port => "DB_PORT",
            Self::Name => "DB_NAME",
            Self::Username => "DB_USERNAME",
            Self::Password => "DB_PASSWORD",
        }
    }

    /// Command-line flag that overrides the environment value.
    pub fn flag(&self) -> &'static str {
        match self {
            Self::Dialect => "dbDialect",
            Self::Host => "dbHost",
            Self::Port => "dbPort",
            Self::Name => "dbName",
            Self::Username => "dbUsername",
            Self::Password => "dbPassword",
        }
    }
}

impl fmt::Display for ConnectionProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.env_key())
    }
}

/// A validated connection URL of the form
/// `<dialect>://<username>:<password>@<host>:<port>/<database>`.
///
/// Only the connection resolver constructs descriptors, so every value of
/// this type has already passed URL validation.
#[derive(Clone, PartialEq, Eq)]
pub struct ConnectionDescriptor {
    connection_url: String,
}

impl ConnectionDescriptor {
    pub(crate) fn new_unchecked(connection_url: String) -> Self {
        Self { connection_url }
    }

    pub fn connection_url(&self) -> &str {
        &self.connection_url
    }

    /// Dialect named by the URL scheme.
    pub fn dialect(&self) -> Option<Dialect> {
        self.connection_url
            .split_once("://")
            .and_then(|(scheme, _)| scheme.parse().ok())
    }
}

// Keeps credentials out of `{:?}` output.
impl fmt::Debug for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionDescriptor")
            .field("dialect", &self.dialect())
            .finish_non_exhaustive()
    }
}
