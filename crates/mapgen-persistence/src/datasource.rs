use std::fmt;

use serde::{Deserialize, Serialize};

/// Connection description of one database, as stored in the data-source file.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DataSource {
    pub name: String,
    pub db_type: String,
    pub jdbc_driver: String,
    pub jdbc_url: String,
    pub username: String,
    pub password: String,
    pub database_name: String,
}

impl DataSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

impl fmt::Debug for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataSource")
            .field("name", &self.name)
            .field("db_type", &self.db_type)
            .field("jdbc_driver", &self.jdbc_driver)
            .field("jdbc_url", &self.jdbc_url)
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .field("database_name", &self.database_name)
            .finish()
    }
}
