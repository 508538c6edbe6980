use std::env;

use crate::error::SeedError;

pub const DB_NAME: &str = "DB_NAME";
pub const DB_USER: &str = "DB_USER";
pub const DB_PASSWORD: &str = "DB_PASSWORD";
pub const DB_HOST: &str = "DB_HOST";
pub const DB_PORT: &str = "DB_PORT";

/// Connection parameters for the database holding the reference movies and users.
/// Built once at start-up and handed to [`PostgresReference`](crate::reference::PostgresReference).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub dbname: String,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
}

impl DbConfig {
    /// # Errors
    /// Errors when one of `DB_NAME`, `DB_USER`, `DB_PASSWORD`, `DB_HOST` or `DB_PORT` is unset,
    /// or when `DB_PORT` is not a valid port number
    pub fn from_env() -> Result<Self, SeedError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`DbConfig::from_env`] but reads each key through `lookup`
    ///
    /// # Errors
    /// Errors when a key is missing or the port does not parse
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SeedError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &'static str| lookup(key).ok_or(SeedError::MissingConfig(key));

        let raw_port = require(DB_PORT)?;
        let port = raw_port
            .trim()
            .parse::<u16>()
            .map_err(|_| SeedError::InvalidConfig {
                key: DB_PORT,
                value: raw_port.clone(),
            })?;

        Ok(DbConfig {
            dbname: require(DB_NAME)?,
            user: require(DB_USER)?,
            password: require(DB_PASSWORD)?,
            host: require(DB_HOST)?,
            port,
        })
    }

    #[must_use]
    pub fn pg_config(&self) -> postgres::Config {
        let mut config = postgres::Config::new();
        config
            .dbname(&self.dbname)
            .user(&self.user)
            .password(&self.password)
            .host(&self.host)
            .port(self.port);
        config
    }
}

#[cfg(test)]
mod test {
    use std::collections::HashMap;

    use super::*;

    fn full_env() -> HashMap<&'static str, String> {
        HashMap::from([
            (DB_NAME, "movies".to_string()),
            (DB_USER, "postgres".to_string()),
            (DB_PASSWORD, "hunter2".to_string()),
            (DB_HOST, "localhost".to_string()),
            (DB_PORT, "5432".to_string()),
        ])
    }

    #[test]
    fn test_from_lookup() {
        let vars = full_env();
        let config = DbConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        assert_eq!(
            config,
            DbConfig {
                dbname: "movies".to_string(),
                user: "postgres".to_string(),
                password: "hunter2".to_string(),
                host: "localhost".to_string(),
                port: 5432,
            }
        );
    }

    #[test]
    fn test_missing_key() {
        let mut vars = full_env();
        vars.remove(DB_HOST);
        let res = DbConfig::from_lookup(|key| vars.get(key).cloned());
        assert!(matches!(res, Err(SeedError::MissingConfig(DB_HOST))));
    }

    #[test]
    fn test_bad_port() {
        let mut vars = full_env();
        vars.insert(DB_PORT, "not-a-port".to_string());
        let res = DbConfig::from_lookup(|key| vars.get(key).cloned());
        assert!(matches!(
            res,
            Err(SeedError::InvalidConfig { key: DB_PORT, .. })
        ));

        vars.insert(DB_PORT, "70000".to_string());
        let res = DbConfig::from_lookup(|key| vars.get(key).cloned());
        assert!(res.is_err());
    }

    #[test]
    fn test_pg_config() {
        let vars = full_env();
        let config = DbConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();
        let pg = config.pg_config();
        assert_eq!(pg.get_dbname(), Some("movies"));
        assert_eq!(pg.get_user(), Some("postgres"));
        assert_eq!(pg.get_ports(), &[5432]);
    }
}
