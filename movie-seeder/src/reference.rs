use std::fmt;

use log::{debug, info};
use postgres::{Client, NoTls};
use serde::{Deserialize, Serialize};

use crate::config::DbConfig;
use crate::error::SeedError;

/// Movies with at least 2000 votes and an average rating of at least 7
pub const QUALIFYING_MOVIES_QUERY: &str = "
SELECT m.mid
FROM movies m
JOIN imdb_ratings r ON m.mid = r.mid
WHERE total_votes >= 2000
AND (sum_of_votes/total_votes) >= 7;
";

pub const ALL_USER_IDS_QUERY: &str = "SELECT uid FROM users;";

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i32);

impl fmt::Display for MovieId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Read-only source of the identifiers reviews are generated for
pub trait ReferenceData {
    /// # Errors
    /// Errors when the backing store cannot be queried
    fn qualifying_movies(&mut self) -> Result<Vec<MovieId>, SeedError>;

    /// # Errors
    /// Errors when the backing store cannot be queried
    fn all_user_ids(&mut self) -> Result<Vec<UserId>, SeedError>;
}

pub struct PostgresReference {
    client: Client,
}

impl PostgresReference {
    /// # Errors
    /// Errors when the database is unreachable or rejects the credentials
    pub fn connect(config: &DbConfig) -> Result<Self, SeedError> {
        info!(
            "Connecting to {}@{}:{}/{}",
            config.user, config.host, config.port, config.dbname
        );
        let client = config.pg_config().connect(NoTls)?;
        Ok(PostgresReference { client })
    }
}

impl ReferenceData for PostgresReference {
    fn qualifying_movies(&mut self) -> Result<Vec<MovieId>, SeedError> {
        let rows = self.client.query(QUALIFYING_MOVIES_QUERY, &[])?;
        debug!("Qualifying movies query returned {} rows", rows.len());
        rows.iter()
            .map(|row| row.try_get::<_, String>(0).map(MovieId))
            .collect::<Result<Vec<_>, _>>()
            .map_err(SeedError::from)
    }

    fn all_user_ids(&mut self) -> Result<Vec<UserId>, SeedError> {
        let rows = self.client.query(ALL_USER_IDS_QUERY, &[])?;
        debug!("User query returned {} rows", rows.len());
        rows.iter()
            .map(|row| row.try_get::<_, i32>(0).map(UserId))
            .collect::<Result<Vec<_>, _>>()
            .map_err(SeedError::from)
    }
}

/// Fixed reference lists held in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticReference {
    pub movies: Vec<MovieId>,
    pub users: Vec<UserId>,
}

impl StaticReference {
    #[must_use]
    pub fn new(movies: Vec<MovieId>, users: Vec<UserId>) -> Self {
        StaticReference { movies, users }
    }
}

impl ReferenceData for StaticReference {
    fn qualifying_movies(&mut self) -> Result<Vec<MovieId>, SeedError> {
        Ok(self.movies.clone())
    }

    fn all_user_ids(&mut self) -> Result<Vec<UserId>, SeedError> {
        Ok(self.users.clone())
    }
}
