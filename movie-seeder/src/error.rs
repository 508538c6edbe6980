use std::io;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SeedError {
    #[error("CSV Error")]
    Csv(#[from] csv::Error),
    #[error("I/O Error")]
    Io(#[from] io::Error),
    #[error("Database Error: {0}")]
    Database(#[from] postgres::Error),
    #[error("Missing environment variable {0}")]
    MissingConfig(&'static str),
    #[error("Invalid value {value:?} for environment variable {key}")]
    InvalidConfig { key: &'static str, value: String },
    #[error("Ratings must lie between 1.0 and 10.0")]
    InvalidRating,
    #[error("The synthesis window must not end before it starts")]
    InvalidWindow,
}
