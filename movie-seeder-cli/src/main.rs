use std::error::Error;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use movie_seeder::config::DbConfig;
use movie_seeder::reference::PostgresReference;
use movie_seeder::review::{generate_reviews_from, SynthesisWindow, REVIEW_HEADER};
use movie_seeder::sink::write_records;
use movie_seeder::user::{generate_users, DEFAULT_USER_COUNT, USER_HEADER};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate synthetic user identities
    Users {
        /// How many users to generate
        #[clap(short, long, default_value_t = DEFAULT_USER_COUNT)]
        count: usize,
        /// The output CSV file
        #[clap(short, long, parse(from_os_str), default_value = "public/users.csv")]
        output: PathBuf,
        /// Seed for a reproducible run
        #[clap(long)]
        seed: Option<u64>,
    },
    /// Generate reviews of highly rated movies by existing users, read from the database
    Reviews {
        /// The output CSV file
        #[clap(short, long, parse(from_os_str), default_value = "public/user_reviews.csv")]
        output: PathBuf,
        /// Seed for a reproducible run
        #[clap(long)]
        seed: Option<u64>,
    },
}

fn rng_from(seed: Option<u64>) -> StdRng {
    seed.map_or_else(StdRng::from_entropy, StdRng::seed_from_u64)
}

fn main() -> Result<(), Box<dyn Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Command::Users {
            count,
            output,
            seed,
        } => {
            let mut rng = rng_from(seed);
            let users = generate_users(&mut rng, count);
            write_records(&users, &USER_HEADER, &output)?;
        }
        Command::Reviews { output, seed } => {
            let config = DbConfig::from_env()?;
            let mut source = PostgresReference::connect(&config)?;
            let mut rng = rng_from(seed);
            let reviews =
                generate_reviews_from(&mut rng, &mut source, &SynthesisWindow::default())?;
            info!("Saving reviews to CSV...");
            write_records(&reviews, &REVIEW_HEADER, &output)?;
        }
    }
    info!("Done!");

    Ok(())
}
