use std::convert::TryFrom;
use std::fmt;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use fake::faker::lorem::en::Word;
use fake::Fake;
use log::{debug, info};
use rand::seq::SliceRandom;
use rand::Rng;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize, Serializer};

use crate::error::SeedError;
use crate::reference::{MovieId, ReferenceData, UserId};

pub const REVIEW_HEADER: [&str; 6] = [
    "uid",
    "mid",
    "rating",
    "comment",
    "created_at",
    "updated_at",
];

pub const NUM_DECIMAL_PLACES: u32 = 1;
pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 10.0;

pub const MIN_REVIEWS_PER_MOVIE: usize = 50;
pub const MAX_REVIEWS_PER_MOVIE: usize = 100;

/// Upper bound on the length of the random sentence appended to a comment opener
pub const FILLER_MAX_CHARS: usize = 30;

const WINDOW_START: (i32, u32, u32) = (2025, 3, 15);
const WINDOW_END: (i32, u32, u32) = (2025, 3, 30);

/// A review score between 1.0 and 10.0, always held at one decimal place
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Rating(Decimal);

impl Rating {
    /// Draws uniformly from `[1.0, 10.0]` and rounds to one decimal place
    ///
    /// # Errors
    /// Only if the drawn float cannot be represented as a [`Decimal`]
    pub fn random<R: Rng>(rng: &mut R) -> Result<Self, SeedError> {
        Rating::try_from(rng.gen_range(MIN_RATING..=MAX_RATING))
    }

    #[must_use]
    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for Rating {
    type Error = SeedError;
    fn try_from(decimal: Decimal) -> Result<Self, Self::Error> {
        if decimal >= Decimal::ONE && decimal <= Decimal::TEN {
            let mut rounded = decimal.round_dp(NUM_DECIMAL_PLACES);
            rounded.rescale(NUM_DECIMAL_PLACES);
            Ok(Rating(rounded))
        } else {
            Err(SeedError::InvalidRating)
        }
    }
}

impl TryFrom<f64> for Rating {
    type Error = SeedError;
    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Rating::try_from(Decimal::from_f64(value).ok_or(SeedError::InvalidRating)?)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Rating {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&self.0)
    }
}

/// Rating bucket that decides the tone of a generated comment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentTier {
    Masterpiece,
    Excellent,
    Solid,
    Mixed,
}

impl SentimentTier {
    #[must_use]
    pub fn for_rating(rating: Rating) -> Self {
        let value = rating.value();
        if value >= Decimal::from(9) {
            SentimentTier::Masterpiece
        } else if value >= Decimal::from(8) {
            SentimentTier::Excellent
        } else if value >= Decimal::from(7) {
            SentimentTier::Solid
        } else {
            SentimentTier::Mixed
        }
    }

    #[must_use]
    pub fn openers(self) -> &'static [&'static str; 4] {
        match self {
            SentimentTier::Masterpiece => &[
                "An absolute masterpiece that will be remembered for generations. ",
                "One of the finest films ever made. A true work of art. ",
                "A perfect blend of storytelling, acting and direction. ",
                "This film sets a new standard for cinema. ",
            ],
            SentimentTier::Excellent => &[
                "An excellent film that delivers on every level. ",
                "Thoroughly engaging from start to finish. ",
                "Masterfully crafted and highly entertaining. ",
                "A remarkable achievement in filmmaking. ",
            ],
            SentimentTier::Solid => &[
                "A solid film with strong performances. ",
                "Well made and worth watching. ",
                "An enjoyable experience overall. ",
                "Good entertainment value. ",
            ],
            SentimentTier::Mixed => &[
                "Has potential but falls short. ",
                "Some good moments but inconsistent. ",
                "Decent effort but needs improvement. ",
                "Not quite what it could have been. ",
            ],
        }
    }
}

/// Tier opener followed by a short lorem sentence
pub fn review_content<R: Rng>(rng: &mut R, rating: Rating) -> String {
    let openers = SentimentTier::for_rating(rating).openers();
    let opener = openers[rng.gen_range(0..openers.len())];
    let mut comment = String::from(opener);
    comment.push_str(&filler_sentence(rng, FILLER_MAX_CHARS));
    comment
}

/// Capitalized sentence of lorem words ending in a period, at most `max_chars` long.
/// `max_chars` must leave room for at least one letter and the period.
pub fn filler_sentence<R: Rng>(rng: &mut R, max_chars: usize) -> String {
    let budget = max_chars.saturating_sub(1).max(1);
    let mut words: Vec<String> = Vec::new();
    let mut len = 0;
    loop {
        let word: String = Word().fake_with_rng(rng);
        let extra = word.chars().count() + usize::from(!words.is_empty());
        if len + extra > budget {
            if words.is_empty() {
                words.push(word.chars().take(budget).collect());
            }
            break;
        }
        len += extra;
        words.push(word);
    }

    let mut sentence = words.join(" ");
    if let Some(first) = sentence.chars().next() {
        let capital: String = first.to_uppercase().collect();
        sentence.replace_range(..first.len_utf8(), &capital);
    }
    sentence.push('.');
    sentence
}

/// Closed range of calendar days review timestamps are drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthesisWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SynthesisWindow {
    /// # Errors
    /// Errors when `end` is before `start`
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SeedError> {
        if end < start {
            return Err(SeedError::InvalidWindow);
        }
        Ok(SynthesisWindow { start, end })
    }

    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.end.and_time(NaiveTime::MIN)
    }

    #[must_use]
    pub fn days(&self) -> u64 {
        self.end.signed_duration_since(self.start).num_days().unsigned_abs()
    }

    /// Midnight of a uniformly chosen day in the window
    pub fn sample<R: Rng>(&self, rng: &mut R) -> NaiveDateTime {
        let offset = rng.gen_range(0..=self.days());
        (self.start + Days::new(offset)).and_time(NaiveTime::MIN)
    }

    #[must_use]
    pub fn contains(&self, timestamp: NaiveDateTime) -> bool {
        timestamp >= self.start() && timestamp <= self.end()
    }
}

impl Default for SynthesisWindow {
    /// 2025-03-15 through 2025-03-30
    ///
    /// # Panics
    /// Never, both bounds are fixed valid dates in order
    fn default() -> Self {
        let date = |(y, m, d): (i32, u32, u32)| {
            NaiveDate::from_ymd_opt(y, m, d).expect("window bounds are valid calendar dates")
        };
        SynthesisWindow::new(date(WINDOW_START), date(WINDOW_END))
            .expect("window start precedes its end")
    }
}

/// One generated review. Field order matches [`REVIEW_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub uid: UserId,
    pub mid: MovieId,
    pub rating: Rating,
    pub comment: String,
    #[serde(with = "timestamp_format")]
    pub created_at: NaiveDateTime,
    #[serde(with = "timestamp_format")]
    pub updated_at: NaiveDateTime,
}

impl Review {
    /// # Errors
    /// Errors when a rating could not be drawn
    pub fn generate<R: Rng>(
        rng: &mut R,
        uid: UserId,
        mid: MovieId,
        window: &SynthesisWindow,
    ) -> Result<Self, SeedError> {
        let rating = Rating::random(rng)?;
        let created_at = window.sample(rng);
        Ok(Review {
            uid,
            mid,
            rating,
            comment: review_content(rng, rating),
            created_at,
            updated_at: created_at,
        })
    }
}

/// Builds 50 to 100 reviews for every movie, each from a different user. When there are fewer
/// users than the drawn count, every user reviews the movie once.
///
/// Nothing stops a later run from pairing the same user and movie again.
///
/// # Errors
/// Errors when a rating could not be drawn
pub fn generate_reviews<R: Rng>(
    rng: &mut R,
    users: &[UserId],
    movies: &[MovieId],
    window: &SynthesisWindow,
) -> Result<Vec<Review>, SeedError> {
    let mut reviews = Vec::new();
    for mid in movies {
        let requested = rng.gen_range(MIN_REVIEWS_PER_MOVIE..=MAX_REVIEWS_PER_MOVIE);
        let reviewers: Vec<UserId> = users.choose_multiple(rng, requested).copied().collect();
        debug!(
            "Movie {}: {} reviews requested, {} reviewers selected",
            mid,
            requested,
            reviewers.len()
        );
        for uid in reviewers {
            reviews.push(Review::generate(rng, uid, mid.clone(), window)?);
        }
    }
    Ok(reviews)
}

/// Fetches movies and users from `source`, then runs [`generate_reviews`]
///
/// # Errors
/// Errors when either query fails or a rating could not be drawn
pub fn generate_reviews_from<R, D>(
    rng: &mut R,
    source: &mut D,
    window: &SynthesisWindow,
) -> Result<Vec<Review>, SeedError>
where
    R: Rng,
    D: ReferenceData + ?Sized,
{
    info!("Fetching highly rated movies...");
    let movies = source.qualifying_movies()?;
    info!("Found {} highly rated movies", movies.len());

    info!("Reading users...");
    let users = source.all_user_ids()?;
    info!("Found {} users", users.len());

    info!("Generating reviews...");
    let reviews = generate_reviews(rng, &users, &movies, window)?;
    info!("Generated {} reviews", reviews.len());
    Ok(reviews)
}

mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    #[allow(clippy::trivially_copy_pass_by_ref)]
    pub(super) fn serialize<S>(timestamp: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&timestamp.format(FORMAT))
    }

    pub(super) fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(de::Error::custom)
    }
}
