use std::collections::HashSet;

use csv::ReaderBuilder;
use rand::rngs::StdRng;
use rand::SeedableRng;

use movie_seeder::reference::{MovieId, StaticReference, UserId};
use movie_seeder::review::{generate_reviews_from, Review, SynthesisWindow, REVIEW_HEADER};
use movie_seeder::sink::{read_records, write_records};
use movie_seeder::user::{generate_users, User, USER_HEADER};

fn reference(movies: usize, users: i32) -> StaticReference {
    StaticReference::new(
        (0..movies).map(|i| MovieId(format!("tt{:07}", i + 1))).collect(),
        (1..=users).map(UserId).collect(),
    )
}

fn header_of(path: &std::path::Path) -> Vec<String> {
    let mut reader = ReaderBuilder::new().from_path(path).unwrap();
    reader.headers().unwrap().iter().map(String::from).collect()
}

#[test]
fn test_one_movie_forty_users() {
    let mut rng = StdRng::seed_from_u64(40);
    let mut source = reference(1, 40);
    let window = SynthesisWindow::default();

    let reviews = generate_reviews_from(&mut rng, &mut source, &window).unwrap();
    assert_eq!(reviews.len(), 40);
    let reviewers: HashSet<UserId> = reviews.iter().map(|r| r.uid).collect();
    assert_eq!(reviewers.len(), 40);
    assert!(reviews.iter().all(|r| r.mid == MovieId("tt0000001".to_string())));
}

#[test]
fn test_reviews_round_trip() {
    let mut rng = StdRng::seed_from_u64(2025);
    let mut source = reference(3, 150);
    let window = SynthesisWindow::default();
    let reviews = generate_reviews_from(&mut rng, &mut source, &window).unwrap();
    assert!(reviews.len() >= 150);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("public").join("user_reviews.csv");
    let written = write_records(&reviews, &REVIEW_HEADER, &path).unwrap();
    assert_eq!(written, reviews.len());

    assert_eq!(header_of(&path), REVIEW_HEADER);
    let back: Vec<Review> = read_records(&path).unwrap();
    assert_eq!(back, reviews);
    for review in &back {
        assert!(window.contains(review.created_at));
        assert_eq!(review.created_at, review.updated_at);
    }
}

#[test]
fn test_review_row_format() {
    let mut rng = StdRng::seed_from_u64(1);
    let mut source = reference(1, 1);
    let reviews =
        generate_reviews_from(&mut rng, &mut source, &SynthesisWindow::default()).unwrap();
    assert_eq!(reviews.len(), 1);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("one.csv");
    write_records(&reviews, &REVIEW_HEADER, &path).unwrap();

    let mut reader = ReaderBuilder::new().from_path(&path).unwrap();
    let row = reader.records().next().unwrap().unwrap();
    assert_eq!(&row[0], "1");
    assert_eq!(&row[1], "tt0000001");
    let rating = &row[2];
    let (whole, tenths) = rating.split_once('.').unwrap();
    assert!(!whole.is_empty());
    assert_eq!(tenths.len(), 1);
    assert!(row[4].starts_with("2025-03-"));
    assert!(row[4].ends_with(" 00:00:00"));
    assert_eq!(&row[4], &row[5]);
}

#[test]
fn test_users_round_trip() {
    let mut rng = StdRng::seed_from_u64(1000);
    let users = generate_users(&mut rng, 250);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("public").join("users.csv");
    let written = write_records(&users, &USER_HEADER, &path).unwrap();
    assert_eq!(written, 250);

    assert_eq!(header_of(&path), USER_HEADER);
    let back: Vec<User> = read_records(&path).unwrap();
    assert_eq!(back, users);
    let emails: HashSet<&str> = back.iter().map(|u| u.email.as_str()).collect();
    assert_eq!(emails.len(), 250);
}

#[test]
fn test_no_qualifying_movies() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut source = reference(0, 500);
    let reviews =
        generate_reviews_from(&mut rng, &mut source, &SynthesisWindow::default()).unwrap();
    assert!(reviews.is_empty());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("user_reviews.csv");
    write_records(&reviews, &REVIEW_HEADER, &path).unwrap();
    assert_eq!(header_of(&path), REVIEW_HEADER);
    let back: Vec<Review> = read_records(&path).unwrap();
    assert!(back.is_empty());
}
