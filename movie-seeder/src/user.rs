use fake::faker::internet::en::Password;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use log::info;
use rand::Rng;
use serde::{Deserialize, Serialize};

pub const USER_HEADER: [&str; 4] = ["first_name", "last_name", "email", "password"];
pub const PASSWORD_LENGTH: usize = 12;
pub const DEFAULT_USER_COUNT: usize = 1000;

/// A synthetic identity. Field order matches [`USER_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

impl User {
    /// The `index` is baked into the email, so identities built with distinct indices never
    /// share an email even when the names repeat
    pub fn generate<R: Rng>(rng: &mut R, index: usize) -> Self {
        let first_name: String = FirstName().fake_with_rng(rng);
        let last_name: String = LastName().fake_with_rng(rng);
        let password: String = Password(PASSWORD_LENGTH..PASSWORD_LENGTH + 1).fake_with_rng(rng);
        User {
            email: email_for(&first_name, &last_name, index),
            first_name,
            last_name,
            password,
        }
    }
}

#[must_use]
pub fn email_for(first_name: &str, last_name: &str, index: usize) -> String {
    format!(
        "{}.{}{}@example.com",
        first_name.to_lowercase(),
        last_name.to_lowercase(),
        index
    )
}

pub fn generate_users<R: Rng>(rng: &mut R, count: usize) -> Vec<User> {
    let users: Vec<User> = (0..count).map(|i| User::generate(rng, i)).collect();
    info!("Generated {} users", users.len());
    users
}
