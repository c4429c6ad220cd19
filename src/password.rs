//! Password strength checks and bcrypt hashing.
//!
//! Plaintext passwords only ever live in a [ValidatedPassword]. The user table
//! stores the [PasswordHash].

use std::fmt::Debug;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A plaintext password that is ready to be hashed.
#[derive(Clone, PartialEq)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Accept `raw_password` if zxcvbn scores it three or more.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] with zxcvbn's feedback if the password is too easy to guess.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, &[]);

        if matches!(analysis.score(), Score::Three | Score::Four) {
            return Ok(Self(raw_password.to_owned()));
        }

        let feedback = analysis
            .feedback()
            .map(Feedback::to_string)
            .unwrap_or_default();
        Err(Error::TooWeak(feedback))
    }

    /// Accept `raw_password` as is, e.g. when the caller has already checked it.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Debug for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ValidatedPassword(<redacted>)")
    }
}

/// A salted bcrypt hash of a user's password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// The bcrypt cost used unless an application overrides it.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash `password` with bcrypt at `cost` rounds.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if `cost` is out of range or hashing fails.
    pub fn hash(password: &ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Wrap a hash read back from the user table.
    pub fn from_stored(stored_hash: &str) -> Self {
        Self(stored_hash.to_owned())
    }

    /// Whether `raw_password` is the password this hash was made from.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash is not a valid bcrypt hash.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod validated_password_tests {
    use crate::{Error, ValidatedPassword};

    #[test]
    fn new_fails_on_empty() {
        let result = ValidatedPassword::new("");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_fails_on_common_word() {
        let result = ValidatedPassword::new("password");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn new_accepts_long_passphrase() {
        assert!(ValidatedPassword::new("lumpy-orange-kettle-harbour").is_ok());
    }

    #[test]
    fn debug_output_hides_password() {
        let password = ValidatedPassword::new_unchecked("hunter2");

        assert!(!format!("{password:?}").contains("hunter2"));
    }
}
