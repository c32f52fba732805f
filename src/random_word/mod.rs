use rand::Rng;
use thiserror::Error;

/// Error type for `generate_random_word`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RandomWordError {
    #[error("Length must be a non-negative integer, got {0}")]
    NegativeLength(i64),
}

/// Generates a random lowercase ASCII word of `length` characters.
///
/// Each letter is drawn independently and uniformly from `a..=z` using the
/// thread-local generator. Not suitable where the value must be unguessable.
///
/// # Errors
///
/// Returns `RandomWordError::NegativeLength` if `length` is negative.
pub fn generate_random_word(length: i64) -> Result<String, RandomWordError> {
    let length = usize::try_from(length).map_err(|_| RandomWordError::NegativeLength(length))?;

    let mut rng = rand::thread_rng();
    Ok((0..length)
        .map(|_| char::from(rng.gen_range(b'a'..=b'z')))
        .collect())
}
