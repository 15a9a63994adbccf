//! Record id generation.
//!
//! Ids look like `assistant-1717171717171-k3j9x0q2a`: a prefix, the creation
//! time in epoch milliseconds, and nine random base-36 characters. The time
//! keeps ids roughly sortable; the suffix makes same-millisecond collisions
//! negligible.

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;

use rand::{Rng, RngCore};

const SUFFIX_LEN: usize = 9;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Fresh id for a record of kind `prefix`.
#[must_use]
pub fn generate_id(prefix: &str) -> String {
    generate_id_with(prefix, chrono::Utc::now().timestamp_millis(), &mut rand::rng())
}

/// Deterministic variant used by [`generate_id`] and tests.
pub fn generate_id_with(prefix: &str, millis: i64, rng: &mut dyn RngCore) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| char::from(BASE36[rng.random_range(0..BASE36.len())]))
        .collect();
    format!("{prefix}-{millis}-{suffix}")
}
