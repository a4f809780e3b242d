//! Unique test identity generation
//!
//! A process-wide sequence seeded from wall-clock nanoseconds guarantees
//! strictly increasing, never-repeating identifiers across concurrent
//! callers in one process and across process restarts.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use once_cell::sync::Lazy;
use rand::Rng;

use crate::types::Credentials;

/// Fixed password used by generated identities
pub const DEFAULT_TEST_PASSWORD: &str = "Test123456!";

static SEQUENCE: Lazy<AtomicU64> = Lazy::new(|| {
    let seed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(1);
    AtomicU64::new(seed)
});

fn next_sequence() -> u64 {
    SEQUENCE.fetch_add(1, Ordering::Relaxed) + 1
}

/// Produce a fresh, globally-unique credential set
pub fn next_credentials() -> Credentials {
    let seq = next_sequence();
    Credentials {
        email: format!("loadtest_{}@test.com", seq),
        nickname: format!("Player_{}", seq),
        password: DEFAULT_TEST_PASSWORD.to_string(),
    }
}

/// Random password from letters, digits and common symbols
pub fn generate_password(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                             abcdefghijklmnopqrstuvwxyz\
                             0123456789!@#$%^&*";
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}
