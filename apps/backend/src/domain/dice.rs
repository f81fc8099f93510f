//! Home/away assignment by dice roll.
//!
//! The seed is recorded on the session, so the assignment can be re-derived
//! and audited later: the same seed and team pair always give the same result.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Fresh random seed for a roll.
pub fn generate_seed() -> i64 {
    rand::random::<i64>()
}

/// `(home, away)` for the two match teams under `seed`.
pub fn assign_home_away(seed: i64, team1_id: i64, team2_id: i64) -> (i64, i64) {
    let mut rng = ChaCha20Rng::seed_from_u64(seed as u64);
    if rng.random_bool(0.5) {
        (team1_id, team2_id)
    } else {
        (team2_id, team1_id)
    }
}
