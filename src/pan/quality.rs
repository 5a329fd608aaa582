// QualityRanker - deterministic ordering of collected streams
//
// Order:
// 1. "Source" (the untouched original) first
// 2. "<n>p" variants, highest resolution first
// 3. Anything unparseable ("Unknown", odd labels) last
//
// The sort is stable, so ties keep collection order.

use std::cmp::Reverse;

use super::models::{Quality, StreamCandidate};

pub struct QualityRanker;

impl QualityRanker {
    /// Source first, then height descending, then unparseable labels
    pub fn rank(mut candidates: Vec<StreamCandidate>) -> Vec<StreamCandidate> {
        candidates.sort_by_key(|c| Self::sort_key(&c.quality));
        candidates
    }

    fn sort_key(quality: &Quality) -> (u8, Reverse<u32>) {
        match quality {
            Quality::Source => (0, Reverse(0)),
            Quality::Height(h) => (1, Reverse(*h)),
            Quality::Unknown(_) => (2, Reverse(0)),
        }
    }
}
