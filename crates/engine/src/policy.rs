//! Tunable parameters for chunked submission.

use std::time::Duration;

/// Default ids submitted per request.
const DEFAULT_CHUNK_SIZE: usize = 10;

/// Default pause between consecutive chunk submissions.
const DEFAULT_INTER_CHUNK_DELAY_MS: u64 = 100;

/// How a bulk run is split up and paced.
///
/// Small chunks keep individual requests fast enough to dodge proxy
/// timeouts in front of slow servers; the pause between chunks keeps the
/// server from being hammered back-to-back.
#[derive(Debug, Clone)]
pub struct ChunkPolicy {
    /// Ids submitted per request. Never zero.
    pub chunk_size: usize,
    /// Pause after each chunk submission.
    pub inter_chunk_delay: Duration,
}

impl Default for ChunkPolicy {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            inter_chunk_delay: Duration::from_millis(DEFAULT_INTER_CHUNK_DELAY_MS),
        }
    }
}

impl ChunkPolicy {
    pub fn new(chunk_size: usize, inter_chunk_delay: Duration) -> Self {
        Self {
            chunk_size: chunk_size.max(1),
            inter_chunk_delay,
        }
    }

    /// A policy with no pause between chunks.
    pub fn immediate(chunk_size: usize) -> Self {
        Self::new(chunk_size, Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_documented_values() {
        let policy = ChunkPolicy::default();
        assert_eq!(policy.chunk_size, 10);
        assert_eq!(policy.inter_chunk_delay, Duration::from_millis(100));
    }

    #[test]
    fn chunk_size_is_floored_at_one() {
        assert_eq!(ChunkPolicy::immediate(0).chunk_size, 1);
    }
}
