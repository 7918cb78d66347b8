use crate::ID_GENERATOR;
use parking_lot::Mutex;
use rand::rngs::OsRng;
use rand::Rng;
use std::fmt::{Debug, Display, Formatter};

use crate::common::get_current_time_or_zero;

/// A unique identifier assigned by the store to every inserted document.
///
/// `DocId` values are 64-bit snowflake ids: they embed a millisecond
/// timestamp, a per-process node id and a sequence number, so ids generated
/// later always compare greater. Iterating a collection in id order therefore
/// yields documents in insertion order, which is the store-native result
/// order for unsorted queries.
///
/// The id is stored in the reserved `_id` field of a document and cannot be
/// assigned manually.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct DocId(u64);

impl DocId {
    /// Generates a fresh id from the global generator.
    pub(crate) fn new() -> Self {
        DocId(ID_GENERATOR.next_id())
    }

    /// Returns the raw 64-bit representation.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Display for DocId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Debug for DocId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocId({})", self.0)
    }
}

const NODE_ID_BITS: u64 = 10;
const SEQUENCE_BITS: u64 = 12;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;
const TIMESTAMP_SHIFT: u64 = NODE_ID_BITS + SEQUENCE_BITS;
// Twitter snowflake epoch (2010-11-04T01:42:54.657Z)
const EPOCH: u64 = 1288834974657;

struct GeneratorState {
    last_timestamp: u64,
    sequence: u64,
}

/// Generates time-ordered snowflake ids.
pub(crate) struct SnowflakeIdGenerator {
    node_id: u64,
    state: Mutex<GeneratorState>,
}

impl SnowflakeIdGenerator {
    pub(crate) fn new() -> Self {
        let max_node_id = (1 << NODE_ID_BITS) - 1;
        let node_id = OsRng.gen_range(0..=max_node_id);
        log::info!("Initialized id generator with node id: {}", node_id);

        SnowflakeIdGenerator {
            node_id,
            state: Mutex::new(GeneratorState {
                last_timestamp: 0,
                sequence: 0,
            }),
        }
    }

    pub(crate) fn next_id(&self) -> u64 {
        let mut state = self.state.lock();

        let mut timestamp = get_current_time_or_zero() as u64;
        // Never move backwards; a clock step back reuses the last timestamp
        // and keeps incrementing the sequence.
        if timestamp < state.last_timestamp {
            timestamp = state.last_timestamp;
        }

        if timestamp == state.last_timestamp {
            state.sequence = (state.sequence + 1) & SEQUENCE_MASK;
            if state.sequence == 0 {
                // sequence exhausted for this millisecond
                while timestamp <= state.last_timestamp {
                    timestamp = get_current_time_or_zero() as u64;
                }
            }
        } else {
            state.sequence = 0;
        }
        state.last_timestamp = timestamp;

        ((timestamp.saturating_sub(EPOCH)) << TIMESTAMP_SHIFT)
            | (self.node_id << SEQUENCE_BITS)
            | state.sequence
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(DocId::new()));
        }
    }

    #[test]
    fn test_ids_are_monotonic() {
        let mut last = DocId::new();
        for _ in 0..1_000 {
            let next = DocId::new();
            assert!(next > last);
            last = next;
        }
    }

    #[test]
    fn test_display_is_raw() {
        let id = DocId::new();
        assert_eq!(format!("{}", id), format!("{}", id.raw()));
    }

    #[test]
    fn test_generator_node_id_in_range() {
        let generator = SnowflakeIdGenerator::new();
        assert!(generator.node_id < (1 << NODE_ID_BITS));
    }
}
