//! Property tests for the bounded text history.

use core_state::{TEXT_HISTORY_MAX, TextValueStore};
use proptest::prelude::*;

proptest! {
    // No sequence of appends ever grows an entry past the cap, and the
    // survivors are always the most recent messages in order.
    #[test]
    fn append_keeps_newest_within_cap(messages in prop::collection::vec("[a-z]{1,6}", 0..60)) {
        let mut store = TextValueStore::new();
        store.ensure_seeded("log", "Welcome");
        for m in &messages {
            store.append("log", m);
            prop_assert!(store.get("log").len() <= TEXT_HISTORY_MAX);
        }
        let mut all = vec!["Welcome".to_string()];
        all.extend(messages.iter().cloned());
        let expected = all[all.len().saturating_sub(TEXT_HISTORY_MAX)..].to_vec();
        prop_assert_eq!(store.get("log"), expected);
    }
}
