//! Property tests for splitting and counting.

use std::collections::HashMap;
use std::fs;

use proptest::prelude::*;
use wordcount::io::{split_data, ArtifactLayout};
use wordcount::pipeline::word_count::{is_word_char, map_func, reduce_func, shuffle_func};
use wordcount::{KeyValue, Task};

const WORD_CHARS: &[&str] = &["a", "Z", "é", "日", "7", "ß", "\u{20000}"];
const SEPARATORS: &[&str] = &[" ", ".", "\n", "«", "…", ", "];

// words of at most 4 chars, so at most 16 bytes
fn text() -> impl Strategy<Value = String> {
    let word = prop::collection::vec(prop::sample::select(WORD_CHARS), 1..=4)
        .prop_map(|cs| cs.concat());
    let sep = prop::sample::select(SEPARATORS);
    prop::collection::vec((word, sep), 0..60).prop_map(|parts| {
        parts
            .into_iter()
            .map(|(w, s)| format!("{}{}", w, s))
            .collect()
    })
}

fn split_chunks(input: &[u8], max_chunk_size: usize) -> Vec<Vec<u8>> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.txt");
    fs::write(&path, input).unwrap();
    let layout = ArtifactLayout::new(dir.path());
    let count = split_data(&path, max_chunk_size, &layout).unwrap();
    (0..count)
        .map(|id| fs::read(layout.chunk_path(id)).unwrap())
        .collect()
}

fn counts(kvs: Vec<KeyValue>) -> HashMap<String, i64> {
    let mut table = HashMap::new();
    for kv in kvs {
        let previous = table.insert(kv.key, kv.value.parse::<i64>().unwrap());
        assert!(previous.is_none(), "duplicate key in reduced output");
    }
    table
}

fn single_pass_counts(text: &str) -> HashMap<String, i64> {
    let mut table = HashMap::new();
    for word in text.split(|c: char| !is_word_char(c)).filter(|w| !w.is_empty()) {
        *table.entry(word.to_lowercase()).or_insert(0) += 1;
    }
    table
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chunks_reassemble_the_input(input in text(), max_chunk_size in 16usize..48) {
        let chunks = split_chunks(input.as_bytes(), max_chunk_size);
        prop_assert_eq!(chunks.concat(), input.as_bytes().to_vec());
        for chunk in chunks.iter() {
            prop_assert!(!chunk.is_empty());
            prop_assert!(chunk.len() <= max_chunk_size);
        }
    }

    #[test]
    fn cuts_respect_characters_and_words(input in text(), max_chunk_size in 16usize..48) {
        let chunks = split_chunks(input.as_bytes(), max_chunk_size);
        let mut offset = 0;
        for chunk in chunks.iter() {
            offset += chunk.len();
            prop_assert!(input.is_char_boundary(offset));
            let before = input[..offset].chars().next_back();
            let after = input[offset..].chars().next();
            if let (Some(b), Some(a)) = (before, after) {
                prop_assert!(!(is_word_char(b) && is_word_char(a)), "word split at {}", offset);
            }
        }
    }

    #[test]
    fn map_then_reduce_matches_a_single_pass(input in text(), max_chunk_size in 16usize..48) {
        let chunks = split_chunks(input.as_bytes(), max_chunk_size);
        let mapped: Vec<KeyValue> = chunks.iter().flat_map(|c| map_func(c)).collect();
        prop_assert_eq!(counts(reduce_func(mapped)), single_pass_counts(&input));
    }

    #[test]
    fn reduce_is_insensitive_to_grouping(
        pairs in prop::collection::vec(
            (prop::sample::select(vec!["a", "b", "c", "d"]),
             prop_oneof![(0i64..100).prop_map(|n| n.to_string()), Just("+".to_string())]),
            0..50,
        ),
        cuts in prop::collection::vec(any::<prop::sample::Index>(), 0..5),
    ) {
        let input: Vec<KeyValue> = pairs.iter().map(|(k, v)| KeyValue::new(*k, v.clone())).collect();

        let mut bounds: Vec<usize> = cuts.iter().map(|i| i.index(input.len() + 1)).collect();
        bounds.push(0);
        bounds.push(input.len());
        bounds.sort_unstable();

        let regrouped: Vec<KeyValue> = bounds
            .windows(2)
            .flat_map(|w| reduce_func(input[w[0]..w[1]].to_vec()))
            .collect();
        prop_assert_eq!(counts(reduce_func(regrouped)), counts(reduce_func(input)));
    }

    #[test]
    fn shuffle_is_stable(key in "\\PC{0,12}", n in 1usize..64) {
        let task = Task { num_reduce_jobs: n };
        let first = shuffle_func(&task, &key);
        prop_assert!(first < n);
        prop_assert_eq!(first, shuffle_func(&task, &key));
    }
}
