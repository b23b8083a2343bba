use std::collections::HashMap;

use crate::pipeline::{KeyValue, Task};

const FNV32_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV32_PRIME: u32 = 0x0100_0193;

/// Letters and numbers form words; everything else separates them.
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric()
}

/// Counts the words of one chunk, lowercased. Counts are local to the chunk.
pub fn map_func(input: &[u8]) -> Vec<KeyValue> {
    // 1. turn into text
    let full_text = String::from_utf8_lossy(input);

    // 2. count tokens
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut word = String::new();
    for c in full_text.chars() {
        if is_word_char(c) {
            word.push(c);
        } else {
            flush_word(&mut word, &mut counts);
        }
    }
    flush_word(&mut word, &mut counts);

    // 3. flatten into pairs
    counts
        .into_iter()
        .map(|(k, v)| KeyValue::new(k, v.to_string()))
        .collect()
}

fn flush_word(word: &mut String, counts: &mut HashMap<String, usize>) {
    if word.is_empty() {
        return;
    }
    *counts.entry(word.to_lowercase()).or_insert(0) += 1;
    word.clear();
}

/// 32-bit FNV-1a over the raw bytes. `fnv::FnvHasher` is 64-bit only, and
/// partition numbers must match other workers hashing with the 32-bit variant.
pub fn fnv1a_32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV32_OFFSET_BASIS, |hash, b| {
        (hash ^ u32::from(*b)).wrapping_mul(FNV32_PRIME)
    })
}

/// Partition index in `0 .. task.num_reduce_jobs`.
///
/// # Panics
///
/// Panics if `task.num_reduce_jobs` is zero.
pub fn shuffle_func(task: &Task, key: &str) -> usize {
    assert!(task.num_reduce_jobs > 0, "shuffle needs at least one reduce job");
    (fnv1a_32(key.as_bytes()) as usize) % task.num_reduce_jobs
}

/// Sums counts per key. A value that is not an integer counts as 1.
///
/// Values are `i64`; sums are kept in `i128` so adding any realistic number
/// of `i64` counts cannot overflow.
pub fn reduce_func(input: Vec<KeyValue>) -> Vec<KeyValue> {
    let mut sums: HashMap<String, i128> = HashMap::new();
    for kv in input {
        let contribution = i128::from(kv.value.parse::<i64>().unwrap_or(1));
        *sums.entry(kv.key).or_insert(0) += contribution;
    }

    sums.into_iter()
        .map(|(k, v)| KeyValue::new(k, v.to_string()))
        .collect()
}
