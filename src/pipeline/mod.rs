use serde::{Deserialize, Serialize};

pub mod word_count;

/// One record of map or reduce output. The value is a decimal count kept as
/// text so both phases share the same shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct KeyValue {
    pub key: String,
    pub value: String,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        KeyValue {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Task descriptor handed out by the scheduler. `num_reduce_jobs` must be
/// non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Task {
    pub num_reduce_jobs: usize,
}

// map stuff
pub type MapFunc = fn(input: &[u8]) -> Vec<KeyValue>;

// for shuffle purpose
pub type ShuffleFunc = fn(task: &Task, key: &str) -> usize;

// reduce stuff
pub type ReduceFunc = fn(input: Vec<KeyValue>) -> Vec<KeyValue>;

#[derive(Clone, Copy)]
pub struct PipelineStage {
    pub map_func: MapFunc,
    pub shuffle_func: ShuffleFunc,
    pub reduce_func: ReduceFunc,
}

impl PipelineStage {
    pub fn word_count() -> Self {
        PipelineStage {
            map_func: word_count::map_func,
            shuffle_func: word_count::shuffle_func,
            reduce_func: word_count::reduce_func,
        }
    }

    pub fn apply_map(&self, bytes: &[u8]) -> Vec<KeyValue> {
        (self.map_func)(bytes)
    }

    /// Routes every pair to its partition. The result always has
    /// `task.num_reduce_jobs` buckets, some possibly empty.
    pub fn apply_shuffle(&self, task: &Task, map_outputs: Vec<KeyValue>) -> Vec<Vec<KeyValue>> {
        let mut partitions: Vec<Vec<KeyValue>> = vec![Vec::new(); task.num_reduce_jobs];
        for kv in map_outputs {
            let idx = (self.shuffle_func)(task, &kv.key);
            partitions[idx].push(kv);
        }
        partitions
    }

    pub fn apply_reduce(&self, partition: Vec<KeyValue>) -> Vec<KeyValue> {
        (self.reduce_func)(partition)
    }
}
