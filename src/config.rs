use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, WordCountError};

pub const MAP_BUFFER_SIZE: usize = 10;
pub const REDUCE_BUFFER_SIZE: usize = 10;
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Settings for one word-count job. Every field has a default so a config
/// file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub work_dir: PathBuf,
    pub max_chunk_size: usize,
    pub map_buffer_size: usize,
    pub reduce_buffer_size: usize,
    pub num_reduce_jobs: usize,
    pub workers: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        JobConfig {
            work_dir: PathBuf::from("."),
            max_chunk_size: DEFAULT_CHUNK_SIZE,
            map_buffer_size: MAP_BUFFER_SIZE,
            reduce_buffer_size: REDUCE_BUFFER_SIZE,
            num_reduce_jobs: num_cpus::get(),
            workers: num_cpus::get(),
        }
    }
}

impl JobConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| WordCountError::io(path, e))?;
        serde_json::from_str(&raw).map_err(|e| {
            WordCountError::InvalidConfig(format!("{}: {}", path.display(), e))
        })
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("max_chunk_size", self.max_chunk_size),
            ("map_buffer_size", self.map_buffer_size),
            ("reduce_buffer_size", self.reduce_buffer_size),
            ("num_reduce_jobs", self.num_reduce_jobs),
            ("workers", self.workers),
        ];
        for (name, value) in positive.iter() {
            if *value == 0 {
                return Err(WordCountError::InvalidConfig(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }
        Ok(())
    }
}
