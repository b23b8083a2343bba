use std::fs::{self, File};
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::{Result, WordCountError};
use crate::pipeline::KeyValue;

pub mod boundary;
pub mod fan_in;
pub mod fan_out;
pub mod splitter;

pub use fan_in::{fan_in, FanIn};
pub use fan_out::{fan_out, FanOutDone};
pub use splitter::split_data;

pub const MAP_PATH: &str = "map";
pub const RESULT_PATH: &str = "result";

/// Where chunk and result artifacts live under a work directory.
#[derive(Debug, Clone)]
pub struct ArtifactLayout {
    root: PathBuf,
}

impl ArtifactLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        ArtifactLayout { root: root.into() }
    }

    pub fn map_dir(&self) -> PathBuf {
        self.root.join(MAP_PATH)
    }

    pub fn result_dir(&self) -> PathBuf {
        self.root.join(RESULT_PATH)
    }

    pub fn chunk_path(&self, id: usize) -> PathBuf {
        self.map_dir().join(format!("map-{}", id))
    }

    pub fn result_path(&self, id: usize) -> PathBuf {
        self.result_dir().join(format!("result-{}", id))
    }

    pub fn prepare(&self) -> Result<()> {
        for dir in [self.map_dir(), self.result_dir()].iter() {
            fs::create_dir_all(dir).map_err(|e| WordCountError::io(dir, e))?;
        }
        Ok(())
    }
}

// READ BACK
pub fn read_result(path: &Path) -> Result<Vec<KeyValue>> {
    let file = File::open(path).map_err(|e| WordCountError::io(path, e))?;
    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| WordCountError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let kv = serde_json::from_str(&line).map_err(|source| WordCountError::Decode {
            path: path.to_path_buf(),
            line: idx + 1,
            source,
        })?;
        records.push(kv);
    }
    Ok(records)
}

/// Loads result artifacts `0 .. count` in id order.
pub fn read_results(layout: &ArtifactLayout, count: usize) -> Result<Vec<KeyValue>> {
    let mut all = Vec::new();
    for id in 0..count {
        all.extend(read_result(&layout.result_path(id))?);
    }
    Ok(all)
}
