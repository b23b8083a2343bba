//! Worker-side data plane for a map/reduce word count.
//!
//! Input files are cut into word-safe chunks (`io::split_data`), streamed
//! through bounded background stages (`io::fan_in`, `io::fan_out`) and
//! counted by the map/shuffle/reduce functions in `pipeline::word_count`.

pub mod compute;
pub mod config;
pub mod error;
pub mod future;
pub mod io;
pub mod pipeline;

pub use compute::{run_job, JobSummary};
pub use config::JobConfig;
pub use error::{Result, WordCountError};
pub use pipeline::{KeyValue, PipelineStage, Task};
