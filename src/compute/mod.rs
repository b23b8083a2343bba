//! In-process job driver.
//!
//! Plays the scheduler's part on a single machine: split, fan chunks into
//! map + shuffle, reduce each partition and fan the batches out. Map and
//! reduce calls run on a rayon pool.

use std::path::Path;

use log::{info, warn};
use rayon::prelude::*;

use crate::config::JobConfig;
use crate::error::{Result, WordCountError};
use crate::future::PollableFuture;
use crate::io::{fan_in, fan_out, split_data, ArtifactLayout};
use crate::pipeline::{KeyValue, PipelineStage, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JobSummary {
    pub chunks: usize,
    pub results: usize,
    pub distinct_words: usize,
    pub total_words: u64,
}

pub fn run_job(config: &JobConfig, input: &Path) -> Result<JobSummary> {
    run_job_with(config, input, PipelineStage::word_count())
}

pub fn run_job_with(config: &JobConfig, input: &Path, stage: PipelineStage) -> Result<JobSummary> {
    config.validate()?;
    let layout = ArtifactLayout::new(&config.work_dir);
    layout.prepare()?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .build()?;
    let task = Task {
        num_reduce_jobs: config.num_reduce_jobs,
    };

    let chunks = split_data(input, config.max_chunk_size, &layout)?;

    info!("mapping {} chunks", chunks);
    let stream = fan_in(&layout, chunks, config.map_buffer_size);
    let partitions = pool.install(|| map_and_shuffle(&stage, &task, &stream));
    stream.finish()?;

    info!("reducing {} partitions", task.num_reduce_jobs);
    let reduced: Vec<Vec<KeyValue>> = pool.install(|| {
        partitions
            .into_par_iter()
            .map(|partition| stage.apply_reduce(partition))
            .collect()
    });

    let mut summary = JobSummary {
        chunks,
        ..JobSummary::default()
    };
    for kv in reduced.iter().flatten() {
        summary.distinct_words += 1;
        summary.total_words += kv.value.parse::<u64>().unwrap_or(0);
    }

    // submitted in partition order so result-<id> matches the partition index
    let (output, done) = fan_out(&layout, config.reduce_buffer_size);
    for batch in reduced {
        if output.send(batch).is_err() {
            warn!("result writer stopped early");
            break;
        }
    }
    drop(output);
    summary.results = done
        .wait()
        .unwrap_or(Err(WordCountError::ChannelClosed("fan-out")))?;

    info!(
        "wrote {} result files: {} distinct words, {} total",
        summary.results, summary.distinct_words, summary.total_words
    );
    Ok(summary)
}

fn map_and_shuffle(
    stage: &PipelineStage,
    task: &Task,
    stream: &crate::io::FanIn,
) -> Vec<Vec<KeyValue>> {
    stream
        .chunks()
        .iter()
        .par_bridge()
        .map(|chunk| stage.apply_shuffle(task, stage.apply_map(&chunk)))
        .reduce(
            || vec![Vec::new(); task.num_reduce_jobs],
            |mut acc, parts| {
                for (bucket, part) in acc.iter_mut().zip(parts) {
                    bucket.extend(part);
                }
                acc
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::read_results;
    use std::collections::HashMap;
    use std::fs;

    fn config_in(dir: &Path, max_chunk_size: usize, num_reduce_jobs: usize) -> JobConfig {
        JobConfig {
            work_dir: dir.to_path_buf(),
            max_chunk_size,
            num_reduce_jobs,
            workers: 2,
            ..JobConfig::default()
        }
    }

    #[test]
    fn counts_words_across_chunks() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        fs::write(&input, "The cat saw the dog. THE END, the end!").unwrap();

        let config = config_in(dir.path(), 8, 3);
        let summary = run_job(&config, &input).unwrap();
        assert!(summary.chunks > 1);
        assert_eq!(summary.results, 3);
        assert_eq!(summary.total_words, 9);

        let layout = ArtifactLayout::new(dir.path());
        let counts: HashMap<String, String> = read_results(&layout, summary.results)
            .unwrap()
            .into_iter()
            .map(|kv| (kv.key, kv.value))
            .collect();
        assert_eq!(counts.len(), summary.distinct_words);
        assert_eq!(counts["the"], "4");
        assert_eq!(counts["end"], "2");
        assert_eq!(counts["cat"], "1");
    }

    #[test]
    fn result_ids_match_partition_indices() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        fs::write(&input, "alpha beta gamma delta epsilon zeta eta theta").unwrap();

        let config = config_in(dir.path(), 16, 4);
        let summary = run_job(&config, &input).unwrap();
        let task = Task { num_reduce_jobs: 4 };
        let layout = ArtifactLayout::new(dir.path());
        for id in 0..summary.results {
            for kv in crate::io::read_result(&layout.result_path(id)).unwrap() {
                assert_eq!((PipelineStage::word_count().shuffle_func)(&task, &kv.key), id);
            }
        }
    }

    #[test]
    fn oversized_word_aborts_the_job() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("input.txt");
        fs::write(&input, "short incomprehensibilities").unwrap();

        let config = config_in(dir.path(), 8, 2);
        assert!(matches!(
            run_job(&config, &input),
            Err(WordCountError::ChunkBoundary { .. })
        ));
    }

    #[test]
    fn invalid_config_is_rejected_before_any_work() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path(), 8, 0);
        assert!(matches!(
            run_job(&config, &dir.path().join("missing")),
            Err(WordCountError::InvalidConfig(_))
        ));
        assert!(!dir.path().join("map").exists());
    }
}
