use std::path::PathBuf;
use std::process;

use clap::Parser;

use wordcount::io::{read_results, ArtifactLayout};
use wordcount::{run_job, JobConfig, Result};

#[derive(Parser, Debug)]
#[command(name = "wordcount", about = "Split a file into chunks and count its words")]
struct Cli {
    /// File to count
    input: PathBuf,

    /// JSON job config; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory that receives map/ and result/
    #[arg(long)]
    work_dir: Option<PathBuf>,

    /// Largest chunk in bytes
    #[arg(long)]
    chunk_size: Option<usize>,

    /// Number of reduce partitions
    #[arg(long)]
    reduce_jobs: Option<usize>,

    /// Map/reduce worker threads
    #[arg(long)]
    workers: Option<usize>,

    /// Print the N most frequent words when done
    #[arg(long)]
    top: Option<usize>,
}

impl Cli {
    fn job_config(&self) -> Result<JobConfig> {
        let mut config = match &self.config {
            Some(path) => JobConfig::from_file(path)?,
            None => JobConfig::default(),
        };
        if let Some(dir) = &self.work_dir {
            config.work_dir = dir.clone();
        }
        if let Some(n) = self.chunk_size {
            config.max_chunk_size = n;
        }
        if let Some(n) = self.reduce_jobs {
            config.num_reduce_jobs = n;
        }
        if let Some(n) = self.workers {
            config.workers = n;
        }
        Ok(config)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("wordcount: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.job_config()?;
    let summary = run_job(&config, &cli.input)?;

    if let Some(n) = cli.top {
        let layout = ArtifactLayout::new(&config.work_dir);
        let mut counts: Vec<(String, u64)> = read_results(&layout, summary.results)?
            .into_iter()
            .map(|kv| {
                let count = kv.value.parse().unwrap_or(0);
                (kv.key, count)
            })
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        for (word, count) in counts.into_iter().take(n) {
            println!("{:>10} {}", count, word);
        }
    }
    Ok(())
}
