use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::sync::Arc;
use std::thread::spawn;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::debug;

use crate::error::{Result, WordCountError};
use crate::future::{Future, WritableFuture};
use crate::io::ArtifactLayout;
use crate::pipeline::KeyValue;

/// Resolves to the number of result artifacts once the writer has drained
/// its queue, or to the first write error.
pub type FanOutDone = Arc<Future<Result<usize>>>;

/// Starts the result writer. Every batch sent is one reduce partition and
/// becomes the next `result-<id>` file, ids following arrival order. Drop
/// the sender to let the writer finish.
pub fn fan_out(layout: &ArtifactLayout, capacity: usize) -> (Sender<Vec<KeyValue>>, FanOutDone) {
    let (output, batches) = bounded(capacity);
    let done = Arc::new(Future::new());

    let layout = layout.clone();
    let published = Arc::clone(&done);
    spawn(move || {
        published.put(store_batches(&layout, batches));
    });

    (output, done)
}

fn store_batches(layout: &ArtifactLayout, batches: Receiver<Vec<KeyValue>>) -> Result<usize> {
    let result_dir = layout.result_dir();
    fs::create_dir_all(&result_dir).map_err(|e| WordCountError::io(&result_dir, e))?;

    let mut reduce_counter = 0;
    for batch in batches {
        let path = layout.result_path(reduce_counter);
        debug!("fanning out {} ({} records)", path.display(), batch.len());

        let file = File::create(&path).map_err(|e| WordCountError::io(&path, e))?;
        let mut writer = BufWriter::new(file);
        for kv in batch.iter() {
            serde_json::to_writer(&mut writer, kv)?;
            writer
                .write_all(b"\n")
                .map_err(|e| WordCountError::io(&path, e))?;
        }
        writer.flush().map_err(|e| WordCountError::io(&path, e))?;

        reduce_counter += 1;
    }
    Ok(reduce_counter)
}
