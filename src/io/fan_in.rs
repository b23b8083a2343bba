use std::fs;
use std::sync::Arc;
use std::thread::spawn;

use crossbeam_channel::{bounded, Receiver, Sender};
use log::debug;

use crate::error::{Result, WordCountError};
use crate::future::{Future, PollableFuture, WritableFuture};
use crate::io::ArtifactLayout;

/// Ordered stream of chunk contents fed by a background loader.
///
/// The stream ends when every chunk was delivered or the loader failed;
/// `finish` tells the two apart.
pub struct FanIn {
    chunks: Receiver<Vec<u8>>,
    done: Arc<Future<Result<usize>>>,
}

impl FanIn {
    pub fn chunks(&self) -> &Receiver<Vec<u8>> {
        &self.chunks
    }

    /// Drops the stream and waits for the loader. Returns the number of
    /// chunks it delivered.
    pub fn finish(self) -> Result<usize> {
        let FanIn { chunks, done } = self;
        drop(chunks);
        done.wait()
            .unwrap_or(Err(WordCountError::ChannelClosed("fan-in")))
    }
}

impl Iterator for FanIn {
    type Item = Vec<u8>;

    fn next(&mut self) -> Option<Vec<u8>> {
        self.chunks.recv().ok()
    }
}

/// Starts loading chunks `0 .. num_chunks` into a queue holding at most
/// `capacity` of them.
pub fn fan_in(layout: &ArtifactLayout, num_chunks: usize, capacity: usize) -> FanIn {
    let (input, chunks) = bounded(capacity);
    let done = Arc::new(Future::new());

    let layout = layout.clone();
    let published = Arc::clone(&done);
    spawn(move || {
        published.put(load_chunks(&layout, num_chunks, input));
    });

    FanIn { chunks, done }
}

fn load_chunks(layout: &ArtifactLayout, num_chunks: usize, input: Sender<Vec<u8>>) -> Result<usize> {
    for id in 0..num_chunks {
        let path = layout.chunk_path(id);
        let buffer = fs::read(&path).map_err(|e| WordCountError::io(&path, e))?;

        debug!("fanning in {}", path.display());
        input
            .send(buffer)
            .map_err(|_| WordCountError::ChannelClosed("fan-in"))?;
    }
    Ok(num_chunks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout_with_chunks(chunks: &[&[u8]]) -> (tempfile::TempDir, ArtifactLayout) {
        let dir = tempfile::tempdir().unwrap();
        let layout = ArtifactLayout::new(dir.path());
        layout.prepare().unwrap();
        for (id, chunk) in chunks.iter().enumerate() {
            fs::write(layout.chunk_path(id), chunk).unwrap();
        }
        (dir, layout)
    }

    #[test]
    fn delivers_chunks_in_id_order() {
        let parts: Vec<Vec<u8>> = (0..25).map(|i| format!("chunk {}", i).into_bytes()).collect();
        let refs: Vec<&[u8]> = parts.iter().map(|p| p.as_slice()).collect();
        let (_dir, layout) = layout_with_chunks(&refs);

        let mut stage = fan_in(&layout, parts.len(), 2);
        let received: Vec<Vec<u8>> = stage.by_ref().collect();
        assert_eq!(received, parts);
        assert_eq!(stage.finish().unwrap(), 25);
    }

    #[test]
    fn missing_chunk_ends_the_stream_with_an_error() {
        let (_dir, layout) = layout_with_chunks(&[b"zero", b"one"]);

        let mut stage = fan_in(&layout, 3, 10);
        let received: Vec<Vec<u8>> = stage.by_ref().collect();
        assert_eq!(received, vec![b"zero".to_vec(), b"one".to_vec()]);
        match stage.finish() {
            Err(WordCountError::Io { path, .. }) => assert_eq!(path, layout.chunk_path(2)),
            other => panic!("expected Io error, got {:?}", other),
        }
    }

    #[test]
    fn no_chunks_is_an_empty_stream() {
        let (_dir, layout) = layout_with_chunks(&[]);
        let mut stage = fan_in(&layout, 0, 1);
        assert!(stage.next().is_none());
        assert_eq!(stage.finish().unwrap(), 0);
    }
}
