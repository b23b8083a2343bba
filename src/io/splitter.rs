use std::fs::{self, File};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use log::{info, trace};

use crate::error::{Result, WordCountError};
use crate::io::boundary::{find_chunk_max_offset, UTF8_MAX};
use crate::io::ArtifactLayout;

/// Splits `path` into chunk artifacts of at most `max_chunk_size` bytes and
/// returns how many were written. Chunks already written stay on disk when
/// a later step fails.
pub fn split_data(path: &Path, max_chunk_size: usize, layout: &ArtifactLayout) -> Result<usize> {
    if max_chunk_size == 0 {
        return Err(WordCountError::InvalidConfig(
            "max_chunk_size must be greater than zero".to_string(),
        ));
    }

    let mut file = File::open(path).map_err(|e| WordCountError::io(path, e))?;
    let map_dir = layout.map_dir();
    fs::create_dir_all(&map_dir).map_err(|e| WordCountError::io(&map_dir, e))?;

    let window_len = max_chunk_size + UTF8_MAX;
    let mut window = Vec::with_capacity(window_len);
    let mut file_offset: u64 = 0;
    let mut num_chunks = 0;

    loop {
        read_window(&mut file, path, file_offset, window_len, &mut window)?;
        if window.is_empty() {
            break;
        }

        let cut = find_chunk_max_offset(&window, max_chunk_size);
        if cut == 0 {
            return Err(WordCountError::ChunkBoundary {
                offset: file_offset,
                max_chunk_size,
            });
        }

        let chunk_path = layout.chunk_path(num_chunks);
        fs::write(&chunk_path, &window[..cut]).map_err(|e| WordCountError::io(&chunk_path, e))?;
        trace!("wrote {} ({} bytes)", chunk_path.display(), cut);

        file_offset += cut as u64;
        num_chunks += 1;
    }

    info!(
        "split {} into {} chunks ({} bytes)",
        path.display(),
        num_chunks,
        file_offset
    );
    Ok(num_chunks)
}

// fills `window` with up to `len` bytes from `offset`; shorter only at end of file
fn read_window(
    file: &mut File,
    path: &Path,
    offset: u64,
    len: usize,
    window: &mut Vec<u8>,
) -> Result<()> {
    window.clear();
    file.seek(SeekFrom::Start(offset))
        .map_err(|e| WordCountError::io(path, e))?;
    file.by_ref()
        .take(len as u64)
        .read_to_end(window)
        .map_err(|e| WordCountError::io(path, e))?;
    Ok(())
}
