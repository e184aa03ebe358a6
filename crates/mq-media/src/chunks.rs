//! Lazy chunked reads of a byte range from a file.
//!
//! A [`ChunkSequence`] owns exactly one open file handle. The handle is
//! released as soon as the sequence is exhausted, hits a read error, is
//! closed explicitly, or is dropped, so a consumer that stops early (client
//! disconnect) never leaks a descriptor.

use std::fs::File;
use std::io::{ErrorKind, Read, Seek, SeekFrom};
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use bytes::Bytes;
use mq_core::config::StreamingConfig;
use mq_core::{Error, Result};

use crate::range::ByteRange;

/// Opens [`ChunkSequence`]s with a fixed chunk size.
#[derive(Debug, Clone, Copy)]
pub struct ChunkStreamer {
    chunk_size: usize,
}

impl ChunkStreamer {
    pub fn new(config: &StreamingConfig) -> Self {
        Self {
            chunk_size: config.effective_chunk_size(),
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Open `path` positioned at `range.start()`, yielding `range.length()`
    /// bytes at most.
    pub fn open(&self, path: &Path, range: &ByteRange) -> Result<ChunkSequence> {
        self.open_span(path, range.start(), range.length())
    }

    /// Open `path` for a full read of `total_size` bytes.
    ///
    /// Unlike [`ChunkStreamer::open`] this accepts an empty resource, which
    /// yields no chunks at all.
    pub fn open_full(&self, path: &Path, total_size: u64) -> Result<ChunkSequence> {
        self.open_span(path, 0, total_size)
    }

    fn open_span(&self, path: &Path, start: u64, length: u64) -> Result<ChunkSequence> {
        if !path.is_file() {
            return Err(Error::not_found("file", path.display()));
        }

        let mut file = File::open(path).map_err(|e| match e.kind() {
            // Deleted between the check and the open.
            ErrorKind::NotFound => Error::not_found("file", path.display()),
            _ => Error::from(e),
        })?;
        if start > 0 {
            file.seek(SeekFrom::Start(start))?;
        }

        tracing::trace!(path = %path.display(), start, length, "Opened chunk sequence");

        Ok(ChunkSequence {
            file: Some(file),
            path: path.to_path_buf(),
            remaining: length,
            chunk_size: self.chunk_size,
        })
    }
}

impl Default for ChunkStreamer {
    fn default() -> Self {
        Self::new(&StreamingConfig::default())
    }
}

/// A finite, non-restartable sequence of file chunks.
///
/// Every chunk is `min(chunk_size, remaining)` bytes long, except that a
/// file shorter than expected ends the sequence early with whatever was read.
#[derive(Debug)]
pub struct ChunkSequence<R = File> {
    file: Option<R>,
    path: PathBuf,
    remaining: u64,
    chunk_size: usize,
}

impl<R> ChunkSequence<R> {
    /// Bytes still owed to the consumer.
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Whether the underlying file handle is still held.
    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    /// Release the file handle; subsequent calls to `next` return `None`.
    pub fn close(&mut self) {
        if self.file.take().is_some() {
            tracing::trace!(
                path = %self.path.display(),
                remaining = self.remaining,
                "Closed chunk sequence"
            );
        }
        self.remaining = 0;
    }
}

/// Fill `buf` from `reader`, stopping early only at end of input.
fn fill<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

impl<R: Read> Iterator for ChunkSequence<R> {
    type Item = std::io::Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            self.close();
            return None;
        }
        let file = self.file.as_mut()?;

        let want = self.remaining.min(self.chunk_size as u64) as usize;
        let mut buf = vec![0u8; want];
        match fill(file, &mut buf) {
            Ok(0) => {
                self.close();
                None
            }
            Ok(n) => {
                buf.truncate(n);
                self.remaining = if n < want { 0 } else { self.remaining - n as u64 };
                Some(Ok(Bytes::from(buf)))
            }
            Err(e) => {
                tracing::debug!(path = %self.path.display(), error = %e, "Chunk read failed");
                self.close();
                Some(Err(e))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.file.is_none() {
            return (0, Some(0));
        }
        let chunks = self.remaining.div_ceil(self.chunk_size as u64);
        (0, usize::try_from(chunks).ok())
    }
}

impl<R: Read> FusedIterator for ChunkSequence<R> {}
