use crate::{CHUNK_SIZE, TransferError};

/// A chunk of file data ready to be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Zero-based position of this chunk within the file.
    pub index: u64,
    /// Byte offset within the file.
    pub offset: u64,
    /// Raw chunk data.
    pub data: Vec<u8>,
}

impl Chunk {
    /// Size of this chunk in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Half-open byte range `[start, end)` of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkRange {
    pub index: u64,
    pub start: u64,
    pub end: u64,
}

impl ChunkRange {
    /// Length of the range in bytes.
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// How a file of a given size is split into chunks.
///
/// A zero-byte file is planned as a single empty chunk so the server still
/// receives a final chunk and materialises the (empty) file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    file_size: u64,
    chunk_size: u64,
    total_chunks: u64,
}

impl ChunkPlan {
    /// Plans `file_size` bytes in chunks of `chunk_size`.
    ///
    /// If `chunk_size` is 0, [`CHUNK_SIZE`] (5 MiB) is used.
    pub fn new(file_size: u64, chunk_size: usize) -> Self {
        let chunk_size = if chunk_size == 0 {
            CHUNK_SIZE as u64
        } else {
            chunk_size as u64
        };
        let total_chunks = file_size.div_ceil(chunk_size).max(1);
        Self {
            file_size,
            chunk_size,
            total_chunks,
        }
    }

    /// Total file size in bytes.
    pub fn file_size(&self) -> u64 {
        self.file_size
    }

    pub fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Number of chunks that will be sent (at least 1).
    pub fn total_chunks(&self) -> u64 {
        self.total_chunks
    }

    /// Byte range of chunk `index`.
    pub fn range(&self, index: u64) -> Result<ChunkRange, TransferError> {
        if index >= self.total_chunks {
            return Err(TransferError::RangeOutOfBounds {
                index,
                total: self.total_chunks,
            });
        }
        let start = index * self.chunk_size;
        let end = std::cmp::min(self.file_size, start + self.chunk_size);
        Ok(ChunkRange { index, start, end })
    }

    /// All chunk ranges in send order.
    pub fn ranges(&self) -> impl Iterator<Item = ChunkRange> + '_ {
        (0..self.total_chunks).map(move |index| {
            let start = index * self.chunk_size;
            ChunkRange {
                index,
                start,
                end: std::cmp::min(self.file_size, start + self.chunk_size),
            }
        })
    }
}
