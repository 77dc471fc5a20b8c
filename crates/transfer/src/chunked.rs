use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::types::{Chunk, ChunkPlan, ChunkRange};
use crate::TransferError;

/// Any seekable byte source; blanket-implemented.
pub trait ReadSeek: Read + Seek {}

impl<T: Read + Seek> ReadSeek for T {}

// ---------------------------------------------------------------------------
// ChunkReader
// ---------------------------------------------------------------------------

/// Reads the chunks of a [`ChunkPlan`] from a seekable source.
///
/// Chunks are read by index, so a paused upload resumes at exactly the
/// next unsent range without re-reading earlier ones.
pub struct ChunkReader {
    source: Box<dyn ReadSeek + Send>,
    plan: ChunkPlan,
}

impl ChunkReader {
    /// Opens `path` for chunked reading.
    ///
    /// If `chunk_size` is 0, [`crate::CHUNK_SIZE`] (5 MiB) is used.
    pub fn open(path: &Path, chunk_size: usize) -> Result<Self, TransferError> {
        let file = std::fs::File::open(path)?;
        let file_size = file.metadata()?.len();
        Ok(Self {
            source: Box::new(file),
            plan: ChunkPlan::new(file_size, chunk_size),
        })
    }

    /// Wraps any seekable source of a known size.
    pub fn new(source: Box<dyn ReadSeek + Send>, size: u64, chunk_size: usize) -> Self {
        Self {
            source,
            plan: ChunkPlan::new(size, chunk_size),
        }
    }

    pub fn plan(&self) -> &ChunkPlan {
        &self.plan
    }

    /// Reads chunk `index` of the plan.
    pub fn read_chunk(&mut self, index: u64) -> Result<Chunk, TransferError> {
        let range = self.plan.range(index)?;
        self.read_range(range)
    }

    fn read_range(&mut self, range: ChunkRange) -> Result<Chunk, TransferError> {
        let mut buf = vec![0u8; range.len()];
        if !buf.is_empty() {
            self.source.seek(SeekFrom::Start(range.start))?;
            let mut filled = 0;
            while filled < buf.len() {
                let n = self.source.read(&mut buf[filled..])?;
                if n == 0 {
                    return Err(TransferError::ShortRead {
                        offset: range.start,
                        expected: buf.len(),
                        actual: filled,
                    });
                }
                filled += n;
            }
        }
        Ok(Chunk {
            index: range.index,
            offset: range.start,
            data: buf,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use tempfile::TempDir;

    fn in_memory(data: &[u8], chunk_size: usize) -> ChunkReader {
        ChunkReader::new(Box::new(Cursor::new(data.to_vec())), data.len() as u64, chunk_size)
    }

    fn create_test_file(dir: &Path, name: &str, data: &[u8]) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(data).unwrap();
        path
    }

    #[test]
    fn reads_all_chunks_from_file() {
        let dir = TempDir::new().unwrap();
        let path = create_test_file(dir.path(), "test.bin", b"AABBCCDDEE");

        let mut reader = ChunkReader::open(&path, 4).unwrap();
        assert_eq!(reader.plan().file_size(), 10);
        assert_eq!(reader.plan().total_chunks(), 3);

        let c0 = reader.read_chunk(0).unwrap();
        assert_eq!((c0.index, c0.offset), (0, 0));
        assert_eq!(&c0.data, b"AABB");

        let c1 = reader.read_chunk(1).unwrap();
        assert_eq!(c1.offset, 4);
        assert_eq!(&c1.data, b"CCDD");

        let c2 = reader.read_chunk(2).unwrap();
        assert_eq!(c2.offset, 8);
        assert_eq!(c2.size(), 2);
        assert_eq!(&c2.data, b"EE");

        assert!(matches!(
            reader.read_chunk(3),
            Err(TransferError::RangeOutOfBounds { .. })
        ));
    }

    #[test]
    fn reads_out_of_order_by_index() {
        let mut reader = in_memory(b"0123456789", 4);
        assert_eq!(&reader.read_chunk(2).unwrap().data, b"89");
        assert_eq!(&reader.read_chunk(0).unwrap().data, b"0123");
    }

    #[test]
    fn empty_source_yields_one_empty_chunk() {
        let mut reader = in_memory(&[], 4);
        assert_eq!(reader.plan().total_chunks(), 1);
        let c = reader.read_chunk(0).unwrap();
        assert!(c.data.is_empty());
    }

    #[test]
    fn chunks_reassemble_to_original() {
        let original = b"The quick brown fox jumps over the lazy dog".to_vec();
        let mut reader = in_memory(&original, 10);
        let mut out = Vec::new();
        for i in 0..reader.plan().total_chunks() {
            out.extend(reader.read_chunk(i).unwrap().data);
        }
        assert_eq!(out, original);
    }

    #[test]
    fn truncated_source_is_short_read() {
        // Claims 8 bytes but only holds 5.
        let mut reader = ChunkReader::new(Box::new(Cursor::new(b"12345".to_vec())), 8, 4);
        assert!(reader.read_chunk(0).is_ok());
        assert!(matches!(
            reader.read_chunk(1),
            Err(TransferError::ShortRead { offset: 4, expected: 4, actual: 1 })
        ));
    }

    #[test]
    fn open_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let result = ChunkReader::open(&dir.path().join("nope.bin"), 4);
        assert!(matches!(result, Err(TransferError::Io(_))));
    }
}
