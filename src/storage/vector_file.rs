//! Binary document-vector file and its random-access directory.
//!
//! Two files make up the persisted index. The vector file stores, per
//! document:
//!
//! ```text
//! doc_id: i32, entry_count: i32, entry_count x (term_id: i32, weight: f64)
//! ```
//!
//! The directory file stores one fixed-width record per document for
//! random-access lookup:
//!
//! ```text
//! doc_id: i32, byte_position: i64, entry_count: i32
//! ```
//!
//! All integers and floats are big-endian.

use std::fs::File;
use std::io::{BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::Path;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use crate::corpus::DocId;
use crate::error::{Result, TrawlError};
use crate::index::TermId;

/// Directory record locating one document's vector in the vector file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorPointer {
    /// Id of the document the record points at.
    pub doc_id: DocId,
    /// Byte offset of the vector within the vector file.
    pub byte_position: u64,
    /// Number of (term id, weight) entries in the vector.
    pub entry_count: u32,
}

/// Sequential writer for the vector file.
pub struct VectorFileWriter {
    writer: BufWriter<File>,
    position: u64,
}

impl VectorFileWriter {
    /// Create (truncating) the vector file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(VectorFileWriter {
            writer: BufWriter::new(file),
            position: 0,
        })
    }

    /// Append one document vector and return its directory record.
    ///
    /// Entries are written in the order given; callers wanting a canonical
    /// file sort them by term id first.
    pub fn write_vector(
        &mut self,
        doc_id: DocId,
        entries: &[(TermId, f64)],
    ) -> Result<VectorPointer> {
        let pointer = VectorPointer {
            doc_id,
            byte_position: self.position,
            entry_count: entries.len() as u32,
        };

        self.writer.write_i32::<BigEndian>(doc_id as i32)?;
        self.writer.write_i32::<BigEndian>(entries.len() as i32)?;
        for &(term_id, weight) in entries {
            self.writer.write_i32::<BigEndian>(term_id as i32)?;
            self.writer.write_f64::<BigEndian>(weight)?;
        }
        self.position += 8 + entries.len() as u64 * 12;

        Ok(pointer)
    }

    /// Flush and close the file.
    pub fn finish(mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Reader for the vector file, sequential or positioned.
pub struct VectorFileReader {
    reader: BufReader<File>,
    length: u64,
}

impl VectorFileReader {
    /// Open the vector file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let length = file.metadata()?.len();
        Ok(VectorFileReader {
            reader: BufReader::new(file),
            length,
        })
    }

    /// Read the vector at the current position.
    pub fn read_vector(&mut self) -> Result<(DocId, Vec<(TermId, f64)>)> {
        let doc_id = self.reader.read_i32::<BigEndian>()?;
        let entry_count = self.reader.read_i32::<BigEndian>()?;
        if entry_count < 0 {
            return Err(TrawlError::storage(format!(
                "negative entry count {entry_count} for document {doc_id}"
            )));
        }

        let mut entries = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let term_id = self.reader.read_i32::<BigEndian>()?;
            let weight = self.reader.read_f64::<BigEndian>()?;
            entries.push((term_id as TermId, weight));
        }

        Ok((doc_id as DocId, entries))
    }

    /// Seek to `byte_position` and read the vector there.
    pub fn read_vector_at(&mut self, byte_position: u64) -> Result<(DocId, Vec<(TermId, f64)>)> {
        self.reader.seek(SeekFrom::Start(byte_position))?;
        self.read_vector()
    }

    /// Read every vector from the start of the file.
    pub fn read_all(&mut self) -> Result<Vec<(DocId, Vec<(TermId, f64)>)>> {
        self.reader.seek(SeekFrom::Start(0))?;
        let mut vectors = Vec::new();
        let mut position = 0u64;
        while position < self.length {
            let vector = self.read_vector()?;
            position += 8 + vector.1.len() as u64 * 12;
            vectors.push(vector);
        }
        Ok(vectors)
    }
}

/// Sequential writer for the directory file.
pub struct DirectoryFileWriter {
    writer: BufWriter<File>,
}

impl DirectoryFileWriter {
    /// Create (truncating) the directory file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::create(path)?;
        Ok(DirectoryFileWriter {
            writer: BufWriter::new(file),
        })
    }

    /// Append one directory record.
    pub fn write_pointer(&mut self, pointer: &VectorPointer) -> Result<()> {
        self.writer.write_i32::<BigEndian>(pointer.doc_id as i32)?;
        self.writer
            .write_i64::<BigEndian>(pointer.byte_position as i64)?;
        self.writer
            .write_i32::<BigEndian>(pointer.entry_count as i32)?;
        Ok(())
    }

    /// Append every record, then flush and close the file.
    pub fn write_all(mut self, pointers: &[VectorPointer]) -> Result<()> {
        for pointer in pointers {
            self.write_pointer(pointer)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

/// Reader for the directory file.
pub struct DirectoryFileReader {
    reader: BufReader<File>,
    length: u64,
}

impl DirectoryFileReader {
    /// Open the directory file at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let length = file.metadata()?.len();
        Ok(DirectoryFileReader {
            reader: BufReader::new(file),
            length,
        })
    }

    /// Read every directory record.
    pub fn read_all(&mut self) -> Result<Vec<VectorPointer>> {
        const RECORD_SIZE: u64 = 16;
        if self.length % RECORD_SIZE != 0 {
            return Err(TrawlError::storage(format!(
                "directory file length {} is not a multiple of the record size",
                self.length
            )));
        }

        let mut pointers = Vec::with_capacity((self.length / RECORD_SIZE) as usize);
        let mut position = 0u64;
        while position < self.length {
            let doc_id = self.reader.read_i32::<BigEndian>()?;
            let byte_position = self.reader.read_i64::<BigEndian>()?;
            let entry_count = self.reader.read_i32::<BigEndian>()?;
            pointers.push(VectorPointer {
                doc_id: doc_id as DocId,
                byte_position: byte_position as u64,
                entry_count: entry_count as u32,
            });
            position += RECORD_SIZE;
        }

        Ok(pointers)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn sample_vectors() -> Vec<(DocId, Vec<(TermId, f64)>)> {
        vec![
            (1, vec![(1, 0.5), (3, 1.25)]),
            (2, Vec::new()),
            (3, vec![(2, 2.0)]),
        ]
    }

    #[test]
    fn test_vector_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("vectors.bin");

        let mut writer = VectorFileWriter::create(&path).unwrap();
        let mut pointers = Vec::new();
        for (doc_id, entries) in sample_vectors() {
            pointers.push(writer.write_vector(doc_id, &entries).unwrap());
        }
        writer.finish().unwrap();

        let mut reader = VectorFileReader::open(&path).unwrap();
        assert_eq!(reader.read_all().unwrap(), sample_vectors());

        // Pointers give random access in any order.
        let (doc_id, entries) = reader.read_vector_at(pointers[2].byte_position).unwrap();
        assert_eq!(doc_id, 3);
        assert_eq!(entries, vec![(2, 2.0)]);

        let (doc_id, entries) = reader.read_vector_at(pointers[0].byte_position).unwrap();
        assert_eq!(doc_id, 1);
        assert_eq!(entries.len(), 2);
    }

    #[test]
    fn test_directory_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("directory.bin");

        let pointers = vec![
            VectorPointer {
                doc_id: 1,
                byte_position: 0,
                entry_count: 2,
            },
            VectorPointer {
                doc_id: 3,
                byte_position: 32,
                entry_count: 1,
            },
        ];

        DirectoryFileWriter::create(&path)
            .unwrap()
            .write_all(&pointers)
            .unwrap();

        let mut reader = DirectoryFileReader::open(&path).unwrap();
        assert_eq!(reader.read_all().unwrap(), pointers);
    }

    #[test]
    fn test_truncated_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("directory.bin");
        std::fs::write(&path, [0u8; 10]).unwrap();

        let mut reader = DirectoryFileReader::open(&path).unwrap();
        assert!(matches!(
            reader.read_all(),
            Err(TrawlError::Storage(_))
        ));
    }
}
