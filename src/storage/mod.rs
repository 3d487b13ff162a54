//! Binary on-disk persistence for TF-IDF document vectors.
//!
//! Serialization only: the scorers always rebuild their in-memory structures
//! from the corpus and never read these files.

pub mod vector_file;

pub use vector_file::{
    DirectoryFileReader, DirectoryFileWriter, VectorFileReader, VectorFileWriter, VectorPointer,
};
