//! Error taxonomy for the dsqdata reader/writer.
//!
//! Errors are grouped the way the on-disk format's failure modes naturally split:
//! a file that can't be found, a file whose bytes don't parse, an alphabet mismatch,
//! an underlying OS failure, or a destination that can't be written. Every fallible
//! operation in this crate returns [`Result`], and `?` threads the concrete sub-error
//! types up into the top-level [`Error`] via `#[from]`.

use std::path::PathBuf;

use crate::alphabet::AlphabetKind;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type returned by every public operation.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Incompatible(#[from] IncompatibleError),

    #[error("system error: {0}")]
    System(#[from] std::io::Error),

    #[error("allocation failure: {0}")]
    Memory(String),

    #[error(transparent)]
    WriteFailed(#[from] WriteError),
}

/// One of the four database files could not be opened for reading.
#[derive(thiserror::Error, Debug)]
#[error("failed to open {which} file at {path}: {source}")]
pub struct NotFoundError {
    pub which: &'static str,
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Bad header, bad tag, truncated record, or other malformed on-disk data.
#[derive(thiserror::Error, Debug)]
pub enum FormatError {
    #[error("{which} file: bad magic number {found:#010x}")]
    BadMagic { which: &'static str, found: u32 },

    #[error("{which} file: byte-swapped magic number {found:#010x} detected; cross-endian databases are not supported")]
    ByteSwapped { which: &'static str, found: u32 },

    #[error("{which} file: tag {found:#010x} does not match stub tag {expected:#010x}")]
    TagMismatch {
        which: &'static str,
        expected: u32,
        found: u32,
    },

    #[error("stub file: malformed tag line {0:?}")]
    BadStub(String),

    #[error("stub file: unsupported dsqdata format version {0}")]
    UnsupportedVersion(u32),

    #[error("index file: reserved flags field must be zero, found {0:#x}")]
    NonZeroFlags(u32),

    #[error("index file: unknown alphabet kind {0}")]
    UnknownAlphabet(u32),

    #[error("index file: truncated record at sequence {index}")]
    TruncatedRecord { index: u64 },

    #[error("metadata record {index} is missing a null terminator for its {field} field")]
    UnterminatedMetadata { index: u64, field: &'static str },

    #[error("sequence file: residue decode produced {got} sequences, expected {expected}")]
    SequenceCountMismatch { expected: usize, got: usize },

    #[error("sequence file: expected {expected} packets for this chunk, read {got}")]
    ShortPacketRead { expected: usize, got: usize },

    #[error("metadata file: expected {expected} bytes for this chunk, read {got}")]
    ShortMetadataRead { expected: usize, got: usize },
}

/// The alphabet the caller asked for does not match the database's alphabet.
#[derive(thiserror::Error, Debug)]
#[error("caller requested the {requested:?} alphabet but the database is {actual:?}")]
pub struct IncompatibleError {
    pub requested: AlphabetKind,
    pub actual: AlphabetKind,
}

/// Failure while creating a new database.
#[derive(thiserror::Error, Debug)]
pub enum WriteError {
    #[error("failed to create {which} file at {path}: {source}")]
    Create {
        which: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
