//! On-disk layout for the four-file dsqdata database: stub, index, metadata,
//! and sequence files, all keyed by a shared random tag (see [`stub::Stub`]).

pub mod index;
pub mod magic;
pub mod metadata;
pub mod sequence;
pub mod stub;

pub use index::{IndexHeader, IndexRecord, SIZE_INDEX_HEADER, SIZE_INDEX_RECORD};
pub use magic::{check_magic, FORMAT_VERSION, MAGIC, MAGIC_SWAPPED};
pub use metadata::{MetadataHeader, SIZE_METADATA_HEADER};
pub use sequence::{SequenceHeader, SIZE_SEQUENCE_HEADER};
pub use stub::Stub;
