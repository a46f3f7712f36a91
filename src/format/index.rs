//! The index file: one fixed header, then a dense array of fixed-size records,
//! one per sequence.

use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Write};

use crate::alphabet::AlphabetKind;
use crate::error::{FormatError, Result};
use crate::format::magic::{check_magic, MAGIC};

/// Size in bytes of the on-disk index header.
pub const SIZE_INDEX_HEADER: usize = 52;

/// Size in bytes of a single on-disk index record.
pub const SIZE_INDEX_RECORD: usize = 16;

/// Fixed header at the start of the index file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexHeader {
    pub magic: u32,
    pub tag: u32,
    pub alphabet: u32,
    pub flags: u32,
    pub max_name: u32,
    pub max_acc: u32,
    pub max_desc: u32,
    pub max_seq_len: u64,
    pub num_seqs: u64,
    pub num_residues: u64,
}

impl IndexHeader {
    pub fn new(
        tag: u32,
        alphabet: AlphabetKind,
        max_name: u32,
        max_acc: u32,
        max_desc: u32,
        max_seq_len: u64,
        num_seqs: u64,
        num_residues: u64,
    ) -> Self {
        Self {
            magic: MAGIC,
            tag,
            alphabet: alphabet.as_u32(),
            flags: 0,
            max_name,
            max_acc,
            max_desc,
            max_seq_len,
            num_seqs,
            num_residues,
        }
    }

    pub fn alphabet(&self) -> Result<AlphabetKind> {
        AlphabetKind::from_u32(self.alphabet)
    }

    pub fn from_bytes(buffer: &[u8; SIZE_INDEX_HEADER]) -> Result<Self> {
        let magic = LittleEndian::read_u32(&buffer[0..4]);
        check_magic("index", magic)?;

        let tag = LittleEndian::read_u32(&buffer[4..8]);
        let alphabet = LittleEndian::read_u32(&buffer[8..12]);
        let flags = LittleEndian::read_u32(&buffer[12..16]);
        if flags != 0 {
            return Err(FormatError::NonZeroFlags(flags).into());
        }
        let max_name = LittleEndian::read_u32(&buffer[16..20]);
        let max_acc = LittleEndian::read_u32(&buffer[20..24]);
        let max_desc = LittleEndian::read_u32(&buffer[24..28]);
        let max_seq_len = LittleEndian::read_u64(&buffer[28..36]);
        let num_seqs = LittleEndian::read_u64(&buffer[36..44]);
        let num_residues = LittleEndian::read_u64(&buffer[44..52]);

        // Validate the alphabet field eagerly so a downstream caller gets a
        // format error, not a panic, on an unknown kind.
        AlphabetKind::from_u32(alphabet)?;

        Ok(Self {
            magic,
            tag,
            alphabet,
            flags,
            max_name,
            max_acc,
            max_desc,
            max_seq_len,
            num_seqs,
            num_residues,
        })
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; SIZE_INDEX_HEADER];
        reader.read_exact(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buffer = [0u8; SIZE_INDEX_HEADER];
        LittleEndian::write_u32(&mut buffer[0..4], self.magic);
        LittleEndian::write_u32(&mut buffer[4..8], self.tag);
        LittleEndian::write_u32(&mut buffer[8..12], self.alphabet);
        LittleEndian::write_u32(&mut buffer[12..16], self.flags);
        LittleEndian::write_u32(&mut buffer[16..20], self.max_name);
        LittleEndian::write_u32(&mut buffer[20..24], self.max_acc);
        LittleEndian::write_u32(&mut buffer[24..28], self.max_desc);
        LittleEndian::write_u64(&mut buffer[28..36], self.max_seq_len);
        LittleEndian::write_u64(&mut buffer[36..44], self.num_seqs);
        LittleEndian::write_u64(&mut buffer[44..52], self.num_residues);
        writer.write_all(&buffer)?;
        Ok(())
    }
}

/// One fixed-size record per sequence: the inclusive end offset of its packets
/// in the sequence file (units: packets) and of its metadata in the metadata
/// file (units: bytes). Record `i`'s range is `(prev.psq_end, psq_end]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexRecord {
    pub psq_end: u64,
    pub meta_end: u64,
}

impl IndexRecord {
    pub fn from_bytes(buffer: &[u8; SIZE_INDEX_RECORD]) -> Self {
        Self {
            psq_end: LittleEndian::read_u64(&buffer[0..8]),
            meta_end: LittleEndian::read_u64(&buffer[8..16]),
        }
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; SIZE_INDEX_RECORD];
        reader.read_exact(&mut buffer)?;
        Ok(Self::from_bytes(&buffer))
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buffer = [0u8; SIZE_INDEX_RECORD];
        LittleEndian::write_u64(&mut buffer[0..8], self.psq_end);
        LittleEndian::write_u64(&mut buffer[8..16], self.meta_end);
        writer.write_all(&buffer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn header_round_trips() {
        let header = IndexHeader::new(0xfeed_face, AlphabetKind::Dna, 40, 20, 80, 500, 10, 4096);
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        assert_eq!(buf.len(), SIZE_INDEX_HEADER);
        let parsed = IndexHeader::from_bytes(buf.as_slice().try_into().unwrap()).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(parsed.alphabet().unwrap(), AlphabetKind::Dna);
    }

    #[test]
    fn header_rejects_nonzero_flags() {
        let header = IndexHeader::new(1, AlphabetKind::Protein, 1, 1, 1, 1, 1, 1);
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        LittleEndian::write_u32(&mut buf[12..16], 1);
        let err = IndexHeader::from_bytes(buf.as_slice().try_into().unwrap()).unwrap_err();
        assert!(matches!(err, Error::Format(FormatError::NonZeroFlags(1))));
    }

    #[test]
    fn record_round_trips() {
        let record = IndexRecord {
            psq_end: 123,
            meta_end: 456,
        };
        let mut buf = Vec::new();
        record.write(&mut buf).unwrap();
        assert_eq!(buf.len(), SIZE_INDEX_RECORD);
        let parsed = IndexRecord::from_bytes(buf.as_slice().try_into().unwrap());
        assert_eq!(parsed, record);
    }
}
