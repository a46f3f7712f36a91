//! The metadata file's fixed header. The variable-length records that follow
//! (name/accession/description/taxid per sequence) are produced and consumed
//! by the writer and unpack routine directly against raw bytes, since they
//! have no fixed size.

use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Write};

use crate::error::Result;
use crate::format::magic::{check_magic, MAGIC};

pub const SIZE_METADATA_HEADER: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetadataHeader {
    pub magic: u32,
    pub tag: u32,
}

impl MetadataHeader {
    pub fn new(tag: u32) -> Self {
        Self { magic: MAGIC, tag }
    }

    pub fn from_bytes(buffer: &[u8; SIZE_METADATA_HEADER]) -> Result<Self> {
        let magic = LittleEndian::read_u32(&buffer[0..4]);
        check_magic("metadata", magic)?;
        let tag = LittleEndian::read_u32(&buffer[4..8]);
        Ok(Self { magic, tag })
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; SIZE_METADATA_HEADER];
        reader.read_exact(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buffer = [0u8; SIZE_METADATA_HEADER];
        LittleEndian::write_u32(&mut buffer[0..4], self.magic);
        LittleEndian::write_u32(&mut buffer[4..8], self.tag);
        writer.write_all(&buffer)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_round_trips() {
        let header = MetadataHeader::new(0x0102_0304);
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        let parsed = MetadataHeader::from_bytes(buf.as_slice().try_into().unwrap()).unwrap();
        assert_eq!(parsed, header);
    }
}
