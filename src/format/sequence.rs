//! The sequence file's fixed header. The packet stream that follows is
//! produced by [`crate::packet`] and consumed by [`crate::unpack`].

use byteorder::{ByteOrder, LittleEndian};
use std::io::{Read, Write};

use crate::error::Result;
use crate::format::magic::{check_magic, MAGIC};

pub const SIZE_SEQUENCE_HEADER: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceHeader {
    pub magic: u32,
    pub tag: u32,
}

impl SequenceHeader {
    pub fn new(tag: u32) -> Self {
        Self { magic: MAGIC, tag }
    }

    pub fn from_bytes(buffer: &[u8; SIZE_SEQUENCE_HEADER]) -> Result<Self> {
        let magic = LittleEndian::read_u32(&buffer[0..4]);
        check_magic("sequence", magic)?;
        let tag = LittleEndian::read_u32(&buffer[4..8]);
        Ok(Self { magic, tag })
    }

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut buffer = [0u8; SIZE_SEQUENCE_HEADER];
        reader.read_exact(&mut buffer)?;
        Self::from_bytes(&buffer)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        let mut buffer = [0u8; SIZE_SEQUENCE_HEADER];
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
        let header = SequenceHeader::new(0x0a0b_0c0d);
        let mut buf = Vec::new();
        header.write(&mut buf).unwrap();
        let parsed = SequenceHeader::from_bytes(buf.as_slice().try_into().unwrap()).unwrap();
        assert_eq!(parsed, header);
    }
}
