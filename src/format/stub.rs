//! The stub file: a short human-readable text file whose first line carries
//! the format version and the random tag shared by the other three files.

use std::io::{BufRead, BufReader, Read, Write};

use crate::error::{Error, FormatError, Result};
use crate::format::magic::FORMAT_VERSION;

/// Parsed form of the stub file's first line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stub {
    pub version: u32,
    pub tag: u32,
}

impl Stub {
    /// Grammar: `Easel dsqdata v<int> x<uint32>`.
    pub fn parse_line(line: &str) -> Result<Self> {
        let mut fields = line.split_whitespace();
        let easel = fields.next();
        let dsqdata = fields.next();
        let version_field = fields.next();
        let tag_field = fields.next();

        if easel != Some("Easel") || dsqdata != Some("dsqdata") {
            return Err(FormatError::BadStub(line.to_string()).into());
        }

        let version: u32 = version_field
            .and_then(|f| f.strip_prefix('v'))
            .and_then(|v| v.parse().ok())
            .ok_or_else(|| FormatError::BadStub(line.to_string()))?;

        let tag: u32 = tag_field
            .and_then(|f| f.strip_prefix('x'))
            .and_then(|t| t.parse().ok())
            .ok_or_else(|| FormatError::BadStub(line.to_string()))?;

        if version != FORMAT_VERSION {
            return Err(FormatError::UnsupportedVersion(version).into());
        }

        Ok(Self { version, tag })
    }

    pub fn read<R: Read>(reader: R) -> Result<Self> {
        let mut buf = BufReader::new(reader);
        let mut line = String::new();
        buf.read_line(&mut line).map_err(Error::System)?;
        Self::parse_line(line.trim_end())
    }

    pub fn write<W: Write>(&self, mut writer: W) -> Result<()> {
        writeln!(writer, "Easel dsqdata v{} x{}", self.version, self.tag)?;
        writeln!(writer, "# generated by dsqdata; do not edit")?;
        Ok(())
    }

    pub fn new(tag: u32) -> Self {
        Self {
            version: FORMAT_VERSION,
            tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_write_and_read() {
        let stub = Stub::new(0x1234_5678);
        let mut buf = Vec::new();
        stub.write(&mut buf).unwrap();
        let parsed = Stub::read(buf.as_slice()).unwrap();
        assert_eq!(parsed, stub);
    }

    #[test]
    fn rejects_malformed_tag_line() {
        assert!(Stub::parse_line("not a stub line").is_err());
    }

    #[test]
    fn rejects_unsupported_version() {
        let err = Stub::parse_line("Easel dsqdata v99 x1").unwrap_err();
        assert!(matches!(
            err,
            Error::Format(FormatError::UnsupportedVersion(99))
        ));
    }
}
