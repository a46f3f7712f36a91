//! Decoding a loaded chunk's raw packets and metadata into the fields
//! consumers read: per-sequence residue slices, names, accessions,
//! descriptions, and taxonomy ids.

use crate::alphabet::SENTINEL;
use crate::chunk::Chunk;
use crate::error::{FormatError, Result};

fn read_cstr(meta: &[u8], ptr: usize, index: u64, field: &'static str) -> Result<(usize, usize)> {
    if ptr > meta.len() {
        return Err(FormatError::UnterminatedMetadata { index, field }.into());
    }
    match meta[ptr..].iter().position(|&b| b == 0) {
        Some(rel) => Ok((ptr, ptr + rel)),
        None => Err(FormatError::UnterminatedMetadata { index, field }.into()),
    }
}

/// Walk a chunk's raw metadata bytes, recording name/accession/description
/// byte ranges and taxonomy ids for each of its `n` sequences.
fn unpack_metadata(chunk: &mut Chunk) -> Result<()> {
    let mut ptr = 0usize;
    for i in 0..chunk.n {
        let index = chunk.i0 + i as u64;

        let (ns, ne) = read_cstr(chunk.meta(), ptr, index, "name")?;
        ptr = ne + 1;
        let (as_, ae) = read_cstr(chunk.meta(), ptr, index, "accession")?;
        ptr = ae + 1;
        let (ds, de) = read_cstr(chunk.meta(), ptr, index, "description")?;
        ptr = de + 1;

        if ptr + 4 > chunk.meta().len() {
            return Err(FormatError::UnterminatedMetadata {
                index,
                field: "taxid",
            }
            .into());
        }
        let taxid = i32::from_le_bytes(chunk.meta()[ptr..ptr + 4].try_into().unwrap());
        ptr += 4;

        chunk.set_metadata_fields(i, (ns, ne), (as_, ae), (ds, de), taxid);
    }
    Ok(())
}

/// Decode the chunk's packed residues into the front of its shared arena,
/// populating each sequence's start offset and length as sequence boundaries
/// (EOD packets) are encountered.
fn unpack_residues(chunk: &mut Chunk) -> Result<()> {
    let mut r = 0usize;
    chunk.sentinel_at(0);
    chunk.set_start(0, 0);
    r += 1;
    let mut seq_start = 0usize;
    let mut i = 0usize;

    for pos in 0..chunk.pn {
        let v = chunk.packet_at(pos);
        match v >> 30 {
            0 => {
                for slot in 0..15 {
                    let shift = 28 - 2 * slot;
                    let code = ((v >> shift) & 0b11) as u8;
                    chunk.write_residue(r, code);
                    r += 1;
                }
            }
            1 => {
                for slot in 0..6 {
                    let shift = 25 - 5 * slot;
                    let code = ((v >> shift) & 0b1_1111) as u8;
                    chunk.write_residue(r, code);
                    r += 1;
                }
            }
            2 => {
                for slot in 0..15 {
                    let shift = 28 - 2 * slot;
                    let code = ((v >> shift) & 0b11) as u8;
                    chunk.write_residue(r, code);
                    r += 1;
                }
                chunk.set_length(i, (r - seq_start - 1) as u64);
                i += 1;
                if i < chunk.n {
                    chunk.set_start(i, r);
                }
                chunk.sentinel_at(r);
                seq_start = r;
                r += 1;
            }
            3 => {
                for slot in 0..6 {
                    let shift = 25 - 5 * slot;
                    let code = ((v >> shift) & 0b1_1111) as u8;
                    if code == SENTINEL {
                        break;
                    }
                    chunk.write_residue(r, code);
                    r += 1;
                }
                chunk.set_length(i, (r - seq_start - 1) as u64);
                i += 1;
                if i < chunk.n {
                    chunk.set_start(i, r);
                }
                chunk.sentinel_at(r);
                seq_start = r;
                r += 1;
            }
            _ => unreachable!("top two bits of a u32 cannot exceed 3"),
        }
    }

    if i != chunk.n {
        return Err(FormatError::SequenceCountMismatch {
            expected: chunk.n,
            got: i,
        }
        .into());
    }
    Ok(())
}

/// Decode a chunk's raw packets and raw metadata in place. Called by the
/// unpacker worker on every non-EOF chunk it receives.
pub fn unpack_chunk(chunk: &mut Chunk) -> Result<()> {
    if chunk.is_eof() {
        return Ok(());
    }
    unpack_metadata(chunk)?;
    unpack_residues(chunk)?;
    Ok(())
}
