//! Two-pass writer: converts an iterator of already-digitized records into
//! the four on-disk dsqdata files.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use rand::Rng;

use crate::alphabet::AlphabetKind;
use crate::error::{Result, WriteError};
use crate::format::index::{IndexHeader, IndexRecord};
use crate::format::metadata::MetadataHeader;
use crate::format::sequence::SequenceHeader;
use crate::format::stub::Stub;
use crate::packet::{pack2, pack5};
use crate::paths::append_suffix;

/// One already-digitized sequence, ready to be packed and written. Residue
/// codes are whatever numeric encoding the caller's alphabet uses; this
/// crate only cares whether they're canonical (<=3) for mixed 2-bit packing.
#[derive(Debug, Clone)]
pub struct DigitalRecord {
    pub name: Vec<u8>,
    pub accession: Vec<u8>,
    pub description: Vec<u8>,
    pub taxonomy_id: i32,
    pub residues: Vec<u8>,
}

fn create(which: &'static str, path: &Path) -> Result<File> {
    File::create(path).map_err(|source| {
        WriteError::Create {
            which,
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

/// Converts a source of digital records into a dsqdata database at `basename`.
pub struct Writer;

impl Writer {
    /// Pass 1 scans `records` to collect header statistics; pass 2 rewinds
    /// (via `Clone`) and packs each sequence, appending to the sequence,
    /// metadata, and index files. The stub — and with it, the tag that makes
    /// the other three files a matched set — is written last, so a database
    /// is only "complete" once packing has fully succeeded.
    pub fn write<P, I>(basename: P, alphabet: AlphabetKind, records: I) -> Result<()>
    where
        P: AsRef<Path>,
        I: IntoIterator<Item = DigitalRecord>,
        I::IntoIter: Clone,
    {
        let basename = basename.as_ref();
        let iter = records.into_iter();

        let mut nseq = 0u64;
        let mut nres = 0u64;
        let mut max_name = 0u32;
        let mut max_acc = 0u32;
        let mut max_desc = 0u32;
        let mut max_seq_len = 0u64;

        for record in iter.clone() {
            nseq += 1;
            nres += record.residues.len() as u64;
            max_name = max_name.max(record.name.len() as u32);
            max_acc = max_acc.max(record.accession.len() as u32);
            max_desc = max_desc.max(record.description.len() as u32);
            max_seq_len = max_seq_len.max(record.residues.len() as u64);
        }

        let tag: u32 = rand::rng().random();

        let index_path = append_suffix(basename, "dsqi");
        let meta_path = append_suffix(basename, "dsqm");
        let seq_path = append_suffix(basename, "dsqs");

        let mut index_file = create("index", &index_path)?;
        IndexHeader::new(
            tag,
            alphabet,
            max_name,
            max_acc,
            max_desc,
            max_seq_len,
            nseq,
            nres,
        )
        .write(&mut index_file)?;

        let mut meta_file = create("metadata", &meta_path)?;
        MetadataHeader::new(tag).write(&mut meta_file)?;

        let mut seq_file = create("sequence", &seq_path)?;
        SequenceHeader::new(tag).write(&mut seq_file)?;

        let use_pack5 = alphabet.is_protein();
        let mut spos: i64 = -1;
        let mut mpos: i64 = -1;

        for record in iter {
            let packets = if use_pack5 {
                pack5(&record.residues)
            } else {
                pack2(&record.residues)
            };
            for packet in &packets {
                seq_file.write_all(&packet.to_le_bytes())?;
            }
            spos += packets.len() as i64;

            meta_file.write_all(&record.name)?;
            meta_file.write_all(&[0])?;
            meta_file.write_all(&record.accession)?;
            meta_file.write_all(&[0])?;
            meta_file.write_all(&record.description)?;
            meta_file.write_all(&[0])?;
            meta_file.write_all(&record.taxonomy_id.to_le_bytes())?;
            mpos += (record.name.len()
                + 1
                + record.accession.len()
                + 1
                + record.description.len()
                + 1
                + 4) as i64;

            IndexRecord {
                psq_end: spos as u64,
                meta_end: mpos as u64,
            }
            .write(&mut index_file)?;
        }

        let mut stub_file = create("stub", basename)?;
        Stub::new(tag).write(&mut stub_file)?;

        log::debug!(
            "dsqdata: wrote {} ({} sequences, {} residues, tag {:#x})",
            basename.display(),
            nseq,
            nres,
            tag
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::Reader;

    #[test]
    fn writes_all_four_files() {
        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("db");
        let records = vec![DigitalRecord {
            name: b"s1".to_vec(),
            accession: vec![],
            description: vec![],
            taxonomy_id: 1,
            residues: vec![0, 1, 2, 3],
        }];
        Writer::write(&basename, AlphabetKind::Dna, records).unwrap();

        for suffix in ["dsqi", "dsqm", "dsqs"] {
            assert!(append_suffix(&basename, suffix).exists());
        }
        assert!(basename.exists());
    }

    #[test]
    fn empty_database_still_opens() {
        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("empty");
        Writer::write(&basename, AlphabetKind::Rna, Vec::new()).unwrap();

        let reader = Reader::open(&basename, 1, None).unwrap();
        assert_eq!(reader.num_seqs, 0);
        assert!(reader.read().unwrap().is_none());
    }
}
