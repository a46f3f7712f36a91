//! A chunked, parallel reader/writer for dsqdata: a four-file, bit-packed
//! digital sequence database format. A [`writer::Writer`] converts an
//! iterator of digitized records into the on-disk layout; a
//! [`reader::Reader`] streams it back as fixed-budget [`chunk::Chunk`]s
//! through a two-stage loader/unpacker pipeline, safe to drain from any
//! number of consumer threads.

#![allow(clippy::module_inception)]

pub mod alphabet;
pub mod channel;
pub mod chunk;
pub mod error;
pub mod format;
mod loader;
mod message;
mod paths;
pub mod packet;
pub mod reader;
pub mod record;
pub mod unpack;
mod unpacker;
pub mod writer;

pub use alphabet::AlphabetKind;
pub use chunk::Chunk;
pub use error::{Error, Result};
pub use reader::Reader;
pub use record::SeqRecord;
pub use writer::{DigitalRecord, Writer};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_all_three_alphabets() {
        for alphabet in [AlphabetKind::Protein, AlphabetKind::Dna, AlphabetKind::Rna] {
            let dir = tempfile::tempdir().unwrap();
            let basename = dir.path().join("db");

            let records = vec![
                DigitalRecord {
                    name: b"alpha".to_vec(),
                    accession: b"AC1".to_vec(),
                    description: b"first".to_vec(),
                    taxonomy_id: 10,
                    residues: vec![0, 1, 2, 3, 4, 0, 1],
                },
                DigitalRecord {
                    name: b"beta".to_vec(),
                    accession: b"AC2".to_vec(),
                    description: b"second".to_vec(),
                    taxonomy_id: 20,
                    residues: vec![],
                },
                DigitalRecord {
                    name: b"gamma".to_vec(),
                    accession: b"AC3".to_vec(),
                    description: b"third".to_vec(),
                    taxonomy_id: 30,
                    residues: (0..40u8).map(|i| i % 4).collect(),
                },
            ];

            Writer::write(&basename, alphabet, records.clone()).unwrap();
            let reader = Reader::open(&basename, 1, Some(alphabet)).unwrap();

            let chunk = reader.read().unwrap().expect("data chunk");
            assert_eq!(chunk.n, records.len());
            for (i, expected) in records.iter().enumerate() {
                assert_eq!(chunk.residues(i), expected.residues.as_slice());
                assert_eq!(chunk.name(i), expected.name.as_slice());
                assert_eq!(chunk.accession(i), expected.accession.as_slice());
                assert_eq!(chunk.description(i), expected.description.as_slice());
                assert_eq!(chunk.taxonomy_id(i), expected.taxonomy_id);
            }
            reader.recycle(chunk);
            assert!(reader.read().unwrap().is_none());
        }
    }

    #[test]
    fn many_sequences_many_consumers() {
        let dir = tempfile::tempdir().unwrap();
        let basename = dir.path().join("big");

        let total = 500u32;
        let records: Vec<DigitalRecord> = (0..total)
            .map(|i| DigitalRecord {
                name: format!("s{i}").into_bytes(),
                accession: Vec::new(),
                description: Vec::new(),
                taxonomy_id: i as i32,
                residues: vec![(i % 4) as u8; (i % 7) as usize],
            })
            .collect();
        Writer::write(&basename, AlphabetKind::Dna, records.clone()).unwrap();

        let nconsumers = 4;
        let reader = std::sync::Arc::new(Reader::open(&basename, nconsumers, None).unwrap());
        let seen = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));

        let handles: Vec<_> = (0..nconsumers)
            .map(|_| {
                let reader = std::sync::Arc::clone(&reader);
                let seen = std::sync::Arc::clone(&seen);
                std::thread::spawn(move || {
                    let mut local = Vec::new();
                    while let Some(chunk) = reader.read().unwrap() {
                        local.push(chunk.i0);
                        reader.recycle(chunk);
                    }
                    seen.lock().unwrap().extend(local);
                })
            })
            .collect();

        for h in handles {
            h.join().unwrap();
        }

        let mut starts = seen.lock().unwrap().clone();
        starts.sort_unstable();
        assert!(starts.windows(2).all(|w| w[0] != w[1]));
        assert_eq!(starts.first().copied(), Some(0));
    }
}
