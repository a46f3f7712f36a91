//! Reader facade: `Open`/`Read`/`Recycle`/`Close` over a dsqdata database.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;

use crate::alphabet::AlphabetKind;
use crate::channel::{RecycleStack, SingleSlot};
use crate::chunk::{Chunk, MAXPACKET, MAXSEQ};
use crate::error::{Error, IncompatibleError, NotFoundError, Result};
use crate::format::index::IndexHeader;
use crate::format::metadata::MetadataHeader;
use crate::format::sequence::SequenceHeader;
use crate::format::stub::Stub;
use crate::loader::{self, LoaderContext};
use crate::message::PipelineMessage;
use crate::paths::append_suffix;
use crate::unpacker::{self, UnpackerContext};

/// An open dsqdata database, configured for a fixed number of consumer threads.
pub struct Reader {
    outbox_u: Arc<SingleSlot<PipelineMessage>>,
    recycle: Arc<RecycleStack<Box<Chunk>>>,
    loader_handle: Option<JoinHandle<()>>,
    unpacker_handle: Option<JoinHandle<()>>,
    at_eof: AtomicBool,

    pub alphabet: AlphabetKind,
    pub max_name: u32,
    pub max_acc: u32,
    pub max_desc: u32,
    pub max_seq_len: u64,
    pub num_seqs: u64,
    pub num_residues: u64,
}

fn open_binary(which: &'static str, path: &Path) -> Result<File> {
    File::open(path).map_err(|source| {
        NotFoundError {
            which,
            path: path.to_path_buf(),
            source,
        }
        .into()
    })
}

impl Reader {
    /// Open the four-file database at `basename` (`basename`, `basename.dsqi`,
    /// `basename.dsqm`, `basename.dsqs`), configured for `nconsumers` external
    /// consumer threads. `alphabet_hint`, if given, must match the database's
    /// alphabet or this call fails with [`IncompatibleError`].
    pub fn open<P: AsRef<Path>>(
        basename: P,
        nconsumers: usize,
        alphabet_hint: Option<AlphabetKind>,
    ) -> Result<Self> {
        assert!(nconsumers > 0, "nconsumers must be at least 1");
        let basename = basename.as_ref();

        let index_path = append_suffix(basename, "dsqi");
        let meta_path = append_suffix(basename, "dsqm");
        let seq_path = append_suffix(basename, "dsqs");

        let mut index_file = BufReader::new(open_binary("index", &index_path)?);
        let mut meta_file = open_binary("metadata", &meta_path)?;
        let mut seq_file = open_binary("sequence", &seq_path)?;
        let stub_file = open_binary("stub", basename)?;

        let stub = Stub::read(stub_file)?;

        let index_header = IndexHeader::read(&mut index_file)?;
        if index_header.tag != stub.tag {
            return Err(crate::error::FormatError::TagMismatch {
                which: "index",
                expected: stub.tag,
                found: index_header.tag,
            }
            .into());
        }
        let alphabet = index_header.alphabet()?;
        if let Some(hint) = alphabet_hint {
            if hint != alphabet {
                return Err(IncompatibleError {
                    requested: hint,
                    actual: alphabet,
                }
                .into());
            }
        }

        let meta_header = MetadataHeader::read(&mut meta_file)?;
        if meta_header.tag != stub.tag {
            return Err(crate::error::FormatError::TagMismatch {
                which: "metadata",
                expected: stub.tag,
                found: meta_header.tag,
            }
            .into());
        }

        let seq_header = SequenceHeader::read(&mut seq_file)?;
        if seq_header.tag != stub.tag {
            return Err(crate::error::FormatError::TagMismatch {
                which: "sequence",
                expected: stub.tag,
                found: seq_header.tag,
            }
            .into());
        }

        log::debug!(
            "dsqdata: opened {} ({:?}, {} sequences, tag {:#x})",
            basename.display(),
            alphabet,
            index_header.num_seqs,
            stub.tag
        );

        let (max_seqs, max_packets) = (MAXSEQ, MAXPACKET);
        let residues_per_packet = alphabet.residues_per_packet();

        let outbox_l = Arc::new(SingleSlot::new());
        let outbox_u = Arc::new(SingleSlot::new());
        let recycle = Arc::new(RecycleStack::new());

        let unpacker_ctx = UnpackerContext {
            outbox_l: Arc::clone(&outbox_l),
            outbox_u: Arc::clone(&outbox_u),
        };
        let unpacker_handle = std::thread::spawn(move || unpacker::run(unpacker_ctx));

        let loader_ctx = LoaderContext {
            index_reader: index_file,
            seq_file,
            meta_file,
            max_seqs,
            max_packets,
            residues_per_packet,
            nconsumers,
            outbox_l,
            recycle: Arc::clone(&recycle),
        };
        let loader_handle = std::thread::spawn(move || loader::run(loader_ctx));

        log::debug!("dsqdata: loader and unpacker workers spawned");

        Ok(Self {
            outbox_u,
            recycle,
            loader_handle: Some(loader_handle),
            unpacker_handle: Some(unpacker_handle),
            at_eof: AtomicBool::new(false),
            alphabet,
            max_name: index_header.max_name,
            max_acc: index_header.max_acc,
            max_desc: index_header.max_desc,
            max_seq_len: index_header.max_seq_len,
            num_seqs: index_header.num_seqs,
            num_residues: index_header.num_residues,
        })
    }

    /// Block until the next chunk is available, or return `None` at end of data.
    /// Safe to call from multiple consumer threads concurrently; exactly one
    /// call observes the end-of-data signal and latches it for the rest.
    pub fn read(&self) -> Result<Option<Box<Chunk>>> {
        if self.at_eof.load(Ordering::Acquire) {
            return Ok(None);
        }
        match self.outbox_u.recv() {
            PipelineMessage::Failed(err) => {
                self.at_eof.store(true, Ordering::Release);
                Err(Arc::try_unwrap(err).unwrap_or_else(|arc| Error::Memory(arc.to_string())))
            }
            PipelineMessage::Chunk(chunk) => {
                if chunk.is_eof() {
                    self.at_eof.store(true, Ordering::Release);
                    self.recycle.push(chunk);
                    Ok(None)
                } else {
                    Ok(Some(chunk))
                }
            }
        }
    }

    /// Return a chunk to the recycle pool so the loader can reuse its arena.
    /// Never blocks.
    pub fn recycle(&self, chunk: Box<Chunk>) {
        self.recycle.push(chunk);
    }

    /// Join the loader and unpacker worker threads. They exit once the EOF
    /// (or failure) handshake has completed its round trip through recycle.
    pub fn close(&mut self) {
        if let Some(handle) = self.loader_handle.take() {
            let _ = handle.join();
        }
        if let Some(handle) = self.unpacker_handle.take() {
            let _ = handle.join();
        }
        log::debug!("dsqdata: closed, recycle stack has {} chunks left", self.recycle.len());
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        self.close();
    }
}
