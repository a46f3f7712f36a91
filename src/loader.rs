//! The loader worker: reads index records, packed residues, and raw
//! metadata off disk and feeds fixed-budget chunks into outbox L.

use std::io::Read;
use std::sync::Arc;

use crate::channel::{RecycleStack, SingleSlot};
use crate::chunk::Chunk;
use crate::error::{Error, FormatError, Result};
use crate::format::index::{IndexRecord, SIZE_INDEX_RECORD};
use crate::message::PipelineMessage;

/// Everything the loader thread needs; owned by the thread for its lifetime.
pub struct LoaderContext<I, S, M> {
    pub index_reader: I,
    pub seq_file: S,
    pub meta_file: M,
    pub max_seqs: usize,
    pub max_packets: usize,
    pub residues_per_packet: usize,
    pub nconsumers: usize,
    pub outbox_l: Arc<SingleSlot<PipelineMessage>>,
    pub recycle: Arc<RecycleStack<Box<Chunk>>>,
}

/// Read until `buf` is full or the underlying reader is exhausted, returning
/// the number of bytes actually read (short reads at EOF are not an error
/// here; the caller decides what a partial fill means).
fn read_up_to<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

fn read_index_records<R: Read>(
    reader: &mut R,
    want: usize,
    index_base: u64,
) -> Result<Vec<IndexRecord>> {
    let mut out = Vec::with_capacity(want);
    let mut buf = [0u8; SIZE_INDEX_RECORD];
    for i in 0..want {
        let got = read_up_to(reader, &mut buf).map_err(Error::System)?;
        if got == 0 {
            break;
        }
        if got != SIZE_INDEX_RECORD {
            return Err(FormatError::TruncatedRecord {
                index: index_base + i as u64,
            }
            .into());
        }
        out.push(IndexRecord::from_bytes(&buf));
    }
    Ok(out)
}

/// Run the loader's main loop to completion (normal EOF or a fatal error),
/// publishing every chunk (or the terminal failure) through `outbox_l`.
pub fn run<I, S, M>(mut ctx: LoaderContext<I, S, M>)
where
    I: Read,
    S: Read,
    M: Read,
{
    let mut idx: Vec<IndexRecord> = Vec::with_capacity(ctx.max_seqs);
    let mut nload = 0usize;
    let mut i0 = 0u64;
    let mut psq_last: i64 = -1;
    let mut meta_last: i64 = -1;
    let mut nchunk = 0usize;
    let mut done = false;

    let result: Result<()> = (|| {
        while !done {
            let mut chunk = if nchunk < ctx.nconsumers + 2 {
                nchunk += 1;
                Box::new(Chunk::new(
                    ctx.max_seqs,
                    ctx.max_packets,
                    ctx.residues_per_packet,
                ))
            } else {
                ctx.recycle.pop()
            };

            i0 += nload as u64;
            let ncarried = idx.len() - nload;
            idx.drain(0..nload);
            debug_assert_eq!(idx.len(), ncarried);

            let want = ctx.max_seqs - ncarried;
            let mut fresh = read_index_records(&mut ctx.index_reader, want, i0 + ncarried as u64)?;
            idx.append(&mut fresh);

            if idx.is_empty() {
                log::trace!("loader: EOF, chunk i0={i0}");
                chunk.i0 = i0;
                chunk.n = 0;
                chunk.pn = 0;
                done = true;
            } else {
                let nidx = idx.len();
                nload = if idx[nidx - 1].psq_end as i64 - psq_last <= ctx.max_packets as i64 {
                    nidx
                } else {
                    let mut lo = 1usize;
                    let mut hi = nidx;
                    while hi - lo > 1 {
                        let mid = lo + (hi - lo) / 2;
                        if idx[mid - 1].psq_end as i64 - psq_last <= ctx.max_packets as i64 {
                            lo = mid;
                        } else {
                            hi = mid;
                        }
                    }
                    lo
                };

                let pn = (idx[nload - 1].psq_end as i64 - psq_last) as usize;
                chunk.pn = pn;
                {
                    let region = chunk.packet_region_mut();
                    let want_bytes = 4 * pn;
                    let got = read_up_to(&mut ctx.seq_file, &mut region[..want_bytes])
                        .map_err(Error::System)?;
                    if got != want_bytes {
                        return Err(FormatError::ShortPacketRead {
                            expected: pn,
                            got: got / 4,
                        }
                        .into());
                    }
                }

                let this_meta_end = idx[nload - 1].meta_end as i64;
                let nmeta = (this_meta_end - meta_last) as usize;
                chunk.ensure_meta_capacity(nmeta);
                let got = read_up_to(&mut ctx.meta_file, &mut chunk.meta_mut()[..nmeta])
                    .map_err(Error::System)?;
                if got != nmeta {
                    return Err(FormatError::ShortMetadataRead {
                        expected: nmeta,
                        got,
                    }
                    .into());
                }

                chunk.i0 = i0;
                chunk.n = nload;
                psq_last = idx[nload - 1].psq_end as i64;
                meta_last = this_meta_end;
                log::trace!("loader: chunk i0={i0} n={nload} pn={pn}");
            }

            ctx.outbox_l.send(PipelineMessage::Chunk(chunk));
        }
        Ok(())
    })();

    if let Err(err) = result {
        log::error!("loader thread failed: {err}");
        ctx.outbox_l.send(PipelineMessage::Failed(Arc::new(err)));
        return;
    }

    let mut recovered = 0;
    while recovered < nchunk {
        let _ = ctx.recycle.pop();
        recovered += 1;
    }
    log::debug!("loader: shutdown complete, {nchunk} chunks reclaimed");
}
