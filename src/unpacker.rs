//! The unpacker worker: drains outbox L, decodes each chunk's packets and
//! metadata in place, and feeds the result into outbox U.

use std::sync::Arc;

use crate::channel::SingleSlot;
use crate::message::PipelineMessage;
use crate::unpack::unpack_chunk;

pub struct UnpackerContext {
    pub outbox_l: Arc<SingleSlot<PipelineMessage>>,
    pub outbox_u: Arc<SingleSlot<PipelineMessage>>,
}

/// Run the unpacker's main loop to completion (forwarding the loader's EOF
/// or failure signal once seen).
pub fn run(ctx: UnpackerContext) {
    loop {
        let message = ctx.outbox_l.recv();
        match message {
            PipelineMessage::Failed(err) => {
                log::error!("unpacker thread: forwarding loader failure: {err}");
                ctx.outbox_u.send(PipelineMessage::Failed(err));
                return;
            }
            PipelineMessage::Chunk(mut chunk) => {
                let is_eof = chunk.is_eof();
                if !is_eof {
                    if let Err(err) = unpack_chunk(&mut chunk) {
                        log::error!("unpacker thread failed: {err}");
                        ctx.outbox_u.send(PipelineMessage::Failed(Arc::new(err)));
                        return;
                    }
                    log::trace!("unpacker: decoded chunk i0={} n={}", chunk.i0, chunk.n);
                } else {
                    log::debug!("unpacker: forwarding EOF chunk");
                }
                ctx.outbox_u.send(PipelineMessage::Chunk(chunk));
                if is_eof {
                    return;
                }
            }
        }
    }
}
