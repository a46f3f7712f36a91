//! The payload that flows through both single-slot outboxes.
//!
//! A plain `Chunk` channel can't carry a worker failure, since there's no
//! back-channel for the loader or unpacker to report one once it's already
//! running on its own thread. Wrapping every hand-off in this enum gives
//! both workers a way to publish a poisoned outcome instead of aborting the
//! process out from under the caller.

use std::sync::Arc;

use crate::chunk::Chunk;
use crate::error::Error;

pub enum PipelineMessage {
    /// A populated or EOF (`n == 0`) chunk.
    Chunk(Box<Chunk>),
    /// A worker hit a fatal error and is shutting down; no more chunks follow.
    Failed(Arc<Error>),
}
