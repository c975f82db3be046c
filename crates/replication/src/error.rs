//! Replication crate error type.
//!
//! Per spec.md §7, a fan-out task exhausting its retries is not a hard
//! error the caller sees — it only lowers the returned ack count. This
//! type exists for the narrower set of conditions that genuinely are a
//! programming error (e.g. an unknown replica id), not for per-replica
//! transport failures.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReplicationError {
    #[error(transparent)]
    Core(#[from] corelib::Error),
}
