// src/engine/id.rs

//! Execution ID generation.

use rand::RngExt;
use tracing::warn;

use crate::types::ExecutionId;

/// Random bytes per ID before hex encoding (80 hex characters).
pub const ID_BYTES: usize = 40;

/// A fresh ID from the thread-local CSPRNG.
pub fn random_id() -> ExecutionId {
    let mut bytes = [0u8; ID_BYTES];
    rand::rng().fill(&mut bytes);
    ExecutionId::from(hex::encode(bytes))
}

/// Draw IDs until one is not `taken`.
///
/// Collisions are practically impossible at this width; the loop only
/// guarantees uniqueness against the caller's view.
pub fn unique_id(taken: impl Fn(&ExecutionId) -> bool) -> ExecutionId {
    loop {
        let id = random_id();
        if !taken(&id) {
            return id;
        }
        warn!(id = %id, "execution id collision; drawing again");
    }
}
