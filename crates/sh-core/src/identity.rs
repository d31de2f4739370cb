//! Stable target identities
//!
//! Discovered targets are identified by a hash of their argument vector so
//! that label and username overrides survive reloads. Manual entries get a
//! random id once, when they are created.

use sha1::{Digest, Sha1};

/// Prefix for ids derived from an argument vector
pub const AUTO_ID_PREFIX: &str = "auto:";

/// Prefix for manual entry ids
pub const MANUAL_ID_PREFIX: &str = "manual:";

/// Unit separator written after every argument before hashing
const ARGUMENT_SEPARATOR: u8 = 0x1f;

/// Derive the id for a discovered target from its ssh arguments.
///
/// Each argument is trimmed and followed by `0x1F`, so surrounding
/// whitespace never changes the id.
pub fn entry_id_for_arguments<S: AsRef<str>>(arguments: &[S]) -> String {
    let mut hasher = Sha1::new();
    for argument in arguments {
        hasher.update(argument.as_ref().trim().as_bytes());
        hasher.update([ARGUMENT_SEPARATOR]);
    }
    format!("{}{}", AUTO_ID_PREFIX, hex::encode(hasher.finalize()))
}

/// Generate a fresh id for a manual entry
pub fn new_manual_id() -> String {
    format!("{}{}", MANUAL_ID_PREFIX, uuid::Uuid::new_v4())
}
