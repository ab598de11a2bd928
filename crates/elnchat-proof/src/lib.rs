//! Proof-of-execution recording.
//!
//! - [`recorder`] - hash, file name and write of the proof record
//! - [`identity`] - who ran the tutorial (`git config user.name` by default)

pub mod identity;
pub mod recorder;

pub use identity::{CommandIdentity, IdentityError, IdentitySource, StaticIdentity};
pub use recorder::{
    proof_file_name, proof_hash, ProofEntry, ProofError, ProofRecorder, WriteMode,
    DEFAULT_PROOF_DIR,
};
