//! Proof recorder - writes `{actor}_{provider}_proof_{hash}.txt` into the
//! proof directory.
//!
//! The hash is `SHA-256(actor || transcript.stringify())`, so the file name
//! depends only on who ran which provider against which transcript. Neither
//! the reply nor the time of the run is part of it: reruns hit the same file.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, info};

use elnchat_core::types::Transcript;

/// Proof directory used when none is given.
pub const DEFAULT_PROOF_DIR: &str = "./proof";

#[derive(Debug, Error)]
pub enum ProofError {
    /// The proof directory is missing. It is never created automatically.
    #[error("proof directory not found: {} (create it first)", .dir.display())]
    DirectoryNotFound { dir: PathBuf },

    /// The actor would turn the file name into a path.
    #[error("actor identity {actor:?} contains a path separator and cannot name a proof file")]
    InvalidActor { actor: String },

    #[error("proof file I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// How an existing proof file is treated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WriteMode {
    /// Truncate, then write.
    #[default]
    Overwrite,
    /// Add to the end; repeated runs accumulate records.
    Append,
}

impl std::fmt::Display for WriteMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WriteMode::Overwrite => "overwrite",
            WriteMode::Append => "append",
        })
    }
}

// ─────────────────────────────────────────────
// Hash & naming
// ─────────────────────────────────────────────

/// Lowercase hex SHA-256 of `actor` followed by the stringified transcript.
pub fn proof_hash(actor: &str, transcript: &Transcript) -> String {
    let mut hasher = Sha256::new();
    hasher.update(actor.as_bytes());
    hasher.update(transcript.stringify().as_bytes());
    hex::encode(hasher.finalize())
}

/// `{actor}_{provider}_proof_{hash}.txt`
pub fn proof_file_name(actor: &str, provider: &str, transcript: &Transcript) -> String {
    format!(
        "{}_{}_proof_{}.txt",
        actor,
        provider,
        proof_hash(actor, transcript)
    )
}

/// Everything one proof record is made of.
#[derive(Clone, Debug)]
pub struct ProofEntry<'a> {
    pub actor: &'a str,
    pub provider: &'a str,
    pub model: &'a str,
    pub transcript: &'a Transcript,
    pub reply: &'a str,
}

impl ProofEntry<'_> {
    pub fn file_name(&self) -> String {
        proof_file_name(self.actor, self.provider, self.transcript)
    }

    /// `{model}:\n{reply}`
    pub fn body(&self) -> String {
        format!("{}:\n{}", self.model, self.reply)
    }
}

// ─────────────────────────────────────────────
// ProofRecorder
// ─────────────────────────────────────────────

/// Writes proof records into one directory.
#[derive(Clone, Debug)]
pub struct ProofRecorder {
    dir: PathBuf,
}

impl Default for ProofRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_PROOF_DIR)
    }
}

impl ProofRecorder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        ProofRecorder { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }

    /// Write one record and return its file name.
    ///
    /// Fails with `DirectoryNotFound` before touching the filesystem if the
    /// directory is missing. An actor containing `/` or `\` is rejected so the
    /// record always lands directly in the proof directory. The body goes out
    /// in a single `write_all`.
    pub fn record(&self, entry: &ProofEntry<'_>, mode: WriteMode) -> Result<String, ProofError> {
        if !self.dir.is_dir() {
            return Err(ProofError::DirectoryNotFound {
                dir: self.dir.clone(),
            });
        }
        if entry.actor.contains(&['/', '\\'][..]) {
            return Err(ProofError::InvalidActor {
                actor: entry.actor.to_string(),
            });
        }

        let file_name = entry.file_name();
        let path = self.path_for(&file_name);
        debug!(path = %path.display(), mode = %mode, "Writing proof record");

        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            WriteMode::Overwrite => options.write(true).truncate(true),
            WriteMode::Append => options.append(true),
        };

        let io_err = |source| ProofError::Io {
            path: path.clone(),
            source,
        };
        let mut file = options.open(&path).map_err(io_err)?;
        file.write_all(entry.body().as_bytes()).map_err(io_err)?;

        info!(
            actor = entry.actor,
            provider = entry.provider,
            file = %file_name,
            "Proof recorded"
        );
        Ok(file_name)
    }

    /// Read a record back (diagnostics, tests).
    pub fn read_record(&self, file_name: &str) -> Result<String, ProofError> {
        let path = self.path_for(file_name);
        std::fs::read_to_string(&path).map_err(|source| ProofError::Io { path, source })
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use elnchat_core::types::Turn;

    fn transcript() -> Transcript {
        Transcript::new(vec![Turn::system("S"), Turn::human("H")])
    }

    fn entry<'a>(transcript: &'a Transcript, model: &'a str, reply: &'a str) -> ProofEntry<'a> {
        ProofEntry {
            actor: "alice",
            provider: "openai",
            model,
            transcript,
            reply,
        }
    }

    #[test]
    fn test_hash_known_value() {
        // sha256("alice[('system', 'S'), ('human', 'H')]")
        assert_eq!(
            proof_hash("alice", &transcript()),
            "9519a364631e45df189e16695e2525a9e6ac041b5a3013498713c9da90c42c97"
        );
    }

    #[test]
    fn test_file_name_scenario() {
        assert_eq!(
            proof_file_name("alice", "openai", &transcript()),
            "alice_openai_proof_9519a364631e45df189e16695e2525a9e6ac041b5a3013498713c9da90c42c97.txt"
        );
    }

    #[test]
    fn test_file_name_independent_of_reply() {
        let t = transcript();
        assert_eq!(
            entry(&t, "gpt-x", "hello").file_name(),
            entry(&t, "other-model", "a different reply").file_name()
        );
    }

    #[test]
    fn test_hash_depends_on_actor_and_transcript() {
        let t = transcript();
        assert_ne!(proof_hash("alice", &t), proof_hash("bob", &t));
        let other = Transcript::new(vec![Turn::system("S"), Turn::human("H2")]);
        assert_ne!(proof_hash("alice", &t), proof_hash("alice", &other));
    }

    #[test]
    fn test_record_overwrite_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ProofRecorder::new(dir.path());
        let t = transcript();

        let name = recorder
            .record(&entry(&t, "gpt-x", "hello"), WriteMode::Overwrite)
            .unwrap();

        assert_eq!(name, proof_file_name("alice", "openai", &t));
        assert_eq!(recorder.read_record(&name).unwrap(), "gpt-x:\nhello");
    }

    #[test]
    fn test_record_overwrite_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ProofRecorder::new(dir.path());
        let t = transcript();

        recorder
            .record(&entry(&t, "gpt-x", "a much longer first reply"), WriteMode::Overwrite)
            .unwrap();
        let name = recorder
            .record(&entry(&t, "gpt-x", "short"), WriteMode::Overwrite)
            .unwrap();

        assert_eq!(recorder.read_record(&name).unwrap(), "gpt-x:\nshort");
    }

    #[test]
    fn test_record_append_concatenates_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let recorder = ProofRecorder::new(dir.path());
        let t = transcript();

        recorder
            .record(&entry(&t, "gpt-x", "one"), WriteMode::Append)
            .unwrap();
        recorder
            .record(&entry(&t, "gpt-y", "two"), WriteMode::Append)
            .unwrap();
        let name = recorder
            .record(&entry(&t, "gpt-x", "three"), WriteMode::Append)
            .unwrap();

        assert_eq!(
            recorder.read_record(&name).unwrap(),
            "gpt-x:\nonegpt-y:\ntwogpt-x:\nthree"
        );
    }

    #[test]
    fn test_record_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("proof");
        let recorder = ProofRecorder::new(&missing);
        let t = transcript();

        let err = recorder
            .record(&entry(&t, "gpt-x", "hello"), WriteMode::Overwrite)
            .unwrap_err();

        assert!(matches!(err, ProofError::DirectoryNotFound { ref dir } if dir == &missing));
        assert!(!missing.exists());
    }

    #[test]
    fn test_record_rejects_actor_with_path_separator() {
        let dir = tempfile::tempdir().unwrap();
        let proof_dir = dir.path().join("proof");
        std::fs::create_dir(&proof_dir).unwrap();
        let recorder = ProofRecorder::new(&proof_dir);
        let t = transcript();

        for actor in ["../escape", "a\\b"] {
            let entry = ProofEntry {
                actor,
                ..entry(&t, "gpt-x", "hello")
            };
            let err = recorder.record(&entry, WriteMode::Overwrite).unwrap_err();
            assert!(matches!(err, ProofError::InvalidActor { .. }));
        }

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        assert_eq!(std::fs::read_dir(&proof_dir).unwrap().count(), 0);
    }

    #[test]
    fn test_record_directory_is_a_file() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let recorder = ProofRecorder::new(file.path());
        let t = transcript();

        let err = recorder
            .record(&entry(&t, "m", "r"), WriteMode::Append)
            .unwrap_err();
        assert!(matches!(err, ProofError::DirectoryNotFound { .. }));
    }

    #[test]
    fn test_default_dir() {
        assert_eq!(ProofRecorder::default().dir(), Path::new("./proof"));
    }

    #[test]
    fn test_write_mode_display_and_default() {
        assert_eq!(WriteMode::default(), WriteMode::Overwrite);
        assert_eq!(WriteMode::Append.to_string(), "append");
    }
}
