//! Actor identity - the display name recorded in proof file names.
//!
//! Injected into the run as an [`IdentitySource`] so tests (and the
//! `--actor` flag) can bypass the external lookup.

use async_trait::async_trait;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("failed to run `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {status}: {stderr}")]
    Failed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    #[error("`{command}` printed no identity")]
    Empty { command: String },

    #[error("`{command}` printed non-UTF-8 output")]
    Encoding { command: String },
}

/// Where the actor identity comes from.
#[async_trait]
pub trait IdentitySource: Send + Sync {
    async fn lookup(&self) -> Result<String, IdentityError>;
}

/// A fixed identity.
#[derive(Clone, Debug)]
pub struct StaticIdentity(pub String);

#[async_trait]
impl IdentitySource for StaticIdentity {
    async fn lookup(&self) -> Result<String, IdentityError> {
        Ok(self.0.clone())
    }
}

/// Identity printed by an external command, `git config user.name` by default.
#[derive(Clone, Debug)]
pub struct CommandIdentity {
    program: String,
    args: Vec<String>,
}

impl Default for CommandIdentity {
    fn default() -> Self {
        Self::git()
    }
}

impl CommandIdentity {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        CommandIdentity {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    /// `git config user.name`
    pub fn git() -> Self {
        Self::new("git", &["config", "user.name"])
    }

    fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[async_trait]
impl IdentitySource for CommandIdentity {
    async fn lookup(&self) -> Result<String, IdentityError> {
        let command = self.command_line();
        debug!(command = %command, "Looking up actor identity");

        let output = Command::new(&self.program)
            .args(&self.args)
            .output()
            .await
            .map_err(|source| IdentityError::Spawn {
                command: command.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(IdentityError::Failed {
                command,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let stdout = String::from_utf8(output.stdout)
            .map_err(|_| IdentityError::Encoding {
                command: command.clone(),
            })?;

        let name = stdout.trim_end_matches(&['\r', '\n'][..]).to_string();
        if name.trim().is_empty() {
            return Err(IdentityError::Empty { command });
        }
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_identity() {
        let source = StaticIdentity("alice".into());
        assert_eq!(source.lookup().await.unwrap(), "alice");
    }

    #[tokio::test]
    async fn test_command_identity_trims_newline() {
        let source = CommandIdentity::new("sh", &["-c", "echo 'Ada Lovelace'"]);
        assert_eq!(source.lookup().await.unwrap(), "Ada Lovelace");
    }

    #[tokio::test]
    async fn test_command_identity_failure() {
        let source = CommandIdentity::new("sh", &["-c", "echo nope >&2; exit 1"]);
        match source.lookup().await.unwrap_err() {
            IdentityError::Failed { stderr, .. } => assert_eq!(stderr, "nope"),
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_command_identity_empty() {
        let source = CommandIdentity::new("sh", &["-c", "echo"]);
        assert!(matches!(
            source.lookup().await.unwrap_err(),
            IdentityError::Empty { .. }
        ));
    }

    #[tokio::test]
    async fn test_command_identity_missing_program() {
        let source = CommandIdentity::new("definitely-not-a-real-program-xyz", &[]);
        assert!(matches!(
            source.lookup().await.unwrap_err(),
            IdentityError::Spawn { .. }
        ));
    }

    #[test]
    fn test_git_command_line() {
        assert_eq!(CommandIdentity::git().command_line(), "git config user.name");
    }
}
