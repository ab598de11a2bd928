//! Shared CLI helpers - reply and proof printing.

use std::io::{self, Write};
use std::path::Path;

use colored::Colorize;

/// Print the normalized reply to stdout, unchanged even when empty.
pub fn print_response(reply: &str) {
    if let Err(e) = write_response(&mut io::stdout().lock(), reply) {
        tracing::warn!("Failed to print reply: {}", e);
    }
    if reply.is_empty() {
        eprintln!("{}", "(empty reply)".dimmed());
    }
}

fn write_response(out: &mut impl Write, reply: &str) -> io::Result<()> {
    writeln!(out, "{reply}")
}

/// Report where the proof landed (stderr, so stdout stays the bare reply).
pub fn print_proof(path: &Path) {
    eprintln!();
    eprintln!("{} {}", "✓ Proof written:".green().bold(), path.display());
}

/// `✓` / not-configured marker used by `status`.
pub fn mark(configured: bool) -> String {
    if configured {
        "✓".green().to_string()
    } else {
        "· not set".dimmed().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_response_is_verbatim() {
        let mut out = Vec::new();
        write_response(&mut out, "").unwrap();
        assert_eq!(out, b"\n");

        let mut out = Vec::new();
        write_response(&mut out, "line 1\n  line 2").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "line 1\n  line 2\n");
    }

    #[test]
    fn mark_not_set() {
        colored::control::set_override(false);
        assert_eq!(mark(false), "· not set");
        assert_eq!(mark(true), "✓");
    }
}
