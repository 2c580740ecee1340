//! Overwrite protection for output destinations.
//!
//! The caller picks a policy; interactive confirmation goes through the
//! [`Confirmer`] trait so the core never blocks on a hardcoded console read.

use crate::utils::error::OutputError;
use log::{debug, info};
use serde::Deserialize;
use std::io::{self, BufRead, Write};
use std::path::Path;

/// What to do when an output file already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Ask through the configured confirmer
    #[default]
    Prompt,

    /// Replace without asking
    Overwrite,

    /// Fail with `DestinationExists`
    Reject,
}

impl OverwritePolicy {
    /// Prompting without a terminal degrades to rejection instead of blocking
    pub fn for_session(self, interactive: bool) -> Self {
        match self {
            OverwritePolicy::Prompt if !interactive => OverwritePolicy::Reject,
            other => other,
        }
    }
}

/// How a writer may open its destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    /// Destination must not exist
    CreateNew,

    /// Destination may be truncated
    Replace,
}

/// Source of overwrite confirmations
pub trait Confirmer {
    /// Return true if `path` may be overwritten
    fn confirm_overwrite(&mut self, path: &Path) -> io::Result<bool>;
}

/// Line-based y/n prompt over any reader/writer pair
pub struct PromptConfirmer<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PromptConfirmer<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }
}

impl PromptConfirmer<io::StdinLock<'static>, io::Stdout> {
    /// Prompt on the process console
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Confirmer for PromptConfirmer<R, W> {
    fn confirm_overwrite(&mut self, path: &Path) -> io::Result<bool> {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        loop {
            write!(
                self.output,
                "The file '{}' already exists. Do you want to overwrite it? (y/n): ",
                name
            )?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                // EOF: nobody left to answer
                writeln!(self.output)?;
                return Ok(false);
            }

            match line.trim().to_ascii_lowercase().as_str() {
                "y" => return Ok(true),
                "n" => return Ok(false),
                _ => writeln!(self.output, "Please respond with 'y' or 'n'.")?,
            }
        }
    }
}

/// Decide how `path` may be written under `policy`
///
/// **Public** - call for every destination before any processing starts
///
/// # Errors
/// * `OutputError::DestinationExists` - File exists and policy rejects it
/// * `OutputError::Cancelled` - User declined the overwrite
/// * `OutputError::WriteFailed` - Confirmation I/O failed
pub fn check_destination(
    path: &Path,
    policy: OverwritePolicy,
    confirmer: &mut dyn Confirmer,
) -> Result<WriteMode, OutputError> {
    super::validate_path(path)?;

    if !path.exists() {
        return Ok(WriteMode::CreateNew);
    }

    debug!("Destination exists: {} (policy {:?})", path.display(), policy);

    match policy {
        OverwritePolicy::Overwrite => Ok(WriteMode::Replace),
        OverwritePolicy::Reject => Err(OutputError::DestinationExists(path.to_path_buf())),
        OverwritePolicy::Prompt => {
            if confirmer.confirm_overwrite(path)? {
                info!("Overwrite of {} confirmed", path.display());
                Ok(WriteMode::Replace)
            } else {
                Err(OutputError::Cancelled(path.to_path_buf()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::NamedTempFile;

    struct Always(bool);

    impl Confirmer for Always {
        fn confirm_overwrite(&mut self, _path: &Path) -> io::Result<bool> {
            Ok(self.0)
        }
    }

    fn answer(input: &str) -> (bool, String) {
        let mut out = Vec::new();
        let confirmed = PromptConfirmer::new(Cursor::new(input.as_bytes()), &mut out)
            .confirm_overwrite(Path::new("/tmp/out/plot.svg"))
            .unwrap();
        (confirmed, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_prompt_accepts_case_insensitive() {
        assert!(answer("Y\n").0);
        assert!(!answer("N\n").0);
    }

    #[test]
    fn test_prompt_reprompts_on_invalid_input() {
        let (confirmed, transcript) = answer("maybe\n\ny\n");
        assert!(confirmed);
        assert_eq!(transcript.matches("(y/n)").count(), 3);
        assert_eq!(transcript.matches("Please respond with 'y' or 'n'.").count(), 2);
        assert!(transcript.contains("'plot.svg'"));
    }

    #[test]
    fn test_prompt_eof_declines() {
        assert!(!answer("").0);
    }

    #[test]
    fn test_free_destination_is_create_new() {
        let dir = tempfile::tempdir().unwrap();
        let mode = check_destination(
            &dir.path().join("new.csv"),
            OverwritePolicy::Reject,
            &mut Always(false),
        )
        .unwrap();
        assert_eq!(mode, WriteMode::CreateNew);
    }

    #[test]
    fn test_existing_destination_policies() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path();

        assert_eq!(
            check_destination(path, OverwritePolicy::Overwrite, &mut Always(false)).unwrap(),
            WriteMode::Replace
        );
        assert!(matches!(
            check_destination(path, OverwritePolicy::Reject, &mut Always(true)),
            Err(OutputError::DestinationExists(_))
        ));
        assert_eq!(
            check_destination(path, OverwritePolicy::Prompt, &mut Always(true)).unwrap(),
            WriteMode::Replace
        );
        assert!(matches!(
            check_destination(path, OverwritePolicy::Prompt, &mut Always(false)),
            Err(OutputError::Cancelled(_))
        ));
    }

    #[test]
    fn test_non_interactive_prompt_rejects() {
        assert_eq!(OverwritePolicy::Prompt.for_session(false), OverwritePolicy::Reject);
        assert_eq!(OverwritePolicy::Prompt.for_session(true), OverwritePolicy::Prompt);
        assert_eq!(OverwritePolicy::Overwrite.for_session(false), OverwritePolicy::Overwrite);
    }
}
