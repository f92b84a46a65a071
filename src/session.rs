//! Interactive single-screen session.
//!
//! One identifier, one current image, three actions. Lines are read one at
//! a time and each command runs to completion before the next line is
//! read, so store operations never interleave. Feedback is a one-line
//! transient message per action.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use tracing::debug;

use crate::source::{self, LoadedImage, SourceError};
use crate::store::{ImageStore, StoreError};

/// Errors surfaced to the user as one-line messages.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// An action that needs an identifier was given none.
    #[error("enter an image id first")]
    EmptyId,

    /// Save was requested before any image was opened or retrieved.
    #[error("open an image before saving")]
    NoImageLoaded,

    /// Retrieve found no record under the identifier.
    #[error("no image stored under {0:?}")]
    NotFound(String),

    /// A command was recognized but its argument was missing.
    #[error("usage: {0}")]
    Usage(&'static str),

    /// The verb did not match any command.
    #[error("unknown command {0:?}, try 'help'")]
    UnknownCommand(String),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// A parsed session command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Decode an image file and make it the current image.
    Open(PathBuf),
    /// Store the current image under an identifier.
    Save(String),
    /// Load the record stored under an identifier as the current image.
    Retrieve(String),
    /// Describe the current image.
    Show,
    /// List stored identifiers.
    List,
    /// Print the command summary.
    Help,
    /// End the session.
    Quit,
}

impl Command {
    /// Parse one input line.
    ///
    /// The first word picks the action and the rest of the line is the
    /// argument verbatim, so paths and ids containing spaces need no
    /// quoting. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Command>, SessionError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(None);
        }
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };
        let command = match verb {
            "open" | "o" => {
                if rest.is_empty() {
                    return Err(SessionError::Usage("open <image-file>"));
                }
                Command::Open(PathBuf::from(rest))
            }
            "save" | "s" => {
                if rest.is_empty() {
                    return Err(SessionError::EmptyId);
                }
                Command::Save(rest.to_string())
            }
            "get" | "retrieve" | "g" => {
                if rest.is_empty() {
                    return Err(SessionError::EmptyId);
                }
                Command::Retrieve(rest.to_string())
            }
            "show" => Command::Show,
            "list" | "ls" => Command::List,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(SessionError::UnknownCommand(other.to_string())),
        };
        Ok(Some(command))
    }
}

/// What handling a command produced.
#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    /// A transient feedback message for the user.
    Message(String),
    /// The session should end.
    Quit,
}

/// Single-screen state: the store plus the currently loaded image.
pub struct Session {
    store: ImageStore,
    current: Option<LoadedImage>,
}

impl Session {
    /// Create a session over an image store with nothing loaded yet.
    pub fn new(store: ImageStore) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// The image the screen is currently showing, if any.
    pub fn current(&self) -> Option<&LoadedImage> {
        self.current.as_ref()
    }

    /// Handle one command to completion.
    pub fn handle(&mut self, command: Command) -> Result<Outcome, SessionError> {
        match command {
            Command::Open(path) => {
                let loaded = source::load(&path)?;
                let message = format!(
                    "loaded {} ({}x{})",
                    path.display(),
                    loaded.image.width(),
                    loaded.image.height()
                );
                self.current = Some(loaded);
                Ok(Outcome::Message(message))
            }
            Command::Save(id) => {
                let loaded = self.current.as_ref().ok_or(SessionError::NoImageLoaded)?;
                let saved = self.store.put(&id, &loaded.image)?;
                Ok(Outcome::Message(format!(
                    "saved {:?} ({}x{}, {} bytes)",
                    id, saved.width, saved.height, saved.bytes
                )))
            }
            Command::Retrieve(id) => match self.store.get(&id)? {
                Some(image) => {
                    let message =
                        format!("retrieved {:?} ({}x{})", id, image.width(), image.height());
                    let origin = self.store.base_dir().join(&id);
                    self.current = Some(LoadedImage { image, origin });
                    Ok(Outcome::Message(message))
                }
                None => Err(SessionError::NotFound(id)),
            },
            Command::Show => match &self.current {
                Some(loaded) => Ok(Outcome::Message(format!(
                    "showing {} ({}x{})",
                    loaded.origin.display(),
                    loaded.image.width(),
                    loaded.image.height()
                ))),
                None => Ok(Outcome::Message("nothing loaded yet".to_string())),
            },
            Command::List => {
                let entries = self.store.list()?;
                if entries.is_empty() {
                    return Ok(Outcome::Message("vault is empty".to_string()));
                }
                let mut lines = Vec::with_capacity(entries.len());
                for entry in entries {
                    let modified = entry
                        .modified
                        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                        .unwrap_or_else(|| "-".to_string());
                    lines.push(format!("{}  {} bytes  {}", entry.id, entry.bytes, modified));
                }
                Ok(Outcome::Message(lines.join("\n")))
            }
            Command::Help => Ok(Outcome::Message(HELP.to_string())),
            Command::Quit => Ok(Outcome::Quit),
        }
    }

    /// Run the synchronous event loop until `quit` or end of input.
    ///
    /// Each iteration reads one line, dispatches it, and prints the
    /// feedback before the next line is read. Errors become `error: ...`
    /// lines and the loop continues; they are never fatal to the session.
    pub fn run<R, W>(&mut self, input: &mut R, output: &mut W) -> std::io::Result<()>
    where
        R: BufRead,
        W: Write,
    {
        loop {
            write!(output, "pixvault> ")?;
            output.flush()?;

            let mut line = String::new();
            if input.read_line(&mut line)? == 0 {
                debug!("end of input, leaving session");
                break;
            }

            match Command::parse(&line) {
                Ok(None) => continue,
                Ok(Some(command)) => match self.handle(command) {
                    Ok(Outcome::Message(message)) => writeln!(output, "{}", message)?,
                    Ok(Outcome::Quit) => break,
                    Err(e) => writeln!(output, "error: {}", e)?,
                },
                Err(e) => writeln!(output, "error: {}", e)?,
            }
        }
        Ok(())
    }
}

const HELP: &str = "\
commands:
  open <image-file>    decode an image and make it the current image
  save <id>            store the current image under <id>
  get <id>             load the image stored under <id>
  show                 describe the current image
  list                 list stored images
  help                 show this help
  quit                 leave the session";
