//! Raw payload sources for `set`.
//!
//! A value token is one of: a single hyphen (read stdin), an absolute path
//! (read the file), or anything else (the literal bytes of the token).

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;
use zeroize::Zeroizing;

use crate::error::PayloadError;

/// Where a secret payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadSource {
    Literal(String),
    File(PathBuf),
    Stdin,
}

impl PayloadSource {
    /// Interpret a value token.
    ///
    /// # Errors
    ///
    /// Returns `PayloadError::Empty` for an empty token.
    pub fn parse(token: &str) -> Result<Self, PayloadError> {
        if token.is_empty() {
            return Err(PayloadError::Empty);
        }
        if token == "-" {
            return Ok(Self::Stdin);
        }
        if Path::new(token).is_absolute() {
            return Ok(Self::File(PathBuf::from(token)));
        }
        Ok(Self::Literal(token.to_string()))
    }

    /// Read the payload, taking stdin from the process.
    pub fn read(&self) -> Result<Zeroizing<Vec<u8>>, PayloadError> {
        self.read_with(std::io::stdin().lock())
    }

    /// Read the payload, using `stdin` for the hyphen token.
    pub fn read_with(&self, mut stdin: impl Read) -> Result<Zeroizing<Vec<u8>>, PayloadError> {
        let mut buf = Zeroizing::new(Vec::new());
        match self {
            Self::Literal(value) => buf.extend_from_slice(value.as_bytes()),
            Self::Stdin => {
                debug!("reading payload from stdin");
                stdin
                    .read_to_end(&mut buf)
                    .map_err(|source| PayloadError::Read {
                        source_name: "stdin".to_string(),
                        source,
                    })?;
            }
            Self::File(path) => {
                debug!(path = %path.display(), "reading payload from file");
                std::fs::File::open(path)
                    .and_then(|mut f| f.read_to_end(&mut buf))
                    .map_err(|source| PayloadError::Read {
                        source_name: path.display().to_string(),
                        source,
                    })?;
            }
        }
        Ok(buf)
    }
}
