use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
    #[error("malformed script at byte {offset}: {reason}")]
    Parse { offset: usize, reason: String },
    #[error("hunk #{index} does not apply: {reason}")]
    Patch { index: usize, reason: String },
    #[error("cannot encode script: {0}")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("cannot decode script: {0}")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("unsupported compression magic {0:#04x}")]
    UnknownCompression(u8),
}

impl Error {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn parse(offset: usize, reason: impl Into<String>) -> Self {
        Self::Parse {
            offset,
            reason: reason.into(),
        }
    }

    pub(crate) fn patch(index: usize, reason: impl Into<String>) -> Self {
        Self::Patch {
            index,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
