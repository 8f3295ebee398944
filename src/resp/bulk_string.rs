use crate::{Error, Result};
use std::{fmt, ops::Deref};

/// A RESP bulk string: either a binary payload or the null bulk string (`$-1\r\n` / `_\r\n`).
#[derive(Clone, PartialEq, Eq)]
pub enum BulkString {
    Binary(Vec<u8>),
    Nil,
}

impl BulkString {
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            BulkString::Binary(b) => b,
            BulkString::Nil => &[],
        }
    }

    #[inline]
    pub fn is_nil(&self) -> bool {
        matches!(self, BulkString::Nil)
    }
}

impl Deref for BulkString {
    type Target = [u8];

    #[inline]
    fn deref(&self) -> &Self::Target {
        self.as_bytes()
    }
}

impl ToString for BulkString {
    fn to_string(&self) -> String {
        match self {
            BulkString::Binary(b) => String::from_utf8_lossy(b).into_owned(),
            BulkString::Nil => String::new(),
        }
    }
}

impl From<BulkString> for Vec<u8> {
    #[inline]
    fn from(bs: BulkString) -> Self {
        match bs {
            BulkString::Binary(b) => b,
            BulkString::Nil => Vec::new(),
        }
    }
}

impl From<BulkString> for Result<String> {
    fn from(bs: BulkString) -> Self {
        match bs {
            BulkString::Binary(b) => {
                String::from_utf8(b).map_err(|e| Error::Client(e.to_string()))
            }
            BulkString::Nil => Ok(String::new()),
        }
    }
}

impl fmt::Debug for BulkString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BulkString::Binary(b) => f
                .debug_tuple("BulkString")
                .field(&String::from_utf8_lossy(b).into_owned())
                .finish(),
            BulkString::Nil => write!(f, "BulkString(Nil)"),
        }
    }
}
