//! Access trace format.
//!
//! A trace is a text file with one access per line:
//!
//! ```text
//! # core op address [value]
//! 0 W 0xa0 7
//! 1 R 0xa0
//! ```
//!
//! Operations are `R` (read) or `W` (write), case-insensitive. Addresses and values
//! are decimal or `0x`-prefixed hexadecimal. `#` starts a comment; blank lines are
//! ignored.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::common::{Address, CoreId};

/// One memory access issued by a core.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Read the word at an address.
    Read {
        /// Issuing core.
        core: CoreId,
        /// Word address.
        addr: Address,
    },
    /// Write a value to the word at an address.
    Write {
        /// Issuing core.
        core: CoreId,
        /// Word address.
        addr: Address,
        /// Value to store.
        value: u64,
    },
}

impl Access {
    /// Core issuing the access.
    pub const fn core(&self) -> CoreId {
        match self {
            Self::Read { core, .. } | Self::Write { core, .. } => *core,
        }
    }

    /// Address the access targets.
    pub const fn addr(&self) -> Address {
        match self {
            Self::Read { addr, .. } | Self::Write { addr, .. } => *addr,
        }
    }
}

impl fmt::Display for Access {
    /// Formats the access in trace syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Read { core, addr } => write!(f, "{} R {addr}", core.index()),
            Self::Write { core, addr, value } => write!(f, "{} W {addr} {value}", core.index()),
        }
    }
}

/// A trace line that could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("trace line {line}: {kind}")]
pub struct TraceError {
    /// 1-based line number.
    pub line: usize,
    /// What was wrong with it.
    pub kind: TraceErrorKind,
}

/// Reason a trace line was rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TraceErrorKind {
    /// A required field is absent.
    #[error("missing {0}")]
    Missing(&'static str),

    /// The operation is not `R` or `W`.
    #[error("unknown operation `{0}`")]
    UnknownOp(String),

    /// A field is not a valid number.
    #[error("invalid number `{0}`")]
    InvalidNumber(String),

    /// The line has fields after the last expected one.
    #[error("unexpected trailing field `{0}`")]
    Trailing(String),
}

/// An ordered list of accesses.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Trace {
    accesses: Vec<Access>,
}

impl Trace {
    /// Wraps an already-built list of accesses.
    pub const fn new(accesses: Vec<Access>) -> Self {
        Self { accesses }
    }

    /// Parses trace text.
    ///
    /// # Errors
    ///
    /// Returns a [`TraceError`] for the first malformed line.
    pub fn parse(text: &str) -> Result<Self, TraceError> {
        let mut accesses = Vec::new();
        for (index, raw) in text.lines().enumerate() {
            let content = raw.split('#').next().unwrap_or_default().trim();
            if content.is_empty() {
                continue;
            }
            let access =
                parse_access(content).map_err(|kind| TraceError { line: index + 1, kind })?;
            accesses.push(access);
        }
        Ok(Self { accesses })
    }

    /// Accesses in issue order.
    pub fn accesses(&self) -> &[Access] {
        &self.accesses
    }

    /// Number of accesses.
    pub const fn len(&self) -> usize {
        self.accesses.len()
    }

    /// Returns `true` if the trace has no accesses.
    pub const fn is_empty(&self) -> bool {
        self.accesses.is_empty()
    }

    /// Highest core index referenced, if any.
    pub fn max_core(&self) -> Option<CoreId> {
        self.accesses.iter().map(Access::core).max()
    }
}

impl FromStr for Trace {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn parse_access(content: &str) -> Result<Access, TraceErrorKind> {
    let mut fields = content.split_whitespace();
    let core = fields.next().ok_or(TraceErrorKind::Missing("core"))?;
    let core = CoreId(parse_number(core)? as usize);
    let op = fields.next().ok_or(TraceErrorKind::Missing("operation"))?;
    let addr = fields.next().ok_or(TraceErrorKind::Missing("address"))?;
    let addr = Address(parse_number(addr)?);

    let access = match op.to_ascii_uppercase().as_str() {
        "R" => Access::Read { core, addr },
        "W" => {
            let value = fields.next().ok_or(TraceErrorKind::Missing("value"))?;
            Access::Write {
                core,
                addr,
                value: parse_number(value)?,
            }
        }
        _ => return Err(TraceErrorKind::UnknownOp(op.to_string())),
    };

    match fields.next() {
        Some(extra) => Err(TraceErrorKind::Trailing(extra.to_string())),
        None => Ok(access),
    }
}

fn parse_number(field: &str) -> Result<u64, TraceErrorKind> {
    let parsed = match field
        .strip_prefix("0x")
        .or_else(|| field.strip_prefix("0X"))
    {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => field.parse(),
    };
    parsed.map_err(|_| TraceErrorKind::InvalidNumber(field.to_string()))
}
