//! Interned 64-bit names.
//!
//! Query identifiers use the base-32 name encoding of EOSIO-style chains: up
//! to twelve characters from `.12345abcdefghijklmnopqrstuvwxyz` packed five
//! bits each from the high end, plus an optional thirteenth character that
//! fills the remaining four bits.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use common_error::{name_err, QlinkError, QlinkResult};

const CHARMAP: &[u8; 32] = b".12345abcdefghijklmnopqrstuvwxyz";

/// Maximum length of a name in characters.
pub const MAX_NAME_LEN: usize = 13;

/// A 64-bit interned identifier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(u64);

impl Name {
    /// Wrap a raw 64-bit value.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw 64-bit value.
    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// Whether this is the empty name.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

const fn char_value(c: char) -> Option<u64> {
    match c {
        '.' => Some(0),
        '1'..='5' => Some(c as u64 - '1' as u64 + 1),
        'a'..='z' => Some(c as u64 - 'a' as u64 + 6),
        _ => None,
    }
}

impl FromStr for Name {
    type Err = QlinkError;

    fn from_str(s: &str) -> QlinkResult<Self> {
        let mut value = 0u64;
        for (i, c) in s.chars().enumerate() {
            if i >= MAX_NAME_LEN {
                name_err!("name longer than {MAX_NAME_LEN} characters: {s}");
            }
            let Some(v) = char_value(c) else {
                name_err!("invalid character {c:?} in name {s}");
            };
            if i < MAX_NAME_LEN - 1 {
                value |= v << (64 - 5 * (i + 1));
            } else {
                if v > 0x0f {
                    name_err!("last character of name {s} must be one of .1-5a-j");
                }
                value |= v;
            }
        }
        Ok(Self(value))
    }
}

impl TryFrom<&str> for Name {
    type Error = QlinkError;

    fn try_from(s: &str) -> QlinkResult<Self> {
        s.parse()
    }
}

impl From<u64> for Name {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = [b'.'; MAX_NAME_LEN];
        let mut tmp = self.0;
        for i in 0..MAX_NAME_LEN {
            let (mask, shift) = if i == 0 { (0x0f, 4) } else { (0x1f, 5) };
            buf[MAX_NAME_LEN - 1 - i] = CHARMAP[(tmp & mask) as usize];
            tmp >>= shift;
        }
        let text: String = buf.iter().map(|&b| char::from(b)).collect();
        f.write_str(text.trim_end_matches('.'))
    }
}

impl Serialize for Name {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Name {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}
