use std::fmt;
use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::Error;

/// A named collection a book can be saved to.
///
/// A book may sit on any number of shelves at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Shelf {
    /// To be read.
    Tbr,
    /// Public recommendations.
    Recommend,
    /// Finished.
    Read,
}

impl Shelf {
    pub const ALL: [Shelf; 3] = [Shelf::Tbr, Shelf::Recommend, Shelf::Read];

    pub fn as_str(&self) -> &'static str {
        match self {
            Shelf::Tbr => "TBR",
            Shelf::Recommend => "RECOMMEND",
            Shelf::Read => "READ",
        }
    }
}

impl fmt::Display for Shelf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Shelf {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "TBR" => Ok(Shelf::Tbr),
            "RECOMMEND" => Ok(Shelf::Recommend),
            "READ" => Ok(Shelf::Read),
            other => Err(Error::InvalidInput(format!("unknown shelf: {other}"))),
        }
    }
}

/// One book on one shelf.
///
/// Field names match the blobs the mobile clients already persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ShelfMembership {
    #[serde(rename = "bookId")]
    pub book_id: String,
    pub shelf: Shelf,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "savedAt")]
    pub saved_at: i64,
}
