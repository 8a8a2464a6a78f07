//! Aggregation levels above pages.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A level of the hierarchy. Pages are level 0 and not represented here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Chapter,
    Book,
    Part,
    Series,
}

impl Level {
    /// Bottom-up order.
    pub const ALL: [Level; 4] = [Level::Chapter, Level::Book, Level::Part, Level::Series];

    /// Depth above pages (chapter = 1).
    pub fn depth(self) -> u8 {
        match self {
            Level::Chapter => 1,
            Level::Book => 2,
            Level::Part => 3,
            Level::Series => 4,
        }
    }

    /// Slot in per-level arrays.
    pub fn index(self) -> usize {
        usize::from(self.depth() - 1)
    }

    /// Level whose aggregates are this level's children; `None` means pages.
    pub fn child_level(self) -> Option<Level> {
        match self {
            Level::Chapter => None,
            Level::Book => Some(Level::Chapter),
            Level::Part => Some(Level::Book),
            Level::Series => Some(Level::Part),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Level::Chapter => "chapter",
            Level::Book => "book",
            Level::Part => "part",
            Level::Series => "series",
        }
    }

    /// Log file used by the file store.
    pub fn file_name(self) -> &'static str {
        match self {
            Level::Chapter => "chapters.log",
            Level::Book => "books.log",
            Level::Part => "parts.log",
            Level::Series => "series.log",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chapter" | "chapters" => Ok(Level::Chapter),
            "book" | "books" => Ok(Level::Book),
            "part" | "parts" => Ok(Level::Part),
            "series" => Ok(Level::Series),
            other => Err(format!("unknown level: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_links() {
        assert_eq!(Level::Chapter.child_level(), None);
        assert_eq!(Level::Series.child_level(), Some(Level::Part));
        for (i, level) in Level::ALL.iter().enumerate() {
            assert_eq!(level.index(), i);
        }
    }

    #[test]
    fn test_parse() {
        assert_eq!("Books".parse::<Level>().unwrap(), Level::Book);
        assert!("volume".parse::<Level>().is_err());
    }
}
