//! Item data structure.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Comment,
    Job,
    Poll,
    Pollopt,
    /// Anything the source reports that we do not recognize.
    ///
    /// Stored under an `unknown` key segment, which the listing scans never
    /// match, so such items are reachable by ID lookup only.
    #[serde(other)]
    Unknown,
}

impl ItemKind {
    /// The key segment used when encoding this kind into a storage key.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Story => "story",
            Self::Comment => "comment",
            Self::Job => "job",
            Self::Poll => "poll",
            Self::Pollopt => "pollopt",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single content item as fetched from the source API.
///
/// Field names match the Firebase wire format; absent fields default and
/// empty fields are skipped on serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: u64,

    /// Item kind, `Unknown` when the source omits or garbles it
    #[serde(rename = "type", default = "unknown_kind")]
    pub kind: ItemKind,

    /// Author handle
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub by: String,

    /// Creation time, unix seconds
    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub time: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// HTML body for comments, polls, and text posts
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "is_zero_i64")]
    pub score: i64,

    /// Total comment count for stories and polls
    #[serde(default, skip_serializing_if = "is_zero_u64")]
    pub descendants: u64,

    /// Parent comment or story; absent for roots
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<u64>,

    /// Child comment IDs, in display order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<u64>,

    /// Poll option IDs for polls
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<u64>,

    /// Owning poll for poll options
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<u64>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub dead: bool,
}

impl Item {
    /// True when the source has tombstoned this item.
    ///
    /// Tombstoned items are fetched but never persisted and their subtree is
    /// never visited.
    pub fn is_tombstoned(&self) -> bool {
        self.deleted || self.dead
    }

    /// Child and poll-part IDs, in visitation order.
    pub fn nested_ids(&self) -> impl Iterator<Item = u64> + '_ {
        self.kids.iter().chain(self.parts.iter()).copied()
    }
}

fn unknown_kind() -> ItemKind {
    ItemKind::Unknown
}

fn is_zero_i64(v: &i64) -> bool {
    *v == 0
}

fn is_zero_u64(v: &u64) -> bool {
    *v == 0
}

fn is_false(v: &bool) -> bool {
    !*v
}
