//! Response shapes for the read API.

use serde::{Deserialize, Serialize};

use super::{Item, ItemKind};

/// A pointer to an item in a listing response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemListing {
    pub id: u64,
    /// Relative location of the full item, e.g. `/items/8863`
    pub location: String,
}

impl ItemListing {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            location: format!("/items/{id}"),
        }
    }
}

/// A stored item shaped for the read API, with related IDs turned into
/// listings a client can follow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDetail {
    pub id: u64,

    #[serde(rename = "type")]
    pub kind: ItemKind,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub by: String,

    #[serde(default, skip_serializing_if = "i64_is_zero")]
    pub time: i64,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub url: String,

    #[serde(default, skip_serializing_if = "i64_is_zero")]
    pub score: i64,

    #[serde(default, skip_serializing_if = "u64_is_zero")]
    pub descendants: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<ItemListing>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<ItemListing>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parts: Vec<ItemListing>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poll: Option<ItemListing>,
}

impl From<&Item> for ItemDetail {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            kind: item.kind,
            by: item.by.clone(),
            time: item.time,
            title: item.title.clone(),
            text: item.text.clone(),
            url: item.url.clone(),
            score: item.score,
            descendants: item.descendants,
            parent: item.parent.map(ItemListing::new),
            kids: item.kids.iter().copied().map(ItemListing::new).collect(),
            parts: item.parts.iter().copied().map(ItemListing::new).collect(),
            poll: item.poll.map(ItemListing::new),
        }
    }
}

fn i64_is_zero(v: &i64) -> bool {
    *v == 0
}

fn u64_is_zero(v: &u64) -> bool {
    *v == 0
}
