//! Serde model of one JSON schema layer.
//!
//! ```json
//! {
//!   "groups": { "inline": ["TEXT", "emphasis", "link"] },
//!   "patterns": {
//!     "identifier.ean": {
//!       "elementName": "identifier",
//!       "attributes": { "type": ["ean"] },
//!       "content": [["TEXT"]]
//!     },
//!     "p": { "content": [{ "group": "inline" }] }
//!   }
//! }
//! ```
//!
//! An attribute mapped to `null` takes any value. Keys of a pattern entry
//! that are not part of the model end up in its metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSchema {
    #[serde(default)]
    pub groups: BTreeMap<String, Vec<RawContentItem>>,
    #[serde(default)]
    pub patterns: BTreeMap<String, RawPattern>,
}

impl RawSchema {
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPattern {
    #[serde(default, alias = "element", skip_serializing_if = "Option::is_none")]
    pub element_name: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Option<Vec<String>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Vec<RawAlternative>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<String>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub seed_variants: BTreeMap<String, String>,

    #[serde(flatten)]
    pub metadata: BTreeMap<String, Value>,
}

/// A content alternative: a list of members or a whole group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAlternative {
    Items(Vec<RawContentItem>),
    Group(GroupRef),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawContentItem {
    Member(String),
    Group(GroupRef),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GroupRef {
    pub group: String,
}
