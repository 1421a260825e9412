//! Category filter params set
//!
//! A set of `{name, values}` pairs whose member identity is a structural
//! hash of the pair's content. Two members with the same name and the same
//! values in the same order are the same member; reordering values changes
//! identity, reordering members does not.

use serde::{Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

/// One `{name, values}` member of a category filter's params
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryParam {
    pub name: String,
    pub values: Vec<String>,
}

impl CategoryParam {
    pub fn new(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Set identity of this member
    pub fn identity(&self) -> u64 {
        hash_category_param(&self.name, &self.values)
    }
}

/// Stable hash over `name-` followed by `value-` for each value in order
pub fn hash_category_param(name: &str, values: &[String]) -> u64 {
    let mut buf = String::with_capacity(name.len() + 1);
    buf.push_str(name);
    buf.push('-');
    for value in values {
        buf.push_str(value);
        buf.push('-');
    }

    let digest = Sha256::digest(buf.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&digest[..8]);
    u64::from_be_bytes(prefix)
}

/// Hash-identified set of category params
///
/// Iterates and serializes in ascending identity order, so output never
/// depends on the iteration order of whatever map the params came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryParamsSet {
    members: BTreeMap<u64, CategoryParam>,
}

impl CategoryParamsSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member; returns false if an identical member was present
    pub fn insert(&mut self, param: CategoryParam) -> bool {
        let id = param.identity();
        if self.members.contains_key(&id) {
            return false;
        }
        self.members.insert(id, param);
        true
    }

    pub fn contains(&self, param: &CategoryParam) -> bool {
        self.members.contains_key(&param.identity())
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryParam> {
        self.members.values()
    }

    /// Member identities in iteration order
    pub fn identities(&self) -> Vec<u64> {
        self.members.keys().copied().collect()
    }
}

impl FromIterator<CategoryParam> for CategoryParamsSet {
    fn from_iter<I: IntoIterator<Item = CategoryParam>>(iter: I) -> Self {
        let mut set = Self::new();
        for param in iter {
            set.insert(param);
        }
        set
    }
}

impl Serialize for CategoryParamsSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.members.values())
    }
}
