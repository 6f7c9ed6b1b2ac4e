use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::pos::{PosClass, PosTag};

/// The five semantic roles a user fills in to describe an event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRoles {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub verb: String,
    #[serde(default)]
    pub direct_obj: String,
    #[serde(default)]
    pub indirect_obj: String,
    #[serde(default)]
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    pub id: u64,
    #[serde(flatten)]
    pub roles: QueryRoles,
    #[serde(default)]
    pub processed: bool,
}

impl Query {
    pub fn new(id: u64, roles: QueryRoles) -> Self {
        Self {
            id,
            roles,
            processed: false,
        }
    }

    /// Non-empty roles joined by single spaces, in role order.
    pub fn text(&self) -> String {
        let roles = &self.roles;
        [
            &roles.subject,
            &roles.verb,
            &roles.direct_obj,
            &roles.indirect_obj,
            &roles.location,
        ]
        .iter()
        .map(|role| role.trim())
        .filter(|role| !role.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Persisted synonym row: one query word with its tag, lookup class and synonyms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryWordRow {
    pub query_id: u64,
    pub word: String,
    pub pos: PosTag,
    pub sense: Option<PosClass>,
    pub synonyms: Vec<String>,
}

/// Query words with their synonyms, grouped by the tag each word received.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpandedQuery {
    pub query_id: u64,
    pub synonyms_with_tag: BTreeMap<PosTag, BTreeMap<String, Vec<String>>>,
}

impl ExpandedQuery {
    pub fn new(query_id: u64) -> Self {
        Self {
            query_id,
            synonyms_with_tag: BTreeMap::new(),
        }
    }

    pub fn add_word(&mut self, tag: PosTag, word: impl Into<String>, synonyms: Vec<String>) {
        self.synonyms_with_tag
            .entry(tag)
            .or_default()
            .insert(word.into(), synonyms);
    }

    /// Every (word, synonyms) pair regardless of tag.
    pub fn words(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.synonyms_with_tag.values().flat_map(|words| {
            words
                .iter()
                .map(|(word, synonyms)| (word.as_str(), synonyms.as_slice()))
        })
    }

    pub fn word_count(&self) -> usize {
        self.synonyms_with_tag.values().map(BTreeMap::len).sum()
    }

    pub fn to_rows(&self) -> Vec<QueryWordRow> {
        self.synonyms_with_tag
            .iter()
            .flat_map(|(tag, words)| {
                words.iter().map(move |(word, synonyms)| QueryWordRow {
                    query_id: self.query_id,
                    word: word.clone(),
                    pos: *tag,
                    sense: tag.class(),
                    synonyms: synonyms.clone(),
                })
            })
            .collect()
    }

    pub fn from_rows(query_id: u64, rows: &[QueryWordRow]) -> Self {
        let mut expanded = Self::new(query_id);
        for row in rows.iter().filter(|row| row.query_id == query_id) {
            expanded.add_word(row.pos, row.word.clone(), row.synonyms.clone());
        }
        expanded
    }
}
