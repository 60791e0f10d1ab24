//! Task labels.
//!
//! Storage layers disagree on how tags are kept: some hand back a list, the
//! record store keeps a single comma-joined string. [`Tags`] accepts either
//! shape when deserializing and is always an ordered, duplicate-free list in
//! memory. Use [`serialize_joined`] where the storage side expects the string.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Serialize, Debug, Clone, PartialEq, Eq, Default)]
#[serde(transparent)]
pub struct Tags(Vec<String>);

impl Tags {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses the comma-joined storage form, e.g. `"work, urgent"`.
    pub fn parse(joined: &str) -> Self {
        Self::from_labels(joined.split(','))
    }

    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tags = Self::new();
        for label in labels {
            tags.push(label.as_ref());
        }
        tags
    }

    /// Adds trimmed labels; a comma separates several. Returns `false` when
    /// nothing new was added.
    pub fn push(&mut self, label: &str) -> bool {
        let mut added = false;
        for label in label.split(',').map(str::trim) {
            if label.is_empty() || self.0.iter().any(|t| t == label) {
                continue;
            }
            self.0.push(label.to_string());
            added = true;
        }
        added
    }

    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.0.len();
        self.0.retain(|t| t != label);
        self.0.len() != before
    }

    pub fn to_joined(&self) -> String {
        self.0.join(",")
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `needle` must already be lowercase.
    pub(crate) fn any_contains_lowercase(&self, needle: &str) -> bool {
        self.0.iter().any(|t| t.to_lowercase().contains(needle))
    }
}

impl fmt::Display for Tags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

impl<S: AsRef<str>> FromIterator<S> for Tags {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::from_labels(iter)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTags {
    Joined(String),
    List(Vec<String>),
    Missing,
}

impl<'de> Deserialize<'de> for Tags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match RawTags::deserialize(deserializer)? {
            RawTags::Joined(joined) => Tags::parse(&joined),
            RawTags::List(list) => Tags::from_labels(list),
            RawTags::Missing => Tags::new(),
        })
    }
}

/// `serialize_with` helper for records that keep tags as one string.
pub fn serialize_joined<S>(tags: &Tags, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&tags.to_joined())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_joined_round_trip_keeps_order() {
        let tags = Tags::from_labels(["work", "urgent"]);
        let joined = tags.to_joined();
        assert_eq!(joined, "work,urgent");
        assert_eq!(Tags::parse(&joined), tags);
    }

    #[test]
    fn test_parse_trims_and_drops_blanks_and_duplicates() {
        let tags = Tags::parse(" work ,, urgent,work ,");
        assert_eq!(tags.as_slice(), &["work".to_string(), "urgent".to_string()]);
        assert!(Tags::parse("").is_empty());
    }

    #[test]
    fn test_deserialize_accepts_both_shapes() {
        let from_list: Tags = serde_json::from_str(r#"["design","team"]"#).unwrap();
        let from_string: Tags = serde_json::from_str(r#""design,team""#).unwrap();
        let from_null: Tags = serde_json::from_str("null").unwrap();
        assert_eq!(from_list, from_string);
        assert!(from_null.is_empty());
    }

    #[test]
    fn test_push_and_remove() {
        let mut tags = Tags::new();
        assert!(tags.push("ops"));
        assert!(!tags.push(" ops "));
        assert!(!tags.push("  "));
        assert!(tags.remove("ops"));
        assert!(!tags.remove("ops"));
        assert!(tags.is_empty());
    }

    #[test]
    fn test_commas_inside_a_label_split_it() {
        let mut tags = Tags::from_labels(["q3,budget", "work"]);
        assert_eq!(tags.to_joined(), "q3,budget,work");
        assert_eq!(Tags::parse(&tags.to_joined()), tags);

        assert!(tags.push("ops, work"));
        assert_eq!(tags.len(), 4);

        let from_list: Tags = serde_json::from_str(r#"["q3,budget","work"]"#).unwrap();
        assert_eq!(from_list, Tags::parse("q3,budget,work"));
    }
}
