// * Tag list editing
// * De-duplicated, order-preserving tag set with length capping for the
// * target database's field limits.

use crate::config::constants::MAX_TAG_LENGTH;

/// Ordered, de-duplicated list of tags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagList {
    tags: Vec<String>,
}

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a list from existing tags, dropping duplicates but keeping
    /// first-seen order.
    pub fn from_tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for tag in tags {
            list.add(tag.as_ref());
        }
        list
    }

    /// Adds a tag. Trims whitespace, rejects empties and duplicates, and
    /// caps length at the database field limit. Returns true when added.
    pub fn add(&mut self, tag: &str) -> bool {
        let trimmed = tag.trim();
        if trimmed.is_empty() {
            return false;
        }
        let capped: String = trimmed.chars().take(MAX_TAG_LENGTH).collect();
        if self.tags.contains(&capped) {
            return false;
        }
        self.tags.push(capped);
        true
    }

    /// Splits comma-separated input and adds each piece.
    pub fn add_many(&mut self, text: &str) {
        for piece in text.split(',') {
            self.add(piece);
        }
    }

    /// Removes the tag at `index`, returning it if the index was valid.
    pub fn remove(&mut self, index: usize) -> Option<String> {
        if index < self.tags.len() {
            Some(self.tags.remove(index))
        } else {
            None
        }
    }

    /// Replaces the whole list (used when enrichment supplies new tags).
    pub fn replace_all<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags.clear();
        for tag in tags {
            self.add(tag.as_ref());
        }
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tags
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.tags.clone()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}
