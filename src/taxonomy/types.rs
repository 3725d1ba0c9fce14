//! Tag taxonomy data structures

use serde::{Deserialize, Serialize};

/// Closed set of tag groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TagGroup {
    Condition,
    Junk,
    Bundle,
    Shipping,
}

impl TagGroup {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Condition => "condition",
            Self::Junk => "junk",
            Self::Bundle => "bundle",
            Self::Shipping => "shipping",
        }
    }
}

/// A categorical tag
///
/// The keyword is both the match string and the tag's identity; the label
/// and style token are display-only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub keyword: String,
    pub label: String,
    #[serde(default)]
    pub style: String,
    pub group: TagGroup,
}

impl Tag {
    #[must_use]
    pub fn new(
        keyword: impl Into<String>,
        label: impl Into<String>,
        style: impl Into<String>,
        group: TagGroup,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            label: label.into(),
            style: style.into(),
            group,
        }
    }
}

/// Ordered, static list of tags
///
/// Order matters: tagging results and tag listings always follow it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Taxonomy {
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Taxonomy {
    #[must_use]
    pub const fn new(tags: Vec<Tag>) -> Self {
        Self { tags }
    }

    /// Look up a tag by keyword
    #[must_use]
    pub fn get(&self, keyword: &str) -> Option<&Tag> {
        self.tags.iter().find(|t| t.keyword == keyword)
    }

    /// Tags belonging to one group, in taxonomy order
    pub fn group(&self, group: TagGroup) -> impl Iterator<Item = &Tag> {
        self.tags.iter().filter(move |t| t.group == group)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

impl Default for Taxonomy {
    /// Built-in taxonomy for Japanese auction listings
    fn default() -> Self {
        use TagGroup::{Bundle, Condition, Junk, Shipping};

        Self::new(vec![
            Tag::new("新品", "New", "tag-green", Condition),
            Tag::new("未使用", "Unused", "tag-green", Condition),
            Tag::new("未開封", "Sealed", "tag-green", Condition),
            Tag::new("美品", "Mint", "tag-teal", Condition),
            Tag::new("中古", "Used", "tag-gray", Condition),
            Tag::new("ジャンク", "Junk", "tag-red", Junk),
            Tag::new("動作未確認", "Untested", "tag-orange", Junk),
            Tag::new("部品取り", "For parts", "tag-red", Junk),
            Tag::new("まとめ", "Bundle", "tag-purple", Bundle),
            Tag::new("セット", "Set", "tag-purple", Bundle),
            Tag::new("大量", "Bulk", "tag-purple", Bundle),
            Tag::new("送料無料", "Free shipping", "tag-blue", Shipping),
            Tag::new("匿名配送", "Anonymous shipping", "tag-blue", Shipping),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_taxonomy_covers_every_group() {
        let taxonomy = Taxonomy::default();
        for group in [TagGroup::Condition, TagGroup::Junk, TagGroup::Bundle, TagGroup::Shipping] {
            assert!(taxonomy.group(group).next().is_some(), "no tags for {group:?}");
        }
    }

    #[test]
    fn test_get_by_keyword() {
        let taxonomy = Taxonomy::default();
        assert_eq!(taxonomy.get("ジャンク").map(|t| t.group), Some(TagGroup::Junk));
        assert!(taxonomy.get("missing").is_none());
    }

    #[test]
    fn test_group_as_str() {
        assert_eq!(TagGroup::Shipping.as_str(), "shipping");
        assert_eq!(TagGroup::Condition.as_str(), "condition");
    }
}
