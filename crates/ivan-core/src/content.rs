//! Content types and structures.
//!
//! Everything here is produced by the host framework and only read while
//! rendering. Items keep their tags in the order the author wrote them.

use std::{
    cmp::Ordering,
    collections::{BTreeSet, HashSet},
    fmt,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Default path of the tag index page.
pub const DEFAULT_TAGS_PATH: &str = "/tags";

/// Identifier of a section declared by the site.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Create a section id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw identifier.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A label attached to items.
///
/// Ordering is plain lexicographic on the tag text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(String);

impl Tag {
    /// Create a tag.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Get the tag text as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// URL-safe slug for this tag.
    ///
    /// Lowercases and collapses every run of non-alphanumeric characters
    /// into a single `-`. Tags with no alphanumeric character at all get
    /// `tag-` followed by the hex of their UTF-8 bytes, so the slug is
    /// never empty.
    #[must_use]
    pub fn slug(&self) -> String {
        let slug = self
            .0
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { '-' })
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-");

        if slug.is_empty() {
            let hex: String = self.0.bytes().map(|b| format!("{b:02x}")).collect();
            format!("tag-{hex}")
        } else {
            slug
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(tag: &str) -> Self {
        Self::new(tag)
    }
}

/// One piece of publishable content, e.g. a blog post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Item title.
    pub title: String,

    /// Publication date.
    pub date: DateTime<Utc>,

    /// Short description shown in listings.
    #[serde(default)]
    pub description: String,

    /// Pre-rendered HTML body, inserted verbatim.
    #[serde(default)]
    pub body: String,

    /// Tags in author order.
    #[serde(default)]
    pub tags: Vec<Tag>,

    /// Owning section.
    pub section: SectionId,

    /// Canonical path, e.g. `/posts/my-article`.
    pub path: String,
}

/// A named grouping of items with its own listing page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Section {
    /// Section identifier.
    pub id: SectionId,

    /// Display title used in navigation and as the listing heading.
    pub title: String,

    /// Path of the section listing page.
    pub path: String,

    /// Items belonging to this section, in any order.
    #[serde(default)]
    pub items: Vec<Item>,
}

impl Section {
    /// Items of this section, newest first.
    #[must_use]
    pub fn items_by_date(&self) -> Vec<&Item> {
        let mut items: Vec<_> = self.items.iter().collect();
        items.sort_by(|a, b| newest_first(a, b));
        items
    }
}

/// The site's home page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Index {
    /// Hero title.
    pub title: String,

    /// Hero description; the site description is used when absent.
    #[serde(default)]
    pub description: Option<String>,
}

/// A free-standing page, e.g. `/about`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Page title.
    pub title: String,

    /// Page path.
    pub path: String,

    /// Pre-rendered HTML body; empty pages render an empty wrapper.
    #[serde(default)]
    pub body: String,
}

/// The page listing every known tag.
#[derive(Debug, Clone, Default)]
pub struct TagListPage {
    /// Tags to list, in any order.
    pub tags: BTreeSet<Tag>,
}

/// The page listing items carrying a single tag.
#[derive(Debug, Clone)]
pub struct TagDetailsPage {
    /// The tag being browsed.
    pub tag: Tag,
}

/// Read-only site context shared by every render call.
#[derive(Debug, Clone)]
pub struct SiteContext {
    /// Site name shown in the header and page titles.
    pub name: String,

    /// Site description.
    pub description: String,

    /// Document language code.
    pub language: String,

    sections: Vec<Section>,
    tags_path: String,
}

impl SiteContext {
    /// Create a context with no sections.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            language: language.into(),
            sections: Vec::new(),
            tags_path: DEFAULT_TAGS_PATH.to_string(),
        }
    }

    /// Declare a section. Declaration order is navigation order.
    ///
    /// Fails when an item names a section other than the one it is filed
    /// under, or when the id has already been declared.
    pub fn with_section(mut self, section: Section) -> Result<Self> {
        if self.sections.iter().any(|s| s.id == section.id) {
            return Err(CoreError::config(format!(
                "section declared twice: {}",
                section.id
            )));
        }
        if let Some(stray) = section.items.iter().find(|i| i.section != section.id) {
            return Err(CoreError::UnknownSection(stray.section.clone()));
        }
        self.sections.push(section);
        Ok(self)
    }

    /// Override the tag index path (default `/tags`).
    #[must_use]
    pub fn with_tags_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.tags_path = path.trim_end_matches('/').to_string();
        self
    }

    /// All declared sections in declaration order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Declared section ids in declaration order.
    pub fn section_ids(&self) -> impl Iterator<Item = &SectionId> {
        self.sections.iter().map(|s| &s.id)
    }

    /// Look up a declared section.
    pub fn section(&self, id: &SectionId) -> Result<&Section> {
        self.sections
            .iter()
            .find(|s| &s.id == id)
            .ok_or_else(|| CoreError::UnknownSection(id.clone()))
    }

    /// Every item across all sections, newest first.
    #[must_use]
    pub fn all_items_by_date(&self) -> Vec<&Item> {
        let mut items: Vec<_> = self.sections.iter().flat_map(|s| &s.items).collect();
        items.sort_by(|a, b| newest_first(a, b));
        items
    }

    /// Items with a tag that shares `tag`'s page, newest first.
    ///
    /// Tags are matched by slug, so `Rust` and `rust` list the same items.
    #[must_use]
    pub fn items_tagged(&self, tag: &Tag) -> Vec<&Item> {
        let slug = tag.slug();
        let mut items: Vec<_> = self
            .sections
            .iter()
            .flat_map(|s| &s.items)
            .filter(|i| i.tags.iter().any(|t| t.slug() == slug))
            .collect();
        items.sort_by(|a, b| newest_first(a, b));
        items
    }

    /// Every tag used by at least one item.
    #[must_use]
    pub fn all_tags(&self) -> BTreeSet<Tag> {
        self.sections
            .iter()
            .flat_map(|s| &s.items)
            .flat_map(|i| i.tags.iter().cloned())
            .collect()
    }

    /// One detail page per distinct tag path.
    ///
    /// Tags sharing a slug share a page, headed by the first of them in
    /// lexicographic order.
    #[must_use]
    pub fn tag_detail_pages(&self) -> Vec<TagDetailsPage> {
        let mut seen = HashSet::new();
        self.all_tags()
            .into_iter()
            .filter(|tag| seen.insert(tag.slug()))
            .map(|tag| TagDetailsPage { tag })
            .collect()
    }

    /// Path of the tag index page.
    #[must_use]
    pub fn tag_list_path(&self) -> &str {
        if self.tags_path.is_empty() {
            "/"
        } else {
            &self.tags_path
        }
    }

    /// Path of the detail page for `tag`.
    #[must_use]
    pub fn path_for_tag(&self, tag: &Tag) -> String {
        format!("{}/{}", self.tags_path, tag.slug())
    }
}

/// Publish date descending, title ascending on ties.
fn newest_first(a: &Item, b: &Item) -> Ordering {
    b.date.cmp(&a.date).then_with(|| a.title.cmp(&b.title))
}
