//! HTML generation from parsed content.
//!
//! One renderer per page kind. Every renderer is a pure function of the
//! content it is given and the [`RenderContext`]; the wall clock is never
//! read here.

use chrono::{DateTime, Utc};
use ivan_core::{
    Config, CoreError, Index, Item, Page, Section, TagDetailsPage, TagListPage,
    config::ItemConfig,
};
use thiserror::Error;
use tracing::debug;

use crate::{
    date::DateFormatter,
    layout::{footer, head, header, wrapper},
    list::{item_list, tag_list},
    node::{Document, Element, Node},
    template::TemplateError,
    widget::CommentsWidget,
};

/// HTML generation errors.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Content contradicts the site declaration.
    #[error("content error: {0}")]
    Core(#[from] CoreError),

    /// Embedded script template error.
    #[error("template error: {0}")]
    Template(#[from] TemplateError),

    /// Item pages ask for the comments widget but none was built.
    #[error("interactive widget enabled without a comments widget")]
    MissingWidget,

    /// Two pages of one site resolve to the same location.
    #[error("more than one page renders to {0}")]
    DuplicatePath(String),
}

/// Result type for HTML generation.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Everything a renderer reads besides the page itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    /// Site metadata and content.
    pub site: &'a ivan_core::SiteContext,

    /// Theme configuration.
    pub config: &'a Config,

    /// Stylesheet hrefs linked from every page head.
    pub stylesheets: &'a [String],

    /// Date formatter shared by all pages.
    pub dates: DateFormatter,

    /// Reference time for "NEW" badges.
    pub now: DateTime<Utc>,
}

/// Optional parts of the item detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemFeatures {
    /// Show the item title as the article heading.
    pub title: bool,

    /// Embed the comments and reactions widget.
    pub interactive_widget: bool,
}

impl Default for ItemFeatures {
    fn default() -> Self {
        Self {
            title: true,
            interactive_widget: false,
        }
    }
}

impl From<&ItemConfig> for ItemFeatures {
    fn from(config: &ItemConfig) -> Self {
        Self {
            title: config.show_title,
            interactive_widget: config.interactive_widget,
        }
    }
}

/// Renders each page kind into a [`Document`].
#[derive(Debug, Clone, Default)]
pub struct HtmlFactory {
    item_features: ItemFeatures,
    widget: Option<CommentsWidget>,
}

impl HtmlFactory {
    /// Create a factory from the theme configuration.
    ///
    /// The comments widget is built up front when enabled, so a broken
    /// script template fails here rather than halfway through a site.
    pub fn new(config: &Config) -> Result<Self> {
        let item_features = ItemFeatures::from(&config.item);

        let widget = match (&config.comments, item_features.interactive_widget) {
            (Some(comments), true) => Some(CommentsWidget::new(comments)?),
            (None, true) => {
                return Err(CoreError::config(
                    "item.interactive_widget requires a [comments] table",
                )
                .into());
            }
            (_, false) => None,
        };

        Ok(Self {
            item_features,
            widget,
        })
    }

    /// Replace the item page features.
    ///
    /// Turning the widget on requires one, either from the configuration
    /// or from [`with_widget`](Self::with_widget).
    pub fn with_item_features(mut self, features: ItemFeatures) -> Result<Self> {
        if features.interactive_widget && self.widget.is_none() {
            return Err(RenderError::MissingWidget);
        }
        self.item_features = features;
        Ok(self)
    }

    /// Replace the comments widget, e.g. one built from a custom script.
    #[must_use]
    pub fn with_widget(mut self, widget: CommentsWidget) -> Self {
        self.widget = Some(widget);
        self
    }

    /// Item page features in effect.
    #[must_use]
    pub fn item_features(&self) -> ItemFeatures {
        self.item_features
    }

    /// Home page: hero block followed by every item, newest first.
    pub fn index_html(&self, index: &Index, ctx: &RenderContext<'_>) -> Result<Document> {
        debug!(title = %index.title, "rendering index");

        let description = index
            .description
            .as_deref()
            .unwrap_or(ctx.site.description.as_str());

        let hero = Element::new("div").class("hero").child(
            Element::new("div")
                .class("hero-content")
                .child(Element::new("h1").child(index.title.as_str()))
                .child(Element::new("p").class("description").child(description))
                .child(
                    Element::new("a")
                        .class("cta")
                        .href("/")
                        .child(ctx.config.theme.hero_cta_label.as_str()),
                ),
        );

        let items = ctx.site.all_items_by_date();
        let latest = wrapper([
            Element::new("h2").child("Latest content").into(),
            item_list(&items, ctx),
        ]);

        Ok(self.document(
            ctx,
            head(ctx, &index.title, description),
            body(ctx, None, [Node::from(hero), Node::from(latest)]),
        ))
    }

    /// Section listing: the section's items, newest first.
    pub fn section_html(&self, section: &Section, ctx: &RenderContext<'_>) -> Result<Document> {
        debug!(section = %section.id, path = %section.path, "rendering section");
        ctx.site.section(&section.id)?;

        let items = section.items_by_date();
        let content = wrapper([
            Element::new("h1").child(section.title.as_str()).into(),
            item_list(&items, ctx),
        ]);

        Ok(self.document(
            ctx,
            head(ctx, &section.title, ""),
            body(ctx, Some(section), [Node::from(content)]),
        ))
    }

    /// Item detail page.
    pub fn item_html(&self, item: &Item, ctx: &RenderContext<'_>) -> Result<Document> {
        debug!(path = %item.path, section = %item.section, "rendering item");
        let section = ctx.site.section(&item.section)?;

        let widget = if self.item_features.interactive_widget {
            Some(self.widget.as_ref().ok_or(RenderError::MissingWidget)?)
        } else {
            None
        };

        let mut article = Element::new("article");
        if self.item_features.title {
            article = article.child(Element::new("h1").child(item.title.as_str()));
        }
        article = article
            .child(
                Element::new("p")
                    .class("meta")
                    .child(ctx.dates.format(&item.date)),
            )
            .child(
                Element::new("div")
                    .class("content")
                    .child(Node::raw(item.body.as_str())),
            );
        if let Some(widget) = widget {
            article = article.child(widget.controls());
        }
        article = article.child(
            Element::new("div")
                .class("post-tags")
                .child(Element::new("span").child("Tagged with: "))
                .child(tag_list(item, ctx.site)),
        );
        if let Some(widget) = widget {
            article = article.child(widget.script());
        }

        let content = wrapper([Node::from(article)]);
        Ok(self.document(
            ctx,
            head(ctx, &item.title, &item.description),
            body(ctx, Some(section), [Node::from(content)]).class("item-page"),
        ))
    }

    /// Free-standing page: skeleton around the page's own body.
    pub fn page_html(&self, page: &Page, ctx: &RenderContext<'_>) -> Result<Document> {
        debug!(path = %page.path, "rendering page");

        let content = if page.body.is_empty() {
            Node::empty()
        } else {
            Node::raw(page.body.as_str())
        };

        Ok(self.document(
            ctx,
            head(ctx, &page.title, ""),
            body(ctx, None, [Node::from(wrapper([content]))]),
        ))
    }

    /// Index of all tags, sorted. `None` when tag pages are disabled.
    pub fn tag_list_html(
        &self,
        page: &TagListPage,
        ctx: &RenderContext<'_>,
    ) -> Result<Option<Document>> {
        if !ctx.config.theme.tag_pages {
            return Ok(None);
        }
        debug!(tags = page.tags.len(), "rendering tag list");

        let entries = page.tags.iter().map(|tag| {
            Node::from(
                Element::new("li").class("tag").child(
                    Element::new("a")
                        .href(ctx.site.path_for_tag(tag))
                        .child(tag.as_str()),
                ),
            )
        });

        let content = wrapper([
            Node::from(Element::new("h1").child("Browse all tags")),
            Node::from(Element::new("ul").class("all-tags").children(entries)),
        ]);

        Ok(Some(self.document(
            ctx,
            head(ctx, "Tags", ""),
            body(ctx, None, [Node::from(content)]),
        )))
    }

    /// Items carrying one tag, newest first. `None` when tag pages are
    /// disabled.
    pub fn tag_details_html(
        &self,
        page: &TagDetailsPage,
        ctx: &RenderContext<'_>,
    ) -> Result<Option<Document>> {
        if !ctx.config.theme.tag_pages {
            return Ok(None);
        }
        debug!(tag = %page.tag, "rendering tag details");

        let items = ctx.site.items_tagged(&page.tag);
        let content = wrapper([
            Element::new("h1")
                .child("Tagged with ")
                .child(Element::new("span").class("tag").child(page.tag.as_str()))
                .into(),
            Element::new("a")
                .class("browse-all")
                .href(ctx.site.tag_list_path())
                .child("Browse all tags")
                .into(),
            item_list(&items, ctx),
        ]);

        Ok(Some(self.document(
            ctx,
            head(ctx, page.tag.as_str(), ""),
            body(ctx, None, [Node::from(content)]),
        )))
    }

    fn document(&self, ctx: &RenderContext<'_>, head: Element, body: Element) -> Document {
        Document::new(ctx.site.language.as_str(), head, body)
    }
}

/// `<body>`: header, `content`, footer.
fn body(
    ctx: &RenderContext<'_>,
    selected: Option<&Section>,
    content: impl IntoIterator<Item = Node>,
) -> Element {
    Element::new("body")
        .child(header(ctx.site, selected.map(|s| &s.id)))
        .children(content)
        .child(footer(ctx))
}
