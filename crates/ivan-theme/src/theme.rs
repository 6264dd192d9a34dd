//! Page-kind dispatch and whole-site rendering.

use std::{collections::HashSet, time::Instant};

use chrono::{DateTime, Utc};
use ivan_core::{
    Config, Index, Item, Page, Section, SiteContext, TagDetailsPage, TagListPage,
};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    date::DateFormatter,
    html::{HtmlFactory, RenderContext, RenderError, Result},
    node::Document,
};

/// Resource path of the Ivan stylesheet, relative to the site root.
pub const IVAN_STYLESHEET_PATH: &str = "Resources/IvanTheme/styles.css";

const IVAN_STYLESHEET: &str = include_str!("../resources/styles.css");

/// A page to render, tagged with its kind.
#[derive(Debug, Clone, Copy)]
pub enum PageKind<'a> {
    Index(&'a Index),
    Section(&'a Section),
    Item(&'a Item),
    Page(&'a Page),
    TagList(&'a TagListPage),
    TagDetails(&'a TagDetailsPage),
}

impl PageKind<'_> {
    /// Short name of the kind, for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Index(_) => "index",
            Self::Section(_) => "section",
            Self::Item(_) => "item",
            Self::Page(_) => "page",
            Self::TagList(_) => "tag-list",
            Self::TagDetails(_) => "tag-details",
        }
    }

    /// Output location of the page within `site`.
    #[must_use]
    pub fn path(&self, site: &SiteContext) -> String {
        match self {
            Self::Index(_) => "/".to_string(),
            Self::Section(section) => section.path.clone(),
            Self::Item(item) => item.path.clone(),
            Self::Page(page) => page.path.clone(),
            Self::TagList(_) => site.tag_list_path().to_string(),
            Self::TagDetails(page) => site.path_for_tag(&page.tag),
        }
    }
}

/// A rendered page paired with its location.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Site-relative location, e.g. `/posts/hello`.
    pub path: String,

    /// The page document.
    pub document: Document,
}

impl RenderedPage {
    /// Serialized HTML.
    #[must_use]
    pub fn html(&self) -> String {
        self.document.to_string()
    }
}

/// A renderer bundled with the resources it links to.
#[derive(Debug, Clone)]
pub struct Theme {
    name: &'static str,
    config: Config,
    factory: HtmlFactory,
    resource_paths: Vec<String>,
    stylesheets: Vec<String>,
    dates: DateFormatter,
}

impl Theme {
    /// The Ivan theme for `config`.
    ///
    /// Fails when the configuration does not validate or the comments
    /// script cannot be rendered.
    pub fn ivan(config: Config) -> Result<Self> {
        config.validate()?;
        let factory = HtmlFactory::new(&config)?;
        let resource_paths = vec![IVAN_STYLESHEET_PATH.to_string()];
        let stylesheets = resource_paths.iter().map(|p| stylesheet_href(p)).collect();

        debug!(site = %config.site.name, "Ivan theme ready");

        Ok(Self {
            name: "Ivan",
            config,
            factory,
            resource_paths,
            stylesheets,
            dates: DateFormatter::new(),
        })
    }

    /// Theme name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Configuration the theme was built with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The page renderer.
    #[must_use]
    pub fn factory(&self) -> &HtmlFactory {
        &self.factory
    }

    /// Resource files the host must copy next to the output.
    #[must_use]
    pub fn resource_paths(&self) -> &[String] {
        &self.resource_paths
    }

    /// Contents of the stylesheet at [`IVAN_STYLESHEET_PATH`].
    #[must_use]
    pub fn stylesheet(&self) -> &'static str {
        IVAN_STYLESHEET
    }

    /// Render context for `site` at `now`.
    #[must_use]
    pub fn context<'a>(&'a self, site: &'a SiteContext, now: DateTime<Utc>) -> RenderContext<'a> {
        RenderContext {
            site,
            config: &self.config,
            stylesheets: &self.stylesheets,
            dates: self.dates,
            now,
        }
    }

    /// Render one page. `None` means the page kind is switched off.
    pub fn render(
        &self,
        kind: PageKind<'_>,
        site: &SiteContext,
        now: DateTime<Utc>,
    ) -> Result<Option<Document>> {
        let ctx = self.context(site, now);
        let factory = &self.factory;

        match kind {
            PageKind::Index(index) => factory.index_html(index, &ctx).map(Some),
            PageKind::Section(section) => factory.section_html(section, &ctx).map(Some),
            PageKind::Item(item) => factory.item_html(item, &ctx).map(Some),
            PageKind::Page(page) => factory.page_html(page, &ctx).map(Some),
            PageKind::TagList(page) => factory.tag_list_html(page, &ctx),
            PageKind::TagDetails(page) => factory.tag_details_html(page, &ctx),
        }
    }

    /// Render every page of `site` in parallel.
    ///
    /// Pages come back in a fixed order: index, free-standing pages,
    /// sections with their items, tag list, tag details. Tags that share
    /// a path share one details page. The first failing page aborts the
    /// whole render, and so do two pages with the same path.
    pub fn render_site(
        &self,
        site: &SiteContext,
        index: &Index,
        pages: &[Page],
        now: DateTime<Utc>,
    ) -> Result<Vec<RenderedPage>> {
        let start = Instant::now();

        let tag_list = TagListPage {
            tags: site.all_tags(),
        };
        let tag_details = site.tag_detail_pages();

        let mut jobs = vec![PageKind::Index(index)];
        jobs.extend(pages.iter().map(PageKind::Page));
        for section in site.sections() {
            jobs.push(PageKind::Section(section));
            jobs.extend(section.items.iter().map(PageKind::Item));
        }
        jobs.push(PageKind::TagList(&tag_list));
        jobs.extend(tag_details.iter().map(PageKind::TagDetails));

        info!(count = jobs.len(), "rendering site");

        let rendered: Vec<Option<RenderedPage>> = jobs
            .par_iter()
            .map(|kind| {
                let path = kind.path(site);
                let document = self.render(*kind, site, now)?;
                if document.is_none() {
                    debug!(kind = kind.name(), %path, "page disabled");
                }
                Ok(document.map(|document| RenderedPage { path, document }))
            })
            .collect::<Result<_>>()?;

        let rendered: Vec<_> = rendered.into_iter().flatten().collect();

        let mut paths = HashSet::new();
        if let Some(clash) = rendered.iter().find(|page| !paths.insert(page.path.as_str())) {
            return Err(RenderError::DuplicatePath(clash.path.clone()));
        }

        info!(
            pages = rendered.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "site rendered"
        );

        Ok(rendered)
    }
}

/// Root-relative href of a resource: its file name under `/`.
fn stylesheet_href(resource_path: &str) -> String {
    let file = resource_path.rsplit('/').next().unwrap_or(resource_path);
    format!("/{file}")
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use ivan_core::{CoreError, SectionId, Tag};
    use pretty_assertions::assert_eq;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap()
    }

    fn item(title: &str, section: &str, age_days: i64, tags: &[&str]) -> Item {
        Item {
            title: title.to_string(),
            date: now() - Duration::days(age_days),
            description: String::new(),
            body: String::new(),
            tags: tags.iter().map(|t| Tag::new(*t)).collect(),
            section: SectionId::new(section),
            path: format!("/{section}/{}", title.to_lowercase()),
        }
    }

    fn site(config: &Config) -> SiteContext {
        config
            .site_context()
            .with_section(Section {
                id: SectionId::new("posts"),
                title: "Posts".to_string(),
                path: "/posts".to_string(),
                items: vec![
                    item("First", "posts", 40, &["swift", "server"]),
                    item("Second", "posts", 3, &["swift"]),
                ],
            })
            .unwrap()
    }

    fn index() -> Index {
        Index {
            title: "Home".to_string(),
            description: None,
        }
    }

    #[test]
    fn test_ivan_resources() {
        let theme = Theme::ivan(Config::new("Blog")).unwrap();
        assert_eq!(theme.name(), "Ivan");
        assert_eq!(theme.resource_paths(), ["Resources/IvanTheme/styles.css"]);
        assert!(theme.stylesheet().contains(".item-list"));
    }

    #[test]
    fn test_ivan_rejects_invalid_config() {
        let mut config = Config::new("Blog");
        config.item.interactive_widget = true;
        let err = Theme::ivan(config).unwrap_err();
        assert!(matches!(err, RenderError::Core(CoreError::Config { .. })));
    }

    #[test]
    fn test_stylesheet_href() {
        assert_eq!(stylesheet_href("Resources/IvanTheme/styles.css"), "/styles.css");
        assert_eq!(stylesheet_href("styles.css"), "/styles.css");
    }

    #[test]
    fn test_render_links_stylesheet() {
        let theme = Theme::ivan(Config::new("Blog")).unwrap();
        let site = site(theme.config());
        let doc = theme
            .render(PageKind::Index(&index()), &site, now())
            .unwrap()
            .expect("index always renders");

        let href = doc
            .head()
            .find_all("link")
            .into_iter()
            .find(|l| l.attribute("rel") == Some("stylesheet"))
            .and_then(|l| l.attribute("href"));
        assert_eq!(href, Some("/styles.css"));
    }

    #[test]
    fn test_render_dispatch_matches_factory() {
        let theme = Theme::ivan(Config::new("Blog")).unwrap();
        let site = site(theme.config());
        let item = &site.sections()[0].items[0];

        let via_theme = theme.render(PageKind::Item(item), &site, now()).unwrap();
        let direct = theme
            .factory()
            .item_html(item, &theme.context(&site, now()))
            .unwrap();
        assert_eq!(via_theme, Some(direct));
    }

    #[test]
    fn test_page_paths() {
        let config = Config::new("Blog");
        let site = site(&config);
        let tag = TagDetailsPage {
            tag: Tag::new("Server Side"),
        };
        let page = Page {
            title: "About".to_string(),
            path: "/about".to_string(),
            body: String::new(),
        };

        assert_eq!(PageKind::Index(&index()).path(&site), "/");
        assert_eq!(PageKind::Page(&page).path(&site), "/about");
        assert_eq!(PageKind::Section(&site.sections()[0]).path(&site), "/posts");
        assert_eq!(PageKind::TagList(&TagListPage::default()).path(&site), "/tags");
        assert_eq!(PageKind::TagDetails(&tag).path(&site), "/tags/server-side");
    }

    #[test]
    fn test_render_site() {
        let theme = Theme::ivan(Config::new("Blog")).unwrap();
        let site = site(theme.config());
        let about = Page {
            title: "About".to_string(),
            path: "/about".to_string(),
            body: "<p>Me</p>".to_string(),
        };

        let pages = theme.render_site(&site, &index(), &[about], now()).unwrap();
        let paths: Vec<_> = pages.iter().map(|p| p.path.as_str()).collect();
        assert_eq!(
            paths,
            vec![
                "/",
                "/about",
                "/posts",
                "/posts/first",
                "/posts/second",
                "/tags",
                "/tags/server",
                "/tags/swift",
            ]
        );
        assert!(pages.iter().all(|p| p.html().starts_with("<!DOCTYPE html>")));
    }

    #[test]
    fn test_render_site_paths_are_unique() {
        let theme = Theme::ivan(Config::new("Blog")).unwrap();
        let site = theme
            .config()
            .site_context()
            .with_section(Section {
                id: SectionId::new("posts"),
                title: "Posts".to_string(),
                path: "/posts".to_string(),
                items: vec![
                    item("Plus", "posts", 1, &["C++", "Rust"]),
                    item("Sharp", "posts", 2, &["C#", "rust"]),
                    item("Bang", "posts", 3, &["!!!"]),
                ],
            })
            .unwrap();

        let pages = theme.render_site(&site, &index(), &[], now()).unwrap();
        let paths: Vec<_> = pages.iter().map(|p| p.path.as_str()).collect();
        let unique: HashSet<_> = paths.iter().collect();
        assert_eq!(unique.len(), paths.len());
        assert_eq!(
            &paths[paths.len() - 4..],
            ["/tags", "/tags/tag-212121", "/tags/c", "/tags/rust"]
        );

        // Every chip leads to a page listing its own item.
        let listed = |path: &str| -> Vec<String> {
            let page = pages.iter().find(|p| p.path == path).unwrap();
            page.document
                .body()
                .find_all("article")
                .into_iter()
                .map(|a| a.find_all("h1")[0].text_content())
                .collect()
        };
        assert_eq!(listed("/tags/c"), vec!["Plus", "Sharp"]);
        assert_eq!(listed("/tags/rust"), vec!["Plus", "Sharp"]);
        assert_eq!(listed("/tags/tag-212121"), vec!["Bang"]);
    }

    #[test]
    fn test_render_site_rejects_clashing_pages() {
        let theme = Theme::ivan(Config::new("Blog")).unwrap();
        let site = site(theme.config());
        let shadow = Page {
            title: "Shadow".to_string(),
            path: "/posts".to_string(),
            body: String::new(),
        };

        let err = theme.render_site(&site, &index(), &[shadow], now()).unwrap_err();
        assert!(matches!(err, RenderError::DuplicatePath(path) if path == "/posts"));
    }

    #[test]
    fn test_render_site_without_tag_pages() {
        let mut config = Config::new("Blog");
        config.theme.tag_pages = false;
        let theme = Theme::ivan(config).unwrap();
        let site = site(theme.config());

        let pages = theme.render_site(&site, &index(), &[], now()).unwrap();
        assert!(pages.iter().all(|p| !p.path.starts_with("/tags")));
        assert_eq!(pages.len(), 4);
    }

    #[test]
    fn test_render_site_is_stable() {
        let theme = Theme::ivan(Config::new("Blog")).unwrap();
        let site = site(theme.config());

        let first: Vec<_> = theme
            .render_site(&site, &index(), &[], now())
            .unwrap()
            .iter()
            .map(RenderedPage::html)
            .collect();
        let second: Vec<_> = theme
            .render_site(&site, &index(), &[], now())
            .unwrap()
            .iter()
            .map(RenderedPage::html)
            .collect();
        assert_eq!(first, second);
    }
}
