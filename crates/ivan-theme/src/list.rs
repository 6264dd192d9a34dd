//! Item and tag listings.

use ivan_core::{Item, SiteContext};

use crate::{
    date::days_since,
    html::RenderContext,
    node::{Element, Node},
};

/// `ul.item-list` with one article per item, in the order given.
///
/// Sorting is the caller's job. Items published within the configured
/// window (14 days unless overridden) get a "NEW" badge next to their date.
pub fn item_list(items: &[&Item], ctx: &RenderContext<'_>) -> Node {
    let window = ctx.config.theme.new_badge_days;

    let entries = items.iter().map(|item| {
        let is_new = days_since(&item.date, &ctx.now) <= window;

        let mut meta = Element::new("p")
            .class("meta")
            .child(ctx.dates.format(&item.date));
        if is_new {
            meta = meta.child(Element::new("span").class("badge new").child("NEW"));
        }

        Node::from(
            Element::new("li").child(
                Element::new("article")
                    .child(
                        Element::new("h1").child(
                            Element::new("a")
                                .href(item.path.as_str())
                                .child(item.title.as_str()),
                        ),
                    )
                    .child(meta)
                    .child(tag_list(item, ctx.site))
                    .child(Element::new("p").child(item.description.as_str())),
            ),
        )
    });

    Element::new("ul").class("item-list").children(entries).into()
}

/// `ul.tag-list` linking each of the item's tags, in stored order.
pub fn tag_list(item: &Item, site: &SiteContext) -> Node {
    let entries = item.tags.iter().map(|tag| {
        Node::from(
            Element::new("li").child(
                Element::new("a")
                    .href(site.path_for_tag(tag))
                    .child(tag.as_str()),
            ),
        )
    });

    Element::new("ul").class("tag-list").children(entries).into()
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use ivan_core::{Config, SectionId, Tag};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::date::DateFormatter;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 9, 30, 0).unwrap()
    }

    fn item(title: &str, age_days: i64, tags: &[&str]) -> Item {
        Item {
            title: title.to_string(),
            date: now() - Duration::days(age_days),
            description: format!("About {title}"),
            body: String::new(),
            tags: tags.iter().map(|t| Tag::new(*t)).collect(),
            section: SectionId::new("posts"),
            path: format!("/posts/{}", title.to_lowercase()),
        }
    }

    fn ctx<'a>(site: &'a SiteContext, config: &'a Config) -> RenderContext<'a> {
        RenderContext {
            site,
            config,
            stylesheets: &[],
            dates: DateFormatter::new(),
            now: now(),
        }
    }

    fn is_new(article: &Element) -> bool {
        article.find_all("span").iter().any(|s| s.has_class("new"))
    }

    #[test]
    fn test_item_list_preserves_order() {
        let site = SiteContext::new("Blog", "", "en");
        let config = Config::new("Blog");
        let (a, b, c) = (item("Alpha", 300, &[]), item("Beta", 1, &[]), item("Gamma", 40, &[]));

        for order in [vec![&a, &b, &c], vec![&c, &a, &b], vec![&b, &c, &a]] {
            let list = item_list(&order, &ctx(&site, &config));
            let titles: Vec<_> = list.find_all("h1").iter().map(|h| h.text_content()).collect();
            let expected: Vec<_> = order.iter().map(|i| i.title.clone()).collect();
            assert_eq!(titles, expected);
        }
    }

    #[test]
    fn test_new_badge_window() {
        let site = SiteContext::new("Blog", "", "en");
        let config = Config::new("Blog");
        let items = [
            item("Ten", 10, &[]),
            item("Twenty", 20, &[]),
            item("Fourteen", 14, &[]),
            item("Fifteen", 15, &[]),
            item("Tomorrow", -1, &[]),
        ];
        let refs: Vec<_> = items.iter().collect();

        let list = item_list(&refs, &ctx(&site, &config));
        let badges: Vec<_> = list.find_all("article").into_iter().map(is_new).collect();
        assert_eq!(badges, vec![true, false, true, false, true]);
    }

    #[test]
    fn test_new_badge_window_is_configurable() {
        let site = SiteContext::new("Blog", "", "en");
        let mut config = Config::new("Blog");
        config.theme.new_badge_days = 3;
        let items = [item("Two", 2, &[]), item("Ten", 10, &[])];
        let refs: Vec<_> = items.iter().collect();

        let list = item_list(&refs, &ctx(&site, &config));
        let badges: Vec<_> = list.find_all("article").into_iter().map(is_new).collect();
        assert_eq!(badges, vec![true, false]);
    }

    #[test]
    fn test_item_markup() {
        let site = SiteContext::new("Blog", "", "en");
        let config = Config::new("Blog");
        let post = item("Hello", 30, &["rust"]);

        let html = item_list(&[&post], &ctx(&site, &config)).to_string();
        assert_eq!(
            html,
            concat!(
                r#"<ul class="item-list"><li><article>"#,
                r#"<h1><a href="/posts/hello">Hello</a></h1>"#,
                r#"<p class="meta">Feb 14, 2024</p>"#,
                r#"<ul class="tag-list"><li><a href="/tags/rust">rust</a></li></ul>"#,
                r#"<p>About Hello</p>"#,
                r#"</article></li></ul>"#,
            )
        );
    }

    #[test]
    fn test_empty_item_list() {
        let site = SiteContext::new("Blog", "", "en");
        let config = Config::new("Blog");
        let list = item_list(&[], &ctx(&site, &config));
        assert_eq!(list.to_string(), r#"<ul class="item-list"></ul>"#);
    }

    #[test]
    fn test_tag_list_keeps_stored_order() {
        let site = SiteContext::new("Blog", "", "en");
        let post = item("Hello", 1, &["web", "Rust Lang", "async"]);

        let list = tag_list(&post, &site);
        let links = list.find_all("a");
        let pairs: Vec<_> = links
            .iter()
            .map(|a| (a.text_content(), a.attribute("href").unwrap_or_default().to_string()))
            .collect();

        assert_eq!(
            pairs,
            vec![
                ("web".to_string(), "/tags/web".to_string()),
                ("Rust Lang".to_string(), "/tags/rust-lang".to_string()),
                ("async".to_string(), "/tags/async".to_string()),
            ]
        );
        for (a, tag) in links.iter().zip(&post.tags) {
            assert_eq!(a.attribute("href"), Some(site.path_for_tag(tag).as_str()));
        }
    }

    #[test]
    fn test_empty_tag_list() {
        let site = SiteContext::new("Blog", "", "en");
        let post = item("Hello", 1, &[]);
        assert_eq!(tag_list(&post, &site).to_string(), r#"<ul class="tag-list"></ul>"#);
    }
}
