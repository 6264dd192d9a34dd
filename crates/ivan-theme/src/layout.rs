//! Page skeleton shared by every page kind.

use ivan_core::{SectionId, SiteContext};

use crate::{
    html::RenderContext,
    node::{Element, Node},
};

/// `<div class="wrapper">` around `children`.
pub fn wrapper(children: impl IntoIterator<Item = Node>) -> Element {
    Element::new("div").class("wrapper").children(children)
}

/// Document head for a page titled `title`.
///
/// The `<title>` is `"{title} | {site name}"`, or just the site name when
/// `title` is empty or already is the site name. An empty `description`
/// falls back to the site description.
pub fn head(ctx: &RenderContext<'_>, title: &str, description: &str) -> Element {
    let site = ctx.site;
    let full_title = if title.is_empty() || title == site.name {
        site.name.clone()
    } else {
        format!("{title} | {}", site.name)
    };
    let description = if description.is_empty() {
        site.description.as_str()
    } else {
        description
    };

    let mut head = Element::new("head")
        .child(Element::new("meta").attr("charset", "UTF-8"))
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1.0"),
        )
        .child(Element::new("title").child(full_title))
        .child(
            Element::new("meta")
                .attr("name", "description")
                .attr("content", description),
        );

    for href in ctx.stylesheets {
        head = head.child(
            Element::new("link")
                .attr("rel", "stylesheet")
                .href(href.as_str()),
        );
    }

    let footer = &ctx.config.footer;
    if footer.show_feed_link {
        head = head.child(
            Element::new("link")
                .attr("rel", "alternate")
                .attr("type", "application/rss+xml")
                .attr("title", format!("Subscribe to {}", site.name))
                .href(footer.feed_path.as_str()),
        );
    }

    head
}

/// Site header with the section navigation.
///
/// The `<nav>` is left out entirely unless the site declares more than one
/// section. The entry for `selected` gets class `selected`; an id the site
/// never declared selects nothing.
pub fn header(site: &SiteContext, selected: Option<&SectionId>) -> Node {
    let site_name = Element::new("a")
        .class("site-name")
        .href("/")
        .child(site.name.as_str());

    let nav = if site.sections().len() > 1 {
        let entries = site.sections().iter().map(|section| {
            let class = if selected == Some(&section.id) {
                "selected"
            } else {
                ""
            };
            Node::from(
                Element::new("li").child(
                    Element::new("a")
                        .class(class)
                        .href(section.path.as_str())
                        .child(section.title.as_str()),
                ),
            )
        });
        Element::new("nav")
            .child(Element::new("ul").children(entries))
            .into()
    } else {
        Node::empty()
    };

    Element::new("header")
        .child(wrapper([site_name.into(), nav]))
        .into()
}

/// Site footer: generator credit, feed link and social links.
pub fn footer(ctx: &RenderContext<'_>) -> Node {
    let config = &ctx.config.footer;

    let credit = Element::new("p")
        .child("Generated using ")
        .child(
            Element::new("a")
                .href(config.generator_url.as_str())
                .child(config.generator_name.as_str()),
        );

    let mut links: Vec<Node> = Vec::new();
    if config.show_feed_link {
        links.push(
            Element::new("a")
                .href(config.feed_path.as_str())
                .child("RSS feed")
                .into(),
        );
    }
    for social in &config.social {
        links.push(
            Element::new("a")
                .href(social.url.as_str())
                .attr("target", "_blank")
                .child(social.label.as_str())
                .into(),
        );
    }

    let mut line = Element::new("p");
    for (i, link) in links.into_iter().enumerate() {
        if i > 0 {
            line = line.child(" | ");
        }
        line = line.child(link);
    }

    Element::new("footer").child(credit).child(line).into()
}
