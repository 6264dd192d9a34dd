//! Immutable markup tree.
//!
//! Renderers build [`Node`] values; the host serializes them with
//! [`Display`](fmt::Display). Text and attribute values are escaped on the
//! way out, [`Node::Raw`] is written verbatim.

use std::fmt::{self, Write};

/// Elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A node in the markup tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Text content, escaped on serialization.
    Text(String),
    /// Pre-rendered markup or script, written as is.
    Raw(String),
    /// A sequence of nodes without a wrapping element.
    Fragment(Vec<Node>),
}

impl Node {
    /// Text node.
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// Verbatim markup node.
    pub fn raw(markup: impl Into<String>) -> Self {
        Self::Raw(markup.into())
    }

    /// Group of nodes.
    pub fn fragment(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self::Fragment(nodes.into_iter().collect())
    }

    /// A node that renders to nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self::Fragment(Vec::new())
    }

    /// The element, if this node is one.
    #[must_use]
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(el) => Some(el),
            _ => None,
        }
    }

    /// All elements in this subtree, depth first, in document order.
    #[must_use]
    pub fn elements(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        self.collect_elements(&mut out);
        out
    }

    /// Elements in this subtree with the given tag name.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        self.elements()
            .into_iter()
            .filter(|el| el.name == name)
            .collect()
    }

    /// Concatenated text of this subtree, unescaped. Raw nodes are skipped.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_elements<'a>(&'a self, out: &mut Vec<&'a Element>) {
        match self {
            Self::Element(el) => {
                out.push(el);
                for child in &el.children {
                    child.collect_elements(out);
                }
            }
            Self::Fragment(nodes) => {
                for node in nodes {
                    node.collect_elements(out);
                }
            }
            Self::Text(_) | Self::Raw(_) => {}
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Element(el) => {
                for child in &el.children {
                    child.collect_text(out);
                }
            }
            Self::Fragment(nodes) => {
                for node in nodes {
                    node.collect_text(out);
                }
            }
            Self::Text(text) => out.push_str(text),
            Self::Raw(_) => {}
        }
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Self::Element(el)
    }
}

impl From<&str> for Node {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<String> for Node {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(el) => fmt::Display::fmt(el, f),
            Self::Text(text) => f.write_str(&html_escape::encode_text(text)),
            Self::Raw(markup) => f.write_str(markup),
            Self::Fragment(nodes) => nodes.iter().try_for_each(|node| fmt::Display::fmt(node, f)),
        }
    }
}

/// An HTML element.
///
/// Built with chained calls:
///
/// ```
/// use ivan_theme::{Element, Node};
///
/// let link = Element::new("a").class("site-name").attr("href", "/").child("Home");
/// assert_eq!(Node::from(link).to_string(), r#"<a class="site-name" href="/">Home</a>"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an element with no attributes or children.
    #[must_use]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute, replacing any earlier value.
    ///
    /// Attributes with an empty value are dropped when serializing.
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
        self
    }

    /// Set the `class` attribute.
    #[must_use]
    pub fn class(self, class: impl Into<String>) -> Self {
        self.attr("class", class)
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn id(self, id: impl Into<String>) -> Self {
        self.attr("id", id)
    }

    /// Set the `href` attribute.
    #[must_use]
    pub fn href(self, href: impl Into<String>) -> Self {
        self.attr("href", href)
    }

    /// Append a child.
    #[must_use]
    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Append several children.
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    /// Tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name
    }

    /// Attribute value, if set.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the space-separated `class` attribute contains `class`.
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Elements with the given tag name in this subtree, this one included.
    #[must_use]
    pub fn find_all(&self, name: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        if self.name == name {
            out.push(self);
        }
        for child in &self.children {
            out.extend(child.find_all(name));
        }
        out
    }

    /// Direct children.
    #[must_use]
    pub fn child_nodes(&self) -> &[Node] {
        &self.children
    }

    /// Concatenated text of this element's subtree.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.name)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.name)?;
        for (name, value) in &self.attributes {
            if value.is_empty() {
                continue;
            }
            write!(
                f,
                r#" {name}="{}""#,
                html_escape::encode_double_quoted_attribute(value)
            )?;
        }
        f.write_char('>')?;

        if self.is_void() {
            return Ok(());
        }

        for child in &self.children {
            fmt::Display::fmt(child, f)?;
        }
        write!(f, "</{}>", self.name)
    }
}

/// A complete HTML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    lang: String,
    head: Element,
    body: Element,
}

impl Document {
    /// Assemble a document from its `<head>` and `<body>` elements.
    pub fn new(lang: impl Into<String>, head: Element, body: Element) -> Self {
        Self {
            lang: lang.into(),
            head,
            body,
        }
    }

    /// Document language.
    #[must_use]
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// The `<head>` element.
    #[must_use]
    pub fn head(&self) -> &Element {
        &self.head
    }

    /// The `<body>` element.
    #[must_use]
    pub fn body(&self) -> &Element {
        &self.body
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            r#"<!DOCTYPE html><html lang="{}">{}{}</html>"#,
            html_escape::encode_double_quoted_attribute(&self.lang),
            self.head,
            self.body
        )
    }
}
