//! Ivan Theme Library
//!
//! Renders parsed site content into HTML document trees.
//!
//! # Modules
//!
//! - [`node`] - Immutable markup tree and its serializer
//! - [`date`] - Locale-fixed date formatting
//! - [`template`] - `{{ variable }}` interpolation for embedded script text
//! - [`widget`] - Comments and reactions widget
//! - [`layout`] - Page skeleton: head, header, footer
//! - [`list`] - Item and tag listings
//! - [`html`] - One renderer per page kind
//! - [`theme`] - Page-kind dispatch, stylesheet and whole-site rendering

pub mod date;
pub mod html;
pub mod layout;
pub mod list;
pub mod node;
pub mod template;
pub mod theme;
pub mod widget;

pub use date::DateFormatter;
pub use html::{HtmlFactory, ItemFeatures, RenderContext, RenderError};
pub use node::{Document, Element, Node};
pub use template::{Template, TemplateContext, TemplateError};
pub use theme::{PageKind, RenderedPage, Theme};
pub use widget::CommentsWidget;
