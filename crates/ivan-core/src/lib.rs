//! Ivan Core Library
//!
//! Content model, theme configuration and error handling for the Ivan theme.
//!
//! The types here are read-only views over content that the host static-site
//! framework has already parsed. Nothing in this crate touches the file system
//! except [`Config::load`].

pub mod config;
pub mod content;
pub mod error;

pub use config::Config;
pub use content::{Index, Item, Page, Section, SectionId, SiteContext, Tag, TagDetailsPage, TagListPage};
pub use error::{CoreError, Result};
