//! Theme configuration management.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{
    content::{DEFAULT_TAGS_PATH, SiteContext},
    error::{CoreError, Result},
};

/// Main configuration structure for the Ivan theme.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Site-wide settings.
    pub site: SiteConfig,

    /// Listing and navigation settings.
    #[serde(default)]
    pub theme: ThemeConfig,

    /// Item detail page settings.
    #[serde(default)]
    pub item: ItemConfig,

    /// Footer links.
    #[serde(default)]
    pub footer: FooterConfig,

    /// Comments and reactions backend, if any.
    #[serde(default)]
    pub comments: Option<CommentsConfig>,
}

/// Site-wide configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    /// Site name.
    pub name: String,

    /// Site description for the hero block and meta tags.
    #[serde(default)]
    pub description: String,

    /// Document language code.
    #[serde(default = "default_language")]
    pub language: String,
}

/// Listing and navigation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThemeConfig {
    /// Items at most this many days old get a "NEW" badge.
    #[serde(default = "default_new_badge_days")]
    pub new_badge_days: i64,

    /// Label of the call-to-action link in the home page hero.
    #[serde(default = "default_hero_cta_label")]
    pub hero_cta_label: String,

    /// Whether tag list and tag detail pages are generated.
    #[serde(default = "default_true")]
    pub tag_pages: bool,

    /// Path of the tag index; tag detail pages live below it.
    #[serde(default = "default_tags_path")]
    pub tags_path: String,
}

/// Item detail page configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemConfig {
    /// Show the item title above the article.
    #[serde(default = "default_true")]
    pub show_title: bool,

    /// Embed the comments and reactions widget. Requires `[comments]`.
    #[serde(default)]
    pub interactive_widget: bool,
}

/// Footer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FooterConfig {
    /// Name of the generator credited in the footer.
    #[serde(default = "default_generator_name")]
    pub generator_name: String,

    /// Link for the generator credit.
    #[serde(default = "default_generator_url")]
    pub generator_url: String,

    /// Path of the site's feed. The host must actually publish it.
    #[serde(default = "default_feed_path")]
    pub feed_path: String,

    /// Whether to link the feed from the footer and the document head.
    #[serde(default = "default_true")]
    pub show_feed_link: bool,

    /// External profile links, opened in a new tab.
    #[serde(default = "default_social_links")]
    pub social: Vec<SocialLink>,
}

/// A single external profile link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SocialLink {
    /// Link text.
    pub label: String,

    /// Target URL.
    pub url: String,
}

/// Client-side comments and reactions backend configuration.
///
/// These are public client identifiers baked into the page, not secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsConfig {
    /// Version of the backend's JavaScript SDK loaded from its CDN.
    #[serde(default = "default_sdk_version")]
    pub sdk_version: String,

    pub api_key: String,
    pub auth_domain: String,
    pub project_id: String,
    pub storage_bucket: String,
    pub messaging_sender_id: String,
    pub app_id: String,

    /// Emoji offered as reaction buttons, in display order.
    #[serde(default = "default_reactions")]
    pub reactions: Vec<String>,
}

// Default value functions
fn default_language() -> String {
    "en".to_string()
}

fn default_new_badge_days() -> i64 {
    14
}

fn default_hero_cta_label() -> String {
    "Browse posts ↓".to_string()
}

fn default_tags_path() -> String {
    DEFAULT_TAGS_PATH.to_string()
}

fn default_true() -> bool {
    true
}

fn default_generator_name() -> String {
    "Publish".to_string()
}

fn default_generator_url() -> String {
    "https://github.com/johnsundell/publish".to_string()
}

fn default_feed_path() -> String {
    "/feed.rss".to_string()
}

fn default_social_links() -> Vec<SocialLink> {
    vec![
        SocialLink {
            label: "Twitter".to_string(),
            url: "https://twitter.com/imyrvold".to_string(),
        },
        SocialLink {
            label: "GitHub".to_string(),
            url: "https://github.com/imyrvold".to_string(),
        },
    ]
}

fn default_sdk_version() -> String {
    "11.0.1".to_string()
}

fn default_reactions() -> Vec<String> {
    ["👍", "😂", "❤️", "🎣"].map(String::from).to_vec()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            new_badge_days: default_new_badge_days(),
            hero_cta_label: default_hero_cta_label(),
            tag_pages: true,
            tags_path: default_tags_path(),
        }
    }
}

impl Default for ItemConfig {
    fn default() -> Self {
        Self {
            show_title: true,
            interactive_widget: false,
        }
    }
}

impl Default for FooterConfig {
    fn default() -> Self {
        Self {
            generator_name: default_generator_name(),
            generator_url: default_generator_url(),
            feed_path: default_feed_path(),
            show_feed_link: true,
            social: default_social_links(),
        }
    }
}

impl Config {
    /// Configuration with defaults for everything but the site name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            site: SiteConfig {
                name: name.into(),
                description: String::new(),
                language: default_language(),
            },
            theme: ThemeConfig::default(),
            item: ItemConfig::default(),
            footer: FooterConfig::default(),
            comments: None,
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Parse and validate configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.site.name.trim().is_empty() {
            return Err(CoreError::config("site.name cannot be empty"));
        }

        if self.theme.new_badge_days < 0 {
            return Err(CoreError::config("theme.new_badge_days cannot be negative"));
        }

        if !self.theme.tags_path.starts_with('/') {
            return Err(CoreError::config("theme.tags_path must start with '/'"));
        }

        match (&self.comments, self.item.interactive_widget) {
            (None, true) => {
                return Err(CoreError::config(
                    "item.interactive_widget requires a [comments] table",
                ));
            }
            (Some(comments), enabled) => {
                comments.validate()?;
                if !enabled {
                    tracing::warn!("[comments] is configured but item.interactive_widget is off");
                }
            }
            (None, false) => {}
        }

        Ok(())
    }

    /// Site context for this configuration, with no sections declared yet.
    pub fn site_context(&self) -> SiteContext {
        SiteContext::new(&self.site.name, &self.site.description, &self.site.language)
            .with_tags_path(&self.theme.tags_path)
    }
}

impl CommentsConfig {
    fn validate(&self) -> Result<()> {
        let identifiers = [
            ("sdk_version", &self.sdk_version),
            ("api_key", &self.api_key),
            ("auth_domain", &self.auth_domain),
            ("project_id", &self.project_id),
            ("storage_bucket", &self.storage_bucket),
            ("messaging_sender_id", &self.messaging_sender_id),
            ("app_id", &self.app_id),
        ];
        if let Some((field, _)) = identifiers.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(CoreError::config(format!("comments.{field} cannot be empty")));
        }

        // Spliced into the SDK's CDN URLs unquoted.
        if !self
            .sdk_version
            .chars()
            .all(|c| c.is_ascii_digit() || c == '.')
        {
            return Err(CoreError::config(format!(
                "comments.sdk_version is not a version number: {}",
                self.sdk_version
            )));
        }

        if self.reactions.is_empty() {
            return Err(CoreError::config("comments.reactions cannot be empty"));
        }

        Ok(())
    }
}
