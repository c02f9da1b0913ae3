//! Site configuration module.
//!
//! Handles loading, validating, and merging the site's `config.toml`. Stock
//! defaults are serialized to a TOML table, the user's file is merged on top,
//! and the result is deserialized and validated.
//!
//! ## Config File Location
//!
//! ```text
//! content/
//! ├── config.toml              # Site config (overrides stock defaults)
//! ├── locales/
//! │   ├── ja.toml
//! │   └── en.toml
//! └── pages/
//!     └── ...
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! [site]
//! title = "Hanare"
//! description = "Bakery and guesthouse"
//! phone = "0599-00-0000"        # Displayed phone number
//! phone_value = "+81599000000"  # Dialable value for tel: links (defaults to phone)
//! address = "..."
//! gmap = "https://maps.app.goo.gl/..."
//! url = "https://example.com"   # Canonical origin for og:url and alternates
//! og_image = "img/og-image.jpg"
//! theme_color = "#000000"
//! path_prefix = "/"
//!
//! [i18n]
//! default_locale = "ja"
//! locales = ["ja", "en"]
//!
//! [breakpoints]
//! mobile = "(max-width: 991px)"
//! narrow_cards = "(max-width: 599px)"
//! desktop_sidebar = "(min-width: 992px)"
//!
//! [render]
//! desktop_width = 1280
//! mobile_width = 375
//! mobile_variant = true
//! mobile_prefix = "m"
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use crate::viewport::{MediaQuery, Viewport};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Branding and contact details shared by every page.
    pub site: SiteMetadata,
    /// Locales to build and the default one.
    pub i18n: I18nConfig,
    /// Named media queries that switch page structure.
    pub breakpoints: BreakpointsConfig,
    /// Viewport widths the static pages are rendered for.
    pub render: RenderConfig,
    /// Target sizes handed to the image resolver.
    pub images: ImagesConfig,
    /// Theme colors, emitted as CSS custom properties.
    pub colors: ColorConfig,
    /// Home page extras (video, timeline, services).
    pub index: IndexConfig,
    /// Social profile links shown in the header and mobile menu.
    pub social: Vec<SocialLink>,
    /// Parallel rendering settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.i18n.locales.is_empty() {
            return Err(ConfigError::Validation(
                "i18n.locales must not be empty".into(),
            ));
        }
        if !self.i18n.locales.contains(&self.i18n.default_locale) {
            return Err(ConfigError::Validation(format!(
                "i18n.default_locale '{}' must be listed in i18n.locales",
                self.i18n.default_locale
            )));
        }
        for (i, locale) in self.i18n.locales.iter().enumerate() {
            if locale.is_empty() || locale.contains('/') {
                return Err(ConfigError::Validation(format!(
                    "i18n.locales contains an invalid code: '{locale}'"
                )));
            }
            if self.i18n.locales[..i].contains(locale) {
                return Err(ConfigError::Validation(format!(
                    "i18n.locales lists '{locale}' twice"
                )));
            }
        }
        for (name, query) in [
            ("mobile", &self.breakpoints.mobile),
            ("narrow_cards", &self.breakpoints.narrow_cards),
            ("desktop_sidebar", &self.breakpoints.desktop_sidebar),
        ] {
            if MediaQuery::parse(query).is_none() {
                return Err(ConfigError::Validation(format!(
                    "breakpoints.{name} is not a supported media query: '{query}'"
                )));
            }
        }
        if self.render.desktop_width == 0 || self.render.mobile_width == 0 {
            return Err(ConfigError::Validation(
                "render widths must be non-zero".into(),
            ));
        }
        if let Some(mobile) = MediaQuery::parse(&self.breakpoints.mobile) {
            if Viewport::new(self.render.desktop_width).matches(&mobile) {
                return Err(ConfigError::Validation(format!(
                    "render.desktop_width {} falls inside breakpoints.mobile '{}'",
                    self.render.desktop_width, self.breakpoints.mobile
                )));
            }
            if self.render.mobile_variant && !Viewport::new(self.render.mobile_width).matches(&mobile) {
                return Err(ConfigError::Validation(format!(
                    "render.mobile_width {} falls outside breakpoints.mobile '{}'",
                    self.render.mobile_width, self.breakpoints.mobile
                )));
            }
        }
        if self.render.mobile_variant
            && (self.render.mobile_prefix.is_empty() || self.render.mobile_prefix.contains('/'))
        {
            return Err(ConfigError::Validation(
                "render.mobile_prefix must be a single non-empty path segment".into(),
            ));
        }
        if self.images.hero_max_width == 0
            || self.images.card_max_width == 0
            || self.images.portrait_size == 0
        {
            return Err(ConfigError::Validation(
                "image sizes must be non-zero".into(),
            ));
        }
        Ok(())
    }
}

/// Branding and contact details.
///
/// Every field may be empty; components render empty values rather than fail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMetadata {
    pub title: String,
    pub description: String,
    /// Phone number as displayed.
    pub phone: String,
    /// Dialable phone value for `tel:` links. Falls back to `phone`.
    pub phone_value: String,
    pub address: String,
    /// Map link for the address.
    pub gmap: String,
    /// Canonical origin, e.g. `https://example.com`. Empty means root-relative URLs.
    pub url: String,
    /// Open Graph image, relative to the path prefix.
    pub og_image: String,
    pub theme_color: String,
    /// Prefix prepended to every generated link.
    pub path_prefix: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            phone: String::new(),
            phone_value: String::new(),
            address: String::new(),
            gmap: String::new(),
            url: String::new(),
            og_image: "img/og-image.jpg".to_string(),
            theme_color: "#000000".to_string(),
            path_prefix: "/".to_string(),
        }
    }
}

impl SiteMetadata {
    /// `tel:` href for call buttons.
    pub fn tel_href(&self) -> String {
        let value = if self.phone_value.is_empty() {
            &self.phone
        } else {
            &self.phone_value
        };
        format!("tel:{value}")
    }

    /// Join `path` onto the configured prefix, always yielding a leading slash.
    pub fn with_prefix(&self, path: &str) -> String {
        let prefix = self.path_prefix.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{prefix}/{path}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct I18nConfig {
    /// Locale served at the site root.
    pub default_locale: String,
    /// Every locale to build, in switcher order.
    pub locales: Vec<String>,
}

impl Default for I18nConfig {
    fn default() -> Self {
        Self {
            default_locale: "ja".to_string(),
            locales: vec!["ja".to_string(), "en".to_string()],
        }
    }
}

/// Named media queries. See [`crate::viewport`] for the supported syntax.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BreakpointsConfig {
    /// Switches Layout between the mobile panel and the fixed header.
    pub mobile: String,
    /// Switches the card gallery to a single column.
    pub narrow_cards: String,
    /// Shows the social timeline sidebar on the home page.
    pub desktop_sidebar: String,
}

impl Default for BreakpointsConfig {
    fn default() -> Self {
        Self {
            mobile: "(max-width: 991px)".to_string(),
            narrow_cards: "(max-width: 599px)".to_string(),
            desktop_sidebar: "(min-width: 992px)".to_string(),
        }
    }
}

/// Viewport profiles used for static rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenderConfig {
    /// Width the primary pages are rendered at.
    pub desktop_width: u32,
    /// Width the mobile variant is rendered at.
    pub mobile_width: u32,
    /// Whether to emit the mobile variant tree at all.
    pub mobile_variant: bool,
    /// Path segment the mobile variant lives under.
    pub mobile_prefix: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            desktop_width: 1280,
            mobile_width: 375,
            mobile_variant: true,
            mobile_prefix: "m".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Fluid max width for hero and main images.
    pub hero_max_width: u32,
    /// Fluid max width for card images.
    pub card_max_width: u32,
    /// Logo shown in the hero and footer.
    pub logo: String,
    /// Shop sign photo shown beside the directions. Empty to omit.
    pub sign: String,
    /// Owner portrait shown beside the lead text. Empty to omit.
    pub owner: String,
    /// Square size, in CSS pixels, of the sign and owner photos.
    pub portrait_size: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            hero_max_width: 2048,
            card_max_width: 600,
            logo: "img/logo.png".to_string(),
            sign: String::new(),
            owner: String::new(),
            portrait_size: 300,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Buttons and links.
    pub accent: String,
    /// Fixed desktop header bar.
    pub header_background: String,
    /// "Contact us" band above the footer.
    pub contact_background: String,
    pub footer_background: String,
    pub footer_text: String,
    /// Informational message boxes.
    pub banner_background: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            accent: "#00b5ad".to_string(),
            header_background: "rgba(255,255,255,.8)".to_string(),
            contact_background: "#f5f6f7".to_string(),
            footer_background: "#1b1c1d".to_string(),
            footer_text: "#ffffff".to_string(),
            banner_background: "#fff8db".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    /// Embeddable video URL shown below the main image.
    pub intro_video: Option<String>,
    /// Facebook page URL for the timeline sidebar.
    pub facebook_page: Option<String>,
    /// Target of the mobile "latest news" button. Defaults to the
    /// `timeline` page in the current locale and profile.
    pub latest_news_href: Option<String>,
    /// Service keys; labels come from `services.<key>` translations.
    pub services: Vec<String>,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            intro_video: None,
            facebook_page: None,
            latest_news_href: None,
            services: vec![
                "bakery".to_string(),
                "cafe".to_string(),
                "lodging".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct SocialLink {
    /// Accessible label, e.g. `"Instagram"`.
    pub name: String,
    pub href: String,
}

/// Parallel rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of render workers. Absent means one per CPU core.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count: user can constrain down, not up.
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.clamp(1, cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value, if present.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the content root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml`. Used by `gen-config`.
pub fn stock_config_toml() -> &'static str {
    r##"# Hanare site configuration
# =========================
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site metadata (head tags, footer, call buttons)
# ---------------------------------------------------------------------------
[site]
title = ""
description = ""
# Phone number as displayed, and the dialable value for tel: links.
phone = ""
phone_value = ""
address = ""
# Map link for the address in the footer.
gmap = ""
# Canonical origin, e.g. "https://example.com". Empty = root-relative URLs.
url = ""
og_image = "img/og-image.jpg"
theme_color = "#000000"
path_prefix = "/"

# ---------------------------------------------------------------------------
# Locales. The default locale is served at the root, others under /<code>/.
# Catalogs live in locales/<code>.toml.
# ---------------------------------------------------------------------------
[i18n]
default_locale = "ja"
locales = ["ja", "en"]

# ---------------------------------------------------------------------------
# Breakpoints: (max-width: Npx) / (min-width: Npx), joined with "and".
# ---------------------------------------------------------------------------
[breakpoints]
mobile = "(max-width: 991px)"
narrow_cards = "(max-width: 599px)"
desktop_sidebar = "(min-width: 992px)"

# ---------------------------------------------------------------------------
# Static rendering profiles
# ---------------------------------------------------------------------------
[render]
# desktop_width must fall outside breakpoints.mobile, mobile_width inside it.
desktop_width = 1280
mobile_width = 375
# Emit a second page tree rendered at mobile_width under /<mobile_prefix>/.
mobile_variant = true
mobile_prefix = "m"

# ---------------------------------------------------------------------------
# Images
# ---------------------------------------------------------------------------
[images]
hero_max_width = 2048
card_max_width = 600
logo = "img/logo.png"
# Square photos rendered at portrait_size x portrait_size. Empty to omit.
sign = ""
owner = ""
portrait_size = 300

# ---------------------------------------------------------------------------
# Colors
# ---------------------------------------------------------------------------
[colors]
accent = "#00b5ad"
header_background = "rgba(255,255,255,.8)"
contact_background = "#f5f6f7"
footer_background = "#1b1c1d"
footer_text = "#ffffff"
banner_background = "#fff8db"

# ---------------------------------------------------------------------------
# Home page
# ---------------------------------------------------------------------------
[index]
# intro_video = "https://www.youtube.com/embed/..."
# facebook_page = "https://www.facebook.com/..."
# Mobile "latest news" button target. Defaults to the timeline page.
# latest_news_href = "https://www.facebook.com/..."
services = ["bakery", "cafe", "lodging"]

# ---------------------------------------------------------------------------
# Social links (repeat the table for each profile)
# ---------------------------------------------------------------------------
# [[social]]
# name = "Instagram"
# href = "https://www.instagram.com/..."

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel render workers. Omit to use every CPU core.
# max_processes = 4
"##
}

/// Generate CSS custom properties from color config.
pub fn generate_color_css(colors: &ColorConfig) -> String {
    format!(
        r#":root {{
    --color-accent: {accent};
    --color-header-bg: {header_bg};
    --color-contact-bg: {contact_bg};
    --color-footer-bg: {footer_bg};
    --color-footer-text: {footer_text};
    --color-banner-bg: {banner_bg};
}}"#,
        accent = colors.accent,
        header_bg = colors.header_background,
        contact_bg = colors.contact_background,
        footer_bg = colors.footer_background,
        footer_text = colors.footer_text,
        banner_bg = colors.banner_background,
    )
}
