//! Content scanning and manifest generation.
//!
//! Stage 1 of the build. Reads the content directory into a [`Manifest`]:
//! site config, translation catalogs, pages with parsed frontmatter and
//! rendered markdown, and the navigation list.
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml              # Site config (optional)
//! ├── locales/
//! │   ├── ja.toml              # Default-locale catalog (required)
//! │   └── en.toml
//! ├── img/                     # Images referenced from frontmatter
//! └── pages/
//!     ├── index.md             # templateKey: index-page → site root
//!     ├── index.en.md          # English override
//!     ├── 010-bread.md         # templateKey: cards-page, in nav
//!     ├── 010-bread.en.md
//!     └── wip-notes.md         # Unnumbered: built, hidden from nav
//! ```
//!
//! ## Validation
//!
//! - Every page needs YAML frontmatter with a known `templateKey`
//! - Exactly one page uses the `index-page` template
//! - A page must have a default-locale file; overrides are optional
//! - A slug may not have two files for the same locale
//! - Locale overrides keep the default-locale file's `templateKey`
//! - A page slug may not shadow a locale directory, the mobile prefix,
//!   `static/`, or a top-level entry of `assets/`

use crate::config::{self, SiteConfig};
use crate::i18n::{self, Translations};
use crate::naming::parse_entry_name;
use crate::render::markdown_to_html;
use crate::types::{CardEntry, ImageRef, LinkEntry, NavItem, null_as_default};
use gray_matter::{Matter, engine::YAML};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Translation error: {0}")]
    I18n(#[from] i18n::I18nError),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Pages directory not found: {0}")]
    MissingPagesDir(PathBuf),
    #[error("Invalid frontmatter in {0}: {1}")]
    Frontmatter(PathBuf, String),
    #[error("Unknown templateKey '{1}' in {0}")]
    UnknownTemplate(PathBuf, String),
    #[error("Page '{0}' has more than one file for locale '{1}'")]
    DuplicatePage(String, String),
    #[error("Page '{0}' has no default-locale file")]
    MissingDefaultVariant(String),
    #[error("No page uses the index-page template")]
    NoIndexPage,
    #[error("Both '{0}' and '{1}' use the index-page template")]
    MultipleIndexPages(String, String),
    #[error("Page '{0}' override for locale '{1}' uses templateKey '{2}', default file uses '{3}'")]
    TemplateMismatch(String, String, String, String),
    #[error("Page slug '{0}' collides with {1}")]
    ReservedSlug(String, String),
}

/// Directory under the content root holding page markdown.
pub const PAGES_DIR: &str = "pages";

/// Directory under the content root copied verbatim to the output root.
pub const ASSETS_DIR: &str = "assets";

/// Manifest output from the scan stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Manifest {
    pub pages: Vec<SourcePage>,
    pub navigation: Vec<NavItem>,
    pub translations: Translations,
    pub config: SiteConfig,
}

impl Manifest {
    /// The page rendered at the site root.
    pub fn index_page(&self) -> Option<&SourcePage> {
        self.pages.iter().find(|p| p.is_index())
    }
}

/// One logical page with its per-locale source files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourcePage {
    pub slug: String,
    pub order: Option<u32>,
    pub display_title: String,
    /// Locale → source. Always contains the default locale.
    pub variants: BTreeMap<String, PageSource>,
    pub default_locale: String,
}

impl SourcePage {
    /// Source for `locale`, falling back to the default-locale file.
    pub fn variant(&self, locale: &str) -> &PageSource {
        self.variants
            .get(locale)
            .or_else(|| self.variants.get(&self.default_locale))
            .expect("scan guarantees a default-locale variant")
    }

    pub fn is_index(&self) -> bool {
        self.variants
            .get(&self.default_locale)
            .is_some_and(|v| matches!(v.frontmatter, Frontmatter::IndexPage(_)))
    }
}

/// A single markdown file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSource {
    /// Path relative to the content root.
    pub source_path: String,
    pub frontmatter: Frontmatter,
    /// Raw markdown body.
    pub markdown: String,
    /// Body rendered to HTML. Trusted: injected without escaping.
    pub html: String,
}

/// Page frontmatter, tagged by `templateKey`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "templateKey", rename_all = "kebab-case")]
pub enum Frontmatter {
    IndexPage(IndexFrontmatter),
    CardsPage(CardsFrontmatter),
}

pub const TEMPLATE_KEYS: &[&str] = &["index-page", "cards-page"];

impl Frontmatter {
    pub fn template_key(&self) -> &'static str {
        match self {
            Frontmatter::IndexPage(_) => "index-page",
            Frontmatter::CardsPage(_) => "cards-page",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IndexFrontmatter {
    #[serde(deserialize_with = "null_as_default")]
    pub main_background_image: ImageRef,
    #[serde(deserialize_with = "null_as_default")]
    pub main_image: ImageRef,
    #[serde(deserialize_with = "null_as_default")]
    pub related_links: Vec<LinkEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CardsFrontmatter {
    #[serde(deserialize_with = "null_as_default")]
    pub main_image: ImageRef,
    #[serde(deserialize_with = "null_as_default")]
    pub main_image_active: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub cards: Vec<CardEntry>,
}

pub fn scan(root: &Path) -> Result<Manifest, ScanError> {
    let config = config::load_config(root)?;
    let translations = Translations::load(root, &config.i18n)?;

    let pages = scan_pages(root, &config)?;

    let mut index_slugs = pages.iter().filter(|p| p.is_index()).map(|p| &p.slug);
    match (index_slugs.next(), index_slugs.next()) {
        (None, _) => return Err(ScanError::NoIndexPage),
        (Some(a), Some(b)) => return Err(ScanError::MultipleIndexPages(a.clone(), b.clone())),
        _ => {}
    }

    check_reserved_slugs(root, &config, &pages)?;
    let navigation = build_navigation(&pages);

    Ok(Manifest {
        pages,
        navigation,
        translations,
        config,
    })
}

fn scan_pages(root: &Path, config: &SiteConfig) -> Result<Vec<SourcePage>, ScanError> {
    let pages_dir = root.join(PAGES_DIR);
    if !pages_dir.is_dir() {
        return Err(ScanError::MissingPagesDir(pages_dir));
    }

    let default_locale = &config.i18n.default_locale;
    let mut by_slug: BTreeMap<String, SourcePage> = BTreeMap::new();

    for entry in WalkDir::new(&pages_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type().is_file() || !is_markdown(path) {
            continue;
        }
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if stem.starts_with('.') {
            continue;
        }

        let name = parse_entry_name(&stem);
        let locale = name.locale.clone().unwrap_or_else(|| default_locale.clone());
        if !config.i18n.locales.contains(&locale) {
            tracing::warn!(file = %path.display(), locale = %locale, "skipping page for unconfigured locale");
            continue;
        }

        let source = read_page_source(root, path)?;
        tracing::debug!(file = %source.source_path, locale = %locale, "scanned page");

        let page = by_slug
            .entry(name.slug.clone())
            .or_insert_with(|| SourcePage {
                slug: name.slug.clone(),
                order: name.order,
                display_title: name.display_title.clone(),
                variants: BTreeMap::new(),
                default_locale: default_locale.clone(),
            });
        if locale == *default_locale {
            page.order = name.order;
        }
        if page.variants.contains_key(&locale) {
            return Err(ScanError::DuplicatePage(name.slug, locale));
        }
        page.variants.insert(locale, source);
    }

    let mut pages = Vec::with_capacity(by_slug.len());
    for (slug, page) in by_slug {
        let Some(default) = page.variants.get(default_locale) else {
            return Err(ScanError::MissingDefaultVariant(slug));
        };
        let expected = default.frontmatter.template_key();
        for (locale, source) in &page.variants {
            let found = source.frontmatter.template_key();
            if found != expected {
                return Err(ScanError::TemplateMismatch(
                    slug,
                    locale.clone(),
                    found.to_string(),
                    expected.to_string(),
                ));
            }
        }
        pages.push(page);
    }
    pages.sort_by_key(|p| (p.order.unwrap_or(u32::MAX), p.slug.clone()));
    Ok(pages)
}

/// Non-index pages render at `<slug>/index.html` beside locale trees,
/// the mobile tree, hashed images and copied assets. A slug equal to any
/// of those names would make two outputs share one path.
fn check_reserved_slugs(
    root: &Path,
    config: &SiteConfig,
    pages: &[SourcePage],
) -> Result<(), ScanError> {
    let mut reserved: Vec<(String, String)> = config
        .i18n
        .locales
        .iter()
        .map(|l| (l.clone(), format!("locale '{l}'")))
        .collect();
    if config.render.mobile_variant {
        reserved.push((
            config.render.mobile_prefix.clone(),
            "render.mobile_prefix".to_string(),
        ));
    }
    reserved.push((
        crate::imaging::STATIC_DIR.to_string(),
        "the image output directory".to_string(),
    ));
    let assets_dir = root.join(ASSETS_DIR);
    if assets_dir.is_dir() {
        for entry in fs::read_dir(&assets_dir)? {
            let name = entry?.file_name().to_string_lossy().to_string();
            reserved.push((name.clone(), format!("asset '{ASSETS_DIR}/{name}'")));
        }
    }

    for page in pages.iter().filter(|p| !p.is_index()) {
        if let Some((_, what)) = reserved.iter().find(|(name, _)| *name == page.slug) {
            return Err(ScanError::ReservedSlug(page.slug.clone(), what.clone()));
        }
    }
    Ok(())
}

fn is_markdown(path: &Path) -> bool {
    path.extension()
        .map(|e| e.eq_ignore_ascii_case("md"))
        .unwrap_or(false)
}

/// Read one markdown file: frontmatter, raw body, rendered body.
pub fn read_page_source(root: &Path, path: &Path) -> Result<PageSource, ScanError> {
    let content = fs::read_to_string(path)?;
    let (frontmatter, markdown) = parse_frontmatter(path, &content)?;
    let html = markdown_to_html(&markdown);
    let source_path = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    Ok(PageSource {
        source_path,
        frontmatter,
        markdown,
        html,
    })
}

/// Split a markdown document into typed frontmatter and body.
pub fn parse_frontmatter(path: &Path, content: &str) -> Result<(Frontmatter, String), ScanError> {
    let matter = Matter::<YAML>::new();
    let parsed = matter
        .parse::<serde_yaml::Value>(content)
        .map_err(|e| ScanError::Frontmatter(path.to_path_buf(), e.to_string()))?;

    let data = parsed
        .data
        .ok_or_else(|| ScanError::Frontmatter(path.to_path_buf(), "missing frontmatter".into()))?;

    let key = data
        .get("templateKey")
        .and_then(|k| k.as_str())
        .ok_or_else(|| ScanError::Frontmatter(path.to_path_buf(), "missing templateKey".into()))?;
    if !TEMPLATE_KEYS.contains(&key) {
        return Err(ScanError::UnknownTemplate(path.to_path_buf(), key.to_string()));
    }

    let frontmatter: Frontmatter = serde_yaml::from_value(data)
        .map_err(|e| ScanError::Frontmatter(path.to_path_buf(), e.to_string()))?;
    Ok((frontmatter, parsed.content))
}

/// Numbered, non-index pages in order.
fn build_navigation(pages: &[SourcePage]) -> Vec<NavItem> {
    pages
        .iter()
        .filter(|p| !p.is_index())
        .filter_map(|p| {
            p.order.map(|order| NavItem {
                slug: p.slug.clone(),
                fallback_label: p.display_title.clone(),
                order,
            })
        })
        .collect()
}
