//! CLI output formatting for the pipeline stages.
//!
//! Output is a content inventory: each page leads with its navigation
//! position and slug, with source files and locale overrides as indented
//! context lines.
//!
//! # Output Format
//!
//! ## Scan
//!
//! ```text
//! Pages
//! 001 bread (cards-page)
//!     Source: pages/010-bread.md
//!     en: pages/010-bread.en.md
//!     メロンパン、カレーパン、あんぱんを毎朝...
//! 002 rooms (cards-page)
//!     Source: pages/020-rooms.md
//! --- index (index-page)
//!     Source: pages/index.md
//!
//! Locales
//!     ja (default): 31 entries
//!     en: 12 entries
//!
//! Config
//!     config.toml
//!     assets/
//! ```
//!
//! ## Generate
//!
//! ```text
//! ja
//!     Home → index.html, m/index.html
//!     001 bread → bread/index.html, m/bread/index.html
//! en
//!     Home → en/index.html, m/en/index.html
//!
//! Generated 16 pages in 2 locales, 1 asset
//! ```
//!
//! Each stage has a `format_*` function returning `Vec<String>` and a
//! `print_*` wrapper that writes to stdout. Format functions do no I/O
//! beyond checking which optional content files exist.

use crate::config::SiteConfig;
use crate::generate::{GenerateReport, GeneratedPage};
use crate::scan::{ASSETS_DIR, Manifest};
use std::path::Path;

/// 1-based navigation position, zero-padded to three digits.
fn format_index(pos: u32) -> String {
    format!("{:0>3}", pos)
}

/// Position column for a page: its nav order, or `---` when hidden from nav.
fn position(navigation_pos: Option<usize>) -> String {
    match navigation_pos {
        Some(i) => format_index(i as u32 + 1),
        None => "---".to_string(),
    }
}

fn strip_html_tags(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    result
}

/// Truncate to `max` characters (not bytes), appending `...` if cut.
fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}...")
    }
}

/// One-line preview of a page body.
fn body_preview(html: &str) -> Option<String> {
    let plain = strip_html_tags(html);
    let flat = plain.split_whitespace().collect::<Vec<_>>().join(" ");
    (!flat.is_empty()).then(|| truncate_chars(&flat, 40))
}

// ============================================================================
// Scan
// ============================================================================

pub fn format_scan_output(manifest: &Manifest, source_root: &Path) -> Vec<String> {
    let mut lines = vec!["Pages".to_string()];
    let default_locale = &manifest.config.i18n.default_locale;

    for page in &manifest.pages {
        let nav_pos = manifest
            .navigation
            .iter()
            .position(|item| item.slug == page.slug);
        let default = page.variant(default_locale);
        lines.push(format!(
            "{} {} ({})",
            position(nav_pos),
            page.slug,
            default.frontmatter.template_key()
        ));
        lines.push(format!("    Source: {}", default.source_path));
        for (locale, source) in &page.variants {
            if locale != default_locale {
                lines.push(format!("    {}: {}", locale, source.source_path));
            }
        }
        if let Some(preview) = body_preview(&default.html) {
            lines.push(format!("    {preview}"));
        }
    }

    lines.push(String::new());
    lines.push("Locales".to_string());
    for locale in &manifest.config.i18n.locales {
        let marker = if locale == default_locale {
            " (default)"
        } else {
            ""
        };
        match manifest.translations.catalogs.get(locale) {
            Some(catalog) => lines.push(format!(
                "    {}{}: {} entries",
                locale,
                marker,
                catalog.entries.len()
            )),
            None => lines.push(format!("    {}{}: no catalog", locale, marker)),
        }
    }

    lines.push(String::new());
    lines.push("Config".to_string());
    if source_root.join("config.toml").exists() {
        lines.push("    config.toml".to_string());
    }
    if source_root.join(ASSETS_DIR).is_dir() {
        lines.push(format!("    {ASSETS_DIR}/"));
    }

    lines
}

pub fn print_scan_output(manifest: &Manifest, source_root: &Path) {
    for line in format_scan_output(manifest, source_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Generate
// ============================================================================

/// Pages grouped by locale, then by slug, listing every profile's file.
pub fn format_generate_output(
    report: &GenerateReport,
    manifest: &Manifest,
    config: &SiteConfig,
) -> Vec<String> {
    let mut lines = Vec::new();
    let index_slug = manifest.index_page().map(|p| p.slug.as_str());

    for locale in &config.i18n.locales {
        let in_locale: Vec<&GeneratedPage> =
            report.pages.iter().filter(|p| &p.locale == locale).collect();
        if in_locale.is_empty() {
            continue;
        }
        lines.push(locale.clone());

        let mut slugs: Vec<&str> = Vec::new();
        for page in &in_locale {
            if !slugs.contains(&page.slug.as_str()) {
                slugs.push(&page.slug);
            }
        }
        for slug in slugs {
            let files: Vec<&str> = in_locale
                .iter()
                .filter(|p| p.slug == slug)
                .map(|p| p.output_path.as_str())
                .collect();
            let label = if index_slug == Some(slug) {
                "Home".to_string()
            } else {
                match manifest.navigation.iter().position(|n| n.slug == slug) {
                    Some(i) => format!("{} {}", format_index(i as u32 + 1), slug),
                    None => slug.to_string(),
                }
            };
            lines.push(format!("    {} \u{2192} {}", label, files.join(", ")));
        }
    }

    lines.push(String::new());
    let asset_word = if report.assets_copied == 1 {
        "asset"
    } else {
        "assets"
    };
    lines.push(format!(
        "Generated {} pages in {} locales, {} {}",
        report.pages.len(),
        config.i18n.locales.len(),
        report.assets_copied,
        asset_word
    ));

    lines
}

pub fn print_generate_output(report: &GenerateReport, manifest: &Manifest) {
    for line in format_generate_output(report, manifest, &manifest.config) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
