//! Translation catalogs.
//!
//! Each locale has a TOML catalog at `locales/<code>.toml`. Nested tables are
//! flattened into dot-separated keys, so
//!
//! ```toml
//! [headings]
//! contact-us = "お問い合わせ"
//! ```
//!
//! is looked up as `headings.contact-us`. Lookups fall back from the
//! requested locale to the default locale and finally to the key itself.
//!
//! Entries read through [`I18n::t_rich`] are inline markdown, which lets a
//! translation carry links and line breaks (the home page lead text, the
//! directions paragraph) without per-locale branches in the templates.

use crate::config::I18nConfig;
use maud::{Markup, PreEscaped};
use pulldown_cmark::{Event, Parser, Tag, TagEnd, html as md_html};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum I18nError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Catalog {0}: {1}")]
    Toml(String, toml::de::Error),
    #[error("No catalog for the default locale '{0}' (expected locales/{0}.toml)")]
    MissingDefaultLocale(String),
}

/// Directory under the content root holding the catalogs.
pub const LOCALES_DIR: &str = "locales";

/// Flattened translations for one locale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    pub locale: String,
    pub entries: BTreeMap<String, String>,
}

impl Catalog {
    pub fn from_toml_str(locale: &str, content: &str) -> Result<Self, I18nError> {
        let value: toml::Value =
            toml::from_str(content).map_err(|e| I18nError::Toml(locale.to_string(), e))?;
        let mut entries = BTreeMap::new();
        flatten_into(&mut entries, "", &value);
        Ok(Self {
            locale: locale.to_string(),
            entries,
        })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }
}

fn flatten_into(entries: &mut BTreeMap<String, String>, prefix: &str, value: &toml::Value) {
    let key = prefix.to_string();
    match value {
        toml::Value::Table(table) => {
            for (k, v) in table {
                let child = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                flatten_into(entries, &child, v);
            }
        }
        toml::Value::String(s) => {
            entries.insert(key, s.clone());
        }
        toml::Value::Integer(_) | toml::Value::Float(_) | toml::Value::Boolean(_) => {
            entries.insert(key, value.to_string());
        }
        toml::Value::Array(_) | toml::Value::Datetime(_) => {
            tracing::warn!(key = %key, "ignoring non-scalar translation entry");
        }
    }
}

/// Every configured locale's catalog.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Translations {
    pub default_locale: String,
    pub catalogs: BTreeMap<String, Catalog>,
}

impl Translations {
    /// Load `locales/<code>.toml` for every configured locale.
    ///
    /// A missing catalog for a non-default locale is not an error: every
    /// lookup in that locale falls back to the default catalog.
    pub fn load(root: &Path, config: &I18nConfig) -> Result<Self, I18nError> {
        let dir = root.join(LOCALES_DIR);
        let mut catalogs = BTreeMap::new();
        for locale in &config.locales {
            let path = dir.join(format!("{locale}.toml"));
            if !path.exists() {
                if *locale == config.default_locale {
                    return Err(I18nError::MissingDefaultLocale(locale.clone()));
                }
                tracing::warn!(locale = %locale, "no catalog, falling back to default locale");
                continue;
            }
            let content = fs::read_to_string(&path)?;
            let catalog = Catalog::from_toml_str(locale, &content)?;
            tracing::debug!(locale = %locale, entries = catalog.entries.len(), "loaded catalog");
            catalogs.insert(locale.clone(), catalog);
        }
        Ok(Self {
            default_locale: config.default_locale.clone(),
            catalogs,
        })
    }

    /// Translation context for one locale.
    pub fn for_locale<'a>(&'a self, locale: &'a str) -> I18n<'a> {
        I18n {
            locale,
            catalog: self.catalogs.get(locale),
            fallback: self.catalogs.get(&self.default_locale),
        }
    }
}

/// Translation context handed down the component tree.
#[derive(Debug, Clone, Copy)]
pub struct I18n<'a> {
    locale: &'a str,
    catalog: Option<&'a Catalog>,
    fallback: Option<&'a Catalog>,
}

impl<'a> I18n<'a> {
    /// Context with no catalogs at all: every lookup yields the key.
    #[cfg(test)]
    pub fn empty(locale: &'a str) -> Self {
        Self {
            locale,
            catalog: None,
            fallback: None,
        }
    }

    pub fn locale(&self) -> &'a str {
        self.locale
    }

    /// Look up a key without logging a miss.
    pub fn lookup(&self, key: &str) -> Option<&'a str> {
        self.catalog
            .and_then(|c| c.get(key))
            .or_else(|| self.fallback.and_then(|c| c.get(key)))
    }

    /// Translate `key`, yielding the key itself when no catalog has it.
    pub fn t(&self, key: &str) -> String {
        match self.lookup(key) {
            Some(value) => value.to_string(),
            None => {
                tracing::warn!(locale = self.locale, key, "missing translation");
                key.to_string()
            }
        }
    }

    /// Translate `key` if present, otherwise use `fallback` verbatim.
    pub fn t_or(&self, key: &str, fallback: &str) -> String {
        self.lookup(key).unwrap_or(fallback).to_string()
    }

    /// Render a translation entry as inline markdown. `None` when missing.
    pub fn t_rich(&self, key: &str) -> Option<Markup> {
        self.lookup(key).map(render_inline_markdown)
    }
}

/// Render markdown without the wrapping paragraph, keeping line breaks.
pub fn render_inline_markdown(source: &str) -> Markup {
    let events = Parser::new(source).filter_map(|event| match event {
        Event::Start(Tag::Paragraph) => None,
        Event::End(TagEnd::Paragraph) => Some(Event::HardBreak),
        Event::SoftBreak => Some(Event::HardBreak),
        other => Some(other),
    });
    let mut out = String::new();
    md_html::push_html(&mut out, events);
    let trimmed = out.trim_end().trim_end_matches("<br />").trim_end();
    PreEscaped(trimmed.to_string())
}
