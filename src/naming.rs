//! Content filename parsing.
//!
//! Page files follow `NNN-slug[.locale].md`:
//!
//! - `010-bread.md` → order 10, slug `bread`, default-locale content
//! - `010-bread.en.md` → same page, English override
//! - `index.md` → unnumbered, slug `index`, hidden from navigation
//!
//! The numeric prefix orders navigation; unnumbered pages are built but
//! left out of the menu. Dashes in the slug become spaces in the display
//! title, which is the navigation label when no translation exists.

/// Result of parsing a page file stem like `020-our-rooms.en`.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryName {
    /// Number prefix if present (e.g., `20` from `020-our-rooms`).
    pub order: Option<u32>,
    /// URL slug: the name after `NNN-`, dashes preserved.
    pub slug: String,
    /// Locale suffix (`en` from `bread.en`), if any.
    pub locale: Option<String>,
    /// Slug with dashes converted to spaces.
    pub display_title: String,
}

/// Parse a page file stem (file name without `.md`).
pub fn parse_entry_name(stem: &str) -> EntryName {
    let (base, locale) = match stem.rsplit_once('.') {
        Some((base, suffix)) if !base.is_empty() && is_locale_code(suffix) => {
            (base, Some(suffix.to_string()))
        }
        _ => (stem, None),
    };

    let (order, slug) = match base.split_once('-') {
        Some((prefix, rest)) => match prefix.parse::<u32>() {
            Ok(num) if !rest.is_empty() => (Some(num), rest),
            _ => (None, base),
        },
        None => (None, base),
    };

    EntryName {
        order,
        slug: slug.to_string(),
        locale,
        display_title: slug.replace('-', " "),
    }
}

/// Locale codes look like `en`, `ja`, `pt-BR`, `zh-Hant`.
fn is_locale_code(s: &str) -> bool {
    let mut parts = s.split('-');
    let lang_ok = parts
        .next()
        .is_some_and(|l| (2..=3).contains(&l.len()) && l.chars().all(|c| c.is_ascii_lowercase()));
    lang_ok
        && parts.all(|p| (2..=4).contains(&p.len()) && p.chars().all(|c| c.is_ascii_alphanumeric()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numbered_with_multi_word_slug() {
        let p = parse_entry_name("020-our-rooms");
        assert_eq!(p.order, Some(20));
        assert_eq!(p.slug, "our-rooms");
        assert_eq!(p.display_title, "our rooms");
        assert_eq!(p.locale, None);
    }

    #[test]
    fn numbered_with_locale_suffix() {
        let p = parse_entry_name("010-bread.en");
        assert_eq!(p.order, Some(10));
        assert_eq!(p.slug, "bread");
        assert_eq!(p.locale.as_deref(), Some("en"));
    }

    #[test]
    fn region_locale_suffix() {
        let p = parse_entry_name("010-bread.pt-BR");
        assert_eq!(p.slug, "bread");
        assert_eq!(p.locale.as_deref(), Some("pt-BR"));
    }

    #[test]
    fn unnumbered_index() {
        let p = parse_entry_name("index");
        assert_eq!(p.order, None);
        assert_eq!(p.slug, "index");
    }

    #[test]
    fn unnumbered_index_with_locale() {
        let p = parse_entry_name("index.ja");
        assert_eq!(p.slug, "index");
        assert_eq!(p.locale.as_deref(), Some("ja"));
    }

    #[test]
    fn dotted_name_that_is_not_a_locale() {
        let p = parse_entry_name("030-v1.2");
        assert_eq!(p.slug, "v1.2");
        assert_eq!(p.locale, None);
    }

    #[test]
    fn unnumbered_with_dashes() {
        let p = parse_entry_name("wip-menu");
        assert_eq!(p.order, None);
        assert_eq!(p.slug, "wip-menu");
        assert_eq!(p.display_title, "wip menu");
    }

    #[test]
    fn number_only_is_unnumbered_slug() {
        let p = parse_entry_name("001-");
        assert_eq!(p.order, None);
        assert_eq!(p.slug, "001-");
    }

    #[test]
    fn zero_prefix() {
        let p = parse_entry_name("000-first");
        assert_eq!(p.order, Some(0));
        assert_eq!(p.slug, "first");
    }
}
