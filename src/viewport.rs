//! Breakpoint evaluation.
//!
//! Components that change *structure* with the viewport (Layout's mobile
//! panel vs. fixed header, the card gallery's column count, the home page
//! sidebar) ask a [`Viewport`] whether a [`MediaQuery`] matches. Each
//! component asks on its own; nothing is cached between them.
//!
//! Supported query syntax is the subset the site uses: one or more
//! `(max-width: Npx)` / `(min-width: Npx)` features joined with `and`,
//! optionally preceded by `screen` or `only screen`. Bounds are inclusive,
//! as in CSS.

use crate::config::BreakpointsConfig;
use std::fmt;

/// A parsed width-only media query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaQuery {
    pub min_width: Option<u32>,
    pub max_width: Option<u32>,
}

impl MediaQuery {
    pub const fn max_width(px: u32) -> Self {
        Self {
            min_width: None,
            max_width: Some(px),
        }
    }

    pub const fn min_width(px: u32) -> Self {
        Self {
            min_width: Some(px),
            max_width: None,
        }
    }

    /// Parse a CSS-style query. Returns `None` for anything outside the
    /// supported subset, including queries with no width feature at all.
    pub fn parse(input: &str) -> Option<Self> {
        let mut query = Self {
            min_width: None,
            max_width: None,
        };
        let mut saw_feature = false;

        for part in input.split(" and ") {
            let part = part.trim();
            if part.is_empty() {
                return None;
            }
            if matches!(part, "screen" | "only screen" | "all") {
                continue;
            }
            let inner = part.strip_prefix('(')?.strip_suffix(')')?;
            let (name, value) = inner.split_once(':')?;
            let px = value.trim().strip_suffix("px")?.trim().parse::<u32>().ok()?;
            match name.trim() {
                "max-width" => query.max_width = Some(px),
                "min-width" => query.min_width = Some(px),
                _ => return None,
            }
            saw_feature = true;
        }

        saw_feature.then_some(query)
    }

    /// Whether a viewport of `width` CSS pixels satisfies this query.
    pub fn matches_width(&self, width: u32) -> bool {
        self.min_width.is_none_or(|min| width >= min)
            && self.max_width.is_none_or(|max| width <= max)
    }
}

impl fmt::Display for MediaQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.min_width, self.max_width) {
            (Some(min), Some(max)) => write!(f, "(min-width: {min}px) and (max-width: {max}px)"),
            (Some(min), None) => write!(f, "(min-width: {min}px)"),
            (None, Some(max)) => write!(f, "(max-width: {max}px)"),
            (None, None) => write!(f, "all"),
        }
    }
}

/// The viewport a page is rendered for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
}

impl Viewport {
    pub const fn new(width: u32) -> Self {
        Self { width }
    }

    pub fn matches(&self, query: &MediaQuery) -> bool {
        query.matches_width(self.width)
    }
}

/// The site's named breakpoints, parsed once from config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Breakpoints {
    /// Mobile panel instead of the fixed header.
    pub mobile: MediaQuery,
    /// Single-column card gallery.
    pub narrow_cards: MediaQuery,
    /// Home page sidebar.
    pub desktop_sidebar: MediaQuery,
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self {
            mobile: MediaQuery::max_width(991),
            narrow_cards: MediaQuery::max_width(599),
            desktop_sidebar: MediaQuery::min_width(992),
        }
    }
}

impl Breakpoints {
    /// Parse the configured queries. Falls back to the stock query for any
    /// entry that does not parse; `SiteConfig::validate` rejects those first.
    pub fn from_config(config: &BreakpointsConfig) -> Self {
        let stock = Self::default();
        Self {
            mobile: MediaQuery::parse(&config.mobile).unwrap_or(stock.mobile),
            narrow_cards: MediaQuery::parse(&config.narrow_cards).unwrap_or(stock.narrow_cards),
            desktop_sidebar: MediaQuery::parse(&config.desktop_sidebar)
                .unwrap_or(stock.desktop_sidebar),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_max_width() {
        assert_eq!(
            MediaQuery::parse("(max-width: 991px)"),
            Some(MediaQuery::max_width(991))
        );
    }

    #[test]
    fn parse_min_width_without_spaces() {
        assert_eq!(
            MediaQuery::parse("(min-width:992px)"),
            Some(MediaQuery::min_width(992))
        );
    }

    #[test]
    fn parse_range_with_screen() {
        let q = MediaQuery::parse("only screen and (min-width: 600px) and (max-width: 991px)")
            .unwrap();
        assert_eq!(q.min_width, Some(600));
        assert_eq!(q.max_width, Some(991));
    }

    #[test]
    fn parse_rejects_unsupported() {
        assert_eq!(MediaQuery::parse("(orientation: portrait)"), None);
        assert_eq!(MediaQuery::parse("(max-width: 60em)"), None);
        assert_eq!(MediaQuery::parse("screen"), None);
        assert_eq!(MediaQuery::parse(""), None);
    }

    #[test]
    fn bounds_are_inclusive() {
        let mobile = MediaQuery::max_width(991);
        assert!(Viewport::new(991).matches(&mobile));
        assert!(!Viewport::new(992).matches(&mobile));

        let desktop = MediaQuery::min_width(992);
        assert!(Viewport::new(992).matches(&desktop));
        assert!(!Viewport::new(991).matches(&desktop));
    }

    #[test]
    fn mobile_and_desktop_sidebar_partition_widths() {
        let bp = Breakpoints::default();
        for width in [0, 320, 599, 600, 991, 992, 1280, 4000] {
            let vp = Viewport::new(width);
            assert_ne!(vp.matches(&bp.mobile), vp.matches(&bp.desktop_sidebar));
        }
    }

    #[test]
    fn display_roundtrips_through_parse() {
        for q in [
            MediaQuery::max_width(599),
            MediaQuery::min_width(992),
            MediaQuery {
                min_width: Some(600),
                max_width: Some(991),
            },
        ] {
            assert_eq!(MediaQuery::parse(&q.to_string()), Some(q));
        }
    }

    #[test]
    fn from_config_uses_configured_queries() {
        let config = BreakpointsConfig {
            mobile: "(max-width: 767px)".to_string(),
            ..BreakpointsConfig::default()
        };
        let bp = Breakpoints::from_config(&config);
        assert_eq!(bp.mobile, MediaQuery::max_width(767));
        assert_eq!(bp.narrow_cards, MediaQuery::max_width(599));
    }
}
