//! Card gallery pages (bread menu, rooms, ...).
//!
//! The heading and description come from the catalog
//! (`pages.<slug>.title` / `pages.<slug>.description`); the markdown body, if
//! any, becomes a notice banner above the cards.

use super::layout::PageMeta;
use super::{RenderContext, image};
use crate::types::{CardEntry, ImageRef};
use maud::{Markup, PreEscaped, html};
use serde::{Deserialize, Serialize};

/// Props for [`cards_page_template`], resolved from `cards-page` frontmatter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CardsPageProps {
    pub slug: String,
    /// Trusted HTML for the banner. Empty means no banner.
    pub content: String,
    pub main_image: ImageRef,
    pub main_image_active: bool,
    pub cards: Vec<CardEntry>,
}

/// Head overrides from the page's catalog entries.
pub fn page_meta(ctx: &RenderContext, slug: &str) -> PageMeta {
    PageMeta {
        title: ctx.i18n.lookup(&format!("pages.{slug}.title")).map(str::to_string),
        description: ctx
            .i18n
            .lookup(&format!("pages.{slug}.description"))
            .map(str::to_string),
    }
}

pub fn cards_page_template(ctx: &RenderContext, props: &CardsPageProps) -> Markup {
    let meta = page_meta(ctx, &props.slug);
    let title = meta.title.unwrap_or_default();
    let description = meta.description.unwrap_or_default();
    let single_column = ctx.matches(&ctx.breakpoints.narrow_cards);

    html! {
        div.container.content-container {
            section.cards-intro {
                h1 { (title) }
                p { (description) }
                @if !props.content.trim().is_empty() {
                    div.message.message-yellow.message-big.cards-banner {
                        (PreEscaped(&props.content))
                    }
                }
                @if props.main_image_active {
                    div.cards-hero {
                        (image(&props.main_image, &title, Some("cards-hero-image")))
                    }
                }
            }
            @if single_column {
                div.cards-single {
                    @for card in &props.cards {
                        (card_tile(card, true))
                    }
                }
            } @else {
                div.card-grid.doubling.columns-5 {
                    @for card in &props.cards {
                        div.grid-column { (card_tile(card, false)) }
                    }
                }
            }
        }
    }
}

fn card_tile(card: &CardEntry, fluid: bool) -> Markup {
    html! {
        article.card.fluid[fluid] data-key=(card.image.src()) {
            (image(&card.image, &card.title, Some("card-image")))
            div.card-content {
                h3.card-header { (card.title) }
                @if !card.description.is_empty() {
                    p.card-description { (card.description) }
                }
            }
        }
    }
}
