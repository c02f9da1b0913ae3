//! Contact segment and site footer.

use super::{RenderContext, image};
use chrono::{Datelike, Local, NaiveDate};
use maud::{Markup, html};

/// Source of "today" for the copyright line.
pub trait Clock: Sync {
    fn today(&self) -> NaiveDate;

    fn current_year(&self) -> i32 {
        self.today().year()
    }
}

/// The machine's local date.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// A fixed date, for reproducible builds and tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Rendered after the page content on every page.
///
/// The back-to-top link evaluates the mobile breakpoint itself rather than
/// reusing the layout's decision.
pub fn app_footer(ctx: &RenderContext) -> Markup {
    let site = &ctx.config.site;
    let title = ctx.i18n.t_or("site.title", &site.title);
    let phone = ctx.i18n.t_or("site.phone", &site.phone);
    let address = ctx.i18n.t_or("site.address", &site.address);
    let tel = site.tel_href();
    let show_back_to_top = ctx.is_mobile();

    html! {
        section.contact-segment {
            div.container {
                h2 { (ctx.i18n.t("headings.contact-us")) }
                a.button.call-button href=(tel) {
                    span.icon-phone aria-hidden="true" { "☎" }
                    " " (phone)
                }
                div.segment.contact-message { (ctx.i18n.t("topics.contact-us.message")) }
            }
        }
        footer.site-footer {
            @if show_back_to_top {
                span.back-to-top {
                    a href="#top" aria-label=(ctx.i18n.t_or("footer.back-to-top", "Back to top")) { "↑" }
                }
            }
            div.container.footer-content {
                a.logo-link href=(ctx.page_href(None)) {
                    (image(ctx.logo, &title, Some("footer-logo")))
                }
                address.footer-list {
                    div { a href=(site.gmap) { (address) } }
                    div { a href=(tel) { (phone) } }
                    div.copyright { "© " (ctx.clock.current_year()) " " (title) }
                }
            }
        }
    }
}
