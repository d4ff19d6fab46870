use chrono::NaiveDate;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};
use watchlist_models::{Platform, TitleRecord};

/// How one platform's watchlist DOM is read: a card selector group plus
/// an ordered title strategy (attribute, then nested element text, then
/// image alt text).
struct ExtractionRule {
    /// Selector group matching the per-title cards.
    cards: &'static str,
    /// Attribute on the card itself that carries the title, tried first.
    title_attr: Option<&'static str>,
    /// Selector group for title-bearing descendants, tried second.
    title_selectors: &'static str,
}

/// Platform DOMs churn constantly, so every group mixes stable class
/// names with substring fallbacks.
fn rule_for(platform: Platform) -> ExtractionRule {
    match platform {
        Platform::Netflix => ExtractionRule {
            cards: r#".title-card, .slider-item, [class*="title-card"]"#,
            title_attr: None,
            title_selectors: r#".fallback-text, .video-title, [class*="title"]"#,
        },
        Platform::PrimeVideo => ExtractionRule {
            cards: r#"[data-card-title], .av-hover-wrapper, [class*="card"]"#,
            title_attr: Some("data-card-title"),
            title_selectors: r#"[class*="title"], h3, h2"#,
        },
        Platform::Hulu => ExtractionRule {
            cards: r#"[class*="tile"], [class*="card"], [data-automationid*="card"]"#,
            title_attr: None,
            title_selectors: r#"[class*="title"], [class*="name"], h3, h2"#,
        },
        Platform::DisneyPlus => ExtractionRule {
            cards: r#"[data-testid*="set-item"], [class*="card"]"#,
            title_attr: None,
            title_selectors: r#"[class*="title"], [data-testid*="title"]"#,
        },
        Platform::AppleTv => ExtractionRule {
            cards: r#"[class*="shelf-grid-item"], [class*="canvas-lockup"], [class*="lockup"]"#,
            title_attr: None,
            title_selectors: r#"[class*="title"], [class*="label"], h3"#,
        },
        Platform::Max => ExtractionRule {
            cards: r#"[data-testid*="card"], [class*="tile"], [class*="card"]"#,
            title_attr: None,
            title_selectors: r#"[class*="title"], h3, h2"#,
        },
        Platform::Peacock => ExtractionRule {
            cards: r#"[data-testid*="tile"], [class*="tile"], [class*="card"]"#,
            title_attr: None,
            title_selectors: r#"[class*="title"], h3, h2"#,
        },
        Platform::ParamountPlus => ExtractionRule {
            cards: r#"[data-testid*="card"], [class*="tile"], [class*="card"]"#,
            title_attr: None,
            title_selectors: r#"[class*="title"], [aria-label], h3, h2"#,
        },
    }
}

/// Pull the titles out of a rendered watchlist page.
///
/// Duplicate titles collapse to their first occurrence, and cards whose
/// title comes out empty or as the literal placeholder "Unknown" are
/// skipped rather than exported.
pub fn extract_titles(platform: Platform, html: &str, extracted: NaiveDate) -> Vec<TitleRecord> {
    let rule = rule_for(platform);

    let Some(card_selector) = parse_selector(rule.cards) else {
        return Vec::new();
    };
    let title_selector = parse_selector(rule.title_selectors);
    let img_selector = parse_selector("img");

    let document = Html::parse_document(html);
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::new();

    for card in document.select(&card_selector) {
        let Some(title) = derive_title(&card, &rule, title_selector.as_ref(), img_selector.as_ref())
        else {
            continue;
        };
        if title.is_empty() || title == "Unknown" {
            continue;
        }
        if !seen.insert(title.clone()) {
            debug!(platform = platform.slug(), %title, "Skipping duplicate card");
            continue;
        }

        let image_url = img_selector
            .as_ref()
            .and_then(|sel| card.select(sel).next())
            .and_then(|img| img.value().attr("src"))
            .map(str::to_string);

        records.push(TitleRecord::new(title, platform, extracted).with_image_url(image_url));
    }

    records
}

fn parse_selector(group: &str) -> Option<Selector> {
    match Selector::parse(group) {
        Ok(selector) => Some(selector),
        Err(e) => {
            warn!("Invalid selector group {:?}: {:?}", group, e);
            None
        }
    }
}

fn derive_title(
    card: &ElementRef,
    rule: &ExtractionRule,
    title_selector: Option<&Selector>,
    img_selector: Option<&Selector>,
) -> Option<String> {
    if let Some(attr) = rule.title_attr {
        if let Some(value) = card.value().attr(attr) {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }

    if let Some(selector) = title_selector {
        for element in card.select(selector) {
            let text = element.text().collect::<String>();
            let text = text.trim();
            if !text.is_empty() {
                return Some(text.to_string());
            }
        }
    }

    if let Some(selector) = img_selector {
        for img in card.select(selector) {
            if let Some(alt) = img.value().attr("alt") {
                let alt = alt.trim();
                if !alt.is_empty() {
                    return Some(alt.to_string());
                }
            }
        }
    }

    None
}
