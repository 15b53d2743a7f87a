use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::parser::dom::{sel, text_of};
use crate::record::Contestant;

static TABLE: LazyLock<Selector> = LazyLock::new(|| sel("table"));
static PLAYER_LINK: LazyLock<Selector> = LazyLock::new(|| sel(r#"a[href*="showplayer.php"]"#));
static WINNINGS_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$[\d,]+").unwrap());

/// Contestants from the player links of the first table on the page.
pub fn extract(doc: &Html) -> Vec<Contestant> {
    let Some(table) = doc.select(&TABLE).next() else {
        return Vec::new();
    };
    table.select(&PLAYER_LINK).map(contestant).collect()
}

fn contestant(link: ElementRef) -> Contestant {
    let name = text_of(link);
    let enclosing = link
        .parent()
        .and_then(ElementRef::wrap)
        .map(text_of)
        .unwrap_or_default();

    Contestant {
        description: description(&enclosing, &name),
        previous_winnings: WINNINGS_RE.find(&enclosing).map(|m| m.as_str().to_string()),
        name,
    }
}

/// Text after the name, up to the first `[` (bracketed notes follow the bio).
fn description(enclosing: &str, name: &str) -> String {
    let Some(pos) = enclosing.find(name) else {
        return String::new();
    };
    let rest = enclosing[pos + name.len()..].trim_start();
    let rest = rest.strip_prefix(',').unwrap_or(rest);
    rest.split('[').next().unwrap_or_default().trim().to_string()
}
