use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use scraper::{Html, Selector};

use crate::parser::dom::{sel, text_of};
use crate::record::AIR_DATE_FORMAT;

static H1: LazyLock<Selector> = LazyLock::new(|| sel("h1"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| sel("title"));

static SHOW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Show #(\d+) - (.+)").unwrap());
static GAME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[Gg]ame #(\d+) - (.+)").unwrap());
static DATED_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r" - ([A-Z][a-z]+day, [A-Z][a-z]+ \d+, \d{4})").unwrap()
});
static TITLE_SHOW_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"Show #(\d+)").unwrap());
static AIRED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"aired (\d{4}-\d{2}-\d{2})").unwrap());

#[derive(Debug, Default, PartialEq)]
pub struct EpisodeInfo {
    pub episode_number: Option<String>,
    pub air_date: Option<String>,
}

type Matcher = fn(&str) -> Option<EpisodeInfo>;

/// Tried in order against the `<h1>` text; the site has used each of these.
const HEADING_MATCHERS: &[Matcher] = &[show_heading, game_heading, dated_heading];

/// Tried in order against `<title>` when no heading matcher fires.
const TITLE_MATCHERS: &[Matcher] = &[show_title, aired_title];

pub fn extract(doc: &Html) -> EpisodeInfo {
    let heading = doc.select(&H1).next().map(text_of);
    let title = doc.select(&TITLE).next().map(text_of);

    heading
        .as_deref()
        .and_then(|h| first_match(HEADING_MATCHERS, h))
        .or_else(|| title.as_deref().and_then(|t| first_match(TITLE_MATCHERS, t)))
        .unwrap_or_default()
}

fn first_match(matchers: &[Matcher], text: &str) -> Option<EpisodeInfo> {
    matchers.iter().find_map(|m| m(text))
}

fn numbered(re: &Regex, text: &str) -> Option<EpisodeInfo> {
    let caps = re.captures(text)?;
    Some(EpisodeInfo {
        episode_number: Some(caps[1].to_string()),
        air_date: Some(caps[2].trim().to_string()),
    })
}

/// "Show #9416 - Monday, October 20, 2025"
fn show_heading(text: &str) -> Option<EpisodeInfo> {
    numbered(&SHOW_RE, text)
}

/// "Jeopardy! Masters game #21 - Wednesday, May 1, 2024"
fn game_heading(text: &str) -> Option<EpisodeInfo> {
    numbered(&GAME_RE, text)
}

fn dated_heading(text: &str) -> Option<EpisodeInfo> {
    let caps = DATED_RE.captures(text)?;
    Some(EpisodeInfo {
        episode_number: None,
        air_date: Some(caps[1].trim().to_string()),
    })
}

/// "J! Archive - Show #9416, aired 2025-10-20"
fn show_title(text: &str) -> Option<EpisodeInfo> {
    let caps = TITLE_SHOW_RE.captures(text)?;
    Some(EpisodeInfo {
        episode_number: Some(caps[1].to_string()),
        air_date: aired_date(text),
    })
}

fn aired_title(text: &str) -> Option<EpisodeInfo> {
    Some(EpisodeInfo {
        episode_number: None,
        air_date: Some(aired_date(text)?),
    })
}

/// `aired YYYY-MM-DD` reformatted to the long air-date form.
fn aired_date(text: &str) -> Option<String> {
    let caps = AIRED_RE.captures(text)?;
    let date = NaiveDate::parse_from_str(&caps[1], "%Y-%m-%d").ok()?;
    Some(date.format(AIR_DATE_FORMAT).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(title: &str, h1: &str) -> Html {
        Html::parse_document(&format!(
            "<html><head><title>{title}</title></head><body><h1>{h1}</h1></body></html>"
        ))
    }

    #[test]
    fn show_heading_wins() {
        let info = extract(&doc(
            "J! Archive - Show #1, aired 2000-01-01",
            "Show #9416 - Monday, October 20, 2025",
        ));
        assert_eq!(info.episode_number.as_deref(), Some("9416"));
        assert_eq!(info.air_date.as_deref(), Some("Monday, October 20, 2025"));
    }

    #[test]
    fn special_game_heading() {
        let info = extract(&doc("", "Jeopardy! Masters game #21 - Wednesday, May 1, 2024"));
        assert_eq!(info.episode_number.as_deref(), Some("21"));
        assert_eq!(info.air_date.as_deref(), Some("Wednesday, May 1, 2024"));
    }

    #[test]
    fn date_only_heading() {
        let info = extract(&doc("", "Celebrity Jeopardy! - Sunday, January 8, 2023"));
        assert_eq!(info.episode_number, None);
        assert_eq!(info.air_date.as_deref(), Some("Sunday, January 8, 2023"));
    }

    #[test]
    fn title_show_with_iso_date() {
        let info = extract(&doc("J! Archive - Show #9416, aired 2025-10-20", "Unrecognized"));
        assert_eq!(info.episode_number.as_deref(), Some("9416"));
        assert_eq!(info.air_date.as_deref(), Some("Monday, October 20, 2025"));
    }

    #[test]
    fn title_show_without_date() {
        let info = extract(&doc("J! Archive - Show #9416", "Unrecognized"));
        assert_eq!(info.episode_number.as_deref(), Some("9416"));
        assert_eq!(info.air_date, None);
    }

    #[test]
    fn title_iso_date_only() {
        let info = extract(&doc("J! Archive - game aired 2024-05-01 in primetime", "nothing here"));
        assert_eq!(info.episode_number, None);
        assert_eq!(info.air_date.as_deref(), Some("Wednesday, May 1, 2024"));
    }

    #[test]
    fn invalid_iso_date_is_unknown() {
        let info = extract(&doc("J! Archive - aired 2024-13-45", "nothing"));
        assert_eq!(info, EpisodeInfo::default());
    }

    #[test]
    fn nothing_matches() {
        let info = extract(&Html::parse_document("<html><body><p>empty</p></body></html>"));
        assert_eq!(info, EpisodeInfo::default());
    }
}
