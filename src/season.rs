use std::collections::BTreeSet;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use scraper::{Html, Selector};
use tracing::info;

use crate::fetcher::Fetcher;
use crate::parser::dom::sel;

static GAME_LINK: LazyLock<Selector> = LazyLock::new(|| sel(r#"a[href*="showgame.php"]"#));
static GAME_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"game_id=(\d+)").unwrap());

/// Fetch a season page and return the ids of every game it links to.
pub async fn fetch_game_ids(fetcher: &Fetcher, season_url: &str) -> Result<Vec<u32>> {
    info!("Fetching season page: {}", season_url);
    let html = fetcher
        .get(season_url)
        .await
        .with_context(|| format!("Failed to fetch season page {season_url}"))?;

    let ids = game_ids(&html);
    info!("Found {} games in this season", ids.len());
    Ok(ids)
}

/// Unique game ids linked from a season page, ascending.
pub fn game_ids(html: &str) -> Vec<u32> {
    let doc = Html::parse_document(html);
    doc.select(&GAME_LINK)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| GAME_ID_RE.captures(href)?[1].parse().ok())
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}
