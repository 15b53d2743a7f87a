pub mod dom;
pub mod extract;

use scraper::Html;

use crate::record::GameRecord;

/// Parse a fetched game page and run every extraction pass over it.
pub fn parse_game(game_id: u32, body: &str) -> GameRecord {
    let doc = Html::parse_document(body);
    extract::extract_all(game_id, &doc)
}
