pub mod contestants;
pub mod episode;
pub mod final_round;
pub mod rounds;
pub mod scores;

use scraper::Html;
use tracing::debug;

use crate::record::GameRecord;
use rounds::{DOUBLE_JEOPARDY_ROUND_ID, JEOPARDY_ROUND_ID};

/// Run every pass over the document. Passes are independent: each one
/// degrades to its own empty result and none reads another's output.
pub fn extract_all(game_id: u32, doc: &Html) -> GameRecord {
    let episode = episode::extract(doc);
    let contestants = contestants::extract(doc);
    let jeopardy_round = rounds::extract(doc, JEOPARDY_ROUND_ID);
    let double_jeopardy_round = rounds::extract(doc, DOUBLE_JEOPARDY_ROUND_ID);
    let final_jeopardy = final_round::extract(doc);
    let final_scores = scores::extract(doc);

    debug!(
        game_id,
        episode = ?episode.episode_number,
        contestants = contestants.len(),
        j_clues = jeopardy_round.clues.len(),
        dj_clues = double_jeopardy_round.clues.len(),
        final_scores = final_scores.len(),
        "extracted game"
    );

    GameRecord {
        game_id,
        episode_number: episode.episode_number,
        air_date: episode.air_date,
        contestants,
        jeopardy_round,
        double_jeopardy_round,
        final_jeopardy,
        final_scores,
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(fixture: &str) -> GameRecord {
        let html = std::fs::read_to_string(format!("tests/fixtures/{}.html", fixture)).unwrap();
        extract_all(9293, &Html::parse_document(&html))
    }

    #[test]
    fn full_game_metadata() {
        let g = parse("game_9416");
        assert_eq!(g.game_id, 9293);
        assert_eq!(g.episode_number.as_deref(), Some("9416"));
        assert_eq!(g.air_date.as_deref(), Some("Monday, October 20, 2025"));
        assert!(g.has_data());
    }

    #[test]
    fn full_game_contestants() {
        let g = parse("game_9416");
        let names: Vec<&str> = g.contestants.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Priya Natarajan", "Marcus Bell", "Elena Ruiz"]);
        assert_eq!(g.contestants[2].previous_winnings.as_deref(), Some("$61,200"));
        assert_eq!(
            g.contestants[1].description,
            "a high school history teacher from Tacoma, Washington"
        );
    }

    #[test]
    fn full_game_jeopardy_round() {
        let g = parse("game_9416");
        let r = &g.jeopardy_round;
        assert_eq!(r.categories, vec!["POTENT POTABLES", "U.S. CITIES", "BOOKS & AUTHORS"]);
        assert_eq!(r.clues.len(), 4);

        let dd: Vec<_> = r.clues.iter().filter(|c| c.daily_double).collect();
        assert_eq!(dd.len(), 1);
        assert_eq!(dd[0].value.as_deref(), Some("$1,000"));
        assert_eq!(dd[0].answer.as_deref(), Some("ouzo"));
        assert_eq!(dd[0].category.as_deref(), Some("POTENT POTABLES"));

        let beloved = &r.clues[3];
        assert_eq!(beloved.category_index, 2);
        assert_eq!(beloved.category.as_deref(), Some("BOOKS & AUTHORS"));
        assert_eq!(beloved.answer.as_deref(), Some("Beloved"));
    }

    #[test]
    fn full_game_double_and_final() {
        let g = parse("game_9416");
        assert_eq!(g.double_jeopardy_round.categories, vec!["SCIENCE", "OPERA"]);
        assert_eq!(g.double_jeopardy_round.clues.len(), 2);
        assert_eq!(g.double_jeopardy_round.clues[1].answer.as_deref(), Some("Aida"));

        assert_eq!(g.final_jeopardy.category.as_deref(), Some("WORLD CAPITALS"));
        assert_eq!(g.final_jeopardy.answer.as_deref(), Some("Canberra"));
    }

    #[test]
    fn full_game_final_scores() {
        let g = parse("game_9416");
        assert_eq!(g.final_scores.len(), 3);
        assert_eq!(g.final_scores[0].contestant, "Priya");
        assert_eq!(g.final_scores[0].final_score.as_deref(), Some("$21,600"));
        assert_eq!(g.final_scores[2].remarks.as_deref(), Some("3rd place: $2,000"));
    }

    #[test]
    fn extraction_is_idempotent() {
        let html = std::fs::read_to_string("tests/fixtures/game_9416.html").unwrap();
        let doc = Html::parse_document(&html);
        let first = serde_json::to_string(&extract_all(1, &doc)).unwrap();
        let second = serde_json::to_string(&extract_all(1, &doc)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn empty_page_still_yields_record() {
        let g = extract_all(7, &Html::parse_document("<html><body></body></html>"));
        assert_eq!(g.game_id, 7);
        assert!(g.contestants.is_empty());
        assert!(g.jeopardy_round.categories.is_empty());
        assert!(g.final_scores.is_empty());
        assert!(!g.has_data());
    }
}
