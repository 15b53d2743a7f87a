use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// "Monday, October 20, 2025"
pub const AIR_DATE_FORMAT: &str = "%A, %B %-d, %Y";

/// Parse an `air_date` back into a date. The weekday is not checked.
pub fn parse_air_date(air_date: &str) -> Option<NaiveDate> {
    let (_weekday, rest) = air_date.trim().split_once(", ")?;
    NaiveDate::parse_from_str(rest, "%B %d, %Y").ok()
}

/// One scraped game. Field order is the persisted JSON order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: u32,
    pub episode_number: Option<String>,
    pub air_date: Option<String>,
    pub contestants: Vec<Contestant>,
    pub jeopardy_round: Round,
    pub double_jeopardy_round: Round,
    pub final_jeopardy: FinalClue,
    pub final_scores: Vec<ScoreEntry>,
}

impl GameRecord {
    /// Whether the page yielded anything worth saving. Applied by the drivers;
    /// the extraction passes never consult it.
    pub fn has_data(&self) -> bool {
        self.episode_number.is_some()
            || !self.contestants.is_empty()
            || !self.jeopardy_round.clues.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contestant {
    pub name: String,
    pub description: String,
    pub previous_winnings: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Round {
    pub categories: Vec<String>,
    pub clues: Vec<Clue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clue {
    pub value: Option<String>,
    pub clue: String,
    pub answer: Option<String>,
    pub daily_double: bool,
    /// `None` when the column has no matching category cell.
    pub category: Option<String>,
    pub category_index: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FinalClue {
    pub category: Option<String>,
    pub clue: Option<String>,
    pub answer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub contestant: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}
