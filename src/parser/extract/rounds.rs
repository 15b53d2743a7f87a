use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::parser::dom::{self, non_empty, sel, text_of, IdIndex};
use crate::record::{Clue, Round};

pub const JEOPARDY_ROUND_ID: &str = "jeopardy_round";
pub const DOUBLE_JEOPARDY_ROUND_ID: &str = "double_jeopardy_round";

/// Prefix on the value cell of a Daily Double ("DD: $2,000").
pub const DAILY_DOUBLE_MARKER: &str = "DD:";

static CATEGORY_NAME: LazyLock<Selector> = LazyLock::new(|| sel("td.category_name"));
static ROW: LazyLock<Selector> = LazyLock::new(|| sel("tr"));
static CLUE_CELL: LazyLock<Selector> = LazyLock::new(|| sel("td.clue"));
static VALUE_CELL: LazyLock<Selector> = LazyLock::new(|| sel(r#"td[class*="clue_value"]"#));
static CLUE_TEXT: LazyLock<Selector> = LazyLock::new(|| sel("td.clue_text"));

static ASIDE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(.*?\)").unwrap());

/// Categories and clues of the round container `<div id={round_id}>`.
pub fn extract(doc: &Html, round_id: &str) -> Round {
    let Some(container) = dom::find_by_id(doc.root_element(), "div", round_id) else {
        return Round::default();
    };

    let categories: Vec<String> = container
        .select(&CATEGORY_NAME)
        .map(|cell| clean_category(&text_of(cell)))
        .collect();

    let ids = IdIndex::build(container);
    let mut clues = Vec::new();
    for row in container.select(&ROW) {
        // The column index binds a clue to its category, so it advances for
        // every cell, including the ones that yield nothing.
        for (index, cell) in dom::cells_of(row, &CLUE_CELL).enumerate() {
            if let Some(clue) = extract_clue(cell, index, &categories, &ids) {
                clues.push(clue);
            }
        }
    }

    Round { categories, clues }
}

/// Strip host asides: "POTENT POTABLES (Alex reads clue)" -> "POTENT POTABLES".
fn clean_category(raw: &str) -> String {
    let stripped = ASIDE_RE.replace_all(raw, "");
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn extract_clue(
    cell: ElementRef,
    index: usize,
    categories: &[String],
    ids: &IdIndex,
) -> Option<Clue> {
    let visible = cell
        .select(&CLUE_TEXT)
        .find(|text| !dom::is_hidden_twin(*text))?;
    let clue = non_empty(text_of(visible))?;

    let (value, daily_double) = cell
        .select(&VALUE_CELL)
        .next()
        .map(|v| parse_value(&text_of(v)))
        .unwrap_or((None, false));

    let answer = visible
        .value()
        .id()
        .and_then(|id| ids.hidden_twin(id))
        .and_then(dom::correct_response);

    Some(Clue {
        value,
        clue,
        answer,
        daily_double,
        category: categories.get(index).cloned(),
        category_index: index,
    })
}

fn parse_value(text: &str) -> (Option<String>, bool) {
    let text = text.trim();
    match text.strip_prefix(DAILY_DOUBLE_MARKER) {
        Some(wager) => (non_empty(wager.trim().to_string()), true),
        None => (non_empty(text.to_string()), false),
    }
}
