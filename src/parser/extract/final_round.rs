use std::sync::LazyLock;

use scraper::{Html, Selector};

use crate::parser::dom::{self, non_empty, sel, text_of, IdIndex};
use crate::record::FinalClue;

pub const FINAL_ROUND_ID: &str = "final_jeopardy_round";
pub const FINAL_CLUE_ID: &str = "clue_FJ";

static CATEGORY_NAME: LazyLock<Selector> = LazyLock::new(|| sel("td.category_name"));

pub fn extract(doc: &Html) -> FinalClue {
    let Some(container) = dom::find_by_id(doc.root_element(), "div", FINAL_ROUND_ID) else {
        return FinalClue::default();
    };
    let ids = IdIndex::build(container);

    FinalClue {
        category: container
            .select(&CATEGORY_NAME)
            .next()
            .map(text_of)
            .and_then(non_empty),
        clue: ids.get(FINAL_CLUE_ID).map(text_of).and_then(non_empty),
        answer: ids
            .hidden_twin(FINAL_CLUE_ID)
            .and_then(dom::correct_response),
    }
}
