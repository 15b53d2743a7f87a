use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use crate::parser::dom::{self, sel, text_of};
use crate::record::ScoreEntry;

/// Text of the `<h3>` that precedes the final scores table.
pub const FINAL_SCORES_MARKER: &str = "Final scores";

static HEADING_OR_TABLE: LazyLock<Selector> = LazyLock::new(|| sel("h3, table"));
static NICKNAME: LazyLock<Selector> = LazyLock::new(|| sel("td.score_player_nickname"));
static POSITIVE: LazyLock<Selector> = LazyLock::new(|| sel("td.score_positive"));
static REMARKS: LazyLock<Selector> = LazyLock::new(|| sel("td.score_remarks"));

/// Names, scores and remarks are separate rows, zipped by position.
pub fn extract(doc: &Html) -> Vec<ScoreEntry> {
    let Some(table) = scores_table(doc) else {
        return Vec::new();
    };

    let rows: Vec<ElementRef> = dom::rows_of(table).take(3).collect();
    let column = |row: usize, selector: &Selector| -> Vec<String> {
        rows.get(row)
            .map(|r| r.select(selector).map(text_of).collect())
            .unwrap_or_default()
    };

    let names = column(0, &NICKNAME);
    let scores = column(1, &POSITIVE);
    let remarks = column(2, &REMARKS);

    names
        .into_iter()
        .enumerate()
        .map(|(i, contestant)| ScoreEntry {
            contestant,
            final_score: scores.get(i).cloned(),
            remarks: remarks.get(i).cloned(),
        })
        .collect()
}

/// First table after the first "Final scores" heading, in document order.
fn scores_table(doc: &Html) -> Option<ElementRef> {
    let mut after_heading = false;
    for el in doc.select(&HEADING_OR_TABLE) {
        match el.value().name() {
            "h3" if !after_heading && text_of(el).contains(FINAL_SCORES_MARKER) => {
                after_heading = true;
            }
            "table" if after_heading => return Some(el),
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(tables: &str) -> Html {
        Html::parse_document(&format!("<html><body>{tables}</body></html>"))
    }

    const THIRDS: &str = r#"
        <h3>Scores at the end of the Double Jeopardy! Round:</h3>
        <table><tr><td class="score_player_nickname">Wrong</td></tr></table>
        <h3>Final scores:</h3>
        <table>
          <tr>
            <td class="score_player_nickname">Jane</td>
            <td class="score_player_nickname">Bob</td>
            <td class="score_player_nickname">Ann</td>
          </tr>
          <tr>
            <td class="score_positive">$20,400</td>
            <td class="score_positive">$9,000</td>
            <td class="score_negative">-$200</td>
          </tr>
        </table>"#;

    #[test]
    fn shorter_columns_omit_fields() {
        let s = extract(&page(THIRDS));
        assert_eq!(s.len(), 3);
        assert_eq!(s[0].contestant, "Jane");
        assert_eq!(s[0].final_score.as_deref(), Some("$20,400"));
        assert_eq!(s[1].final_score.as_deref(), Some("$9,000"));
        assert_eq!(s[2].contestant, "Ann");
        assert_eq!(s[2].final_score, None);
        assert!(s.iter().all(|e| e.remarks.is_none()));
    }

    #[test]
    fn remarks_row_and_extra_rows() {
        let s = extract(&page(
            r#"<h3>Final scores:</h3>
               <table>
                 <tr><td class="score_player_nickname">Jane</td><td class="score_player_nickname">Bob</td></tr>
                 <tr><td class="score_positive">$20,400</td><td class="score_positive">$9,000</td></tr>
                 <tr><td class="score_remarks">New champion: $20,400</td><td class="score_remarks">2nd place: $3,000</td></tr>
                 <tr><td class="score_remarks">ignored</td></tr>
               </table>"#,
        ));
        assert_eq!(s[0].remarks.as_deref(), Some("New champion: $20,400"));
        assert_eq!(s[1].remarks.as_deref(), Some("2nd place: $3,000"));
    }

    #[test]
    fn first_heading_wins() {
        let s = extract(&page(
            r#"<h3>Final scores:</h3>
               <table><tr><td class="score_player_nickname">First</td></tr></table>
               <h3>Final scores (again)</h3>
               <table><tr><td class="score_player_nickname">Second</td></tr></table>"#,
        ));
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].contestant, "First");
    }

    #[test]
    fn no_heading_no_scores() {
        assert!(extract(&page("<table><tr><td class=\"score_player_nickname\">X</td></tr></table>")).is_empty());
    }
}
