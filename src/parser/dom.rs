use std::collections::HashMap;
use std::sync::LazyLock;

use scraper::{ElementRef, Selector};

/// Suffix that turns a visible clue node's id into its hidden twin's id.
pub const HIDDEN_SUFFIX: &str = "_r";

static WITH_ID: LazyLock<Selector> = LazyLock::new(|| sel("[id]"));
static ROW: LazyLock<Selector> = LazyLock::new(|| sel("tr"));
static CORRECT_RESPONSE: LazyLock<Selector> = LazyLock::new(|| sel("em.correct_response"));

/// Compile a constant selector. Only call with literal CSS.
pub fn sel(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Visible text of an element: fragments concatenated, whitespace collapsed.
pub fn text_of(el: ElementRef) -> String {
    let raw: String = el.text().collect();
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn non_empty(s: String) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// Nearest ancestor element with the given tag name.
pub fn closest<'a>(el: ElementRef<'a>, tag: &str) -> Option<ElementRef<'a>> {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .find(|a| a.value().name() == tag)
}

/// First descendant of `root` with this tag and id.
pub fn find_by_id<'a>(root: ElementRef<'a>, tag: &str, id: &str) -> Option<ElementRef<'a>> {
    root.select(&WITH_ID)
        .find(|el| el.value().name() == tag && el.value().id() == Some(id))
}

/// Rows belonging to `table` itself, skipping rows of nested tables.
pub fn rows_of<'a>(table: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> + 'a {
    let table_id = table.id();
    table
        .select(&ROW)
        .filter(move |row| closest(*row, "table").map(|t| t.id()) == Some(table_id))
}

/// Cells matching `selector` whose nearest row is `row`, in column order.
pub fn cells_of<'a, 'b>(
    row: ElementRef<'a>,
    selector: &'b Selector,
) -> impl Iterator<Item = ElementRef<'a>> + 'b
where
    'a: 'b,
{
    let row_id = row.id();
    row.select(selector)
        .filter(move |cell| closest(*cell, "tr").map(|r| r.id()) == Some(row_id))
}

pub fn is_hidden_twin(el: ElementRef) -> bool {
    el.value()
        .id()
        .is_some_and(|id| id.ends_with(HIDDEN_SUFFIX))
}

/// Text of the `em.correct_response` nested anywhere inside `el`.
pub fn correct_response(el: ElementRef) -> Option<String> {
    el.select(&CORRECT_RESPONSE)
        .next()
        .map(text_of)
        .and_then(non_empty)
}

/// Elements of a subtree keyed by their `id` attribute. The first element
/// wins when an id is duplicated.
pub struct IdIndex<'a> {
    by_id: HashMap<&'a str, ElementRef<'a>>,
}

impl<'a> IdIndex<'a> {
    pub fn build(root: ElementRef<'a>) -> Self {
        let mut by_id = HashMap::new();
        for el in root.select(&WITH_ID) {
            if let Some(id) = el.value().id() {
                by_id.entry(id).or_insert(el);
            }
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<ElementRef<'a>> {
        self.by_id.get(id).copied()
    }

    /// The hidden node paired with a visible node id (`<id>_r`).
    pub fn hidden_twin(&self, visible_id: &str) -> Option<ElementRef<'a>> {
        self.get(&format!("{visible_id}{HIDDEN_SUFFIX}"))
    }
}
