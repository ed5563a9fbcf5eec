use crate::markup::{Cell, CellRole, TableStructure};
use crate::text::capitalize_words;

/// Turn `label: value` / bare lines into a headerless detail table.
/// Blank lines are dropped; only the first colon separates label from value.
pub fn build_product_table(text: &str, class: &str) -> TableStructure {
    let rows = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| match line.split_once(':') {
            Some((label, value)) => vec![
                Cell::new(CellRole::Label, capitalize_words(label.trim())),
                Cell::new(CellRole::Value, capitalize_words(value.trim())),
            ],
            None => vec![
                Cell::new(CellRole::Item, capitalize_words(line.trim())),
                Cell::plain(""),
            ],
        })
        .collect();

    TableStructure {
        class: class.to_string(),
        header: None,
        rows,
    }
}
