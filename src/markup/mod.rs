// src/markup/mod.rs
pub mod pieces;
pub mod product;

use std::fmt;

pub use pieces::{build_stock_dye_lot_table, StockDyeLotTable};
pub use product::build_product_table;

/// Presentation role of a cell, rendered as its `class` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellRole {
    Label,
    Value,
    Item,
}

impl fmt::Display for CellRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CellRole::Label => "label",
            CellRole::Value => "value",
            CellRole::Item => "item",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub role: Option<CellRole>,
    pub text: String,
}

impl Cell {
    pub fn new(role: CellRole, text: impl Into<String>) -> Self {
        Self {
            role: Some(role),
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            role: None,
            text: text.into(),
        }
    }
}

/// A rendered-on-demand HTML table. When `header` is set, every row holds
/// exactly as many cells as the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStructure {
    pub class: String,
    pub header: Option<Vec<String>>,
    pub rows: Vec<Vec<Cell>>,
}

impl TableStructure {
    pub fn to_html(&self) -> String {
        let mut html = format!("<table class=\"{}\">\n", self.class);
        match &self.header {
            Some(header) => {
                // grid layout: one line per row
                html.push_str("<tr>");
                for label in header {
                    html.push_str(&format!("<th>{}</th>", label));
                }
                html.push_str("</tr>\n");
                for row in &self.rows {
                    html.push_str("<tr>");
                    for cell in row {
                        html.push_str(&format!("<td>{}</td>", cell.text));
                    }
                    html.push_str("</tr>\n");
                }
            }
            None => {
                // detail list layout: one line per cell
                for row in &self.rows {
                    html.push_str("<tr>\n");
                    for cell in row {
                        match cell.role {
                            Some(role) => html
                                .push_str(&format!("<td class=\"{}\">{}</td>\n", role, cell.text)),
                            None => html.push_str(&format!("<td>{}</td>\n", cell.text)),
                        }
                    }
                    html.push_str("</tr>\n");
                }
            }
        }
        html.push_str("</table>");
        html
    }
}

/// Wrap a rendered block in the presentation container.
pub fn wrap_container(class: &str, body: &str) -> String {
    format!("<div class=\"{}\">{}</div>", class, body)
}
