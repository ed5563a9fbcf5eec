use crate::markup::{Cell, TableStructure};

pub const STOCK_HEADER: &str = "Stock";
pub const DYE_LOT_HEADER: &str = "Dye Lot";

/// Column-oriented stock / dye-lot listing; both columns always have the
/// same length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockDyeLotTable {
    pub stock: Vec<String>,
    pub dye_lot: Vec<String>,
}

impl StockDyeLotTable {
    pub fn len(&self) -> usize {
        self.stock.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stock.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.stock
            .iter()
            .zip(&self.dye_lot)
            .map(|(s, d)| (s.as_str(), d.as_str()))
    }

    pub fn to_table(&self, class: &str) -> TableStructure {
        TableStructure {
            class: class.to_string(),
            header: Some(vec![STOCK_HEADER.to_string(), DYE_LOT_HEADER.to_string()]),
            rows: self
                .rows()
                .map(|(s, d)| vec![Cell::plain(s), Cell::plain(d)])
                .collect(),
        }
    }
}

/// One row per line, blank lines included, so no stock count goes missing.
/// `stock#lot` keeps the `#` on the dye-lot cell.
pub fn build_stock_dye_lot_table(text: &str) -> StockDyeLotTable {
    let mut table = StockDyeLotTable::default();
    for line in text.lines() {
        match line.split_once('#') {
            Some((stock, lot)) => {
                table.stock.push(stock.trim().to_string());
                table.dye_lot.push(format!("#{}", lot.trim()));
            }
            None => {
                table.stock.push(line.trim().to_string());
                table.dye_lot.push(String::new());
            }
        }
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_row_per_line_including_blanks() {
        let input = "5#A12\n\n3\n2 # B7 # x";
        let table = build_stock_dye_lot_table(input);
        assert_eq!(table.len(), input.lines().count());
        for (line, (_, lot)) in input.lines().zip(table.rows()) {
            assert_eq!(!lot.is_empty(), line.contains('#'));
        }
        assert_eq!(
            table.rows().collect::<Vec<_>>(),
            vec![("5", "#A12"), ("", ""), ("3", ""), ("2", "#B7 # x")]
        );
    }

    #[test]
    fn renders_with_stock_header() {
        let html = build_stock_dye_lot_table("5#A12\n3").to_table("product-table-pieces").to_html();
        assert_eq!(
            html,
            "<table class=\"product-table-pieces\">\n<tr><th>Stock</th><th>Dye Lot</th></tr>\n\
             <tr><td>5</td><td>#A12</td></tr>\n<tr><td>3</td><td></td></tr>\n</table>"
        );
    }

    #[test]
    fn empty_text_has_no_rows() {
        let table = build_stock_dye_lot_table("");
        assert!(table.is_empty());
        assert_eq!(table.to_table("c").rows.len(), 0);
    }
}
