// src/inventory/mod.rs
//
// Stock corrections after sample orders were pulled out of inventory.

use std::collections::{HashMap, HashSet};
use tracing::{info, warn};

use crate::error::{ProcessError, Result};
use crate::record::{Record, RecordSet, Value};

pub const COL_STOCK: &str = "Stock";
pub const COL_OLD_STOCK: &str = "Old Stock";
pub const COL_ORDER_QTY: &str = "Order Qty";
pub const COL_QUANTITY: &str = "Quantity";
pub const COL_ORDER_NUMBER: &str = "Order Number";
pub const COL_ITEM_NAME: &str = "Item Name";

pub const SAMPLE_PREFIX: &str = "Sample";

/// Keep the orders whose `column` text starts with `prefix`.
pub fn filter_sample_orders(orders: RecordSet, column: &str, prefix: &str) -> RecordSet {
    orders
        .into_iter()
        .filter(|o| o.get_text(column).is_some_and(|name| name.starts_with(prefix)))
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciliation {
    /// Inventory rows touched by at least one order, in first-touched order.
    pub updated: RecordSet,
    /// SKUs that appear on more than one order line.
    pub duplicate_skus: Vec<String>,
}

/// Add each order's quantity back onto the matching inventory stock.
///
/// The first order for a SKU records `Old Stock` and starts `Order Qty`;
/// later ones append `;<qty>`.
pub fn reconcile(inventory: &[Record], orders: &[Record]) -> Result<Reconciliation> {
    // 1) normalized stock per inventory row
    let mut stock = inventory
        .iter()
        .map(|row| parse_count(row, COL_STOCK, true))
        .collect::<Result<Vec<i64>>>()?;

    // 2) inventory rows by SKU, order lines per SKU
    let mut by_sku: HashMap<String, Vec<usize>> = HashMap::new();
    for (i, row) in inventory.iter().enumerate() {
        by_sku.entry(row.sku()).or_default().push(i);
    }
    let mut order_lines: HashMap<String, usize> = HashMap::new();
    for order in orders {
        *order_lines.entry(order.sku()).or_default() += 1;
    }

    // 3) apply orders
    let mut old_stock: HashMap<usize, i64> = HashMap::new();
    let mut order_qty: HashMap<usize, Vec<String>> = HashMap::new();
    let mut touched: Vec<usize> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut duplicate_skus = Vec::new();

    for order in orders {
        let sku = order.sku();
        let Some(rows) = by_sku.get(&sku) else {
            continue;
        };
        let qty = parse_count(order, COL_QUANTITY, false)?;
        let first_time = seen.insert(sku.clone());

        for &i in rows {
            if first_time {
                old_stock.insert(i, stock[i]);
                touched.push(i);
            }
            order_qty.entry(i).or_default().push(qty.to_string());
            stock[i] += qty;
        }

        if first_time && order_lines.get(&sku).copied().unwrap_or(0) > 1 {
            let order_number = order.get(COL_ORDER_NUMBER).map(Value::to_string);
            warn!(
                sku = %sku,
                order = %order_number.unwrap_or_default(),
                "SKU found on more than one order line"
            );
            duplicate_skus.push(sku);
        }
    }

    // 4) final state of every touched row
    let updated: RecordSet = touched
        .iter()
        .map(|&i| {
            let mut row = inventory[i].clone();
            row.insert(COL_STOCK, Value::Number(stock[i] as f64));
            row.insert(COL_OLD_STOCK, Value::Number(old_stock[&i] as f64));
            row.insert(COL_ORDER_QTY, Value::Text(order_qty[&i].join(";")));
            row
        })
        .collect();

    info!(
        orders = orders.len(),
        updated = updated.len(),
        "reconciled inventory"
    );
    Ok(Reconciliation {
        updated,
        duplicate_skus,
    })
}

/// Whole-number cell. Stray `'` are dropped; with `blank_is_zero` an empty
/// cell counts as 0.
fn parse_count(record: &Record, column: &str, blank_is_zero: bool) -> Result<i64> {
    let value = record.get(column).cloned().unwrap_or(Value::Empty);
    let fail = || ProcessError::NumericParse {
        column: column.to_string(),
        sku: record.sku(),
        raw: value.to_string(),
    };
    match &value {
        Value::Number(n) if n.fract() == 0.0 && n.is_finite() => Ok(*n as i64),
        Value::Number(_) => Err(fail()),
        Value::Empty if blank_is_zero => Ok(0),
        Value::Empty => Err(fail()),
        Value::Text(s) => {
            let cleaned = s.replace('\'', "");
            let cleaned = cleaned.trim();
            if cleaned.is_empty() {
                return if blank_is_zero { Ok(0) } else { Err(fail()) };
            }
            cleaned.parse::<i64>().map_err(|_| fail())
        }
    }
}
