//! Turns the per-subcategory totals from the expense service into one total
//! per category with a subcategory breakdown and a share of the grand total.

use std::collections::HashMap;

use crate::expense::{ExpenseTotal, ExpenseTotalRow, SubcategoryTotal};

/// Stable sort of `rows` so that rows with the same category ID are adjacent.
///
/// Categories keep the order in which they first appear, so input that is
/// already grouped is left unchanged.
pub(crate) fn group_by_category<T, F>(rows: &mut [T], category_id: F)
where
    F: Fn(&T) -> &str,
{
    let mut first_seen: HashMap<String, usize> = HashMap::new();

    for row in rows.iter() {
        let next_position = first_seen.len();
        first_seen
            .entry(category_id(row).to_owned())
            .or_insert(next_position);
    }

    rows.sort_by_key(|row| first_seen[category_id(row)]);
}

/// Group `rows` by category and work out each category's share of the grand total.
///
/// Each row of a category adds its amount to the category's total, and rows
/// with a subcategory are listed in the subcategory breakdown. When the grand
/// total is zero every percentage is zero.
pub fn aggregate_totals(mut rows: Vec<ExpenseTotalRow>) -> Vec<ExpenseTotal> {
    group_by_category(&mut rows, |row| row.key.category_id.as_str());

    let mut totals: Vec<ExpenseTotal> = Vec::new();

    for row in rows {
        let starts_new_category = totals
            .last()
            .is_none_or(|total| total.category_id != row.key.category_id);

        if starts_new_category {
            totals.push(ExpenseTotal {
                category_id: row.key.category_id,
                category_name: row.category_name,
                total_amount: row.total_amount,
                percent: 0.0,
                subcategory_totals: Vec::new(),
            });
        } else if let Some(total) = totals.last_mut() {
            total.total_amount += row.total_amount;
        }

        if let (Some(subcategory_id), Some(total)) = (row.key.subcategory_id, totals.last_mut()) {
            total.subcategory_totals.push(SubcategoryTotal {
                subcategory_id,
                subcategory_name: row.subcategory_name.unwrap_or_default(),
                total_amount: row.total_amount,
            });
        }
    }

    let grand_total: f64 = totals.iter().map(|total| total.total_amount).sum();

    if grand_total != 0.0 {
        for total in &mut totals {
            total.percent = total.total_amount / grand_total * 100.0;
        }
    }

    totals
}
