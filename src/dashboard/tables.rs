//! Table views for dashboard data display.

use maud::{Markup, html};

use crate::{
    expense::ExpenseTotal,
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_currency},
};

const AMOUNT_CELL_STYLE: &str = "px-6 py-4 text-right whitespace-nowrap";
const SUBCATEGORY_ROW_STYLE: &str = "bg-gray-50 dark:bg-gray-900 text-xs";
const SUBCATEGORY_NAME_CELL_STYLE: &str = "px-6 py-2 pl-12";
const SUBCATEGORY_AMOUNT_CELL_STYLE: &str = "px-6 py-2 text-right whitespace-nowrap";

/// Renders the category totals with each category's share of the grand total
/// and its subcategory breakdown.
pub(super) fn totals_table(totals: &[ExpenseTotal]) -> Markup {
    let grand_total: f64 = totals.iter().map(|total| total.total_amount).sum();

    html! {
        div
        {
            h3 class="text-xl font-semibold mb-4" { "Totals by Category" }

            div class="overflow-x-auto rounded-lg shadow"
            {
                table id="totals-table" class="w-full text-sm text-left text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Category" }
                            th scope="col" class="px-6 py-3 text-right" { "Total" }
                            th scope="col" class="px-6 py-3 text-right" { "Share" }
                        }
                    }

                    tbody
                    {
                        @for total in totals {
                            tr class=(TABLE_ROW_STYLE) data-category-id=(total.category_id)
                            {
                                th scope="row" class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                                {
                                    (total.category_name)
                                }
                                td class=(AMOUNT_CELL_STYLE) { (format_currency(total.total_amount)) }
                                td class=(AMOUNT_CELL_STYLE) { (format_percent(total.percent)) }
                            }

                            @for subcategory in &total.subcategory_totals {
                                tr class=(SUBCATEGORY_ROW_STYLE) data-subcategory-id=(subcategory.subcategory_id)
                                {
                                    td class=(SUBCATEGORY_NAME_CELL_STYLE) { (subcategory.subcategory_name) }
                                    td class=(SUBCATEGORY_AMOUNT_CELL_STYLE)
                                    {
                                        (format_currency(subcategory.total_amount))
                                    }
                                    td {}
                                }
                            }
                        }
                    }

                    tfoot
                    {
                        tr class="font-semibold text-gray-900 dark:text-white"
                        {
                            th scope="row" class=(TABLE_CELL_STYLE) { "Total" }
                            td class=(AMOUNT_CELL_STYLE) { (format_currency(grand_total)) }
                            td class=(AMOUNT_CELL_STYLE) { (format_percent(if totals.is_empty() { 0.0 } else { 100.0 })) }
                        }
                    }
                }
            }
        }
    }
}

fn format_percent(percent: f64) -> String {
    format!("{percent:.1}%")
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use crate::{
        dashboard::tables::totals_table,
        expense::{ExpenseTotal, SubcategoryTotal},
    };

    #[test]
    fn shows_share_and_subcategory_breakdown() {
        let totals = vec![ExpenseTotal {
            category_id: "c1".to_owned(),
            category_name: "Food".to_owned(),
            total_amount: 1234.5,
            percent: 100.0,
            subcategory_totals: vec![SubcategoryTotal {
                subcategory_id: "s1".to_owned(),
                subcategory_name: "Groceries".to_owned(),
                total_amount: 1000.0,
            }],
        }];

        let html = Html::parse_fragment(&totals_table(&totals).into_string());

        let row = html
            .select(&Selector::parse("tr[data-category-id=c1]").unwrap())
            .next()
            .expect("No row for category");
        let cells: Vec<String> = row
            .select(&Selector::parse("th, td").unwrap())
            .map(|cell| cell.text().collect::<String>().trim().to_owned())
            .collect();
        assert_eq!(cells, vec!["Food", "$1,234.50", "100.0%"]);

        let subcategory = html
            .select(&Selector::parse("tr[data-subcategory-id=s1]").unwrap())
            .next()
            .expect("No row for subcategory");
        assert!(subcategory.text().collect::<String>().contains("$1,000.00"));
    }
}
