//! The date range and category filter applied by the expense service before
//! it lists or aggregates expenses.

use maud::{Markup, html};
use serde::Deserialize;
use time::{
    Date, Duration, format_description::BorrowedFormatItem, macros::format_description,
};

use crate::{
    Error,
    api::QueryPairs,
    category::{CategoryId, CategorySelectItem},
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
};

/// The canonical date format used in forms and when talking to the expense service.
pub(crate) const ISO_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Number of days covered by the default filter when no dates are given.
const DEFAULT_PERIOD_DAYS: i64 = 365;

/// Filters applied server-side: an optional date range and category IDs.
///
/// An empty `category_ids` means "all categories".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseFilter {
    /// The first day to include.
    pub start_date: Option<Date>,
    /// The last day to include.
    pub end_date: Option<Date>,
    /// Only include expenses in these categories.
    pub category_ids: Vec<CategoryId>,
}

impl ExpenseFilter {
    /// A filter covering the year up to and including `today`.
    pub fn last_year(today: Date) -> Self {
        Self {
            start_date: Some(today - Duration::days(DEFAULT_PERIOD_DAYS)),
            end_date: Some(today),
            category_ids: Vec::new(),
        }
    }

    /// The query parameters for the expense endpoints: `startDate`, `endDate`
    /// and one `categoryIds[]` pair per category.
    pub(crate) fn query_pairs(&self) -> QueryPairs {
        let mut pairs = self.date_query_pairs();

        for category_id in &self.category_ids {
            pairs.push(("categoryIds[]", category_id.clone()));
        }

        pairs
    }

    /// The query parameters for endpoints that only filter by date.
    pub(crate) fn date_query_pairs(&self) -> QueryPairs {
        let mut pairs = Vec::new();

        if let Some(start_date) = self.start_date {
            pairs.push(("startDate", format_iso_date(start_date)));
        }

        if let Some(end_date) = self.end_date {
            pairs.push(("endDate", format_iso_date(end_date)));
        }

        pairs
    }
}

/// The filter as submitted by the filter forms in the browser.
///
/// Empty date inputs arrive as empty strings.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct FilterForm {
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    #[serde(default)]
    pub category_ids: Vec<CategoryId>,
}

impl FilterForm {
    /// Validate the form, falling back to `default` when neither date is set.
    pub(crate) fn into_filter(self, default: ExpenseFilter) -> Result<ExpenseFilter, Error> {
        let start_date = parse_optional_date(&self.start_date)?;
        let end_date = parse_optional_date(&self.end_date)?;
        let category_ids = self
            .category_ids
            .into_iter()
            .filter(|id| !id.trim().is_empty())
            .collect();

        if start_date.is_none() && end_date.is_none() {
            return Ok(ExpenseFilter {
                category_ids,
                ..default
            });
        }

        Ok(ExpenseFilter {
            start_date,
            end_date,
            category_ids,
        })
    }
}

pub(crate) fn parse_iso_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), ISO_DATE_FORMAT).map_err(|_| Error::InvalidDate(text.to_owned()))
}

fn parse_optional_date(text: &str) -> Result<Option<Date>, Error> {
    if text.trim().is_empty() {
        Ok(None)
    } else {
        parse_iso_date(text).map(Some)
    }
}

pub(crate) fn format_iso_date(date: Date) -> String {
    // Formatting a calendar date with numeric components cannot fail.
    date.format(ISO_DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}

/// The link to `path` with `filter` as the query string of a filter form.
pub(crate) fn filtered_url(path: &str, filter: &ExpenseFilter) -> String {
    let mut pairs: Vec<(&str, String)> = Vec::new();

    if let Some(start_date) = filter.start_date {
        pairs.push(("start_date", format_iso_date(start_date)));
    }

    if let Some(end_date) = filter.end_date {
        pairs.push(("end_date", format_iso_date(end_date)));
    }

    for category_id in &filter.category_ids {
        pairs.push(("category_ids", category_id.clone()));
    }

    match serde_urlencoded::to_string(&pairs) {
        Ok(query) if !query.is_empty() => format!("{path}?{query}"),
        Ok(_) => path.to_owned(),
        Err(error) => {
            tracing::error!("Could not encode filter {filter:?}: {error}");
            path.to_owned()
        }
    }
}

/// A form that reloads the page at `action` with a new filter.
///
/// The category select is only shown when `categories` is given.
pub(crate) fn filter_form_view(
    action: &str,
    filter: &ExpenseFilter,
    categories: Option<&[CategorySelectItem]>,
) -> Markup {
    let start_date = filter.start_date.map(format_iso_date).unwrap_or_default();
    let end_date = filter.end_date.map(format_iso_date).unwrap_or_default();

    html!(
        form
            method="get"
            action=(action)
            class="w-full flex flex-wrap items-end gap-4 mb-6"
        {
            div
            {
                label for="start_date" class=(FORM_LABEL_STYLE) { "From" }
                input
                    id="start_date"
                    type="date"
                    name="start_date"
                    value=(start_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end_date" class=(FORM_LABEL_STYLE) { "To" }
                input
                    id="end_date"
                    type="date"
                    name="end_date"
                    value=(end_date)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            @if let Some(categories) = categories {
                div
                {
                    label for="category_ids" class=(FORM_LABEL_STYLE) { "Categories" }
                    select
                        id="category_ids"
                        name="category_ids"
                        multiple
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for category in categories {
                            option
                                value=(category.id)
                                selected[filter.category_ids.contains(&category.id)]
                            {
                                (category.name)
                            }
                        }
                    }
                }
            }

            div
            {
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Apply" }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};
    use time::macros::date;

    use crate::{
        Error,
        category::CategorySelectItem,
        filter::{ExpenseFilter, FilterForm, filter_form_view, filtered_url},
    };

    #[test]
    fn query_pairs_include_all_set_fields() {
        let filter = ExpenseFilter {
            start_date: Some(date!(2024 - 01 - 01)),
            end_date: Some(date!(2024 - 03 - 31)),
            category_ids: vec!["food".to_owned(), "rent".to_owned()],
        };

        assert_eq!(
            filter.query_pairs(),
            vec![
                ("startDate", "2024-01-01".to_owned()),
                ("endDate", "2024-03-31".to_owned()),
                ("categoryIds[]", "food".to_owned()),
                ("categoryIds[]", "rent".to_owned()),
            ]
        );
    }

    #[test]
    fn query_pairs_omit_missing_values() {
        assert!(ExpenseFilter::default().query_pairs().is_empty());
    }

    #[test]
    fn last_year_spans_365_days() {
        let filter = ExpenseFilter::last_year(date!(2024 - 12 - 31));

        assert_eq!(filter.start_date, Some(date!(2024 - 01 - 01)));
        assert_eq!(filter.end_date, Some(date!(2024 - 12 - 31)));
    }

    #[test]
    fn empty_form_uses_default_dates() {
        let default = ExpenseFilter::last_year(date!(2024 - 12 - 31));
        let form = FilterForm {
            category_ids: vec!["food".to_owned(), "".to_owned()],
            ..Default::default()
        };

        let filter = form.into_filter(default.clone()).unwrap();

        assert_eq!(filter.start_date, default.start_date);
        assert_eq!(filter.category_ids, vec!["food".to_owned()]);
    }

    #[test]
    fn form_with_dates_overrides_default() {
        let form: FilterForm =
            serde_html_form::from_str("start_date=2023-02-01&end_date=&category_ids=a&category_ids=b")
                .unwrap();

        let filter = form
            .into_filter(ExpenseFilter::last_year(date!(2024 - 12 - 31)))
            .unwrap();

        assert_eq!(filter.start_date, Some(date!(2023 - 02 - 01)));
        assert_eq!(filter.end_date, None);
        assert_eq!(filter.category_ids, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn invalid_date_is_rejected() {
        let form = FilterForm {
            start_date: "01/02/2023".to_owned(),
            ..Default::default()
        };

        assert_eq!(
            form.into_filter(ExpenseFilter::default()),
            Err(Error::InvalidDate("01/02/2023".to_owned()))
        );
    }

    #[test]
    fn filtered_url_repeats_categories() {
        let filter = ExpenseFilter {
            start_date: Some(date!(2024 - 01 - 01)),
            end_date: None,
            category_ids: vec!["a".to_owned(), "b c".to_owned()],
        };

        assert_eq!(
            filtered_url("/expenses", &filter),
            "/expenses?start_date=2024-01-01&category_ids=a&category_ids=b+c"
        );
        assert_eq!(filtered_url("/expenses", &ExpenseFilter::default()), "/expenses");
    }

    #[test]
    fn filter_form_marks_selected_categories() {
        let filter = ExpenseFilter {
            category_ids: vec!["b".to_owned()],
            ..Default::default()
        };
        let categories = vec![
            CategorySelectItem {
                id: "a".to_owned(),
                name: "Bills".to_owned(),
            },
            CategorySelectItem {
                id: "b".to_owned(),
                name: "Food".to_owned(),
            },
        ];

        let html = filter_form_view("/dashboard", &filter, Some(&categories)).into_string();
        let html = Html::parse_fragment(&html);

        let selected: Vec<&str> = html
            .select(&Selector::parse("option[selected]").unwrap())
            .map(|option| option.value().attr("value").unwrap())
            .collect();
        assert_eq!(selected, vec!["b"]);
    }
}
