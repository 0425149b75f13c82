//! Normalizing expense rows read from a CSV file before they are sent to the
//! expense service as one import batch.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::{
    Date, OffsetDateTime,
    format_description::{self, OwnedFormatItem, well_known::Rfc3339},
    parsing::Parsed,
};

use crate::{
    Error,
    category::{CategoryId, SubcategoryId},
    filter::format_iso_date,
};

/// How a CSV import should be interpreted, sent along with the rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportDetails {
    /// The format of the dates in the file, e.g. "DD/MM/YYYY".
    pub date_format: String,
    /// The name of the uploaded file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// The category for rows that do not name one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<CategoryId>,
    /// The subcategory for rows that take the default category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<SubcategoryId>,
}

/// An amount as it appears in an imported file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImportAmount {
    /// A number, e.g. from a JSON source.
    Number(f64),
    /// The text of a CSV cell, e.g. "$12.50".
    Text(String),
}

/// An expense row as read from an imported file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawExpenseRow {
    /// The date in the format of the import.
    pub trx_date: String,
    #[allow(missing_docs)]
    pub amount: ImportAmount,
    #[allow(missing_docs)]
    #[serde(default)]
    pub category_id: Option<CategoryId>,
    #[allow(missing_docs)]
    #[serde(default)]
    pub subcategory_id: Option<SubcategoryId>,
}

/// An expense row ready to be sent to `POST /expense/import`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportExpense {
    /// The date as "YYYY-MM-DD".
    pub trx_date: String,
    /// The amount with any leading '$' removed.
    pub amount: ImportAmount,
    /// The category of the row, or the default category of the import.
    pub category_id: CategoryId,
    #[allow(missing_docs)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subcategory_id: Option<SubcategoryId>,
    /// The ID shared by every expense of the batch.
    pub import_id: String,
}

/// Create the ID shared by every expense of a new import: the current UTC time in RFC 3339.
pub fn new_import_id() -> String {
    let now = OffsetDateTime::now_utc();

    now.format(&Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}

/// Prepare imported `rows` for the expense service.
///
/// Every row gets `import_id`, its date is parsed with the date format in
/// `details` and rewritten as "YYYY-MM-DD", and a leading '$' is removed from
/// text amounts. Rows without a category take the default category and
/// subcategory from `details`.
///
/// # Errors
/// Returns [Error::InvalidDateFormat] if the date format is not supported,
/// [Error::DateFormatMismatch] for the first date that does not match it, or
/// [Error::ValueRequired] for a row with neither a category nor a default.
pub fn normalize_import_rows(
    rows: Vec<RawExpenseRow>,
    details: &ImportDetails,
    import_id: &str,
) -> Result<Vec<ImportExpense>, Error> {
    let date_format: DateFormat = details.date_format.parse()?;

    rows.into_iter()
        .map(|row| -> Result<ImportExpense, Error> {
            let trx_date = format_iso_date(date_format.parse_date(&row.trx_date)?);

            let (category_id, subcategory_id) = match row.category_id {
                Some(category_id) => (category_id, row.subcategory_id),
                None => match &details.category_id {
                    Some(category_id) => (category_id.clone(), details.subcategory_id.clone()),
                    None => {
                        tracing::error!(
                            "Imported row dated {} has no category and no default category was given",
                            row.trx_date
                        );
                        return Err(Error::ValueRequired);
                    }
                },
            };

            Ok(ImportExpense {
                trx_date,
                amount: strip_currency_symbol(row.amount),
                category_id,
                subcategory_id,
                import_id: import_id.to_owned(),
            })
        })
        .collect()
}

fn strip_currency_symbol(amount: ImportAmount) -> ImportAmount {
    match amount {
        ImportAmount::Text(text) => {
            let text = text.trim();
            ImportAmount::Text(text.strip_prefix('$').unwrap_or(text).to_owned())
        }
        number => number,
    }
}

/// The moment-style tokens of a [DateFormat] and the `time` format
/// description components they stand for, longest token first.
const DATE_TOKENS: [(&str, &str); 8] = [
    ("YYYY", "[year]"),
    ("YY", "[year repr:last_two]"),
    ("MMMM", "[month repr:long case_sensitive:false]"),
    ("MMM", "[month repr:short case_sensitive:false]"),
    ("MM", "[month padding:none]"),
    ("M", "[month padding:none]"),
    ("DD", "[day padding:none]"),
    ("D", "[day padding:none]"),
];

/// A date format made of the tokens `YYYY`, `YY`, `MM`, `M`, `MMM`, `MMMM`,
/// `DD` and `D`. Any other character must appear literally.
///
/// Numeric months and days accept one or two digits whichever token is used.
/// Two digit years above 68 are in the 1900s, the rest in the 2000s.
#[derive(Debug, Clone, PartialEq)]
pub struct DateFormat {
    source: String,
    description: OwnedFormatItem,
}

impl FromStr for DateFormat {
    type Err = Error;

    fn from_str(format: &str) -> Result<Self, Self::Err> {
        let mut description = String::new();
        let mut components = Vec::new();
        let mut rest = format.trim();

        while let Some(next) = rest.chars().next() {
            match DATE_TOKENS.iter().find(|(token, _)| rest.starts_with(token)) {
                Some((token, component)) => {
                    description.push_str(component);
                    components.push(*component);
                    rest = &rest[token.len()..];
                }
                None => {
                    if matches!(next, '[' | ']' | '\\') {
                        description.push('\\');
                    }
                    description.push(next);
                    rest = &rest[next.len_utf8()..];
                }
            }
        }

        let has_component = |name: &str| {
            components
                .iter()
                .any(|component| component.starts_with(&format!("[{name}")))
        };

        if !(has_component("year") && has_component("month") && has_component("day")) {
            return Err(Error::InvalidDateFormat(format.to_owned()));
        }

        let description = format_description::parse_owned::<2>(&description).map_err(|error| {
            tracing::error!("Could not build a date format from \"{format}\": {error}");
            Error::InvalidDateFormat(format.to_owned())
        })?;

        Ok(Self {
            source: format.to_owned(),
            description,
        })
    }
}

impl DateFormat {
    /// Parse `value` according to this format.
    ///
    /// # Errors
    /// Returns [Error::DateFormatMismatch] if `value` does not match the
    /// format or is not a real calendar date.
    pub fn parse_date(&self, value: &str) -> Result<Date, Error> {
        let mismatch = || Error::DateFormatMismatch {
            value: value.to_owned(),
            format: self.source.clone(),
        };

        let mut parsed = Parsed::new();
        let rest = parsed
            .parse_item(value.trim().as_bytes(), &self.description)
            .map_err(|_| mismatch())?;

        if !rest.is_empty() {
            return Err(mismatch());
        }

        if let (None, Some(last_two)) = (parsed.year(), parsed.year_last_two()) {
            let century = if last_two > 68 { 1900 } else { 2000 };
            parsed
                .set_year(century + i32::from(last_two))
                .ok_or_else(mismatch)?;
        }

        Date::try_from(parsed).map_err(|_| mismatch())
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        expense::import::{
            DateFormat, ImportAmount, ImportDetails, RawExpenseRow, new_import_id,
            normalize_import_rows,
        },
    };

    fn details(date_format: &str) -> ImportDetails {
        ImportDetails {
            date_format: date_format.to_owned(),
            file_name: Some("bank.csv".to_owned()),
            category_id: Some("default".to_owned()),
            subcategory_id: Some("default-sub".to_owned()),
        }
    }

    fn raw(trx_date: &str, amount: ImportAmount, category_id: Option<&str>) -> RawExpenseRow {
        RawExpenseRow {
            trx_date: trx_date.to_owned(),
            amount,
            category_id: category_id.map(str::to_owned),
            subcategory_id: None,
        }
    }

    #[test]
    fn normalizes_date_and_amount() {
        let rows = vec![
            raw("03/04/2023", ImportAmount::Text("$12.50".to_owned()), Some("food")),
            raw("12/31/2023", ImportAmount::Number(3.0), Some("rent")),
        ];

        let normalized =
            normalize_import_rows(rows, &details("MM/DD/YYYY"), "2024-01-01T00:00:00Z").unwrap();

        assert_eq!(normalized[0].trx_date, "2023-03-04");
        assert_eq!(normalized[0].amount, ImportAmount::Text("12.50".to_owned()));
        assert_eq!(normalized[1].amount, ImportAmount::Number(3.0));
        assert!(
            normalized
                .iter()
                .all(|row| row.import_id == "2024-01-01T00:00:00Z")
        );
    }

    #[test]
    fn rows_without_category_take_default() {
        let rows = vec![raw("2023-01-02", ImportAmount::Number(1.0), None)];

        let normalized = normalize_import_rows(rows, &details("YYYY-MM-DD"), "id").unwrap();

        assert_eq!(normalized[0].category_id, "default");
        assert_eq!(normalized[0].subcategory_id.as_deref(), Some("default-sub"));
    }

    #[test]
    fn rows_without_any_category_are_rejected() {
        let rows = vec![
            raw("2023-01-02", ImportAmount::Number(1.0), Some("food")),
            raw("2023-01-03", ImportAmount::Number(2.0), None),
        ];
        let no_default = ImportDetails {
            category_id: None,
            subcategory_id: None,
            ..details("YYYY-MM-DD")
        };

        assert_eq!(
            normalize_import_rows(rows, &no_default, "id"),
            Err(Error::ValueRequired)
        );
    }

    #[test]
    fn rows_with_category_keep_it() {
        let rows = vec![raw("2023-01-02", ImportAmount::Number(1.0), Some("food"))];

        let normalized = normalize_import_rows(rows, &details("YYYY-MM-DD"), "id").unwrap();

        assert_eq!(normalized[0].category_id, "food");
        assert_eq!(normalized[0].subcategory_id, None);
    }

    #[test]
    fn date_not_matching_format_is_an_error() {
        let rows = vec![raw("2023-01-02", ImportAmount::Number(1.0), None)];

        assert_eq!(
            normalize_import_rows(rows, &details("DD/MM/YYYY"), "id"),
            Err(Error::DateFormatMismatch {
                value: "2023-01-02".to_owned(),
                format: "DD/MM/YYYY".to_owned(),
            })
        );
    }

    #[test]
    fn parses_supported_tokens() {
        let cases = [
            ("D/M/YY", "4/3/23", date!(2023 - 03 - 04)),
            ("DD-MM-YY", "04-03-99", date!(1999 - 03 - 04)),
            ("DD MMM YYYY", "04 mar 2023", date!(2023 - 03 - 04)),
            ("MMMM D, YYYY", "March 4, 2023", date!(2023 - 03 - 04)),
            ("YYYYMMDD", "20230304", date!(2023 - 03 - 04)),
        ];

        for (format, value, want) in cases {
            let format: DateFormat = format.parse().unwrap();

            assert_eq!(format.parse_date(value), Ok(want), "parsing {value:?}");
        }
    }

    #[test]
    fn rejects_impossible_dates() {
        let format: DateFormat = "YYYY-MM-DD".parse().unwrap();

        assert!(format.parse_date("2023-02-30").is_err());
        assert!(format.parse_date("2023-13-01").is_err());
        assert!(format.parse_date("2023-01-01 extra").is_err());
    }

    #[test]
    fn brackets_in_format_are_literal() {
        let format: DateFormat = "[YYYY] DD/MM".parse().unwrap();

        assert_eq!(format.parse_date("[2023] 04/03"), Ok(date!(2023 - 03 - 04)));
    }

    #[test]
    fn incomplete_format_is_invalid() {
        assert_eq!(
            "MM/YYYY".parse::<DateFormat>(),
            Err(Error::InvalidDateFormat("MM/YYYY".to_owned()))
        );
    }

    #[test]
    fn import_id_is_rfc3339() {
        let id = new_import_id();

        assert!(
            time::OffsetDateTime::parse(&id, &time::format_description::well_known::Rfc3339)
                .is_ok()
        );
    }
}
