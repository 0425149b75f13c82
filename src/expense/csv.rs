//! Reading expense rows from an uploaded CSV file.

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::{
    Error,
    expense::import::{ImportAmount, RawExpenseRow},
};

struct Columns {
    trx_date: usize,
    amount: usize,
    category_id: Option<usize>,
    subcategory_id: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, Error> {
        let find = |names: &[&str]| {
            headers.iter().position(|header| {
                names
                    .iter()
                    .any(|name| header.trim().eq_ignore_ascii_case(name))
            })
        };

        let trx_date = find(&["trxDate", "date"])
            .ok_or_else(|| Error::InvalidCSV("missing a \"trxDate\" or \"date\" column".to_owned()))?;
        let amount = find(&["amount"])
            .ok_or_else(|| Error::InvalidCSV("missing an \"amount\" column".to_owned()))?;

        Ok(Self {
            trx_date,
            amount,
            category_id: find(&["categoryId"]),
            subcategory_id: find(&["subcategoryId"]),
        })
    }
}

/// Parse the rows of a CSV file with a header row.
///
/// Headers are matched ignoring case: the date column is `trxDate` or `date`,
/// the amount column is `amount`, and `categoryId` and `subcategoryId` are
/// optional. Other columns are ignored, as are blank lines.
///
/// Returns [Error::InvalidCSV] if a required column is missing or a line cannot be read.
pub fn parse_expense_csv(text: &str) -> Result<Vec<RawExpenseRow>, Error> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|error| Error::InvalidCSV(error.to_string()))?
        .clone();
    let columns = Columns::from_headers(&headers)?;

    let mut rows = Vec::new();

    for (index, record) in reader.records().enumerate() {
        // Line 1 is the header.
        let line_number = index + 2;
        let record =
            record.map_err(|error| Error::InvalidCSV(format!("line {line_number}: {error}")))?;

        if record.iter().all(str::is_empty) {
            continue;
        }

        let field = |column: usize| record.get(column).unwrap_or_default().to_owned();
        let optional_field =
            |column: Option<usize>| column.map(field).filter(|value| !value.is_empty());

        rows.push(RawExpenseRow {
            trx_date: field(columns.trx_date),
            amount: ImportAmount::Text(field(columns.amount)),
            category_id: optional_field(columns.category_id),
            subcategory_id: optional_field(columns.subcategory_id),
        });
    }

    tracing::debug!("Parsed {} expense rows from CSV", rows.len());

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use crate::{
        Error,
        expense::{
            csv::parse_expense_csv,
            import::{ImportAmount, RawExpenseRow},
        },
    };

    #[test]
    fn reads_rows_with_any_header_case() {
        let text = "Date,Description,AMOUNT,CategoryId\n\
            03/04/2023,Coffee,$4.50,food\n\
            \n\
            03/05/2023,Bus,2.00,\n";

        let rows = parse_expense_csv(text).unwrap();

        assert_eq!(
            rows,
            vec![
                RawExpenseRow {
                    trx_date: "03/04/2023".to_owned(),
                    amount: ImportAmount::Text("$4.50".to_owned()),
                    category_id: Some("food".to_owned()),
                    subcategory_id: None,
                },
                RawExpenseRow {
                    trx_date: "03/05/2023".to_owned(),
                    amount: ImportAmount::Text("2.00".to_owned()),
                    category_id: None,
                    subcategory_id: None,
                },
            ]
        );
    }

    #[test]
    fn trx_date_header_is_accepted() {
        let rows = parse_expense_csv("trxDate,amount,categoryId,subcategoryId\n2023-01-01,1,c,s\n")
            .unwrap();

        assert_eq!(rows[0].subcategory_id.as_deref(), Some("s"));
    }

    #[test]
    fn missing_amount_column_is_invalid() {
        assert_eq!(
            parse_expense_csv("date,value\n2023-01-01,1\n"),
            Err(Error::InvalidCSV("missing an \"amount\" column".to_owned()))
        );
    }

    #[test]
    fn header_only_file_has_no_rows() {
        assert_eq!(parse_expense_csv("date,amount\n"), Ok(Vec::new()));
    }
}
