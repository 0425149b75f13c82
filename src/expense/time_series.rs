//! Turns monthly totals from the expense service into one series per category.

use time::{Date, Month};

use crate::{
    Error,
    expense::{TimeSeries, TimeSeriesRow, aggregation::group_by_category},
};

/// The series name used for rows without a category name.
pub const UNKNOWN_CATEGORY_NAME: &str = "Unknown";

/// Group monthly totals into one series per category.
///
/// Each point is the start of the month (midnight UTC on the first day) in
/// milliseconds since the Unix epoch, paired with the total rounded to cents.
/// A series is named after the last row of its category, or
/// [UNKNOWN_CATEGORY_NAME] if that row has no name.
///
/// # Errors
/// Returns [Error::InvalidDate] if a row has a month outside 1 to 12.
pub fn build_time_series(mut rows: Vec<TimeSeriesRow>) -> Result<Vec<TimeSeries>, Error> {
    group_by_category(&mut rows, |row| row.category_id.as_str());

    let mut series: Vec<(String, TimeSeries)> = Vec::new();

    for row in rows {
        let point = (
            month_start_millis(row.trx_year, row.trx_month)?,
            round_to_cents(row.total_amount),
        );

        let name = row
            .category_name
            .unwrap_or_else(|| UNKNOWN_CATEGORY_NAME.to_owned());

        let starts_new_series = series
            .last()
            .is_none_or(|(category_id, _)| *category_id != row.category_id);

        if starts_new_series {
            series.push((
                row.category_id,
                TimeSeries {
                    name,
                    data: vec![point],
                },
            ));
        } else if let Some((_, current)) = series.last_mut() {
            current.name = name;
            current.data.push(point);
        }
    }

    Ok(series.into_iter().map(|(_, series)| series).collect())
}

fn month_start_millis(year: i32, month: u8) -> Result<i64, Error> {
    let invalid_date = || Error::InvalidDate(format!("{year}-{month:02}"));

    let month = Month::try_from(month).map_err(|_| invalid_date())?;
    let date = Date::from_calendar_date(year, month, 1).map_err(|_| invalid_date())?;

    Ok(date.midnight().assume_utc().unix_timestamp() * 1000)
}

fn round_to_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
