use serde::Deserialize;

/// A summary of one CSV import, as listed by the expense service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// The ID of the summary record.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// The import ID stamped on each expense of the batch, when the service reports it.
    #[serde(default)]
    pub import_id: Option<String>,
    /// When the import ran, as an ISO date or date-time.
    #[serde(default)]
    pub import_date: Option<String>,
    /// The name of the uploaded file.
    #[serde(default)]
    pub file_name: Option<String>,
    /// The number of expenses created by the import.
    #[serde(default)]
    pub expense_count: Option<u64>,
}

impl ImportSummary {
    /// The ID that links the batch's expenses to it.
    ///
    /// Falls back to the summary ID when the service does not report a separate import ID.
    pub fn expenses_import_id(&self) -> &str {
        self.import_id.as_deref().unwrap_or(&self.id)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::import::ImportSummary;

    #[test]
    fn reads_partial_summary() {
        let summary: ImportSummary = serde_json::from_value(json!({
            "_id": "i1",
            "fileName": "march.csv"
        }))
        .unwrap();

        assert_eq!(summary.file_name.as_deref(), Some("march.csv"));
        assert_eq!(summary.expense_count, None);
        assert_eq!(summary.expenses_import_id(), "i1");
    }

    #[test]
    fn prefers_reported_import_id() {
        let summary: ImportSummary = serde_json::from_value(json!({
            "_id": "i1",
            "importId": "2024-03-01T10:00:00Z",
            "expenseCount": 12
        }))
        .unwrap();

        assert_eq!(summary.expenses_import_id(), "2024-03-01T10:00:00Z");
        assert_eq!(summary.expense_count, Some(12));
    }
}
