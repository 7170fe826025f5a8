//! Table controller error types

/// Errors from table operations that cannot be expressed as a view state.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Export was requested on a table configured without export.
    #[error("Export is not enabled for this table")]
    ExportDisabled,

    /// The table has no usable row data (still loading, failed or invalid).
    #[error("No row data available: {0}")]
    NoData(String),

    /// A row action is already outstanding for this row.
    #[error("An action is already in progress for row '{0}'")]
    ActionInProgress(String),

    /// The referenced row does not exist in the current data.
    #[error("Row '{0}' not found")]
    RowNotFound(String),

    /// Writing the CSV export failed.
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    /// Serializing the JSON export failed.
    #[error("JSON export failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_failures_keep_their_cause() {
        let json = serde_json::from_str::<i64>("not json").unwrap_err();
        let err = TableError::from(json);
        assert!(matches!(err, TableError::Serialize(_)));
        assert!(err.to_string().starts_with("JSON export failed: "));

        let csv = csv::Error::from(std::io::Error::other("disk full"));
        let err = TableError::from(csv);
        assert!(matches!(err, TableError::Csv(_)));
        assert!(err.to_string().contains("disk full"));
    }
}
