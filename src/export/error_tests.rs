//! Unit tests for export error types

#[cfg(test)]
mod tests {
    use crate::export::error::ExportError;
    use crate::groupdb::GroupDbError;
    use std::io;

    #[test]
    fn test_group_db_error_is_transparent() {
        let error: ExportError = GroupDbError::Truncated.into();
        assert_eq!(error.to_string(), GroupDbError::Truncated.to_string());
    }

    #[test]
    fn test_io_error_conversion() {
        let error: ExportError = io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed").into();
        assert!(matches!(error, ExportError::Io(_)));
        assert!(error.to_string().contains("pipe closed"));
    }

    #[test]
    fn test_json_error_conversion() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: ExportError = source.into();
        assert!(error.to_string().starts_with("JSON error:"));
    }

    #[test]
    fn test_empty_selection_message() {
        assert_eq!(
            ExportError::EmptySelection.to_string(),
            "Nothing to export: the selection is empty"
        );
    }
}
