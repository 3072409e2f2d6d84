//! Unit tests for record store error types

#[cfg(test)]
mod tests {
    use crate::store::error::StoreError;
    use std::error::Error;

    #[test]
    fn test_schema_mismatch_error() {
        let error = StoreError::SchemaMismatch { found: 7, expected: 1 };
        assert_eq!(
            error.to_string(),
            "Library schema version 7 is not supported (expected 1)"
        );
    }

    #[test]
    fn test_worker_gone_error() {
        let error = StoreError::WorkerGone;
        assert_eq!(error.to_string(), "Library worker is no longer running");
        assert!(error.source().is_none());
    }

    #[test]
    fn test_corrupt_key_error() {
        let error = StoreError::CorruptKey { tree: "sets" };
        assert!(error.to_string().contains("sets"));
    }

    #[test]
    fn test_dump_error_from_json() {
        let json_err = serde_json::from_str::<Vec<u32>>("{").unwrap_err();
        let error: StoreError = json_err.into();
        assert!(matches!(error, StoreError::DumpError(_)));
        assert!(error.to_string().starts_with("Invalid library dump"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "dump.json");
        let error: StoreError = io_error.into();
        assert!(matches!(error, StoreError::IoError(_)));
    }

    #[test]
    fn test_error_debug() {
        let error = StoreError::CorruptKey { tree: "groups" };
        let debug = format!("{:?}", error);
        assert!(debug.contains("CorruptKey"));
        assert!(debug.contains("groups"));
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<StoreError>();
        assert_sync::<StoreError>();
    }
}
