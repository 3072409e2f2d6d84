//! Unit tests for group database error types

#[cfg(test)]
mod tests {
    use crate::groupdb::error::GroupDbError;
    use std::error::Error;
    use std::io;
    use std::path::PathBuf;

    #[test]
    fn test_open_error_names_path() {
        let error = GroupDbError::Open {
            path: PathBuf::from("/tmp/collection.db"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        };
        let display = error.to_string();
        assert!(display.starts_with("Could not open group database"));
        assert!(display.contains("/tmp/collection.db"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_eof_maps_to_truncated() {
        let error = GroupDbError::from_read(io::Error::from(io::ErrorKind::UnexpectedEof));
        assert!(matches!(error, GroupDbError::Truncated));
    }

    #[test]
    fn test_other_read_errors_are_kept() {
        let error = GroupDbError::from_read(io::Error::from(io::ErrorKind::Interrupted));
        assert!(matches!(error, GroupDbError::Read(_)));
    }

    #[test]
    fn test_invalid_count_error() {
        let error = GroupDbError::InvalidCount { what: "member", count: -3 };
        assert_eq!(
            error.to_string(),
            "Could not parse group database: invalid member count -3"
        );
    }

    #[test]
    fn test_parse_errors_share_prefix() {
        let errors = [
            GroupDbError::Truncated,
            GroupDbError::InvalidLength,
            GroupDbError::InvalidCount { what: "group", count: -1 },
        ];
        for error in errors {
            assert!(error.to_string().starts_with("Could not parse group database"));
        }
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}
        assert_send::<GroupDbError>();
        assert_sync::<GroupDbError>();
    }
}
