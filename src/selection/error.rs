//! Selection-specific error types

use thiserror::Error;
use uuid::Uuid;

/// Errors raised when manipulating the selection table directly
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// The record set is not part of the loaded library
    #[error("Unknown record set: {0}")]
    UnknownSet(Uuid),

    /// A temporary selection named a record outside its set
    #[error("Record {record} does not belong to set {set}")]
    RecordNotInSet { set: Uuid, record: Uuid },
}
