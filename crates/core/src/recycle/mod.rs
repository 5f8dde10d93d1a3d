//! Soft delete, restore and permanent destroy for any record.

pub mod bin;
pub mod error;
pub mod types;

pub use bin::RecycleBin;
pub use error::RecycleError;
pub use types::{
    Lifecycle, RecordKind, RecordRef, Recyclable, RecycledObject, References, RestoreBlockers,
};
