//! Dataset mutation: stamp resolved decisions onto survey rows.

use accord_core::errors::StorageError;
use accord_core::types::SurveyRow;
use accord_storage::ValidationStore;

/// Rewrite ratings and stamp traceability columns from the store's
/// terminal decisions. Matching is by case id, so the slice may be any
/// filtered or reordered view of the dataset. Returns the number of
/// rows stamped.
pub fn apply_validations(
    rows: &mut [SurveyRow],
    store: &ValidationStore,
) -> Result<u32, StorageError> {
    store.apply_to(rows)
}
