//! Per-ship inclusion toggles over the baseline collection.

use crate::models::ScheduleEntity;

/// Flip the `selected` flag of the entity at `index`.
///
/// Returns `false` and changes nothing when no such entity exists.
pub fn toggle(entities: &mut [ScheduleEntity], index: usize) -> bool {
    match entities.get_mut(index) {
        Some(entity) => {
            entity.selected = !entity.selected;
            true
        }
        None => false,
    }
}

/// Merge keys of the selected entities, in collection order.
pub fn selected_keys(entities: &[ScheduleEntity]) -> Vec<String> {
    entities
        .iter()
        .filter(|entity| entity.selected)
        .map(|entity| entity.merge_key().to_string())
        .collect()
}
