//! Left-join of optimization output onto the baseline it was computed from.

use std::collections::HashMap;

use crate::models::{EnrichedResult, OptimizationEntity, ScheduleEntity};

/// Enrich each optimized record with the metrics of its baseline match.
///
/// Records are matched on `merge_key`. When the baseline holds duplicate keys
/// the last one wins. Records without a match pass through unchanged. Output
/// order follows `optimized`.
pub fn reconcile(optimized: &[OptimizationEntity], baseline: &[ScheduleEntity]) -> Vec<EnrichedResult> {
    let lookup: HashMap<&str, &ScheduleEntity> = baseline
        .iter()
        .map(|entity| (entity.merge_key(), entity))
        .collect();

    optimized
        .iter()
        .map(|record| match lookup.get(record.merge_key.as_str()) {
            Some(original) => EnrichedResult::enrich(record.clone(), original),
            None => EnrichedResult::passthrough(record.clone()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BaselineRecord;

    fn baseline(carrier: &str, vessel: &str, completion: f64, predicted: f64) -> ScheduleEntity {
        ScheduleEntity::ingest(BaselineRecord::new(carrier, vessel).with_metrics(completion, predicted))
    }

    #[test]
    fn test_match_copies_metrics() {
        let original = vec![baseline("COIS", "GLORY SHIP", 10.0, 5.0)];
        let mut optimized = OptimizationEntity::new("COIS_GLORYSHIP");
        optimized.start_hours = Some(3.0);

        let result = reconcile(&[optimized], &original);

        assert_eq!(result.len(), 1);
        assert!(result[0].is_enriched());
        assert_eq!(result[0].original_completion_hours, Some(10.0));
        assert_eq!(result[0].predicted_work_time, Some(5.0));
        assert_eq!(result[0].optimized.start_hours, Some(3.0));
    }

    #[test]
    fn test_miss_passes_through() {
        let original = vec![baseline("COIS", "GLORY SHIP", 10.0, 5.0)];
        let optimized = OptimizationEntity::new("HMM_ALGECIRAS");

        let result = reconcile(&[optimized.clone()], &original);

        assert!(!result[0].is_enriched());
        assert_eq!(result[0].original_completion_hours, None);
        assert_eq!(result[0].predicted_work_time, None);
        assert_eq!(result[0].optimized, optimized);
    }

    #[test]
    fn test_duplicate_baseline_keys_last_wins() {
        let original = vec![
            baseline("COIS", "GLORY SHIP", 1.0, 1.0),
            baseline("COIS", "GLORYSHIP", 2.0, 2.0),
        ];

        let result = reconcile(&[OptimizationEntity::new("COIS_GLORYSHIP")], &original);

        assert_eq!(result[0].original_completion_hours, Some(2.0));
        assert_eq!(result[0].predicted_work_time, Some(2.0));
    }

    #[test]
    fn test_order_follows_optimized_input() {
        let original = vec![
            baseline("A", "ONE", 1.0, 1.0),
            baseline("B", "TWO", 2.0, 2.0),
        ];
        let optimized = vec![
            OptimizationEntity::new("B_TWO"),
            OptimizationEntity::new("X_MISSING"),
            OptimizationEntity::new("A_ONE"),
        ];

        let keys: Vec<_> = reconcile(&optimized, &original)
            .iter()
            .map(|r| r.merge_key().to_string())
            .collect();

        assert_eq!(keys, vec!["B_TWO", "X_MISSING", "A_ONE"]);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(reconcile(&[], &[]).is_empty());
        let result = reconcile(&[OptimizationEntity::new("A_ONE")], &[]);
        assert!(!result[0].is_enriched());
    }
}
