use std::collections::BTreeMap;

use super::model::{MetadataValue, WindowSet};

/// Window indices per acquisition run: maps a metadata value → indices.
pub type Groups = BTreeMap<MetadataValue, Vec<usize>>;

/// Split windows into independent runs by the value of `column`.
///
/// Windows without the column land in the `Null` group. Indices keep file
/// order within each group.
pub fn group_by(set: &WindowSet, column: &str) -> Groups {
    let mut groups = Groups::new();
    for (i, window) in set.windows.iter().enumerate() {
        groups.entry(window.meta(column).clone()).or_default().push(i);
    }
    groups
}

/// Every window as a single group keyed by `Null`.
pub fn single_group(set: &WindowSet) -> Groups {
    let mut groups = Groups::new();
    if !set.is_empty() {
        groups.insert(MetadataValue::Null, (0..set.len()).collect());
    }
    groups
}

/// Reorder `indices` by the value of `column` (e.g. scan center).
///
/// Numeric values compare numerically, integers and floats alike. The sort
/// is stable, so windows with equal or missing values keep file order;
/// missing values sort first.
pub fn order_by(set: &WindowSet, indices: &mut [usize], column: &str) {
    indices.sort_by(|&a, &b| {
        let (va, vb) = (set.windows[a].meta(column), set.windows[b].meta(column));
        match (va.as_f64(), vb.as_f64()) {
            (Some(fa), Some(fb)) => fa.total_cmp(&fb),
            _ => va.cmp(vb),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Window;

    fn set(meta: &[(Option<i64>, MetadataValue)]) -> WindowSet {
        WindowSet::from_windows(
            meta.iter()
                .map(|(run, center)| {
                    let mut metadata = BTreeMap::new();
                    if let Some(run) = run {
                        metadata.insert("run".to_string(), MetadataValue::Integer(*run));
                    }
                    metadata.insert("center".to_string(), center.clone());
                    Window {
                        x: vec![0.0],
                        y: vec![0.0],
                        metadata,
                    }
                })
                .collect(),
        )
    }

    #[test]
    fn groups_by_column_value_in_file_order() {
        let s = set(&[
            (Some(2), MetadataValue::Float(1.0)),
            (Some(1), MetadataValue::Float(1.0)),
            (None, MetadataValue::Float(1.0)),
            (Some(2), MetadataValue::Float(1.0)),
        ]);
        let groups = group_by(&s, "run");
        assert_eq!(groups[&MetadataValue::Integer(2)], vec![0, 3]);
        assert_eq!(groups[&MetadataValue::Integer(1)], vec![1]);
        assert_eq!(groups[&MetadataValue::Null], vec![2]);
    }

    #[test]
    fn orders_mixed_numeric_centers() {
        let s = set(&[
            (None, MetadataValue::Float(520.5)),
            (None, MetadataValue::Integer(500)),
            (None, MetadataValue::Float(510.0)),
            (None, MetadataValue::Integer(530)),
        ]);
        let mut indices = vec![0, 1, 2, 3];
        order_by(&s, &mut indices, "center");
        assert_eq!(indices, vec![1, 2, 0, 3]);
    }

    #[test]
    fn ordering_by_missing_column_keeps_file_order() {
        let s = set(&[(None, MetadataValue::Null), (None, MetadataValue::Null)]);
        let mut indices = vec![0, 1];
        order_by(&s, &mut indices, "exposure");
        assert_eq!(indices, vec![0, 1]);
    }

    #[test]
    fn single_group_covers_all_windows() {
        let s = set(&[(None, MetadataValue::Null), (Some(3), MetadataValue::Null)]);
        assert_eq!(single_group(&s)[&MetadataValue::Null], vec![0, 1]);
        assert!(single_group(&WindowSet::from_windows(Vec::new())).is_empty());
    }
}
