// ABOUTME: Groups parsed change records by action code.
// ABOUTME: Preserves parse order within each group; no deduplication.

use crate::change::{ActionCode, ChangeRecord, ObjectType};
use std::collections::BTreeMap;

/// A single line of a group: what changed and what kind of object it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEntry {
    pub path: String,
    pub object_type: ObjectType,
}

/// Change entries partitioned by action code.
///
/// Iteration yields groups in dispatch priority order (`AD, CH, DE, RE, MV`,
/// then unrecognized codes). Groups are never empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedChanges {
    groups: BTreeMap<ActionCode, Vec<GroupEntry>>,
}

impl GroupedChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, action: ActionCode, entry: GroupEntry) {
        self.groups.entry(action).or_default().push(entry);
    }

    pub fn get(&self, action: &ActionCode) -> Option<&[GroupEntry]> {
        self.groups.get(action).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ActionCode, &[GroupEntry])> {
        self.groups
            .iter()
            .map(|(action, entries)| (action, entries.as_slice()))
    }

    /// Groups whose action code can be rendered, in priority order.
    pub fn recognized(&self) -> impl Iterator<Item = (&ActionCode, &[GroupEntry])> {
        self.iter().filter(|(action, _)| action.is_recognized())
    }

    /// Number of distinct action codes present.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total number of entries across all groups.
    pub fn entry_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }
}

/// Partition records by action, appending in input order.
pub fn group(records: impl IntoIterator<Item = ChangeRecord>) -> GroupedChanges {
    let mut grouped = GroupedChanges::new();
    for record in records {
        grouped.push(
            record.action,
            GroupEntry {
                path: record.path,
                object_type: record.object_type,
            },
        );
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(action: &str, path: &str, object_type: &str) -> ChangeRecord {
        ChangeRecord {
            action: ActionCode::from_code(action),
            path: path.to_string(),
            object_type: ObjectType::from_token(object_type),
            metadata: "m".to_string(),
        }
    }

    fn paths(entries: &[GroupEntry]) -> Vec<&str> {
        entries.iter().map(|e| e.path.as_str()).collect()
    }

    #[test]
    fn test_group_preserves_order_within_action() {
        let grouped = group(vec![
            record("CH", "/c1", "FILE"),
            record("AD", "/a1", "FILE"),
            record("CH", "/c2", "DIR"),
            record("AD", "/a2", "DIR"),
            record("CH", "/c3", "FILE"),
        ]);

        assert_eq!(paths(grouped.get(&ActionCode::Changed).unwrap()), ["/c1", "/c2", "/c3"]);
        assert_eq!(paths(grouped.get(&ActionCode::Added).unwrap()), ["/a1", "/a2"]);
    }

    #[test]
    fn test_group_is_a_partition() {
        let records = vec![
            record("AD", "/a", "FILE"),
            record("DE", "/d", "FILE"),
            record("ZZ", "/z", "FILE"),
            record("MV", "/m", "DIR"),
        ];
        let grouped = group(records.clone());

        assert_eq!(grouped.entry_count(), records.len());
        for r in &records {
            let entries = grouped.get(&r.action).unwrap();
            assert!(entries.iter().any(|e| e.path == r.path));
        }
    }

    #[test]
    fn test_group_keeps_duplicates() {
        let grouped = group(vec![record("AD", "/a", "FILE"), record("AD", "/a", "FILE")]);
        assert_eq!(grouped.get(&ActionCode::Added).unwrap().len(), 2);
    }

    #[test]
    fn test_group_is_deterministic() {
        let input = vec![
            record("RE", "/r", "FILE"),
            record("AD", "/a", "FILE"),
            record("RE", "/r2", "DIR"),
        ];
        assert_eq!(group(input.clone()), group(input));
    }

    #[test]
    fn test_iteration_follows_priority_order() {
        let grouped = group(vec![
            record("ZZ", "/z", "FILE"),
            record("MV", "/m", "FILE"),
            record("AD", "/a", "FILE"),
            record("CH", "/c", "FILE"),
        ]);
        let codes: Vec<&str> = grouped.iter().map(|(a, _)| a.code()).collect();
        assert_eq!(codes, ["AD", "CH", "MV", "ZZ"]);

        let recognized: Vec<&str> = grouped.recognized().map(|(a, _)| a.code()).collect();
        assert_eq!(recognized, ["AD", "CH", "MV"]);
    }

    #[test]
    fn test_unrecognized_codes_are_grouped_but_not_recognized() {
        let grouped = group(vec![record("ZZ", "/z1", "FILE"), record("ZZ", "/z2", "FILE")]);
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped.get(&ActionCode::from_code("ZZ")).unwrap().len(), 2);
        assert_eq!(grouped.recognized().count(), 0);
    }

    #[test]
    fn test_group_empty_input() {
        let grouped = group(Vec::new());
        assert!(grouped.is_empty());
        assert_eq!(grouped.entry_count(), 0);
    }
}
