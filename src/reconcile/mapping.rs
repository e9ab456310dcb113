//! Mapping derivation and application for one renumbering event.

use std::collections::BTreeMap;

use super::error::ReconcileError;
use super::events::{NameException, OverrideTarget, PairingMode, RenumberingEvent};
use super::normalize::normalize_name;
use crate::core::{EntryId, Snapshot};
use crate::report::{Report, Stage};

/// Where one old identifier goes: its new identifier and canonical name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappingTarget {
    pub new_id: EntryId,
    pub name: String,
}

/// Derived rewrite table for one renumbering event.
#[derive(Clone, Debug, Default)]
pub struct RenumberingMapping {
    entries: BTreeMap<EntryId, MappingTarget>,
}

impl RenumberingMapping {
    pub fn get(&self, old_id: EntryId) -> Option<&MappingTarget> {
        self.entries.get(&old_id)
    }

    pub fn contains(&self, old_id: EntryId) -> bool {
        self.entries.contains_key(&old_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn exception_matches(exceptions: &[NameException], new_norm: &str, old_norm: &str) -> bool {
    exceptions.iter().any(|e| {
        normalize_name(&e.new_name) == new_norm && normalize_name(&e.old_name) == old_norm
    })
}

/// Derive the mapping for one event from its two adjacent snapshots.
///
/// Manual overrides are applied last so they take precedence over derived
/// entries.
pub fn build_mapping(
    event: &RenumberingEvent,
    old_snapshot: &Snapshot,
    new_snapshot: &Snapshot,
    report: &mut Report,
) -> Result<RenumberingMapping, ReconcileError> {
    let mut mapping = RenumberingMapping::default();

    match event.pairing {
        PairingMode::Positional => {
            if old_snapshot.entries.len() != new_snapshot.entries.len() {
                return Err(ReconcileError::CountMismatch {
                    date: event.date,
                    old_len: old_snapshot.entries.len(),
                    new_len: new_snapshot.entries.len(),
                });
            }
            for (old, new) in old_snapshot.entries.iter().zip(&new_snapshot.entries) {
                let old_norm = normalize_name(&old.name);
                let new_norm = normalize_name(&new.name);
                if old_norm != new_norm
                    && !exception_matches(&event.exceptions, &new_norm, &old_norm)
                {
                    return Err(ReconcileError::NameMismatch {
                        id: old.id,
                        observed: old.name.clone(),
                        canonical: new.name.clone(),
                    });
                }
                mapping.entries.insert(
                    old.id,
                    MappingTarget {
                        new_id: new.id,
                        name: new.name.clone(),
                    },
                );
            }
        }
        PairingMode::ByName => {
            let new_by_name: BTreeMap<String, &crate::core::EntryRecord> = new_snapshot
                .entries
                .iter()
                .map(|e| (normalize_name(&e.name), e))
                .collect();
            let old_names: Vec<String> = old_snapshot
                .entries
                .iter()
                .map(|e| normalize_name(&e.name))
                .collect();

            for (old, norm) in old_snapshot.entries.iter().zip(&old_names) {
                match new_by_name.get(norm) {
                    Some(new) => {
                        mapping.entries.insert(
                            old.id,
                            MappingTarget {
                                new_id: new.id,
                                name: new.name.clone(),
                            },
                        );
                    }
                    None => {
                        // Tolerated: a manual override is expected to cover it.
                        report.warn(
                            Stage::Reconcile,
                            format!(
                                "event {}: entry {} {:?} disappeared across renumbering",
                                event.date, old.id, old.name
                            ),
                        );
                    }
                }
            }
            for new in &new_snapshot.entries {
                if !old_names.contains(&normalize_name(&new.name)) {
                    report.info(
                        Stage::Reconcile,
                        format!(
                            "event {}: entry {} {:?} is new in the target scheme",
                            event.date, new.id, new.name
                        ),
                    );
                }
            }
        }
    }

    for ov in &event.overrides {
        let target = match &ov.target {
            OverrideTarget::SameAs(other) => mapping
                .entries
                .get(other)
                .cloned()
                .ok_or(ReconcileError::BadOverride(*other))?,
            OverrideTarget::Explicit { new_id, name } => MappingTarget {
                new_id: *new_id,
                name: name.clone(),
            },
        };
        tracing::debug!(old_id = %ov.old_id, new_id = %target.new_id, reason = %ov.reason,
            "manual mapping override");
        mapping.entries.insert(ov.old_id, target);
    }

    Ok(mapping)
}

/// Rewrite every snapshot the event applies to into the new scheme.
///
/// Pure pass: consumes the current generation and materializes the next.
/// A record whose id is absent from the mapping is dropped and reported,
/// never kept under its stale identifier. A record whose name fails the
/// normalized check against the mapping's canonical name (without a
/// declared exception) is a fatal mismatch.
pub fn apply_event(
    event: &RenumberingEvent,
    mapping: &RenumberingMapping,
    snapshots: Vec<Snapshot>,
    report: &mut Report,
) -> Result<Vec<Snapshot>, ReconcileError> {
    let mut out = Vec::with_capacity(snapshots.len());
    for snapshot in snapshots {
        if !event.applies_to(&snapshot) {
            out.push(snapshot);
            continue;
        }
        let commit = snapshot.commit;
        let mut kept = Vec::with_capacity(snapshot.entries.len());
        for mut entry in snapshot.entries {
            let Some(target) = mapping.get(entry.id) else {
                report.warn(
                    Stage::Reconcile,
                    format!(
                        "commit {} ({}): entry {} {:?} has no mapping, dropped",
                        commit.id, commit.date, entry.id, entry.name
                    ),
                );
                continue;
            };
            let observed = normalize_name(&entry.name);
            let canonical = normalize_name(&target.name);
            if observed != canonical
                && !exception_matches(&event.exceptions, &canonical, &observed)
            {
                return Err(ReconcileError::NameMismatch {
                    id: entry.id,
                    observed: entry.name,
                    canonical: target.name.clone(),
                });
            }
            entry.id = target.new_id;
            entry.name = target.name.clone();
            kept.push(entry);
        }
        out.push(Snapshot {
            commit,
            entries: kept,
        });
    }
    Ok(out)
}

/// Run every renumbering event as an independent pass, oldest event first.
///
/// Each pass fully replaces the snapshot set before the next one runs;
/// passes are not commutative.
pub fn reconcile(
    mut snapshots: Vec<Snapshot>,
    events: &[RenumberingEvent],
    report: &mut Report,
) -> Result<Vec<Snapshot>, ReconcileError> {
    if let Some(w) = events.windows(2).find(|w| w[0].date > w[1].date) {
        return Err(ReconcileError::EventsOutOfOrder {
            earlier: w[1].date,
            later: w[0].date,
        });
    }

    for event in events {
        let find = |commit: &str| {
            snapshots
                .iter()
                .find(|s| s.commit.id == commit)
                .ok_or_else(|| ReconcileError::MissingEventCommit {
                    date: event.date,
                    commit: commit.to_owned(),
                })
        };
        let mapping = build_mapping(event, find(&event.source_commit)?, find(&event.target_commit)?, report)?;
        tracing::info!(event = %event.date, entries = mapping.len(), "derived renumbering mapping");
        snapshots = apply_event(event, &mapping, snapshots, report)?;
    }
    Ok(snapshots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalDate, CommitInfo, EntryRecord};
    use crate::reconcile::events::ManualOverride;
    use crate::report::Severity;

    fn entry(id: EntryId, name: &str, status: &str) -> EntryRecord {
        EntryRecord {
            id,
            name: name.to_owned(),
            date: CalDate::parse("2024-01-05").unwrap(),
            status: Some(status.to_owned()),
            done: None,
            extra: Default::default(),
        }
    }

    fn snap(commit: &str, date: &str, entries: Vec<EntryRecord>) -> Snapshot {
        Snapshot {
            commit: CommitInfo {
                id: commit.to_owned(),
                date: CalDate::parse(date).unwrap(),
            },
            entries,
        }
    }

    fn positional_event(date: &str) -> RenumberingEvent {
        RenumberingEvent {
            date: CalDate::parse(date).unwrap(),
            source_commit: "old".to_owned(),
            target_commit: "new".to_owned(),
            pairing: PairingMode::Positional,
            exceptions: Vec::new(),
            overrides: Vec::new(),
        }
    }

    #[test]
    fn positional_pairing_maps_by_index() {
        let old = snap(
            "old",
            "2024-11-18",
            vec![
                entry(EntryId::from_int(1), "A", "未開始"),
                entry(EntryId::from_int(2), "B", "未開始"),
            ],
        );
        let new = snap(
            "new",
            "2024-11-18",
            vec![
                entry(EntryId::from_int(10), "A", "未開始"),
                entry(EntryId::from_int(20), "B", "未開始"),
            ],
        );
        let mut report = Report::new();
        let mapping =
            build_mapping(&positional_event("2024-11-18"), &old, &new, &mut report).unwrap();

        let a = mapping.get(EntryId::from_int(1)).unwrap();
        assert_eq!(a.new_id, EntryId::from_int(10));
        assert_eq!(a.name, "A");
        let b = mapping.get(EntryId::from_int(2)).unwrap();
        assert_eq!(b.new_id, EntryId::from_int(20));
        assert_eq!(b.name, "B");
    }

    #[test]
    fn applying_a_mapping_rewrites_older_records() {
        let event = positional_event("2024-11-18");
        let old = snap(
            "old",
            "2024-11-18",
            vec![entry(EntryId::from_int(1), "A", "未開始")],
        );
        let new = snap(
            "new",
            "2024-11-18",
            vec![entry(EntryId::from_int(10), "A", "未開始")],
        );
        let earlier = snap(
            "earlier",
            "2024-06-01",
            vec![entry(EntryId::from_int(1), "A", "進行中")],
        );

        let mut report = Report::new();
        let mapping = build_mapping(&event, &old, &new, &mut report).unwrap();
        let rewritten =
            apply_event(&event, &mapping, vec![earlier, old, new], &mut report).unwrap();

        let record = &rewritten[0].entries[0];
        assert_eq!(record.id, EntryId::from_int(10));
        assert_eq!(record.status.as_deref(), Some("進行中"));
        // The target-scheme snapshot is untouched.
        assert_eq!(rewritten[2].entries[0].id, EntryId::from_int(10));
    }

    #[test]
    fn positional_count_mismatch_is_fatal() {
        let old = snap(
            "old",
            "2024-11-18",
            vec![entry(EntryId::from_int(1), "A", "未開始")],
        );
        let new = snap(
            "new",
            "2024-11-18",
            vec![
                entry(EntryId::from_int(10), "A", "未開始"),
                entry(EntryId::from_int(11), "B", "未開始"),
            ],
        );
        let mut report = Report::new();
        let err = build_mapping(&positional_event("2024-11-18"), &old, &new, &mut report)
            .unwrap_err();
        assert!(matches!(err, ReconcileError::CountMismatch { .. }));
    }

    #[test]
    fn undeclared_name_change_is_fatal() {
        let old = snap(
            "old",
            "2024-11-18",
            vec![entry(EntryId::from_int(1), "通關冰與火之舞", "未開始")],
        );
        let new = snap(
            "new",
            "2024-11-18",
            vec![entry(EntryId::from_int(10), "通關冰與火之歌", "未開始")],
        );
        let mut report = Report::new();
        let err = build_mapping(&positional_event("2024-11-18"), &old, &new, &mut report)
            .unwrap_err();
        assert!(matches!(err, ReconcileError::NameMismatch { .. }));
    }

    #[test]
    fn declared_exception_allows_the_name_change() {
        let mut event = positional_event("2024-11-18");
        event.exceptions.push(NameException {
            new_name: "通關冰與火之歌".to_owned(),
            old_name: "通關 冰與火之舞".to_owned(),
            reason: "game title retyped".to_owned(),
        });
        let old = snap(
            "old",
            "2024-11-18",
            vec![entry(EntryId::from_int(1), "通關冰與火之舞", "未開始")],
        );
        let new = snap(
            "new",
            "2024-11-18",
            vec![entry(EntryId::from_int(10), "通關冰與火之歌", "未開始")],
        );
        let mut report = Report::new();
        let mapping = build_mapping(&event, &old, &new, &mut report).unwrap();
        assert_eq!(
            mapping.get(EntryId::from_int(1)).unwrap().new_id,
            EntryId::from_int(10)
        );
    }

    #[test]
    fn same_as_override_duplicates_a_derived_entry() {
        let mut event = positional_event("2024-11-18");
        event.overrides.push(ManualOverride {
            old_id: EntryId::from_int(96),
            target: OverrideTarget::SameAs(EntryId::from_int(97)),
            reason: "listed twice".to_owned(),
        });
        let old = snap(
            "old",
            "2024-11-18",
            vec![entry(EntryId::from_int(97), "SkyBlock 100等", "未開始")],
        );
        let new = snap(
            "new",
            "2024-11-18",
            vec![entry(EntryId::from_int(98), "SkyBlock 100等", "未開始")],
        );
        let mut report = Report::new();
        let mapping = build_mapping(&event, &old, &new, &mut report).unwrap();
        assert_eq!(
            mapping.get(EntryId::from_int(96)),
            mapping.get(EntryId::from_int(97))
        );
    }

    #[test]
    fn explicit_override_can_introduce_decimal_sub_ids() {
        let mut event = positional_event("2024-11-18");
        event.overrides.push(ManualOverride {
            old_id: EntryId::from_int(50),
            target: OverrideTarget::Explicit {
                new_id: EntryId::from_parts(33, 5),
                name: "拆分項".to_owned(),
            },
            reason: "collision split into a sub-id".to_owned(),
        });
        let old = snap("old", "2024-11-18", vec![]);
        let new = snap("new", "2024-11-18", vec![]);
        let mut report = Report::new();
        let mapping = build_mapping(&event, &old, &new, &mut report).unwrap();
        assert_eq!(
            mapping.get(EntryId::from_int(50)).unwrap().new_id,
            EntryId::from_parts(33, 5)
        );
    }

    #[test]
    fn same_as_override_without_base_entry_is_fatal() {
        let mut event = positional_event("2024-11-18");
        event.overrides.push(ManualOverride {
            old_id: EntryId::from_int(96),
            target: OverrideTarget::SameAs(EntryId::from_int(97)),
            reason: "stale".to_owned(),
        });
        let mut report = Report::new();
        let err = build_mapping(
            &event,
            &snap("old", "2024-11-18", vec![]),
            &snap("new", "2024-11-18", vec![]),
            &mut report,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::BadOverride(id) if id == EntryId::from_int(97)
        ));
    }

    #[test]
    fn unmapped_records_are_dropped_and_reported() {
        let event = positional_event("2024-11-18");
        let old = snap(
            "old",
            "2024-11-18",
            vec![entry(EntryId::from_int(1), "A", "未開始")],
        );
        let new = snap(
            "new",
            "2024-11-18",
            vec![entry(EntryId::from_int(10), "A", "未開始")],
        );
        let earlier = snap(
            "earlier",
            "2024-06-01",
            vec![
                entry(EntryId::from_int(1), "A", "未開始"),
                entry(EntryId::from_int(99), "幽靈項", "未開始"),
            ],
        );

        let mut report = Report::new();
        let mapping = build_mapping(&event, &old, &new, &mut report).unwrap();
        let rewritten =
            apply_event(&event, &mapping, vec![earlier, old, new], &mut report).unwrap();

        assert_eq!(rewritten[0].entries.len(), 1);
        assert_eq!(report.count(Severity::Warning), 1);
    }

    #[test]
    fn by_name_pairing_tolerates_insertions_and_removals() {
        let mut event = positional_event("2025-01-10");
        event.pairing = PairingMode::ByName;
        let old = snap(
            "old",
            "2025-01-10",
            vec![
                entry(EntryId::from_int(1), "A", "未開始"),
                entry(EntryId::from_int(2), "消失項", "未開始"),
            ],
        );
        let new = snap(
            "new",
            "2025-01-10",
            vec![
                entry(EntryId::from_int(10), "A", "未開始"),
                entry(EntryId::from_int(11), "新增項", "未開始"),
            ],
        );
        let mut report = Report::new();
        let mapping = build_mapping(&event, &old, &new, &mut report).unwrap();

        assert_eq!(
            mapping.get(EntryId::from_int(1)).unwrap().new_id,
            EntryId::from_int(10)
        );
        assert!(!mapping.contains(EntryId::from_int(2)));
        assert_eq!(report.count(Severity::Warning), 1); // disappeared
        assert_eq!(report.count(Severity::Info), 1); // new entry
    }

    #[test]
    fn reconcile_rejects_out_of_order_events() {
        let events = vec![positional_event("2025-01-01"), positional_event("2024-01-01")];
        let mut report = Report::new();
        let err = reconcile(Vec::new(), &events, &mut report).unwrap_err();
        assert!(matches!(err, ReconcileError::EventsOutOfOrder { .. }));
    }

    #[test]
    fn reconcile_requires_both_event_snapshots() {
        let events = vec![positional_event("2024-11-18")];
        let mut report = Report::new();
        let err = reconcile(Vec::new(), &events, &mut report).unwrap_err();
        assert!(matches!(err, ReconcileError::MissingEventCommit { .. }));
    }

    #[test]
    fn sequential_passes_compose_across_events() {
        let first = positional_event("2024-11-18");
        let mut second = positional_event("2025-02-01");
        second.source_commit = "old2".to_owned();
        second.target_commit = "new2".to_owned();

        let snapshots = vec![
            snap(
                "earlier",
                "2024-06-01",
                vec![entry(EntryId::from_int(1), "A", "進行中")],
            ),
            snap(
                "old",
                "2024-11-18",
                vec![entry(EntryId::from_int(1), "A", "未開始")],
            ),
            snap(
                "new",
                "2024-11-18",
                vec![entry(EntryId::from_int(10), "A", "未開始")],
            ),
            snap(
                "old2",
                "2025-02-01",
                vec![entry(EntryId::from_int(10), "A", "未開始")],
            ),
            snap(
                "new2",
                "2025-02-01",
                vec![entry(EntryId::from_int(100), "A", "未開始")],
            ),
        ];

        let mut report = Report::new();
        let out = reconcile(snapshots, &[first, second], &mut report).unwrap();
        // 1 → 10 → 100 across the two passes.
        assert_eq!(out[0].entries[0].id, EntryId::from_int(100));
    }
}
