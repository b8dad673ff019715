#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use netcheck_core::dialect::Vendor;
use netcheck_core::diff::{compare, CommandVerdict, DiffStatus, Verdict};
use netcheck_core::errors::ExErrorKind;
use netcheck_core::failure::Failure;
use netcheck_core::model::{FieldValue, NaturalKey, ParsedRecord, Phase};
use netcheck_core::snapshot::{build, Snapshot, SnapshotBuilder};
use proptest::prelude::*;
use std::collections::BTreeMap;

const BGP: &str = "show bgp summary";

fn peer(address: &str, out_q: i64, in_pkt: i64, state: &str) -> ParsedRecord {
    let mut fields = BTreeMap::new();
    fields.insert("peer".to_string(), FieldValue::Str(address.to_string()));
    fields.insert("peer_as".to_string(), FieldValue::Int(65002));
    fields.insert("in_pkt".to_string(), FieldValue::Int(in_pkt));
    fields.insert("out_q".to_string(), FieldValue::Int(out_q));
    fields.insert("state".to_string(), FieldValue::Str(state.to_string()));
    ParsedRecord::new(cmd(BGP), NaturalKey::from(address), fields)
}

fn bgp_snapshot(phase: Phase, peers: Vec<ParsedRecord>) -> Snapshot {
    let mut commands = BTreeMap::new();
    commands.insert(cmd(BGP), peers);
    build(DEVICE, phase, commands).unwrap()
}

#[test]
fn test_full_capture_diff_classifies_every_change() {
    let registry = registry();
    let pre = snapshot_from(&registry, Vendor::Junos, Phase::Pre, &all_junos_pre());
    let post = snapshot_from(&registry, Vendor::Junos, Phase::Post, &all_junos_post());

    let result = compare(&registry, &pre, &post).unwrap();
    assert_eq!(result.verdict, Verdict::Fail);
    assert!(!result.identical);

    // ge-0/0/1 and ge-0/0/1.0 went down, one BGP peer dropped.
    let changed: Vec<String> = result
        .entries_with(DiffStatus::Changed)
        .map(|e| format!("{} {}", e.command, e.key.as_ref().unwrap()))
        .collect();
    assert_eq!(
        changed,
        vec![
            "show interfaces terse ge-0/0/1",
            "show interfaces terse ge-0/0/1.0",
            "show bgp summary 10.0.1.2",
        ]
    );
    assert_eq!(result.count(DiffStatus::Added), 1);
    assert_eq!(result.count(DiffStatus::Removed), 1);
    assert_eq!(result.count(DiffStatus::CommandMissing), 0);

    // The release string is ignored, so show version passes.
    let version = result
        .commands
        .iter()
        .find(|c| c.command == cmd("show version"))
        .unwrap();
    assert_eq!(version.verdict, CommandVerdict::Pass);
    assert_eq!(version.unchanged, 1);
}

#[test]
fn test_commands_follow_registry_order() {
    let registry = registry();
    let pre = snapshot_from(&registry, Vendor::Junos, Phase::Pre, &all_junos_pre());
    let result = compare(&registry, &pre, &pre).unwrap();

    let order: Vec<_> = result.commands.iter().map(|c| c.command.to_string()).collect();
    let expected: Vec<_> = registry
        .commands()
        .map(|c| c.id().to_string())
        .filter(|id| id != "show ip interface brief")
        .collect();
    assert_eq!(order, expected);
}

#[test]
fn test_changed_entry_lists_only_differing_fields() {
    let registry = registry();
    let pre = bgp_snapshot(Phase::Pre, vec![peer("10.0.0.2", 0, 100, "Establ")]);
    let post = bgp_snapshot(Phase::Post, vec![peer("10.0.0.2", 0, 900, "Active")]);

    let result = compare(&registry, &pre, &post).unwrap();
    let entry = &result.entries[0];
    assert_eq!(entry.status, DiffStatus::Changed);
    assert_eq!(entry.changes.len(), 1);
    assert_eq!(entry.changes[0].field, "state");
    assert_eq!(entry.changes[0].pre, Some(FieldValue::Str("Establ".into())));
    assert_eq!(entry.changes[0].post, Some(FieldValue::Str("Active".into())));
}

#[test]
fn test_command_missing_names_phase_without_output() {
    let registry = registry();
    let pre = bgp_snapshot(Phase::Pre, vec![peer("10.0.0.2", 0, 1, "Establ")]);
    let post = build(DEVICE, Phase::Post, BTreeMap::new()).unwrap();

    let result = compare(&registry, &pre, &post).unwrap();
    assert_eq!(result.entries.len(), 1);
    assert_eq!(result.entries[0].status, DiffStatus::CommandMissing);
    assert_eq!(result.entries[0].missing_in, Some(Phase::Post));
    assert_eq!(result.entries[0].key, None);
    assert_eq!(result.verdict, Verdict::Fail);
}

#[test]
fn test_excluded_command_is_unvalidated_without_entries() {
    let registry = registry();
    let pre = bgp_snapshot(Phase::Pre, vec![peer("10.0.0.2", 0, 1, "Establ")]);
    let mut builder = SnapshotBuilder::new(DEVICE, Phase::Post);
    builder.exclude(
        cmd(BGP),
        Failure::new(ExErrorKind::ParseFailure, DEVICE, "table header not found")
            .with_phase(Phase::Post)
            .with_command(cmd(BGP)),
    );
    let post = builder.build().unwrap();

    let result = compare(&registry, &pre, &post).unwrap();
    assert!(result.entries.is_empty());
    assert_eq!(result.commands[0].verdict, CommandVerdict::Unvalidated);
    assert_eq!(result.verdict, Verdict::Pass);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].code(), "ERR_PARSE_FAILURE");
    assert!(!result.identical);
}

#[test]
fn test_different_devices_are_rejected() {
    let registry = registry();
    let pre = bgp_snapshot(Phase::Pre, vec![]);
    let post = build("other-router", Phase::Post, BTreeMap::new()).unwrap();
    let err = compare(&registry, &pre, &post).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::DeviceMismatch);
}

#[test]
fn test_address_list_order_does_not_matter() {
    let registry = registry();
    let command = cmd("show vrrp summary");
    let record = |addresses: Vec<&str>| {
        let mut fields = BTreeMap::new();
        fields.insert("interface".to_string(), FieldValue::Str("ge-0/0/0.0".into()));
        fields.insert("group".to_string(), FieldValue::Int(1));
        fields.insert(
            "addresses".to_string(),
            FieldValue::List(addresses.into_iter().map(str::to_string).collect()),
        );
        ParsedRecord::new(
            command.clone(),
            NaturalKey::new(vec!["ge-0/0/0.0".into(), "1".into()]),
            fields,
        )
    };
    let mut pre = BTreeMap::new();
    pre.insert(command.clone(), vec![record(vec!["lcl 10.0.0.1", "vip 10.0.0.254"])]);
    let mut post = BTreeMap::new();
    post.insert(command.clone(), vec![record(vec!["vip 10.0.0.254", "lcl 10.0.0.1"])]);

    let result = compare(
        &registry,
        &build(DEVICE, Phase::Pre, pre).unwrap(),
        &build(DEVICE, Phase::Post, post).unwrap(),
    )
    .unwrap();
    assert_eq!(result.entries[0].status, DiffStatus::Unchanged);
}

#[test]
fn test_case_insensitive_field_ignores_case() {
    let registry = registry();
    let command = cmd("show arp no-resolve");
    let record = |mac: &str| {
        let mut fields = BTreeMap::new();
        fields.insert("ip_address".to_string(), FieldValue::Str("10.0.0.2".into()));
        fields.insert("mac_address".to_string(), FieldValue::Str(mac.into()));
        ParsedRecord::new(command.clone(), NaturalKey::from("10.0.0.2"), fields)
    };
    let snap = |phase, mac| {
        let mut commands = BTreeMap::new();
        commands.insert(command.clone(), vec![record(mac)]);
        build(DEVICE, phase, commands).unwrap()
    };

    let result = compare(
        &registry,
        &snap(Phase::Pre, "00:05:86:71:4D:01"),
        &snap(Phase::Post, "00:05:86:71:4d:01"),
    )
    .unwrap();
    assert!(result.is_pass());
    // Digests still differ: the records are not byte-identical.
    assert!(!result.identical);
}

fn peers() -> impl Strategy<Value = Vec<(u8, i64, i64, bool)>> {
    prop::collection::btree_map(any::<u8>(), (0i64..1000, any::<i64>(), any::<bool>()), 0..12)
        .prop_map(|m| m.into_iter().map(|(k, (q, p, up))| (k, q, p, up)).collect())
}

/// Peers on a shared key space: some in one phase only, most in both with
/// independently drawn `out_q` and state, so changed entries are common
fn overlapping_peers() -> impl Strategy<Value = (Vec<(u8, i64, i64, bool)>, Vec<(u8, i64, i64, bool)>)> {
    prop::collection::btree_map(
        0u8..32,
        (0u8..4, 0i64..40, 0i64..40, any::<bool>(), any::<bool>()),
        0..16,
    )
    .prop_map(|m| {
        let mut pre = Vec::new();
        let mut post = Vec::new();
        for (octet, (presence, q_pre, q_post, up_pre, up_post)) in m {
            if presence != 1 {
                pre.push((octet, q_pre, 0, up_pre));
            }
            if presence != 2 {
                post.push((octet, q_post, 0, up_post));
            }
        }
        (pre, post)
    })
}

fn snapshot_of(phase: Phase, peers: &[(u8, i64, i64, bool)]) -> Snapshot {
    bgp_snapshot(
        phase,
        peers
            .iter()
            .map(|(octet, out_q, in_pkt, up)| {
                peer(
                    &format!("10.0.0.{}", octet),
                    *out_q,
                    *in_pkt,
                    if *up { "Establ" } else { "Active" },
                )
            })
            .collect(),
    )
}

proptest! {
    #[test]
    fn prop_snapshot_equals_itself(peers in peers()) {
        let registry = registry();
        let snapshot = snapshot_of(Phase::Pre, &peers);
        let result = compare(&registry, &snapshot, &snapshot).unwrap();
        prop_assert!(result.identical);
        prop_assert!(result.is_pass());
        prop_assert_eq!(result.count(DiffStatus::Unchanged), peers.len());
    }

    #[test]
    fn prop_swapping_phases_mirrors_every_entry((a, b) in overlapping_peers()) {
        let registry = registry();
        let pre = snapshot_of(Phase::Pre, &a);
        let post = snapshot_of(Phase::Post, &b);
        let forward = compare(&registry, &pre, &post).unwrap();
        let backward = compare(&registry, &post, &pre).unwrap();

        prop_assert_eq!(forward.entries.len(), backward.entries.len());
        prop_assert_eq!(forward.verdict, backward.verdict);
        let backward_by_key: BTreeMap<_, _> = backward
            .entries
            .iter()
            .map(|e| (e.key.clone(), e))
            .collect();
        for entry in &forward.entries {
            let mirror = backward_by_key[&entry.key];
            let expected = match entry.status {
                DiffStatus::Added => DiffStatus::Removed,
                DiffStatus::Removed => DiffStatus::Added,
                other => other,
            };
            prop_assert_eq!(mirror.status, expected);
            prop_assert_eq!(entry.changes.len(), mirror.changes.len());
            for (change, mirrored) in entry.changes.iter().zip(&mirror.changes) {
                prop_assert_eq!(&change.field, &mirrored.field);
                prop_assert_eq!(&change.pre, &mirrored.post);
                prop_assert_eq!(&change.post, &mirrored.pre);
            }
        }
    }

    #[test]
    fn prop_out_q_within_threshold_is_unchanged(base in 0i64..1_000_000, delta in -5i64..=5) {
        let registry = registry();
        let pre = bgp_snapshot(Phase::Pre, vec![peer("10.0.0.2", base, 0, "Establ")]);
        let post = bgp_snapshot(Phase::Post, vec![peer("10.0.0.2", base + delta, 0, "Establ")]);
        let result = compare(&registry, &pre, &post).unwrap();
        prop_assert_eq!(result.entries[0].status, DiffStatus::Unchanged);
    }

    #[test]
    fn prop_out_q_beyond_threshold_is_changed(base in 0i64..1_000_000, over in 6i64..10_000, negative in any::<bool>()) {
        let registry = registry();
        let delta = if negative { -over } else { over };
        let pre = bgp_snapshot(Phase::Pre, vec![peer("10.0.0.2", base, 0, "Establ")]);
        let post = bgp_snapshot(Phase::Post, vec![peer("10.0.0.2", base + delta, 0, "Establ")]);
        let result = compare(&registry, &pre, &post).unwrap();
        prop_assert_eq!(result.entries[0].status, DiffStatus::Changed);
        prop_assert_eq!(&result.entries[0].changes[0].field, "out_q");
    }

    #[test]
    fn prop_ignored_counter_never_changes_verdict(a in any::<i64>(), b in any::<i64>()) {
        let registry = registry();
        let pre = bgp_snapshot(Phase::Pre, vec![peer("10.0.0.2", 0, a, "Establ")]);
        let post = bgp_snapshot(Phase::Post, vec![peer("10.0.0.2", 0, b, "Establ")]);
        let result = compare(&registry, &pre, &post).unwrap();
        prop_assert!(result.is_pass());
    }
}
