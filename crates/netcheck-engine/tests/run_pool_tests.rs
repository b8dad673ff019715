#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::*;
use netcheck_core::diff::{DiffStatus, Verdict};
use netcheck_core::dialect::Vendor;
use netcheck_core::tabulate::TabulateOptions;
use netcheck_engine::{run, CaptureSource, DeviceJob, DeviceStatus, RunOptions};
use std::io::Write;
use tokio_util::sync::CancellationToken;

fn fleet() -> Vec<DeviceJob> {
    vec![
        job("r5", false),
        job("r3", true),
        job("r1", false),
        job("r4", true),
        job("r2", false),
    ]
}

#[tokio::test]
async fn test_reports_are_sorted_by_device_id() {
    let report = run(registry(), fleet(), RunOptions::default(), CancellationToken::new()).await;

    let ids: Vec<&str> = report.devices.iter().map(|d| d.device_id.as_str()).collect();
    assert_eq!(ids, vec!["r1", "r2", "r3", "r4", "r5"]);
    assert_eq!(report.device("r3").unwrap().status, DeviceStatus::Fail);
    assert_eq!(report.device("r2").unwrap().status, DeviceStatus::Pass);

    assert_eq!(report.summary.total, 5);
    assert_eq!(report.summary.passed, 3);
    assert_eq!(report.summary.failed, 2);
    assert_eq!(report.summary.verdict, Verdict::Fail);
    assert!(report.summary.complete);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_rows_identical_regardless_of_scheduling() {
    let serial = run(
        registry(),
        fleet(),
        RunOptions {
            max_concurrency: 1,
            tabulate: TabulateOptions::default(),
        },
        CancellationToken::new(),
    )
    .await;
    let mut reversed = fleet();
    reversed.reverse();
    let parallel = run(
        registry(),
        reversed,
        RunOptions {
            max_concurrency: 8,
            tabulate: TabulateOptions::default(),
        },
        CancellationToken::new(),
    )
    .await;

    assert_eq!(
        serde_json::to_string(&serial.rows).unwrap(),
        serde_json::to_string(&parallel.rows).unwrap()
    );
    assert_eq!(
        serde_json::to_string(&serial.devices).unwrap(),
        serde_json::to_string(&parallel.devices).unwrap()
    );
    assert_ne!(serial.run_id, parallel.run_id);
}

#[tokio::test]
async fn test_rows_cover_failing_devices_only() {
    let report = run(registry(), fleet(), RunOptions::default(), CancellationToken::new()).await;

    let devices: Vec<&str> = report.rows.iter().map(|r| r.device.as_str()).collect();
    assert_eq!(devices, vec!["r3", "r3", "r4", "r4"]);
    assert!(report.rows.iter().all(|r| r.status == DiffStatus::Changed));
}

#[tokio::test]
async fn test_cancelled_run_marks_devices_incomplete() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let report = run(registry(), fleet(), RunOptions::default(), cancel).await;

    assert!(report
        .devices
        .iter()
        .all(|d| d.status == DeviceStatus::Incomplete && d.result.is_none()));
    assert_eq!(report.summary.incomplete, 5);
    assert!(!report.summary.complete);
    // No finished device failed, but the run is flagged incomplete.
    assert_eq!(report.summary.verdict, Verdict::Pass);
    assert!(report.rows.is_empty());
    assert_eq!(report.failures.len(), 5);
    assert!(report.failures.iter().all(|f| f.code == "ERR_CANCELLED"));
}

#[tokio::test]
async fn test_fatal_device_error_does_not_stop_others() {
    let mut jobs = fleet();
    jobs.push(DeviceJob::new(
        "r0",
        Vendor::Junos,
        inline("banner only, the session dropped\n".to_string()),
        inline(transcript("r0", &[("show interfaces terse", TERSE_UP)])),
    ));

    let report = run(registry(), jobs, RunOptions::default(), CancellationToken::new()).await;

    let r0 = report.device("r0").unwrap();
    assert_eq!(r0.status, DeviceStatus::Aborted);
    assert_eq!(r0.failures[0].code(), "ERR_SEGMENTATION");
    assert_eq!(report.summary.aborted, 1);
    assert_eq!(report.summary.passed, 3);
    assert_eq!(report.failures[0].device, "r0");
}

#[tokio::test]
async fn test_duplicate_device_id_is_rejected() {
    // GIVEN: the same device listed twice, the first job passing
    let jobs = vec![job("r1", false), job("r1", true)];

    // WHEN: running
    let report = run(registry(), jobs, RunOptions::default(), CancellationToken::new()).await;

    // THEN: the scheduled report leads, the duplicate is aborted after it
    assert_eq!(report.devices.len(), 2);
    let statuses: Vec<DeviceStatus> = report.devices.iter().map(|d| d.status).collect();
    assert_eq!(statuses, [DeviceStatus::Pass, DeviceStatus::Aborted]);
    assert_eq!(report.device("r1").unwrap().status, DeviceStatus::Pass);
    assert!(report.device("r1").unwrap().result.is_some());
    assert!(report.failures.iter().any(|f| f.code == "ERR_INVALID_INPUT"));
}

#[tokio::test]
async fn test_file_sources_are_read_on_workers() {
    let dir = tempfile::tempdir().unwrap();
    let pre_path = dir.path().join("r1-pre.txt");
    let post_path = dir.path().join("r1-post.txt");
    std::fs::File::create(&pre_path)
        .unwrap()
        .write_all(transcript("r1", &[("show interfaces terse", TERSE_UP)]).as_bytes())
        .unwrap();
    std::fs::File::create(&post_path)
        .unwrap()
        .write_all(transcript("r1", &[("show interfaces terse", TERSE_DOWN)]).as_bytes())
        .unwrap();

    let jobs = vec![
        DeviceJob::new(
            "r1",
            Vendor::Junos,
            CaptureSource::File(pre_path),
            CaptureSource::File(post_path),
        ),
        DeviceJob::new(
            "r2",
            Vendor::Junos,
            CaptureSource::File(dir.path().join("missing.txt")),
            CaptureSource::File(dir.path().join("missing.txt")),
        ),
    ];
    let report = run(registry(), jobs, RunOptions::default(), CancellationToken::new()).await;

    assert_eq!(report.device("r1").unwrap().status, DeviceStatus::Fail);
    let r2 = report.device("r2").unwrap();
    assert_eq!(r2.status, DeviceStatus::Aborted);
    assert_eq!(r2.failures[0].code(), "ERR_IO");
}

#[tokio::test]
async fn test_include_unchanged_rows() {
    let report = run(
        registry(),
        vec![job("r1", false)],
        RunOptions {
            max_concurrency: 2,
            tabulate: TabulateOptions {
                include_unchanged: true,
            },
        },
        CancellationToken::new(),
    )
    .await;

    // Two interfaces and one BGP peer, all unchanged.
    assert_eq!(report.rows.len(), 3);
    assert!(report.rows.iter().all(|r| r.status == DiffStatus::Unchanged));
}
