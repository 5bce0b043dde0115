// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use chrono::{TimeZone, Utc};
use herd_core::{ExitReason, JobBuilder, TriggerType};

fn at(hour: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 1, hour, 0, 0).unwrap()
}

#[test]
fn metadata_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let job = JobBuilder::default()
        .agent("monitor")
        .status(JobStatus::Running)
        .started_at(at(1))
        .build();

    write_job_metadata(dir.path(), &job).unwrap();
    let read_back = read_job_metadata(dir.path(), &job.id).unwrap();

    assert_eq!(read_back.agent, "monitor");
    assert_eq!(read_back.status, JobStatus::Running);
}

#[test]
fn missing_metadata_reads_as_none() {
    let dir = tempfile::tempdir().unwrap();
    let id = herd_core::JobId::generate(Utc::now());
    assert!(read_job_metadata(dir.path(), &id).is_none());
}

#[test]
fn malformed_metadata_is_treated_as_missing() {
    let dir = tempfile::tempdir().unwrap();
    let id = herd_core::JobId::generate(Utc::now());
    let path = job_metadata_path(dir.path(), &id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"not: [valid").unwrap();

    assert!(read_job_metadata(dir.path(), &id).is_none());
}

#[test]
fn list_jobs_filters_by_agent_and_status_and_sorts_descending() {
    let dir = tempfile::tempdir().unwrap();

    let older = JobBuilder::default()
        .agent("monitor")
        .status(JobStatus::Completed)
        .started_at(at(1))
        .build();
    let newer = JobBuilder::default()
        .agent("monitor")
        .status(JobStatus::Completed)
        .started_at(at(3))
        .build();
    let other_agent = JobBuilder::default()
        .agent("builder")
        .status(JobStatus::Completed)
        .started_at(at(2))
        .build();

    write_job_metadata(dir.path(), &older).unwrap();
    write_job_metadata(dir.path(), &newer).unwrap();
    write_job_metadata(dir.path(), &other_agent).unwrap();

    let filter = JobFilter {
        agent: Some("monitor".to_string()),
        ..Default::default()
    };
    let (jobs, error_count) = list_jobs(dir.path(), &filter);

    assert_eq!(error_count, 0);
    assert_eq!(jobs.len(), 2);
    assert_eq!(jobs[0].id, newer.id);
    assert_eq!(jobs[1].id, older.id);
}

#[test]
fn list_jobs_filters_by_started_after_and_before() {
    let dir = tempfile::tempdir().unwrap();
    let early = JobBuilder::default().started_at(at(1)).build();
    let mid = JobBuilder::default().started_at(at(5)).build();
    let late = JobBuilder::default().started_at(at(9)).build();
    write_job_metadata(dir.path(), &early).unwrap();
    write_job_metadata(dir.path(), &mid).unwrap();
    write_job_metadata(dir.path(), &late).unwrap();

    let filter = JobFilter {
        started_after: Some(at(2)),
        started_before: Some(at(8)),
        ..Default::default()
    };
    let (jobs, _) = list_jobs(dir.path(), &filter);

    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, mid.id);
}

#[test]
fn list_jobs_counts_malformed_files_without_failing() {
    let dir = tempfile::tempdir().unwrap();
    let good = JobBuilder::default().build();
    write_job_metadata(dir.path(), &good).unwrap();

    let bad_path = jobs_dir(dir.path()).join("job-2026-01-01-zzzzzz.yaml");
    std::fs::create_dir_all(bad_path.parent().unwrap()).unwrap();
    std::fs::write(&bad_path, b"{{{not yaml").unwrap();

    let (jobs, error_count) = list_jobs(dir.path(), &JobFilter::default());

    assert_eq!(jobs.len(), 1);
    assert_eq!(error_count, 1);
}

#[test]
fn list_jobs_on_missing_directory_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let (jobs, error_count) = list_jobs(dir.path(), &JobFilter::default());
    assert!(jobs.is_empty());
    assert_eq!(error_count, 0);
}

#[test]
fn append_and_read_output_round_trips_in_order() {
    let dir = tempfile::tempdir().unwrap();
    let id = herd_core::JobId::generate(Utc::now());

    append_output(
        dir.path(),
        &id,
        &JobOutputMessage::session_start(at(1), "sess-1"),
    )
    .unwrap();
    append_output(
        dir.path(),
        &id,
        &JobOutputMessage::Assistant {
            timestamp: at(2),
            text: "hello".to_string(),
        },
    )
    .unwrap();

    let messages = read_job_output_all(dir.path(), &id, false).unwrap();

    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].announced_session_id(), Some("sess-1"));
    assert_eq!(messages[1].timestamp(), at(2));
}

#[test]
fn read_output_for_missing_log_returns_empty() {
    let dir = tempfile::tempdir().unwrap();
    let id = herd_core::JobId::generate(Utc::now());
    let messages = read_job_output_all(dir.path(), &id, false).unwrap();
    assert!(messages.is_empty());
}

#[test]
fn malformed_output_line_errors_by_default() {
    let dir = tempfile::tempdir().unwrap();
    let id = herd_core::JobId::generate(Utc::now());
    let path = job_output_path(dir.path(), &id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, b"not json\n").unwrap();

    let result = read_job_output_all(dir.path(), &id, false);

    assert!(matches!(result, Err(StateFileError::MalformedLine { .. })));
}

#[test]
fn malformed_output_line_is_skipped_when_requested() {
    let dir = tempfile::tempdir().unwrap();
    let id = herd_core::JobId::generate(Utc::now());
    let path = job_output_path(dir.path(), &id);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let good = serde_json::to_string(&JobOutputMessage::Assistant {
        timestamp: at(1),
        text: "ok".to_string(),
    })
    .unwrap();
    std::fs::write(&path, format!("not json\n{good}\n\n")).unwrap();

    let messages = read_job_output_all(dir.path(), &id, true).unwrap();

    assert_eq!(messages.len(), 1);
}

#[test]
fn batch_append_stamps_uniform_timestamp() {
    let dir = tempfile::tempdir().unwrap();
    let id = herd_core::JobId::generate(Utc::now());
    let messages = vec![
        JobOutputMessage::Assistant {
            timestamp: at(1),
            text: "a".to_string(),
        },
        JobOutputMessage::Assistant {
            timestamp: at(2),
            text: "b".to_string(),
        },
    ];

    append_output_batch(dir.path(), &id, messages, at(5)).unwrap();
    let read_back = read_job_output_all(dir.path(), &id, false).unwrap();

    assert_eq!(read_back.len(), 2);
    assert!(read_back.iter().all(|m| m.timestamp() == at(5)));
}

#[test]
fn batch_append_writes_nothing_for_an_empty_batch() {
    let dir = tempfile::tempdir().unwrap();
    let id = herd_core::JobId::generate(Utc::now());

    append_output_batch(dir.path(), &id, Vec::new(), at(5)).unwrap();
    let read_back = read_job_output_all(dir.path(), &id, false).unwrap();

    assert!(read_back.is_empty());
}
