//! Background merges: progress delivery, cancellation and list locking.

use doccat::config::MergeOptions;
use doccat::error::DocCatError;
use doccat::format::OutputFormat;
use doccat::merge::{CancelHandle, MergeTask, Merger};
use doccat::session::InputList;

use crate::common::*;

#[tokio::test]
async fn test_one_ordered_update_per_input() {
    let dir = scratch();
    let inputs: Vec<_> = (0..5)
        .map(|i| write_xml(dir.path(), &format!("{i}.xml"), "<node>text</node>"))
        .collect();
    let output = dir.path().join("out.pdf");

    let merger = Merger::new(MergeOptions::new(OutputFormat::Pdf));
    let mut task = MergeTask::spawn(merger, items(&inputs), output.clone());

    let mut updates = Vec::new();
    while let Some(update) = task.next_progress().await {
        updates.push(update);
    }

    let completed: Vec<usize> = updates.iter().map(|u| u.completed).collect();
    let percents: Vec<u8> = updates.iter().map(|u| u.percent).collect();
    assert_eq!(completed, vec![1, 2, 3, 4, 5]);
    assert_eq!(percents, vec![20, 40, 60, 80, 100]);
    assert!(updates.iter().all(|u| u.total == 5));
    assert!(updates.last().unwrap().is_complete());

    let report = task.wait().await.unwrap();
    assert_eq!(report.output.output_path, output);
    assert!(output.exists());
}

#[tokio::test]
async fn test_failure_is_reported_after_partial_progress() {
    let dir = scratch();
    let inputs = vec![
        write_xml(dir.path(), "ok.xml", "<ok/>"),
        write_xml(dir.path(), "bad.xml", "<bad>"),
        write_xml(dir.path(), "never.xml", "<never/>"),
    ];
    let output = dir.path().join("out.docx");

    let merger = Merger::new(MergeOptions::new(OutputFormat::Docx));
    let mut task = MergeTask::spawn(merger, items(&inputs), output.clone());

    let mut percents = Vec::new();
    while let Some(update) = task.next_progress().await {
        percents.push(update.percent);
    }

    assert_eq!(percents, vec![33]);
    let err = task.wait().await.unwrap_err();
    assert_eq!(err.path(), Some(&inputs[1]));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_cancel_before_start() {
    let dir = scratch();
    let inputs = vec![write_pdf(dir.path(), "a.pdf", 2)];
    let output = dir.path().join("out.pdf");

    let cancel = CancelHandle::default();
    cancel.cancel();
    let merger = Merger::new(MergeOptions::new(OutputFormat::Pdf));
    let task = MergeTask::spawn_with_cancel(merger, items(&inputs), output.clone(), cancel);

    assert!(matches!(task.wait().await, Err(DocCatError::Cancelled)));
    assert!(!output.exists());
}

#[tokio::test]
async fn test_list_is_locked_during_merge_and_cleared_on_success() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "a.pdf", 1);
    let b = write_image(dir.path(), "b.png", 4, 4);

    let mut list = InputList::new();
    list.add(&a).unwrap();
    list.add(&b).unwrap();
    list.move_item(1, 0).unwrap();
    let snapshot = list.begin_merge().unwrap();
    assert_eq!(snapshot[0].path, b);

    assert!(matches!(list.add(&a), Err(DocCatError::ListBusy)));
    assert!(matches!(list.remove(0), Err(DocCatError::ListBusy)));
    assert!(matches!(list.clear(), Err(DocCatError::ListBusy)));

    let merger = Merger::new(MergeOptions::new(OutputFormat::Pdf));
    let result = MergeTask::spawn(merger, snapshot, dir.path().join("out.pdf"))
        .wait()
        .await;
    list.finish_merge(result.is_ok());

    assert!(result.is_ok());
    assert!(list.is_empty());
    assert!(!list.is_merging());
}

#[tokio::test]
async fn test_list_survives_failed_merge() {
    let dir = scratch();
    let good = write_xml(dir.path(), "good.xml", "<a/>");
    let bad = write_bytes(dir.path(), "bad.jpg", b"not a jpeg");

    let mut list = InputList::new();
    list.add_all([&good, &bad]).unwrap();
    let snapshot = list.begin_merge().unwrap();

    let merger = Merger::new(MergeOptions::new(OutputFormat::Pdf));
    let result = MergeTask::spawn(merger, snapshot, dir.path().join("out.pdf"))
        .wait()
        .await;
    list.finish_merge(result.is_ok());

    assert!(result.is_err());
    assert_eq!(list.len(), 2);
    list.remove_path(&bad).unwrap();
    assert_eq!(list.items()[0].path, good);
}
