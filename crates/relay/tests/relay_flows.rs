//! End-to-end tests for the two relay paths over the in-memory bus.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use tempfile::tempdir;
use tokio::sync::mpsc;
use tokio::time::timeout;
use wstail_messaging::subject::{PublishableSubject, Subject};
use wstail_messaging_memory::{MemoryBus, MemorySubject};
use wstail_relay::render::PlainText;
use wstail_relay::viewer::ViewerSink;
use wstail_relay::writer::WriterRegistry;
use wstail_relay::{Error, LogFrame, RelayConfig, Result, file_relay, viewer};

struct ChannelSink(mpsc::Sender<LogFrame>);

#[async_trait]
impl ViewerSink for ChannelSink {
    async fn send(&mut self, frame: LogFrame) -> Result<()> {
        self.0.send(frame).await.map_err(|_| Error::SendClosed)
    }
}

async fn wait_for_file(path: &Path, want: &str) {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        if let Ok(contents) = std::fs::read_to_string(path) {
            if contents == want {
                return;
            }
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {} to contain {want:?}",
            path.display()
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

async fn recv_frame(rx: &mut mpsc::Receiver<LogFrame>) -> LogFrame {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for frame")
        .expect("sink channel closed")
}

#[tokio::test]
async fn file_relay_routes_lines_to_per_source_files() {
    let root = tempdir().unwrap();
    let bus = MemoryBus::new();
    let prefix = MemorySubject::new(&bus, "wslogger").unwrap();

    let subscription = prefix.any().subscribe().await.unwrap();
    let registry = WriterRegistry::new(root.path().to_path_buf(), 32 * 1024 * 1024);
    let relay = tokio::spawn(file_relay::run(subscription, registry));

    let svc1 = prefix.scope("svc1").unwrap();
    let svc2 = prefix.scope("svc2").unwrap();
    svc1.publish(Bytes::from("alpha")).await.unwrap();
    svc2.publish(Bytes::from("beta")).await.unwrap();
    svc1.publish(Bytes::from("gamma")).await.unwrap();

    wait_for_file(&root.path().join("svc1.log"), "alpha\ngamma\n").await;
    wait_for_file(&root.path().join("svc2.log"), "beta\n").await;

    relay.abort();
}

#[tokio::test]
async fn file_relay_survives_one_bad_source() {
    let root = tempdir().unwrap();
    // Occupy svc_bad's path with a directory so its writer cannot open.
    std::fs::create_dir(root.path().join("svc_bad.log")).unwrap();

    let bus = MemoryBus::new();
    let prefix = MemorySubject::new(&bus, "wslogger").unwrap();

    let subscription = prefix.any().subscribe().await.unwrap();
    let registry = WriterRegistry::new(root.path().to_path_buf(), 32 * 1024 * 1024);
    let relay = tokio::spawn(file_relay::run(subscription, registry));

    prefix
        .scope("svc_bad")
        .unwrap()
        .publish(Bytes::from("boom"))
        .await
        .unwrap();
    prefix
        .scope("svc_ok")
        .unwrap()
        .publish(Bytes::from("fine"))
        .await
        .unwrap();

    wait_for_file(&root.path().join("svc_ok.log"), "fine\n").await;

    relay.abort();
}

#[tokio::test]
async fn viewer_seeds_history_then_streams_live_in_order() {
    let root = tempdir().unwrap();
    std::fs::write(root.path().join("svc1.log"), "old1\nold2\n").unwrap();

    let bus = MemoryBus::new();
    let prefix = MemorySubject::new(&bus, "wslogger").unwrap();
    let wildcard = prefix.any();
    let config = RelayConfig::new(root.path());

    let (tx, mut rx) = mpsc::channel(64);
    let session = tokio::spawn(async move {
        let mut sink = ChannelSink(tx);
        viewer::run(&wildcard, "svc1", &config, &PlainText, &mut sink).await
    });

    assert_eq!(recv_frame(&mut rx).await, LogFrame::new("svc1", "old1"));
    assert_eq!(recv_frame(&mut rx).await, LogFrame::new("svc1", "old2"));

    // Seeding happens after the subscription is established, so from here
    // on every publish is guaranteed to reach the session.
    let svc1 = prefix.scope("svc1").unwrap();
    let svc2 = prefix.scope("svc2").unwrap();
    svc1.publish(Bytes::from("live1")).await.unwrap();
    svc2.publish(Bytes::from("other")).await.unwrap();
    svc1.publish(Bytes::from("live2")).await.unwrap();

    assert_eq!(recv_frame(&mut rx).await, LogFrame::new("svc1", "live1"));
    assert_eq!(recv_frame(&mut rx).await, LogFrame::new("svc1", "live2"));

    session.abort();
}

#[tokio::test]
async fn two_sessions_see_only_their_own_source() {
    let root = tempdir().unwrap();
    std::fs::write(root.path().join("svc1.log"), "h1\n").unwrap();
    std::fs::write(root.path().join("svc2.log"), "h2\n").unwrap();

    let bus = MemoryBus::new();
    let prefix = MemorySubject::new(&bus, "wslogger").unwrap();
    let config = RelayConfig::new(root.path());

    let (tx1, mut rx1) = mpsc::channel(64);
    let wildcard = prefix.any();
    let config1 = config.clone();
    let session1 = tokio::spawn(async move {
        let mut sink = ChannelSink(tx1);
        viewer::run(&wildcard, "svc1", &config1, &PlainText, &mut sink).await
    });

    let (tx2, mut rx2) = mpsc::channel(64);
    let wildcard = prefix.any();
    let session2 = tokio::spawn(async move {
        let mut sink = ChannelSink(tx2);
        viewer::run(&wildcard, "svc2", &config, &PlainText, &mut sink).await
    });

    assert_eq!(recv_frame(&mut rx1).await, LogFrame::new("svc1", "h1"));
    assert_eq!(recv_frame(&mut rx2).await, LogFrame::new("svc2", "h2"));

    prefix
        .scope("svc1")
        .unwrap()
        .publish(Bytes::from("hello"))
        .await
        .unwrap();
    prefix
        .scope("svc2")
        .unwrap()
        .publish(Bytes::from("done"))
        .await
        .unwrap();

    assert_eq!(recv_frame(&mut rx1).await, LogFrame::new("svc1", "hello"));
    // svc2's first live frame skips svc1's publish entirely.
    assert_eq!(recv_frame(&mut rx2).await, LogFrame::new("svc2", "done"));

    session1.abort();
    session2.abort();
}

#[tokio::test]
async fn viewer_with_escaping_name_gets_no_history_but_stays_live() {
    let root = tempdir().unwrap();
    let bus = MemoryBus::new();
    let prefix = MemorySubject::new(&bus, "wslogger").unwrap();
    let wildcard = prefix.any();
    let config = RelayConfig::new(root.path());

    let (tx, mut rx) = mpsc::channel(64);
    let session = tokio::spawn(async move {
        let mut sink = ChannelSink(tx);
        viewer::run(&wildcard, "../../etc/passwd", &config, &PlainText, &mut sink).await
    });

    // No seeding to synchronize on, so publish until the session answers.
    let subject = prefix.scope("../../etc/passwd").unwrap();
    let mut delivered = None;
    for _ in 0..100 {
        subject.publish(Bytes::from("live line")).await.unwrap();
        if let Ok(Some(frame)) = timeout(Duration::from_millis(50), rx.recv()).await {
            delivered = Some(frame);
            break;
        }
    }
    let frame = delivered.expect("session never went live");
    assert_eq!(frame.name, "../../etc/passwd");
    assert_eq!(frame.line, "live line");

    // Nothing was created on disk for it.
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);

    session.abort();
}

#[tokio::test]
async fn viewer_disconnect_ends_session_cleanly() {
    let root = tempdir().unwrap();
    std::fs::write(root.path().join("svc1.log"), "old\n").unwrap();

    let bus = MemoryBus::new();
    let prefix = MemorySubject::new(&bus, "wslogger").unwrap();
    let wildcard = prefix.any();
    let config = RelayConfig::new(root.path());

    let (tx, rx) = mpsc::channel(1);
    drop(rx);

    let mut sink = ChannelSink(tx);
    let result = viewer::run(&wildcard, "svc1", &config, &PlainText, &mut sink).await;
    assert!(result.is_ok(), "viewer loss must close the session quietly");
}
