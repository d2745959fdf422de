/*!
 * Playback Task Tests
 * Pacing and control commands over a live playback
 */

use pretty_assertions::assert_eq;
use schedsim::{Driver, Frame, PlaybackTask, PolicyKind, ProcessSpec, RecordingSink};
use std::time::Duration;
use tokio::time::timeout;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;

const FAST: Duration = Duration::from_millis(1);
const QUIET: Duration = Duration::from_millis(50);

fn specs() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec::new("P1", 0, vec![4, 2, 3], None).unwrap(),
        ProcessSpec::new("P2", 1, vec![2], None).unwrap(),
    ]
}

fn driver() -> Driver {
    Driver::for_policy(PolicyKind::Srtf)
}

async fn next_frame(frames: &mut ReceiverStream<Frame>) -> Frame {
    timeout(Duration::from_secs(5), frames.next())
        .await
        .expect("frame timed out")
        .expect("stream ended")
}

#[tokio::test]
async fn test_paused_task_emits_nothing() {
    let (task, mut frames) = PlaybackTask::spawn_paused(driver(), specs(), FAST);

    assert!(timeout(QUIET, frames.next()).await.is_err());
    assert!(task.latest().is_none());

    let summary = task.stop().await.unwrap();
    assert_eq!(summary.frames, 0);
    assert_eq!(summary.final_tick, 0);
}

#[tokio::test]
async fn test_step_emits_exactly_one_frame() {
    let (task, mut frames) = PlaybackTask::spawn_paused(driver(), specs(), FAST);

    task.step();
    let frame = next_frame(&mut frames).await;
    assert_eq!(frame.tick(), 0);
    assert_eq!(frame.snapshot.running.as_deref(), Some("P1"));
    assert!(timeout(QUIET, frames.next()).await.is_err());

    task.step();
    assert_eq!(next_frame(&mut frames).await.tick(), 1);
}

#[tokio::test]
async fn test_restart_reproduces_first_frame() {
    let (task, mut frames) = PlaybackTask::spawn_paused(driver(), specs(), FAST);

    task.step();
    let first = next_frame(&mut frames).await;
    task.step();
    task.step();
    next_frame(&mut frames).await;
    next_frame(&mut frames).await;

    task.restart();
    task.step();
    assert_eq!(next_frame(&mut frames).await, first);

    let summary = task.stop().await.unwrap();
    assert_eq!(summary.restarts, 1);
    assert_eq!(summary.frames, 4);
}

#[tokio::test]
async fn test_stop_ends_frame_stream() {
    let (task, mut frames) = PlaybackTask::spawn(driver(), specs(), Duration::from_secs(3600));

    // The first interval tick fires immediately
    assert_eq!(next_frame(&mut frames).await.tick(), 0);

    let summary = task.stop().await.unwrap();
    assert!(!summary.finished);
    assert_eq!(summary.final_tick, 1);
    assert!(frames.next().await.is_none());
}

#[tokio::test]
async fn test_pause_and_resume() {
    let (task, mut frames) =
        PlaybackTask::spawn_paused(driver(), specs(), Duration::from_millis(20));

    task.resume();
    let first = next_frame(&mut frames).await;
    task.pause();

    // Drain what was produced before the pause landed
    let mut last = first.tick();
    while let Ok(Some(frame)) = timeout(QUIET, frames.next()).await {
        last = frame.tick();
    }
    assert_eq!(task.latest().map(|f| f.tick()), Some(last));

    task.resume();
    assert_eq!(next_frame(&mut frames).await.tick(), last + 1);
}

#[tokio::test]
async fn test_frame_delay_can_be_shortened() {
    let (task, frames) = PlaybackTask::spawn(driver(), specs(), Duration::from_secs(3600));

    task.set_frame_delay(FAST);
    let ticks: Vec<u64> = timeout(Duration::from_secs(5), frames.map(|f| f.tick()).collect())
        .await
        .unwrap();

    assert_eq!(ticks, (0..=11).collect::<Vec<_>>());
    assert!(task.join().await.unwrap().finished);
}

#[tokio::test]
async fn test_playback_matches_direct_run() {
    let specs = specs();
    let expected = driver().run(&specs).unwrap();

    let (task, mut frames) = PlaybackTask::spawn(driver(), specs.clone(), FAST);
    let mut sink = RecordingSink::new();
    while let Some(frame) = frames.next().await {
        frame.render_to(&mut sink);
    }

    let summary = task.join().await.unwrap();
    assert!(summary.finished);
    assert_eq!(summary.error, None);
    assert_eq!(sink.into_trace(PolicyKind::Srtf, 0, specs), expected);
}
