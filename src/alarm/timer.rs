//! Background timing task for a single armed alarm.
//!
//! Each task owns one thread that publishes the countdown and reports expiry
//! over a channel. The thread sleeps on a cancellation channel, so cancelling
//! (or dropping the task) wakes it immediately.

use chrono::{Local, NaiveDateTime};
use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::countdown::format_remaining;
use crate::messages::{AlarmEvent, AlarmId};

/// Source of the current local wall-clock time
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// Called after every event so the UI can repaint
pub type Waker = Arc<dyn Fn() + Send + Sync>;

#[cfg(test)]
pub fn noop_waker() -> Waker {
    Arc::new(|| {})
}

pub struct AlarmTask {
    cancel_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl AlarmTask {
    pub fn spawn(
        id: AlarmId,
        target: NaiveDateTime,
        poll_interval: Duration,
        clock: Arc<dyn Clock>,
        event_tx: Sender<AlarmEvent>,
        waker: Waker,
    ) -> std::io::Result<Self> {
        let (cancel_tx, cancel_rx) = bounded::<()>(1);

        let handle = thread::Builder::new()
            .name(format!("alarm-{}", id.0))
            .spawn(move || {
                run_timer(
                    id,
                    target,
                    poll_interval,
                    clock.as_ref(),
                    &event_tx,
                    &cancel_rx,
                    &waker,
                )
            })?;

        Ok(Self {
            cancel_tx: Some(cancel_tx),
            handle: Some(handle),
        })
    }

    /// Whether the worker thread has exited
    #[cfg(test)]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Stop the worker and wait for it to exit
    pub fn cancel(&mut self) {
        // Dropping the sender disconnects the channel, which wakes the worker
        self.cancel_tx.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Alarm timer thread panicked");
            }
        }
    }
}

impl Drop for AlarmTask {
    fn drop(&mut self) {
        self.cancel();
    }
}

fn run_timer(
    id: AlarmId,
    target: NaiveDateTime,
    poll_interval: Duration,
    clock: &dyn Clock,
    event_tx: &Sender<AlarmEvent>,
    cancel_rx: &Receiver<()>,
    waker: &Waker,
) {
    let mut last_display: Option<String> = None;

    loop {
        let remaining = target - clock.now();

        let display = format_remaining(remaining);
        if last_display.as_deref() != Some(display.as_str()) {
            if event_tx
                .send(AlarmEvent::Tick {
                    id,
                    display: display.clone(),
                })
                .is_err()
            {
                return;
            }
            waker();
            last_display = Some(display);
        }

        // Sleep until the next poll, or exactly until the target if that is sooner
        let wait = match remaining.to_std() {
            Ok(left) if !left.is_zero() => left.min(poll_interval),
            _ => {
                log::info!("Alarm {} expired", id);
                let _ = event_tx.send(AlarmEvent::Expired { id });
                waker();
                return;
            }
        };

        match cancel_rx.recv_timeout(wait) {
            Err(RecvTimeoutError::Timeout) => {}
            Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                log::debug!("Alarm {} timer cancelled", id);
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Instant;

    fn collect_until_expired(rx: &Receiver<AlarmEvent>, timeout: Duration) -> Vec<AlarmEvent> {
        let deadline = Instant::now() + timeout;
        let mut events = Vec::new();
        while let Ok(event) = rx.recv_deadline(deadline) {
            let done = matches!(event, AlarmEvent::Expired { .. });
            events.push(event);
            if done {
                break;
            }
        }
        events
    }

    #[test]
    fn test_task_expires_once() {
        let (tx, rx) = unbounded();
        let clock = Arc::new(LocalClock);
        let target = clock.now() + chrono::Duration::milliseconds(300);
        let started = Instant::now();

        let mut task = AlarmTask::spawn(
            AlarmId(1),
            target,
            Duration::from_millis(50),
            clock,
            tx,
            noop_waker(),
        )
        .unwrap();

        let events = collect_until_expired(&rx, Duration::from_secs(3));
        let elapsed = started.elapsed();

        assert_eq!(events.last(), Some(&AlarmEvent::Expired { id: AlarmId(1) }));
        assert!(elapsed >= Duration::from_millis(250), "fired early: {:?}", elapsed);
        assert!(elapsed < Duration::from_secs(2), "fired late: {:?}", elapsed);

        task.cancel();
        assert!(task.is_finished());

        let late: Vec<AlarmEvent> = rx.try_iter().collect();
        let expired_count = events
            .iter()
            .chain(late.iter())
            .filter(|e| matches!(e, AlarmEvent::Expired { .. }))
            .count();
        assert_eq!(expired_count, 1);
    }

    #[test]
    fn test_default_poll_expires_within_one_poll_of_target() {
        let (tx, rx) = unbounded();
        let clock = Arc::new(LocalClock);
        let offset = Duration::from_millis(1200);
        let poll = Duration::from_millis(500);
        let started = Instant::now();
        let target = clock.now() + chrono::Duration::milliseconds(1200);

        let _task = AlarmTask::spawn(AlarmId(5), target, poll, clock, tx, noop_waker()).unwrap();

        let events = collect_until_expired(&rx, Duration::from_secs(5));
        let elapsed = started.elapsed();

        assert_eq!(events.last(), Some(&AlarmEvent::Expired { id: AlarmId(5) }));
        assert!(elapsed >= offset - Duration::from_millis(50), "fired early: {:?}", elapsed);
        // The last wait is clipped to the time left, so expiry never trails by a full poll
        assert!(
            elapsed < offset + poll + Duration::from_millis(300),
            "fired late: {:?}",
            elapsed
        );
    }

    #[test]
    fn test_task_publishes_countdown_changes_only() {
        let (tx, rx) = unbounded();
        let clock = Arc::new(LocalClock);
        let target = clock.now() + chrono::Duration::milliseconds(1500);

        let _task = AlarmTask::spawn(
            AlarmId(2),
            target,
            Duration::from_millis(20),
            clock,
            tx,
            noop_waker(),
        )
        .unwrap();

        let events = collect_until_expired(&rx, Duration::from_secs(5));
        let displays: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                AlarmEvent::Tick { display, .. } => Some(display.as_str()),
                AlarmEvent::Expired { .. } => None,
            })
            .collect();

        // Polling every 20ms must not republish the same display
        assert!(displays.len() <= 3, "too many ticks: {:?}", displays);
        assert_eq!(displays.first(), Some(&"00:01"));
        assert_eq!(displays.last(), Some(&"00:00"));
        assert!(matches!(events.last(), Some(AlarmEvent::Expired { .. })));
    }

    #[test]
    fn test_cancelled_task_never_expires() {
        let (tx, rx) = unbounded();
        let clock = Arc::new(LocalClock);
        let target = clock.now() + chrono::Duration::seconds(60);

        let mut task = AlarmTask::spawn(
            AlarmId(3),
            target,
            Duration::from_millis(500),
            clock,
            tx,
            noop_waker(),
        )
        .unwrap();

        let started = Instant::now();
        task.cancel();
        assert!(started.elapsed() < Duration::from_millis(400));
        assert!(task.is_finished());

        assert!(rx
            .try_iter()
            .all(|e| !matches!(e, AlarmEvent::Expired { .. })));
    }

    #[test]
    fn test_past_target_expires_immediately() {
        let (tx, rx) = unbounded();
        let clock = Arc::new(LocalClock);
        let target = clock.now() - chrono::Duration::seconds(5);
        let wakes = Arc::new(AtomicUsize::new(0));
        let wakes_for_task = Arc::clone(&wakes);

        let mut task = AlarmTask::spawn(
            AlarmId(4),
            target,
            Duration::from_millis(500),
            clock,
            tx,
            Arc::new(move || {
                wakes_for_task.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();

        let events = collect_until_expired(&rx, Duration::from_secs(1));
        assert_eq!(
            events,
            vec![
                AlarmEvent::Tick {
                    id: AlarmId(4),
                    display: "00:00".to_string()
                },
                AlarmEvent::Expired { id: AlarmId(4) },
            ]
        );

        task.cancel();
        assert_eq!(wakes.load(Ordering::SeqCst), 2);
    }
}
