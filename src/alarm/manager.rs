use chrono::NaiveDateTime;
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::sync::Arc;
use std::time::Duration;

use super::countdown::{format_remaining, EXPIRED_DISPLAY};
use super::target::{AlarmError, AlarmRequest};
use super::timer::{AlarmTask, Clock, Waker};
use crate::messages::{AlarmEvent, AlarmId};
use crate::state::AlarmPhase;

/// One alarm the user has set
pub struct Alarm {
    pub id: AlarmId,
    pub request: AlarmRequest,
    pub target: NaiveDateTime,
    pub phase: AlarmPhase,
    /// Latest countdown published by the timer
    pub display: String,
    task: Option<AlarmTask>,
}

impl Alarm {
    pub fn label(&self) -> String {
        self.request.label()
    }
}

/// Owns every alarm and its timing task.
///
/// Timers report back over a channel; call `process_events` from the UI
/// thread to apply their updates.
pub struct AlarmManager {
    alarms: Vec<Alarm>,
    next_id: u32,
    clock: Arc<dyn Clock>,
    poll_interval: Duration,
    waker: Waker,
    event_tx: Sender<AlarmEvent>,
    event_rx: Receiver<AlarmEvent>,
}

impl AlarmManager {
    pub fn new(clock: Arc<dyn Clock>, poll_interval: Duration, waker: Waker) -> Self {
        let (event_tx, event_rx) = unbounded::<AlarmEvent>();
        Self {
            alarms: Vec::new(),
            next_id: 1,
            clock,
            poll_interval,
            waker,
            event_tx,
            event_rx,
        }
    }

    /// Applies to alarms armed after the change
    pub fn set_poll_interval(&mut self, poll_interval: Duration) {
        self.poll_interval = poll_interval;
    }

    /// Resolve the request against the clock and start counting down
    pub fn arm(&mut self, request: AlarmRequest) -> Result<AlarmId, AlarmError> {
        let now = self.clock.now();
        let target = request.resolve(now)?;

        let id = AlarmId(self.next_id);
        let task = AlarmTask::spawn(
            id,
            target,
            self.poll_interval,
            Arc::clone(&self.clock),
            self.event_tx.clone(),
            Arc::clone(&self.waker),
        )
        .map_err(|e| AlarmError::Spawn(e.to_string()))?;
        self.next_id += 1;

        let mut phase = AlarmPhase::Idle;
        phase.advance(AlarmPhase::Armed);

        log::info!(
            "Armed alarm {} ({}) for {}",
            id,
            request.label(),
            target.format("%Y-%m-%d %H:%M:%S")
        );

        self.alarms.push(Alarm {
            id,
            request,
            target,
            phase,
            display: format_remaining(target - now),
            task: Some(task),
        });

        Ok(id)
    }

    /// Drain pending timer events. Returns the ids of alarms that started ringing.
    pub fn process_events(&mut self) -> Vec<AlarmId> {
        let mut started_ringing = Vec::new();

        while let Ok(event) = self.event_rx.try_recv() {
            let Some(alarm) = self.alarms.iter_mut().find(|a| a.id == event.id()) else {
                // Timer outlived its alarm (cancelled or dismissed)
                continue;
            };

            match event {
                AlarmEvent::Tick { display, .. } => {
                    if alarm.phase == AlarmPhase::Armed {
                        alarm.display = display;
                    }
                }
                AlarmEvent::Expired { id } => {
                    if alarm.phase.advance(AlarmPhase::Ringing) {
                        alarm.display = EXPIRED_DISPLAY.to_string();
                        // Worker has already returned
                        alarm.task = None;
                        started_ringing.push(id);
                    } else {
                        log::warn!("Ignoring expiry for alarm {} in phase {:?}", id, alarm.phase);
                    }
                }
            }
        }

        started_ringing
    }

    /// Withdraw a pending alarm. Returns false if it is not counting down.
    pub fn cancel(&mut self, id: AlarmId) -> bool {
        let Some(alarm) = self.alarms.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        if !alarm.phase.advance(AlarmPhase::Cancelled) {
            return false;
        }

        if let Some(mut task) = alarm.task.take() {
            task.cancel();
        }
        self.alarms.retain(|a| !a.phase.is_finished());
        log::info!("Cancelled alarm {}", id);
        true
    }

    /// Acknowledge a ringing alarm. Returns false if it is not ringing.
    pub fn dismiss(&mut self, id: AlarmId) -> bool {
        let Some(alarm) = self.alarms.iter_mut().find(|a| a.id == id) else {
            return false;
        };
        if !alarm.phase.advance(AlarmPhase::Dismissed) {
            return false;
        }

        self.alarms.retain(|a| !a.phase.is_finished());
        log::info!("Dismissed alarm {}", id);
        true
    }

    pub fn alarms(&self) -> &[Alarm] {
        &self.alarms
    }

    #[cfg(test)]
    pub fn get(&self, id: AlarmId) -> Option<&Alarm> {
        self.alarms.iter().find(|a| a.id == id)
    }

    pub fn ringing(&self) -> impl Iterator<Item = &Alarm> {
        self.alarms
            .iter()
            .filter(|a| a.phase == AlarmPhase::Ringing)
    }

    /// The armed alarm that fires first
    pub fn soonest_pending(&self) -> Option<&Alarm> {
        self.alarms
            .iter()
            .filter(|a| a.phase == AlarmPhase::Armed)
            .min_by_key(|a| a.target)
    }

    pub fn is_empty(&self) -> bool {
        self.alarms.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::alarm::target::AlarmMode;
    use crate::alarm::timer::{noop_waker, LocalClock};
    use chrono::{NaiveDate, NaiveTime};
    use std::time::Instant;

    struct FixedClock(NaiveDateTime);

    impl Clock for FixedClock {
        fn now(&self) -> NaiveDateTime {
            self.0
        }
    }

    fn fixed_manager(now: NaiveDateTime) -> AlarmManager {
        AlarmManager::new(
            Arc::new(FixedClock(now)),
            Duration::from_millis(20),
            noop_waker(),
        )
    }

    fn live_manager() -> AlarmManager {
        AlarmManager::new(Arc::new(LocalClock), Duration::from_millis(20), noop_waker())
    }

    fn wait_for_ringing(manager: &mut AlarmManager, timeout: Duration) -> Vec<AlarmId> {
        let deadline = Instant::now() + timeout;
        let mut ringing = Vec::new();
        while Instant::now() < deadline {
            ringing.extend(manager.process_events());
            if !ringing.is_empty() {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        ringing
    }

    #[test]
    fn test_arm_rolls_past_time_to_tomorrow() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(23, 59, 58)
            .unwrap();
        let mut manager = fixed_manager(now);

        let request = AlarmRequest::parse(AlarmMode::AbsoluteTime, "00:00:05").unwrap();
        let id = manager.arm(request).unwrap();

        let alarm = manager.get(id).unwrap();
        assert_eq!(alarm.phase, AlarmPhase::Armed);
        assert_eq!(alarm.target - now, chrono::Duration::seconds(7));
        assert_eq!(alarm.display, "00:07");
        assert!(manager.cancel(id));
    }

    #[test]
    fn test_arm_assigns_distinct_ids() {
        let now = NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let mut manager = fixed_manager(now);

        let first = manager.arm(AlarmRequest::RelativeMinutes(5.0)).unwrap();
        let second = manager.arm(AlarmRequest::RelativeMinutes(1.0)).unwrap();
        assert_ne!(first, second);
        assert_eq!(manager.alarms().len(), 2);

        // Soonest is the one-minute alarm even though it was armed second
        assert_eq!(manager.soonest_pending().map(|a| a.id), Some(second));
    }

    #[test]
    fn test_overlapping_alarms_ring_independently() {
        let mut manager = live_manager();
        let first = manager.arm(AlarmRequest::RelativeMinutes(0.004)).unwrap();
        let second = manager.arm(AlarmRequest::RelativeMinutes(10.0)).unwrap();

        let ringing = wait_for_ringing(&mut manager, Duration::from_secs(3));
        assert_eq!(ringing, vec![first]);
        assert_eq!(manager.get(first).unwrap().phase, AlarmPhase::Ringing);
        assert_eq!(manager.get(first).unwrap().display, "00:00");
        assert_eq!(manager.get(second).unwrap().phase, AlarmPhase::Armed);
        assert_eq!(manager.ringing().count(), 1);

        assert!(manager.dismiss(first));
        assert!(manager.get(first).is_none());
        assert!(manager.cancel(second));
        assert!(manager.is_empty());
    }

    #[test]
    fn test_expiry_rings_once() {
        let mut manager = live_manager();
        let id = manager.arm(AlarmRequest::RelativeMinutes(0.002)).unwrap();

        assert_eq!(wait_for_ringing(&mut manager, Duration::from_secs(3)), vec![id]);

        // A stray duplicate expiry must not ring again
        manager
            .event_tx
            .send(AlarmEvent::Expired { id })
            .unwrap();
        assert!(manager.process_events().is_empty());
        assert_eq!(manager.ringing().count(), 1);
    }

    #[test]
    fn test_cancel_and_dismiss_require_matching_phase() {
        let mut manager = live_manager();
        let id = manager.arm(AlarmRequest::RelativeMinutes(10.0)).unwrap();

        // Not ringing yet
        assert!(!manager.dismiss(id));
        assert!(manager.cancel(id));
        // Already gone
        assert!(!manager.cancel(id));
        assert!(!manager.dismiss(AlarmId(99)));
    }

    #[test]
    fn test_cancelled_alarm_never_rings() {
        let mut manager = live_manager();
        let id = manager.arm(AlarmRequest::RelativeMinutes(0.003)).unwrap();
        assert!(manager.cancel(id));

        std::thread::sleep(Duration::from_millis(400));
        assert!(manager.process_events().is_empty());
        assert!(manager.is_empty());
    }

    #[test]
    fn test_arm_rejects_out_of_range() {
        let mut manager = live_manager();
        assert_eq!(
            manager.arm(AlarmRequest::RelativeMinutes(1e300)),
            Err(AlarmError::OutOfRange)
        );
        assert!(manager.is_empty());

        let time = NaiveTime::from_hms_opt(12, 0, 0).unwrap();
        assert!(manager.arm(AlarmRequest::AbsoluteTime(time)).is_ok());
    }
}
