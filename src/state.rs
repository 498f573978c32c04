//! Lifecycle of a single alarm
//!
//! An alarm only ever moves forward: `Idle → Armed → Ringing → Dismissed`,
//! or `Armed → Cancelled` when the user withdraws it before it fires.

/// Where an alarm is in its lifecycle
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AlarmPhase {
    /// Created, no timer running yet
    #[default]
    Idle,
    /// Timer running, counting down to the target
    Armed,
    /// Target reached, alert on screen
    Ringing,
    /// Alert dismissed by the user
    Dismissed,
    /// Withdrawn before it fired
    Cancelled,
}

impl AlarmPhase {
    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_advance_to(&self, next: AlarmPhase) -> bool {
        matches!(
            (self, next),
            (AlarmPhase::Idle, AlarmPhase::Armed)
                | (AlarmPhase::Armed, AlarmPhase::Ringing)
                | (AlarmPhase::Armed, AlarmPhase::Cancelled)
                | (AlarmPhase::Ringing, AlarmPhase::Dismissed)
        )
    }

    /// Move to `next`, returning false (and staying put) if that is not allowed
    pub fn advance(&mut self, next: AlarmPhase) -> bool {
        if self.can_advance_to(next) {
            *self = next;
            true
        } else {
            false
        }
    }

    /// No further transitions are possible
    pub fn is_finished(&self) -> bool {
        matches!(self, AlarmPhase::Dismissed | AlarmPhase::Cancelled)
    }

    /// Get status text and color for UI display
    pub fn status_text(&self) -> (&'static str, StatusColor) {
        match self {
            AlarmPhase::Idle => ("Not set", StatusColor::Gray),
            AlarmPhase::Armed => ("Counting down", StatusColor::LightBlue),
            AlarmPhase::Ringing => ("Ringing!", StatusColor::Red),
            AlarmPhase::Dismissed => ("Dismissed", StatusColor::Gray),
            AlarmPhase::Cancelled => ("Cancelled", StatusColor::Orange),
        }
    }
}

/// Status colors for UI display
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusColor {
    Gray,
    LightBlue,
    Orange,
    Red,
}
