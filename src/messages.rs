use std::fmt;

/// Unique identifier for an armed alarm
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct AlarmId(pub u32);

impl fmt::Display for AlarmId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Messages from a timing task to the UI thread
#[derive(Clone, Debug, PartialEq)]
pub enum AlarmEvent {
    /// The formatted countdown changed
    Tick { id: AlarmId, display: String },
    /// The target instant has been reached
    Expired { id: AlarmId },
}

impl AlarmEvent {
    pub fn id(&self) -> AlarmId {
        match self {
            AlarmEvent::Tick { id, .. } | AlarmEvent::Expired { id } => *id,
        }
    }
}
