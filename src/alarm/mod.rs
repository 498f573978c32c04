pub mod countdown;
pub mod manager;
pub mod target;
pub mod timer;

pub use manager::{Alarm, AlarmManager};
pub use target::{AlarmMode, AlarmRequest};
pub use timer::{Clock, LocalClock, Waker};
