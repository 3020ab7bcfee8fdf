pub mod cpu;
pub mod error;
pub mod machine;

pub use cpu::{Bus, Cpu, ENTRY_POINT};
pub use error::{BusError, StepError};
pub use machine::{Machine, SystemBus};
