
pub mod core {
    pub mod config;
    pub mod error;
    pub mod events;
    pub mod timer;
}


pub mod reporters;

pub use crate::core::config::ReporterConfig;
pub use crate::core::error::{ReporterError, Result};
pub use crate::core::events::{FailedExpectation, ReporterEvent, RunInfo, SpecResult, SpecStatus, SuiteInfo};
pub use crate::core::timer::{Stopwatch, Timer};
pub use crate::reporters::console::{ConsoleReporter, FailureRecord, ReporterOptions};
pub use crate::reporters::formatter::Formatter;
pub use crate::reporters::Reporter;
