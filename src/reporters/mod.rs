pub mod console;
pub mod formatter;

use crate::core::events::{RunInfo, SpecResult, SuiteInfo};

/// Consumer of test engine lifecycle events.
///
/// Events arrive strictly in order, one at a time; suite starts and ends are
/// well nested.
pub trait Reporter {
    /// The run is about to start
    fn run_started(&mut self, info: &RunInfo);

    /// A suite (possibly nested) is entered
    fn suite_started(&mut self, info: &SuiteInfo);

    /// The innermost open suite finished
    fn suite_done(&mut self);

    /// A spec reached its terminal status
    fn spec_done(&mut self, result: &SpecResult);

    /// The run is over; render the summary
    fn run_done(&mut self);
}
