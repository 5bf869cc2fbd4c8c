use log::{debug, trace, warn};

use crate::core::config::ReporterConfig;
use crate::core::events::{FailedExpectation, RunInfo, SpecResult, SpecStatus, SuiteInfo};
use crate::core::timer::{Stopwatch, Timer};
use crate::reporters::formatter::{Formatter, OutputSink, StackFilter};
use crate::reporters::Reporter;

/// Construction options for `ConsoleReporter`.
#[derive(Default)]
pub struct ReporterOptions {
    pub config: ReporterConfig,
    pub print: Option<Box<dyn OutputSink>>,
    pub stack_filter: Option<Box<dyn StackFilter>>,
    pub timer: Option<Box<dyn Timer>>,
    pub done: Option<Box<dyn FnMut(bool)>>,
}

impl ReporterOptions {
    pub fn new(config: ReporterConfig) -> Self {
        Self { config, ..Self::default() }
    }

    pub fn verbose(mut self, is_verbose: bool) -> Self {
        self.config.is_verbose = is_verbose;
        self
    }

    pub fn show_colors(mut self, show_colors: bool) -> Self {
        self.config.show_colors = show_colors;
        self
    }

    pub fn include_stack_trace(mut self, include: bool) -> Self {
        self.config.include_stack_trace = include;
        self
    }

    pub fn print(mut self, sink: impl OutputSink + 'static) -> Self {
        self.print = Some(Box::new(sink));
        self
    }

    pub fn stack_filter(mut self, filter: impl StackFilter + 'static) -> Self {
        self.stack_filter = Some(Box::new(filter));
        self
    }

    pub fn timer(mut self, timer: impl Timer + 'static) -> Self {
        self.timer = Some(Box::new(timer));
        self
    }

    pub fn done(mut self, done: impl FnMut(bool) + 'static) -> Self {
        self.done = Some(Box::new(done));
        self
    }
}

/// Details of one failed spec, kept until the run summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureRecord {
    pub suite_full_name: String,
    pub spec_description: String,
    pub expectations: Vec<FailedExpectation>,
}

/// Console reporter: a dot per spec, or a suite tree in verbose mode,
/// followed by a failure summary.
pub struct ConsoleReporter {
    formatter: Formatter,
    timer: Box<dyn Timer>,
    is_verbose: bool,
    include_stack_trace: bool,
    on_done: Option<Box<dyn FnMut(bool)>>,
    suite_depth: usize,
    spec_count: usize,
    failure_count: usize,
    pending_count: usize,
    failures: Vec<FailureRecord>,
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new(ReporterOptions::default())
    }
}

impl ConsoleReporter {
    pub fn new(options: ReporterOptions) -> Self {
        let ReporterOptions { config, print, stack_filter, timer, done } = options;

        let mut formatter = Formatter::new(config.show_colors)
            .with_boxed_stack_filter(stack_filter.unwrap_or_else(|| config.stack_filter()));
        if let Some(sink) = print {
            formatter = formatter.with_boxed_sink(sink);
        }

        debug!(
            "Console reporter: verbose={}, colors={}, stack traces={}",
            config.is_verbose,
            formatter.show_colors(),
            config.include_stack_trace
        );

        Self {
            formatter,
            timer: timer.unwrap_or_else(|| Box::new(Stopwatch::new())),
            is_verbose: config.is_verbose,
            include_stack_trace: config.include_stack_trace,
            on_done: done,
            suite_depth: 0,
            spec_count: 0,
            failure_count: 0,
            pending_count: 0,
            failures: Vec::new(),
        }
    }

    pub fn suite_depth(&self) -> usize {
        self.suite_depth
    }

    pub fn spec_count(&self) -> usize {
        self.spec_count
    }

    pub fn failure_count(&self) -> usize {
        self.failure_count
    }

    pub fn pending_count(&self) -> usize {
        self.pending_count
    }

    pub fn failures(&self) -> &[FailureRecord] {
        &self.failures
    }

    /// `true` while no spec has failed.
    pub fn passed(&self) -> bool {
        self.failure_count == 0
    }

    fn print_failures(&mut self) {
        self.formatter.print("Failures: ");
        self.formatter.print_newline();

        for (i, failure) in self.failures.iter().enumerate() {
            let number = i + 1;
            self.formatter.print(&format!("{}) {}", number, failure.suite_full_name));
            self.formatter.print_newline();

            for (j, expectation) in failure.expectations.iter().enumerate() {
                let message = self.formatter.colorize("red", &expectation.message);
                self.formatter.print(&format!("{}.{}) {}", number, j + 1, message));
                self.formatter.print_newline();

                if self.include_stack_trace {
                    if let Some(stack) = &expectation.stack {
                        let stack = self.formatter.indent(&self.formatter.format_stack(stack), 1);
                        self.formatter.print(&stack);
                        self.formatter.print_newline();
                    }
                }
            }

            self.formatter.print_newline();
        }
    }

    fn summary_line(&self) -> String {
        let f = &self.formatter;
        let mut summary = format!(
            "{} {}, {} {}",
            self.spec_count,
            f.pluralize("spec", self.spec_count as i64),
            self.failure_count,
            f.pluralize("failure", self.failure_count as i64),
        );

        if self.pending_count > 0 {
            summary.push_str(&format!(
                ", {} {}",
                self.pending_count,
                f.pluralize("pending spec", self.pending_count as i64),
            ));
        }

        summary
    }
}

impl Reporter for ConsoleReporter {
    fn run_started(&mut self, info: &RunInfo) {
        debug!("Run started ({:?} specs defined)", info.total_specs_defined);
        self.timer.start();

        if self.is_verbose {
            if let Some(total) = info.total_specs_defined {
                let specs = self.formatter.pluralize("spec", total as i64);
                self.formatter.print(&format!("Running {} {}.", total, specs));
                self.formatter.print_newline();
            }
        }
    }

    fn suite_started(&mut self, info: &SuiteInfo) {
        trace!("Suite started at depth {}: {}", self.suite_depth, info.description);

        if self.is_verbose {
            let heading = self.formatter.indent(&info.description, self.suite_depth);
            self.formatter.print(&heading);
            self.formatter.print_newline();
        }

        self.suite_depth += 1;
    }

    fn suite_done(&mut self) {
        match self.suite_depth.checked_sub(1) {
            Some(depth) => self.suite_depth = depth,
            None => warn!("suite_done received with no open suite; depth stays at 0"),
        }
    }

    fn spec_done(&mut self, result: &SpecResult) {
        trace!("Spec done ({:?}): {}", result.status, result.full_name);

        let rendering = match result.status {
            SpecStatus::Passed => Some(("green", ".", "passed")),
            SpecStatus::Pending => Some(("yellow", "*", "pending")),
            SpecStatus::Failed => Some(("red", "F", "failed")),
            SpecStatus::Other => None,
        };

        if let Some((color, dot, label)) = rendering {
            if self.is_verbose {
                let line = format!("  {}: {}", result.description, label);
                let line = self.formatter.colorize(color, &line);
                self.formatter.print(&line);
                self.formatter.print_newline();
            } else {
                let dot = self.formatter.colorize(color, dot);
                self.formatter.print(&dot);
            }
        }

        self.spec_count += 1;

        match result.status {
            SpecStatus::Failed => {
                self.failure_count += 1;
                self.failures.push(FailureRecord {
                    suite_full_name: result.full_name.clone(),
                    spec_description: result.description.clone(),
                    expectations: result.failed_expectations.clone(),
                });
            }
            SpecStatus::Pending => self.pending_count += 1,
            SpecStatus::Passed | SpecStatus::Other => {}
        }
    }

    fn run_done(&mut self) {
        let seconds = self.timer.elapsed().as_secs();
        debug!(
            "Run finished: {} specs, {} failures, {} pending in {}s",
            self.spec_count, self.failure_count, self.pending_count, seconds
        );

        self.formatter.print_newline();

        if self.failure_count > 0 {
            self.print_failures();
        }

        let summary = self.summary_line();
        self.formatter.print(&summary);
        self.formatter.print_newline();

        let unit = self.formatter.pluralize("second", seconds as i64);
        self.formatter.print(&format!("Finished in {} {}", seconds, unit));
        self.formatter.print_newline();

        let passed = self.passed();
        if let Some(done) = self.on_done.as_mut() {
            done(passed);
        }
    }
}
