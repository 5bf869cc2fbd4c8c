use std::io::{self, Write};
use std::str::FromStr;
use colored::Color;
use log::warn;

const RESET: &str = "\x1B[0m";

/// Destination for rendered report text.
pub trait OutputSink {
    fn write(&mut self, text: &str);
}

impl<F: FnMut(&str)> OutputSink for F {
    fn write(&mut self, text: &str) {
        self(text)
    }
}

/// Sink over any `io::Write`. Write errors are logged, never propagated.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn write(&mut self, text: &str) {
        let result = self
            .writer
            .write_all(text.as_bytes())
            .and_then(|_| self.writer.flush());

        if let Err(e) = result {
            warn!("Failed to write report output: {}", e);
        }
    }
}

/// Transforms a raw stack trace before it is displayed.
pub trait StackFilter {
    fn filter(&self, stack: &str) -> String;
}

impl<F: Fn(&str) -> String> StackFilter for F {
    fn filter(&self, stack: &str) -> String {
        self(stack)
    }
}

/// Returns the stack unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityFilter;

impl StackFilter for IdentityFilter {
    fn filter(&self, stack: &str) -> String {
        stack.to_string()
    }
}

/// Drops every stack line containing one of the given patterns.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFramesFilter {
    patterns: Vec<String>,
}

impl ExcludeFramesFilter {
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }
}

impl StackFilter for ExcludeFramesFilter {
    fn filter(&self, stack: &str) -> String {
        stack
            .split('\n')
            .filter(|line| !self.patterns.iter().any(|p| line.contains(p.as_str())))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Text shaping and output for reporters. Settings are fixed once built.
pub struct Formatter {
    show_colors: bool,
    sink: Box<dyn OutputSink>,
    stack_filter: Box<dyn StackFilter>,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Formatter {
    /// Formatter writing to stdout with the identity stack filter.
    pub fn new(show_colors: bool) -> Self {
        Self {
            show_colors,
            sink: Box::new(WriterSink::stdout()),
            stack_filter: Box::new(IdentityFilter),
        }
    }

    pub fn with_sink(self, sink: impl OutputSink + 'static) -> Self {
        self.with_boxed_sink(Box::new(sink))
    }

    pub fn with_boxed_sink(self, sink: Box<dyn OutputSink>) -> Self {
        Self { sink, ..self }
    }

    pub fn with_stack_filter(self, filter: impl StackFilter + 'static) -> Self {
        self.with_boxed_stack_filter(Box::new(filter))
    }

    pub fn with_boxed_stack_filter(self, stack_filter: Box<dyn StackFilter>) -> Self {
        Self { stack_filter, ..self }
    }

    pub fn show_colors(&self) -> bool {
        self.show_colors
    }

    /// Wrap `text` in the SGR sequence for `color`. Unknown color names and
    /// disabled coloring return the text as-is.
    pub fn colorize(&self, color: &str, text: &str) -> String {
        if !self.show_colors {
            return text.to_string();
        }

        match Color::from_str(color) {
            Ok(color) => format!("\x1B[{}m{}{}", color.to_fg_str(), text, RESET),
            Err(_) => text.to_string(),
        }
    }

    pub fn pluralize(&self, noun: &str, count: i64) -> String {
        if count == 1 {
            noun.to_string()
        } else {
            format!("{}s", noun)
        }
    }

    /// Prefix every line with `level * 2` spaces.
    pub fn indent(&self, text: &str, level: usize) -> String {
        if level == 0 {
            return text.to_string();
        }

        let padding = " ".repeat(level * 2);
        text.split('\n')
            .map(|line| format!("{}{}", padding, line))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_stack(&self, stack: &str) -> String {
        self.stack_filter.filter(stack)
    }

    pub fn print(&mut self, text: &str) {
        self.sink.write(text);
    }

    pub fn print_newline(&mut self) {
        self.print("\n");
    }
}
