//! Console progress reporting during acquisition

use super::formatter::OutputFormatter;
use crate::acquire::AcquisitionObserver;
use crate::models::Measurement;
use crate::stats::RollingStats;
use crate::types::{EchoMode, StallKind};
use std::io::Write;
use std::time::Duration;

/// Prints acquisition progress to a terminal-like writer.
///
/// In [`EchoMode::PerSample`] every accepted measurement gets its own
/// line. In [`EchoMode::Overwrite`] a single progress line is rewritten
/// with `\r`; it is ended with a newline before anything else is printed.
pub struct ConsoleProgress<W: Write> {
    out: W,
    formatter: Box<dyn OutputFormatter>,
    echo: EchoMode,
    read_timeout: Duration,
    verbose: bool,
    rolling: RollingStats,
    line_open: bool,
}

impl<W: Write> ConsoleProgress<W> {
    /// Progress printer writing to `out`
    pub fn new(
        out: W,
        formatter: Box<dyn OutputFormatter>,
        echo: EchoMode,
        read_timeout: Duration,
        verbose: bool,
    ) -> Self {
        Self {
            out,
            formatter,
            echo,
            read_timeout,
            verbose,
            rolling: RollingStats::new(),
            line_open: false,
        }
    }

    /// Running figures over the measurements seen so far
    pub fn rolling(&self) -> &RollingStats {
        &self.rolling
    }

    /// Give the writer back
    pub fn into_inner(self) -> W {
        self.out
    }

    fn close_line(&mut self) {
        if self.line_open {
            let _ = writeln!(self.out);
            self.line_open = false;
        }
    }

    // Console output is best effort; a closed stdout must not end the run.
    fn print_line(&mut self, text: &str) {
        self.close_line();
        let _ = writeln!(self.out, "{}", text);
    }
}

impl<W: Write> AcquisitionObserver for ConsoleProgress<W> {
    fn on_measurement(&mut self, index: usize, target: usize, value: Measurement, text: &str) {
        self.rolling.add_value(value);

        match self.echo {
            EchoMode::PerSample => {
                let mut line = self.formatter.format_trial(index, target, value, text);
                if self.verbose {
                    line.push(' ');
                    line.push_str(&self.formatter.format_running_stats(&self.rolling));
                }
                self.print_line(&line);
            }
            EchoMode::Overwrite => {
                let progress = self.formatter.format_trial_progress(index, target);
                let _ = write!(self.out, "\r{}", progress);
                let _ = self.out.flush();
                self.line_open = true;
            }
        }
    }

    fn on_stall(&mut self, kind: StallKind, noise: Option<&str>) {
        if self.verbose {
            if let Some(line) = noise {
                let text = self.formatter.format_noise(line);
                self.print_line(&text);
            }
        }
        let message = self.formatter.format_stall(kind, self.read_timeout);
        self.print_line(&message);
    }

    fn on_complete(&mut self, _collected: usize) {
        self.close_line();
        let _ = self.out.flush();
    }
}
