//! Line-oriented input with timeouts

use crate::error::Result;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Shortest wait used while draining, so a zero window still polls once
const MIN_DRAIN_POLL: Duration = Duration::from_millis(1);

/// Result of a single timed read
#[derive(Debug, Clone, PartialEq)]
pub enum ReadOutcome {
    /// A full line, terminators included when the device sent them
    Line(String),
    /// Nothing complete arrived before the timeout
    TimedOut,
    /// The source is gone and will never produce another line
    Closed,
}

/// Source of newline-terminated device output.
///
/// Implementations must never split or merge lines: every `Line` holds
/// exactly one line as the device produced it.
pub trait LineSource {
    /// Read the next line, waiting at most `timeout`
    fn read_line(&mut self, timeout: Duration) -> Result<ReadOutcome>;

    /// Throw away output produced before the caller started listening.
    ///
    /// Reads for roughly `window` and returns how many lines were dropped.
    /// At least one read is always made.
    fn discard_pending(&mut self, window: Duration) -> Result<usize> {
        let deadline = Instant::now() + window;
        let mut discarded = 0;

        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.read_line(remaining.max(MIN_DRAIN_POLL))? {
                ReadOutcome::Line(_) => discarded += 1,
                ReadOutcome::TimedOut => {}
                ReadOutcome::Closed => break,
            }
            if Instant::now() >= deadline {
                break;
            }
        }

        Ok(discarded)
    }

    /// Short human-readable name of the source
    fn describe(&self) -> String {
        "line source".to_string()
    }
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn read_line(&mut self, timeout: Duration) -> Result<ReadOutcome> {
        (**self).read_line(timeout)
    }

    fn discard_pending(&mut self, window: Duration) -> Result<usize> {
        (**self).discard_pending(window)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Scripted line source backed by memory.
///
/// Reads return the queued outcomes in order and `Closed` once the script
/// is exhausted. Lines queued with [`BufferLineSource::with_stale`] model
/// output the device produced before the run started; they are what
/// `discard_pending` drops.
#[derive(Debug, Default, Clone)]
pub struct BufferLineSource {
    stale: VecDeque<String>,
    script: VecDeque<ReadOutcome>,
    reads: usize,
}

impl BufferLineSource {
    /// Create an empty source that reports `Closed` immediately
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source returning each given line once
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut source = Self::new();
        for line in lines {
            source.push_line(line);
        }
        source
    }

    /// Create a source from raw device text, split after every `\n`
    pub fn from_text(text: &str) -> Self {
        Self::from_lines(text.split_inclusive('\n'))
    }

    /// Prepend output that is already waiting before acquisition starts
    pub fn with_stale<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stale.extend(lines.into_iter().map(Into::into));
        self
    }

    /// Queue a line
    pub fn push_line<S: Into<String>>(&mut self, line: S) -> &mut Self {
        self.script.push_back(ReadOutcome::Line(line.into()));
        self
    }

    /// Queue a read that times out
    pub fn push_timeout(&mut self) -> &mut Self {
        self.script.push_back(ReadOutcome::TimedOut);
        self
    }

    /// Queue several reads that time out
    pub fn push_timeouts(&mut self, count: usize) -> &mut Self {
        for _ in 0..count {
            self.push_timeout();
        }
        self
    }

    /// Number of `read_line` calls made so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Outcomes not yet consumed
    pub fn remaining(&self) -> usize {
        self.stale.len() + self.script.len()
    }
}

impl LineSource for BufferLineSource {
    fn read_line(&mut self, _timeout: Duration) -> Result<ReadOutcome> {
        self.reads += 1;
        if let Some(line) = self.stale.pop_front() {
            return Ok(ReadOutcome::Line(line));
        }
        Ok(self.script.pop_front().unwrap_or(ReadOutcome::Closed))
    }

    fn discard_pending(&mut self, _window: Duration) -> Result<usize> {
        let discarded = self.stale.len();
        self.stale.clear();
        Ok(discarded)
    }

    fn describe(&self) -> String {
        "in-memory buffer".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_buffer_source_replays_script_then_closes() {
        let mut source = BufferLineSource::from_lines(["12.5\r\n"]);
        source.push_timeout();

        assert_eq!(source.read_line(TIMEOUT).unwrap(), ReadOutcome::Line("12.5\r\n".to_string()));
        assert_eq!(source.read_line(TIMEOUT).unwrap(), ReadOutcome::TimedOut);
        assert_eq!(source.read_line(TIMEOUT).unwrap(), ReadOutcome::Closed);
        assert_eq!(source.read_line(TIMEOUT).unwrap(), ReadOutcome::Closed);
        assert_eq!(source.reads(), 4);
    }

    #[test]
    fn test_from_text_keeps_terminators() {
        let mut source = BufferLineSource::from_text("ready\r\n10.1\r\n10.2");
        assert_eq!(source.remaining(), 3);
        assert_eq!(source.read_line(TIMEOUT).unwrap(), ReadOutcome::Line("ready\r\n".to_string()));
        assert_eq!(source.read_line(TIMEOUT).unwrap(), ReadOutcome::Line("10.1\r\n".to_string()));
        assert_eq!(source.read_line(TIMEOUT).unwrap(), ReadOutcome::Line("10.2".to_string()));
    }

    #[test]
    fn test_discard_pending_drops_only_stale_output() {
        let mut source = BufferLineSource::from_lines(["20.0\n"])
            .with_stale(["99.9\n", "98.8\n"]);

        assert_eq!(source.discard_pending(Duration::from_millis(10)).unwrap(), 2);
        assert_eq!(source.read_line(TIMEOUT).unwrap(), ReadOutcome::Line("20.0\n".to_string()));
    }

    #[test]
    fn test_boxed_source_delegates() {
        let mut boxed: Box<dyn LineSource + Send> =
            Box::new(BufferLineSource::from_lines(["1.0\n"]).with_stale(["0.5\n"]));
        assert_eq!(boxed.discard_pending(Duration::ZERO).unwrap(), 1);
        assert_eq!(boxed.describe(), "in-memory buffer");
        assert_eq!(boxed.read_line(TIMEOUT).unwrap(), ReadOutcome::Line("1.0\n".to_string()));
    }

    /// Source relying on the provided drain implementation
    struct CountingSource {
        lines: VecDeque<ReadOutcome>,
        reads: usize,
    }

    impl LineSource for CountingSource {
        fn read_line(&mut self, _timeout: Duration) -> Result<ReadOutcome> {
            self.reads += 1;
            Ok(self.lines.pop_front().unwrap_or(ReadOutcome::TimedOut))
        }
    }

    #[test]
    fn test_default_discard_reads_at_least_once() {
        let mut source = CountingSource { lines: VecDeque::new(), reads: 0 };
        assert_eq!(source.discard_pending(Duration::ZERO).unwrap(), 0);
        assert_eq!(source.reads, 1);
    }

    #[test]
    fn test_default_discard_stops_on_close() {
        let mut source = CountingSource {
            lines: VecDeque::from(vec![
                ReadOutcome::Line("stale\n".to_string()),
                ReadOutcome::Closed,
            ]),
            reads: 0,
        };
        assert_eq!(source.discard_pending(Duration::from_secs(60)).unwrap(), 1);
        assert_eq!(source.reads, 2);
    }
}
