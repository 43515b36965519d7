//! Byte-stream line sources, including the serial port one

use super::source::{LineSource, ReadOutcome};
use crate::error::{AppError, Result};
use serialport::SerialPort;
use std::io::{self, BufRead, BufReader, Read};
use std::time::Duration;

/// Line source over any byte stream whose reads can time out.
///
/// A read that times out mid-line keeps the bytes received so far; the
/// next read continues the same line, so lines are never split. A clean
/// end of stream is reported as `Closed`.
pub struct StreamLineSource<R> {
    reader: BufReader<R>,
    pending: Vec<u8>,
    label: String,
}

impl<R: Read> StreamLineSource<R> {
    /// Wrap a byte stream
    pub fn new(inner: R, label: impl Into<String>) -> Self {
        Self {
            reader: BufReader::new(inner),
            pending: Vec::new(),
            label: label.into(),
        }
    }

    /// Access the wrapped stream
    pub fn get_mut(&mut self) -> &mut R {
        self.reader.get_mut()
    }

    /// Bytes of an unfinished line held from an earlier timed-out read
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn take_line(&mut self) -> ReadOutcome {
        let bytes = std::mem::take(&mut self.pending);
        ReadOutcome::Line(String::from_utf8_lossy(&bytes).into_owned())
    }

    fn next_line(&mut self) -> Result<ReadOutcome> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) if self.pending.is_empty() => Ok(ReadOutcome::Closed),
            // Either a full line or the unterminated tail before end of stream
            Ok(_) => Ok(self.take_line()),
            Err(e) if matches!(e.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => {
                Ok(ReadOutcome::TimedOut)
            }
            Err(e) => Err(AppError::io(format!("Read from {} failed: {}", self.label, e))),
        }
    }
}

impl<R: Read> LineSource for StreamLineSource<R> {
    fn read_line(&mut self, _timeout: Duration) -> Result<ReadOutcome> {
        self.next_line()
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Line source reading a serial port
pub struct SerialLineSource {
    stream: StreamLineSource<Box<dyn SerialPort>>,
    timeout: Duration,
}

impl SerialLineSource {
    /// Open `port_name` at `baud_rate` with an initial read timeout
    pub fn open(port_name: &str, baud_rate: u32, timeout: Duration) -> Result<Self> {
        let port = serialport::new(port_name, baud_rate)
            .timeout(timeout)
            .open()
            .map_err(|e| match e.kind() {
                serialport::ErrorKind::NoDevice => {
                    AppError::device(format!("Serial port {} is not available: {}", port_name, e))
                }
                _ => AppError::io(format!("Failed to open serial port '{}' at {} baud: {}", port_name, baud_rate, e)),
            })?;

        Ok(Self::from_port(port, timeout))
    }

    /// Wrap an already open port
    pub fn from_port(port: Box<dyn SerialPort>, timeout: Duration) -> Self {
        let label = port.name().unwrap_or_else(|| "serial port".to_string());
        Self {
            stream: StreamLineSource::new(port, label),
            timeout,
        }
    }

    fn apply_timeout(&mut self, timeout: Duration) -> Result<()> {
        if timeout != self.timeout {
            self.stream.get_mut().set_timeout(timeout)?;
            self.timeout = timeout;
        }
        Ok(())
    }
}

impl LineSource for SerialLineSource {
    fn read_line(&mut self, timeout: Duration) -> Result<ReadOutcome> {
        self.apply_timeout(timeout)?;
        self.stream.next_line()
    }

    fn describe(&self) -> String {
        self.stream.describe()
    }
}
