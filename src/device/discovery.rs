//! Finding and connecting to the measurement device

use super::serial::SerialLineSource;
use super::source::LineSource;
use crate::error::{AppError, Result};
use serialport::SerialPortType;
use std::time::Duration;

/// A serial port and whatever USB identity it reports
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub port_name: String,
    pub manufacturer: Option<String>,
    pub product: Option<String>,
    pub serial_number: Option<String>,
}

impl DeviceInfo {
    /// Device known only by its port name
    pub fn from_port_name(port_name: impl Into<String>) -> Self {
        Self {
            port_name: port_name.into(),
            manufacturer: None,
            product: None,
            serial_number: None,
        }
    }

    /// Whether the manufacturer or product string contains `vendor`
    pub fn matches_vendor(&self, vendor: &str) -> bool {
        [&self.manufacturer, &self.product]
            .into_iter()
            .flatten()
            .any(|field| field.contains(vendor))
    }

    /// Human-readable identity, e.g. `Arduino LLC Arduino Uno`
    pub fn description(&self) -> String {
        let parts: Vec<&str> = [&self.manufacturer, &self.product]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect();

        if parts.is_empty() {
            "unknown device".to_string()
        } else {
            parts.join(" ")
        }
    }
}

/// Pick the first port whose description contains `vendor`
pub fn select_device<'a>(devices: &'a [DeviceInfo], vendor: &str) -> Result<&'a DeviceInfo> {
    devices
        .iter()
        .find(|device| device.matches_vendor(vendor))
        .ok_or_else(|| {
            AppError::device(format!(
                "Did not find {} device on any serial port. Is it connected?",
                vendor
            ))
        })
}

/// Port enumeration and connection
pub trait DeviceBackend {
    /// List the serial ports currently present
    fn enumerate(&self) -> Result<Vec<DeviceInfo>>;

    /// Open a line source on `device`
    fn connect(&self, device: &DeviceInfo, baud_rate: u32, timeout: Duration) -> Result<Box<dyn LineSource + Send>>;
}

/// Backend using the host's serial ports
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialBackend;

impl DeviceBackend for SerialBackend {
    fn enumerate(&self) -> Result<Vec<DeviceInfo>> {
        let ports = serialport::available_ports()
            .map_err(|e| AppError::device(format!("Could not list serial ports: {}", e)))?;

        Ok(ports
            .into_iter()
            .map(|port| match port.port_type {
                SerialPortType::UsbPort(info) => DeviceInfo {
                    port_name: port.port_name,
                    manufacturer: info.manufacturer,
                    product: info.product,
                    serial_number: info.serial_number,
                },
                _ => DeviceInfo::from_port_name(port.port_name),
            })
            .collect())
    }

    fn connect(&self, device: &DeviceInfo, baud_rate: u32, timeout: Duration) -> Result<Box<dyn LineSource + Send>> {
        let source = SerialLineSource::open(&device.port_name, baud_rate, timeout)?;
        Ok(Box::new(source))
    }
}
