// src/serial.rs

//! Host-side transport over the `serialport` crate.

use std::boxed::Box;
use std::io::{self, Read, Write};
use std::string::String;
use std::time::{Duration, Instant};

use serialport::{ClearBuffer, ErrorKind, SerialPort};

use crate::common::{
    error::MeterError,
    hal_traits::{MeterSerial, MeterTimer},
    timing,
};
use crate::meter::{Session, SessionConfig};

/// Read/write timeout handed to the OS driver. Reads are only issued for
/// bytes already reported as available, so this rarely matters.
const PORT_TIMEOUT: Duration = Duration::from_millis(10);

/// A serial port opened at the meter's line settings.
pub struct SerialTransport {
    path: String,
    port: Option<Box<dyn SerialPort>>,
}

impl core::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("path", &self.path)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl SerialTransport {
    /// Opens `path` (e.g. `/dev/ttyUSB0` or `COM9`) at `baud_rate`, 8N1.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, serialport::Error> {
        let port = serialport::new(path, baud_rate)
            .timeout(PORT_TIMEOUT)
            .open()?;
        port.clear(ClearBuffer::All)?;
        tracing::debug!(path, baud_rate, "serial port opened");
        Ok(SerialTransport {
            path: path.into(),
            port: Some(port),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    fn port(&mut self) -> Result<&mut Box<dyn SerialPort>, serialport::Error> {
        self.port
            .as_mut()
            .ok_or_else(|| {
                serialport::Error::new(ErrorKind::NoDevice, "serial port already closed")
            })
    }
}

fn is_transient(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut | io::ErrorKind::Interrupted
    )
}

impl MeterSerial for SerialTransport {
    type Error = serialport::Error;

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        Ok(self.port()?.bytes_to_read()? as usize)
    }

    fn read_available(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        match self.port()?.read(buffer) {
            Ok(n) => Ok(n),
            Err(e) if is_transient(&e) => Ok(0),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, bytes: &[u8]) -> nb::Result<usize, Self::Error> {
        let port = self.port().map_err(nb::Error::Other)?;
        match port.write(bytes) {
            Ok(n) => Ok(n),
            Err(e) if is_transient(&e) => Err(nb::Error::WouldBlock),
            Err(e) => Err(nb::Error::Other(e.into())),
        }
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        if let Some(mut port) = self.port.take() {
            port.flush()?;
            tracing::debug!(path = %self.path, "serial port closed");
        }
        Ok(())
    }
}

impl MeterTimer for SerialTransport {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(us.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(ms.into()));
    }
}

impl Session<SerialTransport> {
    /// Opens the serial port at `path` at 38400 baud and starts a session on it.
    pub fn connect(
        path: &str,
        config: SessionConfig,
    ) -> Result<Self, MeterError<serialport::Error>> {
        let transport =
            SerialTransport::open(path, timing::BAUD_RATE).map_err(MeterError::Io)?;
        Session::open(transport, config)
    }
}
