//! 串口传输（基于 `serialport`）

use std::io::{ErrorKind, Read, Write};
use std::time::Duration;

use serialport::{FlowControl, SerialPort};
use tracing::{debug, info};

use crate::{Transport, TransportError};

/// BPC203 固定使用的波特率
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

/// 串口参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// 串口路径（如 "/dev/ttyUSB0"、"COM3"）
    pub path: String,
    /// 波特率（BPC203 固定 115200）
    pub baud_rate: u32,
    /// 单次读超时
    pub timeout: Duration,
    /// 是否启用 RTS/CTS 硬件流控
    pub hardware_flow_control: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: "/dev/ttyUSB0".to_string(),
            baud_rate: DEFAULT_BAUD_RATE,
            timeout: Duration::from_secs(2),
            hardware_flow_control: false,
        }
    }
}

/// 串口传输
///
/// 创建后处于关闭状态，需调用 [`Transport::open`]。
pub struct SerialTransport {
    config: SerialConfig,
    port: Option<Box<dyn SerialPort>>,
}

impl SerialTransport {
    pub fn new(config: SerialConfig) -> Self {
        Self { config, port: None }
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }

    fn port_mut(&mut self) -> Result<&mut Box<dyn SerialPort>, TransportError> {
        self.port.as_mut().ok_or(TransportError::NotOpen)
    }
}

impl std::fmt::Debug for SerialTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialTransport")
            .field("config", &self.config)
            .field("open", &self.port.is_some())
            .finish()
    }
}

impl Transport for SerialTransport {
    fn open(&mut self) -> Result<(), TransportError> {
        if self.port.is_some() {
            return Ok(());
        }

        let flow_control = if self.config.hardware_flow_control {
            FlowControl::Hardware
        } else {
            FlowControl::None
        };

        let port = serialport::new(&self.config.path, self.config.baud_rate)
            .timeout(self.config.timeout)
            .flow_control(flow_control)
            .open()?;

        info!(
            "Serial port {} opened at {} baud",
            self.config.path, self.config.baud_rate
        );
        self.port = Some(port);
        Ok(())
    }

    fn close(&mut self) -> Result<(), TransportError> {
        if let Some(mut port) = self.port.take() {
            port.flush()?;
            info!("Serial port {} closed", self.config.path);
        }
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.port.is_some()
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), TransportError> {
        let port = self.port_mut()?;
        port.write_all(bytes)?;
        port.flush()?;
        Ok(())
    }

    fn read_exact(&mut self, n: usize) -> Result<Vec<u8>, TransportError> {
        let port = self.port_mut()?;
        let mut buf = vec![0u8; n];
        let mut filled = 0;

        while filled < n {
            match port.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(TransportError::Timeout {
                        expected: n,
                        received: filled,
                    });
                },
                Ok(k) => filled += k,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if e.kind() == ErrorKind::TimedOut => {
                    debug!("Serial read timed out after {}/{} bytes", filled, n);
                    return Err(TransportError::Timeout {
                        expected: n,
                        received: filled,
                    });
                },
                Err(e) => return Err(e.into()),
            }
        }

        Ok(buf)
    }
}
