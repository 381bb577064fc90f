//! Builder 模式实现
//!
//! 提供链式构造串口 [`Session`] 的便捷方式。

use std::sync::Arc;
use std::time::Duration;

use bpc_protocol::{CONTROLLER_ADDRESS, HOST_ADDRESS};
use bpc_serial::{SerialConfig, SerialTransport, Transport};
use tracing::info;

use crate::error::DriverError;
use crate::hooks::{FrameCallback, HexDumpHook, HookManager};
use crate::session::Session;

/// Session Builder（链式构造）
///
/// # Example
///
/// ```no_run
/// use bpc_driver::SessionBuilder;
///
/// let session = SessionBuilder::new()
///     .port("/dev/ttyUSB0")
///     .hex_dump(true)
///     .build()
///     .unwrap();
/// ```
pub struct SessionBuilder {
    serial: SerialConfig,
    controller_address: u8,
    host_address: u8,
    hooks: HookManager,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            serial: SerialConfig::default(),
            controller_address: CONTROLLER_ADDRESS,
            host_address: HOST_ADDRESS,
            hooks: HookManager::new(),
        }
    }

    /// 串口路径（如 "/dev/ttyUSB0"、"COM3"）
    pub fn port(mut self, path: impl Into<String>) -> Self {
        self.serial.path = path.into();
        self
    }

    pub fn baud_rate(mut self, baud_rate: u32) -> Self {
        self.serial.baud_rate = baud_rate;
        self
    }

    /// 单次读超时
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.serial.timeout = timeout;
        self
    }

    pub fn hardware_flow_control(mut self, enabled: bool) -> Self {
        self.serial.hardware_flow_control = enabled;
        self
    }

    /// 整体替换串口参数
    pub fn serial_config(mut self, config: SerialConfig) -> Self {
        self.serial = config;
        self
    }

    pub fn controller_address(mut self, address: u8) -> Self {
        self.controller_address = address;
        self
    }

    pub fn host_address(mut self, address: u8) -> Self {
        self.host_address = address;
        self
    }

    /// 注册帧回调
    pub fn hook(mut self, callback: Arc<dyn FrameCallback>) -> Self {
        self.hooks.add_callback(callback);
        self
    }

    /// 启用帧十六进制转储（`debug` 级别）
    pub fn hex_dump(self, enabled: bool) -> Self {
        if enabled {
            self.hook(Arc::new(HexDumpHook))
        } else {
            self
        }
    }

    pub fn serial(&self) -> &SerialConfig {
        &self.serial
    }

    /// 打开串口并创建会话
    pub fn build(self) -> Result<Session<SerialTransport>, DriverError> {
        info!(
            "Opening BPC203 on {} @ {} baud",
            self.serial.path, self.serial.baud_rate
        );
        let transport = SerialTransport::new(self.serial.clone());
        self.build_with(transport)
    }

    /// 使用给定传输创建会话（会调用 `open`）
    pub fn build_with<T: Transport>(self, transport: T) -> Result<Session<T>, DriverError> {
        let mut session =
            Session::with_addresses(transport, self.controller_address, self.host_address);
        *session.hooks_mut() = self.hooks;
        session.open()?;
        Ok(session)
    }
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}
