//! 会话
//!
//! 持有传输句柄与主机/控制器地址，负责帧的编码发送与应答读取。
//! 协议为严格半双工：每次查询都是"写一帧 → 阻塞读定长应答"，
//! 中间不会穿插其他请求。

use bpc_protocol::{
    AptFrame, CONTROLLER_ADDRESS, Command, HOST_ADDRESS, RequestCommand, decode,
};
use bpc_serial::Transport;
use tracing::trace;

use crate::error::DriverError;
use crate::hooks::{FrameDirection, HookManager};

/// BPC203 会话
pub struct Session<T: Transport> {
    transport: T,
    controller_address: u8,
    host_address: u8,
    hooks: HookManager,
}

impl<T: Transport> Session<T> {
    /// 使用默认地址（主机 0x01，控制器 0x50）创建会话
    ///
    /// 不会自动打开传输，需调用 [`Session::open`]。
    pub fn new(transport: T) -> Self {
        Self::with_addresses(transport, CONTROLLER_ADDRESS, HOST_ADDRESS)
    }

    pub fn with_addresses(transport: T, controller_address: u8, host_address: u8) -> Self {
        Self {
            transport,
            controller_address,
            host_address,
            hooks: HookManager::new(),
        }
    }

    pub fn open(&mut self) -> Result<(), DriverError> {
        self.transport.open()?;
        Ok(())
    }

    pub fn close(&mut self) -> Result<(), DriverError> {
        self.transport.close()?;
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    pub fn controller_address(&self) -> u8 {
        self.controller_address
    }

    pub fn host_address(&self) -> u8 {
        self.host_address
    }

    pub fn hooks(&self) -> &HookManager {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookManager {
        &mut self.hooks
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// 取回传输句柄（不关闭）
    pub fn into_transport(self) -> T {
        self.transport
    }

    /// 编码并发送一条指令
    ///
    /// 帧构建失败时不会写出任何字节。
    pub fn send<C: Command>(&mut self, command: &C) -> Result<(), DriverError> {
        let frame = command.to_frame(self.host_address)?;
        trace!("Sending {}", command.message_id().name());
        self.write_frame(&frame)
    }

    /// 发送查询指令并读取定长应答
    pub fn query(&mut self, request: &RequestCommand) -> Result<AptFrame, DriverError> {
        let reply_len = request.reply_len()?;
        self.send(request)?;
        self.read_frame(reply_len)
    }

    /// 写出一帧
    pub fn write_frame(&mut self, frame: &AptFrame) -> Result<(), DriverError> {
        let bytes = frame.to_bytes();
        trace!("TX {}", hex::encode(&bytes));
        self.transport.write(&bytes)?;
        self.hooks.trigger_all(FrameDirection::Sent, frame);
        Ok(())
    }

    /// 读取恰好 `len` 字节并解码
    pub fn read_frame(&mut self, len: usize) -> Result<AptFrame, DriverError> {
        let raw = self.transport.read_exact(len)?;
        trace!("RX {}", hex::encode(&raw));
        let frame = decode(&raw)?;
        self.hooks.trigger_all(FrameDirection::Received, &frame);
        Ok(frame)
    }
}

impl<T: Transport> std::fmt::Debug for Session<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("controller_address", &self.controller_address)
            .field("host_address", &self.host_address)
            .field("open", &self.transport.is_open())
            .field("hooks", &self.hooks)
            .finish()
    }
}
