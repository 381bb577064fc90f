//! 钩子系统（Hook System）
//!
//! 在帧发送/接收时触发自定义回调，用于调试转储、录制等旁路功能。
//!
//! # 使用示例
//!
//! ```rust
//! use bpc_driver::hooks::{FrameDirection, HexDumpHook, HookManager};
//! use bpc_protocol::AptFrame;
//! use std::sync::Arc;
//!
//! let mut hooks = HookManager::new();
//! hooks.add_callback(Arc::new(HexDumpHook));
//!
//! let frame = AptFrame::short(0x0223, 0x01, 0x00, 0x50, 0x01);
//! hooks.trigger_all(FrameDirection::Sent, &frame);
//! ```

use std::fmt;
use std::sync::Arc;

use bpc_protocol::AptFrame;
use tracing::debug;

/// 帧方向
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameDirection {
    /// 主机 → 控制器
    Sent,
    /// 控制器 → 主机
    Received,
}

impl fmt::Display for FrameDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameDirection::Sent => write!(f, "TX"),
            FrameDirection::Received => write!(f, "RX"),
        }
    }
}

/// 帧回调 Trait
///
/// 回调在会话线程上同步执行，实现应尽量轻量。
pub trait FrameCallback: Send + Sync {
    fn on_frame(&self, direction: FrameDirection, frame: &AptFrame);
}

/// 钩子管理器
#[derive(Default, Clone)]
pub struct HookManager {
    callbacks: Vec<Arc<dyn FrameCallback>>,
}

impl HookManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_callback(&mut self, callback: Arc<dyn FrameCallback>) {
        self.callbacks.push(callback);
    }

    /// 触发所有回调
    pub fn trigger_all(&self, direction: FrameDirection, frame: &AptFrame) {
        for callback in &self.callbacks {
            callback.on_frame(direction, frame);
        }
    }

    pub fn len(&self) -> usize {
        self.callbacks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.callbacks.is_empty()
    }

    pub fn clear(&mut self) {
        self.callbacks.clear();
    }
}

impl fmt::Debug for HookManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookManager")
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}

/// 十六进制转储钩子
///
/// 以 `debug` 级别输出每一帧的完整字节，target 为 `bpc::frames`。
#[derive(Debug, Clone, Copy, Default)]
pub struct HexDumpHook;

impl FrameCallback for HexDumpHook {
    fn on_frame(&self, direction: FrameDirection, frame: &AptFrame) {
        debug!(
            target: "bpc::frames",
            "{} {:#06x} {}",
            direction,
            frame.message_id,
            hex::encode(frame.to_bytes())
        );
    }
}
