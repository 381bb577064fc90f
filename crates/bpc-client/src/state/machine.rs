use std::fmt;

use tracing::debug;

use crate::config::Calibration;
use crate::error::ClientError;
use crate::registry::ChannelId;

/// 通道状态
///
/// ```text
/// Disabled ──enable──▶ Enabled ──zero──▶ ZeroRequested ──poll(closed loop)──▶ ClosedLoopReady
///     ▲                                                                             │
///     └──────────────────────────────── disable ────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ChannelState {
    #[default]
    Disabled,
    Enabled,
    /// 已发送归零指令，等待控制器进入闭环
    ZeroRequested,
    /// 归零完成，可接受位置指令
    ClosedLoopReady,
}

impl ChannelState {
    /// 通道是否已使能（任何非 `Disabled` 状态）
    pub fn is_enabled(self) -> bool {
        self != ChannelState::Disabled
    }
}

impl fmt::Display for ChannelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChannelState::Disabled => "disabled",
            ChannelState::Enabled => "enabled",
            ChannelState::ZeroRequested => "zero-requested",
            ChannelState::ClosedLoopReady => "closed-loop-ready",
        };
        f.write_str(name)
    }
}

/// 本地记录的控制模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LoopMode {
    #[default]
    OpenLoop,
    ClosedLoop,
}

impl fmt::Display for LoopMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoopMode::OpenLoop => f.write_str("open loop"),
            LoopMode::ClosedLoop => f.write_str("closed loop"),
        }
    }
}

/// 归零进度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum ZeroProgress {
    #[default]
    NotStarted,
    Requested,
    Complete,
}

/// 单个通道的本地模型
///
/// 使能状态与归零进度分别记录，[`ChannelState`] 由两者推导。
/// bay 地址与标定在创建后不可变；状态只由 `ChannelController` 的操作推进。
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    id: ChannelId,
    enabled: bool,
    zero: ZeroProgress,
    mode: LoopMode,
    calibration: Calibration,
}

impl Channel {
    pub fn new(id: ChannelId, calibration: Calibration) -> Self {
        Self {
            id,
            enabled: false,
            zero: ZeroProgress::NotStarted,
            mode: LoopMode::OpenLoop,
            calibration,
        }
    }

    pub fn id(&self) -> ChannelId {
        self.id
    }

    pub fn bay_address(&self) -> u8 {
        self.id.bay_address()
    }

    pub fn state(&self) -> ChannelState {
        match (self.enabled, self.zero) {
            (false, _) => ChannelState::Disabled,
            (true, ZeroProgress::NotStarted) => ChannelState::Enabled,
            (true, ZeroProgress::Requested) => ChannelState::ZeroRequested,
            (true, ZeroProgress::Complete) => ChannelState::ClosedLoopReady,
        }
    }

    pub fn mode(&self) -> LoopMode {
        self.mode
    }

    pub fn calibration(&self) -> &Calibration {
        &self.calibration
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// 控制器是否已报告归零完成（与使能状态无关）
    pub fn is_zeroed(&self) -> bool {
        self.zero == ZeroProgress::Complete
    }

    /// 位置指令的前置条件：已使能且归零完成
    pub fn ensure_ready(&self) -> Result<(), ClientError> {
        if self.enabled && self.is_zeroed() {
            Ok(())
        } else {
            Err(ClientError::PreconditionNotMet {
                channel: self.id.get(),
                state: self.state(),
            })
        }
    }

    /// 已使能的通道保持归零进度
    pub(crate) fn on_enabled(&mut self) {
        self.update(|ch| ch.enabled = true);
    }

    pub(crate) fn on_disabled(&mut self) {
        self.update(|ch| {
            ch.enabled = false;
            ch.zero = ZeroProgress::NotStarted;
        });
    }

    pub(crate) fn on_zero_requested(&mut self) {
        self.update(|ch| ch.zero = ZeroProgress::Requested);
    }

    /// 控制器报告闭环，归零完成；不改变使能状态
    pub(crate) fn on_zero_complete(&mut self) {
        self.mode = LoopMode::ClosedLoop;
        self.update(|ch| ch.zero = ZeroProgress::Complete);
    }

    /// 模式切换不影响归零标志
    pub(crate) fn on_mode(&mut self, mode: LoopMode) {
        if self.mode != mode {
            debug!("Channel {}: mode {} -> {}", self.id, self.mode, mode);
            self.mode = mode;
        }
    }

    fn update(&mut self, apply: impl FnOnce(&mut Self)) {
        let before = self.state();
        apply(self);
        let after = self.state();
        if before != after {
            debug!("Channel {}: {} -> {}", self.id, before, after);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> Channel {
        Channel::new(ChannelId::CH1, Calibration::default())
    }

    #[test]
    fn test_initial_state() {
        let ch = channel();
        assert_eq!(ch.state(), ChannelState::Disabled);
        assert_eq!(ch.mode(), LoopMode::OpenLoop);
        assert_eq!(ch.bay_address(), 0x21);
        assert!(!ch.is_zeroed());
    }

    #[test]
    fn test_full_sequence() {
        let mut ch = channel();
        ch.on_enabled();
        assert_eq!(ch.state(), ChannelState::Enabled);
        ch.on_zero_requested();
        assert_eq!(ch.state(), ChannelState::ZeroRequested);
        assert!(ch.ensure_ready().is_err());
        ch.on_zero_complete();
        assert_eq!(ch.state(), ChannelState::ClosedLoopReady);
        assert_eq!(ch.mode(), LoopMode::ClosedLoop);
        assert!(ch.ensure_ready().is_ok());
    }

    #[test]
    fn test_enable_is_idempotent() {
        let mut ch = channel();
        ch.on_enabled();
        ch.on_zero_requested();
        ch.on_enabled();
        assert_eq!(ch.state(), ChannelState::ZeroRequested);

        ch.on_zero_complete();
        ch.on_enabled();
        assert_eq!(ch.state(), ChannelState::ClosedLoopReady);
    }

    #[test]
    fn test_disable_clears_zero() {
        let mut ch = channel();
        ch.on_enabled();
        ch.on_zero_requested();
        ch.on_zero_complete();
        ch.on_disabled();
        assert_eq!(ch.state(), ChannelState::Disabled);
        assert!(matches!(
            ch.ensure_ready(),
            Err(ClientError::PreconditionNotMet {
                channel: 1,
                state: ChannelState::Disabled
            })
        ));
    }

    #[test]
    fn test_zero_complete_while_disabled_is_not_ready() {
        let mut ch = channel();
        ch.on_zero_complete();
        assert!(ch.is_zeroed());
        assert!(!ch.is_enabled());
        assert_eq!(ch.state(), ChannelState::Disabled);
        assert!(matches!(
            ch.ensure_ready(),
            Err(ClientError::PreconditionNotMet {
                state: ChannelState::Disabled,
                ..
            })
        ));

        ch.on_enabled();
        assert_eq!(ch.state(), ChannelState::ClosedLoopReady);
        assert!(ch.ensure_ready().is_ok());
    }

    #[test]
    fn test_mode_change_keeps_zero_flag() {
        let mut ch = channel();
        ch.on_zero_complete();
        ch.on_mode(LoopMode::OpenLoop);
        assert_eq!(ch.mode(), LoopMode::OpenLoop);
        assert!(ch.is_zeroed());
    }
}
