//! 通道控制器
//!
//! 在 [`Session`] 之上实现使能、归零、位置和电压操作，
//! 并维护每个通道的本地状态机。
//!
//! 所有校验（通道号、量程、归零前置条件）都在写出任何字节之前完成。
//! 传输错误原样向上传递，不做重试。

use std::time::{Duration, Instant};

use bpc_driver::Session;
use bpc_protocol::{
    ChannelEnableCommand, Command, EnableState, IdentifyCommand, OutputPositionCommand,
    OutputVoltageCommand, PositionControlMode, PositionControlModeCommand, RequestCommand,
    StatusReply, ValueReply, ZeroCommand, position_to_scaled, scaled_to_position,
    scaled_to_voltage, voltage_to_scaled,
};
use bpc_serial::Transport;
use tracing::{debug, info, trace, warn};

use crate::Result;
use crate::config::ControllerConfig;
use crate::error::{ClientError, Quantity};
use crate::registry::{CHANNEL_COUNT, ChannelId};
use crate::state::{Channel, LoopMode};

/// BPC203 通道控制器
///
/// 单线程、阻塞式：每次查询都是"写请求 → 读定长应答"，不会交叠。
pub struct ChannelController<T: Transport> {
    session: Session<T>,
    config: ControllerConfig,
    channels: [Channel; CHANNEL_COUNT],
}

impl<T: Transport> ChannelController<T> {
    /// 使用默认配置创建（所有通道初始为 `Disabled`）
    pub fn new(session: Session<T>) -> Self {
        Self::from_parts(session, ControllerConfig::default())
    }

    /// 使用自定义配置创建
    ///
    /// # 错误
    ///
    /// 配置无效时返回 [`ClientError::Config`]。
    pub fn with_config(session: Session<T>, config: ControllerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(session, config))
    }

    fn from_parts(session: Session<T>, config: ControllerConfig) -> Self {
        let channels = ChannelId::ALL.map(|id| Channel::new(id, config.calibration_for(id)));
        Self {
            session,
            config,
            channels,
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn session(&self) -> &Session<T> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session<T> {
        &mut self.session
    }

    pub fn into_session(self) -> Session<T> {
        self.session
    }

    /// 某通道的本地模型
    pub fn channel(&self, channel: u8) -> Result<&Channel> {
        let id = ChannelId::new(channel)?;
        Ok(&self.channels[id.index()])
    }

    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    fn slot(&mut self, id: ChannelId) -> &mut Channel {
        &mut self.channels[id.index()]
    }

    fn send<C: Command>(&mut self, command: &C) -> Result<()> {
        self.session.send(command)?;
        Ok(())
    }

    fn query_status(&mut self, request: RequestCommand) -> Result<StatusReply> {
        let frame = self.session.query(&request)?;
        let reply = StatusReply::from(&frame);
        trace!(
            "{} -> reply id {:#06x}, status {}",
            request.id.name(),
            reply.message_id,
            reply.status
        );
        Ok(reply)
    }

    fn query_value(&mut self, request: RequestCommand) -> Result<ValueReply> {
        let frame = self.session.query(&request)?;
        let reply = ValueReply::try_from(&frame)?;
        trace!(
            "{} -> reply id {:#06x}, raw {:02x?}",
            request.id.name(),
            reply.message_id,
            reply.raw
        );
        Ok(reply)
    }

    // ==================== 识别 / 使能 / 模式 ====================

    /// 让控制器闪烁对应通道的显示
    pub fn identify(&mut self, channel: u8) -> Result<()> {
        let id = ChannelId::new(channel)?;
        info!("Identifying channel {}", id);
        let command = IdentifyCommand {
            dest: self.session.controller_address(),
            channel: id.get(),
        };
        self.send(&command)
    }

    /// 使能通道（幂等，不会降低已有的归零进度）
    pub fn enable(&mut self, channel: u8) -> Result<()> {
        let id = ChannelId::new(channel)?;
        self.send(&ChannelEnableCommand::enable(id.bay_address()))?;
        self.slot(id).on_enabled();
        Ok(())
    }

    /// 禁用通道，本地状态回到 `Disabled`
    pub fn disable(&mut self, channel: u8) -> Result<()> {
        let id = ChannelId::new(channel)?;
        self.send(&ChannelEnableCommand::disable(id.bay_address()))?;
        self.slot(id).on_disabled();
        Ok(())
    }

    /// 平滑切换到开环/闭环
    ///
    /// 不影响归零标志。
    pub fn set_mode(&mut self, channel: u8, closed_loop: bool) -> Result<()> {
        let id = ChannelId::new(channel)?;
        let (mode, local) = if closed_loop {
            (PositionControlMode::ClosedLoopSmooth, LoopMode::ClosedLoop)
        } else {
            (PositionControlMode::OpenLoopSmooth, LoopMode::OpenLoop)
        };
        self.send(&PositionControlModeCommand {
            bay: id.bay_address(),
            mode,
        })?;
        self.slot(id).on_mode(local);
        Ok(())
    }

    /// 查询控制器报告的模式
    pub fn get_mode(&mut self, channel: u8) -> Result<PositionControlMode> {
        let id = ChannelId::new(channel)?;
        let mode = self.query_status(RequestCommand::mode(id.bay_address()))?.mode()?;
        let local = if mode.is_closed_loop() {
            LoopMode::ClosedLoop
        } else {
            LoopMode::OpenLoop
        };
        self.slot(id).on_mode(local);
        Ok(mode)
    }

    /// 查询控制器报告的使能状态，并同步本地使能标志
    ///
    /// 控制器报告禁用时本地归零进度同时清除。
    pub fn get_enable_state(&mut self, channel: u8) -> Result<EnableState> {
        let id = ChannelId::new(channel)?;
        let state = self
            .query_status(RequestCommand::enable_state(id.bay_address()))?
            .enable_state()?;
        debug!("Channel {} reports {:?}", id, state);
        match state {
            EnableState::Enabled => self.slot(id).on_enabled(),
            EnableState::Disabled => self.slot(id).on_disabled(),
        }
        Ok(state)
    }

    // ==================== 归零 ====================

    /// 启动归零（先使能通道）
    ///
    /// 归零完成后控制器进入闭环，用 [`poll_zero_status`](Self::poll_zero_status)
    /// 或 [`wait_zeroed`](Self::wait_zeroed) 确认。
    pub fn zero(&mut self, channel: u8) -> Result<()> {
        let id = ChannelId::new(channel)?;
        self.enable(channel)?;
        info!("Zeroing channel {}", id);
        self.send(&ZeroCommand {
            bay: id.bay_address(),
        })?;
        self.slot(id).on_zero_requested();
        Ok(())
    }

    /// 查询一次归零是否完成
    ///
    /// 控制器报告闭环（状态码 2 或 4）时记录归零完成并返回 `true`；
    /// 否则状态不变并返回 `false`。等待策略由调用方决定。
    ///
    /// 只更新归零标志：本地已禁用的通道仍需重新使能才能接受位置指令。
    pub fn poll_zero_status(&mut self, channel: u8) -> Result<bool> {
        let id = ChannelId::new(channel)?;
        let status = self.query_status(RequestCommand::mode(id.bay_address()))?.status;
        let finished = match PositionControlMode::from_status(status) {
            Ok(mode) => mode.is_closed_loop(),
            Err(_) => {
                debug!("Channel {}: unrecognised mode status {}", id, status);
                false
            },
        };

        if finished {
            let slot = self.slot(id);
            if !slot.is_zeroed() {
                info!("Channel {} zeroed", id);
            }
            slot.on_zero_complete();
        }
        Ok(finished)
    }

    /// 阻塞轮询直到归零完成
    ///
    /// 间隔和超时取自配置（`zero_poll_interval_ms` / `zero_timeout_ms`）。
    pub fn wait_zeroed(&mut self, channel: u8) -> Result<()> {
        let timeout = self.config.zero_timeout();
        let interval = self.config.zero_poll_interval();
        let start = Instant::now();

        loop {
            if self.poll_zero_status(channel)? {
                return Ok(());
            }
            if start.elapsed() >= timeout {
                return Err(ClientError::ZeroTimeout { channel, timeout });
            }
            spin_sleep::sleep(interval);
        }
    }

    // ==================== 位置 ====================

    /// 设置输出位置（nm）
    ///
    /// # 错误
    ///
    /// - 未使能或归零未完成：[`ClientError::PreconditionNotMet`]
    /// - 超出 `[0, max_position_nm]`：[`ClientError::OutOfRange`]
    pub fn position(&mut self, channel: u8, pos_nm: f64) -> Result<()> {
        let id = ChannelId::new(channel)?;
        let slot = &self.channels[id.index()];
        slot.ensure_ready()?;
        let max = slot.calibration().max_position_nm;
        check_range(Quantity::Position, pos_nm, max)?;

        let value = position_to_scaled(pos_nm, max)?;
        debug!("Channel {}: position {} nm ({})", id, pos_nm, value);
        self.send(&OutputPositionCommand {
            bay: id.bay_address(),
            value,
        })
    }

    /// 读取输出位置（整数 nm，向下取整）
    ///
    /// 只读探测，不要求归零。
    pub fn get_position(&mut self, channel: u8) -> Result<i64> {
        let id = ChannelId::new(channel)?;
        let max = self.channels[id.index()].calibration().max_position_nm;
        let reply = self.query_value(RequestCommand::position(id.bay_address()))?;
        Ok(scaled_to_position(reply.as_unsigned(), max))
    }

    // ==================== 电压 ====================

    /// 设置输出电压（V），不要求归零
    pub fn set_output_voltage(&mut self, channel: u8, volts: f64) -> Result<()> {
        let id = ChannelId::new(channel)?;
        let max = self.channels[id.index()].calibration().max_voltage;
        check_range(Quantity::Voltage, volts, max)?;

        let value = voltage_to_scaled(volts, max)?;
        trace!("Channel {}: voltage {} V ({})", id, volts, value);
        self.send(&OutputVoltageCommand {
            bay: id.bay_address(),
            value,
        })
    }

    /// 读取输出电压（V）
    pub fn get_voltage(&mut self, channel: u8) -> Result<f64> {
        let id = ChannelId::new(channel)?;
        let max = self.channels[id.index()].calibration().max_voltage;
        let reply = self.query_value(RequestCommand::voltage(id.bay_address()))?;
        Ok(scaled_to_voltage(reply.as_signed(), max))
    }

    /// 从当前电压线性斜坡到目标电压
    ///
    /// 共发送 `steps + 1` 个设定点（含两端），相邻设定点之间等待 `delay`。
    /// `steps == 0` 时直接设定目标值。当前读数超出量程时先钳位。
    pub fn ramp_voltage(
        &mut self,
        channel: u8,
        target: f64,
        steps: u32,
        delay: Duration,
    ) -> Result<()> {
        let id = ChannelId::new(channel)?;
        let max = self.channels[id.index()].calibration().max_voltage;
        check_range(Quantity::Voltage, target, max)?;

        if steps == 0 {
            return self.set_output_voltage(channel, target);
        }

        let current = self.get_voltage(channel)?;
        let start = current.clamp(0.0, max);
        if start != current {
            warn!(
                "Channel {}: voltage reading {:.3} V clamped to {:.3} V",
                id, current, start
            );
        }
        debug!(
            "Channel {}: ramp {:.3} V -> {:.3} V in {} steps",
            id, start, target, steps
        );

        let span = target - start;
        for i in 0..=steps {
            let volts = if i == steps {
                target
            } else {
                (start + span * f64::from(i) / f64::from(steps)).clamp(0.0, max)
            };
            self.set_output_voltage(channel, volts)?;
            if i < steps && !delay.is_zero() {
                spin_sleep::sleep(delay);
            }
        }
        Ok(())
    }

    /// 使用配置中的步数和延时斜坡到目标电压
    pub fn ramp_to_voltage(&mut self, channel: u8, target: f64) -> Result<()> {
        let steps = self.config.ramp_steps;
        let delay = self.config.ramp_delay();
        self.ramp_voltage(channel, target, steps, delay)
    }

    // ==================== 关闭 ====================

    /// 关闭序列：所有通道切到开环、电压斜坡到 0，然后关闭传输
    ///
    /// 尽力而为：每一步失败后继续执行剩余步骤，传输总会被关闭，返回第一个错误。
    pub fn shutdown(&mut self) -> Result<()> {
        info!("Shutting down: open loop and 0 V on all channels");
        let mut first_error = None;

        for id in ChannelId::ALL {
            if let Err(e) = self.set_mode(id.get(), false) {
                warn!("Channel {}: failed to switch to open loop: {}", id, e);
                first_error.get_or_insert(e);
            }
        }

        for id in ChannelId::ALL {
            if let Err(e) = self.ramp_to_voltage(id.get(), 0.0) {
                warn!("Channel {}: failed to ramp to 0 V: {}", id, e);
                first_error.get_or_insert(e);
            }
        }

        if let Err(e) = self.session.close() {
            warn!("Failed to close transport: {}", e);
            first_error.get_or_insert(e.into());
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                info!("Transport closed, voltages reset");
                Ok(())
            },
        }
    }
}

impl<T: Transport> std::fmt::Debug for ChannelController<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChannelController")
            .field("session", &self.session)
            .field("channels", &self.channels)
            .finish()
    }
}

fn check_range(quantity: Quantity, value: f64, max: f64) -> Result<()> {
    if (0.0..=max).contains(&value) {
        Ok(())
    } else {
        Err(ClientError::OutOfRange {
            quantity,
            value,
            min: 0.0,
            max,
        })
    }
}
