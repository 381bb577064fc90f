//! 测试辅助：Mock 会话与应答帧构造

#![allow(dead_code)]

use bpc_client::{ChannelController, ControllerConfig};
use bpc_driver::Session;
use bpc_protocol::{ID_PZ_REQ_OUTPUTPOS, ID_PZ_REQ_OUTPUTVOLTS, voltage_to_scaled};
use bpc_serial::MockTransport;

/// 打开的 Mock 会话 + 控制器，返回可继续检查的 Mock 句柄
pub fn controller() -> (ChannelController<MockTransport>, MockTransport) {
    controller_with(ControllerConfig::default())
}

pub fn controller_with(config: ControllerConfig) -> (ChannelController<MockTransport>, MockTransport) {
    let mock = MockTransport::new();
    let mut session = Session::new(mock.clone());
    session.open().unwrap();
    let controller = ChannelController::with_config(session, config).unwrap();
    (controller, mock)
}

/// 6 字节状态应答，状态字节位于偏移 3
pub fn status_reply(message_id: u16, status: u8, bay: u8) -> [u8; 6] {
    let [lo, hi] = message_id.to_le_bytes();
    [lo, hi, 0x01, status, bay, 0x01]
}

/// 10 字节数值应答，数值位于最后 2 字节
pub fn value_reply(message_id: u16, raw: [u8; 2]) -> [u8; 10] {
    let [lo, hi] = message_id.to_le_bytes();
    [lo, hi, 0x04, 0x00, 0x81, 0x50, 0x01, 0x00, raw[0], raw[1]]
}

pub fn position_reply(raw: u16) -> [u8; 10] {
    value_reply(ID_PZ_REQ_OUTPUTPOS, raw.to_le_bytes())
}

pub fn voltage_reply_raw(raw: i16) -> [u8; 10] {
    value_reply(ID_PZ_REQ_OUTPUTVOLTS, raw.to_le_bytes())
}

/// 以 75 V 满量程编码的电压读数
pub fn voltage_reply(volts: f64) -> [u8; 10] {
    voltage_reply_raw(voltage_to_scaled(volts, 75.0).unwrap().raw())
}

/// 长帧数据包最后 2 字节（有符号小端）
pub fn written_value(frame: &[u8]) -> i16 {
    let n = frame.len();
    i16::from_le_bytes([frame[n - 2], frame[n - 1]])
}

/// 把通道推进到 `ClosedLoopReady`
pub fn zero_channel(controller: &mut ChannelController<MockTransport>, mock: &MockTransport, channel: u8) {
    controller.zero(channel).unwrap();
    mock.push_reply(&status_reply(0x0642, 0x02, 0x20 + channel));
    assert!(controller.poll_zero_status(channel).unwrap());
    mock.clear_writes();
}
