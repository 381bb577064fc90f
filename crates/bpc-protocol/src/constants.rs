//! 协议常量定义
//!
//! 集中定义地址、帧长度和定点换算常量，避免在代码中散落"魔法数"。

/// 主机（PC）源地址
pub const HOST_ADDRESS: u8 = 0x01;

/// 控制器整体地址（通用 USB 单元）
pub const CONTROLLER_ADDRESS: u8 = 0x50;

/// 三个驱动槽（bay）的线上地址，依次对应通道 1、2、3
pub const BAY_ADDRESSES: [u8; 3] = [0x21, 0x22, 0x23];

/// 目的地址中的"数据包"标志位
pub const DATA_PACKET_FLAG: u8 = 0x80;

/// 帧头长度
pub const HEADER_LEN: usize = 6;

/// 状态查询应答长度（模式、使能状态）
pub const STATUS_REPLY_LEN: usize = 6;

/// 数值查询应答长度（位置、电压）：6 字节头 + 4 字节数据包
pub const VALUE_REPLY_LEN: usize = 10;

/// 状态应答中状态字节的偏移
pub const STATUS_BYTE_OFFSET: usize = 3;

/// 每个 bay 内部唯一的通道标识（写入参数 1 或数据包前 2 字节）
pub const BAY_CHANNEL_IDENT: u8 = 0x01;

/// 定点满量程（`i16::MAX`）
pub const FULL_SCALE: i32 = 32767;

/// 默认最大行程（纳米），对应 DRV517 执行器
pub const DEFAULT_MAX_POSITION_NM: f64 = 30_000.0;

/// 默认最大输出电压（伏特）
pub const DEFAULT_MAX_VOLTAGE: f64 = 75.0;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_constants() {
        assert_eq!(HOST_ADDRESS, 0x01);
        assert_eq!(CONTROLLER_ADDRESS, 0x50);
        assert_eq!(BAY_ADDRESSES, [0x21, 0x22, 0x23]);
        // bay 地址不能与数据包标志位冲突
        for bay in BAY_ADDRESSES {
            assert_eq!(bay & DATA_PACKET_FLAG, 0);
        }
    }

    #[test]
    fn test_reply_lengths() {
        assert_eq!(STATUS_REPLY_LEN, HEADER_LEN);
        assert_eq!(VALUE_REPLY_LEN, HEADER_LEN + 4);
        assert!(STATUS_BYTE_OFFSET < HEADER_LEN);
        assert_eq!(FULL_SCALE, i16::MAX as i32);
    }
}
