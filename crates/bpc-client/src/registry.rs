//! 通道注册表
//!
//! 逻辑通道号（1..3）到线上 bay 地址的静态映射。
//! 所有接受通道号的操作都先经过 [`ChannelId::new`]。

use std::fmt;

use bpc_protocol::BAY_ADDRESSES;

use crate::error::ClientError;

/// 通道数量（由硬件固定）
pub const CHANNEL_COUNT: usize = BAY_ADDRESSES.len();

/// 已校验的通道号
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u8);

impl ChannelId {
    pub const CH1: Self = ChannelId(1);
    pub const CH2: Self = ChannelId(2);
    pub const CH3: Self = ChannelId(3);

    /// 全部通道（按通道号升序）
    pub const ALL: [Self; CHANNEL_COUNT] = [Self::CH1, Self::CH2, Self::CH3];

    /// 校验通道号
    ///
    /// # 错误
    ///
    /// 通道号不在 1..=3 时返回 [`ClientError::InvalidChannel`]。
    pub fn new(id: u8) -> Result<Self, ClientError> {
        if (1..=CHANNEL_COUNT as u8).contains(&id) {
            Ok(ChannelId(id))
        } else {
            Err(ClientError::InvalidChannel(id))
        }
    }

    /// 通道号（1..=3）
    #[inline]
    pub fn get(self) -> u8 {
        self.0
    }

    /// 数组下标（0..3）
    #[inline]
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }

    /// 线上 bay 地址
    #[inline]
    pub fn bay_address(self) -> u8 {
        BAY_ADDRESSES[self.index()]
    }
}

impl TryFrom<u8> for ChannelId {
    type Error = ClientError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        Self::new(id)
    }
}

impl From<ChannelId> for u8 {
    fn from(id: ChannelId) -> Self {
        id.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 通道号 → bay 地址
pub fn bay_address(channel: u8) -> Result<u8, ClientError> {
    ChannelId::new(channel).map(ChannelId::bay_address)
}
