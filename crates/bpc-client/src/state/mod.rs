//! 通道状态机
//!
//! 每个通道在本地维护使能/归零进度和当前控制模式。
//! 硬件的真实状态在查询前未知，本地模型总是从 `Disabled` 开始。

mod machine;

pub use machine::{Channel, ChannelState, LoopMode};
