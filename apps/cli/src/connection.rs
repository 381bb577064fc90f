//! 串口连接参数
//!
//! 优先级：命令行参数 > 配置文件 > 默认值。

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use bpc_sdk::{ChannelController, ControllerConfig, SerialConfig, SerialController, SessionBuilder};
use clap::Args;
use tracing::info;

use crate::commands::config::CliConfig;

/// 连接参数（所有子命令共用）
#[derive(Args, Debug, Default, Clone)]
pub struct ConnectionArgs {
    /// 串口路径（如 /dev/ttyUSB0、COM3）
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    /// 波特率
    #[arg(long, global = true)]
    pub baud: Option<u32>,

    /// 读超时（ms）
    #[arg(long, global = true)]
    pub timeout_ms: Option<u64>,

    /// 控制器标定文件（TOML）
    #[arg(long, global = true)]
    pub calibration: Option<PathBuf>,

    /// 以十六进制记录收发的每一帧
    #[arg(long, global = true)]
    pub dump_frames: bool,

    /// 启用 RTS/CTS 硬件流控
    #[arg(long, global = true)]
    pub rts_cts: bool,
}

/// 合并后的连接设置
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub serial: SerialConfig,
    pub calibration: Option<PathBuf>,
    pub dump_frames: bool,
}

impl ConnectionArgs {
    pub fn resolve(&self, file: &CliConfig) -> Connection {
        let defaults = SerialConfig::default();

        let serial = SerialConfig {
            path: self.port.clone().or_else(|| file.port.clone()).unwrap_or(defaults.path),
            baud_rate: self.baud.or(file.baud_rate).unwrap_or(defaults.baud_rate),
            timeout: self
                .timeout_ms
                .or(file.timeout_ms)
                .map_or(defaults.timeout, Duration::from_millis),
            hardware_flow_control: self.rts_cts,
        };

        Connection {
            serial,
            calibration: self.calibration.clone().or_else(|| file.calibration.clone()),
            dump_frames: self.dump_frames,
        }
    }
}

impl Connection {
    pub fn controller_config(&self) -> Result<ControllerConfig> {
        match &self.calibration {
            Some(path) => ControllerConfig::load(path)
                .with_context(|| format!("加载标定文件失败: {}", path.display())),
            None => Ok(ControllerConfig::default()),
        }
    }

    /// 打开串口并创建控制器
    pub fn connect(&self) -> Result<SerialController> {
        let config = self.controller_config()?;

        println!("⏳ 连接到 {} ...", self.serial.path);
        let session = SessionBuilder::new()
            .serial_config(self.serial.clone())
            .hex_dump(self.dump_frames)
            .build()
            .with_context(|| format!("打开串口失败: {}", self.serial.path))?;
        info!("Connected to {}", self.serial.path);

        Ok(ChannelController::with_config(session, config)?)
    }
}
