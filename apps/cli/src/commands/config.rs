//! 配置管理命令
//!
//! 保存默认串口参数与标定文件路径，文件位于 `<config_dir>/bpc/config.toml`。

use anyhow::{Context, Result};
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// 配置文件路径
pub fn config_file() -> Result<PathBuf> {
    let mut path = dirs::config_dir().ok_or_else(|| anyhow::anyhow!("无法确定配置目录"))?;
    path.push("bpc");
    path.push("config.toml");
    Ok(path)
}

/// CLI 配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    /// 默认串口
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<String>,

    /// 波特率
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baud_rate: Option<u32>,

    /// 读超时（ms）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    /// 控制器标定文件（TOML）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calibration: Option<PathBuf>,
}

impl CliConfig {
    /// 从默认位置加载；文件不存在时返回默认配置
    pub fn load() -> Result<Self> {
        Self::load_from(&config_file()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).context("读取配置文件失败")?;
        toml::from_str(&content).with_context(|| format!("解析配置文件失败: {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).context("创建配置目录失败")?;
        }

        let content = toml::to_string(self).context("序列化配置失败")?;
        fs::write(path, format!("# BPC CLI Configuration\n\n{content}"))
            .context("写入配置文件失败")?;
        Ok(())
    }
}

fn show<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "(未设置)".to_string(), |v| v.to_string())
}

/// 配置命令
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// 设置配置项
    Set {
        /// 默认串口（如 /dev/ttyUSB0、COM3）
        #[arg(long)]
        port: Option<String>,

        /// 波特率
        #[arg(long)]
        baud: Option<u32>,

        /// 读超时（ms）
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// 标定文件路径
        #[arg(long)]
        calibration: Option<PathBuf>,
    },

    /// 获取配置项
    Get {
        /// 配置项名称（port、baud、timeout_ms、calibration、all）
        #[arg(default_value = "all")]
        key: String,
    },

    /// 显示配置文件路径
    Path,
}

impl ConfigCommand {
    pub fn execute(self) -> Result<()> {
        let path = config_file()?;
        self.execute_at(&path)
    }

    pub fn execute_at(self, path: &Path) -> Result<()> {
        match self {
            ConfigCommand::Set {
                port,
                baud,
                timeout_ms,
                calibration,
            } => {
                let mut config = CliConfig::load_from(path)?;

                if let Some(port) = port {
                    println!("✅ 设置默认串口: {}", port);
                    config.port = Some(port);
                }
                if let Some(baud) = baud {
                    println!("✅ 设置波特率: {}", baud);
                    config.baud_rate = Some(baud);
                }
                if let Some(ms) = timeout_ms {
                    println!("✅ 设置读超时: {} ms", ms);
                    config.timeout_ms = Some(ms);
                }
                if let Some(file) = calibration {
                    println!("✅ 设置标定文件: {}", file.display());
                    config.calibration = Some(file);
                }

                config.save_to(path)
            },

            ConfigCommand::Get { key } => {
                let config = CliConfig::load_from(path)?;
                let calibration = config.calibration.as_ref().map(|p| p.display());

                match key.as_str() {
                    "port" => println!("{}", show(config.port.as_deref())),
                    "baud" | "baud_rate" => println!("{}", show(config.baud_rate)),
                    "timeout_ms" => println!("{}", show(config.timeout_ms)),
                    "calibration" => println!("{}", show(calibration)),
                    _ => {
                        println!("BPC CLI 配置:");
                        println!("  串口: {}", show(config.port.as_deref()));
                        println!("  波特率: {}", show(config.baud_rate));
                        println!("  读超时: {}", show(config.timeout_ms));
                        println!("  标定文件: {}", show(calibration));
                    },
                }
                Ok(())
            },

            ConfigCommand::Path => {
                println!("{}", path.display());
                Ok(())
            },
        }
    }
}
