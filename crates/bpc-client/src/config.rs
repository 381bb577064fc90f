//! 标定与运行参数配置
//!
//! 标定常数（最大行程、最大输出电压）随设备和重新标定而变化，
//! 因此全部可配置，并支持按通道覆盖。
//!
//! # TOML 示例
//!
//! ```toml
//! zero_poll_interval_ms = 500
//! zero_timeout_ms = 30000
//! ramp_steps = 100
//! ramp_delay_ms = 1
//!
//! [calibration]
//! max_position_nm = 30000.0
//! max_voltage = 75.0
//!
//! [[channels]]
//! channel = 2
//! max_voltage = 47.59
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use bpc_protocol::{DEFAULT_MAX_POSITION_NM, DEFAULT_MAX_VOLTAGE};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;
use crate::registry::ChannelId;

/// 单通道标定
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Calibration {
    /// 最大行程（nm），对应定点满量程
    pub max_position_nm: f64,
    /// 最大输出电压（V），对应定点满量程
    pub max_voltage: f64,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            max_position_nm: DEFAULT_MAX_POSITION_NM,
            max_voltage: DEFAULT_MAX_VOLTAGE,
        }
    }
}

impl Calibration {
    /// 两个最大值都必须是有限正数
    pub fn validate(&self) -> Result<(), ClientError> {
        check_max("max_position_nm", self.max_position_nm)?;
        check_max("max_voltage", self.max_voltage)
    }
}

fn check_max(field: &str, value: f64) -> Result<(), ClientError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ClientError::Config(format!(
            "{field} must be a positive finite number, got {value}"
        )))
    }
}

/// 按通道覆盖的标定（未给出的字段沿用全局值）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChannelOverride {
    pub channel: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_position_nm: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_voltage: Option<f64>,
}

/// 控制器配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// `wait_zeroed` 的轮询间隔（ms）
    pub zero_poll_interval_ms: u64,
    /// `wait_zeroed` 的超时（ms）
    pub zero_timeout_ms: u64,
    /// 关机时电压斜坡的步数
    pub ramp_steps: u32,
    /// 电压斜坡每步之间的延时（ms）
    pub ramp_delay_ms: u64,
    /// 全局标定
    pub calibration: Calibration,
    /// 按通道覆盖
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub channels: Vec<ChannelOverride>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            zero_poll_interval_ms: 500,
            zero_timeout_ms: 30_000,
            ramp_steps: 100,
            ramp_delay_ms: 1,
            calibration: Calibration::default(),
            channels: Vec::new(),
        }
    }
}

impl ControllerConfig {
    /// 从 TOML 文本解析并校验
    pub fn from_toml_str(text: &str) -> Result<Self, ClientError> {
        let config: Self =
            toml::from_str(text).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件加载
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))?;
        Self::from_toml_str(&text)
    }

    pub fn to_toml_string(&self) -> Result<String, ClientError> {
        toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// 写入 TOML 文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ClientError> {
        let path = path.as_ref();
        fs::write(path, self.to_toml_string()?)
            .map_err(|e| ClientError::Config(format!("{}: {e}", path.display())))
    }

    pub fn validate(&self) -> Result<(), ClientError> {
        self.calibration.validate()?;

        for (i, entry) in self.channels.iter().enumerate() {
            ChannelId::new(entry.channel).map_err(|_| {
                ClientError::Config(format!(
                    "channels[{i}]: channel {} is not 1, 2 or 3",
                    entry.channel
                ))
            })?;
            if self.channels[..i].iter().any(|e| e.channel == entry.channel) {
                return Err(ClientError::Config(format!(
                    "channels[{i}]: duplicate override for channel {}",
                    entry.channel
                )));
            }
            if let Some(v) = entry.max_position_nm {
                check_max("max_position_nm", v)?;
            }
            if let Some(v) = entry.max_voltage {
                check_max("max_voltage", v)?;
            }
        }

        Ok(())
    }

    /// 某通道的生效标定
    pub fn calibration_for(&self, channel: ChannelId) -> Calibration {
        let mut cal = self.calibration;
        if let Some(entry) = self.channels.iter().find(|e| e.channel == channel.get()) {
            if let Some(v) = entry.max_position_nm {
                cal.max_position_nm = v;
            }
            if let Some(v) = entry.max_voltage {
                cal.max_voltage = v;
            }
        }
        cal
    }

    pub fn zero_poll_interval(&self) -> Duration {
        Duration::from_millis(self.zero_poll_interval_ms)
    }

    pub fn zero_timeout(&self) -> Duration {
        Duration::from_millis(self.zero_timeout_ms)
    }

    pub fn ramp_delay(&self) -> Duration {
        Duration::from_millis(self.ramp_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ControllerConfig::default();
        assert_eq!(config.calibration.max_position_nm, 30_000.0);
        assert_eq!(config.calibration.max_voltage, 75.0);
        assert_eq!(config.zero_poll_interval(), Duration::from_millis(500));
        assert_eq!(config.zero_timeout(), Duration::from_secs(30));
        assert_eq!(config.ramp_steps, 100);
        assert_eq!(config.ramp_delay(), Duration::from_millis(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = ControllerConfig::from_toml_str("").unwrap();
        assert_eq!(config, ControllerConfig::default());
    }

    #[test]
    fn test_channel_override() {
        let config = ControllerConfig::from_toml_str(
            r#"
            ramp_steps = 10

            [calibration]
            max_position_nm = 20000.0

            [[channels]]
            channel = 2
            max_voltage = 47.59
            "#,
        )
        .unwrap();

        assert_eq!(config.ramp_steps, 10);
        let ch1 = config.calibration_for(ChannelId::CH1);
        assert_eq!(ch1.max_position_nm, 20_000.0);
        assert_eq!(ch1.max_voltage, 75.0);

        let ch2 = config.calibration_for(ChannelId::CH2);
        assert_eq!(ch2.max_position_nm, 20_000.0);
        assert_eq!(ch2.max_voltage, 47.59);
    }

    #[test]
    fn test_rejects_bad_maxima() {
        let err = ControllerConfig::from_toml_str("[calibration]\nmax_voltage = 0.0").unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("max_voltage")));

        let err = ControllerConfig::from_toml_str(
            "[[channels]]\nchannel = 1\nmax_position_nm = -5.0",
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(_)));
    }

    #[test]
    fn test_rejects_bad_channel_override() {
        let err = ControllerConfig::from_toml_str("[[channels]]\nchannel = 4").unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("channel 4")));

        let err = ControllerConfig::from_toml_str(
            "[[channels]]\nchannel = 1\n[[channels]]\nchannel = 1",
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bpc.toml");

        let mut config = ControllerConfig::default();
        config.zero_timeout_ms = 5_000;
        config.channels.push(ChannelOverride {
            channel: 3,
            max_position_nm: Some(25_000.0),
            max_voltage: None,
        });
        config.save(&path).unwrap();

        let loaded = ControllerConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ControllerConfig::load("/nonexistent/bpc.toml").unwrap_err();
        assert!(matches!(err, ClientError::Config(msg) if msg.contains("/nonexistent/bpc.toml")));
    }
}
