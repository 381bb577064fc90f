//! # BPC CLI
//!
//! Command-line interface for Thorlabs BPC203 piezo controllers.
//!
//! 每次运行都是一次完整的会话：打开串口 → 执行命令 → 关闭串口。
//!
//! ```bash
//! # 保存默认串口
//! bpc-cli config set --port /dev/ttyUSB0
//!
//! # 归零并等待闭环就绪
//! bpc-cli zero 1 2 --wait
//!
//! # 闭环定位
//! bpc-cli move 1 15000
//!
//! # 扫描结束后自动复位到开环 0 V
//! bpc-cli scan --channels 1,2 --step 500
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Context, Result};
use bpc_sdk::SerialController;
use clap::{ArgAction, Parser, Subcommand};
use tracing::warn;

mod commands;
mod connection;
mod validation;

use commands::config::CliConfig;
use commands::{
    ChannelCommand, ConfigCommand, ModeCommand, MoveCommand, PositionCommand, ScanCommand,
    ShutdownCommand, VoltageCommand, ZeroCommand,
};
use connection::{Connection, ConnectionArgs};

/// BPC CLI - 压电控制器命令行工具
#[derive(Parser, Debug)]
#[command(name = "bpc-cli")]
#[command(about = "Command-line interface for Thorlabs BPC203 piezo controllers", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    connection: ConnectionArgs,

    /// 日志详细程度（-v: debug，-vv: trace）
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// 闪烁通道显示
    Identify(ChannelCommand),

    /// 使能通道输出
    Enable(ChannelCommand),

    /// 禁用通道输出
    Disable(ChannelCommand),

    /// 设置或查询开环/闭环模式
    Mode(ModeCommand),

    /// 归零（完成后进入闭环）
    Zero(ZeroCommand),

    /// 闭环定位（nm）
    Move(MoveCommand),

    /// 查询输出位置
    Position(PositionCommand),

    /// 电压读写与斜坡
    #[command(subcommand)]
    Voltage(VoltageCommand),

    /// 往返扫描
    Scan(ScanCommand),

    /// 复位所有通道并关闭串口
    Shutdown(ShutdownCommand),

    /// 配置管理
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    fn log_directives(&self) -> String {
        let level = match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        };
        if self.connection.dump_frames && self.verbose == 0 {
            format!("{level},bpc::frames=debug")
        } else {
            level.to_string()
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    bpc_sdk::init_logger_with(&cli.log_directives()).context("初始化日志失败")?;

    let connection = cli.connection.resolve(&CliConfig::load()?);

    match cli.command {
        Commands::Config(cmd) => cmd.execute(),
        Commands::Identify(cmd) => one_shot(&connection, |c| cmd.identify(c)),
        Commands::Enable(cmd) => one_shot(&connection, |c| cmd.enable(c)),
        Commands::Disable(cmd) => one_shot(&connection, |c| cmd.disable(c)),
        Commands::Mode(cmd) => one_shot(&connection, |c| cmd.execute(c)),
        Commands::Zero(cmd) => one_shot(&connection, |c| cmd.execute(c)),
        Commands::Move(cmd) => one_shot(&connection, |c| cmd.execute(c)),
        Commands::Position(cmd) => one_shot(&connection, |c| cmd.execute(c)),
        Commands::Voltage(cmd) => one_shot(&connection, |c| cmd.execute(c)),
        Commands::Shutdown(cmd) => cmd.execute(&mut connection.connect()?),
        Commands::Scan(cmd) => {
            let mut controller = connection.connect()?;

            let running = Arc::new(AtomicBool::new(true));
            let flag = running.clone();
            ctrlc::set_handler(move || {
                println!("\n⚠️  收到 Ctrl-C，正在停止扫描...");
                flag.store(false, Ordering::SeqCst);
            })
            .context("注册 Ctrl-C 处理失败")?;

            cmd.execute(&mut controller, &running)
        },
    }
}

/// 连接 → 执行 → 关闭串口（不复位电压）
fn one_shot<F>(connection: &Connection, run: F) -> Result<()>
where
    F: FnOnce(&mut SerialController) -> Result<()>,
{
    let mut controller = connection.connect()?;
    let result = run(&mut controller);
    if let Err(e) = controller.session_mut().close() {
        warn!("Failed to close serial port: {}", e);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::scan::ScanQuantity;

    #[test]
    fn test_parse_move() {
        let cli = Cli::try_parse_from(["bpc-cli", "--port", "COM3", "move", "1", "15000"]).unwrap();
        assert_eq!(cli.connection.port.as_deref(), Some("COM3"));
        match cli.command {
            Commands::Move(cmd) => {
                assert_eq!(cmd.channel, 1);
                assert_eq!(cmd.position_nm, 15_000.0);
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_channel_four() {
        assert!(Cli::try_parse_from(["bpc-cli", "enable", "4"]).is_err());
        assert!(Cli::try_parse_from(["bpc-cli", "zero", "0"]).is_err());
    }

    #[test]
    fn test_scan_defaults() {
        let cli = Cli::try_parse_from(["bpc-cli", "scan"]).unwrap();
        match cli.command {
            Commands::Scan(cmd) => {
                assert_eq!(cmd.channels, vec![1, 2]);
                assert_eq!(cmd.quantity, ScanQuantity::Position);
                assert_eq!(cmd.from, 0.0);
                assert_eq!(cmd.to, 30_000.0);
                assert_eq!(cmd.step, 1_000.0);
                assert_eq!(cmd.dwell_ms, 100);
                assert!(!cmd.skip_zero);
            },
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["bpc-cli", "position", "--dump-frames", "-vv", "--baud", "9600"])
                .unwrap();
        assert!(cli.connection.dump_frames);
        assert_eq!(cli.connection.baud, Some(9_600));
        assert_eq!(cli.log_directives(), "trace");
    }

    #[test]
    fn test_dump_frames_directive() {
        let cli = Cli::try_parse_from(["bpc-cli", "--dump-frames", "shutdown"]).unwrap();
        assert_eq!(cli.log_directives(), "info,bpc::frames=debug");
    }

    #[test]
    fn test_voltage_set_negative() {
        let cli = Cli::try_parse_from(["bpc-cli", "voltage", "set", "2", "-5.5"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Voltage(VoltageCommand::Set { channel: 2, volts }) if volts == -5.5
        ));
    }
}
