//! 英式跳棋终端客户端
//!
//! 包含:
//! - 终端设置（JSON 持久化）
//! - 命令解析与棋盘文本绘制
//! - 玩家对电脑的命令循环

pub mod settings;
pub mod shell;

pub use settings::{CliSettings, LogLevel};
pub use shell::{render_board, Command, CommandError, Shell, HELP_TEXT};
