//! 终端设置
//!
//! 设置以 JSON 保存在用户配置目录下，读取失败时回退到默认设置。

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use checkers_ai::AiConfig;
use checkers_core::Color;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn display_name(&self) -> &'static str {
        match self {
            LogLevel::Error => "Error",
            LogLevel::Warn => "Warn",
            LogLevel::Info => "Info",
            LogLevel::Debug => "Debug",
            LogLevel::Trace => "Trace",
        }
    }

    pub fn to_level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

/// 终端设置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CliSettings {
    /// 玩家执哪一方，电脑执另一方
    pub human_color: Color,
    /// 电脑的随机数种子
    pub ai_seed: Option<u64>,
    /// 走子提示（在棋盘上用 `*` 标出可走棋子和落点）
    pub show_move_hints: bool,
    /// 日志级别
    pub log_level: LogLevel,
}

impl Default for CliSettings {
    fn default() -> Self {
        Self {
            human_color: Color::FIRST,
            ai_seed: None,
            show_move_hints: true,
            log_level: LogLevel::default(),
        }
    }
}

impl CliSettings {
    /// 获取设置文件路径
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|mut path| {
            path.push("english-draughts");
            path.push("settings.json");
            path
        })
    }

    /// 从默认位置加载设置
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            tracing::warn!("无法获取配置目录，使用默认设置");
            return Self::default();
        };
        Self::load_from(&path)
    }

    /// 从指定文件加载设置，任何失败都回退到默认设置
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            tracing::info!("设置文件不存在，使用默认设置");
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => {
                    tracing::info!("已加载设置: {:?}", path);
                    settings
                }
                Err(e) => {
                    tracing::warn!("设置文件格式无效: {}，使用默认设置", e);
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!("无法读取设置文件: {}，使用默认设置", e);
                Self::default()
            }
        }
    }

    /// 保存设置到默认位置
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path().context("无法获取配置目录")?;
        self.save_to(&path)
    }

    /// 保存设置到指定文件
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("无法创建配置目录: {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self).context("序列化设置失败")?;
        std::fs::write(path, content)
            .with_context(|| format!("写入设置文件失败: {}", path.display()))?;

        tracing::info!("设置已保存: {:?}", path);
        Ok(())
    }

    /// 电脑玩家配置：执玩家的对方
    pub fn ai_config(&self) -> AiConfig {
        AiConfig {
            color: self.human_color.opponent(),
            seed: self.ai_seed,
        }
    }
}
