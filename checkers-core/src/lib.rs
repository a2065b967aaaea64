//! 英式跳棋（8x8）规则核心库
//!
//! 包含:
//! - 棋子、棋盘、位置等核心数据结构
//! - 单个棋子的走法规则（普通走子 / 强制吃子 / 升王）
//! - 对局状态机（回合切换、连跳、胜负判定）
//! - 回合控制器（选子 -> 落子）
//! - 棋盘文本格式 (Diagram)

mod board;
mod constants;
mod controller;
mod diagram;
mod error;
mod game;
mod piece;
mod rules;

pub use board::Board;
pub use constants::*;
pub use controller::{ClickOutcome, TurnController, TurnPhase};
pub use diagram::{Diagram, INITIAL_DIAGRAM};
pub use error::{Result, RulesError};
pub use game::{GameOutcome, GameState, MoveReport, WinReason};
pub use piece::{Color, Piece, PieceId, Position};
pub use rules::MoveRules;
