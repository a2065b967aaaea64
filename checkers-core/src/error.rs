//! 错误类型定义

use thiserror::Error;

use crate::piece::{Color, PieceId};

/// 跳棋规则错误
///
/// 所有命令在修改棋盘之前完成校验，返回错误时对局状态保持不变。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    /// 棋子不在棋盘上（已被吃掉或 ID 无效）
    #[error("Piece {id} is not on the board")]
    PieceNotFound { id: PieceId },

    /// 不是该棋子所属方的回合
    #[error("Not your turn: {current} to move")]
    NotYourTurn { current: Color },

    /// 该棋子当前不能走（不在可走棋子集合中，例如存在强制吃子）
    #[error("Piece {id} has no legal move right now")]
    PieceCannotMove { id: PieceId },

    /// 目标格不是该棋子的合法落点
    #[error("Illegal destination: ({row}, {col})")]
    IllegalDestination { row: u8, col: u8 },

    /// 被跳格不合法（不相邻或没有对方棋子）
    #[error("Invalid jumped square: ({row}, {col})")]
    InvalidJump { row: u8, col: u8 },

    /// 目标格已有棋子
    #[error("Square ({row}, {col}) is occupied")]
    SquareOccupied { row: u8, col: u8 },

    /// 连跳未完成，只能由同一棋子继续吃子
    #[error("Piece {id} must continue its capture chain")]
    ChainCaptureRequired { id: PieceId },

    /// 还没有选中棋子
    #[error("No piece selected")]
    NoSelection,

    /// 该格子上没有可选的棋子
    #[error("Square ({row}, {col}) cannot be selected")]
    NotSelectable { row: u8, col: u8 },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,

    /// 无效的棋盘文本
    #[error("Invalid diagram: {reason}")]
    InvalidDiagram { reason: String },
}

/// 规则操作结果类型
pub type Result<T> = std::result::Result<T, RulesError>;
