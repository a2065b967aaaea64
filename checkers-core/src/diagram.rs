//! 棋盘文本格式解析和生成
//!
//! 格式：`<第0行>/<第1行>/.../<第7行> <走子方>`
//!
//! 每行按列 0-7 书写：`b` 黑子，`B` 黑王，`r` 红子，`R` 红王，
//! 数字 1-8 表示连续的空格。走子方为 `b` 或 `r`，省略时为黑方。
//!
//! 示例（初始局面）：
//! `1b1b1b1b/b1b1b1b1/1b1b1b1b/8/8/r1r1r1r1/1r1r1r1r/r1r1r1r1 b`

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::error::{Result, RulesError};
use crate::game::GameState;
use crate::piece::{Color, Piece, PieceId, Position};

/// 初始局面
pub const INITIAL_DIAGRAM: &str = "1b1b1b1b/b1b1b1b1/1b1b1b1b/8/8/r1r1r1r1/1r1r1r1r/r1r1r1r1 b";

/// 棋盘文本格式处理
pub struct Diagram;

impl Diagram {
    /// 解析棋盘文本为对局状态，棋子 ID 按行优先顺序分配
    pub fn parse(text: &str) -> Result<GameState> {
        let parts: Vec<&str> = text.split_whitespace().collect();
        let Some(board_str) = parts.first() else {
            return Err(RulesError::InvalidDiagram {
                reason: "Empty diagram".to_string(),
            });
        };

        let board = Self::parse_board(board_str)?;

        let current_player = match parts.get(1) {
            Some(side) => {
                let mut chars = side.chars();
                match (chars.next().and_then(Color::from_diagram_char), chars.next()) {
                    (Some(color), None) => color,
                    _ => {
                        return Err(RulesError::InvalidDiagram {
                            reason: format!("Invalid side to move: {side}"),
                        })
                    }
                }
            }
            None => Color::FIRST,
        };

        Ok(GameState::from_board(board, current_player))
    }

    /// 解析棋盘部分
    fn parse_board(board_str: &str) -> Result<Board> {
        let mut board = Board::empty();
        let rows: Vec<&str> = board_str.split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(RulesError::InvalidDiagram {
                reason: format!("Expected {} rows, got {}", BOARD_SIZE, rows.len()),
            });
        }

        let mut next_id = 0u8;
        for (row_idx, row) in rows.iter().enumerate() {
            let mut col = 0usize;

            for c in row.chars() {
                if col >= BOARD_SIZE {
                    return Err(RulesError::InvalidDiagram {
                        reason: format!("Row {row_idx} has too many columns"),
                    });
                }

                if let Some(empty_count) = c.to_digit(10).filter(|n| (1..=8).contains(n)) {
                    col += empty_count as usize;
                    continue;
                }

                let color = Color::from_diagram_char(c).ok_or_else(|| RulesError::InvalidDiagram {
                    reason: format!("Invalid piece character: {c}"),
                })?;
                let id = PieceId(next_id);
                let piece = if c.is_ascii_uppercase() {
                    Piece::king(id, color)
                } else {
                    Piece::new(id, color)
                };
                board.set(Position::new_unchecked(row_idx as u8, col as u8), Some(piece));
                next_id += 1;
                col += 1;
            }

            if col != BOARD_SIZE {
                return Err(RulesError::InvalidDiagram {
                    reason: format!("Row {row_idx} has {col} columns, expected {BOARD_SIZE}"),
                });
            }
        }

        Ok(board)
    }

    /// 将对局状态转换为棋盘文本
    pub fn to_string(state: &GameState) -> String {
        format!(
            "{} {}",
            Self::board_to_string(state.board()),
            state.current_player().to_diagram_char()
        )
    }

    /// 将棋盘转换为棋盘文本的棋盘部分
    pub fn board_to_string(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for row in 0..BOARD_SIZE as u8 {
            let mut line = String::new();
            let mut empty_count = 0;

            for col in 0..BOARD_SIZE as u8 {
                if let Some(piece) = board.get(Position::new_unchecked(row, col)) {
                    if empty_count > 0 {
                        line.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    line.push(piece.to_diagram_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                line.push_str(&empty_count.to_string());
            }

            rows.push(line);
        }

        rows.join("/")
    }
}
