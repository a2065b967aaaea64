//! 棋盘状态

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, SQUARE_COUNT, STARTING_ROWS};
use crate::piece::{Color, Piece, PieceId, Position};

/// 棋盘
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 8x8 棋盘，索引为 row * 8 + col，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// 创建初始棋盘
    ///
    /// 黑方占 0-2 行、红方占 5-7 行的深色格，各 12 枚；
    /// 棋子 ID 按行优先顺序分配（黑方 0-11，红方 12-23）。
    pub fn initial() -> Self {
        let mut board = Self::empty();
        let mut next_id = 0u8;
        let red_start = BOARD_SIZE as u8 - STARTING_ROWS;

        for row in 0..BOARD_SIZE as u8 {
            let color = if row < STARTING_ROWS {
                Color::Black
            } else if row >= red_start {
                Color::Red
            } else {
                continue;
            };

            for col in 0..BOARD_SIZE as u8 {
                let pos = Position::new_unchecked(row, col);
                if pos.is_dark() {
                    board.set(pos, Some(Piece::new(PieceId(next_id), color)));
                    next_id += 1;
                }
            }
        }

        board
    }

    /// 获取指定位置的棋子
    pub fn get(&self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.to_index()]
        } else {
            None
        }
    }

    /// 获取指定位置棋子的可变引用
    pub fn get_mut(&mut self, pos: Position) -> Option<&mut Piece> {
        if pos.is_valid() {
            self.squares[pos.to_index()].as_mut()
        } else {
            None
        }
    }

    /// 设置指定位置的棋子
    pub fn set(&mut self, pos: Position, piece: Option<Piece>) {
        if pos.is_valid() {
            self.squares[pos.to_index()] = piece;
        }
    }

    /// 移除指定位置的棋子
    pub fn remove(&mut self, pos: Position) -> Option<Piece> {
        if pos.is_valid() {
            self.squares[pos.to_index()].take()
        } else {
            None
        }
    }

    /// 移动棋子（不检查规则），返回目标格原有的棋子
    ///
    /// 任一端不在棋盘内时不做任何事。
    pub fn move_piece(&mut self, from: Position, to: Position) -> Option<Piece> {
        if !from.is_valid() || !to.is_valid() {
            return None;
        }
        let piece = self.remove(from);
        let displaced = self.get(to);
        self.set(to, piece);
        displaced
    }

    /// 按身份查找棋子所在位置，棋子已被吃掉时返回 None
    pub fn locate(&self, id: PieceId) -> Option<Position> {
        let mut found = self
            .squares
            .iter()
            .enumerate()
            .filter(|(_, square)| square.is_some_and(|piece| piece.id() == id))
            .filter_map(|(index, _)| Position::from_index(index));

        let pos = found.next();
        debug_assert!(found.next().is_none(), "piece {id} occupies more than one square");
        pos
    }

    /// 按身份获取棋子
    pub fn piece(&self, id: PieceId) -> Option<Piece> {
        self.locate(id).and_then(|pos| self.get(pos))
    }

    /// 获取指定阵营的所有棋子位置（行优先顺序）
    pub fn pieces(&self, color: Color) -> Vec<(Position, Piece)> {
        self.all_pieces()
            .into_iter()
            .filter(|(_, piece)| piece.color() == color)
            .collect()
    }

    /// 获取所有棋子（行优先顺序）
    pub fn all_pieces(&self) -> Vec<(Position, Piece)> {
        let mut result = Vec::new();
        for row in 0..BOARD_SIZE {
            for col in 0..BOARD_SIZE {
                let pos = Position::new_unchecked(row as u8, col as u8);
                if let Some(piece) = self.get(pos) {
                    result.push((pos, piece));
                }
            }
        }
        result
    }

    /// 统计指定阵营的棋子数
    pub fn count(&self, color: Color) -> u8 {
        self.squares
            .iter()
            .flatten()
            .filter(|piece| piece.color() == color)
            .count() as u8
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::initial()
    }
}
