//! 棋子定义

use serde::{Deserialize, Serialize};

use crate::constants::{BLACK_KING_ROW, BOARD_SIZE, RED_KING_ROW};

/// 阵营
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    /// 黑方（先手，在上方 0-2 行，向行号增大的方向前进）
    Black,
    /// 红方（后手，在下方 5-7 行，向行号减小的方向前进）
    Red,
}

impl Color {
    /// 先手方
    pub const FIRST: Color = Color::Black;

    /// 获取对方阵营
    pub fn opponent(&self) -> Color {
        match self {
            Color::Black => Color::Red,
            Color::Red => Color::Black,
        }
    }

    /// 升王行（离己方底线最远的一行）
    pub fn king_row(&self) -> u8 {
        match self {
            Color::Black => BLACK_KING_ROW,
            Color::Red => RED_KING_ROW,
        }
    }

    /// 获取棋盘文本字符
    pub fn to_diagram_char(&self) -> char {
        match self {
            Color::Black => 'b',
            Color::Red => 'r',
        }
    }

    /// 从棋盘文本字符解析
    pub fn from_diagram_char(c: char) -> Option<Color> {
        match c {
            'b' | 'B' => Some(Color::Black),
            'r' | 'R' => Some(Color::Red),
            _ => None,
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Color::Black => write!(f, "Black"),
            Color::Red => write!(f, "Red"),
        }
    }
}

/// 棋子身份标识
///
/// 建盘时按行优先顺序分配，棋子被吃掉之前始终唯一。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PieceId(pub u8);

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    id: PieceId,
    color: Color,
    is_king: bool,
    can_advance: bool,
    can_retreat: bool,
}

impl Piece {
    /// 创建新棋子（未升王，只能朝一个方向走）
    pub fn new(id: PieceId, color: Color) -> Self {
        Self {
            id,
            color,
            is_king: false,
            can_advance: color == Color::Black,
            can_retreat: color == Color::Red,
        }
    }

    /// 创建王棋
    pub fn king(id: PieceId, color: Color) -> Self {
        let mut piece = Self::new(id, color);
        piece.promote();
        piece
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn is_king(&self) -> bool {
        self.is_king
    }

    /// 能否朝行号增大的方向走
    pub fn can_advance(&self) -> bool {
        self.can_advance
    }

    /// 能否朝行号减小的方向走
    pub fn can_retreat(&self) -> bool {
        self.can_retreat
    }

    /// 升王：获得另一个方向的行动能力，不可逆
    pub fn promote(&mut self) {
        self.is_king = true;
        self.can_advance = true;
        self.can_retreat = true;
    }

    /// 获取棋盘文本字符（黑 b/B，红 r/R，大写为王）
    pub fn to_diagram_char(&self) -> char {
        let c = self.color.to_diagram_char();
        if self.is_king {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }
}

/// 棋盘位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    /// 行 (0-7)，0 为黑方底线
    pub row: u8,
    /// 列 (0-7)
    pub col: u8,
}

impl Position {
    /// 创建新位置
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if (row as usize) < BOARD_SIZE && (col as usize) < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// 创建新位置（不检查边界，内部使用）
    pub const fn new_unchecked(row: u8, col: u8) -> Self {
        Self { row, col }
    }

    /// 检查位置是否在棋盘内
    pub fn is_valid(&self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }

    /// 是否为深色格（行列奇偶不同，只有深色格会放棋子）
    pub fn is_dark(&self) -> bool {
        (self.row + self.col) % 2 == 1
    }

    /// 获取偏移后的位置
    pub fn offset(&self, d_row: i8, d_col: i8) -> Option<Position> {
        let new_row = self.row as i8 + d_row;
        let new_col = self.col as i8 + d_col;
        if new_row >= 0
            && (new_row as usize) < BOARD_SIZE
            && new_col >= 0
            && (new_col as usize) < BOARD_SIZE
        {
            Some(Position {
                row: new_row as u8,
                col: new_col as u8,
            })
        } else {
            None
        }
    }

    /// 转换为数组索引
    pub fn to_index(&self) -> usize {
        self.row as usize * BOARD_SIZE + self.col as usize
    }

    /// 从数组索引转换
    pub fn from_index(index: usize) -> Option<Self> {
        if index < BOARD_SIZE * BOARD_SIZE {
            Some(Position {
                row: (index / BOARD_SIZE) as u8,
                col: (index % BOARD_SIZE) as u8,
            })
        } else {
            None
        }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
