//! 规则常量定义

/// 棋盘边长（行数 = 列数）
pub const BOARD_SIZE: usize = 8;

/// 棋盘格子总数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 每方初始棋子数
pub const PIECES_PER_SIDE: u8 = 12;

/// 每方初始占据的行数
pub const STARTING_ROWS: u8 = 3;

/// 黑方（先手）的升王行
pub const BLACK_KING_ROW: u8 = 7;

/// 红方（后手）的升王行
pub const RED_KING_ROW: u8 = 0;
