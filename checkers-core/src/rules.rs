//! 单个棋子的走法规则
//!
//! 所有函数都是纯函数：给定棋子和棋盘，计算合法落点。
//! 落点顺序固定为：后左、后右（可后退时），前左、前右（可前进时），
//! 其中"后"为行号减小，"前"为行号增大，"左"为列号减小。

use tracing::debug;

use crate::board::Board;
use crate::piece::{Piece, PieceId, Position};

/// 后退方向的两个斜向（后左、后右）
const RETREAT_DIRECTIONS: [(i8, i8); 2] = [(-1, -1), (-1, 1)];

/// 前进方向的两个斜向（前左、前右）
const ADVANCE_DIRECTIONS: [(i8, i8); 2] = [(1, -1), (1, 1)];

/// 走法规则
pub struct MoveRules;

impl MoveRules {
    /// 查找棋子所在位置（按身份而非按值），已被吃掉时返回 None
    pub fn locate(piece: &Piece, board: &Board) -> Option<Position> {
        board.locate(piece.id())
    }

    /// 获取棋子的合法落点
    ///
    /// 只要存在吃子落点，就只返回吃子落点（单子层面的强制吃子）。
    pub fn legal_moves(piece: &Piece, board: &Board) -> Vec<Position> {
        let capturing = Self::capturing_moves(piece, board);
        if !capturing.is_empty() {
            return capturing;
        }
        Self::non_capturing_moves(piece, board)
    }

    /// 检查棋子能否吃子
    pub fn can_capture(piece: &Piece, board: &Board) -> bool {
        let Some(from) = Self::locate(piece, board) else {
            return false;
        };

        // 只有吃子才会跨两行
        Self::legal_moves(piece, board)
            .first()
            .is_some_and(|to| to.row.abs_diff(from.row) == 2)
    }

    /// 获取所有吃子落点
    pub fn capturing_moves(piece: &Piece, board: &Board) -> Vec<Position> {
        let Some(from) = Self::locate(piece, board) else {
            return Vec::new();
        };

        Self::directions(piece)
            .filter_map(|(d_row, d_col)| {
                let to = from.offset(2 * d_row, 2 * d_col)?;
                if board.get(to).is_some() {
                    return None;
                }
                let jumped = board.get(from.offset(d_row, d_col)?)?;
                (jumped.color() != piece.color()).then_some(to)
            })
            .collect()
    }

    /// 获取所有普通（不吃子）落点
    pub fn non_capturing_moves(piece: &Piece, board: &Board) -> Vec<Position> {
        let Some(from) = Self::locate(piece, board) else {
            return Vec::new();
        };

        Self::directions(piece)
            .filter_map(|(d_row, d_col)| from.offset(d_row, d_col))
            .filter(|to| board.get(*to).is_none())
            .collect()
    }

    /// 获取吃子时被跳过的格子
    ///
    /// 只对棋盘内、行列都相差 2 的走法有定义，其余返回 None。
    pub fn jumped_square(start: Position, end: Position) -> Option<Position> {
        if !start.is_valid() || !end.is_valid() {
            return None;
        }
        if start.row.abs_diff(end.row) != 2 || start.col.abs_diff(end.col) != 2 {
            return None;
        }
        Position::new((start.row + end.row) / 2, (start.col + end.col) / 2)
    }

    /// 回合结束时的升王检查，返回本次是否升王
    ///
    /// 棋子到达对方底线即升王；已经是王时不做任何事。
    pub fn end_turn(board: &mut Board, id: PieceId) -> bool {
        let Some(pos) = board.locate(id) else {
            return false;
        };
        let Some(piece) = board.get_mut(pos) else {
            return false;
        };

        if piece.is_king() || pos.row != piece.color().king_row() {
            return false;
        }

        piece.promote();
        debug!("棋子 {} 在 {} 升王", id, pos);
        true
    }

    /// 棋子允许的行进方向，按固定顺序排列
    fn directions(piece: &Piece) -> impl Iterator<Item = (i8, i8)> {
        let retreat = piece.can_retreat().then_some(RETREAT_DIRECTIONS);
        let advance = piece.can_advance().then_some(ADVANCE_DIRECTIONS);
        retreat.into_iter().flatten().chain(advance.into_iter().flatten())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::Diagram;
    use crate::piece::Color;

    fn piece_at(board: &Board, row: u8, col: u8) -> Piece {
        board.get(Position::new_unchecked(row, col)).unwrap()
    }

    fn pos(row: u8, col: u8) -> Position {
        Position::new_unchecked(row, col)
    }

    #[test]
    fn test_locate() {
        let board = Board::initial();
        let piece = piece_at(&board, 2, 1);
        assert_eq!(MoveRules::locate(&piece, &board), Some(pos(2, 1)));
    }

    #[test]
    fn test_locate_by_identity_not_value() {
        // 两枚同色未升王的棋子值不同（ID 不同），互不混淆
        let board = Board::initial();
        let a = piece_at(&board, 0, 1);
        let b = piece_at(&board, 0, 3);
        assert_eq!(a.color(), b.color());
        assert_eq!(MoveRules::locate(&b, &board), Some(pos(0, 3)));
    }

    #[test]
    fn test_initial_legal_moves() {
        let mut board = Board::initial();
        let piece = piece_at(&board, 2, 1);
        assert_eq!(MoveRules::legal_moves(&piece, &board), vec![pos(3, 0), pos(3, 2)]);

        board.move_piece(pos(2, 3), pos(4, 1));
        let red = piece_at(&board, 5, 0);
        assert_eq!(MoveRules::legal_moves(&red, &board), vec![pos(3, 2)]);
    }

    #[test]
    fn test_can_capture() {
        let mut board = Board::initial();
        board.move_piece(pos(2, 3), pos(4, 1));

        let red = piece_at(&board, 5, 0);
        assert!(MoveRules::can_capture(&red, &board));

        let black = piece_at(&board, 1, 0);
        assert!(!MoveRules::can_capture(&black, &board));
    }

    #[test]
    fn test_capturing_moves() {
        let mut board = Board::initial();
        board.move_piece(pos(2, 3), pos(4, 1));

        let red = piece_at(&board, 5, 0);
        assert_eq!(MoveRules::capturing_moves(&red, &board), vec![pos(3, 2)]);

        let black = piece_at(&board, 2, 5);
        assert!(MoveRules::capturing_moves(&black, &board).is_empty());
    }

    #[test]
    fn test_non_capturing_moves() {
        let board = Board::initial();
        assert!(MoveRules::non_capturing_moves(&piece_at(&board, 1, 2), &board).is_empty());
        assert_eq!(
            MoveRules::non_capturing_moves(&piece_at(&board, 2, 3), &board),
            vec![pos(3, 2), pos(3, 4)]
        );
        // 边线上的棋子只有一个方向在棋盘内
        assert_eq!(
            MoveRules::non_capturing_moves(&piece_at(&board, 5, 0), &board),
            vec![pos(4, 1)]
        );
        // 被己方堵住
        assert!(MoveRules::non_capturing_moves(&piece_at(&board, 7, 6), &board).is_empty());
    }

    #[test]
    fn test_capture_blocked_by_occupied_landing() {
        let mut board = Board::initial();
        // 红子到 (3,2)，黑子 (2,3) 想跳到 (4,1)
        board.move_piece(pos(5, 0), pos(3, 2));
        let black = piece_at(&board, 2, 3);
        assert_eq!(MoveRules::capturing_moves(&black, &board), vec![pos(4, 1)]);

        // 落点被占后不能吃，退回普通走法
        board.move_piece(pos(5, 2), pos(4, 1));
        assert!(MoveRules::capturing_moves(&black, &board).is_empty());
        assert_eq!(MoveRules::legal_moves(&black, &board), vec![pos(3, 4)]);
    }

    #[test]
    fn test_capture_out_of_bounds() {
        let state = Diagram::parse("8/8/8/8/8/8/1b6/r7 r").unwrap();
        let board = state.board();
        // 红子在 (7,0)，黑子在 (6,1)，跳过去会落到 (5,2)
        let red = piece_at(board, 7, 0);
        assert_eq!(MoveRules::capturing_moves(&red, board), vec![pos(5, 2)]);

        // 黑子在边线 (1,6)，跳过红子 (2,7) 会出界
        let state = Diagram::parse("8/6b1/7r/8/8/8/8/8 b").unwrap();
        let board = state.board();
        let black = piece_at(board, 1, 6);
        assert!(MoveRules::capturing_moves(&black, board).is_empty());
        assert_eq!(MoveRules::legal_moves(&black, board), vec![pos(2, 5)]);
    }

    #[test]
    fn test_no_capture_over_friendly_piece() {
        let state = Diagram::parse("8/8/8/3b4/4b3/8/8/8 b").unwrap();
        let board = state.board();
        let black = piece_at(board, 3, 3);
        assert!(MoveRules::capturing_moves(&black, board).is_empty());
        assert!(!MoveRules::can_capture(&black, board));
    }

    #[test]
    fn test_capture_is_mandatory_per_piece() {
        let state = Diagram::parse("8/8/8/3b4/4r3/8/8/8 b").unwrap();
        let board = state.board();
        let black = piece_at(board, 3, 3);
        assert_eq!(MoveRules::legal_moves(&black, board), vec![pos(5, 5)]);
        assert!(MoveRules::can_capture(&black, board));
    }

    #[test]
    fn test_king_direction_order() {
        // 王四面都有可吃的子
        let state = Diagram::parse("8/8/2r1r3/3B4/2r1r3/8/8/8 b").unwrap();
        let board = state.board();
        let king = piece_at(board, 3, 3);
        assert_eq!(
            MoveRules::capturing_moves(&king, board),
            vec![pos(1, 1), pos(1, 5), pos(5, 1), pos(5, 5)]
        );

        let state = Diagram::parse("8/8/8/3R4/8/8/8/8 r").unwrap();
        let board = state.board();
        let king = piece_at(board, 3, 3);
        assert_eq!(
            MoveRules::non_capturing_moves(&king, board),
            vec![pos(2, 2), pos(2, 4), pos(4, 2), pos(4, 4)]
        );
    }

    #[test]
    fn test_red_man_only_retreats() {
        let state = Diagram::parse("8/8/8/8/3r4/8/8/8 r").unwrap();
        let board = state.board();
        let red = piece_at(board, 4, 3);
        assert_eq!(
            MoveRules::non_capturing_moves(&red, board),
            vec![pos(3, 2), pos(3, 4)]
        );
    }

    #[test]
    fn test_captured_piece_has_no_moves() {
        let mut board = Board::initial();
        let piece = piece_at(&board, 2, 1);
        board.remove(pos(2, 1));
        assert!(MoveRules::legal_moves(&piece, &board).is_empty());
        assert!(!MoveRules::can_capture(&piece, &board));
        assert_eq!(MoveRules::locate(&piece, &board), None);
    }

    #[test]
    fn test_jumped_square() {
        assert_eq!(MoveRules::jumped_square(pos(2, 3), pos(4, 1)), Some(pos(3, 2)));
        assert_eq!(MoveRules::jumped_square(pos(4, 1), pos(2, 3)), Some(pos(3, 2)));
        assert_eq!(MoveRules::jumped_square(pos(2, 3), pos(3, 2)), None);
        assert_eq!(MoveRules::jumped_square(pos(2, 3), pos(4, 3)), None);
        // 棋盘外的位置不做运算
        assert_eq!(MoveRules::jumped_square(pos(200, 0), pos(202, 2)), None);
        assert_eq!(MoveRules::jumped_square(pos(7, 7), pos(9, 9)), None);
    }

    #[test]
    fn test_jumped_square_holds_opponent_for_every_capture() {
        let state = Diagram::parse("8/8/2r1r3/3B4/2r1r3/8/8/8 b").unwrap();
        let board = state.board();
        let king = piece_at(board, 3, 3);
        for to in MoveRules::capturing_moves(&king, board) {
            let jumped = MoveRules::jumped_square(pos(3, 3), to).unwrap();
            assert_eq!(board.get(jumped).map(|p| p.color()), Some(Color::Red));
        }
    }

    #[test]
    fn test_end_turn_promotion() {
        let mut board = Board::initial();
        let black = piece_at(&board, 2, 3);
        board.remove(pos(7, 2));
        board.move_piece(pos(2, 3), pos(7, 2));

        assert!(MoveRules::end_turn(&mut board, black.id()));
        let black = board.piece(black.id()).unwrap();
        assert!(black.is_king());
        assert!(black.can_advance());
        assert!(black.can_retreat());

        // 再次调用不改变任何东西
        assert!(!MoveRules::end_turn(&mut board, black.id()));
        assert_eq!(board.piece(black.id()), Some(black));

        let red = piece_at(&board, 5, 0);
        board.remove(pos(0, 1));
        board.move_piece(pos(5, 0), pos(0, 1));
        assert!(MoveRules::end_turn(&mut board, red.id()));
        let red = board.piece(red.id()).unwrap();
        assert!(red.is_king());
        assert!(red.can_advance());
    }

    #[test]
    fn test_end_turn_no_promotion_elsewhere() {
        let mut board = Board::initial();
        let black = piece_at(&board, 2, 3);
        board.move_piece(pos(2, 3), pos(3, 4));
        assert!(!MoveRules::end_turn(&mut board, black.id()));
        assert!(!board.piece(black.id()).unwrap().is_king());

        // 红子在自己底线不升王
        let red = piece_at(&board, 7, 0);
        assert!(!MoveRules::end_turn(&mut board, red.id()));
    }
}
