//! 对局状态机
//!
//! 负责回合归属、全盘强制吃子、走子落地、吃子移除、升王、
//! 连跳判定以及终局判定。所有命令先完成校验再修改棋盘，
//! 校验失败时状态保持不变。

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::board::Board;
use crate::constants::PIECES_PER_SIDE;
use crate::error::{Result, RulesError};
use crate::piece::{Color, Piece, PieceId, Position};
use crate::rules::MoveRules;

/// 胜利原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WinReason {
    /// 对方棋子被吃光
    NoPiecesLeft,
    /// 对方无子可动
    NoLegalMoves,
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameOutcome {
    pub winner: Color,
    pub reason: WinReason,
}

/// 一步走子的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub piece: PieceId,
    pub from: Position,
    pub to: Position,
    /// 被吃棋子所在格（如果有）
    pub captured: Option<Position>,
    /// 本步是否升王
    pub promoted: bool,
    /// 是否需要同一棋子继续连跳（回合未交换）
    pub chain_continues: bool,
    pub game_over: bool,
}

/// 两步吃子协议中已经落子、等待结算的跳跃
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct PendingJump {
    piece: PieceId,
    landing: Position,
    jumped: Position,
}

/// 对局状态
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    board: Board,
    current_player: Color,
    red_count: u8,
    black_count: u8,
    /// 正在连跳的棋子
    chain_piece: Option<PieceId>,
    /// 最近一次 relocate 构成的合法跳跃
    pending_jump: Option<PendingJump>,
    outcome: Option<GameOutcome>,
}

impl GameState {
    /// 创建初始状态（黑方先走）
    pub fn new() -> Self {
        Self {
            board: Board::initial(),
            current_player: Color::FIRST,
            red_count: PIECES_PER_SIDE,
            black_count: PIECES_PER_SIDE,
            chain_piece: None,
            pending_jump: None,
            outcome: None,
        }
    }

    /// 从任意棋盘创建状态，棋子数从棋盘统计
    ///
    /// 若走子方已无子可走，状态直接处于终局。
    pub fn from_board(board: Board, current_player: Color) -> Self {
        let mut state = Self {
            red_count: board.count(Color::Red),
            black_count: board.count(Color::Black),
            board,
            current_player,
            chain_piece: None,
            pending_jump: None,
            outcome: None,
        };
        state.outcome = state.evaluate_outcome();
        state
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// 获取指定位置的棋子
    pub fn piece_at(&self, pos: Position) -> Option<Piece> {
        self.board.get(pos)
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    pub fn red_count(&self) -> u8 {
        self.red_count
    }

    pub fn black_count(&self) -> u8 {
        self.black_count
    }

    /// 获取指定阵营剩余棋子数
    pub fn count(&self, color: Color) -> u8 {
        match color {
            Color::Red => self.red_count,
            Color::Black => self.black_count,
        }
    }

    /// 正在连跳、必须继续吃子的棋子
    pub fn chain_piece(&self) -> Option<PieceId> {
        self.chain_piece
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// 获取指定棋子的合法落点，棋子不在棋盘上时为空
    pub fn legal_moves(&self, id: PieceId) -> Vec<Position> {
        self.board
            .piece(id)
            .map(|piece| MoveRules::legal_moves(&piece, &self.board))
            .unwrap_or_default()
    }

    /// 当前走子方可以走的棋子（行优先顺序）
    ///
    /// 只要有任何棋子能吃子，就只返回能吃子的棋子（全盘强制吃子）；
    /// 返回空表示走子方无子可动。
    pub fn valid_actors(&self) -> Vec<Piece> {
        self.actors().into_iter().map(|(_, piece)| piece).collect()
    }

    /// 与 [`GameState::valid_actors`] 相同的规则，返回棋子所在位置
    pub fn valid_actor_squares(&self) -> Vec<Position> {
        self.actors().into_iter().map(|(pos, _)| pos).collect()
    }

    fn actors(&self) -> Vec<(Position, Piece)> {
        let mut capturing = Vec::new();
        let mut movable = Vec::new();

        for (pos, piece) in self.board.pieces(self.current_player) {
            if MoveRules::can_capture(&piece, &self.board) {
                capturing.push((pos, piece));
            } else if !MoveRules::legal_moves(&piece, &self.board).is_empty() {
                movable.push((pos, piece));
            }
        }

        if capturing.is_empty() {
            movable
        } else {
            capturing
        }
    }

    /// 移动棋子到目标格（只改棋盘，不改棋子数和回合）
    ///
    /// 若这一步正好是走子方可走棋子的合法跳跃，记下被跳格，
    /// 供随后的 [`GameState::apply_capturing_move`] 结算。
    pub fn relocate(&mut self, to: Position, id: PieceId) -> Result<()> {
        if !to.is_valid() {
            return Err(RulesError::IllegalDestination {
                row: to.row,
                col: to.col,
            });
        }
        let from = self.locate(id)?;
        if from != to && self.board.get(to).is_some() {
            return Err(RulesError::SquareOccupied {
                row: to.row,
                col: to.col,
            });
        }

        let pending = self
            .check_actor(id)
            .ok()
            .filter(|(_, piece)| MoveRules::capturing_moves(piece, &self.board).contains(&to))
            .and_then(|_| MoveRules::jumped_square(from, to))
            .map(|jumped| PendingJump {
                piece: id,
                landing: to,
                jumped,
            });

        self.board.move_piece(from, to);
        self.pending_jump = pending;
        Ok(())
    }

    /// 普通走子：移动、升王检查、交换回合
    ///
    /// 返回新的走子方是否已无子可动（游戏结束）。
    pub fn apply_non_capturing_move(&mut self, to: Position, id: PieceId) -> Result<bool> {
        self.step(id, to).map(|report| report.game_over)
    }

    /// 两步吃子协议的第二步：棋子已通过 [`GameState::relocate`] 落在跳后位置，
    /// 在此移除被跳棋子、升王检查，并决定连跳或交换回合
    ///
    /// 只接受最近一次 relocate 记下的跳跃：同一棋子、仍在落点、被跳格一致。
    ///
    /// 返回游戏是否结束。
    pub fn apply_capturing_move(&mut self, id: PieceId, jumped: Position) -> Result<bool> {
        if self.is_over() {
            return Err(RulesError::GameOver);
        }
        let pos = self.locate(id)?;
        let piece = self.board.get(pos).ok_or(RulesError::PieceNotFound { id })?;
        self.check_turn(&piece)?;

        let recorded = self.pending_jump.is_some_and(|pending| {
            pending.piece == id && pending.landing == pos && pending.jumped == jumped
        });
        if !recorded {
            return Err(RulesError::InvalidJump {
                row: jumped.row,
                col: jumped.col,
            });
        }

        let (promoted, chain_continues) = self.resolve_capture(id, jumped);
        debug!(
            "{} 棋子 {} 吃掉 {} 的棋子{}{}",
            piece.color(),
            id,
            jumped,
            if promoted { "，升王" } else { "" },
            if chain_continues { "，继续连跳" } else { "" }
        );
        Ok(self.is_over())
    }

    /// 原子吃子：校验、落子、移除被跳棋子、升王、连跳/交换回合一次完成
    ///
    /// 返回游戏是否结束。
    pub fn apply_capture(&mut self, id: PieceId, to: Position) -> Result<bool> {
        self.capture(id, to).map(|report| report.game_over)
    }

    /// 走子统一入口：按跨度分派为普通走子或吃子
    pub fn play(&mut self, id: PieceId, to: Position) -> Result<MoveReport> {
        let from = self.locate(id)?;
        if from.row.abs_diff(to.row) == 2 {
            self.capture(id, to)
        } else {
            self.step(id, to)
        }
    }

    fn step(&mut self, id: PieceId, to: Position) -> Result<MoveReport> {
        let (from, piece) = self.check_actor(id)?;
        if self.chain_piece.is_some() {
            return Err(RulesError::ChainCaptureRequired { id });
        }

        let legal = MoveRules::legal_moves(&piece, &self.board);
        if from.row.abs_diff(to.row) != 1 || !legal.contains(&to) {
            return Err(RulesError::IllegalDestination {
                row: to.row,
                col: to.col,
            });
        }

        self.pending_jump = None;
        self.board.move_piece(from, to);
        let promoted = MoveRules::end_turn(&mut self.board, id);
        debug!("{} 棋子 {} 从 {} 走到 {}", piece.color(), id, from, to);
        self.pass_turn();

        Ok(MoveReport {
            piece: id,
            from,
            to,
            captured: None,
            promoted,
            chain_continues: false,
            game_over: self.is_over(),
        })
    }

    fn capture(&mut self, id: PieceId, to: Position) -> Result<MoveReport> {
        let (from, piece) = self.check_actor(id)?;

        let illegal = RulesError::IllegalDestination {
            row: to.row,
            col: to.col,
        };
        let jumped = MoveRules::jumped_square(from, to).ok_or(illegal.clone())?;
        if !MoveRules::capturing_moves(&piece, &self.board).contains(&to) {
            return Err(illegal);
        }

        self.board.move_piece(from, to);
        let (promoted, chain_continues) = self.resolve_capture(id, jumped);
        debug!(
            "{} 棋子 {} 从 {} 跳到 {}，吃掉 {} 的棋子",
            piece.color(),
            id,
            from,
            to,
            jumped
        );

        Ok(MoveReport {
            piece: id,
            from,
            to,
            captured: Some(jumped),
            promoted,
            chain_continues,
            game_over: self.is_over(),
        })
    }

    /// 吃子结算（棋子已落在跳后位置），返回 (是否升王, 是否继续连跳)
    fn resolve_capture(&mut self, id: PieceId, jumped: Position) -> (bool, bool) {
        self.pending_jump = None;
        let promoted = MoveRules::end_turn(&mut self.board, id);

        if let Some(captured) = self.board.remove(jumped) {
            match captured.color() {
                Color::Red => self.red_count = self.red_count.saturating_sub(1),
                Color::Black => self.black_count = self.black_count.saturating_sub(1),
            }
        }

        let chain_continues = self
            .board
            .piece(id)
            .is_some_and(|piece| MoveRules::can_capture(&piece, &self.board));

        if chain_continues {
            self.chain_piece = Some(id);
            self.outcome = self.evaluate_outcome();
            if let Some(outcome) = self.outcome {
                info!("游戏结束: {} 胜 ({:?})", outcome.winner, outcome.reason);
            }
        } else {
            self.pass_turn();
        }

        (promoted, chain_continues)
    }

    /// 交换走子方并判定终局
    fn pass_turn(&mut self) {
        self.chain_piece = None;
        self.current_player = self.current_player.opponent();
        self.outcome = self.evaluate_outcome();

        match self.outcome {
            Some(outcome) => info!("游戏结束: {} 胜 ({:?})", outcome.winner, outcome.reason),
            None => debug!("轮到 {} 走棋", self.current_player),
        }
    }

    /// 终局判定：先看棋子数是否归零，再看走子方是否无子可动
    fn evaluate_outcome(&self) -> Option<GameOutcome> {
        if self.black_count == 0 {
            return Some(GameOutcome {
                winner: Color::Red,
                reason: WinReason::NoPiecesLeft,
            });
        }
        if self.red_count == 0 {
            return Some(GameOutcome {
                winner: Color::Black,
                reason: WinReason::NoPiecesLeft,
            });
        }
        if self.actors().is_empty() {
            return Some(GameOutcome {
                winner: self.current_player.opponent(),
                reason: WinReason::NoLegalMoves,
            });
        }
        None
    }

    fn locate(&self, id: PieceId) -> Result<Position> {
        self.board.locate(id).ok_or(RulesError::PieceNotFound { id })
    }

    fn check_turn(&self, piece: &Piece) -> Result<()> {
        if piece.color() != self.current_player {
            return Err(RulesError::NotYourTurn {
                current: self.current_player,
            });
        }
        match self.chain_piece {
            Some(chain) if chain != piece.id() => Err(RulesError::ChainCaptureRequired { id: chain }),
            _ => Ok(()),
        }
    }

    /// 走子前的统一校验：未终局、棋子在盘、轮到该方、属于可走棋子
    fn check_actor(&self, id: PieceId) -> Result<(Position, Piece)> {
        if self.is_over() {
            return Err(RulesError::GameOver);
        }
        let from = self.locate(id)?;
        let piece = self.board.get(from).ok_or(RulesError::PieceNotFound { id })?;
        self.check_turn(&piece)?;

        if !self.actors().iter().any(|(_, actor)| actor.id() == id) {
            return Err(RulesError::PieceCannotMove { id });
        }
        Ok((from, piece))
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}
