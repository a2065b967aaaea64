//! 回合控制器
//!
//! 持有一局对局状态和"选子 -> 落子"的阶段，供界面层和电脑玩家驱动。
//! 控制器本身不轮询也不循环，每次调用完成一次状态转换。

use serde::{Deserialize, Serialize};

use crate::error::{Result, RulesError};
use crate::game::{GameOutcome, GameState, MoveReport};
use crate::piece::{PieceId, Position};

/// 回合阶段
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// 等待选子
    AwaitingSelection,
    /// 已选中棋子，等待选择落点
    PieceSelected {
        piece: PieceId,
        from: Position,
        destinations: Vec<Position>,
    },
    /// 游戏结束
    GameOver(GameOutcome),
}

/// 一次点击的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClickOutcome {
    /// 选中了棋子，附带其合法落点
    Selected(Vec<Position>),
    /// 走了一步
    Moved(MoveReport),
}

/// 回合控制器
#[derive(Debug, Clone)]
pub struct TurnController {
    state: GameState,
    phase: TurnPhase,
}

impl TurnController {
    /// 以初始局面开始新对局
    pub fn new() -> Self {
        Self::from_state(GameState::new())
    }

    /// 从已有状态开始
    pub fn from_state(state: GameState) -> Self {
        let phase = match state.outcome() {
            Some(outcome) => TurnPhase::GameOver(outcome),
            None => TurnPhase::AwaitingSelection,
        };
        Self { state, phase }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> &TurnPhase {
        &self.phase
    }

    pub fn into_state(self) -> GameState {
        self.state
    }

    /// 当前选中的棋子
    pub fn selected(&self) -> Option<PieceId> {
        match &self.phase {
            TurnPhase::PieceSelected { piece, .. } => Some(*piece),
            _ => None,
        }
    }

    /// 当前选中棋子的合法落点
    pub fn destinations(&self) -> &[Position] {
        match &self.phase {
            TurnPhase::PieceSelected { destinations, .. } => destinations,
            _ => &[],
        }
    }

    /// 需要高亮的格子：等待选子时为可走棋子，选中后为合法落点
    pub fn highlighted_squares(&self) -> Vec<Position> {
        match &self.phase {
            TurnPhase::AwaitingSelection => match self.state.chain_piece() {
                Some(chain) => self.state.board().locate(chain).into_iter().collect(),
                None => self.state.valid_actor_squares(),
            },
            TurnPhase::PieceSelected { destinations, .. } => destinations.clone(),
            TurnPhase::GameOver(_) => Vec::new(),
        }
    }

    /// 选中指定格子上的棋子，返回其合法落点
    pub fn select(&mut self, pos: Position) -> Result<&[Position]> {
        if self.state.is_over() {
            return Err(RulesError::GameOver);
        }

        let piece = self
            .state
            .piece_at(pos)
            .filter(|piece| {
                self.state
                    .valid_actors()
                    .iter()
                    .any(|actor| actor.id() == piece.id())
            })
            .ok_or(RulesError::NotSelectable {
                row: pos.row,
                col: pos.col,
            })?;

        if let Some(chain) = self.state.chain_piece() {
            if chain != piece.id() {
                return Err(RulesError::ChainCaptureRequired { id: chain });
            }
        }

        self.phase = TurnPhase::PieceSelected {
            piece: piece.id(),
            from: pos,
            destinations: self.state.legal_moves(piece.id()),
        };
        Ok(self.destinations())
    }

    /// 取消选择（连跳中取消后仍只能重新选中连跳棋子）
    pub fn clear_selection(&mut self) {
        if let TurnPhase::PieceSelected { .. } = self.phase {
            self.phase = TurnPhase::AwaitingSelection;
        }
    }

    /// 将选中的棋子走到目标格
    ///
    /// 连跳未完成时保持选中同一棋子；回合结束回到等待选子；终局进入 GameOver。
    pub fn move_to(&mut self, to: Position) -> Result<MoveReport> {
        let piece = match &self.phase {
            TurnPhase::PieceSelected {
                piece,
                destinations,
                ..
            } => {
                if !destinations.contains(&to) {
                    return Err(RulesError::IllegalDestination {
                        row: to.row,
                        col: to.col,
                    });
                }
                *piece
            }
            TurnPhase::GameOver(_) => return Err(RulesError::GameOver),
            TurnPhase::AwaitingSelection => return Err(RulesError::NoSelection),
        };

        let report = self.state.play(piece, to)?;

        self.phase = if let Some(outcome) = self.state.outcome() {
            TurnPhase::GameOver(outcome)
        } else if report.chain_continues {
            TurnPhase::PieceSelected {
                piece,
                from: to,
                destinations: self.state.legal_moves(piece),
            }
        } else {
            TurnPhase::AwaitingSelection
        };

        Ok(report)
    }

    /// 点击一个格子：点到可走棋子则选中，点到选中棋子的落点则走子
    ///
    /// 其他点击返回错误，阶段保持不变。
    pub fn click(&mut self, pos: Position) -> Result<ClickOutcome> {
        if self.state.is_over() {
            return Err(RulesError::GameOver);
        }

        if self.is_selectable(pos) {
            let destinations = self.select(pos)?.to_vec();
            return Ok(ClickOutcome::Selected(destinations));
        }

        match self.phase {
            TurnPhase::PieceSelected { .. } => self.move_to(pos).map(ClickOutcome::Moved),
            _ => Err(RulesError::NotSelectable {
                row: pos.row,
                col: pos.col,
            }),
        }
    }

    fn is_selectable(&self, pos: Position) -> bool {
        let Some(piece) = self.state.piece_at(pos) else {
            return false;
        };
        if self.state.chain_piece().is_some_and(|chain| chain != piece.id()) {
            return false;
        }
        self.state
            .valid_actors()
            .iter()
            .any(|actor| actor.id() == piece.id())
    }
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}
