//! 随机走子玩家

use checkers_core::{
    Color, GameState, MoveReport, Piece, Position, Result, RulesError, TurnController,
};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// 电脑玩家配置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiConfig {
    /// 电脑执哪一方
    pub color: Color,
    /// 随机数种子，None 时从系统熵源取
    pub seed: Option<u64>,
}

impl AiConfig {
    pub fn new(color: Color) -> Self {
        Self { color, seed: None }
    }

    /// 使用固定种子，保证对局可复现
    pub fn seeded(color: Color, seed: u64) -> Self {
        Self {
            color,
            seed: Some(seed),
        }
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self::new(Color::Red)
    }
}

/// 随机走子玩家
pub struct RandomPlayer {
    config: AiConfig,
    rng: ChaCha8Rng,
}

impl RandomPlayer {
    pub fn new(config: AiConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    pub fn color(&self) -> Color {
        self.config.color
    }

    /// 选择要走的棋子：连跳中为连跳棋子，否则在可走棋子中随机选择
    pub fn select_piece(&mut self, state: &GameState) -> Option<Piece> {
        if let Some(chain) = state.chain_piece() {
            return state.board().piece(chain);
        }
        state.valid_actors().choose(&mut self.rng).copied()
    }

    /// 在棋子的合法落点中随机选择
    pub fn choose_destination(&mut self, state: &GameState, piece: &Piece) -> Option<Position> {
        state.legal_moves(piece.id()).choose(&mut self.rng).copied()
    }

    /// 走完电脑的一整个回合（包括连跳），返回每一步的结果
    pub fn take_turn(&mut self, controller: &mut TurnController) -> Result<Vec<MoveReport>> {
        let state = controller.state();
        if state.is_over() {
            return Err(RulesError::GameOver);
        }
        if state.current_player() != self.config.color {
            return Err(RulesError::NotYourTurn {
                current: state.current_player(),
            });
        }

        debug!("电脑 ({}) 开始走棋", self.config.color);

        let mut reports = Vec::new();
        loop {
            let state = controller.state();
            let piece = self.select_piece(state).ok_or(RulesError::NoSelection)?;
            let from = state
                .board()
                .locate(piece.id())
                .ok_or(RulesError::PieceNotFound { id: piece.id() })?;
            let to = self
                .choose_destination(state, &piece)
                .ok_or(RulesError::PieceCannotMove { id: piece.id() })?;

            controller.select(from)?;
            let report = controller.move_to(to)?;
            debug!("电脑走子: 棋子 {} 从 {} 到 {}", report.piece, report.from, report.to);
            reports.push(report);

            if !report.chain_continues || report.game_over {
                break;
            }
        }

        Ok(reports)
    }
}
