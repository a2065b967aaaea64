//! 英式跳棋电脑玩家
//!
//! 随机走子：在全盘可走棋子中随机选一枚，再在其合法落点中随机选一个；
//! 连跳时继续用同一枚棋子，直到回合结束。

mod random;

pub use random::{AiConfig, RandomPlayer};
