//! 终端对局
//!
//! 从任意 `BufRead` 读入命令、向任意 `Write` 输出棋盘，玩家每走完一个回合，
//! 电脑立即走完自己的回合。

use std::io::{BufRead, Write};

use anyhow::Result;
use checkers_ai::RandomPlayer;
use checkers_core::{
    ClickOutcome, GameOutcome, GameState, MoveReport, Position, TurnController, WinReason,
    BOARD_SIZE,
};
use thiserror::Error;
use tracing::{debug, info};

use crate::settings::CliSettings;

/// 帮助文本
pub const HELP_TEXT: &str = "\
命令:
  <行> <列>   点击格子（也可写作 行,列），先选子再选落点
  board       重新显示棋盘
  help        显示本帮助
  quit        退出";

/// 终端命令
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Click(Position),
    Board,
    Help,
    Quit,
}

/// 命令解析错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Square out of bounds: ({row}, {col})")]
    OutOfBounds { row: u8, col: u8 },
}

impl Command {
    /// 解析一行输入
    pub fn parse(line: &str) -> std::result::Result<Self, CommandError> {
        let line = line.trim();
        match line.to_ascii_lowercase().as_str() {
            "" => return Err(CommandError::Empty),
            "board" => return Ok(Command::Board),
            "help" | "?" => return Ok(Command::Help),
            "quit" | "exit" | "q" => return Ok(Command::Quit),
            _ => {}
        }

        let parts: Vec<&str> = line
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|part| !part.is_empty())
            .collect();
        let unknown = || CommandError::Unknown(line.to_string());

        let [row, col] = parts.as_slice() else {
            return Err(unknown());
        };
        let (Ok(row), Ok(col)) = (row.parse::<u8>(), col.parse::<u8>()) else {
            return Err(unknown());
        };

        Position::new(row, col)
            .map(Command::Click)
            .ok_or(CommandError::OutOfBounds { row, col })
    }
}

/// 把棋盘画成文本
///
/// 每格两个字符：棋子字符（`b`/`B`/`r`/`R`），深色空格为 `.`，浅色格为空白；
/// 高亮的空格画成 `*`，高亮的棋子后面跟一个 `*`。
pub fn render_board(state: &GameState, highlights: &[Position]) -> String {
    let header: Vec<String> = (0..BOARD_SIZE).map(|col| col.to_string()).collect();
    let mut out = format!("   {}\n", header.join(" "));

    for row in 0..BOARD_SIZE as u8 {
        out.push_str(&format!("{row}  "));
        for col in 0..BOARD_SIZE as u8 {
            let pos = Position::new_unchecked(row, col);
            let highlighted = highlights.contains(&pos);
            let cell = match state.piece_at(pos) {
                Some(piece) => [piece.to_diagram_char(), if highlighted { '*' } else { ' ' }],
                None if highlighted => ['*', ' '],
                None if pos.is_dark() => ['.', ' '],
                None => [' ', ' '],
            };
            out.extend(cell);
        }
        out.truncate(out.trim_end().len());
        out.push('\n');
    }

    match state.outcome() {
        Some(outcome) => out.push_str(&describe_outcome(outcome)),
        None => out.push_str(&format!(
            "轮到 {} 走棋  Black: {}  Red: {}",
            state.current_player(),
            state.black_count(),
            state.red_count()
        )),
    }
    out
}

/// 描述一步走子
pub fn describe_move(report: &MoveReport) -> String {
    let mut text = format!("棋子 {} 从 {} 走到 {}", report.piece, report.from, report.to);
    if let Some(captured) = report.captured {
        text.push_str(&format!("，吃掉 {captured}"));
    }
    if report.promoted {
        text.push_str("，升王");
    }
    text
}

/// 描述对局结果
pub fn describe_outcome(outcome: GameOutcome) -> String {
    let reason = match outcome.reason {
        WinReason::NoPiecesLeft => "对方棋子被吃光",
        WinReason::NoLegalMoves => "对方无子可动",
    };
    format!("游戏结束: {} 胜（{}）", outcome.winner, reason)
}

fn format_positions(positions: &[Position]) -> String {
    positions
        .iter()
        .map(|pos| pos.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// 终端对局：一名玩家对电脑
pub struct Shell {
    settings: CliSettings,
    controller: TurnController,
    ai: RandomPlayer,
}

impl Shell {
    /// 以初始局面开始
    pub fn new(settings: CliSettings) -> Self {
        Self::with_controller(settings, TurnController::new())
    }

    /// 从指定局面开始
    pub fn with_controller(settings: CliSettings, controller: TurnController) -> Self {
        let ai = RandomPlayer::new(settings.ai_config());
        Self {
            settings,
            controller,
            ai,
        }
    }

    pub fn controller(&self) -> &TurnController {
        &self.controller
    }

    pub fn settings(&self) -> &CliSettings {
        &self.settings
    }

    /// 运行命令循环，直到终局、`quit` 或输入结束，返回对局结果
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        output: &mut W,
    ) -> Result<Option<GameOutcome>> {
        writeln!(
            output,
            "英式跳棋: 你执 {}，电脑执 {}。输入 help 查看命令。",
            self.settings.human_color,
            self.ai.color()
        )?;

        self.play_ai_turn(output)?;
        self.print_board(output)?;

        let mut lines = input.lines();
        while !self.controller.state().is_over() {
            write!(output, "> ")?;
            output.flush()?;

            let Some(line) = lines.next() else {
                debug!("输入结束");
                break;
            };
            let line = line?;

            match Command::parse(&line) {
                Ok(Command::Click(pos)) => self.handle_click(pos, output)?,
                Ok(Command::Board) => self.print_board(output)?,
                Ok(Command::Help) => writeln!(output, "{HELP_TEXT}")?,
                Ok(Command::Quit) => {
                    info!("玩家退出对局");
                    break;
                }
                Err(CommandError::Empty) => {}
                Err(e) => writeln!(output, "{e}")?,
            }
        }

        let outcome = self.controller.state().outcome();
        if let Some(outcome) = outcome {
            if outcome.winner == self.settings.human_color {
                writeln!(output, "你赢了！")?;
            } else {
                writeln!(output, "电脑赢了。")?;
            }
        }
        Ok(outcome)
    }

    fn handle_click<W: Write>(&mut self, pos: Position, output: &mut W) -> Result<()> {
        match self.controller.click(pos) {
            Ok(ClickOutcome::Selected(destinations)) => {
                writeln!(
                    output,
                    "已选中 {}，可走: {}",
                    pos,
                    format_positions(&destinations)
                )?;
                if self.settings.show_move_hints {
                    self.print_board(output)?;
                }
            }
            Ok(ClickOutcome::Moved(report)) => {
                writeln!(output, "你: {}", describe_move(&report))?;
                if report.chain_continues && !report.game_over {
                    writeln!(output, "必须用同一枚棋子继续吃子")?;
                } else {
                    self.play_ai_turn(output)?;
                }
                self.print_board(output)?;
            }
            Err(e) => writeln!(output, "{e}")?,
        }
        Ok(())
    }

    /// 轮到电脑时走完电脑的整个回合
    fn play_ai_turn<W: Write>(&mut self, output: &mut W) -> Result<()> {
        let state = self.controller.state();
        if state.is_over() || state.current_player() != self.ai.color() {
            return Ok(());
        }

        for report in self.ai.take_turn(&mut self.controller)? {
            writeln!(output, "电脑: {}", describe_move(&report))?;
        }
        Ok(())
    }

    fn print_board<W: Write>(&self, output: &mut W) -> Result<()> {
        let highlights = if self.settings.show_move_hints {
            self.controller.highlighted_squares()
        } else {
            Vec::new()
        };
        writeln!(output, "{}", render_board(self.controller.state(), &highlights))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use checkers_core::{Color, Diagram};
    use std::io::Cursor;

    fn pos(row: u8, col: u8) -> Position {
        Position::new_unchecked(row, col)
    }

    fn seeded(human_color: Color) -> CliSettings {
        CliSettings {
            human_color,
            ai_seed: Some(17),
            ..Default::default()
        }
    }

    fn run_script(shell: &mut Shell, script: &str) -> (Option<GameOutcome>, String) {
        let mut output = Vec::new();
        let outcome = shell.run(Cursor::new(script), &mut output).unwrap();
        (outcome, String::from_utf8(output).unwrap())
    }

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("2 1"), Ok(Command::Click(pos(2, 1))));
        assert_eq!(Command::parse(" 2,1 "), Ok(Command::Click(pos(2, 1))));
        assert_eq!(Command::parse("2, 1"), Ok(Command::Click(pos(2, 1))));
        assert_eq!(Command::parse("BOARD"), Ok(Command::Board));
        assert_eq!(Command::parse("help"), Ok(Command::Help));
        assert_eq!(Command::parse("quit"), Ok(Command::Quit));
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("8 0"),
            Err(CommandError::OutOfBounds { row: 8, col: 0 })
        );
        assert_eq!(
            Command::parse("move"),
            Err(CommandError::Unknown("move".to_string()))
        );
        assert_eq!(
            Command::parse("1 2 3"),
            Err(CommandError::Unknown("1 2 3".to_string()))
        );
    }

    #[test]
    fn test_render_initial_board() {
        let state = GameState::new();
        let text = render_board(&state, &[]);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "   0 1 2 3 4 5 6 7");
        assert_eq!(lines[1], "0    b   b   b   b");
        assert_eq!(lines[4], "3  .   .   .   .");
        assert_eq!(lines[8], "7  r   r   r   r");
        assert_eq!(lines[9], "轮到 Black 走棋  Black: 12  Red: 12");
    }

    #[test]
    fn test_render_highlights() {
        let state = GameState::new();
        let text = render_board(&state, &[pos(2, 1), pos(3, 0)]);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[3], "2    b*  b   b   b");
        assert_eq!(lines[4], "3  *   .   .   .");
    }

    #[test]
    fn test_describe_move() {
        let report = MoveReport {
            piece: checkers_core::PieceId(3),
            from: pos(5, 2),
            to: pos(7, 4),
            captured: Some(pos(6, 3)),
            promoted: true,
            chain_continues: false,
            game_over: false,
        };
        assert_eq!(
            describe_move(&report),
            "棋子 #3 从 (5, 2) 走到 (7, 4)，吃掉 (6, 3)，升王"
        );
    }

    #[test]
    fn test_human_move_then_ai_reply() {
        let mut shell = Shell::new(seeded(Color::Black));
        let (outcome, output) = run_script(&mut shell, "2 1\n3 2\nquit\n");

        assert_eq!(outcome, None);
        assert!(output.contains("已选中 (2, 1)，可走: (3, 0) (3, 2)"));
        assert!(output.contains("你: 棋子 #8 从 (2, 1) 走到 (3, 2)"));
        assert!(output.contains("电脑: "));

        let state = shell.controller().state();
        assert_eq!(state.current_player(), Color::Black);
        assert_eq!(state.black_count(), 12);
    }

    #[test]
    fn test_ai_moves_first_when_human_is_red() {
        let mut shell = Shell::new(seeded(Color::Red));
        let (_, output) = run_script(&mut shell, "");

        assert!(output.contains("电脑: "));
        assert_eq!(shell.controller().state().current_player(), Color::Red);
    }

    #[test]
    fn test_bad_input_is_reported() {
        let mut shell = Shell::new(seeded(Color::Black));
        let (_, output) = run_script(&mut shell, "hello\n9 9\n0 0\n\nhelp\n");

        assert!(output.contains("Unknown command: hello"));
        assert!(output.contains("Square out of bounds: (9, 9)"));
        assert!(output.contains("Square (0, 0) cannot be selected"));
        assert!(output.contains("board       重新显示棋盘"));
        assert_eq!(shell.controller().state(), &GameState::new());
    }

    #[test]
    fn test_human_wins() {
        let state = Diagram::parse("8/8/8/3b4/4r3/8/8/8 b").unwrap();
        let mut shell = Shell::with_controller(seeded(Color::Black), TurnController::from_state(state));
        let (outcome, output) = run_script(&mut shell, "3 3\n5 5\n");

        let outcome = outcome.unwrap();
        assert_eq!(outcome.winner, Color::Black);
        assert!(output.contains("游戏结束: Black 胜（对方棋子被吃光）"));
        assert!(output.contains("你赢了！"));
    }

    #[test]
    fn test_chain_capture_prompt() {
        let state = Diagram::parse("7b/b7/1r6/8/3r4/8/8/8 b").unwrap();
        let mut shell = Shell::with_controller(seeded(Color::Black), TurnController::from_state(state));
        let (outcome, output) = run_script(&mut shell, "1 0\n3 2\n5 4\n");

        assert!(output.contains("必须用同一枚棋子继续吃子"));
        assert!(!output.contains("电脑: "));
        assert_eq!(outcome.map(|o| o.winner), Some(Color::Black));
    }
}
