//! Line-oriented front end for a round.
//!
//! Each input line is either a single key (decoded through the configured
//! [`KeyBindings`](crate::config::KeyBindings)) or a named command. Replies
//! are framed like a text protocol: `= message` on success, `? message` on
//! failure, followed by a blank line.
//!
//! ## Commands
//!
//! - `<key>` - move, quit or restart, depending on the key bindings
//! - `show` - print the grid, scores and whose turn it is
//! - `history` - print every player's accepted moves
//! - `options` - list options as `index name = value`
//! - `set <name|index> <value>` - change an option, applied on restart
//! - `restart` - start a new round with the current options
//! - `quit` - leave the session
//!
//! ## Example
//!
//! ```ignore
//! use catchme_rust::config::Settings;
//! use catchme_rust::round::Mode;
//! use catchme_rust::session::Session;
//! let mut session = Session::new(Settings::default(), Mode::Solo, 20)?;
//! session.run(std::io::stdin().lock(), std::io::stdout())?;
//! ```

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::config::{KeyBindings, KeyCommand, Settings};
use crate::entity::{Direction, PlayerId};
use crate::error::Result;
use crate::movement::MoveOutcome;
use crate::round::{Mode, Round, RoundState};

const RULES: &str = "\
Catch me if you can: step onto the other player to win.
Moving into an obstacle costs 8 points and wastes the turn.
Bonuses: grow (pass through obstacles), score, spawn (more obstacles).";

/// One line naming the bound key for every direction.
fn key_help(keys: &KeyBindings) -> String {
    let moves: Vec<String> = Direction::ALL
        .iter()
        .map(|&d| format!("{} {}", keys.key_for(d), d.as_str().to_lowercase()))
        .collect();
    format!(
        "Keys: {}, {} quit, {} restart.",
        moves.join(", "),
        keys.quit,
        keys.restart
    )
}

/// An interactive session over one round at a time.
pub struct Session {
    round: Round,
    /// Options edited with `set`; they take effect on the next restart.
    pending: Settings,
    turns: u32,
    /// Map text the round was loaded from, reused on restart.
    map: Option<String>,
    finished: bool,
}

impl Session {
    /// A session over freshly generated rounds.
    pub fn new(settings: Settings, mode: Mode, turns: u32) -> Result<Self> {
        Ok(Self {
            round: Round::new(settings.clone(), mode, turns)?,
            pending: settings,
            turns,
            map: None,
            finished: false,
        })
    }

    /// A session whose rounds start from the given map text.
    pub fn from_map(settings: Settings, mode: Mode, turns: u32, map: &str) -> Result<Self> {
        let round = Round::from_map(settings.clone(), mode, turns, map)?;
        Ok(Self {
            round,
            pending: settings,
            turns,
            map: Some(map.to_string()),
            finished: false,
        })
    }

    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Whether `quit` (or the quit key) was entered.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Run the command loop until `quit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        let settings = self.round.settings();
        if settings.show_rules {
            writeln!(output, "{RULES}\n{}\n", key_help(&settings.keys))?;
        }
        writeln!(output, "{}", self.status())?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (success, message) = self.execute(line);
            let prefix = if success { '=' } else { '?' };
            writeln!(output, "{prefix} {message}\n")?;
            output.flush()?;

            if self.finished {
                break;
            }
        }
        Ok(())
    }

    /// Execute one input line and return (success, response).
    pub fn execute(&mut self, line: &str) -> (bool, String) {
        let mut parts = line.split_whitespace();
        let Some(command) = parts.next() else {
            return (false, "empty command".to_string());
        };
        let args: Vec<&str> = parts.collect();
        debug!(command, ?args, "session command");

        let mut chars = command.chars();
        if let (Some(key), None) = (chars.next(), chars.next()) {
            return self.press(key);
        }

        match command.to_lowercase().as_str() {
            "show" => (true, self.status()),

            "history" => (true, self.history()),

            "options" => {
                let lines: Vec<String> = self
                    .pending
                    .entries()
                    .into_iter()
                    .map(|(i, name, value)| format!("{i:>2} {name} = {value}"))
                    .collect();
                (true, lines.join("\n"))
            }

            "set" => {
                if args.len() != 2 {
                    return (false, "usage: set <name|index> <value>".to_string());
                }
                let (name, value) = (args[0], args[1]);
                let result = match name.parse::<usize>() {
                    Ok(index) => self.pending.set_by_index(index, value),
                    Err(_) => self.pending.set_by_name(name, value),
                };
                match result {
                    Ok(()) => (true, format!("{name} = {value} (applies on restart)")),
                    Err(e) => (false, e.to_string()),
                }
            }

            "restart" => self.restart(),

            "quit" => {
                self.finished = true;
                (true, "bye".to_string())
            }

            other => (false, format!("unknown command: {other}")),
        }
    }

    fn press(&mut self, key: char) -> (bool, String) {
        match self.round.settings().keys.decode(key) {
            Some(KeyCommand::Move(direction)) => self.play(direction),
            Some(KeyCommand::Restart) => self.restart(),
            Some(KeyCommand::Quit) => {
                self.finished = true;
                (true, "bye".to_string())
            }
            None => (false, format!("unbound key: {key}")),
        }
    }

    fn play(&mut self, direction: Direction) -> (bool, String) {
        let mover = self.round.active_player();
        if let Err(e) = self.round.submit_move(direction) {
            return (false, e.to_string());
        }
        let mut notes = vec![describe(mover, direction, self.round.last_outcome())];

        if self.round.is_ai_turn() && !self.round.state().is_over() {
            match self.round.play_ai_turn() {
                Ok(_) => match self.round.last_outcome() {
                    Some(outcome) => {
                        let ai = self.round.active_player().other();
                        let step = self.round.player(ai).history.last().copied();
                        notes.push(match step {
                            Some(d) if outcome.is_applied() => describe(ai, d, Some(outcome)),
                            _ => format!("{ai}: {}", outcome_text(outcome)),
                        });
                    }
                    None => notes.push("AI waits".to_string()),
                },
                Err(e) => return (false, e.to_string()),
            }
        }

        notes.push(self.status());
        (true, notes.join("\n"))
    }

    fn restart(&mut self) -> (bool, String) {
        let result = if self.pending == *self.round.settings() {
            self.round.restart()
        } else {
            let settings = self.pending.clone();
            let mode = self.round.mode();
            let round = match &self.map {
                Some(map) => Round::from_map(settings, mode, self.turns, map),
                None => Round::new(settings, mode, self.turns),
            };
            round.map(|round| self.round = round)
        };
        match result {
            Ok(()) => (true, self.status()),
            Err(e) => (false, e.to_string()),
        }
    }

    fn history(&self) -> String {
        self.round
            .players()
            .iter()
            .map(|p| format!("{} ({}): {}", p.id, p.token, p.history_string()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The grid followed by scores and the round state.
    fn status(&self) -> String {
        let round = &self.round;
        let mut out = round.grid().render(&round.settings().tokens);
        for p in round.players() {
            out.push_str(&format!("{} ({}): {} points\n", p.id, p.token, p.score));
        }
        match round.state() {
            RoundState::InProgress => out.push_str(&format!(
                "turn {}/{}, {} to move",
                round.half_turn() / 2 + 1,
                round.max_half_turns() / 2,
                round.active_player()
            )),
            RoundState::Won(winner) => out.push_str(&format!("{winner} wins")),
            RoundState::Draw => out.push_str("draw"),
        }
        if round.state().is_over() && round.settings().show_history {
            out.push('\n');
            out.push_str(&self.history());
        }
        out
    }
}

fn outcome_text(outcome: &MoveOutcome) -> &'static str {
    match outcome {
        MoveOutcome::Moved { .. } => "moved",
        MoveOutcome::Blocked => "blocked by an obstacle",
        MoveOutcome::AtBorder => "stopped at the border",
    }
}

fn describe(mover: PlayerId, direction: Direction, outcome: Option<&MoveOutcome>) -> String {
    match outcome {
        Some(MoveOutcome::Moved { collected }) if !collected.is_empty() => {
            let kinds: Vec<String> = collected.iter().map(|k| format!("{k:?}")).collect();
            format!("{mover}: {direction}, collected {}", kinds.join(", "))
        }
        Some(outcome) => format!("{mover}: {direction} {}", outcome_text(outcome)),
        None => format!("{mover}: waits"),
    }
}
