//! Round settings and the option set.
//!
//! Settings are an explicit value handed to a round when it starts. Options
//! are addressed through the closed [`OptionKind`] enum; each update is
//! validated and a rejected update leaves the previous value in place.

use std::fmt;

use crate::constants::*;
use crate::entity::{BonusKind, Direction, PlayerId};
use crate::error::ConfigError;
use crate::grid::Cell;

/// Difficulty tier, selecting placement regions and counts.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Difficulty {
    #[default]
    Easy,
    Hard,
}

impl Difficulty {
    /// Numeric level as shown in the options (easy = 1, hard = 2).
    pub fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Hard => 2,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "1" | "easy" => Some(Difficulty::Easy),
            "2" | "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Obstacle clusters seeded at round start.
    pub fn cluster_count(self) -> usize {
        match self {
            Difficulty::Easy => EASY_CLUSTERS,
            Difficulty::Hard => HARD_CLUSTERS,
        }
    }

    /// Longest random walk of a cluster.
    pub fn max_walk(self) -> usize {
        match self {
            Difficulty::Easy => EASY_MAX_WALK,
            Difficulty::Hard => HARD_MAX_WALK,
        }
    }

    /// Bonuses seeded at round start.
    pub fn bonus_count(self) -> usize {
        match self {
            Difficulty::Easy => EASY_BONUSES,
            Difficulty::Hard => HARD_BONUSES,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.level())
    }
}

/// Characters used to render and parse cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tokens {
    pub empty: char,
    pub obstacle: char,
    pub border: char,
    pub first: char,
    pub second: char,
    pub bonus_grow: char,
    pub bonus_score: char,
    pub bonus_spawn: char,
}

impl Default for Tokens {
    fn default() -> Self {
        Self {
            empty: TOKEN_EMPTY,
            obstacle: TOKEN_OBSTACLE,
            border: TOKEN_BORDER,
            first: TOKEN_FIRST,
            second: TOKEN_SECOND,
            bonus_grow: TOKEN_BONUS_GROW,
            bonus_score: TOKEN_BONUS_SCORE,
            bonus_spawn: TOKEN_BONUS_SPAWN,
        }
    }
}

impl Tokens {
    pub fn char_of(&self, cell: Cell) -> char {
        match cell {
            Cell::Empty => self.empty,
            Cell::Obstacle => self.obstacle,
            Cell::Border => self.border,
            Cell::Bonus(BonusKind::Grow) => self.bonus_grow,
            Cell::Bonus(BonusKind::Score) => self.bonus_score,
            Cell::Bonus(BonusKind::Spawn) => self.bonus_spawn,
            Cell::Player(PlayerId::First) => self.first,
            Cell::Player(PlayerId::Second) => self.second,
        }
    }

    pub fn player(&self, id: PlayerId) -> char {
        self.char_of(Cell::Player(id))
    }

    /// Decode a character. `on_border_ring` decides between border and
    /// obstacle when both share a character.
    pub fn cell_of(&self, ch: char, on_border_ring: bool) -> Option<Cell> {
        if on_border_ring && ch == self.border {
            return Some(Cell::Border);
        }
        let cell = if ch == self.empty {
            Cell::Empty
        } else if ch == self.obstacle {
            Cell::Obstacle
        } else if ch == self.first {
            Cell::Player(PlayerId::First)
        } else if ch == self.second {
            Cell::Player(PlayerId::Second)
        } else if ch == self.bonus_grow {
            Cell::Bonus(BonusKind::Grow)
        } else if ch == self.bonus_score {
            Cell::Bonus(BonusKind::Score)
        } else if ch == self.bonus_spawn {
            Cell::Bonus(BonusKind::Spawn)
        } else if ch == self.border {
            Cell::Border
        } else {
            return None;
        };
        Some(cell)
    }
}

/// A decoded key press.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    Move(Direction),
    Quit,
    Restart,
}

/// Movement and control key bindings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyBindings {
    pub up: char,
    pub left: char,
    pub down: char,
    pub right: char,
    pub quit: char,
    pub restart: char,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            up: KEY_UP,
            left: KEY_LEFT,
            down: KEY_DOWN,
            right: KEY_RIGHT,
            quit: KEY_QUIT,
            restart: KEY_RESTART,
        }
    }
}

impl KeyBindings {
    /// Decode a raw key, ignoring case.
    pub fn decode(&self, key: char) -> Option<KeyCommand> {
        let key = key.to_ascii_lowercase();
        let bound = |c: char| c.to_ascii_lowercase() == key;
        if bound(self.up) {
            Some(KeyCommand::Move(Direction::Up))
        } else if bound(self.left) {
            Some(KeyCommand::Move(Direction::Left))
        } else if bound(self.down) {
            Some(KeyCommand::Move(Direction::Down))
        } else if bound(self.right) {
            Some(KeyCommand::Move(Direction::Right))
        } else if bound(self.quit) {
            Some(KeyCommand::Quit)
        } else if bound(self.restart) {
            Some(KeyCommand::Restart)
        } else {
            None
        }
    }

    pub fn key_for(&self, direction: Direction) -> char {
        match direction {
            Direction::Up => self.up,
            Direction::Left => self.left,
            Direction::Down => self.down,
            Direction::Right => self.right,
        }
    }
}

/// Everything a round needs to know, fixed when the round starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Playable width; the border ring is added around it.
    pub width: usize,
    /// Playable height.
    pub height: usize,
    pub difficulty: Difficulty,
    pub border: bool,
    pub keys: KeyBindings,
    pub tokens: Tokens,
    pub show_rules: bool,
    pub show_history: bool,
    /// Seed for placement; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            difficulty: Difficulty::Easy,
            border: true,
            keys: KeyBindings::default(),
            tokens: Tokens::default(),
            show_rules: true,
            show_history: true,
            seed: None,
        }
    }
}

/// Every configurable option.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OptionKind {
    Width,
    Height,
    Difficulty,
    Border,
    KeyUp,
    KeyLeft,
    KeyDown,
    KeyRight,
    KeyQuit,
    KeyRestart,
    TokenEmpty,
    TokenObstacle,
    TokenBorder,
    TokenFirst,
    TokenSecond,
    TokenBonusGrow,
    TokenBonusScore,
    TokenBonusSpawn,
    ShowRules,
    ShowHistory,
}

impl OptionKind {
    pub const ALL: [OptionKind; 20] = [
        OptionKind::Width,
        OptionKind::Height,
        OptionKind::Difficulty,
        OptionKind::Border,
        OptionKind::KeyUp,
        OptionKind::KeyLeft,
        OptionKind::KeyDown,
        OptionKind::KeyRight,
        OptionKind::KeyQuit,
        OptionKind::KeyRestart,
        OptionKind::TokenEmpty,
        OptionKind::TokenObstacle,
        OptionKind::TokenBorder,
        OptionKind::TokenFirst,
        OptionKind::TokenSecond,
        OptionKind::TokenBonusGrow,
        OptionKind::TokenBonusScore,
        OptionKind::TokenBonusSpawn,
        OptionKind::ShowRules,
        OptionKind::ShowHistory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            OptionKind::Width => "width",
            OptionKind::Height => "height",
            OptionKind::Difficulty => "difficulty",
            OptionKind::Border => "border",
            OptionKind::KeyUp => "key_up",
            OptionKind::KeyLeft => "key_left",
            OptionKind::KeyDown => "key_down",
            OptionKind::KeyRight => "key_right",
            OptionKind::KeyQuit => "key_quit",
            OptionKind::KeyRestart => "key_restart",
            OptionKind::TokenEmpty => "token_empty",
            OptionKind::TokenObstacle => "token_obstacle",
            OptionKind::TokenBorder => "token_border",
            OptionKind::TokenFirst => "token_first",
            OptionKind::TokenSecond => "token_second",
            OptionKind::TokenBonusGrow => "token_bonus_grow",
            OptionKind::TokenBonusScore => "token_bonus_score",
            OptionKind::TokenBonusSpawn => "token_bonus_spawn",
            OptionKind::ShowRules => "show_rules",
            OptionKind::ShowHistory => "show_history",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    fn is_key(self) -> bool {
        matches!(
            self,
            OptionKind::KeyUp
                | OptionKind::KeyLeft
                | OptionKind::KeyDown
                | OptionKind::KeyRight
                | OptionKind::KeyQuit
                | OptionKind::KeyRestart
        )
    }

    fn is_token(self) -> bool {
        matches!(
            self,
            OptionKind::TokenEmpty
                | OptionKind::TokenObstacle
                | OptionKind::TokenBorder
                | OptionKind::TokenFirst
                | OptionKind::TokenSecond
                | OptionKind::TokenBonusGrow
                | OptionKind::TokenBonusScore
                | OptionKind::TokenBonusSpawn
        )
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn parse_side(option: &'static str, value: &str) -> Result<usize, ConfigError> {
    match value.trim().parse::<usize>() {
        Ok(n) if (MIN_SIDE..=MAX_SIDE).contains(&n) => Ok(n),
        _ => Err(ConfigError::InvalidNumber {
            option,
            value: value.to_string(),
            min: MIN_SIDE,
            max: MAX_SIDE,
        }),
    }
}

fn parse_char(option: &'static str, value: &str) -> Result<char, ConfigError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if !c.is_whitespace() && !c.is_control() => Ok(c),
        _ => Err(ConfigError::InvalidChar {
            option,
            value: value.to_string(),
        }),
    }
}

fn parse_bool(option: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "y" | "yes" | "on" => Ok(true),
        "0" | "false" | "n" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidBool {
            option,
            value: value.to_string(),
        }),
    }
}

impl Settings {
    /// Current value of an option, formatted the way [`Settings::apply`] accepts it.
    pub fn value(&self, kind: OptionKind) -> String {
        match kind {
            OptionKind::Width => self.width.to_string(),
            OptionKind::Height => self.height.to_string(),
            OptionKind::Difficulty => self.difficulty.to_string(),
            OptionKind::Border => self.border.to_string(),
            OptionKind::ShowRules => self.show_rules.to_string(),
            OptionKind::ShowHistory => self.show_history.to_string(),
            other => self.char_option(other).map(String::from).unwrap_or_default(),
        }
    }

    fn char_option(&self, kind: OptionKind) -> Option<char> {
        let c = match kind {
            OptionKind::KeyUp => self.keys.up,
            OptionKind::KeyLeft => self.keys.left,
            OptionKind::KeyDown => self.keys.down,
            OptionKind::KeyRight => self.keys.right,
            OptionKind::KeyQuit => self.keys.quit,
            OptionKind::KeyRestart => self.keys.restart,
            OptionKind::TokenEmpty => self.tokens.empty,
            OptionKind::TokenObstacle => self.tokens.obstacle,
            OptionKind::TokenBorder => self.tokens.border,
            OptionKind::TokenFirst => self.tokens.first,
            OptionKind::TokenSecond => self.tokens.second,
            OptionKind::TokenBonusGrow => self.tokens.bonus_grow,
            OptionKind::TokenBonusScore => self.tokens.bonus_score,
            OptionKind::TokenBonusSpawn => self.tokens.bonus_spawn,
            _ => return None,
        };
        Some(c)
    }

    fn char_option_mut(&mut self, kind: OptionKind) -> Option<&mut char> {
        let slot = match kind {
            OptionKind::KeyUp => &mut self.keys.up,
            OptionKind::KeyLeft => &mut self.keys.left,
            OptionKind::KeyDown => &mut self.keys.down,
            OptionKind::KeyRight => &mut self.keys.right,
            OptionKind::KeyQuit => &mut self.keys.quit,
            OptionKind::KeyRestart => &mut self.keys.restart,
            OptionKind::TokenEmpty => &mut self.tokens.empty,
            OptionKind::TokenObstacle => &mut self.tokens.obstacle,
            OptionKind::TokenBorder => &mut self.tokens.border,
            OptionKind::TokenFirst => &mut self.tokens.first,
            OptionKind::TokenSecond => &mut self.tokens.second,
            OptionKind::TokenBonusGrow => &mut self.tokens.bonus_grow,
            OptionKind::TokenBonusScore => &mut self.tokens.bonus_score,
            OptionKind::TokenBonusSpawn => &mut self.tokens.bonus_spawn,
            _ => return None,
        };
        Some(slot)
    }

    /// Reject a character already used by another option of the same family.
    /// Obstacle and border tokens are allowed to share a character.
    fn check_conflict(&self, kind: OptionKind, ch: char) -> Result<(), ConfigError> {
        let shared = |a: OptionKind, b: OptionKind| {
            matches!(
                (a, b),
                (OptionKind::TokenObstacle, OptionKind::TokenBorder)
                    | (OptionKind::TokenBorder, OptionKind::TokenObstacle)
            )
        };
        for other in OptionKind::ALL {
            if other == kind || shared(kind, other) {
                continue;
            }
            let same_family =
                (kind.is_key() && other.is_key()) || (kind.is_token() && other.is_token());
            if !same_family {
                continue;
            }
            let taken = match self.char_option(other) {
                Some(c) if kind.is_key() => c.eq_ignore_ascii_case(&ch),
                Some(c) => c == ch,
                None => false,
            };
            if taken {
                return Err(ConfigError::Conflict {
                    option: kind.name(),
                    ch,
                    other: other.name(),
                });
            }
        }
        Ok(())
    }

    /// Validate and apply one option. On error nothing changes.
    pub fn apply(&mut self, kind: OptionKind, value: &str) -> Result<(), ConfigError> {
        let name = kind.name();
        match kind {
            OptionKind::Width => self.width = parse_side(name, value)?,
            OptionKind::Height => self.height = parse_side(name, value)?,
            OptionKind::Difficulty => {
                self.difficulty = Difficulty::parse(value)
                    .ok_or_else(|| ConfigError::InvalidDifficulty(value.to_string()))?;
            }
            OptionKind::Border => self.border = parse_bool(name, value)?,
            OptionKind::ShowRules => self.show_rules = parse_bool(name, value)?,
            OptionKind::ShowHistory => self.show_history = parse_bool(name, value)?,
            _ => {
                let ch = parse_char(name, value)?;
                self.check_conflict(kind, ch)?;
                if let Some(slot) = self.char_option_mut(kind) {
                    *slot = ch;
                }
            }
        }
        Ok(())
    }

    pub fn set_by_name(&mut self, name: &str, value: &str) -> Result<(), ConfigError> {
        let kind =
            OptionKind::from_name(name).ok_or_else(|| ConfigError::UnknownOption(name.to_string()))?;
        self.apply(kind, value)
    }

    pub fn set_by_index(&mut self, index: usize, value: &str) -> Result<(), ConfigError> {
        let kind = OptionKind::from_index(index).ok_or(ConfigError::UnknownIndex(index))?;
        self.apply(kind, value)
    }

    /// `(index, name, value)` for every option, in menu order.
    pub fn entries(&self) -> Vec<(usize, &'static str, String)> {
        OptionKind::ALL
            .iter()
            .enumerate()
            .map(|(i, &k)| (i, k.name(), self.value(k)))
            .collect()
    }

    /// Check the playable size, which callers may have set directly on the
    /// public fields.
    pub fn validate(&self) -> Result<(), ConfigError> {
        parse_side(OptionKind::Width.name(), &self.width.to_string())?;
        parse_side(OptionKind::Height.name(), &self.height.to_string())?;
        Ok(())
    }

    /// Full grid height including the border ring.
    pub fn grid_height(&self) -> usize {
        self.height + if self.border { 2 } else { 0 }
    }

    /// Full grid width including the border ring.
    pub fn grid_width(&self) -> usize {
        self.width + if self.border { 2 } else { 0 }
    }
}
