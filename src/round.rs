//! Turn controller: alternates half-turns, applies moves and detects the win.
//!
//! A round owns its grid, obstacle registry, players and RNG. Driving it is a
//! synchronous step: [`Round::submit_move`] (or [`Round::play_ai_turn`]) plays
//! the active player's half-turn and returns the resulting [`RoundState`].

use fastrand::Rng;
use tracing::info;

use crate::ai::pursue;
use crate::config::Settings;
use crate::entity::{BonusKind, Direction, ObstacleRegistry, Player, PlayerId};
use crate::error::{Error, Result};
use crate::grid::{Grid, Rect};
use crate::map::{locate_player, parse_map};
use crate::movement::{MoveOutcome, move_player};
use crate::placement::{seed_bonuses, seed_obstacles, spawn_extra_obstacles};

/// Where a round stands.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RoundState {
    InProgress,
    Won(PlayerId),
    Draw,
}

impl RoundState {
    pub fn is_over(self) -> bool {
        !matches!(self, RoundState::InProgress)
    }
}

/// Who controls the second player.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Two humans.
    #[default]
    Versus,
    /// The second player is driven by the pursuit AI.
    Solo,
}

/// Whether two players' footprints overlap. Argument order does not matter.
pub fn check_win(a: &Player, b: &Player) -> bool {
    a.footprint().intersects(&b.footprint())
}

/// How the round's layout is rebuilt on restart.
#[derive(Clone, Debug)]
enum Origin {
    Generated { starts: [(usize, usize); 2] },
    Loaded { grid: Grid, footprints: [Rect; 2] },
}

/// One game between two players.
#[derive(Debug)]
pub struct Round {
    settings: Settings,
    mode: Mode,
    turns: u32,
    origin: Origin,
    grid: Grid,
    registry: ObstacleRegistry,
    players: [Player; 2],
    half_turn: u32,
    ai_turns: u32,
    state: RoundState,
    last_outcome: Option<MoveOutcome>,
    rng: Rng,
}

impl Round {
    /// A generated round with the players in opposite corners of the playable
    /// area.
    pub fn new(settings: Settings, mode: Mode, turns: u32) -> Result<Self> {
        settings.validate()?;
        let playable = Grid::new(settings.grid_height(), settings.grid_width(), settings.border)
            .playable();
        let first = (playable.x, playable.y);
        let second = (playable.right() - 1, playable.bottom() - 1);
        Self::with_starts(settings, mode, turns, first, second)
    }

    /// A generated round with explicit `(x, y)` start cells. Both must lie in
    /// the playable area and differ.
    pub fn with_starts(
        settings: Settings,
        mode: Mode,
        turns: u32,
        first: (usize, usize),
        second: (usize, usize),
    ) -> Result<Self> {
        settings.validate()?;
        let grid = Grid::new(settings.grid_height(), settings.grid_width(), settings.border);
        let playable = grid.playable();
        for (x, y) in [first, second] {
            if !playable.contains(x, y) {
                return Err(Error::OutOfBounds {
                    y,
                    x,
                    height: grid.height(),
                    width: grid.width(),
                });
            }
        }
        if first == second {
            let (x, y) = first;
            return Err(Error::OverlappingStarts { x, y });
        }
        let origin = Origin::Generated {
            starts: [first, second],
        };
        let rng = settings.seed.map_or_else(Rng::new, Rng::with_seed);
        Self::build(settings, mode, turns, origin, rng)
    }

    /// A round played on a prepared grid (for example a loaded map). Obstacles
    /// are registered from the grid and players are found by their cells.
    /// Nothing is generated.
    pub fn from_grid(settings: Settings, mode: Mode, turns: u32, grid: Grid) -> Result<Self> {
        let footprints = [
            locate_player(&grid, PlayerId::First)?,
            locate_player(&grid, PlayerId::Second)?,
        ];
        let rng = settings.seed.map_or_else(Rng::new, Rng::with_seed);
        let origin = Origin::Loaded { grid, footprints };
        Self::build(settings, mode, turns, origin, rng)
    }

    /// Parse a map in the configured tokens and start a round on it.
    pub fn from_map(settings: Settings, mode: Mode, turns: u32, text: &str) -> Result<Self> {
        let grid = parse_map(text, &settings.tokens, settings.border)?;
        Self::from_grid(settings, mode, turns, grid)
    }

    fn build(
        settings: Settings,
        mode: Mode,
        turns: u32,
        origin: Origin,
        mut rng: Rng,
    ) -> Result<Self> {
        let tokens = &settings.tokens;
        let (grid, registry, players) = match &origin {
            Origin::Generated { starts } => {
                let mut grid =
                    Grid::new(settings.grid_height(), settings.grid_width(), settings.border);
                let players = [PlayerId::First, PlayerId::Second].map(|id| {
                    let (x, y) = starts[id.index()];
                    Player::new(id, tokens.player(id), x, y)
                });
                for p in &players {
                    grid.stamp_footprint(p.footprint(), p.cell())?;
                }
                let avoid: Vec<Rect> = players.iter().map(Player::footprint).collect();
                let mut registry = ObstacleRegistry::new();
                seed_obstacles(&mut grid, &mut registry, &avoid, settings.difficulty, &mut rng);
                seed_bonuses(&mut grid, settings.difficulty, &mut rng);
                (grid, registry, players)
            }
            Origin::Loaded { grid, footprints } => {
                let registry = ObstacleRegistry::from_grid(grid);
                let players = [PlayerId::First, PlayerId::Second].map(|id| {
                    let rect = footprints[id.index()];
                    let mut p = Player::new(id, tokens.player(id), rect.x, rect.y);
                    p.width = rect.width;
                    p.height = rect.height;
                    p
                });
                (grid.clone(), registry, players)
            }
        };

        let state = if turns == 0 {
            RoundState::Draw
        } else {
            RoundState::InProgress
        };
        info!(
            ?mode,
            turns,
            height = grid.height(),
            width = grid.width(),
            difficulty = %settings.difficulty,
            obstacles = registry.len(),
            "round started"
        );
        Ok(Self {
            settings,
            mode,
            turns,
            origin,
            grid,
            registry,
            players,
            half_turn: 0,
            ai_turns: 0,
            state,
            last_outcome: None,
            rng,
        })
    }

    /// Discard the grid, registry and players and lay the round out again.
    /// Generated rounds get a fresh random layout; loaded maps start over.
    /// On error the current round is kept.
    pub fn restart(&mut self) -> Result<()> {
        *self = Self::build(
            self.settings.clone(),
            self.mode,
            self.turns,
            self.origin.clone(),
            self.rng.clone(),
        )?;
        Ok(())
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn registry(&self) -> &ObstacleRegistry {
        &self.registry
    }

    pub fn player(&self, id: PlayerId) -> &Player {
        &self.players[id.index()]
    }

    pub fn players(&self) -> &[Player; 2] {
        &self.players
    }

    pub fn state(&self) -> RoundState {
        self.state
    }

    pub fn half_turn(&self) -> u32 {
        self.half_turn
    }

    pub fn max_half_turns(&self) -> u32 {
        self.turns.saturating_mul(2)
    }

    /// Outcome of the most recent half-turn, `None` if nothing was attempted.
    pub fn last_outcome(&self) -> Option<&MoveOutcome> {
        self.last_outcome.as_ref()
    }

    /// The player whose half-turn it is.
    pub fn active_player(&self) -> PlayerId {
        PlayerId::for_half_turn(self.half_turn)
    }

    pub fn is_ai_turn(&self) -> bool {
        self.mode == Mode::Solo && self.active_player() == PlayerId::Second
    }

    /// Play the active player's half-turn with `direction`.
    pub fn submit_move(&mut self, direction: Direction) -> Result<RoundState> {
        self.play_half_turn(Some(direction))
    }

    /// Let the pursuit AI play the second player's half-turn.
    pub fn play_ai_turn(&mut self) -> Result<RoundState> {
        if self.state.is_over() {
            return Err(Error::RoundOver);
        }
        if !self.is_ai_turn() {
            return Err(Error::NotAiTurn(self.active_player()));
        }
        self.ai_turns += 1;
        let direction = pursue(
            self.player(PlayerId::Second),
            self.player(PlayerId::First),
            self.ai_turns,
        );
        self.play_half_turn(direction)
    }

    fn play_half_turn(&mut self, direction: Option<Direction>) -> Result<RoundState> {
        if self.state.is_over() {
            return Err(Error::RoundOver);
        }
        let active = self.active_player();

        self.last_outcome = match direction {
            Some(direction) => {
                let player = &mut self.players[active.index()];
                let outcome = move_player(&mut self.grid, &self.registry, player, direction)?;
                if let MoveOutcome::Moved { collected } = &outcome {
                    let spawns = collected.iter().filter(|&&k| k == BonusKind::Spawn).count();
                    self.spawn_obstacles(spawns);
                }
                Some(outcome)
            }
            None => None,
        };

        if check_win(&self.players[0], &self.players[1]) {
            // Credited by half-turn parity, which is always the active player.
            let winner = PlayerId::for_half_turn(self.half_turn);
            self.state = RoundState::Won(winner);
            info!(
                %winner,
                half_turn = self.half_turn,
                first_score = self.players[0].score,
                second_score = self.players[1].score,
                "round won"
            );
        }
        self.half_turn += 1;
        if !self.state.is_over() && self.half_turn >= self.max_half_turns() {
            self.state = RoundState::Draw;
            info!(half_turns = self.half_turn, "round drawn");
        }
        Ok(self.state)
    }

    fn spawn_obstacles(&mut self, times: usize) {
        let avoid: Vec<Rect> = self.players.iter().map(Player::footprint).collect();
        for _ in 0..times {
            spawn_extra_obstacles(
                &mut self.grid,
                &mut self.registry,
                &avoid,
                self.settings.difficulty,
                &mut self.rng,
            );
        }
    }
}
