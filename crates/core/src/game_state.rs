//! Game state module - the game loop controller
//!
//! This module ties together the playfield, shape table, piece selection,
//! operation queue and line-clear engine. It owns the active piece lifecycle:
//! spawn, move/rotate/fall, land, clear, spawn next, and the terminal
//! game-over condition.
//!
//! Input never touches the piece directly. `request_move` and
//! `request_rotate` only enqueue; `request_tick` advances the fall timer and
//! then drains the queue one operation at a time. A downward step that is
//! blocked enqueues `Stop`, so whatever else was queued for that piece is
//! discarded before it lands.

use std::time::Duration;

use serde::Serialize;

use crate::config::GameConfig;
use crate::error::{ConfigError, CoreError};
use crate::events::{EventBus, EventSink, GameEvent, SubscriptionId};
use crate::line_clear::{clear_full_rows, LineClear};
use crate::pieces::{Piece, ShapeTable};
use crate::playfield::Playfield;
use crate::rng::PieceQueue;
use crate::scheduler::{Enqueued, OperationQueue};
use crate::scoring::level_for_lines;
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Coord, Direction, Operation};
use crate::validator::{landing_origin, validate, validate_spawn, Verdict};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GameStatus {
    NotStarted,
    Running,
    Paused,
    GameOver,
}

/// Lifecycle of the active piece
///
/// Once landed the piece is consumed: its cells belong to the playfield and
/// there is no active piece until the next spawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PiecePhase {
    /// Freshly spawned, no operation applied yet
    Spawned,
    Active,
    /// Landing has begun; no further transform is applied
    Landing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ActivePiece {
    piece: Piece,
    phase: PiecePhase,
}

impl ActivePiece {
    /// One-shot latch, true only on the first call
    fn begin_landing(&mut self) -> bool {
        if self.phase == PiecePhase::Landing {
            return false;
        }
        self.phase = PiecePhase::Landing;
        true
    }

    /// Whether transforms may still be applied; promotes `Spawned` to `Active`
    fn accept_transform(&mut self) -> bool {
        match self.phase {
            PiecePhase::Landing => false,
            PiecePhase::Spawned | PiecePhase::Active => {
                self.phase = PiecePhase::Active;
                true
            }
        }
    }
}

/// Outcome of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    GameOver { score: u32 },
}

/// Complete game state
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    playfield: Playfield,
    shapes: ShapeTable,
    pieces: PieceQueue,
    ops: OperationQueue,
    active: Option<ActivePiece>,
    fall_interval: Duration,
    /// Time since the last automatic step
    fall_timer: Duration,
    score: u32,
    level: u32,
    lines: u32,
    /// Serial handed to the next spawned piece (the first piece is #1)
    next_piece_id: u32,
    status: GameStatus,
    /// Re-entrancy guards for `spawn_next`
    spawning: bool,
    clearing: bool,
    events: EventBus,
}

impl Game {
    /// Build a game from a validated configuration; call [`Game::start`] to play
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let shapes = config.shapes.clone();
        let pieces = PieceQueue::new(config.selection.clone(), shapes.kinds());
        let playfield = Playfield::new(config.width, config.height);
        let fall_interval = config.fall_interval();

        Ok(Self {
            config,
            playfield,
            shapes,
            pieces,
            ops: OperationQueue::new(),
            active: None,
            fall_interval,
            fall_timer: Duration::ZERO,
            score: 0,
            level: 0,
            lines: 0,
            next_piece_id: 1,
            status: GameStatus::NotStarted,
            spawning: false,
            clearing: false,
            events: EventBus::new(),
        })
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) -> bool {
        if self.status != GameStatus::NotStarted {
            return false;
        }
        self.status = GameStatus::Running;
        log::debug!(
            "game started on a {}x{} playfield",
            self.playfield.width(),
            self.playfield.height()
        );
        self.events.emit(GameEvent::GameStarted);
        self.spawn_next();
        true
    }

    /// Spawn the next piece at the spawn origin
    ///
    /// A no-op returning false while a spawn or clear is in flight, while a
    /// piece is still active, or when the game is not running. A spawn
    /// placement that is not free ends the game.
    pub fn spawn_next(&mut self) -> bool {
        if self.spawning
            || self.clearing
            || self.active.is_some()
            || self.status != GameStatus::Running
        {
            return false;
        }

        self.spawning = true;
        let spawned = self.spawn_piece();
        self.spawning = false;
        spawned
    }

    fn spawn_piece(&mut self) -> bool {
        let Some(kind) = self.pieces.draw() else {
            log::error!("piece selection has no kinds to draw from");
            return false;
        };
        let Some(shape) = self.shapes.get(kind) else {
            log::error!("piece selection produced {kind}, which has no shape");
            return false;
        };
        let color = self.pieces.draw_color(self.config.palette_size);
        let piece = Piece::new(self.next_piece_id, shape, color, self.config.spawn);
        self.next_piece_id = self.next_piece_id.wrapping_add(1);

        let verdict = validate_spawn(&piece, &self.playfield);
        if !verdict.is_allowed() {
            log::debug!(
                "spawn of piece #{} ({kind}) blocked: {verdict:?}",
                piece.id
            );
            self.end_game();
            return false;
        }

        let origin = piece.origin;
        log::debug!("spawned piece #{} ({kind}) at {origin}", piece.id);
        self.active = Some(ActivePiece {
            piece,
            phase: PiecePhase::Spawned,
        });
        self.fall_timer = Duration::ZERO;
        self.events.emit(GameEvent::PieceSpawned { kind, origin });
        true
    }

    /// Commit a landed piece into the playfield
    ///
    /// A cell at or above the kill line ends the game and nothing is committed.
    /// Otherwise every cell is occupied, full rows are cleared and compacted,
    /// and the next piece is spawned. Cells under the falling piece count as
    /// occupied.
    pub fn commit_landing(&mut self, piece: &Piece) -> Result<(), CoreError> {
        if self.status == GameStatus::GameOver {
            return Ok(());
        }

        let cells = piece.cells();
        if let Some(cell) = cells.iter().find(|c| c.y >= self.config.kill_line) {
            log::debug!("piece #{} crossed the kill line at {cell}", piece.id);
            self.end_game();
            return Ok(());
        }

        // Check every target first so a conflict leaves the playfield untouched.
        let falling = self.active.as_ref().map(|a| (a.piece.cells(), a.piece.occupant()));
        for &coord in &cells {
            if let Some((footprint, existing)) = &falling {
                if footprint.contains(&coord) {
                    return Err(CoreError::OccupancyConflict {
                        coord,
                        existing: *existing,
                    });
                }
            }
            match self.playfield.get(coord) {
                None => return Err(CoreError::OutOfBounds { coord }),
                Some(Some(existing)) => {
                    return Err(CoreError::OccupancyConflict { coord, existing })
                }
                Some(None) => {}
            }
        }
        let occupant = piece.occupant();
        for &coord in &cells {
            self.playfield.occupy(coord, occupant)?;
        }

        log::debug!(
            "landed piece #{} ({}) at {}",
            piece.id,
            piece.kind,
            piece.origin
        );
        self.events.emit(GameEvent::PieceLanded {
            cells: cells.to_vec(),
        });

        self.clearing = true;
        let cleared = clear_full_rows(&mut self.playfield);
        self.clearing = false;
        if let Some(clear) = cleared? {
            self.apply_clear(clear);
        }

        self.spawn_next();
        Ok(())
    }

    fn apply_clear(&mut self, clear: LineClear) {
        let rows = clear.cleared_count();
        self.lines = self.lines.saturating_add(rows as u32);
        let level = level_for_lines(self.lines);
        let level_changed = level != self.level;
        self.level = level;

        let delta = self.config.scoring.award(rows, self.level);
        self.score = self.score.saturating_add(delta);

        self.events.emit(GameEvent::RowsCleared {
            rows: clear.rows,
            cells: clear.cells,
        });
        if delta > 0 {
            self.events.emit(GameEvent::ScoreChanged {
                score: self.score,
                delta,
            });
        }
        if level_changed {
            self.events.emit(GameEvent::LevelChanged { level });
        }
    }

    fn end_game(&mut self) {
        self.status = GameStatus::GameOver;
        self.active = None;
        self.ops.clear();
        self.fall_timer = Duration::ZERO;
        log::debug!("game over, score {}", self.score);
        self.events.emit(GameEvent::GameOver { score: self.score });
    }

    /// Queue a one-cell move; false if it was dropped or collapsed
    pub fn request_move(&mut self, direction: Direction) -> bool {
        self.request(Operation::Move(direction))
    }

    /// Queue a clockwise quarter turn; false if it was dropped or collapsed
    pub fn request_rotate(&mut self) -> bool {
        self.request(Operation::Rotate)
    }

    fn request(&mut self, op: Operation) -> bool {
        if self.status != GameStatus::Running || self.active.is_none() {
            return false;
        }
        let outcome = self.ops.enqueue(op);
        log::trace!("enqueue {op:?}: {outcome:?}");
        outcome == Enqueued::Added
    }

    /// Advance the fall timer by `elapsed`, then process queued operations
    ///
    /// The timer fires at most once per tick and restarts from zero when it
    /// does. Paused and not-yet-started games ignore ticks.
    pub fn request_tick(&mut self, elapsed: Duration) -> Result<Progress, CoreError> {
        match self.status {
            GameStatus::Running => {}
            GameStatus::GameOver => return Ok(Progress::GameOver { score: self.score }),
            GameStatus::NotStarted | GameStatus::Paused => return Ok(Progress::Continue),
        }

        if self.active.is_none() {
            self.spawn_next();
        }

        if self.active.is_some() {
            self.fall_timer += elapsed;
            if self.fall_timer >= self.fall_interval {
                self.fall_timer = Duration::ZERO;
                self.ops.enqueue(Operation::AutoFall(Direction::Down));
            }
        }

        if let Err(err) = self.process_operations() {
            log::error!("tick aborted: {err}");
            return Err(err);
        }
        Ok(self.progress())
    }

    fn progress(&self) -> Progress {
        match self.status {
            GameStatus::GameOver => Progress::GameOver { score: self.score },
            _ => Progress::Continue,
        }
    }

    fn process_operations(&mut self) -> Result<(), CoreError> {
        while let Some(op) = self.ops.pop() {
            if !self.ops.begin() {
                break;
            }
            let result = self.execute(op);
            self.ops.finish();
            result?;
        }
        Ok(())
    }

    fn execute(&mut self, op: Operation) -> Result<(), CoreError> {
        match op {
            Operation::Stop => self.land(),
            Operation::Rotate => {
                self.rotate_active();
                Ok(())
            }
            Operation::Move(direction) | Operation::AutoFall(direction) => {
                self.step_active(direction);
                Ok(())
            }
        }
    }

    fn step_active(&mut self, direction: Direction) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if !active.accept_transform() {
            return;
        }

        let from = active.piece.origin;
        let to = active.piece.stepped(direction);
        match validate(&active.piece, to, active.piece.rotation, &self.playfield) {
            Verdict::Allowed => {
                active.piece.origin = to;
                log::trace!("piece #{} moved {from} -> {to}", active.piece.id);
                self.events.emit(GameEvent::PieceMoved { from, to });
            }
            verdict if direction.is_down() => {
                log::trace!("piece #{} blocked below: {verdict:?}", active.piece.id);
                self.ops.enqueue(Operation::Stop);
            }
            verdict => {
                log::trace!(
                    "piece #{} move {direction:?} rejected: {verdict:?}",
                    active.piece.id
                );
            }
        }
    }

    fn rotate_active(&mut self) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        if !active.accept_transform() {
            return;
        }

        let rotation = active.piece.rotate(1);
        if rotation == active.piece.rotation {
            return;
        }
        match validate(&active.piece, active.piece.origin, rotation, &self.playfield) {
            Verdict::Allowed => {
                active.piece.rotation = rotation;
                log::trace!("piece #{} rotated to {}", active.piece.id, rotation.index());
                self.events.emit(GameEvent::PieceRotated { rotation });
            }
            verdict => {
                log::trace!("piece #{} rotation rejected: {verdict:?}", active.piece.id);
            }
        }
    }

    fn land(&mut self) -> Result<(), CoreError> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };
        if !active.begin_landing() {
            return Ok(());
        }
        match self.active.take() {
            Some(landed) => self.commit_landing(&landed.piece),
            None => Ok(()),
        }
    }

    /// Pause or resume; while paused ticks do nothing and requests are dropped
    pub fn set_paused(&mut self, paused: bool) -> bool {
        self.status = match (self.status, paused) {
            (GameStatus::Running, true) => GameStatus::Paused,
            (GameStatus::Paused, false) => GameStatus::Running,
            _ => return false,
        };
        self.events.emit(GameEvent::GamePaused { paused });
        true
    }

    /// Empty the playfield, reset counters and piece selection, start again
    ///
    /// Subscribers stay registered.
    pub fn restart(&mut self) {
        self.playfield.reset();
        self.pieces.reset();
        self.ops.clear();
        self.active = None;
        self.fall_timer = Duration::ZERO;
        self.score = 0;
        self.level = 0;
        self.lines = 0;
        self.next_piece_id = 1;
        self.spawning = false;
        self.clearing = false;
        self.status = GameStatus::NotStarted;
        self.start();
    }

    pub fn subscribe<S>(&mut self, sink: S) -> SubscriptionId
    where
        S: EventSink + 'static,
    {
        self.events.subscribe(Box::new(sink))
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Take every event emitted since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn playfield(&self) -> &Playfield {
        &self.playfield
    }

    pub fn active_piece(&self) -> Option<&Piece> {
        self.active.as_ref().map(|a| &a.piece)
    }

    pub fn active_phase(&self) -> Option<PiecePhase> {
        self.active.as_ref().map(|a| a.phase)
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn pieces_spawned(&self) -> u32 {
        self.next_piece_id.wrapping_sub(1)
    }

    pub fn fall_timer(&self) -> Duration {
        self.fall_timer
    }

    /// Pending operations, head first
    pub fn pending_operations(&self) -> Vec<Operation> {
        self.ops.pending().copied().collect()
    }

    /// Where the active piece would come to rest if it kept falling
    pub fn ghost_origin(&self) -> Option<Coord> {
        self.active_piece()
            .map(|piece| landing_origin(piece, &self.playfield))
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut snap = GameSnapshot::board(&self.playfield, self.config.kill_line, self.status);
        snap.active = self.active_piece().map(ActiveSnapshot::from);
        snap.ghost = self.ghost_origin();
        snap.pieces_spawned = self.pieces_spawned();
        snap.score = self.score;
        snap.level = self.level;
        snap.lines = self.lines;
        snap
    }
}
