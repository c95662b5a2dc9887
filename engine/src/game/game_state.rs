use std::collections::HashSet;

use crate::{SessionId, SessionRng, SessionTag, log, warn};
use super::constraints::{ConstraintCounters, ConstraintTracker};
use super::entity::EntityPool;
use super::events::{TerminalEvent, TickEffect, TickOutcome, TickSnapshot};
use super::grid::Grid;
use super::settings::{GameSettings, validate_initial_snake};
use super::snake::SnakeBody;
use super::spawner::EntitySpawner;
use super::types::{Cell, ConsumableEntity, DeathCause, Direction, EntityIdentity, Lifecycle, StationKind};

/// One player's game: Idle until started, Running while ticks apply, then
/// Terminated with a frozen score. Restarting is a full reinitialisation
/// under a new generation number.
#[derive(Clone, Debug)]
pub struct SnakeGame {
    session_id: SessionId,
    settings: GameSettings,
    spawner: EntitySpawner,
    lifecycle: Lifecycle,
    generation: u64,
    tick: u64,
    snake: SnakeBody,
    direction: Direction,
    pending_direction: Option<Direction>,
    constraints: ConstraintTracker,
    entities: Vec<ConsumableEntity>,
    hydration_station: Option<Cell>,
    relief_station: Option<Cell>,
    score: u32,
    pool: EntityPool,
    consumed: Vec<EntityIdentity>,
    terminal: Option<TerminalEvent>,
}

impl SnakeGame {
    pub fn new(session_id: SessionId, settings: GameSettings, pool: EntityPool) -> Result<Self, String> {
        validate_initial_snake(&settings.grid, &settings.initial_snake, settings.initial_direction)?;
        let snake = SnakeBody::new(&settings.initial_snake)?;

        Ok(Self {
            session_id,
            spawner: EntitySpawner::new(settings.grid),
            lifecycle: Lifecycle::Idle,
            generation: 0,
            tick: 0,
            snake,
            direction: settings.initial_direction,
            pending_direction: None,
            constraints: ConstraintTracker::new(settings.hydration_limit, settings.relief_limit),
            entities: Vec::new(),
            hydration_station: None,
            relief_station: None,
            score: 0,
            pool,
            consumed: Vec::new(),
            terminal: None,
            settings,
        })
    }

    pub fn tag(&self) -> SessionTag {
        SessionTag {
            session_id: self.session_id.clone(),
            generation: self.generation,
        }
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn grid(&self) -> Grid {
        self.settings.grid
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn ticks(&self) -> u64 {
        self.tick
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn counters(&self) -> ConstraintCounters {
        self.constraints.counters()
    }

    pub fn constraints(&self) -> &ConstraintTracker {
        &self.constraints
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn snake(&self) -> &SnakeBody {
        &self.snake
    }

    pub fn entities(&self) -> &[ConsumableEntity] {
        &self.entities
    }

    pub fn station(&self, kind: StationKind) -> Option<Cell> {
        match kind {
            StationKind::Hydration => self.hydration_station,
            StationKind::Relief => self.relief_station,
        }
    }

    pub fn consumed(&self) -> &[EntityIdentity] {
        &self.consumed
    }

    pub fn terminal_event(&self) -> Option<&TerminalEvent> {
        self.terminal.as_ref()
    }

    /// Idle -> Running. Returns the new generation.
    pub fn start(&mut self, rng: &mut SessionRng) -> Result<u64, String> {
        if self.lifecycle != Lifecycle::Idle {
            return Err(format!("Cannot start a game that is {:?}", self.lifecycle));
        }

        self.reinitialize()?;
        self.generation += 1;

        if self.settings.shuffle_entities {
            self.pool.reshuffle(rng);
        } else {
            self.pool.rewind();
        }

        let occupied = self.occupied_cells();
        let cells = self
            .spawner
            .spawn_many(self.settings.entity_count, &occupied, rng);
        if cells.len() < self.settings.entity_count {
            warn!(
                "[session:{}] only {} of {} entities fit on the board",
                self.tag(),
                cells.len(),
                self.settings.entity_count
            );
        }
        for cell in cells {
            let identity = self.pool.next_identity();
            self.entities.push(ConsumableEntity { cell, identity });
        }

        self.lifecycle = Lifecycle::Running;
        log!(
            "[session:{}] game started, {} entities on a {}x{} board",
            self.tag(),
            self.entities.len(),
            self.settings.grid.width,
            self.settings.grid.height
        );
        Ok(self.generation)
    }

    /// Back to Idle with the initial board; the previous run is discarded.
    pub fn reset(&mut self) {
        if let Err(e) = self.reinitialize() {
            warn!("[session:{}] failed to reset board: {}", self.tag(), e);
        }
        self.lifecycle = Lifecycle::Idle;
    }

    pub fn restart(&mut self, rng: &mut SessionRng) -> Result<u64, String> {
        self.reset();
        self.start(rng)
    }

    fn reinitialize(&mut self) -> Result<(), String> {
        self.snake = SnakeBody::new(&self.settings.initial_snake)?;
        self.direction = self.settings.initial_direction;
        self.pending_direction = None;
        self.constraints.reset();
        self.entities.clear();
        self.hydration_station = None;
        self.relief_station = None;
        self.score = 0;
        self.tick = 0;
        self.consumed.clear();
        self.terminal = None;
        Ok(())
    }

    /// Latest request wins; validated against the current heading when the
    /// next tick starts.
    pub fn request_direction(&mut self, direction: Direction) {
        if self.is_running() {
            self.pending_direction = Some(direction);
        }
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    /// Advances one step. Returns `None` when the game is not running.
    pub fn tick(&mut self, rng: &mut SessionRng) -> Option<TickOutcome> {
        if !self.is_running() {
            return None;
        }
        self.tick += 1;

        if let Some(requested) = self.pending_direction.take()
            && !requested.is_opposite(&self.direction)
        {
            self.direction = requested;
        }

        let next_head = self.snake.next_head(&self.settings.grid, self.direction);
        if self.snake.will_self_collide(next_head) {
            return Some(self.terminate(DeathCause::SelfCollision));
        }

        let effect = if self.hydration_station == Some(next_head) {
            self.visit_station(StationKind::Hydration, next_head)
        } else if self.relief_station == Some(next_head) {
            self.visit_station(StationKind::Relief, next_head)
        } else if let Some(index) = self.entities.iter().position(|e| e.cell == next_head) {
            if self.constraints.is_forced_death() {
                return Some(self.terminate(DeathCause::ForcedDeath));
            }
            self.consume(index, next_head, rng)
        } else {
            self.snake.advance(next_head, false);
            TickEffect::Moved
        };

        Some(TickOutcome {
            snapshot: self.snapshot_with(Some(effect)),
            terminal: None,
        })
    }

    fn visit_station(&mut self, kind: StationKind, next_head: Cell) -> TickEffect {
        match kind {
            StationKind::Hydration => self.hydration_station = None,
            StationKind::Relief => self.relief_station = None,
        }
        self.constraints.on_station(kind);
        self.snake.advance(next_head, false);
        TickEffect::Visited(kind)
    }

    fn consume(&mut self, index: usize, next_head: Cell, rng: &mut SessionRng) -> TickEffect {
        let eaten = self.entities.remove(index);
        self.score += self.settings.reward_per_consumption;
        let reached = self.constraints.on_consume();
        self.snake.advance(next_head, true);
        self.consumed.push(eaten.identity.clone());

        log!(
            "[session:{}] ate {} at {}. Score: {}",
            self.tag(),
            eaten.identity.display_name,
            next_head,
            self.score
        );

        let occupied = self.occupied_cells();
        match self.spawner.spawn(&occupied, rng) {
            Some(cell) => {
                let identity = self.pool.next_identity();
                self.entities.push(ConsumableEntity { cell, identity });
            }
            None => warn!("[session:{}] no free cell for a replacement entity", self.tag()),
        }

        for kind in reached {
            if self.station(kind).is_some() {
                continue;
            }
            let occupied = self.occupied_cells();
            match self.spawner.spawn(&occupied, rng) {
                Some(cell) => {
                    match kind {
                        StationKind::Hydration => self.hydration_station = Some(cell),
                        StationKind::Relief => self.relief_station = Some(cell),
                    }
                    log!("[session:{}] {:?} station spawned at {}", self.tag(), kind, cell);
                }
                None => warn!("[session:{}] no free cell for {:?} station", self.tag(), kind),
            }
        }

        TickEffect::Ate(eaten.identity)
    }

    fn terminate(&mut self, cause: DeathCause) -> TickOutcome {
        self.lifecycle = Lifecycle::Terminated;
        self.pending_direction = None;

        let event = TerminalEvent {
            generation: self.generation,
            final_score: self.score,
            cause,
            ticks: self.tick,
            consumed: self.consumed.clone(),
        };
        self.terminal = Some(event.clone());
        log!(
            "[session:{}] game over by {} after {} ticks. Final score: {}",
            self.tag(),
            cause,
            self.tick,
            self.score
        );

        TickOutcome {
            snapshot: self.snapshot_with(Some(TickEffect::Died(cause))),
            terminal: Some(event),
        }
    }

    pub fn occupied_cells(&self) -> HashSet<Cell> {
        let mut occupied: HashSet<Cell> = self.snake.cells().collect();
        occupied.extend(self.entities.iter().map(|e| e.cell));
        occupied.extend(self.hydration_station);
        occupied.extend(self.relief_station);
        occupied
    }

    pub fn snapshot(&self) -> TickSnapshot {
        self.snapshot_with(None)
    }

    fn snapshot_with(&self, effect: Option<TickEffect>) -> TickSnapshot {
        TickSnapshot {
            generation: self.generation,
            tick: self.tick,
            lifecycle: self.lifecycle,
            body: self.snake.to_vec(),
            direction: self.direction,
            entities: self.entities.clone(),
            hydration_station: self.hydration_station,
            relief_station: self.relief_station,
            score: self.score,
            counters: self.constraints.counters(),
            effect,
        }
    }

    #[cfg(test)]
    pub(crate) fn place_entities(&mut self, cells: &[Cell]) {
        self.entities = cells
            .iter()
            .map(|&cell| ConsumableEntity {
                cell,
                identity: self.pool.next_identity(),
            })
            .collect();
    }

    #[cfg(test)]
    pub(crate) fn place_station(&mut self, kind: StationKind, cell: Option<Cell>) {
        match kind {
            StationKind::Hydration => self.hydration_station = cell,
            StationKind::Relief => self.relief_station = cell,
        }
    }
}
