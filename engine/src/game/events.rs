use super::constraints::ConstraintCounters;
use super::types::{Cell, ConsumableEntity, DeathCause, Direction, EntityIdentity, Lifecycle, StationKind};

/// What the head ran into on a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickEffect {
    Moved,
    Ate(EntityIdentity),
    Visited(StationKind),
    Died(DeathCause),
}

/// Everything a presenter needs to draw one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickSnapshot {
    pub generation: u64,
    pub tick: u64,
    pub lifecycle: Lifecycle,
    pub body: Vec<Cell>,
    pub direction: Direction,
    pub entities: Vec<ConsumableEntity>,
    pub hydration_station: Option<Cell>,
    pub relief_station: Option<Cell>,
    pub score: u32,
    pub counters: ConstraintCounters,
    pub effect: Option<TickEffect>,
}

impl TickSnapshot {
    pub fn station(&self, kind: StationKind) -> Option<Cell> {
        match kind {
            StationKind::Hydration => self.hydration_station,
            StationKind::Relief => self.relief_station,
        }
    }
}

/// Emitted once when a session ends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerminalEvent {
    pub generation: u64,
    pub final_score: u32,
    pub cause: DeathCause,
    pub ticks: u64,
    pub consumed: Vec<EntityIdentity>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickOutcome {
    pub snapshot: TickSnapshot,
    pub terminal: Option<TerminalEvent>,
}
