use super::types::StationKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConstraintCounters {
    pub since_hydration: u32,
    pub since_relief: u32,
}

/// Counts bites since the last drink and the last bathroom visit.
#[derive(Clone, Debug)]
pub struct ConstraintTracker {
    counters: ConstraintCounters,
    hydration_limit: u32,
    relief_limit: u32,
}

impl ConstraintTracker {
    pub fn new(hydration_limit: u32, relief_limit: u32) -> Self {
        Self {
            counters: ConstraintCounters::default(),
            hydration_limit,
            relief_limit,
        }
    }

    pub fn counters(&self) -> ConstraintCounters {
        self.counters
    }

    pub fn limit(&self, kind: StationKind) -> u32 {
        match kind {
            StationKind::Hydration => self.hydration_limit,
            StationKind::Relief => self.relief_limit,
        }
    }

    pub fn count(&self, kind: StationKind) -> u32 {
        match kind {
            StationKind::Hydration => self.counters.since_hydration,
            StationKind::Relief => self.counters.since_relief,
        }
    }

    /// Whether a station of `kind` is overdue.
    pub fn is_due(&self, kind: StationKind) -> bool {
        self.count(kind) >= self.limit(kind)
    }

    /// Checked with the counters as they stand before the new bite is counted.
    pub fn is_forced_death(&self) -> bool {
        self.is_due(StationKind::Hydration) || self.is_due(StationKind::Relief)
    }

    /// Records a bite and returns the station kinds whose counter just hit
    /// its limit.
    pub fn on_consume(&mut self) -> Vec<StationKind> {
        self.counters.since_hydration += 1;
        self.counters.since_relief += 1;

        [StationKind::Hydration, StationKind::Relief]
            .into_iter()
            .filter(|&kind| self.count(kind) == self.limit(kind))
            .collect()
    }

    pub fn on_hydrate(&mut self) {
        self.counters.since_hydration = 0;
    }

    pub fn on_relieve(&mut self) {
        self.counters.since_relief = 0;
    }

    pub fn on_station(&mut self, kind: StationKind) {
        match kind {
            StationKind::Hydration => self.on_hydrate(),
            StationKind::Relief => self.on_relieve(),
        }
    }

    pub fn reset(&mut self) {
        self.counters = ConstraintCounters::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_increment_together() {
        let mut tracker = ConstraintTracker::new(2, 5);
        tracker.on_consume();
        assert_eq!(
            tracker.counters(),
            ConstraintCounters { since_hydration: 1, since_relief: 1 }
        );
    }

    #[test]
    fn test_limit_reached_reports_kind_each_time() {
        let mut tracker = ConstraintTracker::new(2, 5);
        assert!(tracker.on_consume().is_empty());
        assert_eq!(tracker.on_consume(), vec![StationKind::Hydration]);
        tracker.on_hydrate();
        assert!(tracker.on_consume().is_empty());
        assert_eq!(tracker.on_consume(), vec![StationKind::Hydration]);
        tracker.on_hydrate();
        assert_eq!(tracker.on_consume(), vec![StationKind::Relief]);
        assert_eq!(
            tracker.counters(),
            ConstraintCounters { since_hydration: 1, since_relief: 5 }
        );
    }

    #[test]
    fn test_forced_death_only_after_limit() {
        let mut tracker = ConstraintTracker::new(2, 5);
        tracker.on_consume();
        assert!(!tracker.is_forced_death());
        tracker.on_consume();
        assert!(tracker.is_forced_death());
        tracker.on_hydrate();
        assert!(!tracker.is_forced_death());
    }

    #[test]
    fn test_relief_limit_also_forces_death() {
        let mut tracker = ConstraintTracker::new(100, 3);
        for _ in 0..3 {
            assert!(!tracker.is_forced_death());
            tracker.on_consume();
        }
        assert!(tracker.is_forced_death());
        tracker.on_station(StationKind::Relief);
        assert_eq!(tracker.count(StationKind::Relief), 0);
        assert_eq!(tracker.count(StationKind::Hydration), 3);
    }
}
