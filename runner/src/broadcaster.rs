use snake_engine::game::{SessionBroadcaster, TerminalEvent, TickEffect, TickSnapshot};
use snake_engine::{SessionId, SessionTag, log};

/// Prints session progress. Every frame when verbose, otherwise only
/// consumptions and deaths.
#[derive(Debug, Clone)]
pub struct LogBroadcaster {
    session_id: SessionId,
    verbose: bool,
}

impl LogBroadcaster {
    pub fn new(session_id: SessionId, verbose: bool) -> Self {
        Self { session_id, verbose }
    }

    fn describe(snapshot: &TickSnapshot) -> String {
        let effect = match &snapshot.effect {
            Some(TickEffect::Ate(identity)) => format!("ate {}", identity.display_name),
            Some(TickEffect::Visited(kind)) => format!("visited {:?} station", kind),
            Some(TickEffect::Died(cause)) => format!("died: {}", cause),
            Some(TickEffect::Moved) | None => "moved".to_string(),
        };
        format!(
            "tick {} head {} len {} score {} counters {}/{} {}",
            snapshot.tick,
            snapshot.body.first().map(|c| c.to_string()).unwrap_or_default(),
            snapshot.body.len(),
            snapshot.score,
            snapshot.counters.since_hydration,
            snapshot.counters.since_relief,
            effect
        )
    }
}

impl SessionBroadcaster for LogBroadcaster {
    async fn broadcast_state(&self, snapshot: TickSnapshot) {
        let notable = matches!(snapshot.effect, Some(TickEffect::Ate(_)) | Some(TickEffect::Visited(_)));
        if self.verbose || notable {
            log!(
                "[session:{}#{}] {}",
                self.session_id,
                snapshot.generation,
                Self::describe(&snapshot)
            );
        }
    }

    async fn broadcast_game_over(&self, tag: SessionTag, event: TerminalEvent) {
        let eaten: Vec<&str> = event.consumed.iter().map(|e| e.display_name.as_str()).collect();
        log!(
            "[session:{}] game over after {} ticks: {}, score {}, ate [{}]",
            tag,
            event.ticks,
            event.cause,
            event.final_score,
            eaten.join(", ")
        );
    }
}
