use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use crate::{SessionId, SessionRng, SessionTag, log};
use super::bot_controller::{BotController, SnakeBotKind};
use super::entity::EntityPool;
use super::events::{TerminalEvent, TickSnapshot};
use super::game_state::SnakeGame;
use super::settings::GameSettings;
use super::types::Direction;

/// The only way a presenter observes a running session.
pub trait SessionBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_state(&self, snapshot: TickSnapshot) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(
        &self,
        tag: SessionTag,
        event: TerminalEvent,
    ) -> impl Future<Output = ()> + Send;
}

#[derive(Clone)]
pub struct SnakeSessionState {
    pub session_id: SessionId,
    game: Arc<Mutex<SnakeGame>>,
    rng: Arc<Mutex<SessionRng>>,
    tick_interval: Duration,
    bot: Option<SnakeBotKind>,
}

impl SnakeSessionState {
    pub fn create(
        session_id: SessionId,
        settings: GameSettings,
        pool: EntityPool,
        seed: u64,
        bot: Option<SnakeBotKind>,
    ) -> Result<Self, String> {
        let tick_interval = settings.tick_interval;
        let game = SnakeGame::new(session_id.clone(), settings, pool)?;

        Ok(Self {
            session_id,
            game: Arc::new(Mutex::new(game)),
            rng: Arc::new(Mutex::new(SessionRng::new(seed))),
            tick_interval,
            bot,
        })
    }

    pub async fn snapshot(&self) -> TickSnapshot {
        self.game.lock().await.snapshot()
    }

    pub async fn tag(&self) -> SessionTag {
        SessionTag {
            session_id: self.session_id.clone(),
            generation: self.game.lock().await.generation(),
        }
    }

    fn tag_for(&self, generation: u64) -> SessionTag {
        SessionTag {
            session_id: self.session_id.clone(),
            generation,
        }
    }
}

pub struct SnakeSession;

impl SnakeSession {
    pub async fn start(state: &SnakeSessionState) -> Result<SessionTag, String> {
        let mut game = state.game.lock().await;
        let mut rng = state.rng.lock().await;
        let generation = game.start(&mut rng)?;
        Ok(state.tag_for(generation))
    }

    /// Full reinitialisation. A loop still running for the old generation
    /// exits at its next tick without applying it.
    pub async fn restart(state: &SnakeSessionState) -> Result<SessionTag, String> {
        let mut game = state.game.lock().await;
        let mut rng = state.rng.lock().await;
        let generation = game.restart(&mut rng)?;
        let tag = state.tag_for(generation);
        log!("[session:{}] restarted", tag);
        Ok(tag)
    }

    pub async fn stop(state: &SnakeSessionState) {
        state.game.lock().await.reset();
    }

    pub async fn request_direction(state: &SnakeSessionState, direction: Direction) {
        state.game.lock().await.request_direction(direction);
    }

    /// Ticks the current generation until it terminates. Returns `None` if
    /// the session was not running or was stopped or restarted meanwhile.
    pub async fn run(
        state: SnakeSessionState,
        broadcaster: impl SessionBroadcaster,
    ) -> Option<TerminalEvent> {
        let generation = {
            let game = state.game.lock().await;
            if !game.is_running() {
                return None;
            }
            game.generation()
        };
        let tag = state.tag_for(generation);
        log!("[session:{}] tick loop started every {:?}", tag, state.tick_interval);

        let mut timer = interval_at(Instant::now() + state.tick_interval, state.tick_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;

            let outcome = {
                let mut game = state.game.lock().await;
                if game.generation() != generation || !game.is_running() {
                    log!("[session:{}] tick loop superseded, stopping", tag);
                    return None;
                }

                let mut rng = state.rng.lock().await;
                if let Some(kind) = state.bot
                    && let Some(direction) = BotController::calculate_move(kind, &game, &mut rng)
                {
                    game.request_direction(direction);
                }
                game.tick(&mut rng)
            };

            let outcome = outcome?;
            broadcaster.broadcast_state(outcome.snapshot).await;

            if let Some(event) = outcome.terminal {
                log!(
                    "[session:{}] finished by {} with score {}",
                    tag,
                    event.cause,
                    event.final_score
                );
                broadcaster.broadcast_game_over(tag, event.clone()).await;
                return Some(event);
            }
        }
    }

    #[cfg(test)]
    async fn with_game<R>(state: &SnakeSessionState, f: impl FnOnce(&mut SnakeGame) -> R) -> R {
        let mut game = state.game.lock().await;
        f(&mut game)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, DeathCause, Lifecycle};

    #[derive(Clone, Default)]
    struct RecordingBroadcaster {
        states: Arc<std::sync::Mutex<Vec<TickSnapshot>>>,
        game_overs: Arc<std::sync::Mutex<Vec<(SessionTag, TerminalEvent)>>>,
    }

    impl SessionBroadcaster for RecordingBroadcaster {
        async fn broadcast_state(&self, snapshot: TickSnapshot) {
            self.states.lock().unwrap().push(snapshot);
        }

        async fn broadcast_game_over(&self, tag: SessionTag, event: TerminalEvent) {
            self.game_overs.lock().unwrap().push((tag, event));
        }
    }

    fn doomed_settings() -> GameSettings {
        GameSettings {
            initial_snake: vec![
                Cell::new(4, 5),
                Cell::new(4, 6),
                Cell::new(5, 6),
                Cell::new(5, 5),
                Cell::new(6, 5),
            ],
            ..GameSettings::default()
        }
    }

    fn calm_settings() -> GameSettings {
        GameSettings {
            hydration_limit: 1000,
            relief_limit: 1000,
            ..GameSettings::default()
        }
    }

    fn session(settings: GameSettings) -> SnakeSessionState {
        SnakeSessionState::create(SessionId::new("test"), settings, EntityPool::fallback(), 5, None).unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_stops_after_self_collision() {
        let state = session(doomed_settings());
        SnakeSession::start(&state).await.unwrap();
        SnakeSession::with_game(&state, |game| game.place_entities(&[Cell::new(0, 0)])).await;
        let broadcaster = RecordingBroadcaster::default();

        let started_at = Instant::now();
        let event = SnakeSession::run(state.clone(), broadcaster.clone()).await.unwrap();

        assert_eq!(event.cause, DeathCause::SelfCollision);
        assert!(started_at.elapsed() >= Duration::from_millis(250));
        assert_eq!(broadcaster.states.lock().unwrap().len(), 1);
        let game_overs = broadcaster.game_overs.lock().unwrap();
        assert_eq!(game_overs.len(), 1);
        assert_eq!(game_overs[0].0.generation, 1);
        assert_eq!(state.snapshot().await.lifecycle, Lifecycle::Terminated);
    }

    #[tokio::test(start_paused = true)]
    async fn test_idle_session_does_not_tick() {
        let state = session(calm_settings());
        let broadcaster = RecordingBroadcaster::default();
        assert!(SnakeSession::run(state.clone(), broadcaster.clone()).await.is_none());
        assert!(broadcaster.states.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_one_snapshot_per_interval() {
        let state = session(calm_settings());
        SnakeSession::start(&state).await.unwrap();
        let broadcaster = RecordingBroadcaster::default();
        let handle = tokio::spawn(SnakeSession::run(state.clone(), broadcaster.clone()));

        tokio::time::sleep(Duration::from_millis(250 * 4 + 100)).await;
        SnakeSession::stop(&state).await;
        assert!(handle.await.unwrap().is_none());

        let states = broadcaster.states.lock().unwrap();
        assert_eq!(states.len(), 4);
        let ticks: Vec<u64> = states.iter().map(|s| s.tick).collect();
        assert_eq!(ticks, vec![1, 2, 3, 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_supersedes_running_loop() {
        let state = session(calm_settings());
        SnakeSession::start(&state).await.unwrap();
        let broadcaster = RecordingBroadcaster::default();
        let handle = tokio::spawn(SnakeSession::run(state.clone(), broadcaster.clone()));

        tokio::time::sleep(Duration::from_millis(250 * 3 + 100)).await;
        let tag = SnakeSession::restart(&state).await.unwrap();
        assert_eq!(tag.generation, 2);

        assert!(handle.await.unwrap().is_none());
        let snapshot = state.snapshot().await;
        assert_eq!(snapshot.generation, 2);
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.lifecycle, Lifecycle::Running);
        assert!(broadcaster.states.lock().unwrap().iter().all(|s| s.generation == 1));
        assert!(broadcaster.game_overs.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_direction_request_applies_on_next_tick() {
        let state = session(calm_settings());
        SnakeSession::start(&state).await.unwrap();
        SnakeSession::with_game(&state, |game| game.place_entities(&[Cell::new(0, 0)])).await;
        let broadcaster = RecordingBroadcaster::default();
        let handle = tokio::spawn(SnakeSession::run(state.clone(), broadcaster.clone()));

        SnakeSession::request_direction(&state, Direction::Up).await;
        SnakeSession::request_direction(&state, Direction::Down).await;
        tokio::time::sleep(Duration::from_millis(300)).await;
        SnakeSession::stop(&state).await;
        handle.await.unwrap();

        let states = broadcaster.states.lock().unwrap();
        assert_eq!(states.len(), 1);
        assert_eq!(states[0].direction, Direction::Down);
        assert_eq!(states[0].body[0], Cell::new(6, 7));
    }
}
