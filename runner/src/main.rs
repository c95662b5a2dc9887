mod broadcaster;
mod config;

use std::path::PathBuf;

use chrono::Utc;
use clap::Parser;
use tokio::task::JoinHandle;
use snake_engine::challenge::{ChallengeOutcome, InMemoryChallengeStore};
use snake_engine::config::{ConfigManager, Validate};
use snake_engine::game::{EntityPool, GameSettings, SnakeBotKind, SnakeSession, SnakeSessionState};
use snake_engine::id_generator::generate_session_id;
use snake_engine::provider::{StaticEntityProvider, load_entity_pool};
use snake_engine::score::{
    BestScoreTracker, InMemoryScoreStore, ScoreReporter, ScoreStore, SubmissionStatus,
};
use snake_engine::{PlayerIdentity, log, logger, warn};

use broadcaster::LogBroadcaster;
use config::{DEFAULT_CONFIG_PATH, RunnerConfig};

#[derive(Parser)]
#[command(name = "snake_runner")]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[arg(long)]
    games: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    tick_interval_ms: Option<u32>,

    #[arg(long)]
    bot: Option<SnakeBotKind>,

    #[arg(long)]
    verbose: bool,

    #[arg(long)]
    challenge: bool,

    #[arg(long)]
    use_log_prefix: bool,
}

impl Args {
    fn apply(&self, config: &mut RunnerConfig) {
        if let Some(games) = self.games {
            config.games = games;
        }
        if let Some(tick_interval_ms) = self.tick_interval_ms {
            config.game.tick_interval_ms = tick_interval_ms;
        }
        if let Some(bot) = self.bot {
            config.bot = bot;
        }
    }
}

struct Runner {
    config: RunnerConfig,
    provider: StaticEntityProvider,
    store: InMemoryScoreStore,
    verbose: bool,
}

impl Runner {
    async fn play_session(
        &self,
        player: &PlayerIdentity,
        pool: EntityPool,
        seed: u64,
        bot: SnakeBotKind,
        games: u32,
    ) -> Result<Option<u32>, String> {
        let session_id = generate_session_id();
        let state = SnakeSessionState::create(
            session_id.clone(),
            GameSettings::from(&self.config.game),
            pool,
            seed,
            Some(bot),
        )?;
        let broadcaster = LogBroadcaster::new(session_id, self.verbose);

        let reporter = ScoreReporter::new(self.store.clone(), BestScoreTracker::new(player.clone(), None));
        let mut pending: Option<(u64, JoinHandle<()>)> = None;
        let mut best_run: Option<u32> = None;

        for game_index in 0..games {
            if let Some((generation, handle)) = pending.take() {
                Self::settle(&reporter, generation, handle).await;
            }
            if let Err(e) = reporter.load_best().await {
                warn!("Could not load best score for {}: {}", player.player_id, e);
            }

            let tag = if game_index == 0 {
                SnakeSession::start(&state).await?
            } else {
                SnakeSession::restart(&state).await?
            };
            reporter.session_started(tag.generation).await;
            log!("[session:{}] {} playing game {}/{}", tag, player.display_name, game_index + 1, games);

            let Some(event) = SnakeSession::run(state.clone(), broadcaster.clone()).await else {
                warn!("[session:{}] ended without a result", tag);
                continue;
            };

            best_run = Some(best_run.map_or(event.final_score, |best| best.max(event.final_score)));
            if let Some(handle) = reporter.report(&event).await {
                pending = Some((event.generation, handle));
            }
        }

        if let Some((generation, handle)) = pending.take() {
            Self::settle(&reporter, generation, handle).await;
        }
        Ok(best_run)
    }

    /// Waits for a submission between games and retries it once if the
    /// store was unavailable.
    async fn settle<S: ScoreStore>(reporter: &ScoreReporter<S>, generation: u64, handle: JoinHandle<()>) {
        if let Err(e) = handle.await {
            warn!("Score submission task failed: {}", e);
            return;
        }
        let SubmissionStatus::Failed { retryable: true, .. } = reporter.status().await else {
            return;
        };
        if let Some(retry) = reporter.retry(generation).await
            && let Err(e) = retry.await
        {
            warn!("Score resubmission task failed: {}", e);
        }
    }

    async fn print_leaderboard(&self) {
        match self.store.leaderboard(Some(self.config.leaderboard_size)).await {
            Ok(entries) => {
                log!("Leaderboard:");
                for (rank, entry) in entries.iter().enumerate() {
                    log!("  {:>2}. {:<16} {:>4}", rank + 1, entry.display_name, entry.score);
                }
            }
            Err(e) => warn!("Leaderboard unavailable: {}", e),
        }
    }

    async fn run_challenge(&self, player: &PlayerIdentity, player_score: u32, seed: u64) -> Result<(), String> {
        let store = InMemoryChallengeStore::new(chrono::Duration::hours(self.config.challenge_ttl_hours as i64));
        let rival = self.config.rival.identity();
        let challenge = store.create(player.clone(), rival.clone(), Some(player_score), Utc::now()).await;

        let pool = load_entity_pool(&self.provider, &rival).await;
        let rival_score = self
            .play_session(&rival, pool, seed.wrapping_add(1), SnakeBotKind::Random, 1)
            .await?
            .unwrap_or(0);

        let challenge = store
            .submit(&challenge.id, &rival.player_id, rival_score, Utc::now())
            .await
            .map_err(|e| e.to_string())?;

        match challenge.winner {
            Some(ChallengeOutcome::Challenger) => log!(
                "Challenge {}: {} wins {} to {}",
                challenge.id, player.display_name, player_score, rival_score
            ),
            Some(ChallengeOutcome::Challenged) => log!(
                "Challenge {}: {} wins {} to {}",
                challenge.id, rival.display_name, rival_score, player_score
            ),
            Some(ChallengeOutcome::Tie) => log!("Challenge {}: tie at {}", challenge.id, player_score),
            None => log!("Challenge {} is still {:?}", challenge.id, challenge.status),
        }
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let prefix = if args.use_log_prefix {
        Some("Runner".to_string())
    } else {
        None
    };
    logger::init_logger(prefix);

    let config_manager: ConfigManager<_, RunnerConfig> = ConfigManager::from_yaml_file(args.config.clone());
    let mut config = config_manager.get_config()?;
    args.apply(&mut config);
    config.validate()?;

    let seed = args.seed.unwrap_or_else(rand::random);
    log!("Running {} game(s) with {:?} autopilot, seed {}", config.games, config.bot, seed);

    let player = config.player.identity();
    let runner = Runner {
        provider: StaticEntityProvider::from_names(&config.entity_names),
        store: InMemoryScoreStore::new(),
        verbose: args.verbose,
        config,
    };

    let pool = load_entity_pool(&runner.provider, &player).await;
    let best_run = runner
        .play_session(&player, pool, seed, runner.config.bot, runner.config.games)
        .await?;

    if args.challenge {
        match best_run {
            Some(score) => runner.run_challenge(&player, score, seed).await?,
            None => warn!("No finished game to challenge with"),
        }
    }

    runner.print_leaderboard().await;
    Ok(())
}
