mod policy;
mod reporter;
mod store;
mod tracker;

pub use policy::should_persist;
pub use reporter::ScoreReporter;
pub use store::{
    InMemoryScoreStore, LeaderboardEntry, ScoreStore, ScoreStoreError, SubmitAck,
    DEFAULT_LEADERBOARD_SIZE,
};
pub use tracker::{BestScoreTracker, SubmissionStatus, SubmitDecision};
