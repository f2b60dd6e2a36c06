pub mod analysis;
pub mod client;
pub mod config;
pub mod effectiveness;
pub mod error;
pub mod game;
pub mod name_index;
pub mod pokemon;
pub mod records;
pub mod roster;
pub mod sequence;
pub mod showdown;
pub mod stats;
pub mod storage;
pub mod theme;
pub mod types;

pub use analysis::{Recommendation, ScoreLabel, TeamAnalysis, TeamAnalyzer, analyze};
pub use client::PokeApiClient;
pub use config::*;
pub use effectiveness::*;
pub use error::Error;
pub use game::{AnswerMode, Difficulty, GameScores, GameType, Quiz};
pub use name_index::NameIndex;
pub use records::{PokedexEntry, PokemonDetails, PokemonSummary};
pub use roster::{Favorites, Notification, NotificationLevel, RosterStore, Team, TeamMember};
pub use sequence::RequestSequencer;
pub use stats::{Nature, StatBuild, StatName, StatSpread};
pub use storage::{FileStorage, MemoryStorage, Storage};
pub use theme::{Theme, ThemePreference};
pub use types::{PokemonType, Typing};
