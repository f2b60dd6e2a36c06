//! Favorites, team and the other user collections, persisted through a
//! [`Storage`] collaborator.

use crate::error::Error;
use crate::game::GameScores;
use crate::records::PokemonSummary;
use crate::stats::{StatBuild, StatSpread};
use crate::storage::{self, Storage};
use crate::theme::{Theme, ThemePreference};
use crate::types::Typing;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

pub const MAX_TEAM_SIZE: usize = 6;
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

pub const TEAM_FULL_MESSAGE: &str = "Team is full! Maximum 6 Pokémon allowed.";
pub const ALREADY_ON_TEAM_MESSAGE: &str = "This Pokémon is already on your team!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Warning,
    Error,
}

/// A transient message for the user about the last team operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    raised_at: Instant,
}

impl Notification {
    pub fn new(level: NotificationLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            raised_at: Instant::now(),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.raised_at.elapsed() > NOTIFICATION_TTL
    }

    pub fn is_success(&self) -> bool {
        self.level == NotificationLevel::Success
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub id: u32,
    pub name: String,
    pub image: Option<String>,
    pub sprite: Option<String>,
    pub types: Typing,
}

impl From<&PokemonSummary> for FavoriteEntry {
    fn from(summary: &PokemonSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name.clone(),
            image: summary.image.clone(),
            sprite: summary.sprite.clone(),
            types: summary.types,
        }
    }
}

/// A team slot. The build fields sit at the top level of the stored JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamMember {
    pub id: u32,
    pub name: String,
    pub image: Option<String>,
    pub sprite: Option<String>,
    pub types: Typing,
    #[serde(rename = "stats")]
    pub base_stats: StatSpread,
    #[serde(flatten)]
    pub build: StatBuild,
}

impl TeamMember {
    pub fn from_summary(summary: &PokemonSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name.clone(),
            image: summary.image.clone(),
            sprite: summary.sprite.clone(),
            types: summary.types,
            base_stats: summary.stats,
            build: StatBuild::with_abilities(&summary.abilities),
        }
    }

    pub fn final_stats(&self) -> Result<StatSpread, Error> {
        self.build.final_stats(&self.base_stats)
    }
}

pub struct Favorites {
    entries: Vec<FavoriteEntry>,
    storage: Arc<dyn Storage>,
}

impl Favorites {
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let entries = storage::load_or_default(storage.as_ref(), storage::FAVORITES_KEY);
        Self { entries, storage }
    }

    /// Returns false when the Pokémon was already a favorite.
    pub fn add(&mut self, summary: &PokemonSummary) -> bool {
        if self.contains(summary.id) {
            return false;
        }
        self.entries.push(FavoriteEntry::from(summary));
        self.persist();
        true
    }

    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.entries.len();
        self.entries.retain(|entry| entry.id != id);
        if self.entries.len() == before {
            return false;
        }
        self.persist();
        true
    }

    /// Returns whether the Pokémon is a favorite afterwards.
    pub fn toggle(&mut self, summary: &PokemonSummary) -> bool {
        if self.contains(summary.id) {
            self.remove(summary.id);
            false
        } else {
            self.add(summary)
        }
    }

    pub fn contains(&self, id: u32) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.persist();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[FavoriteEntry] {
        &self.entries
    }

    fn persist(&self) {
        storage::save(self.storage.as_ref(), storage::FAVORITES_KEY, &self.entries);
    }
}

/// Up to six members with their builds. Every mutation bumps a revision
/// number observable through [`Team::subscribe`].
pub struct Team {
    members: Vec<TeamMember>,
    storage: Arc<dyn Storage>,
    notification: Option<Notification>,
    revision: watch::Sender<u64>,
}

impl Team {
    pub fn load(storage: Arc<dyn Storage>) -> Self {
        let mut members: Vec<TeamMember> =
            storage::load_or_default(storage.as_ref(), storage::TEAM_KEY);
        if members.len() > MAX_TEAM_SIZE {
            tracing::warn!(
                "Stored team has {} members, keeping the first {}",
                members.len(),
                MAX_TEAM_SIZE
            );
            members.truncate(MAX_TEAM_SIZE);
        }
        let (revision, _) = watch::channel(0);
        Self {
            members,
            storage,
            notification: None,
            revision,
        }
    }

    /// Adds a member with the default build. Rejections leave the team
    /// untouched and are reported through the returned notification only.
    pub fn add(&mut self, summary: &PokemonSummary) -> Notification {
        let notification = if self.is_full() {
            tracing::warn!("Rejected {}: team is full", summary.name);
            Notification::new(NotificationLevel::Error, TEAM_FULL_MESSAGE)
        } else if self.contains(summary.id) {
            tracing::warn!("Rejected {}: already on the team", summary.name);
            Notification::new(NotificationLevel::Warning, ALREADY_ON_TEAM_MESSAGE)
        } else {
            self.members.push(TeamMember::from_summary(summary));
            self.changed();
            tracing::info!("Added {} to team", summary.name);
            Notification::new(
                NotificationLevel::Success,
                format!("{} added to team!", summary.name),
            )
        };
        self.notification = Some(notification.clone());
        notification
    }

    pub fn remove(&mut self, id: u32) -> bool {
        let Some(index) = self.members.iter().position(|m| m.id == id) else {
            return false;
        };
        let member = self.members.remove(index);
        self.changed();
        self.notify(
            NotificationLevel::Info,
            format!("{} removed from team.", member.name),
        );
        true
    }

    pub fn clear(&mut self) {
        self.members.clear();
        self.changed();
        self.notify(NotificationLevel::Info, "Team cleared!");
    }

    /// Applies `update` to the member's build and persists it. Returns false
    /// when no member has this id.
    pub fn update_build<F>(&mut self, id: u32, update: F) -> bool
    where
        F: FnOnce(&mut StatBuild),
    {
        let Some(member) = self.members.iter_mut().find(|m| m.id == id) else {
            tracing::debug!("No team member with id {}", id);
            return false;
        };
        update(&mut member.build);
        self.changed();
        true
    }

    pub fn contains(&self, id: u32) -> bool {
        self.members.iter().any(|m| m.id == id)
    }

    pub fn get(&self, id: u32) -> Option<&TeamMember> {
        self.members.iter().find(|m| m.id == id)
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= MAX_TEAM_SIZE
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn members(&self) -> &[TeamMember] {
        &self.members
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// The latest notification, unless it has expired.
    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref().filter(|n| !n.is_expired())
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notification = Some(Notification::new(level, message));
    }

    fn changed(&mut self) {
        storage::save(self.storage.as_ref(), storage::TEAM_KEY, &self.members);
        self.revision.send_modify(|revision| *revision += 1);
    }
}

/// All user state, loaded from and written back to one storage backend.
pub struct RosterStore {
    pub favorites: Favorites,
    pub team: Team,
    scores: GameScores,
    theme: Theme,
    storage: Arc<dyn Storage>,
}

impl RosterStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        let scores = storage::load_or_default(storage.as_ref(), storage::GAME_SCORES_KEY);
        let preference: ThemePreference =
            storage::load_or_default(storage.as_ref(), storage::THEME_KEY);
        tracing::debug!("Loaded roster with theme {}", preference);
        Self {
            favorites: Favorites::load(storage.clone()),
            team: Team::load(storage.clone()),
            scores,
            theme: Theme::new(preference),
            storage,
        }
    }

    pub fn scores(&self) -> &GameScores {
        &self.scores
    }

    pub fn record_game(&mut self, score: u32) -> GameScores {
        self.scores.record(score);
        storage::save(self.storage.as_ref(), storage::GAME_SCORES_KEY, &self.scores);
        self.scores
    }

    pub fn reset_scores(&mut self) {
        self.scores = GameScores::default();
        storage::save(self.storage.as_ref(), storage::GAME_SCORES_KEY, &self.scores);
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Session-only dynamic theme settings; not persisted.
    pub fn theme_mut(&mut self) -> &mut Theme {
        &mut self.theme
    }

    pub fn set_theme(&mut self, preference: ThemePreference) {
        self.theme.preference = preference;
        self.persist_theme();
    }

    pub fn cycle_theme(&mut self) -> ThemePreference {
        let next = self.theme.cycle();
        self.persist_theme();
        next
    }

    fn persist_theme(&self) {
        storage::save(self.storage.as_ref(), storage::THEME_KEY, &self.theme.preference);
    }
}
