//! Profile and session repositories
//!
//! [`ProfileStore`] exclusively owns player profiles and [`SessionRegistry`] owns
//! tutorial sessions. Each store keeps its map behind a single `RwLock`, and every
//! read-modify-write runs under one write guard, so concurrent calls for the same
//! player cannot interleave and lose an update. Neither store ever holds both its
//! own lock and another store's lock.

use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{debug, info};

use crate::error::TutorError;
use crate::types::{
    LearningStyle, PlayerProfile, ProfileUpdate, SkillAnalysis, TutorialSession,
};

/// Skill level given to profiles that have never been analyzed
pub const DEFAULT_SKILL_LEVEL: f64 = 0.3;

/// Defaults applied to newly created profiles
#[derive(Debug, Clone)]
pub struct ProfileDefaults {
    pub learning_style: LearningStyle,
    pub preferred_language: String,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            learning_style: LearningStyle::Visual,
            preferred_language: "es".to_string(),
        }
    }
}

/// Keyed store of player profiles
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: RwLock<HashMap<String, PlayerProfile>>,
    defaults: ProfileDefaults,
}

impl ProfileStore {
    pub fn new(defaults: ProfileDefaults) -> Self {
        Self {
            profiles: RwLock::new(HashMap::new()),
            defaults,
        }
    }

    pub fn defaults(&self) -> &ProfileDefaults {
        &self.defaults
    }

    /// A profile carrying the store defaults, not inserted into the store
    pub fn default_profile(&self, player_id: &str) -> PlayerProfile {
        PlayerProfile::new(
            player_id,
            DEFAULT_SKILL_LEVEL,
            self.defaults.learning_style.clone(),
            self.defaults.preferred_language.clone(),
        )
    }

    /// Create the profile on first use, otherwise overwrite its skill level.
    ///
    /// The skill level is seeded from the continuous efficiency (clamped to [0, 1]),
    /// not from the tier score. Updates are last-write-wins.
    pub fn get_or_create(&self, player_id: &str, analysis: &SkillAnalysis) -> PlayerProfile {
        let skill_level = analysis.efficiency.clamp(0.0, 1.0);
        let mut profiles = self.profiles.write();

        match profiles.get_mut(player_id) {
            Some(profile) => {
                debug!(
                    player_id,
                    previous = profile.skill_level,
                    skill_level,
                    "overwriting skill level"
                );
                profile.skill_level = skill_level;
                profile.clone()
            }
            None => {
                let mut profile = self.default_profile(player_id);
                profile.skill_level = skill_level;
                info!(player_id, skill_level, "created player profile");
                profiles.insert(player_id.to_string(), profile.clone());
                profile
            }
        }
    }

    /// Insert or replace a profile, returning the previous one
    pub fn insert(&self, profile: PlayerProfile) -> Option<PlayerProfile> {
        self.profiles
            .write()
            .insert(profile.player_id.clone(), profile)
    }

    pub fn get(&self, player_id: &str) -> Result<PlayerProfile, TutorError> {
        self.profiles
            .read()
            .get(player_id)
            .cloned()
            .ok_or_else(|| TutorError::PlayerNotFound(player_id.to_string()))
    }

    pub fn contains(&self, player_id: &str) -> bool {
        self.profiles.read().contains_key(player_id)
    }

    /// Apply a partial update. A replacement difficulty-area list is deduplicated
    /// keeping first occurrences.
    pub fn update(&self, player_id: &str, update: &ProfileUpdate) -> Result<PlayerProfile, TutorError> {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .get_mut(player_id)
            .ok_or_else(|| TutorError::PlayerNotFound(player_id.to_string()))?;

        if let Some(style) = &update.learning_style {
            profile.learning_style = style.clone();
        }
        if let Some(language) = &update.preferred_language {
            profile.preferred_language = language.clone();
        }
        if let Some(areas) = &update.difficulty_areas {
            profile.difficulty_areas.clear();
            for area in areas {
                profile.append_difficulty_area(area);
            }
        }

        Ok(profile.clone())
    }

    /// Union-insert a difficulty tag. Returns whether the tag was new.
    pub fn append_difficulty_area(&self, player_id: &str, tag: &str) -> Result<bool, TutorError> {
        let mut profiles = self.profiles.write();
        let profile = profiles
            .get_mut(player_id)
            .ok_or_else(|| TutorError::PlayerNotFound(player_id.to_string()))?;
        Ok(profile.append_difficulty_area(tag))
    }

    pub fn remove(&self, player_id: &str) -> Result<PlayerProfile, TutorError> {
        self.profiles
            .write()
            .remove(player_id)
            .ok_or_else(|| TutorError::PlayerNotFound(player_id.to_string()))
    }

    /// All profiles ordered by player id
    pub fn list(&self) -> Vec<PlayerProfile> {
        let mut profiles: Vec<PlayerProfile> = self.profiles.read().values().cloned().collect();
        profiles.sort_by(|a, b| a.player_id.cmp(&b.player_id));
        profiles
    }

    pub fn len(&self) -> usize {
        self.profiles.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.read().is_empty()
    }

    /// Replace all profiles
    pub fn import(&self, profiles: Vec<PlayerProfile>) {
        let map = profiles
            .into_iter()
            .map(|p| (p.player_id.clone(), p))
            .collect();
        *self.profiles.write() = map;
    }
}

/// Keyed store of active tutorial sessions
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, TutorialSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, session: TutorialSession) {
        self.sessions
            .write()
            .insert(session.session_id.clone(), session);
    }

    pub fn get(&self, session_id: &str) -> Result<TutorialSession, TutorError> {
        self.sessions
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| TutorError::SessionNotFound(session_id.to_string()))
    }

    /// Remove a session (tutorial completed)
    pub fn remove(&self, session_id: &str) -> Result<TutorialSession, TutorError> {
        self.sessions
            .write()
            .remove(session_id)
            .ok_or_else(|| TutorError::SessionNotFound(session_id.to_string()))
    }

    /// Sessions belonging to a player, oldest first
    pub fn for_player(&self, player_id: &str) -> Vec<TutorialSession> {
        let mut sessions: Vec<TutorialSession> = self
            .sessions
            .read()
            .values()
            .filter(|s| s.player_id == player_id)
            .cloned()
            .collect();
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        sessions
    }

    /// Remove every session of a player and return how many were removed
    pub fn remove_for_player(&self, player_id: &str) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, s| s.player_id != player_id);
        before - sessions.len()
    }

    /// All sessions, oldest first
    pub fn list(&self) -> Vec<TutorialSession> {
        let mut sessions: Vec<TutorialSession> = self.sessions.read().values().cloned().collect();
        sessions.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }

    /// Replace all sessions
    pub fn import(&self, sessions: Vec<TutorialSession>) {
        let map = sessions
            .into_iter()
            .map(|s| (s.session_id.clone(), s))
            .collect();
        *self.sessions.write() = map;
    }
}
