use std::collections::BTreeMap;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AgentError;

/// Who the agent is and how it talks. Persisted as pretty JSON; fields missing
/// from the file fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonalityProfile {
    pub name: String,
    pub core_traits: Vec<String>,
    pub social_boundaries: BTreeMap<String, String>,
    pub speaking_style: String,
    pub dynamic_state: BTreeMap<String, String>,
}

impl Default for PersonalityProfile {
    fn default() -> Self {
        Self {
            name: "Wednesday".into(),
            core_traits: vec!["curious".into(), "calm".into(), "supportive".into()],
            social_boundaries: BTreeMap::from([
                ("new_people".into(), "polite, gentle, and reserved".into()),
                ("trusted_people".into(), "open, warm, and playful".into()),
                ("conflict".into(), "firm, reflective, and de-escalating".into()),
            ]),
            speaking_style: "concise, emotionally-aware, and respectful".into(),
            dynamic_state: BTreeMap::from([
                ("trust_level".into(), "medium".into()),
                ("energy".into(), "stable".into()),
            ]),
        }
    }
}

/// Feedback that nudges a profile's dynamic state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reinforcement {
    PositiveInteraction,
    Stress,
}

impl FromStr for Reinforcement {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "positive_interaction" => Ok(Self::PositiveInteraction),
            "stress" => Ok(Self::Stress),
            other => Err(AgentError::Personality(format!(
                "unknown reinforcement signal: {other}"
            ))),
        }
    }
}

/// Loads and saves a profile at a fixed path.
pub struct PersonalityStore {
    path: PathBuf,
}

impl PersonalityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the profile. A missing file is created with the default profile.
    pub async fn load(&self) -> Result<PersonalityProfile, AgentError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(json) => serde_json::from_str(&json)
                .map_err(|e| AgentError::Personality(format!("{}: {e}", self.path.display()))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let profile = PersonalityProfile::default();
                self.save(&profile).await?;
                info!(path = %self.path.display(), "created default personality profile");
                Ok(profile)
            }
            Err(e) => Err(AgentError::Personality(e.to_string())),
        }
    }

    pub async fn save(&self, profile: &PersonalityProfile) -> Result<(), AgentError> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| AgentError::Personality(e.to_string()))?;
        }
        let json = serde_json::to_string_pretty(profile)
            .map_err(|e| AgentError::Personality(e.to_string()))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| AgentError::Personality(e.to_string()))?;
        Ok(())
    }

    /// Apply a reinforcement signal and persist the result.
    pub async fn reinforce(
        &self,
        profile: &mut PersonalityProfile,
        signal: Reinforcement,
    ) -> Result<(), AgentError> {
        match signal {
            Reinforcement::PositiveInteraction => {
                profile
                    .dynamic_state
                    .insert("trust_level".into(), "high".into());
            }
            Reinforcement::Stress => {
                profile.dynamic_state.insert("energy".into(), "low".into());
                profile.speaking_style = "soft, reassuring, and minimal".into();
            }
        }
        info!(?signal, name = %profile.name, "reinforced personality");
        self.save(profile).await
    }
}
