pub mod emotion;
pub mod error;
pub mod goals;
pub mod memory;
pub mod personality;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

pub use emotion::{EmotionClassifier, EmotionState, KeywordTagger, Sentiment};
pub use error::AgentError;
pub use goals::{GoalPlanner, PlanStep, StepStatus, TaskExecutor, TaskHandler};
pub use memory::{
    IdentityScheme, MemoryConfig, MemoryError, MemoryKind, MemoryManager, MemoryRecord,
    RememberRequest,
};
pub use personality::{PersonalityProfile, PersonalityStore, Reinforcement};

/// Where the profile lives relative to an agent's base directory.
pub const PROFILE_RELATIVE_PATH: &str = "personalities/wednesday.json";

/// Agent configuration.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub profile_path: PathBuf,
    pub memory: MemoryConfig,
    /// How many related memories to pull in before replying.
    pub recall_limit: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            profile_path: PathBuf::from(PROFILE_RELATIVE_PATH),
            memory: MemoryConfig::default(),
            recall_limit: 2,
        }
    }
}

impl AgentConfig {
    /// Profile under `base`, with a 30-message recent window.
    pub fn rooted_at(base: impl AsRef<Path>) -> Self {
        Self {
            profile_path: base.as_ref().join(PROFILE_RELATIVE_PATH),
            memory: MemoryConfig::default().with_session_window(30),
            ..Self::default()
        }
    }
}

/// The conversational agent. Tags the user's emotion, remembers the exchange,
/// recalls related memories and answers in the profile's voice.
pub struct ConversationEngine {
    profile: PersonalityProfile,
    memory: MemoryManager,
    classifier: Box<dyn EmotionClassifier>,
    recall_limit: usize,
}

impl ConversationEngine {
    pub fn new(profile: PersonalityProfile, memory: MemoryManager) -> Self {
        Self {
            profile,
            memory,
            classifier: Box::new(KeywordTagger),
            recall_limit: AgentConfig::default().recall_limit,
        }
    }

    /// Load the profile from disk (creating it if absent) and build memory
    /// from `config`.
    pub async fn from_config(config: AgentConfig) -> Result<Self, AgentError> {
        let profile = PersonalityStore::new(&config.profile_path).load().await?;
        info!(
            name = %profile.name,
            window = config.memory.session_window,
            "conversation engine ready"
        );
        Ok(Self::new(profile, MemoryManager::new(config.memory))
            .with_recall_limit(config.recall_limit))
    }

    pub fn with_classifier(mut self, classifier: impl EmotionClassifier + 'static) -> Self {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn with_recall_limit(mut self, limit: usize) -> Self {
        self.recall_limit = limit;
        self
    }

    pub fn profile(&self) -> &PersonalityProfile {
        &self.profile
    }

    pub fn memory(&self) -> &MemoryManager {
        &self.memory
    }

    /// Answer one user message. Both the message and the reply are remembered.
    pub async fn reply(&self, user_message: &str) -> Result<String, AgentError> {
        let emotion = self.classifier.detect(user_message);
        self.memory
            .remember(
                RememberRequest::new(user_message)
                    .with_kind(MemoryKind::User)
                    .with_emotion(emotion.primary.as_str()),
            )
            .await?;

        let recalled = self.memory.recall(user_message, self.recall_limit).await?;
        let context = recalled
            .iter()
            .filter(|r| r.text != user_message)
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        debug!(recalled = recalled.len(), "recalled related context");

        let tone = tone_for(emotion.primary);
        let mut response = format!(
            "[{} | tone={tone}] I hear you. {}",
            self.profile.name,
            self.style_prompt()
        );
        if !context.is_empty() {
            response.push_str(&format!(" I remember related context: {context}."));
        }

        self.memory
            .remember(
                RememberRequest::new(response.as_str())
                    .with_kind(MemoryKind::Assistant)
                    .with_emotion(tone),
            )
            .await?;

        info!(emotion = %emotion.primary, tone, "replied");
        Ok(response)
    }

    fn style_prompt(&self) -> String {
        let traits: Vec<&str> = self
            .profile
            .core_traits
            .iter()
            .take(2)
            .map(String::as_str)
            .collect();
        format!(
            "I'll respond as {} and {}.",
            traits.join(", "),
            self.profile.speaking_style
        )
    }
}

/// Build an engine rooted at `base`.
pub async fn build_engine(base: impl AsRef<Path>) -> Result<ConversationEngine, AgentError> {
    ConversationEngine::from_config(AgentConfig::rooted_at(base)).await
}

fn tone_for(sentiment: Sentiment) -> &'static str {
    match sentiment {
        Sentiment::Negative => "empathetic",
        Sentiment::Positive => "enthusiastic",
        Sentiment::Neutral => "balanced",
    }
}
