use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AgentError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    #[default]
    Pending,
    Done,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    pub id: usize,
    pub description: String,
    pub status: StepStatus,
}

impl PlanStep {
    pub fn complete(&mut self) {
        self.status = StepStatus::Done;
    }
}

/// Breaks an objective into sentence-sized steps.
#[derive(Debug, Clone, Default)]
pub struct GoalPlanner;

impl GoalPlanner {
    /// One step per non-empty `.`-separated sentence, numbered from 1. An
    /// objective with no sentences becomes a single step.
    pub fn plan(&self, objective: &str) -> Vec<PlanStep> {
        let mut chunks: Vec<&str> = objective
            .split('.')
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .collect();
        if chunks.is_empty() {
            chunks.push(objective);
        }

        chunks
            .into_iter()
            .enumerate()
            .map(|(i, chunk)| PlanStep {
                id: i + 1,
                description: chunk.to_string(),
                status: StepStatus::Pending,
            })
            .collect()
    }
}

/// A named service the executor can dispatch to.
#[async_trait]
pub trait TaskHandler: Send + Sync {
    async fn call(&self, payload: &str) -> Result<String, String>;
}

#[async_trait]
impl<F> TaskHandler for F
where
    F: Fn(&str) -> String + Send + Sync,
{
    async fn call(&self, payload: &str) -> Result<String, String> {
        Ok(self(payload))
    }
}

struct TaskDef {
    name: String,
    handler: Box<dyn TaskHandler>,
}

/// Name-to-handler dispatch table. Registering an existing name replaces it.
#[derive(Default)]
pub struct TaskExecutor {
    tasks: Vec<TaskDef>,
}

impl TaskExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, name: impl Into<String>, handler: impl TaskHandler + 'static) {
        let name = name.into();
        let handler: Box<dyn TaskHandler> = Box::new(handler);
        match self.tasks.iter_mut().find(|t| t.name == name) {
            Some(existing) => existing.handler = handler,
            None => self.tasks.push(TaskDef { name, handler }),
        }
    }

    pub async fn execute(&self, name: &str, payload: &str) -> Result<String, AgentError> {
        let Some(task) = self.tasks.iter().find(|t| t.name == name) else {
            warn!(task = name, "no handler registered");
            return Err(AgentError::UnknownTask(name.to_string()));
        };

        debug!(task = name, "executing task");
        task.handler
            .call(payload)
            .await
            .map_err(|message| AgentError::Task {
                name: name.to_string(),
                message,
            })
    }

    pub fn names(&self) -> Vec<&str> {
        self.tasks.iter().map(|t| t.name.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }
}
