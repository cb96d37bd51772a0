//! Audit recording for healed actions

use std::sync::Arc;

use chrono::{DateTime, Utc};
use selector_heal::{HealStrategy, StrategyKind};
use serde::Serialize;
use tracing::{info, warn};

use crate::ports::{Annotation, TestContext};

/// Annotation kind attached to tests whose locators needed healing.
pub const BROKEN_LOCATOR_ANNOTATION: &str = "Broken Locator Warning";

/// Record of one healed action. At most one is created per facade call,
/// emitted to the recorder and never read back by the engine.
#[derive(Clone, Debug, Serialize)]
pub struct HealingEvent {
    pub original_selector: String,
    pub strategy: StrategyKind,
    pub resolved: String,
    pub description: String,
    pub recorded_at: DateTime<Utc>,
}

impl HealingEvent {
    pub fn new(original_selector: &str, strategy: &HealStrategy) -> Self {
        Self {
            original_selector: original_selector.to_string(),
            strategy: strategy.kind(),
            resolved: strategy.query(),
            description: strategy.describe(original_selector),
            recorded_at: Utc::now(),
        }
    }
}

/// Appends healing annotations to the ambient test context.
///
/// Recording never fails the action it describes: sink errors are logged
/// and dropped, and a facade built without a context logs only.
pub struct AuditRecorder {
    context: Option<Arc<dyn TestContext>>,
}

impl AuditRecorder {
    pub fn new(context: Option<Arc<dyn TestContext>>) -> Self {
        Self { context }
    }

    pub async fn record(&self, event: &HealingEvent) {
        info!(
            strategy = event.strategy.name(),
            resolved = %event.resolved,
            "action healed via fallback strategy"
        );
        let Some(context) = &self.context else {
            return;
        };
        let annotation = Annotation {
            kind: BROKEN_LOCATOR_ANNOTATION.to_string(),
            description: event.description.clone(),
        };
        if let Err(err) = context.add_annotation(annotation).await {
            warn!(error = %err, "failed to append healing annotation");
        }
    }
}
