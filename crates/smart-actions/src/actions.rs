//! The self-healing action facade

use std::sync::Arc;

use tracing::{debug, instrument, warn};

use selector_heal::{HealPlan, HealStrategy, LocatorDescriptor, SelectorRegistry};
use testward_core_types::{
    ActionId, ActionKind, DriverError, DriverErrorKind, ElementState, TextMatch,
};

use crate::audit::{AuditRecorder, HealingEvent};
use crate::policy::ActionPolicy;
use crate::ports::{PageDriver, TestContext};

/// Facade combining a driver port, a snapshot registry, a policy and an
/// audit recorder into the `smart_*` action set.
///
/// One instance belongs to one page object. The registry is fixed at build
/// time and every method takes `&self`, so instances can be shared across
/// parallel test workers freely.
pub struct SmartActions {
    driver: Arc<dyn PageDriver>,
    registry: SelectorRegistry,
    audit: AuditRecorder,
    policy: ActionPolicy,
}

pub struct SmartActionsBuilder {
    driver: Option<Arc<dyn PageDriver>>,
    registry: SelectorRegistry,
    context: Option<Arc<dyn TestContext>>,
    policy: ActionPolicy,
}

impl SmartActionsBuilder {
    pub fn new() -> Self {
        Self {
            driver: None,
            registry: SelectorRegistry::empty(),
            context: None,
            policy: ActionPolicy::default(),
        }
    }

    pub fn with_driver(mut self, driver: Arc<dyn PageDriver>) -> Self {
        self.driver = Some(driver);
        self
    }

    /// Without a registry, healing falls through to hint strategies only.
    pub fn with_registry(mut self, registry: SelectorRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Without a context, healed actions are logged but not annotated.
    pub fn with_context(mut self, context: Arc<dyn TestContext>) -> Self {
        self.context = Some(context);
        self
    }

    pub fn with_policy(mut self, policy: ActionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> SmartActions {
        SmartActions {
            driver: self.driver.expect("page driver is required"),
            registry: self.registry,
            audit: AuditRecorder::new(self.context),
            policy: self.policy,
        }
    }
}

impl Default for SmartActionsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SmartActions {
    pub fn builder() -> SmartActionsBuilder {
        SmartActionsBuilder::new()
    }

    /// Click at `selector`, healing through registry candidates and then
    /// the button-role/text hints when the primary attempt fails.
    pub async fn smart_click(
        &self,
        selector: &str,
        text_hint: Option<&str>,
        registry_key: Option<&str>,
    ) -> Result<(), DriverError> {
        let descriptor = descriptor_from(selector, text_hint, registry_key);
        self.execute(ActionKind::Click, ActionId::new(), descriptor, None)
            .await
            .map(|_| ())
    }

    /// Fill `selector` with `value`. Hint healing queries the textbox role
    /// first and the placeholder second; there is no free-text fallback.
    pub async fn smart_fill(
        &self,
        selector: &str,
        value: &str,
        text_hint: Option<&str>,
        registry_key: Option<&str>,
    ) -> Result<(), DriverError> {
        let descriptor = descriptor_from(selector, text_hint, registry_key);
        self.execute(ActionKind::Fill, ActionId::new(), descriptor, Some(value))
            .await
            .map(|_| ())
    }

    /// Wait until `selector` is visible, healing through candidates and a
    /// text-visibility hint.
    pub async fn smart_wait_for_visibility(
        &self,
        selector: &str,
        text_hint: Option<&str>,
        registry_key: Option<&str>,
    ) -> Result<(), DriverError> {
        let descriptor = descriptor_from(selector, text_hint, registry_key);
        self.execute(ActionKind::WaitVisible, ActionId::new(), descriptor, None)
            .await
            .map(|_| ())
    }

    /// Read the text content under `selector`, healing through registry
    /// candidates only.
    pub async fn smart_read_text(
        &self,
        selector: &str,
        registry_key: Option<&str>,
    ) -> Result<String, DriverError> {
        let descriptor = descriptor_from(selector, None, registry_key);
        self.execute(ActionKind::ReadText, ActionId::new(), descriptor, None)
            .await
            .map(|text| text.unwrap_or_default())
    }

    /// Wait until the navigation URL matches `**/*<url_fragment>*`.
    ///
    /// Url waits are not selector-based, so no healing applies; a failure
    /// is logged with the caller's `context` and returned verbatim. The
    /// registry key is accepted for signature uniformity with the other
    /// actions and only ever appears in the log.
    pub async fn smart_wait_for_url_contains(
        &self,
        url_fragment: &str,
        context: Option<&str>,
        registry_key: Option<&str>,
    ) -> Result<(), DriverError> {
        let action_id = ActionId::new();
        let pattern = format!("**/*{}*", url_fragment);
        debug!(action = %action_id, pattern = %pattern, "waiting for url");
        match self
            .driver
            .wait_for_url(&pattern, self.policy.timeouts.url_wait())
            .await
        {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(
                    action = %action_id,
                    pattern = %pattern,
                    context = context.unwrap_or("-"),
                    registry_key = registry_key.unwrap_or("-"),
                    error = %err,
                    "url wait failed"
                );
                Err(err)
            }
        }
    }

    #[instrument(skip_all, fields(action = %action_id, kind = kind.as_str(), selector = %descriptor.primary_selector))]
    async fn execute(
        &self,
        kind: ActionKind,
        action_id: ActionId,
        descriptor: LocatorDescriptor,
        value: Option<&str>,
    ) -> Result<Option<String>, DriverError> {
        match self
            .attempt_primary(kind, &descriptor.primary_selector, value)
            .await
        {
            Ok(outcome) => Ok(outcome),
            Err(primary_err) => {
                warn!(error = %primary_err, "primary selector failed");
                self.heal(kind, &descriptor, value, primary_err).await
            }
        }
    }

    /// Linear fallback sequence: registry candidates in derived order, then
    /// the hint strategies for the action kind. No backtracking, one
    /// attempt per strategy, and on exhaustion the held primary error is
    /// returned unchanged.
    async fn heal(
        &self,
        kind: ActionKind,
        descriptor: &LocatorDescriptor,
        value: Option<&str>,
        primary_err: DriverError,
    ) -> Result<Option<String>, DriverError> {
        if !self.policy.allow_self_heal {
            debug!("self-heal disabled by policy");
            return Err(primary_err);
        }

        let plan = HealPlan::for_action(kind, descriptor, &self.registry);
        if plan.is_empty() {
            debug!("no fallback strategies available");
            return Err(primary_err);
        }

        for strategy in plan.strategies() {
            match self.attempt_strategy(kind, strategy, value).await {
                Ok(outcome) => {
                    let event = HealingEvent::new(&descriptor.primary_selector, strategy);
                    self.audit.record(&event).await;
                    return Ok(outcome);
                }
                Err(err) => {
                    warn!(
                        strategy = strategy.kind().name(),
                        query = %strategy.query(),
                        error = %err,
                        "fallback strategy failed"
                    );
                }
            }
        }

        Err(primary_err)
    }

    async fn attempt_primary(
        &self,
        kind: ActionKind,
        selector: &str,
        value: Option<&str>,
    ) -> Result<Option<String>, DriverError> {
        let timeouts = &self.policy.timeouts;
        let value = value.unwrap_or_default();
        match kind {
            ActionKind::Click => self
                .driver
                .click(selector, timeouts.primary())
                .await
                .map(|_| None),
            ActionKind::Fill => self
                .driver
                .fill(selector, value, timeouts.primary())
                .await
                .map(|_| None),
            ActionKind::WaitVisible => self
                .driver
                .wait_for_selector(selector, ElementState::Visible, timeouts.visibility())
                .await
                .map(|_| None),
            ActionKind::ReadText => self
                .driver
                .read_text_content(selector, timeouts.primary())
                .await
                .map(Some),
            ActionKind::WaitUrl => Err(strategy_mismatch("url waits bypass selector attempts")),
        }
    }

    async fn attempt_strategy(
        &self,
        kind: ActionKind,
        strategy: &HealStrategy,
        value: Option<&str>,
    ) -> Result<Option<String>, DriverError> {
        let timeouts = &self.policy.timeouts;
        let value = value.unwrap_or_default();
        match strategy {
            HealStrategy::RegistryCandidate(candidate) => {
                let selector = candidate.selector.as_str();
                match kind {
                    ActionKind::Click => self
                        .driver
                        .click(selector, timeouts.candidate())
                        .await
                        .map(|_| None),
                    ActionKind::Fill => self
                        .driver
                        .fill(selector, value, timeouts.candidate())
                        .await
                        .map(|_| None),
                    ActionKind::WaitVisible => self
                        .driver
                        .wait_for_selector(selector, ElementState::Visible, timeouts.candidate())
                        .await
                        .map(|_| None),
                    ActionKind::ReadText => self
                        .driver
                        .read_text_content(selector, timeouts.candidate())
                        .await
                        .map(Some),
                    ActionKind::WaitUrl => Err(strategy_mismatch("url waits never heal")),
                }
            }
            HealStrategy::RoleHint { role, name } => match kind {
                ActionKind::Click => self
                    .driver
                    .click_by_role(role, name, timeouts.hint())
                    .await
                    .map(|_| None),
                ActionKind::Fill => self
                    .driver
                    .fill_by_role(role, name, value, timeouts.hint())
                    .await
                    .map(|_| None),
                // Plans never pair role hints with other action kinds.
                _ => Err(strategy_mismatch("role hints apply to clicks and fills")),
            },
            HealStrategy::TextHint { text } => match kind {
                ActionKind::Click => self
                    .driver
                    .click_by_text(text, TextMatch::Substring, timeouts.hint())
                    .await
                    .map(|_| None),
                ActionKind::WaitVisible => self
                    .driver
                    .wait_for_text(text, TextMatch::Substring, timeouts.hint())
                    .await
                    .map(|_| None),
                _ => Err(strategy_mismatch(
                    "text hints apply to clicks and visibility waits",
                )),
            },
            HealStrategy::PlaceholderHint { text } => match kind {
                ActionKind::Fill => self
                    .driver
                    .fill_by_placeholder(text, value, timeouts.hint())
                    .await
                    .map(|_| None),
                _ => Err(strategy_mismatch("placeholder hints apply to fills")),
            },
        }
    }
}

fn descriptor_from(
    selector: &str,
    text_hint: Option<&str>,
    registry_key: Option<&str>,
) -> LocatorDescriptor {
    LocatorDescriptor {
        primary_selector: selector.to_string(),
        text_hint: text_hint.map(str::to_string),
        registry_key: registry_key.map(str::to_string),
    }
}

fn strategy_mismatch(hint: &str) -> DriverError {
    DriverError::new(DriverErrorKind::Internal).with_hint(hint)
}
