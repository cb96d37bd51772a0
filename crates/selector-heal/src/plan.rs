//! Ordered healing plans

use testward_core_types::ActionKind;
use tracing::debug;

use crate::candidates::derive_candidates;
use crate::registry::SelectorRegistry;
use crate::types::{HealStrategy, LocatorDescriptor};

/// Accessible role queried when healing a click through a hint.
pub const CLICK_ROLE: &str = "button";
/// Accessible role queried when healing a fill through a hint.
pub const FILL_ROLE: &str = "textbox";

/// The ordered fallback strategies for one action.
///
/// Registry candidates always precede hint strategies: candidates are
/// structurally derived from a previously valid element, hints are a broader
/// match kept as a last resort. The engine consumes the list front to back
/// with no backtracking.
#[derive(Debug, Clone, Default)]
pub struct HealPlan {
    strategies: Vec<HealStrategy>,
}

impl HealPlan {
    pub fn for_action(
        kind: ActionKind,
        descriptor: &LocatorDescriptor,
        registry: &SelectorRegistry,
    ) -> Self {
        // Url waits are not selector-based; nothing can heal them.
        if matches!(kind, ActionKind::WaitUrl) {
            return Self::default();
        }

        let mut strategies = Vec::new();

        if let Some(key) = descriptor.registry_key.as_deref() {
            match registry.snapshot(key) {
                Some(snapshot) => {
                    let candidates = derive_candidates(snapshot);
                    debug!(key, count = candidates.len(), "derived registry candidates");
                    strategies.extend(candidates.into_iter().map(HealStrategy::RegistryCandidate));
                }
                None => debug!(key, "registry key not found, skipping candidate stage"),
            }
        }

        if let Some(hint) = descriptor.text_hint.as_deref() {
            strategies.extend(hint_strategies(kind, hint));
        }

        Self { strategies }
    }

    pub fn strategies(&self) -> &[HealStrategy] {
        &self.strategies
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }
}

fn hint_strategies(kind: ActionKind, hint: &str) -> Vec<HealStrategy> {
    match kind {
        ActionKind::Click => vec![
            HealStrategy::RoleHint {
                role: CLICK_ROLE.to_string(),
                name: hint.to_string(),
            },
            HealStrategy::TextHint {
                text: hint.to_string(),
            },
        ],
        // Fills need a single unambiguous target, so there is no free-text
        // fallback after the placeholder query.
        ActionKind::Fill => vec![
            HealStrategy::RoleHint {
                role: FILL_ROLE.to_string(),
                name: hint.to_string(),
            },
            HealStrategy::PlaceholderHint {
                text: hint.to_string(),
            },
        ],
        ActionKind::WaitVisible => vec![HealStrategy::TextHint {
            text: hint.to_string(),
        }],
        // Reads have no textual identity to match; url waits never reach here.
        ActionKind::ReadText | ActionKind::WaitUrl => Vec::new(),
    }
}
