//! Core types for the healing data layer

use serde::{Deserialize, Serialize};

/// Element reference supplied by the caller for a single action.
///
/// Built per call and discarded afterwards; it never outlives the action
/// that created it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocatorDescriptor {
    /// First-choice structural selector.
    pub primary_selector: String,

    /// Natural-language fallback description of the element.
    pub text_hint: Option<String>,

    /// Key into the selector registry for candidate derivation.
    pub registry_key: Option<String>,
}

impl LocatorDescriptor {
    pub fn new(primary_selector: impl Into<String>) -> Self {
        Self {
            primary_selector: primary_selector.into(),
            text_hint: None,
            registry_key: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.text_hint = Some(hint.into());
        self
    }

    pub fn with_registry_key(mut self, key: impl Into<String>) -> Self {
        self.registry_key = Some(key.into());
        self
    }
}

/// Attribute a candidate selector was derived from, in fixed priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceAttribute {
    Id,
    DataTest,
    Name,
    Placeholder,
}

impl SourceAttribute {
    /// All source attributes, most stable first. Candidate lists follow
    /// this order exactly.
    pub const fn priority_order() -> [SourceAttribute; 4] {
        [
            SourceAttribute::Id,
            SourceAttribute::DataTest,
            SourceAttribute::Name,
            SourceAttribute::Placeholder,
        ]
    }

    /// The markup attribute name this variant matches.
    pub fn attribute_name(&self) -> &'static str {
        match self {
            SourceAttribute::Id => "id",
            SourceAttribute::DataTest => "data-test",
            SourceAttribute::Name => "name",
            SourceAttribute::Placeholder => "placeholder",
        }
    }

    pub(crate) fn from_attribute_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "id" => Some(SourceAttribute::Id),
            "data-test" => Some(SourceAttribute::DataTest),
            "name" => Some(SourceAttribute::Name),
            "placeholder" => Some(SourceAttribute::Placeholder),
            _ => None,
        }
    }

    /// Render the concrete selector for an extracted attribute value.
    pub fn selector_for(&self, value: &str) -> String {
        match self {
            SourceAttribute::Id => format!("#{}", value),
            other => format!(
                "[{}=\"{}\"]",
                other.attribute_name(),
                escape_attribute_value(value)
            ),
        }
    }
}

/// Concrete selector derived from a markup snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub selector: String,
    pub source: SourceAttribute,
}

impl Candidate {
    pub fn new(source: SourceAttribute, value: &str) -> Self {
        Self {
            selector: source.selector_for(value),
            source,
        }
    }
}

/// Strategy tag recorded in audit events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StrategyKind {
    RegistryCandidate,
    RoleHint,
    TextHint,
    PlaceholderHint,
}

impl StrategyKind {
    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::RegistryCandidate => "registry-candidate",
            StrategyKind::RoleHint => "role-hint",
            StrategyKind::TextHint => "text-hint",
            StrategyKind::PlaceholderHint => "placeholder-hint",
        }
    }
}

/// One fallback attempt in a healing plan.
///
/// Each variant carries the data needed both to attempt the action and to
/// describe itself in an audit record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealStrategy {
    RegistryCandidate(Candidate),
    RoleHint { role: String, name: String },
    TextHint { text: String },
    PlaceholderHint { text: String },
}

impl HealStrategy {
    pub fn kind(&self) -> StrategyKind {
        match self {
            HealStrategy::RegistryCandidate(_) => StrategyKind::RegistryCandidate,
            HealStrategy::RoleHint { .. } => StrategyKind::RoleHint,
            HealStrategy::TextHint { .. } => StrategyKind::TextHint,
            HealStrategy::PlaceholderHint { .. } => StrategyKind::PlaceholderHint,
        }
    }

    /// The selector or semantic query this strategy resolves through.
    pub fn query(&self) -> String {
        match self {
            HealStrategy::RegistryCandidate(candidate) => candidate.selector.clone(),
            HealStrategy::RoleHint { role, name } => format!("role={}[name=\"{}\"]", role, name),
            HealStrategy::TextHint { text } => format!("text=\"{}\"", text),
            HealStrategy::PlaceholderHint { text } => format!("placeholder=\"{}\"", text),
        }
    }

    /// Human-readable account of a successful heal, written into the
    /// annotation attached to the enclosing test.
    pub fn describe(&self, original_selector: &str) -> String {
        match self {
            HealStrategy::RegistryCandidate(candidate) => format!(
                "Original selector '{}' failed. Healed using registry candidate '{}'.",
                original_selector, candidate.selector
            ),
            HealStrategy::RoleHint { role, name } => format!(
                "Original selector '{}' failed. Healed using {} role named \"{}\".",
                original_selector, role, name
            ),
            HealStrategy::TextHint { text } => format!(
                "Original selector '{}' failed. Healed using text hint: \"{}\".",
                original_selector, text
            ),
            HealStrategy::PlaceholderHint { text } => format!(
                "Original selector '{}' failed. Healed using placeholder hint: \"{}\".",
                original_selector, text
            ),
        }
    }
}

fn escape_attribute_value(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selector_rendering_per_attribute() {
        assert_eq!(SourceAttribute::Id.selector_for("user-name"), "#user-name");
        assert_eq!(
            SourceAttribute::DataTest.selector_for("username"),
            "[data-test=\"username\"]"
        );
        assert_eq!(
            SourceAttribute::Name.selector_for("user-name"),
            "[name=\"user-name\"]"
        );
        assert_eq!(
            SourceAttribute::Placeholder.selector_for("Username"),
            "[placeholder=\"Username\"]"
        );
    }

    #[test]
    fn attribute_values_are_escaped() {
        assert_eq!(
            SourceAttribute::Name.selector_for(r#"say "hi""#),
            r#"[name="say \"hi\""]"#
        );
        assert_eq!(
            SourceAttribute::Placeholder.selector_for(r"a\b"),
            r#"[placeholder="a\\b"]"#
        );
    }

    #[test]
    fn strategy_kind_names() {
        assert_eq!(StrategyKind::RegistryCandidate.name(), "registry-candidate");
        assert_eq!(StrategyKind::RoleHint.name(), "role-hint");
        assert_eq!(StrategyKind::TextHint.name(), "text-hint");
        assert_eq!(StrategyKind::PlaceholderHint.name(), "placeholder-hint");
    }

    #[test]
    fn describe_quotes_the_original_selector() {
        let strategy = HealStrategy::TextHint {
            text: "login button".into(),
        };
        let description = strategy.describe("[data-test=\"old-login\"]");
        assert!(description.contains("'[data-test=\"old-login\"]'"));
        assert!(description.contains("text hint: \"login button\""));
    }
}
