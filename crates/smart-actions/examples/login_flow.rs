//! Login flow with stale selectors
//!
//! An in-memory page stands in for a real browser. The page object still
//! references selectors from before a frontend redesign, so the facade
//! heals each action through registry candidates or semantic hints and a
//! console context prints the resulting annotations.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use selector_heal::SelectorRegistry;
use smart_actions::{Annotation, AnnotationError, PageDriver, SmartActions, TestContext};
use testward_core_types::{DriverError, DriverErrorKind, ElementState, TextMatch};

/// Page markup after the redesign. Only the listed selectors, roles and
/// placeholders still resolve.
struct DemoPage {
    selectors: HashSet<&'static str>,
    roles: HashSet<(&'static str, &'static str)>,
    placeholders: HashSet<&'static str>,
}

impl DemoPage {
    fn after_redesign() -> Self {
        Self {
            selectors: [".login_logo", "#user-name", ".title"].into_iter().collect(),
            roles: [("button", "Login")].into_iter().collect(),
            placeholders: ["Password"].into_iter().collect(),
        }
    }

    fn resolve(&self, present: bool, what: String) -> Result<(), DriverError> {
        if present {
            println!("  page: {}", what);
            Ok(())
        } else {
            Err(DriverError::new(DriverErrorKind::TargetNotFound).with_hint(what))
        }
    }
}

#[async_trait]
impl PageDriver for DemoPage {
    async fn click(&self, selector: &str, _timeout: Duration) -> Result<(), DriverError> {
        self.resolve(self.selectors.contains(selector), format!("click {}", selector))
    }

    async fn fill(
        &self,
        selector: &str,
        value: &str,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        self.resolve(
            self.selectors.contains(selector),
            format!("fill {} = {}", selector, value),
        )
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        _state: ElementState,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        self.resolve(self.selectors.contains(selector), format!("wait {}", selector))
    }

    async fn read_text_content(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<String, DriverError> {
        if selector == ".title" {
            Ok("Products".to_string())
        } else {
            Err(DriverError::new(DriverErrorKind::TargetNotFound)
                .with_hint(format!("read {}", selector)))
        }
    }

    async fn click_by_role(
        &self,
        role: &str,
        name: &str,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        self.resolve(
            self.roles.contains(&(role, name)),
            format!("click role {} \"{}\"", role, name),
        )
    }

    async fn click_by_text(
        &self,
        text: &str,
        _matching: TextMatch,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        self.resolve(false, format!("click text \"{}\"", text))
    }

    async fn wait_for_text(
        &self,
        text: &str,
        _matching: TextMatch,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        self.resolve(false, format!("wait text \"{}\"", text))
    }

    async fn fill_by_role(
        &self,
        role: &str,
        name: &str,
        value: &str,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        self.resolve(
            self.roles.contains(&(role, name)),
            format!("fill role {} \"{}\" = {}", role, name, value),
        )
    }

    async fn fill_by_placeholder(
        &self,
        placeholder: &str,
        value: &str,
        _timeout: Duration,
    ) -> Result<(), DriverError> {
        self.resolve(
            self.placeholders.contains(placeholder),
            format!("fill placeholder \"{}\" = {}", placeholder, value),
        )
    }

    async fn wait_for_url(&self, pattern: &str, _timeout: Duration) -> Result<(), DriverError> {
        println!("  page: url matches {}", pattern);
        Ok(())
    }
}

/// Prints healing annotations the way a test reporter would attach them.
struct ConsoleContext;

#[async_trait]
impl TestContext for ConsoleContext {
    async fn add_annotation(&self, annotation: Annotation) -> Result<(), AnnotationError> {
        println!("  ⚠️  [{}] {}", annotation.kind, annotation.description);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<(), DriverError> {
    // Snapshot recorded before the redesign; its id attribute still exists
    // on the live page, so it yields the winning candidate.
    let registry = SelectorRegistry::from_pairs([(
        "username_field",
        r#"<input placeholder="Username" data-test="username" id="user-name" name="user-name">"#,
    )]);

    let actions = SmartActions::builder()
        .with_driver(Arc::new(DemoPage::after_redesign()))
        .with_registry(registry)
        .with_context(Arc::new(ConsoleContext))
        .build();

    println!("=== login flow ===");

    actions
        .smart_wait_for_visibility(".login_logo", Some("Swag Shop"), None)
        .await?;

    // Heals via the registry candidate "#user-name".
    actions
        .smart_fill(
            "#username-input",
            "standard_user",
            Some("Username"),
            Some("username_field"),
        )
        .await?;

    // No registry entry; heals via the placeholder hint.
    actions
        .smart_fill("#password-input", "secret_sauce", Some("Password"), None)
        .await?;

    // Heals via the button role.
    actions.smart_click("#login-btn", Some("Login"), None).await?;

    actions
        .smart_wait_for_url_contains("inventory.html", Some("after login"), None)
        .await?;

    let title = actions.smart_read_text(".title", None).await?;
    println!("✅ logged in, page title: {}", title);

    Ok(())
}
