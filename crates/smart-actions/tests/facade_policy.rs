use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use selector_heal::SelectorRegistry;
use smart_actions::{
    ActionPolicy, ActionTimeouts, Annotation, AnnotationError, PageDriver, SmartActions,
    TestContext,
};
use testward_core_types::{DriverError, DriverErrorKind, ElementState, TextMatch};

struct FakeDriver {
    succeed: HashSet<String>,
    calls: Mutex<Vec<(String, Duration)>>,
}

impl FakeDriver {
    fn new(succeed: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            succeed: succeed.iter().map(|s| s.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn keys(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    fn deadlines(&self) -> Vec<(String, Duration)> {
        self.calls.lock().unwrap().clone()
    }

    async fn attempt(&self, key: String, timeout: Duration) -> Result<(), DriverError> {
        self.calls.lock().unwrap().push((key.clone(), timeout));
        if self.succeed.contains(key.as_str()) {
            Ok(())
        } else {
            Err(DriverError::new(DriverErrorKind::TargetNotFound)
                .with_hint(format!("no element for {}", key)))
        }
    }
}

#[async_trait]
impl PageDriver for FakeDriver {
    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), DriverError> {
        self.attempt(format!("click:{}", selector), timeout).await
    }

    async fn fill(
        &self,
        selector: &str,
        _value: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.attempt(format!("fill:{}", selector), timeout).await
    }

    async fn wait_for_selector(
        &self,
        selector: &str,
        _state: ElementState,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.attempt(format!("wait:{}", selector), timeout).await
    }

    async fn read_text_content(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<String, DriverError> {
        self.attempt(format!("read:{}", selector), timeout).await?;
        Ok("Swag Labs".to_string())
    }

    async fn click_by_role(
        &self,
        role: &str,
        name: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.attempt(format!("click_role:{}:{}", role, name), timeout)
            .await
    }

    async fn click_by_text(
        &self,
        text: &str,
        _matching: TextMatch,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.attempt(format!("click_text:{}", text), timeout).await
    }

    async fn wait_for_text(
        &self,
        text: &str,
        _matching: TextMatch,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.attempt(format!("wait_text:{}", text), timeout).await
    }

    async fn fill_by_role(
        &self,
        role: &str,
        name: &str,
        _value: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.attempt(format!("fill_role:{}:{}", role, name), timeout)
            .await
    }

    async fn fill_by_placeholder(
        &self,
        placeholder: &str,
        _value: &str,
        timeout: Duration,
    ) -> Result<(), DriverError> {
        self.attempt(format!("fill_placeholder:{}", placeholder), timeout)
            .await
    }

    async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> Result<(), DriverError> {
        self.attempt(format!("wait_url:{}", pattern), timeout).await
    }
}

#[derive(Default)]
struct RecordingContext {
    annotations: Mutex<Vec<Annotation>>,
}

#[async_trait]
impl TestContext for RecordingContext {
    async fn add_annotation(&self, annotation: Annotation) -> Result<(), AnnotationError> {
        self.annotations.lock().unwrap().push(annotation);
        Ok(())
    }
}

struct FailingContext;

#[async_trait]
impl TestContext for FailingContext {
    async fn add_annotation(&self, _annotation: Annotation) -> Result<(), AnnotationError> {
        Err(AnnotationError("report stream closed".into()))
    }
}

fn registry() -> SelectorRegistry {
    SelectorRegistry::from_pairs([(
        "username_field",
        r#"<input placeholder="Username" data-test="username" id="user-name" name="user-name">"#,
    )])
}

#[tokio::test]
async fn disabled_healing_stops_at_the_primary_error() {
    let driver = FakeDriver::new(&[]);
    let context = Arc::new(RecordingContext::default());
    let policy = ActionPolicy {
        allow_self_heal: false,
        ..ActionPolicy::default()
    };
    let actions = SmartActions::builder()
        .with_driver(driver.clone())
        .with_registry(registry())
        .with_context(context.clone())
        .with_policy(policy)
        .build();

    let err = actions
        .smart_click("#stale", Some("login"), Some("username_field"))
        .await
        .unwrap_err();

    assert_eq!(driver.keys(), vec!["click:#stale"]);
    assert_eq!(err.hint.as_deref(), Some("no element for click:#stale"));
    assert!(context.annotations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn url_waits_use_the_glob_pattern_and_never_heal() {
    let driver = FakeDriver::new(&[]);
    let context = Arc::new(RecordingContext::default());
    let actions = SmartActions::builder()
        .with_driver(driver.clone())
        .with_registry(registry())
        .with_context(context.clone())
        .build();

    let err = actions
        .smart_wait_for_url_contains("inventory.html", Some("post-login"), Some("username_field"))
        .await
        .unwrap_err();

    assert_eq!(
        driver.deadlines(),
        vec![(
            "wait_url:**/*inventory.html*".to_string(),
            Duration::from_secs(10)
        )]
    );
    assert_eq!(
        err.hint.as_deref(),
        Some("no element for wait_url:**/*inventory.html*")
    );
    assert!(context.annotations.lock().unwrap().is_empty());
}

#[tokio::test]
async fn url_wait_success_is_silent() {
    let driver = FakeDriver::new(&["wait_url:**/*inventory.html*"]);
    let actions = SmartActions::builder().with_driver(driver.clone()).build();

    actions
        .smart_wait_for_url_contains("inventory.html", None, None)
        .await
        .unwrap();

    assert_eq!(driver.keys(), vec!["wait_url:**/*inventory.html*"]);
}

#[tokio::test]
async fn read_text_heals_through_registry_candidates_only() {
    let driver = FakeDriver::new(&["read:#user-name"]);
    let context = Arc::new(RecordingContext::default());
    let actions = SmartActions::builder()
        .with_driver(driver.clone())
        .with_registry(registry())
        .with_context(context.clone())
        .build();

    let text = actions
        .smart_read_text(".legacy-label", Some("username_field"))
        .await
        .unwrap();

    assert_eq!(text, "Swag Labs");
    assert_eq!(driver.keys(), vec!["read:.legacy-label", "read:#user-name"]);
    assert_eq!(context.annotations.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn annotation_sink_failure_keeps_the_action_green() {
    let driver = FakeDriver::new(&["click_text:login"]);
    let actions = SmartActions::builder()
        .with_driver(driver.clone())
        .with_context(Arc::new(FailingContext))
        .build();

    actions
        .smart_click("#stale", Some("login"), None)
        .await
        .unwrap();
}

#[tokio::test]
async fn configured_deadlines_reach_the_driver() {
    let driver = FakeDriver::new(&["click:#login"]);
    let policy = ActionPolicy {
        timeouts: ActionTimeouts {
            primary_ms: 250,
            ..ActionTimeouts::default()
        },
        ..ActionPolicy::default()
    };
    let actions = SmartActions::builder()
        .with_driver(driver.clone())
        .with_policy(policy)
        .build();

    actions.smart_click("#login", None, None).await.unwrap();

    assert_eq!(
        driver.deadlines(),
        vec![("click:#login".to_string(), Duration::from_millis(250))]
    );
}

#[tokio::test]
async fn bare_selectors_fail_without_fallback_attempts() {
    let driver = FakeDriver::new(&[]);
    let actions = SmartActions::builder().with_driver(driver.clone()).build();

    let err = actions.smart_click("#nope", None, None).await.unwrap_err();

    assert_eq!(driver.keys(), vec!["click:#nope"]);
    assert_eq!(err.kind, DriverErrorKind::TargetNotFound);
}
