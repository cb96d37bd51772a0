use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use testward_core_types::{DriverError, ElementState, TextMatch};

/// Browser driver capability consumed by the facade.
///
/// Every call carries its own deadline; the engine never wraps attempts in
/// an outer timeout, so worst-case latency is the sum of the per-attempt
/// deadlines it passes in.
#[async_trait]
pub trait PageDriver: Send + Sync {
    async fn click(&self, selector: &str, timeout: Duration) -> Result<(), DriverError>;

    async fn fill(
        &self,
        selector: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    async fn wait_for_selector(
        &self,
        selector: &str,
        state: ElementState,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    async fn read_text_content(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<String, DriverError>;

    async fn click_by_role(
        &self,
        role: &str,
        name: &str,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    async fn click_by_text(
        &self,
        text: &str,
        matching: TextMatch,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    async fn wait_for_text(
        &self,
        text: &str,
        matching: TextMatch,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    async fn fill_by_role(
        &self,
        role: &str,
        name: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    async fn fill_by_placeholder(
        &self,
        placeholder: &str,
        value: &str,
        timeout: Duration,
    ) -> Result<(), DriverError>;

    async fn wait_for_url(&self, pattern: &str, timeout: Duration) -> Result<(), DriverError>;
}

/// Structured note appended to the enclosing test's execution record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Annotation {
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Error, Clone)]
#[error("failed to append annotation: {0}")]
pub struct AnnotationError(pub String);

/// Ambient test execution context, e.g. a test runner's report stream.
#[async_trait]
pub trait TestContext: Send + Sync {
    async fn add_annotation(&self, annotation: Annotation) -> Result<(), AnnotationError>;
}
