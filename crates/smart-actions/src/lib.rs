//! Self-healing actions over an abstract page driver.
//!
//! Each `smart_*` action tries its primary selector first. On failure the
//! facade walks an ordered fallback plan built by `selector-heal`: registry
//! candidates derived from a recorded markup snapshot, then semantic hint
//! queries suited to the action kind. The first strategy that succeeds
//! completes the action and emits one audit event; if every strategy fails
//! the caller receives the original primary error unchanged.
//!
//! The facade owns no browser. Callers supply a [`PageDriver`] for page
//! interaction and optionally a [`TestContext`] for report annotations.

pub mod actions;
pub mod audit;
pub mod policy;
pub mod ports;

pub use actions::{SmartActions, SmartActionsBuilder};
pub use audit::{AuditRecorder, HealingEvent, BROKEN_LOCATOR_ANNOTATION};
pub use policy::{ActionPolicy, ActionTimeouts, PolicyError};
pub use ports::{Annotation, AnnotationError, PageDriver, TestContext};
