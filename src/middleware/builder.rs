//! Ordered, name-addressable middleware lists.
//!
//! The order of the built list is the composition order: the first entry is
//! the outermost layer.

use std::sync::Arc;

use super::wrap::{WrapOptions, wrap_language_model};
use super::{LanguageModelMiddleware, NamedMiddleware};
use crate::traits::LanguageModel;

/// Fluent builder for middleware chains.
///
/// Operations naming a missing target log a warning and leave the chain
/// unchanged. Names are unique; adding a name twice keeps the first entry.
///
/// ```rust,ignore
/// let chain = MiddlewareBuilder::new()
///     .add("defaults", Arc::new(DefaultSettingsMiddleware::new(settings)))
///     .add("json", Arc::new(ExtractJsonMiddleware::default()))
///     .insert_before("json", "reasoning", Arc::new(ExtractReasoningMiddleware::default()))
///     .build();
/// ```
#[derive(Clone, Default)]
pub struct MiddlewareBuilder {
    middlewares: Vec<NamedMiddleware>,
}

impl MiddlewareBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.middlewares.iter().position(|m| m.name == name)
    }

    /// Append to the end of the chain (innermost so far).
    pub fn add(
        self,
        name: impl Into<String>,
        middleware: Arc<dyn LanguageModelMiddleware>,
    ) -> Self {
        self.add_named(NamedMiddleware::new(name, middleware))
    }

    pub fn add_named(mut self, named: NamedMiddleware) -> Self {
        if self.contains(&named.name) {
            tracing::warn!(
                middleware = %named.name,
                "middleware already present, not added again"
            );
        } else {
            self.middlewares.push(named);
        }
        self
    }

    pub fn insert_before(
        self,
        target: &str,
        name: impl Into<String>,
        middleware: Arc<dyn LanguageModelMiddleware>,
    ) -> Self {
        self.insert_at_target(target, 0, NamedMiddleware::new(name, middleware))
    }

    pub fn insert_after(
        self,
        target: &str,
        name: impl Into<String>,
        middleware: Arc<dyn LanguageModelMiddleware>,
    ) -> Self {
        self.insert_at_target(target, 1, NamedMiddleware::new(name, middleware))
    }

    fn insert_at_target(mut self, target: &str, offset: usize, named: NamedMiddleware) -> Self {
        if self.contains(&named.name) {
            tracing::warn!(middleware = %named.name, "middleware already present, not inserted");
            return self;
        }
        match self.position(target) {
            Some(index) => self.middlewares.insert(index + offset, named),
            None => tracing::warn!(
                target_name = %target,
                middleware = %named.name,
                "insert target not found"
            ),
        }
        self
    }

    pub fn remove(mut self, name: &str) -> Self {
        match self.position(name) {
            Some(index) => {
                self.middlewares.remove(index);
            }
            None => tracing::warn!(middleware = %name, "middleware to remove not found"),
        }
        self
    }

    /// Swap the implementation behind `name`, keeping its position.
    pub fn replace(mut self, name: &str, middleware: Arc<dyn LanguageModelMiddleware>) -> Self {
        match self.middlewares.iter_mut().find(|m| m.name == name) {
            Some(entry) => entry.middleware = middleware,
            None => tracing::warn!(middleware = %name, "middleware to replace not found"),
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Names in composition order.
    pub fn names(&self) -> Vec<&str> {
        self.middlewares.iter().map(|m| m.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }

    pub fn middlewares(&self) -> &[NamedMiddleware] {
        &self.middlewares
    }

    pub fn build(self) -> Vec<Arc<dyn LanguageModelMiddleware>> {
        self.middlewares.into_iter().map(|m| m.middleware).collect()
    }

    /// Build and compose around `model` in one step.
    pub fn wrap(
        self,
        model: Arc<dyn LanguageModel>,
        options: WrapOptions,
    ) -> Arc<dyn LanguageModel> {
        wrap_language_model(model, self.build(), options)
    }
}

impl std::fmt::Debug for MiddlewareBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MiddlewareBuilder")
            .field("names", &self.names())
            .finish()
    }
}
