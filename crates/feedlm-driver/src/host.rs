use crate::error::HostError;
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;

/// Opaque reference to an element found on the host page
///
/// Only valid for the action that immediately follows the lookup. The host
/// page re-renders freely between suspension points, so handles are never
/// kept across a wait.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Region of the page a query is restricted to
///
/// `Within` is re-resolved on every query: the root is the first element
/// matched by the first selector that matches anything. A missing root
/// yields no results rather than an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    Document,
    Within(Vec<String>),
}

impl Scope {
    pub fn within(selector: impl Into<String>) -> Self {
        Scope::Within(vec![selector.into()])
    }

    pub fn first_of<I, S>(selectors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scope::Within(selectors.into_iter().map(Into::into).collect())
    }

    pub fn describe(&self) -> String {
        match self {
            Scope::Document => "document".to_string(),
            Scope::Within(selectors) => selectors.join(" | "),
        }
    }
}

/// Snapshot of one element at query time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementInfo {
    pub handle: ElementHandle,
    /// Has a layout box (`offsetParent !== null` in a browser)
    pub visible: bool,
    /// Trimmed text content
    pub text: String,
    /// `aria-label`, if any
    pub label: Option<String>,
}

impl ElementInfo {
    /// Case-insensitive containment against text or accessible label.
    /// `needle` must already be lowercase.
    pub fn mentions(&self, needle: &str) -> bool {
        self.text.to_lowercase().contains(needle)
            || self
                .label
                .as_deref()
                .is_some_and(|label| label.to_lowercase().contains(needle))
    }
}

/// DOM primitives the driver needs from the page it automates
#[async_trait]
pub trait HostPage: Send + Sync {
    /// All elements in `scope` matching a CSS selector, in document order
    async fn query_all(&self, scope: &Scope, selector: &str) -> Result<Vec<ElementInfo>, HostError>;

    /// Nearest ancestor-or-self of `element` matching `selector`
    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementInfo>, HostError>;

    async fn click(&self, element: &ElementHandle) -> Result<(), HostError>;

    /// Focus, assign `value`, then dispatch bubbling `input` and `change`
    /// events so reactive frameworks observe the new value
    async fn fill(&self, element: &ElementHandle, value: &str) -> Result<(), HostError>;
}

#[async_trait]
impl<T: HostPage + ?Sized> HostPage for Arc<T> {
    async fn query_all(&self, scope: &Scope, selector: &str) -> Result<Vec<ElementInfo>, HostError> {
        (**self).query_all(scope, selector).await
    }

    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementInfo>, HostError> {
        (**self).closest(element, selector).await
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), HostError> {
        (**self).click(element).await
    }

    async fn fill(&self, element: &ElementHandle, value: &str) -> Result<(), HostError> {
        (**self).fill(element, value).await
    }
}
