//! Element lookup under dynamic rendering.
//!
//! A step names an ordered ladder of [`LocatorStrategy`] values. Every poll
//! tick tries the ladder top to bottom and the first hit wins, so the whole
//! ladder shares one timeout budget and adding a fallback is a config change.

use crate::error::{DriverError, HostError, Stage};
use crate::host::{ElementHandle, ElementInfo, HostPage, Scope};
use crate::poll::Poller;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Structural roles treated as plausibly clickable by content matching
pub const CLICKABLE_ROLES: &[&str] = &[
    "button",
    "[role=\"button\"]",
    "mat-chip",
    "mat-chip-option",
    ".mdc-evolution-chip",
];

/// Nodes that may carry the visible text one level below the click target
pub const NESTED_LABEL_SELECTOR: &str = "span, [aria-label], .mdc-button__label";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum LocatorStrategy {
    /// Stable attribute-based CSS selector
    Attribute { selector: String },
    /// Clickable role whose text or label contains `text`
    Content { roles: Vec<String>, text: String },
    /// Clickable ancestor of a descendant `marker` whose text is `marker_text`
    Marker {
        marker: String,
        marker_text: String,
        clickable: String,
    },
}

impl LocatorStrategy {
    pub fn attribute(selector: impl Into<String>) -> Self {
        LocatorStrategy::Attribute {
            selector: selector.into(),
        }
    }

    /// Content match over [`CLICKABLE_ROLES`]
    pub fn content(text: impl Into<String>) -> Self {
        LocatorStrategy::Content {
            roles: CLICKABLE_ROLES.iter().map(|r| r.to_string()).collect(),
            text: text.into(),
        }
    }

    pub fn marker(
        marker: impl Into<String>,
        marker_text: impl Into<String>,
        clickable: impl Into<String>,
    ) -> Self {
        LocatorStrategy::Marker {
            marker: marker.into(),
            marker_text: marker_text.into(),
            clickable: clickable.into(),
        }
    }

    /// Name of the first field that is blank and would match anything
    pub fn blank_field(&self) -> Option<&'static str> {
        match self {
            LocatorStrategy::Attribute { selector } if blank(selector) => Some("selector"),
            LocatorStrategy::Content { roles, .. }
                if roles.is_empty() || roles.iter().any(|r| blank(r)) =>
            {
                Some("roles")
            }
            LocatorStrategy::Content { text, .. } if blank(text) => Some("text"),
            LocatorStrategy::Marker { marker, .. } if blank(marker) => Some("marker"),
            LocatorStrategy::Marker { marker_text, .. } if blank(marker_text) => {
                Some("marker_text")
            }
            LocatorStrategy::Marker { clickable, .. } if blank(clickable) => Some("clickable"),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            LocatorStrategy::Attribute { selector } => selector.clone(),
            LocatorStrategy::Content { text, .. } => format!("clickable containing '{}'", text),
            LocatorStrategy::Marker {
                marker,
                marker_text,
                clickable,
            } => format!("{} above {} '{}'", clickable, marker, marker_text),
        }
    }
}

fn blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn describe_ladder(ladder: &[LocatorStrategy]) -> String {
    ladder
        .iter()
        .map(LocatorStrategy::describe)
        .collect::<Vec<_>>()
        .join(" or ")
}

pub struct Locator<'a, H: HostPage + ?Sized> {
    host: &'a H,
    poller: Poller<'a>,
}

impl<'a, H: HostPage + ?Sized> Locator<'a, H> {
    pub fn new(host: &'a H, poller: Poller<'a>) -> Self {
        Self { host, poller }
    }

    /// Wait for any strategy of `ladder` to find a visible element
    pub async fn locate(
        &self,
        stage: Stage,
        scope: &Scope,
        ladder: &[LocatorStrategy],
        timeout: Duration,
    ) -> Result<ElementHandle, DriverError> {
        let target = describe_ladder(ladder);
        tracing::debug!("Locating {} in {}", target, scope.describe());
        let this = self;
        self.poller
            .wait_until_present(stage, &target, timeout, move || {
                this.probe_ladder(scope, ladder)
            })
            .await
    }

    /// Wait until no strategy of `ladder` finds a visible element
    pub async fn wait_gone(
        &self,
        stage: Stage,
        scope: &Scope,
        ladder: &[LocatorStrategy],
        timeout: Duration,
    ) -> Result<(), DriverError> {
        let target = describe_ladder(ladder);
        let this = self;
        self.poller
            .wait_until_absent(stage, &target, timeout, move || {
                this.probe_ladder(scope, ladder)
            })
            .await
    }

    pub async fn by_attribute(
        &self,
        stage: Stage,
        scope: &Scope,
        selector: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, DriverError> {
        self.locate(stage, scope, &[LocatorStrategy::attribute(selector)], timeout)
            .await
    }

    pub async fn by_content(
        &self,
        stage: Stage,
        scope: &Scope,
        roles: &[String],
        text: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, DriverError> {
        let strategy = LocatorStrategy::Content {
            roles: roles.to_vec(),
            text: text.to_string(),
        };
        self.locate(stage, scope, &[strategy], timeout).await
    }

    pub async fn by_distinguishing_child(
        &self,
        stage: Stage,
        scope: &Scope,
        marker: &str,
        marker_text: &str,
        clickable: &str,
        timeout: Duration,
    ) -> Result<ElementHandle, DriverError> {
        let strategy = LocatorStrategy::marker(marker, marker_text, clickable);
        self.locate(stage, scope, &[strategy], timeout).await
    }

    /// One pass over the ladder without waiting
    pub async fn probe_ladder(
        &self,
        scope: &Scope,
        ladder: &[LocatorStrategy],
    ) -> Result<Option<ElementHandle>, HostError> {
        for strategy in ladder {
            if let Some(found) = self.probe(scope, strategy).await? {
                tracing::trace!("{} matched {}", strategy.describe(), found.handle);
                return Ok(Some(found.handle));
            }
        }
        Ok(None)
    }

    pub async fn probe(
        &self,
        scope: &Scope,
        strategy: &LocatorStrategy,
    ) -> Result<Option<ElementInfo>, HostError> {
        match strategy {
            LocatorStrategy::Attribute { selector } => self.probe_attribute(scope, selector).await,
            LocatorStrategy::Content { roles, text } => {
                self.probe_content(scope, roles, text).await
            }
            LocatorStrategy::Marker {
                marker,
                marker_text,
                clickable,
            } => {
                self.probe_marker(scope, marker, marker_text, clickable)
                    .await
            }
        }
    }

    async fn probe_attribute(
        &self,
        scope: &Scope,
        selector: &str,
    ) -> Result<Option<ElementInfo>, HostError> {
        let found = self.host.query_all(scope, selector).await?;
        Ok(found.into_iter().find(|info| info.visible))
    }

    async fn probe_content(
        &self,
        scope: &Scope,
        roles: &[String],
        text: &str,
    ) -> Result<Option<ElementInfo>, HostError> {
        if roles.is_empty() {
            return Ok(None);
        }
        let needle = text.to_lowercase();
        let clickable = roles.join(", ");

        let candidates = self.host.query_all(scope, &clickable).await?;
        if let Some(hit) = candidates
            .into_iter()
            .find(|info| info.visible && info.mentions(&needle))
        {
            return Ok(Some(hit));
        }

        // Component libraries often put the text in a child of the click target.
        for label in self.host.query_all(scope, NESTED_LABEL_SELECTOR).await? {
            if !label.mentions(&needle) {
                continue;
            }
            if let Some(target) = self.host.closest(&label.handle, &clickable).await? {
                if target.visible {
                    return Ok(Some(target));
                }
            }
        }
        Ok(None)
    }

    async fn probe_marker(
        &self,
        scope: &Scope,
        marker: &str,
        marker_text: &str,
        clickable: &str,
    ) -> Result<Option<ElementInfo>, HostError> {
        for candidate in self.host.query_all(scope, marker).await? {
            if candidate.text.trim() != marker_text {
                continue;
            }
            if let Some(target) = self.host.closest(&candidate.handle, clickable).await? {
                if target.visible {
                    return Ok(Some(target));
                }
            }
        }
        Ok(None)
    }
}
