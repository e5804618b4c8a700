//! [`HostPage`] over a live Chrome tab.
//!
//! Elements are tagged with a `data-feedlm-handle` attribute the first time a
//! query returns them, and the handle is that attribute's value. An element
//! that has been re-rendered loses its tag, so acting on an old handle finds
//! nothing and fails with [`HostError::StaleHandle`].

use crate::error::host_error;
use async_trait::async_trait;
use chromiumoxide::Page;
use feedlm_driver::{ElementHandle, ElementInfo, HostError, HostPage, Scope};
use serde::Deserialize;
use serde_json::Value;

const PRELUDE: &str = r#"
const ATTR = 'data-feedlm-handle';
const describe = (el) => {
  let id = el.getAttribute(ATTR);
  if (!id) {
    window.__feedlmSeq = (window.__feedlmSeq || 0) + 1;
    id = 'fl-' + window.__feedlmSeq;
    el.setAttribute(ATTR, id);
  }
  return {
    handle: id,
    visible: el.offsetParent !== null,
    text: (el.textContent || '').trim(),
    label: el.getAttribute('aria-label'),
  };
};
const lookup = (id) => document.querySelector('[' + ATTR + '=' + JSON.stringify(id) + ']');
const scopeRoot = (scopes) => {
  if (scopes === null) return document;
  for (const s of scopes) {
    const el = document.querySelector(s);
    if (el) return el;
  }
  return null;
};
const guard = (f) => {
  try {
    return f();
  } catch (e) {
    return { status: 'invalid', message: String((e && e.message) || e) };
  }
};
const queryAll = (scopes, selector) => guard(() => {
  const root = scopeRoot(scopes);
  if (!root) return { status: 'elements', elements: [] };
  return { status: 'elements', elements: Array.from(root.querySelectorAll(selector)).map(describe) };
});
const closest = (id, selector) => guard(() => {
  const el = lookup(id);
  if (!el) return { status: 'stale' };
  const found = el.closest(selector);
  return { status: 'element', element: found ? describe(found) : null };
});
const click = (id) => guard(() => {
  const el = lookup(id);
  if (!el) return { status: 'stale' };
  el.click();
  return { status: 'done' };
});
const fill = (id, value) => guard(() => {
  const el = lookup(id);
  if (!el) return { status: 'stale' };
  el.focus();
  el.value = value;
  el.dispatchEvent(new Event('input', { bubbles: true, cancelable: true }));
  el.dispatchEvent(new Event('change', { bubbles: true, cancelable: true }));
  return { status: 'done' };
});
"#;

#[derive(Debug, Deserialize)]
struct RawElement {
    handle: String,
    visible: bool,
    text: String,
    label: Option<String>,
}

impl From<RawElement> for ElementInfo {
    fn from(raw: RawElement) -> Self {
        ElementInfo {
            handle: ElementHandle::new(raw.handle),
            visible: raw.visible,
            text: raw.text,
            label: raw.label,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum Reply {
    Elements { elements: Vec<RawElement> },
    Element { element: Option<RawElement> },
    Done,
    Stale,
    Invalid { message: String },
}

/// A Chrome tab the driver can automate
#[derive(Debug, Clone)]
pub struct CdpHost {
    page: Page,
}

impl CdpHost {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    async fn call(&self, call: String) -> Result<Reply, HostError> {
        let script = wrap(&call);
        let result = self.page.evaluate(script).await.map_err(host_error)?;
        let reply: Reply = result
            .into_value()
            .map_err(|e| HostError::Script(format!("unexpected reply to {}: {}", call, e)))?;
        match reply {
            Reply::Invalid { message } => Err(HostError::Script(message)),
            other => Ok(other),
        }
    }

    async fn act(&self, element: &ElementHandle, call: String) -> Result<(), HostError> {
        match self.call(call).await? {
            Reply::Done => Ok(()),
            Reply::Stale => Err(HostError::StaleHandle(element.to_string())),
            other => Err(unexpected(other)),
        }
    }
}

fn wrap(call: &str) -> String {
    format!("(() => {{\n{}\nreturn {};\n}})()", PRELUDE, call)
}

/// JS literal for a string argument
fn literal(value: &str) -> String {
    Value::String(value.to_string()).to_string()
}

fn scope_literal(scope: &Scope) -> String {
    match scope {
        Scope::Document => "null".to_string(),
        Scope::Within(selectors) => Value::from(selectors.clone()).to_string(),
    }
}

fn unexpected(reply: Reply) -> HostError {
    HostError::Script(format!("unexpected reply: {:?}", reply))
}

#[async_trait]
impl HostPage for CdpHost {
    async fn query_all(&self, scope: &Scope, selector: &str) -> Result<Vec<ElementInfo>, HostError> {
        let call = format!("queryAll({}, {})", scope_literal(scope), literal(selector));
        match self.call(call).await? {
            Reply::Elements { elements } => Ok(elements.into_iter().map(Into::into).collect()),
            other => Err(unexpected(other)),
        }
    }

    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementInfo>, HostError> {
        let call = format!("closest({}, {})", literal(element.as_str()), literal(selector));
        match self.call(call).await? {
            Reply::Element { element } => Ok(element.map(Into::into)),
            Reply::Stale => Err(HostError::StaleHandle(element.to_string())),
            other => Err(unexpected(other)),
        }
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), HostError> {
        let call = format!("click({})", literal(element.as_str()));
        self.act(element, call).await
    }

    async fn fill(&self, element: &ElementHandle, value: &str) -> Result<(), HostError> {
        let call = format!("fill({}, {})", literal(element.as_str()), literal(value));
        self.act(element, call).await
    }
}
