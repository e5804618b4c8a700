#![allow(dead_code)]

use async_trait::async_trait;
use feedlm_core::{AutomationEvent, WorkItem};
use feedlm_driver::{
    DriverConfig, ElementHandle, ElementInfo, EventSink, HostError, HostPage, Scope, SinkError,
};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Something the driver did to the fake page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Click(&'static str),
    Fill(&'static str, String),
}

type Hook = Box<dyn Fn(&Action) + Send + Sync>;

struct Node {
    name: &'static str,
    selectors: Vec<&'static str>,
    parent: Option<usize>,
    shown: bool,
    hide_at: Option<Instant>,
    text: &'static str,
    label: Option<&'static str>,
    value: String,
}

struct State {
    nodes: Vec<Node>,
    actions: Vec<Action>,
    inserted: Vec<String>,
    accept_delay: Option<Duration>,
}

/// In-memory stand-in for the notebook's "add source" composer
///
/// Clicking the add button shows the dialog; clicking the YouTube chip shows
/// the link field and insert button; insert hides the dialog after
/// `accept_delay`, which is when the driver sees completion.
pub struct FakeNotebook {
    state: Mutex<State>,
    hook: Mutex<Option<Hook>>,
}

fn node(
    name: &'static str,
    selectors: &[&'static str],
    parent: Option<usize>,
    shown: bool,
    text: &'static str,
) -> Node {
    Node {
        name,
        selectors: selectors.to_vec(),
        parent,
        shown,
        hide_at: None,
        text,
        label: None,
        value: String::new(),
    }
}

impl FakeNotebook {
    pub fn new() -> Self {
        let nodes = vec![
            node(
                "add-source",
                &["button.add-source-button", "button"],
                None,
                true,
                "Add source",
            ),
            node("dialog", &["mat-dialog-container"], None, false, ""),
            node(
                "youtube-chip",
                &["mat-chip[tabindex=\"0\"]", "mat-chip"],
                Some(1),
                true,
                "",
            ),
            node("youtube-icon", &["mat-icon"], Some(2), true, "video_youtube"),
            node("youtube-label", &["span"], Some(2), true, "YouTube"),
            node(
                "website-chip",
                &["mat-chip[tabindex=\"0\"]", "mat-chip"],
                Some(1),
                true,
                "",
            ),
            node("website-icon", &["mat-icon"], Some(5), true, "web"),
            node("website-label", &["span"], Some(5), true, "Website"),
            node(
                "url-input",
                &["input[formcontrolname=\"newUrl\"]", "input"],
                Some(1),
                false,
                "",
            ),
            node(
                "insert",
                &["button[type=\"submit\"]", "button"],
                Some(1),
                false,
                "Insert",
            ),
        ];
        Self {
            state: Mutex::new(State {
                nodes,
                actions: Vec::new(),
                inserted: Vec::new(),
                accept_delay: Some(Duration::from_millis(800)),
            }),
            hook: Mutex::new(None),
        }
    }

    /// The host UI changed and the add button is gone
    pub fn without_add_button(self) -> Self {
        self.edit("add-source", |n| n.selectors = vec!["button.renamed-add-button"]);
        self
    }

    /// Chips lose their icons; only the nested text identifies them
    pub fn without_chip_icons(self) -> Self {
        self.edit("youtube-icon", |n| n.text = "");
        self.edit("website-icon", |n| n.text = "");
        self
    }

    pub fn with_accept_delay(self, delay: Duration) -> Self {
        self.lock().accept_delay = Some(delay);
        self
    }

    /// Insert is clicked but the host never finishes processing
    pub fn never_accepts(self) -> Self {
        self.lock().accept_delay = None;
        self
    }

    /// Run `hook` after every action the driver performs
    pub fn on_action(&self, hook: impl Fn(&Action) + Send + Sync + 'static) {
        *self.hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn actions(&self) -> Vec<Action> {
        self.lock().actions.clone()
    }

    pub fn clicks(&self, name: &str) -> usize {
        self.lock()
            .actions
            .iter()
            .filter(|a| matches!(a, Action::Click(n) if *n == name))
            .count()
    }

    pub fn inserted(&self) -> Vec<String> {
        self.lock().inserted.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    fn edit(&self, name: &str, f: impl FnOnce(&mut Node)) {
        let mut state = self.lock();
        let idx = state.index_of(name);
        f(&mut state.nodes[idx]);
    }

    fn record(&self, action: Action) {
        self.lock().actions.push(action.clone());
        if let Some(hook) = self.hook.lock().unwrap().as_ref() {
            hook(&action);
        }
    }
}

impl State {
    fn index_of(&self, name: &str) -> usize {
        self.nodes.iter().position(|n| n.name == name).unwrap()
    }

    fn self_shown(&self, idx: usize) -> bool {
        let node = &self.nodes[idx];
        node.shown && node.hide_at.is_none_or(|at| Instant::now() < at)
    }

    fn visible(&self, idx: usize) -> bool {
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            if !self.self_shown(i) {
                return false;
            }
            cursor = self.nodes[i].parent;
        }
        true
    }

    fn matches(&self, idx: usize, selector: &str) -> bool {
        selector
            .split(',')
            .map(str::trim)
            .any(|s| self.nodes[idx].selectors.iter().any(|own| *own == s))
    }

    fn is_descendant(&self, idx: usize, root: usize) -> bool {
        let mut cursor = self.nodes[idx].parent;
        while let Some(i) = cursor {
            if i == root {
                return true;
            }
            cursor = self.nodes[i].parent;
        }
        false
    }

    fn resolve(&self, scope: &Scope) -> Option<Option<usize>> {
        match scope {
            Scope::Document => Some(None),
            Scope::Within(selectors) => selectors
                .iter()
                .find_map(|s| (0..self.nodes.len()).find(|&i| self.matches_scope(i, s)))
                .map(Some),
        }
    }

    fn matches_scope(&self, idx: usize, selector: &str) -> bool {
        match selector.strip_suffix(":not([hidden])") {
            Some(base) => self.matches(idx, base) && self.visible(idx),
            None => self.matches(idx, selector),
        }
    }

    fn info(&self, idx: usize) -> ElementInfo {
        let node = &self.nodes[idx];
        ElementInfo {
            handle: ElementHandle::new(format!("node-{}", idx)),
            visible: self.visible(idx),
            text: node.text.to_string(),
            label: node.label.map(str::to_string),
        }
    }

    fn lookup(&self, handle: &ElementHandle) -> Result<usize, HostError> {
        handle
            .as_str()
            .strip_prefix("node-")
            .and_then(|n| n.parse::<usize>().ok())
            .filter(|&i| i < self.nodes.len())
            .ok_or_else(|| HostError::StaleHandle(handle.to_string()))
    }

    fn set_shown(&mut self, name: &str, shown: bool) {
        let idx = self.index_of(name);
        self.nodes[idx].shown = shown;
        self.nodes[idx].hide_at = None;
    }
}

#[async_trait]
impl HostPage for FakeNotebook {
    async fn query_all(&self, scope: &Scope, selector: &str) -> Result<Vec<ElementInfo>, HostError> {
        let state = self.lock();
        let Some(root) = state.resolve(scope) else {
            return Ok(Vec::new());
        };
        Ok((0..state.nodes.len())
            .filter(|&i| state.matches(i, selector))
            .filter(|&i| root.is_none_or(|r| state.is_descendant(i, r)))
            .map(|i| state.info(i))
            .collect())
    }

    async fn closest(
        &self,
        element: &ElementHandle,
        selector: &str,
    ) -> Result<Option<ElementInfo>, HostError> {
        let state = self.lock();
        let mut cursor = Some(state.lookup(element)?);
        while let Some(i) = cursor {
            if state.matches(i, selector) {
                return Ok(Some(state.info(i)));
            }
            cursor = state.nodes[i].parent;
        }
        Ok(None)
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), HostError> {
        let name = {
            let mut state = self.lock();
            let idx = state.lookup(element)?;
            let name = state.nodes[idx].name;
            match name {
                "add-source" => {
                    state.set_shown("dialog", true);
                    state.set_shown("url-input", false);
                    state.set_shown("insert", false);
                }
                "youtube-chip" => {
                    state.set_shown("url-input", true);
                    state.set_shown("insert", true);
                }
                "insert" => {
                    let input = state.index_of("url-input");
                    let link = std::mem::take(&mut state.nodes[input].value);
                    state.inserted.push(link);
                    if let Some(delay) = state.accept_delay {
                        let dialog = state.index_of("dialog");
                        state.nodes[dialog].hide_at = Some(Instant::now() + delay);
                    }
                }
                _ => {}
            }
            name
        };
        self.record(Action::Click(name));
        Ok(())
    }

    async fn fill(&self, element: &ElementHandle, value: &str) -> Result<(), HostError> {
        let name = {
            let mut state = self.lock();
            let idx = state.lookup(element)?;
            state.nodes[idx].value = value.to_string();
            state.nodes[idx].name
        };
        self.record(Action::Fill(name, value.to_string()));
        Ok(())
    }
}

/// Sink that keeps every event it receives
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<AutomationEvent>>,
    hook: Option<Box<dyn Fn(&AutomationEvent) + Send + Sync>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_event(hook: impl Fn(&AutomationEvent) + Send + Sync + 'static) -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            hook: Some(Box::new(hook)),
        }
    }

    pub fn events(&self) -> Vec<AutomationEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn kinds(&self) -> Vec<&'static str> {
        self.events().iter().map(AutomationEvent::kind).collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: AutomationEvent) -> Result<(), SinkError> {
        if let Some(hook) = &self.hook {
            hook(&event);
        }
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

pub fn items(n: usize) -> Vec<WorkItem> {
    (1..=n)
        .map(|i| {
            WorkItem::new(
                format!("Lecture {} on distributed systems", i),
                format!("https://www.youtube.com/watch?v=vid{}", i),
            )
            .unwrap()
        })
        .collect()
}

pub fn config() -> DriverConfig {
    DriverConfig::default()
}
