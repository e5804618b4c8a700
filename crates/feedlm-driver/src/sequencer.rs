//! Per-item insertion state machine.
//!
//! `Idle -> OpeningComposer -> SelectingKind -> EnteringValue -> Confirming
//! -> AwaitingCompletion -> {Succeeded | Failed | Cancelled}`
//!
//! No state is skipped. Any active state may end in `Cancelled` when the stop
//! flag is seen at one of its suspension points.

use crate::cancel::BatchContext;
use crate::config::DriverConfig;
use crate::error::{DriverError, Stage};
use crate::host::{HostPage, Scope};
use crate::locator::{Locator, LocatorStrategy};
use crate::poll::Poller;
use feedlm_core::WorkItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertionState {
    Idle,
    OpeningComposer,
    SelectingKind,
    EnteringValue,
    Confirming,
    AwaitingCompletion,
    Succeeded,
    Failed,
    Cancelled,
}

impl InsertionState {
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            InsertionState::Succeeded | InsertionState::Failed | InsertionState::Cancelled
        )
    }

    /// The state that must follow this one on the happy path
    fn successor(&self) -> Option<InsertionState> {
        match self {
            InsertionState::Idle => Some(InsertionState::OpeningComposer),
            InsertionState::OpeningComposer => Some(InsertionState::SelectingKind),
            InsertionState::SelectingKind => Some(InsertionState::EnteringValue),
            InsertionState::EnteringValue => Some(InsertionState::Confirming),
            InsertionState::Confirming => Some(InsertionState::AwaitingCompletion),
            InsertionState::AwaitingCompletion => Some(InsertionState::Succeeded),
            _ => None,
        }
    }

    fn can_transition_to(&self, next: InsertionState) -> bool {
        match next {
            InsertionState::Failed | InsertionState::Cancelled => !self.is_final(),
            _ => self.successor() == Some(next),
        }
    }
}

pub struct Sequencer<'a, H: HostPage + ?Sized> {
    host: &'a H,
    ctx: &'a BatchContext,
    config: &'a DriverConfig,
    state: InsertionState,
    trail: Vec<InsertionState>,
}

impl<'a, H: HostPage + ?Sized> Sequencer<'a, H> {
    pub fn new(host: &'a H, ctx: &'a BatchContext, config: &'a DriverConfig) -> Self {
        Self {
            host,
            ctx,
            config,
            state: InsertionState::Idle,
            trail: vec![InsertionState::Idle],
        }
    }

    pub fn state(&self) -> InsertionState {
        self.state
    }

    /// Every state visited so far, starting with `Idle`
    pub fn trail(&self) -> &[InsertionState] {
        &self.trail
    }

    fn advance(&mut self, next: InsertionState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "illegal transition {:?} -> {:?}",
            self.state,
            next
        );
        tracing::debug!("Insertion state: {:?} -> {:?}", self.state, next);
        self.state = next;
        self.trail.push(next);
    }

    /// Drive one item through the composer
    ///
    /// Returns once the host has accepted the link (the value field is gone)
    /// or the first step fails. Settling after success is the caller's job.
    pub async fn insert(&mut self, item: &WorkItem) -> Result<(), DriverError> {
        if self.state != InsertionState::Idle {
            self.state = InsertionState::Idle;
            self.trail = vec![InsertionState::Idle];
        }
        let result = self.drive(item).await;
        let outcome = match &result {
            Ok(()) => InsertionState::Succeeded,
            Err(e) if e.is_cancelled() => InsertionState::Cancelled,
            Err(_) => InsertionState::Failed,
        };
        self.advance(outcome);
        result
    }

    async fn drive(&mut self, item: &WorkItem) -> Result<(), DriverError> {
        let host = self.host;
        let ctx = self.ctx;
        let config = self.config;
        let profile = &config.selectors;
        let timeouts = &config.timeouts;
        let pauses = &config.pauses;

        let poller = Poller::new(ctx, config.tick());
        let locator = Locator::new(host, poller);

        // 1. Open the composer.
        self.advance(InsertionState::OpeningComposer);
        let open = locator
            .locate(
                Stage::OpeningComposer,
                &Scope::Document,
                &profile.open_composer,
                timeouts.open_composer(),
            )
            .await?;
        ctx.ensure_running(Stage::OpeningComposer)?;
        host.click(&open).await?;
        poller
            .sleep(Stage::OpeningComposer, pauses.after_open())
            .await?;

        // 2. Wait for the surface, then pick the source kind inside it.
        self.advance(InsertionState::SelectingKind);
        locator
            .locate(
                Stage::SelectingKind,
                &Scope::Document,
                &[LocatorStrategy::attribute(profile.composer_surface.clone())],
                timeouts.composer_surface(),
            )
            .await?;
        let kind = locator
            .locate(
                Stage::SelectingKind,
                &profile.surface_scope(),
                &profile.source_kind,
                timeouts.source_kind(),
            )
            .await?;
        ctx.ensure_running(Stage::SelectingKind)?;
        host.click(&kind).await?;
        poller
            .sleep(Stage::SelectingKind, pauses.after_kind())
            .await?;

        // 3. Enter the link into the re-scoped surface.
        self.advance(InsertionState::EnteringValue);
        let active = profile.active_scope();
        let field = locator
            .locate(
                Stage::EnteringValue,
                &active,
                &profile.value_field,
                timeouts.value_field(),
            )
            .await?;
        ctx.ensure_running(Stage::EnteringValue)?;
        host.fill(&field, &item.link).await?;
        poller
            .sleep(Stage::EnteringValue, pauses.after_fill())
            .await?;

        // 4. Confirm.
        self.advance(InsertionState::Confirming);
        let confirm = locator
            .locate(
                Stage::Confirming,
                &active,
                &profile.confirm,
                timeouts.confirm(),
            )
            .await?;
        ctx.ensure_running(Stage::Confirming)?;
        host.click(&confirm).await?;

        // 5. The field disappearing means the host accepted the link.
        self.advance(InsertionState::AwaitingCompletion);
        locator
            .wait_gone(
                Stage::AwaitingCompletion,
                &active,
                &profile.value_field,
                timeouts.completion(),
            )
            .await?;

        tracing::info!("Video \"{}\" likely added", item.title_preview());
        Ok(())
    }
}
