//! Tick-based wait primitives.
//!
//! Every wait re-queries the page on a fixed tick instead of subscribing to
//! DOM mutations, which works against any rendering framework. Each tick is a
//! suspension point where the batch's stop flag is honoured.

use crate::cancel::BatchContext;
use crate::error::{DriverError, HostError, Stage};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

pub const DEFAULT_TICK: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy)]
pub struct Poller<'a> {
    ctx: &'a BatchContext,
    tick: Duration,
}

impl<'a> Poller<'a> {
    pub fn new(ctx: &'a BatchContext, tick: Duration) -> Self {
        Self { ctx, tick }
    }

    pub fn ctx(&self) -> &'a BatchContext {
        self.ctx
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }

    /// Poll `probe` until it yields a value
    ///
    /// Fails with `Timeout` once `timeout` has elapsed without a hit (at most
    /// one tick late), or with `Cancelled` as soon as a stop is requested.
    pub async fn wait_until_present<T, F, Fut>(
        &self,
        stage: Stage,
        target: &str,
        timeout: Duration,
        mut probe: F,
    ) -> Result<T, DriverError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, HostError>>,
    {
        let started = Instant::now();
        loop {
            self.ctx.ensure_running(stage)?;
            if let Some(found) = probe().await? {
                return Ok(found);
            }
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(DriverError::Timeout {
                    stage,
                    target: format!("\"{}\" not found or not visible", target),
                    waited,
                });
            }
            self.pause(stage, self.tick).await?;
        }
    }

    /// Poll `probe` until it stops yielding a value
    pub async fn wait_until_absent<T, F, Fut>(
        &self,
        stage: Stage,
        target: &str,
        timeout: Duration,
        mut probe: F,
    ) -> Result<(), DriverError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Option<T>, HostError>>,
    {
        let started = Instant::now();
        loop {
            self.ctx.ensure_running(stage)?;
            if probe().await?.is_none() {
                return Ok(());
            }
            let waited = started.elapsed();
            if waited >= timeout {
                return Err(DriverError::Timeout {
                    stage,
                    target: format!("\"{}\" still present", target),
                    waited,
                });
            }
            self.pause(stage, self.tick).await?;
        }
    }

    /// Suspend for `duration`, failing early with `Cancelled`
    pub async fn sleep(&self, stage: Stage, duration: Duration) -> Result<(), DriverError> {
        self.ctx.ensure_running(stage)?;
        self.pause(stage, duration).await
    }

    async fn pause(&self, stage: Stage, duration: Duration) -> Result<(), DriverError> {
        tokio::select! {
            biased;
            _ = self.ctx.token().cancelled() => Err(DriverError::Cancelled { stage }),
            _ = tokio::time::sleep(duration) => Ok(()),
        }
    }
}
