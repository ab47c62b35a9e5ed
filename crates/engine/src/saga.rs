// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Forward steps with a compensation stack.
//!
//! Each completed step may push an undo action. The first failing step
//! unwinds the stack in reverse order and hands its own error back to the
//! caller. Undo actions are best-effort: a failing undo is logged and the
//! rest of the stack still runs.

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use std::fmt::Display;
use std::future::Future;
use tracing::Span;

type Undo<'a> = Box<dyn FnOnce() -> BoxFuture<'a, Result<(), String>> + Send + 'a>;

pub struct Saga<'a> {
    name: &'static str,
    undo: Vec<(&'static str, Undo<'a>)>,
    log: Span,
}

impl<'a> Saga<'a> {
    pub fn new(name: &'static str, log: Span) -> Self {
        Self { name, undo: Vec::new(), log }
    }

    /// Register a compensation for work that has already happened.
    pub fn on_undo<F, Fut, E>(&mut self, label: &'static str, undo: F)
    where
        F: FnOnce() -> Fut + Send + 'a,
        Fut: Future<Output = Result<(), E>> + Send + 'a,
        E: Display + Send + 'a,
    {
        let undo: Undo<'a> =
            Box::new(move || async move { undo().await.map_err(|e| e.to_string()) }.boxed());
        self.undo.push((label, undo));
    }

    /// Run one forward step, unwinding everything recorded so far if it fails.
    pub async fn step<T, E, Fut>(&mut self, label: &'static str, fut: Fut) -> Result<T, E>
    where
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        match fut.await {
            Ok(value) => Ok(value),
            Err(e) => {
                tracing::warn!(
                    parent: &self.log,
                    saga = self.name,
                    step = label,
                    error = %e,
                    "step failed, compensating",
                );
                self.compensate().await;
                Err(e)
            }
        }
    }

    /// Play back every recorded undo, most recent first.
    pub async fn compensate(&mut self) {
        while let Some((label, undo)) = self.undo.pop() {
            match undo().await {
                Ok(()) => {
                    tracing::debug!(parent: &self.log, saga = self.name, undo = label, "compensated")
                }
                Err(e) => tracing::warn!(
                    parent: &self.log,
                    saga = self.name,
                    undo = label,
                    error = %e,
                    "compensation failed",
                ),
            }
        }
    }

    /// Keep the completed work; drops the undo stack.
    pub fn commit(mut self) {
        self.undo.clear();
    }

    #[cfg(test)]
    pub(crate) fn pending(&self) -> usize {
        self.undo.len()
    }
}

#[cfg(test)]
#[path = "saga_tests.rs"]
mod tests;
