// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Shared fixtures for engine tests.

use crate::{AgentService, EventHandler, HandlerError, ServiceDeps, ServiceSettings};
use async_trait::async_trait;
use craizy_adapters::{FakeSessionAdapter, FakeVcsAdapter, SessionError, VcsAdapter};
use craizy_core::{Agent, AgentId, AgentStatus, Event, EventKind, FakeClock};
use craizy_storage::{AgentStore, MemoryStore, StoreError};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::Span;

/// Shared record of (handler name, event) deliveries
#[derive(Clone, Default)]
pub(crate) struct EventLog(Arc<Mutex<Vec<(&'static str, Event)>>>);

impl EventLog {
    pub(crate) fn handlers(&self) -> Vec<&'static str> {
        self.0.lock().iter().map(|(name, _)| *name).collect()
    }

    pub(crate) fn kinds(&self) -> Vec<EventKind> {
        self.0.lock().iter().map(|(_, e)| e.kind()).collect()
    }

    pub(crate) fn events(&self) -> Vec<Event> {
        self.0.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.lock().is_empty()
    }
}

pub(crate) struct RecordingHandler {
    name: &'static str,
    log: EventLog,
    fail: bool,
    delay: Option<Duration>,
}

impl RecordingHandler {
    pub(crate) fn arc(name: &'static str, log: &EventLog) -> Arc<dyn EventHandler> {
        Arc::new(Self { name, log: log.clone(), fail: false, delay: None })
    }

    pub(crate) fn failing(name: &'static str, log: &EventLog) -> Arc<dyn EventHandler> {
        Arc::new(Self { name, log: log.clone(), fail: true, delay: None })
    }

    pub(crate) fn slow(name: &'static str, log: &EventLog) -> Arc<dyn EventHandler> {
        Arc::new(Self { name, log: log.clone(), fail: false, delay: Some(Duration::from_millis(20)) })
    }
}

#[async_trait]
impl EventHandler for RecordingHandler {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn handle(&self, event: &Event) -> Result<(), HandlerError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.log.0.lock().push((self.name, event.clone()));
        if self.fail {
            return Err(SessionError::Unavailable("recording handler told to fail".into()).into());
        }
        Ok(())
    }
}

/// Memory store whose writes can be made to fail.
#[derive(Default)]
pub(crate) struct FlakyStore {
    inner: MemoryStore,
    fail_add: AtomicBool,
    fail_update: AtomicBool,
}

impl FlakyStore {
    pub(crate) fn fail_add(&self, fail: bool) {
        self.fail_add.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn fail_update(&self, fail: bool) {
        self.fail_update.store(fail, Ordering::SeqCst);
    }
}

fn injected(path: &str) -> StoreError {
    StoreError::Io {
        path: PathBuf::from(path),
        source: std::io::Error::other("injected failure"),
    }
}

impl AgentStore for FlakyStore {
    fn add(&self, agent: Agent) -> Result<(), StoreError> {
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(injected("add"));
        }
        self.inner.add(agent)
    }

    fn remove(&self, id: &AgentId) -> Result<(), StoreError> {
        self.inner.remove(id)
    }

    fn get(&self, id: &AgentId) -> Option<Agent> {
        self.inner.get(id)
    }

    fn list(&self) -> Vec<Agent> {
        self.inner.list()
    }

    fn exists(&self, id: &AgentId) -> bool {
        self.inner.exists(id)
    }

    fn update_status(&self, id: &AgentId, status: AgentStatus, at_ms: u64) -> Result<(), StoreError> {
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(injected("update"));
        }
        self.inner.update_status(id, status, at_ms)
    }
}

pub(crate) const PROJECT_DIR: &str = "/work/demo";
pub(crate) const WORKTREE_DIR: &str = "/work/demo/.craizy/worktrees";

/// Service over fakes, with every published event recorded.
pub(crate) struct Harness {
    pub service: AgentService<FakeClock>,
    pub sessions: FakeSessionAdapter,
    pub vcs: FakeVcsAdapter,
    pub store: Arc<FlakyStore>,
    pub clock: FakeClock,
    pub events: EventLog,
}

impl Harness {
    /// Project `demo` with version control enabled.
    pub(crate) fn new() -> Self {
        Self::build(true)
    }

    pub(crate) fn without_vcs() -> Self {
        Self::build(false)
    }

    fn build(with_vcs: bool) -> Self {
        let sessions = FakeSessionAdapter::new();
        let vcs = FakeVcsAdapter::new();
        let store = Arc::new(FlakyStore::default());
        let clock = FakeClock::new();
        let deps = ServiceDeps {
            sessions: Arc::new(sessions.clone()),
            vcs: with_vcs.then(|| Arc::new(vcs.clone()) as Arc<dyn VcsAdapter>),
            store: Arc::clone(&store) as Arc<dyn AgentStore>,
        };
        let settings = ServiceSettings {
            project: "demo".to_string(),
            project_dir: PathBuf::from(PROJECT_DIR),
            worktree_dir: PathBuf::from(WORKTREE_DIR),
            state_paths: vec![PathBuf::from(PROJECT_DIR).join(".craizy"), PathBuf::from(WORKTREE_DIR)],
        };
        let service = AgentService::new(settings, deps, clock.clone(), Span::none());

        let events = EventLog::default();
        for kind in EventKind::ALL {
            service.dispatcher().subscribe(kind, RecordingHandler::arc("recorder", &events));
        }
        Self { service, sessions, vcs, store, clock, events }
    }

    pub(crate) fn worktree(&self, id: &str) -> PathBuf {
        PathBuf::from(WORKTREE_DIR).join(id)
    }
}
