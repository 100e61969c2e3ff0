//! In-process window host.
//!
//! Keeps a shared table of "live" windows and forwards emitted events to
//! subscribers over unbounded channels (FIFO per sender, like the webview
//! event bus). Clones share the same window table, so several
//! [`super::WindowManager`]s can model separate window processes.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc;

use super::events::SyncEvent;
use super::window::{WindowHost, WindowLabel, WindowSpec};
use crate::error::WindowError;

/// Handle to a window in the memory host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemoryHandle {
    pub label: WindowLabel,
    pub id: u64,
}

/// Recorded host interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Create(WindowLabel),
    Focus(WindowLabel),
    Close(WindowLabel),
    Emit(WindowLabel, SyncEvent),
    Fallback(String),
}

#[derive(Default)]
struct State {
    next_id: u64,
    live: HashMap<WindowLabel, u64>,
    specs: Vec<WindowSpec>,
    calls: Vec<HostCall>,
    failing_create: HashSet<WindowLabel>,
    fallback_fails: bool,
    subscribers: HashMap<WindowLabel, Vec<mpsc::UnboundedSender<SyncEvent>>>,
}

#[derive(Clone, Default)]
pub struct MemoryWindowHost {
    state: Arc<Mutex<State>>,
}

impl MemoryWindowHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Receive every event emitted to `label` from now on.
    pub fn subscribe(&self, label: WindowLabel) -> mpsc::UnboundedReceiver<SyncEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock().subscribers.entry(label).or_default().push(tx);
        rx
    }

    /// Mark a window live without going through `create`.
    pub fn open_external(&self, label: WindowLabel) {
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.live.insert(label, id);
    }

    /// Simulate the user closing a window behind the manager's back.
    pub fn user_closed(&self, label: WindowLabel) {
        self.lock().live.remove(&label);
    }

    pub fn fail_create(&self, label: WindowLabel) {
        self.lock().failing_create.insert(label);
    }

    pub fn fail_fallback(&self) {
        self.lock().fallback_fails = true;
    }

    pub fn is_live(&self, label: WindowLabel) -> bool {
        self.lock().live.contains_key(&label)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.lock().calls.clone()
    }

    pub fn created_count(&self, label: WindowLabel) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| **c == HostCall::Create(label))
            .count()
    }

    /// Events emitted to `label`, in order.
    pub fn emitted_to(&self, label: WindowLabel) -> Vec<SyncEvent> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Emit(l, e) if *l == label => Some(e.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn last_spec(&self, label: WindowLabel) -> Option<WindowSpec> {
        self.lock()
            .specs
            .iter()
            .rev()
            .find(|s| s.label == label)
            .cloned()
    }

    pub fn fallbacks(&self) -> Vec<String> {
        self.lock()
            .calls
            .iter()
            .filter_map(|c| match c {
                HostCall::Fallback(url) => Some(url.clone()),
                _ => None,
            })
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl WindowHost for MemoryWindowHost {
    type Handle = MemoryHandle;

    fn find(&self, label: WindowLabel) -> Option<MemoryHandle> {
        self.lock()
            .live
            .get(&label)
            .map(|&id| MemoryHandle { label, id })
    }

    fn create(&self, spec: &WindowSpec) -> Result<MemoryHandle, WindowError> {
        let mut state = self.lock();
        state.calls.push(HostCall::Create(spec.label));
        if state.failing_create.contains(&spec.label) {
            return Err(WindowError::CreationFailed {
                label: spec.label.to_string(),
                message: "refused by host".into(),
            });
        }
        state.next_id += 1;
        let id = state.next_id;
        state.live.insert(spec.label, id);
        state.specs.push(spec.clone());
        Ok(MemoryHandle {
            label: spec.label,
            id,
        })
    }

    fn focus(&self, handle: &MemoryHandle) -> Result<(), WindowError> {
        let mut state = self.lock();
        state.calls.push(HostCall::Focus(handle.label));
        match state.live.get(&handle.label) {
            Some(&id) if id == handle.id => Ok(()),
            _ => Err(WindowError::NotFound(handle.label.to_string())),
        }
    }

    fn close(&self, handle: &MemoryHandle) -> Result<(), WindowError> {
        let mut state = self.lock();
        state.calls.push(HostCall::Close(handle.label));
        state.live.remove(&handle.label);
        Ok(())
    }

    fn emit_to(
        &self,
        label: WindowLabel,
        event: &str,
        payload: serde_json::Value,
    ) -> Result<(), WindowError> {
        let decoded = SyncEvent::decode(event, payload).map_err(|e| WindowError::EmitFailed {
            label: label.to_string(),
            event: event.to_string(),
            message: e.to_string(),
        })?;
        let mut state = self.lock();
        if !state.live.contains_key(&label) {
            return Err(WindowError::NotFound(label.to_string()));
        }
        state.calls.push(HostCall::Emit(label, decoded.clone()));
        if let Some(subs) = state.subscribers.get_mut(&label) {
            subs.retain(|tx| tx.send(decoded.clone()).is_ok());
        }
        Ok(())
    }

    fn open_fallback(&self, url: &str) -> Result<(), WindowError> {
        let mut state = self.lock();
        if state.fallback_fails {
            return Err(WindowError::FallbackFailed {
                url: url.to_string(),
                message: "no browser available".into(),
            });
        }
        state.calls.push(HostCall::Fallback(url.to_string()));
        Ok(())
    }
}
