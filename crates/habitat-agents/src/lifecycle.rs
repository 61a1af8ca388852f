//! Per-agent tasks and the tick handshake.
//!
//! Every started agent runs one tokio task that waits for a
//! [`TickTicket`], runs perceive, decide and act, then acknowledges the
//! ticket. The coordinator fans tickets out to every live agent and joins
//! the returned [`PendingTick`]s before it moves on, which makes each tick
//! a strict barrier.
//!
//! Stopping is cooperative. [`StopSignal`] is a cancellation flag an agent
//! task checks between tickets; a tick already in flight always runs to
//! completion. A task that exits drops its queued ticket, which the
//! coordinator sees as an acknowledgement, so a stopped agent can never
//! wedge the barrier.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use habitat_types::EntityId;

use crate::agent::AgentCell;
use crate::behavior;
use crate::error::AgentError;
use crate::world::SharedWorld;

/// Permission to run one tick, acknowledged by dropping or consuming it.
#[derive(Debug)]
pub struct TickTicket {
    tick: u64,
    done: oneshot::Sender<()>,
}

impl TickTicket {
    /// The tick this ticket belongs to.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Report the tick as done.
    pub fn acknowledge(self) {
        // The coordinator only goes away together with the whole run.
        let _ = self.done.send(());
    }
}

/// The coordinator's half of an issued ticket.
#[derive(Debug)]
pub struct PendingTick {
    agent_id: EntityId,
    done: oneshot::Receiver<()>,
}

impl PendingTick {
    /// Wait until the agent acknowledges, or until its task is gone.
    pub async fn wait(self) {
        if self.done.await.is_err() {
            trace!(agent_id = %self.agent_id, "Agent task ended before acknowledging");
        }
    }
}

/// One-way cancellation flag. Triggering it more than once is a no-op.
#[derive(Debug)]
pub struct StopSignal {
    tx: watch::Sender<bool>,
}

impl StopSignal {
    /// A signal that has not fired.
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx }
    }

    /// Fire the signal. Returns `true` only for the call that fired it.
    pub fn trigger(&self) -> bool {
        self.tx.send_if_modified(|stopped| {
            if *stopped {
                false
            } else {
                *stopped = true;
                true
            }
        })
    }

    /// Whether the signal has fired.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// A listener that resolves once the signal fires.
    pub fn listen(&self) -> StopListener {
        StopListener {
            rx: self.tx.subscribe(),
        }
    }
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

/// Receiving side of a [`StopSignal`].
#[derive(Debug)]
pub struct StopListener {
    rx: watch::Receiver<bool>,
}

impl StopListener {
    /// Resolve once the signal has fired, immediately if it already has.
    pub async fn stopped(&mut self) {
        // An error means the signal itself was dropped, which also ends
        // the agent.
        let _ = self.rx.wait_for(|stopped| *stopped).await;
    }
}

/// Task plumbing owned by each [`AgentCell`].
#[derive(Debug)]
pub(crate) struct Lifecycle {
    tickets: mpsc::Sender<TickTicket>,
    inbox: Mutex<Option<mpsc::Receiver<TickTicket>>>,
    stop: StopSignal,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Lifecycle {
    pub(crate) fn new() -> Self {
        let (tickets, inbox) = mpsc::channel(1);
        Self {
            tickets,
            inbox: Mutex::new(Some(inbox)),
            stop: StopSignal::new(),
            task: Mutex::new(None),
        }
    }
}

impl AgentCell {
    /// Spawn this agent's task on the current tokio runtime.
    ///
    /// Returns `Ok(false)` if the task was already started.
    pub fn start(self: &Arc<Self>, world: &Arc<SharedWorld>) -> Result<bool, AgentError> {
        let runtime = tokio::runtime::Handle::try_current().map_err(|source| {
            AgentError::NoRuntime {
                agent_id: self.id(),
                source,
            }
        })?;

        let inbox = self
            .lifecycle
            .inbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(inbox) = inbox else {
            return Ok(false);
        };

        let stop = self.lifecycle.stop.listen();
        let handle = runtime.spawn(run_agent(Arc::clone(self), Arc::clone(world), inbox, stop));
        *self
            .lifecycle
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);
        Ok(true)
    }

    /// Whether the task has been spawned.
    pub fn is_started(&self) -> bool {
        self.lifecycle
            .inbox
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_none()
    }

    /// Hand this agent a ticket for `tick`.
    ///
    /// Returns `None` when there is nothing to wait for: the task was never
    /// started, has been stopped, or has already exited.
    pub async fn signal_tick(&self, tick: u64) -> Option<PendingTick> {
        if !self.is_started() || self.is_stopped() {
            return None;
        }
        let (done_tx, done_rx) = oneshot::channel();
        let ticket = TickTicket {
            tick,
            done: done_tx,
        };
        self.lifecycle.tickets.send(ticket).await.ok()?;
        Some(PendingTick {
            agent_id: self.id(),
            done: done_rx,
        })
    }

    /// Ask the task to exit. Idempotent; returns `true` only the first time.
    pub fn stop(&self) -> bool {
        self.lifecycle.stop.trigger()
    }

    /// Whether [`AgentCell::stop`] has been called.
    pub fn is_stopped(&self) -> bool {
        self.lifecycle.stop.is_triggered()
    }

    /// Wait for the task to exit. Call after [`AgentCell::stop`].
    pub async fn join(&self) {
        let handle = self
            .lifecycle
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle
            && let Err(err) = handle.await
        {
            warn!(agent_id = %self.id(), error = %err, "Agent task did not exit cleanly");
        }
    }
}

/// Body of an agent task.
async fn run_agent(
    cell: Arc<AgentCell>,
    world: Arc<SharedWorld>,
    mut inbox: mpsc::Receiver<TickTicket>,
    mut stop: StopListener,
) {
    debug!(agent_id = %cell.id(), kind = ?cell.kind(), "Agent task started");
    loop {
        tokio::select! {
            biased;
            () = stop.stopped() => break,
            ticket = inbox.recv() => {
                let Some(ticket) = ticket else { break };
                behavior::run_tick(&cell, &world);
                trace!(agent_id = %cell.id(), tick = ticket.tick(), "Agent finished tick");
                ticket.acknowledge();
            }
        }
    }
    debug!(agent_id = %cell.id(), "Agent task exited");
}
