//! Fan-out/fan-in of one tick across agent tasks.
//!
//! Every agent in the snapshot is handed a ticket; the barrier then waits
//! for every ticket to be acknowledged. An agent whose task has exited
//! drops its ticket, which also counts as done, so a stopped agent never
//! hangs a tick.

use futures::future::join_all;
use habitat_agents::AgentRef;
use tracing::trace;

/// Run tick `tick` on every agent in `agents` and wait until all of them
/// have finished it. Returns how many agents were signaled.
pub async fn run_tick(agents: &[AgentRef], tick: u64) -> usize {
    let mut pending = Vec::with_capacity(agents.len());
    for agent in agents {
        if let Some(ticket) = agent.signal_tick(tick).await {
            pending.push(ticket.wait());
        }
    }

    let signaled = pending.len();
    join_all(pending).await;
    trace!(tick, signaled, "Tick barrier released");
    signaled
}
