//! Data bridge: forwards [`Controller`](pulseboard_core::Controller)
//! events into the TUI action loop.
//!
//! Fetch results and scheduler ticks arrive on the controller's channel;
//! each becomes an [`Action`] so every state mutation happens on the loop.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use pulseboard_core::ControllerEvent;

use crate::action::Action;

fn to_action(event: ControllerEvent) -> Action {
    match event {
        ControllerEvent::Fetched(outcome) => Action::Fetched(outcome),
        ControllerEvent::Tick(tick) => Action::Scheduled(tick),
    }
}

/// Run until cancelled, or until either channel closes.
pub async fn spawn_data_bridge(
    mut events: mpsc::UnboundedReceiver<ControllerEvent>,
    action_tx: mpsc::UnboundedSender<Action>,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            event = events.recv() => {
                let Some(event) = event else { break };
                if action_tx.send(to_action(event)).is_err() {
                    break;
                }
            }
        }
    }
    debug!("data bridge stopped");
}
