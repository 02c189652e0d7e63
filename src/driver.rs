//! Headless driver for autonomous turns.

use tokio::time::sleep;
use tracing::{debug, info, instrument};

use crate::client::GameService;
use crate::session::{AutoStepOutcome, GameSession, SessionError};

/// Plays pending autonomous moves until the game ends or a human seat is to move.
///
/// Each ticket's delay is honoured before its move is requested, so moves
/// are strictly sequential. `on_step` runs after every applied move.
/// Returns the number of moves played.
#[instrument(skip_all)]
pub async fn run_autonomous<S, F>(
    session: &mut GameSession<S>,
    mut on_step: F,
) -> Result<usize, SessionError>
where
    S: GameService,
    F: FnMut(&GameSession<S>),
{
    let mut steps = 0;
    while let Some(ticket) = session.pending_auto_move() {
        debug!(?ticket, "Waiting for autonomous move");
        sleep(*ticket.delay()).await;
        match session.auto_step(ticket).await? {
            AutoStepOutcome::Applied(phase) => {
                steps += 1;
                debug!(steps, ?phase, "Autonomous move applied");
                on_step(session);
            }
            AutoStepOutcome::Stale => break,
        }
    }
    info!(steps, phase = ?session.phase(), "Autonomous run finished");
    Ok(steps)
}
