//! Session runtime: the event loop that gives the core its single logical
//! thread of mutation.
//!
//! Host events arrive on a channel and resolutions run as spawned tasks
//! collected in a `FuturesUnordered`; their completions re-enter the loop as
//! further [`DialogEvent`]s in completion order, not issue order. There is no
//! cancellation and no sequence token, so when several resolutions are in
//! flight the last one to complete wins — the documented behavior of the
//! dialog this core drives. A hung fetch simply never resolves and the
//! fields keep their last value.

use anyhow::{Result, anyhow};
use futures_util::{StreamExt, stream::FuturesUnordered};
use teaser_metadata::MetadataResolver;
use teaser_types::{ControlCommand, DialogEvent, Effect};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::session::DialogSession;

type PendingResolutions = FuturesUnordered<JoinHandle<Option<DialogEvent>>>;

/// Drive one dialog-editing session to completion.
///
/// Runs until the host closes the event channel (the dialog was dismissed),
/// then drops the session state and any still-outstanding resolutions.
///
/// # Arguments
/// - `session`: the freshly-created session state machine.
/// - `resolver`: metadata resolution rules over the real or fake transport.
/// - `events`: inbound host events.
/// - `commands`: outbound control mutations for the host to apply.
pub async fn run_session(
    mut session: DialogSession,
    resolver: MetadataResolver,
    mut events: mpsc::UnboundedReceiver<DialogEvent>,
    commands: mpsc::UnboundedSender<ControlCommand>,
) -> Result<()> {
    let mut pending: PendingResolutions = FuturesUnordered::new();

    loop {
        tokio::select! {
            maybe_event = events.recv() => {
                match maybe_event {
                    Some(event) => dispatch(&mut session, event, &resolver, &mut pending, &commands)?,
                    None => break,
                }
            }
            Some(joined) = pending.next(), if !pending.is_empty() => {
                // A panicked resolution task degrades to "no data".
                if let Some(completion) = joined.ok().flatten() {
                    dispatch(&mut session, completion, &resolver, &mut pending, &commands)?;
                }
            }
        }
    }
    Ok(())
}

/// Feed one event through the session and act on its output.
fn dispatch(
    session: &mut DialogSession,
    event: DialogEvent,
    resolver: &MetadataResolver,
    pending: &mut PendingResolutions,
    commands: &mpsc::UnboundedSender<ControlCommand>,
) -> Result<()> {
    let output = session.handle(event);
    for command in output.commands {
        trace!(?command, "emitting control command");
        commands
            .send(command)
            .map_err(|_| anyhow!("host command channel closed"))?;
    }
    for effect in output.effects {
        pending.push(spawn_effect(effect, resolver.clone()));
    }
    Ok(())
}

/// Start the asynchronous work for one effect.
///
/// Each task yields the completion event to feed back in, or `None` when the
/// outcome calls for no reaction (an auto-title lookup without a usable
/// title).
fn spawn_effect(effect: Effect, resolver: MetadataResolver) -> JoinHandle<Option<DialogEvent>> {
    tokio::spawn(async move {
        match effect {
            Effect::ResolveMetadata { target } => {
                let resolution = resolver.resolve(target.as_deref()).await;
                Some(DialogEvent::MetadataResolved(resolution))
            }
            Effect::ResolveActionTitle { row, path } => resolver
                .title_for(&path)
                .await
                .map(|title| DialogEvent::ActionTitleResolved { row, title }),
        }
    })
}
