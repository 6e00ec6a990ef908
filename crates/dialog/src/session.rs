//! Dialog session orchestrator.
//!
//! [`DialogSession`] owns the shared [`SessionState`] and the component
//! states, and turns every inbound [`DialogEvent`] into control mutations
//! plus asynchronous effects. Handlers are pure with respect to the outside
//! world: all I/O happens in the runtime that interprets the returned
//! [`Effect`]s.
//!
//! Initialization is deferred while a rich-text description control is still
//! starting up, so state adjustments made here cannot be overridden by the
//! editor's own setup. Events other than the ready signals are ignored until
//! initialization ran, matching a host that only attaches its change
//! listeners afterwards.

use teaser_types::{
    ActionItem, ControlCommand, ControlId, DialogEvent, DialogSnapshot, Effect, Resolution, RowId,
    SessionState,
};
use tracing::{debug, trace, warn};

use crate::actions::ActionListController;
use crate::auto_title;
use crate::field::InheritableField;

/// Everything one event produces: host mutations and asynchronous work.
#[derive(Debug, Default)]
pub struct SessionOutput {
    pub commands: Vec<ControlCommand>,
    pub effects: Vec<Effect>,
}

enum Phase {
    /// Dialog not loaded yet.
    Idle,
    /// Dialog loaded, waiting for the rich-text editor's start signal.
    AwaitingRichText(Box<DialogSnapshot>),
    /// Fully initialized.
    Ready,
}

/// Top-level state machine for one dialog-editing session.
pub struct DialogSession {
    state: SessionState,
    title: InheritableField,
    description: InheritableField,
    actions: ActionListController,
    phase: Phase,
}

impl Default for DialogSession {
    fn default() -> Self {
        Self::new()
    }
}

impl DialogSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::default(),
            title: InheritableField::new(ControlId::TitleText),
            description: InheritableField::new(ControlId::DescriptionText),
            actions: ActionListController::new(),
            phase: Phase::Idle,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Handle one inbound event.
    pub fn handle(&mut self, event: DialogEvent) -> SessionOutput {
        let mut out = SessionOutput::default();
        match event {
            DialogEvent::DialogReady(snapshot) => self.on_dialog_ready(snapshot, &mut out),
            DialogEvent::RichTextReady => {
                if matches!(self.phase, Phase::AwaitingRichText(_))
                    && let Phase::AwaitingRichText(snapshot) =
                        std::mem::replace(&mut self.phase, Phase::Idle)
                {
                    self.init(*snapshot, &mut out);
                }
            }
            event if !matches!(self.phase, Phase::Ready) => {
                trace!(?event, "event before initialization, ignored");
            }
            DialogEvent::ActionsToggled(enabled) => self.on_actions_toggled(enabled, &mut out),
            DialogEvent::SingleLinkChanged(value) => {
                self.state.single_link_target = value;
                out.effects.push(self.resolve_effect());
            }
            DialogEvent::ActionListChanged(items) => self.on_action_list_changed(items, &mut out),
            DialogEvent::ActionLinkCommitted { index, link } => {
                self.on_action_link_committed(index, &link, &mut out)
            }
            DialogEvent::TitleInheritToggled(inherited) => {
                self.title.set_inherited(inherited);
                out.commands.extend(self.title.update());
                out.effects.push(self.resolve_effect());
            }
            DialogEvent::TitleEdited(text) => {
                self.title.set_manual_value(text);
                out.commands.extend(self.title.update());
            }
            DialogEvent::DescriptionInheritToggled(inherited) => {
                self.description.set_inherited(inherited);
                out.commands.extend(self.description.update());
                out.effects.push(self.resolve_effect());
            }
            DialogEvent::DescriptionEdited(text) => {
                self.description.set_manual_value(text);
                out.commands.extend(self.description.update());
            }
            DialogEvent::MetadataResolved(resolution) => self.on_metadata_resolved(resolution, &mut out),
            DialogEvent::ActionTitleResolved { row, title } => {
                self.on_action_title_resolved(row, &title, &mut out)
            }
        }
        out
    }

    /// Resource path currently in force for metadata resolution.
    ///
    /// While actions are enabled this is the first row's link value as the
    /// list currently reports it; otherwise the single link value. A present
    /// but empty value stays present, which suppresses the current-page
    /// fallback downstream.
    pub fn effective_target(&self) -> Option<String> {
        if self.state.actions_enabled {
            self.actions.first_link()
        } else {
            self.state.single_link_target.clone()
        }
    }

    fn resolve_effect(&self) -> Effect {
        Effect::ResolveMetadata {
            target: self.effective_target(),
        }
    }

    fn on_dialog_ready(&mut self, snapshot: DialogSnapshot, out: &mut SessionOutput) {
        // One-time accessibility fix, applied even while initialization is
        // deferred.
        if snapshot.has_description && !snapshot.description_labelled {
            out.commands.push(ControlCommand::AssociateDescriptionLabel);
        }
        if snapshot.has_description && !snapshot.rich_text_active {
            debug!("deferring initialization until the rich-text editor starts");
            self.phase = Phase::AwaitingRichText(Box::new(snapshot));
            return;
        }
        self.init(snapshot, out);
    }

    fn init(&mut self, snapshot: DialogSnapshot, out: &mut SessionOutput) {
        self.state.actions_enabled = snapshot.actions_enabled;
        self.state.single_link_target = snapshot.single_link;

        self.title.set_manual_value(snapshot.title_text);
        self.title.set_inherited(snapshot.title_inherited);
        self.description.set_manual_value(snapshot.description_text);
        self.description.set_inherited(snapshot.description_inherited);

        self.actions.absorb(snapshot.items);
        let outcome = self
            .actions
            .set_actions_enabled(self.state.actions_enabled, self.state.single_link_target.as_deref());
        out.commands.extend(outcome.commands);
        self.push_autofill_for_synthesized(outcome.synthesized, out);

        out.commands.extend(self.title.update());
        out.commands.extend(self.description.update());
        out.effects.push(self.resolve_effect());
        self.phase = Phase::Ready;
    }

    fn on_actions_toggled(&mut self, enabled: bool, out: &mut SessionOutput) {
        self.state.actions_enabled = enabled;
        let outcome = self
            .actions
            .set_actions_enabled(enabled, self.state.single_link_target.as_deref());
        out.commands.extend(outcome.commands);
        self.push_autofill_for_synthesized(outcome.synthesized, out);
        out.effects.push(self.resolve_effect());
    }

    fn on_action_list_changed(&mut self, items: Vec<ActionItem>, out: &mut SessionOutput) {
        self.actions.reconcile(&items);
        if items.is_empty() && self.state.actions_enabled {
            // The author removed the last row while actions were flagged on.
            // Treat it as an implicit mode switch back to the single link.
            warn!("action list emptied while enabled, reverting to single link mode");
            self.state.actions_enabled = false;
            out.commands.push(ControlCommand::SetChecked {
                control: ControlId::ActionsToggle,
                checked: false,
            });
            let outcome = self.actions.set_actions_enabled(false, None);
            out.commands.extend(outcome.commands);
        }
        out.effects.push(self.resolve_effect());
    }

    fn on_action_link_committed(&mut self, index: usize, link: &str, out: &mut SessionOutput) {
        if let Some(row) = self.actions.row_id_at(index) {
            self.actions.set_link(row, link);
            if auto_title::should_autofill(link, row_title(&self.actions, row)) {
                out.effects.push(Effect::ResolveActionTitle {
                    row,
                    path: link.to_string(),
                });
            }
        }
        out.effects.push(self.resolve_effect());
    }

    fn on_metadata_resolved(&mut self, resolution: Resolution, out: &mut SessionOutput) {
        match resolution {
            Resolution::Data(result) => {
                // No freshness check here: completions apply in arrival
                // order and the last one wins.
                self.title.seed(result.title);
                self.description.seed(result.description);
                out.commands.extend(self.title.update());
                out.commands.extend(self.description.update());
            }
            Resolution::Skipped => {
                out.commands.extend(self.title.update());
                out.commands.extend(self.description.update());
            }
            Resolution::NoData => {}
        }
    }

    fn on_action_title_resolved(&mut self, row: RowId, title: &str, out: &mut SessionOutput) {
        if !auto_title::accept_resolved_title(row_title(&self.actions, row)) {
            trace!(?row, "stale auto-title result discarded");
            return;
        }
        out.commands.extend(self.actions.set_title(row, title));
    }

    fn push_autofill_for_synthesized(&self, synthesized: Option<(RowId, String)>, out: &mut SessionOutput) {
        if let Some((row, link)) = synthesized
            && auto_title::should_autofill(&link, "")
        {
            out.effects.push(Effect::ResolveActionTitle { row, path: link });
        }
    }
}

/// Current title text of a row; a missing row counts as populated so a
/// guard against it always fails closed.
fn row_title(actions: &ActionListController, row: RowId) -> &str {
    actions
        .rows()
        .iter()
        .find(|r| r.id == row)
        .map(|r| r.item.title.as_str())
        .unwrap_or("<removed>")
}
