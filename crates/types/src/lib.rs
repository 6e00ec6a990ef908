//! Shared type definitions for the teaser editing dialog.
//!
//! This crate holds the vocabulary every other crate speaks: the plain data
//! carried by the dialog (action items, resolved metadata, session state) and
//! the event/command/effect enums that connect the host dialog, the
//! synchronization core, and the metadata resolver.
//!
//! The flow is one-directional: the host reports a [`DialogEvent`], the core
//! answers with [`ControlCommand`]s (imperative mutations the host applies to
//! its widgets) and [`Effect`]s (asynchronous work the runtime schedules).

use serde::Deserialize;

/// Stable identity of one row of the repeating action list.
///
/// Assigned by the core when a row is first seen or synthesized and kept
/// stable across membership reports so that late-arriving asynchronous
/// results can be matched to the row they were issued for. An id that no
/// longer exists simply drops the result.
#[derive(Clone, Copy, Debug, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct RowId(pub u64);

/// Identifies a bound control of the host dialog.
///
/// Each component holds the ids of its own controls directly; nothing in the
/// core locates a control by traversing the widget tree at use time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlId {
    /// The single link URL field (active while actions are disabled).
    SingleLink,
    /// The link target selector next to the single link field.
    LinkTarget,
    /// The "enable actions" checkbox.
    ActionsToggle,
    /// The repeating action list widget as a whole.
    ActionList,
    /// The title text field.
    TitleText,
    /// The rich-text description field.
    DescriptionText,
    /// The link field of one action row.
    ActionLink(RowId),
    /// The target selector of one action row.
    ActionTarget(RowId),
    /// The title field of one action row.
    ActionTitle(RowId),
}

/// One entry of the repeating action list: a link, a target and a title.
///
/// Insertion order is meaningful (authoring order); the sequence lives in the
/// core's action list controller.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionItem {
    pub link: String,
    pub target: String,
    pub title: String,
}

impl ActionItem {
    /// A row is prunable when both its link and its title are empty.
    pub fn is_blank(&self) -> bool {
        self.link.is_empty() && self.title.is_empty()
    }
}

/// Title/description text resolved from a referenced content resource.
///
/// Produced once per resolution and consumed immediately; a missing field
/// seeds the corresponding inheritable value as absent.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct MetadataResult {
    #[serde(rename = "jcr:title")]
    pub title: Option<String>,
    #[serde(rename = "jcr:description")]
    pub description: Option<String>,
}

/// Outcome of one metadata resolution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The target resolved; seed both inheritable fields and republish.
    Data(MetadataResult),
    /// The target was not a resolvable resource path; republish the fields
    /// from their current state without re-seeding.
    Skipped,
    /// The fetch failed or returned something unusable; leave the fields
    /// exactly as they are.
    NoData,
}

/// Mutable per-session state shared across the dialog's handlers.
///
/// Owned exclusively by the session orchestrator and discarded when the
/// dialog closes; there is no process-wide state.
#[derive(Clone, Debug, Default)]
pub struct SessionState {
    /// Whether the repeating action list is the active link surface.
    pub actions_enabled: bool,
    /// Last committed value of the single link field, if any.
    pub single_link_target: Option<String>,
}

/// Snapshot of the dialog's controls at open time.
///
/// Carried by [`DialogEvent::DialogReady`] so initialization starts from the
/// persisted content rather than from blank state.
#[derive(Clone, Debug, Default)]
pub struct DialogSnapshot {
    /// Whether a rich-text description control is present at all.
    pub has_description: bool,
    /// Whether that control already started its own asynchronous editor.
    pub rich_text_active: bool,
    /// Whether the description control already has a label association.
    pub description_labelled: bool,
    pub actions_enabled: bool,
    pub single_link: Option<String>,
    pub items: Vec<ActionItem>,
    pub title_inherited: bool,
    pub title_text: String,
    pub description_inherited: bool,
    pub description_text: String,
}

/// Events consumed by the synchronization core.
///
/// The first group comes from the host dialog; the `*Resolved` variants are
/// fed back by the runtime when asynchronous resolutions complete, in
/// completion order.
#[derive(Clone, Debug)]
pub enum DialogEvent {
    /// The host dialog finished loading its widgets.
    DialogReady(DialogSnapshot),
    /// The rich-text description editor finished its own startup.
    RichTextReady,
    /// The "enable actions" checkbox changed.
    ActionsToggled(bool),
    /// The single link field changed; `None` means it was cleared.
    SingleLinkChanged(Option<String>),
    /// The action list widget reported its current membership.
    ActionListChanged(Vec<ActionItem>),
    /// An action row's link was committed via autocomplete selection.
    ActionLinkCommitted { index: usize, link: String },
    /// The "title from referenced page" checkbox changed.
    TitleInheritToggled(bool),
    /// The author edited the title text.
    TitleEdited(String),
    /// The "description from referenced page" checkbox changed.
    DescriptionInheritToggled(bool),
    /// The author edited the description text.
    DescriptionEdited(String),
    /// A metadata resolution for the effective target completed.
    MetadataResolved(Resolution),
    /// An auto-title resolution for one action row completed.
    ActionTitleResolved { row: RowId, title: String },
}

/// Imperative mutations the host applies to its widgets.
///
/// Commands carry everything the host needs; the core never reads a widget
/// back after emitting one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCommand {
    /// Replace the text of a bound control.
    SetText { control: ControlId, value: String },
    /// Enable or disable a bound control.
    SetEnabled { control: ControlId, enabled: bool },
    /// Set the checked state of a toggle control.
    SetChecked { control: ControlId, checked: bool },
    /// Append a new row to the action list widget.
    AddActionRow { row: RowId, item: ActionItem },
    /// Remove a row from the action list widget.
    RemoveActionRow { row: RowId },
    /// Associate the description control with its visual label.
    AssociateDescriptionLabel,
}

/// Asynchronous work requested by the core.
///
/// Effects represent "what should happen"; the runtime decides how, spawning
/// resolutions and feeding completions back as [`DialogEvent`]s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Resolve title/description metadata for the current effective target.
    ResolveMetadata { target: Option<String> },
    /// Resolve a title for one action row's committed link.
    ResolveActionTitle { row: RowId, path: String },
}
