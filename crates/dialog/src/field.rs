//! Inheritable field state: "use the referenced page's value" vs. manual.
//!
//! An [`InheritableField`] binds an inheritance toggle to one text control.
//! It stores the author's manual text and the last value seeded from the
//! referenced resource, and publishes whichever of the two is in force.
//! Publishing is guarded: a recomputation that lands on the already-published
//! value emits nothing, so redundant updates never disturb the bound
//! editor's cursor or selection state.

use teaser_types::{ControlCommand, ControlId};

/// State for one toggle/text control pair (title or description).
#[derive(Clone, Debug)]
pub struct InheritableField {
    control: ControlId,
    is_inherited: bool,
    manual_value: String,
    seeded_value: Option<String>,
    /// Last value pushed to (or observed on) the bound control.
    published: Option<String>,
}

impl InheritableField {
    pub fn new(control: ControlId) -> Self {
        Self {
            control,
            is_inherited: false,
            manual_value: String::new(),
            seeded_value: None,
            published: None,
        }
    }

    pub fn is_inherited(&self) -> bool {
        self.is_inherited
    }

    pub fn set_inherited(&mut self, inherited: bool) {
        self.is_inherited = inherited;
    }

    /// Record text typed by the author.
    ///
    /// When the field is not inherited the control already displays the
    /// typed text, so the published value is synced rather than re-emitted.
    pub fn set_manual_value<S: Into<String>>(&mut self, value: S) {
        self.manual_value = value.into();
        if !self.is_inherited {
            self.published = Some(self.manual_value.clone());
        }
    }

    /// Store a candidate inherited value. Never touches the manual value.
    pub fn seed(&mut self, value: Option<String>) {
        self.seeded_value = value;
    }

    /// The value currently in force: the latest seeded value when inherited
    /// (blank if none arrived yet), the manual value otherwise.
    pub fn displayed_value(&self) -> &str {
        if self.is_inherited {
            self.seeded_value.as_deref().unwrap_or("")
        } else {
            &self.manual_value
        }
    }

    /// Recompute the displayed value and publish it to the bound control.
    ///
    /// Idempotent: returns `None` when the displayed value is already what
    /// the control shows.
    pub fn update(&mut self) -> Option<ControlCommand> {
        let displayed = self.displayed_value();
        if self.published.as_deref() == Some(displayed) {
            return None;
        }
        let value = displayed.to_string();
        self.published = Some(value.clone());
        Some(ControlCommand::SetText {
            control: self.control,
            value,
        })
    }
}
