//! Action list state: mutual exclusion with the single link control,
//! synthesis, pruning, and membership reconciliation.
//!
//! The controller owns the ordered sequence of action rows. Each row carries
//! a stable [`RowId`] so commands and late asynchronous results address a
//! specific row directly instead of locating widgets by traversal.

use teaser_types::{ActionItem, ControlCommand, ControlId, RowId};

/// One stored row of the repeating action list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActionRow {
    pub id: RowId,
    pub item: ActionItem,
}

/// Result of flipping the actions toggle.
pub struct ToggleOutcome {
    /// Control mutations to apply, in order.
    pub commands: Vec<ControlCommand>,
    /// Row synthesized to keep an enabled list non-empty, with the link it
    /// was seeded with.
    pub synthesized: Option<(RowId, String)>,
}

/// Owns the action row sequence and the enable/disable choreography between
/// the single link control and the repeating list.
#[derive(Debug, Default)]
pub struct ActionListController {
    rows: Vec<ActionRow>,
    next_row: u64,
}

impl ActionListController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ActionRow] {
        &self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Link value of the first row, if any row exists.
    ///
    /// This is the effective metadata target while actions are enabled; an
    /// empty first link is still a present value and suppresses the
    /// current-page fallback.
    pub fn first_link(&self) -> Option<String> {
        self.rows.first().map(|row| row.item.link.clone())
    }

    pub fn row_id_at(&self, index: usize) -> Option<RowId> {
        self.rows.get(index).map(|row| row.id)
    }

    pub fn title_is_empty(&self, row: RowId) -> bool {
        self.rows
            .iter()
            .find(|r| r.id == row)
            .is_some_and(|r| r.item.title.is_empty())
    }

    /// Store a committed link value on a row. Returns `false` when the row
    /// no longer exists.
    pub fn set_link(&mut self, row: RowId, link: &str) -> bool {
        match self.rows.iter_mut().find(|r| r.id == row) {
            Some(r) => {
                r.item.link = link.to_string();
                true
            }
            None => false,
        }
    }

    /// Store a resolved title on a row and return the control mutation for
    /// it. Returns `None` when the row no longer exists.
    pub fn set_title(&mut self, row: RowId, title: &str) -> Option<ControlCommand> {
        let r = self.rows.iter_mut().find(|r| r.id == row)?;
        r.item.title = title.to_string();
        Some(ControlCommand::SetText {
            control: ControlId::ActionTitle(row),
            value: title.to_string(),
        })
    }

    /// Load the rows persisted with the dialog's content, assigning ids.
    pub fn absorb(&mut self, items: Vec<ActionItem>) {
        self.rows.clear();
        for item in items {
            let id = self.alloc();
            self.rows.push(ActionRow { id, item });
        }
    }

    /// Reconcile stored rows against a membership report from the list
    /// widget.
    ///
    /// Rows whose items reappear unchanged, in order, keep their ids; every
    /// other reported item gets a fresh id. An in-flight result addressed to
    /// a dropped id is discarded by its guard.
    pub fn reconcile(&mut self, items: &[ActionItem]) {
        let mut reconciled = Vec::with_capacity(items.len());
        let mut next_candidate = 0;
        for item in items {
            let matched = (next_candidate..self.rows.len()).find(|&k| self.rows[k].item == *item);
            let id = match matched {
                Some(k) => {
                    next_candidate = k + 1;
                    self.rows[k].id
                }
                None => self.alloc(),
            };
            reconciled.push(ActionRow {
                id,
                item: item.clone(),
            });
        }
        self.rows = reconciled;
    }

    /// Flip between "single link" mode and "multiple actions" mode.
    ///
    /// Enabling disables the single link controls, enables the list, and
    /// either synthesizes one row seeded with the prior single link value
    /// (empty list) or re-enables the existing rows. Disabling re-enables
    /// the single link controls, prunes rows with both link and title empty,
    /// and disables the remainder's sub-fields.
    pub fn set_actions_enabled(&mut self, enabled: bool, seed_link: Option<&str>) -> ToggleOutcome {
        let mut commands = vec![
            ControlCommand::SetEnabled {
                control: ControlId::SingleLink,
                enabled: !enabled,
            },
            ControlCommand::SetEnabled {
                control: ControlId::LinkTarget,
                enabled: !enabled,
            },
            ControlCommand::SetEnabled {
                control: ControlId::ActionList,
                enabled,
            },
        ];
        let mut synthesized = None;

        if enabled {
            if self.rows.is_empty() {
                let id = self.alloc();
                let link = seed_link.unwrap_or_default().to_string();
                let item = ActionItem {
                    link: link.clone(),
                    ..ActionItem::default()
                };
                self.rows.push(ActionRow {
                    id,
                    item: item.clone(),
                });
                commands.push(ControlCommand::AddActionRow { row: id, item });
                synthesized = Some((id, link));
            } else {
                for row in &self.rows {
                    commands.extend(row_enabled_commands(row.id, true));
                }
            }
        } else {
            let (kept, pruned): (Vec<ActionRow>, Vec<ActionRow>) =
                self.rows.drain(..).partition(|row| !row.item.is_blank());
            for row in pruned {
                commands.push(ControlCommand::RemoveActionRow { row: row.id });
            }
            for row in &kept {
                commands.extend(row_enabled_commands(row.id, false));
            }
            self.rows = kept;
        }

        ToggleOutcome { commands, synthesized }
    }

    fn alloc(&mut self) -> RowId {
        let id = RowId(self.next_row);
        self.next_row += 1;
        id
    }
}

fn row_enabled_commands(row: RowId, enabled: bool) -> [ControlCommand; 3] {
    [
        ControlCommand::SetEnabled {
            control: ControlId::ActionLink(row),
            enabled,
        },
        ControlCommand::SetEnabled {
            control: ControlId::ActionTarget(row),
            enabled,
        },
        ControlCommand::SetEnabled {
            control: ControlId::ActionTitle(row),
            enabled,
        },
    ]
}
