//! Field-synchronization core for the teaser editing dialog.
//!
//! Keeps the dialog's interdependent controls consistent while an author
//! edits them: inheritable title/description fields, the mutually exclusive
//! single-link / action-list pair, and the asynchronous metadata lookups
//! that supply inherited text.
//!
//! The crate follows a functional-core, imperative-shell split:
//! [`session::DialogSession`] turns events into state changes, control
//! commands, and effects; [`runtime::run_session`] is the shell that applies
//! effects and feeds completions back in.

pub mod actions;
pub mod auto_title;
pub mod field;
pub mod runtime;
pub mod session;

pub use actions::ActionListController;
pub use field::InheritableField;
pub use runtime::run_session;
pub use session::{DialogSession, SessionOutput};
