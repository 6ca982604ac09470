//! Interactive message framework: ownership gating, pagination and
//! result-to-menu binding, plus the runtime that drives live views.

pub mod binder;
pub mod display;
pub mod gate;
pub mod paginator;
pub mod session;
pub mod view;

pub use binder::{Binding, DetailSource, ResultBinder, SelectionEntry, SelectionMenu};
pub use display::{DEFAULT_COLOR, DisplayUnit};
pub use gate::InteractionGate;
pub use paginator::{Action, PaginationSession, Paginator, Transition};
pub use session::{SessionRegistry, launch};
pub use view::{InteractiveView, PendingFollowup, ViewUpdate};
