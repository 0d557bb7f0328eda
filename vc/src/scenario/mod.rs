//! Replayable page-session scenarios
//!
//! A scenario describes mounted filter panels, the views whose widgets
//! register, and an ordered list of steps. The `vc` binary checks and
//! replays them; integration tests use them to script whole sessions.
//!
//! ```yaml
//! panels:
//!   - id: logs-filters
//!     view: logs
//!     controls:
//!       - { name: status, kind: select, value: active }
//! views:
//!   - { id: logs, kind: server }
//! steps:
//!   - { signal: apply_clicked, panel: logs-filters }
//!   - { signal: item_created, view_id: logs }
//! ```

mod model;
mod replay;

pub use model::{Scenario, ScenarioError, Step, ViewSpec, WidgetKind};
pub use replay::{Replay, ReplayReport, SimulatedWidget, StepReport, WidgetReport};
