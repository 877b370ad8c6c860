mod engine;
mod format;
mod summary;
mod types;

pub use engine::{project, run_projection};
pub use format::format_inr;
pub use summary::{MONTHLY_WITHDRAWAL_RATE_PCT, summarize};
pub use types::{InflationInsight, Projection, ProjectionInputs, ProjectionSummary, YearlyRecord};
