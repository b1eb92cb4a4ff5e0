//! Digest assembly for `localbirds`.
//!
//! [`plan`] turns configuration into a list of eBird queries, [`pipeline`]
//! executes them and produces the sorted result set, [`format`] renders it,
//! and [`notify`] delivers it. [`locate`] resolves the current location when
//! no explicit points are configured.

pub mod error;
pub mod format;
pub mod locate;
pub mod notify;
pub mod pipeline;
pub mod plan;

pub use error::{LocateError, NotifyError, PipelineError};
pub use format::{filter_description, render_html, render_markdown};
pub use locate::IpLocator;
pub use notify::{EmailNotifier, TelegramNotifier};
pub use pipeline::{run, DigestRun};
pub use plan::{build_query_plan, PlannedQuery};

#[cfg(test)]
mod test_support;
