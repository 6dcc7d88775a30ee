#![forbid(unsafe_code)]

//! Headless scenario replay for regroup.
//!
//! A [`Scenario`] scripts pan events, pointer samples, scrolling, and frame
//! ticks against a [`ListController`](regroup_list::ListController). The
//! [`replay`] function runs it and returns a [`Report`] of every committed
//! order plus frame snapshots, suitable for golden-file comparison.

pub mod cli;
pub mod error;
pub mod replay;
pub mod scenario;

pub use cli::run_from_env;
pub use error::{HarnessError, Result};
pub use replay::{CommitRecord, FrameRecord, Replayer, Report, replay};
pub use scenario::{PanStep, PointerStep, Scenario, SectionSpec, Step};
