//! Problem model: tasks, performers, travel times, and routes.
//!
//! All model types are immutable inputs for one optimization run, except
//! [`Route`], which is a derived view rebuilt every time a chromosome is
//! decoded.
//!
//! # Key Types
//!
//! - [`Task`]: A delivery with an arrival window and optional pinned performer
//! - [`TravelTimeMatrix`]: Square, possibly asymmetric, task-to-task travel times
//! - [`Instance`]: Validated bundle of tasks, performers, and matrix
//! - [`Route`]: Ordered tasks with their estimated arrival times

mod instance;
mod matrix;
mod types;

pub use instance::{Instance, ModelError};
pub use matrix::TravelTimeMatrix;
pub use types::{PerformerId, Route, Task, TaskId};
