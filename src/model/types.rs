//! Plain data types shared by the decoder, evaluator, and driver.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Opaque task identifier.
///
/// Wide enough to carry a UUID (`u128::from_be_bytes(uuid.as_bytes())`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TaskId(pub u128);

/// Opaque performer (courier / vehicle) identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PerformerId(pub u128);

/// A delivery task with an arrival window.
///
/// `start` and `end` are offsets in abstract time units relative to an epoch
/// shared by every task of the instance. Service must begin within
/// `[start, end]`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Task {
    /// Task identifier.
    pub id: TaskId,

    /// Performer the task is already committed to, if any.
    ///
    /// Only binding when the instance is built with `keep_performers`.
    pub performer: Option<PerformerId>,

    /// Earliest arrival offset.
    pub start: i64,

    /// Latest arrival offset.
    pub end: i64,
}

impl Task {
    /// Creates an unpinned task.
    pub fn new(id: TaskId, start: i64, end: i64) -> Self {
        Self {
            id,
            performer: None,
            start,
            end,
        }
    }

    /// Pins the task to a performer.
    pub fn with_performer(mut self, performer: PerformerId) -> Self {
        self.performer = Some(performer);
        self
    }

    /// Returns `true` if `eta` lies inside the arrival window.
    #[inline]
    pub fn accepts(&self, eta: i64) -> bool {
        self.start <= eta && eta <= self.end
    }
}

/// An ordered sequence of task indices with parallel arrival times.
///
/// `tasks[i]` is an index into the instance task list and `eta[i]` is the
/// estimated arrival at that task. Both vectors always have the same length
/// and `eta` is non-decreasing.
///
/// `performer` is `None` when the route was opened after every performer
/// had already been bound to an earlier route.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    /// Task indices in visiting order.
    pub tasks: Vec<usize>,

    /// Estimated arrival time per visited task.
    pub eta: Vec<i64>,

    /// Bound performer.
    pub performer: Option<PerformerId>,
}

impl Route {
    /// Creates an empty route bound to `performer`.
    pub fn new(performer: Option<PerformerId>) -> Self {
        Self {
            tasks: Vec::new(),
            eta: Vec::new(),
            performer,
        }
    }

    /// Number of visited tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Returns `true` if the route visits no task.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Last visited task and its arrival time.
    pub fn last(&self) -> Option<(usize, i64)> {
        Some((*self.tasks.last()?, *self.eta.last()?))
    }

    /// Appends a task with its arrival time.
    pub fn push(&mut self, task: usize, eta: i64) {
        self.tasks.push(task);
        self.eta.push(eta);
    }

    /// Time between the first and the last arrival (0 for empty routes).
    pub fn duration(&self) -> i64 {
        match (self.eta.first(), self.eta.last()) {
            (Some(first), Some(last)) => last.saturating_sub(*first),
            _ => 0,
        }
    }
}
