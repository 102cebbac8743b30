//! Validated problem instance.

use super::matrix::TravelTimeMatrix;
use super::types::{PerformerId, Task};
use std::collections::HashMap;

/// Errors raised while building model types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// A task window ends before it starts.
    #[error("task {index} has an inverted window [{start}, {end}]")]
    InvertedWindow {
        /// Task index.
        index: usize,
        /// Window start.
        start: i64,
        /// Window end.
        end: i64,
    },

    /// A matrix row does not match the matrix dimension.
    #[error("travel-time row {row} has {len} entries, expected {expected}")]
    RaggedMatrix {
        /// Row index.
        row: usize,
        /// Actual row length.
        len: usize,
        /// Expected row length.
        expected: usize,
    },

    /// A travel time is negative.
    #[error("travel time from {from} to {to} is negative ({time})")]
    NegativeTravelTime {
        /// Source task index.
        from: usize,
        /// Target task index.
        to: usize,
        /// Offending value.
        time: i64,
    },

    /// Matrix dimension differs from the number of tasks.
    #[error("travel-time matrix is {matrix}x{matrix} but there are {tasks} tasks")]
    MatrixSize {
        /// Matrix dimension.
        matrix: usize,
        /// Task count.
        tasks: usize,
    },

    /// The same performer appears twice in the performer list.
    #[error("performer {0:?} is listed more than once")]
    DuplicatePerformer(PerformerId),

    /// With `keep_performers`, a task is pinned to a performer missing from
    /// the performer list.
    #[error("task {index} is pinned to unknown performer {performer:?}")]
    UnknownPerformer {
        /// Task index.
        index: usize,
        /// Pinned performer.
        performer: PerformerId,
    },
}

/// Immutable inputs of one optimization run.
///
/// The order of `performers` defines the performer slot used to bind routes:
/// the route at position `k` belongs to `performers[k]`.
#[derive(Debug, Clone)]
pub struct Instance {
    tasks: Vec<Task>,
    performers: Vec<PerformerId>,
    matrix: TravelTimeMatrix,
    keep_performers: bool,
    slots: HashMap<PerformerId, usize>,
}

impl Instance {
    /// Validates and bundles the inputs.
    ///
    /// When `keep_performers` is set, tasks carrying a pinned performer must
    /// stay on that performer's route.
    ///
    /// # Errors
    /// See [`ModelError`].
    pub fn new(
        tasks: Vec<Task>,
        performers: Vec<PerformerId>,
        matrix: TravelTimeMatrix,
        keep_performers: bool,
    ) -> Result<Self, ModelError> {
        if matrix.size() != tasks.len() {
            return Err(ModelError::MatrixSize {
                matrix: matrix.size(),
                tasks: tasks.len(),
            });
        }

        let mut slots = HashMap::with_capacity(performers.len());
        for (slot, &performer) in performers.iter().enumerate() {
            if slots.insert(performer, slot).is_some() {
                return Err(ModelError::DuplicatePerformer(performer));
            }
        }

        for (index, task) in tasks.iter().enumerate() {
            if task.start > task.end {
                return Err(ModelError::InvertedWindow {
                    index,
                    start: task.start,
                    end: task.end,
                });
            }
            if let Some(performer) = task.performer.filter(|_| keep_performers) {
                if !slots.contains_key(&performer) {
                    return Err(ModelError::UnknownPerformer { index, performer });
                }
            }
        }

        Ok(Self {
            tasks,
            performers,
            matrix,
            keep_performers,
            slots,
        })
    }

    /// Tasks in index order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Performers in slot order.
    pub fn performers(&self) -> &[PerformerId] {
        &self.performers
    }

    /// Travel-time matrix.
    pub fn matrix(&self) -> &TravelTimeMatrix {
        &self.matrix
    }

    /// Whether pinned performers must be preserved.
    pub fn keep_performers(&self) -> bool {
        self.keep_performers
    }

    /// Number of tasks.
    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }

    /// Slot of a performer in the performer list.
    pub fn performer_slot(&self, performer: PerformerId) -> Option<usize> {
        self.slots.get(&performer).copied()
    }

    /// Performer slot a task must be routed under, if any.
    ///
    /// Always `None` unless `keep_performers` is set.
    pub fn pinned_slot(&self, task: usize) -> Option<usize> {
        if !self.keep_performers {
            return None;
        }
        self.tasks[task]
            .performer
            .and_then(|performer| self.performer_slot(performer))
    }

    /// Span between the earliest window start and the latest window end.
    ///
    /// Used to scale objective-space resolution. Returns 0 for an empty
    /// instance.
    pub fn horizon(&self) -> i64 {
        let start = self.tasks.iter().map(|t| t.start).min();
        let end = self.tasks.iter().map(|t| t.end).max();
        match (start, end) {
            (Some(start), Some(end)) => end.saturating_sub(start),
            _ => 0,
        }
    }
}
