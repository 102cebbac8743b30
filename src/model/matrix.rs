//! Travel-time matrix.

use super::instance::ModelError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Square matrix of non-negative travel times between tasks.
///
/// Stored row-major. `get(from, to)` is the time needed to travel from task
/// `from` to task `to`; values may be asymmetric and the diagonal is unused.
///
/// # Examples
///
/// ```
/// use u_vrptw::model::TravelTimeMatrix;
///
/// let m = TravelTimeMatrix::new(vec![vec![0, 5], vec![7, 0]]).unwrap();
/// assert_eq!(m.get(0, 1), 5);
/// assert_eq!(m.get(1, 0), 7);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TravelTimeMatrix {
    size: usize,
    times: Vec<i64>,
}

impl TravelTimeMatrix {
    /// Builds a matrix from rows.
    ///
    /// # Errors
    /// Returns [`ModelError::RaggedMatrix`] if any row length differs from the
    /// row count, and [`ModelError::NegativeTravelTime`] for negative entries
    /// off the diagonal.
    pub fn new(rows: Vec<Vec<i64>>) -> Result<Self, ModelError> {
        let size = rows.len();
        let mut times = Vec::with_capacity(size * size);

        for (from, row) in rows.into_iter().enumerate() {
            if row.len() != size {
                return Err(ModelError::RaggedMatrix {
                    row: from,
                    len: row.len(),
                    expected: size,
                });
            }
            for (to, &time) in row.iter().enumerate() {
                if from != to && time < 0 {
                    return Err(ModelError::NegativeTravelTime { from, to, time });
                }
            }
            times.extend(row);
        }

        Ok(Self { size, times })
    }

    /// Matrix of the given size with every entry set to `time`.
    pub fn uniform(size: usize, time: i64) -> Self {
        Self {
            size,
            times: vec![time.max(0); size * size],
        }
    }

    /// Number of rows (and columns).
    pub fn size(&self) -> usize {
        self.size
    }

    /// Travel time from task `from` to task `to`.
    ///
    /// # Panics
    /// Panics if either index is out of bounds.
    #[inline]
    pub fn get(&self, from: usize, to: usize) -> i64 {
        assert!(from < self.size && to < self.size, "matrix index out of bounds");
        self.times[from * self.size + to]
    }

    /// Overwrites a single entry.
    ///
    /// # Errors
    /// Returns [`ModelError::NegativeTravelTime`] for a negative value.
    pub fn set(&mut self, from: usize, to: usize, time: i64) -> Result<(), ModelError> {
        if time < 0 {
            return Err(ModelError::NegativeTravelTime { from, to, time });
        }
        assert!(from < self.size && to < self.size, "matrix index out of bounds");
        self.times[from * self.size + to] = time;
        Ok(())
    }
}
