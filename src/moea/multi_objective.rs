//! Pareto utilities.
//!
//! # Algorithms
//!
//! - [`pareto_dominance`]: dominance relation between two objective vectors
//! - [`non_dominated_sort`]: fast non-dominated sorting (Deb et al., 2002)
//! - [`crowding_distance`]: diversity measure within one front
//! - [`select_and_rank`]: NSGA-II truncation by front, then crowding
//!
//! All objectives are **minimized**.
//!
//! # References
//!
//! - Deb et al. (2002), "A Fast and Elitist Multiobjective Genetic Algorithm: NSGA-II",
//!   IEEE Transactions on Evolutionary Computation, 6(2), 182-197

use std::cmp::Ordering;

/// Outcome of a dominance comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dominance {
    /// Left dominates right.
    Left,
    /// Right dominates left.
    Right,
    /// Neither dominates the other.
    Neither,
}

/// Compares two objective vectors for Pareto dominance.
///
/// `a` dominates `b` if it is no worse in every objective and strictly
/// better in at least one.
pub fn pareto_dominance(a: &[f64], b: &[f64]) -> Dominance {
    let mut a_better = false;
    let mut b_better = false;

    for (&va, &vb) in a.iter().zip(b) {
        if va < vb {
            a_better = true;
        } else if vb < va {
            b_better = true;
        }
    }

    match (a_better, b_better) {
        (true, false) => Dominance::Left,
        (false, true) => Dominance::Right,
        _ => Dominance::Neither,
    }
}

/// Result of non-dominated sorting.
#[derive(Debug, Clone)]
pub struct NondominatedSortResult {
    /// Pareto rank per solution (0 = first front).
    pub ranks: Vec<usize>,

    /// Solution indices grouped by front.
    pub fronts: Vec<Vec<usize>>,
}

/// Fast non-dominated sorting.
///
/// # Complexity
///
/// O(m · n²) for n solutions with m objectives.
///
/// # Example
///
/// ```
/// use u_vrptw::moea::multi_objective::non_dominated_sort;
///
/// let objectives = vec![
///     vec![1.0, 5.0],
///     vec![3.0, 3.0],
///     vec![5.0, 1.0],
///     vec![4.0, 4.0], // dominated by (3, 3)
/// ];
/// let result = non_dominated_sort(&objectives);
/// assert_eq!(result.ranks, vec![0, 0, 0, 1]);
/// ```
pub fn non_dominated_sort(objectives: &[Vec<f64>]) -> NondominatedSortResult {
    let n = objectives.len();
    if n == 0 {
        return NondominatedSortResult {
            ranks: Vec::new(),
            fronts: Vec::new(),
        };
    }

    let mut domination_count = vec![0usize; n];
    let mut dominates: Vec<Vec<usize>> = vec![Vec::new(); n];

    for i in 0..n {
        for j in (i + 1)..n {
            match pareto_dominance(&objectives[i], &objectives[j]) {
                Dominance::Left => {
                    dominates[i].push(j);
                    domination_count[j] += 1;
                }
                Dominance::Right => {
                    dominates[j].push(i);
                    domination_count[i] += 1;
                }
                Dominance::Neither => {}
            }
        }
    }

    let mut ranks = vec![0usize; n];
    let mut current: Vec<usize> = (0..n).filter(|&i| domination_count[i] == 0).collect();
    let mut fronts = Vec::new();

    while !current.is_empty() {
        let mut next = Vec::new();
        for &i in &current {
            for &j in &dominates[i] {
                domination_count[j] -= 1;
                if domination_count[j] == 0 {
                    ranks[j] = fronts.len() + 1;
                    next.push(j);
                }
            }
        }
        fronts.push(current);
        current = next;
    }

    NondominatedSortResult { ranks, fronts }
}

/// Crowding distance of each solution within one front.
///
/// Boundary solutions of any objective receive `f64::INFINITY`; interior
/// solutions accumulate the normalized gap between their neighbours.
///
/// # Complexity
///
/// O(m · n log n)
pub fn crowding_distance(objectives: &[Vec<f64>]) -> Vec<f64> {
    let n = objectives.len();
    if n <= 2 {
        return vec![f64::INFINITY; n];
    }

    let m = objectives[0].len();
    let mut distances = vec![0.0f64; n];
    let mut order: Vec<usize> = (0..n).collect();

    for k in 0..m {
        order.sort_by(|&a, &b| {
            objectives[a][k]
                .partial_cmp(&objectives[b][k])
                .unwrap_or(Ordering::Equal)
        });

        distances[order[0]] = f64::INFINITY;
        distances[order[n - 1]] = f64::INFINITY;

        let range = objectives[order[n - 1]][k] - objectives[order[0]][k];
        if range > 0.0 {
            for i in 1..(n - 1) {
                let gap = objectives[order[i + 1]][k] - objectives[order[i - 1]][k];
                distances[order[i]] += gap / range;
            }
        }
    }

    distances
}

/// Rank and crowding distance of one selected solution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedIndex {
    /// Index into the input slice.
    pub index: usize,
    /// Pareto rank (0 = first front).
    pub rank: usize,
    /// Crowding distance within its front.
    pub crowding: f64,
}

impl RankedIndex {
    /// Crowded-comparison order: lower rank first, then larger crowding.
    pub fn crowded_cmp(&self, other: &Self) -> Ordering {
        self.rank.cmp(&other.rank).then_with(|| {
            other
                .crowding
                .partial_cmp(&self.crowding)
                .unwrap_or(Ordering::Equal)
        })
    }
}

/// Selects `n` solutions the way NSGA-II truncates its merged population.
///
/// Whole fronts are taken while they fit; the front that overflows is
/// sorted by descending crowding distance and cut.
pub fn select_and_rank(objectives: &[Vec<f64>], n: usize) -> Vec<RankedIndex> {
    let n = n.min(objectives.len());
    let sorted = non_dominated_sort(objectives);
    let mut selected = Vec::with_capacity(n);

    for (rank, front) in sorted.fronts.iter().enumerate() {
        if selected.len() >= n {
            break;
        }
        let front_objectives: Vec<Vec<f64>> = front.iter().map(|&i| objectives[i].clone()).collect();
        let distances = crowding_distance(&front_objectives);

        let mut ranked: Vec<RankedIndex> = front
            .iter()
            .zip(distances)
            .map(|(&index, crowding)| RankedIndex { index, rank, crowding })
            .collect();

        let missing = n - selected.len();
        if ranked.len() > missing {
            ranked.sort_by(|a, b| a.crowded_cmp(b));
            ranked.truncate(missing);
        }
        selected.extend(ranked);
    }

    selected
}

/// Indices of the solutions no other solution dominates.
pub fn nondominated_indices(objectives: &[Vec<f64>]) -> Vec<usize> {
    non_dominated_sort(objectives)
        .fronts
        .into_iter()
        .next()
        .unwrap_or_default()
}
