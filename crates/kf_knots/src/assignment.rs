//! Minimum-cost bipartite assignment.
//!
//! Shortest-augmenting-path solver with row/column potentials
//! (Jonker–Volgenant), O(n³) over a dense square cost matrix. One row is
//! inserted per outer iteration; the potentials keep every reduced cost
//! non-negative, so each augmentation is a Dijkstra pass over columns.

use ndarray::Array2;

/// Solve the square assignment problem, minimizing total cost.
///
/// Returns, for every row, the column assigned to it. Every row and
/// every column is used exactly once.
pub fn assignment(cost: &Array2<f64>) -> Vec<usize> {
    let (n, m) = cost.dim();
    debug_assert!(n == m, "assignment requires a square matrix");
    if n == 0 {
        return Vec::new();
    }

    // 1-based arrays with column 0 as the virtual start of each path.
    let mut u = vec![0.0_f64; n + 1];
    let mut v = vec![0.0_f64; n + 1];
    let mut row_of = vec![0_usize; n + 1];
    let mut way = vec![0_usize; n + 1];

    for i in 1..=n {
        row_of[0] = i;
        let mut j0 = 0;
        let mut minv = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = row_of[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0;
            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let reduced = cost[(i0 - 1, j - 1)] - u[i0] - v[j];
                if reduced < minv[j] {
                    minv[j] = reduced;
                    way[j] = j0;
                }
                if minv[j] < delta {
                    delta = minv[j];
                    j1 = j;
                }
            }
            for j in 0..=n {
                if used[j] {
                    u[row_of[j]] += delta;
                    v[j] -= delta;
                } else {
                    minv[j] -= delta;
                }
            }
            j0 = j1;
            if row_of[j0] == 0 {
                break;
            }
        }

        // Flip the augmenting path back to the virtual column.
        loop {
            let j1 = way[j0];
            row_of[j0] = row_of[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut col_of = vec![0_usize; n];
    for j in 1..=n {
        if row_of[j] > 0 {
            col_of[row_of[j] - 1] = j - 1;
        }
    }
    col_of
}
