use std::collections::BTreeMap;

/// Square `source -> target` weight matrix stored as sparse rows.
///
/// Only cells touched by a relation are stored, so memory follows the edge
/// count rather than the square of the node count.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightMatrix {
    rows: Vec<BTreeMap<usize, f64>>,
    symmetric: bool,
}

impl WeightMatrix {
    pub fn zeros(size: usize) -> Self {
        Self {
            rows: vec![BTreeMap::new(); size],
            symmetric: false,
        }
    }

    pub fn size(&self) -> usize {
        self.rows.len()
    }

    pub fn get(&self, row: usize, column: usize) -> f64 {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(&column))
            .copied()
            .unwrap_or(0.0)
    }

    pub(super) fn add(&mut self, row: usize, column: usize, weight: f64) {
        let size = self.size();
        if column >= size {
            return;
        }
        let Some(cells) = self.rows.get_mut(row) else {
            return;
        };
        *cells.entry(column).or_insert(0.0) += weight;
        self.symmetric = false;
    }

    /// Number of stored cells.
    pub fn stored_cells(&self) -> usize {
        self.rows.iter().map(BTreeMap::len).sum()
    }

    /// True once [`Self::to_undirected`] produced this matrix.
    pub fn is_undirected(&self) -> bool {
        self.symmetric
    }

    /// `M'[i][j] = M[i][j] + M[j][i]` off the diagonal, diagonal untouched.
    ///
    /// Applying it to an already undirected matrix returns it unchanged.
    pub fn to_undirected(&self) -> Self {
        if self.symmetric {
            return self.clone();
        }

        let mut rows = vec![BTreeMap::new(); self.size()];
        for (row, column, weight) in self.entries() {
            *rows[row].entry(column).or_insert(0.0) += weight;
            if row != column {
                *rows[column].entry(row).or_insert(0.0) += weight;
            }
        }

        Self {
            rows,
            symmetric: true,
        }
    }

    pub fn transpose(&self) -> Self {
        let mut rows = vec![BTreeMap::new(); self.size()];
        for (row, column, weight) in self.entries() {
            rows[column].insert(row, weight);
        }
        Self {
            rows,
            symmetric: self.symmetric,
        }
    }

    /// Stored `(column, weight)` cells of `row`, by ascending column.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.rows
            .get(row)
            .into_iter()
            .flat_map(|cells| cells.iter().map(|(&column, &weight)| (column, weight)))
    }

    /// Every stored `(row, column, weight)` cell in row-major order.
    pub fn entries(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells.iter().map(move |(&column, &weight)| (row, column, weight))
        })
    }

    pub fn row_sum(&self, row: usize) -> f64 {
        self.row(row).map(|(_, weight)| weight).sum()
    }

    pub fn column_sum(&self, column: usize) -> f64 {
        self.rows
            .iter()
            .filter_map(|cells| cells.get(&column))
            .sum()
    }

    pub fn total(&self) -> f64 {
        self.entries().map(|(_, _, weight)| weight).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeightMatrix {
        let mut matrix = WeightMatrix::zeros(3);
        matrix.add(0, 1, 4.0);
        matrix.add(1, 0, 2.0);
        matrix.add(0, 2, 1.0);
        matrix.add(2, 2, 3.0);
        matrix
    }

    #[test]
    fn undirected_sums_pairs_and_keeps_self_loops() {
        let undirected = sample().to_undirected();
        assert_eq!(undirected.get(0, 1), 6.0);
        assert_eq!(undirected.get(1, 0), 6.0);
        assert_eq!(undirected.get(0, 2), 1.0);
        assert_eq!(undirected.get(2, 0), 1.0);
        assert_eq!(undirected.get(2, 2), 3.0);
    }

    #[test]
    fn undirected_is_idempotent() {
        let once = sample().to_undirected();
        let twice = once.to_undirected();
        assert_eq!(once, twice);
    }

    #[test]
    fn row_and_column_sums() {
        let matrix = sample();
        assert_eq!(matrix.row_sum(0), 5.0);
        assert_eq!(matrix.column_sum(0), 2.0);
        assert_eq!(matrix.total(), 10.0);
        assert_eq!(matrix.transpose().row_sum(0), 2.0);
        assert_eq!(matrix.get(7, 7), 0.0);
        assert!(matrix.row(9).next().is_none());
        assert_eq!(matrix.row(0).collect::<Vec<_>>(), [(1, 4.0), (2, 1.0)]);
    }

    #[test]
    fn storage_follows_touched_cells() {
        let size = 10_000;
        let mut matrix = WeightMatrix::zeros(size);
        for index in 0..size {
            matrix.add(index, (index + 1) % size, 1.0);
        }
        assert_eq!(matrix.stored_cells(), size);
        assert_eq!(matrix.to_undirected().stored_cells(), size * 2);
        assert_eq!(matrix.transpose().stored_cells(), size);
        matrix.add(size, 0, 1.0);
        matrix.add(0, size, 1.0);
        assert_eq!(matrix.stored_cells(), size);
    }
}
