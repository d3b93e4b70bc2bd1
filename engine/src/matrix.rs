//! Compressed sparse row storage for document × term matrices.

use crate::TermId;
use serde::{Deserialize, Serialize};

/// Raw term counts.
pub type TfMatrix = SparseMatrix<u32>;
/// TF weighted by smoothed IDF.
pub type TfIdfMatrix = SparseMatrix<f64>;

/// CSR matrix. Row `d` owns `indices[indptr[d]..indptr[d + 1]]`, sorted by column.
/// Entries not stored are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseMatrix<T> {
    n_rows: usize,
    n_cols: usize,
    indptr: Vec<usize>,
    indices: Vec<TermId>,
    data: Vec<T>,
}

/// Borrowed view of one matrix row.
#[derive(Debug, Clone, Copy)]
pub struct SparseRow<'a, T> {
    pub indices: &'a [TermId],
    pub values: &'a [T],
}

impl<'a, T: Copy> SparseRow<'a, T> {
    pub fn iter(&self) -> impl Iterator<Item = (TermId, T)> + 'a {
        self.indices.iter().copied().zip(self.values.iter().copied())
    }

    pub fn nnz(&self) -> usize { self.indices.len() }

    pub fn is_empty(&self) -> bool { self.indices.is_empty() }
}

impl<T: Copy + Default> SparseMatrix<T> {
    /// Build from per-row `(column, value)` entries. Columns must be `< n_cols`
    /// and unique within a row; order within a row does not matter.
    pub fn from_rows<R>(n_cols: usize, rows: R) -> Self
    where
        R: IntoIterator,
        R::Item: IntoIterator<Item = (TermId, T)>,
    {
        let mut indptr = vec![0];
        let mut indices = Vec::new();
        let mut data = Vec::new();
        for row in rows {
            let mut entries: Vec<(TermId, T)> = row.into_iter().collect();
            entries.sort_unstable_by_key(|(col, _)| *col);
            for (col, value) in entries {
                debug_assert!((col as usize) < n_cols, "column {col} out of range");
                indices.push(col);
                data.push(value);
            }
            indptr.push(indices.len());
        }
        Self { n_rows: indptr.len() - 1, n_cols, indptr, indices, data }
    }

    pub fn empty(n_cols: usize) -> Self {
        Self { n_rows: 0, n_cols, indptr: vec![0], indices: Vec::new(), data: Vec::new() }
    }

    pub fn shape(&self) -> (usize, usize) { (self.n_rows, self.n_cols) }

    pub fn n_rows(&self) -> usize { self.n_rows }

    pub fn n_cols(&self) -> usize { self.n_cols }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize { self.data.len() }

    /// Panics if `d >= n_rows`.
    pub fn row(&self, d: usize) -> SparseRow<'_, T> {
        let (start, end) = (self.indptr[d], self.indptr[d + 1]);
        SparseRow { indices: &self.indices[start..end], values: &self.data[start..end] }
    }

    pub fn rows(&self) -> impl Iterator<Item = SparseRow<'_, T>> {
        (0..self.n_rows).map(move |d| self.row(d))
    }

    pub fn dense_row(&self, d: usize) -> Vec<T> {
        let mut dense = vec![T::default(); self.n_cols];
        for (col, value) in self.row(d).iter() {
            dense[col as usize] = value;
        }
        dense
    }

    pub fn get(&self, d: usize, t: TermId) -> T {
        let row = self.row(d);
        match row.indices.binary_search(&t) {
            Ok(pos) => row.values[pos],
            Err(_) => T::default(),
        }
    }

    /// Apply `f(column, value)` to every stored entry, keeping the sparsity pattern.
    pub fn map_values<U, F>(&self, mut f: F) -> SparseMatrix<U>
    where
        F: FnMut(TermId, T) -> U,
    {
        let data = self.indices.iter().zip(self.data.iter()).map(|(&col, &v)| f(col, v)).collect();
        SparseMatrix {
            n_rows: self.n_rows,
            n_cols: self.n_cols,
            indptr: self.indptr.clone(),
            indices: self.indices.clone(),
            data,
        }
    }

    /// Stored entries as `(row, column, value)`.
    pub fn triplets(&self) -> impl Iterator<Item = (usize, TermId, T)> + '_ {
        (0..self.n_rows).flat_map(move |d| self.row(d).iter().map(move |(t, v)| (d, t, v)))
    }
}

impl SparseRow<'_, f64> {
    pub fn norm(&self) -> f64 {
        self.values.iter().map(|v| v * v).sum::<f64>().sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_sorted_and_dense_rows_fill_zeros() {
        let m: TfMatrix = SparseMatrix::from_rows(4, vec![vec![(3, 1), (0, 2)], vec![], vec![(1, 5)]]);
        assert_eq!(m.shape(), (3, 4));
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(0).indices, &[0, 3]);
        assert_eq!(m.dense_row(0), vec![2, 0, 0, 1]);
        assert!(m.row(1).is_empty());
        assert_eq!(m.get(2, 1), 5);
        assert_eq!(m.get(2, 0), 0);
    }

    #[test]
    fn empty_matrix_has_zero_rows() {
        let m: TfMatrix = SparseMatrix::from_rows(0, Vec::<Vec<(TermId, u32)>>::new());
        assert_eq!(m.shape(), (0, 0));
        assert_eq!(m, SparseMatrix::empty(0));
        assert_eq!(m.rows().count(), 0);
    }

    #[test]
    fn map_values_keeps_pattern() {
        let m: TfMatrix = SparseMatrix::from_rows(2, vec![vec![(1, 2)], vec![(0, 3)]]);
        let w = m.map_values(|col, v| v as f64 * (col as f64 + 0.5));
        assert_eq!(w.shape(), m.shape());
        assert_eq!(w.get(0, 1), 3.0);
        assert_eq!(w.get(1, 0), 1.5);
        assert!((w.row(0).norm() - 3.0).abs() < 1e-12);
    }
}
