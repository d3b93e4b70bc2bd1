use crate::matrix::{TfIdfMatrix, TfMatrix};
use serde::{Deserialize, Serialize};

/// Number of rows with a nonzero entry, per column.
pub fn document_frequencies(tf: &TfMatrix) -> Vec<u32> {
    let mut df = vec![0u32; tf.n_cols()];
    for row in tf.rows() {
        for (col, count) in row.iter() {
            if count > 0 {
                df[col as usize] += 1;
            }
        }
    }
    df
}

/// `ln((1 + n_docs) / (1 + df)) + 1`. Never zero, never divides by zero.
pub fn smoothed_idf(n_docs: usize, df: u32) -> f64 {
    ((1.0 + n_docs as f64) / (1.0 + df as f64)).ln() + 1.0
}

/// IDF weight per vocabulary column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdfVector {
    pub weights: Vec<f64>,
}

impl IdfVector {
    pub fn fit(tf: &TfMatrix) -> Self {
        let n_docs = tf.n_rows();
        let weights = document_frequencies(tf).into_iter().map(|df| smoothed_idf(n_docs, df)).collect();
        Self { weights }
    }

    pub fn len(&self) -> usize { self.weights.len() }

    pub fn is_empty(&self) -> bool { self.weights.is_empty() }
}

/// Multiply every TF entry by its column's IDF.
pub fn transform(tf: &TfMatrix, idf: &IdfVector) -> TfIdfMatrix {
    tf.map_values(|col, count| count as f64 * idf.weights[col as usize])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::SparseMatrix;
    use crate::TermId;

    #[test]
    fn idf_matches_smoothed_formula() {
        // 3 docs; term 0 in all, term 1 in one
        let tf: TfMatrix = SparseMatrix::from_rows(2, vec![vec![(0, 1), (1, 2)], vec![(0, 3)], vec![(0, 1)]]);
        assert_eq!(document_frequencies(&tf), vec![3, 1]);
        let idf = IdfVector::fit(&tf);
        assert!((idf.weights[0] - 1.0).abs() < 1e-12);
        assert!((idf.weights[1] - (2.0f64.ln() + 1.0)).abs() < 1e-12);

        let w = transform(&tf, &idf);
        assert_eq!(w.shape(), tf.shape());
        assert!((w.get(0, 1) - 2.0 * (2.0f64.ln() + 1.0)).abs() < 1e-12);
        assert!((w.get(1, 0) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn empty_corpus_gives_empty_matrix() {
        let tf: TfMatrix = SparseMatrix::from_rows(0, Vec::<Vec<(TermId, u32)>>::new());
        let idf = IdfVector::fit(&tf);
        assert!(idf.is_empty());
        assert_eq!(transform(&tf, &idf).shape(), (0, 0));
    }
}
