use std::collections::HashSet;

use ndarray::concatenate;
use ndarray::Array2;
use ndarray::Axis;

/// Pad a count matrix with zero rows for every gene of the universe that is
/// absent from it.
///
/// Returns a new matrix and row-name vector; the inputs are consumed, existing
/// rows and the column count are untouched. Missing genes are appended in
/// ascending identifier order so that two reconciliations of the same inputs
/// always produce the same row layout.
pub fn reconcile(
    matrix: Array2<i64>,
    row_names: Vec<String>,
    universe: &HashSet<String>,
) -> anyhow::Result<(Array2<i64>, Vec<String>)> {
    let present: HashSet<&str> = row_names.iter().map(|n| n.as_str()).collect();
    let mut missing: Vec<&String> = universe
        .iter()
        .filter(|gene| !present.contains(gene.as_str()))
        .collect();
    if missing.is_empty() {
        return Ok((matrix, row_names));
    }
    missing.sort();

    let zero_rows = Array2::<i64>::zeros((missing.len(), matrix.ncols()));
    let padded = concatenate(Axis(0), &[matrix.view(), zero_rows.view()])?;

    let mut padded_names = row_names;
    padded_names.extend(missing.into_iter().cloned());
    Ok((padded, padded_names))
}
