use std::io::BufRead;
use std::path::Path;

use itertools::Itertools;
use sprs::TriMat;

use crate::runtime::ScloomError;

/// Reader for the MatrixMarket coordinate files produced by the UMI counting
/// step (matrix.mtx with companion genes.tsv / barcodes.tsv).
///
/// Entries are 1-based (row, column, count) triples; duplicate coordinates are
/// summed, as the coordinate format prescribes.
pub fn read_matrix_market(path: &Path) -> anyhow::Result<TriMat<i64>> {
    let reader = super::open_buffered(path)?;
    parse_matrix_market(reader, &path.to_string_lossy())
}

pub fn parse_matrix_market<R: BufRead>(reader: R, context: &str) -> anyhow::Result<TriMat<i64>> {
    let mut lines = reader.lines();

    let banner = lines
        .next()
        .ok_or_else(|| ScloomError::parse(context, Some("empty file")))??;
    if !banner.starts_with("%%MatrixMarket") || !banner.contains("coordinate") {
        return Err(ScloomError::parse(context, Some("not a coordinate MatrixMarket file")).into());
    }

    // comment lines may follow the banner; the first non-comment line holds
    // the dimensions
    let mut size_line = None;
    for line in lines.by_ref() {
        let line = line?;
        if !line.starts_with('%') && !line.trim().is_empty() {
            size_line = Some(line);
            break;
        }
    }
    let size_line =
        size_line.ok_or_else(|| ScloomError::parse(context, Some("missing size header")))?;
    let (n_rows, n_cols, n_entries) = parse_fields::<usize>(&size_line)
        .ok_or_else(|| ScloomError::parse(context, Some("malformed size header")))?;

    let mut matrix = TriMat::new((n_rows, n_cols));
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let (row, col, value) = parse_fields::<i64>(&line)
            .ok_or_else(|| ScloomError::parse(context, Some(format!("bad entry '{}'", line))))?;
        let (row, col) = (row as usize, col as usize);
        if row < 1 || row > n_rows || col < 1 || col > n_cols {
            return Err(ScloomError::parse(
                context,
                Some(format!("entry ({}, {}) outside {}x{}", row, col, n_rows, n_cols)),
            )
            .into());
        }
        matrix.add_triplet(row - 1, col - 1, value);
    }

    if matrix.nnz() != n_entries {
        return Err(ScloomError::parse(
            context,
            Some(format!("expected {} entries, found {}", n_entries, matrix.nnz())),
        )
        .into());
    }
    Ok(matrix)
}

fn parse_fields<T: std::str::FromStr>(line: &str) -> Option<(T, T, T)> {
    let (a, b, c) = line.split_whitespace().collect_tuple()?;
    Some((a.parse().ok()?, b.parse().ok()?, c.parse().ok()?))
}

/// Read the first tab-separated column of an identifier listing such as
/// genes.tsv or barcodes.tsv, one identifier per line in matrix order.
pub fn read_id_column(path: &Path) -> anyhow::Result<Vec<String>> {
    let reader = super::open_buffered(path)?;
    let mut ids = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        let first = line.split('\t').next().unwrap_or("");
        ids.push(first.to_string());
    }
    Ok(ids)
}
