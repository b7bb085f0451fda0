use crate::runtime::ScloomError;

/// Permutation that sorts `ids` into ascending lexicographic order.
///
/// Applying it to a matrix and its row identifiers (jointly, via
/// `LoomFile::permute`) brings independently ordered containers into a
/// canonical row layout.
pub fn sort_permutation(ids: &[String]) -> Vec<usize> {
    let mut ordering: Vec<usize> = (0..ids.len()).collect();
    ordering.sort_by(|&a, &b| ids[a].cmp(&ids[b]));
    ordering
}

/// Check that two already-sorted identifier sequences agree at every position.
///
/// Sorting each container independently only yields row correspondence when
/// both hold the same gene set; this check must run after sorting and before
/// any positional arithmetic, and is never skipped.
pub fn verify_aligned(a: &[String], b: &[String]) -> Result<(), ScloomError> {
    if a.len() != b.len() {
        return Err(ScloomError::gene_set_mismatch(format!(
            "{} genes vs {} genes",
            a.len(),
            b.len()
        )));
    }
    for (i, (left, right)) in a.iter().zip(b.iter()).enumerate() {
        if left != right {
            return Err(ScloomError::gene_set_mismatch(format!(
                "row {} holds '{}' in one matrix and '{}' in the other",
                i, left, right
            )));
        }
    }
    Ok(())
}
