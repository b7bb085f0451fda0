use std::collections::HashSet;
use std::io::BufRead;
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref GENE_ID_PATTERN: Regex = Regex::new(r#"gene_id "(.+?)""#).unwrap();
}

/// Collect the set of all gene_id values occurring in a GTF annotation.
///
/// Lines without a gene_id attribute (headers, comments, records of other
/// schemas) contribute nothing and are skipped; only an unreadable file is an
/// error. An empty result is legal but almost always means the wrong file was
/// given, so callers should warn about it.
pub fn gene_universe(path: &Path) -> anyhow::Result<HashSet<String>> {
    let reader = super::open_buffered(path)?;
    gene_universe_from_reader(reader)
}

pub fn gene_universe_from_reader<R: BufRead>(reader: R) -> anyhow::Result<HashSet<String>> {
    let mut gene_ids = HashSet::new();
    for line in reader.lines() {
        let line = line?;
        if let Some(captures) = GENE_ID_PATTERN.captures(&line) {
            gene_ids.insert(captures[1].to_string());
        }
    }
    Ok(gene_ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_gene_ids() {
        let gtf = concat!(
            "#!genome-build GRCm38\n",
            "1\thavana\tgene\t3073253\t3074322\t.\t+\t.\tgene_id \"ENSMUSG00000102693\"; gene_version \"1\";\n",
            "1\thavana\ttranscript\t3073253\t3074322\t.\t+\t.\tgene_id \"ENSMUSG00000102693\"; transcript_id \"ENSMUST00000193812\";\n",
            "1\tensembl\tgene\t3102016\t3102125\t.\t+\t.\tgene_id \"ENSMUSG00000064842\"; gene_version \"1\";\n",
            "this line has no identifier at all\n",
        );
        let ids = gene_universe_from_reader(Cursor::new(gtf)).unwrap();
        assert_eq!(ids.len(), 2);
        assert!(ids.contains("ENSMUSG00000102693"));
        assert!(ids.contains("ENSMUSG00000064842"));
    }

    #[test]
    fn empty_annotation_is_not_an_error() {
        let ids = gene_universe_from_reader(Cursor::new("# only comments\n")).unwrap();
        assert!(ids.is_empty());
    }
}
