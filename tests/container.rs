use std::fs;
use std::path::PathBuf;

use ndarray::{array, Array2, Axis};

use scloom::command::{Convert, Intron};
use scloom::fileformat::loom::{COL_ATTR_CELL_ID, COL_ATTR_SAMPLE_NAME, ROW_ATTR_GENES};
use scloom::fileformat::{Attrs, LoomFile};
use scloom::matrix::ChunkPolicy;
use scloom::ScloomError;

fn workdir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("scloom_test_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn strings(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

fn attrs(entries: &[(&str, &[&str])]) -> Attrs {
    entries
        .iter()
        .map(|&(name, values)| (name.to_string(), strings(values)))
        .collect()
}

#[test]
fn write_and_read_back() {
    let dir = workdir("roundtrip");
    let path = dir.join("sample.loom");

    let matrix = array![[1i64, 2], [3, 4], [5, 6]];
    let row_attrs = attrs(&[(ROW_ATTR_GENES, &["g1", "g2", "g3"])]);
    let col_attrs = attrs(&[
        (COL_ATTR_CELL_ID, &["AAAC", "TTTG"]),
        (COL_ATTR_SAMPLE_NAME, &["s1", "s1"]),
    ]);
    LoomFile::create(&path, &matrix, &row_attrs, &col_attrs).unwrap();

    let loom = LoomFile::open(&path).unwrap();
    assert_eq!(loom.shape(), (3, 2));
    assert_eq!(loom.row_attr(ROW_ATTR_GENES).unwrap(), strings(&["g1", "g2", "g3"]));
    assert_eq!(loom.col_attr(COL_ATTR_CELL_ID).unwrap(), strings(&["AAAC", "TTTG"]));
    assert_eq!(loom.read_columns(0..2).unwrap(), matrix);
    assert_eq!(loom.read_columns(1..2).unwrap(), array![[2i64], [4], [6]]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn bad_attribute_length_leaves_no_file() {
    let dir = workdir("badattrs");
    let path = dir.join("bad.loom");

    let matrix = Array2::<i64>::zeros((3, 2));
    let row_attrs = attrs(&[(ROW_ATTR_GENES, &["g1", "g2"])]); // 2 names, 3 rows
    let err = LoomFile::create(&path, &matrix, &row_attrs, &Attrs::new()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScloomError>(),
        Some(ScloomError::DimensionMismatch { .. })
    ));
    assert!(!path.exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn open_missing_container_fails() {
    let dir = workdir("missing");
    let err = LoomFile::open(&dir.join("nothing.loom")).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScloomError>(),
        Some(ScloomError::FileNotFound { .. })
    ));
    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn permute_reorders_matrix_and_attributes_together() {
    let dir = workdir("permute");
    let path = dir.join("perm.loom");

    let matrix = array![[30i64, 31], [10, 11], [20, 21]];
    let row_attrs = attrs(&[(ROW_ATTR_GENES, &["g3", "g1", "g2"])]);
    LoomFile::create(&path, &matrix, &row_attrs, &Attrs::new()).unwrap();

    let mut loom = LoomFile::open(&path).unwrap();
    loom.permute(&[1, 2, 0], Axis(0)).unwrap();
    loom.close().unwrap();

    let loom = LoomFile::open(&path).unwrap();
    assert_eq!(loom.row_attr(ROW_ATTR_GENES).unwrap(), strings(&["g1", "g2", "g3"]));
    assert_eq!(
        loom.read_columns(0..2).unwrap(),
        array![[10i64, 11], [20, 21], [30, 31]]
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn permute_rejects_non_bijections() {
    let dir = workdir("permbad");
    let path = dir.join("perm.loom");

    let matrix = Array2::<i64>::zeros((3, 1));
    let row_attrs = attrs(&[(ROW_ATTR_GENES, &["g1", "g2", "g3"])]);
    LoomFile::create(&path, &matrix, &row_attrs, &Attrs::new()).unwrap();

    let mut loom = LoomFile::open(&path).unwrap();
    for bad in [vec![0usize, 1], vec![0, 0, 1], vec![0, 1, 5]] {
        let err = loom.permute(&bad, Axis(0)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScloomError>(),
            Some(ScloomError::Permutation { .. })
        ));
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn intron_derivation_aligns_and_subtracts() {
    let dir = workdir("intron");
    let path_component = dir.join("exon.loom");
    let path_total = dir.join("gene.loom");
    let path_out = dir.join("intron.loom");

    // same genes, deliberately different row order
    LoomFile::create(
        &path_component,
        &array![[1i64, 2], [3, 4]],
        &attrs(&[(ROW_ATTR_GENES, &["g2", "g1"])]),
        &attrs(&[(COL_ATTR_CELL_ID, &["AAAC", "TTTG"])]),
    )
    .unwrap();
    LoomFile::create(
        &path_total,
        &array![[5i64, 6], [7, 8]],
        &attrs(&[(ROW_ATTR_GENES, &["g1", "g2"])]),
        &attrs(&[(COL_ATTR_CELL_ID, &["AAAC", "TTTG"])]),
    )
    .unwrap();

    Intron::run(&Intron {
        path_component: path_component.clone(),
        path_total: path_total.clone(),
        path_out: path_out.clone(),
        policy: ChunkPolicy::default(),
    })
    .unwrap();

    let loom = LoomFile::open(&path_out).unwrap();
    assert_eq!(loom.row_attr(ROW_ATTR_GENES).unwrap(), strings(&["g1", "g2"]));
    assert_eq!(loom.col_attr(COL_ATTR_CELL_ID).unwrap(), strings(&["AAAC", "TTTG"]));
    // total sorted: g1=[5,6] g2=[7,8]; component sorted: g1=[3,4] g2=[1,2]
    assert_eq!(loom.read_columns(0..2).unwrap(), array![[2i64, 2], [6, 6]]);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn intron_derivation_rejects_differing_gene_sets() {
    let dir = workdir("intronmismatch");
    let path_component = dir.join("exon.loom");
    let path_total = dir.join("gene.loom");

    LoomFile::create(
        &path_component,
        &array![[1i64], [2]],
        &attrs(&[(ROW_ATTR_GENES, &["g1", "g2"])]),
        &Attrs::new(),
    )
    .unwrap();
    LoomFile::create(
        &path_total,
        &array![[1i64], [2]],
        &attrs(&[(ROW_ATTR_GENES, &["g1", "g3"])]),
        &Attrs::new(),
    )
    .unwrap();

    let err = Intron::run(&Intron {
        path_component,
        path_total,
        path_out: dir.join("intron.loom"),
        policy: ChunkPolicy::default(),
    })
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<ScloomError>(),
        Some(ScloomError::GeneSetMismatch { .. })
    ));
    assert!(!dir.join("intron.loom").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn convert_pads_against_the_gene_universe() {
    let dir = workdir("convert");

    fs::write(
        dir.join("matrix.mtx"),
        concat!(
            "%%MatrixMarket matrix coordinate integer general\n",
            "2 2 4\n",
            "1 1 1\n1 2 2\n2 1 3\n2 2 4\n",
        ),
    )
    .unwrap();
    fs::write(dir.join("genes.tsv"), "g1\tg1\ng3\tg3\n").unwrap();
    fs::write(dir.join("barcodes.tsv"), "AAAC\nTTTG\n").unwrap();
    fs::write(
        dir.join("anno.gtf"),
        concat!(
            "1\tx\tgene\t1\t10\t.\t+\t.\tgene_id \"g1\";\n",
            "1\tx\tgene\t20\t30\t.\t+\t.\tgene_id \"g2\";\n",
            "1\tx\tgene\t40\t50\t.\t+\t.\tgene_id \"g3\";\n",
        ),
    )
    .unwrap();

    Convert::run(&Convert {
        sample_id: "sampleA".to_string(),
        path_in: dir.join("matrix.mtx"),
        path_gtf: dir.join("anno.gtf"),
        path_out: dir.join("out.loom"),
    })
    .unwrap();

    let loom = LoomFile::open(&dir.join("out.loom")).unwrap();
    assert_eq!(loom.shape(), (3, 2));
    assert_eq!(loom.row_attr(ROW_ATTR_GENES).unwrap(), strings(&["g1", "g3", "g2"]));
    assert_eq!(
        loom.col_attr(COL_ATTR_SAMPLE_NAME).unwrap(),
        strings(&["sampleA", "sampleA"])
    );
    assert_eq!(
        loom.read_columns(0..2).unwrap(),
        array![[1i64, 2], [3, 4], [0, 0]]
    );

    let _ = fs::remove_dir_all(&dir);
}
