use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;
use std::path::PathBuf;

use hdf5::types::VarLenUnicode;
use hdf5::File as H5File;
use ndarray::s;
use ndarray::Array2;
use ndarray::Axis;

use crate::runtime::ScloomError;

// loom layout, http://linnarssonlab.org/loompy/format/
pub const MATRIX_DATASET: &str = "matrix";
pub const ROW_ATTRS_GROUP: &str = "row_attrs";
pub const COL_ATTRS_GROUP: &str = "col_attrs";

pub const ROW_ATTR_GENES: &str = "Genes";
pub const COL_ATTR_CELL_ID: &str = "cell_id";
pub const COL_ATTR_SAMPLE_NAME: &str = "sample_name";

/// Named attribute vectors for one axis of a matrix
pub type Attrs = BTreeMap<String, Vec<String>>;

/// One loom container: a genes x cells count matrix plus named row and column
/// attribute vectors, stored in a single HDF5 file.
///
/// The handle flushes and closes on drop; a container written by [`LoomFile::create`]
/// is complete on disk once create returns.
#[derive(Debug)]
pub struct LoomFile {
    file: H5File,
    path: PathBuf,
    n_rows: usize,
    n_cols: usize,
}

impl LoomFile {
    /// Persist a matrix with its attributes at `path`, replacing prior content.
    ///
    /// The attribute length invariants are checked before anything touches the
    /// filesystem, and the file is assembled under a temporary name and
    /// renamed into place, so neither a validation failure nor a killed run
    /// leaves a partial container at `path`.
    pub fn create(
        path: &Path,
        matrix: &Array2<i64>,
        row_attrs: &Attrs,
        col_attrs: &Attrs,
    ) -> anyhow::Result<()> {
        let (n_rows, n_cols) = matrix.dim();
        for (name, values) in row_attrs {
            if values.len() != n_rows {
                return Err(ScloomError::dimension_mismatch(format!(
                    "row attribute '{}' has {} entries but the matrix has {} rows",
                    name,
                    values.len(),
                    n_rows
                ))
                .into());
            }
        }
        for (name, values) in col_attrs {
            if values.len() != n_cols {
                return Err(ScloomError::dimension_mismatch(format!(
                    "column attribute '{}' has {} entries but the matrix has {} columns",
                    name,
                    values.len(),
                    n_cols
                ))
                .into());
            }
        }

        let tmp = partial_path(path);
        if tmp.exists() {
            std::fs::remove_file(&tmp)?;
        }
        {
            let file = H5File::create(&tmp)?;
            let data = matrix.as_standard_layout();
            file.new_dataset_builder()
                .with_data(data.view())
                .create(MATRIX_DATASET)?;

            let group = file.create_group(ROW_ATTRS_GROUP)?;
            for (name, values) in row_attrs {
                group
                    .new_dataset_builder()
                    .with_data(to_h5_strings(values)?.as_slice())
                    .create(name.as_str())?;
            }
            let group = file.create_group(COL_ATTRS_GROUP)?;
            for (name, values) in col_attrs {
                group
                    .new_dataset_builder()
                    .with_data(to_h5_strings(values)?.as_slice())
                    .create(name.as_str())?;
            }
        } // drop flushes and closes the handle
        std::fs::rename(&tmp, path)?;
        Ok(())
    }

    /// Open an existing container for random access and permutation.
    pub fn open(path: &Path) -> anyhow::Result<LoomFile> {
        if !path.exists() {
            return Err(ScloomError::file_not_found(path).into());
        }
        let file = H5File::open_rw(path)
            .map_err(|e| ScloomError::file_not_valid(path, Some(e.to_string())))?;
        let matrix = file
            .dataset(MATRIX_DATASET)
            .map_err(|_| ScloomError::file_not_valid(path, Some("missing matrix dataset")))?;
        let shape = matrix.shape();
        if shape.len() != 2 {
            return Err(
                ScloomError::file_not_valid(path, Some("matrix dataset is not 2-dimensional"))
                    .into(),
            );
        }
        Ok(LoomFile {
            file,
            path: path.to_path_buf(),
            n_rows: shape[0],
            n_cols: shape[1],
        })
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn row_attr(&self, name: &str) -> anyhow::Result<Vec<String>> {
        self.read_attr(ROW_ATTRS_GROUP, name)
    }

    pub fn col_attr(&self, name: &str) -> anyhow::Result<Vec<String>> {
        self.read_attr(COL_ATTRS_GROUP, name)
    }

    /// All attribute vectors of one axis, keyed by name
    pub fn col_attrs(&self) -> anyhow::Result<Attrs> {
        self.read_attrs(COL_ATTRS_GROUP)
    }

    pub fn row_attrs(&self) -> anyhow::Result<Attrs> {
        self.read_attrs(ROW_ATTRS_GROUP)
    }

    /// Read a contiguous column slice of the matrix, all rows.
    pub fn read_columns(&self, range: Range<usize>) -> anyhow::Result<Array2<i64>> {
        let dataset = self.file.dataset(MATRIX_DATASET)?;
        let block = dataset.read_slice_2d::<i64, _>(s![.., range.start..range.end])?;
        Ok(block)
    }

    /// Reorder one axis of the matrix together with its attribute vectors and
    /// persist the new layout.
    ///
    /// `ordering` must visit every index of the axis exactly once; the matrix
    /// and the attributes are never reordered independently of each other.
    pub fn permute(&mut self, ordering: &[usize], axis: Axis) -> anyhow::Result<()> {
        let n = match axis.index() {
            0 => self.n_rows,
            1 => self.n_cols,
            _ => return Err(ScloomError::permutation("axis out of range").into()),
        };
        validate_permutation(ordering, n)?;

        let dataset = self.file.dataset(MATRIX_DATASET)?;
        let matrix: Array2<i64> = dataset.read_2d()?;
        dataset.write(&matrix.select(axis, ordering))?;

        let group_name = if axis.index() == 0 {
            ROW_ATTRS_GROUP
        } else {
            COL_ATTRS_GROUP
        };
        let group = self.file.group(group_name)?;
        for name in group.member_names()? {
            let attr = group.dataset(&name)?;
            let values = attr.read_1d::<VarLenUnicode>()?;
            let reordered: Vec<VarLenUnicode> =
                ordering.iter().map(|&i| values[i].clone()).collect();
            attr.write(reordered.as_slice())?;
        }
        Ok(())
    }

    /// Explicit close, flushing pending writes. Dropping the handle has the
    /// same effect.
    pub fn close(self) -> hdf5::Result<()> {
        self.file.close()
    }

    fn read_attr(&self, group: &str, name: &str) -> anyhow::Result<Vec<String>> {
        let attr = self.file.group(group)?.dataset(name).map_err(|_| {
            ScloomError::file_not_valid(&self.path, Some(format!("missing attribute '{}'", name)))
        })?;
        let values = attr.read_1d::<VarLenUnicode>()?;
        Ok(values.iter().map(|v| v.to_string()).collect())
    }

    fn read_attrs(&self, group: &str) -> anyhow::Result<Attrs> {
        let group = self.file.group(group)?;
        let mut attrs = Attrs::new();
        for name in group.member_names()? {
            let values = group.dataset(&name)?.read_1d::<VarLenUnicode>()?;
            attrs.insert(name, values.iter().map(|v| v.to_string()).collect());
        }
        Ok(attrs)
    }
}

fn validate_permutation(ordering: &[usize], n: usize) -> Result<(), ScloomError> {
    if ordering.len() != n {
        return Err(ScloomError::permutation(format!(
            "ordering has {} entries for an axis of length {}",
            ordering.len(),
            n
        )));
    }
    let mut seen = vec![false; n];
    for &index in ordering {
        if index >= n {
            return Err(ScloomError::permutation(format!(
                "index {} out of range 0..{}",
                index, n
            )));
        }
        if seen[index] {
            return Err(ScloomError::permutation(format!("index {} repeated", index)));
        }
        seen[index] = true;
    }
    Ok(())
}

fn partial_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{}.partial", name))
}

fn to_h5_strings(values: &[String]) -> anyhow::Result<Vec<VarLenUnicode>> {
    values
        .iter()
        .map(|v| {
            v.parse()
                .map_err(|e| anyhow::anyhow!("attribute value {:?} not storable: {}", v, e))
        })
        .collect()
}
