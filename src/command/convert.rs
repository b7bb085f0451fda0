use std::path::Path;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ndarray::Array2;

use crate::fileformat::gene_universe;
use crate::fileformat::loom::COL_ATTR_CELL_ID;
use crate::fileformat::loom::COL_ATTR_SAMPLE_NAME;
use crate::fileformat::loom::ROW_ATTR_GENES;
use crate::fileformat::read_id_column;
use crate::fileformat::read_matrix_market;
use crate::fileformat::Attrs;
use crate::fileformat::LoomFile;
use crate::matrix::reconcile;
use crate::runtime::ScloomError;

pub const GENES_COMPANION: &str = "genes.tsv";
pub const BARCODES_COMPANION: &str = "barcodes.tsv";

#[derive(Args)]
pub struct ConvertCMD {
    /// Sample identifier, stored per cell in the column metadata
    #[arg(short = 's', long = "sample-id")]
    pub sample_id: String,

    /// UMI count matrix in MatrixMarket format; genes.tsv and barcodes.tsv
    /// are expected next to it
    #[arg(short = 'i', value_parser)]
    pub path_in: PathBuf,

    /// GTF annotation defining the gene universe
    #[arg(short = 'g', value_parser)]
    pub path_gtf: PathBuf,

    /// Full path of the loom file to create
    #[arg(short = 'o', value_parser)]
    pub path_out: PathBuf,
}
impl ConvertCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        Convert::run(&Convert {
            sample_id: self.sample_id.clone(),
            path_in: self.path_in.clone(),
            path_gtf: self.path_gtf.clone(),
            path_out: self.path_out.clone(),
        })?;

        log::info!("Convert has finished succesfully");
        Ok(())
    }
}

pub struct Convert {
    pub sample_id: String,
    pub path_in: PathBuf,
    pub path_gtf: PathBuf,
    pub path_out: PathBuf,
}
impl Convert {
    /// Ingestion path for one sample: read the sparse matrix and its
    /// companions, pad it against the annotation's gene universe and persist
    /// the result as a loom container.
    pub fn run(params: &Convert) -> anyhow::Result<()> {
        log::info!("Reading count matrix {}", params.path_in.display());
        let triplets = read_matrix_market(&params.path_in)?;
        let (n_genes, n_cells) = triplets.shape();

        let basepath = params.path_in.parent().unwrap_or(Path::new("."));
        let genes = read_id_column(&basepath.join(GENES_COMPANION))?;
        let barcodes = read_id_column(&basepath.join(BARCODES_COMPANION))?;
        if genes.len() != n_genes {
            return Err(ScloomError::dimension_mismatch(format!(
                "{} lists {} genes but the matrix has {} rows",
                GENES_COMPANION,
                genes.len(),
                n_genes
            ))
            .into());
        }
        if barcodes.len() != n_cells {
            return Err(ScloomError::dimension_mismatch(format!(
                "{} lists {} cells but the matrix has {} columns",
                BARCODES_COMPANION,
                barcodes.len(),
                n_cells
            ))
            .into());
        }

        log::info!("Parsing gene ids from annotation {}", params.path_gtf.display());
        let universe = gene_universe(&params.path_gtf)?;
        if universe.is_empty() {
            log::warn!(
                "no gene_id attributes found in {}; is this the right annotation?",
                params.path_gtf.display()
            );
        }

        let mut matrix = Array2::<i64>::zeros((n_genes, n_cells));
        for (value, (row, col)) in triplets.triplet_iter() {
            matrix[[row, col]] += *value;
        }
        let (matrix, row_names) = reconcile(matrix, genes, &universe)?;

        let mut row_attrs = Attrs::new();
        row_attrs.insert(ROW_ATTR_GENES.to_string(), row_names);
        let mut col_attrs = Attrs::new();
        col_attrs.insert(COL_ATTR_CELL_ID.to_string(), barcodes);
        col_attrs.insert(
            COL_ATTR_SAMPLE_NAME.to_string(),
            vec![params.sample_id.clone(); n_cells],
        );

        log::info!("Creating loom file {}", params.path_out.display());
        LoomFile::create(&params.path_out, &matrix, &row_attrs, &col_attrs)?;
        Ok(())
    }
}
