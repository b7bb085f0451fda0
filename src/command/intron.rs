use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use ndarray::Axis;

use crate::fileformat::loom::ROW_ATTR_GENES;
use crate::fileformat::LoomFile;
use crate::matrix::chunked_difference;
use crate::matrix::diff::DEFAULT_MAX_CHUNK_SIZE;
use crate::matrix::diff::DEFAULT_NUM_CHUNKS;
use crate::matrix::sort_permutation;
use crate::matrix::verify_aligned;
use crate::matrix::ChunkPolicy;
use crate::runtime::ScloomError;

#[derive(Args)]
pub struct IntronCMD {
    /// Component matrix (exon-only counts), loom format
    #[arg(short = 'c', long = "component", value_parser)]
    pub path_component: PathBuf,

    /// Total matrix (gene-level counts over the same cells), loom format
    #[arg(short = 't', long = "total", value_parser)]
    pub path_total: PathBuf,

    /// Full path of the loom file to create
    #[arg(short = 'o', value_parser)]
    pub path_out: PathBuf,

    /// Number of column chunks to split the subtraction into
    #[arg(long = "num-chunks", default_value_t = DEFAULT_NUM_CHUNKS)]
    pub num_chunks: usize,

    /// Upper bound on columns per chunk
    #[arg(long = "max-chunk-size", default_value_t = DEFAULT_MAX_CHUNK_SIZE)]
    pub max_chunk_size: usize,
}
impl IntronCMD {
    /// Run the commandline option
    pub fn try_execute(&mut self) -> Result<()> {
        Intron::run(&Intron {
            path_component: self.path_component.clone(),
            path_total: self.path_total.clone(),
            path_out: self.path_out.clone(),
            policy: ChunkPolicy {
                num_chunks: self.num_chunks,
                max_chunk_size: self.max_chunk_size,
            },
        })?;

        log::info!("Intron has finished succesfully");
        Ok(())
    }
}

pub struct Intron {
    pub path_component: PathBuf,
    pub path_total: PathBuf,
    pub path_out: PathBuf,
    pub policy: ChunkPolicy,
}
impl Intron {
    /// Derived-matrix path: bring both containers into canonical row order,
    /// verify they describe the same genes, subtract the component counts
    /// from the total counts chunk by chunk and persist the difference.
    pub fn run(params: &Intron) -> anyhow::Result<()> {
        let mut component = LoomFile::open(&params.path_component)?;
        let mut total = LoomFile::open(&params.path_total)?;

        for file in [&mut component, &mut total] {
            let genes = file.row_attr(ROW_ATTR_GENES)?;
            let ordering = sort_permutation(&genes);
            log::info!("Sorting rows of {}", file.path().display());
            file.permute(&ordering, Axis(0))?;
        }

        // independent sorting only aligns rows if the gene sets are equal
        let genes = component.row_attr(ROW_ATTR_GENES)?;
        verify_aligned(&genes, &total.row_attr(ROW_ATTR_GENES)?)?;

        if component.shape() != total.shape() {
            return Err(ScloomError::dimension_mismatch(format!(
                "component matrix is {:?}, total matrix is {:?}",
                component.shape(),
                total.shape()
            ))
            .into());
        }

        log::info!(
            "Subtracting {} from {}",
            params.path_component.display(),
            params.path_total.display()
        );
        let intron_umi = chunked_difference(&total, &component, &params.policy)?;

        let row_attrs = component.row_attrs()?;
        let col_attrs = component.col_attrs()?;
        drop(component);
        drop(total);

        log::info!("Creating loom file {}", params.path_out.display());
        LoomFile::create(&params.path_out, &intron_umi, &row_attrs, &col_attrs)?;
        Ok(())
    }
}
