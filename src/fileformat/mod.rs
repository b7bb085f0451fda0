pub mod gtf;
pub mod loom;
pub mod mtx;

pub use gtf::gene_universe;
pub use loom::Attrs;
pub use loom::LoomFile;
pub use mtx::read_id_column;
pub use mtx::read_matrix_market;

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;

use flate2::read::GzDecoder;

use crate::runtime::ScloomError;

/// Open a text file for buffered reading, decompressing transparently if the
/// path ends in .gz
pub fn open_buffered(path: &Path) -> anyhow::Result<Box<dyn BufRead>> {
    let file = File::open(path).map_err(|_| ScloomError::file_not_found(path))?;
    if path.extension().map(|e| e == "gz").unwrap_or(false) {
        Ok(Box::new(BufReader::new(GzDecoder::new(file))))
    } else {
        Ok(Box::new(BufReader::new(file)))
    }
}
