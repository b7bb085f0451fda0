use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScloomError {
    #[error("File at {:?} not found.", path)]
    FileNotFound { path: std::path::PathBuf },

    #[error("File at {:?} is invalid{}.", path, ScloomError::format_msg_as_detail(msg))]
    FileNotValid {
        path: std::path::PathBuf,
        msg: Option<String>,
    },

    #[error("Failed parsing {}{}", context, ScloomError::format_msg_as_detail(msg))]
    Parse {
        context: String,
        msg: Option<String>,
    },

    #[error("Dimension mismatch: {}", msg)]
    DimensionMismatch { msg: String },

    #[error("Gene sets differ between matrices: {}", msg)]
    GeneSetMismatch { msg: String },

    #[error("Invalid permutation: {}", msg)]
    Permutation { msg: String },
}

impl ScloomError {
    #[cold]
    pub fn file_not_found<P: AsRef<std::path::Path>>(path: P) -> Self {
        ScloomError::FileNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    #[cold]
    pub fn file_not_valid<P: AsRef<std::path::Path>, M: Into<String>>(
        path: P,
        msg: Option<M>,
    ) -> Self {
        ScloomError::FileNotValid {
            path: path.as_ref().to_path_buf(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn parse<C: Into<String>, M: Into<String>>(context: C, msg: Option<M>) -> Self {
        ScloomError::Parse {
            context: context.into(),
            msg: msg.map(|m| m.into()),
        }
    }

    #[cold]
    pub fn dimension_mismatch<M: Into<String>>(msg: M) -> Self {
        ScloomError::DimensionMismatch { msg: msg.into() }
    }

    #[cold]
    pub fn gene_set_mismatch<M: Into<String>>(msg: M) -> Self {
        ScloomError::GeneSetMismatch { msg: msg.into() }
    }

    #[cold]
    pub fn permutation<M: Into<String>>(msg: M) -> Self {
        ScloomError::Permutation { msg: msg.into() }
    }

    fn format_msg_as_detail(msg: &Option<String>) -> String {
        match msg {
            Some(m) => format!(" ({})", m),
            None => String::new(),
        }
    }
}
