use thiserror::Error;

pub type MdgResult<T> = Result<T, MdgError>;

#[derive(Error, Debug)]
pub enum MdgError {
    #[error("Invalid argument: {what}")]
    InvalidArg { what: String },

    #[error("Index out of bounds: {what} (index={index}, len={len})")]
    IndexOob {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Invariant violated: {what}")]
    Invariant { what: String },
}
