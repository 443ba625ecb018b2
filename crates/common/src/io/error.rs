use bipartition::PartitionError;
use std::num::{ParseFloatError, ParseIntError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReadInstanceError {
    #[error("missing {0} line")]
    MissingLine(&'static str),
    #[error("line {line}: expected {expected} tokens, got {actual} ({content:?})")]
    WrongTokenCount { line: usize, expected: usize, actual: usize, content: String },
    #[error("line {line}: invalid vertex {token:?} (vertices are single characters)")]
    InvalidVertex { line: usize, token: String },
    #[error("line {line}: weight must be finite (got {weight})")]
    InvalidWeight { line: usize, weight: f64 },
    #[error("line {line}: {source}")]
    Instance { line: usize, source: PartitionError<char> },
    #[error("line {line}: parse int error")]
    ParseInt { line: usize, source: ParseIntError },
    #[error("line {line}: parse float error")]
    ParseFloat { line: usize, source: ParseFloatError },
    #[error("io error")]
    IoError(#[from] std::io::Error),
}
