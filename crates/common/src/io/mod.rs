mod error;
mod fm;
mod history;
mod kl;

use clap::ValueEnum;
pub use error::ReadInstanceError;
pub use fm::{parse_fm_instance, read_fm_instance, FmInstance};
pub use history::{write_history, WriteHistoryError};
pub use kl::{parse_kl_instance, read_kl_instance, KlInstance};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
pub enum InstanceFileType {
    /// Hypergraph with a balance constraint, partitioned by Fiduccia-Mattheyses.
    Fm,
    /// Weighted graph, partitioned by Kernighan-Lin.
    Kl,
}

/// Splits a line into exactly `N` tokens.
fn tokens<const N: usize>(line_number: usize, line: &str) -> Result<[&str; N], ReadInstanceError> {
    let tokens: Vec<_> = line.split_ascii_whitespace().collect();
    <[&str; N]>::try_from(tokens.as_slice()).map_err(|_| ReadInstanceError::WrongTokenCount {
        line: line_number,
        expected: N,
        actual: tokens.len(),
        content: line.to_string(),
    })
}

/// Parses a single character vertex identifier.
fn vertex(line_number: usize, token: &str) -> Result<char, ReadInstanceError> {
    let mut chars = token.chars();
    match (chars.next(), chars.next()) {
        (Some(v), None) => Ok(v),
        _ => Err(ReadInstanceError::InvalidVertex { line: line_number, token: token.to_string() }),
    }
}

/// Reads the initial partition from the first line. Each of the two tokens lists the vertices of
/// one side, one character per vertex.
fn initial_partition<I>(lines: &mut I) -> Result<bipartition::Bipartition<char>, ReadInstanceError>
where
    I: Iterator<Item = (usize, std::io::Result<String>)>,
{
    let (i, line) = lines.next().ok_or(ReadInstanceError::MissingLine("initial partition"))?;
    let line = line?;
    let line_number = i + 1;
    let [left, right] = tokens::<2>(line_number, &line)?;
    bipartition::Bipartition::new(left.chars(), right.chars())
        .map_err(|source| ReadInstanceError::Instance { line: line_number, source })
}
