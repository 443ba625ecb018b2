use super::{initial_partition, tokens, vertex, ReadInstanceError};
use bipartition::{BalanceConstraint, Bipartition, Hypergraph};
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

/// A parsed Fiduccia-Mattheyses instance.
#[derive(Debug, Clone)]
pub struct FmInstance {
    pub partition: Bipartition<char>,
    pub constraint: BalanceConstraint,
    pub hypergraph: Hypergraph<char>,
}

/// Reads a hypergraph partitioning instance.
///
/// The format is line based with whitespace separated tokens.
///
/// ```text
/// ab cd      initial partition, one character per vertex
/// 1 3        balance constraint, lower and upper bound
/// a c        one hyperedge per remaining line
/// b d
/// a b c
/// ```
///
/// The bounds are integers and may be negative. Blank hyperedge lines are skipped. Every
/// hyperedge vertex must appear in the initial partition.
pub fn read_fm_instance<P>(path: P) -> Result<FmInstance, ReadInstanceError>
where
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    parse_fm_instance(std::io::BufReader::new(file))
}

/// Parses a hypergraph partitioning instance, see [read_fm_instance].
pub fn parse_fm_instance<R: BufRead>(reader: R) -> Result<FmInstance, ReadInstanceError> {
    let mut lines = reader.lines().enumerate();
    let partition = initial_partition(&mut lines)?;

    let constraint = {
        let (i, line) = lines.next().ok_or(ReadInstanceError::MissingLine("balance constraint"))?;
        let line = line?;
        let line_number = i + 1;
        let [low, high] = tokens::<2>(line_number, &line)?;
        let parse = |token: &str| {
            token.parse::<i64>().map_err(|source| ReadInstanceError::ParseInt { line: line_number, source })
        };
        BalanceConstraint::new(parse(low)?, parse(high)?)
    };

    let mut hypergraph = Hypergraph::new(partition.vertices());
    for (i, line) in lines {
        let line = line?;
        let line_number = i + 1;
        let hyperedge: Vec<_> =
            line.split_ascii_whitespace().map(|token| vertex(line_number, token)).collect::<Result<_, _>>()?;
        if hyperedge.is_empty() {
            continue;
        }
        hypergraph
            .add_hyperedge(hyperedge)
            .map_err(|source| ReadInstanceError::Instance { line: line_number, source })?;
    }

    Ok(FmInstance { partition, constraint, hypergraph })
}
