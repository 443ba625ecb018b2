use super::{initial_partition, tokens, vertex, ReadInstanceError};
use bipartition::{Bipartition, WeightedGraph};
use std::fs::File;
use std::io::BufRead;
use std::path::Path;

/// A parsed Kernighan-Lin instance.
#[derive(Debug, Clone)]
pub struct KlInstance {
    pub partition: Bipartition<char>,
    pub graph: WeightedGraph<char>,
}

/// Reads a weighted graph partitioning instance.
///
/// The first line holds the initial partition, every following non-blank line one weighted edge.
///
/// ```text
/// ab cd
/// a c 1
/// a d 2.5
/// ```
///
/// If an edge appears more than once, the last weight is kept.
pub fn read_kl_instance<P>(path: P) -> Result<KlInstance, ReadInstanceError>
where
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    parse_kl_instance(std::io::BufReader::new(file))
}

/// Parses a weighted graph partitioning instance, see [read_kl_instance].
pub fn parse_kl_instance<R: BufRead>(reader: R) -> Result<KlInstance, ReadInstanceError> {
    let mut lines = reader.lines().enumerate();
    let partition = initial_partition(&mut lines)?;
    let mut graph = WeightedGraph::new(partition.vertices());

    for (i, line) in lines {
        let line = line?;
        let line_number = i + 1;
        if line.trim().is_empty() {
            continue;
        }
        let [x, y, w] = tokens::<3>(line_number, &line)?;
        let (x, y) = (vertex(line_number, x)?, vertex(line_number, y)?);
        let weight: f64 = w.parse().map_err(|source| ReadInstanceError::ParseFloat { line: line_number, source })?;
        if !weight.is_finite() {
            return Err(ReadInstanceError::InvalidWeight { line: line_number, weight });
        }
        graph
            .add_edge(x, y, weight)
            .map_err(|source| ReadInstanceError::Instance { line: line_number, source })?;
    }

    Ok(KlInstance { partition, graph })
}

#[cfg(test)]
mod tests {
    use super::*;
    use bipartition::PartitionError;
    use std::io::Write;

    fn parse(content: &str) -> Result<KlInstance, ReadInstanceError> {
        parse_kl_instance(content.as_bytes())
    }

    #[test]
    fn example_instance() {
        let instance = parse("ab cd\na c 1\na d 2\n\nb c 3\nb d 1\n").unwrap();
        assert_eq!(instance.graph.vertex_count(), 4);
        assert_eq!(instance.graph.edge_count(), 4);
        assert_eq!(instance.graph.weight('c', 'b'), 3.0);
        assert_eq!(instance.graph.cutsize(&instance.partition), 7.0);
    }

    #[test]
    fn repeated_edge_keeps_last_weight() {
        let instance = parse("ab cd\na c 1\nc a 0.25\n").unwrap();
        assert_eq!(instance.graph.edge_count(), 1);
        assert_eq!(instance.graph.weight('a', 'c'), 0.25);
    }

    #[test]
    fn partition_only() {
        let instance = parse("abc d\n").unwrap();
        assert_eq!(instance.graph.edge_count(), 0);
        assert_eq!(instance.graph.cutsize(&instance.partition), 0.0);
    }

    #[test]
    fn malformed_edge_lines() {
        assert!(matches!(
            parse("ab cd\na c\n"),
            Err(ReadInstanceError::WrongTokenCount { line: 2, expected: 3, actual: 2, .. })
        ));
        assert!(matches!(parse("ab cd\na c one\n"), Err(ReadInstanceError::ParseFloat { line: 2, .. })));
        assert!(matches!(parse("ab cd\na c 1\na d NaN\n"), Err(ReadInstanceError::InvalidWeight { line: 3, .. })));
        assert!(matches!(parse("ab cd\na cd 1\n"), Err(ReadInstanceError::InvalidVertex { line: 2, .. })));
        assert!(matches!(
            parse("ab cd\na e 1\n"),
            Err(ReadInstanceError::Instance { line: 2, source: PartitionError::UnknownVertex('e') })
        ));
    }

    #[test]
    fn read_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kl.txt");
        let mut file = File::create(&path).unwrap();
        file.write_all(b"ab cd\na c 1\na d 2\nb c 3\nb d 1\n").unwrap();

        let instance = read_kl_instance(&path).unwrap();
        assert_eq!(instance.partition.vertex_count(), 4);
        assert_eq!(instance.graph.edge_count(), 4);
    }
}
