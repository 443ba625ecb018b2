//! Human-readable pass summaries.

use bipartition::{MoveRecord, PassHistory, Record, SwapRecord, Vertex};
use std::fmt::Display;
use std::io::Write;

/// A single line describing a recorded step.
pub trait Describe {
    /// Describes the step with the 1-based `number`.
    fn describe(&self, number: usize) -> String;
}

impl<V: Vertex + Display> Describe for MoveRecord<V> {
    fn describe(&self, number: usize) -> String {
        format!("Move {number}: {}, gain: {}", self.vertex, self.gain)
    }
}

impl<V: Vertex + Display> Describe for SwapRecord<V> {
    fn describe(&self, number: usize) -> String {
        let (x, y) = self.pair;
        format!("Swap {number}: ({x}, {y}), gain: {}", self.gain)
    }
}

/// Writes one line per snapshot, then one line per step, the termination reason and the best
/// snapshot.
///
/// ```text
/// Iteration 0. partitions: ({a, b}, {c, d}), cutsize: 7
/// Iteration 1. partitions: ({b, c}, {a, d}), cutsize: 2
/// Swap 1: (a, c), gain: 5
/// Termination: all vertices locked
/// Best: iteration 1, cutsize: 2
/// ```
pub fn write_summary<W, R>(out: &mut W, history: &PassHistory<R>) -> std::io::Result<()>
where
    W: Write,
    R: Record + Describe,
    R::Vertex: Display,
    R::Cut: Display,
{
    for (i, snapshot) in history.snapshots().enumerate() {
        writeln!(out, "Iteration {i}. partitions: {}, cutsize: {}", snapshot.partition, snapshot.cutsize)?;
    }
    for (i, record) in history.records().iter().enumerate() {
        writeln!(out, "{}", record.describe(i + 1))?;
    }
    writeln!(out, "Termination: {}", history.termination())?;

    let best = history.best();
    if let Some(snapshot) = history.snapshots().nth(best) {
        writeln!(out, "Best: iteration {best}, cutsize: {}", snapshot.cutsize)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{parse_fm_instance, parse_kl_instance};
    use bipartition::{fiduccia_mattheyses, kernighan_lin};

    fn summary<R>(history: &PassHistory<R>) -> String
    where
        R: Record + Describe,
        R::Vertex: Display,
        R::Cut: Display,
    {
        let mut out = vec![];
        write_summary(&mut out, history).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn fm_summary() {
        let content = "ab cd\n1 3\na c\nb d\na b c\n";
        let instance = parse_fm_instance(content.as_bytes()).unwrap();
        let history = fiduccia_mattheyses(&instance.hypergraph, instance.partition, instance.constraint).unwrap();

        let expected = "\
Iteration 0. partitions: ({a, b}, {c, d}), cutsize: 3
Iteration 1. partitions: ({a, b, c}, {d}), cutsize: 1
Iteration 2. partitions: ({a, c}, {b, d}), cutsize: 1
Iteration 3. partitions: ({c}, {a, b, d}), cutsize: 2
Iteration 4. partitions: ({c, d}, {a, b}), cutsize: 3
Move 1: c, gain: 2
Move 2: b, gain: 0
Move 3: a, gain: -1
Move 4: d, gain: -1
Termination: all vertices locked
Best: iteration 1, cutsize: 1
";
        assert_eq!(summary(&history), expected);
    }

    #[test]
    fn kl_summary() {
        let content = "ab cd\na c 1\na d 2\nb c 3\nb d 1\n";
        let instance = parse_kl_instance(content.as_bytes()).unwrap();
        let history = kernighan_lin(&instance.graph, instance.partition).unwrap();

        let expected = "\
Iteration 0. partitions: ({a, b}, {c, d}), cutsize: 7
Iteration 1. partitions: ({b, c}, {a, d}), cutsize: 2
Iteration 2. partitions: ({c, d}, {a, b}), cutsize: 7
Swap 1: (a, c), gain: 5
Swap 2: (b, d), gain: -5
Termination: all vertices locked
Best: iteration 1, cutsize: 2
";
        assert_eq!(summary(&history), expected);
    }

    #[test]
    fn stuck_summary() {
        let content = "ab cd\n2 2\na c\n";
        let instance = parse_fm_instance(content.as_bytes()).unwrap();
        let history = fiduccia_mattheyses(&instance.hypergraph, instance.partition, instance.constraint).unwrap();

        let lines: Vec<_> = summary(&history).lines().map(str::to_string).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "Termination: no feasible move for the remaining 4 unlocked vertices");
        assert_eq!(lines[2], "Best: iteration 0, cutsize: 1");
    }
}
