use bipartition::{PassHistory, Record};
use serde::Serialize;
use std::io::Write;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WriteHistoryError {
    #[error("serialization error")]
    Json(#[from] serde_json::Error),
    #[error("io error")]
    IoError(#[from] std::io::Error),
}

/// Writes a pass history as pretty-printed JSON.
///
/// The document has the fields `initial`, `records` and `termination`. Every snapshot holds the
/// partition as `{"left": [...], "right": [...]}` together with its cutsize.
pub fn write_history<W, R>(out: &mut W, history: &PassHistory<R>) -> Result<(), WriteHistoryError>
where
    W: Write,
    R: Record,
    PassHistory<R>: Serialize,
{
    serde_json::to_writer_pretty(&mut *out, history)?;
    writeln!(out)?;
    out.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{parse_fm_instance, parse_kl_instance};
    use bipartition::{fiduccia_mattheyses, kernighan_lin};
    use serde_json::{json, Value};

    fn to_json<R: Record>(history: &PassHistory<R>) -> Value
    where
        PassHistory<R>: Serialize,
    {
        let mut out = vec![];
        write_history(&mut out, history).unwrap();
        assert!(out.ends_with(b"}\n"));
        serde_json::from_slice(&out).unwrap()
    }

    #[test]
    fn kl_history() {
        let instance = parse_kl_instance("ab cd\na c 1\na d 2\nb c 3\nb d 1\n".as_bytes()).unwrap();
        let history = kernighan_lin(&instance.graph, instance.partition).unwrap();

        let value = to_json(&history);
        assert_eq!(value["initial"], json!({"partition": {"left": ["a", "b"], "right": ["c", "d"]}, "cutsize": 7.0}));
        assert_eq!(value["records"][0]["pair"], json!(["a", "c"]));
        assert_eq!(value["records"][0]["gain"], json!(5.0));
        assert_eq!(value["records"][1]["snapshot"]["cutsize"], json!(7.0));
        assert_eq!(value["termination"], json!("complete"));
    }

    #[test]
    fn fm_history() {
        let content = "ab cd\n2 2\na c\nb d\n";
        let instance = parse_fm_instance(content.as_bytes()).unwrap();
        let history = fiduccia_mattheyses(&instance.hypergraph, instance.partition, instance.constraint).unwrap();

        let value = to_json(&history);
        assert_eq!(value["records"], json!([]));
        assert_eq!(value["initial"]["cutsize"], json!(2));
        assert_eq!(value["termination"], json!({"no_feasible_move": {"unlocked": 4}}));
    }
}
