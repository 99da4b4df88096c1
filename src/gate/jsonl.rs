//! JSON Lines framing for batch runs.
//!
//! Input is split on raw bytes so one undecodable line costs one error, never the batch.

use tracing::warn;

use super::error::GateResult;
use super::summary::GateSummary;
use crate::candidate::ValidatedCandidate;

/// One input line and its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputLine {
    pub number: usize,
    pub bytes: Vec<u8>,
}

/// Splits `input` on `\n`, drops a trailing `\r` and skips blank lines.
pub fn split_lines(input: &[u8]) -> Vec<InputLine> {
    input
        .split(|b| *b == b'\n')
        .enumerate()
        .map(|(n, line)| (n + 1, line.strip_suffix(b"\r").unwrap_or(line)))
        .filter(|(_, line)| !line.iter().all(u8::is_ascii_whitespace))
        .map(|(number, line)| InputLine {
            number,
            bytes: line.to_vec(),
        })
        .collect()
}

/// Folds results into JSON Lines output and a summary.
///
/// Each error is logged with its line number and counted; it produces no output line.
pub fn render_verdicts<'a, R>(results: R) -> serde_json::Result<(Vec<u8>, GateSummary)>
where
    R: IntoIterator<Item = &'a (usize, GateResult<ValidatedCandidate>)>,
{
    let mut summary = GateSummary::new();
    let mut output = Vec::new();

    for (line, result) in results {
        summary.record_result(result);
        match result {
            Ok(verdict) => {
                serde_json::to_writer(&mut output, verdict)?;
                output.push(b'\n');
            }
            Err(e) => warn!(line, error = %e, "Skipping candidate"),
        }
    }

    Ok((output, summary))
}
