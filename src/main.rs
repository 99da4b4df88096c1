//! Keel batch runner entrypoint.
//!
//! Reads JSON Lines candidates, runs them through one shared gate and writes one verdict per
//! line in input order. Set `KEEL_WORKERS=1` for a run whose first sightings follow input
//! order exactly.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use mimalloc::MiMalloc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};

use keel::candidate::ValidatedCandidate;
use keel::config::Config;
use keel::gate::{GateConfig, GateResult, InputLine, QualityGate, render_verdicts, split_lines};
use keel::index::{InMemoryDuplicateIndex, IndexSnapshot};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

type SharedGate = Arc<QualityGate<Arc<InMemoryDuplicateIndex>>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;
    let gate_config = GateConfig::from_env()?;
    gate_config.validate()?;

    tracing::info!(
        workers = config.workers,
        soft_flag_threshold = gate_config.soft_flag_threshold,
        near_duplicate_similarity = gate_config.near_duplicate_similarity,
        "Keel starting"
    );

    let index = Arc::new(
        load_index(
            config.snapshot_path.as_deref(),
            gate_config.near_duplicate_similarity,
        )
        .await?,
    );
    let gate: SharedGate = Arc::new(QualityGate::new(Arc::clone(&index), gate_config));

    let input = read_input(config.input_path.as_deref()).await?;
    let lines = split_lines(&input);

    tracing::info!(candidates = lines.len(), "Evaluating candidates");

    let results = evaluate_parallel(&gate, lines, config.workers).await?;

    let (output, summary) = render_verdicts(&results).context("serializing verdicts")?;
    write_output(config.output_path.as_deref(), &output).await?;

    tracing::info!(
        approval_rate = summary.approval_rate(),
        indexed_questions = index.len(),
        "{}",
        summary
    );

    if let Some(path) = config.snapshot_path.as_deref() {
        save_index(path, &index).await?;
    }

    Ok(())
}

/// Restores the index from `path` when a snapshot exists there, else starts empty.
async fn load_index(
    path: Option<&Path>,
    near_duplicate_similarity: f64,
) -> anyhow::Result<InMemoryDuplicateIndex> {
    let Some(path) = path.filter(|p| p.exists()) else {
        return Ok(InMemoryDuplicateIndex::with_near_duplicate_similarity(
            near_duplicate_similarity,
        ));
    };

    let raw = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading index snapshot {}", path.display()))?;
    let snapshot: IndexSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing index snapshot {}", path.display()))?;

    Ok(InMemoryDuplicateIndex::from_snapshot(
        snapshot,
        near_duplicate_similarity,
    ))
}

async fn save_index(path: &Path, index: &InMemoryDuplicateIndex) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_vec(&index.snapshot()).context("serializing index snapshot")?;
    tokio::fs::write(path, &json)
        .await
        .with_context(|| format!("writing index snapshot {}", path.display()))?;

    tracing::info!(path = %path.display(), bytes = json.len(), "Index snapshot saved");
    Ok(())
}

/// Reads raw bytes; lines are decoded one at a time by the gate.
async fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => tokio::fs::read(path)
            .await
            .with_context(|| format!("reading candidates from {}", path.display())),
        None => {
            let mut buf = Vec::new();
            tokio::io::stdin()
                .read_to_end(&mut buf)
                .await
                .context("reading candidates from stdin")?;
            Ok(buf)
        }
    }
}

async fn write_output(path: Option<&Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match path {
        Some(path) => tokio::fs::write(path, bytes)
            .await
            .with_context(|| format!("writing verdicts to {}", path.display())),
        None => {
            let mut stdout = tokio::io::stdout();
            stdout.write_all(bytes).await?;
            stdout.flush().await?;
            Ok(())
        }
    }
}

/// Splits `lines` into contiguous chunks, one blocking task per chunk, and reassembles the
/// results in input order.
async fn evaluate_parallel(
    gate: &SharedGate,
    lines: Vec<InputLine>,
    workers: usize,
) -> anyhow::Result<Vec<(usize, GateResult<ValidatedCandidate>)>> {
    if lines.is_empty() {
        return Ok(Vec::new());
    }

    let chunk_size = lines.len().div_ceil(workers.max(1));
    let mut handles = Vec::new();
    let mut remaining = lines.into_iter().peekable();

    while remaining.peek().is_some() {
        let chunk: Vec<InputLine> = remaining.by_ref().take(chunk_size).collect();
        let gate = Arc::clone(gate);
        handles.push(tokio::task::spawn_blocking(move || {
            chunk
                .into_iter()
                .map(|line| (line.number, gate.evaluate_json_slice(&line.bytes)))
                .collect::<Vec<_>>()
        }));
    }

    let mut results = Vec::new();
    for handle in handles {
        results.extend(handle.await.context("evaluation worker panicked")?);
    }

    Ok(results)
}
