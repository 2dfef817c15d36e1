use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use halfkp_core::{STARTING_FEN, decode_fen};
use halfkp_eval::{Evaluator, PlyChain, PlyState, SimpleMove, UpdateKind, play};

#[derive(Parser)]
#[command(name = "halfkp", about = "Evaluate chess positions with a HalfKP network")]
struct Cli {
    /// Weight file to load
    #[arg(long, env = "HALFKP_EVAL_FILE", default_value = "nn.bin")]
    eval_file: PathBuf,

    /// Comma-separated UCI moves to play from each position, scoring every
    /// ply incrementally
    #[arg(long, value_delimiter = ',')]
    moves: Vec<String>,

    /// Positions to evaluate, as FEN
    #[arg(default_values_t = [STARTING_FEN.to_string()])]
    fens: Vec<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let evaluator = Evaluator::load(&cli.eval_file)
        .with_context(|| format!("loading weights from {}", cli.eval_file.display()))?;
    info!(architecture = %evaluator.store().architecture(), "network ready");

    let moves = cli
        .moves
        .iter()
        .map(|s| SimpleMove::parse_uci(s).with_context(|| format!("bad move {s:?}")))
        .collect::<Result<Vec<_>>>()?;

    for fen in &cli.fens {
        let score = evaluator
            .evaluate_fen(fen)
            .with_context(|| format!("bad FEN {fen:?}"))?;
        println!("{score:>6}  {fen}");

        if !moves.is_empty() {
            replay(&evaluator, fen, &moves)?;
        }
    }
    Ok(())
}

/// Play `moves` from `fen`, printing the incremental score of each ply next
/// to a from-scratch score.
fn replay(evaluator: &Evaluator, fen: &str, moves: &[SimpleMove]) -> Result<()> {
    let mut pos = decode_fen(fen)?.position;
    let mut stack = vec![PlyState::new(); moves.len() + 1];
    evaluator.evaluate_incremental(&pos, PlyChain::from_stack(&mut stack, 0));

    for (i, &mv) in moves.iter().enumerate() {
        let ply = i + 1;
        let Some(dirty) = play(&mut pos, mv) else {
            bail!("no piece on {} at ply {ply}", mv.from);
        };
        stack[ply].enter(dirty);

        let mut chain = PlyChain::from_stack(&mut stack, ply);
        let kind = chain.update(&pos.pieces, evaluator.store());
        let incremental = evaluator.evaluate_incremental(&pos, chain);
        let scratch = evaluator.evaluate(&pos);
        debug!(ply, ?kind, "accumulator updated");

        let how = match kind {
            UpdateKind::Cached => "cached",
            UpdateKind::Incremental { .. } => "incremental",
            UpdateKind::Refreshed => "refreshed",
        };
        println!(
            "  {ply:>3} {}{}  {incremental:>6}  {scratch:>6}  {how}",
            mv.from, mv.to
        );
        if incremental != scratch {
            bail!("incremental score {incremental} differs from {scratch} at ply {ply}");
        }
    }
    Ok(())
}
