//! symmrefine CLI — command-line interface for k-fold symmetry refinement.

use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};

use symmrefine::{
    select_eligible, BlockedAlignment, RefineConfig, ScoreTable, SymmetryOrder, SymmetryRefiner,
};

type CliError = Box<dyn std::error::Error>;
type CliResult<T> = Result<T, CliError>;

#[derive(Parser)]
#[command(name = "symmrefine")]
#[command(about = "Refine a self-alignment into an exactly k-fold symmetric correspondence")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Refine an alignment and write the result.
    Refine(CliRefineArgs),

    /// Print per-position scores and eligibility of an alignment.
    Scores {
        /// Path to the input alignment (JSON).
        #[arg(long)]
        input: PathBuf,

        /// Symmetry order k (>= 2).
        #[arg(long)]
        order: usize,
    },

    /// Print the block structure of an alignment.
    Blocks {
        /// Path to the input alignment (JSON).
        #[arg(long)]
        input: PathBuf,
    },
}

#[derive(Debug, Clone, Args)]
struct CliRefineArgs {
    /// Path to the input alignment (JSON).
    #[arg(long)]
    input: PathBuf,

    /// Symmetry order k (>= 2).
    #[arg(long)]
    order: usize,

    /// Path to write the refinement result (JSON).
    #[arg(long)]
    out: PathBuf,

    /// Optional refinement config (JSON). Flags below override its fields.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Iteration cap per aligned position.
    #[arg(long)]
    max_iters_per_element: Option<usize>,

    /// Absolute iteration cap.
    #[arg(long)]
    max_iters: Option<usize>,

    /// Include every applied edit in the output.
    #[arg(long)]
    record_edits: bool,
}

impl CliRefineArgs {
    fn to_config(&self) -> CliResult<RefineConfig> {
        let mut cfg = match &self.config {
            Some(path) => RefineConfig::from_json_file(path)?,
            None => RefineConfig::default(),
        };
        if let Some(n) = self.max_iters_per_element {
            cfg.max_iters_per_element = n;
        }
        if self.max_iters.is_some() {
            cfg.max_iters = self.max_iters;
        }
        cfg.record_edits |= self.record_edits;
        Ok(cfg)
    }
}

fn main() -> CliResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Refine(args) => run_refine(&args),
        Commands::Scores { input, order } => run_scores(&input, order),
        Commands::Blocks { input } => run_blocks(&input),
    }
}

fn load_alignment(path: &Path) -> CliResult<BlockedAlignment> {
    tracing::info!("Loading alignment: {}", path.display());
    let data = std::fs::read_to_string(path)?;
    let aln: BlockedAlignment = serde_json::from_str(&data)?;
    tracing::info!(
        "Alignment: {} pairs in {} blocks",
        aln.aligned_len(),
        aln.block_count()
    );
    Ok(aln)
}

// ── refine ─────────────────────────────────────────────────────────────

fn run_refine(args: &CliRefineArgs) -> CliResult<()> {
    let aln = load_alignment(&args.input)?;
    let k = SymmetryOrder::new(args.order)?;
    let refiner = SymmetryRefiner::with_config(args.to_config()?);

    let result = refiner.refine_alignment(&aln, k)?;
    tracing::info!(
        "Refined under {}: kept {}/{} positions after {} edits ({} blocks)",
        k,
        result.stats.n_retained,
        result.stats.n_input,
        result.stats.n_iterations,
        result.refined.block_count()
    );
    if result.stats.n_potential_increases > 0 {
        tracing::warn!(
            "Potential increased after {} edits",
            result.stats.n_potential_increases
        );
    }

    let json = serde_json::to_string_pretty(&result)?;
    std::fs::write(&args.out, &json)?;
    tracing::info!("Results written to {}", args.out.display());

    Ok(())
}

// ── scores ─────────────────────────────────────────────────────────────

fn run_scores(input: &Path, order: usize) -> CliResult<()> {
    let mapping = load_alignment(input)?.to_correspondence()?;
    let k = SymmetryOrder::new(order)?;
    let scores = ScoreTable::evaluate(&mapping, k);
    let eligible = select_eligible(&mapping, &scores, k);

    println!("{:>8} {:>8} {:>12} {:>9}", "pos", "image", "score", "eligible");
    for (x, score) in scores.iter() {
        let image = mapping
            .image(x)
            .map_or_else(|| "-".to_string(), |y| y.to_string());
        let mark = if eligible.binary_search(&x).is_ok() {
            "yes"
        } else {
            ""
        };
        println!("{:>8} {:>8} {:>12.4} {:>9}", x, image, score.value(), mark);
    }

    let potential = scores.potential();
    println!();
    println!("  positions:    {}", scores.len());
    println!("  periodic:     {}", scores.n_periodic());
    println!("  eligible:     {}", eligible.len());
    println!("  unbounded:    {}", potential.n_unbounded);
    println!("  deviation:    {}", potential.deviation_sum);

    Ok(())
}

// ── blocks ─────────────────────────────────────────────────────────────

fn run_blocks(input: &Path) -> CliResult<()> {
    let aln = load_alignment(input)?;
    aln.validate()?;

    for (i, block) in aln.blocks.iter().enumerate() {
        match (block.pairs().next(), block.pairs().last()) {
            (Some(first), Some(last)) => println!(
                "block {:>3}: {:>5} pairs  ({}, {}) .. ({}, {})",
                i,
                block.len(),
                first.0,
                first.1,
                last.0,
                last.1
            ),
            _ => println!("block {:>3}: empty", i),
        }
    }
    println!("  total pairs:  {}", aln.aligned_len());

    Ok(())
}
