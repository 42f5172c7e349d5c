mod inputs;
mod logger;

use anyhow::{Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use deckbind_layout::SourceKind;
use deckbind_merge::{BindInput, BindOptions, ProgressEvent, calculate_plan};
use deckbind_runtime::{BindCommand, BindUpdate, worker_task};
use log::LevelFilter;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[derive(Parser)]
#[command(name = "deckbind", about = "Bind slide decks and PDFs into one handbook", version)]
struct Cli {
    /// Show debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the handbook PDF
    Build {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        options: OptionArgs,

        /// Output PDF file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Show where every input would start, without rendering
    Plan {
        #[command(flatten)]
        inputs: InputArgs,

        #[command(flatten)]
        options: OptionArgs,
    },

    /// Write the effective options to a JSON file
    Config {
        #[command(flatten)]
        options: OptionArgs,

        /// Destination JSON file
        #[arg(long)]
        write: PathBuf,
    },
}

#[derive(Args)]
struct InputArgs {
    /// Directory of slide images, one deck per directory
    #[arg(long = "deck", value_name = "DIR")]
    decks: Vec<PathBuf>,

    /// Directory of rasterized document pages
    #[arg(long = "pages", value_name = "DIR")]
    page_dirs: Vec<PathBuf>,

    /// Finished PDF, included as is
    #[arg(long = "document", value_name = "PDF")]
    documents: Vec<PathBuf>,

    /// CSV manifest (columns: order, title, kind, path)
    #[arg(short, long)]
    manifest: Option<PathBuf>,
}

#[derive(Args)]
struct OptionArgs {
    /// JSON options file; the flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Grid rows per page
    #[arg(long)]
    rows: Option<usize>,

    /// Grid columns per page
    #[arg(long)]
    columns: Option<usize>,

    /// Output paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Output orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Contents heading
    #[arg(long)]
    heading: Option<String>,

    /// Font file to try first for the contents
    #[arg(long = "font", value_name = "FILE")]
    fonts: Vec<PathBuf>,

    /// Leave out the ordinal labels under grid slots
    #[arg(long)]
    no_labels: bool,

    /// Skip the compaction pass
    #[arg(long)]
    no_optimize: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

impl From<PaperArg> for deckbind_layout::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
        }
    }
}

impl From<OrientationArg> for deckbind_layout::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl OptionArgs {
    async fn resolve(&self) -> Result<BindOptions> {
        let mut options = match &self.config {
            Some(path) => BindOptions::load(path).await?,
            None => BindOptions::default(),
        };

        if let Some(rows) = self.rows {
            options.grid.rows = rows;
        }
        if let Some(columns) = self.columns {
            options.grid.columns = columns;
        }
        if let Some(paper) = self.paper {
            options.grid.paper_size = paper.into();
            options.toc.paper_size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            options.grid.orientation = orientation.into();
            options.toc.orientation = orientation.into();
        }
        if let Some(heading) = &self.heading {
            options.toc.heading = heading.clone();
        }
        if !self.fonts.is_empty() {
            let mut candidates = self.fonts.clone();
            candidates.append(&mut options.font_candidates);
            options.font_candidates = candidates;
        }
        if self.no_labels {
            options.grid.slot_labels = false;
        }
        if self.no_optimize {
            options.optimize = false;
        }

        options.validate()?;
        Ok(options)
    }
}

impl InputArgs {
    /// Manifest rows first, then directories and documents in flag order
    async fn collect(&self) -> Result<Vec<BindInput>> {
        let mut collected = match &self.manifest {
            Some(path) => inputs::load_manifest(path).await?,
            None => Vec::new(),
        };

        let mut order = collected.iter().map(|input| input.order).max().unwrap_or(0);
        for dir in &self.decks {
            order += 1;
            collected.push(inputs::image_input(dir, SourceKind::Slides, order)?);
        }
        for dir in &self.page_dirs {
            order += 1;
            collected.push(inputs::image_input(dir, SourceKind::Pages, order)?);
        }
        for path in &self.documents {
            order += 1;
            collected.push(inputs::document_input(path, order));
        }

        if collected.is_empty() {
            bail!("No inputs given; use --deck, --pages, --document or --manifest");
        }
        Ok(collected)
    }
}

fn describe(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::LayoutStarted { total } => format!("Laying out {total} input(s)"),
        ProgressEvent::InputLaidOut {
            index,
            total,
            title,
            pages,
        } => format!("[{}/{}] {} ({} page(s))", index + 1, total, title, pages),
        ProgressEvent::InputSkipped { title, reason } => format!("Skipped {title}: {reason}"),
        ProgressEvent::Planned {
            toc_pages,
            total_pages,
        } => format!("Planned {total_pages} pages, {toc_pages} for the contents"),
        ProgressEvent::TocRendered { pages, font } => {
            format!("Contents rendered on {pages} page(s) with {font}")
        }
        ProgressEvent::Merged { pages } => format!("Merged {pages} pages"),
        ProgressEvent::Optimized { success: true } => "Compacted".to_string(),
        ProgressEvent::Optimized { success: false } => "Compaction skipped".to_string(),
        ProgressEvent::Finished { pages } => format!("Finished, {pages} pages"),
    }
}

async fn build(inputs: Vec<BindInput>, options: BindOptions, output: PathBuf) -> Result<()> {
    let (command_tx, command_rx) = mpsc::unbounded_channel();
    let (update_tx, mut update_rx) = mpsc::unbounded_channel();
    let worker = tokio::spawn(worker_task(command_rx, update_tx));

    command_tx
        .send(BindCommand::Build {
            inputs,
            options,
            output_path: output,
        })
        .map_err(|_| anyhow!("Worker stopped before the build started"))?;

    let result = loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                eprintln!("Interrupted, cancelling...");
                let _ = command_tx.send(BindCommand::Cancel);
            }
            update = update_rx.recv() => match update {
                Some(BindUpdate::Progress { event, fraction }) => match fraction {
                    Some(fraction) => eprintln!("{:>3.0}% {}", fraction * 100.0, describe(&event)),
                    None => eprintln!("     {}", describe(&event)),
                },
                Some(BindUpdate::Complete { report }) => {
                    for diagnostic in &report.diagnostics {
                        eprintln!("Note: {diagnostic}");
                    }
                    println!(
                        "Bound {} document(s), {} pages → {}",
                        report.plan.documents.len(),
                        report.plan.total_pages,
                        report.output.display()
                    );
                    if !report.skipped.is_empty() {
                        println!("Skipped:");
                        for skipped in &report.skipped {
                            println!("  {}: {}", skipped.title, skipped.reason);
                        }
                    }
                    break Ok(());
                }
                Some(BindUpdate::Cancelled) => break Err(anyhow!("Build cancelled")),
                Some(BindUpdate::Error { message }) => break Err(anyhow!(message)),
                Some(_) => {}
                None => break Err(anyhow!("Worker stopped unexpectedly")),
            },
        }
    };

    drop(command_tx);
    worker.await?;
    result
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    logger::StderrLogger::new(level).init()?;

    match cli.command {
        Commands::Build {
            inputs,
            options,
            output,
        } => {
            let options = options.resolve().await?;
            let inputs = inputs.collect().await?;
            build(inputs, options, output).await?;
        }

        Commands::Plan { inputs, options } => {
            let options = options.resolve().await?;
            let inputs = inputs.collect().await?;
            let summary = calculate_plan(&inputs, &options).await?;
            let plan = &summary.plan;

            println!("Pagination plan:");
            println!("  Contents pages: {}", plan.toc_pages);
            for doc in &plan.documents {
                println!(
                    "  {:>5}  {} ({} page(s))",
                    doc.start_page, doc.title, doc.page_count
                );
            }
            println!("  Total pages: {}", plan.total_pages);
            for skipped in &summary.skipped {
                println!("  Skipped {}: {}", skipped.title, skipped.reason);
            }
        }

        Commands::Config { options, write } => {
            let options = options.resolve().await?;
            options.save(&write).await?;
            println!("Wrote options → {}", write.display());
        }
    }

    Ok(())
}
