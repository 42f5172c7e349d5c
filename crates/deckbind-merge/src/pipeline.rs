//! The bind run
//!
//! Inputs are laid out and counted first. The contents is then planned
//! from the counts and rendered, and finally every part is concatenated,
//! annotated and written to the output path in one step.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use deckbind_layout::{document_to_bytes, lay_out, load_pdf, save_pdf};
use deckbind_toc::{
    DocumentPages, FontSession, PaginationPlan, TocLayout, plan_pagination, render_toc,
};
use lopdf::Document;

use crate::assemble::{AssembledDocument, Assembly};
use crate::cancel::CancelFlag;
use crate::footer::add_page_numbers;
use crate::input::{BindInput, InputContent, sort_inputs};
use crate::metadata::set_metadata;
use crate::optimize::compact;
use crate::options::BindOptions;
use crate::outline::{Bookmark, add_outline};
use crate::progress::{ProgressCallback, ProgressEvent};
use crate::types::*;

/// An input left out of the output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedInput {
    pub title: String,
    pub reason: String,
}

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct BindReport {
    pub output: PathBuf,
    pub plan: PaginationPlan,
    pub skipped: Vec<SkippedInput>,
    /// Grid slots drawn as placeholders for unreadable pages
    pub placeholders: usize,
    /// Font used for the contents
    pub font: String,
    pub optimized: bool,
    /// Non-fatal problems worth showing to the user
    pub diagnostics: Vec<String>,
}

/// A laid-out input, loaded and counted
struct CountedInput {
    title: String,
    document: Document,
    /// Intermediate file created by this run
    intermediate: Option<PathBuf>,
}

/// Temporary page images owned by a run.
///
/// Layout deletes them page by page; on drop, any that are still on disk
/// are removed.
struct TemporaryRasters(Vec<PathBuf>);

impl TemporaryRasters {
    fn claim(inputs: &[BindInput]) -> Self {
        let paths = inputs
            .iter()
            .filter_map(|input| match &input.content {
                InputContent::Images { pages, .. } => Some(pages),
                InputContent::Document(_) => None,
            })
            .flatten()
            .filter(|page| page.temporary)
            .filter_map(|page| page.path().map(Path::to_path_buf))
            .collect();
        Self(paths)
    }
}

impl Drop for TemporaryRasters {
    fn drop(&mut self) {
        for path in &self.0 {
            match std::fs::remove_file(path) {
                Ok(()) => log::debug!("Removed leftover {}", path.display()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => log::warn!("Could not remove {}: {}", path.display(), e),
            }
        }
    }
}

struct Serialized {
    bytes: Vec<u8>,
    optimized: bool,
    diagnostic: Option<String>,
}

/// Runs bind jobs with one set of options
#[derive(Clone)]
pub struct Pipeline {
    options: BindOptions,
    cancel: CancelFlag,
    progress: Option<ProgressCallback>,
}

impl Pipeline {
    pub fn new(options: BindOptions) -> Self {
        Self {
            options,
            cancel: CancelFlag::new(),
            progress: None,
        }
    }

    /// Share an existing flag, e.g. one held by a supervisor
    pub fn with_cancel_flag(mut self, cancel: CancelFlag) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn with_progress(mut self, callback: impl Fn(ProgressEvent) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(callback));
        self
    }

    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Bind `inputs` into one PDF at `output`.
    ///
    /// Inputs that cannot be laid out or read are skipped and listed in the
    /// report. `output` is only created once everything else succeeded; on
    /// error or cancellation it is left as it was.
    pub async fn run(
        &self,
        mut inputs: Vec<BindInput>,
        output: impl AsRef<Path>,
    ) -> Result<BindReport> {
        let output = output.as_ref().to_owned();
        // Removes temporary rasters left behind on any exit path
        let _rasters = TemporaryRasters::claim(&inputs);
        self.options.validate()?;
        if inputs.is_empty() {
            return Err(MergeError::NoMergeableDocuments);
        }
        sort_inputs(&mut inputs);

        // Intermediate files live here and are removed with it on every exit
        let workspace = tempfile::Builder::new().prefix("deckbind-").tempdir()?;
        log::debug!("Working directory {}", workspace.path().display());

        let mut skipped = Vec::new();
        let mut placeholders = 0;
        let counted = self
            .lay_out_inputs(inputs, workspace.path(), &mut skipped, &mut placeholders)
            .await?;
        if counted.is_empty() {
            return Err(MergeError::NoMergeableDocuments);
        }

        let pages: Vec<DocumentPages> = counted
            .iter()
            .map(|input| DocumentPages::new(input.title.clone(), input.document.get_pages().len()))
            .collect();
        let plan = plan_pagination(&pages, &TocLayout::from_options(&self.options.toc));
        self.emit(ProgressEvent::Planned {
            toc_pages: plan.toc_pages,
            total_pages: plan.total_pages,
        });

        self.cancel.check()?;
        let session = FontSession::from_paths(self.options.font_candidates.clone());
        let font = tokio::task::spawn_blocking(move || session.resolve()).await?;
        let toc = render_toc(&plan, &self.options.toc, font.clone()).await?;
        self.emit(ProgressEvent::TocRendered {
            pages: toc.pages,
            font: font.name().to_string(),
        });

        self.cancel.check()?;
        let options = self.options.clone();
        let cancel = self.cancel.clone();
        let progress = self.progress.clone();
        let merge_plan = plan.clone();
        let serialized = tokio::task::spawn_blocking(move || {
            let toc = Document::load_mem(&toc.bytes)?;
            let mut assembled = assemble(toc, counted, &merge_plan, &cancel)?;
            annotate(&mut assembled, &merge_plan, &options)?;
            emit(
                &progress,
                ProgressEvent::Merged {
                    pages: assembled.page_ids.len(),
                },
            );

            cancel.check()?;
            let serialized = serialize(&mut assembled.document, options.optimize)?;
            if options.optimize {
                emit(
                    &progress,
                    ProgressEvent::Optimized {
                        success: serialized.optimized,
                    },
                );
            }
            Ok::<_, MergeError>(serialized)
        })
        .await??;

        // Last point at which the output path is still untouched
        self.cancel.check()?;
        write_atomically(serialized.bytes, output.clone()).await?;
        self.emit(ProgressEvent::Finished {
            pages: plan.total_pages,
        });

        if let Err(e) = workspace.close() {
            log::warn!("Failed to remove working directory: {}", e);
        }

        log::info!(
            "Wrote {} ({} pages, {} contents page(s), {} skipped)",
            output.display(),
            plan.total_pages,
            plan.toc_pages,
            skipped.len()
        );

        Ok(BindReport {
            output,
            plan,
            skipped,
            placeholders,
            font: font.name().to_string(),
            optimized: serialized.optimized,
            diagnostics: serialized.diagnostic.into_iter().collect(),
        })
    }

    /// Lay out image inputs into `workspace` and load every input to count
    /// its pages. Failures skip the input.
    async fn lay_out_inputs(
        &self,
        inputs: Vec<BindInput>,
        workspace: &Path,
        skipped: &mut Vec<SkippedInput>,
        placeholders: &mut usize,
    ) -> Result<Vec<CountedInput>> {
        let total = inputs.len();
        self.emit(ProgressEvent::LayoutStarted { total });

        let mut counted = Vec::with_capacity(total);
        for (index, input) in inputs.into_iter().enumerate() {
            self.cancel.check()?;
            let title = input.title;

            let (path, intermediate) = match input.content {
                InputContent::Images { kind, pages } => {
                    let grid = match lay_out(pages, kind, &self.options.grid).await {
                        Ok(grid) => grid,
                        Err(e) => {
                            self.skip(skipped, title, e.to_string());
                            continue;
                        }
                    };
                    *placeholders += grid.slots.placeholders;
                    let path = workspace.join(format!("{index:04}-grid.pdf"));
                    save_pdf(grid.document, &path).await?;
                    (path.clone(), Some(path))
                }
                InputContent::Document(path) => (path, None),
            };

            self.cancel.check()?;
            let document = match load_pdf(&path).await {
                Ok(document) => document,
                Err(e) => {
                    self.skip(skipped, title, e.to_string());
                    continue;
                }
            };
            let pages = document.get_pages().len();
            if pages == 0 {
                self.skip(skipped, title, "document has no pages".to_string());
                continue;
            }

            log::info!("Laid out '{}': {} page(s)", title, pages);
            self.emit(ProgressEvent::InputLaidOut {
                index,
                total,
                title: title.clone(),
                pages,
            });
            counted.push(CountedInput {
                title,
                document,
                intermediate,
            });
        }

        Ok(counted)
    }

    fn skip(&self, skipped: &mut Vec<SkippedInput>, title: String, reason: String) {
        log::warn!(
            "Skipping input: {}",
            MergeError::Unreadable {
                title: title.clone(),
                reason: reason.clone(),
            }
        );
        self.emit(ProgressEvent::InputSkipped {
            title: title.clone(),
            reason: reason.clone(),
        });
        skipped.push(SkippedInput { title, reason });
    }

    fn emit(&self, event: ProgressEvent) {
        emit(&self.progress, event);
    }
}

/// Bind with default cancellation and no progress reporting
pub async fn bind(
    inputs: Vec<BindInput>,
    options: &BindOptions,
    output: impl AsRef<Path>,
) -> Result<BindReport> {
    Pipeline::new(options.clone()).run(inputs, output).await
}

fn emit(progress: &Option<ProgressCallback>, event: ProgressEvent) {
    if let Some(callback) = progress {
        callback(event);
    }
}

/// Concatenate the contents and the inputs, checking each against the plan
fn assemble(
    toc: Document,
    inputs: Vec<CountedInput>,
    plan: &PaginationPlan,
    cancel: &CancelFlag,
) -> Result<AssembledDocument> {
    let mut assembly = Assembly::new();
    assembly.append(toc)?;
    if assembly.page_count() != plan.toc_pages {
        return Err(MergeError::PlanMismatch {
            planned: plan.toc_pages,
            actual: assembly.page_count(),
        });
    }

    for (input, planned) in inputs.into_iter().zip(&plan.documents) {
        cancel.check()?;
        assembly.append(input.document)?;
        if assembly.page_count() != planned.end_page() {
            return Err(MergeError::PlanMismatch {
                planned: planned.end_page(),
                actual: assembly.page_count(),
            });
        }
        if let Some(path) = input.intermediate {
            if let Err(e) = std::fs::remove_file(&path) {
                log::debug!("Could not remove {}: {}", path.display(), e);
            }
        }
    }

    Ok(assembly.finish())
}

/// Outline, page numbers and document information
fn annotate(
    assembled: &mut AssembledDocument,
    plan: &PaginationPlan,
    options: &BindOptions,
) -> Result<()> {
    let actual = assembled.page_ids.len();
    if actual != plan.total_pages {
        return Err(MergeError::PlanMismatch {
            planned: plan.total_pages,
            actual,
        });
    }

    let bookmarks: Vec<Bookmark> = plan
        .documents
        .iter()
        .map(|doc| Bookmark::new(doc.title.clone(), doc.start_page))
        .collect();
    add_outline(
        &mut assembled.document,
        assembled.catalog_id,
        &assembled.page_ids,
        &bookmarks,
    )?;
    add_page_numbers(&mut assembled.document, &assembled.page_ids, &options.footer)?;
    set_metadata(&mut assembled.document, &options.metadata, plan.documents.len());
    Ok(())
}

fn serialize(document: &mut Document, optimize: bool) -> Result<Serialized> {
    let mut diagnostic = None;
    if optimize {
        match compact(document) {
            Ok(compacted) => {
                return Ok(Serialized {
                    bytes: compacted.bytes,
                    optimized: true,
                    diagnostic: None,
                });
            }
            Err(e) => {
                log::warn!("Compaction failed, writing uncompacted output: {}", e);
                diagnostic = Some(format!("Compaction skipped: {e}"));
            }
        }
    }

    Ok(Serialized {
        bytes: document_to_bytes(document)?,
        optimized: false,
        diagnostic,
    })
}

/// Write `bytes` to `target` through a temporary file in the same
/// directory. `target` ends up either untouched or complete.
async fn write_atomically(bytes: Vec<u8>, target: PathBuf) -> Result<()> {
    tokio::task::spawn_blocking(move || {
        let dir = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut file = tempfile::Builder::new()
            .prefix(".deckbind-")
            .suffix(".part")
            .tempfile_in(&dir)?;
        file.write_all(&bytes)?;
        file.as_file().sync_all()?;
        file.persist(&target)?;
        Ok::<_, MergeError>(())
    })
    .await?
}
