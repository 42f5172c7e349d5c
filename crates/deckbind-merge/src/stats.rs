//! Planning without rendering

use deckbind_layout::page_count;
use deckbind_toc::{DocumentPages, PaginationPlan, TocLayout, plan_pagination};

use crate::input::{BindInput, InputContent};
use crate::options::BindOptions;
use crate::pipeline::SkippedInput;
use crate::types::*;

/// The page plan a bind run would produce
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSummary {
    pub plan: PaginationPlan,
    pub skipped: Vec<SkippedInput>,
}

/// Compute the pagination plan for `inputs` without rendering anything.
///
/// Image inputs are counted from the grid capacity. Documents are opened
/// to read their page count; unreadable image files are not detected here
/// since a run draws placeholders for them.
pub async fn calculate_plan(inputs: &[BindInput], options: &BindOptions) -> Result<PlanSummary> {
    options.validate()?;

    let mut ordered: Vec<&BindInput> = inputs.iter().collect();
    ordered.sort_by_key(|input| input.order);

    let mut pages = Vec::new();
    let mut skipped = Vec::new();
    for input in ordered {
        let count = match &input.content {
            InputContent::Images { pages, .. } => Ok(options.grid.pages_for(pages.len())),
            InputContent::Document(path) => page_count(path).await.map_err(|e| e.to_string()),
        };
        match count {
            Ok(0) => skipped.push(SkippedInput {
                title: input.title.clone(),
                reason: "document has no pages".to_string(),
            }),
            Ok(n) => pages.push(DocumentPages::new(input.title.clone(), n)),
            Err(reason) => skipped.push(SkippedInput {
                title: input.title.clone(),
                reason,
            }),
        }
    }

    if pages.is_empty() {
        return Err(MergeError::NoMergeableDocuments);
    }

    let plan = plan_pagination(&pages, &TocLayout::from_options(&options.toc));
    Ok(PlanSummary { plan, skipped })
}
