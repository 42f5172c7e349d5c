//! Two-pass pagination
//!
//! The number of contents pages depends only on how many entries there
//! are, so it is fixed first. Start pages follow in one prefix-sum pass.

use crate::options::TocOptions;

/// Line capacity of the contents pages
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TocLayout {
    /// Baseline of the first entry on the first page
    pub first_baseline: f32,
    /// Baseline of the first entry on continuation pages
    pub continuation_baseline: f32,
    /// Lowest baseline an entry may use
    pub min_baseline: f32,
    pub line_height: f32,
}

impl TocLayout {
    pub fn from_options(options: &TocOptions) -> Self {
        let (_, page_height) = options.page_size_pt();
        Self {
            first_baseline: page_height - options.margin_pt - options.heading_block_pt,
            continuation_baseline: page_height - options.margin_pt,
            min_baseline: options.margin_pt + options.bottom_limit_pt,
            line_height: options.line_height_pt,
        }
    }

    /// Entries that fit on the first page
    pub fn first_page_lines(&self) -> usize {
        lines_between(self.first_baseline, self.min_baseline, self.line_height)
    }

    /// Entries that fit on each continuation page
    pub fn continuation_lines(&self) -> usize {
        lines_between(self.continuation_baseline, self.min_baseline, self.line_height)
    }

    /// Pages needed for `entries` entries (at least one, for the heading)
    pub fn pages_for(&self, entries: usize) -> usize {
        let first = self.first_page_lines();
        if entries <= first {
            return 1;
        }
        1 + (entries - first).div_ceil(self.continuation_lines())
    }
}

/// Baselines `top, top - step, ...` that stay at or above `bottom`.
/// The first line is always placed.
fn lines_between(top: f32, bottom: f32, step: f32) -> usize {
    if top < bottom || step <= 0.0 {
        return 1;
    }
    // Exact multiples of the step keep their last line
    ((top - bottom) / step + 1e-4).floor() as usize + 1
}

/// Page count of one laid-out input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPages {
    pub title: String,
    pub page_count: usize,
}

impl DocumentPages {
    pub fn new(title: impl Into<String>, page_count: usize) -> Self {
        Self {
            title: title.into(),
            page_count,
        }
    }
}

/// A contents entry: a title and the output page it starts on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocEntry {
    pub title: String,
    pub start_page: usize,
}

/// Where each document lands in the final output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedDocument {
    pub title: String,
    pub page_count: usize,
    /// 1-based first page in the final output
    pub start_page: usize,
}

impl PlannedDocument {
    /// 1-based last page in the final output
    pub fn end_page(&self) -> usize {
        self.start_page + self.page_count.saturating_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationPlan {
    pub toc_pages: usize,
    pub documents: Vec<PlannedDocument>,
    pub total_pages: usize,
}

impl PaginationPlan {
    /// Contents entries in output order
    pub fn toc_entries(&self) -> Vec<TocEntry> {
        self.documents
            .iter()
            .map(|doc| TocEntry {
                title: doc.title.clone(),
                start_page: doc.start_page,
            })
            .collect()
    }

    /// Sum of body pages, without the contents pages
    pub fn body_pages(&self) -> usize {
        self.total_pages - self.toc_pages
    }
}

/// Plan the final page numbers for `documents`, already in output order.
///
/// Pass one sizes the contents from the entry count; pass two assigns
/// `toc_pages + 1 + (pages before it)` as each document's start page.
pub fn plan_pagination(documents: &[DocumentPages], layout: &TocLayout) -> PaginationPlan {
    let toc_pages = layout.pages_for(documents.len());

    let mut next_page = toc_pages + 1;
    let documents: Vec<PlannedDocument> = documents
        .iter()
        .map(|doc| {
            let planned = PlannedDocument {
                title: doc.title.clone(),
                page_count: doc.page_count,
                start_page: next_page,
            };
            next_page += doc.page_count;
            planned
        })
        .collect();

    let total_pages = next_page - 1;
    log::debug!(
        "Planned {} documents: {} contents pages, {} pages total",
        documents.len(),
        toc_pages,
        total_pages
    );

    PaginationPlan {
        toc_pages,
        documents,
        total_pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_layout() -> TocLayout {
        TocLayout::from_options(&TocOptions::default())
    }

    #[test]
    fn test_default_capacity() {
        let layout = default_layout();
        // A4: (841.89 - 130 - 100) / 25 -> 24 steps + the first line
        assert_eq!(layout.first_page_lines(), 25);
        // (791.89 - 100) / 25 -> 27 steps + the first line
        assert_eq!(layout.continuation_lines(), 28);
    }

    #[test]
    fn test_exact_multiple_keeps_last_line() {
        // 0.1 has no exact binary form, so the quotient lands just below 20
        assert_eq!(lines_between(562.0, 0.0, 28.1), 21);
        assert_eq!(lines_between(100.0, 0.0, 25.0), 5);
    }

    #[test]
    fn test_toc_pages_from_entry_count() {
        let layout = default_layout();
        assert_eq!(layout.pages_for(0), 1);
        assert_eq!(layout.pages_for(1), 1);
        assert_eq!(layout.pages_for(25), 1);
        assert_eq!(layout.pages_for(26), 2);
        assert_eq!(layout.pages_for(53), 2);
        assert_eq!(layout.pages_for(54), 3);
    }

    #[test]
    fn test_three_document_scenario() {
        let docs = vec![
            DocumentPages::new("A", 1),
            DocumentPages::new("B", 1),
            DocumentPages::new("C", 1),
        ];
        let plan = plan_pagination(&docs, &default_layout());

        assert_eq!(plan.toc_pages, 1);
        let starts: Vec<_> = plan.documents.iter().map(|d| d.start_page).collect();
        assert_eq!(starts, vec![2, 3, 4]);
        assert_eq!(plan.total_pages, 4);
    }

    #[test]
    fn test_start_pages_strictly_increase() {
        let counts = [3, 1, 7, 2, 2, 9, 1];
        let docs: Vec<_> = counts
            .iter()
            .enumerate()
            .map(|(i, &n)| DocumentPages::new(format!("Doc {i}"), n))
            .collect();
        let plan = plan_pagination(&docs, &default_layout());

        for pair in plan.documents.windows(2) {
            assert!(pair[1].start_page > pair[0].start_page);
            assert_eq!(pair[1].start_page, pair[0].end_page() + 1);
        }
        let last = plan.documents.last().unwrap();
        assert_eq!(last.end_page(), plan.total_pages);
        assert_eq!(plan.total_pages, plan.toc_pages + counts.iter().sum::<usize>());
        assert_eq!(plan.body_pages(), 25);
    }

    #[test]
    fn test_multi_page_toc_offsets_body() {
        let docs: Vec<_> = (0..30).map(|i| DocumentPages::new(format!("{i}"), 2)).collect();
        let plan = plan_pagination(&docs, &default_layout());

        assert_eq!(plan.toc_pages, 2);
        assert_eq!(plan.documents[0].start_page, 3);
        assert_eq!(plan.documents[1].start_page, 5);
        assert_eq!(plan.total_pages, 62);
    }

    #[test]
    fn test_toc_entries_match_plan() {
        let docs = vec![DocumentPages::new("Intro", 2), DocumentPages::new("Body", 5)];
        let plan = plan_pagination(&docs, &default_layout());
        let entries = plan.toc_entries();

        assert_eq!(entries[0].title, "Intro");
        assert_eq!(entries[0].start_page, 2);
        assert_eq!(entries[1].start_page, 4);
    }
}
