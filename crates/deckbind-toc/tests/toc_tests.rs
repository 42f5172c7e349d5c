use deckbind_toc::*;
use std::path::PathBuf;
use std::sync::Arc;

fn plan_for(counts: &[usize]) -> PaginationPlan {
    let docs: Vec<_> = counts
        .iter()
        .enumerate()
        .map(|(i, &n)| DocumentPages::new(format!("Deck {}", i + 1), n))
        .collect();
    plan_pagination(&docs, &TocLayout::from_options(&TocOptions::default()))
}

fn page_text(doc: &lopdf::Document, page_number: u32) -> String {
    let page_id = doc.get_pages()[&page_number];
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}

fn system_font() -> Option<PathBuf> {
    [
        "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
        "/usr/share/fonts/TTF/DejaVuSans.ttf",
    ]
    .into_iter()
    .map(PathBuf::from)
    .find(|p| p.exists())
}

#[tokio::test]
async fn test_single_page_contents() {
    let plan = plan_for(&[5, 8, 3]);
    let rendered = render_toc(&plan, &TocOptions::default(), Arc::new(ResolvedFont::Builtin))
        .await
        .unwrap();

    assert_eq!(rendered.pages, 1);
    let doc = lopdf::Document::load_mem(&rendered.bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);

    let text = page_text(&doc, 1);
    assert!(text.contains("(Contents)"));
    for (entry, page) in [(1, 2), (2, 3), (3, 4)] {
        assert!(text.contains(&format!("({entry}. Deck {entry})")));
        assert!(text.contains(&format!("(Page {page})")));
    }
}

#[test]
fn test_long_title_printed_truncated() {
    let title: String = "Quarterly".chars().cycle().take(50).collect();
    let plan = plan_pagination(
        &[DocumentPages::new(title.clone(), 3)],
        &TocLayout::from_options(&TocOptions::default()),
    );

    let rendered =
        render_toc_sync(&plan.toc_entries(), 1, &TocOptions::default(), &ResolvedFont::Builtin)
            .unwrap();

    let doc = lopdf::Document::load_mem(&rendered.bytes).unwrap();
    let text = page_text(&doc, 1);
    let expected: String = title.chars().take(37).collect();
    assert!(text.contains(&format!("(1. {expected}...)")));
    assert!(!text.contains(&title));
}

#[tokio::test]
async fn test_multi_page_contents_matches_plan() {
    let counts = vec![1; 60];
    let plan = plan_for(&counts);
    assert_eq!(plan.toc_pages, 3);

    let rendered = render_toc(&plan, &TocOptions::default(), Arc::new(ResolvedFont::Builtin))
        .await
        .unwrap();
    assert_eq!(rendered.pages, 3);

    // 25 entries fit the first page; entry 26 opens the second
    let doc = lopdf::Document::load_mem(&rendered.bytes).unwrap();
    let first = page_text(&doc, 1);
    let second = page_text(&doc, 2);
    assert!(first.contains("(25. Deck 25)"));
    assert!(!first.contains("(26. Deck 26)"));
    assert!(second.contains("(26. Deck 26)"));
    assert!(second.contains("(Page 29)"));
}

#[test]
fn test_exact_line_heights_render_as_planned() {
    // Letter leaves 562 pt between the first baseline and the lowest one
    for line_height_pt in [28.1, 14.05, 11.24, 22.48] {
        let options = TocOptions {
            paper_size: deckbind_layout::PaperSize::Letter,
            line_height_pt,
            ..Default::default()
        };
        let layout = TocLayout::from_options(&options);
        let first = layout.first_page_lines();
        for count in [first, first + 1, first + layout.continuation_lines() + 1] {
            let docs: Vec<_> = (0..count).map(|i| DocumentPages::new(format!("{i}"), 1)).collect();
            let plan = plan_pagination(&docs, &layout);
            let rendered =
                render_toc_sync(&plan.toc_entries(), plan.toc_pages, &options, &ResolvedFont::Builtin);
            assert!(
                rendered.is_ok(),
                "line height {line_height_pt}, {count} entries: {:?}",
                rendered.err()
            );
        }
    }
}

#[test]
fn test_wrong_page_count_detected() {
    let plan = plan_for(&[2, 2]);
    let result = render_toc_sync(
        &plan.toc_entries(),
        2,
        &TocOptions::default(),
        &ResolvedFont::Builtin,
    );
    match result {
        Err(TocError::PageCountMismatch { planned, rendered }) => {
            assert_eq!(planned, 2);
            assert_eq!(rendered, 1);
        }
        _ => panic!("Expected PageCountMismatch error"),
    }
}

#[test]
fn test_invalid_options_rejected() {
    let options = TocOptions {
        entry_font_size: 0.0,
        ..Default::default()
    };
    let plan = plan_for(&[1]);
    let result = render_toc_sync(&plan.toc_entries(), 1, &options, &ResolvedFont::Builtin);
    assert!(matches!(result, Err(TocError::Config(_))));
}

#[test]
fn test_rendering_is_repeatable() {
    let plan = plan_for(&[4, 4, 4, 4]);
    let entries = plan.toc_entries();
    let first = render_toc_sync(&entries, 1, &TocOptions::default(), &ResolvedFont::Builtin).unwrap();
    let second = render_toc_sync(&entries, 1, &TocOptions::default(), &ResolvedFont::Builtin).unwrap();
    assert_eq!(first.pages, second.pages);
}

#[test]
fn test_embedded_font_measures_with_its_own_metrics() {
    let Some(path) = system_font() else {
        eprintln!("skipping: DejaVuSans.ttf is not installed");
        return;
    };
    let session = FontSession::from_paths(vec![PathBuf::from("/nonexistent.ttf"), path]);
    let font = session.resolve();
    assert!(!font.is_builtin());

    let embedded = font.text_width("Page 12", 12.0);
    let builtin = ResolvedFont::Builtin.text_width("Page 12", 12.0);
    assert!(embedded > 0.0);
    assert!((embedded - builtin).abs() > 0.01);

    let plan = plan_for(&[3, 3]);
    let rendered = render_toc_sync(&plan.toc_entries(), 1, &TocOptions::default(), &font).unwrap();
    assert_eq!(rendered.pages, 1);
    assert_eq!(session.probe_count(), 1);
}
