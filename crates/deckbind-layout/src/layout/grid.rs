//! Slot geometry calculation
//!
//! Turns a page size and grid configuration into the fixed, ordered set of
//! slot rectangles every grid page shares.

use crate::types::{LayoutError, Result};

use super::{Rect, Slot, SlotGeometry};

// =============================================================================
// Slot Resolution
// =============================================================================

/// Resolve the slot rectangles for a grid page.
///
/// Slots are returned row-major, top row first, each row left to right.
/// Every slot has the same size. The footer reserve is taken from the bottom
/// of the usable area so the running page number never overlaps a slot.
///
/// # Arguments
/// * `page_width` - Output page width in points
/// * `page_height` - Output page height in points
/// * `margin` - Margin on all four sides in points
/// * `gap` - Space between neighbouring slots in points
/// * `rows` - Number of rows (R)
/// * `columns` - Number of columns (C)
/// * `footer_reserve` - Extra height kept free above the bottom margin
///
/// # Errors
/// `LayoutError::InvalidGeometry` if the grid is empty or the computed slot
/// width or height is not positive.
pub fn resolve_slots(
    page_width: f32,
    page_height: f32,
    margin: f32,
    gap: f32,
    rows: usize,
    columns: usize,
    footer_reserve: f32,
) -> Result<SlotGeometry> {
    if rows == 0 || columns == 0 {
        return Err(LayoutError::InvalidGeometry(format!(
            "grid of {rows}x{columns} has no slots"
        )));
    }

    let (slot_width, slot_height) =
        slot_dimensions(page_width, page_height, margin, gap, rows, columns, footer_reserve);

    if !(slot_width > 0.0 && slot_height > 0.0) {
        return Err(LayoutError::InvalidGeometry(format!(
            "slot size {slot_width:.2}x{slot_height:.2}pt on a {page_width:.2}x{page_height:.2}pt page \
             (margin {margin}, gap {gap}, footer reserve {footer_reserve})"
        )));
    }

    let mut slots = Vec::with_capacity(rows * columns);
    for row in 0..rows {
        // Row 0 is at the top; PDF y grows upward
        let y = page_height - margin - (row + 1) as f32 * slot_height - row as f32 * gap;
        for col in 0..columns {
            let x = margin + col as f32 * (slot_width + gap);
            slots.push(Slot {
                index: row * columns + col,
                row,
                col,
                rect: Rect::new(x, y, slot_width, slot_height),
            });
        }
    }

    log::debug!(
        "Resolved {} slots of {:.2}x{:.2}pt on {:.2}x{:.2}pt page",
        slots.len(),
        slot_width,
        slot_height,
        page_width,
        page_height
    );

    Ok(SlotGeometry {
        page_width,
        page_height,
        rows,
        columns,
        slots,
    })
}

/// Width and height shared by every slot, possibly non-positive
fn slot_dimensions(
    page_width: f32,
    page_height: f32,
    margin: f32,
    gap: f32,
    rows: usize,
    columns: usize,
    footer_reserve: f32,
) -> (f32, f32) {
    let width = (page_width - 2.0 * margin - (columns - 1) as f32 * gap) / columns as f32;
    let height =
        (page_height - 2.0 * margin - (rows - 1) as f32 * gap - footer_reserve) / rows as f32;
    (width, height)
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const A4_W: f32 = 595.276;
    const A4_H: f32 = 841.89;

    #[test]
    fn test_default_grid() {
        let geometry = resolve_slots(A4_W, A4_H, 36.0, 12.0, 4, 2, 40.0).unwrap();

        assert_eq!(geometry.capacity(), 8);
        let first = geometry.slots[0].rect;
        assert!((first.width - (A4_W - 72.0 - 12.0) / 2.0).abs() < 0.01);
        assert!((first.height - (A4_H - 72.0 - 36.0 - 40.0) / 4.0).abs() < 0.01);

        // Top-left slot touches the top margin
        assert!((first.top() - (A4_H - 36.0)).abs() < 0.01);
        assert!((first.x - 36.0).abs() < 0.01);
    }

    #[test]
    fn test_row_major_order() {
        let geometry = resolve_slots(A4_W, A4_H, 36.0, 12.0, 4, 2, 40.0).unwrap();

        for (i, slot) in geometry.slots.iter().enumerate() {
            assert_eq!(slot.index, i);
            assert_eq!(slot.row, i / 2);
            assert_eq!(slot.col, i % 2);
        }

        // Same row shares y, next row sits lower
        assert_eq!(geometry.slots[0].rect.y, geometry.slots[1].rect.y);
        assert!(geometry.slots[2].rect.y < geometry.slots[0].rect.y);
        assert!(geometry.slots[1].rect.x > geometry.slots[0].rect.x);
    }

    #[test]
    fn test_footer_reserve_kept_free() {
        let geometry = resolve_slots(A4_W, A4_H, 36.0, 12.0, 4, 2, 40.0).unwrap();
        let lowest = geometry.slots.iter().map(|s| s.rect.y).fold(f32::MAX, f32::min);
        assert!((lowest - (36.0 + 40.0)).abs() < 0.01);
    }

    #[test]
    fn test_slots_never_overlap() {
        for rows in 1..=6 {
            for columns in 1..=5 {
                let geometry = resolve_slots(A4_W, A4_H, 36.0, 12.0, rows, columns, 40.0).unwrap();
                assert_eq!(geometry.capacity(), rows * columns);

                let usable = (A4_W - 72.0) * (A4_H - 72.0 - 40.0);
                let total: f32 = geometry.slots.iter().map(|s| s.rect.area()).sum();
                assert!(total <= usable + 0.01);

                for a in &geometry.slots {
                    for b in &geometry.slots {
                        if a.index != b.index {
                            assert!(!a.rect.overlaps(&b.rect), "{rows}x{columns}: {a:?} {b:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_zero_gap_single_slot() {
        let geometry = resolve_slots(200.0, 100.0, 10.0, 0.0, 1, 1, 0.0).unwrap();
        assert_eq!(geometry.slots[0].rect, Rect::new(10.0, 10.0, 180.0, 80.0));
    }

    #[test]
    fn test_margin_exceeds_page() {
        let result = resolve_slots(100.0, 100.0, 60.0, 0.0, 1, 1, 0.0);
        assert!(matches!(result, Err(LayoutError::InvalidGeometry(_))));
    }

    #[test]
    fn test_gaps_exceed_page() {
        let result = resolve_slots(100.0, 1000.0, 0.0, 30.0, 1, 5, 0.0);
        assert!(matches!(result, Err(LayoutError::InvalidGeometry(_))));
    }

    #[test]
    fn test_empty_grid_rejected() {
        let result = resolve_slots(100.0, 100.0, 0.0, 0.0, 0, 3, 0.0);
        assert!(matches!(result, Err(LayoutError::InvalidGeometry(_))));
    }
}
