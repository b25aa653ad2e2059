//! Layout regression tests

use super::*;
use crate::docx::VMerge;
use crate::utils::error::LayoutError;
use pretty_assertions::assert_eq;

fn grid(rows: usize, columns: usize) -> Vec<Cell> {
    (0..rows)
        .flat_map(|r| (0..columns).map(move |c| Cell::text(r, c, &format!("{}{}", r, c))))
        .collect()
}

fn positions(table: &Table) -> Vec<(usize, usize)> {
    table.cells().iter().map(|c| (c.row, c.column)).collect()
}

#[test]
fn test_extent_from_cells() {
    let cells = vec![
        Cell::text(0, 0, "a").with_span(1, 3),
        Cell::text(1, 0, "b").with_span(2, 1),
        Cell::text(1, 1, "c"),
    ];
    let table = Table::new(cells).unwrap();
    assert_eq!(table.rows(), 3);
    assert_eq!(table.columns(), 3);
}

#[test]
fn test_empty_table() {
    assert_eq!(Table::new(vec![]).unwrap_err(), LayoutError::EmptyTable);
    assert_eq!(
        Table::try_from(CellGroup::default()).unwrap_err(),
        LayoutError::EmptyTable
    );
}

#[test]
fn test_overlap() {
    let cells = vec![
        Cell::text(0, 0, "A").with_span(2, 1),
        Cell::text(1, 0, "B"),
    ];
    match Table::new(cells).unwrap_err() {
        LayoutError::CellOverlap { row, column, cell } => {
            assert_eq!((row, column), (1, 0));
            assert_eq!((cell.row, cell.column), (1, 0));
        }
        other => panic!("expected overlap, got {:?}", other),
    }
}

#[test]
fn test_overlap_message_names_cell() {
    let cells = vec![Cell::text(0, 0, "A"), Cell::text(0, 0, "B").with_span(1, 2)];
    let err = Table::new(cells).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Cell overlap at (0, 0): cell at (0, 0) spanning 1x2"
    );
}

#[test]
fn test_declared_extent() {
    // gaps are fine
    let table = Table::with_extent(vec![Cell::text(0, 0, "x")], 2, 2).unwrap();
    assert_eq!((table.rows(), table.columns()), (2, 2));

    let err = Table::with_extent(grid(2, 3), 2, 2).unwrap_err();
    assert!(matches!(
        err,
        LayoutError::OutOfBounds {
            row: 0,
            column: 2,
            ..
        }
    ));
}

#[test]
fn test_zero_span() {
    let err = Table::new(vec![Cell::text(0, 0, "x").with_span(1, 0)]).unwrap_err();
    assert!(matches!(err, LayoutError::InvalidSpan { .. }));
}

#[test]
fn test_far_cell_rejected_without_allocating() {
    let err = Table::new(vec![Cell::text(usize::MAX, 0, "x")]).unwrap_err();
    assert_eq!(
        err,
        LayoutError::ExtentTooLarge {
            rows: usize::MAX,
            columns: 1
        }
    );
}

#[test]
fn test_huge_declared_extent() {
    let side = 1usize << 33;
    let err = Table::with_extent(vec![Cell::text(0, 0, "x")], side, side).unwrap_err();
    assert!(matches!(err, LayoutError::ExtentTooLarge { .. }));

    let err = Table::with_extent(grid(1, 1), table::MAX_GRID_POSITIONS + 1, 1).unwrap_err();
    assert!(matches!(err, LayoutError::ExtentTooLarge { .. }));
}

#[test]
fn test_span_past_usize_is_out_of_bounds() {
    let err = Table::with_extent(vec![Cell::text(1, 0, "x").with_span(usize::MAX, 1)], 2, 2)
        .unwrap_err();
    assert!(matches!(
        err,
        LayoutError::OutOfBounds {
            row: 2,
            column: 0,
            ..
        }
    ));

    let err = Table::with_extent(vec![Cell::text(0, 1, "x").with_span(1, usize::MAX)], 2, 2)
        .unwrap_err();
    assert!(matches!(
        err,
        LayoutError::OutOfBounds {
            row: 0,
            column: 2,
            ..
        }
    ));
}

#[test]
fn test_offset_saturates() {
    let group = CellGroup::new(grid(1, 1)).offset(usize::MAX, 1);
    assert_eq!(group.cells[0].row, usize::MAX);
    assert_eq!(group.cells[0].row_end(), usize::MAX);
    assert!(Table::try_from(group).is_err());
}

#[test]
fn test_sorted_row_major() {
    let mut cells = grid(2, 3);
    cells.reverse();
    let table = Table::new(cells).unwrap();
    assert_eq!(
        positions(&table),
        vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
    );
}

#[test]
fn test_sort_idempotent() {
    let table = Table::new(grid(3, 2)).unwrap();
    let again = Table::new(table.cells().to_vec()).unwrap();
    assert_eq!(table, again);
}

#[test]
fn test_offset_additive() {
    let base = CellGroup::new(grid(2, 2));

    let mut stepwise = base.clone();
    stepwise.add_offset(1, 0);
    stepwise.add_offset(0, 2);

    let once = base.clone().offset(1, 2);
    assert_eq!(stepwise, once);

    let mut reversed = base;
    reversed.add_offset(0, 2);
    reversed.add_offset(1, 0);
    assert_eq!(reversed, once);

    assert_eq!((once.rows(), once.columns()), (3, 4));
}

#[test]
fn test_group_extent() {
    let empty = CellGroup::default();
    assert_eq!((empty.rows(), empty.columns()), (0, 0));

    let group: CellGroup = vec![Cell::text(2, 1, "x").with_span(1, 3)].into();
    assert_eq!((group.rows(), group.columns()), (3, 4));
}

#[test]
fn test_group_allows_overlap() {
    let mut group = CellGroup::new(grid(1, 2));
    group.merge(CellGroup::new(grid(1, 2)));
    assert_eq!(group.len(), 4);
    assert!(Table::try_from(group).is_err());
}

#[test]
fn test_subheader_stacked_above_data() {
    let mut layout = CellGroup::new(vec![Cell::header_text(0, 0, "Sub").with_span(1, 2)]);
    let data = CellGroup::new(grid(2, 2)).offset(1, 0);
    layout.merge(data);

    let table = Table::try_from(layout).unwrap();
    assert_eq!(table.rows(), 3);
    let data_rows: Vec<_> = table.cells().iter().filter(|c| !c.header).map(|c| c.row).collect();
    assert_eq!(data_rows, vec![1, 1, 2, 2]);
}

#[test]
fn test_render_grid() {
    let table = Table::new(grid(2, 2)).unwrap();
    let doc = table.to_docx(None, &RenderOptions::default());
    let tables: Vec<_> = doc.tables().collect();
    assert_eq!(tables.len(), 1);
    let native = tables[0];
    assert_eq!((native.row_count(), native.columns), (2, 2));
    assert_eq!(native.cell(1, 0).unwrap().text(), "10");
    assert_eq!(native.cell(1, 0).unwrap().paragraphs.len(), 1);
}

#[test]
fn test_render_merges_spans() {
    let cells = vec![
        Cell::header_text(0, 0, "wide").with_span(1, 2),
        Cell::text(1, 0, "tall").with_span(2, 1),
        Cell::text(1, 1, "b"),
        Cell::text(2, 1, "c"),
    ];
    let doc = Table::new(cells)
        .unwrap()
        .to_docx(None, &RenderOptions::default());
    let native = doc.tables().next().unwrap();

    let wide = native.cell(0, 0).unwrap();
    assert_eq!(wide.grid_span, 2);
    assert_eq!(wide.shade.as_deref(), Some("EEEEEE"));
    assert!(native.cell(0, 1).unwrap().covered);

    assert_eq!(native.cell(1, 0).unwrap().v_merge, Some(VMerge::Restart));
    assert_eq!(native.cell(2, 0).unwrap().v_merge, Some(VMerge::Continue));
    assert_eq!(native.cell(2, 1).unwrap().text(), "c");
}

#[test]
fn test_render_appends_to_existing_document() {
    let opts = RenderOptions::default();
    let mut doc = Table::new(grid(1, 1)).unwrap().to_docx(None, &opts);
    doc.add_paragraph("between", crate::docx::NORMAL_STYLE);
    let doc = Table::new(grid(2, 1)).unwrap().to_docx(Some(doc), &opts);
    assert_eq!(doc.tables().count(), 2);
    assert_eq!(doc.body.items.len(), 3);
}

#[test]
fn test_render_options_applied() {
    let opts = RenderOptions::preview()
        .with_landscape(true)
        .with_title("Table 2");
    let doc = Table::new(vec![Cell::header_text(0, 0, "h")])
        .unwrap()
        .with_column_widths(vec![2000])
        .to_docx(None, &opts);
    assert!(doc.landscape);
    assert_eq!(doc.title.as_deref(), Some("Table 2"));
    let native = doc.tables().next().unwrap();
    assert_eq!(native.cell(0, 0).unwrap().shade, None);
    assert_eq!(native.column_widths, Some(vec![2000]));
}

#[test]
fn test_column_widths_must_match() {
    let table = Table::new(grid(1, 2)).unwrap().with_column_widths(vec![100]);
    assert_eq!(table.column_widths(), None);
}

#[test]
fn test_render_hyperlink_registers_relationship() {
    let opts = RenderOptions::default().with_base_url("https://hawc.example.org");
    let doc = Table::new(vec![Cell::rich(0, 0, r#"<p><a href="/study/5/">Smith 2020</a></p>"#)])
        .unwrap()
        .to_docx(None, &opts);
    let targets: Vec<_> = doc.relationships.hyperlinks().map(|(_, t)| t).collect();
    assert_eq!(targets, vec!["https://hawc.example.org/study/5/"]);
}
