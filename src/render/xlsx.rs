use super::layout::{CellStyle, CellValue, Edge, SheetLayout};
use crate::error::ScheduleResult;
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, Formula, Workbook};
use std::path::Path;

fn border(edge: Edge) -> FormatBorder {
    match edge {
        Edge::None => FormatBorder::None,
        Edge::Thin => FormatBorder::Thin,
        Edge::Thick => FormatBorder::Thick,
    }
}

pub fn format_for(style: &CellStyle) -> Format {
    let mut format = Format::new()
        .set_border_top(border(style.top))
        .set_border_bottom(border(style.bottom))
        .set_border_left(border(style.left))
        .set_border_right(border(style.right));
    if style.bold {
        format = format.set_bold();
    }
    if let Some(size) = style.font_size {
        format = format.set_font_size(size);
    }
    if style.centered {
        format = format
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter);
    }
    if style.wrap {
        format = format.set_text_wrap();
    }
    if style.text_format {
        format = format.set_num_format("@");
    }
    if let Some(shade) = style.fill {
        format = format.set_background_color(Color::RGB(shade.rgb()));
    }
    format
}

/// Build the workbook. Merges go down first so the label formulas land on
/// top of them.
pub fn write_workbook(layout: &SheetLayout) -> ScheduleResult<Workbook> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(layout.sheet_name())?;

    for &(col, width) in layout.column_widths() {
        sheet.set_column_width(col, width)?;
    }

    for merge in layout.merges() {
        let style = layout
            .cell(merge.first_row, merge.col)
            .map(|cell| format_for(&cell.style))
            .unwrap_or_else(Format::new);
        sheet.merge_range(
            merge.first_row,
            merge.col,
            merge.last_row,
            merge.col,
            "",
            &style,
        )?;
    }

    for (row, col, cell) in layout.cells() {
        let format = format_for(&cell.style);
        match &cell.value {
            CellValue::Empty => {
                sheet.write_blank(row, col, &format)?;
            }
            CellValue::Text(text) => {
                sheet.write_string_with_format(row, col, text, &format)?;
            }
            CellValue::Formula { formula, cached } => {
                let formula = Formula::new(formula).set_result(cached);
                sheet.write_formula_with_format(row, col, formula, &format)?;
            }
        }
    }

    for name in layout.names() {
        workbook.define_name(&name.name, &layout.name_target(name))?;
    }
    Ok(workbook)
}

pub fn save(layout: &SheetLayout, path: &Path) -> ScheduleResult<()> {
    let mut workbook = write_workbook(layout)?;
    workbook.save(path)?;
    Ok(())
}

pub fn to_buffer(layout: &SheetLayout) -> ScheduleResult<Vec<u8>> {
    let mut workbook = write_workbook(layout)?;
    Ok(workbook.save_to_buffer()?)
}
