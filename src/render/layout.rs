//! Cell-level layout of the exam sheet, independent of the file format.
//!
//! Rows and columns are zero-based. Column 0 holds the exam time label of
//! each slot block, courses and rooms alternate from column 1, and a side
//! panel after one spacer column holds the editable day and slot labels that
//! the time labels reference by defined name.

use super::RenderOptions;
use crate::error::{ScheduleError, ScheduleResult};
use crate::schedule::{Schedule, SlotPosition};
use std::collections::BTreeMap;

pub const COLUMN_WIDTH: f64 = 20.0;
pub const HEADER_FONT_SIZE: u8 = 14;
const MIN_COURSE_COLUMNS: u16 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Edge {
    #[default]
    None,
    Thin,
    Thick,
}

/// Alternating block background.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shade {
    Dark,
    Light,
}

impl Shade {
    pub fn for_slot(index: usize) -> Self {
        if index % 2 == 0 { Shade::Dark } else { Shade::Light }
    }

    pub fn rgb(self) -> u32 {
        match self {
            Shade::Dark => 0xA5C9EF,
            Shade::Light => 0xD2E4F7,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CellStyle {
    pub bold: bool,
    pub font_size: Option<u8>,
    pub centered: bool,
    pub wrap: bool,
    /// Store the value as text (`@`) so edited dates are not reinterpreted.
    pub text_format: bool,
    pub fill: Option<Shade>,
    pub top: Edge,
    pub bottom: Edge,
    pub left: Edge,
    pub right: Edge,
}

impl CellStyle {
    fn header() -> Self {
        Self {
            bold: true,
            font_size: Some(HEADER_FONT_SIZE),
            centered: true,
            bottom: Edge::Thick,
            ..Self::default()
        }
    }

    /// Panel headings keep the header border but use the default font size.
    fn panel_header() -> Self {
        Self {
            font_size: None,
            ..Self::header()
        }
    }

    fn boxed(shade: Shade) -> Self {
        Self {
            centered: true,
            fill: Some(shade),
            top: Edge::Thin,
            bottom: Edge::Thin,
            left: Edge::Thin,
            right: Edge::Thin,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Empty,
    Text(String),
    /// Formula plus the value shown until the workbook is recalculated.
    Formula { formula: String, cached: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    pub value: CellValue,
    pub style: CellStyle,
}

/// Vertical merge in one column, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRange {
    pub first_row: u32,
    pub last_row: u32,
    pub col: u16,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedName {
    pub name: String,
    pub row: u32,
    pub col: u16,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    sheet_name: String,
    course_columns: u16,
    cells: BTreeMap<(u32, u16), Cell>,
    merges: Vec<MergeRange>,
    names: Vec<DefinedName>,
    column_widths: Vec<(u16, f64)>,
}

impl SheetLayout {
    pub fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    /// Label column plus reserved course/room columns.
    pub fn course_columns(&self) -> u16 {
        self.course_columns
    }

    pub fn panel_column(&self) -> u16 {
        self.course_columns + 1
    }

    pub fn cell(&self, row: u32, col: u16) -> Option<&Cell> {
        self.cells.get(&(row, col))
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u16, &Cell)> {
        self.cells.iter().map(|(&(row, col), cell)| (row, col, cell))
    }

    pub fn text(&self, row: u32, col: u16) -> Option<&str> {
        match self.cell(row, col).map(|cell| &cell.value) {
            Some(CellValue::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn merges(&self) -> &[MergeRange] {
        &self.merges
    }

    pub fn names(&self) -> &[DefinedName] {
        &self.names
    }

    pub fn column_widths(&self) -> &[(u16, f64)] {
        &self.column_widths
    }

    /// `='Sheet'!$C$R` reference for a defined name.
    pub fn name_target(&self, name: &DefinedName) -> String {
        format!(
            "='{}'!${}${}",
            self.sheet_name.replace('\'', "''"),
            column_letter(name.col),
            name.row + 1
        )
    }

    fn put(&mut self, row: u32, col: u16, value: CellValue, style: CellStyle) {
        self.cells.insert((row, col), Cell { value, style });
    }

    fn style_mut(&mut self, row: u32, col: u16) -> &mut CellStyle {
        &mut self
            .cells
            .entry((row, col))
            .or_insert_with(|| Cell {
                value: CellValue::Empty,
                style: CellStyle::default(),
            })
            .style
    }
}

/// Excel column letters for a zero-based column index.
pub fn column_letter(col: u16) -> String {
    let mut n = u32::from(col) + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push(char::from(b'A' + rem));
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

/// Columns reserved for labels, courses and rooms.
pub fn course_column_count(schedule: &Schedule, options: &RenderOptions) -> u16 {
    if !options.compact {
        return MIN_COURSE_COLUMNS;
    }
    let widest = schedule
        .slots()
        .iter()
        .map(|slot| slot.len().div_ceil(options.max_rows_per_column) * 2 + 1)
        .max()
        .unwrap_or(0);
    MIN_COURSE_COLUMNS.max(u16::try_from(widest).unwrap_or(u16::MAX))
}

pub fn build_layout(schedule: &Schedule, options: &RenderOptions) -> ScheduleResult<SheetLayout> {
    options.validate()?;
    if schedule.is_empty() {
        return Err(ScheduleError::Render(
            "schedule has no courses to render".into(),
        ));
    }

    let course_columns = course_column_count(schedule, options);
    let mut layout = SheetLayout {
        sheet_name: options.sheet_name.clone(),
        course_columns,
        cells: BTreeMap::new(),
        merges: Vec::new(),
        names: Vec::new(),
        column_widths: Vec::new(),
    };

    write_header(&mut layout);
    let day_count = schedule.days_used(options.periods_per_day);
    let slot_rows = write_side_panel(&mut layout, options, day_count)?;

    let max_rows = to_row(options.max_rows_per_column)?;
    let mut row: u32 = 1;
    for (index, slot) in schedule.populated_slots() {
        let position = SlotPosition::from_index(index, options.periods_per_day);
        let block = BlockWriter {
            shade: Shade::for_slot(index),
            start_row: row,
            max_rows,
            compact: options.compact,
        };
        let courses: Vec<&str> = slot.sorted_courses().into_iter().map(|c| c.as_str()).collect();
        let end_row = block.write(&mut layout, &courses);
        write_time_label(&mut layout, &block, end_row, position, &slot_rows)?;
        row = end_row + 1;
    }

    Ok(layout)
}

fn write_header(layout: &mut SheetLayout) {
    let panel = layout.panel_column();
    for col in 0..=panel {
        layout.put(0, col, CellValue::Empty, CellStyle::header());
        layout.column_widths.push((col, COLUMN_WIDTH));
    }
    layout.put(0, 0, CellValue::Text("Exam Time".into()), CellStyle::header());
    for col in 1..layout.course_columns {
        let label = if col % 2 == 1 { "Course" } else { "Room" };
        layout.put(0, col, CellValue::Text(label.into()), CellStyle::header());
    }
}

/// Panel rows holding the day and slot labels, keyed for formula references.
struct PanelRows {
    day_names: Vec<String>,
    day_labels: Vec<String>,
    slot_names: Vec<String>,
    slot_labels: Vec<String>,
}

fn write_side_panel(
    layout: &mut SheetLayout,
    options: &RenderOptions,
    day_count: usize,
) -> ScheduleResult<PanelRows> {
    let col = layout.panel_column();
    let text = CellStyle {
        text_format: true,
        ..CellStyle::default()
    };

    let day_labels: Vec<String> = match &options.calendar {
        Some(calendar) => calendar.day_labels(day_count),
        None => (1..=day_count).map(|day| format!("Day {day}")).collect(),
    };
    layout.put(0, col, CellValue::Text("Dates".into()), CellStyle::panel_header());
    let mut day_names = Vec::with_capacity(day_count);
    for (day, label) in day_labels.iter().enumerate() {
        let row = to_row(day + 1)?;
        let name = format!("Day_{}", day + 1);
        layout.put(row, col, CellValue::Text(label.clone()), text.clone());
        layout.names.push(DefinedName {
            name: name.clone(),
            row,
            col,
        });
        day_names.push(name);
    }

    let times_row = to_row(day_count + 2)?;
    layout.put(times_row, col, CellValue::Text("Times".into()), CellStyle::panel_header());
    let mut slot_names = Vec::with_capacity(options.periods_per_day);
    let mut slot_labels = Vec::with_capacity(options.periods_per_day);
    for period in 0..options.periods_per_day {
        let row = times_row + to_row(period + 1)?;
        let name = format!("Slot_{}", period + 1);
        let label = format!("Slot {}", period + 1);
        layout.put(row, col, CellValue::Text(label.clone()), text.clone());
        layout.names.push(DefinedName {
            name: name.clone(),
            row,
            col,
        });
        slot_names.push(name);
        slot_labels.push(label);
    }

    Ok(PanelRows {
        day_names,
        day_labels,
        slot_names,
        slot_labels,
    })
}

struct BlockWriter {
    shade: Shade,
    start_row: u32,
    max_rows: u32,
    compact: bool,
}

impl BlockWriter {
    fn max_row(&self) -> u32 {
        self.start_row.saturating_add(self.max_rows.saturating_sub(1))
    }

    /// Write the course/room pairs and closing borders. Returns the last row
    /// the block occupies.
    fn write(&self, layout: &mut SheetLayout, courses: &[&str]) -> u32 {
        let mut row = self.start_row;
        let mut col: u16 = 1;
        for course in courses {
            let mut wrapped = false;
            if self.compact && row > self.max_row() {
                row = self.start_row;
                col += 2;
                wrapped = true;
            }

            let mut course_style = CellStyle::boxed(self.shade);
            let mut room_style = CellStyle {
                right: Edge::Thick,
                ..CellStyle::boxed(self.shade)
            };
            if wrapped {
                course_style.top = Edge::Thick;
                room_style.top = Edge::Thick;
            }
            layout.put(row, col, CellValue::Text((*course).to_string()), course_style);
            layout.put(row, col + 1, CellValue::Empty, room_style);
            row += 1;
        }

        let last = row - 1;
        if col == 1 {
            layout.style_mut(last, 1).bottom = Edge::Thick;
            layout.style_mut(last, 2).bottom = Edge::Thick;
            return last;
        }

        // Wrapped block: close every full column on the block's last row,
        // then the partial final column on its own last row.
        let max_row = self.max_row();
        for c in 1..col {
            layout.style_mut(max_row, c).bottom = Edge::Thick;
        }
        layout.style_mut(last, col).bottom = Edge::Thick;
        layout.style_mut(last, col + 1).bottom = Edge::Thick;
        max_row
    }
}

fn write_time_label(
    layout: &mut SheetLayout,
    block: &BlockWriter,
    end_row: u32,
    position: SlotPosition,
    panel: &PanelRows,
) -> ScheduleResult<()> {
    let (Some(day_name), Some(slot_name)) = (
        panel.day_names.get(position.day),
        panel.slot_names.get(position.period),
    ) else {
        return Err(ScheduleError::Render(format!(
            "no panel label for {position}"
        )));
    };
    let cached = format!(
        "{}\n{}",
        panel.day_labels[position.day], panel.slot_labels[position.period]
    );
    let style = CellStyle {
        wrap: true,
        bottom: Edge::Thick,
        ..CellStyle::boxed(block.shade)
    };
    layout.put(
        block.start_row,
        0,
        CellValue::Formula {
            formula: format!("=_xlfn.TEXTJOIN(CHAR(10),TRUE,{day_name},{slot_name})"),
            cached,
        },
        style,
    );
    if end_row > block.start_row {
        layout.merges.push(MergeRange {
            first_row: block.start_row,
            last_row: end_row,
            col: 0,
        });
    }
    Ok(())
}

fn to_row(value: usize) -> ScheduleResult<u32> {
    u32::try_from(value)
        .map_err(|_| ScheduleError::Render(format!("row {value} is outside the sheet")))
}
