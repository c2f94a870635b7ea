use std::collections::HashMap;

pub const DEFAULT_COLUMN_WIDTH: u32 = 150;
pub const MIN_COLUMN_WIDTH: u32 = 20;

/// Pixel widths the user has set by dragging. Columns never dragged use the
/// default width.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    widths: HashMap<String, u32>,
    drag: Option<ResizeDrag>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ResizeDrag {
    column: String,
    start_x: i32,
    start_width: u32,
}

/// What a drag step changed: the one column plus the row width that depends on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnResize {
    pub column: String,
    pub width: u32,
    pub row_width: u32,
}

impl ColumnWidths {
    pub fn width(&self, column: &str) -> u32 {
        self.widths.get(column).copied().unwrap_or(DEFAULT_COLUMN_WIDTH)
    }

    pub fn row_width<'a>(&self, columns: impl IntoIterator<Item = &'a str>) -> u32 {
        columns.into_iter().map(|c| self.width(c)).sum()
    }

    pub fn clear(&mut self) {
        self.widths.clear();
        self.drag = None;
    }

    pub fn begin_drag(&mut self, column: &str, pointer_x: i32) {
        self.drag = Some(ResizeDrag {
            column: column.to_string(),
            start_x: pointer_x,
            start_width: self.width(column),
        });
    }

    /// Applies one pointer movement of an active drag. Outside a drag this
    /// does nothing.
    pub fn drag_to<'a>(
        &mut self,
        pointer_x: i32,
        columns: impl IntoIterator<Item = &'a str>,
    ) -> Option<ColumnResize> {
        let drag = self.drag.as_ref()?;
        let delta = i64::from(pointer_x) - i64::from(drag.start_x);
        let width = (i64::from(drag.start_width) + delta).clamp(i64::from(MIN_COLUMN_WIDTH), i64::from(u32::MAX)) as u32;
        let column = drag.column.clone();
        self.widths.insert(column.clone(), width);
        Some(ColumnResize {
            column,
            width,
            row_width: self.row_width(columns),
        })
    }

    pub fn end_drag(&mut self) {
        self.drag = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLS: [&str; 3] = ["id", "name", "email"];

    #[test]
    fn untouched_columns_use_default_width() {
        let w = ColumnWidths::default();
        assert_eq!(w.width("id"), DEFAULT_COLUMN_WIDTH);
        assert_eq!(w.row_width(COLS), 3 * DEFAULT_COLUMN_WIDTH);
    }

    #[test]
    fn drag_tracks_pointer_from_start_width() {
        let mut w = ColumnWidths::default();
        w.begin_drag("name", 400);
        let r = w.drag_to(430, COLS).unwrap();
        assert_eq!(r.width, 180);
        assert_eq!(r.row_width, 480);

        // Each step is relative to where the drag began, not the last step.
        let r = w.drag_to(410, COLS).unwrap();
        assert_eq!(r.width, 160);
        w.end_drag();
        assert_eq!(w.width("name"), 160);
        assert!(w.drag_to(900, COLS).is_none());
        assert_eq!(w.width("name"), 160);
    }

    #[test]
    fn width_never_drops_below_floor() {
        let mut w = ColumnWidths::default();
        w.begin_drag("id", 0);
        let r = w.drag_to(-10_000, COLS).unwrap();
        assert_eq!(r.width, MIN_COLUMN_WIDTH);
    }

    #[test]
    fn second_drag_starts_from_stored_width() {
        let mut w = ColumnWidths::default();
        w.begin_drag("id", 0);
        w.drag_to(-100, COLS);
        w.end_drag();
        w.begin_drag("id", 50);
        let r = w.drag_to(60, COLS).unwrap();
        assert_eq!(r.width, 60);
    }
}
