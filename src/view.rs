//! View state: visible columns, details pane sizing and the selected row.

use crate::error::ValidationError;
use crate::record::{Column, LogRecord};

/// Heights (in lines) the details pane can take.
pub const DETAILS_HEIGHTS: [u16; 5] = [5, 10, 15, 20, 30];

const DEFAULT_DETAILS_LEVEL: usize = 1;

/// Direction for [`DetailsPane::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeightStep {
    Grow,
    Shrink,
}

/// What a details pane transition did, for the notification line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailsChange {
    Resized(u16),
    Shown(u16),
    Hidden,
    Unchanged,
}

/// Invariant: `level < DETAILS_HEIGHTS.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetailsPane {
    level: usize,
    visible: bool,
}

impl Default for DetailsPane {
    fn default() -> Self {
        Self {
            level: DEFAULT_DETAILS_LEVEL,
            visible: true,
        }
    }
}

impl DetailsPane {
    /// Start at the level whose height is closest to `height`.
    pub fn with_height(height: u16) -> Self {
        let level = DETAILS_HEIGHTS
            .iter()
            .enumerate()
            .min_by_key(|(_, h)| h.abs_diff(height))
            .map(|(i, _)| i)
            .unwrap_or(DEFAULT_DETAILS_LEVEL);
        Self {
            level,
            visible: true,
        }
    }

    /// Grow: next level while visible, or reveal at the current level when
    /// hidden. Shrink: previous level while above the floor; at the floor
    /// the pane is hidden instead.
    pub fn step(&mut self, step: HeightStep) -> DetailsChange {
        match step {
            HeightStep::Grow => {
                if !self.visible {
                    self.visible = true;
                    DetailsChange::Shown(self.level_height())
                } else if self.level + 1 < DETAILS_HEIGHTS.len() {
                    self.level += 1;
                    DetailsChange::Resized(self.level_height())
                } else {
                    DetailsChange::Unchanged
                }
            }
            HeightStep::Shrink => {
                if !self.visible {
                    DetailsChange::Unchanged
                } else if self.level > 0 {
                    self.level -= 1;
                    DetailsChange::Resized(self.level_height())
                } else {
                    self.visible = false;
                    DetailsChange::Hidden
                }
            }
        }
    }

    pub fn toggle(&mut self) -> DetailsChange {
        self.visible = !self.visible;
        if self.visible {
            DetailsChange::Shown(self.level_height())
        } else {
            DetailsChange::Hidden
        }
    }

    /// Rendered height: zero while hidden.
    pub fn height(&self) -> u16 {
        if self.visible {
            self.level_height()
        } else {
            0
        }
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    fn level_height(&self) -> u16 {
        DETAILS_HEIGHTS[self.level]
    }
}

/// Column layout, details pane and selection for the log table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    columns: Vec<Column>,
    pub details: DetailsPane,
    selected: Option<usize>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            columns: Column::DEFAULT_VISIBLE.to_vec(),
            details: DetailsPane::default(),
            selected: None,
        }
    }
}

impl ViewState {
    /// Build with an initial column list; an empty list falls back to the
    /// defaults so the never-empty invariant holds from the start.
    pub fn with_columns(columns: Vec<Column>) -> Self {
        let mut view = Self::default();
        if !columns.is_empty() {
            view.columns = columns;
        }
        view
    }

    /// Replace the visible columns. Rejects an empty list and keeps the
    /// previous columns in that case.
    pub fn set_visible_columns(&mut self, columns: Vec<Column>) -> Result<(), ValidationError> {
        if columns.is_empty() {
            return Err(ValidationError::EmptyColumnSelection);
        }
        self.columns = columns;
        Ok(())
    }

    pub fn visible_columns(&self) -> &[Column] {
        &self.columns
    }

    /// Select `row` when it exists in the current set; otherwise no-op.
    pub fn select_record(&mut self, row: usize, current_len: usize) -> bool {
        if row < current_len {
            self.selected = Some(row);
            true
        } else {
            false
        }
    }

    /// Re-anchor after the current set was replaced: first row, or nothing.
    pub fn reset_selection(&mut self, current_len: usize) {
        self.selected = if current_len > 0 { Some(0) } else { None };
    }

    /// Move the selection by `delta` rows, clamped to the set.
    pub fn move_selection(&mut self, delta: isize, current_len: usize) {
        if current_len == 0 {
            self.selected = None;
            return;
        }
        let from = self.selected.unwrap_or(0) as isize;
        let to = (from + delta).clamp(0, current_len as isize - 1);
        self.selected = Some(to as usize);
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record<'a>(&self, records: &'a [LogRecord]) -> Option<&'a LogRecord> {
        self.selected.and_then(|row| records.get(row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::scenario_records;

    #[test]
    fn test_empty_column_selection_rejected() {
        let mut view = ViewState::default();
        let before = view.visible_columns().to_vec();
        assert_eq!(
            view.set_visible_columns(vec![]),
            Err(ValidationError::EmptyColumnSelection)
        );
        assert_eq!(view.visible_columns(), before.as_slice());
    }

    #[test]
    fn test_set_columns_keeps_order() {
        let mut view = ViewState::default();
        view.set_visible_columns(vec![Column::Host, Column::Timestamp])
            .unwrap();
        assert_eq!(view.visible_columns(), &[Column::Host, Column::Timestamp]);
    }

    #[test]
    fn test_shrink_at_floor_hides_then_grow_reveals_same_level() {
        let mut pane = DetailsPane::default();
        assert_eq!(pane.step(HeightStep::Shrink), DetailsChange::Resized(5));
        assert_eq!(pane.level(), 0);

        assert_eq!(pane.step(HeightStep::Shrink), DetailsChange::Hidden);
        assert!(!pane.is_visible());
        assert_eq!(pane.height(), 0);
        assert_eq!(pane.level(), 0);

        assert_eq!(pane.step(HeightStep::Grow), DetailsChange::Shown(5));
        assert_eq!(pane.level(), 0);
    }

    #[test]
    fn test_grow_from_hidden_keeps_previous_level() {
        let mut pane = DetailsPane::default();
        pane.step(HeightStep::Grow);
        pane.step(HeightStep::Grow);
        assert_eq!(pane.height(), 20);
        pane.toggle();
        assert_eq!(pane.height(), 0);
        assert_eq!(pane.step(HeightStep::Grow), DetailsChange::Shown(20));
    }

    #[test]
    fn test_grow_at_top_is_noop() {
        let mut pane = DetailsPane::with_height(30);
        assert_eq!(pane.level(), 4);
        assert_eq!(pane.step(HeightStep::Grow), DetailsChange::Unchanged);
        assert_eq!(pane.height(), 30);
    }

    #[test]
    fn test_shrink_while_hidden_is_noop() {
        let mut pane = DetailsPane::default();
        pane.toggle();
        assert_eq!(pane.step(HeightStep::Shrink), DetailsChange::Unchanged);
        assert!(!pane.is_visible());
    }

    #[test]
    fn test_toggle_flips_visibility() {
        let mut pane = DetailsPane::default();
        assert_eq!(pane.toggle(), DetailsChange::Hidden);
        assert_eq!(pane.toggle(), DetailsChange::Shown(10));
    }

    #[test]
    fn test_select_record_out_of_bounds_is_noop() {
        let records = scenario_records();
        let mut view = ViewState::default();
        assert!(view.select_record(1, records.len()));
        assert!(!view.select_record(3, records.len()));
        assert_eq!(view.selected(), Some(1));
        assert_eq!(view.selected_record(&records).unwrap().message, "login ok");
    }

    #[test]
    fn test_selected_record_tolerates_shrunk_set() {
        let records = scenario_records();
        let mut view = ViewState::default();
        view.select_record(2, records.len());
        assert!(view.selected_record(&records[..1]).is_none());
    }

    #[test]
    fn test_move_selection_clamps() {
        let mut view = ViewState::default();
        view.reset_selection(3);
        view.move_selection(10, 3);
        assert_eq!(view.selected(), Some(2));
        view.move_selection(-10, 3);
        assert_eq!(view.selected(), Some(0));
        view.move_selection(1, 0);
        assert_eq!(view.selected(), None);
    }

    #[test]
    fn test_with_height_picks_nearest_level() {
        assert_eq!(DetailsPane::with_height(14).level(), 2);
        assert_eq!(DetailsPane::with_height(0).level(), 0);
    }
}
