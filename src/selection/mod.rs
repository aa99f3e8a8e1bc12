//! Hover/lock selection state over alignment columns.
//!
//! The [`SelectionCoordinator`] is the single source of truth for which
//! column and residue window is currently of interest. Hover previews
//! follow the pointer; a lock pins the window until explicitly released.

use crate::error::MsalinkError;

/// Default half-width of the highlight window around the focus column.
pub const DEFAULT_WINDOW_RADIUS: u32 = 2;

/// Focus value meaning "no focus column".
pub const NO_FOCUS: i64 = -1;

/// Bound value of the sentinel range.
const SENTINEL_BOUND: i64 = -1000;

/// Selection mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionMode {
    /// Nothing hovered or locked.
    #[default]
    Idle,
    /// Transient preview following the pointer.
    Hover,
    /// Pinned window; hover updates are ignored until unlocked.
    Locked,
}

/// Inclusive column range. Any range with a negative bound is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResidueRange {
    /// First column (inclusive).
    pub start: i64,
    /// Last column (inclusive).
    pub end: i64,
}

impl ResidueRange {
    /// The "no active range" value.
    pub const SENTINEL: Self = Self {
        start: SENTINEL_BOUND,
        end: SENTINEL_BOUND,
    };

    /// Construct a range from inclusive bounds.
    #[must_use]
    pub const fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Whether the range must be treated as empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start < 0 || self.end < 0 || self.start > self.end
    }

    /// Whether `column` lies inside a non-empty range.
    #[must_use]
    pub fn contains(&self, column: i64) -> bool {
        !self.is_empty() && column >= self.start && column <= self.end
    }

    /// Number of columns covered (0 when empty).
    #[must_use]
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    /// Convert column bounds to 1-based residue numbers, as used by the
    /// structure viewer's residue-number selectors.
    #[must_use]
    pub fn to_residue_numbers(&self) -> Option<(i64, i64)> {
        (!self.is_empty()).then_some((self.start + 1, self.end + 1))
    }
}

/// Snapshot of the coordinator state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionState {
    /// Current mode.
    pub mode: SelectionMode,
    /// Focused column, or [`NO_FOCUS`].
    pub focus_column: i64,
    /// Half-width of the window around the focus column.
    pub window_radius: u32,
    /// Highlighted columns, or [`ResidueRange::SENTINEL`].
    pub range: ResidueRange,
}

impl SelectionState {
    fn idle(window_radius: u32) -> Self {
        Self {
            mode: SelectionMode::Idle,
            focus_column: NO_FOCUS,
            window_radius,
            range: ResidueRange::SENTINEL,
        }
    }

    /// The active range, `None` for the sentinel.
    #[must_use]
    pub fn active_range(&self) -> Option<ResidueRange> {
        (!self.range.is_empty()).then_some(self.range)
    }
}

/// Notification emitted by a state-changing operation.
///
/// `Hovered` and `Locked` are distinct so consumers can switch between a
/// transient preview and a full highlight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionEvent {
    /// A hover preview moved.
    Hovered {
        /// Focus column.
        column: i64,
        /// New window.
        range: ResidueRange,
    },
    /// A window was pinned.
    Locked {
        /// Focus column.
        column: i64,
        /// Pinned window.
        range: ResidueRange,
    },
    /// The lock was released.
    Unlocked,
    /// The hover preview was cleared.
    Dehovered,
}

/// Reconciles hover previews with click-driven locks.
#[derive(Debug, Clone)]
pub struct SelectionCoordinator {
    state: SelectionState,
    sequence_length: usize,
}

impl SelectionCoordinator {
    /// Coordinator for an alignment of `sequence_length` columns. The window
    /// radius is fixed for the lifetime of the coordinator.
    #[must_use]
    pub fn new(window_radius: u32, sequence_length: usize) -> Self {
        Self {
            state: SelectionState::idle(window_radius),
            sequence_length,
        }
    }

    /// Current state snapshot.
    #[must_use]
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> SelectionMode {
        self.state.mode
    }

    /// Current range (may be the sentinel).
    #[must_use]
    pub fn range(&self) -> ResidueRange {
        self.state.range
    }

    /// Window radius fixed at construction.
    #[must_use]
    pub fn window_radius(&self) -> u32 {
        self.state.window_radius
    }

    /// Number of alignment columns.
    #[must_use]
    pub fn sequence_length(&self) -> usize {
        self.sequence_length
    }

    /// Resize for a newly loaded alignment. Clears any hover or lock.
    pub fn set_sequence_length(&mut self, sequence_length: usize) {
        self.sequence_length = sequence_length;
        self.state = SelectionState::idle(self.state.window_radius);
    }

    /// Whether `column` is the focus column.
    #[must_use]
    pub fn is_focus(&self, column: i64) -> bool {
        self.state.focus_column >= 0 && self.state.focus_column == column
    }

    /// Whether `column` lies in the highlighted window.
    #[must_use]
    pub fn in_range(&self, column: i64) -> bool {
        self.state.range.contains(column)
    }

    fn check_column(&self, column: i64) -> Result<(), MsalinkError> {
        if column < 0 || column as usize >= self.sequence_length {
            return Err(MsalinkError::OutOfRange {
                column,
                len: self.sequence_length,
            });
        }
        Ok(())
    }

    fn window(&self, column: i64) -> ResidueRange {
        let radius = i64::from(self.state.window_radius);
        let last = self.sequence_length as i64 - 1;
        ResidueRange::new((column - radius).max(0), (column + radius).min(last))
    }

    /// Preview the window around `column`. Returns `None` (and changes
    /// nothing) while locked.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::OutOfRange`] when `column` is outside `[0, len)`;
    /// the state is left unchanged.
    pub fn hover(
        &mut self,
        column: i64,
    ) -> Result<Option<SelectionEvent>, MsalinkError> {
        self.check_column(column)?;
        if self.state.mode == SelectionMode::Locked {
            return Ok(None);
        }
        let range = self.window(column);
        self.state.focus_column = column;
        self.state.range = range;
        self.state.mode = SelectionMode::Hover;
        Ok(Some(SelectionEvent::Hovered { column, range }))
    }

    /// Pin the window around `column`. Allowed in any mode, including
    /// re-locking while already locked.
    ///
    /// # Errors
    ///
    /// [`MsalinkError::OutOfRange`] when `column` is outside `[0, len)`;
    /// the state is left unchanged.
    pub fn lock(&mut self, column: i64) -> Result<SelectionEvent, MsalinkError> {
        self.check_column(column)?;
        let range = self.window(column);
        self.state.focus_column = column;
        self.state.range = range;
        self.state.mode = SelectionMode::Locked;
        log::debug!("selection locked at column {column}: {range:?}");
        Ok(SelectionEvent::Locked { column, range })
    }

    /// Release a lock. Returns `None` when not locked.
    pub fn unlock(&mut self) -> Option<SelectionEvent> {
        if self.state.mode != SelectionMode::Locked {
            return None;
        }
        self.state = SelectionState::idle(self.state.window_radius);
        log::debug!("selection unlocked");
        Some(SelectionEvent::Unlocked)
    }

    /// Clear the hover preview. Returns `None` while locked.
    pub fn dehover(&mut self) -> Option<SelectionEvent> {
        if self.state.mode == SelectionMode::Locked {
            return None;
        }
        self.state = SelectionState::idle(self.state.window_radius);
        Some(SelectionEvent::Dehovered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_centers_window_on_column() {
        let mut sel = SelectionCoordinator::new(2, 10);
        let event = sel.hover(5).unwrap();
        assert_eq!(sel.range(), ResidueRange::new(3, 7));
        assert_eq!(sel.mode(), SelectionMode::Hover);
        assert_eq!(
            event,
            Some(SelectionEvent::Hovered {
                column: 5,
                range: ResidueRange::new(3, 7)
            })
        );
    }

    #[test]
    fn hover_clamps_at_both_ends() {
        let mut sel = SelectionCoordinator::new(3, 10);
        let _ = sel.hover(1).unwrap();
        assert_eq!(sel.range(), ResidueRange::new(0, 4));
        let _ = sel.hover(9).unwrap();
        assert_eq!(sel.range(), ResidueRange::new(6, 9));
    }

    #[test]
    fn hover_range_formula_holds_for_every_column() {
        for radius in 0..4u32 {
            let len = 7usize;
            let mut sel = SelectionCoordinator::new(radius, len);
            for c in 0..len as i64 {
                let _ = sel.hover(c).unwrap();
                let r = sel.range();
                assert_eq!(r.start, (c - i64::from(radius)).max(0));
                assert_eq!(r.end, (c + i64::from(radius)).min(len as i64 - 1));
                assert!(r.start <= r.end);
            }
        }
    }

    #[test]
    fn hover_is_ignored_while_locked() {
        let mut sel = SelectionCoordinator::new(2, 10);
        let _ = sel.lock(4).unwrap();
        let before = sel.state();
        assert_eq!(sel.hover(8).unwrap(), None);
        assert_eq!(sel.state(), before);
        assert_eq!(sel.range(), ResidueRange::new(2, 6));
        assert!(sel.is_focus(4));
    }

    #[test]
    fn lock_is_reentrant() {
        let mut sel = SelectionCoordinator::new(1, 10);
        let _ = sel.lock(2).unwrap();
        let event = sel.lock(7).unwrap();
        assert_eq!(
            event,
            SelectionEvent::Locked {
                column: 7,
                range: ResidueRange::new(6, 8)
            }
        );
        assert_eq!(sel.mode(), SelectionMode::Locked);
    }

    #[test]
    fn unlock_resets_to_sentinel() {
        let mut sel = SelectionCoordinator::new(2, 10);
        let _ = sel.lock(4).unwrap();
        assert_eq!(sel.unlock(), Some(SelectionEvent::Unlocked));
        assert_eq!(sel.mode(), SelectionMode::Idle);
        assert_eq!(sel.range(), ResidueRange::SENTINEL);
        assert_eq!(sel.state().focus_column, NO_FOCUS);
        assert!(sel.state().active_range().is_none());
    }

    #[test]
    fn unlock_without_lock_is_noop() {
        let mut sel = SelectionCoordinator::new(2, 10);
        let _ = sel.hover(3).unwrap();
        assert_eq!(sel.unlock(), None);
        assert_eq!(sel.mode(), SelectionMode::Hover);
    }

    #[test]
    fn dehover_clears_preview_but_not_lock() {
        let mut sel = SelectionCoordinator::new(2, 10);
        let _ = sel.hover(3).unwrap();
        assert_eq!(sel.dehover(), Some(SelectionEvent::Dehovered));
        assert_eq!(sel.mode(), SelectionMode::Idle);
        assert!(!sel.in_range(3));

        let _ = sel.lock(3).unwrap();
        assert_eq!(sel.dehover(), None);
        assert!(sel.in_range(3));
    }

    #[test]
    fn out_of_range_leaves_state_unchanged() {
        let mut sel = SelectionCoordinator::new(2, 10);
        let _ = sel.hover(5).unwrap();
        let before = sel.state();
        for column in [-1, 10, 42] {
            assert!(matches!(
                sel.hover(column),
                Err(MsalinkError::OutOfRange { len: 10, .. })
            ));
            assert!(sel.lock(column).is_err());
        }
        assert_eq!(sel.state(), before);
    }

    #[test]
    fn out_of_range_while_locked_is_rejected() {
        let mut sel = SelectionCoordinator::new(2, 10);
        let _ = sel.lock(4).unwrap();
        let before = sel.state();

        for column in [-1, 10] {
            assert!(matches!(
                sel.hover(column),
                Err(MsalinkError::OutOfRange { column: c, len: 10 }) if c == column
            ));
        }
        assert!(matches!(
            sel.lock(10),
            Err(MsalinkError::OutOfRange { column: 10, len: 10 })
        ));

        assert_eq!(sel.state(), before);
        assert_eq!(sel.mode(), SelectionMode::Locked);
        assert!(sel.is_focus(4));
        assert_eq!(sel.range(), ResidueRange::new(2, 6));
    }

    #[test]
    fn sentinel_range_contains_nothing() {
        let r = ResidueRange::SENTINEL;
        assert!(r.is_empty());
        assert!(!r.contains(-1000));
        assert_eq!(r.len(), 0);
        assert_eq!(r.to_residue_numbers(), None);
        assert_eq!(ResidueRange::new(3, 7).to_residue_numbers(), Some((4, 8)));
    }

    #[test]
    fn resizing_clears_lock() {
        let mut sel = SelectionCoordinator::new(2, 10);
        let _ = sel.lock(4).unwrap();
        sel.set_sequence_length(20);
        assert_eq!(sel.mode(), SelectionMode::Idle);
        assert!(sel.hover(15).is_ok());
    }
}
