//! Visible-row pagination over the city roster
//!
//! The directory is fetched in growing batches, but rows already on screen
//! must never move or duplicate when a larger batch arrives. This module
//! tracks which roster indices are visible and only ever appends to them.

/// Append-only window of roster indices shown in the city list
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pagination {
    visible: Vec<usize>,
}

impl Pagination {
    /// Create an empty pagination window
    pub fn new() -> Self {
        Self {
            visible: Vec::new(),
        }
    }

    /// Extends the window up to the current batch size.
    ///
    /// Appends the roster indices `[len, min(batch_size, total))`; indices
    /// already visible are left untouched. Calling with a batch size at or
    /// below the current window length is a no-op.
    ///
    /// # Arguments
    ///
    /// * `batch_size` - Requested number of visible rows
    /// * `total` - Number of records the roster currently holds
    pub fn grow(&mut self, batch_size: usize, total: usize) {
        let target = batch_size.min(total);
        for index in self.visible.len()..target {
            self.visible.push(index);
        }
    }

    /// Drops indices past the end of a shrunken roster.
    ///
    /// The window is always the contiguous prefix `0..len`, so a roster that
    /// lost records just truncates it.
    pub fn sync(&mut self, total: usize) {
        if self.visible.len() > total {
            self.visible.truncate(total);
        }
    }

    /// Roster indices currently visible, in roster order
    pub fn visible(&self) -> &[usize] {
        &self.visible
    }

    /// Number of visible rows
    pub fn len(&self) -> usize {
        self.visible.len()
    }

    /// Whether no rows are visible yet
    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

/// Whether the viewport has reached the bottom of the visible rows.
///
/// Mirrors the scroll-position check of a scrolling list: once the last
/// visible row has entered the viewport, the next batch should be requested.
/// Callers are expected to guard against triggering while a roster fetch is
/// already outstanding.
pub fn scrolled_to_bottom(scroll_offset: usize, viewport_rows: usize, visible_len: usize) -> bool {
    scroll_offset + viewport_rows >= visible_len
}
