//! Index selection over a line list.

use crate::error::{UiError, UiResult};

/// Selectable capability.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Select `index` out of `len` items. Stale indices are rejected without mutation.
    pub fn select_index(&mut self, index: usize, len: usize) -> UiResult<()> {
        if index >= len {
            return Err(UiError::IndexOutOfRange { index, len });
        }
        self.selected = Some(index);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.selected = None;
    }

    /// Adjust after the item at `index` was removed. Returns true if the selection changed.
    pub fn item_removed(&mut self, index: usize) -> bool {
        match self.selected {
            Some(selected) if index < selected => {
                self.selected = Some(selected - 1);
                true
            }
            Some(selected) if index == selected => {
                self.selected = None;
                true
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_rejects_out_of_range() {
        let mut selection = Selection::new();
        selection.select_index(1, 3).unwrap();
        assert!(selection.select_index(3, 3).is_err());
        assert_eq!(selection.selected_index(), Some(1));
    }

    #[test]
    fn test_removal_adjusts_selection() {
        let mut selection = Selection::new();
        selection.select_index(2, 5).unwrap();

        assert!(!selection.item_removed(4));
        assert_eq!(selection.selected_index(), Some(2));

        assert!(selection.item_removed(0));
        assert_eq!(selection.selected_index(), Some(1));

        assert!(selection.item_removed(1));
        assert_eq!(selection.selected_index(), None);
    }
}
