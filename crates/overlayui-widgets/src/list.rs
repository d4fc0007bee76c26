//! Observable item list mirrored into a list view element.

use std::fmt::Display;

use overlayui_core::{Canvas, NodeId, UiError, UiResult};

/// A change recorded by [`ListModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelChange {
    Added(usize),
    Removed(usize),
    Replaced(usize),
    Reset,
}

/// Ordered items plus the changes made since the last sync.
#[derive(Debug, Clone)]
pub struct ListModel<T> {
    items: Vec<T>,
    changes: Vec<ModelChange>,
}

impl<T> Default for ListModel<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            changes: Vec::new(),
        }
    }
}

impl<T> ListModel<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.changes.push(ModelChange::Added(self.items.len() - 1));
    }

    pub fn remove(&mut self, index: usize) -> UiResult<T> {
        if index >= self.items.len() {
            return Err(UiError::IndexOutOfRange {
                index,
                len: self.items.len(),
            });
        }
        self.changes.push(ModelChange::Removed(index));
        Ok(self.items.remove(index))
    }

    /// Swap in a new item, returning the old one.
    pub fn replace(&mut self, index: usize, item: T) -> UiResult<T> {
        let len = self.items.len();
        let slot = self
            .items
            .get_mut(index)
            .ok_or(UiError::IndexOutOfRange { index, len })?;
        self.changes.push(ModelChange::Replaced(index));
        Ok(std::mem::replace(slot, item))
    }

    pub fn clear(&mut self) {
        self.items.clear();
        // Earlier changes are moot once everything is gone.
        self.changes.clear();
        self.changes.push(ModelChange::Reset);
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    pub fn take_changes(&mut self) -> Vec<ModelChange> {
        std::mem::take(&mut self.changes)
    }
}

/// Keeps a list view's lines in step with a [`ListModel`].
///
/// Items are shown through their `Display` impl. The view is expected to
/// start empty and be changed only through the binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListBinding {
    view: NodeId,
}

impl ListBinding {
    pub fn new(view: NodeId) -> Self {
        Self { view }
    }

    pub fn view(&self) -> NodeId {
        self.view
    }

    /// Replay pending model changes onto the view. Returns how many were applied.
    pub fn sync<T: Display>(&self, canvas: &mut Canvas, model: &mut ListModel<T>) -> UiResult<usize> {
        let changes = model.take_changes();
        for (at, change) in changes.iter().enumerate() {
            match *change {
                ModelChange::Added(index) => {
                    let text = final_text(model, &changes[at + 1..], index);
                    canvas.push_line(self.view, text)?;
                }
                ModelChange::Removed(index) => canvas.remove_line(self.view, index)?,
                ModelChange::Replaced(index) => {
                    let text = final_text(model, &changes[at + 1..], index);
                    canvas.set_line(self.view, index, text)?;
                }
                ModelChange::Reset => {
                    canvas.clear_lines(self.view)?;
                }
            }
        }
        if !changes.is_empty() {
            log::trace!("synced {} list changes into {:?}", changes.len(), self.view);
        }
        Ok(changes.len())
    }

    /// The model item matching the view's selection.
    pub fn selected_item<'m, T>(&self, canvas: &Canvas, model: &'m ListModel<T>) -> Option<&'m T> {
        let index = canvas
            .element(self.view)?
            .selection
            .as_ref()?
            .selected_index()?;
        model.get(index)
    }
}

/// Text of the item that ends up at `index` once `later` changes are applied.
///
/// Items removed later yield an empty line, which the replayed removal drops.
fn final_text<T: Display>(model: &ListModel<T>, later: &[ModelChange], index: usize) -> String {
    let mut position = index;
    for change in later {
        match *change {
            ModelChange::Removed(removed) if removed == position => return String::new(),
            ModelChange::Removed(removed) if removed < position => position -= 1,
            ModelChange::Reset => return String::new(),
            _ => {}
        }
    }
    model.get(position).map(ToString::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kurbo::{Point, Size};
    use overlayui_core::{CanvasConfig, ControlEventKind, Element, Node, Widget};

    fn setup() -> (Canvas, ListBinding) {
        let mut canvas = Canvas::new(CanvasConfig::default());
        let widget = canvas
            .add_widget(Node::widget(Point::ZERO, Size::new(400.0, 400.0), Widget::new()))
            .unwrap();
        let view = canvas
            .add_child(
                widget,
                Node::element(Point::ZERO, Size::new(200.0, 100.0), Element::list_view("items")),
            )
            .unwrap();
        (canvas, ListBinding::new(view))
    }

    fn lines(canvas: &Canvas, binding: &ListBinding) -> Vec<String> {
        canvas
            .element(binding.view())
            .and_then(|e| e.scroll.as_ref())
            .map(|s| s.lines().to_vec())
            .unwrap_or_default()
    }

    #[test]
    fn test_model_records_changes() {
        let mut model = ListModel::new();
        model.push("a");
        model.push("b");
        model.replace(0, "c").unwrap();
        model.remove(1).unwrap();
        assert!(model.remove(5).is_err());
        assert_eq!(
            model.take_changes(),
            vec![ModelChange::Added(0), ModelChange::Added(1), ModelChange::Replaced(0), ModelChange::Removed(1)]
        );
        assert!(!model.has_changes());

        model.push("d");
        model.clear();
        assert_eq!(model.take_changes(), vec![ModelChange::Reset]);
        assert!(model.is_empty());
    }

    #[test]
    fn test_sync_mirrors_items() {
        let (mut canvas, binding) = setup();
        let mut model = ListModel::new();
        for n in [10, 20, 30] {
            model.push(n);
        }
        assert_eq!(binding.sync(&mut canvas, &mut model).unwrap(), 3);
        assert_eq!(lines(&canvas, &binding), vec!["10", "20", "30"]);

        model.replace(1, 25).unwrap();
        model.remove(0).unwrap();
        binding.sync(&mut canvas, &mut model).unwrap();
        assert_eq!(lines(&canvas, &binding), vec!["25", "30"]);
        assert_eq!(binding.sync(&mut canvas, &mut model).unwrap(), 0);
    }

    #[test]
    fn test_sync_resolves_shifted_indices() {
        let (mut canvas, binding) = setup();
        let mut model = ListModel::new();
        model.push("a");
        model.push("b");
        model.push("c");
        model.remove(0).unwrap();
        model.replace(0, "B").unwrap();
        binding.sync(&mut canvas, &mut model).unwrap();
        assert_eq!(lines(&canvas, &binding), vec!["B", "c"]);
    }

    #[test]
    fn test_clear_resets_view_and_selection() {
        let (mut canvas, binding) = setup();
        let mut model = ListModel::new();
        model.push("a");
        model.push("b");
        binding.sync(&mut canvas, &mut model).unwrap();
        canvas.select_index(binding.view(), 1).unwrap();
        canvas.take_events();

        model.clear();
        model.push("z");
        binding.sync(&mut canvas, &mut model).unwrap();
        assert_eq!(lines(&canvas, &binding), vec!["z"]);
        assert!(binding.selected_item(&canvas, &model).is_none());
        let kinds: Vec<_> = canvas.take_events().into_iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&ControlEventKind::Selected(None)));
    }

    #[test]
    fn test_selected_item_follows_removal() {
        let (mut canvas, binding) = setup();
        let mut model = ListModel::new();
        for name in ["red", "green", "blue"] {
            model.push(name.to_string());
        }
        binding.sync(&mut canvas, &mut model).unwrap();
        canvas.select_index(binding.view(), 2).unwrap();
        assert_eq!(binding.selected_item(&canvas, &model).map(String::as_str), Some("blue"));

        model.remove(0).unwrap();
        binding.sync(&mut canvas, &mut model).unwrap();
        assert_eq!(binding.selected_item(&canvas, &model).map(String::as_str), Some("blue"));
    }
}
