use std::sync::Arc;

use crate::catalog::ItemDefinition;
use crate::error::EditorError;
use crate::Point;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ItemField {
    Size,
    Length,
    Rotation,
}

/// A catalog item dropped onto the photo, positioned in image space.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedItem {
    definition: Arc<ItemDefinition>,
    pub position: Point,
    size: u32,
    length: u32,
    /// Degrees, unnormalized.
    pub rotation: i32,
}

impl PlacedItem {
    pub fn new(definition: Arc<ItemDefinition>, position: Point, size: u32, length: u32) -> Self {
        let size = size.max(1);
        let length = if definition.scalable_length {
            length.max(1)
        } else {
            size
        };
        Self {
            definition,
            position,
            size,
            length,
            rotation: 0,
        }
    }

    pub fn definition(&self) -> &Arc<ItemDefinition> {
        &self.definition
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Independent length for scalable items, otherwise the size.
    pub fn length(&self) -> u32 {
        if self.definition.scalable_length {
            self.length
        } else {
            self.size
        }
    }

    pub fn set_size(&mut self, size: u32) {
        self.size = size.max(1);
        if !self.definition.scalable_length {
            self.length = self.size;
        }
    }

    /// Ignored for items whose length follows their size.
    pub fn set_length(&mut self, length: u32) -> bool {
        if !self.definition.scalable_length {
            return false;
        }
        self.length = length.max(1);
        true
    }

    pub fn rotation_radians(&self) -> f64 {
        (self.rotation as f64).to_radians()
    }

    /// Rotation folded into `0..360` for display.
    pub fn display_rotation(&self) -> i32 {
        self.rotation.rem_euclid(360)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Scene {
    items: Vec<PlacedItem>,
    selected: Option<usize>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[PlacedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected(&self) -> Option<&PlacedItem> {
        self.selected.and_then(|index| self.items.get(index))
    }

    fn selected_mut(&mut self) -> Option<&mut PlacedItem> {
        self.selected.and_then(|index| self.items.get_mut(index))
    }

    fn check_index(&self, index: usize) -> Result<(), EditorError> {
        if index < self.items.len() {
            Ok(())
        } else {
            tracing::warn!(index, len = self.items.len(), "scene index out of range");
            Err(EditorError::InvalidIndex {
                index,
                len: self.items.len(),
            })
        }
    }

    /// Appends an item on top of the stack and selects it.
    pub fn place(
        &mut self,
        definition: Arc<ItemDefinition>,
        position: Point,
        size: u32,
        length: u32,
    ) -> usize {
        self.items
            .push(PlacedItem::new(definition, position, size, length));
        let index = self.items.len() - 1;
        self.selected = Some(index);
        index
    }

    pub fn select(&mut self, index: usize) -> Result<(), EditorError> {
        self.check_index(index)?;
        self.selected = Some(index);
        Ok(())
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Writes one attribute of the selected item. Returns false when nothing
    /// is selected or the write does not apply (length on a fixed item).
    pub fn update_selected(&mut self, field: ItemField, value: i32) -> bool {
        let Some(item) = self.selected_mut() else {
            return false;
        };
        match field {
            ItemField::Size => {
                item.set_size(value.max(1) as u32);
                true
            }
            ItemField::Length => item.set_length(value.max(1) as u32),
            ItemField::Rotation => {
                item.rotation = value;
                true
            }
        }
    }

    pub fn move_selected(&mut self, delta: Point) -> bool {
        if !delta.is_finite() {
            return false;
        }
        let Some(item) = self.selected_mut() else {
            return false;
        };
        item.position = item.position + delta;
        true
    }

    pub fn delete_selected(&mut self) -> Option<PlacedItem> {
        let index = self.selected.take()?;
        Some(self.items.remove(index))
    }

    /// Removes an arbitrary item. The selection is dropped when it pointed at
    /// the removed item and shifted down when it sat above it.
    pub fn remove(&mut self, index: usize) -> Result<PlacedItem, EditorError> {
        self.check_index(index)?;
        self.selected = match self.selected {
            Some(selected) if selected == index => None,
            Some(selected) if selected > index => Some(selected - 1),
            other => other,
        };
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Shape;

    fn fixed() -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::raster("earring_01", "Earring 1", "img/earring_01.png"))
    }

    fn scalable() -> Arc<ItemDefinition> {
        Arc::new(ItemDefinition::procedural("barbell", "Barbell", Shape::Barbell, true))
    }

    #[test]
    fn place_selects_new_item_with_zero_rotation() {
        let mut scene = Scene::new();
        let index = scene.place(fixed(), Point::new(4.0, 5.0), 40, 90);
        assert_eq!(index, 0);
        assert_eq!(scene.selected_index(), Some(0));
        let item = scene.selected().unwrap();
        assert_eq!(item.rotation, 0);
        assert_eq!(item.length(), 40);
    }

    #[test]
    fn fixed_length_follows_size() {
        let mut scene = Scene::new();
        scene.place(fixed(), Point::ORIGIN, 40, 40);
        assert!(scene.update_selected(ItemField::Size, 60));
        assert_eq!(scene.selected().unwrap().length(), 60);
        assert!(!scene.update_selected(ItemField::Length, 90));
        assert_eq!(scene.selected().unwrap().length(), 60);
    }

    #[test]
    fn scalable_length_is_independent() {
        let mut scene = Scene::new();
        scene.place(scalable(), Point::ORIGIN, 20, 80);
        assert!(scene.update_selected(ItemField::Size, 30));
        let item = scene.selected().unwrap();
        assert_eq!((item.size(), item.length()), (30, 80));
        assert!(scene.update_selected(ItemField::Length, 120));
        assert_eq!(scene.selected().unwrap().length(), 120);
    }

    #[test]
    fn sizes_stay_positive() {
        let mut scene = Scene::new();
        scene.place(scalable(), Point::ORIGIN, 0, 0);
        let item = scene.selected().unwrap();
        assert_eq!((item.size(), item.length()), (1, 1));
        scene.update_selected(ItemField::Size, -20);
        assert_eq!(scene.selected().unwrap().size(), 1);
    }

    #[test]
    fn rotation_is_stored_raw_and_wrapped_for_display() {
        let mut scene = Scene::new();
        scene.place(fixed(), Point::ORIGIN, 10, 10);
        scene.update_selected(ItemField::Rotation, -90);
        let item = scene.selected().unwrap();
        assert_eq!(item.rotation, -90);
        assert_eq!(item.display_rotation(), 270);
    }

    #[test]
    fn updates_without_selection_are_no_ops() {
        let mut scene = Scene::new();
        scene.place(fixed(), Point::ORIGIN, 10, 10);
        scene.deselect();
        assert!(!scene.update_selected(ItemField::Size, 99));
        assert!(!scene.move_selected(Point::new(1.0, 1.0)));
        assert_eq!(scene.items()[0].size(), 10);
        assert_eq!(scene.items()[0].position, Point::ORIGIN);
    }

    #[test]
    fn select_out_of_range_fails_and_keeps_selection() {
        let mut scene = Scene::new();
        scene.place(fixed(), Point::ORIGIN, 10, 10);
        assert_eq!(
            scene.select(3),
            Err(EditorError::InvalidIndex { index: 3, len: 1 })
        );
        assert_eq!(scene.selected_index(), Some(0));
    }

    #[test]
    fn move_selected_adds_delta() {
        let mut scene = Scene::new();
        scene.place(fixed(), Point::new(1.0, 2.0), 10, 10);
        assert!(scene.move_selected(Point::new(3.0, -1.0)));
        assert_eq!(scene.selected().unwrap().position, Point::new(4.0, 1.0));
        assert!(!scene.move_selected(Point::new(f64::NAN, 0.0)));
    }

    #[test]
    fn delete_without_selection_is_a_no_op() {
        let mut scene = Scene::new();
        scene.place(fixed(), Point::ORIGIN, 10, 10);
        scene.deselect();
        assert!(scene.delete_selected().is_none());
        assert_eq!(scene.len(), 1);
    }

    #[test]
    fn remove_shifts_selection_down() {
        let mut scene = Scene::new();
        scene.place(fixed(), Point::ORIGIN, 10, 10);
        scene.place(fixed(), Point::ORIGIN, 10, 10);
        scene.place(fixed(), Point::ORIGIN, 10, 10);
        scene.select(2).unwrap();
        scene.remove(0).unwrap();
        assert_eq!(scene.selected_index(), Some(1));
        scene.remove(1).unwrap();
        assert_eq!(scene.selected_index(), None);
        assert!(matches!(
            scene.remove(5),
            Err(EditorError::InvalidIndex { index: 5, len: 1 })
        ));
    }

    #[test]
    fn clear_empties_and_deselects() {
        let mut scene = Scene::new();
        scene.place(fixed(), Point::ORIGIN, 10, 10);
        scene.clear();
        assert!(scene.is_empty());
        assert_eq!(scene.selected_index(), None);
    }
}
