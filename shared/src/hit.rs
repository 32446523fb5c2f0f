use crate::config::HitTest;
use crate::scene::PlacedItem;
use crate::Point;

fn hit_circle(point: Point, item: &PlacedItem) -> bool {
    let diameter = item.size().max(item.length()) as f64;
    point.distance_to(item.position) < diameter / 2.0
}

fn hit_oriented_box(point: Point, item: &PlacedItem) -> bool {
    let angle = item.rotation_radians();
    let (sin, cos) = angle.sin_cos();
    let dx = point.x - item.position.x;
    let dy = point.y - item.position.y;
    let local_x = dx * cos + dy * sin;
    let local_y = -dx * sin + dy * cos;
    local_x.abs() <= item.length() as f64 / 2.0 && local_y.abs() <= item.size() as f64 / 2.0
}

/// Index of the topmost item whose bounding circle contains `point`.
pub fn find_topmost_at(point: Point, items: &[PlacedItem]) -> Option<usize> {
    find_topmost_with(point, items, HitTest::BoundingCircle)
}

pub fn find_topmost_with(point: Point, items: &[PlacedItem], policy: HitTest) -> Option<usize> {
    if !point.is_finite() {
        return None;
    }
    items.iter().rposition(|item| match policy {
        HitTest::BoundingCircle => hit_circle(point, item),
        HitTest::OrientedBox => hit_oriented_box(point, item),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::catalog::{ItemDefinition, Shape};

    fn bar(position: Point, size: u32, length: u32, rotation: i32) -> PlacedItem {
        let definition = Arc::new(ItemDefinition::procedural(
            "barbell",
            "Barbell",
            Shape::Barbell,
            true,
        ));
        let mut item = PlacedItem::new(definition, position, size, length);
        item.rotation = rotation;
        item
    }

    #[test]
    fn circle_uses_larger_dimension_and_is_strict() {
        let items = vec![bar(Point::ORIGIN, 10, 40, 0)];
        assert_eq!(find_topmost_at(Point::new(0.0, 19.9), &items), Some(0));
        assert_eq!(find_topmost_at(Point::new(0.0, 20.0), &items), None);
    }

    #[test]
    fn topmost_wins_on_overlap() {
        let items = vec![
            bar(Point::ORIGIN, 40, 40, 0),
            bar(Point::new(5.0, 0.0), 40, 40, 0),
        ];
        assert_eq!(find_topmost_at(Point::new(2.0, 0.0), &items), Some(1));
        assert_eq!(find_topmost_at(Point::new(-18.0, 0.0), &items), Some(0));
    }

    #[test]
    fn empty_scene_and_nan_never_hit() {
        assert_eq!(find_topmost_at(Point::ORIGIN, &[]), None);
        let items = vec![bar(Point::ORIGIN, 40, 40, 0)];
        assert_eq!(find_topmost_at(Point::new(f64::NAN, 0.0), &items), None);
    }

    #[test]
    fn oriented_box_follows_rotation() {
        let flat = vec![bar(Point::ORIGIN, 10, 60, 0)];
        let upright = vec![bar(Point::ORIGIN, 10, 60, 90)];
        let along_x = Point::new(25.0, 0.0);
        let along_y = Point::new(0.0, 25.0);
        assert_eq!(find_topmost_with(along_x, &flat, HitTest::OrientedBox), Some(0));
        assert_eq!(find_topmost_with(along_y, &flat, HitTest::OrientedBox), None);
        assert_eq!(find_topmost_with(along_y, &upright, HitTest::OrientedBox), Some(0));
        assert_eq!(find_topmost_with(along_x, &upright, HitTest::OrientedBox), None);
        // The circle accepts both because it ignores orientation.
        assert_eq!(find_topmost_at(along_y, &flat), Some(0));
    }
}
