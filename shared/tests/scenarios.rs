use std::sync::Arc;

use earboard_shared::{
    find_topmost_at, BackgroundImage, Catalog, Editor, EditorConfig, ItemDefinition, ItemField,
    ItemId, NoAssets, Point, Scene, Shape, Size, Viewport,
};

fn earring() -> Arc<ItemDefinition> {
    Arc::new(ItemDefinition::raster(
        "earring_01",
        "Earring 1",
        "img/earring_01.png",
    ))
}

fn loaded_editor(canvas: Size, image: (u32, u32)) -> Editor {
    let mut editor = Editor::new(EditorConfig::default(), Catalog::builtin());
    editor.resize(canvas);
    let ticket = editor.begin_load();
    editor
        .finish_load(ticket, BackgroundImage::new(image.0, image.1))
        .unwrap();
    editor
}

#[test]
fn fit_place_and_hit_on_half_scale_photo() {
    let editor = loaded_editor(Size::new(800.0, 600.0), (1600, 1200));
    assert_eq!(editor.viewport(), &Viewport::new(0.5, Point::ORIGIN));

    let mut scene = Scene::new();
    scene.place(earring(), Point::new(100.0, 100.0), 40, 40);
    assert_eq!(find_topmost_at(Point::new(100.0, 100.0), scene.items()), Some(0));
    assert_eq!(find_topmost_at(Point::new(500.0, 500.0), scene.items()), None);
}

#[test]
fn fixed_length_item_reads_size_as_length() {
    let mut scene = Scene::new();
    scene.place(earring(), Point::ORIGIN, 40, 40);
    scene.update_selected(ItemField::Size, 60);
    assert_eq!(scene.selected().unwrap().length(), 60);
}

#[test]
fn deleting_topmost_of_two_stacked_items_leaves_first() {
    let mut scene = Scene::new();
    let first = scene.place(earring(), Point::new(50.0, 50.0), 40, 40);
    scene.place(earring(), Point::new(50.0, 50.0), 30, 30);
    let top = find_topmost_at(Point::new(50.0, 50.0), scene.items()).unwrap();
    assert_eq!(top, 1);
    scene.select(top).unwrap();
    let removed = scene.delete_selected().unwrap();
    assert_eq!(removed.size(), 30);
    assert_eq!(scene.len(), 1);
    assert_eq!(scene.items()[first].size(), 40);
    assert_eq!(scene.selected_index(), None);
}

#[test]
fn delete_key_flow_through_editor() {
    let mut editor = loaded_editor(Size::new(800.0, 600.0), (1600, 1200));
    editor.arm(&ItemId::new("earring_05")).unwrap();
    editor.pointer_down(Point::new(100.0, 100.0));
    editor.pointer_up();
    editor.arm(&ItemId::new("earring_06")).unwrap();
    editor.pointer_down(Point::new(300.0, 300.0));
    editor.pointer_up();
    assert_eq!(editor.scene().len(), 2);

    let changes = editor.delete_selected();
    assert!(changes.selection);
    assert_eq!(editor.scene().len(), 1);
    assert!(editor.delete_selected().is_empty());
    assert_eq!(editor.scene().len(), 1);
}

#[test]
fn full_session_round_trip() {
    let mut editor = loaded_editor(Size::new(1000.0, 500.0), (500, 500));
    assert_eq!(editor.viewport(), &Viewport::new(1.0, Point::new(250.0, 0.0)));

    editor.input_size(30);
    editor.input_length(120);
    editor.arm(&ItemId::new("barbell")).unwrap();
    editor.pointer_down(Point::new(500.0, 250.0));
    editor.pointer_up();
    let placed = editor.scene().selected().unwrap();
    assert_eq!(placed.position, Point::new(250.0, 250.0));
    assert_eq!(placed.definition().graphic, earboard_shared::Graphic::Procedural { shape: Shape::Barbell });

    // Zoom around the item; it must stay under the pointer.
    editor.wheel(-1000.0, Point::new(500.0, 250.0));
    assert_eq!(editor.scale(), 2.0);
    let on_canvas = editor.viewport().image_to_canvas(Point::new(250.0, 250.0));
    assert!((on_canvas.x - 500.0).abs() < 1e-9 && (on_canvas.y - 250.0).abs() < 1e-9);

    // The 120-long bar is hit at its tip once zoomed.
    editor.deselect();
    editor.pointer_down(Point::new(500.0 + 55.0 * 2.0, 250.0));
    assert_eq!(editor.scene().selected_index(), Some(0));
    editor.pointer_up();

    assert!(editor.frame(&NoAssets).has_selection_outline());
    editor.clear_all();
    assert!(editor.scene().is_empty());
    assert!(editor.background().is_none());
    assert!(editor.wheel(-100.0, Point::ORIGIN).is_empty());
}

#[test]
fn most_recent_upload_wins() {
    let mut editor = Editor::new(EditorConfig::default(), Catalog::builtin());
    editor.resize(Size::new(800.0, 600.0));
    let slow = editor.begin_load();
    let fast = editor.begin_load();
    editor
        .finish_load(fast, BackgroundImage::new(400, 300))
        .unwrap();
    let stale = editor
        .finish_load(slow, BackgroundImage::new(4000, 3000))
        .unwrap();
    assert!(stale.is_empty());
    assert_eq!(editor.background().map(|image| image.width), Some(400));
}
