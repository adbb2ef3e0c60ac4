use eframe::egui;

use super::{ViewerContent, ViewerWindows, viewport_id_for};
use crate::dispatch::{WindowHost, WindowId};
use crate::identity::FileIdentity;
use crate::render::DiagramImage;

fn diagram(width: usize, height: usize) -> DiagramImage {
    DiagramImage {
        width,
        height,
        rgba: vec![255; width * height * 4],
        encoded: Vec::new(),
    }
}

fn identity(name: &str) -> FileIdentity {
    FileIdentity::Virtual(format!("untitled:{name}"))
}

#[test]
fn created_windows_get_distinct_ids_and_viewports() {
    let mut windows = ViewerWindows::new(egui::Context::default());
    let first = windows.create_window(&identity("a"), "a");
    let second = windows.create_window(&identity("b"), "b");

    assert_ne!(first, second);
    assert_eq!(windows.ids(), vec![first, second]);
    assert_ne!(viewport_id_for(first), viewport_id_for(second));
    let viewer = windows.get(first).expect("first viewer");
    assert_eq!(viewer.title, "a");
    assert!(matches!(viewer.content, ViewerContent::Empty));
}

#[test]
fn reloaded_diagram_reuses_the_texture_and_keeps_zoom() {
    let mut windows = ViewerWindows::new(egui::Context::default());
    let window = windows.create_window(&identity("a"), "a");
    windows.show_pending(window);
    windows.show_diagram(window, diagram(4, 2));

    let viewer = windows.get_mut(window).expect("viewer");
    assert!(!viewer.rendering);
    let ViewerContent::Diagram { texture, size } = &viewer.content else {
        panic!("diagram expected");
    };
    assert_eq!(*size, [4, 2]);
    let texture_id = texture.id();
    viewer.zoom.actual_size();

    windows.show_diagram(window, diagram(8, 6));
    let viewer = windows.get(window).expect("viewer");
    let ViewerContent::Diagram { texture, size } = &viewer.content else {
        panic!("diagram expected");
    };
    assert_eq!(*size, [8, 6]);
    assert_eq!(texture.id(), texture_id);
    assert!(!viewer.zoom.fit);
}

#[test]
fn placeholder_replaces_a_previous_diagram() {
    let mut windows = ViewerWindows::new(egui::Context::default());
    let window = windows.create_window(&identity("a"), "a");
    windows.show_diagram(window, diagram(2, 2));
    windows.show_placeholder(window, "Syntax Error?");

    let viewer = windows.get(window).expect("viewer");
    assert!(matches!(
        &viewer.content,
        ViewerContent::Placeholder(message) if message == "Syntax Error?"
    ));
}

#[test]
fn updates_for_unknown_windows_are_ignored() {
    let mut windows = ViewerWindows::new(egui::Context::default());
    let ghost = WindowId::new(99);
    windows.show_diagram(ghost, diagram(2, 2));
    windows.show_placeholder(ghost, "gone");
    windows.show_pending(ghost);
    assert!(windows.is_empty());
}

#[test]
fn focus_requests_are_deduplicated_and_dropped_on_close() {
    let mut windows = ViewerWindows::new(egui::Context::default());
    let window = windows.create_window(&identity("a"), "a");
    windows.activate(window);
    windows.activate(window);
    assert!(windows.has_pending_focus());

    windows.remove(window);
    assert!(!windows.has_pending_focus());
    assert_eq!(windows.len(), 0);

    let other = windows.create_window(&identity("b"), "b");
    windows.activate(other);
    windows.apply_focus();
    assert!(!windows.has_pending_focus());
}

#[test]
fn viewer_debug_output_summarizes_the_texture() {
    let mut windows = ViewerWindows::new(egui::Context::default());
    let window = windows.create_window(&identity("a"), "a");
    windows.show_diagram(window, diagram(3, 2));

    let rendered = format!("{:?}", windows.get(window).expect("viewer"));
    assert!(rendered.contains("Diagram"));
    assert!(rendered.contains("size: [3, 2]"));
    assert!(rendered.contains("texture"));
}
