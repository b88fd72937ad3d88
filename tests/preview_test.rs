//! Terminal preview scene without a terminal

use std::collections::HashMap;
use std::path::PathBuf;

use isoroom::engine::StaticFurnitureCatalog;
use isoroom::preview::{load_room, PreviewConfig, Scene};
use isoroom::term::{RoomView, Rgb, TermSize, HALF_BLOCK};
use isoroom::types::ViewAction;

fn scene() -> Scene {
    let load = load_room(&PreviewConfig::default()).unwrap();
    Scene::new(load, StaticFurnitureCatalog::new(), TermSize::new(80, 24), false).unwrap()
}

#[test]
fn test_config_defaults() {
    let config = PreviewConfig::from_lookup(|_| None);
    assert_eq!(config, PreviewConfig::default());
    assert_eq!(config.tick_ms, 16);
    assert!(!config.verbose);
}

#[test]
fn test_config_from_lookup() {
    let vars: HashMap<&str, &str> = [
        ("ISOROOM_HEIGHTMAP", "rooms/hall.txt"),
        ("ISOROOM_TICK_MS", "40"),
        ("ISOROOM_VERBOSE", "yes"),
        ("ISOROOM_SCREENSHOT", "  "),
    ]
    .into_iter()
    .collect();
    let config = PreviewConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
    assert_eq!(config.heightmap_path, Some(PathBuf::from("rooms/hall.txt")));
    assert_eq!(config.room_path, None);
    assert_eq!(config.tick_ms, 40);
    assert!(config.verbose);
    assert_eq!(config.screenshot_path, PreviewConfig::default().screenshot_path);
}

#[test]
fn test_zero_tick_keeps_default() {
    let config = PreviewConfig::from_lookup(|key| (key == "ISOROOM_TICK_MS").then(|| "0".to_string()));
    assert_eq!(config.tick_ms, 16);
}

#[test]
fn test_default_room_loads() {
    let scene = scene();
    assert!(!scene.room().parts().is_empty());
    assert_eq!(scene.canvas().width(), 80);
    assert_eq!(scene.canvas().height(), 46);
    assert!(scene.status_line().starts_with("room | zoom 0.50"));
}

#[test]
fn test_zoom_action_steps_level() {
    let mut scene = scene();
    assert_eq!(scene.apply(ViewAction::Zoom('+')).unwrap(), None);
    assert_eq!(scene.room().camera().level(), 0.75);
    assert!(scene.is_animating());
}

#[test]
fn test_pan_changes_fingerprint() {
    let mut scene = scene();
    let before = scene.fingerprint();
    scene.apply(ViewAction::Pan { dx: 1, dy: 0 }).unwrap();
    assert_ne!(scene.fingerprint(), before);
}

#[test]
fn test_toggle_verbose_reports() {
    let mut scene = scene();
    let message = scene.apply(ViewAction::ToggleVerbose).unwrap();
    assert_eq!(message.as_deref(), Some("logging on"));
}

#[test]
fn test_rendered_room_reaches_the_terminal() {
    let mut scene = scene();
    let size = TermSize::new(80, 24);
    let view = RoomView::new(Rgb::new(0, 0, 0));
    let status = scene.status_line();
    let fb = view.render(scene.render(), &status, size);

    // The scene clears to its own background, so compare against that and
    // the status row.
    let background = Rgb::from_hex(0x101018);
    let drawn = (0..23u16)
        .flat_map(|y| (0..80u16).map(move |x| (x, y)))
        .filter_map(|(x, y)| fb.get(x, y))
        .filter(|c| c.ch == HALF_BLOCK && (c.style.fg != background || c.style.bg != background))
        .count();
    assert!(drawn > 0);
    assert_eq!(fb.get(1, 23).unwrap().ch, 'r');
}

#[test]
fn test_screenshot_is_png() {
    let scene = scene();
    let png = scene.screenshot_png().unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
}
