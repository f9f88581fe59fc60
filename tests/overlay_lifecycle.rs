//! End-to-end overlay behavior against the in-memory host.

use geo_overlay::overlay::{ANCHOR_CLASS_PREFIX, CONTAINER_CLASS};
use geo_overlay::{
    Anchor, AnchoredOverlay, CameraTransform, GeoPoint, HostSurface, MapEventKind, MapProjection,
    MemoryHost, OverlayEventKind, OverlayOptions, ScreenPoint,
};
use std::cell::RefCell;
use std::rc::Rc;

fn host(center: GeoPoint, zoom: f64, width: f64, height: f64) -> Rc<MemoryHost> {
    Rc::new(MemoryHost::new(MapProjection::new(
        center, zoom, width, height,
    )))
}

fn open_label(host: &Rc<MemoryHost>, at: GeoPoint) -> AnchoredOverlay<MemoryHost> {
    let label = AnchoredOverlay::new(host.document());
    label.set_lng_lat(at).set_text("label").add_to(Rc::clone(host));
    label
}

fn anchor_classes(label: &AnchoredOverlay<MemoryHost>) -> Vec<String> {
    label
        .container()
        .map(|c| c.classes())
        .unwrap_or_default()
        .into_iter()
        .filter(|c| c.starts_with(ANCHOR_CLASS_PREFIX))
        .collect()
}

#[test]
fn test_auto_anchor_near_left_edge_after_layout() {
    let host = host(GeoPoint::new(0.0, 0.0), 2.0, 400.0, 300.0);
    let at = host.camera().unproject(ScreenPoint::new(5.0, 50.0));
    let label = open_label(&host, at);

    // Nothing is laid out on the first placement.
    assert_eq!(label.anchor(), Some(Anchor::Bottom));

    label.container().unwrap().set_size(100.0, 20.0);
    host.fire_move();
    assert_eq!(label.anchor(), Some(Anchor::Left));
    assert_eq!(anchor_classes(&label), vec!["mapboxgl-popup-anchor-left"]);
}

#[test]
fn test_exactly_one_anchor_class_after_every_recompute() {
    let host = host(GeoPoint::new(0.0, 0.0), 3.0, 400.0, 300.0);
    let label = open_label(&host, GeoPoint::new(0.0, 0.0));
    label.container().unwrap().set_size(120.0, 40.0);

    for (dx, dy) in [(190.0, 0.0), (0.0, 140.0), (-380.0, 0.0), (0.0, -280.0), (190.0, 140.0)] {
        host.update_camera(|camera| camera.pan_by(ScreenPoint::new(dx, dy)));
        assert_eq!(anchor_classes(&label).len(), 1, "after pan ({}, {})", dx, dy);
    }

    label.set_anchor(Some(Anchor::TopRight));
    assert_eq!(anchor_classes(&label), vec!["mapboxgl-popup-anchor-top-right"]);
}

#[test]
fn test_detach_twice() {
    let host = host(GeoPoint::new(0.0, 0.0), 3.0, 800.0, 600.0);
    let label = open_label(&host, GeoPoint::new(10.0, 10.0));

    let closes = Rc::new(RefCell::new(0));
    let c = Rc::clone(&closes);
    label.on(OverlayEventKind::Close, move |_| *c.borrow_mut() += 1);

    label.remove();
    label.remove();

    assert!(!label.is_open());
    assert!(label.container().is_none());
    assert!(host.container().find_by_class(CONTAINER_CLASS).is_empty());
    assert_eq!(host.listener_count(MapEventKind::Move), 0);
    assert_eq!(*closes.borrow(), 1);
}

#[test]
fn test_detach_before_attach_is_harmless() {
    let host = host(GeoPoint::new(0.0, 0.0), 3.0, 800.0, 600.0);
    let label = AnchoredOverlay::<MemoryHost>::new(host.document());
    label.remove();
    assert!(!label.is_open());
}

#[test]
fn test_no_wrapping_without_world_copies() {
    let camera = MapProjection::new(GeoPoint::new(170.0, 0.0), 3.0, 800.0, 600.0)
        .with_world_copies(false);
    let host = Rc::new(MemoryHost::new(camera));
    let label = open_label(&host, GeoPoint::new(-175.0, 0.0));

    assert_eq!(label.lng_lat(), Some(GeoPoint::new(-175.0, 0.0)));
    let expected = host.camera().project(GeoPoint::new(-175.0, 0.0));
    assert_eq!(label.pos(), Some(expected));
    assert!(label.pos().unwrap().x < 0.0);
}

#[test]
fn test_world_copies_bring_point_on_screen() {
    let host = host(GeoPoint::new(170.0, 0.0), 3.0, 800.0, 600.0);
    let label = open_label(&host, GeoPoint::new(-175.0, 0.0));

    assert_eq!(label.lng_lat().map(|p| p.lng), Some(185.0));
    assert!(host.camera().contains(label.pos().unwrap()));
}

#[test]
fn test_follows_camera_across_antimeridian() {
    let host = host(GeoPoint::new(178.0, 0.0), 4.0, 800.0, 600.0);
    let label = open_label(&host, GeoPoint::new(179.0, 0.0));

    let mut last = label.pos().unwrap();
    for _ in 0..20 {
        host.update_camera(|camera| camera.pan_by(ScreenPoint::new(20.0, 0.0)));
        let pos = label.pos().unwrap();
        assert!(((last.x - pos.x) - 20.0).abs() < 1e-6, "jumped from {} to {}", last.x, pos.x);
        last = pos;
    }
    assert!(host.camera().center().lng < 0.0, "camera should have crossed");
    assert!(label.lng_lat().unwrap().lng < -180.0);
}

#[test]
fn test_new_position_resets_continuity() {
    let host = host(GeoPoint::new(0.0, 0.0), 3.0, 800.0, 600.0);
    let label = open_label(&host, GeoPoint::new(0.0, 0.0));

    label.set_lng_lat(GeoPoint::new(370.0, 0.0));
    assert_eq!(label.lng_lat().map(|p| p.lng), Some(10.0));
}

#[test]
fn test_reattach_moves_between_hosts() {
    let first = host(GeoPoint::new(0.0, 0.0), 3.0, 800.0, 600.0);
    let second = host(GeoPoint::new(0.0, 0.0), 3.0, 800.0, 600.0);
    let label = open_label(&first, GeoPoint::new(0.0, 0.0));

    let events = Rc::new(RefCell::new(Vec::new()));
    for kind in [OverlayEventKind::Open, OverlayEventKind::Close] {
        let e = Rc::clone(&events);
        label.on(kind, move |_| e.borrow_mut().push(kind));
    }

    label.add_to(Rc::clone(&second));
    assert_eq!(first.listener_count(MapEventKind::Move), 0);
    assert_eq!(second.listener_count(MapEventKind::Move), 1);
    assert!(first.container().children().is_empty());
    assert_eq!(second.container().find_by_class(CONTAINER_CLASS).len(), 1);
    assert_eq!(*events.borrow(), vec![OverlayEventKind::Open]);

    label.remove();
    label.add_to(Rc::clone(&first));
    assert_eq!(first.container().find_by_class(CONTAINER_CLASS).len(), 1);
    assert_eq!(first.container().text_content(), "label");
    assert_eq!(
        *events.borrow(),
        vec![
            OverlayEventKind::Open,
            OverlayEventKind::Close,
            OverlayEventKind::Open
        ]
    );
}

#[test]
fn test_close_on_click_from_options_json() {
    let host = host(GeoPoint::new(0.0, 0.0), 3.0, 800.0, 600.0);
    let options = OverlayOptions::from_json(serde_json::json!({
        "closeOnClick": true,
        "closeButton": true,
        "offset": {"bottom": [0, -12]}
    }))
    .unwrap();
    let label = AnchoredOverlay::with_options(host.document(), options).unwrap();
    label
        .set_lng_lat(GeoPoint::new(0.0, 0.0))
        .set_html("<b>Hi</b>")
        .add_to(Rc::clone(&host));

    assert_eq!(
        label.container().unwrap().transform().as_deref(),
        Some("translate(-50%,-100%) translate(400px,288px)")
    );

    host.click(ScreenPoint::new(100.0, 100.0));
    assert!(!label.is_open());
    assert_eq!(host.listener_count(MapEventKind::Click), 0);
    assert!(host.container().children().is_empty());
}

#[test]
fn test_listener_can_detach_overlay_during_open() {
    let host = host(GeoPoint::new(0.0, 0.0), 3.0, 800.0, 600.0);
    let label = AnchoredOverlay::<MemoryHost>::new(host.document());
    label.once(OverlayEventKind::Open, |overlay| {
        overlay.remove();
    });

    label
        .set_lng_lat(GeoPoint::new(0.0, 0.0))
        .set_text("x")
        .add_to(Rc::clone(&host));
    assert!(!label.is_open());
    assert!(host.container().children().is_empty());
}
