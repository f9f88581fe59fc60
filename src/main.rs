//! Geo Overlay demo.
//!
//! Pans an in-memory map eastward across the antimeridian with an eased
//! animation and logs where a label pinned near Fiji ends up on every frame.
//! Run with `RUST_LOG=debug` to see the overlay lifecycle as well.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    demo::run();
}

// WASM builds use the library directly; main is not called on wasm32
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use geo_overlay::util::{ease, lerp};
    use geo_overlay::{
        AnchoredOverlay, CameraTransform, GeoPoint, MapProjection, MemoryHost, OffsetSpec,
        OverlayEventKind, OverlayNode, OverlayOptions,
    };
    use std::rc::Rc;

    const FRAMES: usize = 12;
    const START_LNG: f64 = 160.0;
    const END_LNG: f64 = -160.0;

    pub fn run() {
        let camera = MapProjection::new(GeoPoint::new(START_LNG, -15.0), 3.0, 1024.0, 768.0);
        let host = Rc::new(MemoryHost::new(camera));

        let options = OverlayOptions::default()
            .with_id("suva")
            .with_class_name("demo-label")
            .with_offset(OffsetSpec::Uniform(12.0))
            .with_tip(true);
        let label = match AnchoredOverlay::with_options(host.document(), options) {
            Ok(label) => label,
            Err(e) => {
                log::error!("Invalid overlay options: {}", e);
                return;
            }
        };

        label.on(OverlayEventKind::Open, |overlay| {
            log::info!("Opened {:?}", overlay.id());
        });
        label.on(OverlayEventKind::Close, |overlay| {
            log::info!("Closed {:?}", overlay.id());
        });

        label
            .set_lng_lat(GeoPoint::new(178.44, -18.14))
            .set_text("Suva")
            .add_to(Rc::clone(&host));
        if let Some(container) = label.container() {
            container.set_size(64.0, 24.0);
        }

        // Travel east the short way: 160 -> 200 (= -160).
        let travel = (END_LNG + 360.0) - START_LNG;
        for frame in 0..=FRAMES {
            let t = ease(frame as f64 / FRAMES as f64);
            let lng = lerp(START_LNG, START_LNG + travel, t);
            host.update_camera(|camera| camera.set_center(GeoPoint::new(lng, -15.0)));

            let center = host.camera().center();
            let transform = label
                .container()
                .and_then(|container| container.transform())
                .unwrap_or_default();
            log::info!(
                "frame {:>2}: center {:>8.3}  label lng {:>8.3}  anchor {:<12}  {}",
                frame,
                center.lng,
                label.lng_lat().map(|p| p.lng).unwrap_or(f64::NAN),
                label.anchor().map(|a| a.to_string()).unwrap_or_default(),
                transform,
            );
        }

        if let Some(container) = label.container() {
            log::info!("classes: {}", container.classes().join(" "));
            log::info!("attached: {}", container.is_attached());
        }

        label.remove();
    }
}
