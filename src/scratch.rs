//! The scratch surface: an opaque overlay the user rubs away with the pointer.
//!
//! Lifecycle: [`ScratchSurface::mount`] paints a fresh overlay, pointer events
//! erase discs from it, and once more than the configured fraction is
//! transparent the completion callback runs, exactly once per mount.
//! Without a mounted surface every operation is silently skipped.

use image::RgbaImage;
use tracing::{debug, info, trace};

use crate::config::ScratchConfig;
use crate::coverage::CoverageEvaluator;
use crate::erase::Brush;
use crate::error::Result;
use crate::overlay;
use crate::pointer::{PointerEvent, PointerTracker, ScreenBox, to_local};

pub type CompletionCallback = Box<dyn FnMut()>;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    /// Overlay painted, never engaged.
    Initialized,
    /// Engaged at least once, coverage still below the threshold.
    Scratching,
    /// Threshold crossed. Absorbing.
    Done,
}

/// Raster plus its coverage bookkeeping; exists only while mounted.
struct Mounted {
    surface: RgbaImage,
    evaluator: CoverageEvaluator,
}

pub struct ScratchSurface {
    config: ScratchConfig,
    brush: Brush,
    tracker: PointerTracker,
    phase: Phase,
    mounted: Option<Mounted>,
    on_complete: Option<CompletionCallback>,
}

impl ScratchSurface {
    /// Build an unmounted surface. Fails only on a bad config.
    pub fn new(config: ScratchConfig, on_complete: Option<CompletionCallback>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            brush: Brush::new(config.brush_radius),
            config,
            tracker: PointerTracker::default(),
            phase: Phase::Initialized,
            mounted: None,
            on_complete,
        })
    }

    /// Allocate and paint a fresh overlay. Remounting starts over from `Initialized`.
    pub fn mount(&mut self) {
        let surface = overlay::new_overlay(&self.config);
        let evaluator = CoverageEvaluator::new(self.config.strategy, self.config.threshold, &surface);
        self.mounted = Some(Mounted { surface, evaluator });
        self.tracker.release();
        self.phase = Phase::Initialized;
        debug!(width = self.config.width, height = self.config.height, "scratch surface mounted");
    }

    /// Drop the raster. Later input is ignored until the next mount.
    pub fn unmount(&mut self) {
        if self.mounted.take().is_some() {
            debug!("scratch surface unmounted");
        }
        self.tracker.release();
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }

    /// Pointer pressed on the surface: engage and erase at the press position.
    pub fn pointer_down(&mut self, event: &PointerEvent, rect: ScreenBox) {
        if self.mounted.is_none() {
            trace!("pointer down ignored: surface not mounted");
            return;
        }
        self.tracker.engage();
        if self.phase == Phase::Initialized {
            self.phase = Phase::Scratching;
        }
        self.scratch(event, rect);
    }

    /// Pointer moved over the surface: erase if engaged.
    pub fn pointer_move(&mut self, event: &PointerEvent, rect: ScreenBox) {
        self.scratch(event, rect);
    }

    /// Pointer released anywhere in the window.
    pub fn pointer_up(&mut self) {
        self.tracker.release();
    }

    fn scratch(&mut self, event: &PointerEvent, rect: ScreenBox) {
        if !self.tracker.is_engaged() || self.phase == Phase::Done {
            return;
        }
        let Some(mounted) = self.mounted.as_mut() else {
            trace!("scratch ignored: surface not mounted");
            return;
        };
        let Some(client) = event.client_point() else {
            return;
        };
        let (w, h) = mounted.surface.dimensions();
        let Some(local) = to_local(client, rect, w, h) else {
            return;
        };

        let cleared = self.brush.erase(&mut mounted.surface, local);
        let crossed = mounted.evaluator.evaluate(&mounted.surface, cleared);
        trace!(x = local.x, y = local.y, cleared, coverage = mounted.evaluator.fraction(), "scratched");

        if crossed {
            self.phase = Phase::Done;
            info!(coverage = mounted.evaluator.fraction(), "scratch card revealed");
            if let Some(cb) = self.on_complete.as_mut() {
                cb();
            }
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_done(&self) -> bool {
        self.phase == Phase::Done
    }

    pub fn is_engaged(&self) -> bool {
        self.tracker.is_engaged()
    }

    /// Cleared fraction, 0 when unmounted.
    pub fn coverage(&self) -> f64 {
        self.mounted.as_ref().map_or(0.0, |m| m.evaluator.fraction())
    }

    pub fn cleared_pixels(&self) -> u64 {
        self.mounted.as_ref().map_or(0, |m| m.evaluator.cleared())
    }

    pub fn surface(&self) -> Option<&RgbaImage> {
        self.mounted.as_ref().map(|m| &m.surface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn counted() -> (Rc<Cell<u32>>, CompletionCallback) {
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        (calls, Box::new(move || c.set(c.get() + 1)))
    }

    fn identity_box() -> ScreenBox {
        ScreenBox::new(0.0, 0.0, 400.0, 250.0)
    }

    fn mounted_surface() -> (Rc<Cell<u32>>, ScratchSurface) {
        let (calls, cb) = counted();
        let mut s = ScratchSurface::new(ScratchConfig::default(), Some(cb)).unwrap();
        s.mount();
        (calls, s)
    }

    #[test]
    fn unmounted_surface_ignores_everything() {
        let (calls, cb) = counted();
        let mut s = ScratchSurface::new(ScratchConfig::default(), Some(cb)).unwrap();
        s.pointer_down(&PointerEvent::mouse(200.0, 125.0), identity_box());
        s.pointer_move(&PointerEvent::mouse(210.0, 125.0), identity_box());
        s.pointer_up();
        assert_eq!(s.phase(), Phase::Initialized);
        assert_eq!(s.coverage(), 0.0);
        assert!(s.surface().is_none());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn moves_without_engage_do_nothing() {
        let (calls, mut s) = mounted_surface();
        for x in (0..400).step_by(20) {
            s.pointer_move(&PointerEvent::mouse(x as f32, 125.0), identity_box());
        }
        assert_eq!(s.cleared_pixels(), 0);
        assert_eq!(s.phase(), Phase::Initialized);
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn single_press_at_center_stays_below_threshold() {
        let (calls, mut s) = mounted_surface();
        s.pointer_down(&PointerEvent::mouse(200.0, 125.0), identity_box());
        assert_eq!(s.phase(), Phase::Scratching);
        assert!((s.coverage() - 0.0503).abs() < 0.001, "coverage {}", s.coverage());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn release_stops_erasing() {
        let (_, mut s) = mounted_surface();
        s.pointer_down(&PointerEvent::mouse(60.0, 60.0), identity_box());
        s.pointer_up();
        let before = s.cleared_pixels();
        s.pointer_move(&PointerEvent::mouse(300.0, 180.0), identity_box());
        assert_eq!(s.cleared_pixels(), before);
    }

    #[test]
    fn touch_without_points_is_skipped() {
        let (_, mut s) = mounted_surface();
        s.pointer_down(&PointerEvent::Touch(Vec::new()), identity_box());
        assert!(s.is_engaged());
        assert_eq!(s.cleared_pixels(), 0);
        s.pointer_move(&PointerEvent::touch(100.0, 100.0), identity_box());
        assert!(s.cleared_pixels() > 0);
    }

    #[test]
    fn remount_paints_a_fresh_overlay() {
        let (_, mut s) = mounted_surface();
        s.pointer_down(&PointerEvent::mouse(200.0, 125.0), identity_box());
        assert!(s.cleared_pixels() > 0);
        s.unmount();
        assert!(!s.is_mounted());
        s.mount();
        assert_eq!(s.cleared_pixels(), 0);
        assert_eq!(s.phase(), Phase::Initialized);
        assert!(!s.is_engaged());
    }

    #[test]
    fn bad_config_is_rejected() {
        let cfg = ScratchConfig { brush_radius: 0.0, ..ScratchConfig::default() };
        assert!(ScratchSurface::new(cfg, None).is_err());
    }
}
