#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use frameseq_core::{
    DecodeError, DisplaySurface, FrameLoader, FrameTable, ResourceId, SurfaceLayout,
};
use image::{ColorType, Rgba, RgbaImage};
use tokio::time::Instant;

pub type FrameLog = Arc<Mutex<Vec<(u8, u64)>>>;

/// Records (frame id, ms since creation) for every presented image.
/// The frame id is the red channel of pixel (0, 0).
pub struct RecordingSurface {
    epoch: Instant,
    shown: AtomicBool,
    log: FrameLog,
    layout: Mutex<Option<SurfaceLayout>>,
}

impl RecordingSurface {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            epoch: Instant::now(),
            shown: AtomicBool::new(true),
            log: Arc::new(Mutex::new(Vec::new())),
            layout: Mutex::new(None),
        })
    }

    pub fn log(&self) -> FrameLog {
        self.log.clone()
    }

    pub fn frames(&self) -> Vec<(u8, u64)> {
        self.log.lock().unwrap().clone()
    }

    pub fn ids(&self) -> Vec<u8> {
        self.frames().into_iter().map(|(id, _)| id).collect()
    }

    pub fn clear(&self) {
        self.log.lock().unwrap().clear();
    }

    pub fn set_shown(&self, shown: bool) {
        self.shown.store(shown, Ordering::SeqCst);
    }
}

impl DisplaySurface for RecordingSurface {
    fn present(&self, image: &RgbaImage) {
        let id = image.get_pixel(0, 0)[0];
        let at = self.epoch.elapsed().as_millis() as u64;
        self.log.lock().unwrap().push((id, at));
        *self.layout.lock().unwrap() = Some(SurfaceLayout {
            width: image.width(),
            height: image.height(),
            color: ColorType::Rgba8,
        });
    }

    fn is_shown(&self) -> bool {
        self.shown.load(Ordering::SeqCst)
    }

    fn layout(&self) -> Option<SurfaceLayout> {
        *self.layout.lock().unwrap()
    }
}

/// 2x2 solid frames; red channel = resource id.
pub struct SyntheticLoader {
    pub loads: AtomicUsize,
    pub loads_into: AtomicUsize,
    fail_next_into: AtomicBool,
}

impl SyntheticLoader {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            loads: AtomicUsize::new(0),
            loads_into: AtomicUsize::new(0),
            fail_next_into: AtomicBool::new(false),
        })
    }

    pub fn fail_next_into(&self) {
        self.fail_next_into.store(true, Ordering::SeqCst);
    }

    pub fn image(id: ResourceId) -> RgbaImage {
        RgbaImage::from_pixel(2, 2, Rgba([id.0 as u8, 0, 0, 255]))
    }
}

impl FrameLoader for SyntheticLoader {
    fn load(&self, id: ResourceId) -> Result<RgbaImage, DecodeError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(Self::image(id))
    }

    fn load_into(&self, id: ResourceId, buffer: &mut RgbaImage) -> Result<(), DecodeError> {
        self.loads_into.fetch_add(1, Ordering::SeqCst);
        if self.fail_next_into.swap(false, Ordering::SeqCst) {
            return Err(DecodeError::ShapeMismatch {
                expected: buffer.dimensions(),
                found: (9, 9),
            });
        }
        buffer.copy_from_slice(Self::image(id).as_raw());
        Ok(())
    }
}

pub fn table(entries: &[(u32, u32)]) -> FrameTable {
    let ids: Vec<_> = entries.iter().map(|&(id, _)| ResourceId(id)).collect();
    let durations: Vec<_> = entries.iter().map(|&(_, d)| d).collect();
    FrameTable::build(&ids, &durations)
}

/// A, B, C with 100/200/150ms.
pub fn abc() -> FrameTable {
    table(&[(1, 100), (2, 200), (3, 150)])
}

#[derive(Clone, Default)]
pub struct StopCounter(Arc<AtomicU64>);

impl StopCounter {
    pub fn get(&self) -> u64 {
        self.0.load(Ordering::SeqCst)
    }

    pub fn listener(&self) -> impl Fn() + Send + Sync + 'static {
        let count = self.0.clone();
        move || {
            count.fetch_add(1, Ordering::SeqCst);
        }
    }
}
