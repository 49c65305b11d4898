use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::mpsc::{channel, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use log::{debug, error};

use crate::coord::PlaneMapping;
use crate::render::{PixelBuffer, Renderer};

const POLL: Duration = Duration::from_millis(20);

#[derive(Copy, Clone, Debug)]
pub struct RenderRequest {
    pub generation: u64,
    pub mapping: PlaneMapping,
    pub width: u32,
    pub height: u32,
}

struct Frame {
    generation: u64,
    image: PixelBuffer,
}

/// Renders on a background thread so the UI thread only ever mutates the
/// viewport and hands over snapshots.
///
/// Requests that pile up while a frame is rendering collapse to the newest
/// one, and a finished frame that has already been superseded is dropped.
pub struct RenderWorker {
    tx: Sender<RenderRequest>,
    latest: Arc<AtomicU64>,
    frame: Arc<Mutex<Option<Frame>>>,
    shutdown: Arc<AtomicBool>,
}

impl RenderWorker {
    fn spawn_renderer(
        threads: usize,
        rx: Receiver<RenderRequest>,
        latest: Arc<AtomicU64>,
        frame: Arc<Mutex<Option<Frame>>>,
        shutdown: Arc<AtomicBool>,
    ) -> thread::JoinHandle<()> {
        thread::spawn(move || {
            let renderer = Renderer::threaded(threads);
            loop {
                if shutdown.load(Ordering::SeqCst) {
                    return;
                }
                let mut request = match rx.recv_timeout(POLL) {
                    Ok(request) => request,
                    Err(RecvTimeoutError::Timeout) => continue,
                    Err(RecvTimeoutError::Disconnected) => return,
                };
                while let Ok(newer) = rx.try_recv() {
                    request = newer;
                }
                if request.generation < latest.load(Ordering::SeqCst) {
                    debug!("skipping superseded request {}", request.generation);
                    continue;
                }

                let image = renderer.render_mapping(request.mapping, request.width, request.height);

                if request.generation < latest.load(Ordering::SeqCst) {
                    debug!("discarding stale frame {}", request.generation);
                    continue;
                }
                match frame.lock() {
                    Ok(mut slot) => {
                        slot.replace(Frame {
                            generation: request.generation,
                            image,
                        });
                    }
                    Err(_) => {
                        error!("frame slot poisoned, stopping render thread");
                        return;
                    }
                }
            }
        })
    }

    /// `threads` as for `Renderer::threaded`.
    pub fn new(threads: usize) -> Self {
        let (tx, rx) = channel::<RenderRequest>();
        let latest = Arc::new(AtomicU64::new(0));
        let frame = Arc::new(Mutex::new(None));
        let shutdown = Arc::new(AtomicBool::new(false));

        Self::spawn_renderer(threads, rx, latest.clone(), frame.clone(), shutdown.clone());

        Self {
            tx,
            latest,
            frame,
            shutdown,
        }
    }

    /// Queue a frame and return its generation. Every earlier request
    /// becomes stale.
    pub fn request(&self, mapping: PlaneMapping, width: u32, height: u32) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let request = RenderRequest {
            generation,
            mapping,
            width,
            height,
        };
        if self.tx.send(request).is_err() {
            error!("render thread is gone, dropping request {}", generation);
        }
        generation
    }

    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::SeqCst)
    }

    /// Take the newest finished frame, if it is still current.
    pub fn next_image(&self) -> Option<PixelBuffer> {
        let mut slot = self.frame.lock().ok()?;
        let frame = slot.take()?;
        if frame.generation < self.latest_generation() {
            None
        } else {
            Some(frame.image)
        }
    }
}

impl Drop for RenderWorker {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::coord::{Viewport, WindowSize};
    use std::time::Instant;

    fn wait_for_image(worker: &RenderWorker) -> Option<PixelBuffer> {
        let deadline = Instant::now() + Duration::from_secs(10);
        while Instant::now() < deadline {
            if let Some(img) = worker.next_image() {
                return Some(img);
            }
            thread::sleep(Duration::from_millis(5));
        }
        None
    }

    fn mapping(width: u32, height: u32) -> PlaneMapping {
        Viewport::default()
            .mapping(WindowSize::from_pixels(width, height))
            .unwrap()
    }

    #[test]
    fn test_generations_increase() {
        let worker = RenderWorker::new(0);
        assert_eq!(worker.latest_generation(), 0);
        assert_eq!(worker.request(mapping(8, 8), 8, 8), 1);
        assert_eq!(worker.request(mapping(8, 8), 8, 8), 2);
        assert_eq!(worker.latest_generation(), 2);
    }

    #[test]
    fn test_delivers_latest_frame() {
        let worker = RenderWorker::new(2);
        worker.request(mapping(16, 12), 16, 12);
        worker.request(mapping(32, 24), 32, 24);
        let img = wait_for_image(&worker).expect("no frame rendered");
        assert_eq!(img.dimensions(), (32, 24));
        assert!(worker.next_image().is_none());
    }

    #[test]
    fn test_frame_matches_inline_render() {
        let worker = RenderWorker::new(0);
        worker.request(mapping(20, 10), 20, 10);
        let img = wait_for_image(&worker).expect("no frame rendered");
        let expected = crate::render::render(&Viewport::default(), 20, 10);
        assert_eq!(img.as_raw(), expected.as_raw());
    }
}
