//! Building a [`Geometry`] off the calling thread.

use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::error::Result;
use crate::geometry::{Geometry, GeometryParams, Triangle};

/// A geometry being built on a worker thread.
///
/// The worker builds the render buffers, BVH and connectivity before it
/// hands the geometry over, so the value returned by
/// [`try_take`](Self::try_take) or [`wait`](Self::wait) is complete and can
/// replace the current geometry in one move. The result is handed out once;
/// later polls report [`LoadStatus::Taken`]. There is no cancellation;
/// dropping the loader detaches the worker and discards its result.
#[derive(Debug)]
pub struct GeometryLoader {
    receiver: Receiver<Result<Geometry>>,
    handle: Option<JoinHandle<()>>,
    taken: bool,
}

/// Progress of a [`GeometryLoader`].
#[derive(Debug)]
pub enum LoadStatus {
    /// The worker is still building.
    Pending,
    /// The build finished.
    Ready(Result<Geometry>),
    /// The worker died without producing a result.
    Lost,
    /// The result was already returned by an earlier poll.
    Taken,
}

impl GeometryLoader {
    /// Starts building a geometry from `triangles` on a new thread.
    #[must_use]
    pub fn spawn(triangles: Vec<Triangle>, params: GeometryParams) -> Self {
        let (sender, receiver) = mpsc::channel();
        let handle = thread::spawn(move || {
            let result = Geometry::with_params(triangles, params).inspect(|geometry| {
                // Force the lazy connectivity build while still off-thread
                let _ = geometry.polyhedron();
            });
            // The receiver may be gone if the caller gave up on this load
            let _ = sender.send(result);
        });
        debug!("Spawned geometry loader");
        Self {
            receiver,
            handle: Some(handle),
            taken: false,
        }
    }

    /// Returns the finished geometry if the worker is done, without blocking.
    pub fn try_take(&mut self) -> LoadStatus {
        if self.taken {
            return LoadStatus::Taken;
        }
        match self.receiver.try_recv() {
            Ok(result) => {
                self.taken = true;
                self.join();
                LoadStatus::Ready(result)
            }
            Err(TryRecvError::Empty) => LoadStatus::Pending,
            Err(TryRecvError::Disconnected) => {
                warn!("Geometry loader finished without a result");
                self.join();
                LoadStatus::Lost
            }
        }
    }

    /// Blocks until the worker finishes.
    ///
    /// Returns `None` if the worker died without producing a result.
    pub fn wait(mut self) -> Option<Result<Geometry>> {
        let result = self.receiver.recv().ok();
        self.join();
        result
    }

    fn join(&mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("Geometry loader thread panicked");
            }
        }
    }
}
