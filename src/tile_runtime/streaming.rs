use std::collections::HashSet;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use glam::IVec2;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::tile_core::chunk::ChunkRequest;
use crate::tile_core::direction::checked_offset;
use crate::tile_core::error::TileResult;
use crate::tile_core::labels::NoiseLabelLayer;
use crate::tile_core::layer::Layer;
use crate::tile_runtime::world::TileWorld;

/// Generates label grids on a worker pool. Finished grids come back over a
/// channel; the owner of the world inserts them one at a time.
pub struct ThreadedLabelLoader {
    pool: ThreadPool,
    sender: Sender<ChunkRequest>,
    receiver: Receiver<ChunkRequest>,
    pending: HashSet<IVec2>,
    layer: Arc<NoiseLabelLayer>,
}

impl ThreadedLabelLoader {
    pub fn new(layer: Arc<NoiseLabelLayer>, threads: usize) -> anyhow::Result<Self> {
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads.max(1))
            .thread_name(|i| format!("label-gen-{i}"))
            .build()?;
        let (sender, receiver) = mpsc::channel();
        Ok(Self {
            pool,
            sender,
            receiver,
            pending: HashSet::new(),
            layer,
        })
    }

    /// Queues `coord` unless it is already pending.
    pub fn dispatch(&mut self, coord: IVec2) -> bool {
        if !self.pending.insert(coord) {
            return false;
        }
        let tx = self.sender.clone();
        let layer = Arc::clone(&self.layer);
        self.pool.spawn(move || {
            let _ = tx.send(layer.generate(coord));
        });
        true
    }

    pub fn poll(&mut self) -> Vec<ChunkRequest> {
        let mut completed = Vec::new();
        while let Ok(request) = self.receiver.try_recv() {
            self.pending.remove(&request.coord());
            completed.push(request);
        }
        completed
    }

    /// Blocks until every dispatched grid has arrived.
    pub fn wait(&mut self) -> Vec<ChunkRequest> {
        let mut completed = Vec::new();
        while !self.pending.is_empty() {
            let Ok(request) = self.receiver.recv() else {
                break;
            };
            self.pending.remove(&request.coord());
            completed.push(request);
        }
        completed
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

pub struct StreamingTiles {
    world: TileWorld,
    loader: ThreadedLabelLoader,
}

impl StreamingTiles {
    pub fn new(world: TileWorld, layer: Arc<NoiseLabelLayer>, threads: usize) -> anyhow::Result<Self> {
        Ok(Self {
            world,
            loader: ThreadedLabelLoader::new(layer, threads)?,
        })
    }

    /// Dispatches every chunk in the square around `center` that is neither
    /// stored nor pending. Returns how many were dispatched.
    pub fn request_radius(&mut self, center: IVec2, radius: i32) -> usize {
        let mut dispatched = 0;
        for y in -radius..=radius {
            for x in -radius..=radius {
                let Some(coord) = checked_offset(center, IVec2::new(x, y)) else {
                    continue;
                };
                if !self.world.grid().contains(coord) && self.loader.dispatch(coord) {
                    dispatched += 1;
                }
            }
        }
        dispatched
    }

    /// Inserts whatever has finished without blocking.
    pub fn update(&mut self) -> TileResult<usize> {
        let ready = self.loader.poll();
        self.insert_all(ready)
    }

    /// Inserts every pending chunk, blocking until they are generated.
    pub fn finish(&mut self) -> TileResult<usize> {
        let ready = self.loader.wait();
        self.insert_all(ready)
    }

    pub fn pending_count(&self) -> usize {
        self.loader.pending_count()
    }

    pub fn world(&self) -> &TileWorld {
        &self.world
    }

    pub fn into_world(self) -> TileWorld {
        self.world
    }

    /// Inserts every request even when some fail. The first failure is
    /// returned once the rest of the batch is stored.
    fn insert_all(&mut self, requests: Vec<ChunkRequest>) -> TileResult<usize> {
        let mut inserted = 0;
        let mut first_error = None;
        for request in &requests {
            match self.world.insert_chunk(request) {
                Ok(_) => inserted += 1,
                Err(err) => {
                    let coord = request.coord();
                    log::warn!("dropping chunk ({}, {}): {err}", coord.x, coord.y);
                    first_error.get_or_insert(err);
                }
            }
        }
        match first_error {
            Some(err) => Err(err),
            None => Ok(inserted),
        }
    }
}
