// offload runs splat synthesis on tokio's blocking pool so async callers never stall

use std::sync::Arc;

use terrain_core::{
    HeightField, HeightmapPixels, SplatOutput, SplatParams, TerrainConfig, TerrainError,
    compute_weights,
};
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::Semaphore;

#[derive(Debug, Error)]
pub enum OffloadError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),

    // The blocking task panicked or was torn down before finishing
    #[error("splat worker failed: {0}")]
    Worker(String),
}

pub type Result<T> = std::result::Result<T, OffloadError>;

// Everything a background job needs, owned so nothing is shared with the caller.
// A config is sent instead of a sampler; the worker builds its own.
#[derive(Debug, Clone)]
pub struct SplatJob {
    pub config: TerrainConfig,
    pub params: SplatParams,
    pub heightmap: Option<HeightmapPixels>,
}

impl SplatJob {
    pub fn new(config: TerrainConfig, params: SplatParams) -> Self {
        Self {
            config,
            params,
            heightmap: None,
        }
    }

    pub fn with_heightmap(mut self, pixels: HeightmapPixels) -> Self {
        self.heightmap = Some(pixels);
        self
    }

    // Synchronous body of the job
    pub fn run(self) -> terrain_core::Result<SplatOutput> {
        let field = match self.heightmap {
            Some(pixels) => HeightField::with_heightmap(&self.config, pixels)?,
            None => HeightField::new(&self.config)?,
        };
        compute_weights(&field, &self.params)
    }
}

// Run one job on the current runtime's blocking pool
pub async fn compute_splat(job: SplatJob) -> Result<SplatOutput> {
    let out = tokio::task::spawn_blocking(move || job.run())
        .await
        .map_err(|e| OffloadError::Worker(e.to_string()))??;
    Ok(out)
}

// Submits jobs to a runtime, capping how many run at once
#[derive(Clone)]
pub struct SplatWorker {
    handle: Handle,
    permits: Arc<Semaphore>,
}

impl SplatWorker {
    pub fn new(handle: Handle, max_in_flight: usize) -> Self {
        Self {
            handle,
            permits: Arc::new(Semaphore::new(max_in_flight.max(1))),
        }
    }

    // Must be called from inside a tokio runtime
    pub fn current(max_in_flight: usize) -> Self {
        Self::new(Handle::current(), max_in_flight)
    }

    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    // Dropping the returned future discards the result; the computation itself
    // still runs to completion on the blocking pool.
    pub async fn compute(&self, job: SplatJob) -> Result<SplatOutput> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| OffloadError::Worker(e.to_string()))?;
        let size = job.params.size;

        let task = self.handle.spawn_blocking(move || {
            let _permit = permit;
            job.run()
        });
        let out = task
            .await
            .map_err(|e| OffloadError::Worker(e.to_string()))?
            .inspect_err(|e| log::warn!("splat job ({size}px) failed: {e}"))?;

        log::debug!("splat job ({size}px) done, {} bytes", out.bytes.len());
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use terrain_core::{PerlinParams, TerrainSource};

    #[test]
    fn offload_job_runs_synchronously() {
        let config = TerrainConfig {
            width: 64.0,
            height: 64.0,
            edge_fade: None,
            source: TerrainSource::Perlin(PerlinParams::default()),
            ops: Vec::new(),
            intensity_scale: None,
        };
        let params = SplatParams {
            size: 16,
            ..Default::default()
        };
        let out = SplatJob::new(config, params).run().unwrap();
        assert_eq!(out.bytes.len(), 16 * 16 * 4);
    }

    #[test]
    fn offload_error_wraps_terrain() {
        let err: OffloadError = TerrainError::EmptyPool.into();
        assert!(matches!(err, OffloadError::Terrain(TerrainError::EmptyPool)));
        assert_eq!(err.to_string(), "op pool has no recipes");
    }
}
