//! Batch orchestration: one slot per requested image, issued one at a time
//! with a fixed delay, settled independently.
//!
//! ```no_run
//! use genpix::batch::Orchestrator;
//! use genpix::{AspectRatio, GenerationRequest, PollinationsProvider};
//!
//! #[tokio::main]
//! async fn main() -> genpix::Result<()> {
//!     let provider = PollinationsProvider::builder().build()?;
//!     let orchestrator = Orchestrator::builder(provider).output_dir("out").build();
//!
//!     let request = GenerationRequest::new("cat", 3, "16/9".parse::<AspectRatio>()?)?;
//!     let report = orchestrator.run(&request).await?;
//!     println!("{} of {} images ready", report.succeeded, report.requested);
//!     Ok(())
//! }
//! ```

use crate::error::{GenPixError, Result};
use crate::image::{
    image_dimensions, Dimensions, GeneratedImage, GenerationRequest, ImageProvider, ImageRequest,
    DEFAULT_BASE_SIZE,
};
use rand::Rng;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::sync::broadcast;

/// Delay between issuing consecutive requests, to stay under the service's rate limit.
pub const DEFAULT_ISSUE_INTERVAL: Duration = Duration::from_secs(5);

/// Exclusive upper bound of per-request seeds.
pub const SEED_RANGE: u64 = 1_000_000;

/// Status text shown for a slot whose request failed.
pub const FAILED_STATUS_TEXT: &str = "Generation failed!";

/// Status text shown while a slot is waiting for its image.
pub const PENDING_STATUS_TEXT: &str = "Generating...";

const UPDATE_CHANNEL_CAPACITY: usize = 64;

/// Lifecycle of a single slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotState {
    Pending,
    Ready,
    Failed(String),
}

impl SlotState {
    pub fn is_settled(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// One placeholder/result unit in the gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageSlot {
    pub index: usize,
    pub state: SlotState,
    /// Where the image can be found: a file path or a `data:` URL.
    pub result_url: Option<String>,
}

impl ImageSlot {
    fn pending(index: usize) -> Self {
        Self {
            index,
            state: SlotState::Pending,
            result_url: None,
        }
    }

    /// Text a front end shows for this slot, if any.
    pub fn status_text(&self) -> Option<&'static str> {
        match self.state {
            SlotState::Pending => Some(PENDING_STATUS_TEXT),
            SlotState::Ready => None,
            SlotState::Failed(_) => Some(FAILED_STATUS_TEXT),
        }
    }
}

/// Emitted whenever the gallery changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotUpdate {
    /// The gallery was cleared and refilled with `count` pending slots.
    Reset { count: usize, dimensions: Dimensions },
    /// One slot settled.
    Settled(ImageSlot),
}

/// The set of slots for the current batch.
///
/// Cheap to clone; clones share the same slots.
#[derive(Debug, Clone)]
pub struct Gallery {
    inner: Arc<Mutex<GalleryState>>,
    updates: broadcast::Sender<SlotUpdate>,
}

#[derive(Debug, Default)]
struct GalleryState {
    /// Bumped on every reset; tasks from earlier batches carry a stale value.
    generation: u64,
    slots: Vec<ImageSlot>,
}

impl Default for Gallery {
    fn default() -> Self {
        Self::new()
    }
}

impl Gallery {
    pub fn new() -> Self {
        let (updates, _) = broadcast::channel(UPDATE_CHANNEL_CAPACITY);
        Self {
            inner: Arc::new(Mutex::new(GalleryState::default())),
            updates,
        }
    }

    /// Receives every update made after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<SlotUpdate> {
        self.updates.subscribe()
    }

    /// Snapshot of all slots, in index order.
    pub fn slots(&self) -> Vec<ImageSlot> {
        self.lock().slots.clone()
    }

    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, GalleryState> {
        // Slots stay consistent even if a holder panicked mid-update.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replaces all slots with `count` pending ones and returns the new generation.
    fn reset(&self, count: usize, dimensions: Dimensions) -> u64 {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.slots = (0..count).map(ImageSlot::pending).collect();
            state.generation
        };
        let _ = self.updates.send(SlotUpdate::Reset { count, dimensions });
        generation
    }

    /// Moves a pending slot of batch `generation` to its final state.
    /// Returns false if the batch was replaced, or the slot does not exist
    /// or has already settled.
    fn settle(
        &self,
        generation: u64,
        index: usize,
        state: SlotState,
        result_url: Option<String>,
    ) -> bool {
        let settled = {
            let mut inner = self.lock();
            if inner.generation != generation {
                return false;
            }
            match inner.slots.get_mut(index) {
                Some(slot) if !slot.state.is_settled() => {
                    slot.state = state;
                    slot.result_url = result_url;
                    slot.clone()
                }
                _ => return false,
            }
        };
        let _ = self.updates.send(SlotUpdate::Settled(settled));
        true
    }
}

/// The submit control: closed while a batch runs, open otherwise.
#[derive(Debug, Clone)]
pub struct SubmitGate {
    enabled: Arc<AtomicBool>,
}

impl Default for SubmitGate {
    fn default() -> Self {
        Self {
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }
}

impl SubmitGate {
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    /// Closes the gate until the returned guard is dropped.
    fn close(&self) -> Result<SubmitGuard> {
        self.enabled
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| GenPixError::Busy)?;
        Ok(SubmitGuard {
            enabled: Arc::clone(&self.enabled),
        })
    }
}

struct SubmitGuard {
    enabled: Arc<AtomicBool>,
}

impl Drop for SubmitGuard {
    fn drop(&mut self) {
        self.enabled.store(true, Ordering::SeqCst);
    }
}

/// Outcome of a finished batch.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub dimensions: Dimensions,
    pub slots: Vec<ImageSlot>,
}

/// Builder for [`Orchestrator`].
pub struct OrchestratorBuilder {
    provider: Arc<dyn ImageProvider>,
    issue_interval: Duration,
    base_size: u32,
    output_dir: Option<PathBuf>,
    gallery: Gallery,
}

impl OrchestratorBuilder {
    /// Delay between issuing consecutive requests.
    pub fn issue_interval(mut self, interval: Duration) -> Self {
        self.issue_interval = interval;
        self
    }

    /// Side of the square whose area each image matches.
    pub fn base_size(mut self, base_size: u32) -> Self {
        self.base_size = base_size;
        self
    }

    /// Save images here instead of keeping them as `data:` URLs.
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    /// Use an existing gallery, e.g. one a front end already subscribed to.
    pub fn gallery(mut self, gallery: Gallery) -> Self {
        self.gallery = gallery;
        self
    }

    pub fn build(self) -> Orchestrator {
        Orchestrator {
            provider: self.provider,
            issue_interval: self.issue_interval,
            base_size: self.base_size,
            output_dir: self.output_dir,
            gallery: self.gallery,
            gate: SubmitGate::default(),
        }
    }
}

/// Drives batches of image requests against a provider.
pub struct Orchestrator {
    provider: Arc<dyn ImageProvider>,
    issue_interval: Duration,
    base_size: u32,
    output_dir: Option<PathBuf>,
    gallery: Gallery,
    gate: SubmitGate,
}

impl Orchestrator {
    pub fn builder(provider: impl ImageProvider + 'static) -> OrchestratorBuilder {
        Self::builder_shared(Arc::new(provider))
    }

    pub fn builder_shared(provider: Arc<dyn ImageProvider>) -> OrchestratorBuilder {
        OrchestratorBuilder {
            provider,
            issue_interval: DEFAULT_ISSUE_INTERVAL,
            base_size: DEFAULT_BASE_SIZE,
            output_dir: None,
            gallery: Gallery::new(),
        }
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn submit_gate(&self) -> &SubmitGate {
        &self.gate
    }

    /// Runs one batch to completion.
    ///
    /// Invalid input is rejected before the gallery or the gate is touched.
    /// Per-image failures never fail the batch; they are reported per slot.
    pub async fn run(&self, request: &GenerationRequest) -> Result<BatchReport> {
        request.validate()?;
        let dimensions = image_dimensions(request.aspect_ratio, self.base_size)?;
        let _guard = self.gate.close()?;

        let count = request.count as usize;
        let generation = self.gallery.reset(count, dimensions);
        tracing::info!(
            count,
            %dimensions,
            ratio = %request.aspect_ratio,
            "starting batch"
        );

        // Saved files share a batch timestamp so slots sort together.
        let batch_stamp = chrono::Utc::now().timestamp_millis();
        let mut handles = Vec::with_capacity(count);

        for index in 0..count {
            let seed = rand::thread_rng().gen_range(0..SEED_RANGE);
            let image_request = ImageRequest::new(
                request.prompt.trim(),
                dimensions.width,
                dimensions.height,
                seed,
            );
            let provider = Arc::clone(&self.provider);
            let gallery = self.gallery.clone();
            let output_path = self
                .output_dir
                .as_deref()
                .map(|dir| dir.join(format!("{batch_stamp}-{index}")));

            tracing::debug!(index, seed, "issuing request");
            handles.push(tokio::spawn(async move {
                let outcome = provider
                    .generate(&image_request)
                    .await
                    .and_then(|image| store(image, output_path));
                settle(&gallery, generation, index, outcome);
            }));

            if index + 1 < count {
                tokio::time::sleep(self.issue_interval).await;
            }
        }

        for (index, handle) in handles.into_iter().enumerate() {
            if let Err(e) = handle.await {
                tracing::error!(index, "image task aborted: {e}");
                self.gallery.settle(
                    generation,
                    index,
                    SlotState::Failed(format!("task failed: {e}")),
                    None,
                );
            }
        }

        let slots = self.gallery.slots();
        let succeeded = slots
            .iter()
            .filter(|s| s.state == SlotState::Ready)
            .count();
        let failed = slots.len() - succeeded;

        if failed == 0 {
            tracing::info!(count, "all images generated successfully");
        } else {
            tracing::warn!(count, succeeded, failed, "batch finished with failures");
        }

        Ok(BatchReport {
            requested: count,
            succeeded,
            failed,
            dimensions,
            slots,
        })
    }
}

/// Persists the image if an output location is configured and returns its reference.
fn store(image: GeneratedImage, output: Option<PathBuf>) -> Result<String> {
    match output {
        Some(stem) => {
            if let Some(parent) = stem.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let path = stem.with_extension(image.format.extension());
            image.save(&path)?;
            Ok(path.display().to_string())
        }
        None => Ok(image.to_data_url()),
    }
}

fn settle(gallery: &Gallery, generation: u64, index: usize, outcome: Result<String>) {
    let (state, result_url) = match outcome {
        Ok(url) => {
            tracing::debug!(index, "image ready");
            (SlotState::Ready, Some(url))
        }
        Err(e) => {
            if e.is_slot_failure() {
                tracing::warn!(index, "error generating image: {e}");
            } else {
                tracing::error!(index, "unexpected error generating image: {e}");
            }
            (SlotState::Failed(e.to_string()), None)
        }
    };
    if !gallery.settle(generation, index, state, result_url) {
        tracing::debug!(index, generation, "dropping result for a settled slot or replaced batch");
    }
}
