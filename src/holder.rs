//! Sample holder registry and selection state.
//!
//! A [`SampleHolder`] owns the manipulator frame tree (a zero-origin
//! manipulator frame with an attachment frame at the holder mounting point),
//! an optional holder geometry, and the registry of declared samples with
//! their resolved frames. Selection changes are broadcast to subscribers
//! over channels.
//!
//! Registry invariant: every sample id has both a metadata entry and a
//! resolved frame, and a selection is always present in one of the two
//! registries (samples or holder targets).

use std::path::Path;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};

use fxhash::FxHashMap;

use super::affine::Frame;
use super::bars::HolderGeometry;
use super::error::{FrameError, HolderError, SampleError};
use super::sample::{Sample, SampleFrame, SampleMap, SampleOrigin, SamplePosition, SampleSpec};

/// Broadcast whenever the selected sample changes.
#[derive(Debug, Clone)]
pub enum SelectionEvent {
    Selected(Sample),
    Cleared,
}

struct HolderState {
    holder: Option<Box<dyn HolderGeometry>>,
    samples: FxHashMap<String, Sample>,
    sample_frames: FxHashMap<String, SampleFrame>,
    holder_md: FxHashMap<String, Sample>,
    holder_frames: FxHashMap<String, SampleFrame>,
    current: Option<(Sample, SampleFrame)>,
    subscribers: Vec<Sender<SelectionEvent>>,
}

impl HolderState {
    fn notify(&mut self, event: SelectionEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    fn clear_selection(&mut self) {
        if self.current.take().is_some() {
            self.notify(SelectionEvent::Cleared);
        }
    }

    fn add_sample(&mut self, sample_id: &str, spec: SampleSpec) -> Result<(), HolderError> {
        let frame = match spec.origin {
            SampleOrigin::Absolute => SampleFrame::Absolute(spec.position.coordinates.clone()),
            SampleOrigin::Holder => {
                let holder = self.holder.as_ref().ok_or(SampleError::NoHolder)?;
                holder.make_sample_frame(&spec.position)?
            }
        };
        self.samples
            .insert(sample_id.to_string(), Sample::from_spec(sample_id, spec));
        self.sample_frames.insert(sample_id.to_string(), frame);
        Ok(())
    }

    fn clear_samples(&mut self) {
        let selected_sample = self
            .current
            .as_ref()
            .map(|(sample, _)| self.samples.contains_key(&sample.sample_id))
            .unwrap_or(false);
        if selected_sample {
            self.clear_selection();
        }
        self.samples.clear();
        self.sample_frames.clear();
    }

    fn set_sample(&mut self, sample_id: &str) -> Result<Sample, HolderError> {
        let (sample, frame) = if let Some(sample) = self.samples.get(sample_id) {
            (sample.clone(), self.sample_frames[sample_id].clone())
        } else if let Some(sample) = self.holder_md.get(sample_id) {
            (sample.clone(), self.holder_frames[sample_id].clone())
        } else {
            return Err(SampleError::UnknownSample(sample_id.to_string()).into());
        };
        self.current = Some((sample.clone(), frame));
        self.notify(SelectionEvent::Selected(sample.clone()));
        Ok(sample)
    }

    fn load_sample_dict(&mut self, specs: SampleMap, clear: bool) -> Result<(), HolderError> {
        if clear {
            self.clear_samples();
        }
        for (sample_id, spec) in specs {
            self.add_sample(&sample_id, spec)?;
        }
        Ok(())
    }
}

/// A manipulator-mounted sample holder with a sample registry.
pub struct SampleHolder {
    manip_frame: Arc<Frame>,
    attachment_frame: Arc<Frame>,
    state: Mutex<HolderState>,
}

impl SampleHolder {
    /// Create a holder mount. `attachment_point` is the manipulator
    /// coordinate that brings the holder attachment point into the beam.
    pub fn new(attachment_point: &[f64]) -> Result<Self, FrameError> {
        let manip_frame = Frame::anchored(&vec![0.0; attachment_point.len()])?;
        let attachment_frame = Frame::make_child_frame(&manip_frame, Vec::new(), attachment_point)?;
        Ok(SampleHolder {
            manip_frame,
            attachment_frame,
            state: Mutex::new(HolderState {
                holder: None,
                samples: FxHashMap::default(),
                sample_frames: FxHashMap::default(),
                holder_md: FxHashMap::default(),
                holder_frames: FxHashMap::default(),
                current: None,
                subscribers: Vec::new(),
            }),
        })
    }

    fn state(&self) -> MutexGuard<'_, HolderState> {
        self.state.lock().unwrap_or_else(|poison| poison.into_inner())
    }

    /// The fixed zero-origin manipulator frame at the root of the tree.
    pub fn manip_frame(&self) -> &Arc<Frame> {
        &self.manip_frame
    }

    /// The frame at the holder mounting point.
    pub fn attachment_frame(&self) -> &Arc<Frame> {
        &self.attachment_frame
    }

    /// Mount a holder geometry, generating its frames under the attachment
    /// frame and registering its findable targets.
    pub fn set_holder(&self, holder: Option<Box<dyn HolderGeometry>>) -> Result<(), HolderError> {
        let mut state = self.state();
        match holder {
            Some(mut holder) => {
                holder.generate_geometry(&self.attachment_frame)?;
                let (holder_md, holder_frames) = holder.holder_targets();
                spdlog::info!(
                    "attached a sample holder with {} built-in targets",
                    holder_md.len()
                );
                state.holder_md = holder_md;
                state.holder_frames = holder_frames;
                state.holder = Some(holder);
            }
            None => {
                state.holder = None;
                state.holder_md.clear();
                state.holder_frames.clear();
            }
        }
        Ok(())
    }

    /// Remove the holder along with every registered sample and the current
    /// selection.
    pub fn clear_holder(&self) {
        let mut state = self.state();
        spdlog::info!("removing the sample holder and all registered samples");
        state.holder = None;
        state.holder_md.clear();
        state.holder_frames.clear();
        state.samples.clear();
        state.sample_frames.clear();
        state.clear_selection();
    }

    pub fn has_holder(&self) -> bool {
        self.state().holder.is_some()
    }

    /// Register a sample, resolving its declared position through the
    /// holder geometry (or verbatim for absolute samples).
    pub fn add_sample(&self, sample_id: &str, spec: SampleSpec) -> Result<(), HolderError> {
        self.state().add_sample(sample_id, spec)
    }

    /// Remove a sample, clearing the selection if it was selected.
    pub fn remove_sample(&self, sample_id: &str) -> Result<(), HolderError> {
        let mut state = self.state();
        if state.samples.remove(sample_id).is_none() {
            return Err(SampleError::UnknownSample(sample_id.to_string()).into());
        }
        state.sample_frames.remove(sample_id);
        let was_selected = state
            .current
            .as_ref()
            .map(|(sample, _)| sample.sample_id == sample_id)
            .unwrap_or(false);
        if was_selected {
            state.clear_selection();
        }
        Ok(())
    }

    /// Select a sample by id, from the sample registry or the holder's
    /// built-in targets.
    pub fn set_sample(&self, sample_id: &str) -> Result<(), HolderError> {
        let sample = self.state().set_sample(sample_id)?;
        spdlog::info!("selected sample {} ({})", sample.sample_id, sample.name);
        Ok(())
    }

    /// Remove all registered samples. Holder targets stay available.
    pub fn clear_samples(&self) {
        self.state().clear_samples();
    }

    /// Register a batch of sample definitions, optionally clearing first.
    pub fn load_sample_dict(&self, specs: SampleMap, clear: bool) -> Result<(), HolderError> {
        self.state().load_sample_dict(specs, clear)
    }

    /// Load sample definitions from a file in a format the mounted holder
    /// understands.
    pub fn load_sample_file(&self, path: &Path, clear: bool) -> Result<(), HolderError> {
        let mut state = self.state();
        let holder = state.holder.as_ref().ok_or(SampleError::NoHolder)?;
        let specs = holder.read_sample_file(path)?;
        spdlog::info!("loaded {} samples from {:?}", specs.len(), path);
        state.load_sample_dict(specs, clear)
    }

    /// Rebuild every sample frame from the stored metadata, for example
    /// after remounting a holder.
    pub fn reload_sample_frames(&self) -> Result<(), HolderError> {
        let mut state = self.state();
        let mut frames = FxHashMap::default();
        for (sample_id, sample) in &state.samples {
            let frame = match sample.origin {
                SampleOrigin::Absolute => {
                    SampleFrame::Absolute(sample.position.coordinates.clone())
                }
                SampleOrigin::Holder => {
                    let holder = state.holder.as_ref().ok_or(SampleError::NoHolder)?;
                    holder.make_sample_frame(&sample.position)?
                }
            };
            frames.insert(sample_id.clone(), frame);
        }
        state.sample_frames = frames;
        Ok(())
    }

    /// Register the manipulator's current real position as an absolute
    /// sample.
    pub fn add_current_position_as_sample(
        &self,
        sample_id: &str,
        name: &str,
        description: Option<&str>,
        real_position: &[f64],
    ) -> Result<(), HolderError> {
        let spec = SampleSpec {
            name: name.to_string(),
            description: description.map(str::to_string),
            position: SamplePosition {
                side: None,
                coordinates: real_position.to_vec(),
                thickness: None,
            },
            origin: SampleOrigin::Absolute,
            extra: Default::default(),
        };
        self.add_sample(sample_id, spec)
    }

    pub fn current_sample(&self) -> Option<Sample> {
        self.state().current.as_ref().map(|(sample, _)| sample.clone())
    }

    /// The frame of the current selection, falling back to the attachment
    /// frame when nothing is selected.
    pub fn current_frame(&self) -> SampleFrame {
        self.state()
            .current
            .as_ref()
            .map(|(_, frame)| frame.clone())
            .unwrap_or_else(|| SampleFrame::Resolved(Arc::clone(&self.attachment_frame)))
    }

    pub fn selection(&self) -> Option<(Sample, SampleFrame)> {
        self.state().current.clone()
    }

    /// Snapshot of the registered samples.
    pub fn samples(&self) -> FxHashMap<String, Sample> {
        self.state().samples.clone()
    }

    /// Subscribe to selection changes.
    pub fn subscribe(&self) -> Receiver<SelectionEvent> {
        let (tx, rx) = channel();
        self.state().subscribers.push(tx);
        rx
    }
}
