//! Live waveform sampling over a platform analysis graph.
//!
//! The pipeline owns at most one analysis session at a time. A session goes
//! `Idle -> Connected` when the backend builds its graph, `Connected ->
//! Sampling` on the first pull, and ends in `Closed` on stop. The backend
//! is injected so the state machine runs without a browser.

use crate::core::constants::{SAMPLE_LEN, SAMPLE_REFRESH_FRAMES, SILENCE_BYTE};
use crate::core::error::{Result, ShowroomError};

/// Platform side of the analysis graph (source -> analyser -> output).
pub trait AnalysisBackend {
    type Source;

    /// Build the graph for `source`. A refusal must leave nothing attached.
    fn connect(&mut self, source: &Self::Source) -> Result<()>;
    /// Fill `out` with the current time-domain bytes (`SILENCE_BYTE` = silence).
    fn read_time_domain(&mut self, out: &mut [u8]);
    /// Release every node and context. Called at most once per connect.
    fn disconnect(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    Connected,
    Sampling,
    Closed,
}

/// Identifies one analysis session; handles from older sessions go stale.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnalysisHandle {
    session: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AudioSample {
    bytes: Vec<u8>,
}

impl AudioSample {
    /// A flat waveform, as the analyser reports for a silent source.
    pub fn silent(len: usize) -> Self {
        Self {
            bytes: vec![SILENCE_BYTE; len],
        }
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Byte `i` as amplitude in [0, 1]; missing bytes read as silence.
    #[inline]
    pub fn amplitude(&self, i: usize) -> f32 {
        self.bytes.get(i).copied().unwrap_or(SILENCE_BYTE) as f32 / 255.0
    }
}

pub struct AudioSamplingPipeline<B: AnalysisBackend> {
    backend: B,
    state: PipelineState,
    session: u64,
    refresh_every: u32,
    calls_since_refresh: u32,
    buffer: AudioSample,
}

impl<B: AnalysisBackend> AudioSamplingPipeline<B> {
    pub fn new(backend: B) -> Self {
        Self::with_cadence(backend, SAMPLE_REFRESH_FRAMES, SAMPLE_LEN)
    }

    pub fn with_cadence(backend: B, refresh_every: u32, sample_len: usize) -> Self {
        Self {
            backend,
            state: PipelineState::Idle,
            session: 0,
            refresh_every: refresh_every.max(1),
            calls_since_refresh: 0,
            buffer: AudioSample::silent(sample_len),
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, PipelineState::Connected | PipelineState::Sampling)
    }

    pub fn refresh_every(&self) -> u32 {
        self.refresh_every
    }

    /// Attach to `source`, tearing down any live session first.
    ///
    /// On refusal the pipeline is back in `Idle` and the error asks for a
    /// fresh source; nothing stays attached.
    pub fn start(&mut self, source: &B::Source) -> Result<AnalysisHandle> {
        if self.is_active() {
            log::info!("[audio] replacing live session {}", self.session);
            self.close_session();
        }
        self.state = PipelineState::Idle;
        match self.backend.connect(source) {
            Ok(()) => {
                self.session += 1;
                self.state = PipelineState::Connected;
                self.calls_since_refresh = 0;
                self.buffer = AudioSample::silent(self.buffer.len());
                log::info!("[audio] session {} connected", self.session);
                Ok(AnalysisHandle {
                    session: self.session,
                })
            }
            Err(e) => {
                log::warn!("[audio] connect refused: {}", e);
                Err(match e {
                    ShowroomError::AudioGraph(_) => e,
                    other => ShowroomError::AudioGraph(other.to_string()),
                })
            }
        }
    }

    fn owns(&self, handle: AnalysisHandle) -> bool {
        handle.session == self.session && self.is_active()
    }

    /// Current buffer; refreshed from the backend on the first call and then
    /// once every `refresh_every` calls.
    pub fn sample(&mut self, handle: AnalysisHandle) -> &AudioSample {
        if !self.owns(handle) {
            return &self.buffer;
        }
        let first = self.state == PipelineState::Connected;
        if first || self.calls_since_refresh + 1 >= self.refresh_every {
            self.backend.read_time_domain(&mut self.buffer.bytes);
            self.calls_since_refresh = 0;
            self.state = PipelineState::Sampling;
        } else {
            self.calls_since_refresh += 1;
        }
        &self.buffer
    }

    /// End the session. Safe to repeat. A handle from an older session
    /// leaves the current one alone.
    pub fn stop(&mut self, handle: AnalysisHandle) {
        if handle.session != self.session {
            log::debug!("[audio] stop for stale session {}", handle.session);
            return;
        }
        self.shutdown();
    }

    /// Stop whatever is live, handle or not (unmount path).
    pub fn shutdown(&mut self) {
        if self.is_active() {
            self.close_session();
        }
        self.state = PipelineState::Closed;
    }

    fn close_session(&mut self) {
        self.backend.disconnect();
        self.state = PipelineState::Closed;
        log::info!("[audio] session {} closed", self.session);
    }
}

impl<B: AnalysisBackend> Drop for AudioSamplingPipeline<B> {
    fn drop(&mut self) {
        if self.is_active() {
            self.backend.disconnect();
        }
    }
}
