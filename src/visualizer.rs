use crate::audio::{self, WebAnalysis};
use crate::constants::*;
use crate::core::{
    AnalysisHandle, AudioSample, AudioSamplingPipeline, BarFrame, RadialParticleSimulator,
    VisualizerConfig, BAR_COUNT, SAMPLE_LEN, VISUALIZER_SIZE_PX,
};
use crate::dom::{self, Listener};
use crate::events;
use crate::frame::FrameLoop;
use glam::Vec2;
use std::cell::{Cell, RefCell};
use std::f64::consts::TAU;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

/// One play-through of the engine clip. Dropping it silences the element.
struct PlaybackSession {
    handle: AnalysisHandle,
    element: web::HtmlAudioElement,
    ended: Rc<Cell<bool>>,
    _ended_listener: Option<Listener>,
}

impl Drop for PlaybackSession {
    fn drop(&mut self) {
        audio::pause(&self.element);
    }
}

struct VisualizerState {
    document: web::Document,
    canvas: web::HtmlCanvasElement,
    ctx: web::CanvasRenderingContext2d,
    pipeline: AudioSamplingPipeline<WebAnalysis>,
    session: Option<PlaybackSession>,
    simulator: RadialParticleSimulator,
    silence: AudioSample,
}

impl VisualizerState {
    fn is_playing(&self) -> bool {
        self.session.is_some()
    }

    fn toggle(&mut self) -> bool {
        if self.is_playing() {
            self.stop();
        } else {
            self.play();
        }
        self.refresh_button();
        self.is_playing()
    }

    /// A media element feeds only one analysis graph, so every play gets a
    /// new element; a refused graph is retried with another one.
    fn play(&mut self) {
        for attempt in 1..=AUDIO_CONNECT_ATTEMPTS {
            let Some(element) = audio::fresh_audio_element(ENGINE_AUDIO_SRC) else {
                return;
            };
            match self.pipeline.start(&element) {
                Ok(handle) => {
                    let ended = Rc::new(Cell::new(false));
                    let flag = ended.clone();
                    let listener = dom::listen(element.as_ref(), "ended", move |_: web::Event| {
                        flag.set(true);
                    });
                    audio::play(&element);
                    self.session = Some(PlaybackSession {
                        handle,
                        element,
                        ended,
                        _ended_listener: listener,
                    });
                    log::info!("[audio] playing {}", ENGINE_AUDIO_SRC);
                    return;
                }
                Err(e) if e.needs_fresh_source() && attempt < AUDIO_CONNECT_ATTEMPTS => {
                    log::warn!("[audio] {} (attempt {}), retrying with a fresh element", e, attempt);
                }
                Err(e) => {
                    log::error!("[audio] {}", e);
                    return;
                }
            }
        }
    }

    fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            self.pipeline.stop(session.handle);
            log::info!("[audio] stopped");
        }
    }

    fn refresh_button(&self) {
        let label = if self.is_playing() { "Pause" } else { "Play" };
        dom::set_text(&self.document, VISUALIZER_TOGGLE_ID, label);
    }

    fn frame(&mut self) {
        if self.session.as_ref().is_some_and(|s| s.ended.get()) {
            self.stop();
            self.refresh_button();
        }
        let size = self.canvas.width().min(self.canvas.height()) as f32;
        let config = VisualizerConfig::for_canvas(size);
        let sample = match &self.session {
            Some(s) => self.pipeline.sample(s.handle),
            None => &self.silence,
        };
        let bars = self.simulator.tick(sample, BAR_COUNT, &config);
        draw(&self.ctx, &self.canvas, bars, &config);
    }
}

fn draw(
    ctx: &web::CanvasRenderingContext2d,
    canvas: &web::HtmlCanvasElement,
    bars: &[BarFrame],
    config: &VisualizerConfig,
) {
    let w = canvas.width() as f64;
    let h = canvas.height() as f64;
    ctx.clear_rect(0.0, 0.0, w, h);
    let center = Vec2::new((w / 2.0) as f32, (h / 2.0) as f32);

    ctx.set_line_width(VIZ_LINE_WIDTH);
    ctx.set_stroke_style_str(VIZ_RING_COLOR);
    for r in [config.max_radius, config.inner_radius] {
        ctx.begin_path();
        _ = ctx.arc(center.x as f64, center.y as f64, r as f64, 0.0, TAU);
        ctx.stroke();
    }

    ctx.set_stroke_style_str(VIZ_ACCENT_COLOR);
    ctx.begin_path();
    for bar in bars {
        let (a, b) = bar.segment(center, config.inner_radius);
        ctx.move_to(a.x as f64, a.y as f64);
        ctx.line_to(b.x as f64, b.y as f64);
    }
    ctx.stroke();

    // plates sit across the bar direction
    ctx.set_stroke_style_str(VIZ_RING_COLOR);
    ctx.begin_path();
    for bar in bars {
        let p = bar.plate_point(center);
        let t = Vec2::from_angle(bar.angle).perp() * VIZ_PLATE_WIDTH as f32;
        ctx.move_to((p.x - t.x) as f64, (p.y - t.y) as f64);
        ctx.line_to((p.x + t.x) as f64, (p.y + t.y) as f64);
    }
    ctx.stroke();
}

struct VisualizerRuntime {
    state: Rc<RefCell<VisualizerState>>,
    frame: FrameLoop,
    _listeners: Vec<Listener>,
}

/// The mounted audio visualizer. Unmounting stops the loop, the audio and
/// the analysis session.
#[wasm_bindgen]
pub struct VisualizerHandle {
    inner: Option<VisualizerRuntime>,
}

#[wasm_bindgen]
impl VisualizerHandle {
    /// Play or pause the engine clip. Returns whether it is now playing.
    pub fn toggle_playback(&self) -> bool {
        match &self.inner {
            Some(rt) => rt.state.borrow_mut().toggle(),
            None => false,
        }
    }

    pub fn is_playing(&self) -> bool {
        self.inner
            .as_ref()
            .is_some_and(|rt| rt.state.borrow().is_playing())
    }

    pub fn unmount(&mut self) {
        if let Some(rt) = self.inner.take() {
            rt.frame.stop();
            let mut st = rt.state.borrow_mut();
            st.stop();
            st.pipeline.shutdown();
            log::info!("[audio] visualizer unmounted");
        }
    }
}

fn mount(canvas_id: &str) -> anyhow::Result<VisualizerHandle> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, canvas_id)?;
    if canvas.width() == 0 || canvas.height() == 0 {
        canvas.set_width(VISUALIZER_SIZE_PX as u32);
        canvas.set_height(VISUALIZER_SIZE_PX as u32);
    }
    let ctx = canvas
        .get_context("2d")
        .map_err(|e| anyhow::anyhow!("{:?}", e))?
        .ok_or_else(|| anyhow::anyhow!("2d context unavailable"))?
        .dyn_into::<web::CanvasRenderingContext2d>()
        .map_err(|e| anyhow::anyhow!("{:?}", e))?;

    let state = Rc::new(RefCell::new(VisualizerState {
        document: document.clone(),
        canvas,
        ctx,
        pipeline: AudioSamplingPipeline::new(WebAnalysis::default()),
        session: None,
        simulator: RadialParticleSimulator::new(),
        silence: AudioSample::silent(SAMPLE_LEN),
    }));
    state.borrow().refresh_button();

    let mut listeners = Vec::new();
    let s = state.clone();
    listeners.extend(dom::add_click_listener(&document, VISUALIZER_TOGGLE_ID, move || {
        s.borrow_mut().toggle();
    }));
    let s = state.clone();
    listeners.extend(events::wire_playback_key(move || {
        s.borrow_mut().toggle();
    }));

    let s = state.clone();
    let frame = FrameLoop::start(move || s.borrow_mut().frame());

    log::info!("[audio] visualizer mounted on #{}", canvas_id);
    Ok(VisualizerHandle {
        inner: Some(VisualizerRuntime {
            state,
            frame,
            _listeners: listeners,
        }),
    })
}

/// Mount the radial visualizer on `canvas_id` (default `visualizer-canvas`).
#[wasm_bindgen]
pub fn mount_visualizer(canvas_id: Option<String>) -> Result<VisualizerHandle, JsValue> {
    let id = canvas_id.unwrap_or_else(|| VISUALIZER_CANVAS_ID.to_string());
    mount(&id).map_err(|e| {
        log::error!("[audio] visualizer init error: {:?}", e);
        JsValue::from_str(&format!("{:#}", e))
    })
}
