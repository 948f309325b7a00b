use crate::core::{AnalysisBackend, ShowroomError, ANALYSER_FFT_SIZE, SILENCE_BYTE};
use web_sys as web;

/// WebAudio analysis graph: media element -> analyser -> speakers.
///
/// A media element can feed only one source node for its lifetime, so a
/// second `connect` with the same element is refused by the browser; the
/// caller then builds a fresh element (see [`fresh_audio_element`]).
#[derive(Default)]
pub struct WebAnalysis {
    ctx: Option<web::AudioContext>,
    source: Option<web::MediaElementAudioSourceNode>,
    analyser: Option<web::AnalyserNode>,
}

fn graph_err(stage: &str, e: wasm_bindgen::JsValue) -> ShowroomError {
    ShowroomError::AudioGraph(format!("{}: {:?}", stage, e))
}

impl WebAnalysis {
    fn build(&mut self, element: &web::HtmlAudioElement) -> Result<(), ShowroomError> {
        let ctx = web::AudioContext::new().map_err(|e| graph_err("AudioContext", e))?;
        // keep the context around so a failure below still closes it
        self.ctx = Some(ctx.clone());
        let analyser = web::AnalyserNode::new(&ctx).map_err(|e| graph_err("AnalyserNode", e))?;
        analyser.set_fft_size(ANALYSER_FFT_SIZE);
        let source = ctx
            .create_media_element_source(element)
            .map_err(|e| graph_err("MediaElementSource", e))?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(|e| graph_err("connect source", e))?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| graph_err("connect destination", e))?;
        _ = ctx.resume();
        self.source = Some(source);
        self.analyser = Some(analyser);
        Ok(())
    }
}

impl AnalysisBackend for WebAnalysis {
    type Source = web::HtmlAudioElement;

    fn connect(&mut self, source: &Self::Source) -> Result<(), ShowroomError> {
        let res = self.build(source);
        if res.is_err() {
            self.disconnect();
        }
        res
    }

    fn read_time_domain(&mut self, out: &mut [u8]) {
        match &self.analyser {
            Some(a) => {
                let bins = a.frequency_bin_count() as usize;
                let n = bins.min(out.len());
                a.get_byte_time_domain_data(&mut out[..n]);
            }
            None => out.fill(SILENCE_BYTE),
        }
    }

    fn disconnect(&mut self) {
        if let Some(src) = self.source.take() {
            _ = src.disconnect();
        }
        if let Some(a) = self.analyser.take() {
            _ = a.disconnect();
        }
        if let Some(ctx) = self.ctx.take() {
            _ = ctx.close();
        }
    }
}

/// A new `<audio>` element for `src`; each playback session gets its own.
pub fn fresh_audio_element(src: &str) -> Option<web::HtmlAudioElement> {
    match web::HtmlAudioElement::new_with_src(src) {
        Ok(el) => {
            el.set_preload("auto");
            el.set_cross_origin(Some("anonymous"));
            Some(el)
        }
        Err(e) => {
            log::error!("[audio] cannot create audio element: {:?}", e);
            None
        }
    }
}

pub fn play(element: &web::HtmlAudioElement) {
    // the returned promise rejects on autoplay policy; the button press retries
    if let Err(e) = element.play() {
        log::warn!("[audio] play() failed: {:?}", e);
    }
}

pub fn pause(element: &web::HtmlAudioElement) {
    _ = element.pause();
}
