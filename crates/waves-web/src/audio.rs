use std::cell::Cell;
use std::rc::Rc;
use waves_core::constants::{ANALYSER_FFT_SIZE, AUDIO_TRACK_URL};
use waves_core::FrequencySource;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

fn js_err(what: &str, e: wasm_bindgen::JsValue) -> anyhow::Error {
    anyhow::anyhow!("{} failed: {:?}", what, e)
}

/// The music track routed through an analyser to the speakers.
///
/// audio element -> media source -> analyser -> destination
pub struct AnalyserSource {
    ctx: web::AudioContext,
    analyser: web::AnalyserNode,
    element: web::HtmlAudioElement,
    buf: Vec<u8>,
    ended: Rc<Cell<bool>>,
    // keeps the "ended" listener alive for the element's lifetime
    on_ended: Closure<dyn FnMut()>,
}

impl AnalyserSource {
    /// Build the graph and start playback. Must run from a user gesture.
    pub async fn open() -> anyhow::Result<Self> {
        Self::open_url(AUDIO_TRACK_URL).await
    }

    pub async fn open_url(url: &str) -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new().map_err(|e| js_err("AudioContext", e))?;
        match Self::connect(ctx.clone(), url).await {
            Ok(source) => Ok(source),
            Err(e) => {
                // Drop never runs for a half-built source
                let _ = ctx.close();
                Err(e)
            }
        }
    }

    async fn connect(ctx: web::AudioContext, url: &str) -> anyhow::Result<Self> {
        let element =
            web::HtmlAudioElement::new_with_src(url).map_err(|e| js_err("audio element", e))?;
        element.set_cross_origin(Some("anonymous"));

        let analyser = ctx
            .create_analyser()
            .map_err(|e| js_err("AnalyserNode", e))?;
        analyser.set_fft_size(ANALYSER_FFT_SIZE);
        let source = ctx
            .create_media_element_source(&element)
            .map_err(|e| js_err("MediaElementAudioSourceNode", e))?;
        source
            .connect_with_audio_node(&analyser)
            .map_err(|e| js_err("connect source", e))?;
        analyser
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| js_err("connect analyser", e))?;

        let ended = Rc::new(Cell::new(false));
        let flag = ended.clone();
        let on_ended = Closure::wrap(Box::new(move || {
            log::info!("[audio] track ended");
            flag.set(true);
        }) as Box<dyn FnMut()>);
        element
            .add_event_listener_with_callback("ended", on_ended.as_ref().unchecked_ref())
            .map_err(|e| js_err("ended listener", e))?;

        // Some browsers create the context suspended even inside a gesture
        if let Ok(p) = ctx.resume() {
            let _ = JsFuture::from(p).await;
        }
        let play = element.play().map_err(|e| js_err("play", e))?;
        JsFuture::from(play).await.map_err(|e| js_err("play", e))?;
        log::info!(
            "[audio] playing {} ({} bins @ {} Hz)",
            url,
            analyser.frequency_bin_count(),
            ctx.sample_rate()
        );

        let bins = analyser.frequency_bin_count() as usize;
        Ok(Self {
            ctx,
            analyser,
            element,
            buf: vec![0; bins],
            ended,
            on_ended,
        })
    }

    pub fn close(&self) {
        let _ = self.element.pause();
        let _ = self.ctx.close();
    }
}

impl FrequencySource for AnalyserSource {
    fn frequency_data(&mut self, out: &mut [u8]) {
        self.analyser.get_byte_frequency_data(&mut self.buf);
        let n = out.len().min(self.buf.len());
        out[..n].copy_from_slice(&self.buf[..n]);
        out[n..].fill(0);
    }

    fn ended(&self) -> bool {
        self.ended.get() || self.element.ended()
    }
}

impl Drop for AnalyserSource {
    fn drop(&mut self) {
        let _ = self
            .element
            .remove_event_listener_with_callback("ended", self.on_ended.as_ref().unchecked_ref());
        self.close();
    }
}
