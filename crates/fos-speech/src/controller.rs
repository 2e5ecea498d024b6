//! Speech Controller
//!
//! Owns the single in-flight utterance. Every new request stops the
//! previous one first; remote synthesis runs as a task on a local
//! executor that the host drives through [`SpeechController::poll`].

use std::time::{Duration, Instant};

use fos_dom::{Document, NodeId};
use smol::{LocalExecutor, Task};

use crate::remote::escape_transport;
use crate::voice::primary_subtag;
use crate::{
    AudioClip, AudioSink, RemoteRequest, RemoteSynthesizer, SpeechError, Utterance,
    VoiceSynthesizer,
};

/// How long the highlight stays after a local utterance ends
pub const HIGHLIGHT_LINGER: Duration = Duration::from_millis(500);

/// Voice parameters for one read request
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechParams {
    pub lang: String,
    pub rate: f64,
    pub volume: f64,
    pub pitch: f64,
}

impl Default for SpeechParams {
    fn default() -> Self {
        Self { lang: "en".into(), rate: 1.0, volume: 0.8, pitch: 1.0 }
    }
}

/// Which path a read request took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeechRoute {
    /// Spoken by a local voice
    Local,
    /// Sent to the remote synthesizer
    Remote,
    /// Nothing to read, or no provider able to read it
    Skipped,
}

struct PendingSynthesis {
    task: Task<Result<AudioClip, SpeechError>>,
    volume: f64,
}

/// Screen-reading controller
pub struct SpeechController {
    synth: Box<dyn VoiceSynthesizer>,
    sink: Box<dyn AudioSink>,
    remote: Option<Box<dyn RemoteSynthesizer>>,
    executor: LocalExecutor<'static>,
    pending: Option<PendingSynthesis>,
    highlight_class: String,
    speaking: Option<NodeId>,
    release_at: Option<Instant>,
}

impl SpeechController {
    pub fn new(
        synth: Box<dyn VoiceSynthesizer>,
        sink: Box<dyn AudioSink>,
        remote: Option<Box<dyn RemoteSynthesizer>>,
    ) -> Self {
        Self {
            synth,
            sink,
            remote,
            executor: LocalExecutor::new(),
            pending: None,
            highlight_class: "speech-highlight".into(),
            speaking: None,
            release_at: None,
        }
    }
    
    /// Class put on the node being read
    pub fn set_highlight_class(&mut self, class: &str) {
        self.highlight_class = class.to_string();
    }
    
    pub fn highlight_class(&self) -> &str {
        &self.highlight_class
    }
    
    /// Node currently highlighted, if any
    pub fn speaking(&self) -> Option<NodeId> {
        self.speaking
    }
    
    /// A remote synthesis is still in flight
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }
    
    /// Read `node` aloud, preempting anything already playing
    pub fn speak(&mut self, doc: &mut Document, node: NodeId, params: &SpeechParams) -> SpeechRoute {
        let text = doc.inner_text(node);
        if text.is_empty() {
            return SpeechRoute::Skipped;
        }
        
        let wanted = primary_subtag(&params.lang);
        let voice = self.synth.voices()
            .into_iter()
            .find(|v| primary_subtag(&v.lang).eq_ignore_ascii_case(wanted));
        
        self.stop(doc);
        
        if let Some(voice) = voice {
            tracing::debug!("speaking {:?} with local voice {}", node, voice.name);
            self.highlight(doc, node);
            let lang = voice.lang.clone();
            self.synth.speak(Utterance {
                text,
                voice,
                lang,
                rate: params.rate,
                volume: params.volume,
                pitch: params.pitch,
            });
            return SpeechRoute::Local;
        }
        
        let Some(remote) = self.remote.as_ref() else {
            tracing::warn!("no local voice for {} and no remote synthesizer", params.lang);
            return SpeechRoute::Skipped;
        };
        
        let future = remote.synthesize(RemoteRequest {
            text: escape_transport(&text),
            lang: params.lang.clone(),
            rate: params.rate,
            volume: params.volume,
        });
        self.pending = Some(PendingSynthesis {
            task: self.executor.spawn(future),
            volume: params.volume,
        });
        self.highlight(doc, node);
        SpeechRoute::Remote
    }
    
    /// Cancel local synthesis and any remote task, stop playback and clear
    /// every highlight.
    pub fn stop(&mut self, doc: &mut Document) {
        // dropping the task cancels it
        if self.pending.take().is_some() {
            tracing::debug!("cancelled pending remote synthesis");
        }
        self.synth.cancel();
        self.sink.stop();
        
        let root = doc.tree().root();
        for id in doc.elements_with_class(root, &self.highlight_class) {
            doc.remove_class(id, &self.highlight_class);
        }
        self.speaking = None;
        self.release_at = None;
    }
    
    /// Drive the remote task and expire lingering highlights. Returns
    /// true while a remote synthesis is still pending.
    pub fn poll(&mut self, doc: &mut Document, now: Instant) -> bool {
        while self.executor.try_tick() {}
        
        if self.pending.as_ref().is_some_and(|p| p.task.is_finished()) {
            if let Some(pending) = self.pending.take() {
                match smol::block_on(pending.task) {
                    Ok(clip) => self.sink.play(clip, pending.volume),
                    Err(e) => tracing::warn!("remote synthesis failed: {}", e),
                }
            }
        }
        
        if self.release_at.is_some_and(|at| at <= now) {
            self.release(doc);
        }
        
        self.pending.is_some()
    }
    
    /// The local engine finished speaking
    pub fn utterance_ended(&mut self, now: Instant) {
        if self.speaking.is_some() {
            self.release_at = Some(now + HIGHLIGHT_LINGER);
        }
    }
    
    /// Remote audio finished playing
    pub fn playback_ended(&mut self, doc: &mut Document) {
        self.release(doc);
    }
    
    fn highlight(&mut self, doc: &mut Document, node: NodeId) {
        doc.add_class(node, &self.highlight_class);
        self.speaking = Some(node);
    }
    
    fn release(&mut self, doc: &mut Document) {
        if let Some(node) = self.speaking.take() {
            doc.remove_class(node, &self.highlight_class);
        }
        self.release_at = None;
    }
}
