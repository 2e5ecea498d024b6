//! Speech controller behaviour with recording fakes
//!
//! No audio device or network is touched.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use fos_dom::{Document, NodeId};
use fos_speech::*;

#[derive(Default)]
struct Log {
    local: Vec<Utterance>,
    cancels: usize,
    remote: Vec<RemoteRequest>,
    played: Vec<(AudioClip, f64)>,
    sink_stops: usize,
}

type Shared = Rc<RefCell<Log>>;

struct FakeSynth(Shared, Vec<Voice>);

impl VoiceSynthesizer for FakeSynth {
    fn voices(&self) -> Vec<Voice> {
        self.1.clone()
    }
    fn speak(&mut self, utterance: Utterance) {
        self.0.borrow_mut().local.push(utterance);
    }
    fn cancel(&mut self) {
        self.0.borrow_mut().cancels += 1;
    }
}

struct FakeSink(Shared);

impl AudioSink for FakeSink {
    fn play(&mut self, clip: AudioClip, volume: f64) {
        self.0.borrow_mut().played.push((clip, volume));
    }
    fn stop(&mut self) {
        self.0.borrow_mut().sink_stops += 1;
    }
}

struct FakeRemote(Shared, Result<Vec<u8>, u16>);

impl RemoteSynthesizer for FakeRemote {
    fn synthesize(&self, request: RemoteRequest) -> SynthesisFuture {
        self.0.borrow_mut().remote.push(request);
        let result = self.1.clone()
            .map(AudioClip::mpeg)
            .map_err(SpeechError::Status);
        Box::pin(async move { result })
    }
}

/// Remote that never completes
struct StuckRemote;

impl RemoteSynthesizer for StuckRemote {
    fn synthesize(&self, _request: RemoteRequest) -> SynthesisFuture {
        Box::pin(std::future::pending::<Result<AudioClip, SpeechError>>())
    }
}

fn controller(voices: Vec<Voice>, remote: Result<Vec<u8>, u16>) -> (SpeechController, Shared) {
    let log = Shared::default();
    let ctl = SpeechController::new(
        Box::new(FakeSynth(log.clone(), voices)),
        Box::new(FakeSink(log.clone())),
        Some(Box::new(FakeRemote(log.clone(), remote))),
    );
    (ctl, log)
}

fn page() -> (Document, NodeId, NodeId) {
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let a = doc.append_element(body, "p").unwrap();
    doc.append_text(a, "Hello (world)!").unwrap();
    let b = doc.append_element(body, "p").unwrap();
    doc.append_text(b, "Second").unwrap();
    (doc, a, b)
}

fn params(lang: &str) -> SpeechParams {
    SpeechParams { lang: lang.into(), ..SpeechParams::default() }
}

// ============================================================================
// ROUTING
// ============================================================================

#[test]
fn test_local_voice_matches_primary_subtag() {
    let (mut ctl, log) = controller(vec![Voice::new("Anna", "en-GB")], Ok(vec![1]));
    let (mut doc, a, _) = page();
    
    assert_eq!(ctl.speak(&mut doc, a, &params("en-US")), SpeechRoute::Local);
    let log = log.borrow();
    assert_eq!(log.local.len(), 1);
    assert_eq!(log.local[0].text, "Hello (world)!");
    assert_eq!(log.local[0].lang, "en-GB");
    assert!(log.remote.is_empty());
    assert!(doc.has_class(a, ctl.highlight_class()));
}

#[test]
fn test_fallback_goes_remote_exactly_once() {
    let (mut ctl, log) = controller(vec![Voice::new("Anna", "en-GB")], Ok(vec![7, 8]));
    let (mut doc, a, _) = page();
    
    assert_eq!(ctl.speak(&mut doc, a, &params("vi-VN")), SpeechRoute::Remote);
    assert!(!ctl.poll(&mut doc, Instant::now()));
    
    let log = log.borrow();
    assert!(log.local.is_empty());
    assert_eq!(log.remote.len(), 1);
    assert_eq!(log.remote[0].text, "Hello %28world%29%21");
    assert_eq!(log.played.len(), 1);
    assert_eq!(log.played[0].0.data, vec![7, 8]);
    assert_eq!(log.played[0].1, 0.8);
}

#[test]
fn test_remote_failure_is_silent() {
    let (mut ctl, log) = controller(Vec::new(), Err(500));
    let (mut doc, a, _) = page();
    
    ctl.speak(&mut doc, a, &params("vi"));
    assert!(!ctl.poll(&mut doc, Instant::now()));
    assert!(log.borrow().played.is_empty());
    // highlight stays until the next stop
    assert!(doc.has_class(a, ctl.highlight_class()));
}

#[test]
fn test_empty_text_is_skipped() {
    let (mut ctl, log) = controller(Vec::new(), Ok(vec![1]));
    let mut doc = Document::default();
    let body = doc.body().unwrap();
    let empty = doc.append_element(body, "div").unwrap();
    
    assert_eq!(ctl.speak(&mut doc, empty, &params("en")), SpeechRoute::Skipped);
    assert!(log.borrow().remote.is_empty());
}

#[test]
fn test_no_remote_configured() {
    let mut ctl = SpeechController::new(Box::new(NoVoices), Box::new(NullSink), None);
    let (mut doc, a, _) = page();
    assert_eq!(ctl.speak(&mut doc, a, &params("en")), SpeechRoute::Skipped);
    assert!(!doc.has_class(a, ctl.highlight_class()));
}

// ============================================================================
// CANCELLATION & HIGHLIGHT
// ============================================================================

#[test]
fn test_new_request_preempts_pending_remote() {
    let log = Shared::default();
    let mut ctl = SpeechController::new(
        Box::new(FakeSynth(log.clone(), Vec::new())),
        Box::new(FakeSink(log.clone())),
        Some(Box::new(StuckRemote)),
    );
    let (mut doc, a, b) = page();
    
    ctl.speak(&mut doc, a, &params("en"));
    assert!(ctl.poll(&mut doc, Instant::now()));
    
    ctl.speak(&mut doc, b, &params("en"));
    assert!(!doc.has_class(a, ctl.highlight_class()));
    assert!(doc.has_class(b, ctl.highlight_class()));
    assert_eq!(ctl.speaking(), Some(b));
    
    ctl.stop(&mut doc);
    assert!(!ctl.has_pending());
    assert!(!doc.has_class(b, ctl.highlight_class()));
    assert!(log.borrow().cancels >= 3);
}

#[test]
fn test_local_highlight_lingers() {
    let (mut ctl, _) = controller(vec![Voice::new("Anna", "en-US")], Ok(vec![]));
    let (mut doc, a, _) = page();
    let t0 = Instant::now();
    
    ctl.speak(&mut doc, a, &params("en"));
    ctl.utterance_ended(t0);
    ctl.poll(&mut doc, t0 + Duration::from_millis(100));
    assert!(doc.has_class(a, ctl.highlight_class()));
    
    ctl.poll(&mut doc, t0 + HIGHLIGHT_LINGER);
    assert!(!doc.has_class(a, ctl.highlight_class()));
    assert_eq!(ctl.speaking(), None);
}

#[test]
fn test_playback_end_clears_highlight() {
    let (mut ctl, _) = controller(Vec::new(), Ok(vec![1]));
    let (mut doc, a, _) = page();
    
    ctl.set_highlight_class("ba-speech-highlight");
    ctl.speak(&mut doc, a, &params("en"));
    ctl.poll(&mut doc, Instant::now());
    assert!(doc.has_class(a, "ba-speech-highlight"));
    ctl.playback_ended(&mut doc);
    assert!(!doc.has_class(a, "ba-speech-highlight"));
}
