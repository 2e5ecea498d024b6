//! fOS Speech
//!
//! Reads document nodes aloud for the accessibility toolbar.
//!
//! - Local voice synthesis behind [`VoiceSynthesizer`]
//! - Remote text-to-speech fallback behind [`RemoteSynthesizer`]
//!   (Google Cloud TTS or a query-string endpoint)
//! - Audio playback behind [`AudioSink`]
//! - [`SpeechController`]: one utterance at a time, cancellation, and
//!   highlighting of the node being read

pub mod controller;
pub mod player;
pub mod remote;
pub mod voice;

pub use controller::{SpeechController, SpeechParams, SpeechRoute, HIGHLIGHT_LINGER};
pub use player::{AudioClip, AudioSink, NullSink};
pub use remote::{
    escape_transport, GoogleTts, QueryTts, RemoteRequest, RemoteSource, RemoteSpeechConfig,
    RemoteSynthesizer, SynthesisFuture,
};
pub use voice::{primary_subtag, NoVoices, Utterance, Voice, VoiceSynthesizer};

/// Speech error
#[derive(Debug, thiserror::Error)]
pub enum SpeechError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    
    #[error("synthesis endpoint returned status {0}")]
    Status(u16),
    
    #[error("malformed synthesis response: {0}")]
    MalformedResponse(String),
    
    #[error("audio payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),
}
