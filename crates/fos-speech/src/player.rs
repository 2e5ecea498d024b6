//! Audio Playback
//!
//! Where decoded remote audio goes.

/// Encoded audio returned by a remote synthesizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub mime: String,
    pub data: Vec<u8>,
}

impl AudioClip {
    pub fn mpeg(data: Vec<u8>) -> Self {
        Self { mime: "audio/mpeg".into(), data }
    }
    
    /// `data:` URL form, as an `<audio>` element would take it
    pub fn data_url(&self) -> String {
        use base64::Engine as _;
        format!("data:{};base64,{}", self.mime, base64::engine::general_purpose::STANDARD.encode(&self.data))
    }
}

/// Audio output device
pub trait AudioSink {
    /// Start playing; the host reports the end through
    /// [`crate::SpeechController::playback_ended`]
    fn play(&mut self, clip: AudioClip, volume: f64);
    
    /// Pause and rewind
    fn stop(&mut self);
}

/// Sink that discards audio
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl AudioSink for NullSink {
    fn play(&mut self, clip: AudioClip, _volume: f64) {
        tracing::debug!("discarding {} bytes of {}", clip.data.len(), clip.mime);
    }
    
    fn stop(&mut self) {}
}
