//! Local Voices
//!
//! The platform speech engine seam.

/// An installed voice
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    /// BCP 47 tag, e.g. `en-US`
    pub lang: String,
}

impl Voice {
    pub fn new(name: &str, lang: &str) -> Self {
        Self { name: name.into(), lang: lang.into() }
    }
}

/// One request to the local engine
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub voice: Voice,
    pub lang: String,
    pub rate: f64,
    pub volume: f64,
    pub pitch: f64,
}

/// Platform speech engine
pub trait VoiceSynthesizer {
    /// Installed voices
    fn voices(&self) -> Vec<Voice>;
    
    /// Start speaking; the host reports completion through
    /// [`crate::SpeechController::utterance_ended`]
    fn speak(&mut self, utterance: Utterance);
    
    /// Cancel whatever is being spoken
    fn cancel(&mut self);
}

/// Engine with no installed voices; every request goes remote
#[derive(Debug, Default, Clone, Copy)]
pub struct NoVoices;

impl VoiceSynthesizer for NoVoices {
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }
    
    fn speak(&mut self, _utterance: Utterance) {}
    
    fn cancel(&mut self) {}
}

/// Primary language subtag (`vi` for `vi-VN`, `en` for `en_GB`)
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag).trim()
}
