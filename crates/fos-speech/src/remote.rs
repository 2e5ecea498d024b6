//! Remote Synthesis
//!
//! Text-to-speech over HTTP for when no local voice speaks the page
//! language. The blocking `reqwest` call runs on smol's blocking pool so
//! the UI loop only ever sees a pending future.

use std::future::Future;
use std::pin::Pin;

use base64::Engine as _;
use serde::{Deserialize, Serialize};

use crate::voice::primary_subtag;
use crate::{AudioClip, SpeechError};

/// Default Google Cloud text-to-speech endpoint
pub const GOOGLE_TTS_ENDPOINT: &str = "https://texttospeech.googleapis.com/v1/text:synthesize";

/// Default query-string speech endpoint
pub const QUERY_TTS_ENDPOINT: &str = "https://www.freetranslations.org/speak.php";

/// Pending synthesis result
pub type SynthesisFuture = Pin<Box<dyn Future<Output = Result<AudioClip, SpeechError>>>>;

/// What to synthesize
#[derive(Debug, Clone, PartialEq)]
pub struct RemoteRequest {
    /// Transport-escaped text (see [`escape_transport`])
    pub text: String,
    /// BCP 47 language tag of the page
    pub lang: String,
    pub rate: f64,
    pub volume: f64,
}

/// Remote text-to-speech provider
pub trait RemoteSynthesizer {
    fn synthesize(&self, request: RemoteRequest) -> SynthesisFuture;
}

/// Which remote provider to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteSource {
    /// Google Cloud text-to-speech (JSON POST, base64 audio back)
    #[default]
    Google,
    /// `GET <endpoint>?word=..&lang=..` returning raw audio
    #[serde(alias = "responsiveVoice")]
    Query,
}

/// Remote provider settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RemoteSpeechConfig {
    /// Override the provider's default endpoint
    pub endpoint: Option<String>,
    /// API key sent as the `key` query parameter
    pub api_key: Option<String>,
    pub language_code: String,
    pub voice_name: String,
    pub ssml_gender: String,
}

impl Default for RemoteSpeechConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            language_code: "vi-VN".into(),
            voice_name: "vi-VN-Standard-B".into(),
            ssml_gender: "MALE".into(),
        }
    }
}

impl RemoteSource {
    /// Construct the provider
    pub fn build(self, config: &RemoteSpeechConfig) -> Result<Box<dyn RemoteSynthesizer>, SpeechError> {
        Ok(match self {
            Self::Google => Box::new(GoogleTts::new(config.clone())?),
            Self::Query => Box::new(QueryTts::new(
                config.endpoint.as_deref().unwrap_or(QUERY_TTS_ENDPOINT),
            )?),
        })
    }
}

/// Percent-escape the characters `encodeURIComponent` leaves alone
/// (`!'()*`) so they survive the remote transport.
pub fn escape_transport(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '!' | '\'' | '(' | ')' | '*' => out.push_str(&format!("%{:x}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// Google Cloud TTS
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeBody<'a> {
    input: InputText<'a>,
    voice: VoiceParams<'a>,
    audio_config: AudioConfig,
}

#[derive(Debug, Serialize)]
struct InputText<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VoiceParams<'a> {
    language_code: &'a str,
    name: &'a str,
    ssml_gender: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AudioConfig {
    audio_encoding: &'static str,
    speaking_rate: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SynthesizeResponse {
    audio_content: Option<String>,
}

/// Google Cloud text-to-speech client
#[derive(Debug, Clone)]
pub struct GoogleTts {
    client: reqwest::blocking::Client,
    config: RemoteSpeechConfig,
}

impl GoogleTts {
    pub fn new(config: RemoteSpeechConfig) -> Result<Self, SpeechError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client, config })
    }
    
    /// JSON body for a request
    pub fn request_body(&self, request: &RemoteRequest) -> Result<Vec<u8>, SpeechError> {
        let body = SynthesizeBody {
            input: InputText { text: &request.text },
            voice: VoiceParams {
                language_code: &self.config.language_code,
                name: &self.config.voice_name,
                ssml_gender: &self.config.ssml_gender,
            },
            audio_config: AudioConfig {
                audio_encoding: "MP3",
                speaking_rate: request.rate.max(0.5),
            },
        };
        serde_json::to_vec(&body).map_err(|e| SpeechError::MalformedResponse(e.to_string()))
    }
    
    fn endpoint(&self) -> &str {
        self.config.endpoint.as_deref().unwrap_or(GOOGLE_TTS_ENDPOINT)
    }
}

/// Extract the base64 `audioContent` payload from a response body
pub fn decode_response(body: &[u8]) -> Result<AudioClip, SpeechError> {
    let response: SynthesizeResponse = serde_json::from_slice(body)
        .map_err(|e| SpeechError::MalformedResponse(e.to_string()))?;
    let content = response.audio_content
        .ok_or_else(|| SpeechError::MalformedResponse("missing audioContent".into()))?;
    let data = base64::engine::general_purpose::STANDARD.decode(content.trim())?;
    Ok(AudioClip::mpeg(data))
}

impl RemoteSynthesizer for GoogleTts {
    fn synthesize(&self, request: RemoteRequest) -> SynthesisFuture {
        let body = match self.request_body(&request) {
            Ok(body) => body,
            Err(e) => return Box::pin(std::future::ready(Err(e))),
        };
        let client = self.client.clone();
        let endpoint = self.endpoint().to_string();
        let api_key = self.config.api_key.clone();
        
        tracing::info!("remote synthesis via {} ({} bytes)", endpoint, body.len());
        Box::pin(smol::unblock(move || {
            let mut builder = client.post(&endpoint)
                .header(reqwest::header::CONTENT_TYPE, "application/json; charset=UTF-8")
                .body(body);
            if let Some(key) = api_key {
                builder = builder.query(&[("key", key)]);
            }
            let response = builder.send()?;
            if !response.status().is_success() {
                return Err(SpeechError::Status(response.status().as_u16()));
            }
            decode_response(&response.bytes()?)
        }))
    }
}

// ============================================================================
// Query-string endpoint
// ============================================================================

/// `GET <endpoint>?word=<text>&lang=<primary subtag>` provider
#[derive(Debug, Clone)]
pub struct QueryTts {
    client: reqwest::blocking::Client,
    endpoint: String,
}

impl QueryTts {
    pub fn new(endpoint: &str) -> Result<Self, SpeechError> {
        let client = reqwest::blocking::Client::builder().build()?;
        Ok(Self { client, endpoint: endpoint.to_string() })
    }
}

impl RemoteSynthesizer for QueryTts {
    fn synthesize(&self, request: RemoteRequest) -> SynthesisFuture {
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();
        let lang = primary_subtag(&request.lang).to_string();
        
        tracing::info!("remote synthesis via {}", endpoint);
        Box::pin(smol::unblock(move || {
            let response = client.get(&endpoint)
                .query(&[("word", request.text.as_str()), ("lang", lang.as_str())])
                .send()?;
            if !response.status().is_success() {
                return Err(SpeechError::Status(response.status().as_u16()));
            }
            let data = response.bytes()?.to_vec();
            if data.is_empty() {
                return Err(SpeechError::MalformedResponse("empty audio body".into()));
            }
            Ok(AudioClip::mpeg(data))
        }))
    }
}
