use anyhow::{anyhow, Result};
use async_trait::async_trait;

const TRANSCRIPTION_URL: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Fixed instruction handed to the model with every request.
const ITALIAN_PROMPT: &str =
    "Trascrivi fedelmente l'audio in italiano. Restituisci solo il testo.";

/// Voice-answer transcription. One outstanding request per recording; no
/// retry, no timeout. Callers map any failure to the empty string.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: Vec<u8>, mime_type: &str) -> Result<String>;
}

pub struct OpenAiTranscriber {
    client: reqwest::Client,
    api_key: String,
}

impl OpenAiTranscriber {
    pub fn new(api_key: String) -> Self {
        OpenAiTranscriber {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Transcriber for OpenAiTranscriber {
    async fn transcribe(&self, audio: Vec<u8>, mime_type: &str) -> Result<String> {
        let extension = mime_type.rsplit('/').next().unwrap_or("webm");
        let form = reqwest::multipart::Form::new()
            .text("model", "whisper-1")
            .text("language", "it")
            .text("prompt", ITALIAN_PROMPT)
            .part(
                "file",
                reqwest::multipart::Part::bytes(audio)
                    .file_name(format!("answer.{extension}"))
                    .mime_str(mime_type)?,
            );

        let resp = self
            .client
            .post(TRANSCRIPTION_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?
            .error_for_status()?;

        let json: serde_json::Value = resp.json().await?;
        json.get("text")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .ok_or_else(|| anyhow!("no transcription text returned"))
    }
}

/// Used when no API key is configured; every call fails and the caller's
/// empty-string fallback applies.
pub struct DisabledTranscriber;

#[async_trait]
impl Transcriber for DisabledTranscriber {
    async fn transcribe(&self, _audio: Vec<u8>, _mime_type: &str) -> Result<String> {
        Err(anyhow!("transcription is not configured"))
    }
}
