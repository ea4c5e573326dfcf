use std::time::Duration;

use reqwest::Client;
use tracing::{debug, error, warn};

use queue_cell::AssistantContext;
use shared_config::{AppConfig, ClinicSettings};

use crate::error::AssistantError;
use crate::models::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig};

pub const OFFLINE_MESSAGE: &str = "The AI assistant is currently in offline mode (API key missing). Please check your clinic's dashboard configuration.";
pub const UNAVAILABLE_MESSAGE: &str =
    "The assistant is temporarily unavailable. Please speak with the receptionist.";

const DEFAULT_RETRIES: u32 = 3;
const DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// Client for the external generative-language API behind the clinic
/// assistant. Every failure path degrades to a canned patient-facing
/// message; this client never surfaces an error to the HTTP layer.
pub struct AssistantClient {
    http: Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
    clinic: ClinicSettings,
    retries: u32,
    backoff: Duration,
}

impl AssistantClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            http: Client::new(),
            api_key: config.assistant_api_key.clone(),
            base_url: config.assistant_base_url.clone(),
            model: config.assistant_model.clone(),
            clinic: config.clinic.clone(),
            retries: DEFAULT_RETRIES,
            backoff: DEFAULT_BACKOFF,
        }
    }

    pub fn with_retry_policy(mut self, retries: u32, backoff: Duration) -> Self {
        self.retries = retries;
        self.backoff = backoff;
        self
    }

    /// Answer a patient question against the live queue context.
    pub async fn ask(&self, prompt: &str, context: &AssistantContext) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            return OFFLINE_MESSAGE.to_string();
        };

        let mut attempts_left = self.retries;
        let mut backoff = self.backoff;
        loop {
            match self.generate(api_key, prompt, context).await {
                Ok(text) => return text,
                Err(e) if attempts_left > 0 => {
                    warn!(
                        "assistant request failed ({}), retrying in {:?}",
                        e, backoff
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempts_left -= 1;
                }
                Err(e) => {
                    error!("assistant unavailable after retries: {}", e);
                    return UNAVAILABLE_MESSAGE.to_string();
                }
            }
        }
    }

    async fn generate(
        &self,
        api_key: &str,
        prompt: &str,
        context: &AssistantContext,
    ) -> Result<String, AssistantError> {
        let url = format!("{}/models/{}:generateContent", self.base_url, self.model);
        let system_instruction = format!(
            "{}\n\n[CRITICAL] CURRENT CLINIC CONTEXT:\n{}",
            self.system_instruction(),
            serde_json::to_string_pretty(context)?
        );

        let body = GenerateContentRequest {
            contents: vec![Content::from_text(prompt)],
            system_instruction: Content::from_text(system_instruction),
            generation_config: GenerationConfig { temperature: 0.7 },
        };

        debug!("sending assistant request to {}", url);

        let response = self
            .http
            .post(&url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message: response_text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)?;
        parsed.text().ok_or(AssistantError::EmptyResponse)
    }

    fn system_instruction(&self) -> String {
        format!(
            "You are the AI Clinical Assistant for {name}, managed by {doctor}.\n\
             Your goal is to provide real-time assistance to patients regarding their position in the queue, clinic flow, and general information.\n\
             \n\
             LIVE CLINIC INTELLIGENCE:\n\
             - You will be provided with a \"CURRENT CONTEXT\" object in every request.\n\
             - Use context data to answer precisely about wait times and current sessions.\n\
             - If 'is_clinic_paused' is true, inform patients that the doctor is currently on a short break.\n\
             \n\
             CLINIC RULES:\n\
             - Operating Hours: Mon-Sat ({m_start}-{m_end} & {e_start}-{e_end}).\n\
             - Standard appointment length is {slot} minutes.\n\
             \n\
             STRICT CLINICAL BOUNDARIES:\n\
             - DO NOT provide medical diagnosis.\n\
             - For emergencies, tell them to call emergency services.\n\
             - Disclaimer: \"I provide clinic flow information and cannot offer medical advice.\"",
            name = self.clinic.name,
            doctor = self.clinic.doctor_name,
            m_start = self.clinic.morning_shift.start.format("%H:%M"),
            m_end = self.clinic.morning_shift.end.format("%H:%M"),
            e_start = self.clinic.evening_shift.start.format("%H:%M"),
            e_end = self.clinic.evening_shift.end.format("%H:%M"),
            slot = self.clinic.slot_duration_minutes,
        )
    }
}
