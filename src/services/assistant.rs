//! Scheduling assistant: prompt construction for the LLM provider and
//! fixed fallbacks so a provider failure never reaches the caller.

use serde_json::json;

use crate::models::{Booking, Space};
use crate::services::ai::LlmProvider;

pub const SUGGESTION_FALLBACK: &str =
    "The scheduling assistant is unavailable. Check the API key and try again.";
pub const SUMMARY_FALLBACK: &str = "No schedule analysis is available right now.";

/// Conflict-aware slot suggestion for a free-text request, given the day's
/// schedule snapshot. Always returns displayable text.
pub async fn suggest_slot(
    llm: &dyn LlmProvider,
    request: &str,
    spaces: &[Space],
    bookings: &[Booking],
) -> String {
    let spaces_ctx = json!(spaces
        .iter()
        .map(|s| json!({ "id": s.id, "name": s.name }))
        .collect::<Vec<_>>());
    let bookings_ctx = json!(bookings
        .iter()
        .map(|b| json!({
            "space": b.space_id,
            "start": b.start_time,
            "duration": b.duration_minutes,
        }))
        .collect::<Vec<_>>());

    let prompt = format!(
        "You are an expert wellness-center receptionist.\n\
         Current spaces: {spaces_ctx}\n\
         Today's bookings: {bookings_ctx}\n\n\
         Customer request: \"{request}\"\n\n\
         Suggest a specific slot (space, start time, duration) for the request.\n\
         Check for conflicts; if the requested time conflicts, suggest the\n\
         nearest available slot instead. Answer concisely and warmly."
    );

    match llm.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => SUGGESTION_FALLBACK.to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "slot suggestion failed");
            SUGGESTION_FALLBACK.to_string()
        }
    }
}

/// Two-sentence operational summary of the day's load.
pub async fn summarize_load(llm: &dyn LlmProvider, bookings: &[Booking]) -> String {
    let services = bookings
        .iter()
        .map(|b| format!("{} ({}m)", b.service_name, b.duration_minutes))
        .collect::<Vec<_>>()
        .join(", ");

    let prompt = format!(
        "Analyze today's schedule based on these services: {services}.\n\
         Give a two-sentence summary of the operational load (for example\n\
         \"high demand for massages\" or \"quiet morning\"). Keep a\n\
         professional tone."
    );

    match llm.generate(&prompt).await {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) => SUMMARY_FALLBACK.to_string(),
        Err(err) => {
            tracing::warn!(error = %err, "load summary failed");
            SUMMARY_FALLBACK.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BookingStatus, SpaceType};
    use async_trait::async_trait;

    struct EchoLlm;

    #[async_trait]
    impl LlmProvider for EchoLlm {
        async fn generate(&self, prompt: &str) -> anyhow::Result<String> {
            Ok(format!("echo: {prompt}"))
        }
    }

    struct FailingLlm;

    #[async_trait]
    impl LlmProvider for FailingLlm {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }
    }

    struct BlankLlm;

    #[async_trait]
    impl LlmProvider for BlankLlm {
        async fn generate(&self, _prompt: &str) -> anyhow::Result<String> {
            Ok("   ".to_string())
        }
    }

    fn sample_space() -> Space {
        Space {
            id: "sp-1".to_string(),
            name: "Sauna One".to_string(),
            kind: SpaceType::Sauna,
            capacity: 4,
        }
    }

    fn sample_booking() -> Booking {
        Booking {
            id: "bk-1".to_string(),
            space_id: "sp-1".to_string(),
            customer_name: "Alice".to_string(),
            service_name: "Hot stone massage".to_string(),
            date: "2025-06-16".to_string(),
            start_time: "10:00".to_string(),
            duration_minutes: 60,
            break_minutes: 0,
            pax: 1,
            status: BookingStatus::Confirmed,
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_suggest_includes_schedule_context() {
        let reply = suggest_slot(
            &EchoLlm,
            "one hour of sauna this afternoon",
            &[sample_space()],
            &[sample_booking()],
        )
        .await;
        assert!(reply.contains("Sauna One"));
        assert!(reply.contains("10:00"));
        assert!(reply.contains("one hour of sauna this afternoon"));
    }

    #[tokio::test]
    async fn test_suggest_falls_back_on_error() {
        let reply = suggest_slot(&FailingLlm, "anything", &[], &[]).await;
        assert_eq!(reply, SUGGESTION_FALLBACK);
    }

    #[tokio::test]
    async fn test_summary_falls_back_on_blank_reply() {
        let reply = summarize_load(&BlankLlm, &[sample_booking()]).await;
        assert_eq!(reply, SUMMARY_FALLBACK);
    }

    #[tokio::test]
    async fn test_summary_includes_services() {
        let reply = summarize_load(&EchoLlm, &[sample_booking()]).await;
        assert!(reply.contains("Hot stone massage (60m)"));
    }
}
