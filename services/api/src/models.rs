//! Webhook Payloads
//!
//! The form-encoded parameters the telephony provider posts to this service.
//! The provider sends many more fields; only the ones used here are parsed.

use bookline_core::conversation::UNKNOWN_CALL_SID;
use serde::Deserialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CallWebhook {
    /// Unique identifier of the call.
    #[schema(example = "CA123")]
    pub call_sid: Option<String>,
    /// The provider's transcription of the caller's latest utterance.
    #[schema(example = "Do you have any mystery novels")]
    pub speech_result: Option<String>,
}

impl CallWebhook {
    /// The call identifier, or `"unknown"` when the provider omitted it.
    pub fn call_sid(&self) -> &str {
        self.call_sid.as_deref().unwrap_or(UNKNOWN_CALL_SID)
    }

    /// The recognised speech, or an empty string if recognition failed.
    pub fn speech(&self) -> &str {
        self.speech_result.as_deref().unwrap_or_default()
    }
}
