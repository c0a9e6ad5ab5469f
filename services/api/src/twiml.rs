//! Spoken-Response Markup
//!
//! A small builder for the TwiML documents the telephony provider expects
//! in reply to each webhook. Only the verbs this service uses are modelled.

use axum::{
    http::header,
    response::{IntoResponse, Response},
};
use bookline_core::Command;
use quick_xml::escape::partial_escape;

/// Where the provider posts the caller's next speech result.
pub const HANDLE_INPUT_PATH: &str = "/handle-input";

/// Spoken when request handling fails outright.
pub const ERROR_REMARK: &str = "We're sorry, but there was an error. Please try again later.";

/// A speech-gathering directive wrapping the prompt to speak.
#[derive(Debug, Clone, PartialEq)]
pub struct Gather {
    pub action: String,
    pub method: &'static str,
    pub speech_timeout: &'static str,
    pub enhanced: bool,
    pub barge_in: bool,
    pub say: String,
}

impl Gather {
    /// Speech input posted back to `/handle-input`, automatic end-of-speech
    /// detection, enhanced recognition, and barge-in allowed.
    pub fn speech(say: impl Into<String>) -> Self {
        Self {
            action: HANDLE_INPUT_PATH.to_string(),
            method: "POST",
            speech_timeout: "auto",
            enhanced: true,
            barge_in: true,
            say: say.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Verb {
    Say(String),
    Gather(Gather),
}

/// A complete `<Response>` document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceResponse {
    verbs: Vec<Verb>,
}

impl VoiceResponse {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, verb: Verb) -> Self {
        self.verbs.push(verb);
        self
    }

    /// A bare spoken line with nothing gathered afterwards.
    pub fn say(text: impl Into<String>) -> Self {
        Self::new().push(Verb::Say(text.into()))
    }

    /// Speaks `text` while listening for the caller's reply.
    pub fn gather_speech(text: impl Into<String>) -> Self {
        Self::new().push(Verb::Gather(Gather::speech(text)))
    }

    /// The fixed response for failed requests.
    pub fn error() -> Self {
        Self::say(ERROR_REMARK)
    }

    pub fn verbs(&self) -> &[Verb] {
        &self.verbs
    }

    pub fn to_xml(&self) -> String {
        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#);
        for verb in &self.verbs {
            match verb {
                Verb::Say(text) => write_say(&mut xml, text),
                Verb::Gather(gather) => {
                    xml.push_str(&format!(
                        r#"<Gather action="{}" bargeIn="{}" enhanced="{}" input="speech" method="{}" speechTimeout="{}">"#,
                        partial_escape(gather.action.as_str()),
                        gather.barge_in,
                        gather.enhanced,
                        gather.method,
                        gather.speech_timeout,
                    ));
                    write_say(&mut xml, &gather.say);
                    xml.push_str("</Gather>");
                }
            }
        }
        xml.push_str("</Response>");
        xml
    }
}

fn write_say(xml: &mut String, text: &str) {
    xml.push_str("<Say>");
    xml.push_str(&partial_escape(text));
    xml.push_str("</Say>");
}

impl From<Command> for VoiceResponse {
    fn from(command: Command) -> Self {
        match command {
            Command::Prompt(text) => VoiceResponse::gather_speech(text),
            Command::Farewell(text) => VoiceResponse::say(text),
        }
    }
}

impl IntoResponse for VoiceResponse {
    fn into_response(self) -> Response {
        ([(header::CONTENT_TYPE, "text/xml")], self.to_xml()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_say_document() {
        assert_eq!(
            VoiceResponse::say("Goodbye.").to_xml(),
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Say>Goodbye.</Say></Response>"#
        );
    }

    #[test]
    fn test_gather_document() {
        assert_eq!(
            VoiceResponse::gather_speech("How can I help?").to_xml(),
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?><Response>"#,
                r#"<Gather action="/handle-input" bargeIn="true" enhanced="true" input="speech" method="POST" speechTimeout="auto">"#,
                "<Say>How can I help?</Say></Gather></Response>"
            )
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let xml = VoiceResponse::say("Tom & Jerry <Deluxe> isn't here").to_xml();
        assert!(xml.contains("<Say>Tom &amp; Jerry &lt;Deluxe&gt; isn't here</Say>"));
    }

    #[test]
    fn test_from_command() {
        let prompt = VoiceResponse::from(Command::Prompt("Anything else?".to_string()));
        assert!(matches!(prompt.verbs(), [Verb::Gather(g)] if g.say == "Anything else?"));

        let farewell = VoiceResponse::from(Command::Farewell("Bye now.".to_string()));
        assert_eq!(farewell.verbs(), &[Verb::Say("Bye now.".to_string())]);
    }

    #[test]
    fn test_error_document_has_no_gather() {
        let xml = VoiceResponse::error().to_xml();
        assert!(xml.contains(ERROR_REMARK));
        assert!(!xml.contains("<Gather"));
    }

    #[test]
    fn test_into_response_is_xml() {
        let response = VoiceResponse::say("hi").into_response();
        assert_eq!(response.status(), axum::http::StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/xml"
        );
    }
}
