//! Notification text blocks and webhook reply parsing.
//!
//! Every lead form relays as a fixed, human-readable block; the receiving
//! channel is staffed by people, not machines, so the format optimizes for
//! reading, not parsing. Chat notifications are the one exception: they
//! carry a `[session:<id>]` marker that the webhook parser uses to route a
//! typed reply back to the right visitor session.

use serde::{Deserialize, Serialize};

/// A quote request from the public website.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub loan_type: String,
    pub loan_amount: f64,
    pub message: Option<String>,
}

impl QuoteRequest {
    pub fn format(&self) -> String {
        let mut block = format!(
            "New quote request\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Loan type: {}\n\
             Amount: £{:.0}",
            self.name, self.email, self.phone, self.loan_type, self.loan_amount
        );
        if let Some(message) = self.message.as_deref().filter(|m| !m.trim().is_empty()) {
            block.push_str("\nMessage: ");
            block.push_str(message.trim());
        }
        block
    }
}

/// An eligibility check submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EligibilityCheck {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub employment_status: String,
    pub annual_income: f64,
    pub loan_amount: f64,
}

impl EligibilityCheck {
    pub fn format(&self) -> String {
        format!(
            "New eligibility check\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Employment: {}\n\
             Annual income: £{:.0}\n\
             Loan amount: £{:.0}",
            self.name,
            self.email,
            self.phone,
            self.employment_status,
            self.annual_income,
            self.loan_amount
        )
    }
}

/// An appointment scheduling request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub preferred_date: String,
    pub preferred_time: String,
    pub topic: Option<String>,
}

impl ScheduleRequest {
    pub fn format(&self) -> String {
        let mut block = format!(
            "New appointment request\n\
             Name: {}\n\
             Email: {}\n\
             Phone: {}\n\
             Preferred date: {}\n\
             Preferred time: {}",
            self.name, self.email, self.phone, self.preferred_date, self.preferred_time
        );
        if let Some(topic) = self.topic.as_deref().filter(|t| !t.trim().is_empty()) {
            block.push_str("\nTopic: ");
            block.push_str(topic.trim());
        }
        block
    }
}

/// A contact form submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContactMessage {
    pub name: String,
    pub email: String,
    pub subject: Option<String>,
    pub message: String,
}

impl ContactMessage {
    pub fn format(&self) -> String {
        let subject = self
            .subject
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or("(none)");
        format!(
            "New contact message\n\
             Name: {}\n\
             Email: {}\n\
             Subject: {}\n\
             Message: {}",
            self.name, self.email, subject, self.message
        )
    }
}

/// Format a live-chat message for the staffed channel.
///
/// The `[session:<id>]` marker must appear in any reply so the webhook can
/// route it back.
pub fn chat_notification(session_id: &str, message: &str) -> String {
    format!(
        "Live chat [session:{session_id}]\n\
         {message}\n\
         Reply with the session marker to answer."
    )
}

/// A bot reply routed back to a chat session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReply {
    pub session_id: String,
    pub message: String,
}

/// Parse the session marker out of a plain-text bot reply.
///
/// Accepts the marker anywhere in the text; the reply is everything else,
/// trimmed. Returns `None` when the marker is absent, unterminated, or the
/// remaining text is empty.
pub fn parse_session_reply(text: &str) -> Option<SessionReply> {
    const MARKER: &str = "[session:";

    let start = text.find(MARKER)?;
    let after = &text[start + MARKER.len()..];
    let end = after.find(']')?;

    let session_id = after[..end].trim();
    if session_id.is_empty() {
        return None;
    }

    let mut message = String::new();
    message.push_str(text[..start].trim());
    let rest = after[end + 1..].trim();
    if !rest.is_empty() {
        if !message.is_empty() {
            message.push(' ');
        }
        message.push_str(rest);
    }

    if message.is_empty() {
        return None;
    }

    Some(SessionReply {
        session_id: session_id.to_string(),
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_format() {
        let quote = QuoteRequest {
            name: "Jane Fraser".to_string(),
            email: "jane@example.com".to_string(),
            phone: "+44 7700 900123".to_string(),
            loan_type: "bridging".to_string(),
            loan_amount: 250_000.0,
            message: Some("Completion needed within 3 weeks".to_string()),
        };

        let block = quote.format();
        assert!(block.starts_with("New quote request\n"));
        assert!(block.contains("Amount: £250000"));
        assert!(block.contains("Message: Completion needed within 3 weeks"));
    }

    #[test]
    fn test_quote_format_without_message() {
        let quote = QuoteRequest {
            name: "Jane".to_string(),
            email: "jane@example.com".to_string(),
            phone: "1".to_string(),
            loan_type: "bridging".to_string(),
            loan_amount: 1000.0,
            message: Some("   ".to_string()),
        };
        assert!(!quote.format().contains("Message:"));
    }

    #[test]
    fn test_contact_format_defaults_subject() {
        let contact = ContactMessage {
            name: "Sam".to_string(),
            email: "sam@example.com".to_string(),
            subject: None,
            message: "Please call me back".to_string(),
        };
        assert!(contact.format().contains("Subject: (none)"));
    }

    #[test]
    fn test_chat_notification_carries_marker() {
        let block = chat_notification("abc123", "Is a 70% LTV possible?");
        assert!(block.contains("[session:abc123]"));
        assert!(block.contains("Is a 70% LTV possible?"));
    }

    #[test]
    fn test_parse_reply_marker_first() {
        let reply = parse_session_reply("[session:abc123] Yes, up to 75%.").unwrap();
        assert_eq!(reply.session_id, "abc123");
        assert_eq!(reply.message, "Yes, up to 75%.");
    }

    #[test]
    fn test_parse_reply_marker_embedded() {
        let reply =
            parse_session_reply("Yes, up to 75%. [session:abc123]").unwrap();
        assert_eq!(reply.session_id, "abc123");
        assert_eq!(reply.message, "Yes, up to 75%.");
    }

    #[test]
    fn test_parse_reply_round_trips_notification_marker() {
        let notification = chat_notification("sess-9", "hello");
        let marker_start = notification.find("[session:").unwrap();
        let marker_end = notification[marker_start..].find(']').unwrap();
        let marker = &notification[marker_start..=marker_start + marker_end];

        let reply = parse_session_reply(&format!("{marker} thanks, on it")).unwrap();
        assert_eq!(reply.session_id, "sess-9");
    }

    #[test]
    fn test_parse_reply_rejects_bad_input() {
        assert!(parse_session_reply("no marker here").is_none());
        assert!(parse_session_reply("[session:] empty id").is_none());
        assert!(parse_session_reply("[session:abc unterminated").is_none());
        assert!(parse_session_reply("[session:abc123]").is_none());
        assert!(parse_session_reply("[session:abc123]   ").is_none());
    }
}
