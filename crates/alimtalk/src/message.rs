//! Notification message templates and phone-number helpers.
//!
//! Provider templates use `#{var}` placeholders, substituted here before the
//! payload leaves the process. The three message kinds map 1:1 to template
//! codes registered with the provider.

use inkflow_core::types::DbId;

/// The kinds of confirmation messages the platform sends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// First send of a manuscript batch: please review.
    ConfirmRequest,
    /// A requested revision has been applied: please re-review.
    RevisionComplete,
    /// The batch is still unconfirmed near the end of the review window.
    Reminder,
}

impl MessageKind {
    /// Provider-side template code for this message kind.
    pub fn template_code(&self) -> &'static str {
        match self {
            Self::ConfirmRequest => "blog-confirm",
            Self::RevisionComplete => "blog-revised",
            Self::Reminder => "blog-remind",
        }
    }

    /// Message body with `#{client_name}` / `#{confirm_url}` placeholders.
    pub fn body_template(&self) -> &'static str {
        match self {
            Self::ConfirmRequest => {
                "Hello #{client_name},\n\n\
                 This week's blog manuscript is ready.\n\
                 Please open the link below to review it.\n\n\
                 #{confirm_url}\n\n\
                 Unconfirmed manuscripts are approved automatically after the \
                 review window closes.\n\n\
                 Thank you."
            }
            Self::RevisionComplete => {
                "Hello #{client_name},\n\n\
                 The changes you requested have been applied.\n\
                 Please open the link below to review the updated manuscript.\n\n\
                 #{confirm_url}\n\n\
                 Thank you."
            }
            Self::Reminder => {
                "Hello #{client_name},\n\n\
                 Your blog manuscript is still awaiting review.\n\
                 Please open the link below to confirm it.\n\n\
                 #{confirm_url}\n\n\
                 Unconfirmed manuscripts are approved automatically.\n\n\
                 Thank you."
            }
        }
    }

    /// Reverse lookup from a provider template code.
    pub fn from_template_code(code: &str) -> Option<Self> {
        match code {
            "blog-confirm" => Some(Self::ConfirmRequest),
            "blog-revised" => Some(Self::RevisionComplete),
            "blog-remind" => Some(Self::Reminder),
            _ => None,
        }
    }

    /// Label of the link button attached to the message.
    pub fn button_label(&self) -> &'static str {
        match self {
            Self::ConfirmRequest => "Review manuscript",
            Self::RevisionComplete => "Review updated manuscript",
            Self::Reminder => "Review manuscript",
        }
    }
}

/// One notification to one recipient.
#[derive(Debug, Clone)]
pub struct OutboundMessage {
    pub kind: MessageKind,
    /// Missing phone numbers fail locally, before any network call.
    pub phone: Option<String>,
    pub client_id: Option<DbId>,
    pub manuscript_id: Option<DbId>,
    pub client_name: String,
    pub confirm_url: String,
    pub manuscript_title: Option<String>,
}

impl OutboundMessage {
    /// Substitution variables for this message.
    pub fn variables(&self) -> Vec<(&'static str, &str)> {
        vec![
            ("client_name", self.client_name.as_str()),
            ("confirm_url", self.confirm_url.as_str()),
        ]
    }

    /// The fully rendered message body.
    pub fn body(&self) -> String {
        substitute_variables(self.kind.body_template(), &self.variables())
    }
}

/// Replace each `#{name}` occurrence with its value.
pub fn substitute_variables(text: &str, variables: &[(&str, &str)]) -> String {
    let mut result = text.to_string();
    for (name, value) in variables {
        result = result.replace(&format!("#{{{name}}}"), value);
    }
    result
}

/// Strip separators from a phone number before handing it to the provider.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Korean mobile numbers: `01` followed by 8 or 9 digits.
pub fn is_valid_mobile(normalized: &str) -> bool {
    (normalized.len() == 10 || normalized.len() == 11)
        && normalized.starts_with("01")
        && normalized.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(kind: MessageKind) -> OutboundMessage {
        OutboundMessage {
            kind,
            phone: Some("010-1234-5678".to_string()),
            client_id: Some(1),
            manuscript_id: Some(10),
            client_name: "ABC Academy".to_string(),
            confirm_url: "https://example.com/confirm/tok".to_string(),
            manuscript_title: Some("Winter Break Promo".to_string()),
        }
    }

    #[test]
    fn test_body_substitutes_all_variables() {
        let body = message(MessageKind::ConfirmRequest).body();
        assert!(body.contains("ABC Academy"));
        assert!(body.contains("https://example.com/confirm/tok"));
        assert!(!body.contains("#{"));
    }

    #[test]
    fn test_each_kind_has_distinct_template_code() {
        let codes = [
            MessageKind::ConfirmRequest.template_code(),
            MessageKind::RevisionComplete.template_code(),
            MessageKind::Reminder.template_code(),
        ];
        assert_ne!(codes[0], codes[1]);
        assert_ne!(codes[1], codes[2]);
        assert_ne!(codes[0], codes[2]);
    }

    #[test]
    fn test_template_code_round_trip() {
        for kind in [
            MessageKind::ConfirmRequest,
            MessageKind::RevisionComplete,
            MessageKind::Reminder,
        ] {
            assert_eq!(MessageKind::from_template_code(kind.template_code()), Some(kind));
        }
        assert_eq!(MessageKind::from_template_code("wiz9"), None);
    }

    #[test]
    fn test_substitute_leaves_unknown_variables() {
        let text = "x #{known} y #{unknown}";
        assert_eq!(
            substitute_variables(text, &[("known", "K")]),
            "x K y #{unknown}"
        );
    }

    #[test]
    fn test_normalize_phone_strips_separators() {
        assert_eq!(normalize_phone("010-1234-5678"), "01012345678");
        assert_eq!(normalize_phone("010 1234 5678"), "01012345678");
    }

    #[test]
    fn test_mobile_validation() {
        assert!(is_valid_mobile("01012345678"));
        assert!(is_valid_mobile("0101234567"));
        assert!(!is_valid_mobile("021234567"));
        assert!(!is_valid_mobile("010123456789"));
        assert!(!is_valid_mobile(""));
    }
}
