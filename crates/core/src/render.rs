//! Placeholder substitution for template titles and bodies.
//!
//! Templates carry a fixed, closed set of placeholder tokens that are
//! replaced with the receiving client's attributes at send time. Unknown
//! placeholders pass through verbatim, there is no escaping and no recursive
//! substitution, and rendering placeholder-free text is a no-op.

pub const PLACEHOLDER_REGION: &str = "{{region}}";
pub const PLACEHOLDER_BUSINESS_NAME: &str = "{{business_name}}";
pub const PLACEHOLDER_MAIN_SERVICE: &str = "{{main_service}}";
pub const PLACEHOLDER_DIFFERENTIATOR: &str = "{{differentiator}}";
pub const PLACEHOLDER_CONTACT: &str = "{{contact}}";

/// The client attributes a template can reference. Optional fields render
/// as an empty string when absent.
#[derive(Debug, Clone, Default)]
pub struct PlaceholderValues {
    pub business_name: String,
    pub region: String,
    pub main_service: Option<String>,
    pub differentiator: Option<String>,
    pub contact: Option<String>,
}

/// Replace every placeholder occurrence in `text` with the client's values.
///
/// The token sets are disjoint, so replacement order is immaterial.
pub fn render(text: &str, values: &PlaceholderValues) -> String {
    text.replace(PLACEHOLDER_REGION, &values.region)
        .replace(PLACEHOLDER_BUSINESS_NAME, &values.business_name)
        .replace(
            PLACEHOLDER_MAIN_SERVICE,
            values.main_service.as_deref().unwrap_or(""),
        )
        .replace(
            PLACEHOLDER_DIFFERENTIATOR,
            values.differentiator.as_deref().unwrap_or(""),
        )
        .replace(
            PLACEHOLDER_CONTACT,
            values.contact.as_deref().unwrap_or(""),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PlaceholderValues {
        PlaceholderValues {
            business_name: "ABC Academy".to_string(),
            region: "Gangnam".to_string(),
            main_service: Some("1:1 tutoring".to_string()),
            differentiator: None,
            contact: Some("010-1234-5678".to_string()),
        }
    }

    #[test]
    fn test_replaces_all_known_placeholders() {
        let text = "Winter break in {{region}}: {{business_name}} offers {{main_service}}. \
                    Call {{contact}}.";
        let rendered = render(text, &client());
        assert_eq!(
            rendered,
            "Winter break in Gangnam: ABC Academy offers 1:1 tutoring. Call 010-1234-5678."
        );
        assert!(!rendered.contains("{{"));
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let text = "{{region}} {{region}} {{region}}";
        assert_eq!(render(text, &client()), "Gangnam Gangnam Gangnam");
    }

    #[test]
    fn test_absent_optional_field_renders_empty() {
        let rendered = render("why us: {{differentiator}}!", &client());
        assert_eq!(rendered, "why us: !");
    }

    #[test]
    fn test_unknown_placeholder_passes_through() {
        let rendered = render("hello {{unknown_token}}", &client());
        assert_eq!(rendered, "hello {{unknown_token}}");
    }

    #[test]
    fn test_idempotent_on_rendered_text() {
        let once = render("{{business_name}} in {{region}}", &client());
        let twice = render(&once, &client());
        assert_eq!(once, twice);
    }
}
