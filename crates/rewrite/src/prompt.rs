//! Prompt construction and response parsing for the rewrite gateway.
//!
//! Every prompt asks the model for the same `[TITLE]` / `[BODY]` output
//! shape so one parser covers rewrite, revision, and generation.

use crate::gateway::{Draft, GenerateRequest, RewriteRequest};

const TITLE_MARKER: &str = "[TITLE]";
const BODY_MARKER: &str = "[BODY]";

const REWRITE_INSTRUCTIONS: &str = "Rewrite the blog manuscript below, keeping its meaning and context while \
varying the expression naturally:\n\
- change sentence structure and word order\n\
- use synonyms where natural\n\
- keep the key region and business-type keywords exactly as written\n\
- keep roughly the same overall length\n\
- keep the markdown formatting\n\
\n\
Return the result in exactly this format:\n\
\n\
[TITLE]\n\
(rewritten title)\n\
\n\
[BODY]\n\
(rewritten body)";

const REVISION_INSTRUCTIONS: &str = "You are revising a blog manuscript for an advertiser. Apply the requested \
changes precisely:\n\
- change only what the request asks for, keep everything else\n\
- keep the overall flow and tone of the piece\n\
- keep the markdown formatting\n\
- keep the business name and region keywords exactly as written\n\
\n\
Return the result in exactly this format:\n\
\n\
[TITLE]\n\
(revised title)\n\
\n\
[BODY]\n\
(revised body)";

/// Build the prompt for a rewrite or revision request.
pub fn build_rewrite_prompt(request: &RewriteRequest) -> String {
    match &request.revision_request {
        Some(revision) => format!(
            "{REVISION_INSTRUCTIONS}\n\n---\nRequested changes:\n{revision}\n\n---\n\
             Current title: {}\n\nCurrent body:\n{}\n---",
            request.title, request.content
        ),
        None => format!(
            "{REWRITE_INSTRUCTIONS}\n\n---\nOriginal title: {}\n\nOriginal body:\n{}\n---",
            request.title, request.content
        ),
    }
}

/// Build the prompt for generating a one-off custom manuscript.
pub fn build_generate_prompt(request: &GenerateRequest) -> String {
    let client = &request.client;
    let keyword = format!("{} {}", client.region, client.business_type);
    format!(
        "Write a blog post from the following brief.\n\n\
         Business name: {}\n\
         Region: {}\n\
         Business type: {}\n\
         Main service: {}\n\
         Differentiator: {}\n\
         Topic: {}\n\n\
         Requirements:\n\
         - around 1,700-2,000 characters\n\
         - work the keyword \"{keyword}\" in naturally at least three times\n\
         - structure: introduction, three subtopics, business introduction, \
           closing call to action\n\
         - friendly, natural tone\n\
         - markdown formatting with ### subheadings\n\n\
         Return the result in exactly this format:\n\n\
         [TITLE]\n\
         (post title)\n\n\
         [BODY]\n\
         (post body)",
        client.name,
        client.region,
        client.business_type,
        client.main_service.as_deref().unwrap_or("none"),
        client.differentiator.as_deref().unwrap_or("none"),
        request.topic,
    )
}

/// Parse a `[TITLE]` / `[BODY]` response into a draft.
///
/// When the markers are missing or malformed, fall back to treating the
/// first non-empty line as the title and the remainder as the body; an
/// empty title falls back to `fallback_title`.
pub fn parse_draft(response: &str, fallback_title: &str) -> Draft {
    if let (Some(t), Some(b)) = (response.find(TITLE_MARKER), response.find(BODY_MARKER)) {
        if t < b {
            let title = response[t + TITLE_MARKER.len()..b].trim();
            let content = response[b + BODY_MARKER.len()..].trim();
            if !content.is_empty() {
                return Draft {
                    title: if title.is_empty() {
                        fallback_title.to_string()
                    } else {
                        title.to_string()
                    },
                    content: content.to_string(),
                };
            }
        }
    }

    let mut lines = response.trim().lines();
    let title = lines
        .next()
        .map(|l| l.trim_start_matches('#').trim().to_string())
        .filter(|l| !l.is_empty())
        .unwrap_or_else(|| fallback_title.to_string());
    let content = lines.collect::<Vec<_>>().join("\n").trim().to_string();
    Draft {
        title,
        content: if content.is_empty() {
            response.trim().to_string()
        } else {
            content
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ClientBrief;

    fn rewrite_request(revision: Option<&str>) -> RewriteRequest {
        RewriteRequest {
            title: "Winter Break Promo".to_string(),
            content: "Our academy in Gangnam...".to_string(),
            revision_request: revision.map(str::to_string),
        }
    }

    #[test]
    fn test_plain_rewrite_prompt_has_no_revision_section() {
        let prompt = build_rewrite_prompt(&rewrite_request(None));
        assert!(prompt.contains("Original title: Winter Break Promo"));
        assert!(!prompt.contains("Requested changes"));
    }

    #[test]
    fn test_revision_prompt_includes_request() {
        let prompt = build_rewrite_prompt(&rewrite_request(Some("Mention the new campus")));
        assert!(prompt.contains("Requested changes:\nMention the new campus"));
        assert!(prompt.contains("Current title: Winter Break Promo"));
    }

    #[test]
    fn test_generate_prompt_anchors_keyword() {
        let request = GenerateRequest {
            client: ClientBrief {
                name: "ABC Academy".to_string(),
                region: "Gangnam".to_string(),
                business_type: "math academy".to_string(),
                main_service: None,
                differentiator: Some("small classes".to_string()),
            },
            topic: "winter intensive course".to_string(),
        };
        let prompt = build_generate_prompt(&request);
        assert!(prompt.contains("\"Gangnam math academy\""));
        assert!(prompt.contains("small classes"));
        assert!(prompt.contains("winter intensive course"));
    }

    #[test]
    fn test_parse_marked_response() {
        let response = "[TITLE]\nNew Title\n\n[BODY]\nFirst paragraph.\n\nSecond.";
        let draft = parse_draft(response, "fallback");
        assert_eq!(draft.title, "New Title");
        assert_eq!(draft.content, "First paragraph.\n\nSecond.");
    }

    #[test]
    fn test_parse_missing_title_uses_fallback() {
        let response = "[TITLE]\n\n[BODY]\nBody only.";
        let draft = parse_draft(response, "Original");
        assert_eq!(draft.title, "Original");
        assert_eq!(draft.content, "Body only.");
    }

    #[test]
    fn test_parse_unmarked_response_first_line_is_title() {
        let response = "# A Heading\nRest of the text\nmore";
        let draft = parse_draft(response, "fallback");
        assert_eq!(draft.title, "A Heading");
        assert_eq!(draft.content, "Rest of the text\nmore");
    }

    #[test]
    fn test_parse_single_line_response() {
        let draft = parse_draft("just one line", "fallback");
        assert_eq!(draft.title, "just one line");
        assert_eq!(draft.content, "just one line");
    }
}
