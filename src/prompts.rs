//! Prompt templates for pairwise relevance judgments.
//!
//! Domain logic for rendering comparison prompts. Provider-agnostic.

use tracing::warn;

use crate::gateway::Message;

/// Placeholder replaced with the query text.
pub const QUERY_PLACEHOLDER: &str = "{query}";
/// Placeholder replaced with the document shown as "Line A".
pub const DOC_A_PLACEHOLDER: &str = "{docA}";
/// Placeholder replaced with the document shown as "Line B".
pub const DOC_B_PLACEHOLDER: &str = "{docB}";

pub const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

/// The oracle must begin its answer with "Line A" or "Line B"; only that
/// leading token is read back.
pub const DEFAULT_PAIRWISE_PROMPT: &str = r#"Given the query:
{query}

Compare the following two lines:

Line A:
{docA}

Line B:
{docB}

Which line is more relevant to the query? Please answer with "Line A" or "Line B"."#;

/// Rendered prompt ready for the LLM.
#[derive(Debug, Clone)]
pub struct PromptInstance {
    pub system: String,
    pub user: String,
}

impl PromptInstance {
    pub fn to_messages(&self) -> Vec<Message> {
        vec![Message::system(&self.system), Message::user(&self.user)]
    }
}

/// A pairwise prompt template with `{query}`, `{docA}` and `{docB}` slots.
///
/// `{{` and `}}` stand for literal braces. Any other brace text, such as an
/// unknown `{name}` or a lone `}`, is copied through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self {
            text: DEFAULT_PAIRWISE_PROMPT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Query,
    DocA,
    DocB,
}

const SLOTS: [(&str, Slot); 3] = [
    (QUERY_PLACEHOLDER, Slot::Query),
    (DOC_A_PLACEHOLDER, Slot::DocA),
    (DOC_B_PLACEHOLDER, Slot::DocB),
];

enum Piece<'t> {
    Text(&'t str),
    Slot(Slot),
}

impl PromptTemplate {
    /// Use `text` verbatim as the template.
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Placeholders absent from the template.
    pub fn missing_placeholders(&self) -> Vec<&'static str> {
        let present: Vec<Slot> = self
            .pieces()
            .into_iter()
            .filter_map(|piece| match piece {
                Piece::Slot(slot) => Some(slot),
                Piece::Text(_) => None,
            })
            .collect();
        SLOTS
            .into_iter()
            .filter(|(_, slot)| !present.contains(slot))
            .map(|(placeholder, _)| placeholder)
            .collect()
    }

    /// Warn about missing placeholders. A template without them still runs,
    /// it just gives the oracle less to go on.
    pub fn validate(&self) {
        let missing = self.missing_placeholders();
        if !missing.is_empty() {
            warn!(
                missing = ?missing,
                "Prompt template is missing placeholders; they will not be filled"
            );
        }
    }

    /// Fill the template. Substituted values are never scanned again, so
    /// placeholder-like text inside a document stays as written.
    pub fn render(&self, query: &str, doc_a: &str, doc_b: &str) -> PromptInstance {
        let mut user =
            String::with_capacity(self.text.len() + query.len() + doc_a.len() + doc_b.len());
        for piece in self.pieces() {
            user.push_str(match piece {
                Piece::Text(text) => text,
                Piece::Slot(Slot::Query) => query,
                Piece::Slot(Slot::DocA) => doc_a,
                Piece::Slot(Slot::DocB) => doc_b,
            });
        }

        PromptInstance {
            system: SYSTEM_PROMPT.to_string(),
            user,
        }
    }

    /// Split the template into literal text and slots in one left-to-right scan.
    fn pieces(&self) -> Vec<Piece<'_>> {
        let mut pieces = Vec::new();
        let mut rest = self.text.as_str();
        'scan: while let Some(at) = rest.find(|c: char| c == '{' || c == '}') {
            pieces.push(Piece::Text(&rest[..at]));
            let tail = &rest[at..];
            if tail.starts_with("{{") || tail.starts_with("}}") {
                pieces.push(Piece::Text(&tail[..1]));
                rest = &tail[2..];
                continue;
            }
            for (placeholder, slot) in SLOTS {
                if let Some(after) = tail.strip_prefix(placeholder) {
                    pieces.push(Piece::Slot(slot));
                    rest = after;
                    continue 'scan;
                }
            }
            pieces.push(Piece::Text(&tail[..1]));
            rest = &tail[1..];
        }
        pieces.push(Piece::Text(rest));
        pieces
    }
}

// =============================================================================
// TESTS
// =============================================================================
