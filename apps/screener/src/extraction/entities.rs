//! Entity reconstruction: merges BIO-tagged sub-word tokens back into whole entity strings.
//!
//! The tagger emits one label per word piece (`B-<TYPE>`, `I-<TYPE>` or `O`).
//! Pieces of one span are concatenated after stripping the `##` continuation
//! marker, so `["Jo", "##hn"]` becomes `"John"`.

use serde::{Deserialize, Serialize};

pub const NOT_FOUND: &str = "Not Found";

/// The entity categories the screener keeps. Every other tag type is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityCategory {
    Name,
    EmailAddress,
    Skills,
}

impl EntityCategory {
    /// Maps a raw label suffix (the part after `B-`/`I-`) onto a tracked category.
    pub fn from_label_type(label_type: &str) -> Option<Self> {
        match label_type {
            "PER" | "PERSON" | "Candidate" | "Name" => Some(Self::Name),
            "EMAIL" | "Mail" | "Email" | "Email_Address" => Some(Self::EmailAddress),
            "SKILL" | "Skill" | "Technology" | "Skills" => Some(Self::Skills),
            _ => None,
        }
    }
}

/// One word piece with the label the classifier predicted for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedToken {
    pub token: String,
    pub label: String,
}

impl TaggedToken {
    pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            label: label.into(),
        }
    }
}

/// Reconstructed entities. Each field is the `", "`-joined list of spans, or `"Not Found"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entities {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email_Address")]
    pub email_address: String,
    #[serde(rename = "Skills")]
    pub skills: String,
}

impl Entities {
    pub fn name_found(&self) -> bool {
        !self.name.is_empty() && self.name != NOT_FOUND
    }
}

enum Tag<'a> {
    Begin(&'a str),
    Inside,
    Outside,
}

fn parse_tag(label: &str) -> Tag<'_> {
    if let Some(rest) = label.strip_prefix("B-") {
        // Only the segment up to the next '-' names the type ("B-Email-Address" → "Email").
        Tag::Begin(rest.split('-').next().unwrap_or_default())
    } else if label.starts_with("I-") {
        Tag::Inside
    } else {
        Tag::Outside
    }
}

#[derive(Default)]
struct SpanCollector {
    names: Vec<String>,
    emails: Vec<String>,
    skills: Vec<String>,
    open: Option<(EntityCategory, String)>,
}

impl SpanCollector {
    fn flush(&mut self) {
        if let Some((category, buffer)) = self.open.take() {
            if buffer.is_empty() {
                return;
            }
            match category {
                EntityCategory::Name => self.names.push(buffer),
                EntityCategory::EmailAddress => self.emails.push(buffer),
                EntityCategory::Skills => self.skills.push(buffer),
            }
        }
    }

    fn push(&mut self, token: &TaggedToken) {
        match parse_tag(&token.label) {
            Tag::Begin(label_type) => {
                self.flush();
                self.open = EntityCategory::from_label_type(label_type)
                    .map(|category| (category, strip_continuation(&token.token)));
            }
            Tag::Inside => {
                if let Some((_, buffer)) = self.open.as_mut() {
                    buffer.push_str(&strip_continuation(&token.token));
                }
            }
            Tag::Outside => self.flush(),
        }
    }

    fn finish(mut self) -> Entities {
        self.flush();
        Entities {
            name: join_or_not_found(&self.names),
            email_address: join_or_not_found(&self.emails),
            skills: join_or_not_found(&self.skills),
        }
    }
}

fn strip_continuation(token: &str) -> String {
    token.replace("##", "")
}

fn join_or_not_found(spans: &[String]) -> String {
    if spans.is_empty() {
        NOT_FOUND.to_string()
    } else {
        spans.join(", ")
    }
}

/// Rebuilds entity strings from a token/label sequence.
///
/// - `B-<TYPE>` closes the open span and opens a new one (untracked types open nothing).
/// - `I-<TYPE>` extends the open span, or is dropped when nothing is open.
/// - `O` (or any other label) closes the open span.
pub fn reconstruct_entities(tokens: &[TaggedToken]) -> Entities {
    let mut collector = SpanCollector::default();
    for token in tokens {
        collector.push(token);
    }
    collector.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(pairs: &[(&str, &str)]) -> Vec<TaggedToken> {
        pairs.iter().map(|(t, l)| TaggedToken::new(*t, *l)).collect()
    }

    #[test]
    fn test_subword_pieces_are_joined_without_separator() {
        let tokens = tagged(&[("[CLS]", "O"), ("Jo", "B-Name"), ("##hn", "I-Name"), ("[SEP]", "O")]);
        let entities = reconstruct_entities(&tokens);
        assert_eq!(entities.name, "John");
        assert_eq!(entities.email_address, NOT_FOUND);
        assert_eq!(entities.skills, NOT_FOUND);
    }

    #[test]
    fn test_label_aliases_map_to_canonical_categories() {
        let tokens = tagged(&[
            ("alice", "B-PER"),
            ("a@b.io", "B-EMAIL"),
            ("rust", "B-Technology"),
            ("go", "B-SKILL"),
        ]);
        let entities = reconstruct_entities(&tokens);
        assert_eq!(entities.name, "alice");
        assert_eq!(entities.email_address, "a@b.io");
        assert_eq!(entities.skills, "rust, go");
    }

    #[test]
    fn test_begin_never_merges_into_preceding_span() {
        let tokens = tagged(&[("Py", "B-Skill"), ("##thon", "I-Skill"), ("Jane", "B-Candidate")]);
        let entities = reconstruct_entities(&tokens);
        assert_eq!(entities.skills, "Python");
        assert_eq!(entities.name, "Jane");
    }

    #[test]
    fn test_consecutive_begins_of_same_type_are_separate_spans() {
        let tokens = tagged(&[("Docker", "B-Skills"), ("Git", "B-Skills")]);
        assert_eq!(reconstruct_entities(&tokens).skills, "Docker, Git");
    }

    #[test]
    fn test_inside_without_open_span_is_discarded() {
        let tokens = tagged(&[("stray", "I-Name"), ("O", "O"), ("##piece", "I-Skills")]);
        let entities = reconstruct_entities(&tokens);
        assert_eq!(entities.name, NOT_FOUND);
        assert_eq!(entities.skills, NOT_FOUND);
    }

    #[test]
    fn test_inside_after_unmapped_begin_is_discarded() {
        let tokens = tagged(&[("Acme", "B-ORG"), ("##Corp", "I-ORG"), ("Smith", "I-Name")]);
        let entities = reconstruct_entities(&tokens);
        assert_eq!(entities.name, NOT_FOUND);
        assert_eq!(entities.skills, NOT_FOUND);
        assert_eq!(entities.email_address, NOT_FOUND);
    }

    #[test]
    fn test_inside_of_other_tracked_type_extends_open_span() {
        let tokens = tagged(&[("Ann", "B-Name"), ("x", "I-Skills")]);
        let entities = reconstruct_entities(&tokens);
        assert_eq!(entities.name, "Annx");
        assert_eq!(entities.skills, NOT_FOUND);
    }

    #[test]
    fn test_outside_closes_span() {
        let tokens = tagged(&[("Ann", "B-Name"), ("and", "O"), ("##ers", "I-Name")]);
        assert_eq!(reconstruct_entities(&tokens).name, "Ann");
    }

    #[test]
    fn test_order_is_preserved_across_spans() {
        let tokens = tagged(&[
            ("S", "B-Skill"),
            ("##Q", "I-Skill"),
            ("##L", "I-Skill"),
            (",", "O"),
            ("Java", "B-Skill"),
            (",", "O"),
            ("C", "B-Skill"),
            ("##++", "I-Skill"),
        ]);
        assert_eq!(reconstruct_entities(&tokens).skills, "SQL, Java, C++");
    }

    #[test]
    fn test_trailing_span_is_flushed() {
        let tokens = tagged(&[("jane", "B-Email_Address"), ("@", "I-Email_Address"), ("x.com", "I-Email_Address")]);
        assert_eq!(reconstruct_entities(&tokens).email_address, "jane@x.com");
    }

    #[test]
    fn test_type_is_first_segment_after_prefix() {
        let tokens = tagged(&[("me@x.io", "B-Email-Address")]);
        assert_eq!(reconstruct_entities(&tokens).email_address, "me@x.io");
    }

    #[test]
    fn test_empty_input_is_all_not_found() {
        let entities = reconstruct_entities(&[]);
        assert!(!entities.name_found());
        assert_eq!(entities.skills, NOT_FOUND);
    }
}
