//! Core data model: generation requests, writing styles, and documents.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Writing style requested for an article.
///
/// The set is closed; every style has exactly one entry in the
/// [`crate::style`] template table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Style {
    /// Objective, precise, business-oriented.
    Professional,
    /// Relaxed and conversational.
    Casual,
    /// Playful, with jokes that stay tasteful.
    Humorous,
    /// Upbeat and motivating.
    Inspirational,
}

impl Style {
    /// Every style, in display order.
    pub const ALL: [Style; 4] = [
        Style::Professional,
        Style::Casual,
        Style::Humorous,
        Style::Inspirational,
    ];

    /// Stable identifier (`professional`, `casual`, ...).
    pub fn id(self) -> &'static str {
        match self {
            Self::Professional => "professional",
            Self::Casual => "casual",
            Self::Humorous => "humorous",
            Self::Inspirational => "inspirational",
        }
    }

    /// Human label, e.g. `专业严谨`.
    pub fn label(self) -> &'static str {
        crate::style::template(self).label
    }

    /// Tone description used in the system prompt.
    pub fn description(self) -> &'static str {
        crate::style::template(self).description
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Style {
    type Err = RequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|style| style.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RequestError::UnknownStyle(s.to_owned()))
    }
}

/// Errors raised while constructing a [`GenerationRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    /// Topic is empty or whitespace.
    #[error("topic must not be empty")]
    EmptyTopic,
    /// Audience is empty or whitespace.
    #[error("audience must not be empty")]
    EmptyAudience,
    /// Target word count was zero.
    #[error("word count must be greater than zero")]
    ZeroWordCount,
    /// Style identifier did not match any known style.
    #[error("unknown style '{0}', expected one of: professional, casual, humorous, inspirational")]
    UnknownStyle(String),
}

/// A request for one generated article. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    topic: String,
    style: Style,
    word_count: u32,
    audience: String,
}

impl GenerationRequest {
    /// Build a request, rejecting blank text fields and a zero word count.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] describing the first invalid field.
    pub fn new(
        topic: impl Into<String>,
        style: Style,
        word_count: u32,
        audience: impl Into<String>,
    ) -> Result<Self, RequestError> {
        let topic = topic.into();
        let audience = audience.into();
        if topic.trim().is_empty() {
            return Err(RequestError::EmptyTopic);
        }
        if audience.trim().is_empty() {
            return Err(RequestError::EmptyAudience);
        }
        if word_count == 0 {
            return Err(RequestError::ZeroWordCount);
        }
        Ok(Self {
            topic,
            style,
            word_count,
            audience,
        })
    }

    /// Article topic.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Requested writing style.
    pub fn style(&self) -> Style {
        self.style
    }

    /// Approximate target length in characters/words.
    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    /// Intended readership.
    pub fn audience(&self) -> &str {
        &self.audience
    }

    /// The style tag appended to every fallback tag list, e.g. `professional风格`.
    pub fn style_tag(&self) -> String {
        format!("{}风格", self.style)
    }
}

/// One titled section of an article. The last section of a document is
/// always its conclusion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section heading.
    pub title: String,
    /// Section body; paragraphs are separated by a blank line.
    pub content: String,
}

impl Section {
    /// Convenience constructor.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Document content before it is stamped with a creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Draft {
    /// Article title.
    pub title: String,
    /// Opening paragraph.
    pub introduction: String,
    /// Ordered sections, conclusion last.
    pub sections: Vec<Section>,
    /// Insertion-ordered, duplicate-free tags.
    pub tags: Vec<String>,
}

impl Draft {
    /// Stamp the draft with its creation time.
    pub fn finalize(self, created_at: DateTime<Utc>) -> Document {
        Document {
            title: self.title,
            introduction: self.introduction,
            sections: self.sections,
            tags: self.tags,
            created_at,
        }
    }
}

/// A complete generated article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    /// Article title.
    pub title: String,
    /// Opening paragraph.
    pub introduction: String,
    /// Ordered sections, conclusion last.
    pub sections: Vec<Section>,
    /// Insertion-ordered, duplicate-free tags.
    pub tags: Vec<String>,
    /// When the pipeline finalized this document.
    pub created_at: DateTime<Utc>,
}

impl Document {
    /// The final (conclusion) section.
    pub fn conclusion(&self) -> Option<&Section> {
        self.sections.last()
    }

    /// Whether every invariant of a finished document holds: non-empty text
    /// fields, at least two sections, at least one tag, no duplicate tags.
    pub fn is_well_formed(&self) -> bool {
        let text_ok = !self.title.trim().is_empty() && !self.introduction.trim().is_empty();
        let sections_ok = self.sections.len() >= 2
            && self
                .sections
                .iter()
                .all(|s| !s.title.trim().is_empty() && !s.content.trim().is_empty());
        let tags_ok = !self.tags.is_empty()
            && self.tags.iter().all(|t| !t.trim().is_empty())
            && self
                .tags
                .iter()
                .enumerate()
                .all(|(i, tag)| !self.tags.iter().take(i).any(|earlier| earlier == tag));
        text_ok && sections_ok && tags_ok
    }
}

/// Collect tags into an insertion-ordered set, dropping blanks and repeats.
pub fn unique_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.into();
        if tag.trim().is_empty() || out.contains(&tag) {
            continue;
        }
        out.push(tag);
    }
    out
}
