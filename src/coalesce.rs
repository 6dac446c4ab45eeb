//! Field coalescer.
//!
//! The single place that guarantees a finished article has every field
//! filled. Non-blank values pass through untouched; blank or missing ones
//! are replaced with defaults derived from the request.

use crate::parser::{ArticlePayload, SectionPayload};
use crate::style;
use crate::synthesizer;
use crate::types::{unique_tags, Draft, GenerationRequest, Section};

/// Default title when the source has none.
pub fn default_title(request: &GenerationRequest) -> String {
    format!("{}：{}的深度思考", request.topic(), request.audience())
}

/// Default introduction when the source has none.
pub fn default_introduction(request: &GenerationRequest) -> String {
    format!(
        "在当今时代，{}已成为{}关注的重要话题。",
        request.topic(),
        request.audience()
    )
}

/// Merge a parsed payload with request-derived defaults.
pub fn coalesce(payload: ArticlePayload, request: &GenerationRequest) -> Draft {
    Draft {
        title: non_blank(payload.title).unwrap_or_else(|| default_title(request)),
        introduction: non_blank(payload.introduction)
            .unwrap_or_else(|| default_introduction(request)),
        sections: coalesce_sections(payload.sections.unwrap_or_default(), request),
        tags: coalesce_tags(payload.tags.unwrap_or_default(), request),
    }
}

/// Re-apply the defaults to an already built draft, e.g. a synthesized one.
pub fn coalesce_draft(draft: Draft, request: &GenerationRequest) -> Draft {
    let payload = ArticlePayload {
        title: Some(draft.title),
        introduction: Some(draft.introduction),
        sections: Some(
            draft
                .sections
                .into_iter()
                .map(|s| SectionPayload {
                    title: Some(s.title),
                    content: Some(s.content),
                })
                .collect(),
        ),
        tags: Some(draft.tags),
    };
    coalesce(payload, request)
}

fn coalesce_sections(
    sections: Vec<SectionPayload>,
    request: &GenerationRequest,
) -> Vec<Section> {
    let kept: Vec<(Option<String>, Option<String>)> = sections
        .into_iter()
        .map(|s| (non_blank(s.title), non_blank(s.content)))
        .filter(|(title, content)| title.is_some() || content.is_some())
        .collect();

    if kept.len() < 2 {
        return synthesizer::fallback_sections(request);
    }

    let template = style::template(request.style());
    let (topic, audience) = (request.topic(), request.audience());
    let last = kept.len().saturating_sub(1);

    kept.into_iter()
        .enumerate()
        .map(|(idx, (title, content))| {
            let is_conclusion = idx == last;
            let title = title.unwrap_or_else(|| {
                if is_conclusion {
                    template.conclusion_title.to_owned()
                } else {
                    format!("{topic}要点{}", idx.saturating_add(1))
                }
            });
            let content = content.unwrap_or_else(|| {
                if is_conclusion {
                    (template.conclusion)(topic, audience)
                } else {
                    (template.body)(&title, topic, audience)
                }
            });
            Section { title, content }
        })
        .collect()
}

fn coalesce_tags(tags: Vec<String>, request: &GenerationRequest) -> Vec<String> {
    let tags = unique_tags(tags);
    if tags.is_empty() {
        synthesizer::fallback_tags(request)
    } else {
        tags
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
