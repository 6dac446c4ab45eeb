//! Fallback synthesizer.
//!
//! Builds a complete article from the style template table alone, with no
//! external call. Output depends only on the request, so two calls with the
//! same request produce identical drafts.

use crate::style::{self, StyleTemplate};
use crate::types::{unique_tags, Draft, GenerationRequest, Section};

/// Title used for synthesized articles.
pub fn fallback_title(request: &GenerationRequest) -> String {
    format!("{}：{}必须知道的那些事", request.topic(), request.audience())
}

/// Tags used whenever no usable tags are available: topic, audience, style.
pub fn fallback_tags(request: &GenerationRequest) -> Vec<String> {
    unique_tags([
        request.topic().to_owned(),
        request.audience().to_owned(),
        request.style_tag(),
    ])
}

/// The three templated body sections followed by the conclusion.
pub fn fallback_sections(request: &GenerationRequest) -> Vec<Section> {
    let template = style::template(request.style());
    let (topic, audience) = (request.topic(), request.audience());

    template
        .section_titles
        .iter()
        .map(|title| Section::new(*title, (template.body)(title, topic, audience)))
        .chain(std::iter::once(conclusion_section(template, topic, audience)))
        .collect()
}

fn conclusion_section(template: &StyleTemplate, topic: &str, audience: &str) -> Section {
    Section::new(
        template.conclusion_title,
        (template.conclusion)(topic, audience),
    )
}

/// Synthesize a full draft for the request.
pub fn synthesize(request: &GenerationRequest) -> Draft {
    let template = style::template(request.style());
    Draft {
        title: fallback_title(request),
        introduction: template.introduction(request.topic(), request.audience()),
        sections: fallback_sections(request),
        tags: fallback_tags(request),
    }
}
