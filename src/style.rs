//! Style template table.
//!
//! One static [`StyleTemplate`] per [`Style`]. Everything that varies by
//! style (prompt tone, fallback phrasing, section headings) lives here as
//! data, so the rest of the pipeline never branches on style.

use crate::types::Style;

/// Generates a section body from `(section_title, topic, audience)`.
pub type BodyFn = fn(&str, &str, &str) -> String;

/// Generates a conclusion from `(topic, audience)`.
pub type ConclusionFn = fn(&str, &str) -> String;

/// Static phrasing for one writing style.
#[derive(Debug)]
pub struct StyleTemplate {
    /// The style this template belongs to.
    pub style: Style,
    /// Short human label shown in style pickers.
    pub label: &'static str,
    /// Tone description handed to the model in the system prompt.
    pub description: &'static str,
    /// Opening words of a synthesized introduction.
    pub intro_prefix: &'static str,
    /// Headings of the three synthesized body sections.
    pub section_titles: [&'static str; 3],
    /// Heading of the closing section.
    pub conclusion_title: &'static str,
    /// Two-paragraph body generator.
    pub body: BodyFn,
    /// Closing paragraph generator.
    pub conclusion: ConclusionFn,
}

impl StyleTemplate {
    /// Introduction paragraph for a synthesized article.
    pub fn introduction(&self, topic: &str, audience: &str) -> String {
        format!(
            "{}{topic}已经成为了我们生活中不可忽视的重要话题。对于{audience}来说，深入理解这个主题的意义尤为重大。通过本文，我们将从多个角度来探讨这个话题，为大家提供有价值的见解和实用的建议。",
            self.intro_prefix
        )
    }
}

/// Separator between paragraphs inside a section body.
pub const PARAGRAPH_BREAK: &str = "\n\n";

static PROFESSIONAL: StyleTemplate = StyleTemplate {
    style: Style::Professional,
    label: "专业严谨",
    description: "专业严谨，语言客观准确，逻辑清晰，适合商务和职场场景",
    intro_prefix: "在当今快速发展的时代，",
    section_titles: ["核心概念解析", "实践应用指南", "发展趋势分析"],
    conclusion_title: "总结",
    body: professional_body,
    conclusion: professional_conclusion,
};

static CASUAL: StyleTemplate = StyleTemplate {
    style: Style::Casual,
    label: "轻松随意",
    description: "轻松随意，语言亲切自然，贴近生活，适合日常分享",
    intro_prefix: "说到",
    section_titles: ["生活中的小发现", "实用技巧分享", "个人感悟总结"],
    conclusion_title: "总结",
    body: casual_body,
    conclusion: casual_conclusion,
};

static HUMOROUS: StyleTemplate = StyleTemplate {
    style: Style::Humorous,
    label: "幽默风趣",
    description: "幽默风趣，语言生动活泼，适当运用调侃和段子，但保持得体",
    intro_prefix: "有没有发现，",
    section_titles: ["搞笑的现象观察", "有趣的对比分析", "轻松的解决方案"],
    conclusion_title: "总结",
    body: humorous_body,
    conclusion: humorous_conclusion,
};

static INSPIRATIONAL: StyleTemplate = StyleTemplate {
    style: Style::Inspirational,
    label: "励志激励",
    description: "励志激励，语言积极正能量，能够激发读者思考和行动",
    intro_prefix: "每个人都有一个梦想，",
    section_titles: ["成功案例分析", "行动计划制定", "未来愿景展望"],
    conclusion_title: "总结",
    body: inspirational_body,
    conclusion: inspirational_conclusion,
};

/// Look up the template for a style.
pub fn template(style: Style) -> &'static StyleTemplate {
    match style {
        Style::Professional => &PROFESSIONAL,
        Style::Casual => &CASUAL,
        Style::Humorous => &HUMOROUS,
        Style::Inspirational => &INSPIRATIONAL,
    }
}

fn professional_body(section: &str, topic: &str, audience: &str) -> String {
    format!(
        "从{section}的角度来分析{topic}，我们可以看到其对{audience}的深远影响。通过数据分析和实践验证，这种影响体现在多个层面，需要我们采取相应的策略来应对。{PARAGRAPH_BREAK}具体来说，{topic}在{audience}的工作和生活中起到了关键作用。我们应该从专业的角度来理解和运用相关知识，以提高效率和质量。"
    )
}

fn casual_body(section: &str, topic: &str, audience: &str) -> String {
    format!(
        "聊到{section}这个话题，我想起了前几天的一个小故事。作为{audience}，我们总是在生活中遇到各种有趣的情况，这让我对{topic}这个问题有了新的思考。{PARAGRAPH_BREAK}其实，{topic}就在我们身边，只要我们用心观察和体验，就能发现很多有趣的细节。这些细节往往能给我们带来意想不到的启发。"
    )
}

fn humorous_body(section: &str, topic: &str, audience: &str) -> String {
    format!(
        "说真的，{section}这事儿啊，就像是{audience}的日常修炼一样。有时候你以为自己很懂{topic}，结果发现还是太年轻了，这不禁让人会心一笑。{PARAGRAPH_BREAK}不过话说回来，正是这些\"翻车\"的经历，让我们对{topic}有了更深刻的理解。毕竟，生活就是一场大型翻车现场，我们都是其中的演员。"
    )
}

fn inspirational_body(section: &str, topic: &str, audience: &str) -> String {
    format!(
        "当我们谈论{section}时，实际上是在谈论如何成为更好的自己。每一个{audience}都有无限的潜能，关键在于如何激发和释放这种潜能。{topic}为我们提供了这样的机会。{PARAGRAPH_BREAK}记住，成功不是一蹴而就的，而是需要我们在{topic}的道路上不断努力和坚持。每一个小小的进步都值得我们为自己骄傲。"
    )
}

fn professional_conclusion(topic: &str, audience: &str) -> String {
    format!(
        "综上所述，{topic}对{audience}具有重要的指导意义。我们应当以专业的态度对待这个问题，在实践中不断完善和优化我们的方法论。通过系统性的学习和应用，相信每个人都能在这个领域取得进步。"
    )
}

fn casual_conclusion(topic: &str, audience: &str) -> String {
    format!(
        "总的来说，{topic}这个话题还是挺有意思的。作为{audience}，我们可以在日常生活中多留意这些细节，说不定会有意想不到的收获呢。记住，生活本身就是最好的老师。"
    )
}

fn humorous_conclusion(topic: &str, audience: &str) -> String {
    format!(
        "最后想说的是，{topic}这事儿嘛，{audience}们大可不必太过紧张。毕竟生活本来就充满了惊喜和意外，保持一颗平常心最重要。笑着面对，一切都会变得简单起来。"
    )
}

fn inspirational_conclusion(topic: &str, audience: &str) -> String {
    format!(
        "愿每一个{audience}都能在{topic}的道路上找到属于自己的那片天空。记住，最美的风景永远在前方，最好的自己永远在路上。相信自己，你一定可以做到！"
    )
}
