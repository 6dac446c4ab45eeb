//! Prompt builder.
//!
//! Turns a [`GenerationRequest`] into the system and user prompts sent to
//! the chat-completions service. The JSON layout spelled out in
//! [`RESPONSE_SCHEMA`] is the one [`crate::parser`] deserializes; keep them
//! in step.

use crate::style;
use crate::types::GenerationRequest;

/// Role preamble for the system prompt.
const WRITER_ROLE: &str = "你是一个专业的微信公众号文章写手，擅长创作高质量的原创文章。";

/// Literal response layout the model is asked to return.
pub const RESPONSE_SCHEMA: &str = r#"{
  "title": "文章标题",
  "introduction": "引言内容（200字左右）",
  "sections": [
    {
      "title": "小节1标题",
      "content": "小节1内容"
    },
    {
      "title": "小节2标题",
      "content": "小节2内容"
    },
    {
      "title": "小节3标题",
      "content": "小节3内容"
    },
    {
      "title": "总结",
      "content": "总结性内容（150字左右）"
    }
  ],
  "tags": ["标签1", "标签2", "标签3", "标签4"]
}"#;

/// The pair of prompts for one chat-completions call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    /// Instructions and output schema.
    pub system: String,
    /// The concrete writing request.
    pub user: String,
}

/// Build the prompts for a request. Pure and deterministic.
pub fn build_prompts(request: &GenerationRequest) -> Prompts {
    let tone = style::template(request.style()).description;
    let word_count = request.word_count();
    let audience = request.audience();

    let system = format!(
        "{WRITER_ROLE}\n\n\
         写作要求：\n\
         1. 文章风格：{tone}\n\
         2. 目标字数：{word_count}字左右\n\
         3. 目标受众：{audience}\n\
         4. 文章结构要完整，包含引言、4-6个小节（最后一个小节必须是总结性质的）\n\
         5. 语言要生动有趣，适合微信公众号阅读\n\
         6. 内容要有价值，能够给读者带来启发或实用信息\n\
         7. 每个小节内容要充实，避免空洞的表述\n\
         8. 使用具体的例子和数据来支撑观点\n\
         9. 最后一个小节应该是总结，标题可以是\"总结\"、\"结语\"、\"写在最后\"等\n\n\
         请严格按照以下JSON格式返回结果：\n\
         {RESPONSE_SCHEMA}"
    );

    let user = format!(
        "请以\"{}\"为主题，为{audience}写一篇{word_count}字左右的微信公众号文章。",
        request.topic()
    );

    Prompts { system, user }
}
