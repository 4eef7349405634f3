//! Stage descriptors: prompt template, input slot and error label per stage.

use crate::core::StageKind;
use crate::errors::GenerationError;

const RESEARCH_TEMPLATE: &str = "
You are a specialized blog topic research agent. Your task is to:

1. Analyze the given blog topic
2. Research key points that should be included
3. Identify the target audience
4. Suggest a clear angle or perspective
5. Provide 3-5 key points that should be covered in the blog post

Topic: {topic}

Provide your research in a structured format with clear sections.
";

const OUTLINE_TEMPLATE: &str = "
You are a specialized blog outline generator. Your task is to:

1. Create a compelling and structured outline based on the research provided
2. Include an engaging introduction, clear sections with subpoints, and a conclusion
3. Make sure the outline flows logically and covers all key points
4. Suggest a compelling title for the blog post

Research Summary: {research}

Provide a detailed outline with a clear structure, including title, introduction, sections, and conclusion.
";

const WRITER_TEMPLATE: &str = "
You are a specialized blog content writer. Your task is to:

1. Write a comprehensive blog post based on the outline provided
2. Create engaging, well-structured content with proper headings and subheadings
3. Maintain a conversational and approachable tone
4. Include a strong introduction that hooks the reader and a conclusion that summarizes key points
5. Make the content valuable, informative, and actionable

Outline: {outline}

Write a complete blog post following the outline exactly.
";

/// Everything that distinguishes one stage agent from another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageDescriptor {
    /// Which stage this is.
    pub kind: StageKind,
    /// Prompt template with a single `{input_field}` slot.
    pub template: &'static str,
    /// Name of the slot filled with the stage input.
    pub input_field: &'static str,
    /// Label prepended to generation errors.
    pub error_label: &'static str,
}

impl StageDescriptor {
    /// Topic research.
    pub const RESEARCH: Self = Self {
        kind: StageKind::Research,
        template: RESEARCH_TEMPLATE,
        input_field: "topic",
        error_label: "Error researching topic",
    };

    /// Outline generation.
    pub const OUTLINE: Self = Self {
        kind: StageKind::Outline,
        template: OUTLINE_TEMPLATE,
        input_field: "research",
        error_label: "Error generating outline",
    };

    /// Article writing.
    pub const WRITER: Self = Self {
        kind: StageKind::Writer,
        template: WRITER_TEMPLATE,
        input_field: "outline",
        error_label: "Error writing content",
    };

    /// The three descriptors in pipeline order.
    #[must_use]
    pub fn pipeline() -> [Self; 3] {
        [Self::RESEARCH, Self::OUTLINE, Self::WRITER]
    }

    /// Returns the descriptor for a stage.
    #[must_use]
    pub fn for_kind(kind: StageKind) -> Self {
        match kind {
            StageKind::Research => Self::RESEARCH,
            StageKind::Outline => Self::OUTLINE,
            StageKind::Writer => Self::WRITER,
        }
    }

    /// Replaces the prompt template, keeping the same slot.
    #[must_use]
    pub fn with_template(mut self, template: &'static str) -> Self {
        self.template = template;
        self
    }

    /// Fills the template's slot with the input.
    #[must_use]
    pub fn render(&self, input: &str) -> String {
        let slot = format!("{{{}}}", self.input_field);
        self.template.replace(&slot, input)
    }

    /// Formats a generation failure the way the stage reports it.
    #[must_use]
    pub fn error_message(&self, error: &GenerationError) -> String {
        format!("{}: {error}", self.error_label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_order() {
        let kinds: Vec<_> = StageDescriptor::pipeline().iter().map(|d| d.kind).collect();
        assert_eq!(kinds, StageKind::ORDER.to_vec());
    }

    #[test]
    fn test_templates_have_their_slot() {
        for descriptor in StageDescriptor::pipeline() {
            let slot = format!("{{{}}}", descriptor.input_field);
            assert_eq!(descriptor.template.matches(&slot).count(), 1);
        }
    }

    #[test]
    fn test_render_fills_slot() {
        let prompt = StageDescriptor::RESEARCH.render("space travel");
        assert!(prompt.contains("Topic: space travel"));
        assert!(!prompt.contains("{topic}"));
    }

    #[test]
    fn test_render_does_not_expand_braces_in_input() {
        let prompt = StageDescriptor::OUTLINE.render("uses {research} literally");
        assert!(prompt.contains("Research Summary: uses {research} literally"));
    }

    #[test]
    fn test_custom_template() {
        let descriptor = StageDescriptor::WRITER.with_template("Write: {outline}");
        assert_eq!(descriptor.render("1. Intro"), "Write: 1. Intro");
    }

    #[test]
    fn test_error_message() {
        let message = StageDescriptor::OUTLINE.error_message(&GenerationError::other("rate limited"));
        assert_eq!(message, "Error generating outline: rate limited");
    }
}
