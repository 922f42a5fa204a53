//! Prompt builders for the two generation steps.
//!
//! The slide prompt pins down the paragraph layout that
//! [`crate::slides::parse_slides`] expects, including the exact
//! [`IMAGE_PROMPT_MARKER`] spelling.

use crate::slides::IMAGE_PROMPT_MARKER;

/// Prompt asking for a LinkedIn post about `headline` aimed at `industry`
/// professionals.
pub fn linkedin_post(headline: &str, industry: &str) -> String {
    format!(
        "Craft an engaging LinkedIn post within 1000 words based on the provided news headline: \
\"{headline}\". The post should target {industry} professionals. \
Use statistical data, bullet points, and a captivating hook. \
Incorporate emojis where appropriate."
    )
}

/// Prompt asking the model to break a post into slides with image prompts.
pub fn slide_breakdown(post: &str) -> String {
    format!(
        r#"Break the following LinkedIn post into 5 to 8 presentation slides.

Format every slide as one paragraph and separate slides with exactly one blank line.
Inside a paragraph:
- the first line is the slide title
- each following line is one short bullet point (no blank lines between them)
- the last line starts with "{IMAGE_PROMPT_MARKER}" followed by a one-sentence description of an image for the slide

Do not add any introduction, numbering or closing remarks.

LinkedIn post:
{post}"#
    )
}
