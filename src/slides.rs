//! Slide outline parsing.
//!
//! The slide-generation prompt asks the model to answer with one paragraph per
//! slide, paragraphs separated by a blank line:
//!
//! ```text
//! Title of the slide
//! First bullet
//! Second bullet
//! Image Prompt: a description for an image generator
//! ```
//!
//! [`parse_slides`] turns such a block into [`SlideRecord`]s. It never fails:
//! paragraphs without the [`IMAGE_PROMPT_MARKER`] are skipped and missing
//! pieces become empty strings. Whether an empty result is a problem is up to
//! the caller.

use serde::{Deserialize, Serialize};

/// Literal token separating a slide's text from its image prompt.
pub const IMAGE_PROMPT_MARKER: &str = "Image Prompt:";

const PARAGRAPH_DELIMITER: &str = "\n\n";

/// One slide of a generated outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlideRecord {
    /// First line of the slide paragraph, trimmed. Empty when the marker
    /// starts the paragraph.
    pub title: String,
    /// Non-empty lines between the title and the marker, in order.
    pub points: Vec<String>,
    /// Everything after the first marker, trimmed.
    pub image_prompt: String,
}

/// Result of [`parse_slides_with_stats`].
#[derive(Debug, Default, PartialEq, Eq)]
pub struct SlideParse {
    pub slides: Vec<SlideRecord>,
    /// Non-blank paragraphs that carried no marker and were dropped.
    pub skipped: usize,
}

/// Parse a generated slide outline into ordered slide records.
pub fn parse_slides(raw_text: &str) -> Vec<SlideRecord> {
    parse_slides_with_stats(raw_text).slides
}

/// Like [`parse_slides`], but also counts the non-blank paragraphs it dropped
/// so callers can tell preamble text from model output drift.
pub fn parse_slides_with_stats(raw_text: &str) -> SlideParse {
    let mut parse = SlideParse::default();

    for paragraph in raw_text.split(PARAGRAPH_DELIMITER) {
        match parse_paragraph(paragraph) {
            Some(slide) => parse.slides.push(slide),
            None if !paragraph.trim().is_empty() => parse.skipped += 1,
            None => {}
        }
    }

    parse
}

fn parse_paragraph(paragraph: &str) -> Option<SlideRecord> {
    let (head, image_prompt) = paragraph.split_once(IMAGE_PROMPT_MARKER)?;

    let mut lines = head.trim().lines();
    let title = lines.next().unwrap_or_default().trim().to_string();
    let points = lines
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    Some(SlideRecord {
        title,
        points,
        image_prompt: image_prompt.trim().to_string(),
    })
}

/// Write slides back into the paragraph shape [`parse_slides`] reads.
pub fn format_slides(slides: &[SlideRecord]) -> String {
    slides
        .iter()
        .map(|slide| {
            let mut paragraph = slide.title.clone();
            for point in &slide.points {
                paragraph.push('\n');
                paragraph.push_str(point);
            }
            paragraph.push('\n');
            paragraph.push_str(IMAGE_PROMPT_MARKER);
            paragraph.push(' ');
            paragraph.push_str(&slide.image_prompt);
            paragraph
        })
        .collect::<Vec<_>>()
        .join(PARAGRAPH_DELIMITER)
}
