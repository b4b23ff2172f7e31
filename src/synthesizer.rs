//! Turns a transcript into slide concepts and an Instagram caption.
//!
//! Builds the two prompts, invokes the model fallback chain, recovers
//! structure with the output parser, and normalizes the result. Missing
//! fields are defaulted rather than failed — a half-usable model answer
//! beats an error for this tool.

use reqwest::Client;
use serde_json::Value;

use crate::error::{CarouselError, Result};
use crate::invoker::ModelInvoker;
use crate::output_parser::parse_value;
use crate::types::{Caption, Slide};

/// Transcript prefix sent to the model, in bytes. Keeps the prompt inside
/// backend input limits; a few thousand words is plenty for concept
/// extraction.
const TRANSCRIPT_PREFIX_LIMIT: usize = 12_000;

/// Requested slide counts outside this range are clamped.
pub const SLIDE_COUNT_RANGE: std::ops::RangeInclusive<u32> = 1..=20;

pub struct Synthesizer {
    invoker: ModelInvoker,
}

impl Synthesizer {
    pub fn new(invoker: ModelInvoker) -> Self {
        Self { invoker }
    }

    /// Extract `slide_count` concepts from the transcript.
    ///
    /// Always returns exactly `slide_count` slides: surplus model objects
    /// are dropped, missing ones padded with a placeholder title and empty
    /// content. Numbers are contiguous starting at 2 (slide 1 is the cover).
    pub async fn synthesize_slides(
        &self,
        client: &Client,
        transcript: &str,
        slide_count: u32,
        title: &str,
    ) -> Result<Vec<Slide>> {
        let slide_count = slide_count.clamp(*SLIDE_COUNT_RANGE.start(), *SLIDE_COUNT_RANGE.end());
        let prompt = slides_prompt(transcript, slide_count, title);

        let text = self.invoker.invoke(client, &prompt).await?;
        let value = parse_value(&text)?;

        let objects = value.as_array().ok_or_else(|| {
            CarouselError::InvalidModelOutput("expected a JSON array of slides".into())
        })?;

        Ok(normalize_slides(objects, slide_count))
    }

    /// Write the caption (description + hashtags) for a slide set.
    ///
    /// Missing fields default to empty strings.
    pub async fn synthesize_caption(
        &self,
        client: &Client,
        title: &str,
        slides: &[Slide],
    ) -> Result<Caption> {
        let prompt = caption_prompt(title, slides);
        let text = self.invoker.invoke(client, &prompt).await?;
        let value = parse_value(&text)?;

        Ok(Caption {
            description: string_field(&value, "description"),
            hashtags: string_field(&value, "hashtags"),
        })
    }
}

/// Truncate/pad model objects to exactly `slide_count` numbered slides.
fn normalize_slides(objects: &[Value], slide_count: u32) -> Vec<Slide> {
    (0..slide_count as usize)
        .map(|i| {
            let object = objects.get(i);
            let title = object
                .and_then(|o| o.get("title"))
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("Concept {}", i + 1));
            let content = object
                .and_then(|o| o.get("content"))
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();
            Slide {
                number: i as u32 + 2,
                title,
                content,
            }
        })
        .collect()
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_string()
}

/// Cut the transcript to the prefix limit on a char boundary.
fn truncate_transcript(transcript: &str) -> &str {
    if transcript.len() <= TRANSCRIPT_PREFIX_LIMIT {
        return transcript;
    }
    let mut end = TRANSCRIPT_PREFIX_LIMIT;
    while !transcript.is_char_boundary(end) {
        end -= 1;
    }
    &transcript[..end]
}

fn slides_prompt(transcript: &str, slide_count: u32, title: &str) -> String {
    let truncated = truncate_transcript(transcript);
    let title_line = if title.is_empty() {
        String::new()
    } else {
        format!("Video title: \"{title}\"\n\n")
    };

    format!(
        r#"You are an expert Instagram content creator. Analyze the following YouTube video transcript and extract exactly {slide_count} key concepts.

IMPORTANT RULES:
- Do NOT copy literal phrases from the transcript. SYNTHESIZE and rephrase the ideas.
- Each concept must be clear, concise, and valuable on its own.
- Adapt the tone for social media: direct, actionable, interesting.
- Respect the original language of the content: if it is in Spanish, answer in Spanish; if in English, in English.

{title_line}Transcript:
"""
{truncated}
"""

Answer ONLY with a valid JSON array of exactly {slide_count} objects, each with:
- "title": short concept title (max 8 words)
- "content": clear explanation of the concept (2-3 sentences, max 200 characters)

Format example:
[
  {{"title": "Concept title", "content": "Clear and concise explanation of the concept."}},
  ...
]

IMPORTANT: Answer ONLY with the JSON, no additional text."#
    )
}

fn caption_prompt(title: &str, slides: &[Slide]) -> String {
    let summary = slides
        .iter()
        .map(|s| format!("- {}: {}", s.title, s.content))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r##"You are an expert Instagram copywriter. Write the copy to accompany an Instagram carousel based on the following content.

Video title: "{title}"

Slide content:
{summary}

RULES:
- Respect the language of the content (Spanish content gets Spanish copy, English gets English).
- The copy must open with a strong HOOK on the first line (a question or statement that grabs attention).
- End with a clear CTA (save, share, comment).
- Use emojis sparingly and strategically.
- Include 10-15 hashtags relevant to the topic.

Answer ONLY with valid JSON in this structure:
{{
  "description": "The full copy here (hook + content + CTA)",
  "hashtags": "#hashtag1 #hashtag2 #hashtag3 ..."
}}

IMPORTANT: Answer ONLY with the JSON, no additional text."##
    )
}
