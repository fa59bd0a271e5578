// * Enhancement prompts
// * Each style fixes a description length target and tag count; the model is
// * asked for a labeled "Description:" / "Tags:" block the parsers expect.

use crate::capture::PageRecord;
use crate::enrich::EnhanceStyle;

const BASE_PROMPT: &str =
    "You are an AI assistant that improves web page descriptions and generates relevant tags.";

/// Style-specific instruction block.
fn style_instructions(style: EnhanceStyle) -> &'static str {
    match style {
        EnhanceStyle::Standard => {
            "Provide a concise summary of the webpage content in 80-120 words. \
             Generate 5-8 relevant tags that accurately represent the content."
        }
        EnhanceStyle::Detailed => {
            "Provide a comprehensive analysis of the webpage with 150-200 words. \
             Generate 8-12 relevant tags that categorize the content effectively."
        }
        EnhanceStyle::KeyPoints => {
            "Extract 4-6 key points from the webpage content and format them as bullet points. \
             Generate 6-8 relevant tags that highlight the main topics."
        }
        EnhanceStyle::Technical => {
            "Focus on technical specifications, features, and capabilities mentioned on the webpage. \
             Provide a technical summary of 100-150 words. \
             Generate 6-10 technical tags related to technologies, methods, or specifications."
        }
    }
}

const FORMAT_INSTRUCTIONS: &str = "Format your response exactly as follows:\n\
     Description: [your description]\n\
     Tags: [tag1, tag2, tag3, ...]";

/// Page information block shared by both providers.
fn page_block(record: &PageRecord) -> String {
    let description = if record.description.is_empty() {
        "No description available"
    } else {
        &record.description
    };

    let mut block = format!(
        "Page Title: {}\nPage URL: {}\nPage Description: {}",
        record.title, record.url, description
    );
    if !record.content.is_empty() {
        block.push_str("\nPage Content: ");
        block.push_str(&record.content);
    }
    block
}

/// System message for the chat-completion provider.
pub fn system_prompt(style: EnhanceStyle) -> String {
    format!(
        "{BASE_PROMPT} {}\n{FORMAT_INSTRUCTIONS}",
        style_instructions(style)
    )
}

/// User message for the chat-completion provider.
pub fn user_prompt(record: &PageRecord) -> String {
    format!(
        "{}\n\nPlease enhance this content according to the specified style.",
        page_block(record)
    )
}

/// Single combined prompt for the generateContent provider.
pub fn single_prompt(record: &PageRecord, style: EnhanceStyle) -> String {
    format!(
        "{BASE_PROMPT} {}\n\n{}\n\n{FORMAT_INSTRUCTIONS}",
        style_instructions(style),
        page_block(record)
    )
}
