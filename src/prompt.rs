//! Prompts sent to the text generator.
//!
//! The full prompt asks for four sections headed `SECTION 1: SUMMARY` through
//! `SECTION 4: FULL NOTES` with rules between them, which is the layout
//! [`crate::notes::parse_response`] reads best. The other variants ask for less.

use crate::notes::GenerationMode;

/// Rule the full prompt places between sections.
const SECTION_RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// Build the prompt for `mode` around a transcript.
pub fn build_prompt(transcript: &str, title: &str, mode: GenerationMode) -> String {
    match mode {
        GenerationMode::Summary => summary_prompt(transcript, title),
        GenerationMode::KeyConcepts => key_concepts_prompt(transcript, title),
        GenerationMode::Full => full_prompt(transcript, title),
    }
}

fn summary_prompt(transcript: &str, title: &str) -> String {
    format!(
        r#"You are an educational assistant. Summarise the lecture titled "{title}".

**Content:**
{transcript}

**Requirements:**
- Two or three paragraphs, 150 to 250 words in total
- Lead with the main ideas and what a student should take away
- Plain, explanatory tone
- Never claim the content is unavailable

Reply with the summary and nothing else."#
    )
}

fn key_concepts_prompt(transcript: &str, title: &str) -> String {
    format!(
        r#"You are an educational assistant. Pull the key concepts and terms out of the lecture titled "{title}".

**Content:**
{transcript}

**Answer in three labelled parts:**

**SUMMARY**
One or two paragraphs on what the topic is and why it matters.

**KEY POINTS**
Seven to ten lines, each starting with a hyphen (-) and each a complete sentence.

**DEFINITIONS**
Six to eight terms, one per line, written exactly as "Term: Definition".
For example "Algorithm: A finite sequence of steps that solves a problem".

Never claim the content is unavailable."#
    )
}

fn full_prompt(transcript: &str, title: &str) -> String {
    format!(
        r#"You are writing study notes for students.

**Title:** "{title}"

**Source material:**
{transcript}

Produce the four sections below, in this order, separated by the rule lines shown.

{SECTION_RULE}

**SECTION 1: SUMMARY**
Two or three paragraphs (200 to 300 words) explaining the topic, why it matters
and what the main concepts are. Teach the subject directly; do not mention
videos, transcripts or source files.

{SECTION_RULE}

**SECTION 2: KEY POINTS**
Eight to twelve points, one per line, each starting with a hyphen (-) and each
a complete sentence a student should remember.

{SECTION_RULE}

**SECTION 3: DEFINITIONS**
Eight to twelve terms, one per line, written exactly as "Term: Definition".
For example "Recursion: A technique where a function calls itself on a smaller input".

{SECTION_RULE}

**SECTION 4: FULL NOTES**
Detailed markdown notes starting with the heading

# {title}

and continuing with `##` sections such as Introduction, Core Concepts (one `###`
per concept), Practical Applications, a numbered Step-by-Step Process where one
exists, Common Challenges, Study Tips, a comparison table using | pipes |, and a
Quick Reference Guide with **Main Ideas:**, **Must Remember:** and
**Common Mistakes:** lists.

{SECTION_RULE}

Formatting:
✓ Headings with #, ## and ###
✓ Hyphens for bullets, never asterisks
✓ 1. 2. 3. for ordered steps
✓ Fenced code blocks for formulas or code
✓ Do not reference the source material or say it cannot be accessed

Write the notes now."#
    )
}
