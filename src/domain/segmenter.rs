//! Sentence-bounded text segmentation.
//!
//! Splits extracted text into chunks that never break a sentence in the
//! middle. Page markers of the form `--- Page N ---` (inserted by the PDF
//! extractor) update the current page and are not emitted as content.

pub const DEFAULT_MAX_CHUNK_LEN: usize = 4000;

const PAGE_MARKER_PREFIX: &str = "--- Page";

/// Output of segmentation, before filtering and embedding enrichment.
#[derive(Debug, Clone, PartialEq)]
pub struct ChunkDraft {
    pub content: String,
    pub page_number: u32,
    pub chunk_index: usize,
}

/// Segments `text` into sentence-aligned chunks of at most `max_chunk_len`
/// characters, except that a single sentence longer than the limit becomes
/// its own oversized chunk.
///
/// Chunk indices are sequential from 0 and each chunk carries the page that
/// was current when its first sentence was read.
pub fn segment(text: &str, max_chunk_len: usize) -> Vec<ChunkDraft> {
    let sentences = collect_sentences(text);

    let mut drafts = Vec::new();
    let mut buffer = String::new();
    // The limit counts characters, not bytes; tracked incrementally so
    // multibyte text is not re-scanned per sentence.
    let mut buffer_chars = 0;
    let mut buffer_page: u32 = 1;
    let mut chunk_index = 0;

    for (sentence, page) in sentences {
        let sentence_chars = sentence.chars().count();
        if !buffer.is_empty() && buffer_chars + sentence_chars > max_chunk_len {
            drafts.push(ChunkDraft {
                content: buffer.trim().to_string(),
                page_number: buffer_page,
                chunk_index,
            });
            chunk_index += 1;
            buffer.clear();
            buffer_chars = 0;
        }

        if buffer.is_empty() {
            buffer_page = page;
        }
        buffer.push_str(&sentence);
        buffer.push(' ');
        buffer_chars += sentence_chars + 1;
    }

    if !buffer.trim().is_empty() {
        drafts.push(ChunkDraft {
            content: buffer.trim().to_string(),
            page_number: buffer_page,
            chunk_index,
        });
    }

    drafts
}

/// Splits text into sentences, tagging each with the page it was read on.
///
/// A sentence ends at `.`, `!` or `?`; a trailing partial sentence at the
/// end of a line is kept as its own sentence.
fn collect_sentences(text: &str) -> Vec<(String, u32)> {
    let mut sentences = Vec::new();
    let mut current_page: u32 = 1;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with(PAGE_MARKER_PREFIX) {
            current_page = parse_page_marker(trimmed).unwrap_or(current_page + 1);
            continue;
        }

        let mut sentence = String::new();
        for ch in line.chars() {
            sentence.push(ch);
            if matches!(ch, '.' | '!' | '?') {
                let flushed = sentence.trim();
                if !flushed.is_empty() {
                    sentences.push((flushed.to_string(), current_page));
                }
                sentence.clear();
            }
        }

        let flushed = sentence.trim();
        if !flushed.is_empty() {
            sentences.push((flushed.to_string(), current_page));
        }
    }

    sentences
}

/// Parses `--- Page N ---` and returns N.
fn parse_page_marker(line: &str) -> Option<u32> {
    line.split_whitespace().nth(2).and_then(|n| n.parse().ok())
}
