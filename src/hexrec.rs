//! Logisim `v2.0 raw` memory image, the assembler's output artifact.

use crate::encoder::EncodedWord;
use crate::error::HexError;
use crate::memory::MEMORY_WORDS;

pub const HEADER: &str = "v2.0 raw";
pub const WORDS_PER_LINE: usize = 8;

/// Header line, then each word as 4 hex digits and a space, 8 words per line.
pub fn render(words: &[EncodedWord]) -> String {
    let mut out = String::with_capacity(HEADER.len() + 1 + words.len() * 5 + words.len() / 8);
    out.push_str(HEADER);
    out.push('\n');
    for chunk in words.chunks(WORDS_PER_LINE) {
        for w in chunk {
            out.push_str(&format!("{w} "));
        }
        if chunk.len() == WORDS_PER_LINE {
            out.push('\n');
        }
    }
    out
}

/// Read a record back. Accepts any whitespace layout, `#` comments and `N*value` runs.
///
/// A record longer than the address space is rejected.
pub fn parse(text: &str) -> Result<Vec<EncodedWord>, HexError> {
    let mut lines = text.lines().enumerate();
    match lines.next() {
        Some((_, first)) if first.trim() == HEADER => {}
        _ => return Err(HexError::MissingHeader),
    }
    let mut words = Vec::new();
    for (idx, line) in lines {
        let line = line.split('#').next().unwrap_or("");
        for token in line.split_whitespace() {
            let bad = || HexError::Value {
                line: idx + 1,
                token: token.to_string(),
            };
            let (count, value) = match token.split_once('*') {
                Some((n, v)) => (n.parse::<usize>().map_err(|_| bad())?, v),
                None => (1, token),
            };
            let value = u16::from_str_radix(value, 16).map_err(|_| bad())?;
            if count > MEMORY_WORDS - words.len() {
                return Err(bad());
            }
            words.extend(std::iter::repeat(EncodedWord(value)).take(count));
        }
    }
    Ok(words)
}
