//! Chunk cut search.
//!
//! A cut must land on a UTF-8 character boundary and must not separate two
//! word characters, since every chunk is counted on its own.

use crate::pipeline::word_count::is_word_char;

/// Widest UTF-8 encoding. Split windows carry `UTF8_MAX` spare bytes so a
/// character straddling the size limit, or starting right at it, is seen whole.
pub const UTF8_MAX: usize = 4;

fn is_char_start(b: u8) -> bool {
    b & 0xC0 != 0x80
}

fn encoded_width(lead: u8) -> usize {
    match lead {
        0x00..=0x7F => 1,
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

/// Decodes the character starting at `start`. Invalid or truncated sequences
/// decode as a one-byte U+FFFD, which is not a word character.
fn decode_at(window: &[u8], start: usize) -> Option<(char, usize)> {
    let lead = *window.get(start)?;
    let width = encoded_width(lead);
    let end = (start + width).min(window.len());
    match std::str::from_utf8(&window[start..end])
        .ok()
        .and_then(|s| s.chars().next())
    {
        Some(c) if c.len_utf8() == width => Some((c, width)),
        _ => Some((char::REPLACEMENT_CHARACTER, 1)),
    }
}

/// Nearest character starting strictly before `before`. With
/// `non_word_only`, word characters are skipped.
fn find_previous_char(
    window: &[u8],
    before: usize,
    non_word_only: bool,
) -> Option<(usize, char, usize)> {
    (0..before).rev().find_map(|start| {
        if !is_char_start(window[start]) {
            return None;
        }
        let (c, width) = decode_at(window, start)?;
        if non_word_only && is_word_char(c) {
            None
        } else {
            Some((start, c, width))
        }
    })
}

/// Returns the largest safe cut offset `<= max_size`, or 0 when none exists.
///
/// A window shorter than `max_size` is the tail of the input and is taken
/// whole.
pub fn find_chunk_max_offset(window: &[u8], max_size: usize) -> usize {
    if window.len() < max_size {
        return window.len();
    }

    let mut cursor = max_size;
    while let Some((start, c, width)) = find_previous_char(window, cursor, false) {
        let end = start + width;
        if end > max_size {
            // straddles the limit; step over it without the word check
            cursor = start;
            continue;
        }

        let splits_word = is_word_char(c)
            && decode_at(window, end).map_or(false, |(next, _)| is_word_char(next));
        if !splits_word {
            return end;
        }
        return match find_previous_char(window, start, true) {
            Some((sep_start, _, sep_width)) => sep_start + sep_width,
            None => 0,
        };
    }
    0
}
