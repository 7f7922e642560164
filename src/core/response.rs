//! Outbound text shaping
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.2.0
//!
//! Telegram rejects message text past 4096 characters, so everything the bot
//! says passes through here first. Splitting prefers newline boundaries and
//! never lands inside a UTF-8 sequence.

/// Telegram message text limit, in bytes of UTF-8.
pub const MESSAGE_LIMIT: usize = 4096;

/// Split `text` into pieces no longer than `max_size` bytes.
///
/// Whole lines stay together whenever they fit. A single line longer than
/// `max_size` is cut at character boundaries instead.
pub fn chunk_text(text: &str, max_size: usize) -> Vec<String> {
    if text.len() <= max_size {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut piece = String::new();
    for line in text.lines() {
        // One extra byte for the newline that would join this line on.
        let needed = line.len() + usize::from(!piece.is_empty());
        if piece.len() + needed > max_size {
            flush(&mut chunks, &mut piece);
        }
        if line.len() > max_size {
            chunks.extend(split_oversize_line(line, max_size));
            continue;
        }
        if !piece.is_empty() {
            piece.push('\n');
        }
        piece.push_str(line);
    }
    flush(&mut chunks, &mut piece);

    if chunks.is_empty() {
        // All-whitespace input still yields one (empty) chunk.
        chunks.push(String::new());
    }
    chunks
}

fn flush(chunks: &mut Vec<String>, piece: &mut String) {
    let trimmed = piece.trim_end();
    if !trimmed.is_empty() {
        chunks.push(trimmed.to_string());
    }
    piece.clear();
}

/// Cut one oversize line at character boundaries.
fn split_oversize_line(line: &str, max_size: usize) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut start = 0;
    while start < line.len() {
        let mut end = (start + max_size).min(line.len());
        while !line.is_char_boundary(end) {
            end -= 1;
        }
        if end == start {
            // A single character wider than the limit still has to go somewhere.
            end = line[start..]
                .chars()
                .next()
                .map_or(line.len(), |ch| start + ch.len_utf8());
        }
        pieces.push(line[start..end].to_string());
        start = end;
    }
    pieces
}

/// Split `text` into Telegram-sized message chunks.
pub fn chunk_for_message(text: &str) -> Vec<String> {
    chunk_text(text, MESSAGE_LIMIT)
}

/// Clamp `text` to the message limit, ending with an ellipsis when cut.
pub fn truncate_for_message(text: &str) -> String {
    if text.len() <= MESSAGE_LIMIT {
        return text.to_string();
    }
    let mut cut = MESSAGE_LIMIT - 3;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &text[..cut])
}
