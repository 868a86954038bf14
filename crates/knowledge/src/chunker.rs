//! Text chunking with configurable size and overlap.

/// Split text into overlapping chunks of at most `chunk_size` characters.
///
/// Consecutive chunks share `overlap` characters. A trailing chunk shorter
/// than a tenth of `chunk_size` is dropped, unless it is the only chunk, so
/// short documents are always kept whole. Chunks are trimmed; blank chunks
/// are skipped.
pub fn chunk_text(text: &str, chunk_size: usize, overlap: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    if chars.is_empty() || chunk_size == 0 {
        return vec![];
    }

    let step = if chunk_size > overlap {
        chunk_size - overlap
    } else {
        chunk_size
    };

    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());

        if start > 0 && end - start < chunk_size / 10 {
            break;
        }

        let chunk: String = chars[start..end].iter().collect();
        let chunk = chunk.trim();
        if !chunk.is_empty() {
            chunks.push(chunk.to_string());
        }

        if end == chars.len() {
            break;
        }
        start += step;
    }

    tracing::debug!(
        "Chunked text into {} chunks (size: {}, overlap: {})",
        chunks.len(),
        chunk_size,
        overlap
    );

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_text_is_single_chunk() {
        let chunks = chunk_text("The Eiffel Tower is 330 meters tall.", 1000, 200);
        assert_eq!(chunks, vec!["The Eiffel Tower is 330 meters tall."]);
    }

    #[test]
    fn test_no_overlap() {
        let text = "a".repeat(300);
        let chunks = chunk_text(&text, 100, 0);
        assert_eq!(chunks.len(), 3);
        assert!(chunks.iter().all(|c| c.len() == 100));
    }

    #[test]
    fn test_overlap_is_shared() {
        let text = "abcdefghijklmnopqrstuvwxyz".repeat(4);
        let chunks = chunk_text(&text, 50, 10);

        assert!(chunks.len() >= 2);
        let tail: String = chunks[0].chars().skip(40).collect();
        assert!(chunks[1].starts_with(&tail));
    }

    #[test]
    fn test_tiny_tail_dropped() {
        // 205 chars, step 100: the third window has 5 chars (< 10% of 100)
        let text = "b".repeat(205);
        let chunks = chunk_text(&text, 100, 0);
        assert_eq!(chunks.len(), 2);
    }

    #[test]
    fn test_empty_and_blank() {
        assert!(chunk_text("", 100, 10).is_empty());
        assert!(chunk_text("   \n  ", 100, 10).is_empty());
    }

    #[test]
    fn test_multibyte_characters() {
        let text = "Grüß Gott! ".repeat(30);
        let chunks = chunk_text(&text, 40, 5);
        assert!(chunks.iter().all(|c| c.chars().count() <= 40));
        assert!(chunks[0].starts_with("Grüß"));
    }
}
