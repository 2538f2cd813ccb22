/// Telegram caps messages at 4096 characters; long listings are sent in
/// blocks of at most this many.
pub const MAX_MESSAGE_LEN: usize = 4000;

/// Deterministic assignment: the same user always lands on the same catalog
/// index for a fixed snapshot size. Adding or removing codes reshuffles
/// every user's index, which is accepted for this domain.
pub fn assigned_index(user_id: u64, len: usize) -> usize {
    debug_assert!(len > 0, "catalog snapshot must be non-empty");
    (user_id % len as u64) as usize
}

/// Groups pre-rendered record blocks into messages of at most `limit`
/// characters, never splitting a block across two messages. A single block
/// longer than `limit` is hard-split on a char boundary as a last resort.
pub fn chunk_blocks(blocks: &[String], limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();

    for block in blocks {
        if block.len() > limit {
            if !current.is_empty() {
                chunks.push(std::mem::take(&mut current));
            }
            let mut piece = String::new();
            for ch in block.chars() {
                if piece.len() + ch.len_utf8() > limit {
                    chunks.push(std::mem::take(&mut piece));
                }
                piece.push(ch);
            }
            if !piece.is_empty() {
                chunks.push(piece);
            }
            continue;
        }

        let sep = if current.is_empty() { 0 } else { 2 };
        if current.len() + sep + block.len() > limit {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push_str("\n\n");
        }
        current.push_str(block);
    }

    if !current.is_empty() {
        chunks.push(current);
    }

    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignment_is_stable_for_fixed_snapshot() {
        assert_eq!(assigned_index(123456789, 7), assigned_index(123456789, 7));
        assert_eq!(assigned_index(123456789, 7), (123456789 % 7) as usize);
        assert_eq!(assigned_index(0, 5), 0);
        assert_eq!(assigned_index(14, 5), 4);
    }

    #[test]
    fn assignment_shifts_when_catalog_size_changes() {
        assert_ne!(assigned_index(13, 5), assigned_index(13, 4));
    }

    #[test]
    fn small_input_stays_in_one_chunk() {
        let blocks = vec!["first".to_string(), "second".to_string()];
        assert_eq!(chunk_blocks(&blocks, 100), vec!["first\n\nsecond"]);
        assert!(chunk_blocks(&[], 100).is_empty());
    }

    #[test]
    fn blocks_are_never_split_across_chunks() {
        let blocks: Vec<String> = (0..10).map(|i| format!("record-{i:02}-{}", "x".repeat(20))).collect();
        let chunks = chunk_blocks(&blocks, 80);

        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= 80));
        for block in &blocks {
            assert!(
                chunks.iter().any(|c| c.contains(block.as_str())),
                "block lost or split: {block}"
            );
        }
        // Ordering preserved across chunk boundaries.
        let joined = chunks.join("\n\n");
        let mut last = 0;
        for block in &blocks {
            let pos = joined.find(block.as_str()).unwrap();
            assert!(pos >= last);
            last = pos;
        }
    }

    #[test]
    fn oversized_block_is_hard_split() {
        let blocks = vec!["я".repeat(50)];
        let chunks = chunk_blocks(&blocks, 21);
        assert!(chunks.len() > 1);
        assert!(chunks.iter().all(|c| c.len() <= 21));
        assert_eq!(chunks.concat(), blocks[0]);
    }
}
