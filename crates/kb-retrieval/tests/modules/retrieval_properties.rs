//! Property tests for chunking, similarity and snippet extraction.

#[cfg(test)]
mod tests {
    use kb_retrieval::{TextChunker, cosine_similarity, extract_snippet};
    use proptest::collection::vec;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn chunks_respect_size_and_order(
            text in "[a-z ]{0,300}",
            size in 1_usize..50,
            overlap in 0_usize..60,
        ) {
            let chunker = TextChunker::new(size, overlap).unwrap();
            let chunks = chunker.chunk(&text, None, None);

            prop_assert!(!chunks.is_empty() || text.chars().count() > size);
            for (position, chunk) in chunks.iter().enumerate() {
                prop_assert!(chunk.text.chars().count() <= size);
                prop_assert_eq!(chunk.ordinal_position, position);
                if text.chars().count() > size {
                    prop_assert!(!chunk.text.is_empty());
                    prop_assert_eq!(chunk.text.trim(), chunk.text.as_str());
                }
            }
        }

        #[test]
        fn chunks_cover_every_character(
            text in "[a-z ]{0,300}",
            size in 1_usize..50,
            overlap in 0_usize..60,
        ) {
            let chunker = TextChunker::new(size, overlap).unwrap();
            let chunks = chunker.chunk(&text, None, None);

            // Windows advance monotonically, so every visible character shows
            // up, in order, somewhere in the concatenated chunks.
            let mut covered = chunks
                .iter()
                .flat_map(|chunk| chunk.text.chars())
                .filter(|ch| !ch.is_whitespace());
            for expected in text.chars().filter(|ch| !ch.is_whitespace()) {
                prop_assert!(covered.any(|ch| ch == expected), "lost {expected:?}");
            }
        }

        #[test]
        fn chunks_without_overlap_partition_the_text(
            text in "[a-z ]{0,300}",
            size in 1_usize..50,
        ) {
            let chunker = TextChunker::new(size, 0).unwrap();
            let chunks = chunker.chunk(&text, None, None);

            let rebuilt: String = chunks
                .iter()
                .flat_map(|chunk| chunk.text.chars())
                .filter(|ch| !ch.is_whitespace())
                .collect();
            let original: String = text.chars().filter(|ch| !ch.is_whitespace()).collect();
            prop_assert_eq!(rebuilt, original);
        }

        #[test]
        fn cosine_is_bounded_and_symmetric(
            (left, right) in (1_usize..32).prop_flat_map(|len| {
                (vec(-100.0_f32..100.0, len), vec(-100.0_f32..100.0, len))
            })
        ) {
            let forward = cosine_similarity(&left, &right).unwrap();
            let backward = cosine_similarity(&right, &left).unwrap();
            prop_assert!((-1.0..=1.0).contains(&forward));
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn snippet_is_bounded(
            content in "\\PC{0,200}",
            query in "\\PC{0,10}",
            max_length in 1_usize..100,
        ) {
            let snippet = extract_snippet(&content, &query, max_length);
            prop_assert!(snippet.chars().count() <= max_length + 6);
        }

        #[test]
        fn snippet_contains_found_query(
            prefix in "[a-zA-Z ]{0,150}",
            query in "[a-zA-Z]{1,12}",
            suffix in "[a-zA-Z ]{0,150}",
            max_length in 4_usize..100,
        ) {
            prop_assume!(query.len() <= 3 * max_length / 4);
            let content = format!("{prefix}{}{suffix}", query.to_uppercase());

            let snippet = extract_snippet(&content, &query, max_length);
            prop_assert!(
                snippet.to_lowercase().contains(&query.to_lowercase()),
                "{snippet:?} lacks {query:?}"
            );
        }
    }
}
