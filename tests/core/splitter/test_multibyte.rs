// UTF-8 safety: multibyte and emoji handling
//
// Offsets are char positions, so slicing the source by chars at a
// chunk's range must give back the chunk's own sentences.

use crate::common::{assert_chunk_invariants, sentence_splitter};
use kgsplit::core::splitter::{SplitterSettings, Strategy, TextSplitter};
use kgsplit::core::types::Chunk;

fn char_slice(text: &str, start: usize, end: usize) -> String {
    text.chars().skip(start).take(end - start).collect()
}

fn assert_offsets_match_source(text: &str, chunks: &[Chunk]) {
    for chunk in chunks {
        let source = char_slice(text, chunk.start_char, chunk.end_char);
        let body = chunk.text.trim_end_matches('。');
        let first = body.split('。').next().unwrap();
        let last = body.rsplit('。').next().unwrap();
        assert!(
            source.starts_with(first),
            "{}: source {:?} does not start with {:?}",
            chunk.id,
            source,
            first
        );
        assert!(source.ends_with(last), "{}: bad end offset", chunk.id);
    }
}

#[test]
fn test_emoji_offsets() {
    let text = "Rust 🦀 很快，也很安全。数据 📊 分析完成 ✅。部署 🚀 顺利。".repeat(6);
    let chunks = sentence_splitter(30, 0.3).split_text(&text);

    assert!(chunks.len() > 1);
    assert_chunk_invariants(&text, &chunks, 30);
    assert_offsets_match_source(&text, &chunks);
}

#[test]
fn test_mixed_scripts_offsets() {
    let text = [
        "机翼是飞机的主要部件。",
        "Привет мир。",
        "مرحبا بالعالم。",
        "שלום עולם。",
        "こんにちは世界。",
        "안녕하세요 세계。",
        "Γειά σου κόσμε。",
    ]
    .concat()
    .repeat(3);

    let chunks = sentence_splitter(25, 0.2).split_text(&text);
    assert_chunk_invariants(&text, &chunks, 25);
    assert_offsets_match_source(&text, &chunks);
}

#[test]
fn test_full_width_terminators() {
    let text = "升力来自机翼．推力来自发动机！稳定来自尾翼？".repeat(5);
    let chunks = sentence_splitter(20, 0.0).split_text(&text);

    assert!(chunks.len() > 1);
    for chunk in &chunks {
        assert!(!chunk.text.contains('．'));
        assert!(!chunk.text.contains('！'));
    }
    assert_offsets_match_source(&text, &chunks);
}

#[test]
fn test_multibyte_at_budget_boundary() {
    // Every sentence lands exactly on the budget
    let text = "🦀🦀🦀🦀🦀🦀🦀🦀🦀🦀。".repeat(10);
    let chunks = sentence_splitter(10, 0.0).split_text(&text);

    assert_eq!(chunks.len(), 10);
    for (idx, chunk) in chunks.iter().enumerate() {
        assert_eq!(chunk.start_char, idx * 11);
        assert_eq!(chunk.end_char, idx * 11 + 10);
    }
}

#[test]
fn test_edge_cases_never_panic() {
    let inputs = [
        "",
        " ",
        "a",
        "🦀",
        "中",
        "\n\n\n",
        "   \t  \n  ",
        "。",
        "!!!???...",
        "\u{FEFF}字节序标记。",
        "e\u{301}\u{301}\u{301}。",
    ];

    for strategy in [Strategy::Sentence, Strategy::Paragraph] {
        for max_chars in [1, 2, 40] {
            let splitter = TextSplitter::new(
                SplitterSettings::new(max_chars)
                    .with_min_chunk_size(0)
                    .with_overlap_ratio(0.5)
                    .with_strategy(strategy),
            );
            for input in inputs {
                let chunks = splitter.split(input);
                assert!(!chunks.is_empty(), "no chunks for {input:?}");
                for chunk in &chunks {
                    assert!(chunk.end_char <= input.chars().count());
                    assert!(chunk.start_char <= chunk.end_char);
                }
            }
        }
    }
}
