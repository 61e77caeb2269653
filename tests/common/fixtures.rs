// Test fixtures for integration testing

use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Directory of documents laid out like a kgsplit data folder
#[allow(dead_code)] // Used in integration tests
pub struct Corpus {
    pub dir: TempDir,
    pub files: Vec<PathBuf>,
}

impl Corpus {
    /// Create with custom files (paths relative to the corpus root)
    #[allow(dead_code)] // Used in integration tests
    pub fn with_files(files: &[(&str, &str)]) -> Self {
        let dir = TempDir::new().unwrap();
        let mut paths = Vec::new();

        for (path, content) in files {
            let full_path = dir.path().join(path);
            std::fs::create_dir_all(full_path.parent().unwrap()).unwrap();
            std::fs::write(&full_path, content).unwrap();
            paths.push(full_path);
        }

        Self { dir, files: paths }
    }

    /// A processed/ folder with three documents of different sizes
    #[allow(dead_code)] // Used in integration tests
    pub fn processed() -> Self {
        let wing = SampleText::cjk_paragraphs(4, 8);
        let manual = SampleText::latin_paragraphs(3, 10);
        Self::with_files(&[
            ("processed/short.txt", SampleText::SHORT),
            ("processed/wing.txt", wing.as_str()),
            ("processed/manual.txt", manual.as_str()),
        ])
    }

    #[allow(dead_code)] // Used in integration tests
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// Synthetic document text
#[allow(dead_code)] // Used in integration tests
pub struct SampleText;

impl SampleText {
    /// Below the default minimum chunk size
    #[allow(dead_code)]
    pub const SHORT: &'static str = "机翼是飞机的主要部件。";

    #[allow(dead_code)]
    pub const CJK_SENTENCES: [&'static str; 5] = [
        "机翼是飞机产生升力的主要部件",
        "襟翼安装在机翼后缘用于增加升力",
        "发动机为飞机提供推力",
        "起落架在地面滑行时支撑飞机重量",
        "尾翼保持飞机的俯仰和偏航稳定",
    ];

    #[allow(dead_code)]
    pub const LATIN_SENTENCES: [&'static str; 4] = [
        "The wing is the main lift-producing component of an aircraft",
        "Flaps are mounted on the trailing edge to increase lift",
        "Engines provide thrust for the aircraft",
        "Landing gear supports the aircraft weight while taxiing",
    ];

    /// `paragraphs` paragraphs of `sentences` CJK sentences each
    #[allow(dead_code)]
    pub fn cjk_paragraphs(paragraphs: usize, sentences: usize) -> String {
        Self::build(paragraphs, sentences, &Self::CJK_SENTENCES, "。")
    }

    /// `paragraphs` paragraphs of `sentences` Latin sentences each
    #[allow(dead_code)]
    pub fn latin_paragraphs(paragraphs: usize, sentences: usize) -> String {
        Self::build(paragraphs, sentences, &Self::LATIN_SENTENCES, ". ")
    }

    /// Sentences of exactly `len` chars, each followed by `。`
    #[allow(dead_code)]
    pub fn uniform_sentences(count: usize, len: usize) -> String {
        (0..count)
            .map(|i| {
                let fill = char::from_u32('甲' as u32 + i as u32).unwrap_or('字');
                let mut sentence: String = std::iter::repeat(fill).take(len).collect();
                sentence.push('。');
                sentence
            })
            .collect()
    }

    fn build(paragraphs: usize, sentences: usize, pool: &[&str], terminator: &str) -> String {
        (0..paragraphs)
            .map(|p| {
                (0..sentences)
                    .map(|s| format!("{}{}", pool[(p + s) % pool.len()], terminator))
                    .collect::<String>()
                    .trim_end()
                    .to_string()
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}
