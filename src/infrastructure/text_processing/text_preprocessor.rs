use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

static SENTENCE_BOUNDARY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[.!?]+").unwrap());
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static PORTUGUESE_STEMMER: LazyLock<Stemmer> =
    LazyLock::new(|| Stemmer::create(Algorithm::Portuguese));
static ENGLISH_STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

static PORTUGUESE_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "ao", "aos", "aquela", "aquelas", "aquele", "aqueles", "aquilo", "as", "até", "com",
        "como", "da", "das", "de", "dela", "delas", "dele", "deles", "depois", "do", "dos", "e",
        "ela", "elas", "ele", "eles", "em", "entre", "era", "eram", "essa", "essas", "esse",
        "esses", "esta", "estamos", "estas", "estava", "estavam", "este", "esteja", "estejam",
        "estejamos", "estes", "esteve", "estive", "estivemos", "estiver", "estivera", "estiveram",
        "estiverem", "estivermos", "estivesse", "estivessem", "estivéramos", "estivéssemos",
        "estou", "está", "estávamos", "estão", "eu", "foi", "fomos", "for", "fora", "foram",
        "forem", "formos", "fosse", "fossem", "fui", "fôramos", "fôssemos", "haja", "hajam",
        "hajamos", "havemos", "havia", "hei", "houve", "houvemos", "houver", "houvera",
        "houveram", "houverei", "houverem", "houveremos", "houveria", "houveriam", "houveríamos",
        "houvermos", "houvesse", "houvessem", "houvéramos", "houvéssemos", "há", "hão", "isso",
        "isto", "já", "lhe", "lhes", "mais", "mas", "me", "mesmo", "meu", "meus", "minha",
        "minhas", "muito", "na", "nas", "nem", "no", "nos", "nossa", "nossas", "nosso", "nossos",
        "num", "numa", "não", "nós", "o", "os", "ou", "para", "pela", "pelas", "pelo", "pelos",
        "por", "qual", "quando", "que", "quem", "se", "seja", "sejam", "sejamos", "sem", "ser",
        "seria", "seriam", "será", "serão", "seríamos", "seu", "seus", "só", "sua", "suas", "são",
        "também", "te", "tem", "temos", "tenha", "tenham", "tenhamos", "tenho", "ter", "terei",
        "teremos", "teria", "teriam", "teríamos", "teu", "teus", "teve", "tinha", "tinham",
        "tive", "tivemos", "tiver", "tivera", "tiveram", "tiverem", "tivermos", "tivesse",
        "tivessem", "tivéramos", "tivéssemos", "tu", "tua", "tuas", "tém", "tínhamos", "um",
        "uma", "você", "vocês", "vos", "à", "às", "éramos",
    ]
    .into_iter()
    .collect()
});

static ENGLISH_STOPWORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "did", "do", "does", "doing", "down", "during", "each",
        "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
        "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
        "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not", "now",
        "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves", "out",
        "over", "own", "same", "she", "should", "so", "some", "such", "than", "that", "the",
        "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
        "those", "through", "to", "too", "under", "until", "up", "very", "was", "we", "were",
        "what", "when", "where", "which", "while", "who", "whom", "why", "will", "with", "you",
        "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Knobs for [`TextPreprocessor::preprocess`]. Distinct from the per-file
/// `ProcessingOptions`: these tune the text analysis itself.
#[derive(Debug, Clone)]
pub struct PreprocessOptions {
    pub remove_stopwords: bool,
    pub apply_stemming: bool,
    pub normalize_whitespace: bool,
    pub remove_special_chars: bool,
    pub min_word_length: usize,
    pub language: String,
}

impl Default for PreprocessOptions {
    fn default() -> Self {
        Self {
            remove_stopwords: true,
            apply_stemming: false,
            normalize_whitespace: true,
            remove_special_chars: false,
            min_word_length: 2,
            language: "portuguese".to_string(),
        }
    }
}

const KEYWORD_POOL_FOR_SUMMARY: usize = 20;
const LLM_STRUCTURE_THRESHOLD: usize = 2000;
const LLM_SUMMARY_SENTENCES: usize = 5;
const LLM_KEYWORD_COUNT: usize = 15;

pub struct TextPreprocessor;

impl TextPreprocessor {
    /// Normalize, tokenize, filter and re-join. Running the output through
    /// the same options again is a fixed point.
    pub fn preprocess(text: &str, options: &PreprocessOptions) -> String {
        let mut working = text.to_string();

        if options.normalize_whitespace {
            working = WHITESPACE_RUN.replace_all(working.trim(), " ").into_owned();
        }

        if options.remove_special_chars {
            working = working
                .chars()
                .map(|c| {
                    if c.is_alphanumeric() || c.is_whitespace() || ".,;:!?()[]{}\"'-".contains(c) {
                        c
                    } else {
                        ' '
                    }
                })
                .collect();
        }

        let stopwords = stopword_set(&options.language);
        let stemmer = stemmer_for(&options.language);

        let tokens: Vec<String> = tokenize(&working)
            .filter(|token| token.chars().count() >= options.min_word_length)
            .filter(|token| {
                !options.remove_stopwords || !stopwords.contains(token.to_lowercase().as_str())
            })
            .map(|token| {
                if options.apply_stemming {
                    stemmer.stem(&token.to_lowercase()).into_owned()
                } else {
                    token.to_string()
                }
            })
            .collect();

        tokens.join(" ")
    }

    /// Top-`max_keywords` terms by descending frequency; ties keep the
    /// order of first occurrence.
    pub fn extract_keywords(text: &str, max_keywords: usize) -> Vec<String> {
        let processed = Self::preprocess(
            text,
            &PreprocessOptions {
                remove_stopwords: true,
                normalize_whitespace: true,
                min_word_length: 3,
                ..Default::default()
            },
        );

        let mut first_seen: HashMap<String, usize> = HashMap::new();
        let mut counts: HashMap<String, usize> = HashMap::new();
        for (index, token) in processed.split_whitespace().enumerate() {
            let token = token.to_lowercase();
            first_seen.entry(token.clone()).or_insert(index);
            *counts.entry(token).or_insert(0) += 1;
        }

        let mut ranked: Vec<(String, usize, usize)> = counts
            .into_iter()
            .map(|(token, count)| {
                let first = first_seen[&token];
                (token, count, first)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

        ranked
            .into_iter()
            .take(max_keywords)
            .map(|(token, _, _)| token)
            .collect()
    }

    /// Extractive summary: sentences scored by keyword membership, the top
    /// `max_sentences` re-joined in their original order so the summary
    /// still reads as prose.
    pub fn summarize_text(text: &str, max_sentences: usize) -> String {
        let sentences: Vec<&str> = SENTENCE_BOUNDARY
            .split(text)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if sentences.len() <= max_sentences {
            return text.to_string();
        }

        let keywords: HashSet<String> = Self::extract_keywords(text, KEYWORD_POOL_FOR_SUMMARY)
            .into_iter()
            .collect();

        let mut scored: Vec<(usize, usize)> = sentences
            .iter()
            .enumerate()
            .map(|(index, sentence)| {
                let score = sentence
                    .to_lowercase()
                    .split_whitespace()
                    .filter(|word| keywords.contains(*word))
                    .count();
                (index, score)
            })
            .collect();
        scored.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut selected: Vec<usize> = scored
            .into_iter()
            .take(max_sentences)
            .map(|(index, _)| index)
            .collect();
        selected.sort_unstable();

        let summary = selected
            .into_iter()
            .map(|index| sentences[index])
            .collect::<Vec<_>>()
            .join(". ");

        format!("{summary}.")
    }

    /// Sørensen–Dice coefficient over the preprocessed forms, in [0, 1].
    pub fn calculate_similarity(text_a: &str, text_b: &str) -> f64 {
        let options = PreprocessOptions::default();
        let processed_a = Self::preprocess(text_a, &options);
        let processed_b = Self::preprocess(text_b, &options);
        strsim::sorensen_dice(&processed_a, &processed_b)
    }

    /// Shape text for the model. This is a light pass only: stopwords and
    /// punctuation stay, the model needs them for context. Long documents
    /// get a summary and keyword header so the full text stays usable
    /// inside a bounded context window.
    pub fn format_for_llm(text: &str) -> String {
        let processed = WHITESPACE_RUN.replace_all(text.trim(), " ").into_owned();

        if processed.chars().count() > LLM_STRUCTURE_THRESHOLD {
            let summary = Self::summarize_text(&processed, LLM_SUMMARY_SENTENCES);
            let keywords = Self::extract_keywords(&processed, LLM_KEYWORD_COUNT);
            return format!(
                "SUMMARY: {summary}\n\nKEYWORDS: {}\n\nFULL TEXT:\n{processed}",
                keywords.join(", ")
            );
        }

        processed
    }
}

fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|token| !token.is_empty())
}

fn stopword_set(language: &str) -> &'static HashSet<&'static str> {
    if language == "portuguese" || language == "por" || language == "pt" {
        &PORTUGUESE_STOPWORDS
    } else {
        &ENGLISH_STOPWORDS
    }
}

fn stemmer_for(language: &str) -> &'static Stemmer {
    if language == "portuguese" || language == "por" || language == "pt" {
        &PORTUGUESE_STEMMER
    } else {
        &ENGLISH_STEMMER
    }
}
