use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::models::Quote;

const BUNDLED_QUOTES: &str = include_str!("../data/quotes.json");
const CACHE_FILE_VERSION: u32 = 1;

#[derive(Debug)]
pub enum CorpusError {
    Io(io::Error),
    Network(String),
    Malformed(String),
    Empty,
}

#[derive(Debug, Clone)]
pub enum CorpusSource {
    Bundled,
    File(PathBuf),
    Remote(String),
}

/// Ordered quote list, guaranteed non-empty for the lifetime of the session.
pub struct Corpus {
    quotes: Vec<Quote>,
}

impl Corpus {
    pub fn len(&self) -> usize {
        self.quotes.len()
    }

    pub fn quote_at(&self, index: usize) -> &Quote {
        &self.quotes[index]
    }

    /// The single built-in quote used whenever loading fails. Keeping this
    /// non-empty is what makes a zero-length corpus unreachable.
    pub fn fallback() -> Self {
        Self {
            quotes: vec![Quote {
                id: 1,
                text: "Learn how to learn from those who disagree with you".to_string(),
                text_ko: None,
                text_ja: None,
                text_es: None,
                source: "68 Bits of Unsolicited Advice".to_string(),
                author: "Kevin Kelly".to_string(),
                url: Some("https://www.youtube.com/watch?v=Zz70rcguxwk".to_string()),
                author_url: Some("https://kk.org/".to_string()),
            }],
        }
    }

    pub(crate) fn from_records(records: Vec<Quote>) -> Result<Self, CorpusError> {
        let quotes: Vec<Quote> = records
            .into_iter()
            .filter(|quote| !quote.text.trim().is_empty())
            .collect();
        if quotes.is_empty() {
            return Err(CorpusError::Empty);
        }
        Ok(Self { quotes })
    }
}

/// Load the corpus from the given source. Never fails: any error is recovered
/// by substituting the built-in single-quote corpus.
pub fn load(source: &CorpusSource) -> Corpus {
    match try_load(source) {
        Ok(corpus) => {
            log::info!("loaded {} quotes", corpus.len());
            corpus
        }
        Err(err) => {
            log::warn!("corpus load failed, using built-in quote: {err:?}");
            Corpus::fallback()
        }
    }
}

fn try_load(source: &CorpusSource) -> Result<Corpus, CorpusError> {
    let records = match source {
        CorpusSource::Bundled => parse(BUNDLED_QUOTES)?,
        CorpusSource::File(path) => {
            let contents = fs::read_to_string(path).map_err(CorpusError::Io)?;
            parse(&contents)?
        }
        CorpusSource::Remote(url) => fetch_with_cache(url)?,
    };
    Corpus::from_records(records)
}

fn parse(json: &str) -> Result<Vec<Quote>, CorpusError> {
    serde_json::from_str(json).map_err(|err| CorpusError::Malformed(err.to_string()))
}

fn fetch_with_cache(url: &str) -> Result<Vec<Quote>, CorpusError> {
    let hash = hash_source(url);
    match fetch(url) {
        Ok(records) => {
            if let Some(path) = cache_path() {
                if let Err(err) = write_cache_at(&path, &hash, &records) {
                    log::warn!("failed to write corpus cache: {err}");
                }
            }
            Ok(records)
        }
        Err(err) => {
            log::warn!("corpus fetch failed, trying cache: {err:?}");
            cache_path()
                .and_then(|path| read_cache_at(&path, &hash))
                .ok_or(err)
        }
    }
}

fn fetch(url: &str) -> Result<Vec<Quote>, CorpusError> {
    let client = Client::builder()
        .user_agent("quotetab")
        .build()
        .map_err(|err| CorpusError::Network(err.to_string()))?;
    let response = client
        .get(url)
        .send()
        .map_err(|err| CorpusError::Network(err.to_string()))?;
    if !response.status().is_success() {
        return Err(CorpusError::Network(format!("HTTP {}", response.status())));
    }
    response
        .json()
        .map_err(|err| CorpusError::Malformed(err.to_string()))
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    source_hash: String,
    fetched_at: String,
    quotes: Vec<Quote>,
}

fn cache_path() -> Option<PathBuf> {
    let mut path = dirs::home_dir()?;
    path.push(".quotetab-cache.json");
    Some(path)
}

fn read_cache_at(path: &Path, source_hash: &str) -> Option<Vec<Quote>> {
    let contents = fs::read_to_string(path).ok()?;
    let cache: CacheFile = serde_json::from_str(&contents).ok()?;
    if cache.version != CACHE_FILE_VERSION || cache.source_hash != source_hash {
        return None;
    }
    Some(cache.quotes)
}

fn write_cache_at(path: &Path, source_hash: &str, quotes: &[Quote]) -> Result<(), io::Error> {
    let cache = CacheFile {
        version: CACHE_FILE_VERSION,
        source_hash: source_hash.to_string(),
        fetched_at: Local::now().to_rfc3339(),
        quotes: quotes.to_vec(),
    };
    let json = serde_json::to_string_pretty(&cache)
        .map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))?;
    fs::write(path, json)
}

fn hash_source(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    let result = hasher.finalize();
    result.iter().map(|byte| format!("{:02x}", byte)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn fallback_corpus_has_exactly_one_quote() {
        let corpus = Corpus::fallback();
        assert_eq!(corpus.len(), 1);
        assert!(!corpus.quote_at(0).text.is_empty());
    }

    #[test]
    fn missing_file_substitutes_the_fallback() {
        let corpus = load(&CorpusSource::File(PathBuf::from("/no/such/quotes.json")));
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.quote_at(0).author, "Kevin Kelly");
    }

    #[test]
    fn empty_corpus_substitutes_the_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        fs::write(&path, "[]").unwrap();
        let corpus = load(&CorpusSource::File(path));
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn malformed_json_substitutes_the_fallback() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        fs::write(&path, "{ not json").unwrap();
        let corpus = load(&CorpusSource::File(path));
        assert_eq!(corpus.len(), 1);
    }

    #[test]
    fn blank_text_records_are_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("quotes.json");
        fs::write(
            &path,
            r#"[
              {"id": 1, "text": "  ", "source": "s", "author": "a"},
              {"id": 2, "text": "keep me", "source": "s", "author": "a"}
            ]"#,
        )
        .unwrap();
        let corpus = load(&CorpusSource::File(path));
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.quote_at(0).text, "keep me");
    }

    #[test]
    fn bundled_corpus_parses_and_is_not_the_fallback() {
        let corpus = load(&CorpusSource::Bundled);
        assert!(corpus.len() > 1);
    }

    #[test]
    fn hash_source_is_stable() {
        let first = hash_source("https://example.com/quotes.json");
        let second = hash_source("https://example.com/quotes.json");
        assert_eq!(first, second);
        assert_ne!(first, hash_source("https://example.com/other.json"));
    }

    #[test]
    fn cache_round_trips_only_for_the_same_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cache.json");
        let quotes = Corpus::fallback().quotes;
        let hash = hash_source("https://example.com/quotes.json");

        write_cache_at(&path, &hash, &quotes).unwrap();
        let cached = read_cache_at(&path, &hash).unwrap();
        assert_eq!(cached.len(), 1);
        assert_eq!(cached[0].author, "Kevin Kelly");

        assert!(read_cache_at(&path, &hash_source("other")).is_none());
    }
}
