use std::collections::{HashMap, HashSet};
use std::path::Path;

use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::LinguisticService;
use super::stoplist::{SMART_STOPLIST, Stoplist};
use crate::core::config::DetectionConfig;
use crate::core::error::{DetectionError, Result};
use crate::core::pos::{PosClass, PosTag};

lazy_static! {
    static ref TOKEN_RE: Regex =
        Regex::new(r"(?:[A-Za-z]\.){2,}|[A-Za-z0-9]+(?:[-'][A-Za-z0-9]+)*(?:[.,][0-9]+)*|``|''|[^\sA-Za-z0-9]")
            .unwrap();

    static ref NUMBER_RE: Regex = Regex::new(r"^[0-9]+(?:[.,][0-9]+)*$").unwrap();

    static ref IRREGULAR_NOUNS: HashMap<&'static str, &'static str> = {
        let mut m = HashMap::new();
        m.insert("men", "man");
        m.insert("women", "woman");
        m.insert("children", "child");
        m.insert("people", "person");
        m.insert("mice", "mouse");
        m.insert("geese", "goose");
        m.insert("feet", "foot");
        m.insert("teeth", "tooth");
        m.insert("lives", "life");
        m.insert("wives", "wife");
        m.insert("knives", "knife");
        m.insert("leaves", "leaf");
        m.insert("halves", "half");
        m.insert("crises", "crisis");
        m.insert("analyses", "analysis");
        m
    };

    /// Words ending in `s` that are not plurals.
    static ref UNINFLECTED: HashSet<&'static str> = [
        "news", "series", "species", "means", "politics", "economics", "physics", "athletics",
        "headquarters", "aircraft", "does", "goes", "always", "perhaps", "whereas", "besides",
        "towards", "afterwards", "sometimes", "yes",
    ]
    .into_iter()
    .collect();

    static ref BASE_LEXICON: HashMap<&'static str, PosTag> = {
        let mut m = HashMap::new();
        for word in ["the", "a", "an", "this", "that", "these", "those", "some", "any", "each", "every", "no", "all"] {
            m.insert(word, PosTag::Dt);
        }
        for word in ["of", "in", "on", "at", "by", "for", "with", "from", "about", "into", "over", "after",
                     "before", "under", "between", "during", "against", "through", "since", "as", "if", "because"] {
            m.insert(word, PosTag::In);
        }
        for word in ["and", "or", "but", "nor", "yet"] {
            m.insert(word, PosTag::Cc);
        }
        for word in ["i", "you", "he", "she", "it", "we", "they", "me", "him", "her", "us", "them"] {
            m.insert(word, PosTag::Prp);
        }
        for word in ["my", "your", "his", "its", "our", "their"] {
            m.insert(word, PosTag::PrpPossessive);
        }
        for word in ["can", "could", "will", "would", "shall", "should", "may", "might", "must"] {
            m.insert(word, PosTag::Md);
        }
        for word in ["when", "where", "why", "how"] {
            m.insert(word, PosTag::Wrb);
        }
        for word in ["who", "whom", "what"] {
            m.insert(word, PosTag::Wp);
        }
        for word in ["not", "very", "also", "never", "now", "then", "here", "there"] {
            m.insert(word, PosTag::Rb);
        }
        m.insert("which", PosTag::Wdt);
        m.insert("whose", PosTag::WpPossessive);
        m.insert("to", PosTag::To);
        m.insert("be", PosTag::Vb);
        m.insert("is", PosTag::Vbz);
        m.insert("are", PosTag::Vbp);
        m.insert("was", PosTag::Vbd);
        m.insert("were", PosTag::Vbd);
        m.insert("been", PosTag::Vbn);
        m.insert("being", PosTag::Vbg);
        m.insert("has", PosTag::Vbz);
        m.insert("have", PosTag::Vbp);
        m.insert("had", PosTag::Vbd);
        m.insert("does", PosTag::Vbz);
        m.insert("do", PosTag::Vbp);
        m.insert("did", PosTag::Vbd);
        m.insert("said", PosTag::Vbd);
        m.insert("says", PosTag::Vbz);
        m.insert("say", PosTag::Vbp);
        m
    };
}

/// Synonym tables keyed by lowercase word, one table per word class.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Thesaurus {
    #[serde(default)]
    pub noun: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub verb: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub adjective: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub adverb: HashMap<String, Vec<String>>,
}

impl Thesaurus {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|err| unreadable_resource(path, err))
    }

    pub fn entries(&self, class: PosClass) -> &HashMap<String, Vec<String>> {
        match class {
            PosClass::Noun => &self.noun,
            PosClass::Verb => &self.verb,
            PosClass::Adjective => &self.adjective,
            PosClass::Adverb => &self.adverb,
        }
    }

    pub fn entries_mut(&mut self, class: PosClass) -> &mut HashMap<String, Vec<String>> {
        match class {
            PosClass::Noun => &mut self.noun,
            PosClass::Verb => &mut self.verb,
            PosClass::Adjective => &mut self.adjective,
            PosClass::Adverb => &mut self.adverb,
        }
    }

    pub fn insert(&mut self, class: PosClass, word: &str, synonyms: &[&str]) {
        self.entries_mut(class).insert(
            word.to_lowercase(),
            synonyms.iter().map(|s| s.to_string()).collect(),
        );
    }
}

/// Default linguistic adapter: Snowball English stemming, suffix-rule noun
/// lemmatization, a lexicon-first heuristic tagger and a JSON thesaurus.
pub struct LexiconLinguistics {
    stemmer: Stemmer,
    lexicon: HashMap<String, PosTag>,
    thesaurus: Thesaurus,
    stoplist: Stoplist,
}

impl LexiconLinguistics {
    pub fn new() -> Self {
        Self {
            stemmer: Stemmer::create(Algorithm::English),
            lexicon: HashMap::new(),
            thesaurus: Thesaurus::default(),
            stoplist: SMART_STOPLIST.clone(),
        }
    }

    pub fn with_lexicon(mut self, lexicon: HashMap<String, PosTag>) -> Self {
        self.lexicon = lexicon
            .into_iter()
            .map(|(word, tag)| (word.to_lowercase(), tag))
            .collect();
        self
    }

    pub fn with_thesaurus(mut self, thesaurus: Thesaurus) -> Self {
        self.thesaurus = thesaurus;
        self
    }

    pub fn with_stoplist(mut self, stoplist: Stoplist) -> Self {
        self.stoplist = stoplist;
        self
    }

    /// Loads the optional lexicon, thesaurus and stoplist files named in the config.
    pub fn from_config(config: &DetectionConfig) -> Result<Self> {
        let mut service = Self::new();

        if let Some(path) = &config.lexicon_path {
            let text = std::fs::read_to_string(path)?;
            let lexicon: HashMap<String, PosTag> = serde_json::from_str(&text)
                .map_err(|err| unreadable_resource(path, err))?;
            info!("Loaded {} lexicon entries from {}", lexicon.len(), path.display());
            service = service.with_lexicon(lexicon);
        }
        if let Some(path) = &config.thesaurus_path {
            let thesaurus = Thesaurus::load(path)?;
            info!("Loaded thesaurus from {}", path.display());
            service = service.with_thesaurus(thesaurus);
        }
        if let Some(path) = &config.stoplist_path {
            let stoplist = Stoplist::load(path)?;
            info!("Loaded {} stopwords from {}", stoplist.len(), path.display());
            service = service.with_stoplist(stoplist);
        }

        Ok(service)
    }

    fn lookup(&self, lower: &str) -> Option<PosTag> {
        self.lexicon
            .get(lower)
            .copied()
            .or_else(|| BASE_LEXICON.get(lower).copied())
    }

    fn tag_token(&self, token: &str, previous: Option<PosTag>) -> PosTag {
        if let Some(tag) = punctuation_tag(token) {
            return tag;
        }

        let lower = token.to_lowercase();
        if let Some(tag) = self.lookup(&lower) {
            return tag;
        }
        if NUMBER_RE.is_match(token) {
            return PosTag::Cd;
        }
        if token.chars().next().is_some_and(char::is_uppercase) {
            return PosTag::Nnp;
        }
        if matches!(previous, Some(PosTag::To) | Some(PosTag::Md)) {
            return PosTag::Vb;
        }

        suffix_tag(&lower)
    }
}

impl Default for LexiconLinguistics {
    fn default() -> Self {
        Self::new()
    }
}

impl LinguisticService for LexiconLinguistics {
    fn tokenize(&self, text: &str) -> Vec<String> {
        TOKEN_RE
            .find_iter(text)
            .map(|m| m.as_str().to_string())
            .collect()
    }

    fn pos_tag(&self, tokens: &[String]) -> Vec<(String, PosTag)> {
        let mut tagged: Vec<(String, PosTag)> = Vec::with_capacity(tokens.len());
        for token in tokens {
            let previous = tagged.last().map(|(_, tag)| *tag);
            let tag = self.tag_token(token, previous);
            tagged.push((token.clone(), tag));
        }
        debug!("Tagged {} tokens", tagged.len());
        tagged
    }

    fn lemmatize(&self, word: &str) -> String {
        lemmatize_noun(word)
    }

    fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }

    fn synonyms(&self, word: &str, class: PosClass) -> Vec<String> {
        self.thesaurus
            .entries(class)
            .get(&word.to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    fn is_stopword(&self, word: &str) -> bool {
        self.stoplist.contains(word)
    }
}

fn unreadable_resource(path: &Path, err: serde_json::Error) -> DetectionError {
    DetectionError::Linguistics(format!("{}: {}", path.display(), err))
}

fn punctuation_tag(token: &str) -> Option<PosTag> {
    let tag = match token {
        "." | "!" | "?" => PosTag::Period,
        "," => PosTag::Comma,
        ":" | ";" | "-" | "--" | "..." => PosTag::Colon,
        "(" | "[" | "{" => PosTag::LeftParen,
        ")" | "]" | "}" => PosTag::RightParen,
        "``" | "\"" => PosTag::OpenQuote,
        "''" | "'" => PosTag::CloseQuote,
        "$" => PosTag::Dollar,
        "#" => PosTag::Pound,
        _ if token.chars().all(|c| !c.is_alphanumeric()) => PosTag::Sym,
        _ => return None,
    };
    Some(tag)
}

fn suffix_tag(lower: &str) -> PosTag {
    let len = lower.chars().count();
    if len > 4 && lower.ends_with("ing") {
        PosTag::Vbg
    } else if len > 3 && lower.ends_with("ed") {
        PosTag::Vbd
    } else if len > 3 && lower.ends_with("ly") {
        PosTag::Rb
    } else if len > 4
        && ["ous", "ful", "ive", "able", "ible", "ical", "less"]
            .iter()
            .any(|suffix| lower.ends_with(suffix))
    {
        PosTag::Jj
    } else if len > 3 && lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") {
        PosTag::Nns
    } else {
        PosTag::Nn
    }
}

/// Plural-to-singular noun morphology. Short words and Latin-looking
/// singulars ending in `ss`, `us` or `is` are returned unchanged.
fn lemmatize_noun(word: &str) -> String {
    if let Some(base) = IRREGULAR_NOUNS.get(word) {
        return base.to_string();
    }
    if word.chars().count() <= 3
        || !word.chars().all(|c| c.is_ascii_alphabetic())
        || UNINFLECTED.contains(word.to_lowercase().as_str())
    {
        return word.to_string();
    }
    if word.ends_with("ss") || word.ends_with("us") || word.ends_with("is") {
        return word.to_string();
    }
    if let Some(base) = word.strip_suffix("ies") {
        if base.len() > 1 {
            return format!("{base}y");
        }
    }
    for suffix in ["ches", "shes", "sses", "xes", "zes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    match word.strip_suffix('s') {
        Some(base) => base.to_string(),
        None => word.to_string(),
    }
}
