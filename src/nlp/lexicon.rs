// Part-of-speech lexicon loaded from a CoNLL-U treebank
//
// The lexicon is the optional linguistic resource behind the extractive
// generator's linguistic mode. It is resolved ONCE at startup into a
// `LinguisticSupport` value; request handling never probes for it again.

use anyhow::{bail, Context, Result};
use rs_conllu::UPOS;
use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

/// Word classes the extractive generator cares about. Everything else in the
/// treebank is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordClass {
    CommonNoun,
    ProperNoun,
    Verb,
}

/// Surface-form → word-class lookup built from a CoNLL-U treebank.
///
/// This is a lookup table, not a contextual tagger: a form keeps the class of
/// its first tagged occurrence in the treebank. That is precise enough for
/// sentence filtering and distractor selection.
pub struct Lexicon {
    classes: HashMap<String, WordClass>,
}

impl Lexicon {
    /// Parse a CoNLL-U file into a lexicon. Sentences that fail to parse are
    /// skipped; an entirely untaggable file is an error.
    pub fn from_conllu(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open lexicon file {}", path.display()))?;

        let mut classes = HashMap::new();
        for sentence in rs_conllu::parse_file(file) {
            let Ok(sentence) = sentence else { continue };
            for token in sentence.tokens {
                let class = match token.upos {
                    Some(UPOS::NOUN) => WordClass::CommonNoun,
                    Some(UPOS::PROPN) => WordClass::ProperNoun,
                    Some(UPOS::VERB) => WordClass::Verb,
                    _ => continue,
                };
                classes.entry(token.form).or_insert(class);
            }
        }

        if classes.is_empty() {
            bail!("lexicon at {} contains no taggable tokens", path.display());
        }
        Ok(Self { classes })
    }

    /// Build a lexicon from explicit entries. Used by callers that derive
    /// their vocabulary from somewhere other than a treebank file.
    pub fn from_entries(entries: impl IntoIterator<Item = (String, WordClass)>) -> Self {
        Self {
            classes: entries.into_iter().collect(),
        }
    }

    /// Class of a surface form: exact match first, lowercase second so
    /// sentence-initial capitalization still resolves.
    pub fn word_class(&self, form: &str) -> Option<WordClass> {
        if let Some(class) = self.classes.get(form) {
            return Some(*class);
        }
        self.classes.get(&form.to_lowercase()).copied()
    }

    pub fn is_noun(&self, form: &str) -> bool {
        matches!(
            self.word_class(form),
            Some(WordClass::CommonNoun | WordClass::ProperNoun)
        )
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

/// Whether the linguistic resource loaded at startup.
///
/// `Unavailable` is a normal operating mode, not an error: the extractive
/// generator silently skips its linguistic pass and goes straight to regex
/// extraction.
pub enum LinguisticSupport {
    Available(Lexicon),
    Unavailable,
}

impl LinguisticSupport {
    /// Resolve linguistic support from an optional lexicon path. Any load
    /// failure downgrades to `Unavailable` with a log line; it never raises.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::info!("no lexicon configured; linguistic extraction disabled");
            return Self::Unavailable;
        };
        match Lexicon::from_conllu(path) {
            Ok(lexicon) => {
                tracing::info!(entries = lexicon.len(), path = %path.display(), "loaded POS lexicon");
                Self::Available(lexicon)
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), "failed to load POS lexicon: {e:#}");
                Self::Unavailable
            }
        }
    }

    pub fn lexicon(&self) -> Option<&Lexicon> {
        match self {
            Self::Available(lexicon) => Some(lexicon),
            Self::Unavailable => None,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}
