/// Words and sentences derived from one transcript. Built once per request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TokenizedTranscript {
    pub words: Vec<String>,
    pub sentences: Vec<String>,
}

impl TokenizedTranscript {
    pub fn total_words(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Tokenizer backend contract.
pub trait Tokenizer: Send + Sync {
    fn word_tokenize(&self, text: &str) -> Vec<String>;

    fn sentence_tokenize(&self, text: &str) -> Vec<String>;

    fn tokenize(&self, text: &str) -> TokenizedTranscript {
        TokenizedTranscript {
            words: self.word_tokenize(text),
            sentences: self.sentence_tokenize(text),
        }
    }
}

/// Rule-based English tokenizer following NLTK's `word_tokenize` conventions:
/// punctuation becomes its own token and clitics (`n't`, `'s`, `'re`, ...) are
/// split from their stem. Common abbreviations ("Mr.", "Dr.", "e.g.") keep
/// their period and do not end a sentence.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTokenizer;

impl Tokenizer for RuleTokenizer {
    fn word_tokenize(&self, text: &str) -> Vec<String> {
        let mut words = Vec::new();
        for sentence in split_sentences(text) {
            let mut chunks = sentence.split_whitespace().peekable();
            while let Some(chunk) = chunks.next() {
                // a sentence-final period is always its own token
                let keep_abbreviation = chunks.peek().is_some();
                push_word_tokens(chunk, keep_abbreviation, &mut words);
            }
        }
        words
    }

    fn sentence_tokenize(&self, text: &str) -> Vec<String> {
        split_sentences(text)
    }
}

/// Titles and Latin shorthands whose period does not end a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "st", "jr", "sr", "vs", "etc", "e.g", "i.e",
];

/// True for a known abbreviation followed by exactly one period, e.g. "Mr." or "(e.g.".
fn is_abbreviation(word: &str) -> bool {
    word.trim_start_matches(is_punct)
        .strip_suffix('.')
        .map(|stem| ABBREVIATIONS.contains(&stem.to_lowercase().as_str()))
        .unwrap_or(false)
}

fn is_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_closer(c: char) -> bool {
    matches!(c, '"' | '\'' | ')' | ']' | '}' | '\u{201D}' | '\u{2019}')
}

fn is_punct(c: char) -> bool {
    !c.is_alphanumeric() && !c.is_whitespace()
}

fn push_trimmed(sentences: &mut Vec<String>, piece: &str) {
    let piece = piece.trim();
    if !piece.is_empty() {
        sentences.push(piece.to_string());
    }
}

/// Split after `.`, `!` or `?` (plus any closing quotes) when whitespace or
/// end of text follows, unless the period belongs to an abbreviation.
fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((i, c)) = chars.next() {
        if !is_terminator(c) {
            continue;
        }
        let mut end = i + c.len_utf8();
        while let Some(&(j, next)) = chars.peek() {
            if is_terminator(next) || is_closer(next) {
                end = j + next.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        let at_boundary = match chars.peek() {
            None => true,
            Some(&(_, next)) => next.is_whitespace(),
        };
        let last_word = text[start..end].split_whitespace().next_back().unwrap_or("");
        if at_boundary && !is_abbreviation(last_word) {
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
    }
    push_trimmed(&mut sentences, &text[start..]);
    sentences
}

fn push_word_tokens(chunk: &str, keep_abbreviation: bool, out: &mut Vec<String>) {
    if chunk.chars().all(is_punct) {
        out.push(chunk.to_string());
        return;
    }

    let mut core = chunk;
    while let Some(c) = core.chars().next() {
        if !is_punct(c) {
            break;
        }
        out.push(c.to_string());
        core = &core[c.len_utf8()..];
    }

    if keep_abbreviation && is_abbreviation(core) {
        out.push(core.to_string());
        return;
    }

    let mut trailing: Vec<&str> = Vec::new();
    while let Some(c) = core.chars().next_back() {
        if !is_punct(c) {
            break;
        }
        let cut = if core.ends_with("...") {
            core.len() - 3
        } else {
            core.len() - c.len_utf8()
        };
        trailing.push(&core[cut..]);
        core = &core[..cut];
    }

    split_clitic(core, out);
    out.extend(trailing.into_iter().rev().map(str::to_string));
}

fn split_clitic(word: &str, out: &mut Vec<String>) {
    let apostrophe = word
        .char_indices()
        .rev()
        .find(|&(_, c)| c == '\'' || c == '\u{2019}');

    if let Some((pos, mark)) = apostrophe {
        let suffix = word[pos + mark.len_utf8()..].to_lowercase();
        let stem = &word[..pos];

        // "don't" -> "do" + "n't", "can't" -> "ca" + "n't"
        if suffix == "t" && stem.len() > 1 && stem.ends_with(['n', 'N']) {
            out.push(word[..pos - 1].to_string());
            out.push(word[pos - 1..].to_string());
            return;
        }
        if !stem.is_empty() && matches!(suffix.as_str(), "s" | "re" | "ve" | "ll" | "d" | "m") {
            out.push(stem.to_string());
            out.push(word[pos..].to_string());
            return;
        }
    }
    out.push(word.to_string());
}
