//! Token merge formatter.
//!
//! Collapses word-level annotated tokens into Markdown text where each
//! maximal run of emphasized words is wrapped once in `**`.

use regex::Regex;
use std::sync::OnceLock;

use crate::types::AnnotatedToken;

/// Paired delimiter wrapped around an emphasized span
pub const BOLD_MARKER: &str = "**";

/// Emphasis state of a span
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisState {
    Plain,
    Emphasis,
}

impl EmphasisState {
    fn of(token: &AnnotatedToken) -> Self {
        if token.emphasized {
            Self::Emphasis
        } else {
            Self::Plain
        }
    }
}

struct Span {
    state: EmphasisState,
    words: Vec<String>,
}

impl Span {
    fn render(&self) -> String {
        let text = self.words.join(" ");
        match self.state {
            EmphasisState::Plain => text,
            EmphasisState::Emphasis => {
                // Markdown bold does not open or close next to a space.
                let inner = text.trim();
                if inner.is_empty() {
                    String::new()
                } else {
                    format!("{BOLD_MARKER}{inner}{BOLD_MARKER}")
                }
            }
        }
    }
}

#[derive(Default)]
struct Merge {
    open: Option<Span>,
    done: Vec<Span>,
}

impl Merge {
    fn push(mut self, state: EmphasisState, word: String) -> Self {
        match self.open.as_mut() {
            Some(span) if span.state == state => span.words.push(word),
            _ => {
                self.done.extend(self.open.take());
                self.open = Some(Span {
                    state,
                    words: vec![word],
                });
            }
        }
        self
    }

    fn finish(mut self) -> Vec<Span> {
        self.done.extend(self.open.take());
        self.done
    }
}

/// Normalizes a raw token word, returning `None` when the token is elided.
///
/// A lone `/` is dropped; leading slashes are stripped from anything else.
fn clean_word(word: &str) -> Option<String> {
    let word = word.trim();
    if word == "/" {
        return None;
    }
    Some(word.trim_start_matches('/').to_string())
}

/// Merges annotated tokens into formatted text.
///
/// Each maximal run of tokens with the same emphasis becomes one span. An
/// emphasized span is trimmed before it is wrapped in [`BOLD_MARKER`], and
/// one with no visible text renders as nothing rather than an empty `****`.
pub fn format_tokens(tokens: &[AnnotatedToken]) -> String {
    let spans = tokens
        .iter()
        .fold(Merge::default(), |merge, token| match clean_word(&token.word) {
            Some(word) => merge.push(EmphasisState::of(token), word),
            None => merge,
        })
        .finish();

    let joined = spans
        .iter()
        .map(Span::render)
        .collect::<Vec<_>>()
        .join(" ");

    clean_spacing(&joined)
}

fn space_before_punct() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+([,.;:!?])").expect("punctuation pattern is valid"))
}

fn repeated_space() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s{2,}").expect("whitespace pattern is valid"))
}

/// Attaches punctuation to the preceding word and collapses whitespace.
///
/// Whitespace means any Unicode whitespace, so ideographic and no-break
/// spaces are cleaned too. Applying it to its own output changes nothing.
pub fn clean_spacing(text: &str) -> String {
    let text = space_before_punct().replace_all(text, "$1");
    let text = repeated_space().replace_all(&text, " ");
    text.trim().to_string()
}

/// Removes paired bold markers, leaving plain text
pub fn strip_emphasis(text: &str) -> String {
    clean_spacing(&text.replace(BOLD_MARKER, ""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(w: &str) -> AnnotatedToken {
        AnnotatedToken::plain(w)
    }

    fn bold(w: &str) -> AnnotatedToken {
        AnnotatedToken::bold(w)
    }

    #[test]
    fn empty_sequence_is_empty_text() {
        assert_eq!(format_tokens(&[]), "");
    }

    #[test]
    fn consecutive_bold_tokens_share_one_span() {
        assert_eq!(format_tokens(&[bold("난"), bold("아니다")]), "**난 아니다**");
    }

    #[test]
    fn state_change_opens_new_span() {
        assert_eq!(format_tokens(&[bold("A"), plain("B")]), "**A** B");
        assert_eq!(
            format_tokens(&[plain("솔직히"), bold("난"), bold("아니다"), plain("정말")]),
            "솔직히 **난 아니다** 정말"
        );
    }

    #[test]
    fn lone_slash_is_elided_without_breaking_span() {
        assert_eq!(format_tokens(&[plain("그는"), plain("/"), plain("갔다")]), "그는 갔다");
        assert_eq!(format_tokens(&[bold("난"), plain(" / "), bold("아니다")]), "**난 아니다**");
    }

    #[test]
    fn leading_slashes_are_stripped() {
        assert_eq!(format_tokens(&[plain("/다툼이"), plain("있었다")]), "다툼이 있었다");
        assert_eq!(format_tokens(&[plain("///기록")]), "기록");
    }

    #[test]
    fn punctuation_attaches_to_previous_word() {
        let tokens = [plain("난"), plain("아니다"), plain("."), plain("D가"), plain("했다"), plain("!")];
        assert_eq!(format_tokens(&tokens), "난 아니다. D가 했다!");
    }

    #[test]
    fn punctuation_after_bold_span_attaches_outside_marker() {
        assert_eq!(format_tokens(&[bold("D가"), bold("했다"), plain(".")]), "**D가 했다**.");
    }

    #[test]
    fn empty_words_leave_no_double_space() {
        let tokens = [plain("그날"), plain("/"), plain("//"), plain("  "), plain("밖이었다")];
        assert_eq!(format_tokens(&tokens), "그날 밖이었다");
    }

    #[test]
    fn empty_word_inside_bold_span_does_not_pad_marker() {
        assert_eq!(format_tokens(&[plain("결론:"), bold("//"), bold("B")]), "결론: **B**");
        assert_eq!(format_tokens(&[plain("x"), bold("//")]), "x");
    }

    #[test]
    fn unicode_whitespace_is_cleaned() {
        let tokens = [plain("그는\u{3000}\u{3000}갔다"), plain("왜\u{a0}?")];
        assert_eq!(format_tokens(&tokens), "그는 갔다 왜?");
        assert_eq!(clean_spacing("\u{a0}네\u{2003}\u{3000},\u{3000}"), "네,");
    }

    #[test]
    fn clean_spacing_is_idempotent() {
        let once = clean_spacing("  a ,  b\t\t. c  ?  ");
        assert_eq!(once, "a, b. c?");
        assert_eq!(clean_spacing(&once), once);
    }

    #[test]
    fn strip_emphasis_removes_markers() {
        let text = format_tokens(&[plain("그건"), bold("B가"), bold("했다"), plain(".")]);
        assert_eq!(strip_emphasis(&text), "그건 B가 했다.");
    }
}
