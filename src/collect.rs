//! Collecting scanned components into an owned token list.

use crate::scanner::{Component, PatternVisitor, Visiting, scan};

/// One scanned component together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Byte offset of the component in the pattern.
    pub position: usize,
    /// The raw span consumed, quotes included.
    pub text: String,
    pub component: Component<'static>,
}

impl Token {
    /// Byte offset one past the end of the span.
    pub fn end(&self) -> usize {
        self.position + self.text.len()
    }
}

/// A [`PatternVisitor`] that keeps every component as a [`Token`].
#[derive(Debug, Default)]
pub struct TokenCollector {
    tokens: Vec<Token>,
    current: Option<(usize, String)>,
}

impl TokenCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }
}

impl PatternVisitor for TokenCollector {
    fn start_component(&mut self, position: usize, text: &str) -> Visiting {
        self.current = Some((position, text.to_string()));
        Visiting::Continue
    }

    fn visit_component(&mut self, component: &Component<'_>) {
        if let Some((position, text)) = self.current.take() {
            self.tokens.push(Token {
                position,
                text,
                component: component.clone().into_owned(),
            });
        }
    }

    fn end_component(&mut self, _position: usize, _text: &str) {
        self.current = None;
    }
}

/// Scan `pattern` into a list of tokens.
///
/// The token texts, concatenated, give back the pattern.
pub fn tokenize(pattern: &str) -> Vec<Token> {
    let mut collector = TokenCollector::new();
    scan(pattern, &mut collector);
    collector.into_tokens()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{ComponentKind, SymbolKind};

    #[test]
    fn tokens_carry_positions_and_text() {
        let tokens = tokenize("dd MMM 'at' HH");
        let texts: Vec<&str> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["dd", " ", "MMM", " ", "'at'", " ", "HH"]);
        let positions: Vec<usize> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 2, 3, 6, 7, 11, 12]);
        assert_eq!(tokens[2].component.symbol_kind(), Some(SymbolKind::ShortText));
        assert_eq!(tokens[4].component.kind(), ComponentKind::Escape);
        assert_eq!(tokens[6].end(), 14);
    }

    #[test]
    fn concatenated_texts_rebuild_the_pattern() {
        let pattern = "EEE, d MMM yyyy HH:mm:ss 'GMT'xxx [VV]";
        let rebuilt: String = tokenize(pattern).into_iter().map(|t| t.text).collect();
        assert_eq!(rebuilt, pattern);
    }

    #[test]
    fn illegal_tokens_are_kept() {
        let tokens = tokenize("ddd");
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].component.is_illegal());
        assert_eq!(tokens[0].text, "ddd");
    }

    #[test]
    fn empty_pattern_has_no_tokens() {
        assert!(tokenize("").is_empty());
        assert!(TokenCollector::new().tokens().is_empty());
    }
}
