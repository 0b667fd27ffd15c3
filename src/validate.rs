//! Whole-pattern checks layered on top of the scanner.
//!
//! The scanner reports problems one component at a time and never
//! summarises. These helpers collect tokens and turn the first problem into
//! a [`PatternError`]. Optional section balancing is checked here, not in
//! the scanner.

use crate::collect::{Token, tokenize};
use crate::component::ComponentKind;
use crate::scanner::Component;

/// The first problem found in a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    /// A reserved letter, or a symbol run with an unaccepted width.
    IllegalComponent { position: usize, text: String },
    /// `#`, `{` or `}`, which have no meaning yet.
    Reserved { position: usize, symbol: char },
    /// A `[` with no matching `]`.
    UnclosedOptional { position: usize },
    /// A `]` with no preceding `[`.
    UnmatchedOptionalEnd { position: usize },
}

impl PatternError {
    pub fn position(&self) -> usize {
        match self {
            Self::IllegalComponent { position, .. }
            | Self::Reserved { position, .. }
            | Self::UnclosedOptional { position }
            | Self::UnmatchedOptionalEnd { position } => *position,
        }
    }
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IllegalComponent { position, text } => {
                write!(f, "Illegal pattern component {text:?} at {position}")
            }
            Self::Reserved { position, symbol } => {
                write!(f, "Reserved character {symbol:?} at {position}")
            }
            Self::UnclosedOptional { position } => {
                write!(f, "Unclosed optional section '[' at {position}")
            }
            Self::UnmatchedOptionalEnd { position } => {
                write!(f, "Unmatched optional section end ']' at {position}")
            }
        }
    }
}

impl std::error::Error for PatternError {}

/// Scan `pattern` and fail on the first problem, in pattern order.
///
/// An unclosed `[` is only known at the end, so it is reported after any
/// other problem.
pub fn validate(pattern: &str) -> Result<Vec<Token>, PatternError> {
    let tokens = tokenize(pattern);
    let mut open: Vec<usize> = Vec::new();

    for token in &tokens {
        match &token.component {
            Component::Illegal { text, .. } => {
                return Err(PatternError::IllegalComponent {
                    position: token.position,
                    text: text.to_string(),
                });
            }
            Component::Width { kind, width } => match kind {
                ComponentKind::OptionalStart => {
                    open.extend((0..*width).map(|i| token.position + i));
                }
                ComponentKind::OptionalEnd => {
                    for i in 0..*width {
                        if open.pop().is_none() {
                            return Err(PatternError::UnmatchedOptionalEnd {
                                position: token.position + i,
                            });
                        }
                    }
                }
                ComponentKind::ReservedHash => return Err(reserved(token, '#')),
                ComponentKind::ReservedBraceOpen => return Err(reserved(token, '{')),
                ComponentKind::ReservedBraceClose => return Err(reserved(token, '}')),
                _ => {}
            },
            Component::Symbol { .. } | Component::Literal { .. } => {}
        }
    }

    match open.pop() {
        Some(position) => Err(PatternError::UnclosedOptional { position }),
        None => Ok(tokens),
    }
}

fn reserved(token: &Token, symbol: char) -> PatternError {
    PatternError::Reserved {
        position: token.position,
        symbol,
    }
}

/// Every illegal token in `pattern`.
pub fn illegal_components(pattern: &str) -> Vec<Token> {
    tokenize(pattern)
        .into_iter()
        .filter(|t| t.component.is_illegal())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_err(s: &str) -> PatternError {
        validate(s).expect_err("validation should fail")
    }

    #[test]
    fn test_valid_pattern_returns_tokens() {
        let tokens = validate("yyyy-MM-dd['T'HH:mm[:ss]]").expect("valid pattern");
        assert_eq!(tokens.first().map(|t| t.text.as_str()), Some("yyyy"));
        assert_eq!(tokens.last().map(|t| t.text.as_str()), Some("]]"));
    }

    #[test]
    fn test_illegal_width() {
        assert_eq!(
            validate_err("yyyy-MMMMMM"),
            PatternError::IllegalComponent {
                position: 5,
                text: "MMMMMM".to_string()
            }
        );
    }

    #[test]
    fn test_illegal_letter() {
        assert_eq!(
            validate_err("HH'h'mm t"),
            PatternError::IllegalComponent {
                position: 8,
                text: "t".to_string()
            }
        );
    }

    #[test]
    fn test_reserved() {
        assert_eq!(
            validate_err("dd{"),
            PatternError::Reserved {
                position: 2,
                symbol: '{'
            }
        );
        assert_eq!(
            validate_err("HH }"),
            PatternError::Reserved {
                position: 3,
                symbol: '}'
            }
        );
        assert_eq!(
            validate_err("##"),
            PatternError::Reserved {
                position: 0,
                symbol: '#'
            }
        );
    }

    #[test]
    fn test_reserved_symbol_matches_table() {
        for kind in ComponentKind::ALL.into_iter().filter(|k| k.is_reserved()) {
            let symbol = kind.symbol().expect("reserved kinds have a symbol");
            assert_eq!(
                validate_err(&symbol.to_string()),
                PatternError::Reserved {
                    position: 0,
                    symbol
                }
            );
        }
    }

    #[test]
    fn test_unclosed_optional_reports_innermost() {
        assert_eq!(
            validate_err("[HH[:mm"),
            PatternError::UnclosedOptional { position: 3 }
        );
        assert_eq!(validate_err("[[HH]"), PatternError::UnclosedOptional { position: 0 });
    }

    #[test]
    fn test_unmatched_end() {
        assert_eq!(
            validate_err("HH]"),
            PatternError::UnmatchedOptionalEnd { position: 2 }
        );
        assert_eq!(
            validate_err("[HH]]"),
            PatternError::UnmatchedOptionalEnd { position: 4 }
        );
        assert_eq!(
            validate_err("[HH]]]"),
            PatternError::UnmatchedOptionalEnd { position: 4 }
        );
    }

    #[test]
    fn test_quoted_brackets_are_ignored() {
        assert!(validate("'[' HH ']'").is_ok());
    }

    #[test]
    fn test_error_position_and_display() {
        let err = validate_err("VVV");
        assert_eq!(err.position(), 0);
        assert_eq!(err.to_string(), "Illegal pattern component \"VVV\" at 0");
        assert_eq!(
            PatternError::UnclosedOptional { position: 7 }.to_string(),
            "Unclosed optional section '[' at 7"
        );
    }

    #[test]
    fn test_illegal_components_lists_all() {
        let illegal = illegal_components("cc-T-ddd");
        let texts: Vec<&str> = illegal.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["cc", "T", "ddd"]);
        assert!(illegal_components("yyyy").is_empty());
    }
}
