//! Single-pass scanner for date-time format patterns.
//!
//! The scanner walks a pattern left to right. At each position it
//! classifies the character, consumes either a run of that character or a
//! quoted section, and hands one [`Component`] to a [`PatternVisitor`].
//! Every component is bracketed by [`PatternVisitor::start_component`] and
//! [`PatternVisitor::end_component`].
//!
//! Malformed input never stops a scan. A run that is too wide, or whose width
//! is not one of the fixed widths of its symbol, is reported as
//! [`Component::Illegal`] and scanning carries on after it. Optional section
//! brackets are reported as ordinary width-counted components; checking that
//! they balance is left to the caller (see [`crate::validate`]).

use std::borrow::Cow;
use std::fmt;

use tracing::{debug, trace};

use crate::component::{ComponentKind, Strategy, SymbolKind, classify};

/// Errors reported before a scan begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// No pattern was supplied.
    MissingPattern,
}

impl fmt::Display for ScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingPattern => write!(f, "No pattern supplied"),
        }
    }
}

impl std::error::Error for ScanError {}

/// Answer from [`PatternVisitor::start_component`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visiting {
    /// Deliver the component to [`PatternVisitor::visit_component`].
    #[default]
    Continue,
    /// Suppress the component. The end hook still fires.
    Skip,
}

/// One scanned piece of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Component<'a> {
    /// A symbol reported with its run width only, e.g. `yyyy`.
    Width { kind: ComponentKind, width: usize },
    /// A symbol whose width also selects how it renders, e.g. `MMM`.
    Symbol {
        kind: ComponentKind,
        width: usize,
        symbol: SymbolKind,
    },
    /// Text copied to the output. `kind` is `Literal` or `Escape`.
    Literal { kind: ComponentKind, value: Cow<'a, str> },
    /// A reserved letter, or a symbol run whose width is not accepted.
    /// `kind` is the kind being scanned when the problem was found.
    Illegal { kind: ComponentKind, text: Cow<'a, str> },
}

impl Component<'_> {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Width { kind, .. }
            | Component::Symbol { kind, .. }
            | Component::Literal { kind, .. }
            | Component::Illegal { kind, .. } => *kind,
        }
    }

    /// Run width for symbol components.
    pub fn width(&self) -> Option<usize> {
        match self {
            Component::Width { width, .. } | Component::Symbol { width, .. } => Some(*width),
            Component::Literal { .. } | Component::Illegal { .. } => None,
        }
    }

    pub fn symbol_kind(&self) -> Option<SymbolKind> {
        match self {
            Component::Symbol { symbol, .. } => Some(*symbol),
            _ => None,
        }
    }

    pub fn is_illegal(&self) -> bool {
        matches!(self, Component::Illegal { .. })
    }

    pub fn into_owned(self) -> Component<'static> {
        match self {
            Component::Width { kind, width } => Component::Width { kind, width },
            Component::Symbol {
                kind,
                width,
                symbol,
            } => Component::Symbol {
                kind,
                width,
                symbol,
            },
            Component::Literal { kind, value } => Component::Literal {
                kind,
                value: Cow::Owned(value.into_owned()),
            },
            Component::Illegal { kind, text } => Component::Illegal {
                kind,
                text: Cow::Owned(text.into_owned()),
            },
        }
    }
}

impl fmt::Display for Component<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Component::Width { kind, width } => write!(f, "{kind} width={width}"),
            Component::Symbol {
                kind,
                width,
                symbol,
            } => write!(f, "{kind} width={width} ({symbol})"),
            Component::Literal { value, .. } => write!(f, "literal {value:?}"),
            Component::Illegal { kind, text } => write!(f, "illegal {text:?} ({kind})"),
        }
    }
}

/// Receiver of scanned components.
///
/// Positions are byte offsets into the pattern and `text` is the raw span
/// consumed for the component, quotes included.
pub trait PatternVisitor {
    fn start_component(&mut self, _position: usize, _text: &str) -> Visiting {
        Visiting::Continue
    }

    fn visit_component(&mut self, component: &Component<'_>);

    fn end_component(&mut self, _position: usize, _text: &str) {}
}

impl<V: PatternVisitor + ?Sized> PatternVisitor for &mut V {
    fn start_component(&mut self, position: usize, text: &str) -> Visiting {
        (**self).start_component(position, text)
    }

    fn visit_component(&mut self, component: &Component<'_>) {
        (**self).visit_component(component)
    }

    fn end_component(&mut self, position: usize, text: &str) {
        (**self).end_component(position, text)
    }
}

type StartFn<'f> = Box<dyn FnMut(usize, &str) -> Visiting + 'f>;
type ComponentFn<'f> = Box<dyn FnMut(&Component<'_>) + 'f>;
type EndFn<'f> = Box<dyn FnMut(usize, &str) + 'f>;

/// A [`PatternVisitor`] built from closures.
///
/// ```rust
/// use chronopat::{Component, FnVisitor, scan};
///
/// let mut widths = Vec::new();
/// let mut visitor = FnVisitor::new(|c: &Component<'_>| widths.extend(c.width()));
/// scan("yyyy-MM", &mut visitor);
/// drop(visitor);
/// assert_eq!(widths, vec![4, 2]);
/// ```
pub struct FnVisitor<'f> {
    start: Option<StartFn<'f>>,
    component: ComponentFn<'f>,
    end: Option<EndFn<'f>>,
}

impl<'f> FnVisitor<'f> {
    pub fn new(component: impl FnMut(&Component<'_>) + 'f) -> Self {
        Self {
            start: None,
            component: Box::new(component),
            end: None,
        }
    }

    /// Install a start hook. Without one every component is delivered.
    pub fn on_start(mut self, start: impl FnMut(usize, &str) -> Visiting + 'f) -> Self {
        self.start = Some(Box::new(start));
        self
    }

    pub fn on_end(mut self, end: impl FnMut(usize, &str) + 'f) -> Self {
        self.end = Some(Box::new(end));
        self
    }
}

impl PatternVisitor for FnVisitor<'_> {
    fn start_component(&mut self, position: usize, text: &str) -> Visiting {
        match self.start.as_mut() {
            Some(start) => start(position, text),
            None => Visiting::Continue,
        }
    }

    fn visit_component(&mut self, component: &Component<'_>) {
        (self.component)(component)
    }

    fn end_component(&mut self, position: usize, text: &str) {
        if let Some(end) = self.end.as_mut() {
            end(position, text);
        }
    }
}

/// Scan `pattern`, delivering every component to `visitor`.
pub fn scan<V: PatternVisitor + ?Sized>(pattern: &str, visitor: &mut V) {
    debug!(len = pattern.len(), "scanning pattern");
    Scanner {
        pattern,
        position: 0,
        visitor,
    }
    .run();
}

/// Like [`scan`], but for a pattern that may be absent.
///
/// Fails with [`ScanError::MissingPattern`] before any callback fires.
pub fn try_scan<V: PatternVisitor + ?Sized>(
    pattern: Option<&str>,
    visitor: &mut V,
) -> Result<(), ScanError> {
    let pattern = pattern.ok_or(ScanError::MissingPattern)?;
    scan(pattern, visitor);
    Ok(())
}

struct Scanner<'p, 'v, V: ?Sized> {
    pattern: &'p str,
    position: usize,
    visitor: &'v mut V,
}

impl<'p, V: PatternVisitor + ?Sized> Scanner<'p, '_, V> {
    fn run(&mut self) {
        while let Some(ch) = self.rest().chars().next() {
            let kind = classify(ch);
            let consumed = match kind.strategy() {
                Strategy::EscapedLiteral => self.escaped_literal(),
                Strategy::Literal => {
                    let (_, text) = self.run_of(ch);
                    self.emit(
                        text,
                        Component::Literal {
                            kind,
                            value: Cow::Borrowed(text),
                        },
                    )
                }
                Strategy::Illegal => {
                    let (_, text) = self.run_of(ch);
                    self.emit(
                        text,
                        Component::Illegal {
                            kind,
                            text: Cow::Borrowed(text),
                        },
                    )
                }
                Strategy::PlainWidth
                | Strategy::NumberOnly
                | Strategy::TextOnly
                | Strategy::NumberOrText => self.symbol_run(kind, ch),
            };
            debug_assert!(consumed > 0, "scanner must advance");
            self.position += consumed;
        }
    }

    fn rest(&self) -> &'p str {
        &self.pattern[self.position..]
    }

    /// The maximal run of `ch` at the cursor, as (width in chars, text).
    fn run_of(&self, ch: char) -> (usize, &'p str) {
        let rest = self.rest();
        let width = rest.chars().take_while(|&c| c == ch).count();
        (width, &rest[..width * ch.len_utf8()])
    }

    /// A run of a symbol character, checked against the limits of `kind`.
    fn symbol_run(&mut self, kind: ComponentKind, ch: char) -> usize {
        let (width, text) = self.run_of(ch);
        let spec = kind.spec();
        let component = if !spec.within_max(width) {
            Component::Illegal {
                kind,
                text: Cow::Borrowed(text),
            }
        } else if !spec.accepts_width(width) {
            // Rebuilt from the symbol; a run only ever holds `ch`, so this
            // matches the scanned text.
            let rebuilt = ch.to_string().repeat(width);
            debug_assert_eq!(rebuilt, text);
            Component::Illegal {
                kind,
                text: Cow::Owned(rebuilt),
            }
        } else {
            match refine(spec.strategy, width) {
                Some(symbol) => Component::Symbol {
                    kind,
                    width,
                    symbol,
                },
                None => Component::Width { kind, width },
            }
        };
        self.emit(text, component)
    }

    /// A quoted section starting at the cursor.
    fn escaped_literal(&mut self) -> usize {
        let (span, value) = quoted(self.rest());
        let text = &self.rest()[..span];
        self.emit(
            text,
            Component::Literal {
                kind: ComponentKind::Escape,
                value,
            },
        )
    }

    /// Deliver one component with its hooks; returns the bytes consumed.
    fn emit(&mut self, text: &str, component: Component<'_>) -> usize {
        trace!(position = self.position, text, %component, "component");
        if self.visitor.start_component(self.position, text) == Visiting::Continue {
            self.visitor.visit_component(&component);
        }
        self.visitor.end_component(self.position, text);
        text.len()
    }
}

/// Symbol kind for a width-based strategy, or `None` when only the width is
/// reported.
fn refine(strategy: Strategy, width: usize) -> Option<SymbolKind> {
    match strategy {
        Strategy::NumberOnly => Some(SymbolKind::Number),
        Strategy::TextOnly => Some(SymbolKind::for_text(width)),
        Strategy::NumberOrText => Some(SymbolKind::for_number_or_text(width)),
        Strategy::PlainWidth
        | Strategy::Literal
        | Strategy::EscapedLiteral
        | Strategy::Illegal => None,
    }
}

/// Split a quoted section off the front of `rest`, which starts with `'`.
///
/// Returns the span length in bytes (quotes included) and the literal value.
/// A backslash escapes the following character. Without a closing quote the
/// section runs to the end of the pattern.
fn quoted(rest: &str) -> (usize, Cow<'_, str>) {
    let mut span = rest.len();
    let mut content_end = rest.len();
    let mut escaped = false;
    let mut has_escapes = false;

    for (index, ch) in rest.char_indices().skip(1) {
        if escaped {
            escaped = false;
            continue;
        }
        match ch {
            '\\' => {
                escaped = true;
                has_escapes = true;
            }
            '\'' => {
                content_end = index;
                span = index + 1;
                break;
            }
            _ => {}
        }
    }

    if &rest[..span] == "''" {
        return (span, Cow::Borrowed(&rest[..1]));
    }

    let content = &rest[1..content_end];
    let value = if has_escapes {
        Cow::Owned(unescape(content))
    } else {
        Cow::Borrowed(content)
    };
    (span, value)
}

/// Drop the backslash in front of each escaped character. A trailing lone
/// backslash is kept.
fn unescape(content: &str) -> String {
    let mut value = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            value.push(chars.next().unwrap_or('\\'));
        } else {
            value.push(ch);
        }
    }
    value
}
