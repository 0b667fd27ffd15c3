//! Pattern symbol classification.
//!
//! Every character of a date-time pattern maps to exactly one
//! [`ComponentKind`]. Each kind has a row in a single static table
//! describing how the scanner treats a run of it: the traversal
//! [`Strategy`], the inclusive maximum run width and, for a few symbols,
//! the fixed set of widths that are accepted.

use std::fmt;

use itertools::Itertools;
use phf::{Map, phf_map};

/// The symbol class of a pattern character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Era,
    Year,
    YearOfEra,
    DayOfYear,
    MonthOfYear,
    StandaloneMonthOfYear,
    DayOfMonth,
    QuarterOfYear,
    StandaloneQuarterOfYear,
    WeekBasedYear,
    WeekOfWeekBasedYear,
    WeekOfMonthW,
    DayOfWeek,
    LocalizedDayOfWeek,
    StandaloneLocalizedDayOfWeek,
    WeekOfMonthF,
    AmPmOfDay,
    ClockHourOfAmPm12,
    HourOfAmPm11,
    ClockHourOfAmPm24,
    HourOfDay23,
    MinuteOfHour,
    SecondOfMinute,
    FractionOfSecond,
    MilliOfDay,
    NanoOfSecond,
    NanoOfDay,
    TimeZoneId,
    TimeZoneName,
    LocalizedZoneOffset,
    ZoneOffsetBigX,
    ZoneOffsetSmallX,
    ZoneOffsetZ,
    Pad,
    Escape,
    OptionalStart,
    OptionalEnd,
    ReservedHash,
    ReservedBraceOpen,
    ReservedBraceClose,
    Illegal,
    Literal,
}

/// How the scanner consumes and reports a run of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Reported with its width only.
    PlainWidth,
    /// Always rendered as digits.
    NumberOnly,
    /// Rendered as text; the width picks the text style.
    TextOnly,
    /// Digits for short runs, text for longer ones.
    NumberOrText,
    /// A run of ordinary characters copied to the output.
    Literal,
    /// A quoted section, `'...'`.
    EscapedLiteral,
    /// A reserved letter with no meaning yet.
    Illegal,
}

impl Strategy {
    /// True for the strategies that count a run and check it against the
    /// width limits of the kind.
    pub fn is_width_based(self) -> bool {
        matches!(
            self,
            Strategy::PlainWidth | Strategy::NumberOnly | Strategy::TextOnly | Strategy::NumberOrText
        )
    }
}

/// How a width-based component should be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Number,
    ShortText,
    LongText,
    NarrowText,
}

impl SymbolKind {
    /// Refinement for text-only symbols such as `E` or `z`.
    pub fn for_text(width: usize) -> Self {
        match width {
            0..=3 => SymbolKind::ShortText,
            4 => SymbolKind::LongText,
            _ => SymbolKind::NarrowText,
        }
    }

    /// Refinement for symbols such as `M` that are numeric when short.
    pub fn for_number_or_text(width: usize) -> Self {
        match width {
            0..=2 => SymbolKind::Number,
            3 => SymbolKind::ShortText,
            4 => SymbolKind::LongText,
            _ => SymbolKind::NarrowText,
        }
    }

    pub fn is_text(self) -> bool {
        !matches!(self, SymbolKind::Number)
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SymbolKind::Number => "number",
            SymbolKind::ShortText => "short text",
            SymbolKind::LongText => "long text",
            SymbolKind::NarrowText => "narrow text",
        };
        f.write_str(name)
    }
}

/// Static metadata for one [`ComponentKind`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindSpec {
    pub kind: ComponentKind,
    pub symbol: Option<char>,
    pub name: &'static str,
    pub strategy: Strategy,
    /// Inclusive maximum run width, `None` when unbounded.
    pub max_width: Option<usize>,
    /// When present, the width must be one of these values.
    pub allowed_widths: Option<&'static [usize]>,
}

impl KindSpec {
    /// True when a run of `width` passes both the maximum and the fixed set.
    pub fn accepts_width(&self, width: usize) -> bool {
        self.within_max(width) && self.allowed_widths.is_none_or(|set| set.contains(&width))
    }

    pub fn within_max(&self, width: usize) -> bool {
        self.max_width.is_none_or(|max| width <= max)
    }

    /// Human-readable description of the accepted widths, e.g. `1..=2` or `{1, 4}`.
    pub fn describe_widths(&self) -> String {
        match (self.allowed_widths, self.max_width) {
            (Some(set), _) => format!("{{{}}}", set.iter().join(", ")),
            (None, Some(max)) => format!("1..={max}"),
            (None, None) => "1..".to_string(),
        }
    }
}

macro_rules! spec {
    ($kind:ident, $symbol:expr, $name:literal, $strategy:ident) => {
        spec!($kind, $symbol, $name, $strategy, None, None)
    };
    ($kind:ident, $symbol:expr, $name:literal, $strategy:ident, max $max:literal) => {
        spec!($kind, $symbol, $name, $strategy, Some($max), None)
    };
    ($kind:ident, $symbol:expr, $name:literal, $strategy:ident, max $max:literal, only $allowed:expr) => {
        spec!($kind, $symbol, $name, $strategy, Some($max), Some($allowed))
    };
    ($kind:ident, $symbol:expr, $name:literal, $strategy:ident, $max:expr, $allowed:expr) => {
        KindSpec {
            kind: ComponentKind::$kind,
            symbol: $symbol,
            name: $name,
            strategy: Strategy::$strategy,
            max_width: $max,
            allowed_widths: $allowed,
        }
    };
}

/// One row per kind, in declaration order of [`ComponentKind`].
static KIND_SPECS: [KindSpec; ComponentKind::COUNT] = [
    spec!(Era, Some('G'), "era", TextOnly, max 5),
    spec!(Year, Some('u'), "year", PlainWidth),
    spec!(YearOfEra, Some('y'), "year-of-era", PlainWidth),
    spec!(DayOfYear, Some('D'), "day-of-year", NumberOnly, max 3),
    spec!(MonthOfYear, Some('M'), "month-of-year", NumberOrText, max 5),
    spec!(StandaloneMonthOfYear, Some('L'), "standalone month-of-year", NumberOrText, max 5),
    spec!(DayOfMonth, Some('d'), "day-of-month", NumberOnly, max 2),
    spec!(QuarterOfYear, Some('Q'), "quarter-of-year", NumberOrText, max 5),
    spec!(StandaloneQuarterOfYear, Some('q'), "standalone quarter-of-year", NumberOrText, max 5),
    spec!(WeekBasedYear, Some('Y'), "week-based-year", PlainWidth),
    spec!(WeekOfWeekBasedYear, Some('w'), "week-of-week-based-year", NumberOnly, max 2),
    spec!(WeekOfMonthW, Some('W'), "week-of-month", NumberOnly, max 1),
    spec!(DayOfWeek, Some('E'), "day-of-week", TextOnly, max 5),
    spec!(LocalizedDayOfWeek, Some('e'), "localized day-of-week", NumberOrText, max 5),
    spec!(
        StandaloneLocalizedDayOfWeek,
        Some('c'),
        "standalone localized day-of-week",
        NumberOrText,
        max 5,
        only &[1, 3, 4, 5]
    ),
    spec!(WeekOfMonthF, Some('F'), "aligned week-of-month", NumberOnly, max 1, only &[1]),
    spec!(AmPmOfDay, Some('a'), "am-pm-of-day", TextOnly, max 1),
    spec!(ClockHourOfAmPm12, Some('h'), "clock-hour-of-am-pm (1-12)", NumberOnly, max 2),
    spec!(HourOfAmPm11, Some('K'), "hour-of-am-pm (0-11)", NumberOnly, max 2),
    spec!(ClockHourOfAmPm24, Some('k'), "clock-hour-of-day (1-24)", NumberOnly, max 2),
    spec!(HourOfDay23, Some('H'), "hour-of-day (0-23)", NumberOnly, max 2),
    spec!(MinuteOfHour, Some('m'), "minute-of-hour", NumberOnly, max 2),
    spec!(SecondOfMinute, Some('s'), "second-of-minute", NumberOnly, max 2),
    spec!(FractionOfSecond, Some('S'), "fraction-of-second", PlainWidth, max 9),
    spec!(MilliOfDay, Some('A'), "milli-of-day", PlainWidth),
    spec!(NanoOfSecond, Some('n'), "nano-of-second", PlainWidth),
    spec!(NanoOfDay, Some('N'), "nano-of-day", PlainWidth),
    spec!(TimeZoneId, Some('V'), "time-zone id", PlainWidth, max 5, only &[2]),
    spec!(TimeZoneName, Some('z'), "time-zone name", TextOnly, max 4),
    spec!(LocalizedZoneOffset, Some('O'), "localized zone-offset", TextOnly, max 5, only &[1, 4]),
    spec!(ZoneOffsetBigX, Some('X'), "zone-offset 'Z' for zero", PlainWidth, max 5),
    spec!(ZoneOffsetSmallX, Some('x'), "zone-offset", PlainWidth, max 5),
    spec!(ZoneOffsetZ, Some('Z'), "zone-offset (Z)", PlainWidth, max 5),
    spec!(Pad, Some('p'), "pad next", PlainWidth, max 5),
    spec!(Escape, Some('\''), "escape", EscapedLiteral),
    spec!(OptionalStart, Some('['), "optional section start", PlainWidth),
    spec!(OptionalEnd, Some(']'), "optional section end", PlainWidth),
    spec!(ReservedHash, Some('#'), "reserved '#'", PlainWidth),
    spec!(ReservedBraceOpen, Some('{'), "reserved '{'", PlainWidth),
    spec!(ReservedBraceClose, Some('}'), "reserved '}'", PlainWidth),
    spec!(Illegal, None, "illegal", Illegal),
    spec!(Literal, None, "literal", Literal),
];

/// Symbol character to kind. Characters missing here are [`ComponentKind::Literal`].
static SYMBOLS: Map<char, ComponentKind> = phf_map! {
    'G' => ComponentKind::Era,
    'u' => ComponentKind::Year,
    'y' => ComponentKind::YearOfEra,
    'D' => ComponentKind::DayOfYear,
    'M' => ComponentKind::MonthOfYear,
    'L' => ComponentKind::StandaloneMonthOfYear,
    'd' => ComponentKind::DayOfMonth,
    'Q' => ComponentKind::QuarterOfYear,
    'q' => ComponentKind::StandaloneQuarterOfYear,
    'Y' => ComponentKind::WeekBasedYear,
    'w' => ComponentKind::WeekOfWeekBasedYear,
    'W' => ComponentKind::WeekOfMonthW,
    'E' => ComponentKind::DayOfWeek,
    'e' => ComponentKind::LocalizedDayOfWeek,
    'c' => ComponentKind::StandaloneLocalizedDayOfWeek,
    'F' => ComponentKind::WeekOfMonthF,
    'a' => ComponentKind::AmPmOfDay,
    'h' => ComponentKind::ClockHourOfAmPm12,
    'K' => ComponentKind::HourOfAmPm11,
    'k' => ComponentKind::ClockHourOfAmPm24,
    'H' => ComponentKind::HourOfDay23,
    'm' => ComponentKind::MinuteOfHour,
    's' => ComponentKind::SecondOfMinute,
    'S' => ComponentKind::FractionOfSecond,
    'A' => ComponentKind::MilliOfDay,
    'n' => ComponentKind::NanoOfSecond,
    'N' => ComponentKind::NanoOfDay,
    'V' => ComponentKind::TimeZoneId,
    'z' => ComponentKind::TimeZoneName,
    'O' => ComponentKind::LocalizedZoneOffset,
    'X' => ComponentKind::ZoneOffsetBigX,
    'x' => ComponentKind::ZoneOffsetSmallX,
    'Z' => ComponentKind::ZoneOffsetZ,
    'p' => ComponentKind::Pad,
    '\'' => ComponentKind::Escape,
    '[' => ComponentKind::OptionalStart,
    ']' => ComponentKind::OptionalEnd,
    '#' => ComponentKind::ReservedHash,
    '{' => ComponentKind::ReservedBraceOpen,
    '}' => ComponentKind::ReservedBraceClose,
    // Reserved letters with no assigned meaning.
    'B' => ComponentKind::Illegal,
    'C' => ComponentKind::Illegal,
    'I' => ComponentKind::Illegal,
    'J' => ComponentKind::Illegal,
    'P' => ComponentKind::Illegal,
    'R' => ComponentKind::Illegal,
    'T' => ComponentKind::Illegal,
    'U' => ComponentKind::Illegal,
    'b' => ComponentKind::Illegal,
    'f' => ComponentKind::Illegal,
    'g' => ComponentKind::Illegal,
    'i' => ComponentKind::Illegal,
    'j' => ComponentKind::Illegal,
    'l' => ComponentKind::Illegal,
    'o' => ComponentKind::Illegal,
    'r' => ComponentKind::Illegal,
    't' => ComponentKind::Illegal,
    'v' => ComponentKind::Illegal,
};

/// Classify a single pattern character. Never fails.
pub fn classify(ch: char) -> ComponentKind {
    SYMBOLS.get(&ch).copied().unwrap_or(ComponentKind::Literal)
}

impl ComponentKind {
    pub const COUNT: usize = 42;

    /// Every kind, in declaration order.
    pub const ALL: [ComponentKind; Self::COUNT] = [
        ComponentKind::Era,
        ComponentKind::Year,
        ComponentKind::YearOfEra,
        ComponentKind::DayOfYear,
        ComponentKind::MonthOfYear,
        ComponentKind::StandaloneMonthOfYear,
        ComponentKind::DayOfMonth,
        ComponentKind::QuarterOfYear,
        ComponentKind::StandaloneQuarterOfYear,
        ComponentKind::WeekBasedYear,
        ComponentKind::WeekOfWeekBasedYear,
        ComponentKind::WeekOfMonthW,
        ComponentKind::DayOfWeek,
        ComponentKind::LocalizedDayOfWeek,
        ComponentKind::StandaloneLocalizedDayOfWeek,
        ComponentKind::WeekOfMonthF,
        ComponentKind::AmPmOfDay,
        ComponentKind::ClockHourOfAmPm12,
        ComponentKind::HourOfAmPm11,
        ComponentKind::ClockHourOfAmPm24,
        ComponentKind::HourOfDay23,
        ComponentKind::MinuteOfHour,
        ComponentKind::SecondOfMinute,
        ComponentKind::FractionOfSecond,
        ComponentKind::MilliOfDay,
        ComponentKind::NanoOfSecond,
        ComponentKind::NanoOfDay,
        ComponentKind::TimeZoneId,
        ComponentKind::TimeZoneName,
        ComponentKind::LocalizedZoneOffset,
        ComponentKind::ZoneOffsetBigX,
        ComponentKind::ZoneOffsetSmallX,
        ComponentKind::ZoneOffsetZ,
        ComponentKind::Pad,
        ComponentKind::Escape,
        ComponentKind::OptionalStart,
        ComponentKind::OptionalEnd,
        ComponentKind::ReservedHash,
        ComponentKind::ReservedBraceOpen,
        ComponentKind::ReservedBraceClose,
        ComponentKind::Illegal,
        ComponentKind::Literal,
    ];

    pub fn spec(self) -> &'static KindSpec {
        &KIND_SPECS[self as usize]
    }

    pub fn strategy(self) -> Strategy {
        self.spec().strategy
    }

    pub fn max_width(self) -> Option<usize> {
        self.spec().max_width
    }

    pub fn allowed_widths(self) -> Option<&'static [usize]> {
        self.spec().allowed_widths
    }

    /// The pattern character for this kind, if it has exactly one.
    pub fn symbol(self) -> Option<char> {
        self.spec().symbol
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }

    pub fn accepts_width(self, width: usize) -> bool {
        self.spec().accepts_width(width)
    }

    /// True for `#`, `{` and `}`, which are recognised but have no meaning yet.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            ComponentKind::ReservedHash
                | ComponentKind::ReservedBraceOpen
                | ComponentKind::ReservedBraceClose
        )
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DENYLIST: &str = "BCIJPRTUbfgijlortv";

    #[test]
    fn table_rows_follow_declaration_order() {
        for (index, kind) in ComponentKind::ALL.iter().enumerate() {
            assert_eq!(KIND_SPECS[index].kind, *kind, "row {index}");
            assert_eq!(*kind as usize, index);
        }
    }

    #[test]
    fn symbol_round_trips_through_classify() {
        for kind in ComponentKind::ALL {
            if let Some(symbol) = kind.symbol() {
                assert_eq!(classify(symbol), kind, "symbol {symbol:?}");
            }
        }
    }

    #[test]
    fn every_symbol_kind_has_a_map_entry() {
        let mapped = SYMBOLS
            .values()
            .filter(|k| **k != ComponentKind::Illegal)
            .count();
        let with_symbol = ComponentKind::ALL.iter().filter(|k| k.symbol().is_some()).count();
        assert_eq!(mapped, with_symbol);
    }

    #[test]
    fn denylist_is_illegal() {
        for ch in DENYLIST.chars() {
            assert_eq!(classify(ch), ComponentKind::Illegal, "{ch:?}");
        }
    }

    #[test]
    fn unmapped_characters_are_literal() {
        for ch in ['-', ':', ' ', '/', '.', ',', '0', '9', '\\', '"', 'é', '日'] {
            assert_eq!(classify(ch), ComponentKind::Literal, "{ch:?}");
        }
    }

    #[test]
    fn classification_is_total_over_ascii_letters() {
        for ch in ('a'..='z').chain('A'..='Z') {
            let kind = classify(ch);
            if DENYLIST.contains(ch) {
                assert_eq!(kind, ComponentKind::Illegal);
            } else {
                assert_ne!(kind, ComponentKind::Illegal, "{ch:?}");
            }
        }
        // Non-ASCII letters are literal.
        assert_eq!(classify('Ä'), ComponentKind::Literal);
    }

    #[test]
    fn max_widths() {
        assert_eq!(ComponentKind::DayOfYear.max_width(), Some(3));
        assert_eq!(ComponentKind::FractionOfSecond.max_width(), Some(9));
        assert_eq!(ComponentKind::TimeZoneName.max_width(), Some(4));
        assert_eq!(ComponentKind::WeekOfMonthW.max_width(), Some(1));
        assert_eq!(ComponentKind::AmPmOfDay.max_width(), Some(1));
        assert_eq!(ComponentKind::WeekOfWeekBasedYear.max_width(), Some(2));
        for kind in [
            ComponentKind::Year,
            ComponentKind::YearOfEra,
            ComponentKind::WeekBasedYear,
            ComponentKind::MilliOfDay,
            ComponentKind::NanoOfSecond,
            ComponentKind::NanoOfDay,
            ComponentKind::OptionalStart,
            ComponentKind::OptionalEnd,
        ] {
            assert_eq!(kind.max_width(), None, "{kind:?}");
        }
        for kind in [
            ComponentKind::DayOfMonth,
            ComponentKind::ClockHourOfAmPm12,
            ComponentKind::HourOfAmPm11,
            ComponentKind::ClockHourOfAmPm24,
            ComponentKind::HourOfDay23,
            ComponentKind::MinuteOfHour,
            ComponentKind::SecondOfMinute,
        ] {
            assert_eq!(kind.max_width(), Some(2), "{kind:?}");
        }
    }

    #[test]
    fn fixed_width_sets() {
        let c = ComponentKind::StandaloneLocalizedDayOfWeek;
        assert!(c.accepts_width(1));
        assert!(!c.accepts_width(2));
        assert!(c.accepts_width(3));
        assert!(c.accepts_width(5));
        assert!(!c.accepts_width(6));

        assert!(ComponentKind::TimeZoneId.accepts_width(2));
        assert!(!ComponentKind::TimeZoneId.accepts_width(1));
        assert!(!ComponentKind::TimeZoneId.accepts_width(3));

        assert!(ComponentKind::LocalizedZoneOffset.accepts_width(1));
        assert!(ComponentKind::LocalizedZoneOffset.accepts_width(4));
        assert!(!ComponentKind::LocalizedZoneOffset.accepts_width(2));

        assert!(ComponentKind::WeekOfMonthF.accepts_width(1));
        assert!(!ComponentKind::WeekOfMonthF.accepts_width(2));
    }

    #[test]
    fn symbol_kind_tables() {
        assert_eq!(SymbolKind::for_text(1), SymbolKind::ShortText);
        assert_eq!(SymbolKind::for_text(3), SymbolKind::ShortText);
        assert_eq!(SymbolKind::for_text(4), SymbolKind::LongText);
        assert_eq!(SymbolKind::for_text(5), SymbolKind::NarrowText);

        assert_eq!(SymbolKind::for_number_or_text(1), SymbolKind::Number);
        assert_eq!(SymbolKind::for_number_or_text(2), SymbolKind::Number);
        assert_eq!(SymbolKind::for_number_or_text(3), SymbolKind::ShortText);
        assert_eq!(SymbolKind::for_number_or_text(4), SymbolKind::LongText);
        assert_eq!(SymbolKind::for_number_or_text(5), SymbolKind::NarrowText);
        assert!(!SymbolKind::Number.is_text());
        assert!(SymbolKind::LongText.is_text());
    }

    #[test]
    fn describe_widths() {
        assert_eq!(ComponentKind::DayOfMonth.spec().describe_widths(), "1..=2");
        assert_eq!(ComponentKind::LocalizedZoneOffset.spec().describe_widths(), "{1, 4}");
        assert_eq!(ComponentKind::YearOfEra.spec().describe_widths(), "1..");
    }

    #[test]
    fn only_symbol_kinds_are_width_based() {
        assert!(!ComponentKind::Escape.strategy().is_width_based());
        assert!(!ComponentKind::Literal.strategy().is_width_based());
        assert!(!ComponentKind::Illegal.strategy().is_width_based());
        let width_based = ComponentKind::ALL
            .iter()
            .filter(|k| k.strategy().is_width_based())
            .count();
        assert_eq!(width_based, ComponentKind::COUNT - 3);
    }
}
