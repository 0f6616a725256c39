//! Section state machine shared by the education and experience scanners.
//!
//! A scanner walks preprocessed lines in order. `SectionState` decides, per
//! line, whether the line opens the section, closes it, or is section data;
//! `EntryBuilder` holds the single in-progress entity and moves it into the
//! result list when the next one starts.

use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SectionState {
    #[default]
    OutsideSection,
    InsideSection,
}

/// What a scanner should do with the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
    /// Section header. Consumed; never treated as data.
    Header,
    /// Inside the section; run the entity rules on it.
    Data,
    /// Outside the section (including the line that closed it).
    Skip,
}

/// Header and terminator patterns for one section kind.
pub struct SectionRules<'a> {
    pub header: &'a Regex,
    pub exit: &'a Regex,
}

impl SectionState {
    /// Applies the transition for `line` and reports how the line should be handled.
    /// Header lines are checked first in both states, so a repeated header is consumed too.
    pub fn advance(&mut self, line: &str, rules: &SectionRules<'_>) -> LineRole {
        if rules.header.is_match(line) {
            *self = SectionState::InsideSection;
            return LineRole::Header;
        }

        if *self == SectionState::InsideSection && rules.exit.is_match(line) {
            *self = SectionState::OutsideSection;
        }

        match self {
            SectionState::InsideSection => LineRole::Data,
            SectionState::OutsideSection => LineRole::Skip,
        }
    }
}

/// Accumulates entities one at a time. Starting a new entity flushes the
/// open one; a flushed entity is never touched again.
#[derive(Debug)]
pub struct EntryBuilder<T> {
    open: Option<T>,
    done: Vec<T>,
}

impl<T: Default> EntryBuilder<T> {
    pub fn new() -> Self {
        Self {
            open: None,
            done: Vec::new(),
        }
    }

    /// Flushes the open entity (if any) and opens `entry`.
    pub fn start(&mut self, entry: T) -> &mut T {
        self.flush();
        self.open.insert(entry)
    }

    pub fn open_mut(&mut self) -> Option<&mut T> {
        self.open.as_mut()
    }

    /// The open entity, opening an empty one if there is none.
    pub fn open_or_default(&mut self) -> &mut T {
        self.open.get_or_insert_with(T::default)
    }

    fn flush(&mut self) {
        if let Some(entry) = self.open.take() {
            self.done.push(entry);
        }
    }

    /// Flushes the open entity and returns everything accumulated, in order.
    pub fn finish(mut self) -> Vec<T> {
        self.flush();
        self.done
    }
}

impl<T: Default> Default for EntryBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sets `slot` only if it is still empty.
pub fn fill_if_unset(slot: &mut Option<String>, value: impl Into<String>) {
    if slot.is_none() {
        *slot = Some(value.into());
    }
}
