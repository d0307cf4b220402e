//! Study session state machine.
//!
//! A session owns a shuffled snapshot of the eligible cards and tracks the
//! cursor plus per-card reveal/hint state. The card type is generic: the
//! session never inspects its items, it only orders and addresses them.
//!
//! Lifecycle: the caller fetches the eligible card set (its `Loading`
//! phase), then [`StudySession::begin`] either enters the ready state or
//! reports why the set is empty. `next()` past the last card finishes the
//! session; a finished session is terminal.

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

/// Why a study session could not start.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StudyError {
    #[error("no flashcards available in this deck")]
    EmptyDeck,

    #[error("no flashcards found in the selected categories")]
    EmptySelection,
}

/// Outcome of advancing the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next card.
    Moved,
    /// The last card was passed; the session is complete.
    Finished { total: usize },
}

/// An in-progress traversal of a shuffled card set.
#[derive(Debug)]
pub struct StudySession<T> {
    cards: Vec<T>,
    index: usize,
    revealed: bool,
    hint_shown: bool,
    finished: bool,
}

impl<T> StudySession<T> {
    /// Start a session over the fetched card set.
    ///
    /// `filtered` records whether a category selection was applied to the
    /// fetch, so an empty result can be reported precisely. The set is
    /// shuffled uniformly; the cursor starts at the first card with nothing
    /// revealed.
    pub fn begin(
        mut cards: Vec<T>,
        filtered: bool,
        rng: &mut impl Rng,
    ) -> Result<Self, StudyError> {
        if cards.is_empty() {
            return Err(if filtered {
                StudyError::EmptySelection
            } else {
                StudyError::EmptyDeck
            });
        }

        cards.shuffle(rng);
        Ok(Self {
            cards,
            index: 0,
            revealed: false,
            hint_shown: false,
            finished: false,
        })
    }

    /// The card under the cursor, or `None` once the session is finished.
    pub fn current(&self) -> Option<&T> {
        if self.finished {
            None
        } else {
            self.cards.get(self.index)
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn revealed(&self) -> bool {
        self.revealed
    }

    pub fn hint_shown(&self) -> bool {
        self.hint_shown
    }

    /// Reveal the current card's answer. Idempotent.
    pub fn reveal(&mut self) {
        if !self.finished {
            self.revealed = true;
        }
    }

    /// Show the current card's hint. No-op once the answer is revealed.
    pub fn show_hint(&mut self) {
        if !self.finished && !self.revealed {
            self.hint_shown = true;
        }
    }

    /// Advance the cursor, resetting reveal/hint state.
    ///
    /// Advancing past the last card finishes the session and reports the
    /// total number of cards reviewed. Further calls keep reporting
    /// [`Advance::Finished`] without changing state.
    pub fn next(&mut self) -> Advance {
        if self.finished {
            return Advance::Finished {
                total: self.cards.len(),
            };
        }

        self.revealed = false;
        self.hint_shown = false;

        if self.index + 1 < self.cards.len() {
            self.index += 1;
            Advance::Moved
        } else {
            self.finished = true;
            Advance::Finished {
                total: self.cards.len(),
            }
        }
    }

    /// Step back one card, resetting reveal/hint state. No-op at the first
    /// card and after the session has finished.
    pub fn previous(&mut self) {
        if self.finished || self.index == 0 {
            return;
        }
        self.index -= 1;
        self.revealed = false;
        self.hint_shown = false;
    }
}
