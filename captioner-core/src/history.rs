//! # History
//!
//! Linear undo/redo over whole-document snapshots. `past` is ordered oldest to newest and
//! `future` nearest to furthest, so undo pops the back of `past` and redo pops the front of
//! `future`. `present` is the last recorded state; between commits it lags behind the live
//! document only while a gesture is streaming transient updates.
//!
//! Snapshots are full [`Document`] clones. The background image is behind an `Arc` and so
//! is shared by every snapshot rather than copied.

use std::collections::VecDeque;

use crate::state::document::Document;

/// Default number of undo steps kept.
pub const DEFAULT_DEPTH: usize = 20;

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct HistoryEntry {
    pub snap: Document,
    /// Human-readable name of the change that moved *away* from this snapshot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Clone, PartialEq, Debug, serde::Serialize, serde::Deserialize)]
pub struct History {
    past: VecDeque<HistoryEntry>,
    present: Document,
    future: VecDeque<HistoryEntry>,
    #[serde(skip, default = "default_depth")]
    depth: usize,
}

fn default_depth() -> usize {
    DEFAULT_DEPTH
}

impl Default for History {
    fn default() -> Self {
        Self::new(Document::default(), DEFAULT_DEPTH)
    }
}

impl History {
    #[must_use]
    pub fn new(present: Document, depth: usize) -> Self {
        Self {
            past: VecDeque::with_capacity(depth.min(64)),
            present,
            future: VecDeque::new(),
            depth,
        }
    }
    /// Change the number of undo steps kept, evicting the oldest if over.
    pub fn set_depth(&mut self, depth: usize) {
        self.depth = depth;
        self.evict();
    }
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }
    #[must_use]
    pub fn present(&self) -> &Document {
        &self.present
    }
    pub fn past(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> + DoubleEndedIterator {
        self.past.iter()
    }
    pub fn future(&self) -> impl ExactSizeIterator<Item = &HistoryEntry> + DoubleEndedIterator {
        self.future.iter()
    }
    /// `(undo steps, redo steps)`
    #[must_use]
    pub fn counts(&self) -> (usize, usize) {
        (self.past.len(), self.future.len())
    }
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }
    #[must_use]
    pub fn undo_label(&self) -> Option<&str> {
        self.past.back().and_then(|entry| entry.label.as_deref())
    }
    #[must_use]
    pub fn redo_label(&self) -> Option<&str> {
        self.future.front().and_then(|entry| entry.label.as_deref())
    }
    /// Record a checkpoint. The current `present` moves into `past` under `label`, `live`
    /// becomes the new `present`, and any redo branch is discarded.
    ///
    /// Must be called *before* the mutation being recorded is applied to `live`.
    pub fn push(&mut self, live: &Document, label: Option<&str>) {
        let old = std::mem::replace(&mut self.present, live.clone());
        self.past.push_back(HistoryEntry {
            snap: old,
            label: label.map(ToOwned::to_owned),
        });
        self.evict();
        if !self.future.is_empty() {
            log::trace!("Discarding {} redo steps", self.future.len());
            self.future.clear();
        }
    }
    /// Bring `present` up to date with the live document without recording anything.
    pub fn sync(&mut self, live: &Document) {
        self.present.clone_from(live);
    }
    /// Like [`Self::sync`], but only for selection, fonts and locks. Used while the live
    /// document holds gesture changes that are not recorded yet.
    pub fn sync_untracked(&mut self, live: &Document) {
        self.present.carry_untracked_from(live);
    }
    /// Every stored snapshot, oldest first.
    pub fn documents_mut(&mut self) -> impl Iterator<Item = &mut Document> {
        self.past
            .iter_mut()
            .map(|entry| &mut entry.snap)
            .chain(std::iter::once(&mut self.present))
            .chain(self.future.iter_mut().map(|entry| &mut entry.snap))
    }
    /// Step back. Returns `false` if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(entry) = self.past.pop_back() else {
            return false;
        };
        let newer = std::mem::replace(&mut self.present, entry.snap);
        self.future.push_front(HistoryEntry {
            snap: newer,
            label: entry.label,
        });
        true
    }
    /// Step forward. Returns `false` if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(entry) = self.future.pop_front() else {
            return false;
        };
        let older = std::mem::replace(&mut self.present, entry.snap);
        self.past.push_back(HistoryEntry {
            snap: older,
            label: entry.label,
        });
        self.evict();
        true
    }
    /// Drop all history, keeping `present` only.
    pub fn clear(&mut self, present: Document) {
        self.past.clear();
        self.future.clear();
        self.present = present;
    }
    fn evict(&mut self) {
        while self.past.len() > self.depth {
            self.past.pop_front();
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{id::LayerID, state::layer::create_default_layer};

    /// A document distinguishable by its layer count.
    fn doc(layers: usize) -> Document {
        let mut doc = Document::default();
        for i in 0..layers {
            doc.layers
                .push(create_default_layer(LayerID::from_u128(i as u128 + 1), 0.0));
        }
        doc
    }

    #[test]
    fn depth_is_fifo() {
        let mut history = History::new(doc(0), 20);
        for n in 1..=25 {
            history.push(&doc(n - 1), Some("edit"));
        }
        assert_eq!(history.counts(), (20, 0));
        // The five oldest were evicted. The sixth push recorded the fifth live document.
        assert_eq!(history.past().next().map(|e| e.snap.layers.len()), Some(4));
    }
    #[test]
    fn undo_redo_round_trip() {
        let mut history = History::new(doc(0), DEFAULT_DEPTH);
        let mut live = doc(0);
        for n in 1..=5 {
            history.push(&live, Some("add"));
            live = doc(n);
            history.sync(&live);
        }
        let before = history.clone();
        for k in 1..=5 {
            for _ in 0..k {
                assert!(history.undo());
            }
            for _ in 0..k {
                assert!(history.redo());
            }
            assert_eq!(history.present(), before.present());
            assert_eq!(history.counts(), before.counts());
        }
    }
    #[test]
    fn push_clears_future() {
        let mut history = History::new(doc(0), DEFAULT_DEPTH);
        history.push(&doc(0), None);
        history.sync(&doc(1));
        history.push(&doc(1), None);
        history.sync(&doc(2));
        assert!(history.undo());
        assert!(history.can_redo());
        let present = history.present().clone();
        history.push(&present, Some("branch"));
        assert_eq!(history.counts(), (2, 0));
    }
    #[test]
    fn empty_stacks_are_noops() {
        let mut history = History::default();
        assert!(!history.undo());
        assert!(!history.redo());
        assert_eq!(history.present(), &Document::default());
    }
    #[test]
    fn labels_travel_with_entries() {
        let mut history = History::default();
        history.push(&doc(0), Some("add layer"));
        history.sync(&doc(1));
        assert_eq!(history.undo_label(), Some("add layer"));
        history.undo();
        assert_eq!(history.undo_label(), None);
        assert_eq!(history.redo_label(), Some("add layer"));
    }
    #[test]
    fn zero_depth_keeps_nothing() {
        let mut history = History::new(doc(0), 0);
        history.push(&doc(0), None);
        assert!(!history.can_undo());
    }
    #[test]
    fn shrinking_depth_evicts() {
        let mut history = History::default();
        for n in 0..10 {
            history.push(&doc(n), None);
        }
        history.set_depth(3);
        assert_eq!(history.counts(), (3, 0));
    }
    #[test]
    fn serde_shape() {
        let mut history = History::default();
        history.push(&doc(0), Some("add layer"));
        let json = serde_json::to_value(&history).unwrap();
        assert!(json["past"][0]["snap"]["layers"].is_array());
        assert_eq!(json["past"][0]["label"], "add layer");
        assert!(json["future"].as_array().is_some_and(Vec::is_empty));
        let back: History = serde_json::from_value(json).unwrap();
        assert_eq!(back, history);
    }
}
