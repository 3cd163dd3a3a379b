//! View cache for the wine currently open in the detail pane.
//!
//! The cache owns everything the detail view renders: the wine record,
//! its tasting notes in display order, the SAT assessment, and the edit
//! buffers for the three forms. It is a plain struct so every transition
//! can be exercised without a browser; the pages keep one instance in a
//! signal and drive it from async handlers.
//!
//! Two reconciliation styles are used deliberately. Loads and wine-field
//! saves replace the view wholesale from a fresh fetch, guarded by
//! request stamps so a stale response can never clobber a newer one.
//! Note mutations merge the server's acknowledgement into the cached
//! list in place, because the server returns exactly the stamps needed
//! and a full refetch would drop nothing but the user's scroll position.

use super::RequestSeq;
use crate::drafts::{SatDraft, WineDraft};
use crate::models::{SatNote, TastingNote, Wine};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) enum LoadPhase {
    #[default]
    Unloaded,
    Loading,
    Loaded,
}

/// Whether the SAT form would create a first assessment or replace the
/// existing one. Only meaningful once the SAT fetch has settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SatMode {
    Creating,
    Updating,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct WineViewCache {
    load_seq: RequestSeq,
    sat_seq: RequestSeq,

    /// Identity of the wine this view belongs to. Unstamped merges are
    /// checked against it so an acknowledgement that outlives a wine
    /// switch lands nowhere.
    pub wine_id: Option<String>,
    pub phase: LoadPhase,
    pub wine: Option<Wine>,
    /// Notes in display order; kept sorted at every mutation.
    pub notes: Vec<TastingNote>,
    /// Newest first by default.
    pub sort_ascending: bool,

    pub sat_phase: LoadPhase,
    pub sat: Option<SatNote>,

    pub wine_draft: Option<WineDraft>,
    pub sat_draft: Option<SatDraft>,
    /// At most one tasting note is editable at a time.
    pub editing_note_id: Option<String>,
}

impl WineViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts loading `wine_id` and returns the stamp the response must
    /// present. Switching to a different wine drops the previous view
    /// immediately; reloading the same wine keeps the current content on
    /// screen until the fresh copy lands.
    pub fn begin_load(&mut self, wine_id: &str) -> u64 {
        if self.wine_id.as_deref() != Some(wine_id) {
            // The stamp counters must survive the reset, otherwise a
            // response from the previous wine could match a fresh stamp.
            let load_seq = self.load_seq;
            let sat_seq = self.sat_seq;
            *self = Self::default();
            self.load_seq = load_seq;
            self.sat_seq = sat_seq;
            self.wine_id = Some(wine_id.to_string());
        }
        self.phase = LoadPhase::Loading;
        self.load_seq.begin()
    }

    /// Replaces the view with a freshly fetched wine. Returns false (and
    /// changes nothing) when a newer load has been started since `stamp`
    /// was issued.
    pub fn apply_loaded(&mut self, stamp: u64, wine: Wine) -> bool {
        if !self.load_seq.is_current(stamp) {
            return false;
        }

        let mut wine = wine;
        self.notes = std::mem::take(&mut wine.notes);
        self.wine = Some(wine);
        self.phase = LoadPhase::Loaded;

        // The records these buffers were seeded from just got replaced.
        self.wine_draft = None;
        self.sat_draft = None;
        self.editing_note_id = None;

        self.resort();
        true
    }

    pub fn apply_load_failed(&mut self, stamp: u64) -> bool {
        if !self.load_seq.is_current(stamp) {
            return false;
        }
        if self.phase == LoadPhase::Loading {
            self.phase = if self.wine.is_some() {
                LoadPhase::Loaded
            } else {
                LoadPhase::Unloaded
            };
        }
        true
    }

    /// Forgets the wine entirely, e.g. after deleting it. Both stamp
    /// counters are bumped so responses still in flight for the old view
    /// are rejected when they land.
    pub fn clear(&mut self) {
        let mut load_seq = self.load_seq;
        let mut sat_seq = self.sat_seq;
        load_seq.begin();
        sat_seq.begin();
        *self = Self::default();
        self.load_seq = load_seq;
        self.sat_seq = sat_seq;
    }

    // ---- SAT assessment -----------------------------------------------

    pub fn begin_sat_load(&mut self) -> u64 {
        self.sat_phase = LoadPhase::Loading;
        self.sat_seq.begin()
    }

    /// `None` means the server has no assessment for this wine, which is
    /// a loaded state of its own (the form opens in create mode).
    pub fn apply_sat_loaded(&mut self, stamp: u64, sat: Option<SatNote>) -> bool {
        if !self.sat_seq.is_current(stamp) {
            return false;
        }
        self.sat = sat;
        self.sat_phase = LoadPhase::Loaded;
        true
    }

    pub fn apply_sat_load_failed(&mut self, stamp: u64) -> bool {
        if !self.sat_seq.is_current(stamp) {
            return false;
        }
        if self.sat_phase == LoadPhase::Loading {
            self.sat_phase = if self.sat.is_some() {
                LoadPhase::Loaded
            } else {
                LoadPhase::Unloaded
            };
        }
        true
    }

    pub fn sat_mode(&self) -> Option<SatMode> {
        match self.sat_phase {
            LoadPhase::Loaded => Some(if self.sat.is_some() {
                SatMode::Updating
            } else {
                SatMode::Creating
            }),
            _ => None,
        }
    }

    /// Records a successful save. After the first save the mode flips
    /// from create to update without another fetch.
    pub fn mark_sat_saved(&mut self, wine_id: &str, sat: SatNote) -> bool {
        if self.wine_id.as_deref() != Some(wine_id) {
            return false;
        }
        self.sat = Some(sat);
        self.sat_phase = LoadPhase::Loaded;
        self.sat_draft = None;
        true
    }

    // ---- Edit buffers ---------------------------------------------------

    pub fn begin_wine_edit(&mut self) -> bool {
        match &self.wine {
            Some(wine) => {
                self.wine_draft = Some(WineDraft::from_wine(wine));
                true
            }
            None => false,
        }
    }

    pub fn cancel_wine_edit(&mut self) {
        self.wine_draft = None;
    }

    /// Opens the SAT form, seeded from the stored assessment when one
    /// exists and blank otherwise.
    pub fn begin_sat_edit(&mut self) {
        self.sat_draft = Some(match &self.sat {
            Some(sat) => SatDraft::from_sat(sat),
            None => SatDraft::default(),
        });
    }

    pub fn cancel_sat_edit(&mut self) {
        self.sat_draft = None;
    }

    /// Puts one note into edit mode; any other note's edit mode ends.
    /// Returns false when the note is not in the cache.
    pub fn begin_note_edit(&mut self, note_id: &str) -> bool {
        if self.notes.iter().any(|n| n.note_id == note_id) {
            self.editing_note_id = Some(note_id.to_string());
            true
        } else {
            false
        }
    }

    pub fn cancel_note_edit(&mut self) {
        self.editing_note_id = None;
    }

    // ---- Note merges ------------------------------------------------------

    /// Inserts a note the server just created, keeping display order.
    pub fn apply_note_created(&mut self, wine_id: &str, note: TastingNote) -> bool {
        if self.wine_id.as_deref() != Some(wine_id) {
            return false;
        }
        self.notes.push(note);
        self.resort();
        true
    }

    /// Merges an edit acknowledgement into the cached note. Returns false
    /// when the note is gone from the cache (the caller should fall back
    /// to a full reload).
    pub fn apply_note_updated(
        &mut self,
        wine_id: &str,
        note_id: &str,
        content: String,
        updated_at: String,
    ) -> bool {
        if self.wine_id.as_deref() != Some(wine_id) {
            return false;
        }
        let Some(note) = self.notes.iter_mut().find(|n| n.note_id == note_id) else {
            return false;
        };
        note.content = content;
        note.updated_at = updated_at;

        if self.editing_note_id.as_deref() == Some(note_id) {
            self.editing_note_id = None;
        }
        self.resort();
        true
    }

    pub fn apply_note_deleted(&mut self, wine_id: &str, note_id: &str) -> bool {
        if self.wine_id.as_deref() != Some(wine_id) {
            return false;
        }
        let before = self.notes.len();
        self.notes.retain(|n| n.note_id != note_id);

        if self.editing_note_id.as_deref() == Some(note_id) {
            self.editing_note_id = None;
        }
        self.notes.len() != before
    }

    // ---- Display order ------------------------------------------------

    /// Flips between newest-first and oldest-first. The comparison is a
    /// total order (ties broken by note id), so toggling twice restores
    /// the exact original arrangement.
    pub fn toggle_sort_order(&mut self) {
        self.sort_ascending = !self.sort_ascending;
        self.resort();
    }

    fn resort(&mut self) {
        let ascending = self.sort_ascending;
        // ISO-8601 timestamps compare correctly as strings.
        self.notes.sort_by(|a, b| {
            let ord = a
                .updated_at
                .cmp(&b.updated_at)
                .then_with(|| a.note_id.cmp(&b.note_id));
            if ascending {
                ord
            } else {
                ord.reverse()
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Acidity, Alcohol, Body, Finish, FlavourIntensity, Quality, Readiness, Sweetness, Tannin,
    };

    fn note(id: &str, updated_at: &str) -> TastingNote {
        TastingNote {
            note_id: id.to_string(),
            content: format!("note {id}"),
            created_at: updated_at.to_string(),
            updated_at: updated_at.to_string(),
        }
    }

    fn wine(id: &str, name: &str, notes: Vec<TastingNote>) -> Wine {
        Wine {
            wine_id: id.to_string(),
            name: name.to_string(),
            region: "Burgundy".to_string(),
            category: "red".to_string(),
            vintage: 2018,
            image_url: None,
            created_at: "2024-01-01T00:00:00.000Z".to_string(),
            notes,
        }
    }

    fn sat() -> SatNote {
        SatNote {
            sweetness: Sweetness::Dry,
            acidity: Acidity::MediumPlus,
            tannin: Tannin::Medium,
            alcohol: Alcohol::Medium,
            body: Body::MediumPlus,
            flavour_intensity: FlavourIntensity::Pronounced,
            finish: Finish::Long,
            quality: Quality::VeryGood,
            readiness: Readiness::DrinkNowWithPotential,
        }
    }

    fn note_ids(cache: &WineViewCache) -> Vec<&str> {
        cache.notes.iter().map(|n| n.note_id.as_str()).collect()
    }

    #[test]
    fn test_load_populates_view_and_sorts_newest_first() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-1");
        assert_eq!(cache.phase, LoadPhase::Loading);

        let applied = cache.apply_loaded(
            stamp,
            wine(
                "w-1",
                "Chablis",
                vec![
                    note("n-1", "2024-05-01T08:00:00.000Z"),
                    note("n-2", "2024-05-03T08:00:00.000Z"),
                    note("n-3", "2024-05-02T08:00:00.000Z"),
                ],
            ),
        );

        assert!(applied);
        assert_eq!(cache.phase, LoadPhase::Loaded);
        assert_eq!(note_ids(&cache), vec!["n-2", "n-3", "n-1"]);
    }

    #[test]
    fn test_stale_load_response_is_discarded() {
        // Click wine A, then wine B before A's response arrives. A's
        // response lands last and must lose.
        let mut cache = WineViewCache::new();
        let stamp_a = cache.begin_load("w-a");
        let stamp_b = cache.begin_load("w-b");

        assert!(cache.apply_loaded(stamp_b, wine("w-b", "Barolo", vec![])));
        assert!(!cache.apply_loaded(stamp_a, wine("w-a", "Chablis", vec![])));

        let loaded = cache.wine.as_ref().map(|w| w.name.as_str());
        assert_eq!(loaded, Some("Barolo"));
        assert_eq!(cache.phase, LoadPhase::Loaded);
    }

    #[test]
    fn test_switching_wines_drops_the_previous_view_immediately() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(
            stamp,
            wine("w-a", "Chablis", vec![note("n-1", "2024-05-01T08:00:00.000Z")]),
        );
        cache.begin_load("w-b");

        assert!(cache.wine.is_none());
        assert!(cache.notes.is_empty());
        assert_eq!(cache.phase, LoadPhase::Loading);
    }

    #[test]
    fn test_reloading_the_same_wine_keeps_content_while_loading() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![]));

        cache.begin_load("w-a");
        assert_eq!(cache.phase, LoadPhase::Loading);
        assert!(cache.wine.is_some());
    }

    #[test]
    fn test_reload_replaces_notes_wholesale() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(
            stamp,
            wine("w-a", "Chablis", vec![note("n-old", "2024-05-01T08:00:00.000Z")]),
        );

        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(
            stamp,
            wine("w-a", "Chablis", vec![note("n-new", "2024-05-02T08:00:00.000Z")]),
        );

        assert_eq!(note_ids(&cache), vec!["n-new"]);
    }

    #[test]
    fn test_load_failure_reverts_phase_but_keeps_previous_content() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![]));

        let stamp = cache.begin_load("w-a");
        assert!(cache.apply_load_failed(stamp));
        assert_eq!(cache.phase, LoadPhase::Loaded);

        let mut fresh = WineViewCache::new();
        let stamp = fresh.begin_load("w-a");
        assert!(fresh.apply_load_failed(stamp));
        assert_eq!(fresh.phase, LoadPhase::Unloaded);
    }

    #[test]
    fn test_clear_rejects_responses_still_in_flight() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.clear();

        assert!(!cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![])));
        assert_eq!(cache.phase, LoadPhase::Unloaded);
        assert!(cache.wine.is_none());
    }

    #[test]
    fn test_default_order_is_newest_first_and_toggle_is_an_involution() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(
            stamp,
            wine(
                "w-a",
                "Chablis",
                vec![
                    note("n-1", "2024-05-01T08:00:00.000Z"),
                    note("n-2", "2024-05-02T08:00:00.000Z"),
                    // Same stamp as n-2; the id breaks the tie.
                    note("n-4", "2024-05-02T08:00:00.000Z"),
                    note("n-3", "2024-05-03T08:00:00.000Z"),
                ],
            ),
        );

        assert!(!cache.sort_ascending);
        let descending = note_ids(&cache)
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();
        assert_eq!(descending, vec!["n-3", "n-4", "n-2", "n-1"]);

        cache.toggle_sort_order();
        assert_eq!(note_ids(&cache), vec!["n-1", "n-2", "n-4", "n-3"]);

        cache.toggle_sort_order();
        assert_eq!(note_ids(&cache), descending);
    }

    #[test]
    fn test_created_note_is_merged_into_position_without_a_reload() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(
            stamp,
            wine(
                "w-a",
                "Chablis",
                vec![
                    note("n-1", "2024-05-01T08:00:00.000Z"),
                    note("n-2", "2024-05-03T08:00:00.000Z"),
                ],
            ),
        );

        assert!(cache.apply_note_created(
            "w-a",
            note("n-3", "2024-05-02T08:00:00.000Z")
        ));
        assert_eq!(note_ids(&cache), vec!["n-2", "n-3", "n-1"]);
    }

    #[test]
    fn test_note_merge_for_a_different_wine_is_dropped() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![]));
        cache.begin_load("w-b");

        assert!(!cache.apply_note_created(
            "w-a",
            note("n-1", "2024-05-01T08:00:00.000Z")
        ));
        assert!(cache.notes.is_empty());
    }

    #[test]
    fn test_updated_note_takes_server_stamp_and_resorts() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(
            stamp,
            wine(
                "w-a",
                "Chablis",
                vec![
                    note("n-1", "2024-05-01T08:00:00.000Z"),
                    note("n-2", "2024-05-02T08:00:00.000Z"),
                ],
            ),
        );
        cache.begin_note_edit("n-1");

        let applied = cache.apply_note_updated(
            "w-a",
            "n-1",
            "revised".to_string(),
            "2024-05-04T08:00:00.000Z".to_string(),
        );

        assert!(applied);
        assert_eq!(note_ids(&cache), vec!["n-1", "n-2"]);
        assert_eq!(cache.notes[0].content, "revised");
        assert_eq!(cache.editing_note_id, None);
    }

    #[test]
    fn test_updating_a_missing_note_reports_a_miss() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![]));

        assert!(!cache.apply_note_updated(
            "w-a",
            "n-gone",
            "revised".to_string(),
            "2024-05-04T08:00:00.000Z".to_string(),
        ));
    }

    #[test]
    fn test_deleted_note_is_removed_locally() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(
            stamp,
            wine(
                "w-a",
                "Chablis",
                vec![
                    note("n-1", "2024-05-01T08:00:00.000Z"),
                    note("n-2", "2024-05-02T08:00:00.000Z"),
                ],
            ),
        );
        cache.begin_note_edit("n-2");

        assert!(cache.apply_note_deleted("w-a", "n-2"));
        assert_eq!(note_ids(&cache), vec!["n-1"]);
        assert_eq!(cache.editing_note_id, None);
        assert!(!cache.apply_note_deleted("w-a", "n-2"));
    }

    #[test]
    fn test_one_note_editable_at_a_time() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(
            stamp,
            wine(
                "w-a",
                "Chablis",
                vec![
                    note("n-1", "2024-05-01T08:00:00.000Z"),
                    note("n-2", "2024-05-02T08:00:00.000Z"),
                ],
            ),
        );

        assert!(cache.begin_note_edit("n-1"));
        assert!(cache.begin_note_edit("n-2"));
        assert_eq!(cache.editing_note_id.as_deref(), Some("n-2"));

        assert!(!cache.begin_note_edit("n-missing"));
        assert_eq!(cache.editing_note_id.as_deref(), Some("n-2"));
    }

    #[test]
    fn test_sat_absent_enters_create_mode_and_first_save_flips_to_update() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![]));

        assert_eq!(cache.sat_mode(), None);
        let sat_stamp = cache.begin_sat_load();
        assert!(cache.apply_sat_loaded(sat_stamp, None));
        assert_eq!(cache.sat_mode(), Some(SatMode::Creating));

        cache.begin_sat_edit();
        assert_eq!(cache.sat_draft, Some(SatDraft::default()));

        assert!(cache.mark_sat_saved("w-a", sat()));
        assert_eq!(cache.sat_mode(), Some(SatMode::Updating));
        assert_eq!(cache.sat, Some(sat()));
        assert_eq!(cache.sat_draft, None);
    }

    #[test]
    fn test_stale_sat_response_is_discarded() {
        let mut cache = WineViewCache::new();
        let load_stamp = cache.begin_load("w-a");
        cache.apply_loaded(load_stamp, wine("w-a", "Chablis", vec![]));

        let first = cache.begin_sat_load();
        let second = cache.begin_sat_load();

        assert!(cache.apply_sat_loaded(second, Some(sat())));
        assert!(!cache.apply_sat_loaded(first, None));
        assert_eq!(cache.sat_mode(), Some(SatMode::Updating));
    }

    #[test]
    fn test_sat_save_after_wine_switch_is_dropped() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![]));
        cache.begin_load("w-b");

        assert!(!cache.mark_sat_saved("w-a", sat()));
        assert_eq!(cache.sat, None);
    }

    #[test]
    fn test_begin_wine_edit_seeds_the_draft_from_the_record() {
        let mut cache = WineViewCache::new();
        assert!(!cache.begin_wine_edit());

        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![]));
        assert!(cache.begin_wine_edit());

        let draft = cache.wine_draft.clone().expect("draft should be open");
        assert_eq!(draft.name, "Chablis");
        assert_eq!(draft.vintage, "2018");

        cache.cancel_wine_edit();
        assert_eq!(cache.wine_draft, None);
    }

    #[test]
    fn test_full_reload_closes_every_open_edit_buffer() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(
            stamp,
            wine("w-a", "Chablis", vec![note("n-1", "2024-05-01T08:00:00.000Z")]),
        );

        cache.begin_wine_edit();
        cache.begin_note_edit("n-1");
        cache.begin_sat_edit();

        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![]));

        assert_eq!(cache.wine_draft, None);
        assert_eq!(cache.editing_note_id, None);
        assert_eq!(cache.sat_draft, None);
    }

    #[test]
    fn test_sat_edit_seeds_from_stored_assessment_when_present() {
        let mut cache = WineViewCache::new();
        let stamp = cache.begin_load("w-a");
        cache.apply_loaded(stamp, wine("w-a", "Chablis", vec![]));
        let sat_stamp = cache.begin_sat_load();
        cache.apply_sat_loaded(sat_stamp, Some(sat()));

        cache.begin_sat_edit();
        assert_eq!(cache.sat_draft, Some(SatDraft::from_sat(&sat())));
    }
}
