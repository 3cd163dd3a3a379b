pub(crate) mod wine_view;

pub(crate) use wine_view::{LoadPhase, SatMode, WineViewCache};

/// What a successful mutation does to the views that show the entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RefreshPolicy {
    /// Patch the in-memory view with the write result; nothing is
    /// re-fetched beyond what the mutation itself returns.
    MergeLocal,
    /// Re-fetch the sidebar collection (and the detail view where one is
    /// still open) from the backend.
    ReloadAll,
}

/// Mutation kinds against a wine and its child records.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum WineMutation {
    UploadWine,
    ReplaceWine,
    DeleteWine,
    CreateNote,
    UpdateNote,
    DeleteNote,
    SaveSatNote,
}

impl WineMutation {
    /// Note and SAT mutations touch only child records of one wine, so
    /// they merge locally. Wine-level mutations change what the sidebar
    /// shows and reload everything.
    pub fn refresh_policy(self) -> RefreshPolicy {
        match self {
            WineMutation::UploadWine | WineMutation::ReplaceWine | WineMutation::DeleteWine => {
                RefreshPolicy::ReloadAll
            }
            WineMutation::CreateNote
            | WineMutation::UpdateNote
            | WineMutation::DeleteNote
            | WineMutation::SaveSatNote => RefreshPolicy::MergeLocal,
        }
    }
}

/// Monotonic stamp for in-flight requests. Every dispatch takes a fresh
/// stamp via [`begin`](RequestSeq::begin); a response is applied only if
/// its stamp is still the newest one issued, so a slow response can never
/// overwrite the result of a request issued after it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct RequestSeq(u64);

impl RequestSeq {
    /// Starts a new request and returns its stamp.
    pub fn begin(&mut self) -> u64 {
        self.0 = self.0.saturating_add(1);
        self.0
    }

    /// True when `stamp` belongs to the most recent request.
    pub fn is_current(&self, stamp: u64) -> bool {
        self.0 == stamp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_seq_accepts_only_the_latest_stamp() {
        let mut seq = RequestSeq::default();
        let first = seq.begin();
        let second = seq.begin();

        assert!(!seq.is_current(first));
        assert!(seq.is_current(second));
    }

    #[test]
    fn test_request_seq_saturates_instead_of_wrapping() {
        let mut seq = RequestSeq(u64::MAX);
        let stamp = seq.begin();
        assert_eq!(stamp, u64::MAX);
        assert!(seq.is_current(stamp));
    }

    #[test]
    fn test_note_mutations_merge_and_wine_mutations_reload() {
        use RefreshPolicy::*;

        assert_eq!(WineMutation::CreateNote.refresh_policy(), MergeLocal);
        assert_eq!(WineMutation::UpdateNote.refresh_policy(), MergeLocal);
        assert_eq!(WineMutation::DeleteNote.refresh_policy(), MergeLocal);
        assert_eq!(WineMutation::SaveSatNote.refresh_policy(), MergeLocal);

        assert_eq!(WineMutation::UploadWine.refresh_policy(), ReloadAll);
        assert_eq!(WineMutation::ReplaceWine.refresh_policy(), ReloadAll);
        assert_eq!(WineMutation::DeleteWine.refresh_policy(), ReloadAll);
    }
}
