use rand::seq::SliceRandom;
use rand::Rng;
use crate::learning::status::LearningStatus;
use crate::words::model::Word;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FolderScope {
    #[default]
    Any,
    Unfiled,
    Folder(String),
}

impl FolderScope {
    fn matches(&self, word: &Word) -> bool {
        match self {
            FolderScope::Any => true,
            FolderScope::Unfiled => word.folder_id.is_none(),
            FolderScope::Folder(id) => word.folder_id.as_deref() == Some(id.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WordFilter {
    pub folder: FolderScope,
    /// Empty means every status.
    pub statuses: Vec<LearningStatus>,
}

impl WordFilter {
    pub fn matches(&self, word: &Word) -> bool {
        self.folder.matches(word)
            && (self.statuses.is_empty() || self.statuses.contains(&word.status()))
    }
}

/// Pick the words for a study session: filter, shuffle, then keep at most `limit` (0 = all).
pub fn select_session_words<R: Rng + ?Sized>(
    words: &[Word],
    filter: &WordFilter,
    limit: usize,
    rng: &mut R,
) -> Vec<Word> {
    let mut selected: Vec<Word> = words
        .iter()
        .filter(|w| filter.matches(w))
        .cloned()
        .collect();

    selected.shuffle(rng);
    if limit > 0 {
        selected.truncate(limit);
    }

    tracing::debug!(
        candidates = words.len(),
        selected = selected.len(),
        limit = limit,
        "Selected session words"
    );

    selected
}
