use serde::{Deserialize, Serialize};

/// Per-playthrough status of one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoteStatus {
    Pending,
    Spawned,
    Hit,
    Missed,
}

impl NoteStatus {
    /// Still eligible for judgment.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Pending | Self::Spawned)
    }
}

/// Status side table, indexed like the track's note list.
#[derive(Debug, Clone)]
pub struct PlayState {
    statuses: Vec<NoteStatus>,
}

impl PlayState {
    pub fn new(note_count: usize) -> Self {
        Self {
            statuses: vec![NoteStatus::Pending; note_count],
        }
    }

    pub fn reset(&mut self) {
        self.statuses.fill(NoteStatus::Pending);
    }

    pub fn set_spawned(&mut self, index: usize) {
        if self.get(index) == Some(NoteStatus::Pending) {
            self.statuses[index] = NoteStatus::Spawned;
        }
    }

    pub fn set_hit(&mut self, index: usize) {
        if let Some(s) = self.statuses.get_mut(index) {
            *s = NoteStatus::Hit;
        }
    }

    pub fn set_missed(&mut self, index: usize) {
        if let Some(s) = self.statuses.get_mut(index) {
            *s = NoteStatus::Missed;
        }
    }

    pub fn get(&self, index: usize) -> Option<NoteStatus> {
        self.statuses.get(index).copied()
    }

    pub fn all_resolved(&self) -> bool {
        self.statuses.iter().all(|s| !s.is_open())
    }

    pub fn len(&self) -> usize {
        self.statuses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statuses.is_empty()
    }
}
