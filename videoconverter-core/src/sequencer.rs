// ============================================================================
// videoconverter-core/src/sequencer.rs
// ============================================================================
//
// EPISODE SEQUENCER: Episode Numbering Across Runs
//
// TV mode names outputs `Title - sSSeEE.mkv`. A season usually spans several
// discs, each converted in its own run, so the sequencer keeps the show title,
// season and last used episode in a small state file between runs.
//
// KEY COMPONENTS:
// - SequencerState: Title, season and next episode number
// - EpisodeSequencer: Fresh/Continuing state machine owning the counter
// - read_state / load_previous: Strict parser and its recovering wrapper
//
// STATE FILE FORMAT:
// Three newline-separated fields: title, season, last used episode. Anything
// else is rejected as malformed, and the caller starts fresh rather than
// guessing at the numbering.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- External crate imports ----
use tempfile::NamedTempFile;

// ---- Standard library imports ----
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Title, season and the next episode number to hand out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequencerState {
    pub title: String,
    pub season: u32,
    pub next_episode: u32,
}

impl SequencerState {
    /// Episode number most recently handed out (0 before the first).
    #[must_use]
    pub fn last_episode(&self) -> u32 {
        self.next_episode.saturating_sub(1)
    }

    fn to_record(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.season, self.last_episode())
    }

    fn from_record(record: &str) -> CoreResult<Self> {
        let fields: Vec<&str> = record.trim_end_matches(['\n', '\r']).split('\n').collect();
        if fields.len() != 3 {
            return Err(CoreError::MalformedState(format!(
                "expected 3 fields, found {}",
                fields.len()
            )));
        }

        let title = fields[0].trim_end_matches('\r');
        if title.is_empty() {
            return Err(CoreError::MalformedState("empty title".to_string()));
        }
        let season = parse_number(fields[1], "season")?;
        let last_episode = parse_number(fields[2], "episode")?;

        Ok(Self {
            title: title.to_string(),
            season,
            next_episode: last_episode.saturating_add(1),
        })
    }
}

fn parse_number(field: &str, name: &str) -> CoreResult<u32> {
    let field = field.trim_end_matches('\r');
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoreError::MalformedState(format!(
            "{name} '{field}' is not a decimal number"
        )));
    }
    field
        .parse()
        .map_err(|_| CoreError::MalformedState(format!("{name} '{field}' is out of range")))
}

/// Reads the state file.
///
/// # Returns
///
/// * `Ok(None)` - If no state file exists
/// * `Ok(Some(state))` - The stored state, with the counter advanced past
///   the last used episode
///
/// # Errors
///
/// * `CoreError::MalformedState` - If the record is not exactly three valid fields
/// * `CoreError::Io` - If the file exists but cannot be read
pub fn read_state(path: &Path) -> CoreResult<Option<SequencerState>> {
    match fs::read_to_string(path) {
        Ok(record) => SequencerState::from_record(&record).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(CoreError::Io(e)),
    }
}

/// Reads the state file, treating any problem as "no previous state".
///
/// A malformed or unreadable record is logged and ignored so that the run
/// starts fresh instead of misnumbering episodes.
#[must_use]
pub fn load_previous(path: &Path) -> Option<SequencerState> {
    match read_state(path) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("Ignoring state file {}: {}", path.display(), e);
            None
        }
    }
}

/// How much of a previous run's state to reuse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Continuation {
    /// Same show and season, numbering continues.
    Everything,
    /// New title and/or season, numbering continues.
    EpisodeOnly { title: String, season: u32 },
}

/// Whether the sequencer started from scratch or from a previous run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerMode {
    Fresh,
    Continuing,
}

/// Hands out episode numbers and persists them for the next run.
#[derive(Debug, Clone)]
pub struct EpisodeSequencer {
    state: SequencerState,
    mode: SequencerMode,
    path: PathBuf,
}

impl EpisodeSequencer {
    /// Starts new numbering at `first_episode`.
    #[must_use]
    pub fn fresh(path: PathBuf, title: impl Into<String>, season: u32, first_episode: u32) -> Self {
        Self {
            state: SequencerState {
                title: title.into(),
                season,
                next_episode: first_episode,
            },
            mode: SequencerMode::Fresh,
            path,
        }
    }

    /// Continues from a previous run's state.
    #[must_use]
    pub fn resume(path: PathBuf, previous: SequencerState, continuation: Continuation) -> Self {
        let state = match continuation {
            Continuation::Everything => previous,
            Continuation::EpisodeOnly { title, season } => SequencerState {
                title,
                season,
                next_episode: previous.next_episode,
            },
        };
        Self {
            state,
            mode: SequencerMode::Continuing,
            path,
        }
    }

    /// Overrides the next episode number, e.g. when a disc starts mid-season.
    #[must_use]
    pub fn with_first_episode(mut self, episode: u32) -> Self {
        self.state.next_episode = episode;
        self
    }

    #[must_use]
    pub fn mode(&self) -> SequencerMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the next episode number and advances the counter.
    pub fn next_episode(&mut self) -> u32 {
        let episode = self.state.next_episode;
        self.state.next_episode = episode.saturating_add(1);
        episode
    }

    /// Output file name for `episode`: `Title - sSSeEE.mkv`.
    ///
    /// Path separators in the title become `-`, so the file always lands in
    /// the season directory.
    #[must_use]
    pub fn episode_file_name(&self, episode: u32) -> String {
        let title: String = self
            .state
            .title
            .chars()
            .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
            .collect();
        format!("{} - s{:02}e{:02}.mkv", title, self.state.season, episode)
    }

    /// Output directory name for this season: `Season SS`.
    #[must_use]
    pub fn season_dir_name(&self) -> String {
        format!("Season {:02}", self.state.season)
    }

    /// Writes the current state, replacing any previous record.
    ///
    /// The record is written to a temporary file next to the target and then
    /// renamed over it, so an interrupted write leaves the old record intact.
    ///
    /// # Errors
    ///
    /// * `CoreError::Io` - If the temporary file cannot be written or renamed
    pub fn persist(&self) -> CoreResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut temp = NamedTempFile::new_in(dir)?;
        temp.write_all(self.state.to_record().as_bytes())?;
        temp.flush()?;
        temp.persist(&self.path).map_err(|e| CoreError::Io(e.error))?;
        log::debug!(
            "Saved episode state to {}: {:?}",
            self.path.display(),
            self.state
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_record_round_trip_advances_counter() {
        let state = SequencerState::from_record("Show\n2\n7\n").unwrap();
        assert_eq!(state.title, "Show");
        assert_eq!(state.season, 2);
        assert_eq!(state.next_episode, 8);
        assert_eq!(state.to_record(), "Show\n2\n7");
    }

    #[test]
    fn test_malformed_records() {
        for record in ["Show\n2", "Show\n2\n3\n4", "\n2\n3", "Show\ntwo\n3", "Show\n2\n-1", ""] {
            assert!(
                matches!(
                    SequencerState::from_record(record),
                    Err(CoreError::MalformedState(_))
                ),
                "record {record:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_title_may_contain_spaces_and_dashes() {
        let state = SequencerState::from_record("Doctor Who - Classic\n18\n0").unwrap();
        assert_eq!(state.title, "Doctor Who - Classic");
        assert_eq!(state.next_episode, 1);
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = tempdir().unwrap();
        assert_eq!(read_state(&dir.path().join("absent.state")).unwrap(), None);
    }

    #[test]
    fn test_next_episode_and_names() {
        let dir = tempdir().unwrap();
        let mut sequencer = EpisodeSequencer::fresh(dir.path().join("s"), "Show", 1, 1);
        assert_eq!(sequencer.mode(), SequencerMode::Fresh);
        assert_eq!(sequencer.next_episode(), 1);
        assert_eq!(sequencer.next_episode(), 2);
        assert_eq!(sequencer.episode_file_name(2), "Show - s01e02.mkv");
        assert_eq!(sequencer.season_dir_name(), "Season 01");
        assert_eq!(sequencer.state().last_episode(), 2);
    }

    #[test]
    fn test_episode_file_name_replaces_path_separators() {
        let dir = tempdir().unwrap();
        let sequencer = EpisodeSequencer::fresh(dir.path().join("s"), "AC/DC Live", 1, 1);
        assert_eq!(sequencer.episode_file_name(2), "AC-DC Live - s01e02.mkv");

        let sequencer = EpisodeSequencer::fresh(dir.path().join("s"), r"Dr. Who\Torchwood", 3, 1);
        assert_eq!(sequencer.episode_file_name(11), "Dr. Who-Torchwood - s03e11.mkv");

        // The state keeps the title as typed
        assert_eq!(sequencer.state().title, r"Dr. Who\Torchwood");
    }

    #[test]
    fn test_resume_variants() {
        let previous = SequencerState {
            title: "Show".to_string(),
            season: 3,
            next_episode: 5,
        };
        let path = PathBuf::from("/nonexistent/state");

        let everything = EpisodeSequencer::resume(path.clone(), previous.clone(), Continuation::Everything);
        assert_eq!(everything.mode(), SequencerMode::Continuing);
        assert_eq!(everything.state(), &previous);

        let episode_only = EpisodeSequencer::resume(
            path,
            previous,
            Continuation::EpisodeOnly {
                title: "Other".to_string(),
                season: 1,
            },
        )
        .with_first_episode(9);
        assert_eq!(episode_only.state().title, "Other");
        assert_eq!(episode_only.state().season, 1);
        assert_eq!(episode_only.state().next_episode, 9);
    }

    #[test]
    fn test_persist_replaces_previous_record() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("videoconverter.state");
        fs::write(&path, "Old\n1\n1").unwrap();

        let mut sequencer = EpisodeSequencer::fresh(path.clone(), "New", 4, 10);
        sequencer.next_episode();
        sequencer.next_episode();
        sequencer.persist().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "New\n4\n11");
        let reloaded = read_state(&path).unwrap().unwrap();
        assert_eq!(reloaded.next_episode, 12);
    }
}
