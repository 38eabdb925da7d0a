// ============================================================================
// videoconverter-cli/src/prompts.rs
// ============================================================================
//
// TV MODE PROMPTS: Interactive setup of the episode sequencer
//
// Asks whether the batch is a TV show and, if so, for its title, season and
// first episode. A previously saved state supplies the defaults: leaving the
// title blank continues that show's numbering.
//
// The prompter works on any BufRead/Write pair so it can be driven from
// tests as well as from the terminal.

// ---- External crate imports ----
use console::style;

// ---- Internal crate imports ----
use videoconverter_core::sequencer::load_previous;
use videoconverter_core::{Continuation, CoreError, CoreResult, EpisodeSequencer, SequencerState};

// ---- Standard library imports ----
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Reads answers from `input` and writes questions to `output`.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `question` and returns the trimmed answer.
    fn ask(&mut self, question: &str) -> CoreResult<String> {
        write!(self.output, "{} ", style(question).bold())?;
        self.output.flush()?;

        let mut answer = String::new();
        if self.input.read_line(&mut answer)? == 0 {
            return Err(CoreError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("no answer to '{question}'"),
            )));
        }
        Ok(answer.trim().to_string())
    }

    /// Asks until the answer is blank (`None`) or a number.
    fn ask_number(&mut self, question: &str) -> CoreResult<Option<u32>> {
        loop {
            let answer = self.ask(question)?;
            if answer.is_empty() {
                return Ok(None);
            }
            match answer.parse::<u32>() {
                Ok(number) => return Ok(Some(number)),
                Err(_) => writeln!(self.output, "{}", style("Please enter a number.").yellow())?,
            }
        }
    }

    /// "TV show mode? (Y/n)": anything without an `n` means yes.
    pub fn confirm_tv_mode(&mut self) -> CoreResult<bool> {
        let answer = self.ask("TV show mode? (Y/n)")?;
        Ok(!answer.to_lowercase().contains('n'))
    }

    /// Builds the sequencer for this batch.
    ///
    /// With a previous state, a blank title continues its numbering; a new
    /// title starts over at episode 1.
    pub fn episode_sequencer(
        &mut self,
        state_path: PathBuf,
        previous: Option<SequencerState>,
    ) -> CoreResult<EpisodeSequencer> {
        let sequencer = match previous {
            Some(previous) => {
                let title = self.ask(&format!(
                    "Title of the TV show (blank to use previous: {}):",
                    previous.title
                ))?;
                if title.is_empty() {
                    self.continue_previous(state_path, previous)?
                } else {
                    self.start_fresh(state_path, title)?
                }
            }
            None => {
                let title = loop {
                    let title = self.ask("Title of the TV show:")?;
                    if !title.is_empty() {
                        break title;
                    }
                };
                self.start_fresh(state_path, title)?
            }
        };

        let state = sequencer.state();
        log::info!(
            "TV mode: {} season {}, starting at episode {}",
            state.title,
            state.season,
            state.next_episode
        );
        Ok(sequencer)
    }

    fn continue_previous(
        &mut self,
        state_path: PathBuf,
        previous: SequencerState,
    ) -> CoreResult<EpisodeSequencer> {
        let season = self
            .ask_number(&format!(
                "Season number (blank to use previous: {}):",
                previous.season
            ))?
            .unwrap_or(previous.season);
        let first = self.ask_number(&format!(
            "First episode on this disc (default {}):",
            previous.next_episode
        ))?;

        let continuation = if season == previous.season {
            Continuation::Everything
        } else {
            Continuation::EpisodeOnly {
                title: previous.title.clone(),
                season,
            }
        };
        let sequencer = EpisodeSequencer::resume(state_path, previous, continuation);
        Ok(match first {
            Some(episode) => sequencer.with_first_episode(episode),
            None => sequencer,
        })
    }

    fn start_fresh(&mut self, state_path: PathBuf, title: String) -> CoreResult<EpisodeSequencer> {
        let season = loop {
            if let Some(season) = self.ask_number("Season number:")? {
                break season;
            }
        };
        let first = self
            .ask_number("First episode on this disc (default 1):")?
            .unwrap_or(1);
        Ok(EpisodeSequencer::fresh(state_path, title, season, first))
    }
}

/// Runs the TV-mode dialogue on the terminal.
///
/// Returns `None` when the batch is not a TV show.
pub fn prompt_tv_mode(skip_question: bool, state_path: PathBuf) -> CoreResult<Option<EpisodeSequencer>> {
    let stdin = io::stdin();
    let mut prompter = Prompter::new(stdin.lock(), io::stdout());

    if !skip_question && !prompter.confirm_tv_mode()? {
        return Ok(None);
    }
    let previous = load_previous(&state_path);
    prompter.episode_sequencer(state_path, previous).map(Some)
}
