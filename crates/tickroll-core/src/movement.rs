//! Moving, transposing and pasting selected note events

use crate::error::{EngineError, Result};
use crate::pitch::{Pitch, Row, STAFF_ROWS, row_to_note, staff_position};
use crate::selection::{
    TickRange, find_selected_range, select_note_events_in_range, unselect_all_notes,
};
use crate::song::{NoteEvent, Song, Tick, Track};
use crate::transform::map_tracks;

/// Longest chain of paste-of-paste that `apply_selection` will resolve
pub const MAX_PASTE_DEPTH: usize = 64;

/// An in-progress drag or paste in the editor.
///
/// Without `pasted_content`, the events in `[start_tick, end_tick)` of
/// `original_song` are moved by `delta_tick` ticks and `transpose` rows. With
/// it, the nested selection is resolved first and its selected events are
/// pasted at `start_tick + delta_tick`.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceSelection {
    pub original_song: Song,
    pub start_tick: Tick,
    pub end_tick: Tick,
    pub delta_tick: Tick,
    pub transpose: Row,
    pub pasted_content: Option<Box<WorkspaceSelection>>,
}

impl WorkspaceSelection {
    pub fn new(original_song: Song, start_tick: Tick, end_tick: Tick) -> Self {
        Self {
            original_song,
            start_tick,
            end_tick,
            delta_tick: 0,
            transpose: 0,
            pasted_content: None,
        }
    }

    pub fn with_delta(self, delta_tick: Tick, transpose: Row) -> Self {
        Self {
            delta_tick,
            transpose,
            ..self
        }
    }

    pub fn with_pasted_content(self, content: WorkspaceSelection) -> Self {
        Self {
            pasted_content: Some(Box::new(content)),
            ..self
        }
    }

    /// Number of nested pastes below this selection
    pub fn paste_depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.pasted_content.as_deref();
        while let Some(inner) = current {
            depth += 1;
            current = inner.pasted_content.as_deref();
        }
        depth
    }
}

/// Move a pitch by `delta_rows` staff rows, keeping its accidental. A pitch
/// pushed off its clef hops to the other clef; one that is still off the
/// staff afterwards is dropped.
pub fn transpose_pitch(octave: i32, pitch: Pitch, delta_rows: Row) -> Option<Pitch> {
    if delta_rows == 0 {
        return Some(pitch);
    }

    let position = staff_position(octave, pitch)?;
    let mut row = position.row;
    let mut is_bass_clef = position.is_bass_clef;

    if row.saturating_add(delta_rows) >= STAFF_ROWS {
        if is_bass_clef {
            row -= STAFF_ROWS;
            is_bass_clef = false;
        }
    } else if row.saturating_add(delta_rows) < 0 && !is_bass_clef {
        row += STAFF_ROWS;
        is_bass_clef = true;
    }

    row_to_note(octave, row.saturating_add(delta_rows), is_bass_clef, position.is_sharp)
}

/// Shift an event in time and transpose its chord. Drum pitches name drum
/// sounds, so drum events only move in time.
pub fn move_note_event(
    event: &NoteEvent,
    octave: i32,
    delta_ticks: Tick,
    delta_rows: Row,
    is_drum_track: bool,
) -> NoteEvent {
    let notes = if is_drum_track {
        event.notes.clone()
    } else {
        let mut notes: Vec<Pitch> = event
            .notes
            .iter()
            .filter_map(|&n| transpose_pitch(octave, n, delta_rows))
            .collect();
        notes.sort_unstable();
        notes.dedup();
        notes
    };

    NoteEvent {
        notes,
        start_tick: event.start_tick.saturating_add(delta_ticks),
        end_tick: event.end_tick.saturating_add(delta_ticks),
        selected: event.selected,
    }
}

/// Move every selected event, or only those on `track_index`. Events in the
/// destination window are overwritten; anything pushed past either end of
/// the song is clipped or dropped.
pub fn move_selected_notes(
    song: &Song,
    delta_ticks: Tick,
    delta_rows: Row,
    track_index: Option<usize>,
) -> Result<Song> {
    let Some(range) = find_selected_range(song, None) else {
        if let Some(index) = track_index {
            song.track(index)?;
        }
        return Ok(song.clone());
    };

    let target = range.offset(delta_ticks);
    let max_tick = song.max_tick();
    tracing::debug!(?range, delta_ticks, delta_rows, ?track_index, "moving selection");

    map_tracks(song, track_index, |_, t| {
        let events = t
            .notes
            .iter()
            .filter(|e| e.selected || !e.overlaps(target.start, target.end))
            .map(|e| {
                if e.selected {
                    move_note_event(e, t.octave(), delta_ticks, delta_rows, t.drums)
                } else {
                    e.clone()
                }
            });
        Track {
            notes: settle_events(events, max_tick),
            ..t.clone()
        }
    })
}

/// Clip to the song end, drop what fell off, restore tick order
fn settle_events(events: impl Iterator<Item = NoteEvent>, max_tick: Tick) -> Vec<NoteEvent> {
    let mut res: Vec<NoteEvent> = events
        .map(|mut e| {
            e.end_tick = e.end_tick.min(max_tick);
            e
        })
        .filter(|e| {
            let keep = !e.notes.is_empty() && e.start_tick >= 0 && e.start_tick < max_tick;
            if !keep {
                tracing::trace!(tick = e.start_tick, "dropping event outside song");
            }
            keep
        })
        .collect();
    res.sort_by_key(|e| e.start_tick);
    res
}

/// Resolve a drag or paste into the song it produces
pub fn apply_selection(selection: &WorkspaceSelection, track_index: Option<usize>) -> Result<Song> {
    let depth = selection.paste_depth();
    if depth > MAX_PASTE_DEPTH {
        return Err(EngineError::PasteTooDeep(MAX_PASTE_DEPTH));
    }
    resolve(selection, track_index)
}

fn resolve(selection: &WorkspaceSelection, track_index: Option<usize>) -> Result<Song> {
    if let Some(content) = &selection.pasted_content {
        return paste_notes(selection, content, track_index);
    }

    let selected = select_note_events_in_range(
        &selection.original_song,
        selection.start_tick,
        selection.end_tick,
        track_index,
    )?;
    move_selected_notes(&selected, selection.delta_tick, selection.transpose, track_index)
}

fn paste_notes(
    selection: &WorkspaceSelection,
    content: &WorkspaceSelection,
    track_index: Option<usize>,
) -> Result<Song> {
    let to_paste = resolve(content, track_index)?;
    let song = unselect_all_notes(&selection.original_song);

    let Some(source) = find_selected_range(&to_paste, None) else {
        tracing::debug!("nothing selected to paste");
        if let Some(index) = track_index {
            song.track(index)?;
        }
        return Ok(song);
    };

    let paste_start = selection.start_tick.saturating_add(selection.delta_tick);
    let window = TickRange::new(paste_start, paste_start.saturating_add(source.len()));
    let anchor = selection.start_tick.saturating_sub(source.start);
    let max_tick = song.max_tick();
    tracing::debug!(?source, ?window, transpose = selection.transpose, "pasting notes");

    map_tracks(&song, track_index, |i, t| {
        let pasted = to_paste
            .tracks
            .get(i)
            .into_iter()
            .flat_map(|src| src.notes.iter())
            .filter(|e| e.selected)
            .map(|e| NoteEvent {
                start_tick: e.start_tick.saturating_add(anchor),
                end_tick: e.end_tick.saturating_add(anchor),
                ..e.clone()
            })
            .map(|e| {
                move_note_event(&e, t.octave(), selection.delta_tick, selection.transpose, t.drums)
            });

        let kept = t
            .notes
            .iter()
            .filter(|e| !e.overlaps(window.start, window.end))
            .cloned();

        Track {
            notes: settle_events(kept.chain(pasted), max_tick),
            ..t.clone()
        }
    })
}
