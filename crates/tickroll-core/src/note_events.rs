//! Edits and lookups on a single track's sorted note events
//!
//! Every edit takes the current events by reference and returns a new list.

use crate::error::Result;
use crate::pitch::{Pitch, Row, note_to_row};
use crate::song::{NoteEvent, Song, Tick, Track};

/// A cell in the editor grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkspaceCoordinate {
    pub tick: Tick,
    pub row: Row,
    pub is_bass_clef: bool,
}

/// Add `pitch` at `start_tick`. A pitch landing inside an existing event
/// joins that event's chord instead of starting a new interval.
pub fn add_note(
    notes: &[NoteEvent],
    pitch: Pitch,
    start_tick: Tick,
    end_tick: Tick,
) -> Vec<NoteEvent> {
    for (i, event) in notes.iter().enumerate() {
        if event.start_tick > start_tick {
            let mut res = Vec::with_capacity(notes.len() + 1);
            res.extend_from_slice(&notes[..i]);
            res.push(NoteEvent::single(pitch, start_tick, end_tick));
            res.extend_from_slice(&notes[i..]);
            return res;
        }

        if event.end_tick > start_tick {
            let mut res = notes.to_vec();
            if !event.has_pitch(pitch) {
                let chord = &mut res[i].notes;
                chord.push(pitch);
                chord.sort_unstable();
            }
            return res;
        }
    }

    let mut res = notes.to_vec();
    res.push(NoteEvent::single(pitch, start_tick, end_tick));
    res
}

/// Remove one pitch from the event starting at `start_tick`, dropping the
/// event once its chord is empty
pub fn remove_note(notes: &[NoteEvent], pitch: Pitch, start_tick: Tick) -> Vec<NoteEvent> {
    let mut res = notes.to_vec();

    if let Some(event) = res.iter_mut().find(|e| e.start_tick == start_tick) {
        event.notes.retain(|&n| n != pitch);
    }

    res.retain(|e| !e.notes.is_empty());
    res
}

pub fn remove_event(notes: &[NoteEvent], start_tick: Tick) -> Vec<NoteEvent> {
    notes
        .iter()
        .filter(|e| e.start_tick != start_tick)
        .cloned()
        .collect()
}

/// Move the end of the event starting at `start_tick`. Later events that
/// start before the new end are deleted, not trimmed.
pub fn set_event_length(notes: &[NoteEvent], start_tick: Tick, end_tick: Tick) -> Vec<NoteEvent> {
    if start_tick >= end_tick {
        return notes.to_vec();
    }

    let mut res = Vec::with_capacity(notes.len());
    let mut new_end: Option<Tick> = None;

    for event in notes {
        if event.start_tick == start_tick {
            res.push(NoteEvent {
                end_tick,
                ..event.clone()
            });
            new_end = Some(end_tick);
        } else if new_end.is_some_and(|end| event.start_tick < end) {
            tracing::trace!(tick = event.start_tick, "event swallowed by lengthened event");
        } else {
            res.push(event.clone());
        }
    }
    res
}

pub fn find_event_at_tick(track: &Track, tick: Tick) -> Option<&NoteEvent> {
    track.notes.iter().find(|e| e.contains_tick(tick))
}

/// Last event starting at or before `tick`
pub fn find_previous_event(track: &Track, tick: Tick) -> Option<&NoteEvent> {
    let mut last = None;
    for event in &track.notes {
        if event.start_tick > tick {
            break;
        }
        last = Some(event);
    }
    last
}

/// First event starting after `tick`
pub fn find_next_event(track: &Track, tick: Tick) -> Option<&NoteEvent> {
    track.notes.iter().find(|e| e.start_tick > tick)
}

/// Event under a grid cell: the event at `position.tick` with a pitch drawn
/// on `position.row`. Without a track index, tracks are searched in order.
pub fn find_event_at_position(
    song: &Song,
    position: WorkspaceCoordinate,
    track_index: Option<usize>,
) -> Result<Option<&NoteEvent>> {
    if let Some(index) = track_index {
        return Ok(event_on_row(song.track(index)?, position));
    }

    Ok(song.tracks.iter().find_map(|track| event_on_row(track, position)))
}

fn event_on_row(track: &Track, position: WorkspaceCoordinate) -> Option<&NoteEvent> {
    let octave = track.octave();
    find_event_at_tick(track, position.tick).filter(|event| {
        event
            .notes
            .iter()
            .any(|&n| note_to_row(octave, n, position.is_bass_clef) == Some(position.row))
    })
}
