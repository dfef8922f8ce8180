//! Lifts per-track edits to whole-song edits

use crate::error::{EngineError, Result};
use crate::note_events::{add_note, remove_event, remove_note, set_event_length};
use crate::pitch::Pitch;
use crate::song::{Song, Tick, Track};

/// Rewrite the track at `index`, passing every other track through
pub(crate) fn map_track<F>(song: &Song, index: usize, f: F) -> Result<Song>
where
    F: FnOnce(&Track) -> Track,
{
    let target = song.track(index)?;
    let mut res = song.clone();
    res.tracks[index] = f(target);
    Ok(res)
}

/// Rewrite every track, or only `index` when one is given
pub(crate) fn map_tracks<F>(song: &Song, index: Option<usize>, mut f: F) -> Result<Song>
where
    F: FnMut(usize, &Track) -> Track,
{
    if let Some(index) = index {
        return map_track(song, index, |t| f(index, t));
    }

    Ok(Song {
        tracks: song.tracks.iter().enumerate().map(|(i, t)| f(i, t)).collect(),
        ..song.clone_header()
    })
}

/// Add a pitch over `[start_tick, end_tick)`. The end is clamped to the song;
/// an interval that ends up empty or outside the song leaves it untouched.
pub fn add_note_to_track(
    song: &Song,
    track_index: usize,
    pitch: Pitch,
    start_tick: Tick,
    end_tick: Tick,
) -> Result<Song> {
    let max_tick = song.max_tick();
    let end_tick = end_tick.min(max_tick);

    if start_tick < 0 || start_tick >= end_tick {
        song.track(track_index)?;
        tracing::trace!(start_tick, end_tick, max_tick, "note outside song ignored");
        return Ok(song.clone());
    }

    map_track(song, track_index, |t| Track {
        notes: add_note(&t.notes, pitch, start_tick, end_tick),
        ..t.clone()
    })
}

pub fn remove_note_from_track(
    song: &Song,
    track_index: usize,
    pitch: Pitch,
    start_tick: Tick,
) -> Result<Song> {
    map_track(song, track_index, |t| Track {
        notes: remove_note(&t.notes, pitch, start_tick),
        ..t.clone()
    })
}

pub fn remove_event_from_track(song: &Song, track_index: usize, start_tick: Tick) -> Result<Song> {
    map_track(song, track_index, |t| Track {
        notes: remove_event(&t.notes, start_tick),
        ..t.clone()
    })
}

/// Set the end of the event starting at `start_tick`, clamped to the song
pub fn edit_event_length(
    song: &Song,
    track_index: usize,
    start_tick: Tick,
    end_tick: Tick,
) -> Result<Song> {
    let end_tick = end_tick.min(song.max_tick());

    map_track(song, track_index, |t| Track {
        notes: set_event_length(&t.notes, start_tick, end_tick),
        ..t.clone()
    })
}

/// Lay down one-tick hits of `pitch` every `tick_spacing` ticks in
/// `[start_tick, end_tick)`. Hits that would fall outside the song are skipped.
pub fn fill_drums(
    song: &Song,
    track_index: usize,
    pitch: Pitch,
    start_tick: Tick,
    end_tick: Tick,
    tick_spacing: Tick,
) -> Result<Song> {
    if tick_spacing <= 0 {
        return Err(EngineError::InvalidTickSpacing(tick_spacing));
    }

    // first hit inside the song that stays on the requested spacing
    let first = if start_tick < 0 {
        start_tick.rem_euclid(tick_spacing)
    } else {
        start_tick
    };
    let end_tick = end_tick.min(song.max_tick());

    map_track(song, track_index, |t| {
        let mut notes = t.notes.clone();
        let mut tick = first;
        while tick < end_tick {
            notes = add_note(&notes, pitch, tick, tick + 1);
            match tick.checked_add(tick_spacing) {
                Some(next) => tick = next,
                None => break,
            }
        }
        Track { notes, ..t.clone() }
    })
}

/// Resize the song. Events starting past the new end are dropped, the rest
/// are clipped to it.
pub fn change_song_length(song: &Song, measures: Tick) -> Result<Song> {
    let max_tick = match measures.checked_mul(song.ticks_per_measure()) {
        Some(max_tick) if measures > 0 => max_tick,
        _ => return Err(EngineError::InvalidMeasures(measures)),
    };
    tracing::debug!(from = song.measures, to = measures, max_tick, "changing song length");

    Ok(Song {
        measures,
        tracks: song
            .tracks
            .iter()
            .map(|t| Track {
                notes: t
                    .notes
                    .iter()
                    .filter(|e| e.start_tick < max_tick)
                    .map(|e| {
                        let mut e = e.clone();
                        e.end_tick = e.end_tick.min(max_tick);
                        e
                    })
                    .collect(),
                ..t.clone()
            })
            .collect(),
        ..song.clone_header()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::song::{Instrument, NoteEvent};

    fn song_with(notes: Vec<NoteEvent>) -> Song {
        Song::new(4, 4, 2).with_tracks(vec![
            Track::new(Instrument::default()).with_notes(notes),
            Track::new(Instrument::default()),
        ])
    }

    #[test]
    fn test_add_touches_only_target_track() {
        let song = song_with(vec![]);
        let res = add_note_to_track(&song, 1, 60, 0, 4).unwrap();
        assert!(res.tracks[0].notes.is_empty());
        assert_eq!(res.tracks[1].notes, vec![NoteEvent::single(60, 0, 4)]);
        // input snapshot untouched
        assert!(song.tracks[1].notes.is_empty());
    }

    #[test]
    fn test_add_clamps_to_song_end() {
        let song = song_with(vec![]);
        let res = add_note_to_track(&song, 0, 60, 30, 40).unwrap();
        assert_eq!(res.tracks[0].notes, vec![NoteEvent::single(60, 30, 32)]);

        let res = add_note_to_track(&song, 0, 60, 32, 36).unwrap();
        assert!(res.tracks[0].notes.is_empty());
        let res = add_note_to_track(&song, 0, 60, -2, 2).unwrap();
        assert!(res.tracks[0].notes.is_empty());
    }

    #[test]
    fn test_bad_track_index() {
        let song = song_with(vec![]);
        assert!(matches!(
            add_note_to_track(&song, 2, 60, 0, 4),
            Err(EngineError::TrackOutOfRange { index: 2, len: 2 })
        ));
        assert!(add_note_to_track(&song, 2, 60, 40, 44).is_err());
        assert!(remove_event_from_track(&song, 9, 0).is_err());
    }

    #[test]
    fn test_remove_note_and_event() {
        let song = song_with(vec![NoteEvent::new(vec![60, 64], 0, 4), NoteEvent::single(62, 4, 8)]);
        let res = remove_note_from_track(&song, 0, 64, 0).unwrap();
        assert_eq!(res.tracks[0].notes[0].notes, vec![60]);
        let res = remove_event_from_track(&res, 0, 4).unwrap();
        assert_eq!(res.tracks[0].notes, vec![NoteEvent::single(60, 0, 4)]);
    }

    #[test]
    fn test_edit_length_clamps_to_song_end() {
        let song = song_with(vec![NoteEvent::single(60, 28, 30)]);
        let res = edit_event_length(&song, 0, 28, 100).unwrap();
        assert_eq!(res.tracks[0].notes[0].end_tick, 32);
    }

    #[test]
    fn test_fill_drums() {
        let song = song_with(vec![]);
        let res = fill_drums(&song, 0, 2, 0, 16, 4).unwrap();
        let starts: Vec<Tick> = res.tracks[0].notes.iter().map(|e| e.start_tick).collect();
        assert_eq!(starts, vec![0, 4, 8, 12]);
        assert!(res.tracks[0].notes.iter().all(|e| e.length() == 1 && e.notes == vec![2]));
        assert!(matches!(
            fill_drums(&song, 0, 2, 0, 16, 0),
            Err(EngineError::InvalidTickSpacing(0))
        ));
    }

    #[test]
    fn test_fill_drums_stays_inside_song() {
        let song = song_with(vec![]);
        let res = fill_drums(&song, 0, 2, 0, 2_000_000, 1).unwrap();
        assert_eq!(res.tracks[0].notes.len(), 32);
        assert_eq!(res.tracks[0].notes.last().map(|e| e.end_tick), Some(32));

        let res = fill_drums(&song, 0, 2, -6, 16, 4).unwrap();
        let starts: Vec<Tick> = res.tracks[0].notes.iter().map(|e| e.start_tick).collect();
        assert_eq!(starts, vec![2, 6, 10, 14]);

        let res = fill_drums(&song, 0, 2, Tick::MAX - 2, Tick::MAX, 5).unwrap();
        assert!(res.tracks[0].notes.is_empty());
        let res = fill_drums(&song, 0, 2, 30, Tick::MAX, Tick::MAX).unwrap();
        assert_eq!(res.tracks[0].notes, vec![NoteEvent::single(2, 30, 31)]);
        assert!(fill_drums(&song, 7, 2, 0, 16, 4).is_err());
    }

    #[test]
    fn test_change_song_length_truncates() {
        let song = song_with(vec![
            NoteEvent::single(60, 0, 4),
            NoteEvent::single(60, 14, 20),
            NoteEvent::single(60, 16, 18),
        ]);
        let res = change_song_length(&song, 1).unwrap();
        assert_eq!(res.measures, 1);
        assert_eq!(res.max_tick(), 16);
        assert_eq!(
            res.tracks[0].notes,
            vec![NoteEvent::single(60, 0, 4), NoteEvent::single(60, 14, 16)]
        );
        assert!(res.validate().is_ok());
    }

    #[test]
    fn test_change_song_length_grows() {
        let song = song_with(vec![NoteEvent::single(60, 0, 4)]);
        let res = change_song_length(&song, 4).unwrap();
        assert_eq!(res.max_tick(), 64);
        assert_eq!(res.tracks, song.tracks);
    }

    #[test]
    fn test_change_song_length_rejects_empty_song() {
        let song = song_with(vec![NoteEvent::single(60, 0, 4)]);
        assert!(matches!(change_song_length(&song, 0), Err(EngineError::InvalidMeasures(0))));
        assert!(matches!(change_song_length(&song, -3), Err(EngineError::InvalidMeasures(-3))));
        assert!(matches!(
            change_song_length(&song, Tick::MAX),
            Err(EngineError::InvalidMeasures(Tick::MAX))
        ));
    }
}
