//! Edit commands and their mapping onto engine operations

use anyhow::Result;
use clap::Subcommand;
use tickroll_core::{
    Pitch, Row, Song, Tick, WorkspaceSelection, add_note_to_track, apply_selection,
    change_song_length, delete_selected_notes, edit_event_length, fill_drums, find_selected_range,
    move_selected_notes, remove_event_from_track, remove_note_from_track,
    select_note_events_in_range, selected_event_count, unselect_all_notes,
};

#[derive(Debug, Clone, Subcommand)]
pub(crate) enum Edit {
    /// Add a pitch over [start, end)
    Add {
        #[arg(long)]
        pitch: Pitch,
        #[arg(long)]
        start: Tick,
        #[arg(long)]
        end: Tick,
    },
    /// Remove one pitch from the event starting at `start`
    Remove {
        #[arg(long)]
        pitch: Pitch,
        #[arg(long)]
        start: Tick,
    },
    /// Remove the whole event starting at `start`
    RemoveEvent {
        #[arg(long)]
        start: Tick,
    },
    /// Change where the event starting at `start` ends
    Length {
        #[arg(long)]
        start: Tick,
        #[arg(long)]
        end: Tick,
    },
    /// Change the song length in measures
    Resize {
        #[arg(long)]
        measures: Tick,
    },
    /// Repeat one-tick hits of a drum sound
    FillDrums {
        #[arg(long)]
        pitch: Pitch,
        #[arg(long)]
        start: Tick,
        #[arg(long)]
        end: Tick,
        #[arg(long)]
        spacing: Tick,
    },
    /// Select the events overlapping [start, end)
    Select {
        #[arg(long)]
        start: Tick,
        #[arg(long)]
        end: Tick,
    },
    /// Clear the selection
    Unselect,
    /// Delete every selected event
    DeleteSelected,
    /// Move the selection by ticks and staff rows
    Move {
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        ticks: Tick,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        rows: Row,
    },
    /// Copy [start, end) to another tick, optionally transposed
    Copy {
        #[arg(long)]
        start: Tick,
        #[arg(long)]
        end: Tick,
        #[arg(long)]
        to: Tick,
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        transpose: Row,
    },
}

/// Run one edit against a song snapshot
pub(crate) fn apply(song: &Song, edit: &Edit, track: Option<usize>) -> Result<Song> {
    let single = || -> Result<usize> {
        track.ok_or_else(|| anyhow::anyhow!("--track is required for this command"))
    };

    let res = match *edit {
        Edit::Add { pitch, start, end } => add_note_to_track(song, single()?, pitch, start, end)?,
        Edit::Remove { pitch, start } => remove_note_from_track(song, single()?, pitch, start)?,
        Edit::RemoveEvent { start } => remove_event_from_track(song, single()?, start)?,
        Edit::Length { start, end } => edit_event_length(song, single()?, start, end)?,
        Edit::Resize { measures } => change_song_length(song, measures)?,
        Edit::FillDrums { pitch, start, end, spacing } => {
            fill_drums(song, single()?, pitch, start, end, spacing)?
        }
        Edit::Select { start, end } => select_note_events_in_range(song, start, end, track)?,
        Edit::Unselect => unselect_all_notes(song),
        Edit::DeleteSelected => delete_selected_notes(song),
        Edit::Move { ticks, rows } => move_selected_notes(song, ticks, rows, track)?,
        Edit::Copy { start, end, to, transpose } => {
            let copied = WorkspaceSelection::new(song.clone(), start, end);
            let len = end.saturating_sub(start);
            let paste = WorkspaceSelection::new(song.clone(), to, to.saturating_add(len))
                .with_delta(0, transpose)
                .with_pasted_content(copied);
            apply_selection(&paste, track)?
        }
    };
    Ok(res)
}

/// One-paragraph summary of a song
pub(crate) fn describe(song: &Song, grid_ticks: Option<Tick>) -> String {
    let mut out = format!(
        "{} measures x {} beats x {} ticks = {} ticks\n",
        song.measures,
        song.beats_per_measure,
        song.ticks_per_beat,
        song.max_tick()
    );

    for (i, track) in song.tracks.iter().enumerate() {
        let kind = if track.drums { "drums" } else { "melodic" };
        out.push_str(&format!(
            "track {i}: {kind}, octave {}, {} events\n",
            track.octave(),
            track.notes.len()
        ));
    }

    match find_selected_range(song, grid_ticks) {
        Some(range) => out.push_str(&format!(
            "selection: {} events in [{}, {})\n",
            selected_event_count(song),
            range.start,
            range.end
        )),
        None => out.push_str("selection: none\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tickroll_core::{Instrument, NoteEvent, Track};

    fn song() -> Song {
        Song::new(4, 4, 2).with_tracks(vec![
            Track::new(Instrument::new(4)).with_notes(vec![NoteEvent::single(49, 0, 4)]),
            Track::drums(Instrument::new(4)),
        ])
    }

    #[test]
    fn test_single_track_commands_require_track() {
        let edit = Edit::RemoveEvent { start: 0 };
        assert!(apply(&song(), &edit, None).is_err());
        let res = apply(&song(), &edit, Some(0)).unwrap();
        assert!(res.tracks[0].notes.is_empty());
    }

    #[test]
    fn test_bad_track_reports_error() {
        let edit = Edit::Add { pitch: 49, start: 0, end: 2 };
        let err = apply(&song(), &edit, Some(5)).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_select_then_move() {
        let selected = apply(&song(), &Edit::Select { start: 0, end: 4 }, None).unwrap();
        let moved = apply(&selected, &Edit::Move { ticks: 4, rows: 2 }, None).unwrap();
        assert_eq!(moved.tracks[0].notes[0].start_tick, 4);
        assert_eq!(moved.tracks[0].notes[0].notes, vec![53]);
    }

    #[test]
    fn test_copy_pastes_transposed() {
        let edit = Edit::Copy { start: 0, end: 4, to: 8, transpose: 2 };
        let res = apply(&song(), &edit, None).unwrap();
        assert_eq!(res.tracks[0].notes.len(), 2);
        assert_eq!(res.tracks[0].notes[1].notes, vec![53]);
        assert_eq!(res.tracks[0].notes[1].start_tick, 8);
    }

    #[test]
    fn test_resize_rejects_zero() {
        assert!(apply(&song(), &Edit::Resize { measures: 0 }, None).is_err());
        let res = apply(&song(), &Edit::Resize { measures: 1 }, None).unwrap();
        assert_eq!(res.max_tick(), 16);
    }

    #[test]
    fn test_describe() {
        let selected = apply(&song(), &Edit::Select { start: 1, end: 2 }, None).unwrap();
        let text = describe(&selected, Some(8));
        assert!(text.contains("= 32 ticks"));
        assert!(text.contains("track 1: drums"));
        assert!(text.contains("selection: 1 events in [0, 8)"));
    }
}
