//! Selecting note events by tick range

use crate::error::Result;
use crate::song::{Song, Tick, Track};
use crate::transform::map_tracks;

/// Half-open tick range `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickRange {
    pub start: Tick,
    pub end: Tick,
}

impl TickRange {
    pub fn new(start: Tick, end: Tick) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> Tick {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Shifted copy, saturating at the ends of the tick type
    pub fn offset(&self, delta: Tick) -> Self {
        Self::new(self.start.saturating_add(delta), self.end.saturating_add(delta))
    }

    /// Widen outward to multiples of `grid_ticks`
    pub fn snap_outward(&self, grid_ticks: Tick) -> Self {
        Self::new(
            self.start.div_euclid(grid_ticks) * grid_ticks,
            self.end.saturating_add(grid_ticks - 1).div_euclid(grid_ticks) * grid_ticks,
        )
    }
}

/// Span covering every selected event in the song, optionally snapped
/// outward to a grid. `None` when nothing is selected.
pub fn find_selected_range(song: &Song, grid_ticks: Option<Tick>) -> Option<TickRange> {
    let range = song
        .tracks
        .iter()
        .flat_map(|t| t.notes.iter())
        .filter(|e| e.selected)
        .fold(None, |acc: Option<TickRange>, e| {
            Some(match acc {
                None => TickRange::new(e.start_tick, e.end_tick),
                Some(r) => TickRange::new(r.start.min(e.start_tick), r.end.max(e.end_tick)),
            })
        })?;

    match grid_ticks {
        Some(grid) if grid > 0 => Some(range.snap_outward(grid)),
        _ => Some(range),
    }
}

/// Select exactly the events overlapping the range between the two ticks,
/// in either order. Events outside it are unselected.
pub fn select_note_events_in_range(
    song: &Song,
    start_tick: Tick,
    end_tick: Tick,
    track_index: Option<usize>,
) -> Result<Song> {
    let start = start_tick.min(end_tick);
    let end = start_tick.max(end_tick);

    map_tracks(song, track_index, |_, t| select_track_events(t, start, end))
}

fn select_track_events(track: &Track, start: Tick, end: Tick) -> Track {
    let mut res = track.clone();
    for event in &mut res.notes {
        event.selected = event.overlaps(start, end);
    }
    res
}

pub fn unselect_all_notes(song: &Song) -> Song {
    let mut res = song.clone();
    for event in res.tracks.iter_mut().flat_map(|t| t.notes.iter_mut()) {
        event.selected = false;
    }
    res
}

pub fn delete_selected_notes(song: &Song) -> Song {
    let mut res = song.clone();
    for track in &mut res.tracks {
        track.notes.retain(|e| !e.selected);
    }
    res
}

pub fn selected_event_count(song: &Song) -> usize {
    song.tracks
        .iter()
        .flat_map(|t| t.notes.iter())
        .filter(|e| e.selected)
        .count()
}
