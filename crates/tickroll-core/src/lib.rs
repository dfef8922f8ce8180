//! tickroll-core: tick-quantized note sequencing for a piano-roll / drum editor
//!
//! Every operation takes a song snapshot by reference and returns a new one;
//! nothing is mutated in place, so callers can keep old snapshots for undo.

mod error;
pub mod movement;
pub mod note_events;
pub mod pitch;
pub mod selection;
pub mod song;
pub mod transform;

pub use error::{EngineError, Result};
pub use movement::{
    MAX_PASTE_DEPTH, WorkspaceSelection, apply_selection, move_note_event, move_selected_notes,
    transpose_pitch,
};
pub use note_events::{
    WorkspaceCoordinate, add_note, find_event_at_position, find_event_at_tick, find_next_event,
    find_previous_event, remove_event, remove_note, set_event_length,
};
pub use pitch::{
    Pitch, Row, STAFF_NOTE_INTERVALS, StaffPosition, is_bass_clef_note, is_sharp_note, note_to_row,
    row_to_note, staff_position,
};
pub use selection::{
    TickRange, delete_selected_notes, find_selected_range, select_note_events_in_range,
    selected_event_count, unselect_all_notes,
};
pub use song::{Instrument, NoteEvent, Song, Tick, Track};
pub use transform::{
    add_note_to_track, change_song_length, edit_event_length, fill_drums, remove_event_from_track,
    remove_note_from_track,
};
