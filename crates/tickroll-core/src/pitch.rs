//! Pitch <-> staff row mapping

/// Absolute semitone index
pub type Pitch = i32;

/// Visual staff row, 0 at the bottom of a clef
pub type Row = i32;

/// Semitone offset of each staff row from the clef's base note.
/// Spans an octave and a bit so ledger rows above the staff are addressable.
pub const STAFF_NOTE_INTERVALS: [i32; 12] = [0, 2, 4, 5, 7, 9, 11, 12, 14, 16, 17, 19];

/// Number of addressable rows per clef
pub const STAFF_ROWS: Row = STAFF_NOTE_INTERVALS.len() as Row;

/// Bass clef rows sit this many semitones below treble rows
pub const BASS_CLEF_OFFSET: i32 = 20;

fn clef_offset(is_bass_clef: bool) -> i32 {
    if is_bass_clef { BASS_CLEF_OFFSET } else { 0 }
}

/// Where a pitch lands on the staff in its natural clef
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaffPosition {
    pub row: Row,
    pub is_bass_clef: bool,
    pub is_sharp: bool,
}

/// Pitch drawn at `row`. `None` if the row is off the staff.
pub fn row_to_note(octave: i32, row: Row, is_bass_clef: bool, is_sharp: bool) -> Option<Pitch> {
    let interval = usize::try_from(row)
        .ok()
        .and_then(|r| STAFF_NOTE_INTERVALS.get(r))?;

    Some(interval + octave * 12 + 1 + i32::from(is_sharp) - clef_offset(is_bass_clef))
}

/// Row a pitch is drawn on. A pitch between two table entries is a sharp of
/// the lower row.
pub fn note_to_row(octave: i32, pitch: Pitch, is_bass_clef: bool) -> Option<Row> {
    let offset = pitch - 1 - octave * 12 + clef_offset(is_bass_clef);

    for (i, &interval) in STAFF_NOTE_INTERVALS.iter().enumerate() {
        let i = i as Row;
        if interval == offset {
            return Some(i);
        }
        if interval > offset {
            // sharp note; below the first row there is nothing to sharpen
            return (i > 0).then_some(i - 1);
        }
    }

    None
}

/// True if the pitch does not sit exactly on a row. Unmappable pitches
/// count as sharp.
pub fn is_sharp_note(octave: i32, pitch: Pitch, is_bass_clef: bool) -> bool {
    note_to_row(octave, pitch, is_bass_clef)
        .and_then(|row| row_to_note(octave, row, is_bass_clef, false))
        != Some(pitch)
}

pub fn is_bass_clef_note(octave: i32, pitch: Pitch) -> bool {
    pitch < octave * 12 + 1
}

/// Row, clef and accidental of a pitch in the clef it naturally belongs to
pub fn staff_position(octave: i32, pitch: Pitch) -> Option<StaffPosition> {
    let is_bass_clef = is_bass_clef_note(octave, pitch);
    let row = note_to_row(octave, pitch, is_bass_clef)?;

    Some(StaffPosition {
        row,
        is_bass_clef,
        is_sharp: is_sharp_note(octave, pitch, is_bass_clef),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_to_note() {
        // octave 4 treble: row 0 is pitch 49
        assert_eq!(row_to_note(4, 0, false, false), Some(49));
        assert_eq!(row_to_note(4, 0, false, true), Some(50));
        assert_eq!(row_to_note(4, 11, false, false), Some(68));
        assert_eq!(row_to_note(4, 0, true, false), Some(29));
        assert_eq!(row_to_note(4, 12, false, false), None);
        assert_eq!(row_to_note(4, -1, false, false), None);
    }

    #[test]
    fn test_note_to_row() {
        assert_eq!(note_to_row(4, 49, false), Some(0));
        assert_eq!(note_to_row(4, 50, false), Some(0)); // sharp of row 0
        assert_eq!(note_to_row(4, 51, false), Some(1));
        assert_eq!(note_to_row(4, 68, false), Some(11));
        assert_eq!(note_to_row(4, 69, false), None); // above the staff
        assert_eq!(note_to_row(4, 48, false), None); // below the staff
        assert_eq!(note_to_row(4, 29, true), Some(0));
    }

    #[test]
    fn test_sharp_detection() {
        assert!(!is_sharp_note(4, 49, false));
        assert!(is_sharp_note(4, 50, false));
        assert!(!is_sharp_note(4, 54, false)); // row 3, interval 5
        assert!(is_sharp_note(4, 200, false));
    }

    #[test]
    fn test_natural_rows_round_trip() {
        for octave in 2..6 {
            for is_bass_clef in [false, true] {
                for row in 0..STAFF_ROWS {
                    let Some(pitch) = row_to_note(octave, row, is_bass_clef, false) else {
                        panic!("row {row} should be on the staff");
                    };
                    assert_eq!(note_to_row(octave, pitch, is_bass_clef), Some(row));
                    assert!(!is_sharp_note(octave, pitch, is_bass_clef));
                }
            }
        }
    }

    #[test]
    fn test_bass_clef_boundary() {
        assert!(is_bass_clef_note(4, 48));
        assert!(!is_bass_clef_note(4, 49));
    }

    #[test]
    fn test_staff_position() {
        assert_eq!(
            staff_position(4, 36),
            Some(StaffPosition { row: 4, is_bass_clef: true, is_sharp: false })
        );
        assert_eq!(
            staff_position(4, 57),
            Some(StaffPosition { row: 4, is_bass_clef: false, is_sharp: true })
        );
    }
}
