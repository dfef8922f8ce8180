//! Song, track and note event types in their saved JSON shape

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::{EngineError, Result};
use crate::pitch::Pitch;

/// Position on the song timeline
pub type Tick = i64;

/// A group of pitches sounding together over `[start_tick, end_tick)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteEvent {
    /// Pitch set, kept sorted ascending
    pub notes: Vec<Pitch>,
    pub start_tick: Tick,
    /// Exclusive
    pub end_tick: Tick,
    #[serde(default, skip_serializing_if = "is_false")]
    pub selected: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl NoteEvent {
    pub fn new(notes: Vec<Pitch>, start_tick: Tick, end_tick: Tick) -> Self {
        Self {
            notes,
            start_tick,
            end_tick,
            selected: false,
        }
    }

    pub fn single(pitch: Pitch, start_tick: Tick, end_tick: Tick) -> Self {
        Self::new(vec![pitch], start_tick, end_tick)
    }

    /// True if `tick` falls inside this event
    pub fn contains_tick(&self, tick: Tick) -> bool {
        self.start_tick <= tick && tick < self.end_tick
    }

    /// True if this event shares any tick with `[start, end)`
    pub fn overlaps(&self, start: Tick, end: Tick) -> bool {
        !(self.start_tick >= end || self.end_tick <= start)
    }

    pub fn has_pitch(&self, pitch: Pitch) -> bool {
        self.notes.contains(&pitch)
    }

    pub fn length(&self) -> Tick {
        self.end_tick.saturating_sub(self.start_tick)
    }
}

/// Instrument settings. Only the octave matters to the editor; the rest is
/// synth configuration passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub octave: i32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Instrument {
    pub fn new(octave: i32) -> Self {
        Self {
            octave,
            extra: Map::new(),
        }
    }
}

impl Default for Instrument {
    fn default() -> Self {
        Self::new(4)
    }
}

/// One instrument's note events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub instrument: Instrument,
    /// Drum tracks store drum sounds as pitches and are never transposed
    #[serde(default, deserialize_with = "truthy")]
    pub drums: bool,
    /// Events sorted by start_tick, one event per start tick
    #[serde(default)]
    pub notes: Vec<NoteEvent>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Older saves store flags as `0`/`1`, `null` or strings; read them the way
/// the editor tests them
fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<bool, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => false,
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    })
}

impl Track {
    pub fn new(instrument: Instrument) -> Self {
        Self {
            instrument,
            drums: false,
            notes: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn drums(instrument: Instrument) -> Self {
        Self {
            drums: true,
            ..Self::new(instrument)
        }
    }

    pub fn with_notes(self, notes: Vec<NoteEvent>) -> Self {
        Self { notes, ..self }
    }

    pub fn octave(&self) -> i32 {
        self.instrument.octave
    }
}

/// A fixed-length song
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Song {
    pub ticks_per_beat: Tick,
    pub beats_per_measure: Tick,
    pub measures: Tick,
    #[serde(default)]
    pub tracks: Vec<Track>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Song {
    pub fn new(ticks_per_beat: Tick, beats_per_measure: Tick, measures: Tick) -> Self {
        Self {
            ticks_per_beat,
            beats_per_measure,
            measures,
            tracks: Vec::new(),
            extra: Map::new(),
        }
    }

    pub fn with_tracks(self, tracks: Vec<Track>) -> Self {
        Self { tracks, ..self }
    }

    pub fn ticks_per_measure(&self) -> Tick {
        self.ticks_per_beat.saturating_mul(self.beats_per_measure)
    }

    /// Exclusive upper bound for every tick in the song
    pub fn max_tick(&self) -> Tick {
        self.ticks_per_measure().saturating_mul(self.measures)
    }

    /// Copy of the song with no tracks
    pub(crate) fn clone_header(&self) -> Song {
        Song {
            ticks_per_beat: self.ticks_per_beat,
            beats_per_measure: self.beats_per_measure,
            measures: self.measures,
            tracks: Vec::new(),
            extra: self.extra.clone(),
        }
    }

    pub fn track(&self, index: usize) -> Result<&Track> {
        self.tracks.get(index).ok_or(EngineError::TrackOutOfRange {
            index,
            len: self.tracks.len(),
        })
    }

    /// Parse a saved song and check its invariants
    pub fn from_json(json: &str) -> Result<Self> {
        let song: Song = serde_json::from_str(json)?;
        song.validate()?;
        Ok(song)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check timing fields and every track's event invariants
    pub fn validate(&self) -> Result<()> {
        if self.ticks_per_beat <= 0 || self.beats_per_measure <= 0 || self.measures <= 0 {
            return Err(EngineError::InvalidSong(format!(
                "timing must be positive (ticksPerBeat={}, beatsPerMeasure={}, measures={})",
                self.ticks_per_beat, self.beats_per_measure, self.measures
            )));
        }

        let max_tick = self.max_tick();
        for (index, track) in self.tracks.iter().enumerate() {
            validate_events(&track.notes, max_tick)
                .map_err(|msg| EngineError::InvalidSong(format!("track {index}: {msg}")))?;
        }
        Ok(())
    }
}

fn validate_events(events: &[NoteEvent], max_tick: Tick) -> std::result::Result<(), String> {
    let mut prev_start: Option<Tick> = None;

    for event in events {
        let tick = event.start_tick;
        if tick < 0 || event.end_tick > max_tick {
            return Err(format!("event at tick {tick} outside [0, {max_tick})"));
        }
        if tick >= event.end_tick {
            return Err(format!("event at tick {tick} ends at {}", event.end_tick));
        }
        if event.notes.is_empty() {
            return Err(format!("event at tick {tick} has no pitches"));
        }
        let mut pitches = event.notes.clone();
        pitches.sort_unstable();
        pitches.dedup();
        if pitches.len() != event.notes.len() {
            return Err(format!("event at tick {tick} repeats a pitch"));
        }
        if prev_start.is_some_and(|prev| tick <= prev) {
            return Err(format!("event at tick {tick} is out of order"));
        }
        prev_start = Some(tick);
    }
    Ok(())
}
