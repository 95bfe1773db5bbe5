//! Keyframe timeline engine.
//!
//! Every (player, body part) pair owns a [`Track`]: keyframes sorted by time,
//! each holding its color until the next one. Painting a color at a time
//! goes through [`Track::insert`], which snaps the time to the authoring grid
//! and adds black boundary keyframes so the new color reads as a distinct
//! pulse. [`Track::resolve`] answers which color is lit at a given time.
//!
//! Insert branch table, first match wins (`idx` is the first keyframe later
//! than the snapped time, or 0 when there is none):
//!
//! ```text
//! keyframe at snapped time    -> recolor it in place
//! idx == 0                    -> new, black at `duration`
//! prev lit,  next black/none  -> black at now-gap, new
//! prev lit,  next lit         -> black at now-gap, new, black at next-gap
//! prev black, next lit        -> new, black at next-gap
//! otherwise                   -> new
//! ```
//!
//! A boundary keyframe is skipped when it would land on an existing keyframe
//! time or outside the span between its neighbour and the new keyframe.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

use crate::schema::{BodyPart, Color, Keyframe, TimelineConfig, UnknownBodyPart};

/// Timeline errors.
#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    #[error("Keyframe search returned index {index} for a track of {len} keyframes")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("Player {player} out of range ({count} players)")]
    UnknownPlayer { player: usize, count: usize },
    #[error(transparent)]
    UnknownBodyPart(#[from] UnknownBodyPart),
    #[error("Keyframe {index} is not later than the keyframe before it")]
    Unsorted { index: usize },
    #[error("Sampling step must be non-zero")]
    ZeroStep,
    #[error("Invalid action table JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Which structural change an insert performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Branch {
    Open,
    LeadingGap,
    Isolated,
    TrailingGap,
    Plain,
}

impl Branch {
    fn classify(idx: usize, prev: Option<&Keyframe>, next: Option<&Keyframe>) -> Self {
        let is_black = |k: Option<&Keyframe>| k.is_none_or(Keyframe::is_black);
        let (prev_black, next_black) = (is_black(prev), is_black(next));

        if idx == 0 {
            Branch::Open
        } else if !prev_black && next_black {
            Branch::LeadingGap
        } else if !prev_black && !next_black {
            Branch::Isolated
        } else if prev_black && !next_black {
            Branch::TrailingGap
        } else {
            Branch::Plain
        }
    }
}

/// Accept a search result only if it is 0 or names a keyframe.
fn checked_index(index: usize, len: usize) -> Result<usize, TimelineError> {
    if index != 0 && index >= len {
        return Err(TimelineError::IndexOutOfRange { index, len });
    }
    Ok(index)
}

/// Sorted keyframe sequence for one body part of one player.
///
/// Times are strictly ascending. Tracks are values: [`Track::insert`] returns
/// a new track and leaves `self` untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Keyframe>", into = "Vec<Keyframe>")]
pub struct Track {
    keyframes: Vec<Keyframe>,
}

impl TryFrom<Vec<Keyframe>> for Track {
    type Error = TimelineError;

    fn try_from(keyframes: Vec<Keyframe>) -> Result<Self, Self::Error> {
        Self::from_keyframes(keyframes)
    }
}

impl From<Track> for Vec<Keyframe> {
    fn from(track: Track) -> Self {
        track.keyframes
    }
}

impl Track {
    /// Create an empty track.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a track from keyframes that are already strictly ascending.
    pub fn from_keyframes(keyframes: Vec<Keyframe>) -> Result<Self, TimelineError> {
        if let Some(index) = keyframes
            .windows(2)
            .position(|pair| pair[1].time <= pair[0].time)
        {
            return Err(TimelineError::Unsorted { index: index + 1 });
        }
        Ok(Self { keyframes })
    }

    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Index of the first keyframe later than `time`, or 0 when no keyframe
    /// is later.
    fn first_greater(&self, time: u32) -> Result<usize, TimelineError> {
        let len = self.keyframes.len();
        let index = match self.keyframes.partition_point(|k| k.time <= time) {
            n if n == len => 0,
            n => n,
        };

        debug_assert!(index == 0 || index < len, "keyframe search out of range");
        checked_index(index, len)
    }

    /// Color lit at `time`.
    ///
    /// Off (opaque black) before the first keyframe, on an empty track, and
    /// once `time` is at or past the last keyframe.
    pub fn resolve(&self, time: u32) -> Color {
        match self.first_greater(time) {
            Ok(0) => Color::BLACK,
            Ok(idx) => self.keyframes[idx - 1].color,
            Err(e) => {
                log::error!("Resolve at {time}ms failed: {e}");
                Color::BLACK
            }
        }
    }

    /// Paint `color` starting at `time`, returning the updated track.
    ///
    /// `time` is floored to `config.snap_interval` first. Black boundary
    /// keyframes are added around the new keyframe following the branch
    /// table in the module docs.
    pub fn insert(
        &self,
        time: u32,
        color: Color,
        config: &TimelineConfig,
    ) -> Result<Track, TimelineError> {
        let now = config.snap(time);
        let idx = self.first_greater(now)?;

        let mut keyframes = self.keyframes.clone();
        if let Some(i) = self.time_index(now) {
            log::debug!("Insert at {now}ms (requested {time}ms): recolor");
            keyframes[i].color = color;
            return Ok(Track { keyframes });
        }

        let next = self.keyframes.get(idx);
        let prev = idx.checked_sub(1).and_then(|i| self.keyframes.get(i));
        let branch = Branch::classify(idx, prev, next);
        log::debug!("Insert at {now}ms (requested {time}ms): {branch:?}");

        let gap = config.black_threshold;
        let leading = now.saturating_sub(gap);
        let trailing = next.map_or(now.saturating_add(gap), |k| k.time.saturating_sub(gap));
        let after_prev = prev.map_or(0, |k| k.time);

        let new = Keyframe::new(now, color);
        let mut boundaries = Vec::with_capacity(2);
        match branch {
            Branch::Open => boundaries.push((config.duration, now)),
            Branch::LeadingGap => boundaries.push((leading, after_prev)),
            Branch::Isolated => {
                boundaries.push((leading, after_prev));
                boundaries.push((trailing, now));
            }
            Branch::TrailingGap => boundaries.push((trailing, now)),
            Branch::Plain => {}
        }

        keyframes.push(new);
        for (at, lower) in boundaries {
            if at > lower && at != now && self.time_index(at).is_none() {
                keyframes.push(Keyframe::off(at));
            } else {
                log::debug!("Skipping black boundary at {at}ms (collides with neighbour)");
            }
        }
        keyframes.sort_by_key(|k| k.time);

        Ok(Track { keyframes })
    }

    fn time_index(&self, time: u32) -> Option<usize> {
        self.keyframes.binary_search_by_key(&time, |k| k.time).ok()
    }
}

/// The nine tracks of one player, indexed by [`BodyPart`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerTracks {
    tracks: [Track; BodyPart::COUNT],
}

impl PlayerTracks {
    pub fn track(&self, part: BodyPart) -> &Track {
        &self.tracks[part.index()]
    }

    /// Colors of every part at `time`, in [`BodyPart::ALL`] order.
    pub fn frame_at(&self, time: u32) -> [Color; BodyPart::COUNT] {
        std::array::from_fn(|i| self.tracks[i].resolve(time))
    }
}

/// Per-player, per-part tracks for a whole performance.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTable {
    players: Vec<PlayerTracks>,
}

impl ActionTable {
    /// Create a table of `players` players with empty tracks.
    pub fn new(players: usize) -> Self {
        Self {
            players: vec![PlayerTracks::default(); players],
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn player(&self, player: usize) -> Option<&PlayerTracks> {
        self.players.get(player)
    }

    pub fn track(&self, player: usize, part: BodyPart) -> Option<&Track> {
        self.player(player).map(|p| p.track(part))
    }

    /// Paint `color` on one part of one player, returning the updated table.
    pub fn insert(
        &self,
        player: usize,
        part: BodyPart,
        time: u32,
        color: Color,
        config: &TimelineConfig,
    ) -> Result<ActionTable, TimelineError> {
        let tracks = self.player(player).ok_or(TimelineError::UnknownPlayer {
            player,
            count: self.players.len(),
        })?;
        let updated = tracks.track(part).insert(time, color, config)?;

        let mut table = self.clone();
        table.players[player].tracks[part.index()] = updated;
        Ok(table)
    }

    /// Color lit on one part at `time`; off for an unknown player.
    pub fn resolve(&self, player: usize, part: BodyPart, time: u32) -> Color {
        self.track(player, part)
            .map_or(Color::BLACK, |track| track.resolve(time))
    }

    /// Colors of every part of `player` at `time`.
    pub fn frame_at(&self, player: usize, time: u32) -> [Color; BodyPart::COUNT] {
        self.player(player)
            .map_or([Color::BLACK; BodyPart::COUNT], |p| p.frame_at(time))
    }

    /// Read a table from JSON.
    pub fn read_from<R: Read>(r: R) -> Result<Self, TimelineError> {
        Ok(serde_json::from_reader(r)?)
    }

    /// Write the table as JSON.
    pub fn write_to<W: Write>(&self, w: W) -> Result<(), TimelineError> {
        Ok(serde_json::to_writer(w, self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const C: Color = Color::RED;
    const D: Color = Color::BLUE;

    fn config(duration: u32) -> TimelineConfig {
        TimelineConfig {
            duration,
            black_threshold: 10,
            snap_interval: 50,
        }
    }

    fn track(frames: &[(u32, Color)]) -> Track {
        Track::from_keyframes(frames.iter().map(|&(t, c)| Keyframe::new(t, c)).collect()).unwrap()
    }

    fn times(track: &Track) -> Vec<u32> {
        track.keyframes().iter().map(|k| k.time).collect()
    }

    #[test]
    fn test_resolve_empty_track_is_off() {
        let empty = Track::new();
        assert_eq!(empty.resolve(0), Color::BLACK);
        assert_eq!(empty.resolve(12_345), Color::BLACK);
    }

    #[test]
    fn test_resolve_before_first_keyframe_is_off() {
        let t = track(&[(100, C), (5000, Color::BLACK)]);
        assert_eq!(t.resolve(0), Color::BLACK);
        assert_eq!(t.resolve(99), Color::BLACK);
    }

    #[test]
    fn test_resolve_last_keyframe_at_or_before() {
        let t = track(&[(100, C), (500, D), (5000, Color::BLACK)]);
        assert_eq!(t.resolve(100), C);
        assert_eq!(t.resolve(499), C);
        assert_eq!(t.resolve(500), D);
        assert_eq!(t.resolve(4999), D);
    }

    #[test]
    fn test_resolve_past_last_keyframe_is_off() {
        // No later keyframe means no keyframe applies
        let t = track(&[(100, C), (500, D)]);
        assert_eq!(t.resolve(500), Color::BLACK);
        assert_eq!(t.resolve(10_000), Color::BLACK);
    }

    #[test]
    fn test_checked_index_rejects_past_end() {
        assert_eq!(checked_index(0, 0).unwrap(), 0);
        assert_eq!(checked_index(2, 3).unwrap(), 2);
        assert!(matches!(
            checked_index(3, 3),
            Err(TimelineError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn test_insert_into_empty_track() {
        let t = Track::new().insert(120, C, &config(5000)).unwrap();
        assert_eq!(
            t.keyframes(),
            &[Keyframe::new(100, C), Keyframe::off(5000)]
        );
    }

    #[test]
    fn test_insert_leaves_original() {
        let original = track(&[(100, C), (5000, Color::BLACK)]);
        let updated = original.insert(1000, D, &config(5000)).unwrap();
        assert_eq!(original.len(), 2);
        assert_ne!(updated, original);
    }

    #[test]
    fn test_insert_same_bucket_overwrites() {
        let first = Track::new().insert(120, C, &config(5000)).unwrap();
        let second = first.insert(149, D, &config(5000)).unwrap();

        assert_eq!(second.len(), first.len());
        assert_eq!(second.keyframes()[0], Keyframe::new(100, D));
        assert_eq!(second.resolve(120), D);
    }

    #[test]
    fn test_insert_after_lit_segment_adds_leading_gap() {
        let t = track(&[(100, C), (5000, Color::BLACK)]);
        let t = t.insert(1000, D, &config(5000)).unwrap();

        assert_eq!(times(&t), vec![100, 990, 1000, 5000]);
        assert!(t.keyframes()[1].is_black());
        assert_eq!(t.resolve(995), Color::BLACK);
        assert_eq!(t.resolve(1000), D);
    }

    #[test]
    fn test_insert_between_lit_segments_isolates_pulse() {
        let t = track(&[(0, C), (1000, D), (5000, Color::BLACK)]);
        let updated = t.insert(500, Color::GREEN, &config(5000)).unwrap();

        assert_eq!(updated.len(), t.len() + 3);
        assert_eq!(times(&updated), vec![0, 490, 500, 990, 1000, 5000]);
        assert!(updated.keyframes()[1].is_black());
        assert_eq!(updated.keyframes()[2].color, Color::GREEN);
        assert!(updated.keyframes()[3].is_black());

        // Surrounding segments keep their colors
        assert_eq!(updated.resolve(400), C);
        assert_eq!(updated.resolve(1000), D);
    }

    #[test]
    fn test_insert_after_black_before_lit_adds_trailing_gap() {
        let t = track(&[(0, Color::BLACK), (1000, D), (5000, Color::BLACK)]);
        let t = t.insert(500, C, &config(5000)).unwrap();

        assert_eq!(times(&t), vec![0, 500, 990, 1000, 5000]);
        assert_eq!(t.resolve(600), C);
        assert_eq!(t.resolve(995), Color::BLACK);
    }

    #[test]
    fn test_insert_between_black_keyframes_is_plain() {
        let t = track(&[(0, Color::BLACK), (2000, Color::BLACK), (5000, Color::BLACK)]);
        let updated = t.insert(1000, C, &config(5000)).unwrap();
        assert_eq!(times(&updated), vec![0, 1000, 2000, 5000]);
    }

    #[test]
    fn test_insert_before_first_keyframe_opens_segment() {
        let t = track(&[(1000, C), (5000, Color::BLACK)]);
        let updated = t.insert(200, D, &config(5000)).unwrap();

        // Terminator at duration already exists and is not duplicated
        assert_eq!(times(&updated), vec![200, 1000, 5000]);
        assert_eq!(updated.resolve(500), D);
    }

    #[test]
    fn test_insert_skips_colliding_boundary() {
        // next - gap would land on the new keyframe
        let t = track(&[(0, Color::BLACK), (510, D), (5000, Color::BLACK)]);
        let updated = t.insert(500, C, &config(5000)).unwrap();
        assert_eq!(times(&updated), vec![0, 500, 510, 5000]);
    }

    #[test]
    fn test_insert_at_zero_with_lit_prev_is_recolor() {
        let t = track(&[(0, C), (5000, Color::BLACK)]);
        let updated = t.insert(30, D, &config(5000)).unwrap();
        assert_eq!(updated.keyframes(), &[Keyframe::new(0, D), Keyframe::off(5000)]);
    }

    #[test]
    fn test_from_keyframes_rejects_unsorted() {
        let frames = vec![Keyframe::new(100, C), Keyframe::new(100, D)];
        assert!(matches!(
            Track::from_keyframes(frames),
            Err(TimelineError::Unsorted { index: 1 })
        ));

        let frames = vec![Keyframe::new(200, C), Keyframe::new(100, D)];
        assert!(Track::from_keyframes(frames).is_err());
    }

    #[test]
    fn test_track_json_rejects_unsorted() {
        let json = r#"[{"time":200,"color":{"R":0,"G":0,"B":0}},{"time":100,"color":{"R":0,"G":0,"B":0}}]"#;
        assert!(serde_json::from_str::<Track>(json).is_err());
    }

    #[test]
    fn test_action_table_insert_and_resolve() {
        let table = ActionTable::new(2);
        let updated = table
            .insert(1, BodyPart::Shoes, 120, C, &config(5000))
            .unwrap();

        assert_eq!(updated.resolve(1, BodyPart::Shoes, 200), C);
        assert_eq!(updated.resolve(1, BodyPart::Head, 200), Color::BLACK);
        assert_eq!(updated.resolve(0, BodyPart::Shoes, 200), Color::BLACK);

        // Original snapshot unchanged
        assert!(table.track(1, BodyPart::Shoes).unwrap().is_empty());
    }

    #[test]
    fn test_action_table_unknown_player() {
        let table = ActionTable::new(1);
        assert!(matches!(
            table.insert(3, BodyPart::Head, 0, C, &config(5000)),
            Err(TimelineError::UnknownPlayer { player: 3, count: 1 })
        ));
        assert_eq!(table.resolve(3, BodyPart::Head, 0), Color::BLACK);
        assert_eq!(table.frame_at(3, 0), [Color::BLACK; BodyPart::COUNT]);
    }

    #[test]
    fn test_action_table_frame_at() {
        let table = ActionTable::new(1)
            .insert(0, BodyPart::Head, 0, C, &config(5000))
            .unwrap()
            .insert(0, BodyPart::Weapon2, 0, D, &config(5000))
            .unwrap();

        let frame = table.frame_at(0, 100);
        assert_eq!(frame[BodyPart::Head.index()], C);
        assert_eq!(frame[BodyPart::Weapon2.index()], D);
        assert_eq!(frame[BodyPart::Shoes.index()], Color::BLACK);
    }

    #[test]
    fn test_action_table_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("table.json");

        let table = ActionTable::new(2)
            .insert(0, BodyPart::BeltArms, 250, C, &config(5000))
            .unwrap()
            .insert(1, BodyPart::LegsLower, 1300, D, &config(5000))
            .unwrap();

        table
            .write_to(std::fs::File::create(&path).unwrap())
            .unwrap();
        let loaded = ActionTable::read_from(std::fs::File::open(&path).unwrap()).unwrap();
        assert_eq!(loaded, table);

        // Players are arrays of nine tracks
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value.as_array().unwrap().len(), 2);
        assert_eq!(value[0].as_array().unwrap().len(), BodyPart::COUNT);
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(128))]

        #[test]
        fn prop_insert_keeps_track_sorted(
            ops in prop::collection::vec((0u32..6000, 0u8..8), 1..40)
        ) {
            let cfg = config(5000);
            let mut t = Track::new();
            for (time, code) in ops {
                t = t.insert(time, Color::from_code(code, 1.0), &cfg).unwrap();
                prop_assert!(t.keyframes().windows(2).all(|w| w[0].time < w[1].time));
            }
        }

        #[test]
        fn prop_inserted_color_is_lit(
            ops in prop::collection::vec((0u32..5000, 1u8..8), 1..20)
        ) {
            let cfg = config(5000);
            let mut t = Track::new();
            for (time, code) in ops {
                let color = Color::from_code(code, 1.0);
                t = t.insert(time, color, &cfg).unwrap();
                prop_assert_eq!(t.resolve(cfg.snap(time)), color);
            }
        }
    }
}
