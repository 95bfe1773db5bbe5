//! Timeline player for sampling an action table at playback time.

use super::format::{LightFrame, LightList};
use crate::compute::{ActionTable, PlayerTracks, TimelineError};

/// Samples one player's tracks at a fixed step.
///
/// Usage:
/// ```ignore
/// let player = TimelinePlayer::new(&table, 0, 50, config.timeline.duration)?;
/// println!("{} frames", player.frame_count());
///
/// // Colors at a specific time
/// let frame = player.frame_at(1200);
///
/// // Or iterate through all frames
/// for frame in player.frames() {
///     // Send frame to the costume...
/// }
/// ```
pub struct TimelinePlayer<'a> {
    tracks: &'a PlayerTracks,
    player: usize,
    step_ms: u32,
    duration: u32,
}

impl<'a> TimelinePlayer<'a> {
    /// Create a player sampling `player` every `step_ms` from 0 to
    /// `duration` inclusive.
    pub fn new(
        table: &'a ActionTable,
        player: usize,
        step_ms: u32,
        duration: u32,
    ) -> Result<Self, TimelineError> {
        if step_ms == 0 {
            return Err(TimelineError::ZeroStep);
        }
        let tracks = table.player(player).ok_or(TimelineError::UnknownPlayer {
            player,
            count: table.player_count(),
        })?;

        Ok(Self {
            tracks,
            player,
            step_ms,
            duration,
        })
    }

    /// Number of frames the player yields.
    pub fn frame_count(&self) -> u64 {
        self.duration as u64 / self.step_ms as u64 + 1
    }

    pub fn step_ms(&self) -> u32 {
        self.step_ms
    }

    /// Sample all parts at an arbitrary time.
    pub fn frame_at(&self, time: u32) -> LightFrame {
        LightFrame::from_colors(time, &self.tracks.frame_at(time))
    }

    /// Iterate over all sampled frames.
    pub fn frames(&self) -> FrameIterator<'_> {
        FrameIterator {
            player: self,
            current: 0,
        }
    }

    /// Collect all frames into a light list.
    pub fn to_light_list(&self) -> LightList {
        let color_data: Vec<_> = self.frames().collect();
        log::debug!(
            "Sampled player {} into {} frames every {}ms",
            self.player,
            color_data.len(),
            self.step_ms
        );

        LightList {
            player: self.player as u32,
            step_ms: self.step_ms,
            color_data,
        }
    }
}

/// Iterator over sampled light frames.
pub struct FrameIterator<'a> {
    player: &'a TimelinePlayer<'a>,
    current: u64,
}

impl<'a> Iterator for FrameIterator<'a> {
    type Item = LightFrame;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.player.frame_count() {
            return None;
        }

        // current * step_ms never exceeds duration, so it fits in u32
        let time = (self.current * self.player.step_ms as u64) as u32;
        self.current += 1;
        Some(self.player.frame_at(time))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.player.frame_count() - self.current) as usize;
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for FrameIterator<'a> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{BodyPart, Color, TimelineConfig};

    fn test_table() -> ActionTable {
        let config = TimelineConfig {
            duration: 1000,
            ..Default::default()
        };
        ActionTable::new(2)
            .insert(1, BodyPart::Head, 100, Color::RED, &config)
            .unwrap()
            .insert(1, BodyPart::Head, 500, Color::BLUE, &config)
            .unwrap()
    }

    #[test]
    fn test_player_rejects_bad_arguments() {
        let table = test_table();
        assert!(matches!(
            TimelinePlayer::new(&table, 0, 0, 1000),
            Err(TimelineError::ZeroStep)
        ));
        assert!(matches!(
            TimelinePlayer::new(&table, 2, 50, 1000),
            Err(TimelineError::UnknownPlayer { player: 2, count: 2 })
        ));
    }

    #[test]
    fn test_player_frame_count() {
        let table = test_table();
        let player = TimelinePlayer::new(&table, 1, 50, 1000).unwrap();
        assert_eq!(player.frame_count(), 21);
        assert_eq!(player.frames().len(), 21);

        let player = TimelinePlayer::new(&table, 1, 300, 1000).unwrap();
        let times: Vec<_> = player.frames().map(|f| f.time).collect();
        assert_eq!(times, vec![0, 300, 600, 900]);
    }

    #[test]
    fn test_player_samples_track() {
        // Head track: 100 red, 490 black, 500 blue, 1000 black
        let table = test_table();
        let player = TimelinePlayer::new(&table, 1, 50, 1000).unwrap();
        let head = |frame: LightFrame| frame.color(BodyPart::Head);

        assert_eq!(head(player.frame_at(0)), 0x0000_00FF);
        assert_eq!(head(player.frame_at(100)), 0xFF00_00FF);
        assert_eq!(head(player.frame_at(495)), 0x0000_00FF);
        assert_eq!(head(player.frame_at(750)), 0x0000_FFFF);
        assert_eq!(head(player.frame_at(1000)), 0x0000_00FF);
        assert_eq!(player.frame_at(750).color(BodyPart::Shoes), 0x0000_00FF);
    }

    #[test]
    fn test_to_light_list() {
        let table = test_table();
        let list = TimelinePlayer::new(&table, 1, 250, 1000)
            .unwrap()
            .to_light_list();

        assert_eq!(list.player, 1);
        assert_eq!(list.step_ms, 250);
        assert_eq!(list.color_data.len(), 5);
        assert_eq!(list.color_data[1].color(BodyPart::Head), 0xFF00_00FF);
        assert_eq!(list.color_data[3].color(BodyPart::Head), 0x0000_FFFF);
    }
}
