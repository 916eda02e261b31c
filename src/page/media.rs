use crate::element::{ElementId, VisualClass};
use crate::host::{MediaHandle, PlaybackError, RenderTarget};

use super::{EventResponse, Focus, Key};

pub const PLAY_LABEL: &str = "▶";
pub const PAUSE_LABEL: &str = "❚❚";
pub const MUTED_ICON: &str = "🔇";
pub const LOUD_ICON: &str = "🔊";
pub const QUIET_ICON: &str = "🔉";

/// Speaker glyph for a volume level.
pub fn volume_icon(muted: bool, volume: f32) -> &'static str {
    if muted || volume == 0.0 {
        MUTED_ICON
    } else if volume > 0.5 {
        LOUD_ICON
    } else {
        QUIET_ICON
    }
}

/// Playback position as a percentage; 0 while the duration is unknown.
pub fn seek_percent(current: f64, duration: f64) -> f32 {
    if !duration.is_finite() || duration <= 0.0 {
        return 0.0;
    }
    ((current / duration) * 100.0).clamp(0.0, 100.0) as f32
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VideoElements {
    pub container: ElementId,
    pub video: ElementId,
    pub play_pause: ElementId,
    pub seek_bar: ElementId,
    pub volume_button: ElementId,
    pub volume_bar: ElementId,
}

pub struct VideoPlayer {
    elements: VideoElements,
    media: Box<dyn MediaHandle>,
}

impl VideoPlayer {
    pub fn new(elements: VideoElements, media: Box<dyn MediaHandle>) -> Self {
        Self { elements, media }
    }

    pub fn elements(&self) -> &VideoElements {
        &self.elements
    }

    pub fn sync(&self, render: &mut dyn RenderTarget) {
        let label = if self.media.is_paused() {
            PLAY_LABEL
        } else {
            PAUSE_LABEL
        };
        render.set_text(self.elements.play_pause, label);
        render.set_value(self.elements.volume_bar, self.media.volume());
        self.update_volume_icon(render);
    }

    pub fn toggle(&mut self, render: &mut dyn RenderTarget) {
        if self.media.is_paused() {
            match self.media.play() {
                Ok(()) => render.set_text(self.elements.play_pause, PAUSE_LABEL),
                Err(err) => log::info!("video did not start: {}", err),
            }
        } else {
            self.media.pause();
            render.set_text(self.elements.play_pause, PLAY_LABEL);
        }
    }

    pub fn on_played(&self, render: &mut dyn RenderTarget) {
        render.add_class(self.elements.container, VisualClass::PLAYING);
        render.set_text(self.elements.play_pause, PAUSE_LABEL);
    }

    pub fn on_paused(&self, render: &mut dyn RenderTarget) {
        render.remove_class(self.elements.container, VisualClass::PLAYING);
        render.set_text(self.elements.play_pause, PLAY_LABEL);
    }

    pub fn on_time_update(&self, render: &mut dyn RenderTarget) {
        let percent = seek_percent(self.media.current_time(), self.media.duration());
        render.set_value(self.elements.seek_bar, percent);
    }

    /// Jump to `percent` of the media. No-op while the duration is unknown.
    pub fn seek(&mut self, percent: f32) {
        let duration = self.media.duration();
        if !duration.is_finite() {
            log::debug!("seek ignored, duration not known yet");
            return;
        }
        let fraction = f64::from(percent.clamp(0.0, 100.0)) / 100.0;
        self.media.set_current_time(fraction * duration);
    }

    pub fn set_volume(&mut self, volume: f32, render: &mut dyn RenderTarget) {
        self.media.set_volume(volume);
        self.update_volume_icon(render);
    }

    pub fn toggle_mute(&mut self, render: &mut dyn RenderTarget) {
        let muted = !self.media.is_muted();
        self.media.set_muted(muted);
        self.update_volume_icon(render);
    }

    /// Space toggles playback unless the wish box has focus; `m` mutes only
    /// with the video focused.
    pub fn on_key(
        &mut self,
        key: Key,
        focus: Focus,
        render: &mut dyn RenderTarget,
    ) -> EventResponse {
        match key {
            Key::Space if focus != Focus::WishInput => {
                self.toggle(render);
                EventResponse::Handled
            }
            Key::Char('m') if focus == Focus::Video => {
                self.toggle_mute(render);
                EventResponse::Ignored
            }
            _ => EventResponse::Ignored,
        }
    }

    fn update_volume_icon(&self, render: &mut dyn RenderTarget) {
        let icon = volume_icon(self.media.is_muted(), self.media.volume());
        render.set_text(self.elements.volume_button, icon);
    }
}

/// Background music with a mute toggle. Autoplay is attempted once on load;
/// if the host blocks it, the first click anywhere retries.
pub struct MusicPlayer {
    media: Box<dyn MediaHandle>,
    button: ElementId,
    icon: ElementId,
    awaiting_gesture: bool,
}

impl MusicPlayer {
    pub fn new(media: Box<dyn MediaHandle>, button: ElementId, icon: ElementId) -> Self {
        Self {
            media,
            button,
            icon,
            awaiting_gesture: true,
        }
    }

    pub fn is_muted(&self) -> bool {
        self.media.is_muted()
    }

    pub fn sync(&self, render: &mut dyn RenderTarget) {
        let muted = self.media.is_muted();
        if muted {
            render.add_class(self.button, VisualClass::MUTED);
        } else {
            render.remove_class(self.button, VisualClass::MUTED);
        }
        render.set_text(self.icon, if muted { MUTED_ICON } else { LOUD_ICON });
    }

    pub fn autoplay(&mut self) {
        match self.media.play() {
            Ok(()) => {
                self.awaiting_gesture = false;
                log::info!("background music started");
            }
            Err(PlaybackError::Blocked) => {
                log::info!("background music blocked until the first click")
            }
            Err(err) => log::warn!("background music unavailable: {}", err),
        }
    }

    /// Runs once, on the first click of the session.
    pub fn on_first_click(&mut self) {
        if !self.awaiting_gesture {
            return;
        }
        self.awaiting_gesture = false;
        if !self.media.is_paused() {
            return;
        }
        if let Err(err) = self.media.play() {
            log::info!("background music still not playing: {}", err);
        }
    }

    pub fn toggle_mute(&mut self, render: &mut dyn RenderTarget) {
        let muted = !self.media.is_muted();
        self.media.set_muted(muted);
        self.sync(render);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, Insert};
    use crate::headless::{HeadlessMedia, HeadlessRenderer};

    fn video_rig(media: HeadlessMedia) -> (HeadlessRenderer, VideoPlayer) {
        let mut r = HeadlessRenderer::new();
        let body = r.body();
        let mut spawn = |kind| r.create_element(body, kind, Insert::Last).unwrap();
        let elements = VideoElements {
            container: spawn(ElementKind::Container),
            video: spawn(ElementKind::Container),
            play_pause: spawn(ElementKind::Button),
            seek_bar: spawn(ElementKind::Container),
            volume_button: spawn(ElementKind::Button),
            volume_bar: spawn(ElementKind::Container),
        };
        (r, VideoPlayer::new(elements, Box::new(media)))
    }

    #[test]
    fn test_volume_icon() {
        assert_eq!(volume_icon(true, 1.0), MUTED_ICON);
        assert_eq!(volume_icon(false, 0.0), MUTED_ICON);
        assert_eq!(volume_icon(false, 0.8), LOUD_ICON);
        assert_eq!(volume_icon(false, 0.5), QUIET_ICON);
    }

    #[test]
    fn test_seek_percent_unknown_duration() {
        assert_eq!(seek_percent(3.0, f64::NAN), 0.0);
        assert_eq!(seek_percent(5.0, 20.0), 25.0);
    }

    #[test]
    fn test_toggle_play_pause() {
        let media = HeadlessMedia::new().with_duration(20.0);
        let (mut r, mut player) = video_rig(media.clone());
        player.toggle(&mut r);
        assert!(!media.snapshot().paused);
        assert_eq!(r.text(player.elements().play_pause), Some(PAUSE_LABEL));
        player.toggle(&mut r);
        assert!(media.snapshot().paused);
        assert_eq!(r.text(player.elements().play_pause), Some(PLAY_LABEL));
    }

    #[test]
    fn test_seek_and_time_update() {
        let media = HeadlessMedia::new().with_duration(40.0);
        let (mut r, mut player) = video_rig(media.clone());
        player.seek(50.0);
        assert_eq!(media.snapshot().current_time, 20.0);
        player.on_time_update(&mut r);
        assert_eq!(r.value(player.elements().seek_bar), Some(50.0));
    }

    #[test]
    fn test_seek_without_duration_is_ignored() {
        let media = HeadlessMedia::new();
        let (mut r, mut player) = video_rig(media.clone());
        player.seek(50.0);
        assert_eq!(media.snapshot().current_time, 0.0);
        player.on_time_update(&mut r);
        assert_eq!(r.value(player.elements().seek_bar), Some(0.0));
    }

    #[test]
    fn test_mute_key_needs_video_focus() {
        let media = HeadlessMedia::new();
        let (mut r, mut player) = video_rig(media.clone());
        player.on_key(Key::Char('m'), Focus::None, &mut r);
        assert!(!media.snapshot().muted);
        player.on_key(Key::Char('m'), Focus::Video, &mut r);
        assert!(media.snapshot().muted);
        assert_eq!(r.text(player.elements().volume_button), Some(MUTED_ICON));
    }

    #[test]
    fn test_space_prevents_default() {
        let media = HeadlessMedia::new();
        let (mut r, mut player) = video_rig(media.clone());
        assert_eq!(
            player.on_key(Key::Space, Focus::None, &mut r),
            EventResponse::Handled
        );
        assert!(!media.snapshot().paused);
    }

    #[test]
    fn test_music_retries_once_after_block() {
        let media = HeadlessMedia::new().blocked();
        let mut r = HeadlessRenderer::new();
        let body = r.body();
        let button = r.create_element(body, ElementKind::Button, Insert::Last).unwrap();
        let icon = r.create_element(button, ElementKind::Text, Insert::Last).unwrap();
        let mut music = MusicPlayer::new(Box::new(media.clone()), button, icon);

        music.autoplay();
        assert!(media.snapshot().paused);
        media.unblock();
        music.on_first_click();
        assert!(!media.snapshot().paused);
        music.on_first_click();
        assert_eq!(media.snapshot().play_attempts, 2);

        music.toggle_mute(&mut r);
        assert!(r.has_class(button, VisualClass::MUTED));
        assert_eq!(r.text(icon), Some(MUTED_ICON));
    }
}
