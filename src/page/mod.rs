//! The greeting page built on top of the [`Stage`].
//!
//! [`Page`] owns the reveal stage plus the page's own features: navigation,
//! parallax, the wish board, media controls, the opening overlay and the
//! particle effects. Hosts translate their native input into [`PageEvent`]s
//! and feed fired timers back through [`Page::dispatch`].
//!
//! ## Timers
//!
//! Page features arm timers with [`Timeout::Page`]. The page routes those to
//! itself; every other timeout goes to the stage.

mod media;
mod navigation;
mod overlay;
mod parallax;
mod particles;
mod wishes;

use std::time::Duration;

pub use media::{seek_percent, volume_icon, MusicPlayer, VideoElements, VideoPlayer};
pub use navigation::{NavLink, NavbarScroll, Navigation};
pub use overlay::{Overlay, OverlayState};
pub use parallax::{LayoutMode, Parallax};
pub use particles::{ParticleConfig, Particles, Rect, CONFETTI_PALETTE, FIREWORK_PALETTE};
pub use wishes::WishBoard;

use crate::animation::{Transform, Transition};
use crate::element::{ElementId, ElementKind, Insert, VisualClass};
use crate::error::{Error, Result};
use crate::host::{Event, Host, IntersectionEntry, MediaHandle, RenderTarget, Timeout};
use crate::sequencer::{RevealConfig, Stagger};
use crate::stage::{Stage, StageConfig};
use crate::style::{Motion, Style};
use crate::throttle::{SampleChannel, ViewportSample};

/// Timers armed by page features.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PageTimer {
    PlaceholderAppear(usize),
    BalloonRestart(usize),
    BalloonSettle(usize),
    OverlayHide,
    OverlayUnlock,
    Celebrate,
    FireworkLaunch(u8),
    ParticleExpire(ElementId),
    HeartbeatTick,
    HeartbeatEnd(usize),
    ConfettiTick,
    MusicAutoplay,
}

/// Whether the host should suppress its default action for an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventResponse {
    Ignored,
    Handled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Space,
    Enter,
    Char(char),
    Other,
}

/// Which input owns the keyboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    None,
    Video,
    WishInput,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Click {
    pub target: ElementId,
    pub x: f32,
    pub y: f32,
    /// Bounds of `target`
    pub bounds: Rect,
}

impl Click {
    pub fn on(target: ElementId) -> Self {
        Self {
            target,
            x: 0.0,
            y: 0.0,
            bounds: Rect::default(),
        }
    }
}

/// Input from the host, already resolved to page elements.
#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent {
    Loaded { width: f32, height: f32 },
    Scroll(f32),
    Resize { width: f32, height: f32 },
    Intersections(Vec<IntersectionEntry>),
    Click(Click),
    /// Text typed into an input
    Input { target: ElementId, text: String },
    /// A range input moved (seek bar 0–100, volume 0–1)
    Range { target: ElementId, value: f32 },
    KeyDown { key: Key, focus: Focus },
    HoverStart(ElementId),
    HoverEnd(ElementId),
    PressStart(ElementId),
    PressEnd(ElementId),
    VideoPlayed,
    VideoPaused,
    VideoTimeUpdate,
    ContextMenu(ElementId),
}

#[derive(Clone, Debug, PartialEq)]
pub struct PageConfig {
    pub stage: StageConfig,
    pub navbar_threshold: f32,
    pub mobile_breakpoint: f32,
    pub anchor_offset: f32,
    pub parallax_step: f32,
    pub sections: RevealConfig,
    pub memory_cards: RevealConfig,
    pub title: RevealConfig,
    pub wishes: RevealConfig,
    pub placeholder_stagger: Stagger,
    pub balloon_restart: Duration,
    pub balloon_bounce: Duration,
    pub overlay_button_delay: Duration,
    pub overlay_fade: Duration,
    pub celebration_delay: Duration,
    pub music_autoplay_delay: Duration,
    pub heartbeat_period: Duration,
    pub confetti_period: Duration,
    pub confetti_chance: f64,
    pub click_confetti_chance: f64,
    pub particles: ParticleConfig,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            stage: StageConfig::default(),
            navbar_threshold: 50.0,
            mobile_breakpoint: 768.0,
            anchor_offset: 80.0,
            parallax_step: 0.5,
            sections: RevealConfig::default().classes(VisualClass::ANIMATED),
            memory_cards: RevealConfig::default()
                .stagger(Stagger::Random {
                    max: Duration::from_millis(500),
                })
                .settle(Duration::from_millis(100))
                .classes(VisualClass::ANIMATED | VisualClass::HOVER_GROW | VisualClass::APPEAR),
            title: RevealConfig::default()
                .offset(0.0, -20.0)
                .duration(Duration::from_secs(1))
                .settle(Duration::from_millis(300))
                .classes(VisualClass::RAINBOW_TEXT | VisualClass::GLOW),
            wishes: RevealConfig::default()
                .offset(-20.0, 0.0)
                .duration(Duration::from_millis(300))
                .settle(Duration::from_millis(10))
                .classes(VisualClass::empty()),
            placeholder_stagger: Stagger::Indexed {
                base: Duration::from_millis(300),
                step: Duration::from_millis(100),
            },
            balloon_restart: Duration::from_millis(10),
            balloon_bounce: Duration::from_millis(300),
            overlay_button_delay: Duration::from_millis(300),
            overlay_fade: Duration::from_millis(1200),
            celebration_delay: Duration::from_millis(300),
            music_autoplay_delay: Duration::from_millis(500),
            heartbeat_period: Duration::from_millis(3000),
            confetti_period: Duration::from_millis(5000),
            confetti_chance: 0.3,
            click_confetti_chance: 0.1,
            particles: ParticleConfig::default(),
        }
    }
}

impl PageConfig {
    pub fn stage(mut self, stage: StageConfig) -> Self {
        self.stage = stage;
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.stage.seed = Some(seed);
        self
    }

    pub fn confetti_chance(mut self, chance: f64) -> Self {
        self.confetti_chance = chance;
        self
    }

    pub fn click_confetti_chance(mut self, chance: f64) -> Self {
        self.click_confetti_chance = chance;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.mobile_breakpoint.is_finite() && self.mobile_breakpoint > 0.0) {
            return Err(Error::config(format!(
                "mobile breakpoint must be positive, got {}",
                self.mobile_breakpoint
            )));
        }
        for (name, chance) in [
            ("confetti chance", self.confetti_chance),
            ("click confetti chance", self.click_confetti_chance),
        ] {
            if !(0.0..=1.0).contains(&chance) {
                return Err(Error::config(format!(
                    "{} must be within [0, 1], got {}",
                    name, chance
                )));
            }
        }
        if self.heartbeat_period.is_zero() || self.confetti_period.is_zero() {
            return Err(Error::config("periodic effects need a non-zero period"));
        }
        for reveal in [&self.sections, &self.memory_cards, &self.title, &self.wishes] {
            reveal.validate()?;
        }
        self.particles.validate()
    }
}

/// Handles to every element the page drives.
#[derive(Clone, Debug, PartialEq)]
pub struct PageElements {
    pub body: ElementId,
    pub overlay: ElementId,
    pub open_button: ElementId,
    pub navbar: ElementId,
    pub nav_menu: ElementId,
    pub hamburger: ElementId,
    pub nav_links: Vec<NavLink>,
    pub hero: ElementId,
    pub title: ElementId,
    pub floating: Vec<ElementId>,
    pub particles: Vec<ElementId>,
    pub balloons: Vec<ElementId>,
    pub sections: Vec<ElementId>,
    pub photo_placeholders: Vec<ElementId>,
    pub memory_cards: Vec<ElementId>,
    pub wish_input: ElementId,
    pub submit_wish: ElementId,
    pub wishes_display: ElementId,
    pub video: VideoElements,
    pub mute_button: ElementId,
    pub mute_icon: ElementId,
}

const SECTION_HEIGHT: f32 = 800.0;

impl PageElements {
    /// Build the page skeleton under `body`. Returns `None` if `body` is not
    /// in the document.
    pub fn mount(render: &mut dyn RenderTarget, body: ElementId) -> Option<Self> {
        let mut spawn = |parent: ElementId, kind: ElementKind| {
            render.create_element(parent, kind, Insert::Last)
        };

        let overlay = spawn(body, ElementKind::Container)?;
        let open_button = spawn(overlay, ElementKind::Button)?;

        let navbar = spawn(body, ElementKind::Container)?;
        let hamburger = spawn(navbar, ElementKind::Button)?;
        let nav_menu = spawn(navbar, ElementKind::Container)?;

        let hero = spawn(body, ElementKind::Section)?;
        let title = spawn(hero, ElementKind::Text)?;
        let floating = (0..3)
            .map(|_| spawn(hero, ElementKind::Container))
            .collect::<Option<Vec<_>>>()?;
        let particles = (0..6)
            .map(|_| spawn(hero, ElementKind::Container))
            .collect::<Option<Vec<_>>>()?;
        let balloons = (0..5)
            .map(|_| spawn(hero, ElementKind::Container))
            .collect::<Option<Vec<_>>>()?;

        let photos = spawn(body, ElementKind::Section)?;
        let photo_placeholders = (0..4)
            .map(|_| spawn(photos, ElementKind::Card))
            .collect::<Option<Vec<_>>>()?;

        let memories = spawn(body, ElementKind::Section)?;
        let memory_cards = (0..6)
            .map(|_| spawn(memories, ElementKind::Card))
            .collect::<Option<Vec<_>>>()?;

        let video_section = spawn(body, ElementKind::Section)?;
        let container = spawn(video_section, ElementKind::Container)?;
        let video = VideoElements {
            container,
            video: spawn(container, ElementKind::Container)?,
            play_pause: spawn(container, ElementKind::Button)?,
            seek_bar: spawn(container, ElementKind::Container)?,
            volume_button: spawn(container, ElementKind::Button)?,
            volume_bar: spawn(container, ElementKind::Container)?,
        };

        let wishes_section = spawn(body, ElementKind::Section)?;
        let wish_input = spawn(wishes_section, ElementKind::Text)?;
        let submit_wish = spawn(wishes_section, ElementKind::Button)?;
        let wishes_display = spawn(wishes_section, ElementKind::Container)?;

        let mute_button = spawn(body, ElementKind::Button)?;
        let mute_icon = spawn(mute_button, ElementKind::Text)?;

        let sections = vec![photos, memories, video_section, wishes_section];
        let mut nav_links = Vec::with_capacity(sections.len() + 1);
        for (i, _) in std::iter::once(hero).chain(sections.iter().copied()).enumerate() {
            nav_links.push(NavLink {
                link: spawn(nav_menu, ElementKind::Text)?,
                section_top: i as f32 * SECTION_HEIGHT,
            });
        }

        Some(Self {
            body,
            overlay,
            open_button,
            navbar,
            nav_menu,
            hamburger,
            nav_links,
            hero,
            title,
            floating,
            particles,
            balloons,
            sections,
            photo_placeholders,
            memory_cards,
            wish_input,
            submit_wish,
            wishes_display,
            video,
            mute_button,
            mute_icon,
        })
    }

    /// Elements that grow under the pointer.
    pub fn hover_targets(&self) -> impl Iterator<Item = ElementId> + '_ {
        [
            self.open_button,
            self.hamburger,
            self.submit_wish,
            self.video.play_pause,
            self.video.volume_button,
            self.mute_button,
        ]
        .into_iter()
        .chain(self.photo_placeholders.iter().copied())
        .chain(self.memory_cards.iter().copied())
    }
}

pub struct Page {
    config: PageConfig,
    elements: PageElements,
    stage: Stage,
    navigation: Navigation,
    wishes: WishBoard,
    overlay: Overlay,
    particles: Particles,
    video: Option<VideoPlayer>,
    music: Option<MusicPlayer>,
    viewport: (f32, f32),
    loaded: bool,
}

impl Page {
    /// Validates `config`, registers the sections and memory cards for
    /// reveal and hooks up the scroll/resize consumers.
    pub fn new(config: PageConfig, elements: PageElements) -> Result<Self> {
        config.validate()?;
        let mut stage = Stage::with_config(config.stage.clone())?;
        let threshold = config.stage.threshold;
        for &section in &elements.sections {
            stage.register_with(section, threshold, config.sections.clone())?;
        }
        for &card in &elements.memory_cards {
            stage.register_with(card, threshold, config.memory_cards.clone())?;
        }

        stage.subscribe(
            SampleChannel::Scroll,
            Box::new(NavbarScroll::new(elements.navbar, config.navbar_threshold)),
        );
        stage.subscribe(
            SampleChannel::Scroll,
            Box::new(Parallax::new(elements.floating.clone(), config.parallax_step)),
        );
        stage.subscribe(
            SampleChannel::Resize,
            Box::new(LayoutMode::new(
                elements.floating.clone(),
                elements.particles.clone(),
                elements.balloons.clone(),
                config.mobile_breakpoint,
            )),
        );

        let navigation = Navigation::new(
            elements.nav_menu,
            elements.hamburger,
            elements.nav_links.clone(),
            config.mobile_breakpoint,
            config.anchor_offset,
        );
        let wishes = WishBoard::new(
            elements.wish_input,
            elements.wishes_display,
            config.wishes.clone(),
        );
        let overlay = Overlay::new(
            elements.overlay,
            elements.open_button,
            elements.body,
            config.overlay_button_delay,
            config.overlay_fade,
        );
        let particles = Particles::new(
            config.particles.clone(),
            config.stage.seed.map(|seed| seed.wrapping_add(1)),
        );

        Ok(Self {
            config,
            elements,
            stage,
            navigation,
            wishes,
            overlay,
            particles,
            video: None,
            music: None,
            viewport: (0.0, 0.0),
            loaded: false,
        })
    }

    pub fn with_video(mut self, media: Box<dyn MediaHandle>) -> Self {
        self.video = Some(VideoPlayer::new(self.elements.video, media));
        self
    }

    pub fn with_music(mut self, media: Box<dyn MediaHandle>) -> Self {
        self.music = Some(MusicPlayer::new(
            media,
            self.elements.mute_button,
            self.elements.mute_icon,
        ));
        self
    }

    pub fn config(&self) -> &PageConfig {
        &self.config
    }

    pub fn elements(&self) -> &PageElements {
        &self.elements
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    pub fn overlay_state(&self) -> OverlayState {
        self.overlay.state()
    }

    pub fn wishes(&self) -> &WishBoard {
        &self.wishes
    }

    pub fn live_particles(&self) -> usize {
        self.particles.live()
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }

    /// Feed core events: fired timers and raw samples.
    pub fn dispatch(&mut self, event: Event, host: &mut Host<'_>) {
        match event {
            Event::TimerFired {
                timeout: Timeout::Page(timer),
                ..
            } => self.on_page_timer(timer, host),
            event => self.stage.dispatch(event, host),
        }
    }

    pub fn handle(&mut self, event: PageEvent, host: &mut Host<'_>) -> EventResponse {
        match self.try_handle(event, host) {
            Ok(response) => response,
            Err(err) => {
                log::warn!("page event failed: {}", err);
                EventResponse::Ignored
            }
        }
    }

    fn try_handle(&mut self, event: PageEvent, host: &mut Host<'_>) -> Result<EventResponse> {
        match event {
            PageEvent::Loaded { width, height } => self.on_loaded(width, height, host)?,
            PageEvent::Scroll(offset) => {
                let sample = ViewportSample::scroll(host.now(), offset);
                self.stage.dispatch(Event::RawSample(sample), host);
            }
            PageEvent::Resize { width, height } => {
                self.viewport = (width, height);
                self.navigation.on_resize(width, &mut *host.render);
                let sample = ViewportSample::resize(host.now(), width, height);
                self.stage.dispatch(Event::RawSample(sample), host);
            }
            PageEvent::Intersections(entries) => self.stage.handle_intersections(entries, host),
            PageEvent::Click(click) => return self.on_click(click, host),
            PageEvent::Input { target, text } => {
                if target == self.elements.wish_input {
                    self.wishes.set_draft(text);
                }
            }
            PageEvent::Range { target, value } => {
                if let Some(video) = self.video.as_mut() {
                    if target == self.elements.video.seek_bar {
                        video.seek(value);
                    } else if target == self.elements.video.volume_bar {
                        video.set_volume(value, &mut *host.render);
                    }
                }
            }
            PageEvent::KeyDown { key, focus } => return self.on_key(key, focus, host),
            PageEvent::HoverStart(target) => self.on_hover(target, true, host.render),
            PageEvent::HoverEnd(target) => {
                self.on_hover(target, false, host.render);
                if target == self.elements.submit_wish {
                    host.render
                        .set_style(target, &Style::new().transform(Transform::IDENTITY));
                }
            }
            PageEvent::PressStart(target) => {
                if target == self.elements.submit_wish {
                    host.render
                        .set_style(target, &Style::new().transform(Transform::scale(0.95)));
                }
            }
            PageEvent::PressEnd(target) => {
                if target == self.elements.submit_wish {
                    host.render
                        .set_style(target, &Style::new().transform(Transform::IDENTITY));
                }
            }
            PageEvent::VideoPlayed => {
                if let Some(video) = &self.video {
                    video.on_played(&mut *host.render);
                }
            }
            PageEvent::VideoPaused => {
                if let Some(video) = &self.video {
                    video.on_paused(&mut *host.render);
                }
            }
            PageEvent::VideoTimeUpdate => {
                if let Some(video) = &self.video {
                    video.on_time_update(&mut *host.render);
                }
            }
            PageEvent::ContextMenu(target) => {
                if self.elements.photo_placeholders.contains(&target) {
                    return Ok(EventResponse::Handled);
                }
            }
        }
        Ok(EventResponse::Ignored)
    }

    fn on_loaded(&mut self, width: f32, height: f32, host: &mut Host<'_>) -> Result<()> {
        if self.loaded {
            log::debug!("page already loaded");
            return Ok(());
        }
        self.loaded = true;
        self.viewport = (width, height);
        log::info!("page loaded at {}x{}", width, height);

        self.overlay.on_loaded(&mut *host.render);
        self.navigation.on_resize(width, &mut *host.render);
        let sample = ViewportSample::resize(host.now(), width, height);
        self.stage.dispatch(Event::RawSample(sample), host);

        self.stage
            .reveal(self.elements.title, self.config.title.clone(), host)?;

        for (i, &placeholder) in self.elements.photo_placeholders.iter().enumerate() {
            host.render.add_class(placeholder, VisualClass::FADE_IN);
            let delay = self.config.placeholder_stagger.delay(i, self.particles.rng());
            host.timers
                .schedule(delay, Timeout::Page(PageTimer::PlaceholderAppear(i)));
        }

        if let Some(video) = &self.video {
            video.sync(&mut *host.render);
        }
        if let Some(music) = &self.music {
            music.sync(&mut *host.render);
            host.timers.schedule(
                self.config.music_autoplay_delay,
                Timeout::Page(PageTimer::MusicAutoplay),
            );
        }

        host.timers.schedule(
            self.config.heartbeat_period,
            Timeout::Page(PageTimer::HeartbeatTick),
        );
        host.timers.schedule(
            self.config.confetti_period,
            Timeout::Page(PageTimer::ConfettiTick),
        );
        Ok(())
    }

    fn on_click(&mut self, click: Click, host: &mut Host<'_>) -> Result<EventResponse> {
        if let Some(music) = self.music.as_mut() {
            music.on_first_click();
        }
        if self.particles.roll(self.config.click_confetti_chance) {
            self.particles
                .confetti(self.elements.hero, self.viewport.1, host);
        }

        let target = click.target;
        if target == self.elements.open_button {
            if self.overlay.state() == OverlayState::Shown {
                self.particles
                    .ripple(target, click.x, click.y, click.bounds, host);
            }
            self.overlay.open(host);
        } else if target == self.elements.hamburger {
            self.navigation.toggle(&mut *host.render);
        } else if self.navigation.is_link(target) {
            self.navigation.on_link_click(target, &mut *host.render);
            return Ok(EventResponse::Handled);
        } else if target == self.elements.submit_wish {
            self.wishes.submit(&mut self.stage, host)?;
        } else if target == self.elements.video.play_pause {
            if let Some(video) = self.video.as_mut() {
                video.toggle(&mut *host.render);
            }
        } else if target == self.elements.video.volume_button {
            if let Some(video) = self.video.as_mut() {
                video.toggle_mute(&mut *host.render);
            }
        } else if target == self.elements.mute_button {
            if let Some(music) = self.music.as_mut() {
                music.toggle_mute(&mut *host.render);
            }
        } else if let Some(index) = self.elements.balloons.iter().position(|&b| b == target) {
            self.bounce_balloon(index, host);
        }
        Ok(EventResponse::Ignored)
    }

    fn on_key(&mut self, key: Key, focus: Focus, host: &mut Host<'_>) -> Result<EventResponse> {
        if key == Key::Enter && focus == Focus::WishInput {
            self.wishes.submit(&mut self.stage, host)?;
            return Ok(EventResponse::Ignored);
        }
        if focus == Focus::WishInput {
            return Ok(EventResponse::Ignored);
        }
        let response = match self.video.as_mut() {
            Some(video) => video.on_key(key, focus, &mut *host.render),
            None => EventResponse::Ignored,
        };
        if key == Key::Space {
            self.particles
                .confetti(self.elements.hero, self.viewport.1, host);
        }
        Ok(response)
    }

    fn on_hover(&mut self, target: ElementId, entering: bool, render: &mut dyn RenderTarget) {
        if self.elements.hover_targets().any(|el| el == target) {
            if entering {
                render.add_class(target, VisualClass::HOVER_GROW);
            } else {
                render.remove_class(target, VisualClass::HOVER_GROW);
            }
        }
        if self.elements.photo_placeholders.contains(&target) {
            let lift = if entering {
                Style::new()
                    .transform(Transform::translate_y(-10.0).with_scale(1.03))
                    .transition(Transition::ease(Duration::from_millis(300)))
            } else {
                Style::new().transform(Transform::IDENTITY)
            };
            render.set_style(target, &lift);
        }
    }

    fn bounce_balloon(&mut self, index: usize, host: &mut Host<'_>) {
        let balloon = self.elements.balloons[index];
        host.render.set_style(
            balloon,
            &Style::new()
                .motion(Motion::Off)
                .transform(Transform::scale(1.2)),
        );
        host.timers.schedule(
            self.config.balloon_restart,
            Timeout::Page(PageTimer::BalloonRestart(index)),
        );
        host.timers.schedule(
            self.config.balloon_bounce,
            Timeout::Page(PageTimer::BalloonSettle(index)),
        );
    }

    fn on_page_timer(&mut self, timer: PageTimer, host: &mut Host<'_>) {
        log::trace!("page timer {:?}", timer);
        match timer {
            PageTimer::PlaceholderAppear(i) => {
                if let Some(&placeholder) = self.elements.photo_placeholders.get(i) {
                    host.render.add_class(placeholder, VisualClass::APPEAR);
                }
            }
            PageTimer::BalloonRestart(i) => {
                if let Some(&balloon) = self.elements.balloons.get(i) {
                    host.render
                        .set_style(balloon, &Style::new().motion(Motion::Default));
                }
            }
            PageTimer::BalloonSettle(i) => {
                if let Some(&balloon) = self.elements.balloons.get(i) {
                    host.render
                        .set_style(balloon, &Style::new().transform(Transform::IDENTITY));
                }
            }
            PageTimer::OverlayHide => {
                if self.overlay.hide(host) {
                    host.timers.schedule(
                        self.config.celebration_delay,
                        Timeout::Page(PageTimer::Celebrate),
                    );
                }
            }
            PageTimer::OverlayUnlock => self.overlay.unlock(&mut *host.render),
            PageTimer::Celebrate => {
                log::info!("celebration!");
                self.particles.schedule_fireworks(host);
                self.particles
                    .confetti(self.elements.hero, self.viewport.1, host);
            }
            PageTimer::FireworkLaunch(_) => {
                self.particles
                    .launch_firework(self.elements.body, self.viewport, host);
            }
            PageTimer::ParticleExpire(element) => {
                self.particles.expire(element, &mut *host.render);
            }
            PageTimer::HeartbeatTick => {
                self.particles.heartbeat(&self.elements.balloons, host);
                host.timers.schedule(
                    self.config.heartbeat_period,
                    Timeout::Page(PageTimer::HeartbeatTick),
                );
            }
            PageTimer::HeartbeatEnd(i) => {
                if let Some(&balloon) = self.elements.balloons.get(i) {
                    host.render.remove_class(balloon, VisualClass::HEARTBEAT);
                }
            }
            PageTimer::ConfettiTick => {
                if self.particles.roll(self.config.confetti_chance) {
                    self.particles
                        .confetti(self.elements.hero, self.viewport.1, host);
                }
                host.timers.schedule(
                    self.config.confetti_period,
                    Timeout::Page(PageTimer::ConfettiTick),
                );
            }
            PageTimer::MusicAutoplay => {
                if let Some(music) = self.music.as_mut() {
                    music.autoplay();
                }
            }
        }
    }
}
