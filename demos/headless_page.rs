//! Plays a short scripted visit against the in-memory document, with real
//! timers from the calloop driver.
//!
//! ```sh
//! RUST_LOG=festoon=debug cargo run --example headless_page
//! ```

use std::time::Duration;

use festoon::headless::{HeadlessMedia, HeadlessRenderer};
use festoon::page::Rect;
use festoon::prelude::*;
use festoon::runtime::LoopDriver;

fn main() -> festoon::Result<()> {
    festoon::init_logging();

    let mut render = HeadlessRenderer::new();
    let body = render.body();
    let Some(elements) = PageElements::mount(&mut render, body) else {
        log::error!("could not build the page skeleton");
        return Ok(());
    };

    let music = HeadlessMedia::new().blocked();
    let video = HeadlessMedia::new().with_duration(42.0);
    let mut page = Page::new(PageConfig::default(), elements.clone())?
        .with_music(Box::new(music.clone()))
        .with_video(Box::new(video.clone()));

    let mut driver = LoopDriver::new(Duration::from_millis(16))?;

    let script = [
        PageEvent::Loaded {
            width: 1280.0,
            height: 800.0,
        },
        PageEvent::Click(Click {
            target: elements.open_button,
            x: 640.0,
            y: 420.0,
            bounds: Rect {
                left: 560.0,
                top: 400.0,
                width: 160.0,
                height: 48.0,
            },
        }),
        PageEvent::Scroll(900.0),
        PageEvent::Intersections(
            elements
                .memory_cards
                .iter()
                .map(|&card| IntersectionEntry::new(card, 0.6))
                .collect(),
        ),
        PageEvent::Input {
            target: elements.wish_input,
            text: "Happy birthday!".to_string(),
        },
        PageEvent::Click(Click::on(elements.submit_wish)),
        PageEvent::Click(Click::on(elements.video.play_pause)),
    ];

    for event in script {
        log::info!("host event: {:?}", event);
        if matches!(event, PageEvent::Click(_)) {
            // A click is a user gesture: browsers allow audible playback from here on.
            music.unblock();
        }
        page.handle(event, &mut Host::new(&mut render, driver.timers()));
        driver.run(&mut render, Duration::from_millis(400), |event, host| {
            page.dispatch(event, host)
        })?;
    }

    // Let the celebration and the reveals play out.
    driver.run(&mut render, Duration::from_secs(7), |event, host| {
        page.dispatch(event, host)
    })?;

    let revealed = elements
        .memory_cards
        .iter()
        .filter(|&&card| page.stage().watch_state(card) == Some(WatchState::Visible))
        .count();
    println!("overlay:        {:?}", page.overlay_state());
    println!("memory cards:   {}/{} revealed", revealed, elements.memory_cards.len());
    println!("wishes posted:  {}", page.wishes().posted());
    println!("music playing:  {}", !music.snapshot().paused);
    println!("video playing:  {}", !video.snapshot().paused);
    println!("live particles: {}", page.live_particles());
    println!("document nodes: {}", render.element_count());
    Ok(())
}
