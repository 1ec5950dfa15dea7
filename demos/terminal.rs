//! Terminal Demo - A features carousel in the terminal.
//!
//! Drives a mounted carousel from a crossterm event loop:
//! - auto-advance with a live progress bar
//! - Left/Right arrows navigate, 1-9 jump to a slide
//! - `p` toggles a hover-style pause
//! - terminal focus loss pauses like a hidden tab
//! - `q` or Esc quits
//!
//! Run with: cargo run --example terminal

use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    event::{self, Event as TermEvent, KeyCode},
    execute,
    terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen},
};

use spark_carousel::{mount, CarouselConfig, PauseReasons, PlayState};

const SLIDES: [(&str, &str); 4] = [
    (
        "Campaign Creation",
        "Generate campaigns across every channel from one brief.",
    ),
    (
        "Cross-Channel Budgets",
        "Shift spend to whatever is performing right now.",
    ),
    (
        "Predictive Analytics",
        "See next week's numbers before they happen.",
    ),
    (
        "Plain-English Insights",
        "Ask questions, get answers, skip the dashboards.",
    ),
];

const BAR_WIDTH: usize = 32;

fn main() -> io::Result<()> {
    let config = CarouselConfig {
        dwell_interval: Duration::from_millis(3000),
        ..CarouselConfig::default()
    };
    let mut carousel = mount(SLIDES.len(), config).expect("config is valid");

    terminal::enable_raw_mode()?;
    let mut out = io::stdout();
    execute!(out, EnterAlternateScreen, Hide)?;

    let mut hover_paused = false;
    let result = run(&mut carousel, &mut out, &mut hover_paused);

    execute!(out, Show, LeaveAlternateScreen)?;
    terminal::disable_raw_mode()?;
    carousel.unmount();
    result
}

fn run(
    carousel: &mut spark_carousel::Carousel,
    out: &mut io::Stdout,
    hover_paused: &mut bool,
) -> io::Result<()> {
    loop {
        carousel.pump();
        draw(carousel, out)?;

        if !event::poll(Duration::from_millis(30))? {
            continue;
        }
        match event::read()? {
            TermEvent::Key(key) => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Left => carousel.previous(),
                KeyCode::Right => carousel.next(),
                KeyCode::Char('p') => {
                    if *hover_paused {
                        carousel.resume(PauseReasons::HOVER);
                    } else {
                        carousel.pause(PauseReasons::HOVER);
                    }
                    *hover_paused = !*hover_paused;
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    let slide = c.to_digit(10).unwrap() as usize;
                    if slide >= 1 {
                        // Out of range is a visible rejection, not a clamp.
                        let _ = carousel.go_to(slide - 1);
                    }
                }
                _ => {}
            },
            TermEvent::FocusLost => carousel.set_visible(false),
            TermEvent::FocusGained => carousel.set_visible(true),
            _ => {}
        }
    }
}

fn draw(carousel: &spark_carousel::Carousel, out: &mut io::Stdout) -> io::Result<()> {
    let snapshot = carousel.snapshot();
    let (title, body) = SLIDES[snapshot.active_index];

    let dots: String = (0..SLIDES.len())
        .map(|i| if i == snapshot.active_index { "● " } else { "○ " })
        .collect();

    let filled = (snapshot.progress * BAR_WIDTH as f32).round() as usize;
    let bar: String = "█".repeat(filled.min(BAR_WIDTH)) + &"░".repeat(BAR_WIDTH - filled.min(BAR_WIDTH));

    let state = match carousel.play_state() {
        PlayState::Playing => "playing",
        PlayState::Paused => "paused",
        PlayState::Idle => "idle",
    };

    execute!(out, MoveTo(0, 0), Clear(ClearType::All))?;
    write!(out, "{title}\r\n\r\n")?;
    write!(out, "{body}\r\n\r\n")?;
    write!(out, "{dots}\r\n")?;
    write!(out, "[{bar}] {state}\r\n\r\n")?;
    write!(out, "←/→ navigate   1-{} jump   p pause   q quit\r\n", SLIDES.len())?;
    out.flush()
}
