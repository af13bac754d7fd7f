// What you SEE:
// • One or two gold scratch cards, each with a title above it.
// • Hold Left Mouse and drag over a card to scratch the gold away.
// • Clear more than half of a card: the gold vanishes and a badge appears.
// • Revealing the last card streams confetti in from both sides for three seconds.
// • R remounts every card (fresh gold). ESC quits.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context as _;
use clap::Parser;
use image::RgbaImage;
use tracing_subscriber::EnvFilter;

use scratch_reveal::config::{
    DEFAULT_BRUSH_RADIUS, DEFAULT_HEIGHT, DEFAULT_SPECKS, DEFAULT_THRESHOLD, DEFAULT_WIDTH,
};
use scratch_reveal::draw::Drawer;
use scratch_reveal::types::FrameBuffer;
use scratch_reveal::{
    Board, BoardLayout, CardProps, CoverageStrategy, InputKind, PointerEvent, Reveal, ScratchConfig,
    card,
};

#[derive(Parser, Debug)]
#[command(name = "scratch-reveal", version, about = "Scratch-to-reveal cards in a window")]
struct Cli {
    /// Surface width in pixels.
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    width: u32,

    /// Surface height in pixels.
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    height: u32,

    /// Erase brush radius in surface pixels.
    #[arg(long, default_value_t = DEFAULT_BRUSH_RADIUS)]
    brush_radius: f32,

    /// Cleared fraction that must be exceeded to reveal the card.
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    threshold: f32,

    /// Number of texture specks on the overlay.
    #[arg(long, default_value_t = DEFAULT_SPECKS)]
    specks: usize,

    /// Seed for speck placement (random when omitted).
    #[arg(long)]
    seed: Option<u64>,

    /// How coverage is counted after each stroke.
    #[arg(long, value_enum, default_value_t = CoverageStrategy::FullScan)]
    strategy: CoverageStrategy,

    /// Title shown above the first card.
    #[arg(long, default_value = "A Little Surprise")]
    title: String,

    /// Subtitle shown under the title.
    #[arg(long, default_value = "Scratch the gold")]
    subtitle: String,

    /// Picture to reveal under the first card (a message is shown otherwise).
    #[arg(long)]
    reveal: Option<PathBuf>,

    /// How many independent cards to show side by side.
    #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(1..=2))]
    cards: u8,

    /// Display scale of each card relative to its surface.
    #[arg(long, default_value_t = 1.0)]
    scale: f32,
}

impl Cli {
    fn config(&self, seed: u64) -> ScratchConfig {
        ScratchConfig {
            width: self.width,
            height: self.height,
            brush_radius: self.brush_radius,
            threshold: self.threshold,
            specks: self.specks,
            seed,
            strategy: self.strategy,
            ..ScratchConfig::default()
        }
    }
}

fn completion_logger(name: &'static str) -> scratch_reveal::CompletionCallback {
    Box::new(move || tracing::info!(card = name, "revealed"))
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or_else(rand::random);

    /* --- Board setup ---
       Visual: cards laid out left to right with a header above each. */
    let mut board = Board::new(BoardLayout { scale: cli.scale, ..BoardLayout::default() });

    let first_reveal = match &cli.reveal {
        Some(path) => Reveal::Image(card::load_reveal(path).context("loading reveal picture")?),
        None => Reveal::Message("HAPPY BIRTHDAY!".into()),
    };
    board
        .add_card(
            CardProps {
                title: cli.title.clone(),
                subtitle: cli.subtitle.clone(),
                reveal: first_reveal,
                on_complete: Some(completion_logger("first")),
                // With two cards only the second one sets off the confetti.
                celebrate: cli.cards == 1,
            },
            cli.config(seed),
        )
        .context("creating first card")?;

    if cli.cards > 1 {
        board
            .add_card(
                CardProps {
                    title: "One More".into(),
                    subtitle: "Keep scratching".into(),
                    reveal: Reveal::Message("MAKE A WISH".into()),
                    on_complete: Some(completion_logger("second")),
                    celebrate: true,
                },
                cli.config(seed.wrapping_add(1)),
            )
            .context("creating second card")?;
    }
    board.mount_all();

    let (w, h) = board.size();
    let mut drawer = Drawer::new("Scratch to Reveal", w as usize, h as usize).context("opening window")?;
    let mut canvas = RgbaImage::new(w, h);
    let mut screen = FrameBuffer::new(w as usize, h as usize);

    let mut was_down = false;
    let mut last_pos: Option<(f32, f32)> = None;
    let mut last_frame_time = Instant::now();

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        let now = Instant::now();
        let dt = (now - last_frame_time).as_secs_f32();
        last_frame_time = now;

        /* 1) Inputs → pointer events (press on card, move, release anywhere). */
        if drawer.r_pressed_once() {
            board.mount_all(); // visual: fresh gold on every card
        }

        let down = drawer.left_mouse_down();
        let pos = drawer.mouse_pos();
        if let Some((mx, my)) = pos {
            let ev = PointerEvent::mouse(mx, my);
            if down && !was_down {
                board.dispatch(InputKind::Down, &ev);
            } else if down && pos != last_pos {
                board.dispatch(InputKind::Move, &ev);
            }
        }
        if !down && was_down {
            let (mx, my) = pos.unwrap_or((-1.0, -1.0));
            board.dispatch(InputKind::Up, &PointerEvent::mouse(mx, my));
        }
        was_down = down;
        last_pos = pos;

        /* 2) Draw headers, cards and confetti, then present. */
        board.render(&mut canvas, dt);
        screen.copy_from_rgba(&canvas);
        drawer.present(&screen)?;
    }

    Ok(())
}
