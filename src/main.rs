use std::process::ExitCode;

use avatar_core::app::Session;
use avatar_core::engine::time::FIXED_DT;
use avatar_core::scene::{demo_script, AvatarKind, AvatarRoster};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "avatar_core", about = "Headless avatar controller session")]
struct Args {
    /// Avatar variant to manifest
    #[arg(long, value_enum, default_value = "balanced")]
    avatar: AvatarKind,

    /// Fixed ticks to simulate (60 per second)
    #[arg(long, default_value_t = 600)]
    ticks: u32,

    /// Render frame length in milliseconds fed to the fixed-step accumulator
    #[arg(long, default_value_t = 1000.0 / 60.0)]
    frame_ms: f32,

    /// Override the variant's air dash count
    #[arg(long)]
    air_dashes: Option<u32>,

    /// Log filter, e.g. "info" or "avatar_core=debug"
    #[arg(long, default_value = "info")]
    log: String,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(EnvFilter::new(&args.log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut roster = AvatarRoster::standard();
    if let (Some(dashes), Some(template)) = (args.air_dashes, roster.get_mut(args.avatar)) {
        template.locomotion.max_air_dashes = dashes;
    }

    let mut session = match Session::new(&roster, args.avatar, demo_script()) {
        Ok(session) => session,
        Err(e) => {
            error!("setup failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    let frame_dt = (args.frame_ms / 1000.0).max(FIXED_DT * 0.1);
    while session.ticks() < args.ticks {
        if let Err(e) = session.advance_frame(frame_dt) {
            error!(tick = session.ticks(), "session aborted: {e}");
            return ExitCode::FAILURE;
        }
    }

    let report = session.finish();
    info!(
        ticks = report.ticks,
        transitions = report.transitions.len(),
        rejections = report.rejections.len(),
        "session finished"
    );
    ExitCode::SUCCESS
}
