use std::path::PathBuf;

use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;
use stackfall_engine::Action;
use tracing::info;

use crate::util;

use super::{FieldArg, SessionSummary};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct SoakArg {
    #[clap(flatten)]
    pub(super) field: FieldArg,
    /// Seed of the action generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Stop after this many ticks even if the session is still running
    #[arg(long, default_value_t = 10_000)]
    max_ticks: usize,
    /// Write a JSON summary instead of the field dump
    #[arg(long)]
    json: bool,
    /// JSON output path (stdout when omitted)
    #[arg(long, requires = "json")]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &SoakArg) -> anyhow::Result<()> {
    let mut rng = Pcg32::seed_from_u64(arg.seed);
    let mut session = arg.field.new_session()?;

    while session.is_running() && session.stats().ticks() < arg.max_ticks {
        let action = Action::ALL[rng.random_range(0..Action::ALL.len())];
        session.tick(action)?;
    }
    info!(
        seed = arg.seed,
        ticks = session.stats().ticks(),
        score = session.score(),
        "soak finished"
    );

    if arg.json {
        util::write_json(&SessionSummary::new(&session), arg.output.as_deref())?;
    } else {
        print!("{}", session.field().to_color_string());
        super::print_status(&session);
    }
    Ok(())
}
