use std::path::PathBuf;

use anyhow::Context;
use stackfall_engine::{Action, Session};
use tracing::{debug, warn};

use crate::util;

use super::{FieldArg, SessionSummary};

#[derive(Default, Debug, Clone, clap::Args)]
pub(crate) struct RunArg {
    #[clap(flatten)]
    field: FieldArg,
    /// Action codes: `.` none, `<` `>` move, `v` soft drop, `V` hard drop,
    /// `)` `(` rotate, `h` hold
    #[arg(long, conflicts_with = "script_file")]
    script: Option<String>,
    /// Read the action codes from a file
    #[arg(long)]
    script_file: Option<PathBuf>,
    /// Print the field after every tick, not only at the end
    #[arg(long)]
    each_tick: bool,
    /// Print `x` for every occupied cell instead of its color
    #[arg(long)]
    plain: bool,
    /// Write a JSON summary instead of the field dump
    #[arg(long)]
    json: bool,
    /// JSON output path (stdout when omitted)
    #[arg(long, requires = "json")]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &RunArg) -> anyhow::Result<()> {
    let actions = match (&arg.script, &arg.script_file) {
        (Some(script), _) => Action::parse_script(script).context("Failed to parse --script")?,
        (None, Some(path)) => util::read_script_file(path)?,
        (None, None) => vec![],
    };
    let mut session = arg.field.new_session()?;

    for (tick, action) in actions.into_iter().enumerate() {
        if !session.is_running() {
            warn!(tick, "session is over, ignoring the rest of the script");
            break;
        }
        let report = session.tick(action)?;
        debug!(tick, %action, ?report);
        if arg.each_tick && !arg.json {
            println!("tick {tick}: {action}");
            print_field(&session, arg.plain);
            println!();
        }
    }

    if arg.json {
        util::write_json(&SessionSummary::new(&session), arg.output.as_deref())?;
    } else {
        print_field(&session, arg.plain);
        super::print_status(&session);
    }
    Ok(())
}

fn print_field(session: &Session, plain: bool) {
    if plain {
        print!("{}", session.field());
    } else {
        print!("{}", session.field().to_color_string());
    }
}
