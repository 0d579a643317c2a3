use std::sync::Arc;

use anyhow::{bail, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use dashboards_reporting::cli::{normalize, Cli, Command};
use dashboards_reporting::notify::ConsoleNotifier;
use dashboards_reporting::{commands, dispatch, util};

fn init_logging(verbose: u8) {
  let default_level = match verbose {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  let _ = fmt().with_env_filter(filter).with_writer(std::io::stderr).try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  init_logging(cli.verbose);

  let out = match cli.command {
    Some(Command::Generate(args)) => {
      let cfg = normalize(args)?;
      let transport = dispatch::build_transport();
      commands::generate(&cfg, transport, Arc::new(ConsoleNotifier::default())).await?
    }
    Some(Command::Preview(args)) => commands::preview(&normalize(args)?)?,
    Some(Command::Action(args)) => commands::action(&args, std::io::stdin().lock())?,
    None => bail!("Provide a subcommand: generate, preview or action"),
  };

  println!("{}", serde_json::to_string_pretty(&out)?);

  Ok(())
}
