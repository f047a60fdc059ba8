use clap::Parser;
use clap::error::ErrorKind;

use common::telemetry::init_telemetry;

use cntrmap::command::report::{ReportArgs, USAGE_ARGS, report};

fn exit_with_usage(detail: Option<&str>) -> ! {
    let progname = std::env::args().next().unwrap_or_else(|| "cntrmap".to_string());
    eprintln!("Usage: {progname} {USAGE_ARGS}");
    if let Some(detail) = detail {
        eprintln!("        {detail}");
    }
    std::process::exit(1);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_telemetry("cntrmap");

    let args = match ReportArgs::try_parse() {
        Ok(args) => args,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let rendered = e.to_string();
            exit_with_usage(rendered.lines().next());
        }
    };

    let volumes = match args.volume_names() {
        Ok(volumes) => volumes,
        Err(e) => exit_with_usage(Some(&e.to_string())),
    };

    report(&args, &volumes).await?;

    Ok(())
}
