use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use check_linux_netdev::cli::Cli;
use check_linux_netdev::config_generator::print_icinga_command_config_if_env_and_exit;
use check_linux_netdev::{Error, NetdevCheck, ProcNetDev, Resource, Runner, ServiceState};

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = print_icinga_command_config_if_env_and_exit("linux-netdev", &Cli::command()) {
        println!("{}: {}", ServiceState::Unknown, err);
        std::process::exit(ServiceState::Unknown.exit_code());
    }

    Runner::new()
        .on_error(|_: &Error| ServiceState::Unknown)
        .safe_run(do_check)
        .print_and_exit()
}

fn do_check() -> Result<Resource, Error> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => return Err(err.into()),
    };

    let check = NetdevCheck::new(cli.into_options())?;

    ignore_sigterm();

    check.run(&mut ProcNetDev::default(), std::thread::sleep)
}

/// SIGTERM is ignored for the rest of the run; other signals keep their default action.
fn ignore_sigterm() {
    // SAFETY: SIG_IGN is a valid disposition and no handler state is touched.
    unsafe {
        libc::signal(libc::SIGTERM, libc::SIG_IGN);
    }
}
