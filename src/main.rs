use clap::Parser;
use miette::Result;
use stk::cli::{Cli, Commands};

fn main() -> Result<()> {
    // Reset SIGPIPE so piping into `head` exits quietly instead of panicking
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    // Usage errors exit with 1; --help and --version keep clap's exit code
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            std::process::exit(1);
        }
        Err(e) => e.exit(),
    };
    let global = cli.global;

    match cli.command {
        Commands::Report(args) => stk::cli::commands::report::run(args, &global),
        Commands::Weights(args) => stk::cli::commands::weights::run(args, &global),
        Commands::Materials(args) => stk::cli::commands::materials::run(args, &global),
        Commands::Completions(args) => stk::cli::commands::completions::run(args),
    }
}
