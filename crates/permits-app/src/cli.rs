use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(author, version, about)]
pub struct Cli {
    #[arg(
        short = 's',
        long = "stdout",
        action,
        help = "Controls if it logs to stdout/stderr instead of to a file"
    )]
    pub is_to_std_out: bool,

    #[arg(
        long = "server",
        value_name = "URL",
        help = "Base URL of the API, takes precedence over the configuration files"
    )]
    pub server: Option<String>,
}
