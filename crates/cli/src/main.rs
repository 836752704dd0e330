use clap::Parser;
use treesync_cli::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let cli = Cli::parse();
	let code = treesync_cli::run(cli.verbose, cli.command).await;
	std::process::exit(code);
}
