use clap::Parser;
use treesync_cli::cli::{Commands, RootCli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let cli = RootCli::parse();
	let code = treesync_cli::run(cli.verbose, Commands::Root(cli.args)).await;
	std::process::exit(code);
}
