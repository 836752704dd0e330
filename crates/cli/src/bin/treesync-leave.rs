use clap::Parser;
use treesync_cli::cli::{Commands, LeaveCli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let cli = LeaveCli::parse();
	let code = treesync_cli::run(cli.verbose, Commands::Leave(cli.args)).await;
	std::process::exit(code);
}
