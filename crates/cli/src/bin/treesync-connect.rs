use clap::Parser;
use treesync_cli::cli::{Commands, ConnectCli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let cli = ConnectCli::parse();
	let code = treesync_cli::run(cli.verbose, Commands::Connect(cli.args)).await;
	std::process::exit(code);
}
