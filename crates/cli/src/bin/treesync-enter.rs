use clap::Parser;
use treesync_cli::cli::{Commands, EnterCli};

#[tokio::main(flavor = "current_thread")]
async fn main() {
	let cli = EnterCli::parse();
	let code = treesync_cli::run(cli.verbose, Commands::Enter(cli.args)).await;
	std::process::exit(code);
}
