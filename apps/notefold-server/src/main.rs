use clap::Parser;

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
	color_eyre::install()?;
	let args = notefold_server::Args::parse();
	notefold_server::run(args).await
}
