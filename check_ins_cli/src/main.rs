use check_ins_cli::{
    cmds::{check_in, Cli, Commands},
    Msg, Result,
};
use clap::Parser;

#[tokio::main]
async fn main() -> Result {
    let cli = Cli::parse();

    if cli.print_command {
        println!("{cli:#?}");
    }

    let msg = handle_cli(cli).await?;
    let failed = msg.is_error();
    println!("{msg}");
    if failed {
        std::process::exit(1);
    }

    Ok(())
}

pub async fn handle_cli(cli: Cli) -> Result<Msg> {
    match cli.command {
        Commands::List(args) => check_in::list(args).await,
        Commands::Get(args) => check_in::get(args).await,
        Commands::Create(args) => check_in::create(args).await,
        Commands::Update(args) => check_in::update(args).await,
        Commands::Delete(args) => check_in::delete(args).await,
    }
}
