use clap::Parser;
use fieldops::cli::{
    install_cancel_handler, run_clear, run_export, run_import, run_list, run_menu, run_show, run_stats,
    run_toggle, Cli, Commands,
};
use fieldops::{Config, Database, Session};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let config = Config::load(cli.db)?;
    let db = Database::open_at(&config.db_path)?;
    let mut session = Session::new(db, &config);

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

    match cli.command {
        None => {
            // No subcommand provided - show interactive menu
            install_cancel_handler(session.import_gate());
            run_menu(&mut session, &runtime)?;
        }
        Some(Commands::Import(args)) => {
            install_cancel_handler(session.import_gate());
            runtime.block_on(run_import(&mut session, args.file.as_deref()))?;
        }
        Some(Commands::List(args)) => {
            run_list(&mut session, args.query.as_deref(), args.all)?;
        }
        Some(Commands::Search(args)) => {
            run_list(&mut session, Some(&args.query), args.all)?;
        }
        Some(Commands::Show(args)) => {
            run_show(&mut session, &args.identifier)?;
        }
        Some(Commands::Toggle(args)) => {
            run_toggle(&mut session, &args.identifier)?;
        }
        Some(Commands::Clear(args)) => {
            run_clear(&mut session, args.yes)?;
        }
        Some(Commands::Stats) => {
            run_stats(&session.stats());
        }
        Some(Commands::Export(args)) => {
            run_export(&session, args.file.as_deref())?;
        }
    }

    Ok(())
}
