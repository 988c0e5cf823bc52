use clap::Parser;

use log::{error, info};

mod app;
mod args;

use app::App;
use args::Args;

fn main() {
    // clion needs help in trait annotation
    let args = <Args as Parser>::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!(
        "Rendering {}x{} with {:?} into {:?}",
        args.width, args.height, args.api, args.output
    );

    let res = App::new(args.api).and_then(|app| app.run(&args));

    if let Err(e) = res {
        error!("{e}");
        std::process::exit(e.exit_code());
    }
}
