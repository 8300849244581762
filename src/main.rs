mod archive;
mod assets;
mod cli;
mod commands;
mod config;
mod env_loader;
mod error;
mod formatter;
mod source;
mod strings;

fn main() {
    env_loader::load_dotenv();

    if let Err(err) = cli::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
