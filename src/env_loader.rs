use std::env;
use std::path::PathBuf;

fn fallback_dotenv_path(work_dir: Option<PathBuf>, home_dir: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(base) = work_dir {
        return Some(base.join(".env"));
    }
    Some(home_dir?.join(".config/helpdesk-archiver/.env"))
}

pub fn load_dotenv() {
    if dotenvy::dotenv().is_ok() {
        return;
    }

    let fallback = fallback_dotenv_path(
        env::var_os("ARCHIVER_WORK_DIR").map(PathBuf::from),
        dirs::home_dir(),
    );

    let Some(path) = fallback else {
        return;
    };
    if path.is_file() {
        let _ = dotenvy::from_path(&path);
    }
}
