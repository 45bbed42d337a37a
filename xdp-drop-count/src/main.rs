use std::{fs, io, path::PathBuf, process::ExitCode};

use log::debug;
use xdp_drop_count::{
    cli::Args,
    datapath::raise_memlock_rlimit,
    AyaDatapath, DropConfig, Error, Runner, Shutdown, OBJECT_FILE,
};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::from_env() {
        Ok(args) => args,
        Err(usage) => {
            println!("{usage}");
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Error> {
    let object = fs::read(OBJECT_FILE).map_err(|source| Error::ReadObject {
        path: PathBuf::from(OBJECT_FILE),
        source,
    })?;

    raise_memlock_rlimit();

    let datapath = AyaDatapath::load(&object, &DropConfig::default())?;
    let shutdown = Shutdown::install()?;

    let mut runner = Runner::new(datapath, args.iface);
    runner.run(shutdown.recv(), &mut io::stdout()).await?;

    debug!("finished in stage {}", runner.stage());
    Ok(())
}
