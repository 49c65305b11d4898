use druid::PlatformError;
use structopt::StructOpt;

use mandelpan::config::ViewerOptions;
use mandelpan::{gui, logger};

fn main() -> Result<(), PlatformError> {
    logger::init();
    let options = ViewerOptions::from_args();
    gui::launch(&options)?;
    Ok(())
}
