use druid::{AppLauncher, PlatformError, WindowDesc};
use log::info;

use crate::config::{ViewerOptions, WINDOW_TITLE};

pub mod widget;

use widget::MandelbrotWidget;

pub fn launch(options: &ViewerOptions) -> Result<(), PlatformError> {
    let threads = options.thread_count();
    info!(
        "opening {}x{} window, {} render threads",
        options.width, options.height, threads
    );
    AppLauncher::with_window(
        WindowDesc::new(MandelbrotWidget::new(options.window(), threads))
            .title(WINDOW_TITLE)
            .window_size((options.width as f64, options.height as f64)),
    )
    .launch(())?;
    Ok(())
}
