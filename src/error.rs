use crate::color::ColorError;

#[derive(thiserror::Error, Debug)]
pub enum GaugeError {
    #[error("a gauge needs at least one segment, got {0}")]
    InvalidSegmentCount(usize),

    #[error("invalid segment color: {0}")]
    Color(#[from] ColorError),

    #[error("font data could not be loaded")]
    Font,

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("window creation failed: {0}")]
    Os(#[from] winit::error::OsError),

    #[error("pixel surface error: {0}")]
    Pixels(#[from] pixels::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
