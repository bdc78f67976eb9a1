use crate::time::FrameRate;

/// Presentation target for published frame rates.
pub trait DisplaySink {
    fn show(&mut self, rate: &FrameRate);
}

/// Writes each published rate to the log at info level.
#[derive(Debug, Default)]
pub struct LogSink;

impl DisplaySink for LogSink {
    fn show(&mut self, rate: &FrameRate) {
        log::info!("{rate}");
    }
}

/// Keeps every published rate as its display string.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub shown: Vec<String>,
}

impl DisplaySink for RecordingSink {
    fn show(&mut self, rate: &FrameRate) {
        self.shown.push(rate.to_string());
    }
}

impl<S: DisplaySink + ?Sized> DisplaySink for Box<S> {
    fn show(&mut self, rate: &FrameRate) {
        (**self).show(rate);
    }
}
