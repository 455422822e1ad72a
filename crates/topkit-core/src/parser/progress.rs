#[derive(Debug, Clone)]
pub enum ParseEvent {
    SourceStart { name: String, depth: usize },
    SourceFinish { name: String, lines: usize },

    Message(String),
}

pub type ProgressCallback<'a> = Box<dyn Fn(ParseEvent) + Send + Sync + 'a>;

#[derive(Default)]
pub struct ProgressReporter<'a> {
    callback: Option<ProgressCallback<'a>>,
}

impl<'a> ProgressReporter<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_callback(callback: ProgressCallback<'a>) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    #[inline]
    pub fn report(&self, event: ParseEvent) {
        if let Some(cb) = &self.callback {
            cb(event);
        }
    }
}
