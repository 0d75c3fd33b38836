/// User-visible, step-by-step progress reporting. Each flow pushes a short
/// message at every step so a caller can mirror it into a status display.
pub trait StatusSink: Send + Sync {
    fn status(&self, message: &str);
}

/// Discards all messages.
pub struct NullSink;

impl StatusSink for NullSink {
    fn status(&self, _message: &str) {}
}

impl<F> StatusSink for F
where
    F: Fn(&str) + Send + Sync,
{
    fn status(&self, message: &str) {
        self(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn closure_sink_collects_messages() {
        let seen: Mutex<Vec<String>> = Mutex::new(Vec::new());
        let sink = |message: &str| seen.lock().unwrap().push(message.to_string());
        sink.status("creating mints");
        sink.status("minting supply");
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["creating mints".to_string(), "minting supply".to_string()]
        );
    }
}
