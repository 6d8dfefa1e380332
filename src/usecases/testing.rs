//! Recording fakes for the presentational ports.

use crate::domain::{Notice, NoticeLevel};
use crate::ports::{NoticePort, ProgressPort};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Default)]
pub struct RecordingProgress {
    starts: AtomicUsize,
    completes: AtomicUsize,
}

impl RecordingProgress {
    pub fn starts(&self) -> usize {
        self.starts.load(Ordering::SeqCst)
    }

    pub fn completes(&self) -> usize {
        self.completes.load(Ordering::SeqCst)
    }
}

impl ProgressPort for RecordingProgress {
    fn start(&self) {
        self.starts.fetch_add(1, Ordering::SeqCst);
    }

    fn complete(&self) {
        self.completes.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct RecordingNotices {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotices {
    pub fn all(&self) -> Vec<Notice> {
        self.notices.lock().map(|n| n.clone()).unwrap_or_default()
    }

    pub fn last(&self) -> Option<Notice> {
        self.all().pop()
    }

    pub fn errors(&self) -> Vec<String> {
        self.all()
            .into_iter()
            .filter(|n| n.level == NoticeLevel::Error)
            .map(|n| n.text)
            .collect()
    }
}

impl NoticePort for RecordingNotices {
    fn notify(&self, notice: Notice) {
        if let Ok(mut notices) = self.notices.lock() {
            notices.push(notice);
        }
    }
}
