//! Bounded in-memory report log.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::reports::types::{ReceivedReport, ReportKind};

/// Keeps the most recent reports for `/reports`. Lost on restart.
#[derive(Debug)]
pub struct ReportStore {
    capacity: usize,
    reports: Mutex<VecDeque<ReceivedReport>>,
}

impl ReportStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            reports: Mutex::new(VecDeque::with_capacity(capacity.min(1024))),
        }
    }

    /// Append a report, evicting the oldest when full.
    pub fn record(&self, report: ReceivedReport) {
        let mut reports = self.reports.lock().expect("report store mutex poisoned");
        if reports.len() == self.capacity {
            reports.pop_front();
        }
        reports.push_back(report);
    }

    /// All reports, oldest first.
    pub fn list(&self) -> Vec<ReceivedReport> {
        let reports = self.reports.lock().expect("report store mutex poisoned");
        reports.iter().cloned().collect()
    }

    /// Reports of one kind, oldest first.
    pub fn list_kind(&self, kind: ReportKind) -> Vec<ReceivedReport> {
        let reports = self.reports.lock().expect("report store mutex poisoned");
        reports.iter().filter(|r| r.kind == kind).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.reports.lock().expect("report store mutex poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Drop everything; returns how many reports were removed.
    pub fn clear(&self) -> usize {
        let mut reports = self.reports.lock().expect("report store mutex poisoned");
        let removed = reports.len();
        reports.clear();
        removed
    }
}
