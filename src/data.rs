//! Training data for a tenant's chatbots: saved sources, manual entries and
//! a simulated document upload.
//!
//! Uploads advance on the same single-shot `Timers` the preview uses. Every
//! step reschedules the next one, so removing a file or shutting the
//! uploader down cancels whatever is still queued.

use std::time::{Duration, Instant};

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::error::DataError;
use crate::timer::{TimerId, Timers};

/// Files above this size are rejected.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

const PROGRESS_STEP: u8 = 10;
const BUSINESS_INFO: &str = "Business Information";
const FAQ_SOURCE: &str = "Company FAQ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Manual,
    File,
}

impl SourceKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceKind::Manual => "manual",
            SourceKind::File => "file",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSource {
    pub id: u32,
    pub name: String,
    pub kind: SourceKind,
    pub entries: u32,
    pub last_updated: NaiveDate,
}

#[derive(Debug, Clone, Default)]
pub struct BusinessInfo {
    pub company_name: String,
    pub website: String,
    pub contact_email: String,
    pub phone: String,
    pub description: String,
}

#[derive(Debug, Clone, Default)]
pub struct Faq {
    pub question: String,
    pub answer: String,
}

impl Faq {
    fn is_complete(&self) -> bool {
        !self.question.trim().is_empty() && !self.answer.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct DataLibrary {
    sources: Vec<DataSource>,
    next_id: u32,
}

impl DataLibrary {
    pub fn sample() -> Self {
        let source = |id, name: &str, kind, entries, (y, m, d): (i32, u32, u32)| DataSource {
            id,
            name: name.to_string(),
            kind,
            entries,
            last_updated: NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default(),
        };
        Self {
            sources: vec![
                source(1, FAQ_SOURCE, SourceKind::Manual, 24, (2023, 8, 12)),
                source(2, "Product Catalog", SourceKind::Manual, 18, (2023, 9, 5)),
                source(3, "Company Handbook.pdf", SourceKind::File, 1, (2023, 7, 22)),
                source(4, "Support Documentation.docx", SourceKind::File, 1, (2023, 8, 30)),
                source(5, "Pricing Information", SourceKind::Manual, 5, (2023, 9, 10)),
            ],
            next_id: 6,
        }
    }

    pub fn sources(&self) -> &[DataSource] {
        &self.sources
    }

    pub fn total_entries(&self) -> u32 {
        self.sources.iter().map(|s| s.entries).sum()
    }

    /// Replaces any earlier business information; one entry per company.
    pub fn save_business_info(
        &mut self,
        info: &BusinessInfo,
        today: NaiveDate,
    ) -> Result<&DataSource, DataError> {
        if info.company_name.trim().is_empty() {
            return Err(DataError::MissingCompanyName);
        }
        let index = self.upsert_manual(BUSINESS_INFO, today);
        self.sources[index].entries = 1;
        info!(company = %info.company_name, "business information saved");
        Ok(&self.sources[index])
    }

    /// Appends the complete question/answer pairs to the FAQ source. Pairs
    /// with a blank side are skipped.
    pub fn save_faqs(&mut self, faqs: &[Faq], today: NaiveDate) -> Result<&DataSource, DataError> {
        let added = faqs.iter().filter(|f| f.is_complete()).count() as u32;
        if added == 0 {
            return Err(DataError::NothingToSave("FAQ"));
        }
        let index = self.upsert_manual(FAQ_SOURCE, today);
        self.sources[index].entries += added;
        info!(added, total = self.sources[index].entries, "FAQs saved");
        Ok(&self.sources[index])
    }

    pub fn add_file(&mut self, name: &str, today: NaiveDate) -> &DataSource {
        let index = self.push(name, SourceKind::File, today);
        self.sources[index].entries = 1;
        &self.sources[index]
    }

    pub fn remove(&mut self, id: u32) -> bool {
        let before = self.sources.len();
        self.sources.retain(|s| s.id != id);
        self.sources.len() != before
    }

    fn upsert_manual(&mut self, name: &str, today: NaiveDate) -> usize {
        match self
            .sources
            .iter()
            .position(|s| s.kind == SourceKind::Manual && s.name == name)
        {
            Some(index) => {
                self.sources[index].last_updated = today;
                index
            }
            None => self.push(name, SourceKind::Manual, today),
        }
    }

    fn push(&mut self, name: &str, kind: SourceKind, today: NaiveDate) -> usize {
        self.next_id += 1;
        self.sources.push(DataSource {
            id: self.next_id - 1,
            name: name.to_string(),
            kind,
            entries: 0,
            last_updated: today,
        });
        self.sources.len() - 1
    }
}

pub fn render_sources(sources: &[DataSource]) -> String {
    let mut lines = vec![format!(
        "  {:<30} {:<7} {:>7}  {}",
        "Name", "Type", "Entries", "Last updated"
    )];
    lines.extend(sources.iter().map(|s| {
        format!(
            "  {:<30} {:<7} {:>7}  {}",
            s.name,
            s.kind.as_str(),
            s.entries,
            s.last_updated.format("%b %-d, %Y")
        )
    }));
    lines.join("\n")
}

/// `512 bytes`, `2.0 KB`, `1.5 MB`.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} bytes", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Uploading,
    Complete,
    Error,
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    /// Percent, in steps of ten.
    pub progress: u8,
    pub status: UploadStatus,
    upload: u64,
    timer: Option<TimerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct UploadStep {
    upload: u64,
}

#[derive(Debug)]
pub struct Uploader {
    files: Vec<UploadedFile>,
    step: Duration,
    next_upload: u64,
    timers: Timers<UploadStep>,
}

impl Uploader {
    pub fn new(step: Duration) -> Self {
        Self {
            files: Vec::new(),
            step: step.max(Duration::from_millis(1)),
            next_upload: 0,
            timers: Timers::new(),
        }
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn is_busy(&self) -> bool {
        self.timers.pending() > 0
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.next_deadline()
    }

    pub fn add(&mut self, name: &str, size: u64, now: Instant) {
        let upload = self.next_upload;
        self.next_upload += 1;

        let (status, timer) = if size > MAX_UPLOAD_BYTES {
            warn!(file = name, size, "upload rejected: file too large");
            (UploadStatus::Error, None)
        } else {
            let id = self.timers.schedule(now, self.step, UploadStep { upload });
            (UploadStatus::Uploading, Some(id))
        };
        self.files.push(UploadedFile {
            name: name.to_string(),
            size,
            progress: 0,
            status,
            upload,
            timer,
        });
    }

    /// Drops every file with this name and size, cancelling its progress.
    pub fn remove(&mut self, name: &str, size: u64) -> bool {
        let before = self.files.len();
        let timers = &mut self.timers;
        self.files.retain(|f| {
            let matches = f.name == name && f.size == size;
            if matches {
                if let Some(id) = f.timer {
                    timers.cancel(id);
                }
            }
            !matches
        });
        self.files.len() != before
    }

    /// Apply every progress step due by `now`, catching up on any missed.
    /// Returns how many steps ran.
    pub fn tick(&mut self, now: Instant) -> usize {
        let mut steps = 0;
        while let Some(deadline) = self.timers.next_deadline().filter(|d| *d <= now) {
            for step in self.timers.fire_due(deadline) {
                self.advance(step, deadline);
                steps += 1;
            }
        }
        steps
    }

    fn advance(&mut self, step: UploadStep, at: Instant) {
        let Some(file) = self.files.iter_mut().find(|f| f.upload == step.upload) else {
            return;
        };
        if file.progress < 100 {
            file.progress += PROGRESS_STEP;
            file.timer = Some(self.timers.schedule(at, self.step, step));
        } else {
            file.status = UploadStatus::Complete;
            file.timer = None;
            info!(file = %file.name, "upload complete");
        }
    }

    /// Move completed uploads into the library as file sources.
    pub fn process(&mut self, library: &mut DataLibrary, today: NaiveDate) -> usize {
        let mut moved = 0;
        self.files.retain(|f| {
            if f.status != UploadStatus::Complete {
                return true;
            }
            library.add_file(&f.name, today);
            moved += 1;
            false
        });
        moved
    }

    pub fn shutdown(&mut self) {
        let cancelled = self.timers.cancel_all();
        if cancelled > 0 {
            debug!(cancelled, "cancelled pending uploads");
        }
        for file in &mut self.files {
            file.timer = None;
        }
    }
}

impl Drop for Uploader {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
    }

    #[test]
    fn test_sample_sources() {
        let library = DataLibrary::sample();
        assert_eq!(library.sources().len(), 5);
        assert_eq!(library.total_entries(), 49);
        let files = library
            .sources()
            .iter()
            .filter(|s| s.kind == SourceKind::File)
            .count();
        assert_eq!(files, 2);

        let table = render_sources(library.sources());
        assert!(table.contains("Support Documentation.docx"));
        assert!(table.contains("Sep 10, 2023"));
    }

    #[test]
    fn test_upload_steps_every_interval() {
        let t0 = Instant::now();
        let mut uploader = Uploader::new(ms(300));
        uploader.add("handbook.pdf", 2048, t0);
        assert_eq!(uploader.files()[0].status, UploadStatus::Uploading);

        assert_eq!(uploader.tick(t0 + ms(299)), 0);
        assert_eq!(uploader.files()[0].progress, 0);

        assert_eq!(uploader.tick(t0 + ms(300)), 1);
        assert_eq!(uploader.files()[0].progress, 10);

        // a late tick catches up on the missed steps
        assert_eq!(uploader.tick(t0 + ms(1500)), 4);
        assert_eq!(uploader.files()[0].progress, 50);
    }

    #[test]
    fn test_upload_completes_one_step_after_full() {
        let t0 = Instant::now();
        let mut uploader = Uploader::new(ms(300));
        uploader.add("faq.txt", 100, t0);

        uploader.tick(t0 + ms(3000));
        assert_eq!(uploader.files()[0].progress, 100);
        assert_eq!(uploader.files()[0].status, UploadStatus::Uploading);
        assert!(uploader.is_busy());

        uploader.tick(t0 + ms(3300));
        assert_eq!(uploader.files()[0].status, UploadStatus::Complete);
        assert_eq!(uploader.files()[0].progress, 100);
        assert!(!uploader.is_busy());
        assert_eq!(uploader.tick(t0 + ms(10_000)), 0);
    }

    #[test]
    fn test_oversized_upload_errors_immediately() {
        let mut uploader = Uploader::new(ms(300));
        uploader.add("video.mp4", MAX_UPLOAD_BYTES + 1, Instant::now());
        assert_eq!(uploader.files()[0].status, UploadStatus::Error);
        assert!(!uploader.is_busy());
    }

    #[test]
    fn test_remove_and_shutdown_cancel_progress() {
        let t0 = Instant::now();
        let mut uploader = Uploader::new(ms(300));
        uploader.add("a.txt", 10, t0);
        uploader.add("b.txt", 20, t0);
        uploader.tick(t0 + ms(300));

        assert!(uploader.remove("a.txt", 10));
        assert!(!uploader.remove("a.txt", 99));
        assert_eq!(uploader.files().len(), 1);
        assert!(uploader.is_busy());

        uploader.shutdown();
        assert_eq!(uploader.next_deadline(), None);
        assert_eq!(uploader.tick(t0 + ms(10_000)), 0);
        assert_eq!(uploader.files()[0].progress, 10);
    }

    #[test]
    fn test_process_moves_completed_files() {
        let t0 = Instant::now();
        let mut library = DataLibrary::sample();
        let mut uploader = Uploader::new(ms(300));
        uploader.add("done.csv", 10, t0);
        uploader.tick(t0 + ms(3300));
        uploader.add("pending.csv", 10, t0 + ms(3300));

        assert_eq!(uploader.process(&mut library, today()), 1);
        assert_eq!(uploader.files().len(), 1);
        assert_eq!(uploader.files()[0].name, "pending.csv");

        let added = library.sources().last().unwrap();
        assert_eq!(added.name, "done.csv");
        assert_eq!(added.kind, SourceKind::File);
        assert_eq!(added.id, 6);
        assert_eq!(added.last_updated, today());
    }

    #[test]
    fn test_manual_entries() {
        let mut library = DataLibrary::sample();
        let faqs = vec![
            Faq {
                question: "What are your business hours?".into(),
                answer: "Monday to Friday, 9 AM to 5 PM EST.".into(),
            },
            Faq {
                question: "Do you ship abroad?".into(),
                answer: "  ".into(),
            },
        ];
        let source = library.save_faqs(&faqs, today()).unwrap();
        assert_eq!(source.name, "Company FAQ");
        assert_eq!(source.entries, 25);
        assert_eq!(source.last_updated, today());
        assert_eq!(library.sources().len(), 5);

        assert_eq!(
            library.save_faqs(&faqs[1..], today()),
            Err(DataError::NothingToSave("FAQ"))
        );
        assert_eq!(
            library.save_business_info(&BusinessInfo::default(), today()),
            Err(DataError::MissingCompanyName)
        );

        let info = BusinessInfo {
            company_name: "Acme Inc.".into(),
            ..BusinessInfo::default()
        };
        library.save_business_info(&info, today()).unwrap();
        library.save_business_info(&info, today()).unwrap();
        assert_eq!(library.sources().len(), 6);
        assert!(library.remove(6));
        assert!(!library.remove(6));
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 bytes");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(1536 * 1024), "1.5 MB");
    }
}
