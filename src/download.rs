// Sequential image downloader.
//
// Items are fetched one at a time in input order. A failing item is
// recorded in its `DownloadOutcome` and never stops the batch.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::http::{Request, Transport};

/// One image to fetch: its URL, sanitized name and position in the overall
/// fetch order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadItem {
    pub url: String,
    pub safe_name: String,
    pub ordinal: usize,
}

impl DownloadItem {
    /// `{safe_name}_{ordinal}.jpg`
    pub fn file_name(&self) -> String {
        format!("{}_{}.jpg", self.safe_name, self.ordinal)
    }
}

/// Result of downloading a single item.
#[derive(Debug)]
pub struct DownloadOutcome {
    pub item: DownloadItem,
    pub path: PathBuf,
    pub error: Option<Error>,
}

impl DownloadOutcome {
    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Create the output directory (and parents) if it does not exist yet.
pub fn prepare_target(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| Error::io(dir, e))
}

/// Counts of a finished batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub succeeded: usize,
    pub failed: usize,
}

impl Tally {
    pub fn of(outcomes: &[DownloadOutcome]) -> Self {
        let succeeded = outcomes.iter().filter(|o| o.succeeded()).count();
        Tally {
            succeeded,
            failed: outcomes.len() - succeeded,
        }
    }
}

pub struct Downloader<T> {
    transport: T,
}

impl<T: Transport> Downloader<T> {
    pub fn new(transport: T) -> Self {
        Downloader { transport }
    }

    /// Download every item into `dir`, returning one outcome per item in
    /// input order.
    pub fn download_all(&self, items: &[DownloadItem], dir: &Path) -> Vec<DownloadOutcome> {
        self.download_all_with(items, dir, |_| {})
    }

    /// Same as [`download_all`](Self::download_all), handing each outcome to
    /// `on_outcome` right after the item finishes.
    pub fn download_all_with<F>(
        &self,
        items: &[DownloadItem],
        dir: &Path,
        mut on_outcome: F,
    ) -> Vec<DownloadOutcome>
    where
        F: FnMut(&DownloadOutcome),
    {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            let path = dir.join(item.file_name());
            let error = self.download_one(item, &path).err();
            if let Some(e) = &error {
                warn!(url = %item.url, kind = e.kind(), error = %e, "download failed");
            }
            let outcome = DownloadOutcome {
                item: item.clone(),
                path,
                error,
            };
            on_outcome(&outcome);
            outcomes.push(outcome);
        }
        outcomes
    }

    fn download_one(&self, item: &DownloadItem, path: &Path) -> Result<()> {
        let bytes = self.transport.get(&Request::get(&item.url))?;
        fs::write(path, &bytes).map_err(|e| Error::io(path, e))?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved image");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::http::testing::{Canned, FakeTransport};

    fn item(n: usize, name: &str) -> DownloadItem {
        DownloadItem {
            url: format!("https://images.test/{n}.jpg"),
            safe_name: name.to_string(),
            ordinal: n,
        }
    }

    fn transport_for(items: &[DownloadItem]) -> FakeTransport {
        items.iter().fold(FakeTransport::default(), |t, it| {
            t.respond(&it.url, None, Canned::Body(format!("bytes-{}", it.ordinal).into_bytes()))
        })
    }

    #[test]
    fn file_name_appends_ordinal() {
        assert_eq!(item(7, "red fox").file_name(), "red fox_7.jpg");
    }

    #[test]
    fn writes_every_item_in_order() {
        let dir = TempDir::new().unwrap();
        let items = vec![item(0, "a"), item(1, "b"), item(2, "a")];
        let transport = transport_for(&items);

        let outcomes = Downloader::new(&transport).download_all(&items, dir.path());

        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(DownloadOutcome::succeeded));
        assert_eq!(
            fs::read(dir.path().join("a_2.jpg")).unwrap(),
            b"bytes-2".to_vec()
        );
        assert_eq!(
            transport.requested_urls(),
            items.iter().map(|i| i.url.clone()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn one_failure_does_not_stop_the_batch() {
        let items: Vec<_> = (0..5).map(|n| item(n, "img")).collect();
        for failing in 0..items.len() {
            let dir = TempDir::new().unwrap();
            let transport = transport_for(&items).respond(&items[failing].url, None, Canned::NetworkDown);

            let outcomes = Downloader::new(&transport).download_all(&items, dir.path());

            assert_eq!(outcomes.len(), items.len());
            assert_eq!(transport.requested_urls().len(), items.len());
            let failed: Vec<_> = outcomes.iter().filter(|o| !o.succeeded()).collect();
            assert_eq!(failed.len(), 1);
            assert_eq!(failed[0].item.ordinal, failing);
            assert!(matches!(failed[0].error, Some(Error::Network { .. })));
            assert!(!failed[0].path.exists());
            assert_eq!(Tally::of(&outcomes), Tally { succeeded: 4, failed: 1 });
        }
    }

    #[test]
    fn bad_status_is_a_failed_item() {
        let dir = TempDir::new().unwrap();
        let items = vec![item(0, "gone"), item(1, "ok")];
        let transport = transport_for(&items).respond(&items[0].url, None, Canned::Status(404));

        let outcomes = Downloader::new(&transport).download_all(&items, dir.path());

        assert!(!outcomes[0].succeeded());
        assert!(outcomes[1].succeeded());
        assert!(!dir.path().join("gone_0.jpg").exists());
    }

    #[test]
    fn filesystem_error_is_reported_per_item() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");
        let items = vec![item(0, "a"), item(1, "b")];
        let transport = transport_for(&items);

        let outcomes = Downloader::new(&transport).download_all(&items, &missing);

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes
            .iter()
            .all(|o| matches!(o.error, Some(Error::Io { .. }))));
        assert_eq!(transport.requested_urls().len(), 2);
    }

    #[test]
    fn existing_file_is_overwritten() {
        let dir = TempDir::new().unwrap();
        let items = vec![item(0, "dup")];
        fs::write(dir.path().join("dup_0.jpg"), b"old").unwrap();
        let transport = transport_for(&items);

        Downloader::new(&transport).download_all(&items, dir.path());

        assert_eq!(fs::read(dir.path().join("dup_0.jpg")).unwrap(), b"bytes-0".to_vec());
    }

    #[test]
    fn callback_sees_each_outcome() {
        let dir = TempDir::new().unwrap();
        let items = vec![item(0, "a"), item(1, "b")];
        let transport = transport_for(&items);
        let mut reported = Vec::new();

        Downloader::new(&transport).download_all_with(&items, dir.path(), |o| {
            reported.push((o.item.ordinal, o.succeeded()))
        });

        assert_eq!(reported, vec![(0, true), (1, true)]);
    }

    #[test]
    fn prepare_target_creates_nested_dirs() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("unsplash").join("cats");
        prepare_target(&target).unwrap();
        assert!(target.is_dir());
        prepare_target(&target).unwrap();
    }
}
