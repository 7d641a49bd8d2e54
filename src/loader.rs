// Eraword – A multilingual word-snake puzzle engine
// Copyright (C) 2026  The Eraword developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::thread;
use std::time::Duration;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use super::catalog::{
    Catalog, CatalogDocument, CatalogError, EraTable, UnlockPrices,
};
use super::language::{Language, UnknownLanguage};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub max_backoff_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> RetryPolicy {
        RetryPolicy {
            max_retries: 5,
            initial_backoff_ms: 50,
            max_backoff_ms: 1000,
        }
    }
}

impl RetryPolicy {
    // Each delay doubles the previous one up to the maximum
    pub fn backoff(&self) -> impl Iterator<Item = Duration> {
        let max = self.max_backoff_ms;

        std::iter::successors(Some(self.initial_backoff_ms.min(max)), move |&ms| {
            Some(ms.saturating_mul(2).min(max))
        })
            .take(self.max_retries as usize)
            .map(Duration::from_millis)
    }
}

#[derive(Clone, Debug)]
pub enum LoadState {
    Loading,
    Ready(Arc<Catalog>),
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    #[error("the catalog failed to load: {0}")]
    Failed(String),
    #[error("the catalog still wasn’t loaded after {0} retries")]
    TimedOut(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogSource {
    pub language: Language,
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceParseError {
    #[error("catalog source “{0}” should look like LANG=PATH")]
    MissingEquals(String),
    #[error(transparent)]
    UnknownLanguage(#[from] UnknownLanguage),
}

impl FromStr for CatalogSource {
    type Err = SourceParseError;

    fn from_str(s: &str) -> Result<CatalogSource, SourceParseError> {
        let Some((language, path)) = s.split_once('=')
        else {
            return Err(SourceParseError::MissingEquals(s.to_string()));
        };

        if path.is_empty() {
            return Err(SourceParseError::MissingEquals(s.to_string()));
        }

        Ok(CatalogSource {
            language: language.parse()?,
            path: PathBuf::from(path),
        })
    }
}

pub fn load_sources(
    sources: &[CatalogSource],
    eras: &EraTable,
    prices: &UnlockPrices,
) -> Result<Catalog, CatalogError> {
    let documents = sources
        .iter()
        .map(|source| {
            debug!(
                "reading {} catalog from {}",
                source.language,
                source.path.display(),
            );
            CatalogDocument::from_path(&source.path)
                .map(|document| (source.language, document))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Catalog::from_documents(documents, eras, prices)
}

// Until the worker finishes, queries report Loading rather than an
// empty catalog
#[derive(Clone, Debug)]
pub struct CatalogLoader {
    state: Arc<Mutex<LoadState>>,
}

impl CatalogLoader {
    pub fn spawn<F>(load: F) -> CatalogLoader
    where
        F: FnOnce() -> Result<Catalog, CatalogError> + Send + 'static,
    {
        let state = Arc::new(Mutex::new(LoadState::Loading));
        let thread_state = Arc::clone(&state);

        thread::spawn(move || {
            let new_state = match load() {
                Ok(catalog) => {
                    info!(
                        "catalog loaded with {} themes and {} words",
                        catalog.themes().len(),
                        catalog.word_count(),
                    );
                    LoadState::Ready(Arc::new(catalog))
                },
                Err(e) => {
                    warn!("catalog failed to load: {}", e);
                    LoadState::Failed(e.to_string())
                },
            };

            *thread_state.lock().unwrap_or_else(PoisonError::into_inner) =
                new_state;
        });

        CatalogLoader { state }
    }

    pub fn ready(catalog: Catalog) -> CatalogLoader {
        CatalogLoader {
            state: Arc::new(Mutex::new(LoadState::Ready(Arc::new(catalog)))),
        }
    }

    pub fn state(&self) -> LoadState {
        self.state.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state(), LoadState::Loading)
    }

    pub fn wait(&self, policy: &RetryPolicy) -> Result<Arc<Catalog>, LoadError> {
        let mut delays = policy.backoff();

        loop {
            match self.state() {
                LoadState::Ready(catalog) => return Ok(catalog),
                LoadState::Failed(e) => return Err(LoadError::Failed(e)),
                LoadState::Loading => match delays.next() {
                    Some(delay) => thread::sleep(delay),
                    None => return Err(LoadError::TimedOut(policy.max_retries)),
                },
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::mpsc;
    use super::super::catalog::test_catalog::{
        make_test_catalog, test_eras, ENGLISH_DOCUMENT, TURKISH_DOCUMENT,
    };

    fn quick_policy(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_backoff_ms: 1,
            max_backoff_ms: 4,
        }
    }

    #[test]
    fn backoff() {
        let policy = RetryPolicy {
            max_retries: 6,
            initial_backoff_ms: 50,
            max_backoff_ms: 300,
        };

        assert_eq!(
            policy.backoff().map(|d| d.as_millis()).collect::<Vec<_>>(),
            vec![50, 100, 200, 300, 300, 300],
        );

        assert_eq!(quick_policy(0).backoff().count(), 0);
    }

    #[test]
    fn parse_source() {
        assert_eq!(
            "tr=data/tr.json".parse::<CatalogSource>().unwrap(),
            CatalogSource {
                language: Language::Tr,
                path: PathBuf::from("data/tr.json"),
            },
        );
        assert_eq!(
            "en".parse::<CatalogSource>().unwrap_err(),
            SourceParseError::MissingEquals("en".to_string()),
        );
        assert_eq!(
            "en=".parse::<CatalogSource>().unwrap_err(),
            SourceParseError::MissingEquals("en=".to_string()),
        );
        assert_eq!(
            "eo=vortoj.json".parse::<CatalogSource>().unwrap_err().to_string(),
            "unknown language code: eo",
        );
    }

    #[test]
    fn load_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let english = dir.path().join("en.json");
        let turkish = dir.path().join("tr.json");

        std::fs::write(&english, ENGLISH_DOCUMENT).unwrap();
        std::fs::write(&turkish, TURKISH_DOCUMENT).unwrap();

        let sources = [
            CatalogSource { language: Language::En, path: english },
            CatalogSource { language: Language::Tr, path: turkish.clone() },
        ];

        let catalog = load_sources(
            &sources,
            &test_eras(),
            &UnlockPrices::default(),
        ).unwrap();

        assert_eq!(catalog.word_count(), 8);
        assert!(catalog.has_language(Language::Tr));

        std::fs::remove_file(&turkish).unwrap();

        assert!(matches!(
            load_sources(&sources, &test_eras(), &UnlockPrices::default()),
            Err(CatalogError::Io { .. }),
        ));
    }

    #[test]
    fn ready() {
        let loader = CatalogLoader::ready(make_test_catalog());

        assert!(!loader.is_loading());
        assert!(matches!(loader.state(), LoadState::Ready(_)));
        assert_eq!(loader.wait(&quick_policy(0)).unwrap().word_count(), 8);
    }

    #[test]
    fn loading_then_ready() {
        let (tx, rx) = mpsc::channel::<()>();

        let loader = CatalogLoader::spawn(move || {
            let _ = rx.recv();
            Ok(make_test_catalog())
        });

        assert!(loader.is_loading());
        assert_eq!(
            loader.wait(&quick_policy(2)).unwrap_err(),
            LoadError::TimedOut(2),
        );

        tx.send(()).unwrap();

        let catalog = loader.wait(&RetryPolicy {
            max_retries: 1000,
            initial_backoff_ms: 1,
            max_backoff_ms: 10,
        }).unwrap();

        assert_eq!(catalog.themes().len(), 2);
        assert!(!loader.is_loading());
    }

    #[test]
    fn failed() {
        let loader = CatalogLoader::spawn(|| Err(CatalogError::MissingEnglish));

        let error = loader.wait(&RetryPolicy {
            max_retries: 1000,
            initial_backoff_ms: 1,
            max_backoff_ms: 10,
        }).unwrap_err();

        assert_eq!(
            error,
            LoadError::Failed("no English document was supplied".to_string()),
        );
        assert!(matches!(loader.state(), LoadState::Failed(_)));
    }
}
