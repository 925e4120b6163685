//! Detail viewer for one memory's resource URL.
//!
//! The viewer issues exactly one navigation per instance. Rendering, load
//! errors and retries belong to the [`Navigator`] implementation.

use log::{debug, info};
use url::Url;

/// Embedded browser surface.
pub trait Navigator {
    fn load(&mut self, url: &Url);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailViewer {
    url: Url,
    loaded: bool,
}

impl DetailViewer {
    pub fn new(url: Url) -> Self {
        Self { url, loaded: false }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Loads the URL into `navigator`; later calls are no-ops.
    pub fn activate(&mut self, navigator: &mut dyn Navigator) {
        if self.loaded {
            debug!(
                "event=detail_activate module=detail status=skipped reason=already_loaded"
            );
            return;
        }
        info!(
            "event=detail_activate module=detail status=ok host={}",
            self.url.host_str().unwrap_or("-")
        );
        navigator.load(&self.url);
        self.loaded = true;
    }
}

#[cfg(test)]
mod tests {
    use super::{DetailViewer, Navigator};
    use url::Url;

    #[derive(Default)]
    struct RecordingNavigator {
        loads: Vec<String>,
    }

    impl Navigator for RecordingNavigator {
        fn load(&mut self, url: &Url) {
            self.loads.push(url.to_string());
        }
    }

    #[test]
    fn activation_loads_exactly_once() {
        let url = Url::parse("https://youtu.be/ANBGkZwOX68").unwrap();
        let mut viewer = DetailViewer::new(url);
        let mut navigator = RecordingNavigator::default();

        viewer.activate(&mut navigator);
        viewer.activate(&mut navigator);

        assert!(viewer.is_loaded());
        assert_eq!(navigator.loads, vec!["https://youtu.be/ANBGkZwOX68"]);
    }
}
