//! Background fetching of tile background images for the preview pane.

use anyhow::{Context, Result, anyhow};
use futures::stream::{self, StreamExt};
use image::DynamicImage;
use ratatui::layout::Rect;
use reqwest::Client;
use std::collections::{HashMap, HashSet};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::constants::constants;
use crate::display::DisplayMode;
use crate::graphics::fit_thumbnail;

pub async fn fetch_thumbnail(client: &Client, url: &str) -> Result<DynamicImage> {
  let response = client.get(url).send().await.with_context(|| format!("Failed to request thumbnail {}", url))?;
  if !response.status().is_success() {
    return Err(anyhow!("Thumbnail request for {} returned {}", url, response.status()));
  }
  let bytes = response.bytes().await.with_context(|| format!("Failed to read image bytes from {}", url))?;
  image::load_from_memory(&bytes).with_context(|| format!("Failed to decode image from memory (URL: {})", url))
}

/// Fetch every URL with bounded concurrency, sending each image through `tx`
/// as soon as it decodes. Failures are logged and skipped.
pub async fn prefetch_thumbnails(client: Client, urls: Vec<String>, tx: mpsc::Sender<(String, DynamicImage)>) {
  stream::iter(urls)
    .map(|url| {
      let client = client.clone();
      let tx = tx.clone();
      async move {
        match fetch_thumbnail(&client, &url).await {
          Ok(image) => {
            let _ = tx.send((url, image)).await;
          }
          Err(e) => {
            let err = format!("{:#}", e);
            warn!(err = %err, "thumbnails: fetch failed");
          }
        }
      }
    })
    .buffer_unordered(constants().thumbnail_concurrency)
    .collect::<()>()
    .await;
}

/// Decoded thumbnails for the current result set, keyed by URL.
#[derive(Default)]
pub struct ThumbnailCache {
  images: HashMap<String, DynamicImage>,
  rx: Option<mpsc::Receiver<(String, DynamicImage)>>,
  handle: Option<JoinHandle<()>>,
  fitted: Option<(String, Rect, DynamicImage)>,
}

impl ThumbnailCache {
  /// Drop everything, including any in-flight prefetch.
  pub fn reset(&mut self) {
    if let Some(handle) = self.handle.take() {
      handle.abort();
    }
    self.rx = None;
    self.images.clear();
    self.fitted = None;
  }

  /// URLs not yet cached, deduplicated, in first-seen order.
  fn missing<'a>(&self, urls: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls
      .into_iter()
      .filter(|url| !url.is_empty() && !self.images.contains_key(*url) && seen.insert(*url))
      .map(str::to_string)
      .collect()
  }

  pub fn prefetch<'a>(&mut self, client: &Client, urls: impl IntoIterator<Item = &'a str>) {
    let urls = self.missing(urls);
    if urls.is_empty() {
      return;
    }
    if let Some(handle) = self.handle.take() {
      handle.abort();
    }
    debug!(count = urls.len(), "thumbnails: prefetch started");
    let (tx, rx) = mpsc::channel(64);
    let client = client.clone();
    self.handle = Some(tokio::spawn(prefetch_thumbnails(client, urls, tx)));
    self.rx = Some(rx);
  }

  /// Move finished downloads into the cache. Returns how many arrived.
  pub fn drain(&mut self) -> usize {
    let Some(rx) = &mut self.rx else { return 0 };
    let mut arrived = 0;
    while let Ok((url, image)) = rx.try_recv() {
      self.images.insert(url, image);
      arrived += 1;
    }
    arrived
  }

  #[cfg(test)]
  fn get(&self, url: &str) -> Option<&DynamicImage> {
    self.images.get(url)
  }

  #[cfg(test)]
  fn insert(&mut self, url: &str, image: DynamicImage) {
    self.images.insert(url.to_string(), image);
  }

  /// The image for `url` resized to `area`, reusing the last resize when
  /// neither changed.
  pub fn fitted(&mut self, url: &str, area: Rect, mode: DisplayMode) -> Option<&DynamicImage> {
    let stale = match &self.fitted {
      Some((cached_url, cached_area, _)) => cached_url != url || *cached_area != area,
      None => true,
    };
    if stale {
      let image = self.images.get(url)?;
      self.fitted = Some((url.to_string(), area, fit_thumbnail(image, area, mode)));
    }
    self.fitted.as_ref().map(|(_, _, image)| image)
  }
}
