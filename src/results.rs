//! Normalization of the backend search payload into [`SearchResult`] records.
//!
//! The backend answers with a list of pages; only the first page's `Items`
//! are used. Raw items are deserialized leniently (every field optional) so a
//! single broken item is skipped instead of failing the whole response.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::constants::constants;

// --- Raw backend shape ---

pub type RawSearchResponse = Vec<RawPage>;

/// Items stay as raw JSON until each one is decoded on its own, so a null or
/// mistyped item cannot take its siblings down with it. `"Items": null` is an
/// empty page.
#[derive(Debug, Default, Deserialize)]
pub struct RawPage {
  #[serde(rename = "Items", default)]
  pub items: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawItem {
  pub id: Option<RawId>,
  pub snippet: Option<RawSnippet>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawId {
  pub video_id: Option<String>,
  pub channel_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawSnippet {
  pub title: Option<String>,
  pub description: Option<String>,
  pub thumbnails: Option<RawThumbnails>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawThumbnails {
  pub default: Option<RawThumbnail>,
  pub medium: Option<RawThumbnail>,
  pub high: Option<RawThumbnail>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RawThumbnail {
  pub url: Option<String>,
}

// --- Normalized records ---

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultKind {
  Video,
  Channel,
}

impl ResultKind {
  pub fn label(self) -> &'static str {
    match self {
      ResultKind::Video => "video",
      ResultKind::Channel => "channel",
    }
  }
}

/// One normalized search hit. `url` is always a full link into the site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
  pub id: String,
  pub url: String,
  pub title: String,
  /// Backend description, "Unknown" when the item carries none.
  pub description: String,
  pub thumbnail: String,
  pub kind: ResultKind,
}

/// Why a single raw item was dropped.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedItem {
  #[error("item is null")]
  Null,
  #[error("item does not decode: {0}")]
  Undecodable(String),
  #[error("item has neither a video nor a channel id")]
  MissingIdentifier,
  #[error("item has both a video id ({video_id}) and a channel id ({channel_id})")]
  AmbiguousIdentifier { video_id: String, channel_id: String },
  #[error("item {id} has no thumbnail at any resolution")]
  MissingThumbnail { id: String },
}

/// The payload as a whole could not be used.
#[derive(Debug, Error)]
pub enum ResponseError {
  #[error("search response has an unexpected shape: {0}")]
  Shape(#[from] serde_json::Error),
  #[error("search response contains no pages")]
  NoPages,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
  value.as_deref().filter(|s| !s.is_empty())
}

fn thumbnail_url(thumb: &Option<RawThumbnail>) -> Option<&str> {
  thumb.as_ref().and_then(|t| non_empty(&t.url))
}

const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// Pick the thumbnail by precedence: high, then medium, then default.
pub fn pick_thumbnail(thumbnails: &RawThumbnails) -> Option<&str> {
  thumbnail_url(&thumbnails.high).or_else(|| thumbnail_url(&thumbnails.medium)).or_else(|| thumbnail_url(&thumbnails.default))
}

/// Map one raw item to a [`SearchResult`], or explain why it is unusable.
pub fn normalize_item(item: &RawItem) -> Result<SearchResult, MalformedItem> {
  let base = &constants().site_base;
  let raw_id = item.id.as_ref().ok_or(MalformedItem::MissingIdentifier)?;
  let (kind, id, url) = match (non_empty(&raw_id.video_id), non_empty(&raw_id.channel_id)) {
    (Some(video_id), None) => (ResultKind::Video, video_id, format!("{}watch?v={}", base, video_id)),
    (None, Some(channel_id)) => (ResultKind::Channel, channel_id, format!("{}channel/{}", base, channel_id)),
    (Some(video_id), Some(channel_id)) => {
      return Err(MalformedItem::AmbiguousIdentifier {
        video_id: video_id.to_string(),
        channel_id: channel_id.to_string(),
      });
    }
    (None, None) => return Err(MalformedItem::MissingIdentifier),
  };

  let snippet = item.snippet.as_ref();
  let thumbnail = snippet
    .and_then(|s| s.thumbnails.as_ref())
    .and_then(pick_thumbnail)
    .ok_or_else(|| MalformedItem::MissingThumbnail { id: id.to_string() })?;

  Ok(SearchResult {
    id: id.to_string(),
    url,
    title: snippet.and_then(|s| s.title.clone()).unwrap_or_default(),
    description: snippet
      .and_then(|s| s.description.clone())
      .unwrap_or_else(|| UNKNOWN_DESCRIPTION.to_string()),
    thumbnail: thumbnail.to_string(),
    kind,
  })
}

/// Decode one raw JSON item and normalize it.
pub fn decode_item(value: &Value) -> Result<SearchResult, MalformedItem> {
  if value.is_null() {
    return Err(MalformedItem::Null);
  }
  let item = RawItem::deserialize(value).map_err(|e| MalformedItem::Undecodable(e.to_string()))?;
  normalize_item(&item)
}

/// Normalize the first page of a response, skipping malformed items.
/// Output order matches input order; nothing is deduplicated.
pub fn normalize(raw: &RawSearchResponse) -> Result<Vec<SearchResult>, ResponseError> {
  let page = raw.first().ok_or(ResponseError::NoPages)?;
  let results = page
    .items
    .iter()
    .flatten()
    .enumerate()
    .filter_map(|(index, item)| match decode_item(item) {
      Ok(result) => Some(result),
      Err(reason) => {
        warn!(index, %reason, "normalize: skipping malformed item");
        None
      }
    })
    .collect();
  Ok(results)
}

/// Decode the transport's JSON value and normalize it.
pub fn normalize_value(value: Value) -> Result<Vec<SearchResult>, ResponseError> {
  let raw: RawSearchResponse = serde_json::from_value(value)?;
  normalize(&raw)
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn raw(value: Value) -> RawSearchResponse {
    serde_json::from_value(value).unwrap()
  }

  fn video(id: &str, title: &str, thumbs: Value) -> Value {
    json!({ "id": { "videoId": id }, "snippet": { "title": title, "thumbnails": thumbs } })
  }

  fn channel(id: &str, title: &str, thumbs: Value) -> Value {
    json!({ "id": { "channelId": id }, "snippet": { "title": title, "thumbnails": thumbs } })
  }

  #[test]
  fn high_wins_over_default_when_medium_missing() {
    let response = raw(json!([{ "Items": [video("v1", "t", json!({
      "default": { "url": "https://img/default.jpg" },
      "high": { "url": "https://img/high.jpg" }
    }))] }]));
    let results = normalize(&response).unwrap();
    assert_eq!(results[0].thumbnail, "https://img/high.jpg");
  }

  #[test]
  fn medium_used_when_high_missing() {
    let response = raw(json!([{ "Items": [video("v1", "t", json!({
      "default": { "url": "https://img/default.jpg" },
      "medium": { "url": "https://img/medium.jpg" }
    }))] }]));
    assert_eq!(normalize(&response).unwrap()[0].thumbnail, "https://img/medium.jpg");
  }

  #[test]
  fn default_is_the_last_resort() {
    let response = raw(json!([{ "Items": [video("v1", "t", json!({ "default": { "url": "https://img/d.jpg" } }))] }]));
    assert_eq!(normalize(&response).unwrap()[0].thumbnail, "https://img/d.jpg");
  }

  #[test]
  fn video_and_channel_are_disambiguated() {
    let thumbs = json!({ "default": { "url": "https://img/d.jpg" } });
    let response = raw(json!([{ "Items": [video("abc", "A", thumbs.clone()), channel("chan", "C", thumbs)] }]));
    let results = normalize(&response).unwrap();

    assert_eq!(results[0].kind, ResultKind::Video);
    assert_eq!(results[0].id, "abc");
    assert!(results[0].url.ends_with("watch?v=abc"));
    assert!(results[0].url.starts_with(&constants().site_base));

    assert_eq!(results[1].kind, ResultKind::Channel);
    assert_eq!(results[1].id, "chan");
    assert!(results[1].url.ends_with("channel/chan"));
  }

  #[test]
  fn order_is_preserved_and_duplicates_kept() {
    let thumbs = json!({ "default": { "url": "https://img/d.jpg" } });
    let response = raw(json!([{ "Items": [
      video("3", "three", thumbs.clone()),
      video("1", "one", thumbs.clone()),
      video("3", "three again", thumbs.clone()),
      channel("2", "two", thumbs)
    ] }]));
    let ids: Vec<_> = normalize(&response).unwrap().into_iter().map(|r| r.id).collect();
    assert_eq!(ids, vec!["3", "1", "3", "2"]);
  }

  #[test]
  fn title_is_copied_verbatim() {
    let response =
      raw(json!([{ "Items": [video("v", "  <b>Loud</b> & spaced  ", json!({ "default": { "url": "https://i/d" } }))] }]));
    assert_eq!(normalize(&response).unwrap()[0].title, "  <b>Loud</b> & spaced  ");
  }

  #[test]
  fn malformed_items_are_skipped() {
    let thumbs = json!({ "default": { "url": "https://img/d.jpg" } });
    let response = raw(json!([{ "Items": [
      { "id": {}, "snippet": { "title": "no id", "thumbnails": thumbs.clone() } },
      { "id": { "videoId": "v", "channelId": "c" }, "snippet": { "title": "both", "thumbnails": thumbs.clone() } },
      video("nothumb", "no thumbnail", json!({})),
      video("", "empty id", thumbs.clone()),
      video("ok", "fine", thumbs)
    ] }]));
    let results = normalize(&response).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "ok");
  }

  #[test]
  fn normalize_item_reports_reason() {
    let item: RawItem =
      serde_json::from_value(json!({ "id": { "videoId": "v", "channelId": "c" }, "snippet": { "title": "x" } })).unwrap();
    assert!(matches!(normalize_item(&item), Err(MalformedItem::AmbiguousIdentifier { .. })));

    let item: RawItem = serde_json::from_value(video("v", "x", json!({ "high": { "url": "" } }))).unwrap();
    assert_eq!(normalize_item(&item), Err(MalformedItem::MissingThumbnail { id: "v".to_string() }));
  }

  #[test]
  fn only_first_page_is_used() {
    let thumbs = json!({ "default": { "url": "https://img/d.jpg" } });
    let response =
      raw(json!([{ "Items": [video("first", "1", thumbs.clone())] }, { "Items": [video("second", "2", thumbs)] }]));
    let results = normalize(&response).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "first");
  }

  #[test]
  fn empty_response_is_an_error() {
    assert!(matches!(normalize(&Vec::new()), Err(ResponseError::NoPages)));
  }

  #[test]
  fn null_item_is_skipped_and_sibling_kept() {
    let thumbs = json!({ "default": { "url": "https://img/d.jpg" } });
    let results = normalize_value(json!([{ "Items": [null, video("ok", "fine", thumbs)] }])).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "ok");
  }

  #[test]
  fn null_items_page_is_empty() {
    assert_eq!(normalize_value(json!([{ "Items": null }])).unwrap(), Vec::new());
    assert_eq!(normalize_value(json!([{}])).unwrap(), Vec::new());
  }

  #[test]
  fn null_or_mistyped_fields_only_drop_their_item() {
    let thumbs = json!({ "default": { "url": "https://img/d.jpg" } });
    let results = normalize_value(json!([{ "Items": [
      { "id": null, "snippet": { "title": "null id", "thumbnails": thumbs.clone() } },
      { "id": 42, "snippet": { "title": "number id", "thumbnails": thumbs.clone() } },
      { "id": { "videoId": "nosnippet" }, "snippet": null },
      { "id": { "videoId": "nullurl" }, "snippet": { "thumbnails": { "high": { "url": null } } } },
      { "id": { "videoId": "untitled" }, "snippet": { "title": null, "thumbnails": thumbs } }
    ] }]))
    .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].id, "untitled");
    assert_eq!(results[0].title, "");
  }

  #[test]
  fn decode_item_reports_null_and_bad_shape() {
    assert_eq!(decode_item(&Value::Null), Err(MalformedItem::Null));
    assert!(matches!(decode_item(&json!({ "id": 42 })), Err(MalformedItem::Undecodable(_))));
    assert_eq!(decode_item(&json!({ "id": null })), Err(MalformedItem::MissingIdentifier));
  }

  #[test]
  fn description_defaults_to_unknown() {
    let thumbs = json!({ "default": { "url": "https://img/d.jpg" } });
    let results = normalize_value(json!([{ "Items": [
      { "id": { "videoId": "a" }, "snippet": { "title": "A", "description": "chill beats", "thumbnails": thumbs.clone() } },
      { "id": { "videoId": "b" }, "snippet": { "title": "B", "thumbnails": thumbs.clone() } },
      { "id": { "videoId": "c" }, "snippet": { "title": "C", "description": null, "thumbnails": thumbs } }
    ] }]))
    .unwrap();
    let descriptions: Vec<_> = results.iter().map(|r| r.description.as_str()).collect();
    assert_eq!(descriptions, vec!["chill beats", "Unknown", "Unknown"]);
  }

  #[test]
  fn wrong_shape_is_an_error() {
    assert!(matches!(normalize_value(json!({ "Items": [] })), Err(ResponseError::Shape(_))));
  }
}
