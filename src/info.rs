use chrono::NaiveDate;
use itertools::Itertools;
use serde::Deserialize;

const PLACEHOLDER: &str = "N/A";

/// The subset of yt-dlp's info json shown on the page. Every field is
/// optional since extractors fill in whatever the site exposes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideoInfo {
  pub title: Option<String>,
  pub uploader: Option<String>,
  // yt-dlp reports fractional seconds for some extractors
  pub duration: Option<f64>,
  pub view_count: Option<u64>,
  pub upload_date: Option<String>,
}

impl VideoInfo {
  pub fn title(&self) -> &str {
    non_empty(&self.title).unwrap_or(PLACEHOLDER)
  }

  pub fn uploader(&self) -> &str {
    non_empty(&self.uploader).unwrap_or(PLACEHOLDER)
  }

  pub fn duration(&self) -> String {
    format_duration(self.duration.map(|d| d as u64))
  }

  pub fn views(&self) -> String {
    format_views(self.view_count.unwrap_or(0))
  }

  pub fn upload_date(&self) -> String {
    match non_empty(&self.upload_date) {
      Some(date) => format_upload_date(date),
      None => PLACEHOLDER.to_string(),
    }
  }
}

fn non_empty(s: &Option<String>) -> Option<&str> {
  s.as_deref().filter(|s| !s.is_empty())
}

pub fn format_duration(secs: Option<u64>) -> String {
  let secs = match secs {
    None | Some(0) => return PLACEHOLDER.to_string(),
    Some(secs) => secs,
  };

  let hours = secs / 3600;
  let minutes = (secs % 3600) / 60;
  let seconds = secs % 60;

  if hours > 0 {
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
  } else {
    format!("{:02}:{:02}", minutes, seconds)
  }
}

// 1234567 -> "1,234,567"
pub fn format_views(count: u64) -> String {
  let digits = count.to_string();
  let head = digits.len() % 3;

  let mut groups = Vec::new();
  if head > 0 {
    groups.push(&digits[..head]);
  }
  for start in (head..digits.len()).step_by(3) {
    groups.push(&digits[start..start + 3]);
  }

  groups.into_iter().join(",")
}

// yt-dlp uses YYYYMMDD; anything unexpected is shown as is
pub fn format_upload_date(raw: &str) -> String {
  NaiveDate::parse_from_str(raw, "%Y%m%d")
    .map(|date| date.format("%d/%m/%Y").to_string())
    .unwrap_or_else(|_| raw.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_duration() {
    assert_eq!(format_duration(Some(45)), "00:45");
    assert_eq!(format_duration(Some(600)), "10:00");
    assert_eq!(format_duration(Some(3599)), "59:59");
    assert_eq!(format_duration(Some(3600)), "01:00:00");
    assert_eq!(format_duration(Some(3725)), "01:02:05");
    assert_eq!(format_duration(Some(0)), "N/A");
    assert_eq!(format_duration(None), "N/A");
  }

  #[test]
  fn test_format_views() {
    assert_eq!(format_views(0), "0");
    assert_eq!(format_views(999), "999");
    assert_eq!(format_views(1000), "1,000");
    assert_eq!(format_views(1234567), "1,234,567");
    assert_eq!(format_views(12345678), "12,345,678");
  }

  #[test]
  fn test_format_upload_date() {
    assert_eq!(format_upload_date("20091025"), "25/10/2009");
    assert_eq!(format_upload_date("sometime"), "sometime");
  }

  #[test]
  fn test_deserialize_partial_info() {
    let json = r#"{
      "id": "dQw4w9WgXcQ",
      "title": "Never Gonna Give You Up",
      "duration": 212.0,
      "formats": []
    }"#;
    let info: VideoInfo = serde_json::from_str(json).unwrap();

    assert_eq!(info.title(), "Never Gonna Give You Up");
    assert_eq!(info.uploader(), "N/A");
    assert_eq!(info.duration(), "03:32");
    assert_eq!(info.views(), "0");
    assert_eq!(info.upload_date(), "N/A");
  }

  #[test]
  fn test_empty_strings_use_placeholder() {
    let info = VideoInfo {
      title: Some(String::new()),
      uploader: Some(String::new()),
      ..Default::default()
    };
    assert_eq!(info.title(), "N/A");
    assert_eq!(info.uploader(), "N/A");
  }
}
