use serde::Deserialize;

/// Quality presets offered by the form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Quality {
  #[default]
  Hd720,
  FullHd1080,
  Best,
  Worst,
}

impl Quality {
  pub const ALL: [Quality; 4] =
    [Quality::Hd720, Quality::FullHd1080, Quality::Best, Quality::Worst];

  // value of the <option> element, must match the serde names
  pub fn form_value(self) -> &'static str {
    match self {
      Quality::Hd720 => "hd720",
      Quality::FullHd1080 => "full_hd1080",
      Quality::Best => "best",
      Quality::Worst => "worst",
    }
  }

  pub fn label(self) -> &'static str {
    match self {
      Quality::Hd720 => "HD 720p",
      Quality::FullHd1080 => "Full HD 1080p",
      Quality::Best => "Melhor qualidade disponível",
      Quality::Worst => "Menor arquivo (economia de espaço)",
    }
  }

  fn base_selector(self) -> &'static str {
    match self {
      Quality::Hd720 => "best[height<=720]",
      Quality::FullHd1080 => "best[height<=1080]",
      Quality::Best => "best",
      Quality::Worst => "worst",
    }
  }

  /// The yt-dlp format selector: prefer mp4 at the preset, then any mp4,
  /// then whatever is best.
  pub fn format_selector(self) -> String {
    format!("{}[ext=mp4]/best[ext=mp4]/best", self.base_selector())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_format_selectors() {
    assert_eq!(
      Quality::Hd720.format_selector(),
      "best[height<=720][ext=mp4]/best[ext=mp4]/best"
    );
    assert_eq!(
      Quality::FullHd1080.format_selector(),
      "best[height<=1080][ext=mp4]/best[ext=mp4]/best"
    );
    assert_eq!(
      Quality::Best.format_selector(),
      "best[ext=mp4]/best[ext=mp4]/best"
    );
    assert_eq!(
      Quality::Worst.format_selector(),
      "worst[ext=mp4]/best[ext=mp4]/best"
    );
  }

  #[test]
  fn test_form_values_deserialize() {
    #[derive(Deserialize)]
    struct Wrapper {
      quality: Quality,
    }

    for quality in Quality::ALL {
      let json = format!(r#"{{"quality":"{}"}}"#, quality.form_value());
      let parsed: Wrapper = serde_json::from_str(&json).unwrap();
      assert_eq!(parsed.quality, quality);
    }
  }

  #[test]
  fn test_default_is_hd720() {
    assert_eq!(Quality::default(), Quality::Hd720);
    assert_eq!(Quality::ALL[0], Quality::default());
  }
}
