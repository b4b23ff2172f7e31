//! HTML templates for the 1080x1350 carousel panels.
//!
//! The renderer captures these through a headless browser, so the templates
//! can lean on real CSS: gradients, blur, web fonts. Three layouts: content
//! slide, thumbnail-composite cover, and the text-only cover fallback.

use crate::types::Slide;

pub const CANVAS_WIDTH: u32 = 1080;
pub const CANVAS_HEIGHT: u32 = 1350;

/// Greedy word-wrap character budget per cover title line.
const COVER_LINE_BUDGET: usize = 25;

/// Escape text for interpolation into HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Greedy word-wrap at a fixed character budget per line.
pub fn wrap_title(title: &str, budget: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in title.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > budget {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Markup for one content slide: big number, title, divider, body, and a
/// footer progress bar filled to `(number - 1) / total`.
pub fn slide_html(slide: &Slide, total_slides: u32) -> String {
    let progress = if total_slides == 0 {
        0.0
    } else {
        (slide.number.saturating_sub(1)) as f64 / total_slides as f64 * 100.0
    };
    let number = format!("{:02}", slide.number);
    let title = escape_html(&slide.title);
    let content = escape_html(&slide.content);
    let indicator = format!("{} / {}", slide.number, total_slides);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700;900&display=swap" rel="stylesheet">
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{
      width: 1080px;
      height: 1350px;
      font-family: 'Inter', sans-serif;
      background: linear-gradient(180deg, #1a1a2e 0%, #16213e 50%, #0f3460 100%);
      color: #ffffff;
      display: flex;
      flex-direction: column;
      justify-content: center;
      align-items: center;
      padding: 80px;
      overflow: hidden;
      position: relative;
    }}
    .bg-decoration {{
      position: absolute;
      width: 400px;
      height: 400px;
      border-radius: 50%;
      filter: blur(120px);
      opacity: 0.15;
    }}
    .bg-decoration.top-right {{ top: -100px; right: -100px; background: #e94560; }}
    .bg-decoration.bottom-left {{ bottom: -100px; left: -100px; background: #f97316; }}
    .slide-number {{
      font-size: 200px;
      font-weight: 900;
      color: #e94560;
      line-height: 1;
      opacity: 0.9;
      margin-bottom: 10px;
    }}
    .slide-title {{
      font-size: 48px;
      font-weight: 700;
      text-align: center;
      line-height: 1.2;
      margin-bottom: 30px;
      max-width: 900px;
    }}
    .divider {{
      width: 120px;
      height: 4px;
      background: linear-gradient(90deg, #e94560, #f97316);
      border-radius: 2px;
      margin-bottom: 40px;
    }}
    .slide-content {{
      font-size: 32px;
      font-weight: 400;
      color: #cbd5e1;
      text-align: center;
      line-height: 1.6;
      max-width: 850px;
    }}
    .footer {{
      position: absolute;
      bottom: 50px;
      left: 80px;
      right: 80px;
      display: flex;
      flex-direction: column;
      align-items: center;
      gap: 16px;
    }}
    .progress-bar-container {{
      width: 100%;
      height: 4px;
      background: rgba(255,255,255,0.1);
      border-radius: 2px;
      overflow: hidden;
    }}
    .progress-bar {{
      height: 100%;
      background: linear-gradient(90deg, #e94560, #f97316);
      border-radius: 2px;
      width: {progress}%;
    }}
    .slide-indicator {{
      font-size: 18px;
      color: rgba(255,255,255,0.4);
      font-weight: 600;
      letter-spacing: 2px;
    }}
  </style>
</head>
<body>
  <div class="bg-decoration top-right"></div>
  <div class="bg-decoration bottom-left"></div>

  <div class="slide-number">{number}</div>
  <div class="slide-title">{title}</div>
  <div class="divider"></div>
  <div class="slide-content">{content}</div>

  <div class="footer">
    <div class="progress-bar-container">
      <div class="progress-bar"></div>
    </div>
    <div class="slide-indicator">{indicator}</div>
  </div>
</body>
</html>"#
    )
}

/// Markup for the composite cover: thumbnail (as a data URI) under a dark
/// linear gradient, fully opaque at the bottom, with the wrapped title,
/// divider, and swipe CTA laid over it.
pub fn cover_html(title: &str, thumbnail_data_uri: &str) -> String {
    let lines = wrap_title(&escape_html(title), COVER_LINE_BUDGET);
    let title_lines = lines
        .iter()
        .map(|line| format!(r#"<div class="cover-line">{line}</div>"#))
        .collect::<Vec<_>>()
        .join("\n      ");

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700;900&display=swap" rel="stylesheet">
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{
      width: 1080px;
      height: 1350px;
      font-family: 'Inter', sans-serif;
      background: #0f0f1a;
      color: #ffffff;
      overflow: hidden;
      position: relative;
    }}
    .thumbnail {{
      position: absolute;
      top: 0;
      left: 0;
      width: 1080px;
      height: 1215px;
      object-fit: cover;
      object-position: center;
    }}
    .gradient {{
      position: absolute;
      top: 0;
      left: 0;
      width: 1080px;
      height: 1350px;
      background: linear-gradient(180deg,
        rgba(15,15,26,0.3) 0%,
        rgba(15,15,26,0.5) 50%,
        rgba(15,15,26,0.85) 75%,
        rgba(15,15,26,1) 100%);
    }}
    .content {{
      position: absolute;
      left: 80px;
      right: 80px;
      bottom: 120px;
    }}
    .cover-line {{
      font-size: 58px;
      font-weight: 900;
      line-height: 72px;
    }}
    .divider {{
      width: 120px;
      height: 4px;
      background: linear-gradient(90deg, #e94560, #f97316);
      border-radius: 2px;
      margin: 20px 0;
    }}
    .swipe-cta {{
      font-size: 22px;
      color: rgba(255,255,255,0.6);
      font-weight: 600;
    }}
    .swipe-cta .arrow {{ color: #e94560; }}
  </style>
</head>
<body>
  <img class="thumbnail" src="{thumbnail_data_uri}">
  <div class="gradient"></div>
  <div class="content">
      {title_lines}
    <div class="divider"></div>
    <div class="swipe-cta">Swipe to explore <span class="arrow">&rarr;</span></div>
  </div>
</body>
</html>"#
    )
}

/// Markup for the text-only cover fallback (no thumbnail): dark gradient
/// background with a radial glow decoration.
pub fn cover_fallback_html(title: &str) -> String {
    let title = escape_html(title);

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="UTF-8">
  <link href="https://fonts.googleapis.com/css2?family=Inter:wght@400;600;700;900&display=swap" rel="stylesheet">
  <style>
    * {{ margin: 0; padding: 0; box-sizing: border-box; }}
    body {{
      width: 1080px;
      height: 1350px;
      font-family: 'Inter', sans-serif;
      background: linear-gradient(180deg, #0f0f1a 0%, #1a1a2e 40%, #0f3460 100%);
      color: #ffffff;
      display: flex;
      flex-direction: column;
      justify-content: flex-end;
      padding: 80px;
      overflow: hidden;
      position: relative;
    }}
    .bg-glow {{
      position: absolute;
      top: 15%;
      left: 50%;
      transform: translateX(-50%);
      width: 600px;
      height: 600px;
      border-radius: 50%;
      background: radial-gradient(circle, rgba(233,69,96,0.3) 0%, transparent 70%);
      filter: blur(80px);
    }}
    .content {{ position: relative; z-index: 2; }}
    .cover-title {{
      font-size: 64px;
      font-weight: 900;
      line-height: 1.1;
      margin-bottom: 30px;
      max-width: 900px;
    }}
    .divider {{
      width: 120px;
      height: 4px;
      background: linear-gradient(90deg, #e94560, #f97316);
      border-radius: 2px;
      margin-bottom: 30px;
    }}
    .swipe-cta {{
      font-size: 24px;
      color: rgba(255,255,255,0.6);
      font-weight: 600;
    }}
    .swipe-cta .arrow {{ color: #e94560; }}
  </style>
</head>
<body>
  <div class="bg-glow"></div>
  <div class="content">
    <div class="cover-title">{title}</div>
    <div class="divider"></div>
    <div class="swipe-cta">Swipe to explore <span class="arrow">&rarr;</span></div>
  </div>
</body>
</html>"#
    )
}
