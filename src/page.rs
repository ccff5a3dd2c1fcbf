use itertools::Itertools;

use crate::{
  download::DownloadFailure,
  form::{DownloadRequest, InfoPanel, Outcome, ReadyDownload},
  info::VideoInfo,
  quality::Quality,
};

const STYLE_CSS: &str = include_str!("../html/style.css");
const HELP_HTML: &str = include_str!("../html/help.html");

pub const INVALID_URL_MSG: &str =
  "❌ Por favor, insira uma URL válida do YouTube.";
pub const INFO_UNAVAILABLE_MSG: &str =
  "⚠️ Não foi possível obter informações \
  do vídeo, mas o download ainda pode funcionar.";
pub const SUCCESS_MSG: &str = "✅ Vídeo baixado com sucesso!";
pub const UNAVAILABLE_MSG: &str =
  "❌ Vídeo não disponível, privado ou removido.";
pub const NO_FORMATS_MSG: &str =
  "❌ Formato de vídeo não encontrado. Tente uma qualidade diferente.";

/// The whole page: form pre-filled with the request, then whatever the
/// submission produced, then the help panel.
pub fn render(req: &DownloadRequest, outcome: Option<&Outcome>) -> String {
  let mut body = String::new();
  body.push_str(&render_form(req));

  match outcome {
    None => {}
    Some(Outcome::Invalid) => body.push_str(&banner("error", INVALID_URL_MSG)),
    Some(Outcome::Finished { info, result }) => {
      body.push_str(&render_info_panel(info, req.quality));
      body.push_str(&render_result(result));
    }
  }

  format!(
    "<!DOCTYPE html>\n\
     <html lang=\"pt-BR\">\n\
     <head>\n\
     <meta charset=\"utf-8\">\n\
     <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
     <title>YouTube Downloader HD</title>\n\
     <style>\n{STYLE_CSS}</style>\n\
     </head>\n\
     <body>\n\
     <main>\n\
     <h1 class=\"main-header\">📺 YouTube Downloader HD</h1>\n\
     <p class=\"subtitle\">Baixe vídeos do YouTube em alta qualidade de forma \
     simples e rápida</p>\n\
     {body}\
     <hr>\n\
     {HELP_HTML}\
     </main>\n\
     </body>\n\
     </html>\n"
  )
}

fn render_form(req: &DownloadRequest) -> String {
  let options = Quality::ALL
    .iter()
    .map(|&quality| {
      let selected = if quality == req.quality { " selected" } else { "" };
      format!(
        "<option value=\"{}\"{}>{}</option>\n",
        quality.form_value(),
        selected,
        escape(quality.label())
      )
    })
    .join("");

  let checked = if req.show_info { " checked" } else { "" };

  format!(
    "<form method=\"post\" action=\"/\" class=\"download-form\">\n\
     <h3>🔗 URL do Vídeo</h3>\n\
     <label for=\"url\">Cole aqui o link do vídeo do YouTube:</label>\n\
     <input type=\"text\" id=\"url\" name=\"url\" value=\"{url}\" \
     placeholder=\"https://www.youtube.com/watch?v=...\" \
     title=\"Cole a URL completa do vídeo do YouTube que deseja baixar\">\n\
     <h3>⚙️ Configurações</h3>\n\
     <div class=\"columns\">\n\
     <div>\n\
     <label for=\"quality\">Qualidade do vídeo:</label>\n\
     <select id=\"quality\" name=\"quality\">\n{options}</select>\n\
     </div>\n\
     <div>\n\
     <label><input type=\"checkbox\" name=\"show_info\"{checked}> \
     Mostrar informações do vídeo</label>\n\
     </div>\n\
     </div>\n\
     <hr>\n\
     <button type=\"submit\" class=\"primary\">📥 Baixar Vídeo</button>\n\
     </form>\n",
    url = escape(&req.url),
  )
}

fn render_info_panel(info: &InfoPanel, quality: Quality) -> String {
  match info {
    InfoPanel::Hidden => String::new(),
    InfoPanel::Unavailable => banner("warning", INFO_UNAVAILABLE_MSG),
    InfoPanel::Fetched(info) => render_video_info(info, quality),
  }
}

fn render_video_info(info: &VideoInfo, quality: Quality) -> String {
  format!(
    "<section class=\"video-info\">\n\
     <h3>📋 Informações do Vídeo</h3>\n\
     <div class=\"columns\">\n\
     <div>\n\
     <p><strong>Título:</strong> {}</p>\n\
     <p><strong>Canal:</strong> {}</p>\n\
     <p><strong>Duração:</strong> {}</p>\n\
     </div>\n\
     <div>\n\
     <p><strong>Visualizações:</strong> {}</p>\n\
     <p><strong>Data de upload:</strong> {}</p>\n\
     <p><strong>Qualidade selecionada:</strong> {}</p>\n\
     </div>\n\
     </div>\n\
     </section>\n",
    escape(info.title()),
    escape(info.uploader()),
    info.duration(),
    info.views(),
    escape(&info.upload_date()),
    escape(quality.label()),
  )
}

fn render_result(result: &Result<ReadyDownload, DownloadFailure>) -> String {
  match result {
    Ok(ready) => format!(
      "{}<a class=\"download-button\" href=\"/file/{}\" download=\"{}\" \
       title=\"{}\">💾 Clique aqui para baixar o arquivo</a>\n",
      banner("success", SUCCESS_MSG),
      ready.token,
      escape(&ready.file_name),
      escape(&ready.title),
    ),
    Err(failure) => banner("error", &failure_message(failure)),
  }
}

pub fn failure_message(failure: &DownloadFailure) -> String {
  match failure {
    DownloadFailure::Unavailable => UNAVAILABLE_MSG.to_string(),
    DownloadFailure::NoFormats => NO_FORMATS_MSG.to_string(),
    DownloadFailure::Other(msg) => format!("❌ Erro no download: {msg}"),
  }
}

fn banner(kind: &str, message: &str) -> String {
  format!("<div class=\"{kind}-box\">{}</div>\n", escape(message))
}

fn escape(s: &str) -> String {
  let mut out = String::with_capacity(s.len());
  for c in s.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      c => out.push(c),
    }
  }
  out
}
