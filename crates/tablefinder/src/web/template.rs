//! The single HTML page.
//!
//! Everything interpolated into the page is escaped. The only markup in the
//! message region comes from the fixed [`LookupOutcome`] renderings below.

use crate::config::PageConfig;
use crate::finder::LookupOutcome;

const NOT_FOUND_MESSAGE: &str =
    "Nom introuvable – veuillez vérifier l'orthographe / Name not found – please check spelling";

const STYLE: &str = r"
  body   {font-family:sans-serif;text-align:center;
          margin:0 auto;max-width:600px;padding:1rem}
  h1     {font-size:2rem;margin:0.5rem 0;}
  #msg   {font-size:2rem;margin-top:1rem;}
  .banner{display:block;margin:1rem auto;max-width:30%;height:auto}
  input,button{font-size:1rem;padding:.7rem;border:1px solid #ccc;
               border-radius:6px;box-sizing:border-box;width:100%;margin:0.3rem 0}
  button {background:#6a5acd;color:white;border:none}
";

/// Escape text for use in HTML content and double-quoted attributes.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Markup for the message region.
#[must_use]
pub fn render_message(outcome: &LookupOutcome) -> String {
    match outcome {
        LookupOutcome::Found { table, .. } => {
            format!("🪑 <b>Table {}</b>.", escape_html(table.as_str()))
        }
        LookupOutcome::NotFound => escape_html(NOT_FOUND_MESSAGE),
    }
}

/// Render the page with the search box prefilled with `query`, plus the
/// message region when there is an outcome.
#[must_use]
pub fn render_page(page: &PageConfig, query: &str, outcome: Option<&LookupOutcome>) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<!doctype html><html lang=en><meta charset=utf-8>\n");
    html.push_str("<title>Trouvez votre table / Find your table</title>\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width,initial-scale=1\">\n",
    );
    html.push_str(&format!("<style>{STYLE}</style>\n\n"));

    html.push_str(&format!("<h1>{}</h1>\n", escape_html(&page.heading)));
    html.push_str("<h2>BIENVENUE / WELCOME / BIENVENIDO</h2>\n");
    html.push_str(&format!(
        "<img src=\"{}\"\n     alt=\"Event banner\" class=\"banner\">\n\n",
        escape_html(&page.banner_path)
    ));

    html.push_str("<form action=\"/lookup\">\n");
    html.push_str(&format!(
        "  <input name=\"q\" placeholder=\"Tapez votre nom / Type your name\" value=\"{}\">\n",
        escape_html(query)
    ));
    html.push_str("  <button type=\"submit\">Search</button>\n</form>\n");

    if let Some(outcome) = outcome {
        html.push_str(&format!(
            "\n<p id=\"msg\">{}</p>\n",
            render_message(outcome)
        ));
    }

    html.push_str("</html>\n");
    html
}
