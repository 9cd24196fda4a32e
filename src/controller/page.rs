//! Minimal HTML pages shown at the end of the OAuth redirect.

use axum::response::Html;

const STYLE: &str = "body{font-family:sans-serif;background:#1b1b1f;color:#eee;\
display:flex;align-items:center;justify-content:center;height:100vh;margin:0}\
main{max-width:32rem;text-align:center}h1{margin-bottom:.5rem}";

fn layout(title: &str, body: &str) -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html lang=\"no\">\n<head>\n<meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
    ))
}

/// Page shown when linking failed.
pub fn error_page(message: &str) -> Html<String> {
    layout(
        "Galtinn-verifisering feilet",
        &format!("<h1>Oisann!</h1>\n<p>{}</p>", escape_html(message)),
    )
}

/// Page shown after a successful link.
pub fn success_page(name: &str) -> Html<String> {
    layout(
        "Galtinn-verifisering fullført",
        &format!(
            "<h1>Hei, {}!</h1>\n<p>Discord-brukeren din er nå koblet til Galtinn. \
             Du kan trygt lukke denne fanen.</p>",
            escape_html(name)
        ),
    )
}

fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            c => escaped.push(c),
        }
    }
    escaped
}
