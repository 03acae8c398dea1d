use crate::output::print_json;
use anyhow::Result;
use omikuji_core::config::Config;
use omikuji_server::service::{self, DrawRequest, DrawResponse};
use omikuji_server::AppState;

pub fn run(config: Config, prompt: Option<String>, session: Option<String>, json: bool) -> Result<()> {
    let state = AppState::new(config)?;
    let rt = tokio::runtime::Runtime::new()?;
    let response = rt.block_on(service::draw(
        &state,
        DrawRequest {
            prompt,
            session_id: session,
            actor_id: None,
        },
    ));

    if json {
        print_json(&response)
    } else {
        print!("{}", render(&response));
        Ok(())
    }
}

/// Human-readable draw, as shown by `omikuji draw` and the chat REPL.
pub fn render(response: &DrawResponse) -> String {
    let record = &response.fortune_data;
    let mut out = format!(
        "{} {}\n{}\n\nラッキーカラー: {}\nラッキーアイテム: {}\nラッキースポット: {}\nsession: {}\n",
        record.fortune,
        record.star_rating(),
        response.result,
        record.lucky_color,
        record.lucky_item,
        record.lucky_spot,
        response.session_id,
    );
    if let Some(error) = &response.error {
        out.push_str(&format!("(local draw: {error})\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_shows_record_and_fallback_note() {
        let response = service::draw_rejected("offline");
        let text = render(&response);
        let record = &response.fortune_data;
        assert!(text.starts_with(&format!("{} {}", record.fortune, record.star_rating())));
        assert!(text.contains(&response.result));
        assert!(text.contains(&format!("ラッキースポット: {}", record.lucky_spot)));
        assert!(text.contains("(local draw: offline)"));
    }
}
